use serde::{Deserialize, Serialize};
use std::time::Duration;

use content_forge::{
    ContentRequest, ContentStyle, GenerationOutcome, OptimizationFlags, Platform,
};

#[derive(Debug, Deserialize)]
pub struct ApiGenerateRequest {
    pub topic: Option<String>,
    pub platform: Option<String>,
    pub style: Option<String>,
    pub request_id: Option<String>,
    pub use_cache: Option<bool>,
    pub smart_token_management: Option<bool>,
    pub template_reuse: Option<bool>,
    pub response_compression: Option<bool>,
    pub timeout_ms: Option<u64>,
}

impl ApiGenerateRequest {
    pub fn into_parts(
        self,
        defaults: OptimizationFlags,
    ) -> Result<(ContentRequest, OptimizationFlags, Option<Duration>, Vec<String>), String> {
        let topic = self.topic.unwrap_or_default().trim().to_string();
        if topic.is_empty() {
            return Err("topic is required".to_string());
        }

        let platform_raw = self.platform.unwrap_or_else(|| "tiktok".to_string());
        let platform = Platform::from_str(&platform_raw)
            .ok_or_else(|| format!("invalid platform: {}", platform_raw))?;

        let mut warnings = Vec::new();
        let style = match self.style.as_deref() {
            None | Some("") => ContentStyle::Viral,
            Some(raw) => ContentStyle::from_str(raw).unwrap_or_else(|| {
                warnings.push(format!("unknown style {:?}, using viral", raw));
                ContentStyle::Viral
            }),
        };

        let mut flags = defaults;
        if let Some(value) = self.use_cache {
            flags.use_cache = value;
        }
        if let Some(value) = self.smart_token_management {
            flags.smart_token_management = value;
        }
        if let Some(value) = self.template_reuse {
            flags.template_reuse = value;
        }
        if let Some(value) = self.response_compression {
            flags.response_compression = value;
        }

        let deadline = self.timeout_ms.map(Duration::from_millis);

        Ok((
            ContentRequest::new(topic, platform, style),
            flags,
            deadline,
            warnings,
        ))
    }
}

#[derive(Debug, Deserialize)]
pub struct ApiBatchRequest {
    pub topic: Option<String>,
    pub platforms: Option<Vec<String>>,
    pub style: Option<String>,
    pub request_id: Option<String>,
    pub use_cache: Option<bool>,
    pub batch_requests: Option<bool>,
    pub smart_token_management: Option<bool>,
    pub template_reuse: Option<bool>,
    pub response_compression: Option<bool>,
    pub timeout_ms: Option<u64>,
}

impl ApiBatchRequest {
    pub fn into_parts(
        self,
        defaults: OptimizationFlags,
    ) -> Result<
        (
            String,
            Vec<Platform>,
            ContentStyle,
            OptimizationFlags,
            Option<Duration>,
            Vec<String>,
        ),
        String,
    > {
        let topic = self.topic.unwrap_or_default().trim().to_string();
        if topic.is_empty() {
            return Err("topic is required".to_string());
        }

        let platforms = match self.platforms {
            Some(raw) if !raw.is_empty() => {
                let mut platforms = Vec::with_capacity(raw.len());
                for value in raw {
                    let platform = Platform::from_str(&value)
                        .ok_or_else(|| format!("invalid platform: {}", value))?;
                    if !platforms.contains(&platform) {
                        platforms.push(platform);
                    }
                }
                platforms
            }
            _ => Platform::all().to_vec(),
        };

        let mut warnings = Vec::new();
        let style = match self.style.as_deref() {
            None | Some("") => ContentStyle::Viral,
            Some(raw) => ContentStyle::from_str(raw).unwrap_or_else(|| {
                warnings.push(format!("unknown style {:?}, using viral", raw));
                ContentStyle::Viral
            }),
        };

        let mut flags = defaults;
        if let Some(value) = self.use_cache {
            flags.use_cache = value;
        }
        if let Some(value) = self.batch_requests {
            flags.batch_requests = value;
        }
        if let Some(value) = self.smart_token_management {
            flags.smart_token_management = value;
        }
        if let Some(value) = self.template_reuse {
            flags.template_reuse = value;
        }
        if let Some(value) = self.response_compression {
            flags.response_compression = value;
        }

        let deadline = self.timeout_ms.map(Duration::from_millis);

        Ok((topic, platforms, style, flags, deadline, warnings))
    }
}

#[derive(Debug, Serialize)]
pub struct ApiGenerateResponse {
    pub request_id: String,
    pub platform: String,
    pub style: String,
    pub industry: String,
    pub title: String,
    pub content: String,
    pub hashtags: Vec<String>,
    pub estimated_views: u64,
    pub quality_score: u8,
    pub viral_potential: f64,
    pub cache_hit: bool,
    pub source: String,
    pub model: Option<String>,
    pub confidence: f64,
    pub warnings: Vec<String>,
}

impl ApiGenerateResponse {
    pub fn from_outcome(
        outcome: GenerationOutcome,
        extra_warnings: Vec<String>,
        request_id: String,
    ) -> Self {
        let mut warnings = extra_warnings;
        warnings.extend(outcome.warnings);
        Self {
            request_id,
            platform: outcome.platform.key().to_string(),
            style: outcome.style.label().to_string(),
            industry: outcome.industry.label().to_string(),
            title: outcome.content.title,
            content: outcome.content.content,
            hashtags: outcome.content.hashtags,
            estimated_views: outcome.content.estimated_views,
            quality_score: outcome.content.quality_score,
            viral_potential: outcome.content.viral_potential,
            cache_hit: outcome.cost.cache_hit,
            source: outcome.cost.source.label().to_string(),
            model: outcome.cost.model,
            confidence: outcome.cost.confidence,
            warnings,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ApiBatchResponse {
    pub request_id: String,
    pub results: Vec<ApiGenerateResponse>,
}
