pub mod cache;
pub mod config;
pub mod engine;
pub mod metrics;
pub mod platform;
pub mod provider;
pub mod synthesis;
pub mod templates;
pub mod topic;

use serde::{Deserialize, Serialize};

pub use cache::{cache_key, ContentCache, MemoryCache};
pub use config::EngineConfig;
pub use engine::ContentEngine;
pub use platform::{Platform, PlatformSpec};
pub use provider::{ProviderClient, ProviderError};
pub use templates::ContentStyle;
pub use topic::{Industry, Sentiment, TopicContext};

/// One content-generation request. Transient, constructed per call.
#[derive(Debug, Clone)]
pub struct ContentRequest {
    pub topic: String,
    pub platform: Platform,
    pub style: ContentStyle,
}

impl ContentRequest {
    pub fn new(topic: impl Into<String>, platform: Platform, style: ContentStyle) -> Self {
        Self {
            topic: topic.into(),
            platform,
            style,
        }
    }
}

/// Cost-optimization switches recognized by the engine.
#[derive(Debug, Clone, Copy)]
pub struct OptimizationFlags {
    pub use_cache: bool,
    pub batch_requests: bool,
    pub smart_token_management: bool,
    pub template_reuse: bool,
    pub response_compression: bool,
}

impl Default for OptimizationFlags {
    fn default() -> Self {
        Self {
            use_cache: true,
            batch_requests: true,
            smart_token_management: true,
            template_reuse: true,
            response_compression: false,
        }
    }
}

impl OptimizationFlags {
    /// Stable serialization used inside cache keys.
    pub fn canonical(&self) -> String {
        format!(
            "cache={};batch={};tokens={};templates={};compress={}",
            self.use_cache,
            self.batch_requests,
            self.smart_token_management,
            self.template_reuse,
            self.response_compression
        )
    }
}

/// Finished content for one platform. Immutable once produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedContent {
    pub title: String,
    pub content: String,
    pub hashtags: Vec<String>,
    pub estimated_views: u64,
    pub quality_score: u8,
    pub viral_potential: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationSource {
    Provider,
    Template,
}

impl GenerationSource {
    pub fn label(self) -> &'static str {
        match self {
            GenerationSource::Provider => "provider",
            GenerationSource::Template => "template",
        }
    }

    pub fn confidence(self) -> f64 {
        match self {
            GenerationSource::Provider => 0.9,
            GenerationSource::Template => 0.6,
        }
    }
}

/// What the cache stores: the content plus enough provenance to rebuild
/// the cost annotation on a hit.
#[derive(Debug, Clone)]
pub struct GenerationRecord {
    pub content: GeneratedContent,
    pub source: GenerationSource,
    pub model: Option<String>,
}

#[derive(Debug, Clone)]
pub struct CostReport {
    pub cache_hit: bool,
    pub source: GenerationSource,
    pub model: Option<String>,
    pub confidence: f64,
}

#[derive(Debug, Clone)]
pub struct GenerationOutcome {
    pub platform: Platform,
    pub style: ContentStyle,
    pub industry: Industry,
    pub content: GeneratedContent,
    pub cost: CostReport,
    pub warnings: Vec<String>,
}

pub fn format_number(value: f64) -> String {
    let rounded = value.round().max(0.0) as i64;
    let mut chars: Vec<char> = rounded.to_string().chars().collect();
    let mut result = String::new();
    let mut count = 0usize;

    while let Some(ch) = chars.pop() {
        if count == 3 {
            result.push(',');
            count = 0;
        }
        result.push(ch);
        count += 1;
    }

    result.chars().rev().collect()
}

pub fn format_percent(value: f64) -> String {
    format!("{:.1}%", value * 100.0)
}

pub fn format_float(value: f64, digits: usize) -> String {
    format!("{:.1$}", value, digits)
}
