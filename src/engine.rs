use rand::{rngs::StdRng, SeedableRng};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tracing::{debug, warn};

use crate::cache::{cache_key, ContentCache};
use crate::config::EngineConfig;
use crate::metrics;
use crate::platform::{Platform, PlatformSpec};
use crate::provider::{ProviderClient, ProviderDraft, ProviderError};
use crate::synthesis::{self, Draft};
use crate::templates::{self, ContentStyle};
use crate::topic::{self, TopicContext};
use crate::{
    ContentRequest, CostReport, GeneratedContent, GenerationOutcome, GenerationRecord,
    GenerationSource, OptimizationFlags,
};

/// Cost-optimized request facade. Checks the cache, calls the provider
/// when one is configured, and degrades to template synthesis on any
/// provider failure. Never returns an error to the caller.
pub struct ContentEngine {
    config: EngineConfig,
    cache: Arc<dyn ContentCache>,
    provider: Option<ProviderClient>,
    rng: Mutex<StdRng>,
}

impl ContentEngine {
    pub fn new(
        config: EngineConfig,
        cache: Arc<dyn ContentCache>,
        provider: Option<ProviderClient>,
    ) -> Self {
        Self {
            config,
            cache,
            provider,
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    /// Fixed-seed engine for reproducible template selection and view
    /// jitter in tests.
    pub fn with_seed(
        config: EngineConfig,
        cache: Arc<dyn ContentCache>,
        provider: Option<ProviderClient>,
        seed: u64,
    ) -> Self {
        Self {
            config,
            cache,
            provider,
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub async fn generate(
        &self,
        request: &ContentRequest,
        flags: &OptimizationFlags,
    ) -> GenerationOutcome {
        self.generate_with_deadline(request, flags, None).await
    }

    /// The optional deadline applies to the outbound provider call only;
    /// cache, template, and scoring stages run to completion regardless.
    pub async fn generate_with_deadline(
        &self,
        request: &ContentRequest,
        flags: &OptimizationFlags,
        deadline: Option<Duration>,
    ) -> GenerationOutcome {
        let context = topic::classify(&request.topic);
        let key = cache_key(&self.model_label(), request, flags);
        let caching = flags.use_cache && self.config.cache.enabled;

        if caching {
            if let Some(record) = self.cache.get(&key) {
                debug!(platform = request.platform.key(), "cache hit");
                return self.outcome(request, &context, record, true, Vec::new());
            }
        }

        let (hook, structure) = self.pick_templates(request.style);
        let mut warnings = Vec::new();

        if let Some(provider) = self.provider.clone() {
            let call = self
                .provider_generate(
                    &provider, request, &context, hook, structure, flags, deadline,
                )
                .await;
            match call {
                Ok(content) => {
                    let record = GenerationRecord {
                        content,
                        source: GenerationSource::Provider,
                        model: Some(provider.model().to_string()),
                    };
                    if caching {
                        self.cache.put(&key, record.clone(), self.config.cache.ttl());
                    }
                    return self.outcome(request, &context, record, false, warnings);
                }
                Err(err) => {
                    warn!(error = %err, "provider call failed, falling back to templates");
                    warnings.push(format!("provider call failed: {}", err));
                }
            }
        } else {
            debug!("no provider configured, generating from templates");
        }

        let content = self.template_generate(request, &context, hook, structure, flags);
        let record = GenerationRecord {
            content,
            source: GenerationSource::Template,
            model: None,
        };
        // Template output is cached only when it is the primary mode;
        // provider-failure fallbacks are returned without caching.
        if caching && self.provider.is_none() {
            self.cache.put(&key, record.clone(), self.config.cache.ttl());
        }
        self.outcome(request, &context, record, false, warnings)
    }

    pub async fn generate_batch(
        &self,
        topic: &str,
        platforms: &[Platform],
        style: ContentStyle,
        flags: &OptimizationFlags,
    ) -> Vec<GenerationOutcome> {
        self.generate_batch_with_deadline(topic, platforms, style, flags, None)
            .await
    }

    /// With `batch_requests` set and a provider configured, all uncached
    /// platforms share one combined call. If that call fails, every
    /// platform degrades to the template path together.
    pub async fn generate_batch_with_deadline(
        &self,
        topic: &str,
        platforms: &[Platform],
        style: ContentStyle,
        flags: &OptimizationFlags,
        deadline: Option<Duration>,
    ) -> Vec<GenerationOutcome> {
        let provider = match (&self.provider, flags.batch_requests) {
            (Some(provider), true) => provider.clone(),
            _ => {
                let mut outcomes = Vec::with_capacity(platforms.len());
                for platform in platforms {
                    let request = ContentRequest::new(topic, *platform, style);
                    outcomes.push(self.generate_with_deadline(&request, flags, deadline).await);
                }
                return outcomes;
            }
        };

        let context = topic::classify(topic);
        let (hook, structure) = self.pick_templates(style);
        let caching = flags.use_cache && self.config.cache.enabled;
        let model = self.model_label();

        let mut slots: Vec<Option<GenerationOutcome>> = vec![None; platforms.len()];
        let mut misses = Vec::new();
        for (idx, platform) in platforms.iter().enumerate() {
            let request = ContentRequest::new(topic, *platform, style);
            if caching {
                if let Some(record) = self.cache.get(&cache_key(&model, &request, flags)) {
                    slots[idx] = Some(self.outcome(&request, &context, record, true, Vec::new()));
                    continue;
                }
            }
            misses.push((idx, *platform));
        }

        if !misses.is_empty() {
            let miss_platforms: Vec<Platform> =
                misses.iter().map(|(_, platform)| *platform).collect();
            let call = self
                .provider_generate_batch(
                    &provider,
                    topic,
                    &miss_platforms,
                    style,
                    &context,
                    hook,
                    structure,
                    flags,
                    deadline,
                )
                .await;

            match call {
                Ok(mut drafts) => {
                    for (idx, platform) in misses {
                        let request = ContentRequest::new(topic, platform, style);
                        let finalized = drafts.remove(platform.key()).and_then(|draft| {
                            self.finalize_provider_draft(draft, &request, &context, hook, flags)
                                .ok()
                        });
                        slots[idx] = Some(match finalized {
                            Some(content) => {
                                let record = GenerationRecord {
                                    content,
                                    source: GenerationSource::Provider,
                                    model: Some(provider.model().to_string()),
                                };
                                if caching {
                                    self.cache.put(
                                        &cache_key(&model, &request, flags),
                                        record.clone(),
                                        self.config.cache.ttl(),
                                    );
                                }
                                self.outcome(&request, &context, record, false, Vec::new())
                            }
                            None => {
                                let warnings = vec![format!(
                                    "batch response missing platform {}",
                                    platform.key()
                                )];
                                self.fallback_outcome(
                                    &request, &context, hook, structure, flags, warnings,
                                )
                            }
                        });
                    }
                }
                Err(err) => {
                    warn!(error = %err, "batch provider call failed, falling back to templates");
                    for (idx, platform) in misses {
                        let request = ContentRequest::new(topic, platform, style);
                        let warnings = vec![format!("provider call failed: {}", err)];
                        slots[idx] = Some(self.fallback_outcome(
                            &request, &context, hook, structure, flags, warnings,
                        ));
                    }
                }
            }
        }

        slots.into_iter().flatten().collect()
    }

    fn model_label(&self) -> String {
        self.provider
            .as_ref()
            .map(|provider| provider.model().to_string())
            .unwrap_or_else(|| "template".to_string())
    }

    fn pick_templates(&self, style: ContentStyle) -> (&'static str, &'static str) {
        let mut rng = self.lock_rng();
        let hook = templates::pick(&mut rng, templates::hooks_for(style));
        let structure = templates::pick(&mut rng, templates::structures_for(style));
        (hook, structure)
    }

    fn lock_rng(&self) -> MutexGuard<'_, StdRng> {
        match self.rng.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    async fn provider_generate(
        &self,
        provider: &ProviderClient,
        request: &ContentRequest,
        context: &TopicContext,
        hook: &str,
        structure: &str,
        flags: &OptimizationFlags,
        deadline: Option<Duration>,
    ) -> Result<GeneratedContent, ProviderError> {
        let spec = request.platform.spec();
        let system_prompt = single_system_prompt(request.platform, request.style, spec);
        let user_prompt = single_user_prompt(request, context, hook, structure, flags);
        let max_tokens = token_budget(spec, flags);

        let draft = provider
            .draft(&system_prompt, &user_prompt, max_tokens, deadline)
            .await?;
        self.finalize_provider_draft(draft, request, context, hook, flags)
    }

    async fn provider_generate_batch(
        &self,
        provider: &ProviderClient,
        topic: &str,
        platforms: &[Platform],
        style: ContentStyle,
        context: &TopicContext,
        hook: &str,
        structure: &str,
        flags: &OptimizationFlags,
        deadline: Option<Duration>,
    ) -> Result<std::collections::HashMap<String, ProviderDraft>, ProviderError> {
        let system_prompt = batch_system_prompt(platforms, style);
        let user_prompt = batch_user_prompt(topic, platforms, context, hook, structure, flags);
        let max_tokens = if flags.smart_token_management {
            Some(((platforms.len() as u32) * 220).clamp(220, 1500))
        } else {
            None
        };
        provider
            .draft_many(&system_prompt, &user_prompt, max_tokens, deadline)
            .await
    }

    fn finalize_provider_draft(
        &self,
        draft: ProviderDraft,
        request: &ContentRequest,
        context: &TopicContext,
        hook: &str,
        flags: &OptimizationFlags,
    ) -> Result<GeneratedContent, ProviderError> {
        let spec = request.platform.spec();
        if draft.content.trim().is_empty() {
            return Err(ProviderError::MissingContent);
        }

        let title = draft
            .title
            .filter(|title| !title.trim().is_empty())
            .unwrap_or_else(|| format!("{} {}", hook, request.topic));
        let body = synthesis::truncate_to(draft.content.trim(), body_budget(spec, flags));

        let mut hashtags = templates::dedup_hashtags(&draft.hashtags, spec.hashtag_count);
        if hashtags.is_empty() {
            hashtags = templates::hashtags_for(context.industry, request.platform);
        }

        let finished = Draft { title, body };
        let estimate = {
            let mut rng = self.lock_rng();
            metrics::score(&finished, &hashtags, request.platform, context, &mut rng)
        };

        Ok(GeneratedContent {
            title: finished.title,
            content: finished.body,
            hashtags,
            estimated_views: estimate.estimated_views,
            quality_score: estimate.quality_score,
            viral_potential: estimate.viral_potential,
        })
    }

    fn template_generate(
        &self,
        request: &ContentRequest,
        context: &TopicContext,
        hook: &str,
        structure: &str,
        flags: &OptimizationFlags,
    ) -> GeneratedContent {
        let spec = request.platform.spec();
        let mut draft = synthesis::compose(
            &request.topic,
            request.style,
            hook,
            structure,
            spec,
            context,
        );
        if flags.response_compression {
            draft.body = synthesis::truncate_to(&draft.body, body_budget(spec, flags));
        }

        let hashtags = templates::hashtags_for(context.industry, request.platform);
        let estimate = {
            let mut rng = self.lock_rng();
            metrics::score(&draft, &hashtags, request.platform, context, &mut rng)
        };

        GeneratedContent {
            title: draft.title,
            content: draft.body,
            hashtags,
            estimated_views: estimate.estimated_views,
            quality_score: estimate.quality_score,
            viral_potential: estimate.viral_potential,
        }
    }

    fn fallback_outcome(
        &self,
        request: &ContentRequest,
        context: &TopicContext,
        hook: &str,
        structure: &str,
        flags: &OptimizationFlags,
        warnings: Vec<String>,
    ) -> GenerationOutcome {
        let content = self.template_generate(request, context, hook, structure, flags);
        let record = GenerationRecord {
            content,
            source: GenerationSource::Template,
            model: None,
        };
        self.outcome(request, context, record, false, warnings)
    }

    fn outcome(
        &self,
        request: &ContentRequest,
        context: &TopicContext,
        record: GenerationRecord,
        cache_hit: bool,
        warnings: Vec<String>,
    ) -> GenerationOutcome {
        GenerationOutcome {
            platform: request.platform,
            style: request.style,
            industry: context.industry,
            cost: CostReport {
                cache_hit,
                source: record.source,
                model: record.model.clone(),
                confidence: record.source.confidence(),
            },
            content: record.content,
            warnings,
        }
    }
}

/// Compressed responses target a reduced character budget; the platform
/// maximum always remains the hard ceiling.
fn body_budget(spec: &PlatformSpec, flags: &OptimizationFlags) -> usize {
    if flags.response_compression {
        (spec.max_length * 3 / 5).max(220).min(spec.max_length)
    } else {
        spec.max_length
    }
}

fn token_budget(spec: &PlatformSpec, flags: &OptimizationFlags) -> Option<u32> {
    if flags.smart_token_management {
        Some(((spec.max_length / 4) as u32).clamp(120, 600))
    } else {
        None
    }
}

fn single_system_prompt(platform: Platform, style: ContentStyle, spec: &PlatformSpec) -> String {
    format!(
        "You write {} {} content for {}. Hard limit: {} characters. \
         Return a single JSON object with fields: title (string), content (string), \
         hashtags (array of strings, at most {}). Output JSON only, no markdown.",
        spec.tone,
        style.label(),
        platform.label(),
        spec.max_length,
        spec.hashtag_count
    )
}

fn single_user_prompt(
    request: &ContentRequest,
    context: &TopicContext,
    hook: &str,
    structure: &str,
    flags: &OptimizationFlags,
) -> String {
    let spec = request.platform.spec();
    if flags.template_reuse {
        format!(
            "Topic: {}\nAngle: {}\nStructure: {}\nIndustry: {}\nKeep it {} and under {} characters.",
            request.topic,
            hook,
            structure,
            context.industry.label(),
            spec.tone,
            spec.max_length
        )
    } else {
        format!(
            "Write a {} about {} for {}.",
            spec.format,
            request.topic,
            request.platform.label()
        )
    }
}

fn batch_system_prompt(platforms: &[Platform], style: ContentStyle) -> String {
    let keys: Vec<&str> = platforms.iter().map(|platform| platform.key()).collect();
    format!(
        "You write {} social media content. Return a single JSON object with one key \
         per platform id ({}); each value is an object with fields: title (string), \
         content (string), hashtags (array of strings). Output JSON only, no markdown.",
        style.label(),
        keys.join(", ")
    )
}

fn batch_user_prompt(
    topic: &str,
    platforms: &[Platform],
    context: &TopicContext,
    hook: &str,
    structure: &str,
    flags: &OptimizationFlags,
) -> String {
    let limits: Vec<String> = platforms
        .iter()
        .map(|platform| {
            let spec = platform.spec();
            format!(
                "{}: {} tone, max {} characters, at most {} hashtags",
                platform.key(),
                spec.tone,
                spec.max_length,
                spec.hashtag_count
            )
        })
        .collect();
    if flags.template_reuse {
        format!(
            "Topic: {}\nAngle: {}\nStructure: {}\nIndustry: {}\nPlatforms:\n{}",
            topic,
            hook,
            structure,
            context.industry.label(),
            limits.join("\n")
        )
    } else {
        format!("Topic: {}\nPlatforms:\n{}", topic, limits.join("\n"))
    }
}
