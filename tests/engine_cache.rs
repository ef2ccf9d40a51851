use std::sync::Arc;
use std::time::Duration;

use content_forge::cache::{cache_key, ContentCache, MemoryCache};
use content_forge::topic::{classify, Industry};
use content_forge::{
    ContentEngine, ContentRequest, ContentStyle, EngineConfig, GeneratedContent, GenerationRecord,
    GenerationSource, OptimizationFlags, Platform, ProviderClient,
};

fn sample_record() -> GenerationRecord {
    GenerationRecord {
        content: GeneratedContent {
            title: "Title".to_string(),
            content: "Body".to_string(),
            hashtags: vec!["#tech".to_string()],
            estimated_views: 1_000,
            quality_score: 70,
            viral_potential: 5.0,
        },
        source: GenerationSource::Provider,
        model: Some("test-model".to_string()),
    }
}

fn offline_engine(seed: u64) -> ContentEngine {
    let config = EngineConfig::default();
    let cache = Arc::new(MemoryCache::new(config.cache.ttl()));
    ContentEngine::with_seed(config, cache, None, seed)
}

fn failing_provider() -> ProviderClient {
    // Nothing listens on this port; every call fails fast.
    ProviderClient::new(
        "test-key".to_string(),
        "http://127.0.0.1:9".to_string(),
        "test-model".to_string(),
        0.2,
        Duration::from_millis(250),
    )
    .expect("client should build")
}

#[test]
fn memory_cache_round_trips_within_ttl() {
    let cache = MemoryCache::new(Duration::from_secs(60));
    cache.put("key", sample_record(), cache.default_ttl());

    let record = cache.get("key").expect("entry should be live");
    assert_eq!(record.content.title, "Title");
    assert!(cache.get("other").is_none());
}

#[test]
fn memory_cache_expires_lazily() {
    let cache = MemoryCache::new(Duration::from_millis(30));
    cache.put("key", sample_record(), Duration::from_millis(30));

    std::thread::sleep(Duration::from_millis(50));
    assert!(cache.get("key").is_none());
    // The expired entry is not swept, only hidden.
    assert_eq!(cache.len(), 1);
}

#[test]
fn cache_keys_cover_the_full_input() {
    let flags = OptimizationFlags::default();
    let base = ContentRequest::new("ai tips", Platform::TikTok, ContentStyle::Viral);
    let other_topic = ContentRequest::new("ai tips 2", Platform::TikTok, ContentStyle::Viral);
    let other_platform = ContentRequest::new("ai tips", Platform::Twitter, ContentStyle::Viral);

    let key = cache_key("m", &base, &flags);
    assert_ne!(key, cache_key("m", &other_topic, &flags));
    assert_ne!(key, cache_key("m", &other_platform, &flags));
    assert_ne!(key, cache_key("other-model", &base, &flags));

    let mut no_cache = flags;
    no_cache.use_cache = false;
    assert_ne!(key, cache_key("m", &base, &no_cache));
}

#[tokio::test]
async fn second_call_within_ttl_is_a_cache_hit() {
    let engine = offline_engine(7);
    let flags = OptimizationFlags::default();
    let request = ContentRequest::new("AI secret productivity hack", Platform::TikTok, ContentStyle::Viral);

    let first = engine.generate(&request, &flags).await;
    assert!(!first.cost.cache_hit);

    let second = engine.generate(&request, &flags).await;
    assert!(second.cost.cache_hit);
    assert_eq!(second.content, first.content);
}

#[tokio::test]
async fn expired_entries_are_not_hits() {
    let mut config = EngineConfig::default();
    config.cache.ttl_secs = 0;
    let cache = Arc::new(MemoryCache::new(Duration::from_millis(20)));
    let engine = ContentEngine::with_seed(config, cache, None, 7);

    let flags = OptimizationFlags::default();
    let request = ContentRequest::new("coffee brewing", Platform::Instagram, ContentStyle::Educational);

    let _ = engine.generate(&request, &flags).await;
    tokio::time::sleep(Duration::from_millis(40)).await;
    let second = engine.generate(&request, &flags).await;
    assert!(!second.cost.cache_hit);
}

#[tokio::test]
async fn disabling_the_cache_flag_skips_lookups() {
    let engine = offline_engine(3);
    let mut flags = OptimizationFlags::default();
    flags.use_cache = false;
    let request = ContentRequest::new("travel hacks", Platform::Twitter, ContentStyle::Viral);

    let _ = engine.generate(&request, &flags).await;
    let second = engine.generate(&request, &flags).await;
    assert!(!second.cost.cache_hit);
}

#[tokio::test]
async fn provider_failure_degrades_to_template_shape() {
    let config = EngineConfig::default();
    let cache = Arc::new(MemoryCache::new(config.cache.ttl()));
    let engine = ContentEngine::with_seed(config, cache, Some(failing_provider()), 5);

    let flags = OptimizationFlags::default();
    let request = ContentRequest::new("AI secret productivity hack", Platform::TikTok, ContentStyle::Viral);
    let outcome = engine.generate(&request, &flags).await;

    // Same field shape as a successful call, degraded annotations.
    assert_eq!(outcome.cost.source, GenerationSource::Template);
    assert!(!outcome.cost.cache_hit);
    assert!(!outcome.warnings.is_empty());
    assert!(!outcome.content.title.is_empty());
    assert!(!outcome.content.content.is_empty());
    assert!(!outcome.content.hashtags.is_empty());
    assert!(outcome.content.hashtags.len() <= Platform::TikTok.spec().hashtag_count);
    assert!(outcome.cost.confidence < GenerationSource::Provider.confidence());

    // Failure fallbacks are never cached.
    let second = engine.generate(&request, &flags).await;
    assert!(!second.cost.cache_hit);
}

#[tokio::test]
async fn batch_provider_failure_degrades_all_platforms() {
    let config = EngineConfig::default();
    let cache = Arc::new(MemoryCache::new(config.cache.ttl()));
    let engine = ContentEngine::with_seed(config, cache, Some(failing_provider()), 17);

    let flags = OptimizationFlags::default();
    let platforms = [Platform::TikTok, Platform::Twitter, Platform::LinkedIn];
    let outcomes = engine
        .generate_batch("AI secret productivity hack", &platforms, ContentStyle::Viral, &flags)
        .await;

    // One combined call fails; every platform falls back together.
    assert_eq!(outcomes.len(), platforms.len());
    for (outcome, platform) in outcomes.iter().zip(platforms.iter()) {
        assert_eq!(outcome.platform, *platform);
        assert_eq!(outcome.cost.source, GenerationSource::Template);
        assert!(!outcome.cost.cache_hit);
        assert!(!outcome.warnings.is_empty());
        assert!(!outcome.content.content.is_empty());
    }
}

#[tokio::test]
async fn compression_flag_trims_the_body() {
    let engine = offline_engine(21);
    let topic = "a".repeat(2000);
    let request = ContentRequest::new(topic, Platform::TikTok, ContentStyle::Viral);
    let spec = Platform::TikTok.spec();
    let budget = spec.max_length * 3 / 5;

    let mut flags = OptimizationFlags::default();
    flags.use_cache = false;
    let plain = engine.generate(&request, &flags).await;
    assert!(plain.content.content.chars().count() > budget);

    flags.response_compression = true;
    let compressed = engine.generate(&request, &flags).await;
    assert!(compressed.content.content.chars().count() <= budget);
    assert!(compressed.content.content.ends_with("..."));
}

#[tokio::test]
async fn scenario_viral_tiktok_generation() {
    let engine = offline_engine(42);
    let flags = OptimizationFlags::default();
    let request = ContentRequest::new("AI secret productivity hack", Platform::TikTok, ContentStyle::Viral);
    let outcome = engine.generate(&request, &flags).await;

    let spec = Platform::TikTok.spec();
    assert_eq!(outcome.industry, Industry::Tech);
    assert!(outcome.content.viral_potential >= 7.0);
    assert!(outcome.content.content.chars().count() <= spec.max_length);
    assert!(!outcome.content.hashtags.is_empty());
    assert!(outcome.content.hashtags.len() <= spec.hashtag_count);
    assert!(outcome.content.quality_score <= 100);
}

#[tokio::test]
async fn batch_shares_classification_with_single_calls() {
    let engine = offline_engine(9);
    let flags = OptimizationFlags::default();
    let topic = "AI secret productivity hack";
    let platforms = [Platform::TikTok, Platform::Twitter, Platform::LinkedIn];

    let outcomes = engine
        .generate_batch(topic, &platforms, ContentStyle::Viral, &flags)
        .await;

    assert_eq!(outcomes.len(), platforms.len());
    let expected = classify(topic).industry;
    for (outcome, platform) in outcomes.iter().zip(platforms.iter()) {
        assert_eq!(outcome.platform, *platform);
        assert_eq!(outcome.industry, expected);
        assert!(outcome.content.content.chars().count() <= platform.spec().max_length);
    }
}

#[tokio::test]
async fn batch_reuses_cached_platforms() {
    let engine = offline_engine(13);
    let flags = OptimizationFlags::default();
    let topic = "coffee brewing";

    let request = ContentRequest::new(topic, Platform::Instagram, ContentStyle::Educational);
    let single = engine.generate(&request, &flags).await;
    assert!(!single.cost.cache_hit);

    let outcomes = engine
        .generate_batch(
            topic,
            &[Platform::Instagram],
            ContentStyle::Educational,
            &flags,
        )
        .await;
    assert!(outcomes[0].cost.cache_hit);
    assert_eq!(outcomes[0].content, single.content);
}
