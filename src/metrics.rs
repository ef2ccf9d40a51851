use rand::{rngs::StdRng, Rng};

use crate::platform::Platform;
use crate::synthesis::Draft;
use crate::topic::{Sentiment, TopicContext};

#[derive(Debug, Clone)]
pub struct EngagementEstimate {
    pub estimated_views: u64,
    pub quality_score: u8,
    pub viral_potential: f64,
}

/// Heuristic engagement scoring. Quality and viral potential are
/// deterministic for a given draft; estimated views carry uniform
/// +/-30% jitter from the injected RNG and are intentionally not
/// reproducible across calls unless the RNG is seeded.
pub fn score(
    draft: &Draft,
    hashtags: &[String],
    platform: Platform,
    context: &TopicContext,
    rng: &mut StdRng,
) -> EngagementEstimate {
    let spec = platform.spec();
    let quality = quality_score(draft, hashtags, spec.hashtag_count);
    let viral = viral_potential(draft, context);

    let jitter = 1.0 + rng.gen_range(-0.3..0.3);
    let views = spec.base_views * (1.0 + viral / 10.0) * spec.reach_multiplier * jitter;

    EngagementEstimate {
        estimated_views: views.max(0.0).round() as u64,
        quality_score: quality,
        viral_potential: viral,
    }
}

fn quality_score(draft: &Draft, hashtags: &[String], hashtag_budget: usize) -> u8 {
    let mut score: i32 = 50;

    if draft.body.contains('?') {
        score += 10;
    }
    if draft.title.chars().count() <= 60 {
        score += 8;
    }
    if !hashtags.is_empty() && hashtags.len() <= hashtag_budget {
        score += 6;
    }
    if has_emoji(&draft.body) {
        score += 10;
    }
    if has_cta(&draft.body) {
        score += 8;
    }
    if draft.body.contains('\n') {
        score += 6;
    }

    score.clamp(0, 100) as u8
}

fn viral_potential(draft: &Draft, context: &TopicContext) -> f64 {
    let mut potential = context.viral_potential;
    if draft.title.contains('!') {
        potential += 1.0;
    }
    if draft.body.contains('?') {
        potential += 0.5;
    }
    if context.sentiment != Sentiment::Neutral {
        potential += 0.5;
    }
    potential.clamp(0.0, 10.0)
}

fn has_emoji(text: &str) -> bool {
    text.chars().any(|ch| ch as u32 > 0x7f)
}

fn has_cta(text: &str) -> bool {
    let lowered = text.to_lowercase();
    ["follow", "share", "comment", "link"]
        .iter()
        .any(|word| lowered.contains(word))
}
