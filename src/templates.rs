use rand::{rngs::StdRng, Rng};
use std::collections::HashSet;

use crate::platform::Platform;
use crate::topic::Industry;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContentStyle {
    Viral,
    Educational,
    Promotional,
    Storytelling,
    Professional,
}

impl ContentStyle {
    pub fn from_str(value: &str) -> Option<Self> {
        match value.to_lowercase().as_str() {
            "viral" => Some(ContentStyle::Viral),
            "educational" | "howto" => Some(ContentStyle::Educational),
            "promotional" | "promo" => Some(ContentStyle::Promotional),
            "storytelling" | "story" => Some(ContentStyle::Storytelling),
            "professional" => Some(ContentStyle::Professional),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ContentStyle::Viral => "viral",
            ContentStyle::Educational => "educational",
            ContentStyle::Promotional => "promotional",
            ContentStyle::Storytelling => "storytelling",
            ContentStyle::Professional => "professional",
        }
    }
}

const VIRAL_HOOKS: &[&str] = &[
    "The Untold Secret Behind",
    "Stop Scrolling:",
    "Nobody Talks About",
    "The Shocking Truth About",
    "Why Everyone Is Wrong About",
];

const EDUCATIONAL_HOOKS: &[&str] = &[
    "A Beginner's Guide to",
    "5 Things to Know About",
    "The Complete Breakdown of",
    "What I Learned About",
    "Understanding",
];

const PROMOTIONAL_HOOKS: &[&str] = &[
    "Don't Miss Out On",
    "The Smartest Way to Get",
    "Your Shortcut to",
    "Level Up With",
];

const STORYTELLING_HOOKS: &[&str] = &[
    "The Day I Discovered",
    "It Started With",
    "What Happened After",
    "The Moment Everything Changed With",
];

const PROFESSIONAL_HOOKS: &[&str] = &[
    "Key Insights On",
    "A Practical Look At",
    "Lessons From",
    "The Data Behind",
];

const VIRAL_STRUCTURES: &[&str] = &[
    "hook-story-payoff",
    "countdown-list",
    "myth-vs-fact",
    "before-after",
];

const EDUCATIONAL_STRUCTURES: &[&str] = &["step-by-step", "faq", "deep-dive", "checklist"];

const PROMOTIONAL_STRUCTURES: &[&str] = &[
    "problem-solution",
    "social-proof",
    "feature-benefit",
    "urgency-offer",
];

const STORYTELLING_STRUCTURES: &[&str] = &["hero-journey", "diary-entry", "turning-point"];

const PROFESSIONAL_STRUCTURES: &[&str] = &["thesis-evidence", "trend-analysis", "case-study"];

pub fn hooks_for(style: ContentStyle) -> &'static [&'static str] {
    match style {
        ContentStyle::Viral => VIRAL_HOOKS,
        ContentStyle::Educational => EDUCATIONAL_HOOKS,
        ContentStyle::Promotional => PROMOTIONAL_HOOKS,
        ContentStyle::Storytelling => STORYTELLING_HOOKS,
        ContentStyle::Professional => PROFESSIONAL_HOOKS,
    }
}

pub fn structures_for(style: ContentStyle) -> &'static [&'static str] {
    match style {
        ContentStyle::Viral => VIRAL_STRUCTURES,
        ContentStyle::Educational => EDUCATIONAL_STRUCTURES,
        ContentStyle::Promotional => PROMOTIONAL_STRUCTURES,
        ContentStyle::Storytelling => STORYTELLING_STRUCTURES,
        ContentStyle::Professional => PROFESSIONAL_STRUCTURES,
    }
}

/// Uniform pick from a non-empty template array.
pub fn pick(rng: &mut StdRng, items: &'static [&'static str]) -> &'static str {
    items[rng.gen_range(0..items.len())]
}

fn industry_tags(industry: Industry) -> &'static [&'static str] {
    match industry {
        Industry::Business => &[
            "#business",
            "#entrepreneur",
            "#success",
            "#marketing",
            "#growth",
        ],
        Industry::Tech => &["#tech", "#ai", "#innovation", "#coding", "#future"],
        Industry::Fitness => &[
            "#fitness",
            "#health",
            "#workout",
            "#wellness",
            "#motivation",
        ],
        Industry::Food => &["#food", "#foodie", "#recipe", "#cooking", "#homemade"],
        Industry::Travel => &[
            "#travel",
            "#wanderlust",
            "#adventure",
            "#explore",
            "#vacation",
        ],
        Industry::Fashion => &["#fashion", "#style", "#ootd", "#beauty", "#trending"],
        Industry::Lifestyle => &[
            "#lifestyle",
            "#daily",
            "#inspiration",
            "#selfcare",
            "#goodvibes",
        ],
    }
}

fn platform_tags(platform: Platform) -> &'static [&'static str] {
    match platform {
        Platform::TikTok => &["#fyp", "#foryou"],
        Platform::Instagram => &["#instagood", "#reels"],
        Platform::Twitter => &["#nowtrending"],
        Platform::LinkedIn => &["#career"],
        Platform::YouTube => &["#shorts"],
        Platform::Facebook => &["#community"],
    }
}

/// Ordered, deduplicated hashtag set capped at the platform's hashtag budget.
pub fn hashtags_for(industry: Industry, platform: Platform) -> Vec<String> {
    let budget = platform.spec().hashtag_count.max(1);
    let mut seen = HashSet::new();
    let mut tags = Vec::new();
    for tag in industry_tags(industry)
        .iter()
        .chain(platform_tags(platform))
    {
        let normalized = tag.to_lowercase();
        if seen.insert(normalized) {
            tags.push((*tag).to_string());
        }
        if tags.len() == budget {
            break;
        }
    }
    tags
}

/// Dedup provider-supplied hashtags preserving order; normalizes the leading '#'.
pub fn dedup_hashtags(raw: &[String], budget: usize) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut tags = Vec::new();
    for tag in raw {
        let trimmed = tag.trim().trim_start_matches('#');
        if trimmed.is_empty() {
            continue;
        }
        let normalized = trimmed.to_lowercase();
        if seen.insert(normalized.clone()) {
            tags.push(format!("#{}", normalized));
        }
        if tags.len() == budget.max(1) {
            break;
        }
    }
    tags
}
