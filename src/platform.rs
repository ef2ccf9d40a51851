#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Platform {
    TikTok,
    Instagram,
    Twitter,
    LinkedIn,
    YouTube,
    Facebook,
}

impl Platform {
    pub fn from_str(value: &str) -> Option<Self> {
        match value.to_lowercase().as_str() {
            "tiktok" => Some(Platform::TikTok),
            "instagram" | "ig" => Some(Platform::Instagram),
            "twitter" | "x" => Some(Platform::Twitter),
            "linkedin" => Some(Platform::LinkedIn),
            "youtube" | "yt" => Some(Platform::YouTube),
            "facebook" | "fb" => Some(Platform::Facebook),
            _ => None,
        }
    }

    /// Stable lowercase key used in cache keys and batch response maps.
    pub fn key(self) -> &'static str {
        match self {
            Platform::TikTok => "tiktok",
            Platform::Instagram => "instagram",
            Platform::Twitter => "twitter",
            Platform::LinkedIn => "linkedin",
            Platform::YouTube => "youtube",
            Platform::Facebook => "facebook",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Platform::TikTok => "TikTok",
            Platform::Instagram => "Instagram",
            Platform::Twitter => "Twitter",
            Platform::LinkedIn => "LinkedIn",
            Platform::YouTube => "YouTube",
            Platform::Facebook => "Facebook",
        }
    }

    pub fn all() -> &'static [Platform] {
        &[
            Platform::TikTok,
            Platform::Instagram,
            Platform::Twitter,
            Platform::LinkedIn,
            Platform::YouTube,
            Platform::Facebook,
        ]
    }

    pub fn spec(self) -> &'static PlatformSpec {
        match self {
            Platform::TikTok => &TIKTOK,
            Platform::Instagram => &INSTAGRAM,
            Platform::Twitter => &TWITTER,
            Platform::LinkedIn => &LINKEDIN,
            Platform::YouTube => &YOUTUBE,
            Platform::Facebook => &FACEBOOK,
        }
    }
}

/// Static per-platform publishing constraints and reach constants.
#[derive(Debug, Clone)]
pub struct PlatformSpec {
    pub max_length: usize,
    pub hashtag_count: usize,
    pub tone: &'static str,
    pub format: &'static str,
    pub base_views: f64,
    pub reach_multiplier: f64,
}

static TIKTOK: PlatformSpec = PlatformSpec {
    max_length: 2200,
    hashtag_count: 5,
    tone: "energetic",
    format: "short-video caption",
    base_views: 12_000.0,
    reach_multiplier: 1.8,
};

static INSTAGRAM: PlatformSpec = PlatformSpec {
    max_length: 2200,
    hashtag_count: 8,
    tone: "aspirational",
    format: "caption",
    base_views: 8_000.0,
    reach_multiplier: 1.2,
};

static TWITTER: PlatformSpec = PlatformSpec {
    max_length: 280,
    hashtag_count: 3,
    tone: "punchy",
    format: "post",
    base_views: 5_000.0,
    reach_multiplier: 1.5,
};

static LINKEDIN: PlatformSpec = PlatformSpec {
    max_length: 3000,
    hashtag_count: 3,
    tone: "professional",
    format: "article teaser",
    base_views: 3_000.0,
    reach_multiplier: 0.9,
};

static YOUTUBE: PlatformSpec = PlatformSpec {
    max_length: 5000,
    hashtag_count: 5,
    tone: "descriptive",
    format: "video description",
    base_views: 10_000.0,
    reach_multiplier: 1.4,
};

static FACEBOOK: PlatformSpec = PlatformSpec {
    max_length: 2000,
    hashtag_count: 4,
    tone: "conversational",
    format: "post",
    base_views: 4_000.0,
    reach_multiplier: 1.0,
};
