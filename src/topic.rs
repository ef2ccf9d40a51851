#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Industry {
    Business,
    Tech,
    Fitness,
    Food,
    Travel,
    Fashion,
    Lifestyle,
}

impl Industry {
    pub fn label(self) -> &'static str {
        match self {
            Industry::Business => "business",
            Industry::Tech => "tech",
            Industry::Fitness => "fitness",
            Industry::Food => "food",
            Industry::Travel => "travel",
            Industry::Fashion => "fashion",
            Industry::Lifestyle => "lifestyle",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sentiment {
    Positive,
    Neutral,
    Negative,
}

impl Sentiment {
    pub fn label(self) -> &'static str {
        match self {
            Sentiment::Positive => "positive",
            Sentiment::Neutral => "neutral",
            Sentiment::Negative => "negative",
        }
    }
}

#[derive(Debug, Clone)]
pub struct TopicContext {
    pub industry: Industry,
    pub keywords: Vec<String>,
    pub sentiment: Sentiment,
    pub complexity: u8,
    pub viral_potential: f64,
}

/// Declaration order is the tie-break: the first category with a keyword
/// match wins, so a topic spanning business and tech classifies as business.
const CATEGORY_KEYWORDS: [(Industry, &[&str]); 6] = [
    (
        Industry::Business,
        &[
            "business",
            "startup",
            "entrepreneur",
            "marketing",
            "sales",
            "money",
            "growth",
            "revenue",
        ],
    ),
    (
        Industry::Tech,
        &[
            "tech", "ai", "software", "coding", "app", "gadget", "crypto", "data", "robot",
        ],
    ),
    (
        Industry::Fitness,
        &[
            "fitness", "workout", "gym", "health", "diet", "yoga", "running", "muscle",
        ],
    ),
    (
        Industry::Food,
        &[
            "food",
            "recipe",
            "cooking",
            "meal",
            "restaurant",
            "baking",
            "coffee",
            "snack",
        ],
    ),
    (
        Industry::Travel,
        &[
            "travel",
            "trip",
            "vacation",
            "destination",
            "flight",
            "adventure",
            "hotel",
            "backpacking",
        ],
    ),
    (
        Industry::Fashion,
        &[
            "fashion", "style", "outfit", "beauty", "makeup", "skincare", "trend", "wardrobe",
        ],
    ),
];

/// Pinned power-word list driving the viral-potential heuristic.
pub const POWER_WORDS: &[&str] = &[
    "secret", "shocking", "truth", "exposed", "hack", "instant", "proven", "ultimate", "insane",
    "viral", "mistake", "warning",
];

const POSITIVE_WORDS: &[&str] = &["best", "amazing", "love", "win", "easy", "perfect", "boost"];
const NEGATIVE_WORDS: &[&str] = &["worst", "avoid", "fail", "scam", "never", "broken", "quit"];

pub fn classify(topic: &str) -> TopicContext {
    let lowered = topic.to_lowercase();

    let industry = CATEGORY_KEYWORDS
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|keyword| lowered.contains(keyword)))
        .map(|(industry, _)| *industry)
        .unwrap_or(Industry::Lifestyle);

    let mut keywords = Vec::new();
    for word in lowered.split_whitespace() {
        let cleaned: String = word.chars().filter(|c| c.is_alphanumeric()).collect();
        if cleaned.len() > 3 && !keywords.contains(&cleaned) {
            keywords.push(cleaned);
        }
        if keywords.len() == 5 {
            break;
        }
    }

    TopicContext {
        industry,
        sentiment: estimate_sentiment(&lowered),
        complexity: estimate_complexity(&lowered),
        viral_potential: viral_potential(&lowered),
        keywords,
    }
}

/// 3 base points plus 2 per distinct power word, clamped to [0, 10].
fn viral_potential(lowered: &str) -> f64 {
    let matches = POWER_WORDS
        .iter()
        .filter(|word| lowered.contains(*word))
        .count();
    ((3 + 2 * matches) as f64).clamp(0.0, 10.0)
}

fn estimate_sentiment(lowered: &str) -> Sentiment {
    let positive = POSITIVE_WORDS
        .iter()
        .filter(|word| lowered.contains(*word))
        .count();
    let negative = NEGATIVE_WORDS
        .iter()
        .filter(|word| lowered.contains(*word))
        .count();
    if positive > negative {
        Sentiment::Positive
    } else if negative > positive {
        Sentiment::Negative
    } else {
        Sentiment::Neutral
    }
}

fn estimate_complexity(lowered: &str) -> u8 {
    let mut word_total = 0usize;
    let mut word_count = 0usize;
    for word in lowered.split_whitespace() {
        let len = word.chars().filter(|c| c.is_alphanumeric()).count();
        if len > 0 {
            word_total += len;
            word_count += 1;
        }
    }
    if word_count == 0 {
        return 1;
    }
    let avg_len = word_total as f64 / word_count as f64;
    let long_word_bonus = if avg_len > 6.0 { 2 } else { 0 };
    (word_count / 3 + 1 + long_word_bonus).clamp(1, 10) as u8
}
