use crate::platform::PlatformSpec;
use crate::templates::ContentStyle;
use crate::topic::{Industry, TopicContext};

#[derive(Debug, Clone)]
pub struct Draft {
    pub title: String,
    pub body: String,
}

/// Assemble a template-based draft: hook, industry paragraph, bullets, CTA,
/// in that fixed order, hard-capped at the platform length limit.
pub fn compose(
    topic: &str,
    style: ContentStyle,
    hook: &str,
    structure: &str,
    spec: &PlatformSpec,
    context: &TopicContext,
) -> Draft {
    let title = build_title(topic, style, hook, context.industry);

    let opener = format!("{} {}.", hook, topic);
    let paragraph = industry_paragraph(context.industry, topic);
    let bullets = structure_bullets(structure, topic, &context.keywords);
    let cta = call_to_action(style, spec);

    let body = format!("{}\n\n{}\n\n{}\n\n{}", opener, paragraph, bullets, cta);

    Draft {
        title,
        body: truncate_to(&body, spec.max_length),
    }
}

fn build_title(topic: &str, style: ContentStyle, hook: &str, industry: Industry) -> String {
    match style {
        ContentStyle::Viral => format!("{} {}!", hook, topic),
        ContentStyle::Educational => format!("{}: {}", topic, hook),
        ContentStyle::Promotional => format!("{} {} Today", hook, topic),
        ContentStyle::Storytelling => format!("{} {}", hook, topic),
        ContentStyle::Professional => {
            format!("{} {} in {}", hook, topic, industry.label())
        }
    }
}

fn industry_paragraph(industry: Industry, topic: &str) -> String {
    match industry {
        Industry::Business => format!(
            "Most founders overlook how much {} changes the bottom line. \
             The teams that win treat it as a system, not a one-off experiment.",
            topic
        ),
        Industry::Tech => format!(
            "The tooling around {} is moving fast, and the gap between early \
             adopters and everyone else keeps widening.",
            topic
        ),
        Industry::Fitness => format!(
            "Consistency beats intensity: building {} into a weekly routine \
             is what actually moves results.",
            topic
        ),
        Industry::Food => format!(
            "You don't need restaurant equipment to get {} right at home. \
             A few small technique changes do most of the work.",
            topic
        ),
        Industry::Travel => format!(
            "Planning {} doesn't have to drain your budget. Locals do it \
             differently, and that's where the good stories are.",
            topic
        ),
        Industry::Fashion => format!(
            "Trends fade, but knowing how {} fits your own style keeps the \
             look working season after season.",
            topic
        ),
        Industry::Lifestyle => format!(
            "Small daily habits around {} compound faster than most people \
             expect.",
            topic
        ),
    }
}

fn structure_bullets(structure: &str, topic: &str, keywords: &[String]) -> String {
    let focus = keywords
        .first()
        .map(String::as_str)
        .unwrap_or(topic)
        .to_string();
    let lines: [String; 3] = match structure {
        "countdown-list" | "checklist" | "step-by-step" => [
            format!("1. Start with the basics of {}", focus),
            "2. Apply one change this week".to_string(),
            "3. Track what actually moves the needle".to_string(),
        ],
        "myth-vs-fact" => [
            format!("Myth: {} is only for experts", focus),
            "Fact: the fundamentals take a weekend to learn".to_string(),
            "Fact: most advice online skips the boring part that works".to_string(),
        ],
        "problem-solution" | "urgency-offer" | "feature-benefit" | "social-proof" => [
            format!("The problem: {} feels overwhelming", focus),
            "The fix: one focused change at a time".to_string(),
            "The payoff: results you can measure".to_string(),
        ],
        "hero-journey" | "diary-entry" | "turning-point" => [
            "Where it started: total beginner".to_string(),
            format!("The turning point: taking {} seriously", focus),
            "Where it ends: you decide".to_string(),
        ],
        _ => [
            format!("What {} really takes", focus),
            "The mistake almost everyone makes".to_string(),
            "The one change worth trying today".to_string(),
        ],
    };
    lines.map(|line| format!("- {}", line)).join("\n")
}

fn call_to_action(style: ContentStyle, spec: &PlatformSpec) -> String {
    match style {
        ContentStyle::Promotional => "Tap the link before this one's gone.".to_string(),
        ContentStyle::Professional => "What's been your experience? Comment below.".to_string(),
        _ => format!(
            "Follow for more and share this {} with someone who needs it!",
            spec.format
        ),
    }
}

/// Hard post-condition: output never exceeds `max_chars` characters.
/// Overlong text is cut to `max_chars - 3` and suffixed with "...".
pub fn truncate_to(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    if max_chars <= 3 {
        return text.chars().take(max_chars).collect();
    }
    let mut truncated: String = text.chars().take(max_chars - 3).collect();
    truncated.push_str("...");
    truncated
}
