use rand::seq::SliceRandom;
use rand::Rng;

use crate::models::RiskCategory;

/// Placeholder substituted with the lead's name.
pub const NAME_PLACEHOLDER: &str = "[Lead Name]";

/// The canonical outreach text for a category, with [`NAME_PLACEHOLDER`].
pub fn canonical_template(category: RiskCategory) -> &'static str {
    match category {
        RiskCategory::High => "Hi [Lead Name], your demo is scheduled but we missed you last time. Can we quickly reconnect today or tomorrow?",
        RiskCategory::Medium => "Hi [Lead Name], just checking in. Shall we go ahead with the demo this week?",
        RiskCategory::Low => "Hey [Lead Name], just a friendly nudge to confirm our upcoming demo. Excited to connect!",
    }
}

/// All canonical templates in report order.
pub fn canonical_templates() -> Vec<(RiskCategory, &'static str)> {
    RiskCategory::ALL
        .iter()
        .map(|&c| (c, canonical_template(c)))
        .collect()
}

/// Canonical message for `name`.
pub fn render(category: RiskCategory, name: &str) -> String {
    canonical_template(category).replace(NAME_PLACEHOLDER, display_name(name))
}

const GREETINGS: [&str; 5] = ["Hi", "Hello", "Hey", "Good day", "Greetings"];

fn time_phrases(category: RiskCategory) -> &'static [&'static str] {
    match category {
        RiskCategory::High => &["today", "tomorrow", "this week", "soon", "when you're free"],
        RiskCategory::Medium => &["this week", "soon", "in the coming days", "when convenient"],
        RiskCategory::Low => &["soon", "as scheduled", "as planned", "for our session"],
    }
}

fn variants(category: RiskCategory) -> &'static [&'static str] {
    match category {
        RiskCategory::High => &[
            "{greeting} {name}, we noticed you missed our demo. Can we reschedule {time}?",
            "{greeting} {name}, missed you at the demo. Can we set up a quick call {time}?",
            "{greeting} {name}, following up on your demo. Would {time} work better?",
            "{greeting} {name}, quick follow-up on the demo we missed. Can we try again {time}?",
        ],
        RiskCategory::Medium => &[
            "{greeting} {name}, just checking in. How are things progressing on your end?",
            "{greeting} {name}, wanted to touch base about our upcoming demo. Still good for {time}?",
            "{greeting} {name}, circling back on our demo discussion. Shall we proceed {time}?",
            "{greeting} {name}, hope all is well. Ready to schedule our demo {time}?",
        ],
        RiskCategory::Low => &[
            "{greeting} {name}, just a friendly nudge to confirm our upcoming demo. Excited to connect!",
            "{greeting} {name}, looking forward to our demo session. See you {time}!",
            "{greeting} {name}, just confirming our demo time. This is going to be great!",
            "{greeting} {name}, looking forward to connecting with you {time}. Ready?",
        ],
    }
}

/// Randomized wording for `name`: greeting, sentence and time phrase are
/// each drawn from `rng`.
pub fn render_varied<R: Rng + ?Sized>(category: RiskCategory, name: &str, rng: &mut R) -> String {
    let greeting = GREETINGS.choose(rng).copied().unwrap_or("Hi");
    let time = time_phrases(category).choose(rng).copied().unwrap_or("soon");
    let Some(template) = variants(category).choose(rng) else {
        return render(category, name);
    };

    template
        .replace("{greeting}", greeting)
        .replace("{name}", display_name(name))
        .replace("{time}", time)
}

fn display_name(name: &str) -> &str {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        "there"
    } else {
        trimmed
    }
}
