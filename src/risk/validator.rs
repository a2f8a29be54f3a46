use crate::input::{fields, RawLead, RawValue};
use crate::risk::normalizer::{FALSE_TOKENS, NA_TOKENS, TRUE_TOKENS};

/// Fields a row needs for a meaningful assessment.
pub const REQUIRED_FIELDS: [&str; 7] = [
    fields::LEAD_NAME,
    fields::MISSED_DEMOS,
    fields::LAST_INTERACTION_DAYS,
    fields::CONTACT_SHARED,
    fields::LINK_CLICKED,
    fields::SCHEDULED_BY,
    fields::SHOWED_UP_FOR_DEMO,
];

/// Check a raw row for completeness and recognizable tokens.
///
/// Advisory only: the row is classified whatever this returns. Returns
/// `(is_valid, errors)` with one human-readable reason per violation.
pub fn validate(raw: &RawLead) -> (bool, Vec<String>) {
    let mut errors = Vec::new();

    for field in REQUIRED_FIELDS {
        if raw.get(field).map_or(true, RawValue::is_blank) {
            errors.push(format!("Missing or empty field: {field}"));
        }
    }

    if let Some(value) = raw.get(fields::MISSED_DEMOS).filter(|v| !v.is_blank()) {
        if !is_integer(value) {
            errors.push("Missed Demos must be a number".to_string());
        }
    }

    if let Some(value) = raw.get(fields::LAST_INTERACTION_DAYS).filter(|v| !v.is_blank()) {
        let is_na = value
            .as_text()
            .is_some_and(|s| s.eq_ignore_ascii_case("n/a"));
        if !is_na && !is_integer(value) {
            errors.push("Last Interaction Days must be a number or N/A".to_string());
        }
    }

    for field in [fields::LINK_CLICKED, fields::SHOWED_UP_FOR_DEMO] {
        if !is_boolean_token(&token(raw, field)) {
            errors.push(format!(
                "{field} must be Yes/No (found: '{}')",
                shown(raw, field)
            ));
        }
    }

    let contact = token(raw, fields::CONTACT_SHARED);
    if !is_boolean_token(&contact) && !NA_TOKENS.contains(&contact.as_str()) {
        errors.push(format!(
            "Contact Shared must be Yes/No/N/A (found: '{}')",
            shown(raw, fields::CONTACT_SHARED)
        ));
    }

    let scheduled_by = token(raw, fields::SCHEDULED_BY);
    if scheduled_by != "agent" && scheduled_by != "self" {
        errors.push(format!(
            "Scheduled By must be 'Agent' or 'Self' (found: '{}')",
            shown(raw, fields::SCHEDULED_BY)
        ));
    }

    (errors.is_empty(), errors)
}

fn is_integer(value: &RawValue) -> bool {
    match value {
        RawValue::Number(n) => n.is_finite(),
        RawValue::Bool(_) => true,
        other => other
            .as_text()
            .is_some_and(|s| s.parse::<i64>().is_ok()),
    }
}

fn is_boolean_token(token: &str) -> bool {
    TRUE_TOKENS.contains(&token) || FALSE_TOKENS.contains(&token)
}

fn token(raw: &RawLead, field: &str) -> String {
    raw.get(field)
        .and_then(RawValue::as_text)
        .unwrap_or_default()
        .to_lowercase()
}

fn shown(raw: &RawLead, field: &str) -> String {
    raw.get(field).map(ToString::to_string).unwrap_or_default()
}
