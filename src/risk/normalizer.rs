use std::num::IntErrorKind;

use crate::input::{fields, RawLead, RawValue};
use crate::models::{ContactShared, LeadRecord, ScheduledBy};

/// Tokens read as an affirmative answer (compared lower-cased).
pub const TRUE_TOKENS: [&str; 4] = ["yes", "y", "1", "true"];
/// Tokens read as a negative answer (compared lower-cased).
pub const FALSE_TOKENS: [&str; 4] = ["no", "n", "0", "false"];
/// Sentinels meaning "not supplied".
pub const NA_TOKENS: [&str; 2] = ["n/a", "na"];

/// Build a [`LeadRecord`] from a raw row. Never fails: anything missing or
/// unrecognized takes the unfavorable default described on each helper.
pub fn normalize(raw: &RawLead) -> LeadRecord {
    LeadRecord {
        missed_demos: parse_count(raw.get(fields::MISSED_DEMOS)),
        last_interaction_days: parse_days(raw.get(fields::LAST_INTERACTION_DAYS)),
        contact_shared: parse_contact_shared(raw.get(fields::CONTACT_SHARED)),
        link_clicked: parse_flag(raw.get(fields::LINK_CLICKED)),
        scheduled_by: parse_scheduled_by(raw.get(fields::SCHEDULED_BY)),
        showed_up_for_demo: parse_flag(raw.get(fields::SHOWED_UP_FOR_DEMO)),
    }
}

/// Non-negative integer count; `0` when absent or unparseable.
///
/// Negative values clamp to `0`. Real numbers truncate toward zero.
/// Integers too large to represent saturate at `u32::MAX`.
pub fn parse_count(value: Option<&RawValue>) -> u32 {
    let parsed = match value {
        Some(RawValue::Number(n)) if n.is_finite() => Some(n.trunc() as i64),
        Some(RawValue::Bool(b)) => Some(i64::from(*b)),
        Some(other) => other.as_text().and_then(|s| parse_integer(&s)),
        None => None,
    };
    parsed.map_or(0, clamp_to_u32)
}

/// Integer text, saturating on overflow. `None` only for non-integers.
fn parse_integer(text: &str) -> Option<i64> {
    match text.parse::<i64>() {
        Ok(n) => Some(n),
        Err(e) => match e.kind() {
            IntErrorKind::PosOverflow => Some(i64::MAX),
            IntErrorKind::NegOverflow => Some(i64::MIN),
            _ => None,
        },
    }
}

/// Days since last interaction; `N/A`, blank and unparseable all mean a
/// fresh lead (`0`).
pub fn parse_days(value: Option<&RawValue>) -> u32 {
    match value.and_then(RawValue::as_text) {
        Some(text) if text.eq_ignore_ascii_case("n/a") => 0,
        _ => parse_count(value),
    }
}

pub fn parse_contact_shared(value: Option<&RawValue>) -> ContactShared {
    let Some(token) = token(value) else {
        return ContactShared::Unknown;
    };
    if NA_TOKENS.contains(&token.as_str()) {
        ContactShared::Unknown
    } else if TRUE_TOKENS.contains(&token.as_str()) {
        ContactShared::Yes
    } else if FALSE_TOKENS.contains(&token.as_str()) {
        ContactShared::No
    } else {
        ContactShared::Unknown
    }
}

/// Boolean answer; only an affirmative token yields `true`.
pub fn parse_flag(value: Option<&RawValue>) -> bool {
    token(value).is_some_and(|t| TRUE_TOKENS.contains(&t.as_str()))
}

pub fn parse_scheduled_by(value: Option<&RawValue>) -> ScheduledBy {
    match token(value).as_deref() {
        Some("agent") => ScheduledBy::Agent,
        Some("self") => ScheduledBy::SelfBooked,
        _ => ScheduledBy::Other,
    }
}

/// Lower-cased, trimmed, non-empty text of a cell.
fn token(value: Option<&RawValue>) -> Option<String> {
    value
        .and_then(RawValue::as_text)
        .map(|s| s.to_lowercase())
        .filter(|s| !s.is_empty())
}

fn clamp_to_u32(n: i64) -> u32 {
    u32::try_from(n.max(0)).unwrap_or(u32::MAX)
}
