use crate::input::RawValue;

/// Digits-only contact number with leading zeros stripped.
///
/// Returns `None` when no digits remain; the lead is then reported as
/// `Invalid Phone` but still classified.
pub fn normalize_phone(raw: Option<&RawValue>) -> Option<String> {
    raw.and_then(RawValue::as_text)
        .and_then(|text| clean_digits(&text))
}

/// Keep ASCII digits of `text` and strip leading zeros.
pub fn clean_digits(text: &str) -> Option<String> {
    let digits: String = text.chars().filter(char::is_ascii_digit).collect();
    let trimmed = digits.trim_start_matches('0');
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Prefix `country_code` to bare 10-digit national numbers.
pub fn with_country_code(phone: &str, country_code: &str) -> String {
    if phone.len() == 10 && !country_code.is_empty() {
        format!("{country_code}{phone}")
    } else {
        phone.to_string()
    }
}
