//! Phone number handling.
//!
//! Phones are the identity key for accounts, stored in E.164 form
//! (`+` followed by 8–15 digits, no leading zero in the country code).

/// Normalize user input to E.164: trims whitespace and strips the common
/// separators (space, `-`, `.`, `(`, `)`). Returns `None` when the result is
/// not a valid E.164 number.
pub fn normalize_phone(input: &str) -> Option<String> {
    let trimmed = input.trim();
    let digits = trimmed.strip_prefix('+')?;
    let cleaned: String = digits
        .chars()
        .filter(|c| !matches!(c, ' ' | '-' | '.' | '(' | ')'))
        .collect();
    if !(8..=15).contains(&cleaned.len()) {
        return None;
    }
    if !cleaned.chars().all(|c| c.is_ascii_digit()) || cleaned.starts_with('0') {
        return None;
    }
    Some(format!("+{cleaned}"))
}

/// Mask all but the last four digits, for log lines.
pub fn mask_phone(phone: &str) -> String {
    let len = phone.chars().count();
    if len <= 4 {
        return "*".repeat(len);
    }
    let visible: String = phone.chars().skip(len - 4).collect();
    format!("{}{}", "*".repeat(len - 4), visible)
}
