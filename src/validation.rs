//! Field validation shared by every collection

use crate::error::StoreError;

/// Trim a required text field; empty or absent fails with `message`
pub fn required(value: Option<&str>, message: &str) -> Result<String, StoreError> {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v.to_string()),
        _ => Err(StoreError::validation(message)),
    }
}

/// Trim an optional text field, dropping it when blank
pub fn optional(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Loose address shape check: something@something.tld
pub fn is_valid_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || email.chars().any(char::is_whitespace) {
        return false;
    }
    match domain.rfind('.') {
        Some(dot) => dot > 0 && dot + 1 < domain.len(),
        None => false,
    }
}

/// Trim, lower-case and validate an email address
pub fn normalize_email(
    value: Option<&str>,
    missing: &str,
    malformed: &str,
) -> Result<String, StoreError> {
    let email = required(value, missing)?.to_lowercase();
    if !is_valid_email(&email) {
        return Err(StoreError::validation(malformed));
    }
    Ok(email)
}
