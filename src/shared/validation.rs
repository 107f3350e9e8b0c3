use lazy_static::lazy_static;
use regex::Regex;
use validator::{ValidationError, ValidationErrors};

lazy_static! {
    /// Regex for validating phone numbers
    /// Digits with optional leading "+", spaces, dots, dashes and parentheses
    /// - Valid: "+1 (555) 123-4567", "555.123.4567", "0812345678"
    /// - Invalid: "call me", "12", "+1-555-CALL-NOW"
    pub static ref PHONE_REGEX: Regex = Regex::new(r"^\+?[0-9][0-9 ().\-]{5,19}$").unwrap();
}

/// Reject values that are empty once surrounding whitespace is removed
pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}

/// Flatten validator errors into "field: message" lines, sorted by field
pub fn validation_messages(errors: &ValidationErrors) -> Vec<String> {
    let mut messages: Vec<String> = errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| {
                let message = e
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| e.code.to_string());
                format!("{}: {}", field, message)
            })
        })
        .collect();
    messages.sort();
    messages
}
