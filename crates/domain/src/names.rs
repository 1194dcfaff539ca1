//! Name rules for powers and power groups.

use crate::error::DomainError;
use crate::power_token::NOT_TOKEN;

/// Validate a power, alias or power group name.
///
/// Names must be present, longer than one character and free of spaces.
/// A `:` or a leading `!` would read back as part of a `Power:Tier` token,
/// so neither is allowed.
pub fn validate_name(name: &str, field_name: &'static str) -> Result<(), DomainError> {
    if name.is_empty() {
        return Err(DomainError::validation(format!("{} cannot be empty", field_name)));
    }
    if name.chars().count() == 1 {
        return Err(DomainError::validation(format!(
            "{} must be longer than one character",
            field_name
        )));
    }
    if name.chars().any(char::is_whitespace) {
        return Err(DomainError::validation(format!(
            "{} may not contain spaces",
            field_name
        )));
    }
    if name.contains(':') {
        return Err(DomainError::validation(format!("{} may not contain ':'", field_name)));
    }
    if name.starts_with(NOT_TOKEN) {
        return Err(DomainError::validation(format!(
            "{} may not start with '{}'",
            field_name, NOT_TOKEN
        )));
    }
    Ok(())
}
