//! Error types for the `workinfo` crate.

use std::collections::BTreeMap;

/// All errors that can occur in card, store, and preference operations.
///
/// The tracking-script sanitizer never returns this type: its failures are
/// absorbed into `None` / invalid results (see [`ScriptRejection`](crate::ScriptRejection)).
#[derive(Debug, thiserror::Error)]
pub enum WorkinfoError {
    /// The record store backend failed.
    #[error("Record store failed: {0}")]
    Store(Box<dyn std::error::Error + Send + Sync>),

    /// The requested record does not exist.
    #[error("Record not found: {0}")]
    NotFound(String),

    /// Card data failed validation. Keys are field names.
    #[error("Invalid card: {}", join_fields(.0))]
    InvalidCard(BTreeMap<&'static str, String>),

    /// Sign-up data failed validation.
    #[error("Invalid registration: {0}")]
    InvalidRegistration(String),

    /// The preference backend could not read or write a value.
    #[error("Preferences error: {0}")]
    Preferences(Box<dyn std::error::Error + Send + Sync>),

    /// A brand color is not a hex color.
    #[error("Invalid color: {0}")]
    InvalidColor(String),

    /// The configuration is invalid.
    #[error("Config error: {0}")]
    Config(String),
}

fn join_fields(errors: &BTreeMap<&'static str, String>) -> String {
    errors
        .iter()
        .map(|(field, msg)| format!("{field}: {msg}"))
        .collect::<Vec<_>>()
        .join(", ")
}

/// A type alias for `Result<T, WorkinfoError>`.
pub type Result<T> = std::result::Result<T, WorkinfoError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_card_lists_fields() {
        let mut errors = BTreeMap::new();
        errors.insert("email", "Invalid email format".to_string());
        errors.insert("company", "Company is required".to_string());
        let err = WorkinfoError::InvalidCard(errors);
        assert_eq!(
            err.to_string(),
            "Invalid card: company: Company is required, email: Invalid email format"
        );
    }
}
