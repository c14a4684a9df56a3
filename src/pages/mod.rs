//! Page Views
//!
//! Per-feature operations behind each screen. Records are passed through as
//! untyped JSON objects; the backend owns their shape.

pub mod budget;
pub mod dashboard;
pub mod layout;
pub mod reports;
pub mod savings;
pub mod transactions;

use crate::api::ApiError;
use crate::forms::FormError;

/// A backend record as returned by the API
pub type Record = serde_json::Map<String, serde_json::Value>;

/// Errors surfaced by page operations
#[derive(Debug, thiserror::Error)]
pub enum PageError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Form(#[from] FormError),

    #[error("IO error: {0}")]
    Io(String),
}

impl PageError {
    /// Message for a transient notification, `fallback` when the backend
    /// gives nothing more specific
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            PageError::Api(e) => e.user_message(fallback),
            PageError::Form(e) => e.to_string(),
            PageError::Io(_) => fallback.to_string(),
        }
    }
}

/// Record id as used in resource paths (`/transactions/{id}/`)
pub fn record_id(record: &Record) -> Option<String> {
    record
        .get("id")
        .map(crate::forms::display_value)
        .filter(|id| !id.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn record_ids_accept_numbers_and_strings() {
        let numeric: Record = serde_json::from_value(json!({"id": 7})).unwrap();
        let text: Record = serde_json::from_value(json!({"id": "abc"})).unwrap();
        let missing: Record = serde_json::from_value(json!({"name": "x"})).unwrap();

        assert_eq!(record_id(&numeric).as_deref(), Some("7"));
        assert_eq!(record_id(&text).as_deref(), Some("abc"));
        assert_eq!(record_id(&missing), None);
    }

    #[test]
    fn io_errors_use_the_fallback() {
        let err = PageError::Io("disk full".into());
        assert_eq!(err.user_message("Download failed"), "Download failed");
    }
}
