//! Error types for remote-store access and locale resolution.

use thiserror::Error;

/// Error reported by the remote key-value store backend.
///
/// Carries the backend's error code and message so callers can log or
/// match on the code without depending on the backend implementation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{code}: {message}")]
pub struct StoreError {
    /// Backend error code (e.g. "permission-denied", "timeout")
    pub code: String,

    /// Human-readable description from the backend
    pub message: String,
}

impl StoreError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

/// Errors surfaced by language service operations.
#[derive(Debug, Error)]
pub enum LanguageError {
    /// A read from the remote store failed.
    #[error("remote fetch failed at '{path}': {source}")]
    RemoteFetch {
        path: String,
        #[source]
        source: StoreError,
    },

    /// A write to the remote store failed.
    #[error("remote write failed at '{path}': {source}")]
    RemoteWrite {
        path: String,
        #[source]
        source: StoreError,
    },

    /// No record exists for the location at all.
    #[error("location '{0}' not found")]
    LocationNotFound(String),

    /// The location record exists but carries no default language.
    #[error("location '{0}' has no default language set")]
    NoDefaultLanguage(String),

    /// A stored translation bundle could not be decoded as a flat
    /// key-to-string map.
    #[error("malformed translation bundle for '{locale}': {reason}")]
    MalformedBundle { locale: String, reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_error_display() {
        let err = StoreError::new("permission-denied", "read denied on /locations");
        assert_eq!(err.to_string(), "permission-denied: read denied on /locations");
    }

    #[test]
    fn test_fetch_error_carries_path_and_source() {
        let err = LanguageError::RemoteFetch {
            path: "locations/loc-1/defaultLang".to_string(),
            source: StoreError::new("unavailable", "backend offline"),
        };
        let text = err.to_string();
        assert!(text.contains("locations/loc-1/defaultLang"));
        assert!(text.contains("unavailable"));
    }

    #[test]
    fn test_resolution_errors_are_distinct() {
        let not_found = LanguageError::LocationNotFound("loc-1".to_string());
        let no_default = LanguageError::NoDefaultLanguage("loc-1".to_string());
        assert!(not_found.to_string().contains("not found"));
        assert!(no_default.to_string().contains("no default language"));
    }
}
