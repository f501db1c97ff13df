//! Error classification for the navigation engine

use thiserror::Error;

/// Errors raised by the navigation engine
#[derive(Error, Debug, Clone, PartialEq)]
pub enum NavigationError {
    /// Catalog or session configuration is unusable
    #[error("Configuration error: {reason}")]
    Configuration { reason: String },

    /// A floor navigation or current-view query was made with no view selected
    #[error("No indoor view is currently selected")]
    NoActiveView,

    /// Reading or writing a file failed
    #[error("I/O error on '{path}': {message}")]
    Io { path: String, message: String },

    /// JSON (de)serialization failed
    #[error("Serialization error: {message}")]
    Serialization { message: String },
}

impl NavigationError {
    pub fn configuration(reason: impl Into<String>) -> Self {
        NavigationError::Configuration { reason: reason.into() }
    }
}

impl From<serde_json::Error> for NavigationError {
    fn from(error: serde_json::Error) -> Self {
        NavigationError::Serialization { message: error.to_string() }
    }
}

/// Result type for navigation operations
pub type NavResult<T> = Result<T, NavigationError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = NavigationError::configuration("catalog is empty");
        assert_eq!(err.to_string(), "Configuration error: catalog is empty");
        assert_eq!(NavigationError::NoActiveView.to_string(), "No indoor view is currently selected");

        let io = NavigationError::Io { path: "nav.json".to_string(), message: "not found".to_string() };
        assert_eq!(io.to_string(), "I/O error on 'nav.json': not found");
    }

    #[test]
    fn test_json_errors_convert() {
        let parse_err = serde_json::from_str::<u32>("not json").unwrap_err();
        let err: NavigationError = parse_err.into();
        assert!(matches!(err, NavigationError::Serialization { .. }));
    }
}
