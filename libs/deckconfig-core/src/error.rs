//! Error types for deckconfig-core.

use thiserror::Error;

/// Result type alias using ConfigError.
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Rejected edits to the preset list. State is unchanged when one is returned.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("preset index {index} out of range (have {len})")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("can't remove default config")]
    RemoveDefault,

    #[error("can't remove the only remaining preset")]
    RemoveLast,

    #[error("snapshot contains no presets")]
    EmptySnapshot,
}

/// Errors from the request/response channel.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Backend error: {status} - {message}")]
    Backend { status: u16, message: String },

    #[error("Parse error: {0}")]
    Parse(String),
}

impl From<serde_json::Error> for TransportError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_remove_default() {
        assert_eq!(
            ConfigError::RemoveDefault.to_string(),
            "can't remove default config"
        );
    }

    #[test]
    fn test_error_display_index() {
        let error = ConfigError::IndexOutOfRange { index: 4, len: 2 };
        assert_eq!(error.to_string(), "preset index 4 out of range (have 2)");
    }

    #[test]
    fn test_error_display_backend() {
        let error = TransportError::Backend {
            status: 404,
            message: "no such deck".to_string(),
        };
        assert_eq!(error.to_string(), "Backend error: 404 - no such deck");
    }
}
