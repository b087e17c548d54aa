//! Error types for biothings

use thiserror::Error;

/// Result type alias using BiothingsError
pub type Result<T> = std::result::Result<T, BiothingsError>;

/// Error type alias for convenience
pub type Error = BiothingsError;

/// Exit codes for CLI
pub mod exit_codes {
    pub const SUCCESS: i32 = 0;
    pub const GENERAL_ERROR: i32 = 1;
    pub const NOT_FOUND: i32 = 2;
    pub const INVALID_INPUT: i32 = 3;
}

/// Main error type for biothings
#[derive(Debug, Error)]
pub enum BiothingsError {
    /// Non-success HTTP status returned by the remote service
    #[error("HTTP {status} from {url}: {message}")]
    Status {
        status: u16,
        url: String,
        message: String,
    },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Cache database error: {0}")]
    Cache(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),

    #[error("Unknown client '{name}', available clients are: {available}")]
    UnknownClient { name: String, available: String },

    #[error("Unknown method '{method}' for {entity} client")]
    UnknownMethod { entity: String, method: String },

    #[error("Client discovery failed: {0}")]
    Discovery(String),

    #[error("Caching is not available on this transport; build the client with a response cache")]
    CachingUnavailable,

    #[error("Unexpected response from {url}: {message}")]
    UnexpectedResponse { url: String, message: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

impl BiothingsError {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Status { status: 404, .. } => exit_codes::NOT_FOUND,
            Self::UnknownClient { .. } | Self::UnknownMethod { .. } => exit_codes::NOT_FOUND,
            Self::InvalidInput(_) | Self::Config(_) => exit_codes::INVALID_INPUT,
            _ => exit_codes::GENERAL_ERROR,
        }
    }

    /// HTTP status carried by a transport error, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes() {
        let not_found = BiothingsError::Status {
            status: 404,
            url: "https://mygene.info/v3/gene/0".to_string(),
            message: String::new(),
        };
        assert_eq!(not_found.exit_code(), exit_codes::NOT_FOUND);
        assert_eq!(not_found.status(), Some(404));

        let invalid = BiothingsError::InvalidInput("bad".to_string());
        assert_eq!(invalid.exit_code(), exit_codes::INVALID_INPUT);
        assert_eq!(invalid.status(), None);

        assert_eq!(
            BiothingsError::CachingUnavailable.exit_code(),
            exit_codes::GENERAL_ERROR
        );
    }
}
