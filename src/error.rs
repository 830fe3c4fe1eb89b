use std::path::PathBuf;
use thiserror::Error;

/// Failure of a catalog fetch.
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Catalog API error: HTTP {status} - {message}")]
    Status { status: u16, message: String },

    #[error("No games matched the current query")]
    EmptyResult,

    #[error("Malformed response: {0}")]
    MalformedResponse(String),
}

impl CatalogError {
    /// Check if issuing the same query again may succeed
    pub fn is_retryable(&self) -> bool {
        match self {
            CatalogError::Network(_) => true,
            CatalogError::Status { status, .. } => *status == 429 || *status >= 500,
            CatalogError::EmptyResult | CatalogError::MalformedResponse(_) => false,
        }
    }

    /// Get a user-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            CatalogError::Network(e) => {
                if e.is_timeout() {
                    "The catalog did not answer in time".to_string()
                } else {
                    format!("Could not reach the catalog: {}", e)
                }
            }
            CatalogError::Status { status, message } => {
                if message.is_empty() {
                    format!("Catalog API error ({})", status)
                } else {
                    format!("Catalog API error ({}): {}", status, message)
                }
            }
            CatalogError::EmptyResult => "No games match your search and filters".to_string(),
            CatalogError::MalformedResponse(msg) => {
                format!("The catalog sent an unexpected response: {}", msg)
            }
        }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Config file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Could not determine a home directory for config and data")]
    NoHomeDirectory,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Could not render config: {0}")]
    Render(#[from] toml::ser::Error),
}

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_retryable_only_for_server_side() {
        let busy = CatalogError::Status { status: 503, message: String::new() };
        assert!(busy.is_retryable());

        let throttled = CatalogError::Status { status: 429, message: String::new() };
        assert!(throttled.is_retryable());

        let bad_key = CatalogError::Status { status: 401, message: "bad key".to_string() };
        assert!(!bad_key.is_retryable());
    }

    #[test]
    fn test_empty_and_malformed_not_retryable() {
        assert!(!CatalogError::EmptyResult.is_retryable());
        assert!(!CatalogError::MalformedResponse("missing results".to_string()).is_retryable());
    }

    #[test]
    fn test_user_messages() {
        let msg = CatalogError::Status { status: 401, message: "bad key".to_string() }.user_message();
        assert!(msg.contains("401"));
        assert!(msg.contains("bad key"));

        let msg = CatalogError::MalformedResponse("expected value".to_string()).user_message();
        assert!(msg.contains("unexpected response"));
    }
}
