//! Error types for executor construction and remote client failures
//!
//! Construction problems (bad settings, missing credentials, a runner that
//! cannot be built) are returned as `ExecutorError`. Anything that goes wrong
//! while talking to the remote service is a `RemoteError`; the executor turns
//! those into failed outcomes rather than propagating them.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExecutorError {
    #[error("Configuration error: {0}")]
    ConfigError(String),
    #[error("Failed to initialize YepCode runner: {0}")]
    InitializationError(String),
}

// Specific error for the remote execution client
#[derive(Error, Debug)]
pub enum RemoteError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("YepCode API returned status {status}: {message}")]
    Api { status: u16, message: String },
    #[error("Invalid response from YepCode API: {0}")]
    InvalidResponse(String),
    #[error("Invalid client configuration: {0}")]
    InvalidConfig(String),
}

impl From<RemoteError> for ExecutorError {
    fn from(err: RemoteError) -> Self {
        ExecutorError::InitializationError(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = ExecutorError::ConfigError("Timeout must be greater than or equal to 1.".into());
        assert_eq!(
            err.to_string(),
            "Configuration error: Timeout must be greater than or equal to 1."
        );

        let err: ExecutorError = RemoteError::InvalidConfig("bad host".into()).into();
        assert_eq!(
            err.to_string(),
            "Failed to initialize YepCode runner: Invalid client configuration: bad host"
        );
    }

    #[test]
    fn test_api_error_display() {
        let err = RemoteError::Api {
            status: 401,
            message: "Unauthorized".into(),
        };
        assert_eq!(err.to_string(), "YepCode API returned status 401: Unauthorized");
    }
}
