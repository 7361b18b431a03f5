use std::io;
use thiserror::Error;

/// Custom result type for stack operations
pub type CfnResult<T> = Result<T, CfnError>;

/// Custom error type for stack operations
#[derive(Debug, Error)]
pub enum CfnError {
    /// Missing or malformed identity fields, caught before any request is sent
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The provisioning service rejected or failed a request
    #[error("Provisioning error: {0}")]
    Provisioning(String),

    /// The delete waiter ran out of attempts or saw a failed state
    #[error("Wait timeout: {0}")]
    WaitTimeout(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl CfnError {
    /// Create a new invalid argument error
    pub fn invalid_argument<S: Into<String>>(msg: S) -> Self {
        CfnError::InvalidArgument(msg.into())
    }

    /// Create a new provisioning error
    pub fn provisioning<S: Into<String>>(msg: S) -> Self {
        CfnError::Provisioning(msg.into())
    }

    /// Create a new wait timeout error
    pub fn wait_timeout<S: Into<String>>(msg: S) -> Self {
        CfnError::WaitTimeout(msg.into())
    }
}

impl From<serde_json::Error> for CfnError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

impl From<io::Error> for CfnError {
    fn from(err: io::Error) -> Self {
        Self::Io(err.to_string())
    }
}
