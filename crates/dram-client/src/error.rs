//! Classifier client error types.

use thiserror::Error;

pub type ClientResult<T> = Result<T, ClientError>;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Invalid classifier configuration: {0}")]
    InvalidConfig(String),

    #[error("Classifier returned {status}: {message}")]
    RequestFailed { status: u16, message: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Classifier returned no candidates")]
    EmptyResponse,

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ClientError {
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }

    pub fn invalid_response(msg: impl Into<String>) -> Self {
        Self::InvalidResponse(msg.into())
    }

    /// Short label for metrics and logs.
    pub fn kind(&self) -> &'static str {
        match self {
            ClientError::InvalidConfig(_) => "config",
            ClientError::RequestFailed { .. } => "status",
            ClientError::InvalidResponse(_) | ClientError::Json(_) => "parse",
            ClientError::EmptyResponse => "empty",
            ClientError::Network(_) => "network",
        }
    }
}
