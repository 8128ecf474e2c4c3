use reqwest::StatusCode;
use thiserror::Error;

/// Failure of a single call against the task backend.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The backend answered with a non-success status.
    #[error("Error {status}: {body}")]
    Request { status: StatusCode, body: String },
    /// The request never produced a response (unreachable host, timeout, ...).
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
    /// A success response whose body could not be read as the expected shape.
    #[error("malformed response from {context}: {source}")]
    Decode {
        context: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid endpoint '{0}'")]
    InvalidUrl(String),
}

impl ApiError {
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ApiError::Request { status, .. } => Some(*status),
            ApiError::Network(err) => err.status(),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(StatusCode::NOT_FOUND)
    }

    pub fn is_network(&self) -> bool {
        matches!(self, ApiError::Network(_))
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
