use thiserror::Error;

/// Failures of a backend REST call.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Backend request timed out")]
    Timeout,

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Unexpected backend status: {0}")]
    Status(u16),

    /// The backend answered and refused the request.
    #[error("Backend rejected request: {}", message.as_deref().unwrap_or("no message"))]
    Rejected {
        code: Option<u16>,
        message: Option<String>,
    },

    #[error("Invalid backend response: {0}")]
    Decode(String),

    #[error("Backend response carried no data")]
    MissingData,

    #[error("Not authenticated")]
    Unauthorized,
}

pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    /// Message suitable for showing to the user, when the backend sent one.
    pub fn user_message(&self) -> Option<&str> {
        match self {
            ApiError::Rejected { message, .. } => message.as_deref(),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ApiError::Timeout
        } else if err.is_decode() {
            ApiError::Decode(err.to_string())
        } else if let Some(status) = err.status() {
            ApiError::Status(status.as_u16())
        } else {
            ApiError::Transport(err.to_string())
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::Decode(err.to_string())
    }
}
