use thiserror::Error;

use crate::api::ApiError;
use crate::forms::FieldErrors;
use crate::state::notification::GENERIC_FAILURE;

/// Errors returned by the service layer to route handlers.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The visitor must be signed in.
    #[error("unauthorized")]
    Unauthorized,

    #[error("not found")]
    NotFound,

    /// Input failed field validation; nothing was sent to the backend.
    #[error("invalid form input")]
    Validation(FieldErrors),

    /// Input could not be interpreted at all (unknown action, bad id).
    #[error("form error: {0}")]
    Form(String),

    #[error("type constraint violated: {0}")]
    TypeConstraint(String),

    /// Expected negative outcome reported by the backend.
    #[error("{0}")]
    Rejected(String),

    /// Transport or backend failure.
    #[error("backend error: {0}")]
    Backend(ApiError),
}

pub type ServiceResult<T> = Result<T, ServiceError>;

impl ServiceError {
    /// Text for the notification shown to the visitor.
    pub fn user_message(&self) -> String {
        match self {
            ServiceError::Rejected(message) | ServiceError::Form(message) => message.clone(),
            ServiceError::Unauthorized => "Please sign in to continue.".to_string(),
            ServiceError::NotFound => "Not found.".to_string(),
            ServiceError::Validation(_) => "Please correct the highlighted fields.".to_string(),
            ServiceError::TypeConstraint(_) | ServiceError::Backend(_) => {
                GENERIC_FAILURE.to_string()
            }
        }
    }
}
