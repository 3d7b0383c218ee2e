//! Conversions from lower-layer errors into [`ServiceError`].
//!
//! They live outside `domain` and `forms` so the `data` feature stays free of
//! the gateway and service types.

use crate::api::ApiError;
use crate::domain::filters::UnknownDimension;
use crate::domain::types::TypeConstraintError;
use crate::forms::FormError;
use crate::services::ServiceError;
use crate::state::notification::GENERIC_FAILURE;

impl From<TypeConstraintError> for ServiceError {
    fn from(val: TypeConstraintError) -> Self {
        ServiceError::TypeConstraint(val.to_string())
    }
}

impl From<FormError> for ServiceError {
    fn from(val: FormError) -> Self {
        match val {
            FormError::UnknownAction(_) | FormError::InvalidValue(_) => {
                ServiceError::Form(val.to_string())
            }
            other => ServiceError::Validation(other.field_errors()),
        }
    }
}

impl From<ApiError> for ServiceError {
    fn from(val: ApiError) -> Self {
        match val {
            ApiError::Unauthorized => ServiceError::Unauthorized,
            ApiError::Status(404) => ServiceError::NotFound,
            ApiError::Rejected { message, .. } => ServiceError::Rejected(
                message
                    .filter(|message| !message.trim().is_empty())
                    .unwrap_or_else(|| GENERIC_FAILURE.to_string()),
            ),
            other => ServiceError::Backend(other),
        }
    }
}

impl From<UnknownDimension> for ServiceError {
    fn from(val: UnknownDimension) -> Self {
        ServiceError::Form(val.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejection_keeps_backend_message() {
        let err = ServiceError::from(ApiError::Rejected {
            code: Some(400),
            message: Some("Wrong password".to_string()),
        });
        assert_eq!(err.user_message(), "Wrong password");

        let err = ServiceError::from(ApiError::Rejected {
            code: Some(400),
            message: None,
        });
        assert_eq!(err.user_message(), GENERIC_FAILURE);
    }

    #[test]
    fn transport_failures_use_generic_message() {
        let err = ServiceError::from(ApiError::Timeout);
        assert!(matches!(err, ServiceError::Backend(ApiError::Timeout)));
        assert_eq!(err.user_message(), GENERIC_FAILURE);
        assert!(matches!(
            ServiceError::from(ApiError::Unauthorized),
            ServiceError::Unauthorized
        ));
    }

    #[test]
    fn missing_resource_becomes_not_found() {
        assert!(matches!(
            ServiceError::from(ApiError::Status(404)),
            ServiceError::NotFound
        ));
        assert!(matches!(
            ServiceError::from(ApiError::Status(503)),
            ServiceError::Backend(ApiError::Status(503))
        ));
    }
}
