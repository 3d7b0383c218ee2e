//! The `{ result, data }` wrapper every backend response is sent in.

use serde::Deserialize;

use crate::api::errors::{ApiError, ApiResult};
use crate::domain::mutation::MutationOutcome;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultBlock {
    #[serde(default)]
    pub code: Option<u16>,
    #[serde(default)]
    pub status: Option<bool>,
    #[serde(default, alias = "error_msg")]
    pub error_msg: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Envelope<T> {
    #[serde(default)]
    pub result: ResultBlock,
    pub data: Option<T>,
}

impl<T> Default for Envelope<T> {
    fn default() -> Self {
        Self {
            result: ResultBlock::default(),
            data: None,
        }
    }
}

impl<T> Envelope<T> {
    /// Checks the result block: a non-2xx `code` or `status == false` is a
    /// rejection carrying the backend `errorMsg`.
    pub fn into_checked(self) -> ApiResult<Option<T>> {
        let rejected_code = self.result.code.filter(|code| !(200..300).contains(code));
        if rejected_code.is_some() || self.result.status == Some(false) {
            return Err(ApiError::Rejected {
                code: self.result.code,
                message: self.result.error_msg,
            });
        }
        Ok(self.data)
    }

    /// Like [`Envelope::into_checked`] but requires `data` to be present.
    pub fn into_data(self) -> ApiResult<T> {
        self.into_checked()?.ok_or(ApiError::MissingData)
    }
}

/// Folds a mutation call into the outcome the client state machines expect.
/// Rejections become failed outcomes; transport errors stay errors.
pub fn mutation_outcome<T>(result: ApiResult<T>) -> ApiResult<MutationOutcome> {
    match result {
        Ok(_) => Ok(MutationOutcome::succeeded()),
        Err(ApiError::Rejected { message, .. }) => Ok(MutationOutcome {
            success: false,
            error_msg: message,
        }),
        Err(err) => Err(err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_success_code_is_a_rejection() {
        let envelope: Envelope<String> = serde_json::from_str(
            r#"{"result":{"code":400,"errorMsg":"Wrong password"},"data":null}"#,
        )
        .unwrap();
        match envelope.into_checked() {
            Err(ApiError::Rejected { code, message }) => {
                assert_eq!(code, Some(400));
                assert_eq!(message.as_deref(), Some("Wrong password"));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn false_status_is_a_rejection() {
        let envelope: Envelope<String> =
            serde_json::from_str(r#"{"result":{"status":false,"error_msg":"Card expired"}}"#)
                .unwrap();
        let err = envelope.into_data().unwrap_err();
        assert_eq!(err.user_message(), Some("Card expired"));
    }

    #[test]
    fn missing_data_is_reported() {
        let envelope: Envelope<String> =
            serde_json::from_str(r#"{"result":{"code":200}}"#).unwrap();
        assert!(matches!(envelope.into_data(), Err(ApiError::MissingData)));

        let envelope: Envelope<String> =
            serde_json::from_str(r#"{"result":{"code":200},"data":"ok"}"#).unwrap();
        assert_eq!(envelope.into_data().unwrap(), "ok");
    }

    #[test]
    fn rejection_becomes_failed_outcome() {
        let outcome = mutation_outcome::<()>(Err(ApiError::Rejected {
            code: Some(409),
            message: Some("Out of stock".to_string()),
        }))
        .unwrap();
        assert_eq!(outcome, MutationOutcome::failed("Out of stock"));
        assert!(mutation_outcome::<()>(Err(ApiError::Timeout)).is_err());
    }
}
