use serde::{Deserialize, Serialize};

/// Settled result of an asynchronous mutation (cart, favourites, checkout).
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MutationOutcome {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_msg: Option<String>,
}

impl MutationOutcome {
    pub fn succeeded() -> Self {
        Self {
            success: true,
            error_msg: None,
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            error_msg: Some(message.into()),
        }
    }
}
