use serde::{Deserialize, Serialize};

use crate::domain::types::{Email, OtpCode};

/// Tokens issued by the backend and kept in the signed session cookie.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SessionTokens {
    /// Anonymous token used before sign-in and during sign-up/recovery.
    pub public_token: Option<String>,
    /// Token of an authenticated visitor.
    pub private_token: Option<String>,
    pub remember_me_token: Option<String>,
}

impl SessionTokens {
    pub fn is_authenticated(&self) -> bool {
        self.private_token.is_some()
    }

    /// Token sent in the `token` header: the private one when signed in.
    pub fn request_token(&self) -> Option<&str> {
        self.private_token
            .as_deref()
            .or(self.public_token.as_deref())
    }

    pub fn sign_in(&mut self, tokens: AuthTokens) {
        self.private_token = Some(tokens.token);
        self.remember_me_token = tokens.remember_me_token;
    }

    pub fn sign_out(&mut self) {
        self.private_token = None;
        self.remember_me_token = None;
    }
}

/// Tokens returned after a successful sign-in or OTP confirmation.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AuthTokens {
    pub token: String,
    #[serde(default)]
    pub remember_me_token: Option<String>,
}

#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SignInPayload {
    pub email: Email,
    pub password: String,
    pub remember_me: bool,
}

#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SignUpPayload {
    pub email: Email,
    pub password: String,
    pub repeat_password: String,
}

/// Backend answer to the sign-up credentials step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SignUpStatus {
    /// Account created; an OTP was sent.
    OtpSent,
    /// The email belongs to a removed account: restore it or start over.
    RestoreOrNew,
}

/// Answer to the restore-or-new prompt.
#[derive(Clone, Copy, Debug, Serialize, PartialEq, Eq)]
pub struct AccountChoice {
    pub choice: u8,
}

#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct OtpPayload {
    pub entered_otp_code: OtpCode,
}

#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct ForgotPasswordPayload {
    pub email: Email,
}

#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct NewPasswordPayload {
    pub new_password: String,
}
