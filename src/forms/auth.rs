//! Sign-in, sign-up and password recovery forms.

use serde::Deserialize;
use validator::Validate;

use crate::domain::session::{
    AccountChoice, ForgotPasswordPayload, NewPasswordPayload, OtpPayload, SignInPayload,
    SignUpPayload,
};
use crate::domain::types::{Email, OtpCode};
use crate::forms::{
    FormError, validate_email_field, validate_new_password, validate_otp, validate_password,
};

#[derive(Debug, Deserialize, Validate)]
/// Credentials posted to `/login`.
pub struct SignInForm {
    #[serde(default)]
    #[validate(custom(function = "validate_email_field"))]
    pub email: String,
    #[serde(default)]
    #[validate(custom(function = "validate_password"))]
    pub password: String,
    /// Checkbox value: `on` or `true` when ticked, absent otherwise.
    #[serde(default, rename = "rememberMe")]
    pub remember_me: Option<String>,
}

impl TryFrom<SignInForm> for SignInPayload {
    type Error = FormError;

    fn try_from(form: SignInForm) -> Result<Self, Self::Error> {
        form.validate()?;
        let remember_me = matches!(form.remember_me.as_deref(), Some("on" | "true"));
        Ok(Self {
            email: Email::new(form.email)?,
            password: form.password,
            remember_me,
        })
    }
}

#[derive(Debug, Deserialize, Validate)]
/// First step of the sign-up dialog.
pub struct SignUpForm {
    #[serde(default)]
    #[validate(custom(function = "validate_email_field"))]
    pub email: String,
    #[serde(default)]
    #[validate(custom(function = "validate_password"))]
    pub password: String,
    #[serde(default, rename = "repeat-password")]
    #[validate(
        length(min = 1, message = "Please re-enter the password."),
        must_match(other = "password", message = "Passwords do not match.")
    )]
    pub repeat_password: String,
}

impl TryFrom<SignUpForm> for SignUpPayload {
    type Error = FormError;

    fn try_from(form: SignUpForm) -> Result<Self, Self::Error> {
        form.validate()?;
        Ok(Self {
            email: Email::new(form.email)?,
            password: form.password,
            repeat_password: form.repeat_password,
        })
    }
}

#[derive(Debug, Deserialize, Validate)]
/// One-time password typed into the confirmation dialog.
pub struct OtpForm {
    #[serde(default)]
    #[validate(custom(function = "validate_otp"))]
    pub otp: String,
}

impl TryFrom<OtpForm> for OtpPayload {
    type Error = FormError;

    fn try_from(form: OtpForm) -> Result<Self, Self::Error> {
        form.validate()?;
        Ok(Self {
            entered_otp_code: OtpCode::new(form.otp)?,
        })
    }
}

#[derive(Debug, Deserialize)]
/// Answer to the "restore or start over" prompt.
pub struct AccountChoiceForm {
    #[serde(default)]
    pub choice: String,
}

impl TryFrom<AccountChoiceForm> for AccountChoice {
    type Error = FormError;

    fn try_from(form: AccountChoiceForm) -> Result<Self, Self::Error> {
        form.choice
            .trim()
            .parse::<u8>()
            .map(|choice| AccountChoice { choice })
            .map_err(|_| FormError::InvalidValue(format!("choice {}", form.choice)))
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct ForgotPasswordForm {
    #[serde(default)]
    #[validate(custom(function = "validate_email_field"))]
    pub email: String,
}

impl TryFrom<ForgotPasswordForm> for ForgotPasswordPayload {
    type Error = FormError;

    fn try_from(form: ForgotPasswordForm) -> Result<Self, Self::Error> {
        form.validate()?;
        Ok(Self {
            email: Email::new(form.email)?,
        })
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct NewPasswordForm {
    #[serde(default, rename = "newPassword")]
    #[validate(custom(function = "validate_new_password"))]
    pub new_password: String,
}

impl TryFrom<NewPasswordForm> for NewPasswordPayload {
    type Error = FormError;

    fn try_from(form: NewPasswordForm) -> Result<Self, Self::Error> {
        form.validate()?;
        Ok(Self {
            new_password: form.new_password,
        })
    }
}

#[derive(Debug, Deserialize)]
/// Raw body of `POST /signup`. The `actionName` field selects the step.
pub struct SignUpRequestForm {
    #[serde(default, rename = "actionName")]
    pub action_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default, rename = "repeat-password")]
    pub repeat_password: String,
    #[serde(default)]
    pub otp: String,
    #[serde(default)]
    pub choice: String,
}

#[derive(Debug)]
pub enum SignUpStep {
    Credentials(SignUpForm),
    Otp(OtpForm),
    Choice(AccountChoiceForm),
}

impl TryFrom<SignUpRequestForm> for SignUpStep {
    type Error = FormError;

    fn try_from(form: SignUpRequestForm) -> Result<Self, Self::Error> {
        match form.action_name.as_str() {
            "credentials" => Ok(SignUpStep::Credentials(SignUpForm {
                email: form.email,
                password: form.password,
                repeat_password: form.repeat_password,
            })),
            "otpSubmit" => Ok(SignUpStep::Otp(OtpForm { otp: form.otp })),
            "insert-choice" => Ok(SignUpStep::Choice(AccountChoiceForm {
                choice: form.choice,
            })),
            other => Err(FormError::UnknownAction(other.to_string())),
        }
    }
}

#[derive(Debug, Deserialize)]
/// Raw body of `POST /forgot-password`.
pub struct ForgotPasswordRequestForm {
    #[serde(default, rename = "actionName")]
    pub action_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub otp: String,
    #[serde(default, rename = "newPassword")]
    pub new_password: String,
}

#[derive(Debug)]
pub enum ForgotPasswordStep {
    RequestCode(ForgotPasswordForm),
    VerifyOtp(OtpForm),
    NewPassword(NewPasswordForm),
}

impl TryFrom<ForgotPasswordRequestForm> for ForgotPasswordStep {
    type Error = FormError;

    fn try_from(form: ForgotPasswordRequestForm) -> Result<Self, Self::Error> {
        match form.action_name.as_str() {
            "forgot-password" => Ok(ForgotPasswordStep::RequestCode(ForgotPasswordForm {
                email: form.email,
            })),
            "verify-otp" => Ok(ForgotPasswordStep::VerifyOtp(OtpForm { otp: form.otp })),
            "new-password" => Ok(ForgotPasswordStep::NewPassword(NewPasswordForm {
                new_password: form.new_password,
            })),
            other => Err(FormError::UnknownAction(other.to_string())),
        }
    }
}
