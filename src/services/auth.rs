//! Sign-in, sign-up and password recovery flows.

use crate::api::AuthApi;
use crate::domain::session::{
    AccountChoice, ForgotPasswordPayload, NewPasswordPayload, OtpPayload, SessionTokens,
    SignInPayload, SignUpPayload, SignUpStatus,
};
use crate::forms::auth::{
    ForgotPasswordRequestForm, ForgotPasswordStep, SignInForm, SignUpRequestForm, SignUpStep,
};
use crate::services::ServiceResult;

/// Where the sign-up dialog goes after a step succeeded.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SignUpProgress {
    /// A code was mailed; the OTP step is next.
    OtpSent,
    /// The email belongs to a deleted account; ask to restore or start over.
    RestoreOrNew,
    /// The code was accepted and the visitor is signed in.
    Confirmed,
}

/// Where the password recovery dialog goes after a step succeeded.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RecoveryProgress {
    CodeSent,
    CodeVerified,
    PasswordChanged,
}

/// Signs the visitor in and stores the issued tokens in `session`.
pub async fn sign_in<R>(
    repo: &R,
    form: SignInForm,
    session: &mut SessionTokens,
) -> ServiceResult<()>
where
    R: AuthApi + ?Sized,
{
    let payload = SignInPayload::try_from(form)?;
    let tokens = repo.sign_in(&payload).await.map_err(|err| {
        log::error!("Failed to sign in {}: {err}", payload.email);
        err
    })?;
    session.sign_in(tokens);
    Ok(())
}

/// Runs the sign-up step selected by `actionName`.
pub async fn sign_up<R>(
    repo: &R,
    form: SignUpRequestForm,
    session: &mut SessionTokens,
) -> ServiceResult<SignUpProgress>
where
    R: AuthApi + ?Sized,
{
    match SignUpStep::try_from(form)? {
        SignUpStep::Credentials(credentials) => {
            let payload = SignUpPayload::try_from(credentials)?;
            let status = repo.sign_up(&payload).await.map_err(|err| {
                log::error!("Failed to sign up {}: {err}", payload.email);
                err
            })?;
            Ok(match status {
                SignUpStatus::OtpSent => SignUpProgress::OtpSent,
                SignUpStatus::RestoreOrNew => SignUpProgress::RestoreOrNew,
            })
        }
        SignUpStep::Otp(otp) => {
            let payload = OtpPayload::try_from(otp)?;
            let tokens = repo.confirm_otp(&payload).await.map_err(|err| {
                log::error!("Failed to confirm sign-up code: {err}");
                err
            })?;
            session.sign_in(tokens);
            Ok(SignUpProgress::Confirmed)
        }
        SignUpStep::Choice(choice) => {
            let choice = AccountChoice::try_from(choice)?;
            repo.insert_choice(choice).await.map_err(|err| {
                log::error!("Failed to submit account choice {}: {err}", choice.choice);
                err
            })?;
            Ok(SignUpProgress::OtpSent)
        }
    }
}

/// Runs the password recovery step selected by `actionName`.
pub async fn recover_password<R>(
    repo: &R,
    form: ForgotPasswordRequestForm,
) -> ServiceResult<RecoveryProgress>
where
    R: AuthApi + ?Sized,
{
    match ForgotPasswordStep::try_from(form)? {
        ForgotPasswordStep::RequestCode(request) => {
            let payload = ForgotPasswordPayload::try_from(request)?;
            repo.forgot_password(&payload).await.map_err(|err| {
                log::error!("Failed to request recovery code for {}: {err}", payload.email);
                err
            })?;
            Ok(RecoveryProgress::CodeSent)
        }
        ForgotPasswordStep::VerifyOtp(otp) => {
            let payload = OtpPayload::try_from(otp)?;
            repo.verify_reset_otp(&payload).await.map_err(|err| {
                log::error!("Failed to verify recovery code: {err}");
                err
            })?;
            Ok(RecoveryProgress::CodeVerified)
        }
        ForgotPasswordStep::NewPassword(password) => {
            let payload = NewPasswordPayload::try_from(password)?;
            repo.reset_password(&payload).await.map_err(|err| {
                log::error!("Failed to reset password: {err}");
                err
            })?;
            Ok(RecoveryProgress::PasswordChanged)
        }
    }
}

#[cfg(all(test, feature = "test-mocks"))]
mod tests {
    use super::*;
    use crate::api::ApiError;
    use crate::api::mock::MockBackend;
    use crate::domain::session::AuthTokens;
    use crate::services::ServiceError;

    fn sign_in_form(password: &str) -> SignInForm {
        SignInForm {
            email: "Jane@Example.com".to_string(),
            password: password.to_string(),
            remember_me: Some("on".to_string()),
        }
    }

    fn sign_up_form(body: &str) -> SignUpRequestForm {
        serde_html_form::from_str(body).unwrap()
    }

    #[actix_web::test]
    async fn sign_in_stores_tokens() {
        let mut repo = MockBackend::new();
        repo.expect_sign_in()
            .withf(|payload| payload.email.as_str() == "jane@example.com" && payload.remember_me)
            .times(1)
            .returning(|_| {
                Ok(AuthTokens {
                    token: "private".to_string(),
                    remember_me_token: Some("remember".to_string()),
                })
            });

        let mut session = SessionTokens::default();
        sign_in(&repo, sign_in_form("Secret12!"), &mut session)
            .await
            .unwrap();
        assert!(session.is_authenticated());
        assert_eq!(session.remember_me_token.as_deref(), Some("remember"));
    }

    #[actix_web::test]
    async fn sign_in_rejection_keeps_session_anonymous() {
        let mut repo = MockBackend::new();
        repo.expect_sign_in().returning(|_| {
            Err(ApiError::Rejected {
                code: Some(400),
                message: Some("Wrong email or password".to_string()),
            })
        });

        let mut session = SessionTokens::default();
        let result = sign_in(&repo, sign_in_form("Secret12!"), &mut session).await;
        assert!(matches!(
            result,
            Err(ServiceError::Rejected(message)) if message == "Wrong email or password"
        ));
        assert!(!session.is_authenticated());
    }

    #[actix_web::test]
    async fn invalid_credentials_never_reach_backend() {
        let mut repo = MockBackend::new();
        repo.expect_sign_in().times(0);

        let mut session = SessionTokens::default();
        let result = sign_in(&repo, sign_in_form("weak"), &mut session).await;
        assert!(matches!(result, Err(ServiceError::Validation(_))));
    }

    #[actix_web::test]
    async fn sign_up_branches_on_backend_status() {
        let mut repo = MockBackend::new();
        repo.expect_sign_up()
            .times(1)
            .returning(|_| Ok(SignUpStatus::RestoreOrNew));

        let mut session = SessionTokens::default();
        let progress = sign_up(
            &repo,
            sign_up_form(
                "actionName=credentials&email=jane%40example.com&password=Secret12%21\
                 &repeat-password=Secret12%21",
            ),
            &mut session,
        )
        .await
        .unwrap();
        assert_eq!(progress, SignUpProgress::RestoreOrNew);
    }

    #[actix_web::test]
    async fn sign_up_otp_signs_in() {
        let mut repo = MockBackend::new();
        repo.expect_confirm_otp()
            .withf(|payload| payload.entered_otp_code.as_str() == "123456")
            .returning(|_| {
                Ok(AuthTokens {
                    token: "private".to_string(),
                    remember_me_token: None,
                })
            });

        let mut session = SessionTokens::default();
        let progress = sign_up(
            &repo,
            sign_up_form("actionName=otpSubmit&otp=123456"),
            &mut session,
        )
        .await
        .unwrap();
        assert_eq!(progress, SignUpProgress::Confirmed);
        assert_eq!(session.private_token.as_deref(), Some("private"));
    }

    #[actix_web::test]
    async fn sign_up_choice_is_forwarded() {
        let mut repo = MockBackend::new();
        repo.expect_insert_choice()
            .withf(|choice| choice.choice == 1)
            .times(1)
            .returning(|_| Ok(()));

        let mut session = SessionTokens::default();
        let progress = sign_up(
            &repo,
            sign_up_form("actionName=insert-choice&choice=1"),
            &mut session,
        )
        .await
        .unwrap();
        assert_eq!(progress, SignUpProgress::OtpSent);
    }

    #[actix_web::test]
    async fn recovery_runs_each_step() {
        let mut repo = MockBackend::new();
        repo.expect_forgot_password()
            .withf(|payload| payload.email.as_str() == "jane@example.com")
            .times(1)
            .returning(|_| Ok(()));
        repo.expect_verify_reset_otp().times(1).returning(|_| Ok(()));
        repo.expect_reset_password()
            .withf(|payload| payload.new_password == "Newpass1!")
            .times(1)
            .returning(|_| Ok(()));

        let step = |body: &str| -> ForgotPasswordRequestForm {
            serde_html_form::from_str(body).unwrap()
        };

        assert_eq!(
            recover_password(&repo, step("actionName=forgot-password&email=jane%40example.com"))
                .await
                .unwrap(),
            RecoveryProgress::CodeSent
        );
        assert_eq!(
            recover_password(&repo, step("actionName=verify-otp&otp=654321"))
                .await
                .unwrap(),
            RecoveryProgress::CodeVerified
        );
        assert_eq!(
            recover_password(&repo, step("actionName=new-password&newPassword=Newpass1%21"))
                .await
                .unwrap(),
            RecoveryProgress::PasswordChanged
        );
    }
}
