use actix_web::{HttpRequest, HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use tera::{Context, Tera};

use crate::api::http::HttpBackend;
use crate::forms::FieldErrors;
use crate::forms::auth::{ForgotPasswordRequestForm, SignInForm, SignUpRequestForm};
use crate::models::visitor::{Visitor, forget_tokens, remember_tokens};
use crate::routes::{base_context, redirect, render_template};
use crate::services::auth::{RecoveryProgress, SignUpProgress};
use crate::services::{ServiceError, auth as auth_service};
use crate::state::notification::GENERIC_FAILURE;

fn render_with_errors(
    tera: &Tera,
    template: &str,
    mut context: Context,
    step: &str,
    errors: &FieldErrors,
) -> HttpResponse {
    context.insert("step", step);
    context.insert("errors", errors);
    render_template(tera, template, &context)
}

fn store_or_fail(req: &HttpRequest, visitor: &Visitor) -> Option<HttpResponse> {
    match remember_tokens(req, &visitor.tokens) {
        Ok(()) => None,
        Err(err) => {
            log::error!("Failed to store session tokens: {err}");
            FlashMessage::error(GENERIC_FAILURE).send();
            Some(redirect("/login"))
        }
    }
}

#[get("/login")]
pub async fn show_login(
    visitor: Visitor,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    if visitor.is_authenticated() {
        return redirect("/");
    }
    let context = base_context(&flash_messages, &visitor, "login");
    render_with_errors(&tera, "auth/login.html", context, "credentials", &FieldErrors::default())
}

#[post("/login")]
pub async fn login(
    req: HttpRequest,
    mut visitor: Visitor,
    backend: web::Data<HttpBackend>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
    web::Form(form): web::Form<SignInForm>,
) -> impl Responder {
    let repo = visitor.backend(backend.get_ref());
    match auth_service::sign_in(&repo, form, &mut visitor.tokens).await {
        Ok(()) => {
            if let Some(response) = store_or_fail(&req, &visitor) {
                return response;
            }
            FlashMessage::success("Successful login").send();
            redirect("/")
        }
        Err(ServiceError::Validation(errors)) => {
            let context = base_context(&flash_messages, &visitor, "login");
            render_with_errors(&tera, "auth/login.html", context, "credentials", &errors)
        }
        Err(err) => {
            log::warn!("Sign-in failed: {err}");
            FlashMessage::error(err.user_message()).send();
            redirect("/login")
        }
    }
}

#[get("/signup")]
pub async fn show_signup(
    visitor: Visitor,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    let context = base_context(&flash_messages, &visitor, "signup");
    render_with_errors(&tera, "auth/signup.html", context, "credentials", &FieldErrors::default())
}

#[post("/signup")]
pub async fn signup(
    req: HttpRequest,
    mut visitor: Visitor,
    backend: web::Data<HttpBackend>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
    web::Form(form): web::Form<SignUpRequestForm>,
) -> impl Responder {
    let current_step = match form.action_name.as_str() {
        "otpSubmit" => "otp",
        "insert-choice" => "choice",
        _ => "credentials",
    };
    let repo = visitor.backend(backend.get_ref());
    let result = auth_service::sign_up(&repo, form, &mut visitor.tokens).await;
    let context = base_context(&flash_messages, &visitor, "signup");

    match result {
        Ok(SignUpProgress::OtpSent) => {
            render_with_errors(&tera, "auth/signup.html", context, "otp", &FieldErrors::default())
        }
        Ok(SignUpProgress::RestoreOrNew) => render_with_errors(
            &tera,
            "auth/signup.html",
            context,
            "choice",
            &FieldErrors::default(),
        ),
        Ok(SignUpProgress::Confirmed) => {
            if let Some(response) = store_or_fail(&req, &visitor) {
                return response;
            }
            FlashMessage::success("Account Confirmed").send();
            redirect("/")
        }
        Err(ServiceError::Validation(errors)) => {
            render_with_errors(&tera, "auth/signup.html", context, current_step, &errors)
        }
        Err(err) => {
            log::warn!("Sign-up step {current_step} failed: {err}");
            render_with_errors(
                &tera,
                "auth/signup.html",
                context,
                current_step,
                &FieldErrors::single("general", err.user_message()),
            )
        }
    }
}

#[get("/forgot-password")]
pub async fn show_forgot_password(
    visitor: Visitor,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    let context = base_context(&flash_messages, &visitor, "forgot-password");
    render_with_errors(
        &tera,
        "auth/forgot_password.html",
        context,
        "forgot-password",
        &FieldErrors::default(),
    )
}

#[post("/forgot-password")]
pub async fn forgot_password(
    visitor: Visitor,
    backend: web::Data<HttpBackend>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
    web::Form(form): web::Form<ForgotPasswordRequestForm>,
) -> impl Responder {
    let current_step = match form.action_name.as_str() {
        "verify-otp" => "verify-otp",
        "new-password" => "new-password",
        _ => "forgot-password",
    };
    let repo = visitor.backend(backend.get_ref());
    let result = auth_service::recover_password(&repo, form).await;
    let context = base_context(&flash_messages, &visitor, "forgot-password");
    let template = "auth/forgot_password.html";

    match result {
        Ok(RecoveryProgress::CodeSent) => {
            render_with_errors(&tera, template, context, "verify-otp", &FieldErrors::default())
        }
        Ok(RecoveryProgress::CodeVerified) => {
            render_with_errors(&tera, template, context, "new-password", &FieldErrors::default())
        }
        Ok(RecoveryProgress::PasswordChanged) => {
            FlashMessage::success("Password changed. Please sign in.").send();
            redirect("/login")
        }
        Err(ServiceError::Validation(errors)) => {
            render_with_errors(&tera, template, context, current_step, &errors)
        }
        Err(err) => {
            log::warn!("Password recovery step {current_step} failed: {err}");
            render_with_errors(
                &tera,
                template,
                context,
                current_step,
                &FieldErrors::single("general", err.user_message()),
            )
        }
    }
}

#[post("/logout")]
pub async fn logout(req: HttpRequest) -> impl Responder {
    forget_tokens(&req);
    FlashMessage::success("Logged out successfully.").send();
    redirect("/")
}
