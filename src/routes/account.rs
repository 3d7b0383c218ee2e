use actix_web::{HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use tera::Tera;

use crate::api::http::HttpBackend;
use crate::forms::account::{AddressForm, PaymentCardForm, ProfileForm};
use crate::models::visitor::Visitor;
use crate::routes::{base_context, redirect, render_template};
use crate::services::{ServiceError, ServiceResult, account as account_service};

/// Flash and redirect for the settings form posts.
fn settings_saved(result: ServiceResult<()>, success: &str, back: &str) -> HttpResponse {
    match result {
        Ok(()) => {
            FlashMessage::success(success).send();
            redirect(back)
        }
        Err(ServiceError::Unauthorized) => redirect("/"),
        Err(ServiceError::Validation(errors)) => {
            log::warn!("Rejected settings form: {errors:?}");
            let message = errors
                .first_message()
                .unwrap_or("Please correct the highlighted fields.");
            FlashMessage::error(message).send();
            redirect(back)
        }
        Err(err) => {
            log::error!("Failed to save settings: {err}");
            FlashMessage::error(err.user_message()).send();
            redirect(back)
        }
    }
}

#[get("/settings")]
pub async fn show_profile(
    visitor: Visitor,
    backend: web::Data<HttpBackend>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    let repo = visitor.backend(backend.get_ref());
    match account_service::load_profile(&repo, &visitor.tokens).await {
        Ok(data) => {
            let mut context = base_context(&flash_messages, &visitor, "settings");
            context.insert("profile", &data.profile);
            context.insert("countries", &data.countries);

            render_template(&tera, "settings/profile.html", &context)
        }
        Err(ServiceError::Unauthorized) => redirect("/"),
        Err(err) => {
            log::error!("Failed to load profile: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[post("/settings")]
pub async fn save_profile(
    visitor: Visitor,
    backend: web::Data<HttpBackend>,
    web::Form(form): web::Form<ProfileForm>,
) -> impl Responder {
    let repo = visitor.backend(backend.get_ref());
    settings_saved(
        account_service::update_profile(&repo, &visitor.tokens, form).await,
        "Profile updated.",
        "/settings",
    )
}

#[get("/settings/addresses")]
pub async fn show_addresses(
    visitor: Visitor,
    backend: web::Data<HttpBackend>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    let repo = visitor.backend(backend.get_ref());
    match account_service::load_addresses(&repo, &visitor.tokens).await {
        Ok(data) => {
            let mut context = base_context(&flash_messages, &visitor, "addresses");
            context.insert("addresses", &data.addresses);
            context.insert("countries", &data.countries);

            render_template(&tera, "settings/addresses.html", &context)
        }
        Err(ServiceError::Unauthorized) => redirect("/"),
        Err(err) => {
            log::error!("Failed to load addresses: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[post("/settings/addresses")]
pub async fn add_address(
    visitor: Visitor,
    backend: web::Data<HttpBackend>,
    web::Form(form): web::Form<AddressForm>,
) -> impl Responder {
    let repo = visitor.backend(backend.get_ref());
    settings_saved(
        account_service::add_address(&repo, &visitor.tokens, form).await,
        "Address added.",
        "/settings/addresses",
    )
}

#[get("/settings/payment")]
pub async fn show_payment_cards(
    visitor: Visitor,
    backend: web::Data<HttpBackend>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    let repo = visitor.backend(backend.get_ref());
    match account_service::load_payment_cards(&repo, &visitor.tokens).await {
        Ok(data) => {
            let mut context = base_context(&flash_messages, &visitor, "payment");
            context.insert("cards", &data.cards);

            render_template(&tera, "settings/payment.html", &context)
        }
        Err(ServiceError::Unauthorized) => redirect("/"),
        Err(err) => {
            log::error!("Failed to load payment cards: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[post("/settings/payment")]
pub async fn add_payment_card(
    visitor: Visitor,
    backend: web::Data<HttpBackend>,
    web::Form(form): web::Form<PaymentCardForm>,
) -> impl Responder {
    let repo = visitor.backend(backend.get_ref());
    settings_saved(
        account_service::add_payment_card(&repo, &visitor.tokens, form).await,
        "Card added.",
        "/settings/payment",
    )
}
