//! HTTP handlers and the helpers they share.

use actix_web::HttpResponse;
use actix_web::http::header;
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages, Level};
use tera::{Context, Tera};

use crate::models::visitor::Visitor;
use crate::state::notification::{Notification, NotificationLevel};

pub mod account;
pub mod auth;
pub mod cart;
pub mod orders;
pub mod products;
pub mod reviews;

/// Bootstrap alert class for a flash message level.
pub fn alert_level_to_str(level: &Level) -> &'static str {
    match level {
        Level::Error => "danger",
        Level::Warning => "warning",
        Level::Success => "success",
        _ => "info",
    }
}

/// Context every page template expects: alerts, sign-in state and the
/// active navigation entry.
pub fn base_context(
    flash_messages: &IncomingFlashMessages,
    visitor: &Visitor,
    current_page: &str,
) -> Context {
    let alerts = flash_messages
        .iter()
        .map(|f| (f.content(), alert_level_to_str(&f.level())))
        .collect::<Vec<_>>();
    let mut context = Context::new();
    context.insert("alerts", &alerts);
    context.insert("signed_in", &visitor.is_authenticated());
    context.insert("current_page", current_page);
    context
}

pub fn render_template(tera: &Tera, template: &str, context: &Context) -> HttpResponse {
    match tera.render(template, context) {
        Ok(body) => HttpResponse::Ok().content_type("text/html").body(body),
        Err(err) => {
            log::error!("Failed to render template '{template}': {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

pub fn redirect(location: &str) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, location))
        .finish()
}

/// Queues a notification as a flash message for the next page.
pub fn flash_notification(notification: &Notification) {
    let message = notification.message.clone();
    match notification.level {
        NotificationLevel::Info => FlashMessage::info(message),
        NotificationLevel::Success => FlashMessage::success(message),
        NotificationLevel::Warning => FlashMessage::warning(message),
        NotificationLevel::Error => FlashMessage::error(message),
    }
    .send();
}
