use actix_web::http::StatusCode;
use actix_web::{HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use tera::Tera;

use crate::api::http::HttpBackend;
use crate::domain::types::CartItemId;
use crate::dto::cart::ActionResponse;
use crate::forms::cart::{CartActionForm, CartStep, FavouriteForm};
use crate::models::visitor::Visitor;
use crate::routes::{base_context, flash_notification, redirect, render_template};
use crate::services::{ServiceError, cart as cart_service, favourites as favourites_service};
use crate::state::notification::Notification;

fn json_error(status: StatusCode, err: &ServiceError) -> HttpResponse {
    HttpResponse::build(status).json(ActionResponse::rejected(Notification::error(
        err.user_message(),
    )))
}

#[get("/cart")]
pub async fn show_cart(
    visitor: Visitor,
    backend: web::Data<HttpBackend>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    let repo = visitor.backend(backend.get_ref());
    match cart_service::load_cart(&repo, &visitor.tokens).await {
        Ok(data) => {
            let mut context = base_context(&flash_messages, &visitor, "cart");
            context.insert("is_empty", &data.is_empty());
            context.insert("lines", &data.lines);
            context.insert("summary", &data.summary);
            context.insert("item_count", &data.item_count);

            render_template(&tera, "cart/index.html", &context)
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("Please sign in to see your cart.").send();
            redirect("/")
        }
        Err(err) => {
            log::error!("Failed to load cart: {err}");
            FlashMessage::error(err.user_message()).send();
            redirect("/products")
        }
    }
}

/// Cart mutation posted by the cart page script; answers JSON.
#[post("/cart")]
pub async fn update_cart(
    visitor: Visitor,
    backend: web::Data<HttpBackend>,
    web::Form(form): web::Form<CartActionForm>,
) -> impl Responder {
    let repo = visitor.backend(backend.get_ref());
    match cart_service::apply_cart_action(&repo, &visitor.tokens, form).await {
        Ok(response) => HttpResponse::Ok().json(response),
        Err(err @ ServiceError::Unauthorized) => json_error(StatusCode::UNAUTHORIZED, &err),
        Err(err @ (ServiceError::Form(_) | ServiceError::Validation(_))) => {
            log::warn!("Rejected cart action: {err}");
            json_error(StatusCode::BAD_REQUEST, &err)
        }
        Err(err) => {
            log::error!("Failed to update cart: {err}");
            json_error(StatusCode::INTERNAL_SERVER_ERROR, &err)
        }
    }
}

/// Quantity buttons of the cart page when scripts are disabled.
#[post("/cart/{cart_item_id}/{step}")]
pub async fn step_cart_item(
    path: web::Path<(String, CartStep)>,
    visitor: Visitor,
    backend: web::Data<HttpBackend>,
) -> impl Responder {
    let (cart_item_id, step) = path.into_inner();
    let Ok(cart_item_id) = CartItemId::new(cart_item_id) else {
        return HttpResponse::BadRequest().finish();
    };

    let repo = visitor.backend(backend.get_ref());
    match cart_service::step_cart_item(&repo, &visitor.tokens, &cart_item_id, step).await {
        Ok(Some(notification)) => {
            flash_notification(&notification);
            redirect("/cart")
        }
        Ok(None) => redirect("/cart"),
        Err(ServiceError::Unauthorized) => redirect("/"),
        Err(ServiceError::NotFound) => {
            FlashMessage::error("This item is no longer in your cart.").send();
            redirect("/cart")
        }
        Err(err) => {
            log::error!("Failed to update cart item {cart_item_id}: {err}");
            FlashMessage::error(err.user_message()).send();
            redirect("/cart")
        }
    }
}

#[get("/favourites")]
pub async fn show_favourites(
    visitor: Visitor,
    backend: web::Data<HttpBackend>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    let repo = visitor.backend(backend.get_ref());
    match favourites_service::list_favourites(&repo, &visitor.tokens).await {
        Ok(products) => {
            let mut context = base_context(&flash_messages, &visitor, "favourites");
            context.insert("products", &products);

            render_template(&tera, "favourites/index.html", &context)
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::warning("Sign in to see your saved products.").send();
            redirect("/")
        }
        Err(err) => {
            log::error!("Failed to list favourites: {err}");
            FlashMessage::error(err.user_message()).send();
            redirect("/products")
        }
    }
}

/// Heart icon of a product card; answers JSON.
#[post("/favourites")]
pub async fn toggle_favourite(
    visitor: Visitor,
    backend: web::Data<HttpBackend>,
    web::Form(form): web::Form<FavouriteForm>,
) -> impl Responder {
    let repo = visitor.backend(backend.get_ref());
    match favourites_service::toggle_favourite(&repo, &visitor.tokens, form).await {
        Ok(response) => HttpResponse::Ok().json(response),
        Err(err @ ServiceError::Unauthorized) => json_error(StatusCode::UNAUTHORIZED, &err),
        Err(err @ (ServiceError::Form(_) | ServiceError::Validation(_))) => {
            log::warn!("Rejected favourite toggle: {err}");
            json_error(StatusCode::BAD_REQUEST, &err)
        }
        Err(err) => {
            log::error!("Failed to toggle favourite: {err}");
            json_error(StatusCode::INTERNAL_SERVER_ERROR, &err)
        }
    }
}
