use actix_web::{HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use tera::Tera;

use crate::api::http::HttpBackend;
use crate::forms::cart::CheckoutForm;
use crate::models::visitor::Visitor;
use crate::routes::{base_context, redirect, render_template};
use crate::services::{ServiceError, orders as orders_service};

#[get("/settings/orders")]
pub async fn show_orders(
    visitor: Visitor,
    backend: web::Data<HttpBackend>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    let repo = visitor.backend(backend.get_ref());
    match orders_service::list_orders(&repo, &visitor.tokens).await {
        Ok(data) => {
            let mut context = base_context(&flash_messages, &visitor, "orders");
            context.insert("orders", &data.orders);

            render_template(&tera, "orders/index.html", &context)
        }
        Err(ServiceError::Unauthorized) => redirect("/"),
        Err(err) => {
            log::error!("Failed to list orders: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[get("/settings/order/{order_id}")]
pub async fn show_order(
    order_id: web::Path<String>,
    visitor: Visitor,
    backend: web::Data<HttpBackend>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    let repo = visitor.backend(backend.get_ref());
    match orders_service::show_order(&repo, &visitor.tokens, &order_id).await {
        Ok(data) => {
            let mut context = base_context(&flash_messages, &visitor, "orders");
            context.insert("order_id", &data.order_id);
            context.insert("order", &data.order);

            render_template(&tera, "orders/show.html", &context)
        }
        Err(ServiceError::Unauthorized) => redirect("/"),
        Err(ServiceError::NotFound | ServiceError::TypeConstraint(_) | ServiceError::Form(_)) => {
            FlashMessage::error("Order not found.").send();
            redirect("/settings/orders")
        }
        Err(err) => {
            log::error!("Failed to load order {order_id}: {err}");
            FlashMessage::error(err.user_message()).send();
            redirect("/settings/orders")
        }
    }
}

#[get("/checkout")]
pub async fn show_checkout(
    visitor: Visitor,
    backend: web::Data<HttpBackend>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
    form: web::Query<CheckoutForm>,
) -> impl Responder {
    let repo = visitor.backend(backend.get_ref());
    match orders_service::load_checkout(&repo, &visitor.tokens, &form).await {
        Ok(data) => {
            let mut context = base_context(&flash_messages, &visitor, "checkout");
            context.insert("cart", &data.cart);
            context.insert("addresses", &data.addresses);
            context.insert("cards", &data.cards);
            context.insert("countries", &data.countries);
            context.insert("promo_code", &data.promo_code);

            render_template(&tera, "checkout/index.html", &context)
        }
        Err(ServiceError::Unauthorized) => redirect("/"),
        Err(err) => {
            log::error!("Failed to load checkout: {err}");
            FlashMessage::error(err.user_message()).send();
            redirect("/cart")
        }
    }
}

#[post("/checkout")]
pub async fn checkout(
    visitor: Visitor,
    backend: web::Data<HttpBackend>,
    form: web::Query<CheckoutForm>,
) -> impl Responder {
    let repo = visitor.backend(backend.get_ref());
    match orders_service::checkout(&repo, &visitor.tokens, form.into_inner()).await {
        Ok(()) => {
            FlashMessage::success("Checkout Complete").send();
            redirect("/settings/orders")
        }
        Err(ServiceError::Unauthorized) => redirect("/"),
        Err(err @ (ServiceError::Rejected(_) | ServiceError::Form(_))) => {
            FlashMessage::error(err.user_message()).send();
            redirect("/checkout")
        }
        Err(err) => {
            log::error!("Failed to check out: {err}");
            FlashMessage::error(err.user_message()).send();
            redirect("/checkout")
        }
    }
}
