use actix_web::{HttpRequest, HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use tera::Tera;

use crate::api::http::HttpBackend;
use crate::forms::catalog::{FilterForm, SearchForm};
use crate::models::config::ServerConfig;
use crate::models::visitor::Visitor;
use crate::routes::{base_context, redirect, render_template};
use crate::services::{ServiceError, products as products_service};

#[get("/")]
pub async fn show_index() -> impl Responder {
    redirect("/products")
}

#[get("/products")]
pub async fn show_products(
    req: HttpRequest,
    visitor: Visitor,
    backend: web::Data<HttpBackend>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let repo = visitor.backend(backend.get_ref());
    match products_service::load_products(&repo, req.query_string(), server_config.page_size)
        .await
    {
        Ok(data) => {
            let mut context = base_context(&flash_messages, &visitor, "products");
            context.insert("title", &data.title);
            context.insert("products", &data.products);
            context.insert("total", &data.total);
            context.insert("filters", &data.filters);
            context.insert("categories", &data.categories);
            context.insert("query", &data.query);
            context.insert("search_debounce_ms", &server_config.search_debounce_ms);

            render_template(&tera, "products/index.html", &context)
        }
        Err(err) => {
            log::error!("Failed to load products: {err}");
            let mut context = base_context(&flash_messages, &visitor, "products");
            context.insert("message", &err.user_message());
            render_template(&tera, "error.html", &context)
        }
    }
}

/// Applies the search box and redirects to the canonical listing URL.
#[get("/products/search")]
pub async fn search_products(req: HttpRequest, form: web::Query<SearchForm>) -> impl Responder {
    redirect(&products_service::apply_search(
        req.query_string(),
        &form.into_inner(),
    ))
}

#[post("/products/filter")]
pub async fn filter_products(body: web::Bytes) -> impl Responder {
    let form: FilterForm = match serde_html_form::from_bytes(&body) {
        Ok(form) => form,
        Err(err) => {
            log::warn!("Malformed filter form: {err}");
            return HttpResponse::BadRequest().finish();
        }
    };

    match products_service::apply_filter(&form.query, &form.dimension, form.value) {
        Ok(location) => redirect(&location),
        Err(ServiceError::Form(message)) => {
            log::warn!("Rejected filter change: {message}");
            HttpResponse::BadRequest().body(message)
        }
        Err(err) => {
            log::error!("Failed to apply filter: {err}");
            FlashMessage::error(err.user_message()).send();
            redirect("/products")
        }
    }
}

#[get("/products/reset")]
pub async fn reset_products(req: HttpRequest) -> impl Responder {
    redirect(&products_service::reset_filters(req.query_string()))
}
