//! Server-rendered storefront over a remote shop backend.
//!
//! The `data` feature builds only the client-state layer: filter state and
//! its query codec, the optimistic cart and favourite state machines, and
//! form validation. The default `server` feature adds the backend gateway,
//! services and the Actix-web application.

#[cfg(feature = "server")]
use actix_cors::Cors;
#[cfg(feature = "server")]
use actix_files::Files;
#[cfg(feature = "server")]
use actix_identity::IdentityMiddleware;
#[cfg(feature = "server")]
use actix_session::{SessionMiddleware, storage::CookieSessionStore};
#[cfg(feature = "server")]
use actix_web::cookie::Key;
#[cfg(feature = "server")]
use actix_web::{App, HttpServer, middleware, web};
#[cfg(feature = "server")]
use actix_web_flash_messages::{FlashMessagesFramework, storage::CookieMessageStore};
#[cfg(feature = "server")]
use tera::Tera;

#[cfg(feature = "server")]
use crate::api::http::HttpBackend;
#[cfg(feature = "server")]
use crate::models::config::ServerConfig;
#[cfg(feature = "server")]
use crate::routes::account::{
    add_address, add_payment_card, save_profile, show_addresses, show_payment_cards, show_profile,
};
#[cfg(feature = "server")]
use crate::routes::auth::{
    forgot_password, login, logout, show_forgot_password, show_login, show_signup, signup,
};
#[cfg(feature = "server")]
use crate::routes::cart::{
    show_cart, show_favourites, step_cart_item, toggle_favourite, update_cart,
};
#[cfg(feature = "server")]
use crate::routes::orders::{checkout, show_checkout, show_order, show_orders};
#[cfg(feature = "server")]
use crate::routes::products::{
    filter_products, reset_products, search_products, show_index, show_products,
};
#[cfg(feature = "server")]
use crate::routes::reviews::submit_review;

pub mod domain;
pub mod forms;
pub mod pagination;
pub mod state;

#[cfg(feature = "server")]
pub mod api;
#[cfg(feature = "server")]
pub mod dto;
#[cfg(feature = "server")]
mod error_conversions;
#[cfg(feature = "server")]
pub mod models;
#[cfg(feature = "server")]
pub mod routes;
#[cfg(feature = "server")]
pub mod services;

/// Builds and runs the Actix-Web HTTP server using the provided configuration.
#[cfg(feature = "server")]
pub async fn run(server_config: ServerConfig) -> std::io::Result<()> {
    let backend = HttpBackend::new(&server_config.backend_url, server_config.backend_timeout())
        .map_err(|e| std::io::Error::other(format!("Failed to build backend client: {e}")))?;

    // Keys and stores for identity, sessions, and flash messages.
    let secret_key = Key::from(server_config.secret.as_bytes());

    let message_store = CookieMessageStore::builder(secret_key.clone()).build();
    let message_framework = FlashMessagesFramework::builder(message_store).build();

    let tera = Tera::new(&server_config.templates_dir)
        .map_err(|e| std::io::Error::other(format!("Template parsing error(s): {e}")))?;

    let bind_address = (server_config.address.clone(), server_config.port);
    log::info!(
        "Starting storefront on {}:{} against {}",
        bind_address.0,
        bind_address.1,
        server_config.backend_url
    );

    HttpServer::new(move || {
        App::new()
            .wrap(Cors::permissive())
            .wrap(message_framework.clone())
            .wrap(IdentityMiddleware::default())
            .wrap(
                SessionMiddleware::builder(CookieSessionStore::default(), secret_key.clone())
                    .cookie_secure(false) // set to true in prod
                    .cookie_domain(Some(format!(".{}", server_config.domain)))
                    .build(),
            )
            .wrap(middleware::Compress::default())
            .wrap(middleware::Logger::default())
            .service(Files::new("/assets", "./assets"))
            .service(show_index)
            .service(show_products)
            .service(search_products)
            .service(filter_products)
            .service(reset_products)
            .service(show_cart)
            .service(update_cart)
            .service(step_cart_item)
            .service(show_favourites)
            .service(toggle_favourite)
            .service(show_login)
            .service(login)
            .service(show_signup)
            .service(signup)
            .service(show_forgot_password)
            .service(forgot_password)
            .service(logout)
            .service(show_profile)
            .service(save_profile)
            .service(show_addresses)
            .service(add_address)
            .service(show_payment_cards)
            .service(add_payment_card)
            .service(show_orders)
            .service(show_order)
            .service(show_checkout)
            .service(checkout)
            .service(submit_review)
            .app_data(web::Data::new(tera.clone()))
            .app_data(web::Data::new(backend.clone()))
            .app_data(web::Data::new(server_config.clone()))
    })
    .bind(bind_address)?
    .run()
    .await
}
