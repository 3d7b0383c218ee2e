//! Use-case orchestration between route handlers and the backend gateway.

pub mod account;
pub mod auth;
pub mod cart;
pub mod errors;
pub mod favourites;
pub mod orders;
pub mod products;
pub mod reviews;

pub use errors::{ServiceError, ServiceResult};

use crate::domain::session::SessionTokens;

/// Fails with [`ServiceError::Unauthorized`] for anonymous visitors.
pub fn ensure_signed_in(session: &SessionTokens) -> ServiceResult<()> {
    if session.is_authenticated() {
        Ok(())
    } else {
        Err(ServiceError::Unauthorized)
    }
}
