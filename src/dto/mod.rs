//! DTO modules that bridge services with templates and JSON responses.

pub mod account;
pub mod cart;
pub mod orders;
pub mod products;
