//! Domain records and value objects shared by the storefront layers.

pub mod account;
pub mod cart;
pub mod catalog;
pub mod filters;
pub mod mutation;
pub mod order;
pub mod review;
pub mod session;
pub mod types;
