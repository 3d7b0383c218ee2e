//! Server-side models: configuration and the per-request visitor.

pub mod config;
pub mod visitor;
