//! Shared building blocks for the host session.
//!
//! - `config`: environment-driven configuration
//! - `errors`: the error taxonomy and sqlx error classification
//! - `models`: connection, query and host models
//! - `utils`: LIKE pattern helpers and id generation

pub mod config;
pub mod errors;
pub mod models;
pub mod utils;
