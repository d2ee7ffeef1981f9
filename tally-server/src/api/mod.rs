//! API Route Modules
//!
//! # Structure
//!
//! - [`health`] - health check
//! - [`categories`] - category management
//! - [`products`] - product management and stock history
//! - [`checkout`] - sale processing
//! - [`stats`] - dashboard statistics

pub mod categories;
pub mod checkout;
pub mod health;
pub mod products;
pub mod stats;

use axum::Router;

use crate::core::ServerState;

/// Assemble the full API router
pub fn router() -> Router<ServerState> {
    Router::new()
        .merge(health::router())
        .merge(categories::router())
        .merge(products::router())
        .merge(checkout::router())
        .merge(stats::router())
}

// Re-export common types for handlers
pub use crate::utils::{AppError, AppResult};
