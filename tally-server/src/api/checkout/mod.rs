//! Checkout API Module

mod handler;

use axum::{
    Router,
    routing::post,
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().route("/api/checkout", post(handler::checkout))
}
