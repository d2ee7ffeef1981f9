//! Shared types for the Tally POS system
//!
//! Data models and wire types used by both the server and the terminal
//! client, plus small utilities. DB row types derive `sqlx::FromRow`
//! behind the `db` feature so the client build stays free of sqlx.

pub mod models;
pub mod response;
pub mod util;

// Re-exports
pub use serde::{Deserialize, Serialize};
