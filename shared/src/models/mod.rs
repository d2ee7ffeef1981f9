//! Data models
//!
//! Shared between tally-server and the terminal client (via API).
//! DB row types use `#[cfg_attr(feature = "db", derive(sqlx::FromRow))]`.
//! All IDs are `i64` (SQLite INTEGER PRIMARY KEY).

pub mod category;
pub mod product;
pub mod sale;
pub mod stats;
pub mod stock_history;
pub mod sync;

// Re-exports
pub use category::*;
pub use product::*;
pub use sale::*;
pub use stats::*;
pub use stock_history::*;
pub use sync::*;
