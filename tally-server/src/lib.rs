//! Tally Server - POS and inventory API node
//!
//! # Architecture overview
//!
//! - **Database** (`db`): embedded SQLite via sqlx, WAL mode, migrations
//!   applied at startup
//! - **Repositories** (`db::repository`): catalog store, sale processor,
//!   stock ledger and stats aggregator over an explicit pool handle
//! - **HTTP API** (`api`): RESTful JSON interface for the terminal UI
//!
//! # Module structure
//!
//! ```text
//! tally-server/src/
//! ├── core/          # config, state, server
//! ├── api/           # HTTP routes and handlers
//! ├── db/            # pool service and repositories
//! └── utils/         # error, logging
//! ```

pub mod api;
pub mod core;
pub mod db;
pub mod utils;

// Re-export public types
pub use core::{Config, Server, ServerState};
pub use utils::{AppError, AppResult};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

/// Prepare the process environment: dotenv and logging
pub fn setup_environment() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();

    let log_level = std::env::var("LOG_LEVEL").ok();
    let log_dir = std::env::var("LOG_DIR").ok();
    init_logger_with_file(log_level.as_deref(), log_dir.as_deref());

    Ok(())
}
