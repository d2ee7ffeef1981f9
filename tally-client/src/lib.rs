//! Tally Client - terminal-side library for the Tally POS server
//!
//! Provides the HTTP API client, the durable offline action queue, and
//! the sync coordinator that replays queued actions when connectivity
//! returns.

pub mod config;
pub mod connectivity;
pub mod error;
pub mod http;
pub mod queue;
pub mod sync;

pub use config::ClientConfig;
pub use connectivity::{Connectivity, ConnectivityHandle, ConnectivityObserver};
pub use error::{ClientError, ClientResult};
pub use http::HttpClient;
pub use queue::OfflineQueue;
pub use sync::{SyncCoordinator, SyncOutcome, SyncTransport};
