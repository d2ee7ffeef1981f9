//! Client configuration

use std::path::PathBuf;

/// Configuration for the terminal client
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the Tally server, e.g. "http://localhost:3000"
    pub base_url: String,
    /// Path of the redb file holding the offline queue and preferences
    pub store_path: PathBuf,
    /// Request timeout in seconds
    pub timeout: u64,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>, store_path: impl Into<PathBuf>) -> Self {
        Self {
            base_url: base_url.into(),
            store_path: store_path.into(),
            timeout: 30,
        }
    }
}
