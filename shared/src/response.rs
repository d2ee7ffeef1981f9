//! Wire response envelopes
//!
//! Small bodies returned by the mutating endpoints. Shapes are part of
//! the UI contract, hence the camelCase renames where they apply.

use serde::{Deserialize, Serialize};

/// POST response: the new row id plus the stamped concurrency token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateResult {
    pub id: i64,
    pub updated_at: i64,
}

/// PUT response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateResult {
    pub success: bool,
    pub updated_at: i64,
}

/// DELETE response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteResult {
    pub success: bool,
}

/// POST /api/checkout response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutResult {
    pub success: bool,
    #[serde(rename = "saleId")]
    pub sale_id: i64,
}

/// GET /api/health response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    pub database: String,
}
