//! Offline Sync Model
//!
//! Actions a terminal records while disconnected, replayed in insertion
//! order once connectivity returns.

use serde::{Deserialize, Serialize};

use super::{CategoryInput, CheckoutRequest, ProductInput};

/// Product save captured for replay; `id` decides create vs update
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductSave {
    pub id: Option<i64>,
    #[serde(flatten)]
    pub input: ProductInput,
}

/// Category save captured for replay; `id` decides create vs update
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategorySave {
    pub id: Option<i64>,
    #[serde(flatten)]
    pub input: CategoryInput,
}

/// A mutating operation performed while offline
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum OfflineAction {
    Checkout(CheckoutRequest),
    Product(ProductSave),
    Category(CategorySave),
}

impl OfflineAction {
    /// Short label for logs and operator notifications
    pub fn kind(&self) -> &'static str {
        match self {
            OfflineAction::Checkout(_) => "checkout",
            OfflineAction::Product(_) => "product",
            OfflineAction::Category(_) => "category",
        }
    }
}

/// Queue entry: the action plus the wall-clock second it was recorded.
///
/// On replay `client_timestamp` becomes the `updated_at` sent to the
/// server, so the conflict check compares against the moment the operator
/// actually made the edit, not the moment connectivity returned.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueuedAction {
    #[serde(flatten)]
    pub action: OfflineAction,
    pub client_timestamp: i64,
}
