//! Sale Model

use serde::{Deserialize, Serialize};

/// Sale entity — immutable once created
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Sale {
    pub id: i64,
    pub total_amount: f64,
    pub timestamp: String,
}

/// Sale line item, capturing the unit price at the moment of sale
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct SaleItem {
    pub id: i64,
    pub sale_id: i64,
    pub product_id: i64,
    pub variant_id: Option<i64>,
    pub quantity: i64,
    pub price_at_sale: f64,
}

/// One pending purchase line in a cart
///
/// `price` is the resolved unit price, already inclusive of any variant
/// adjustment, captured at add-to-cart time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartLine {
    pub id: i64,
    #[serde(default)]
    pub selected_variant_id: Option<i64>,
    pub quantity: i64,
    pub price: f64,
}

/// Checkout request body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutRequest {
    pub items: Vec<CartLine>,
    pub total: f64,
}
