//! Product Model

use serde::{Deserialize, Serialize};

/// Product entity
///
/// The scalar `stock` is authoritative only when the product has no
/// variants; with variants, effective stock is the sum over them.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub price: f64,
    pub stock: i64,
    pub category_id: Option<i64>,
    /// Category name joined on read
    pub category_name: Option<String>,
    pub image_url: Option<String>,
    pub updated_at: i64,

    // -- Relations (populated by application code, skipped by FromRow) --
    #[cfg_attr(feature = "db", sqlx(skip))]
    #[serde(default)]
    pub variants: Vec<ProductVariant>,
}

/// Product variant entity (e.g. size or color)
///
/// Effective unit price = `product.price + price_adjustment`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct ProductVariant {
    pub id: i64,
    pub product_id: i64,
    pub name: String,
    pub stock: i64,
    pub price_adjustment: f64,
}

/// Variant payload inside a product save
///
/// Variants carry no id on the wire: every product save replaces the full
/// set, so prior variant identities are not preserved.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VariantInput {
    pub name: String,
    #[serde(default)]
    pub stock: i64,
    #[serde(default)]
    pub price_adjustment: f64,
}

/// Create/update product payload (POST and PUT share one body shape)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductInput {
    pub name: String,
    pub price: f64,
    #[serde(default)]
    pub stock: i64,
    pub category_id: Option<i64>,
    pub image_url: Option<String>,
    #[serde(default)]
    pub variants: Vec<VariantInput>,
    pub updated_at: Option<i64>,
}
