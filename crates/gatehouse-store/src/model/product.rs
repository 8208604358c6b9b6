//! Product rows.

use bigdecimal::BigDecimal;
use jiff::Timestamp;
use serde::{Deserialize, Serialize};

/// A catalog product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// Unique product identifier.
    pub id: i64,
    /// Product name.
    pub name: String,
    /// Optional description.
    pub description: Option<String>,
    /// Unit price.
    pub price: BigDecimal,
    /// Units in stock.
    pub stock: i32,
    /// Optional category.
    pub category: Option<String>,
    /// Timestamp when the product was created.
    pub created_at: Timestamp,
    /// Timestamp when the product was last updated.
    pub updated_at: Timestamp,
    /// Acting user id or `system`.
    pub created_by: String,
    /// Acting user id or `system`.
    pub updated_by: String,
}

/// Data for creating a new product.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProduct {
    pub name: String,
    pub description: Option<String>,
    pub price: BigDecimal,
    pub stock: i32,
    pub category: Option<String>,
    /// Acting user id or `system`.
    pub created_by: String,
}

/// Full replacement of the mutable product fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateProduct {
    pub name: String,
    pub description: Option<String>,
    pub price: BigDecimal,
    pub stock: i32,
    pub category: Option<String>,
    /// Acting user id or `system`.
    pub updated_by: String,
}
