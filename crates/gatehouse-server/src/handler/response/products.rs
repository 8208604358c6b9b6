//! Product response types.

use bigdecimal::BigDecimal;
use gatehouse_store::model;
use jiff::Timestamp;
use serde::{Deserialize, Serialize};

/// Represents a catalog product.
#[must_use]
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductResponse {
    /// Unique identifier of the product.
    pub id: i64,
    /// Product name.
    pub name: String,
    /// Optional description.
    pub description: Option<String>,
    /// Unit price, serialized as a decimal string.
    pub price: BigDecimal,
    /// Units in stock.
    pub stock: i32,
    /// Optional category.
    pub category: Option<String>,
    /// Timestamp when the product was created.
    pub created_at: Timestamp,
    /// Timestamp when the product was last updated.
    pub updated_at: Timestamp,
    /// User id that created the product, or `system`.
    pub created_by: String,
}

impl ProductResponse {
    pub fn from_model(product: model::Product) -> Self {
        Self {
            id: product.id,
            name: product.name,
            description: product.description,
            price: product.price,
            stock: product.stock,
            category: product.category,
            created_at: product.created_at,
            updated_at: product.updated_at,
            created_by: product.created_by,
        }
    }
}
