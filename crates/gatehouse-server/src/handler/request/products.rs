//! Product request types.

use std::str::FromStr;

use bigdecimal::BigDecimal;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use validator::Validate;

use super::validations::{not_blank, positive_price};

/// Request payload for creating or replacing a product.
#[must_use]
#[derive(Debug, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ProductRequest {
    /// Product name.
    #[validate(custom(function = "not_blank", message = "Product name is required"))]
    pub name: String,

    /// Optional description.
    pub description: Option<String>,

    /// Unit price, accepted as a JSON number or decimal string.
    #[validate(custom(function = "positive_price"))]
    #[serde(deserialize_with = "decimal_from_text")]
    pub price: BigDecimal,

    /// Units in stock.
    #[validate(range(min = 0, message = "Stock cannot be negative"))]
    pub stock: i32,

    /// Optional category.
    pub category: Option<String>,
}

/// Either form a client may send a decimal in.
#[derive(Deserialize)]
#[serde(untagged)]
enum DecimalText {
    Number(serde_json::Number),
    Text(String),
}

/// Parses a decimal from the textual form of a JSON number or string.
///
/// Going through the shortest round-trip text keeps `999.99` exact instead of
/// the binary expansion of the parsed `f64`.
fn decimal_from_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<BigDecimal, D::Error> {
    let text = match DecimalText::deserialize(deserializer)? {
        DecimalText::Number(number) => number.to_string(),
        DecimalText::Text(text) => text,
    };

    BigDecimal::from_str(text.trim()).map_err(D::Error::custom)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn request(price: serde_json::Value) -> serde_json::Result<ProductRequest> {
        serde_json::from_value(json!({ "name": "Laptop", "price": price, "stock": 5 }))
    }

    #[test]
    fn number_price_keeps_its_decimal_digits() -> anyhow::Result<()> {
        assert_eq!(request(json!(999.99))?.price.to_string(), "999.99");
        assert_eq!(request(json!(0.1))?.price.to_string(), "0.1");
        assert_eq!(request(json!(25))?.price.to_string(), "25");
        Ok(())
    }

    #[test]
    fn string_price_is_parsed() -> anyhow::Result<()> {
        assert_eq!(request(json!(" 19.90 "))?.price.to_string(), "19.90");
        Ok(())
    }

    #[test]
    fn non_numeric_price_is_rejected() {
        assert!(request(json!("cheap")).is_err());
        assert!(request(json!(true)).is_err());
    }
}
