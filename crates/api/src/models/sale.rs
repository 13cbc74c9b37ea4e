//! Sale domain types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use stitchline_core::{Price, SaleId, UserId};

/// One product entry within a sale.
///
/// A line item is a point-in-time snapshot of name and price, not a live
/// catalogue reference, so historical orders stay stable when catalogue
/// prices change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    pub product_id: String,
    pub name: String,
    /// Unit price at the time of the sale. Non-negative by construction.
    pub price: Price,
    /// Units purchased. Non-integer JSON values are rejected at
    /// deserialization; zero is rejected by validation.
    pub quantity: u32,
}

/// A recorded sale (domain type).
///
/// Append-only: once created it is never mutated or reassigned.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Sale {
    /// Unique sale ID.
    pub id: SaleId,
    /// Owning account. Ownership is permanent.
    pub user_id: UserId,
    /// The purchased line items, at least one.
    pub products: Vec<LineItem>,
    /// Server-computed total. Never taken from the client.
    pub total_price: Price,
    /// Server clock at creation time.
    pub sale_date: DateTime<Utc>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_line_item_deserializes_camel_case() {
        let item: LineItem = serde_json::from_str(
            r#"{"productId": "tee-01", "name": "Linen Tee", "price": 19.99, "quantity": 2}"#,
        )
        .unwrap();

        assert_eq!(item.product_id, "tee-01");
        assert_eq!(item.quantity, 2);
        assert_eq!(item.price, "19.99".parse().unwrap());
    }

    #[test]
    fn test_line_item_rejects_fractional_quantity() {
        let result = serde_json::from_str::<LineItem>(
            r#"{"productId": "tee-01", "name": "Linen Tee", "price": 10, "quantity": 1.5}"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_line_item_rejects_negative_quantity() {
        let result = serde_json::from_str::<LineItem>(
            r#"{"productId": "tee-01", "name": "Linen Tee", "price": 10, "quantity": -1}"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_line_item_rejects_negative_price() {
        let result = serde_json::from_str::<LineItem>(
            r#"{"productId": "tee-01", "name": "Linen Tee", "price": -10, "quantity": 1}"#,
        );
        assert!(result.is_err());
    }
}
