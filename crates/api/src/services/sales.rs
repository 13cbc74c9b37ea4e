//! Sale recording service.
//!
//! Validates proposed orders, computes the authoritative total, and persists
//! sales through [`SaleRepository`].

use sqlx::PgPool;
use thiserror::Error;

use stitchline_core::{Price, UserId};

use crate::db::RepositoryError;
use crate::db::sales::SaleRepository;
use crate::models::sale::{LineItem, Sale};

/// Errors that can occur when recording a sale.
#[derive(Debug, Error)]
pub enum SaleError {
    /// The product list was empty.
    #[error("products must contain at least one item")]
    EmptyProducts,

    /// A line item failed validation.
    #[error("products[{index}].{field}: {reason}")]
    InvalidItem {
        index: usize,
        field: &'static str,
        reason: &'static str,
    },

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),
}

/// Sale recording service.
pub struct SaleService<'a> {
    sales: SaleRepository<'a>,
}

impl<'a> SaleService<'a> {
    /// Create a new sale service.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self {
            sales: SaleRepository::new(pool),
        }
    }

    /// Record a sale for the given owner.
    ///
    /// The total is always recomputed here from the submitted line items;
    /// any total the client may have sent never reaches this function. The
    /// price and name snapshots are used as given - a sale is a
    /// point-in-time receipt, deliberately decoupled from the catalogue.
    ///
    /// # Errors
    ///
    /// Returns `SaleError::EmptyProducts` or `SaleError::InvalidItem` if the
    /// order fails validation, and `SaleError::Repository` if persistence
    /// fails.
    pub async fn create(&self, owner: UserId, products: Vec<LineItem>) -> Result<Sale, SaleError> {
        validate_products(&products)?;
        let total_price = compute_total(&products);

        let sale = self.sales.create(owner, &products, total_price).await?;

        Ok(sale)
    }

    /// List all sales for an owner, most recent first.
    ///
    /// Returns an empty vector (not an error) when the owner has no sales.
    ///
    /// # Errors
    ///
    /// Returns `SaleError::Repository` if the query fails.
    pub async fn list_by_owner(&self, owner: UserId) -> Result<Vec<Sale>, SaleError> {
        let sales = self.sales.list_by_owner(owner).await?;
        Ok(sales)
    }
}

/// Validate a proposed product list.
///
/// Quantities must be positive integers; non-integer values never get this
/// far because [`LineItem`] deserializes quantity as `u32`. Prices are
/// non-negative by construction of [`Price`].
fn validate_products(products: &[LineItem]) -> Result<(), SaleError> {
    if products.is_empty() {
        return Err(SaleError::EmptyProducts);
    }

    for (index, item) in products.iter().enumerate() {
        if item.product_id.trim().is_empty() {
            return Err(SaleError::InvalidItem {
                index,
                field: "productId",
                reason: "must not be empty",
            });
        }
        if item.name.trim().is_empty() {
            return Err(SaleError::InvalidItem {
                index,
                field: "name",
                reason: "must not be empty",
            });
        }
        if item.quantity == 0 {
            return Err(SaleError::InvalidItem {
                index,
                field: "quantity",
                reason: "must be a positive integer",
            });
        }
    }

    Ok(())
}

/// Compute the authoritative total: Σ unit price × quantity.
///
/// Decimal arithmetic, so the sum is exact.
#[must_use]
pub fn compute_total(products: &[LineItem]) -> Price {
    products
        .iter()
        .map(|item| item.price * item.quantity)
        .sum()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn item(product_id: &str, name: &str, price: &str, quantity: u32) -> LineItem {
        LineItem {
            product_id: product_id.to_owned(),
            name: name.to_owned(),
            price: price.parse().unwrap(),
            quantity,
        }
    }

    #[test]
    fn test_compute_total_sums_price_times_quantity() {
        let products = vec![
            item("tee-01", "Linen Tee", "10", 2),
            item("sock-04", "Wool Socks", "5.5", 1),
        ];

        assert_eq!(compute_total(&products), "25.5".parse().unwrap());
    }

    #[test]
    fn test_compute_total_is_exact_for_awkward_decimals() {
        // 0.1 * 3 must be exactly 0.3, not a float approximation.
        let products = vec![item("btn-09", "Button", "0.1", 3)];
        assert_eq!(compute_total(&products), "0.3".parse().unwrap());
    }

    #[test]
    fn test_compute_total_with_zero_price_items() {
        let products = vec![
            item("tee-01", "Linen Tee", "10", 1),
            item("gift-00", "Gift Wrap", "0", 4),
        ];

        assert_eq!(compute_total(&products), "10".parse().unwrap());
    }

    #[test]
    fn test_validate_rejects_empty_list() {
        assert!(matches!(
            validate_products(&[]),
            Err(SaleError::EmptyProducts)
        ));
    }

    #[test]
    fn test_validate_rejects_zero_quantity() {
        let products = vec![item("tee-01", "Linen Tee", "10", 0)];
        assert!(matches!(
            validate_products(&products),
            Err(SaleError::InvalidItem {
                index: 0,
                field: "quantity",
                ..
            })
        ));
    }

    #[test]
    fn test_validate_rejects_blank_product_id_and_name() {
        let products = vec![item("  ", "Linen Tee", "10", 1)];
        assert!(matches!(
            validate_products(&products),
            Err(SaleError::InvalidItem {
                field: "productId",
                ..
            })
        ));

        let products = vec![item("tee-01", "", "10", 1)];
        assert!(matches!(
            validate_products(&products),
            Err(SaleError::InvalidItem { field: "name", .. })
        ));
    }

    #[test]
    fn test_validate_reports_offending_index() {
        let products = vec![
            item("tee-01", "Linen Tee", "10", 1),
            item("sock-04", "Wool Socks", "5.5", 0),
        ];
        assert!(matches!(
            validate_products(&products),
            Err(SaleError::InvalidItem { index: 1, .. })
        ));
    }

    #[test]
    fn test_validate_accepts_well_formed_order() {
        let products = vec![item("tee-01", "Linen Tee", "19.99", 3)];
        assert!(validate_products(&products).is_ok());
    }
}
