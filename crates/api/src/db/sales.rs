//! Sale repository for database operations.

use sqlx::postgres::PgRow;
use sqlx::types::Json;
use sqlx::{PgPool, Row};

use stitchline_core::{Price, UserId};

use super::RepositoryError;
use crate::models::sale::{LineItem, Sale};

/// Repository for sale database operations.
///
/// Sales are append-only: there is no update or delete.
pub struct SaleRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> SaleRepository<'a> {
    /// Create a new sale repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Persist a sale for the given owner.
    ///
    /// The line items are stored as one JSONB document, so the whole sale is
    /// written in a single statement: either the full record with its
    /// computed total lands, or nothing does.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the owner no longer exists.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create(
        &self,
        owner: UserId,
        products: &[LineItem],
        total_price: Price,
    ) -> Result<Sale, RepositoryError> {
        let row = sqlx::query(
            r"
            INSERT INTO sales (user_id, products, total_price)
            VALUES ($1, $2, $3)
            RETURNING id, user_id, products, total_price, sale_date
            ",
        )
        .bind(owner)
        .bind(Json(products))
        .bind(total_price)
        .fetch_one(self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_foreign_key_violation()
            {
                return RepositoryError::NotFound;
            }
            RepositoryError::Database(e)
        })?;

        map_sale(&row)
    }

    /// List all sales for an owner, most recent first.
    ///
    /// Returns an empty vector (not an error) when the owner has no sales.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_by_owner(&self, owner: UserId) -> Result<Vec<Sale>, RepositoryError> {
        let rows = sqlx::query(
            r"
            SELECT id, user_id, products, total_price, sale_date
            FROM sales
            WHERE user_id = $1
            ORDER BY sale_date DESC
            ",
        )
        .bind(owner)
        .fetch_all(self.pool)
        .await?;

        rows.iter().map(map_sale).collect()
    }
}

/// Map a database row to a domain sale.
fn map_sale(row: &PgRow) -> Result<Sale, RepositoryError> {
    let Json(products): Json<Vec<LineItem>> = row.try_get("products")?;

    Ok(Sale {
        id: row.try_get("id")?,
        user_id: row.try_get("user_id")?,
        products,
        total_price: row.try_get("total_price")?,
        sale_date: row.try_get("sale_date")?,
    })
}
