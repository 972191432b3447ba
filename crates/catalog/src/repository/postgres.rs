use async_trait::async_trait;
use common::ProductId;
use domain::Product;
use sqlx::{PgPool, Row, postgres::PgRow};

use super::{ProductRecord, ProductRepository};
use crate::{CatalogError, Result};

/// PostgreSQL-backed product repository.
#[derive(Clone)]
pub struct PostgresProductRepository {
    pool: PgPool,
}

impl PostgresProductRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Gets a reference to the underlying connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    fn row_to_record(row: PgRow) -> Result<ProductRecord> {
        Ok(ProductRecord {
            product_id: row.try_get("product_id")?,
            name: row.try_get("name")?,
            description: row.try_get("description")?,
            category: row.try_get("category")?,
            base_price_numerator: row.try_get("base_price_numerator")?,
            base_price_denominator: row.try_get("base_price_denominator")?,
            discount_percent: row.try_get("discount_percent")?,
            discount_start: row.try_get("discount_start")?,
            discount_end: row.try_get("discount_end")?,
            status: row.try_get("status")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
            archived_at: row.try_get("archived_at")?,
        })
    }
}

#[async_trait]
impl ProductRepository for PostgresProductRepository {
    async fn find_by_id(&self, product_id: &ProductId) -> Result<Product> {
        let row = sqlx::query(
            r#"
            SELECT product_id, name, description, category,
                   base_price_numerator, base_price_denominator,
                   discount_percent, discount_start, discount_end,
                   status, created_at, updated_at, archived_at
            FROM products
            WHERE product_id = $1
            "#,
        )
        .bind(product_id.as_str())
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| CatalogError::NotFound {
            product_id: product_id.clone(),
        })?;

        Self::row_to_record(row)?.into_product()
    }
}
