use async_trait::async_trait;
use common::ProductId;
use domain::Product;
use store::{InMemoryDatabase, schema::products};

use super::{ProductRecord, ProductRepository};
use crate::{CatalogError, Result};

/// Product repository reading from an [`InMemoryDatabase`].
#[derive(Clone, Default)]
pub struct InMemoryProductRepository {
    db: InMemoryDatabase,
}

impl InMemoryProductRepository {
    pub fn new(db: InMemoryDatabase) -> Self {
        Self { db }
    }

    /// Returns the database this repository reads.
    pub fn database(&self) -> &InMemoryDatabase {
        &self.db
    }
}

#[async_trait]
impl ProductRepository for InMemoryProductRepository {
    async fn find_by_id(&self, product_id: &ProductId) -> Result<Product> {
        let row = self
            .db
            .read_row(products::TABLE, product_id.as_str())
            .await
            .ok_or_else(|| CatalogError::NotFound {
                product_id: product_id.clone(),
            })?;

        ProductRecord::from_row(&row)?.into_product()
    }
}
