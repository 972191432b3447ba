//! Product persistence: loading aggregates and translating them into
//! mutations.
//!
//! Translation is shared by every backend; only `find_by_id` differs.

mod memory;
mod postgres;

pub use memory::InMemoryProductRepository;
pub use postgres::PostgresProductRepository;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use common::ProductId;
use domain::{
    AggregateRoot, BigRational, Discount, Field, Money, Product, ProductError, ProductStatus,
    StoredProduct,
};
use store::{Mutation, Row, Value, schema::products};

use crate::{CatalogError, Result};

/// Flat storage form of a product, one field per column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductRecord {
    pub product_id: String,
    pub name: String,
    pub description: String,
    pub category: String,
    pub base_price_numerator: i64,
    pub base_price_denominator: i64,
    /// Exact rational percentage, `"n"` or `"n/d"`.
    pub discount_percent: Option<String>,
    pub discount_start: Option<DateTime<Utc>>,
    pub discount_end: Option<DateTime<Utc>>,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub archived_at: Option<DateTime<Utc>>,
}

fn price_parts(price: &Money) -> Result<(i64, i64)> {
    price
        .parts()
        .ok_or(CatalogError::Product(ProductError::InvalidBasePrice))
}

fn discount_values(discount: Option<&Discount>) -> [(&'static str, Value); 3] {
    [
        (
            products::DISCOUNT_PERCENT,
            Value::Text(discount.map(|d| d.percentage().to_string())),
        ),
        (
            products::DISCOUNT_START,
            Value::Timestamp(discount.map(Discount::start)),
        ),
        (
            products::DISCOUNT_END,
            Value::Timestamp(discount.map(Discount::end)),
        ),
    ]
}

fn corrupt(product_id: &str, what: impl std::fmt::Display) -> CatalogError {
    CatalogError::CorruptRecord(format!("product {product_id}: {what}"))
}

impl ProductRecord {
    /// Flattens a product for storage.
    pub fn from_product(product: &Product) -> Result<Self> {
        let (numerator, denominator) = price_parts(product.base_price())?;
        let discount = product.discount();

        Ok(Self {
            product_id: product.product_id().to_string(),
            name: product.name().to_string(),
            description: product.description().to_string(),
            category: product.category().to_string(),
            base_price_numerator: numerator,
            base_price_denominator: denominator,
            discount_percent: discount.map(|d| d.percentage().to_string()),
            discount_start: discount.map(Discount::start),
            discount_end: discount.map(Discount::end),
            status: product.status().as_str().to_string(),
            created_at: product.created_at(),
            updated_at: product.updated_at(),
            archived_at: product.archived_at(),
        })
    }

    /// Reads a record from a stored row.
    pub fn from_row(row: &Row) -> Result<Self> {
        let product_id = row
            .text(products::PRODUCT_ID)
            .ok_or_else(|| CatalogError::CorruptRecord("product row without id".to_string()))?
            .to_string();

        let text = |column: &str| {
            row.text(column)
                .map(str::to_string)
                .ok_or_else(|| corrupt(&product_id, format!("missing {column}")))
        };
        let int = |column: &str| {
            row.int(column)
                .ok_or_else(|| corrupt(&product_id, format!("missing {column}")))
        };
        let timestamp = |column: &str| {
            row.timestamp(column)
                .ok_or_else(|| corrupt(&product_id, format!("missing {column}")))
        };

        Ok(Self {
            name: text(products::NAME)?,
            description: row
                .text(products::DESCRIPTION)
                .unwrap_or_default()
                .to_string(),
            category: text(products::CATEGORY)?,
            base_price_numerator: int(products::BASE_PRICE_NUMERATOR)?,
            base_price_denominator: int(products::BASE_PRICE_DENOMINATOR)?,
            discount_percent: row.text(products::DISCOUNT_PERCENT).map(str::to_string),
            discount_start: row.timestamp(products::DISCOUNT_START),
            discount_end: row.timestamp(products::DISCOUNT_END),
            status: text(products::STATUS)?,
            created_at: timestamp(products::CREATED_AT)?,
            updated_at: timestamp(products::UPDATED_AT)?,
            archived_at: row.timestamp(products::ARCHIVED_AT),
            product_id,
        })
    }

    /// Rebuilds the aggregate, with no pending changes.
    pub fn into_product(self) -> Result<Product> {
        let status: ProductStatus = self
            .status
            .parse()
            .map_err(|e| corrupt(&self.product_id, e))?;

        let discount = match (self.discount_percent, self.discount_start, self.discount_end) {
            (Some(percent), Some(start), Some(end)) => {
                let percentage: BigRational = percent
                    .parse()
                    .map_err(|_| corrupt(&self.product_id, format!("bad discount {percent}")))?;
                let discount = Discount::new(percentage, start, end)
                    .map_err(|e| corrupt(&self.product_id, e))?;
                Some(discount)
            }
            (None, None, None) => None,
            _ => return Err(corrupt(&self.product_id, "partial discount")),
        };

        Ok(Product::reconstruct(StoredProduct {
            id: ProductId::new(self.product_id),
            name: self.name,
            description: self.description,
            category: self.category,
            base_price: Money::new(self.base_price_numerator, self.base_price_denominator),
            discount,
            status,
            created_at: self.created_at,
            updated_at: self.updated_at,
            archived_at: self.archived_at,
        }))
    }

    /// Returns every column except the key, as written by an insert.
    fn into_values(self) -> Vec<(&'static str, Value)> {
        vec![
            (products::NAME, Value::from(self.name)),
            (products::DESCRIPTION, Value::from(self.description)),
            (products::CATEGORY, Value::from(self.category)),
            (
                products::BASE_PRICE_NUMERATOR,
                Value::from(self.base_price_numerator),
            ),
            (
                products::BASE_PRICE_DENOMINATOR,
                Value::from(self.base_price_denominator),
            ),
            (products::DISCOUNT_PERCENT, Value::Text(self.discount_percent)),
            (products::DISCOUNT_START, Value::Timestamp(self.discount_start)),
            (products::DISCOUNT_END, Value::Timestamp(self.discount_end)),
            (products::STATUS, Value::from(self.status)),
            (products::CREATED_AT, Value::from(self.created_at)),
            (products::UPDATED_AT, Value::from(self.updated_at)),
            (products::ARCHIVED_AT, Value::Timestamp(self.archived_at)),
        ]
    }
}

/// Builds the insert for a new product. Always present.
pub fn insert_mutation(product: &Product) -> Result<Mutation> {
    let record = ProductRecord::from_product(product)?;
    let key = record.product_id.clone();
    Ok(Mutation::insert(
        products::TABLE,
        products::PRODUCT_ID,
        key,
        record.into_values(),
    ))
}

/// Builds a partial update of the product's dirty columns plus `updated_at`.
///
/// Returns `None` when nothing is dirty.
pub fn update_mutation(product: &Product) -> Result<Option<Mutation>> {
    let changes = product.changes();
    if !changes.has_changes() {
        return Ok(None);
    }

    let mut values = Vec::new();
    for field in changes.dirty_fields() {
        match field {
            Field::Name => values.push((products::NAME, Value::from(product.name()))),
            Field::Description => {
                values.push((products::DESCRIPTION, Value::from(product.description())))
            }
            Field::Category => values.push((products::CATEGORY, Value::from(product.category()))),
            Field::BasePrice => {
                let (numerator, denominator) = price_parts(product.base_price())?;
                values.push((products::BASE_PRICE_NUMERATOR, Value::from(numerator)));
                values.push((products::BASE_PRICE_DENOMINATOR, Value::from(denominator)));
            }
            Field::Discount => values.extend(discount_values(product.discount())),
            Field::Status => {
                values.push((products::STATUS, Value::from(product.status().as_str())));
                if product.is_archived() {
                    values.push((
                        products::ARCHIVED_AT,
                        Value::Timestamp(product.archived_at()),
                    ));
                }
            }
        }
    }
    values.push((products::UPDATED_AT, Value::from(product.updated_at())));

    Ok(Some(Mutation::update(
        products::TABLE,
        products::PRODUCT_ID,
        product.product_id().as_str(),
        values,
    )))
}

/// Builds the update that archives a product.
pub fn archive_mutation(product: &Product) -> Mutation {
    Mutation::update(
        products::TABLE,
        products::PRODUCT_ID,
        product.product_id().as_str(),
        vec![
            (products::STATUS, Value::from(product.status().as_str())),
            (products::UPDATED_AT, Value::from(product.updated_at())),
            (
                products::ARCHIVED_AT,
                Value::Timestamp(product.archived_at()),
            ),
        ],
    )
}

/// Loads products and turns them into mutations.
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// Loads a product, failing with `NotFound` if it does not exist.
    async fn find_by_id(&self, product_id: &ProductId) -> Result<Product>;

    /// Returns the insert for a new product.
    fn insert_mut(&self, product: &Product) -> Result<Mutation> {
        insert_mutation(product)
    }

    /// Returns the partial update for a loaded product, if anything changed.
    fn update_mut(&self, product: &Product) -> Result<Option<Mutation>> {
        update_mutation(product)
    }

    /// Returns the status update for an archived product.
    fn archive_mut(&self, product: &Product) -> Result<Mutation> {
        Ok(archive_mutation(product))
    }
}
