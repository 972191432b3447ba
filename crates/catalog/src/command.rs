//! Catalog commands and their input checks.
//!
//! `validate` runs before anything is loaded or planned, so malformed input
//! never reaches the store.

use chrono::{DateTime, Utc};
use common::ProductId;
use domain::{BigRational, Discount, Money, Product, ProductError, ProductEvent};

/// Result of command execution.
#[derive(Debug)]
pub struct CommandResult {
    /// The product after the command, with no pending changes.
    pub product: Product,

    /// The events that were committed to the outbox.
    pub events: Vec<ProductEvent>,
}

impl CommandResult {
    pub fn product_id(&self) -> &ProductId {
        self.product.product_id()
    }
}

fn require_id(product_id: &ProductId) -> Result<(), ProductError> {
    if product_id.is_blank() {
        return Err(ProductError::InvalidId);
    }
    Ok(())
}

fn require_text(value: &str, error: ProductError) -> Result<(), ProductError> {
    if value.trim().is_empty() {
        return Err(error);
    }
    Ok(())
}

/// Command to create a new draft product.
#[derive(Debug, Clone)]
pub struct CreateProduct {
    pub product_id: ProductId,
    pub name: String,
    pub description: String,
    pub category: String,
    pub base_price: Money,
}

impl CreateProduct {
    /// Creates a CreateProduct command with a generated product ID.
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        category: impl Into<String>,
        base_price: Money,
    ) -> Self {
        Self {
            product_id: ProductId::generate(),
            name: name.into(),
            description: description.into(),
            category: category.into(),
            base_price,
        }
    }

    /// Uses the given ID instead of a generated one.
    pub fn with_id(mut self, product_id: impl Into<ProductId>) -> Self {
        self.product_id = product_id.into();
        self
    }

    pub fn validate(&self) -> Result<(), ProductError> {
        require_id(&self.product_id)?;
        require_text(&self.name, ProductError::InvalidProductName)?;
        require_text(&self.category, ProductError::InvalidProductCategory)?;
        if !self.base_price.is_positive() {
            return Err(ProductError::InvalidBasePrice);
        }
        Ok(())
    }
}

/// Command to change a product's name, description and category.
#[derive(Debug, Clone)]
pub struct UpdateProduct {
    pub product_id: ProductId,
    pub name: String,
    pub description: String,
    pub category: String,
}

impl UpdateProduct {
    pub fn new(
        product_id: impl Into<ProductId>,
        name: impl Into<String>,
        description: impl Into<String>,
        category: impl Into<String>,
    ) -> Self {
        Self {
            product_id: product_id.into(),
            name: name.into(),
            description: description.into(),
            category: category.into(),
        }
    }

    pub fn validate(&self) -> Result<(), ProductError> {
        require_id(&self.product_id)?;
        require_text(&self.name, ProductError::InvalidProductName)?;
        require_text(&self.category, ProductError::InvalidProductCategory)
    }
}

/// Command to apply a percentage discount over `[start, end)`.
#[derive(Debug, Clone)]
pub struct ApplyDiscount {
    pub product_id: ProductId,
    /// Percentage off, 20 meaning 20%.
    pub percentage: BigRational,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl ApplyDiscount {
    pub fn new(
        product_id: impl Into<ProductId>,
        percentage: BigRational,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Self {
        Self {
            product_id: product_id.into(),
            percentage,
            start,
            end,
        }
    }

    pub fn validate(&self) -> Result<(), ProductError> {
        require_id(&self.product_id)?;
        self.discount().map(|_| ())
    }

    /// Builds the discount value object.
    pub fn discount(&self) -> Result<Discount, ProductError> {
        Discount::new(self.percentage.clone(), self.start, self.end)
    }
}

macro_rules! id_command {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Debug, Clone)]
        pub struct $name {
            pub product_id: ProductId,
        }

        impl $name {
            pub fn new(product_id: impl Into<ProductId>) -> Self {
                Self {
                    product_id: product_id.into(),
                }
            }

            pub fn validate(&self) -> Result<(), ProductError> {
                require_id(&self.product_id)
            }
        }
    };
}

id_command!(
    /// Command to put a product on sale.
    ActivateProduct
);
id_command!(
    /// Command to withdraw a product from sale.
    DeactivateProduct
);
id_command!(
    /// Command to soft-delete a product.
    ArchiveProduct
);
id_command!(
    /// Command to clear a product's discount.
    RemoveDiscount
);
