//! Domain error types.

use thiserror::Error;

/// Business rule violations raised by the product aggregate and its value
/// objects.
///
/// Input-validation variants are raised before anything is mutated;
/// state-precondition variants leave the aggregate exactly as it was.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProductError {
    /// Product id is blank.
    #[error("invalid ID")]
    InvalidId,

    /// Product name is blank.
    #[error("invalid product name")]
    InvalidProductName,

    /// Product category is blank.
    #[error("invalid product category")]
    InvalidProductCategory,

    /// Base price is zero, negative, or cannot be stored.
    #[error("base price must be positive")]
    InvalidBasePrice,

    /// The operation requires an active product.
    #[error("product is not active")]
    ProductNotActive,

    /// Archived products accept no further changes.
    #[error("product is archived")]
    ProductArchived,

    #[error("product is already active")]
    ProductAlreadyActive,

    #[error("product is already inactive")]
    ProductAlreadyInactive,

    /// Discount percentage is outside (0, 100].
    #[error("discount percentage must be between 0 and 100")]
    InvalidDiscountPercentage,

    /// Discount end is not after its start, or the discount already expired.
    #[error("discount end date must be after start date")]
    InvalidDiscountPeriod,

    #[error("product has no discount to remove")]
    NoDiscountToRemove,
}

impl ProductError {
    /// Returns true for errors caused by malformed input rather than by the
    /// product's current state.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            ProductError::InvalidId
                | ProductError::InvalidProductName
                | ProductError::InvalidProductCategory
                | ProductError::InvalidBasePrice
                | ProductError::InvalidDiscountPercentage
                | ProductError::InvalidDiscountPeriod
        )
    }
}
