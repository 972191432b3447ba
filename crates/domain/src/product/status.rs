//! Product lifecycle state machine.

use std::str::FromStr;

use thiserror::Error;

/// The lifecycle status of a product.
///
/// State transitions:
/// ```text
/// Draft ──► Active ◄──► Inactive
///   │         │            │
///   └─────────┴────────────┴──► Archived
/// ```
///
/// Archived is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ProductStatus {
    /// Newly created, not yet for sale.
    #[default]
    Draft,

    /// Available for sale; discounts may be applied.
    Active,

    /// Temporarily withdrawn from sale.
    Inactive,

    /// Soft-deleted (terminal state).
    Archived,
}

impl ProductStatus {
    /// Returns true if the product can be activated from this status.
    pub fn can_activate(&self) -> bool {
        matches!(self, ProductStatus::Draft | ProductStatus::Inactive)
    }

    /// Returns true if the product can be deactivated from this status.
    pub fn can_deactivate(&self) -> bool {
        matches!(self, ProductStatus::Active)
    }

    /// Returns true if the product can be archived from this status.
    pub fn can_archive(&self) -> bool {
        !self.is_terminal()
    }

    pub fn can_apply_discount(&self) -> bool {
        matches!(self, ProductStatus::Active)
    }

    /// Returns true if this is a terminal state (no further transitions possible).
    pub fn is_terminal(&self) -> bool {
        matches!(self, ProductStatus::Archived)
    }

    /// Returns the storage form of the status.
    pub fn as_str(&self) -> &'static str {
        match self {
            ProductStatus::Draft => "draft",
            ProductStatus::Active => "active",
            ProductStatus::Inactive => "inactive",
            ProductStatus::Archived => "archived",
        }
    }
}

impl std::fmt::Display for ProductStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A status string that names no known status.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown product status: {0}")]
pub struct UnknownStatus(pub String);

impl FromStr for ProductStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(ProductStatus::Draft),
            "active" => Ok(ProductStatus::Active),
            "inactive" => Ok(ProductStatus::Inactive),
            "archived" => Ok(ProductStatus::Archived),
            other => Err(UnknownStatus(other.to_string())),
        }
    }
}
