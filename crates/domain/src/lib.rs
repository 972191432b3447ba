//! Domain layer for the product catalog.
//!
//! This crate provides:
//! - `Money` and `Discount` value objects with exact rational arithmetic
//! - `ChangeTracker` for minimal partial updates
//! - the `Product` aggregate with its lifecycle state machine
//! - `ProductEvent`, the closed family of events the aggregate emits
//! - pricing helpers built on the above

pub mod aggregate;
pub mod change_tracker;
pub mod discount;
pub mod error;
pub mod money;
pub mod pricing;
pub mod product;

pub use aggregate::{AggregateRoot, DomainEvent};
pub use change_tracker::{ChangeTracker, Field, FieldSet};
pub use discount::Discount;
pub use error::ProductError;
pub use money::{Money, rational};
pub use product::{
    DiscountAppliedData, Product, ProductCreatedData, ProductEvent, ProductEventKind,
    ProductStatus, ProductUpdatedData, StoredProduct, UnknownStatus,
};

pub use num_rational::BigRational;
