//! Product aggregate and related types.

mod aggregate;
mod events;
mod status;

pub use aggregate::{Product, StoredProduct};
pub use events::{
    DiscountAppliedData, ProductCreatedData, ProductEvent, ProductEventKind, ProductUpdatedData,
};
pub use status::{ProductStatus, UnknownStatus};
