//! Product catalog use cases.
//!
//! Each command loads a [`Product`](domain::Product), runs one business
//! method, and commits the resulting state change together with its outbox
//! events through a single [`WritePlan`](store::WritePlan).

pub mod command;
pub mod config;
pub mod error;
pub mod outbox;
pub mod repository;
pub mod service;
pub mod telemetry;

pub use command::{
    ActivateProduct, ApplyDiscount, ArchiveProduct, CommandResult, CreateProduct,
    DeactivateProduct, RemoveDiscount, UpdateProduct,
};
pub use config::Config;
pub use error::{CatalogError, Result};
pub use outbox::{OutboxEvent, OutboxRepo, OutboxRepository};
pub use repository::{
    InMemoryProductRepository, PostgresProductRepository, ProductRecord, ProductRepository,
};
pub use service::ProductService;
