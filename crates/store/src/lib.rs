//! Write planning and atomic commit for the transactional outbox.
//!
//! A [`WritePlan`] collects [`Mutation`]s produced by repositories. A
//! [`Committer`] applies a whole plan in one transaction: every mutation
//! lands, or none does.

pub mod committer;
pub mod error;
pub mod memory;
pub mod mutation;
pub mod plan;
pub mod postgres;
pub mod schema;
pub mod value;

pub use committer::Committer;
pub use error::{Result, StoreError};
pub use memory::InMemoryDatabase;
pub use mutation::{Mutation, MutationOp};
pub use plan::WritePlan;
pub use postgres::PostgresCommitter;
pub use schema::OutboxStatus;
pub use value::{Row, Value};
