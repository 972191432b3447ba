//! Opaque persistence mutations.

use crate::value::Value;

/// The kind of write a mutation performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationOp {
    /// Creates a row; fails if the key already exists.
    Insert,

    /// Writes the given columns of an existing row; fails if the row is missing.
    Update,
}

/// A single row write against one table.
///
/// Column names are static identifiers; only values are ever bound as
/// parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct Mutation {
    op: MutationOp,
    table: &'static str,
    key_column: &'static str,
    key: Value,
    values: Vec<(&'static str, Value)>,
}

impl Mutation {
    /// Creates an insert. The key column is written alongside `values`.
    pub fn insert(
        table: &'static str,
        key_column: &'static str,
        key: impl Into<Value>,
        values: Vec<(&'static str, Value)>,
    ) -> Self {
        Self {
            op: MutationOp::Insert,
            table,
            key_column,
            key: key.into(),
            values,
        }
    }

    /// Creates a partial update of the row identified by `key`.
    pub fn update(
        table: &'static str,
        key_column: &'static str,
        key: impl Into<Value>,
        values: Vec<(&'static str, Value)>,
    ) -> Self {
        Self {
            op: MutationOp::Update,
            table,
            key_column,
            key: key.into(),
            values,
        }
    }

    pub fn op(&self) -> MutationOp {
        self.op
    }

    pub fn table(&self) -> &'static str {
        self.table
    }

    pub fn key_column(&self) -> &'static str {
        self.key_column
    }

    pub fn key(&self) -> &Value {
        &self.key
    }

    /// Returns the written columns, excluding the key.
    pub fn values(&self) -> &[(&'static str, Value)] {
        &self.values
    }

    /// Returns the value written to `column`, if any.
    pub fn value(&self, column: &str) -> Option<&Value> {
        self.values
            .iter()
            .find(|(name, _)| *name == column)
            .map(|(_, value)| value)
    }

    /// Returns true if `column` is written by this mutation.
    pub fn writes(&self, column: &str) -> bool {
        self.value(column).is_some()
    }
}
