use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::{
    Result, StoreError,
    committer::{Committer, record_commit},
    mutation::{Mutation, MutationOp},
    plan::WritePlan,
    value::Row,
};

type Tables = HashMap<&'static str, BTreeMap<String, Row>>;

/// Prior state of one row touched by a plan: its table, key, and the row as it
/// was before the mutation (`None` if it did not exist).
type UndoEntry = (&'static str, String, Option<Row>);

/// In-memory database for tests and local runs.
///
/// A plan is applied in place while the write lock is held. Each mutation
/// records the row it replaced; if a later mutation fails, the log is
/// replayed in reverse before the lock is released, so readers never see a
/// partial commit.
#[derive(Clone, Default)]
pub struct InMemoryDatabase {
    tables: Arc<RwLock<Tables>>,
    transactions: Arc<AtomicU64>,
    fail_next_commit: Arc<AtomicBool>,
}

impl InMemoryDatabase {
    /// Creates a new empty database.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of transactions opened so far.
    pub fn transaction_count(&self) -> u64 {
        self.transactions.load(Ordering::SeqCst)
    }

    /// Makes the next non-empty commit fail after its transaction opened.
    pub fn fail_next_commit(&self) {
        self.fail_next_commit.store(true, Ordering::SeqCst);
    }

    /// Reads one row by key.
    pub async fn read_row(&self, table: &str, key: &str) -> Option<Row> {
        let tables = self.tables.read().await;
        tables.get(table).and_then(|rows| rows.get(key)).cloned()
    }

    /// Returns every row of `table` in key order.
    pub async fn rows(&self, table: &str) -> Vec<Row> {
        let tables = self.tables.read().await;
        tables
            .get(table)
            .map(|rows| rows.values().cloned().collect())
            .unwrap_or_default()
    }

    /// Returns the number of rows in `table`.
    pub async fn row_count(&self, table: &str) -> usize {
        let tables = self.tables.read().await;
        tables.get(table).map(BTreeMap::len).unwrap_or(0)
    }

    /// Clears all tables.
    pub async fn clear(&self) {
        self.tables.write().await.clear();
    }

    fn apply_mutation(tables: &mut Tables, mutation: &Mutation) -> Result<UndoEntry> {
        let table = mutation.table();
        let key = mutation.key().to_string();
        let rows = tables.entry(table).or_default();

        match mutation.op() {
            MutationOp::Insert => {
                if rows.contains_key(&key) {
                    return Err(StoreError::DuplicateKey { table, key });
                }
                let mut row = Row::new();
                row.set(mutation.key_column(), mutation.key().clone());
                for (column, value) in mutation.values() {
                    row.set(*column, value.clone());
                }
                rows.insert(key.clone(), row);
                Ok((table, key, None))
            }
            MutationOp::Update => {
                if mutation.values().is_empty() {
                    return Err(StoreError::EmptyUpdate { table, key });
                }
                let Some(row) = rows.get_mut(&key) else {
                    return Err(StoreError::RowNotFound { table, key });
                };
                let previous = row.clone();
                for (column, value) in mutation.values() {
                    row.set(*column, value.clone());
                }
                Ok((table, key, Some(previous)))
            }
        }
    }

    fn roll_back(tables: &mut Tables, undo: Vec<UndoEntry>) {
        for (table, key, previous) in undo.into_iter().rev() {
            let rows = tables.entry(table).or_default();
            match previous {
                Some(row) => {
                    rows.insert(key, row);
                }
                None => {
                    rows.remove(&key);
                }
            }
        }
    }
}

#[async_trait]
impl Committer for InMemoryDatabase {
    #[tracing::instrument(skip(self, plan), fields(mutations = plan.count()))]
    async fn apply(&self, plan: &WritePlan) -> Result<()> {
        if plan.is_empty() {
            return Ok(());
        }

        let mut tables = self.tables.write().await;
        self.transactions.fetch_add(1, Ordering::SeqCst);

        if self.fail_next_commit.swap(false, Ordering::SeqCst) {
            record_commit(plan.count(), false);
            tracing::warn!("Injected commit failure");
            return Err(StoreError::CommitFailed(
                "injected commit failure".to_string(),
            ));
        }

        let mut undo = Vec::with_capacity(plan.count());
        for mutation in plan {
            match Self::apply_mutation(&mut tables, mutation) {
                Ok(entry) => undo.push(entry),
                Err(e) => {
                    Self::roll_back(&mut tables, undo);
                    record_commit(plan.count(), false);
                    tracing::warn!(error = %e, "Commit rolled back");
                    return Err(e);
                }
            }
        }

        record_commit(plan.count(), true);
        tracing::debug!("Plan committed");
        Ok(())
    }
}
