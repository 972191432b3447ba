use async_trait::async_trait;

use crate::{Result, mutation::Mutation, plan::WritePlan};

/// Applies write plans atomically.
///
/// Implementations open exactly one transaction per non-empty plan and apply
/// its mutations in order. Either every mutation lands or none does; the
/// error is returned unchanged and nothing is retried.
#[async_trait]
pub trait Committer: Send + Sync {
    /// Commits every mutation in `plan`.
    ///
    /// An empty plan succeeds without opening a transaction.
    async fn apply(&self, plan: &WritePlan) -> Result<()>;

    /// Commits a loose list of mutations as one plan.
    async fn apply_mutations(&self, mutations: Vec<Mutation>) -> Result<()> {
        let plan: WritePlan = mutations.into_iter().collect();
        self.apply(&plan).await
    }
}

pub(crate) fn record_commit(mutations: usize, succeeded: bool) {
    if succeeded {
        metrics::counter!("store_commits_total").increment(1);
        metrics::histogram!("store_commit_mutations").record(mutations as f64);
    } else {
        metrics::counter!("store_commit_failures_total").increment(1);
    }
}
