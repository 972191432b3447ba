//! Unit-of-work collection of mutations.

use crate::mutation::Mutation;

/// An ordered batch of mutations awaiting one atomic commit.
///
/// Adding `None` is a no-op, so translators that may have nothing to write
/// can be fed straight in.
#[derive(Debug, Clone, Default)]
pub struct WritePlan {
    mutations: Vec<Mutation>,
}

impl WritePlan {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a mutation, ignoring `None`.
    pub fn add(&mut self, mutation: impl Into<Option<Mutation>>) {
        if let Some(mutation) = mutation.into() {
            self.mutations.push(mutation);
        }
    }

    /// Appends every present mutation in order.
    pub fn add_all<I, M>(&mut self, mutations: I)
    where
        I: IntoIterator<Item = M>,
        M: Into<Option<Mutation>>,
    {
        for mutation in mutations {
            self.add(mutation);
        }
    }

    pub fn mutations(&self) -> &[Mutation] {
        &self.mutations
    }

    pub fn count(&self) -> usize {
        self.mutations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mutations.is_empty()
    }

    pub fn clear(&mut self) {
        self.mutations.clear();
    }
}

impl<'a> IntoIterator for &'a WritePlan {
    type Item = &'a Mutation;
    type IntoIter = std::slice::Iter<'a, Mutation>;

    fn into_iter(self) -> Self::IntoIter {
        self.mutations.iter()
    }
}

impl FromIterator<Mutation> for WritePlan {
    fn from_iter<I: IntoIterator<Item = Mutation>>(iter: I) -> Self {
        Self {
            mutations: iter.into_iter().collect(),
        }
    }
}
