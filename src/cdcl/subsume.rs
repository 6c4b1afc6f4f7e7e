//! On-the-fly subsumption of learned clauses

use crate::{clause::alloc::ClauseId, datastructure::LitVec, literal::Lit};
use std::collections::HashSet;

/// Occurrence index over the live clauses.
///
/// A freshly learned clause subsumes every clause that appears in the
/// occurrence sets of all of its literals.
#[derive(Debug, Clone)]
pub(crate) struct Subsumption {
    enabled: bool,
    appearance: LitVec<HashSet<ClauseId>>,
}

impl Subsumption {
    pub(crate) fn new(enabled: bool) -> Self {
        Self {
            enabled,
            appearance: LitVec::default(),
        }
    }

    pub(crate) fn set_var_count(&mut self, count: usize) {
        self.appearance.set_var_count(count);
    }

    /// Registers a clause without looking for subsumed clauses.
    pub(crate) fn insert(&mut self, id: ClauseId, lits: &[Lit]) {
        if !self.enabled {
            return;
        }
        for &lit in lits {
            self.appearance[lit].insert(id);
        }
    }

    /// Registers the learned clause `id` and returns the clauses it subsumes,
    /// in increasing id order.
    pub(crate) fn update_and_eliminate(&mut self, id: ClauseId, lits: &[Lit]) -> Vec<ClauseId> {
        if !self.enabled {
            return Vec::new();
        }
        debug_assert!(!lits.is_empty());
        let mut subsumed = self.appearance[lits[0]].clone();
        for &lit in lits {
            subsumed.retain(|c| self.appearance[lit].contains(c));
            self.appearance[lit].insert(id);
        }
        let mut subsumed: Vec<ClauseId> = subsumed.into_iter().collect();
        subsumed.sort_unstable();
        subsumed
    }

    pub(crate) fn remove(&mut self, id: ClauseId, lits: &[Lit]) {
        if !self.enabled {
            return;
        }
        for &lit in lits {
            self.appearance[lit].remove(&id);
        }
    }
}
