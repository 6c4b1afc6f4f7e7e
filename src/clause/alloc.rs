//! Clause allocator
//!
//! Clauses are handed out by stable id and never move. Deleting a clause
//! only detaches it from the solver's indices, the slot stays valid so that
//! antecedent references and subsumption redirects keep working.

use super::Clause;
use crate::literal::Lit;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub(crate) struct ClauseId(usize);

impl ClauseId {
    pub(crate) fn as_index(self) -> usize {
        self.0
    }

    #[cfg(test)]
    pub(crate) fn from_index(index: usize) -> Self {
        ClauseId(index)
    }
}

#[derive(Debug, Clone, Default)]
pub(crate) struct Allocator {
    clauses: Vec<Clause>,
}

impl Allocator {
    pub(crate) fn reserve(&mut self, num_clauses: usize) {
        self.clauses.reserve(num_clauses);
    }

    /// The number of slots handed out so far, deleted clauses included.
    pub(crate) fn len(&self) -> usize {
        self.clauses.len()
    }

    pub(crate) fn add(&mut self, clause: &[Lit]) -> ClauseId {
        let clause = Clause::new(clause);
        let idx = self.clauses.len();
        self.clauses.push(clause);
        ClauseId(idx)
    }

    /// Follows subsumption redirects to the clause that replaced `id`.
    pub(crate) fn follow(&self, id: ClauseId) -> ClauseId {
        let mut id = id;
        let mut hops = 0;
        while let Some(next) = self.clauses[id.0].subsumed_by() {
            id = next;
            hops += 1;
            debug_assert!(hops <= self.clauses.len(), "subsumption redirects form a cycle");
        }
        id
    }
}

impl std::ops::Index<ClauseId> for Allocator {
    type Output = Clause;

    fn index(&self, index: ClauseId) -> &Self::Output {
        &self.clauses[index.0]
    }
}

impl std::ops::IndexMut<ClauseId> for Allocator {
    fn index_mut(&mut self, index: ClauseId) -> &mut Self::Output {
        &mut self.clauses[index.0]
    }
}
