//! Unit clause propagation

use super::Solver;
use crate::literal::Lit;
use tracing::trace;

pub(crate) mod assignment;
pub(crate) mod trail;

impl Solver {
    /// Propagates all pending assignments. Returns `false` if a conflict was
    /// found, leaving the conflicting clause in `self.conflict`.
    pub(crate) fn bcp(&mut self) -> bool {
        self.trail.begin_propagation();
        while let Some(lit) = self.trail.next_lit_to_propagate() {
            if !self.propagate_lit(!lit) {
                return false;
            }
        }
        true
    }

    fn propagate_lit(&mut self, falsified: Lit) -> bool {
        // the watch list is mutated while scanning, iterate a snapshot
        let watchers = self.watches.watchers(falsified).to_vec();
        for id in watchers {
            if self.watches.is_satisfied(id, &self.assignment) {
                continue;
            }
            if self
                .watches
                .update(id, self.alloc[id].lits(), falsified, &self.assignment)
            {
                continue;
            }
            // both watches are falsified unless the other one saves the clause
            let other = self.watches.other_watch(id, falsified);
            match self.assignment.value(other) {
                None => {
                    trace!("propagate {other} due to {}", self.alloc[id]);
                    self.stats.propagations += 1;
                    self.assign(other, Some(id));
                }
                Some(false) => {
                    trace!("conflict in {}", self.alloc[id]);
                    self.conflict = Some(id);
                    return false;
                }
                Some(true) => debug_assert!(false, "satisfied clauses are skipped"),
            }
        }
        true
    }
}
