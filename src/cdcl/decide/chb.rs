//! Conflict history based branching heuristic

use crate::{
    cdcl::propagation::trail::Trail,
    clause::alloc::{Allocator, ClauseId},
    config::ChbConfig,
    datastructure::{heap::LitHeap, LitVec},
    literal::{Lit, Var},
};
use ordered_float::NotNan;

const SCORE_INITIAL: f64 = 1e-3;

/// Branches on the literal with the highest exponential moving average of a
/// reward that favors literals involved in recent conflicts.
#[derive(Debug, Clone)]
pub(crate) struct Chb {
    /// Unassigned literals ordered by their reward estimate.
    heap: LitHeap<NotNan<f64>>,
    /// Conflict count at the time the literal last appeared in a reason.
    last_conflict: LitVec<u64>,
    conflicts: u64,
    step: f64,
    config: ChbConfig,
}

impl Chb {
    pub(crate) fn new(config: ChbConfig, var_count: usize) -> Self {
        let mut heap = LitHeap::default();
        heap.set_var_count(var_count);
        let mut last_conflict = LitVec::default();
        last_conflict.set_var_count(var_count);
        for idx in 0..var_count {
            let var = Var::from_index(idx.try_into().unwrap());
            for lit in [var.positive(), var.negative()] {
                heap.add_and_set(lit, NotNan::new(SCORE_INITIAL).unwrap());
            }
        }
        Self { heap, last_conflict, conflicts: 0, step: config.step, config }
    }

    pub(crate) fn decide(&self) -> Lit {
        self.heap.peek().expect("an unassigned literal exists")
    }

    pub(crate) fn on_assign(&mut self, lit: Lit) {
        self.heap.remove(lit);
        self.heap.remove(!lit);
    }

    pub(crate) fn on_unassign(&mut self, lit: Lit) {
        self.heap.add(lit);
        self.heap.add(!lit);
    }

    pub(crate) fn update_scores(
        &mut self,
        conflict: &[Lit],
        reasons: &[ClauseId],
        trail: &Trail,
        alloc: &Allocator,
    ) {
        self.conflicts += 1;
        for &lit in trail.iter() {
            let multiplier = if conflict.contains(&lit) { 0.9 } else { 1.0 };
            let reward = multiplier / ((self.conflicts - self.last_conflict[lit] + 1) as f64);
            self.heap.update_value(lit, |old| {
                NotNan::new((1.0 - self.step) * old.into_inner() + self.step * reward).unwrap()
            });
        }
        for &id in reasons {
            for &lit in alloc[id].lits() {
                self.last_conflict[lit] = self.conflicts;
            }
        }
        if self.step > self.config.step_min {
            self.step -= self.config.step_decay;
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn lit(l: i32) -> Lit {
        Lit::from_dimacs(l)
    }

    #[test]
    fn rewards_follow_the_trail() {
        let mut chb = Chb::new(ChbConfig::default(), 3);
        let alloc = Allocator::default();
        let mut trail = Trail::default();
        trail.add_decision(lit(1));
        trail.push(lit(-2));

        chb.update_scores(&[], &[], &trail, &alloc);

        assert!(chb.heap.get_value(lit(1)) > chb.heap.get_value(lit(3)));
        assert!(chb.heap.get_value(lit(-2)) > chb.heap.get_value(lit(2)));
    }

    #[test]
    fn literals_of_recent_reasons_earn_larger_rewards() {
        let mut chb = Chb::new(ChbConfig::default(), 2);
        let mut alloc = Allocator::default();
        let reason = alloc.add(&[lit(1)]);

        // literal 1 was a reason in the first conflict, literal 2 never was
        let empty = Trail::default();
        chb.update_scores(&[], &[reason], &empty, &alloc);

        let mut trail = Trail::default();
        trail.add_decision(lit(1));
        trail.push(lit(2));
        chb.update_scores(&[], &[], &trail, &alloc);

        assert_eq!(chb.decide(), lit(1));
        assert!(chb.heap.get_value(lit(1)) > chb.heap.get_value(lit(2)));
    }

    #[test]
    fn conflict_literals_are_damped() {
        let mut chb = Chb::new(ChbConfig::default(), 2);
        let alloc = Allocator::default();
        let mut trail = Trail::default();
        trail.add_decision(lit(1));
        trail.push(lit(2));

        chb.update_scores(&[lit(2)], &[], &trail, &alloc);

        assert!(chb.heap.get_value(lit(1)) > chb.heap.get_value(lit(2)));
    }
}
