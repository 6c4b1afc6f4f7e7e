//! Learning rate based branching heuristic

use crate::{
    clause::alloc::{Allocator, ClauseId},
    config::LrbConfig,
    datastructure::{heap::VarHeap, LitVec, VarVec},
    literal::{Lit, Var},
};
use ordered_float::NotNan;
use std::collections::HashSet;

const EMA_INITIAL: f64 = 1e-10;

/// Branches on the variable with the highest exponential moving average of
/// its learning rate, the fraction of conflicts a variable participated in
/// while it was assigned. Includes the reason side rate and locality
/// extensions.
#[derive(Debug, Clone)]
pub(crate) struct Lrb {
    /// Unassigned variables ordered by their learning rate estimate.
    ema: VarHeap<NotNan<f64>>,
    /// Occurrence counts used to pick a polarity for fresh variables.
    base: LitVec<f64>,
    /// The polarity each variable had when it was last unassigned.
    phase: VarVec<Option<Lit>>,
    /// Value of `learnt_counter` when the variable was assigned.
    assigned_at: VarVec<u64>,
    /// Conflicts the variable participated in since it was assigned.
    participated: VarVec<f64>,
    /// Conflicts the variable was a reason for since it was assigned.
    reasoned: VarVec<f64>,
    learnt_counter: u64,
    alpha: f64,
    beta: f64,
    config: LrbConfig,
}

impl Lrb {
    pub(crate) fn new(config: LrbConfig, var_count: usize, seeds: &LitVec<f64>) -> Self {
        let mut ema = VarHeap::default();
        ema.set_var_count(var_count);
        let mut phase = VarVec::default();
        phase.set_var_count(var_count);
        let mut assigned_at = VarVec::default();
        assigned_at.set_var_count(var_count);
        let mut participated = VarVec::default();
        participated.set_var_count(var_count);
        let mut reasoned = VarVec::default();
        reasoned.set_var_count(var_count);
        for idx in 0..var_count {
            let var = Var::from_index(idx.try_into().unwrap());
            ema.add_and_set(var, NotNan::new(EMA_INITIAL).unwrap());
        }
        Self {
            ema,
            base: seeds.clone(),
            phase,
            assigned_at,
            participated,
            reasoned,
            learnt_counter: 1,
            alpha: config.alpha,
            beta: 1.0 - config.alpha,
            config,
        }
    }

    pub(crate) fn decide(&self) -> Lit {
        let var = self.ema.peek().expect("an unassigned variable exists");
        self.phase[var].unwrap_or_else(|| {
            if self.base[var.positive()] > self.base[var.negative()] {
                var.positive()
            } else {
                var.negative()
            }
        })
    }

    pub(crate) fn on_assign(&mut self, lit: Lit) {
        let var = lit.var();
        self.assigned_at[var] = self.learnt_counter;
        self.participated[var] = 0.0;
        self.reasoned[var] = 0.0;
        self.ema.remove(var);
    }

    pub(crate) fn on_unassign(&mut self, lit: Lit) {
        let var = lit.var();
        self.phase[var] = Some(lit);
        let interval = self.learnt_counter - self.assigned_at[var];
        if interval > 0 {
            let interval = interval as f64;
            let reward = self.participated[var] / interval;
            let reason_rate = self.reasoned[var] / interval;
            self.ema.update_value(var, |old| {
                NotNan::new(self.beta * old.into_inner() + self.alpha * (reward + reason_rate))
                    .unwrap()
            });
        }
        self.ema.add(var);
    }

    pub(crate) fn update_scores(
        &mut self,
        learned: &[Lit],
        conflict: &[Lit],
        reasons: &[ClauseId],
        alloc: &Allocator,
    ) {
        self.learnt_counter += 1;
        let mut clause_vars = HashSet::new();
        for &lit in learned {
            let var = lit.var();
            self.participated[var] += 1.0;
            // the reason side rate must not count the learned literals
            self.reasoned[var] -= 1.0;
            clause_vars.insert(var);
        }
        for &lit in conflict {
            if !clause_vars.contains(&lit.var()) {
                self.participated[lit.var()] += 1.0;
            }
        }
        if self.alpha > self.config.alpha_min {
            self.alpha -= self.config.alpha_step;
        }
        for &id in reasons {
            for &lit in alloc[id].lits() {
                if clause_vars.insert(lit.var()) {
                    self.reasoned[lit.var()] += 1.0;
                }
            }
        }
        // locality extension, only unassigned variables decay
        self.ema
            .rescale_contained(NotNan::new(self.config.locality_decay).unwrap());
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn seeds(var_count: usize) -> LitVec<f64> {
        let mut seeds = LitVec::default();
        seeds.set_var_count(var_count);
        for idx in 0..var_count {
            let var = Var::from_index(idx.try_into().unwrap());
            seeds[var.positive()] = 1.0;
            seeds[var.negative()] = 1.0;
        }
        seeds
    }

    fn lit(l: i32) -> Lit {
        Lit::from_dimacs(l)
    }

    #[test]
    fn fresh_variables_follow_the_occurrence_counts() {
        let mut skewed = seeds(1);
        skewed[lit(1)] = 3.0;
        let lrb = Lrb::new(LrbConfig::default(), 1, &skewed);
        assert_eq!(lrb.decide(), lit(1));

        // ties fall back to the negative polarity
        let lrb = Lrb::new(LrbConfig::default(), 1, &seeds(1));
        assert_eq!(lrb.decide(), lit(-1));
    }

    #[test]
    fn saved_phases_override_the_occurrence_counts() {
        let mut skewed = seeds(1);
        skewed[lit(1)] = 3.0;
        let mut lrb = Lrb::new(LrbConfig::default(), 1, &skewed);

        lrb.on_assign(lit(-1));
        lrb.on_unassign(lit(-1));
        assert_eq!(lrb.decide(), lit(-1));
    }

    #[test]
    fn participation_raises_the_learning_rate() {
        let mut lrb = Lrb::new(LrbConfig::default(), 2, &seeds(2));
        let alloc = Allocator::default();

        lrb.on_assign(lit(1));
        lrb.on_assign(lit(2));
        // var 1 is on the conflict side, var 2 only in the learned clause
        // where the reason side rate cancels the participation
        lrb.update_scores(&[lit(2)], &[lit(1)], &[], &alloc);
        lrb.on_unassign(lit(1));
        lrb.on_unassign(lit(2));

        assert_eq!(lrb.ema.peek(), Some(lit(1).var()));
        assert!(lrb.ema.get_value(lit(1).var()) > lrb.ema.get_value(lit(2).var()));
    }

    #[test]
    fn reasons_raise_the_learning_rate() {
        let mut lrb = Lrb::new(LrbConfig::default(), 3, &seeds(3));
        let mut alloc = Allocator::default();
        let reason = alloc.add(&[lit(1), lit(-3)]);

        lrb.on_assign(lit(1));
        lrb.on_assign(lit(2));
        lrb.on_assign(lit(-3));
        lrb.update_scores(&[lit(2)], &[], &[reason], &alloc);
        lrb.on_unassign(lit(-3));
        lrb.on_unassign(lit(2));
        lrb.on_unassign(lit(1));

        assert!(lrb.ema.get_value(lit(1).var()) > lrb.ema.get_value(lit(2).var()));
        assert!(lrb.ema.get_value(lit(3).var()) > lrb.ema.get_value(lit(2).var()));
    }

    #[test]
    fn quick_unassignments_keep_the_estimate() {
        let mut lrb = Lrb::new(LrbConfig::default(), 2, &seeds(2));

        lrb.on_assign(lit(1));
        lrb.on_unassign(lit(1));

        assert_eq!(
            lrb.ema.get_value(lit(1).var()),
            lrb.ema.get_value(lit(2).var())
        );
    }
}
