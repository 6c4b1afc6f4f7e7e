use crate::{
    cdcl::Solver,
    clause::{alloc::ClauseId, Clause},
    config::ConflictLits,
    literal::Lit,
};
use tracing::{debug, trace};

/// Scratch state of first unique implication point resolution.
///
/// Reused between conflicts so that the intermediate clause does not get
/// reallocated on every learning step.
#[derive(Debug, Clone)]
pub(crate) struct ConflictAnalysis {
    /// The clause under resolution, at the end the learned clause.
    clause: Clause,
    /// Trail literals whose antecedents were resolved into the clause.
    conflict_side: Vec<Lit>,
    /// Antecedents of the literals of the learned clause.
    reasons: Vec<ClauseId>,
}

impl Default for ConflictAnalysis {
    fn default() -> Self {
        ConflictAnalysis {
            clause: Clause::new(&[]),
            conflict_side: Vec::new(),
            reasons: Vec::new(),
        }
    }
}

impl ConflictAnalysis {
    fn reset(&mut self, conflict: &[Lit]) {
        self.clause = Clause::new(conflict);
        self.conflict_side.clear();
        self.reasons.clear();
    }
}

impl Solver {
    /// Resolves the pending conflict into a first unique implication point
    /// clause, learns it and backjumps to the level where it asserts.
    ///
    /// Sets `self.unsat` when the conflict does not depend on any decision.
    pub(crate) fn analyze(&mut self) {
        let conflict_id = self.conflict.take().expect("analysis follows a conflict");
        let d = self.alloc[conflict_id].deepest_level(&self.assignment);
        if d.is_root() {
            debug!("conflict {} under no decision", self.alloc[conflict_id]);
            self.unsat = true;
            return;
        }
        self.analysis.reset(self.alloc[conflict_id].lits());

        // Resolve trail literals into the clause, newest first, until a
        // single literal of the conflicting level remains.
        let mut idx = self.trail.len();
        while !self.analysis.clause.one_lit_at_level(d, &self.assignment) {
            idx -= 1;
            let lit = self.trail[idx];
            let Some(reason) = self.assignment.reason(lit.var()) else {
                continue;
            };
            let reason = self.alloc.follow(reason);
            self.alloc[reason].recompute_glue(&self.assignment);
            if !self.analysis.clause.contains(!lit) {
                continue;
            }
            trace!("resolve on {lit} with {}", self.alloc[reason]);
            self.analysis.clause.resolve(lit, self.alloc[reason].lits());
            self.analysis.conflict_side.push(lit);
        }

        let learned = self.alloc.add(self.analysis.clause.lits());
        self.stats.learned_clauses += 1;

        let victims = self
            .subsumption
            .update_and_eliminate(learned, self.alloc[learned].lits());
        if !victims.is_empty() {
            self.alloc[learned].mark_subsuming();
            for &victim in &victims {
                self.alloc[victim].set_subsumed_by(learned);
            }
            self.stats.subsumed_clauses += victims.len() as u64;
            self.eliminate_clauses(&victims);
        }

        self.alloc[learned].compute_glue(&self.assignment);
        self.clauses.push(learned);
        debug!("learned {}", self.alloc[learned]);

        // The deepest literal is the negated implication point. It must be
        // watched before backtracking invalidates the decision levels.
        let (asserting, second) = self.alloc[learned].deepest_literals(&self.assignment);
        if let Some(second) = second {
            self.watches.watch(learned, [asserting, second]);
        }
        self.restarter.update_glue(self.alloc[learned].glue());

        let lits = self.alloc[learned].lits();
        self.analysis.reasons.extend(
            lits.iter()
                .filter_map(|l| self.assignment.reason(l.var()))
                .map(|r| self.alloc.follow(r)),
        );
        let conflict_lits = match self.config.conflict_lits {
            ConflictLits::ConflictSide => self.analysis.conflict_side.as_slice(),
            ConflictLits::ConflictClause => self.alloc[conflict_id].lits(),
        };
        for decider in &mut self.deciders {
            decider.update_scores(
                lits,
                conflict_lits,
                &self.analysis.reasons,
                &self.trail,
                &self.alloc,
            );
        }

        let backjump = self.alloc[learned].second_deepest_level(&self.assignment);
        self.backtrack(backjump);
        self.assign(asserting, Some(learned));
    }
}

#[cfg(test)]
mod test {
    use crate::{
        cdcl::{propagation::trail::DecLvl, Solver},
        clause::alloc::ClauseId,
        config::SolverConfig,
        literal::Lit,
    };

    fn lit(l: i32) -> Lit {
        Lit::from_dimacs(l)
    }

    #[test]
    fn learns_the_first_unique_implication_point() {
        let cnf = cnf_formula![
            -1 2;
            -1 3;
            -2 -3 4;
            -4 5;
            -4 6;
            -5 -6;
        ];
        let mut solver = Solver::new(&cnf, SolverConfig::default());

        solver.assign(lit(1), None);
        assert!(!solver.bcp());
        solver.analyze();
        assert!(!solver.unsat);

        // resolution stops at variable 4, the learned unit asserts at root
        let learned = ClauseId::from_index(solver.alloc.len() - 1);
        assert_eq!(solver.alloc[learned].lits(), [lit(-4)]);
        assert_eq!(solver.trail.decision_level(), DecLvl::ROOT);
        assert_eq!(solver.assignment.value(lit(-4)), Some(true));
        assert_eq!(solver.assignment.reason(lit(4).var()), Some(learned));

        // the unit subsumes both clauses containing -4
        assert_eq!(solver.stats.learned_clauses, 1);
        assert_eq!(solver.stats.subsumed_clauses, 2);
        assert!(solver.alloc[learned].is_subsuming());
    }

    #[test]
    fn backjumps_over_unrelated_decisions() {
        // every literal occurs twice, preprocessing keeps the formula intact
        let cnf = cnf_formula![
            -1 2;
            -4 5;
            -5 -2 6;
            -6 -2 -5;
            2 -4;
            -1 8 9;
            -6 9 8;
            5 6 8;
        ];
        let mut solver = Solver::new(&cnf, SolverConfig::default());

        solver.assign(lit(1), None);
        assert!(solver.bcp());
        solver.assign(lit(3), None);
        assert!(solver.bcp());
        solver.assign(lit(4), None);
        assert!(!solver.bcp());
        solver.analyze();
        assert!(!solver.unsat);

        let learned = ClauseId::from_index(solver.alloc.len() - 1);
        assert_eq!(solver.alloc[learned].lits(), [lit(-2), lit(-5)]);

        // the second decision level is skipped entirely
        assert_eq!(solver.trail.decision_level(), DecLvl::new(1));
        assert!(!solver.assignment.is_assigned(lit(3).var()));
        assert_eq!(solver.assignment.value(lit(-5)), Some(true));
        assert_eq!(solver.watches.watched(learned), [lit(-5), lit(-2)]);
    }

    #[test]
    fn conflicts_at_the_root_level_are_unsatisfiable() {
        let cnf = cnf_formula![
            1 2;
            1 -2;
            -1 2;
            -1 -2;
        ];
        let mut solver = Solver::new(&cnf, SolverConfig::default());

        solver.assign(lit(1), None);
        assert!(!solver.bcp());
        solver.analyze();
        assert!(!solver.unsat);
        assert_eq!(solver.trail.decision_level(), DecLvl::ROOT);

        // propagating the learned unit conflicts below any decision
        assert!(!solver.bcp());
        solver.analyze();
        assert!(solver.unsat);
    }
}
