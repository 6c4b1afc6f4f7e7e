//! Conflict driven clause learning over two watched literals.

use self::{
    bandit::Ucb,
    conflict::analysis::ConflictAnalysis,
    decide::Heuristic,
    propagation::{
        assignment::Assignment,
        trail::{DecLvl, Trail},
    },
    restart::{Cadical, Luby, Restarter},
    stats::Statistics,
    subsume::Subsumption,
    watch::WatchList,
};
use crate::{
    checker,
    clause::alloc::{Allocator, ClauseId},
    cnf::Cnf,
    config::{RestartPolicy, SolverConfig},
    datastructure::{LitVec, VarVec},
    literal::{Lit, Var},
    preprocess, SolverResult,
};
use std::time::Instant;
use tracing::{debug, info, trace};

pub(crate) mod bandit;
pub(crate) mod conflict;
pub(crate) mod decide;
pub(crate) mod propagation;
pub(crate) mod restart;
pub(crate) mod stats;
pub(crate) mod subsume;
pub(crate) mod watch;

#[cfg(test)]
mod test;

#[derive(Debug)]
pub struct Solver {
    config: SolverConfig,
    original: Cnf,
    num_vars: usize,
    /// Clauses attached to the solver indices, original and learned.
    clauses: Vec<ClauseId>,
    /// Allocation ids below this bound belong to the input formula.
    original_count: usize,
    alloc: Allocator,
    assignment: Assignment,
    trail: Trail,
    watches: WatchList,
    analysis: ConflictAnalysis,
    subsumption: Subsumption,
    deciders: Vec<Heuristic>,
    active_decider: usize,
    bandit: Ucb,
    restarter: Restarter,
    /// Literals branched on since the last restart.
    chosen: LitVec<bool>,
    epoch_decisions: u64,
    reduce_lim: f64,
    reduces: u64,
    /// Set when the empty clause was given or derived.
    unsat: bool,
    conflict: Option<ClauseId>,
    eliminated: Vec<(Lit, Vec<Lit>)>,
    model: Option<Model>,
    stats: Statistics,
}

impl Solver {
    /// Prepares a solver for the formula.
    ///
    /// The input is preprocessed before watches, occurrence sets and the
    /// branching heuristics are set up for the surviving clauses.
    ///
    /// # Panics
    ///
    /// Panics if the configuration enables no branching heuristic.
    #[must_use]
    pub fn new(cnf: &Cnf, config: SolverConfig) -> Self {
        assert!(!config.heuristics.is_empty(), "at least one branching heuristic is required");
        let num_vars = cnf.num_variables();
        let (simplified, eliminated) = preprocess::preprocess(cnf);

        // seed the heuristics with the literal occurrence counts
        let mut seeds: LitVec<f64> = LitVec::default();
        seeds.set_var_count(num_vars);
        for seed in seeds.iter_mut() {
            *seed = 1.0;
        }
        for clause in &simplified {
            for &lit in clause {
                seeds[lit] += 1.0;
            }
        }

        let deciders: Vec<Heuristic> = config
            .heuristics
            .iter()
            .map(|&kind| Heuristic::new(kind, &config, num_vars, &seeds))
            .collect();
        let bandit = Ucb::new(deciders.len(), config.ucb_beta);
        let active_decider = bandit.select();
        let restarter = match config.restart {
            RestartPolicy::Luby => Restarter::Luby(Luby::new(config.luby)),
            RestartPolicy::Cadical => Restarter::Cadical(Cadical::new(config.cadical)),
        };
        let mut subsumption = Subsumption::new(config.subsumption);
        subsumption.set_var_count(num_vars);
        let mut chosen = LitVec::default();
        chosen.set_var_count(num_vars);

        let mut solver = Solver {
            original: cnf.clone(),
            num_vars,
            clauses: Vec::with_capacity(simplified.len()),
            original_count: 0,
            alloc: Allocator::default(),
            assignment: Assignment::default(),
            trail: Trail::default(),
            watches: WatchList::default(),
            analysis: ConflictAnalysis::default(),
            subsumption,
            deciders,
            active_decider,
            bandit,
            restarter,
            chosen,
            epoch_decisions: 0,
            reduce_lim: config.reduce_base as f64,
            reduces: 0,
            unsat: false,
            conflict: None,
            eliminated,
            model: None,
            stats: Statistics::default(),
            config,
        };
        solver.assignment.set_var_count(num_vars);
        solver.watches.set_var_count(num_vars);
        solver.alloc.reserve(simplified.len());
        for clause in &simplified {
            if clause.is_empty() {
                debug!("the empty clause survived preprocessing");
                solver.unsat = true;
                continue;
            }
            let id = solver.alloc.add(clause);
            solver.clauses.push(id);
            solver.subsumption.insert(id, clause);
            if let [first, second, ..] = clause[..] {
                solver.watches.watch(id, [first, second]);
            }
        }
        solver.original_count = solver.alloc.len();
        solver
    }

    pub fn solve(&mut self) -> SolverResult {
        let instant = Instant::now();
        let result = self._solve();
        self.stats.solve_time = instant.elapsed();
        info!("\n{:#?}", self.stats);
        result
    }

    fn _solve(&mut self) -> SolverResult {
        if self.unsat {
            return SolverResult::Unsatisfiable;
        }
        if !self.solve_unary_lits() {
            return SolverResult::Unsatisfiable;
        }
        while self.trail.len() < self.num_vars {
            if !self.bcp() {
                self.stats.conflicts += 1;
                self.analyze();
                if self.unsat {
                    return SolverResult::Unsatisfiable;
                }
            } else if self.try_restart() {
                self.restart();
            } else if self.try_reduce() {
                self.reduce();
            } else {
                self.decide();
            }
        }
        self.build_model();
        SolverResult::Satisfiable
    }

    /// Assigns the unit clauses of the input below any decision.
    fn solve_unary_lits(&mut self) -> bool {
        let units: Vec<(Lit, ClauseId)> = self
            .clauses
            .iter()
            .filter_map(|&id| match self.alloc[id].lits() {
                &[lit] => Some((lit, id)),
                _ => None,
            })
            .collect();
        for (lit, id) in units {
            match self.assignment.value(lit) {
                None => {
                    trace!("unary {lit}");
                    self.assign(lit, Some(id));
                }
                Some(false) => {
                    debug!("contradicting unary clauses on {lit}");
                    return false;
                }
                Some(true) => {}
            }
        }
        true
    }

    /// Puts `lit` on the trail. A literal without reason opens a new
    /// decision level.
    pub(crate) fn assign(&mut self, lit: Lit, reason: Option<ClauseId>) {
        if reason.is_none() {
            self.trail.add_decision(lit);
        } else {
            self.trail.push(lit);
        }
        self.assignment.assign(lit, self.trail.decision_level(), reason);
        for decider in &mut self.deciders {
            decider.on_assign(lit);
        }
    }

    fn decide(&mut self) {
        self.stats.decisions += 1;
        self.epoch_decisions += 1;
        let lit = self.deciders[self.active_decider].decide();
        trace!("decide {lit}");
        self.chosen[lit] = true;
        self.assign(lit, None);
    }

    /// Undoes every assignment above `dec_lvl`.
    pub(crate) fn backtrack(&mut self, dec_lvl: DecLvl) {
        trace!("backtrack to level {dec_lvl}");
        let assignment = &mut self.assignment;
        let deciders = &mut self.deciders;
        self.trail.backtrack_to(dec_lvl, |lit| {
            assignment.unassign(lit.var());
            for decider in deciders.iter_mut() {
                decider.on_unassign(lit);
            }
        });
    }

    fn try_restart(&mut self) -> bool {
        self.restarter.should_restart(self.stats.conflicts)
    }

    /// Abandons the current assignment and lets the bandit pick the decider
    /// for the next epoch.
    fn restart(&mut self) {
        self.stats.restarts += 1;
        let num_chosen = self.chosen.iter().filter(|&&chosen| chosen).count();
        if self.epoch_decisions > 0 && num_chosen > 0 {
            let reward = (self.epoch_decisions as f64).log2() / num_chosen as f64;
            self.bandit.reward(self.active_decider, reward);
        }
        for chosen in self.chosen.iter_mut() {
            *chosen = false;
        }
        self.epoch_decisions = 0;
        self.active_decider = self.bandit.select();
        debug!("restart {} with decider {}", self.stats.restarts, self.active_decider);
        self.backtrack(DecLvl::ROOT);
    }

    fn try_reduce(&self) -> bool {
        self.stats.conflicts as f64 > self.reduce_lim
    }

    /// Deletes learned clauses whose protection ran out and pushes the next
    /// reduction further out.
    fn reduce(&mut self) {
        self.stats.reductions += 1;
        self.reduces += 1;
        let mut delta = self.config.reduce_base as f64 * (self.reduces + 1) as f64;
        let original_clauses = self.original.clauses().len();
        if original_clauses > 100_000 {
            delta *= (original_clauses as f64 / 1e4).log10();
        }
        self.reduce_lim = self.stats.conflicts as f64 + delta;

        let mut victims = Vec::new();
        for &id in &self.clauses {
            if id.as_index() < self.original_count || self.alloc[id].is_subsuming() {
                continue;
            }
            if self.alloc[id].reduce_tick() {
                victims.push(id);
            }
        }
        self.stats.reduced_clauses += victims.len() as u64;
        debug!("reduction deletes {} clauses", victims.len());
        self.eliminate_clauses(&victims);
    }

    /// Detaches `victims` from the watches, the occurrence sets and the
    /// clause list. Allocator slots stay valid so that antecedents and
    /// subsumption redirects keep working.
    ///
    /// `victims` must be sorted. Subsuming clauses are skipped, they serve
    /// as redirect targets.
    pub(crate) fn eliminate_clauses(&mut self, victims: &[ClauseId]) {
        let victims: Vec<ClauseId> = victims
            .iter()
            .copied()
            .filter(|&id| !self.alloc[id].is_subsuming())
            .collect();
        for &victim in &victims {
            self.watches.remove_clause(victim);
            self.subsumption.remove(victim, self.alloc[victim].lits());
        }
        self.clauses.retain(|id| victims.binary_search(id).is_err());
    }

    fn build_model(&mut self) {
        let mut values: VarVec<bool> = VarVec::default();
        values.set_var_count(self.num_vars);
        for &lit in self.trail.iter() {
            values[lit.var()] = lit.is_positive();
        }
        preprocess::restore_eliminated(&mut values, &self.eliminated);
        let model = Model { values };
        debug_assert!(checker::check(&self.original, &model));
        self.model = Some(model);
    }

    /// The satisfying assignment found by the last `solve` call, if any.
    #[must_use]
    pub fn model(&self) -> Option<&Model> {
        self.model.as_ref()
    }
}

/// A satisfying assignment for every variable of the formula.
#[derive(Debug, Clone)]
pub struct Model {
    values: VarVec<bool>,
}

impl Model {
    /// The polarity assigned to `var`.
    #[must_use]
    pub fn value(&self, var: Var) -> bool {
        self.values[var]
    }

    pub(crate) fn satisfies(&self, lit: Lit) -> bool {
        self.values[lit.var()] == lit.is_positive()
    }

    /// All variables with their assigned polarity, in variable order.
    pub fn iter(&self) -> impl Iterator<Item = Lit> + '_ {
        self.values
            .iter()
            .map(|(var, &value)| if value { var.positive() } else { var.negative() })
    }
}
