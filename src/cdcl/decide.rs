//! Branching heuristics
//!
//! Every heuristic keeps its own activity state and answers `decide` with the
//! best unassigned literal. All of them are kept up to date on every trail
//! change so that the bandit can switch between them at restarts.

use self::{chb::Chb, evsids::Evsids, lrb::Lrb, vsids::Vsids};
use super::propagation::trail::Trail;
use crate::{
    clause::alloc::{Allocator, ClauseId},
    config::{HeuristicKind, SolverConfig},
    datastructure::LitVec,
    literal::Lit,
};

pub(crate) mod chb;
pub(crate) mod evsids;
pub(crate) mod lrb;
pub(crate) mod vsids;

#[derive(Debug, Clone)]
pub(crate) enum Heuristic {
    Vsids(Vsids),
    Evsids(Evsids),
    Lrb(Lrb),
    Chb(Chb),
}

impl Heuristic {
    pub(crate) fn new(
        kind: HeuristicKind,
        config: &SolverConfig,
        var_count: usize,
        seeds: &LitVec<f64>,
    ) -> Self {
        match kind {
            HeuristicKind::Vsids => Heuristic::Vsids(Vsids::new(config.vsids, var_count, seeds)),
            HeuristicKind::Evsids => {
                Heuristic::Evsids(Evsids::new(config.evsids, var_count, seeds))
            }
            HeuristicKind::Lrb => Heuristic::Lrb(Lrb::new(config.lrb, var_count, seeds)),
            HeuristicKind::Chb => Heuristic::Chb(Chb::new(config.chb, var_count)),
        }
    }

    /// The literal to branch on next.
    pub(crate) fn decide(&self) -> Lit {
        match self {
            Heuristic::Vsids(vsids) => vsids.decide(),
            Heuristic::Evsids(evsids) => evsids.decide(),
            Heuristic::Lrb(lrb) => lrb.decide(),
            Heuristic::Chb(chb) => chb.decide(),
        }
    }

    pub(crate) fn on_assign(&mut self, lit: Lit) {
        match self {
            Heuristic::Vsids(vsids) => vsids.on_assign(lit),
            Heuristic::Evsids(evsids) => evsids.on_assign(lit),
            Heuristic::Lrb(lrb) => lrb.on_assign(lit),
            Heuristic::Chb(chb) => chb.on_assign(lit),
        }
    }

    pub(crate) fn on_unassign(&mut self, lit: Lit) {
        match self {
            Heuristic::Vsids(vsids) => vsids.on_unassign(lit),
            Heuristic::Evsids(evsids) => evsids.on_unassign(lit),
            Heuristic::Lrb(lrb) => lrb.on_unassign(lit),
            Heuristic::Chb(chb) => chb.on_unassign(lit),
        }
    }

    /// Rewards the participants of the conflict that produced `learned`.
    pub(crate) fn update_scores(
        &mut self,
        learned: &[Lit],
        conflict: &[Lit],
        reasons: &[ClauseId],
        trail: &Trail,
        alloc: &Allocator,
    ) {
        match self {
            Heuristic::Vsids(vsids) => vsids.update_scores(learned),
            Heuristic::Evsids(evsids) => evsids.update_scores(learned),
            Heuristic::Lrb(lrb) => lrb.update_scores(learned, conflict, reasons, alloc),
            Heuristic::Chb(chb) => chb.update_scores(conflict, reasons, trail, alloc),
        }
    }
}
