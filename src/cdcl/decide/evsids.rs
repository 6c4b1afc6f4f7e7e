//! Exponential VSIDS branching heuristic

use crate::{
    config::EvsidsConfig,
    datastructure::{heap::LitHeap, LitVec},
    literal::{Lit, Var},
};
use ordered_float::NotNan;

const BUMP_LIMIT: f64 = 1e4;

/// Variant of VSIDS where instead of decaying all activities after a
/// conflict, the bump value itself grows exponentially.
#[derive(Debug, Clone)]
pub(crate) struct Evsids {
    /// Unassigned literals ordered by activity.
    heap: LitHeap<NotNan<f64>>,
    /// The value used for bumping activity values.
    bump: NotNan<f64>,
    growth: NotNan<f64>,
}

impl Evsids {
    pub(crate) fn new(config: EvsidsConfig, var_count: usize, seeds: &LitVec<f64>) -> Self {
        let mut heap = LitHeap::default();
        heap.set_var_count(var_count);
        for idx in 0..var_count {
            let var = Var::from_index(idx.try_into().unwrap());
            for lit in [var.positive(), var.negative()] {
                heap.add_and_set(lit, NotNan::new(seeds[lit]).unwrap());
            }
        }
        Self {
            heap,
            bump: NotNan::new(config.bump_growth).unwrap(),
            growth: NotNan::new(config.bump_growth).unwrap(),
        }
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

    pub(crate) fn update_scores(&mut self, learned: &[Lit]) {
        for &lit in learned {
            self.heap.update_value(lit, |value| value + self.bump);
        }
        self.bump *= self.growth;
        if *self.bump > BUMP_LIMIT {
            self.rescale();
        }
    }

    /// Rescale activities to prevent overflows.
    fn rescale(&mut self) {
        let rescale_factor = self.growth / self.bump;
        self.heap.rescale(rescale_factor);
        self.bump = self.growth;
    }
}
