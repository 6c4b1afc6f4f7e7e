//! VSIDS branching heuristic

use crate::{
    config::VsidsConfig,
    datastructure::{heap::LitHeap, LitVec},
    literal::{Lit, Var},
};
use ordered_float::NotNan;

const RESCALE_LIMIT: f64 = 1e6;

/// Literals of learned clauses get a constant bump that grows by the inverse
/// decay factor after every conflict.
#[derive(Debug, Clone)]
pub(crate) struct Vsids {
    /// Unassigned literals ordered by activity.
    heap: LitHeap<NotNan<f64>>,
    /// The value used for bumping activity values.
    bump: NotNan<f64>,
    decay: NotNan<f64>,
}

impl Vsids {
    pub(crate) fn new(config: VsidsConfig, var_count: usize, seeds: &LitVec<f64>) -> Self {
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
            bump: NotNan::new(1.0).unwrap(),
            decay: NotNan::new(config.decay).unwrap(),
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
        let mut max_activity = NotNan::new(0.0).unwrap();
        for &lit in learned {
            let new_value = self.heap.update_value(lit, |value| value + self.bump);
            max_activity = max_activity.max(new_value);
        }
        self.bump /= self.decay;
        if *max_activity > RESCALE_LIMIT {
            self.rescale();
        }
    }

    /// Rescale activities to prevent overflows.
    fn rescale(&mut self) {
        let rescale_factor = self.bump.into_inner().recip();
        self.heap.rescale(NotNan::new(rescale_factor).unwrap());
        self.bump = NotNan::new(1.0).unwrap();
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
    fn bumped_literals_win() {
        let mut vsids = Vsids::new(VsidsConfig::default(), 4, &seeds(4));
        vsids.update_scores(&[lit(3), lit(-1)]);
        vsids.update_scores(&[lit(3)]);
        assert_eq!(vsids.decide(), lit(3));
    }

    #[test]
    fn assigned_literals_are_skipped() {
        let mut vsids = Vsids::new(VsidsConfig::default(), 4, &seeds(4));
        vsids.update_scores(&[lit(3)]);
        vsids.update_scores(&[lit(-1)]);

        vsids.on_assign(lit(3));
        assert_eq!(vsids.decide(), lit(-1));

        vsids.on_unassign(lit(3));
        assert_eq!(vsids.decide(), lit(3));
    }

    #[test]
    fn later_bumps_outweigh_earlier_ones() {
        let mut vsids = Vsids::new(VsidsConfig::default(), 4, &seeds(4));
        for _ in 0..20 {
            vsids.update_scores(&[lit(1)]);
        }
        for _ in 0..19 {
            vsids.update_scores(&[lit(2)]);
        }
        // 19 recent bumps beat 20 decayed ones
        assert_eq!(vsids.decide(), lit(2));
    }

    #[test]
    fn rescaling_keeps_the_order() {
        let config = VsidsConfig { decay: 0.5 };
        let mut vsids = Vsids::new(config, 4, &seeds(4));
        // with decay 0.5 the bump doubles every conflict and crosses the
        // rescale limit after a few dozen conflicts
        for _ in 0..25 {
            vsids.update_scores(&[lit(2), lit(4)]);
            vsids.update_scores(&[lit(2)]);
        }
        assert!(*vsids.bump < RESCALE_LIMIT);
        assert_eq!(vsids.decide(), lit(2));
        vsids.on_assign(lit(2));
        assert_eq!(vsids.decide(), lit(4));
    }
}
