use crate::literal::Lit;

/// Decision level of an assignment.
///
/// Level 0 contains the assignments that hold unconditionally, every decision
/// opens a new level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub(crate) struct DecLvl(usize);

impl DecLvl {
    pub(crate) const ROOT: DecLvl = DecLvl(0);

    pub(crate) fn is_root(self) -> bool {
        self == Self::ROOT
    }

    #[cfg(test)]
    pub(crate) fn new(lvl: usize) -> Self {
        DecLvl(lvl)
    }
}

impl std::fmt::Display for DecLvl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The sequence of assigned literals in assignment order, together with the
/// propagation cursor.
#[derive(Debug, Clone, Default)]
pub(crate) struct Trail {
    trail: Vec<Lit>,
    /// Indices into `trail` where a decision level starts.
    decisions: Vec<usize>,
    propagate_ptr: usize,
    propagated_once: bool,
}

impl Trail {
    pub(crate) fn len(&self) -> usize {
        self.trail.len()
    }

    pub(crate) fn decision_level(&self) -> DecLvl {
        DecLvl(self.decisions.len())
    }

    /// Appends a propagated literal at the current decision level.
    pub(crate) fn push(&mut self, lit: Lit) {
        self.trail.push(lit);
    }

    /// Opens a new decision level with `lit` as its decision.
    pub(crate) fn add_decision(&mut self, lit: Lit) {
        self.decisions.push(self.trail.len());
        self.trail.push(lit);
    }

    pub(crate) fn iter(&self) -> std::slice::Iter<'_, Lit> {
        self.trail.iter()
    }

    /// Positions the propagation cursor for the next propagation round.
    ///
    /// The first round scans the whole trail since root-level assignments are
    /// made without propagating them. Later rounds start at the newest
    /// assignment because everything below has already been propagated.
    pub(crate) fn begin_propagation(&mut self) {
        self.propagate_ptr = if self.propagated_once {
            self.trail.len().saturating_sub(1)
        } else {
            self.propagated_once = true;
            0
        };
    }

    pub(crate) fn next_lit_to_propagate(&mut self) -> Option<Lit> {
        let lit = self.trail.get(self.propagate_ptr).copied()?;
        self.propagate_ptr += 1;
        Some(lit)
    }

    /// Removes all assignments above `dec_lvl`, invoking `callback` on each
    /// removed literal in reverse assignment order.
    pub(crate) fn backtrack_to<F>(&mut self, dec_lvl: DecLvl, mut callback: F)
    where
        F: FnMut(Lit),
    {
        if dec_lvl >= self.decision_level() {
            return;
        }
        let index = self.decisions[dec_lvl.0];
        for &lit in self.trail[index..].iter().rev() {
            callback(lit);
        }
        self.trail.truncate(index);
        self.decisions.truncate(dec_lvl.0);
    }
}

impl std::ops::Index<usize> for Trail {
    type Output = Lit;

    fn index(&self, index: usize) -> &Self::Output {
        &self.trail[index]
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn lit(l: i32) -> Lit {
        Lit::from_dimacs(l)
    }

    #[test]
    fn decision_levels() {
        let mut trail = Trail::default();
        assert_eq!(trail.decision_level(), DecLvl::ROOT);

        trail.push(lit(1));
        assert_eq!(trail.decision_level(), DecLvl::ROOT);

        trail.add_decision(lit(2));
        trail.push(lit(3));
        assert_eq!(trail.decision_level(), DecLvl::new(1));

        trail.add_decision(lit(4));
        assert_eq!(trail.decision_level(), DecLvl::new(2));
        assert_eq!(trail.len(), 4);
    }

    #[test]
    fn backtracking() {
        let mut trail = Trail::default();
        trail.push(lit(1));
        trail.add_decision(lit(2));
        trail.push(lit(3));
        trail.add_decision(lit(4));

        let mut removed = Vec::new();
        trail.backtrack_to(DecLvl::new(1), |l| removed.push(l));
        assert_eq!(removed, vec![lit(4)]);
        assert_eq!(trail.decision_level(), DecLvl::new(1));

        removed.clear();
        trail.backtrack_to(DecLvl::ROOT, |l| removed.push(l));
        assert_eq!(removed, vec![lit(3), lit(2)]);
        assert_eq!(trail.len(), 1);

        // backtracking to the current level is a no-op
        removed.clear();
        trail.backtrack_to(DecLvl::ROOT, |l| removed.push(l));
        assert!(removed.is_empty());
    }

    #[test]
    fn propagation_cursor() {
        let mut trail = Trail::default();
        trail.push(lit(1));
        trail.push(lit(2));

        // the first round sees the whole trail
        trail.begin_propagation();
        assert_eq!(trail.next_lit_to_propagate(), Some(lit(1)));
        assert_eq!(trail.next_lit_to_propagate(), Some(lit(2)));
        assert_eq!(trail.next_lit_to_propagate(), None);

        // later rounds start at the newest assignment before the round
        trail.add_decision(lit(3));
        trail.begin_propagation();
        assert_eq!(trail.next_lit_to_propagate(), Some(lit(3)));

        // propagation may extend the trail while the cursor runs
        trail.push(lit(4));
        assert_eq!(trail.next_lit_to_propagate(), Some(lit(4)));
        assert_eq!(trail.next_lit_to_propagate(), None);
    }

    #[test]
    fn propagation_cursor_on_empty_trail() {
        let mut trail = Trail::default();
        trail.begin_propagation();
        assert_eq!(trail.next_lit_to_propagate(), None);

        trail.push(lit(1));
        trail.backtrack_to(DecLvl::ROOT, |_| {});
        trail.begin_propagation();
        assert_eq!(trail.next_lit_to_propagate(), None);
    }
}
