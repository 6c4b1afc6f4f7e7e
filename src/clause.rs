use crate::cdcl::propagation::assignment::Assignment;
use crate::cdcl::propagation::trail::DecLvl;
use crate::clause::alloc::ClauseId;
use crate::literal::Lit;

pub(crate) mod alloc;

/// Reduction-pass protection of a clause.
///
/// Input clauses are permanent. Learned clauses earn protection from their
/// glue level and lose it one reduction pass at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Protection {
    /// Never eligible for deletion.
    Permanent,
    /// Number of reduction passes the clause survives before it is disposable.
    Cycles(u8),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Clause {
    lits: Vec<Lit>,
    glue: usize,
    protect: Protection,
    subsumed_by: Option<ClauseId>,
    subsuming: bool,
}

impl Clause {
    pub(crate) fn new(literals: &[Lit]) -> Self {
        Self {
            lits: literals.to_vec(),
            glue: 0,
            protect: Protection::Permanent,
            subsumed_by: None,
            subsuming: false,
        }
    }

    pub(crate) fn lits(&self) -> &[Lit] {
        &self.lits
    }

    pub(crate) fn glue(&self) -> usize {
        self.glue
    }

    #[cfg(test)]
    pub(crate) fn protection(&self) -> Protection {
        self.protect
    }

    pub(crate) fn subsumed_by(&self) -> Option<ClauseId> {
        self.subsumed_by
    }

    pub(crate) fn is_subsuming(&self) -> bool {
        self.subsuming
    }

    pub(crate) fn set_subsumed_by(&mut self, id: ClauseId) {
        self.subsumed_by = Some(id);
    }

    pub(crate) fn mark_subsuming(&mut self) {
        self.subsuming = true;
    }

    /// Resolves this clause with `other` on the variable of `pivot`.
    ///
    /// Removes both polarities of the pivot and unions the remaining
    /// literals, preserving the order of first appearance.
    pub(crate) fn resolve(&mut self, pivot: Lit, other: &[Lit]) {
        self.lits.retain(|&l| l != pivot && l != !pivot);
        for &lit in other {
            if lit != pivot && lit != !pivot && !self.lits.contains(&lit) {
                self.lits.push(lit);
            }
        }
    }

    /// Consumes one reduction pass. Returns `true` when the clause has no
    /// protection left and should be deleted.
    pub(crate) fn reduce_tick(&mut self) -> bool {
        match self.protect {
            Protection::Permanent => false,
            Protection::Cycles(0) => true,
            Protection::Cycles(ref mut cycles) => {
                *cycles -= 1;
                false
            }
        }
    }

    /// Sets the glue of a freshly learned clause and derives its protection.
    pub(crate) fn compute_glue(&mut self, assignment: &Assignment) {
        let glue = self.distinct_levels(assignment);
        if glue <= 2 {
            self.glue = 0;
            self.protect = Protection::Permanent;
        } else if glue <= 6 {
            self.glue = glue;
            self.protect = Protection::Cycles(2);
        } else {
            self.glue = glue;
            self.protect = Protection::Cycles(1);
        }
    }

    /// Re-evaluates the glue of a clause that took part in conflict analysis.
    ///
    /// Glue only ever improves. An improvement to the tiers below promotes
    /// the protection, anything else leaves the clause with a single pass.
    pub(crate) fn recompute_glue(&mut self, assignment: &Assignment) {
        if self.protect == Protection::Permanent {
            return;
        }
        let new_glue = self.distinct_levels(assignment);
        self.protect = Protection::Cycles(1);
        if new_glue < self.glue {
            if new_glue <= 2 {
                self.glue = 0;
                self.protect = Protection::Permanent;
            } else if self.glue > 6 && new_glue <= 6 {
                self.protect = Protection::Cycles(2);
            } else {
                self.glue = new_glue;
            }
        } else if self.glue <= 6 {
            self.protect = Protection::Cycles(2);
        }
    }

    fn distinct_levels(&self, assignment: &Assignment) -> usize {
        let mut levels: Vec<DecLvl> =
            self.lits.iter().map(|l| assignment.level(l.var())).collect();
        levels.sort_unstable();
        levels.dedup();
        levels.len()
    }

    pub(crate) fn deepest_level(&self, assignment: &Assignment) -> DecLvl {
        self.lits
            .iter()
            .map(|l| assignment.level(l.var()))
            .max()
            .expect("clause is not empty")
    }

    /// The second-deepest decision level among the literals, counting the
    /// deepest level again if two literals share it. [`DecLvl::ROOT`] for
    /// unit clauses.
    pub(crate) fn second_deepest_level(&self, assignment: &Assignment) -> DecLvl {
        if self.lits.len() <= 1 {
            return DecLvl::ROOT;
        }
        let mut deepest = DecLvl::ROOT;
        let mut second = DecLvl::ROOT;
        for lvl in self.lits.iter().map(|l| assignment.level(l.var())) {
            if lvl > deepest {
                second = deepest;
                deepest = lvl;
            } else if lvl > second {
                second = lvl;
            }
        }
        second
    }

    /// The literal at the deepest decision level, and the literal at the
    /// next-deepest level if the clause has more than one literal.
    pub(crate) fn deepest_literals(&self, assignment: &Assignment) -> (Lit, Option<Lit>) {
        let mut iter = self.lits.iter();
        let &first = iter.next().expect("clause is not empty");
        let mut deepest = (first, assignment.level(first.var()));
        let mut second: Option<(Lit, DecLvl)> = None;
        for &lit in iter {
            let lvl = assignment.level(lit.var());
            if lvl > deepest.1 {
                second = Some(deepest);
                deepest = (lit, lvl);
            } else if second.map_or(true, |(_, s)| lvl > s) {
                second = Some((lit, lvl));
            }
        }
        (deepest.0, second.map(|(lit, _)| lit))
    }

    pub(crate) fn one_lit_at_level(&self, level: DecLvl, assignment: &Assignment) -> bool {
        self.lits.iter().filter(|l| assignment.level(l.var()) == level).count() == 1
    }

    pub(crate) fn contains(&self, lit: Lit) -> bool {
        self.lits.contains(&lit)
    }
}

impl std::fmt::Display for Clause {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for &lit in &self.lits {
            write!(f, "{lit} ")?;
        }
        write!(f, "0")
    }
}
