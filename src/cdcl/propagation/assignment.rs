use super::trail::DecLvl;
use crate::{
    clause::alloc::ClauseId,
    datastructure::VarVec,
    literal::{Lit, Var},
};

/// Value, decision level, and antecedent of every variable.
#[derive(Debug, Clone, Default)]
pub(crate) struct Assignment {
    values: VarVec<Option<bool>>,
    levels: VarVec<DecLvl>,
    reasons: VarVec<Option<ClauseId>>,
}

impl Assignment {
    pub(crate) fn set_var_count(&mut self, count: usize) {
        self.values.set_var_count(count);
        self.levels.set_var_count(count);
        self.reasons.set_var_count(count);
    }

    /// Assigns `lit` to true. A reason of `None` marks a decision.
    pub(crate) fn assign(&mut self, lit: Lit, lvl: DecLvl, reason: Option<ClauseId>) {
        let var = lit.var();
        debug_assert!(!self.is_assigned(var));
        self.values[var] = Some(lit.is_positive());
        self.levels[var] = lvl;
        self.reasons[var] = reason;
    }

    /// Removes the assignment of `var`, reporting whether it was propagated.
    pub(crate) fn unassign(&mut self, var: Var) -> bool {
        let old_value = self.values[var].take();
        debug_assert!(old_value.is_some());
        self.levels[var] = DecLvl::ROOT;
        self.reasons[var].take().is_some()
    }

    /// The value of `lit` under the current assignment, if any.
    pub(crate) fn value(&self, lit: Lit) -> Option<bool> {
        self.values[lit.var()].map(|value| value == lit.is_positive())
    }

    pub(crate) fn is_assigned(&self, var: Var) -> bool {
        self.values[var].is_some()
    }

    /// The decision level of `var`. [`DecLvl::ROOT`] for unassigned variables.
    pub(crate) fn level(&self, var: Var) -> DecLvl {
        self.levels[var]
    }

    pub(crate) fn reason(&self, var: Var) -> Option<ClauseId> {
        self.reasons[var]
    }
}
