//! Assignment checking

use crate::{cdcl::Model, cnf::Cnf, literal::LitSlice};
use tracing::warn;

/// Checks that `model` satisfies every clause of `cnf`.
#[must_use]
pub fn check(cnf: &Cnf, model: &Model) -> bool {
    for clause in cnf.clauses() {
        if !clause.iter().any(|&lit| model.satisfies(lit)) {
            warn!("clause {} is not satisfied", LitSlice::from(clause.as_slice()));
            return false;
        }
    }
    true
}
