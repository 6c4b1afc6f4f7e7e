use std::time::Duration;

#[derive(Debug, Default)]
pub(crate) struct Statistics {
    pub(crate) decisions: u64,
    pub(crate) propagations: u64,
    pub(crate) conflicts: u64,
    pub(crate) learned_clauses: u64,
    pub(crate) subsumed_clauses: u64,
    pub(crate) restarts: u64,
    pub(crate) reductions: u64,
    pub(crate) reduced_clauses: u64,
    pub(crate) solve_time: Duration,
}
