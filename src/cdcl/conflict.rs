//! Conflict analysis and clause learning

pub(crate) mod analysis;
