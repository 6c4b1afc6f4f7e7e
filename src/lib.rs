#![deny(unsafe_code)]
#![deny(unused_must_use)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::missing_panics_doc, clippy::module_name_repetitions)]
#![allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
//#![warn(clippy::cargo)]

use std::{
    fmt::Display,
    process::{ExitCode, Termination},
};

#[macro_use]
pub mod cnf;
mod clause;
mod literal;
pub mod dimacs;
pub mod cdcl;
pub mod checker;
pub mod cli;
pub mod config;
mod datastructure;
mod preprocess;

// Re-export
pub use cdcl::{Model, Solver};
pub use cnf::Cnf;
pub use literal::{Lit, Var};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum SolverResult {
    Satisfiable = 10,
    Unsatisfiable = 20,
}

impl Display for SolverResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SolverResult::Satisfiable => write!(f, "satisfiable"),
            SolverResult::Unsatisfiable => write!(f, "unsatisfiable"),
        }
    }
}

impl Termination for SolverResult {
    fn report(self) -> ExitCode {
        ExitCode::from(self as u8)
    }
}
