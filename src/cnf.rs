//! A straight-forward representation of a propositional formula in CNF.

use crate::{dimacs::FromDimacs, literal::Lit};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Cnf {
    num_vars: usize,
    clauses: Vec<Vec<Lit>>,
}

impl Cnf {
    #[must_use]
    pub fn new(clauses: &[&[i32]]) -> Self {
        let clauses: Vec<Vec<Lit>> = clauses
            .iter()
            .map(|&lits| lits.iter().map(|&lit| Lit::from_dimacs(lit)).collect())
            .collect();
        let num_vars = clauses
            .iter()
            .flatten()
            .map(|lit| lit.var().as_index() + 1)
            .max()
            .unwrap_or_default();
        Cnf { num_vars, clauses }
    }

    pub(crate) fn num_variables(&self) -> usize {
        self.num_vars
    }

    fn num_clauses(&self) -> usize {
        self.clauses.len()
    }

    pub(crate) fn clauses(&self) -> &[Vec<Lit>] {
        &self.clauses
    }
}

impl FromDimacs for Cnf {
    fn set_num_variables(&mut self, num_vars: u32) {
        self.num_vars = usize::try_from(num_vars).unwrap();
    }

    fn set_num_clauses(&mut self, num_clauses: u32) {
        self.clauses.reserve(usize::try_from(num_clauses).unwrap());
    }

    fn add_clause(&mut self, lits: &[Lit]) {
        // tolerate literals beyond the declared variable count
        if let Some(max) = lits.iter().map(|lit| lit.var().as_index() + 1).max() {
            self.num_vars = self.num_vars.max(max);
        }
        self.clauses.push(lits.to_owned());
    }
}

impl std::fmt::Display for Cnf {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "p cnf {} {}", self.num_variables(), self.num_clauses())?;
        for clause in &self.clauses {
            for lit in clause {
                write!(f, "{lit} ")?;
            }
            writeln!(f, "0")?;
        }
        Ok(())
    }
}

/// Macro that creates a [`Cnf`] instance from a DIMACS-like representation.
/// The main differences are:
/// * No support for comments
/// * No header line
/// * Clauses are terminated by `;`, whereas DIMACS uses `0`.
///
/// # Example
/// ```
/// let cnf = cnf_formula![
///     1 2;
///     -1 2;
///     -2;
/// ];
/// ```
///
#[cfg(test)]
macro_rules! cnf_formula {
    ($( $( $x:literal )* ;)*) => {{
        let clauses: Vec<&[i32]> = vec![$( &[ $( $x ),* ][..] ),*];
        crate::cnf::Cnf::new(&clauses)
    }};
}

/// Provides a strategy for randomly generating CNF formulas.
#[cfg(test)]
pub(crate) mod strategy {
    use super::Cnf;
    use crate::literal::strategy::lit;
    use proptest::{
        collection::{self, SizeRange},
        prelude::*,
    };

    /// A strategy to generate a CNF formula with the provided parameters.
    pub(crate) fn cnf(
        max_var_count: u32,
        clauses: impl Into<SizeRange>,
        clause_len: impl Into<SizeRange>,
    ) -> impl Strategy<Value = Cnf> {
        let clauses = clauses.into();
        let clause_len = clause_len.into();

        (1..=max_var_count)
            .prop_flat_map(move |var_count| {
                let clauses = clauses.clone();
                let clause_len = clause_len.clone();
                collection::vec(collection::vec(lit(0..var_count), clause_len), clauses).prop_map(
                    move |matrix| Cnf {
                        num_vars: usize::try_from(var_count).unwrap(),
                        clauses: matrix,
                    },
                )
            })
            .no_shrink()
    }
}

#[cfg(test)]
mod test {

    #[test]
    fn cnf_macro() {
        let cnf = cnf_formula![
            1 2;
            -1 2;
            -2;
        ];
        assert_eq!(cnf.num_clauses(), 3);
        assert_eq!(cnf.num_variables(), 2);
    }

    #[test]
    fn empty_clause() {
        let cnf = cnf_formula![
            1 2;
            ;
        ];
        assert_eq!(cnf.num_clauses(), 2);
        assert!(cnf.clauses()[1].is_empty());
    }
}
