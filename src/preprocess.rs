//! Formula preprocessing
//!
//! Three passes run before the solver sees the input: removal of tautologies
//! and duplicate literals, elimination of variables that occur with one
//! polarity in a single clause, and subsumption between the survivors.

use crate::{
    cnf::Cnf,
    datastructure::{LitVec, VarVec},
    literal::{Lit, LitSlice, Var},
};
use std::collections::{HashMap, HashSet};
use tracing::{debug, info};

/// Simplifies the formula. Returns the surviving clauses together with the
/// eliminated literals and the remainders of their forcing clauses.
pub(crate) fn preprocess(cnf: &Cnf) -> (Vec<Vec<Lit>>, Vec<(Lit, Vec<Lit>)>) {
    let clauses = simplify(cnf.clauses());
    let (clauses, eliminated) = eliminate_variables(clauses, cnf.num_variables());
    let clauses = subsume(clauses, cnf.num_variables());
    info!(
        "preprocessing kept {} of {} clauses and eliminated {} variables",
        clauses.len(),
        cnf.clauses().len(),
        eliminated.len()
    );
    (clauses, eliminated)
}

/// Drops tautological clauses and duplicate literals. Empty clauses are
/// kept, the solver reports them as unsatisfiable.
fn simplify(clauses: &[Vec<Lit>]) -> Vec<Vec<Lit>> {
    let mut simplified = Vec::with_capacity(clauses.len());
    for clause in clauses {
        if clause.iter().any(|&lit| clause.contains(&!lit)) {
            continue;
        }
        let mut deduped: Vec<Lit> = Vec::with_capacity(clause.len());
        for &lit in clause {
            if !deduped.contains(&lit) {
                deduped.push(lit);
            }
        }
        simplified.push(deduped);
    }
    simplified
}

/// Resolves away literals that occur in exactly one clause.
///
/// Such a clause forces its literal whenever the rest of the clause is
/// falsified. The clause is dropped, every occurrence of the complement is
/// replaced by the remainder, and [`restore_eliminated`] later derives the
/// assignment of the variable from the remainder again.
fn eliminate_variables(
    clauses: Vec<Vec<Lit>>,
    num_vars: usize,
) -> (Vec<Vec<Lit>>, Vec<(Lit, Vec<Lit>)>) {
    let mut occurrences: LitVec<usize> = LitVec::default();
    occurrences.set_var_count(num_vars);
    for clause in &clauses {
        for &lit in clause {
            occurrences[lit] += 1;
        }
    }

    // one elimination per clause, preferring the literal whose complement
    // occurs most
    let mut candidates: Vec<(Lit, usize)> = Vec::new();
    for (idx, clause) in clauses.iter().enumerate() {
        let best = clause
            .iter()
            .copied()
            .filter(|&lit| occurrences[lit] == 1)
            .max_by_key(|&lit| occurrences[!lit]);
        if let Some(lit) = best {
            candidates.push((lit, idx));
        }
    }

    // a variable picked with both polarities cannot be eliminated
    let picked: HashSet<Lit> = candidates.iter().map(|&(lit, _)| lit).collect();
    candidates.retain(|&(lit, _)| !picked.contains(&!lit));

    // eliminations whose remainder mentions another candidate would leak
    // that variable back into the formula during substitution
    let candidate_vars: HashSet<Var> = candidates.iter().map(|&(lit, _)| lit.var()).collect();
    candidates.retain(|&(lit, idx)| {
        clauses[idx]
            .iter()
            .all(|&other| other == lit || !candidate_vars.contains(&other.var()))
    });

    let mut eliminated: Vec<(Lit, Vec<Lit>)> = Vec::new();
    let mut forcing: HashSet<usize> = HashSet::new();
    let mut remainders: HashMap<Lit, Vec<Lit>> = HashMap::new();
    for &(lit, idx) in &candidates {
        let remainder: Vec<Lit> =
            clauses[idx].iter().copied().filter(|&other| other != lit).collect();
        debug!("eliminate {lit} forced by {}", LitSlice::from(remainder.as_slice()));
        remainders.insert(!lit, remainder.clone());
        eliminated.push((lit, remainder));
        forcing.insert(idx);
    }

    let mut kept = Vec::with_capacity(clauses.len());
    'clauses: for (idx, mut clause) in clauses.into_iter().enumerate() {
        if forcing.contains(&idx) {
            continue;
        }
        let mut cursor = 0;
        while cursor < clause.len() {
            let Some(remainder) = remainders.get(&clause[cursor]) else {
                cursor += 1;
                continue;
            };
            clause.swap_remove(cursor);
            for &res in remainder {
                if clause.contains(&!res) {
                    // the resolvent is a tautology
                    continue 'clauses;
                }
                if !clause.contains(&res) {
                    clause.push(res);
                }
            }
        }
        kept.push(clause);
    }
    (kept, eliminated)
}

/// Removes every clause that is a superset of another clause.
fn subsume(clauses: Vec<Vec<Lit>>, num_vars: usize) -> Vec<Vec<Lit>> {
    let mut appearance: LitVec<HashSet<usize>> = LitVec::default();
    appearance.set_var_count(num_vars);
    for (idx, clause) in clauses.iter().enumerate() {
        for &lit in clause {
            appearance[lit].insert(idx);
        }
    }

    let mut removed = vec![false; clauses.len()];
    for (idx, clause) in clauses.iter().enumerate() {
        if removed[idx] || clause.is_empty() {
            continue;
        }
        let mut victims = appearance[clause[0]].clone();
        for &lit in &clause[1..] {
            victims.retain(|other| appearance[lit].contains(other));
        }
        victims.remove(&idx);
        for victim in victims {
            removed[victim] = true;
        }
    }
    clauses
        .into_iter()
        .enumerate()
        .filter_map(|(idx, clause)| (!removed[idx]).then_some(clause))
        .collect()
}

/// Assigns the eliminated variables on top of a model of the simplified
/// formula.
///
/// When the remainder of the forcing clause is already satisfied the literal
/// is set to false, freeing its complement for the substituted clauses.
/// Otherwise the literal itself must hold.
pub(crate) fn restore_eliminated(values: &mut VarVec<bool>, eliminated: &[(Lit, Vec<Lit>)]) {
    for (lit, remainder) in eliminated.iter().rev() {
        let satisfied = remainder
            .iter()
            .any(|&other| values[other.var()] == other.is_positive());
        values[lit.var()] = if satisfied { lit.is_negative() } else { lit.is_positive() };
    }
}
