use super::Solver;
use crate::{
    checker,
    cnf::{strategy, Cnf},
    config::{ConflictLits, HeuristicKind, LubyConfig, RestartPolicy, SolverConfig},
    SolverResult,
};
use proptest::prelude::*;

fn pigeonhole() -> Cnf {
    // three pigeons do not fit into two holes
    cnf_formula![
        1 2;
        3 4;
        5 6;
        -1 -3;
        -1 -5;
        -3 -5;
        -2 -4;
        -2 -6;
        -4 -6;
    ]
}

/// Exhaustively searches for a satisfying assignment.
fn brute_force(cnf: &Cnf) -> bool {
    let num_vars = cnf.num_variables();
    (0..(1_u32 << num_vars)).any(|bits| {
        cnf.clauses().iter().all(|clause| {
            clause.iter().any(|&lit| {
                let value = bits & (1 << lit.var().as_index()) != 0;
                value == lit.is_positive()
            })
        })
    })
}

#[test]
fn satisfiable_formula() {
    let cnf = cnf_formula![
        1 2 3;
        -1 2;
        1 -2 -3;
    ];
    let mut solver = Solver::new(&cnf, SolverConfig::default());
    assert_eq!(solver.solve(), SolverResult::Satisfiable);

    let model = solver.model().expect("satisfiable formulas have a model");
    assert!(checker::check(&cnf, model));
    assert_eq!(model.iter().count(), 3);
}

#[test]
fn unsatisfiable_formula() {
    let cnf = cnf_formula![
        1 2;
        -1 2;
        -2;
    ];
    let mut solver = Solver::new(&cnf, SolverConfig::default());
    assert_eq!(solver.solve(), SolverResult::Unsatisfiable);
    assert!(solver.model().is_none());
}

#[test]
fn contradicting_unit_clauses() {
    let cnf = cnf_formula![
        1;
        -1;
    ];
    let mut solver = Solver::new(&cnf, SolverConfig::default());
    assert_eq!(solver.solve(), SolverResult::Unsatisfiable);
}

#[test]
fn the_empty_clause_is_unsatisfiable() {
    let cnf = cnf_formula![
        1 2;
        ;
    ];
    let mut solver = Solver::new(&cnf, SolverConfig::default());
    assert_eq!(solver.solve(), SolverResult::Unsatisfiable);
}

#[test]
fn every_heuristic_refutes_the_pigeonhole_formula() {
    let cnf = pigeonhole();
    let heuristics =
        [HeuristicKind::Vsids, HeuristicKind::Evsids, HeuristicKind::Lrb, HeuristicKind::Chb];
    for &heuristic in &heuristics {
        for &restart in &[RestartPolicy::Luby, RestartPolicy::Cadical] {
            let config = SolverConfig {
                heuristics: vec![heuristic],
                restart,
                ..SolverConfig::default()
            };
            let mut solver = Solver::new(&cnf, config);
            assert_eq!(solver.solve(), SolverResult::Unsatisfiable, "{heuristic:?}/{restart:?}");
        }
    }
}

#[test]
fn conflict_clause_rewards_keep_the_verdict() {
    let config = SolverConfig {
        conflict_lits: ConflictLits::ConflictClause,
        ..SolverConfig::default()
    };
    let mut solver = Solver::new(&pigeonhole(), config);
    assert_eq!(solver.solve(), SolverResult::Unsatisfiable);
}

#[test]
fn disabled_subsumption_keeps_the_verdict() {
    let config = SolverConfig { subsumption: false, ..SolverConfig::default() };
    let mut solver = Solver::new(&pigeonhole(), config);
    assert_eq!(solver.solve(), SolverResult::Unsatisfiable);
    assert_eq!(solver.stats.subsumed_clauses, 0);
}

#[test]
fn frequent_restarts_cycle_the_deciders() {
    let config = SolverConfig {
        restart: RestartPolicy::Luby,
        luby: LubyConfig { base: 1 },
        ..SolverConfig::default()
    };
    let mut solver = Solver::new(&pigeonhole(), config);
    assert_eq!(solver.solve(), SolverResult::Unsatisfiable);
    assert!(solver.stats.restarts > 0);
}

#[test]
fn frequent_reductions_keep_the_verdict() {
    // four pigeons and three holes, large enough for several reductions
    let cnf = cnf_formula![
        1 2 3;
        4 5 6;
        7 8 9;
        10 11 12;
        -1 -4;
        -1 -7;
        -1 -10;
        -4 -7;
        -4 -10;
        -7 -10;
        -2 -5;
        -2 -8;
        -2 -11;
        -5 -8;
        -5 -11;
        -8 -11;
        -3 -6;
        -3 -9;
        -3 -12;
        -6 -9;
        -6 -12;
        -9 -12;
    ];
    let config = SolverConfig { reduce_base: 1, ..SolverConfig::default() };
    let mut solver = Solver::new(&cnf, config);
    assert_eq!(solver.solve(), SolverResult::Unsatisfiable);
    assert!(solver.stats.reductions > 0);
}

proptest! {
    #[test]
    fn verdict_matches_exhaustive_search(cnf in strategy::cnf(7, 0..16usize, 0..4usize)) {
        let expected = if brute_force(&cnf) {
            SolverResult::Satisfiable
        } else {
            SolverResult::Unsatisfiable
        };
        let mut solver = Solver::new(&cnf, SolverConfig::default());
        prop_assert_eq!(solver.solve(), expected);
        if expected == SolverResult::Satisfiable {
            let model = solver.model().expect("satisfiable formulas have a model");
            prop_assert!(checker::check(&cnf, model));
        }
    }
}
