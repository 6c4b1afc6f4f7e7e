use clap::Parser;
use clausium::{
    cli,
    config::{ConflictLits, HeuristicKind, RestartPolicy, SolverConfig},
    dimacs::{DimacsParser, ExtendedParseError},
    Cnf, Model, Solver, SolverResult,
};
use miette::Result;
use std::{io::Cursor, path::PathBuf};

/// SAT solver for formulas in DIMACS CNF format.
#[derive(Parser)]
#[command(version, about)]
struct Args {
    /// Input formula in DIMACS CNF format, read from stdin when omitted.
    input: Option<PathBuf>,

    /// Restart policy.
    #[arg(long, value_enum, default_value_t = RestartPolicy::default())]
    restart: RestartPolicy,

    /// Branching heuristics competing under the bandit selector.
    #[arg(long, value_enum, value_delimiter = ',', default_values_t = SolverConfig::default().heuristics)]
    heuristics: Vec<HeuristicKind>,

    /// Literals rewarded by the heuristics after a conflict.
    #[arg(long, value_enum, default_value_t = ConflictLits::default())]
    conflict_lits: ConflictLits,

    /// Disable on-the-fly subsumption of learned clauses.
    #[arg(long)]
    no_subsumption: bool,
}

fn main() -> Result<SolverResult> {
    tracing_subscriber::fmt::init();

    let args = Args::parse();

    let contents = cli::read_input(args.input.as_deref())?;
    let reader = Cursor::new(&contents);

    let cnf: Cnf = match DimacsParser::new(reader).parse() {
        Ok(cnf) => cnf,
        Err(err) => Err(ExtendedParseError { source_code: contents, related: vec![err] })?,
    };

    let config = SolverConfig {
        heuristics: args.heuristics,
        conflict_lits: args.conflict_lits,
        restart: args.restart,
        subsumption: !args.no_subsumption,
        ..SolverConfig::default()
    };

    let mut solver = Solver::new(&cnf, config);
    let result = solver.solve();

    match result {
        SolverResult::Satisfiable => {
            println!("s SATISFIABLE");
            let model = solver.model().expect("satisfiable outcomes carry a model");
            print_model(model);
        }
        SolverResult::Unsatisfiable => println!("s UNSATISFIABLE"),
    }

    Ok(result)
}

/// Prints the assignment as `v` lines terminated by `v 0`.
fn print_model(model: &Model) {
    let mut line = String::new();
    for lit in model.iter() {
        let lit = lit.to_string();
        if !line.is_empty() && line.len() + lit.len() > 76 {
            println!("v{line}");
            line.clear();
        }
        line.push(' ');
        line.push_str(&lit);
    }
    if !line.is_empty() {
        println!("v{line}");
    }
    println!("v 0");
}
