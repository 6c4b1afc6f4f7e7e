//! Solver configuration.
//!
//! All tunables of the search loop live here so that the CLI and tests can
//! construct solvers with explicit settings.

use clap::ValueEnum;

/// Restart policy of the solver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum RestartPolicy {
    /// Restart intervals follow the Luby sequence scaled by a base interval.
    Luby,
    /// Glue-driven restarts with alternating stable and unstable phases.
    #[default]
    Cadical,
}

/// Branching heuristics that compete under the bandit selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum HeuristicKind {
    Vsids,
    Evsids,
    Lrb,
    Chb,
}

/// The set of literals fed to the heuristics as conflict participants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ConflictLits {
    /// The trail literals that were resolved away during conflict analysis.
    #[default]
    ConflictSide,
    /// The literals of the conflicting clause itself.
    ConflictClause,
}

#[derive(Debug, Clone)]
pub struct SolverConfig {
    /// Heuristics available to the bandit. Must not be empty.
    pub heuristics: Vec<HeuristicKind>,
    pub conflict_lits: ConflictLits,
    pub restart: RestartPolicy,
    /// Eliminate learned clauses that are subsumed by a newly learned clause.
    pub subsumption: bool,
    /// Base of the conflict interval between clause database reductions.
    pub reduce_base: u64,
    /// Exploration factor of the bandit's confidence bound.
    pub ucb_beta: f64,
    pub vsids: VsidsConfig,
    pub evsids: EvsidsConfig,
    pub lrb: LrbConfig,
    pub chb: ChbConfig,
    pub luby: LubyConfig,
    pub cadical: CadicalConfig,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            heuristics: vec![
                HeuristicKind::Vsids,
                HeuristicKind::Evsids,
                HeuristicKind::Lrb,
                HeuristicKind::Chb,
            ],
            conflict_lits: ConflictLits::default(),
            restart: RestartPolicy::default(),
            subsumption: true,
            reduce_base: 300,
            ucb_beta: 0.5,
            vsids: VsidsConfig::default(),
            evsids: EvsidsConfig::default(),
            lrb: LrbConfig::default(),
            chb: ChbConfig::default(),
            luby: LubyConfig::default(),
            cadical: CadicalConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct VsidsConfig {
    /// Scores are divided by this factor after every conflict.
    pub decay: f64,
}

impl Default for VsidsConfig {
    fn default() -> Self {
        Self { decay: 0.95 }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct EvsidsConfig {
    /// Growth factor of the bump increment.
    pub bump_growth: f64,
}

impl Default for EvsidsConfig {
    fn default() -> Self {
        Self { bump_growth: 1.2 }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct LrbConfig {
    /// Initial step size of the reward moving average.
    pub alpha: f64,
    /// Annealing floor of the step size.
    pub alpha_min: f64,
    /// Step size decrement per conflict.
    pub alpha_step: f64,
    /// Decay applied to the scores of unassigned variables per conflict.
    pub locality_decay: f64,
}

impl Default for LrbConfig {
    fn default() -> Self {
        Self { alpha: 0.4, alpha_min: 0.06, alpha_step: 1e-6, locality_decay: 0.95 }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ChbConfig {
    /// Initial step size of the reward moving average.
    pub step: f64,
    /// Annealing floor of the step size.
    pub step_min: f64,
    /// Step size decrement per conflict.
    pub step_decay: f64,
}

impl Default for ChbConfig {
    fn default() -> Self {
        Self { step: 0.4, step_min: 0.06, step_decay: 1e-6 }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct LubyConfig {
    /// Base restart interval, multiplied by the Luby sequence.
    pub base: u64,
}

impl Default for LubyConfig {
    fn default() -> Self {
        Self { base: 1024 }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct CadicalConfig {
    /// Minimum number of conflicts between two restarts in the unstable phase.
    pub interval: u64,
    /// The fast glue average must exceed the slow one by this margin to restart.
    pub margin: f64,
    /// Smoothing factor of the fast glue average.
    pub alpha_fast: f64,
    /// Smoothing factor of the slow glue average.
    pub alpha_slow: f64,
    /// Alternate between stable and unstable phases.
    pub stabilize: bool,
    /// Conflict count of the first phase switch.
    pub stabilize_init: f64,
    /// Growth factor of the phase length.
    pub stabilize_factor: f64,
    /// Upper bound on the phase length increment.
    pub stabilize_max: f64,
    /// Base interval of the reluctant doubling sequence in the stable phase.
    pub reluctant_period: u64,
    /// Cap on the reluctant doubling state.
    pub reluctant_max: u64,
}

impl Default for CadicalConfig {
    fn default() -> Self {
        Self {
            interval: 32,
            margin: 0.25,
            alpha_fast: 1.0 / 32.0,
            alpha_slow: 1.0 / 256.0,
            stabilize: true,
            stabilize_init: 1e3,
            stabilize_factor: 2.0,
            stabilize_max: 2e9,
            reluctant_period: 1024,
            reluctant_max: 1_048_576,
        }
    }
}
