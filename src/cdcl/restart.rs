//! Restart policies

use crate::config::{CadicalConfig, LubyConfig};
use std::mem;

#[derive(Debug, Clone)]
pub(crate) enum Restarter {
    Luby(Luby),
    Cadical(Cadical),
}

impl Restarter {
    /// Asks the policy whether to restart now. Called once per conflict-free
    /// iteration of the search loop.
    pub(crate) fn should_restart(&mut self, conflicts: u64) -> bool {
        match self {
            Restarter::Luby(luby) => luby.should_restart(),
            Restarter::Cadical(cadical) => cadical.should_restart(conflicts),
        }
    }

    /// Feeds the glue of a freshly learned clause into the policy.
    pub(crate) fn update_glue(&mut self, glue: usize) {
        match self {
            Restarter::Luby(_) => {}
            Restarter::Cadical(cadical) => cadical.update_glue(glue),
        }
    }
}

/// Restarts at intervals following the Luby sequence, scaled by a base unit.
///
/// The sequence is generated incrementally: each element is either the next
/// power of two or a replay of the sequence since the last power of two.
#[derive(Debug, Clone)]
pub(crate) struct Luby {
    base: u64,
    counter: u64,
    limit: u64,
    seq: Vec<u64>,
    mult: u64,
    minu: usize,
}

impl Luby {
    pub(crate) fn new(config: LubyConfig) -> Self {
        let mut luby = Self {
            base: config.base,
            counter: 0,
            limit: 0,
            seq: Vec::new(),
            mult: 1,
            minu: 0,
        };
        luby.limit = luby.base * luby.next_luby();
        luby
    }

    fn next_luby(&mut self) -> u64 {
        let size = self.seq.len();
        let to_fill = size + 1;
        if (to_fill + 1).is_power_of_two() {
            self.seq.push(self.mult);
            self.mult *= 2;
            self.minu = to_fill;
        } else {
            let repeated = self.seq[to_fill - self.minu - 1];
            self.seq.push(repeated);
        }
        self.seq[size]
    }

    fn should_restart(&mut self) -> bool {
        self.counter += 1;
        if self.counter >= self.limit {
            self.counter = 0;
            self.limit = self.base * self.next_luby();
            return true;
        }
        false
    }
}

/// Glue-driven restarts with alternating stable phases.
///
/// An unstable phase restarts when the fast glue average outgrows the slow
/// one by a configured margin. A stable phase ignores glue quality and
/// restarts on a reluctant-doubling schedule instead. Each phase keeps its
/// own average pair; switching phases swaps them.
#[derive(Debug, Clone)]
pub(crate) struct Cadical {
    config: CadicalConfig,
    stable: bool,
    inc_stabilize: f64,
    lim_stabilize: f64,
    fast: f64,
    slow: f64,
    saved_fast: f64,
    saved_slow: f64,
    lim_restart: u64,
    reluctant: Reluctant,
}

impl Cadical {
    pub(crate) fn new(config: CadicalConfig) -> Self {
        Self {
            stable: true,
            inc_stabilize: config.stabilize_init,
            lim_stabilize: config.stabilize_init,
            fast: 1.0,
            slow: 1.0,
            saved_fast: 1.0,
            saved_slow: 1.0,
            lim_restart: config.interval,
            reluctant: Reluctant::new(config.reluctant_period, config.reluctant_max),
            config,
        }
    }

    fn should_restart(&mut self, conflicts: u64) -> bool {
        if self.stabilizing(conflicts) {
            return self.reluctant.triggered();
        }
        if conflicts <= self.lim_restart {
            return false;
        }
        let margin = 1.0 + self.config.margin;
        let restart = margin * self.slow <= self.fast;
        if restart {
            self.lim_restart = conflicts + self.config.interval;
        }
        restart
    }

    /// Advances the stabilization phase and reports whether it is active.
    fn stabilizing(&mut self, conflicts: u64) -> bool {
        if !self.config.stabilize {
            return false;
        }
        if conflicts as f64 >= self.lim_stabilize {
            self.stable = !self.stable;
            self.inc_stabilize *= self.config.stabilize_factor;
            if self.inc_stabilize > self.config.stabilize_max {
                self.inc_stabilize = self.config.stabilize_max;
            }
            self.lim_stabilize = conflicts as f64 + self.inc_stabilize;
            if self.lim_stabilize <= conflicts as f64 {
                self.lim_stabilize = conflicts as f64 + 1.0;
            }
            self.swap_averages();
        }
        self.stable
    }

    fn update_glue(&mut self, glue: usize) {
        if self.stable {
            self.reluctant.tick();
        }
        let glue = glue as f64;
        self.fast = (1.0 - self.config.alpha_fast) * self.fast + self.config.alpha_fast * glue;
        self.slow = (1.0 - self.config.alpha_slow) * self.slow + self.config.alpha_slow * glue;
    }

    /// Each phase tracks its own pair of averages.
    fn swap_averages(&mut self) {
        mem::swap(&mut self.fast, &mut self.saved_fast);
        mem::swap(&mut self.slow, &mut self.saved_slow);
    }
}

/// Knuth's reluctant doubling sequence, counted in learned clauses.
#[derive(Debug, Clone)]
struct Reluctant {
    period: u64,
    countdown: u64,
    u: u64,
    v: u64,
    limit: u64,
    limited: bool,
    trigger: bool,
}

impl Reluctant {
    fn new(period: u64, limit: u64) -> Self {
        Self {
            period,
            countdown: period,
            u: 1,
            v: 1,
            limit,
            limited: limit > 0,
            trigger: false,
        }
    }

    fn tick(&mut self) {
        if self.period == 0 || self.trigger {
            return;
        }
        self.countdown -= 1;
        if self.countdown > 0 {
            return;
        }
        if (self.u & self.u.wrapping_neg()) == self.v {
            self.u += 1;
            self.v = 1;
        } else {
            self.v *= 2;
        }
        if self.limited && self.v > self.limit {
            self.u = 1;
            self.v = 1;
        }
        self.countdown = self.v * self.period;
        self.trigger = true;
    }

    fn triggered(&mut self) -> bool {
        let trigger = self.trigger;
        self.trigger = false;
        trigger
    }
}
