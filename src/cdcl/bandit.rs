//! Multi-armed bandit selection of the branching heuristic

/// UCB1 bandit over the enabled branching heuristics.
///
/// The first `num_arms` selections round-robin so that every arm is tried
/// once, afterwards the arm maximizing `mean + beta * sqrt(2 ln(t+1) / pulls)`
/// is played. Rewards arrive once per restart.
#[derive(Debug, Clone)]
pub(crate) struct Ucb {
    emp_means: Vec<f64>,
    num_pulls: Vec<u64>,
    beta: f64,
    rounds: u64,
}

impl Ucb {
    pub(crate) fn new(num_arms: usize, beta: f64) -> Self {
        assert!(num_arms > 0);
        Self {
            emp_means: vec![0.0; num_arms],
            num_pulls: vec![0; num_arms],
            beta,
            rounds: 0,
        }
    }

    /// The arm to play next. Ties go to the lower index.
    pub(crate) fn select(&self) -> usize {
        if self.rounds < self.emp_means.len() as u64 {
            return self.rounds as usize;
        }
        let exploration = 2.0 * ((self.rounds + 1) as f64).ln();
        let mut best = 0;
        let mut best_bound = f64::NEG_INFINITY;
        for (arm, &mean) in self.emp_means.iter().enumerate() {
            let bound = mean + self.beta * (exploration / self.num_pulls[arm] as f64).sqrt();
            if bound > best_bound {
                best = arm;
                best_bound = bound;
            }
        }
        best
    }

    /// Credits `reward` to `arm` and closes the round.
    pub(crate) fn reward(&mut self, arm: usize, reward: f64) {
        let pulls = self.num_pulls[arm] as f64;
        self.emp_means[arm] = self.emp_means[arm] * (pulls / (pulls + 1.0)) + reward / (pulls + 1.0);
        self.num_pulls[arm] += 1;
        self.rounds += 1;
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn plays_every_arm_once() {
        let mut bandit = Ucb::new(3, 0.5);
        for expected in 0..3 {
            let arm = bandit.select();
            assert_eq!(arm, expected);
            bandit.reward(arm, 1.0);
        }
    }

    #[test]
    fn prefers_the_rewarding_arm() {
        let mut bandit = Ucb::new(2, 0.5);
        bandit.reward(0, 0.1);
        bandit.reward(1, 10.0);
        assert_eq!(bandit.select(), 1);
    }

    #[test]
    fn mean_is_running_average() {
        let mut bandit = Ucb::new(1, 0.5);
        bandit.reward(0, 1.0);
        bandit.reward(0, 3.0);
        assert!((bandit.emp_means[0] - 2.0).abs() < 1e-9);
    }

    #[test]
    fn exploration_bonus_revives_starved_arms() {
        let mut bandit = Ucb::new(2, 10.0);
        bandit.reward(0, 1.0);
        bandit.reward(1, 0.9);
        // arm 1 trails slightly on mean but a large beta keeps both in play
        for _ in 0..4 {
            let arm = bandit.select();
            bandit.reward(arm, if arm == 0 { 1.0 } else { 0.9 });
        }
        assert!(bandit.num_pulls[1] >= 2);
    }
}
