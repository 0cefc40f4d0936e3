//! Ant-Q configuration.

use super::error::AntqError;

/// Configuration for the Ant-Q algorithm.
///
/// # Learning rule
///
/// Each directed edge `(i, j)` carries a pheromone value `AQ(i, j)`,
/// updated as
///
/// ```text
/// AQ(i, j) <- (1 - alpha) * AQ(i, j) + alpha * (reinforcement + gamma * max AQ(j, z))
/// ```
///
/// where the maximum ranges over nodes `z` the agent may still visit.
/// The *delayed* update uses `reinforcement = 0` after every move; the
/// *global* update uses `reinforcement = w / value` on the edges of the
/// iteration-best tour, with the neighbor term set to 0.
///
/// # Transition rule
///
/// With probability `q0` an agent exploits: it moves to the unvisited
/// node maximizing `AQ(i, j)^delta * HE(i, j)^beta`. Otherwise it
/// explores by roulette over the same scores normalized to probabilities.
///
/// # References
///
/// Gambardella & Dorigo (1995), "Ant-Q: A Reinforcement Learning approach
/// to the traveling salesman problem"
///
/// # Examples
///
/// ```
/// use u_antq::antq::AntqConfig;
///
/// let config = AntqConfig::default()
///     .with_iterations(200)
///     .with_q0(0.8)
///     .with_seed(42);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AntqConfig {
    /// Learning rate, in (0, 1].
    pub alpha: f64,

    /// Discount factor applied to the best reachable pheromone. Non-negative.
    pub gamma: f64,

    /// Exponent on the pheromone term of the action choice.
    pub delta: f64,

    /// Exponent on the heuristic term of the action choice.
    pub beta: f64,

    /// Probability of exploitation, in [0, 1].
    pub q0: f64,

    /// Numerator of the global reinforcement `w / value`.
    pub w: f64,

    /// Number of iterations. Every agent builds one complete tour per iteration.
    pub iterations: usize,

    /// Random seed for reproducibility.
    pub seed: Option<u64>,
}

impl Default for AntqConfig {
    fn default() -> Self {
        Self {
            alpha: 0.1,
            gamma: 0.3,
            delta: 1.0,
            beta: 2.0,
            q0: 0.9,
            w: 10.0,
            iterations: 100,
            seed: None,
        }
    }
}

impl AntqConfig {
    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    pub fn with_gamma(mut self, gamma: f64) -> Self {
        self.gamma = gamma;
        self
    }

    /// Sets both action-choice exponents.
    pub fn with_exponents(mut self, delta: f64, beta: f64) -> Self {
        self.delta = delta;
        self.beta = beta;
        self
    }

    pub fn with_q0(mut self, q0: f64) -> Self {
        self.q0 = q0;
        self
    }

    pub fn with_w(mut self, w: f64) -> Self {
        self.w = w;
        self
    }

    pub fn with_iterations(mut self, n: usize) -> Self {
        self.iterations = n;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), AntqError> {
        if self.iterations == 0 {
            return Err(AntqError::InvalidConfig(
                "iterations must be at least 1".into(),
            ));
        }
        if !(self.alpha > 0.0 && self.alpha <= 1.0) {
            return Err(AntqError::InvalidConfig(format!(
                "alpha must be in (0, 1], got {}",
                self.alpha
            )));
        }
        if !(self.gamma >= 0.0 && self.gamma.is_finite()) {
            return Err(AntqError::InvalidConfig(format!(
                "gamma must be finite and non-negative, got {}",
                self.gamma
            )));
        }
        if !(self.delta >= 0.0 && self.delta.is_finite()) {
            return Err(AntqError::InvalidConfig(format!(
                "delta must be finite and non-negative, got {}",
                self.delta
            )));
        }
        if !(self.beta >= 0.0 && self.beta.is_finite()) {
            return Err(AntqError::InvalidConfig(format!(
                "beta must be finite and non-negative, got {}",
                self.beta
            )));
        }
        if !(0.0..=1.0).contains(&self.q0) {
            return Err(AntqError::InvalidConfig(format!(
                "q0 must be in [0, 1], got {}",
                self.q0
            )));
        }
        if !(self.w > 0.0 && self.w.is_finite()) {
            return Err(AntqError::InvalidConfig(format!(
                "w must be finite and positive, got {}",
                self.w
            )));
        }
        Ok(())
    }
}
