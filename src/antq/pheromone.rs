//! Pheromone matrix and action choice.

use super::config::AntqConfig;
use super::types::{AntqProblem, Edge};

/// Dense `n x n` table of learned edge desirabilities.
///
/// Off-diagonal entries start at the problem's initial pheromone; the
/// diagonal is 0 and no update ever touches it.
#[derive(Debug, Clone)]
pub struct PheromoneMatrix {
    n: usize,
    values: Vec<f64>,
}

impl PheromoneMatrix {
    /// Creates an `n x n` matrix filled with `initial` off the diagonal.
    pub fn new(n: usize, initial: f64) -> Self {
        let mut values = vec![initial; n * n];
        for i in 0..n {
            values[i * n + i] = 0.0;
        }
        Self { n, values }
    }

    /// Number of nodes.
    pub fn len(&self) -> usize {
        self.n
    }

    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    #[inline]
    pub fn get(&self, from: usize, to: usize) -> f64 {
        self.values[from * self.n + to]
    }

    /// Combined score `AQ(i, j)^delta * HE(i, j)^beta`.
    ///
    /// A NaN or infinite score is reported as 0.
    pub fn action_choice<P: AntqProblem + ?Sized>(
        &self,
        from: usize,
        to: usize,
        problem: &P,
        config: &AntqConfig,
    ) -> f64 {
        let score = self.get(from, to).powf(config.delta)
            * problem.heuristic_value(from, to).powf(config.beta);
        if score.is_finite() {
            score
        } else {
            0.0
        }
    }

    /// Largest pheromone on an edge leaving `from` towards a node for which
    /// `is_open` holds. 0 when no such node exists.
    pub fn max_reachable<F>(&self, from: usize, is_open: F) -> f64
    where
        F: Fn(usize) -> bool,
    {
        (0..self.n)
            .filter(|&j| j != from && is_open(j))
            .map(|j| self.get(from, j))
            .fold(0.0, f64::max)
    }

    /// Applies the Ant-Q learning rule to one edge:
    ///
    /// `AQ <- (1 - alpha) * AQ + alpha * (reinforcement + gamma * max_next)`.
    ///
    /// Self-loops are ignored. A non-finite reinforcement counts as 0.
    pub fn reinforce(&mut self, edge: Edge, reinforcement: f64, max_next: f64, config: &AntqConfig) {
        if edge.is_loop() {
            return;
        }
        // Negative or non-finite rewards would drive pheromone below zero.
        let reinforcement = if reinforcement.is_finite() && reinforcement > 0.0 {
            reinforcement
        } else {
            0.0
        };
        let idx = edge.from * self.n + edge.to;
        let current = self.values[idx];
        self.values[idx] =
            (1.0 - config.alpha) * current + config.alpha * (reinforcement + config.gamma * max_next);
    }

    /// Delayed update after a move: zero reinforcement, discounted best
    /// pheromone reachable from the new node.
    pub fn delayed_update(&mut self, edge: Edge, max_next: f64, config: &AntqConfig) {
        self.reinforce(edge, 0.0, max_next, config);
    }

    /// Global update for every edge of the iteration-best tour.
    pub fn global_update(&mut self, tour: &[Edge], value: f64, config: &AntqConfig) {
        let reinforcement = config.w / value;
        for &edge in tour {
            self.reinforce(edge, reinforcement, 0.0, config);
        }
    }
}
