//! Agents and the pseudo-random-proportional transition rule.
//!
//! An [`Agent`] only *chooses*; committing a move is a separate call so
//! that variants such as
//! [`ConstrainedAgent`](super::precedence::ConstrainedAgent) can rewrite a
//! choice before any tour slot is consumed.

use super::config::AntqConfig;
use super::error::AntqError;
use super::pheromone::PheromoneMatrix;
use super::types::{AntqProblem, Edge};
use rand::Rng;

/// Lifecycle of an agent within one iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgentState {
    /// Positioned on its start node, no move made yet.
    Unstarted,
    /// At least one move made, tour still open.
    Traversing,
    /// Returned to its start node. Only [`Agent::reset`] leaves this state.
    Closed,
}

/// A single ant: position, visited mask and the tour built so far.
#[derive(Debug, Clone)]
pub struct Agent {
    start: usize,
    current: usize,
    visited: Vec<bool>,
    remaining: usize,
    path: Vec<usize>,
    tour: Vec<Edge>,
    state: AgentState,
}

impl Agent {
    /// Creates an agent for an `n`-node problem, positioned on `start`.
    ///
    /// # Errors
    /// Returns [`AntqError::InvalidMove`] if `start >= n`.
    pub fn new(start: usize, n: usize) -> Result<Self, AntqError> {
        if start >= n {
            return Err(AntqError::InvalidMove {
                node: start,
                reason: "start node out of range",
            });
        }
        let mut agent = Self {
            start,
            current: start,
            visited: vec![false; n],
            remaining: 0,
            path: Vec::with_capacity(n),
            tour: Vec::with_capacity(n),
            state: AgentState::Unstarted,
        };
        agent.reset();
        Ok(agent)
    }

    /// Clears the tour and reloads every node except the start as unvisited.
    pub fn reset(&mut self) {
        self.visited.fill(false);
        self.visited[self.start] = true;
        self.remaining = self.visited.len() - 1;
        self.current = self.start;
        self.path.clear();
        self.path.push(self.start);
        self.tour.clear();
        self.state = AgentState::Unstarted;
    }

    pub fn start(&self) -> usize {
        self.start
    }

    pub fn current(&self) -> usize {
        self.current
    }

    pub fn state(&self) -> AgentState {
        self.state
    }

    /// Edges committed so far. `n` edges once the tour is closed.
    pub fn tour(&self) -> &[Edge] {
        &self.tour
    }

    /// Nodes in visiting order, starting with the start node.
    pub fn path(&self) -> &[usize] {
        &self.path
    }

    #[inline]
    pub fn is_visited(&self, node: usize) -> bool {
        self.visited[node]
    }

    /// Number of nodes not yet visited.
    pub fn remaining(&self) -> usize {
        self.remaining
    }

    /// Unvisited nodes in index order.
    pub fn unvisited(&self) -> impl Iterator<Item = usize> + '_ {
        self.visited
            .iter()
            .enumerate()
            .filter(|&(_, &v)| !v)
            .map(|(j, _)| j)
    }

    /// Returns `true` once the agent has returned to its start node.
    pub fn is_tour_complete(&self) -> bool {
        self.state == AgentState::Closed
    }

    /// Applies the transition rule from the current node.
    ///
    /// Returns `None` when every node has been visited; the only legal
    /// move left is then the closing move back to [`start`](Agent::start).
    pub fn choose_next_node<P, R>(
        &self,
        pheromone: &PheromoneMatrix,
        problem: &P,
        config: &AntqConfig,
        rng: &mut R,
    ) -> Option<usize>
    where
        P: AntqProblem + ?Sized,
        R: Rng,
    {
        let first = self.unvisited().next()?;
        if self.remaining == 1 {
            return Some(first);
        }

        let q: f64 = rng.random();
        if q <= config.q0 {
            return Some(self.exploit(pheromone, problem, config));
        }

        let probabilities = self.transition_probabilities(pheromone, problem, config);
        let weighted: Vec<(usize, f64)> = self
            .unvisited()
            .map(|j| (j, probabilities[j]))
            .collect();
        let needle: f64 = rng.random();
        Some(roulette(&weighted, needle).unwrap_or(first))
    }

    /// Unvisited node with the highest action choice. Ties go to the lowest index.
    fn exploit<P: AntqProblem + ?Sized>(
        &self,
        pheromone: &PheromoneMatrix,
        problem: &P,
        config: &AntqConfig,
    ) -> usize {
        let mut best = self.current;
        let mut best_score = f64::NEG_INFINITY;
        for j in self.unvisited() {
            let score = pheromone.action_choice(self.current, j, problem, config);
            if score > best_score {
                best = j;
                best_score = score;
            }
        }
        best
    }

    /// Probability of moving to each node: action choice normalized over
    /// the unvisited nodes, 0 for visited ones.
    ///
    /// All entries are 0 when the action choices sum to 0.
    pub fn transition_probabilities<P: AntqProblem + ?Sized>(
        &self,
        pheromone: &PheromoneMatrix,
        problem: &P,
        config: &AntqConfig,
    ) -> Vec<f64> {
        let mut probabilities = vec![0.0; self.visited.len()];
        let mut total = 0.0;
        for j in self.unvisited() {
            let score = pheromone.action_choice(self.current, j, problem, config);
            probabilities[j] = score;
            total += score;
        }

        if total <= 0.0 || !total.is_finite() {
            probabilities.fill(0.0);
            return probabilities;
        }
        for p in &mut probabilities {
            *p /= total;
        }
        probabilities
    }

    /// Commits a move to `node` and returns the edge taken.
    ///
    /// Moving to the start node is only valid once every other node has
    /// been visited; it closes the tour.
    pub fn move_to(&mut self, node: usize) -> Result<Edge, AntqError> {
        if self.state == AgentState::Closed {
            return Err(AntqError::InvalidMove {
                node,
                reason: "tour already closed",
            });
        }
        if node >= self.visited.len() {
            return Err(AntqError::InvalidMove {
                node,
                reason: "node out of range",
            });
        }

        let edge = Edge::new(self.current, node);
        if node == self.start && self.remaining == 0 {
            self.tour.push(edge);
            self.current = node;
            self.state = AgentState::Closed;
            return Ok(edge);
        }
        if self.visited[node] {
            return Err(AntqError::InvalidMove {
                node,
                reason: "node already visited",
            });
        }

        self.visited[node] = true;
        self.remaining -= 1;
        self.path.push(node);
        self.tour.push(edge);
        self.current = node;
        self.state = AgentState::Traversing;
        Ok(edge)
    }
}

/// An agent the runner can drive.
///
/// [`plan_moves`](Ant::plan_moves) reads shared state only; the runner
/// commits the returned nodes in order afterwards.
pub trait Ant {
    fn agent(&self) -> &Agent;

    fn agent_mut(&mut self) -> &mut Agent;

    /// Prepares the agent for a new iteration.
    fn reset(&mut self) -> Result<(), AntqError> {
        self.agent_mut().reset();
        Ok(())
    }

    /// Nodes to commit for this agent's next step, in order. Never empty
    /// while the tour is open.
    fn plan_moves<P, R>(
        &self,
        pheromone: &PheromoneMatrix,
        problem: &P,
        config: &AntqConfig,
        rng: &mut R,
    ) -> Result<Vec<usize>, AntqError>
    where
        P: AntqProblem + ?Sized,
        R: Rng;
}

impl Ant for Agent {
    fn agent(&self) -> &Agent {
        self
    }

    fn agent_mut(&mut self) -> &mut Agent {
        self
    }

    fn plan_moves<P, R>(
        &self,
        pheromone: &PheromoneMatrix,
        problem: &P,
        config: &AntqConfig,
        rng: &mut R,
    ) -> Result<Vec<usize>, AntqError>
    where
        P: AntqProblem + ?Sized,
        R: Rng,
    {
        let next = self
            .choose_next_node(pheromone, problem, config, rng)
            .unwrap_or(self.start);
        Ok(vec![next])
    }
}

/// Roulette selection over `(node, probability)` pairs.
///
/// Entries are visited in ascending probability order (ties keep their
/// input order) and the first whose running sum reaches `needle` wins.
/// Entries with zero probability are never selected. Returns `None` when
/// no entry has positive probability.
pub fn roulette(weighted: &[(usize, f64)], needle: f64) -> Option<usize> {
    let mut order: Vec<(usize, f64)> = weighted
        .iter()
        .copied()
        .filter(|&(_, p)| p > 0.0)
        .collect();
    order.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal));

    let mut cumulative = 0.0;
    for &(node, p) in &order {
        cumulative += p;
        if cumulative >= needle {
            return Some(node);
        }
    }

    // floating-point shortfall
    order.last().map(|&(node, _)| node)
}
