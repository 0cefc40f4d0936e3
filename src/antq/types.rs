//! Core types and problem traits for Ant-Q.

use super::precedence::PrecedenceMatrix;

/// A node of the problem's ground set.
///
/// The index addresses every per-node array of a run. Coordinates are
/// only meaningful to geometric problems.
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Node {
    /// Position in `0..n`.
    pub index: usize,
    /// Optional planar coordinates.
    pub position: Option<(f64, f64)>,
}

impl Node {
    /// Creates a node without coordinates.
    pub fn new(index: usize) -> Self {
        Self {
            index,
            position: None,
        }
    }

    /// Creates a node at `(x, y)`.
    pub fn at(index: usize, x: f64, y: f64) -> Self {
        Self {
            index,
            position: Some((x, y)),
        }
    }

    /// Euclidean distance to `other`, or `None` if either node lacks coordinates.
    pub fn distance_to(&self, other: &Node) -> Option<f64> {
        let (x1, y1) = self.position?;
        let (x2, y2) = other.position?;
        Some((x1 - x2).hypot(y1 - y2))
    }
}

/// Nodes with the same index are equal. Nodes with different indices are
/// still equal when both carry identical coordinates.
impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        if self.index == other.index {
            return true;
        }
        match (self.position, other.position) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        }
    }
}

/// A directed edge between two node indices.
///
/// `(a, b)` and `(b, a)` are distinct edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Edge {
    pub from: usize,
    pub to: usize,
}

impl Edge {
    pub fn new(from: usize, to: usize) -> Self {
        Self { from, to }
    }

    /// Returns `true` for a self-loop.
    pub fn is_loop(&self) -> bool {
        self.from == self.to
    }
}

/// Defines a problem the Ant-Q engine can search.
///
/// The engine never interprets tour values itself: the direction of
/// optimization lives entirely in [`is_solution_best`](AntqProblem::is_solution_best).
///
/// # Examples
///
/// ```ignore
/// struct Tsp { d: Vec<Vec<f64>> }
///
/// impl AntqProblem for Tsp {
///     fn number_of_nodes(&self) -> usize { self.d.len() }
///     fn initial_pheromone(&self) -> f64 { 1.0 }
///     fn heuristic_value(&self, from: usize, to: usize) -> f64 { 1.0 / self.d[from][to] }
///     fn calculate_solution_value(&self, tour: &[Edge]) -> f64 {
///         tour.iter().map(|e| self.d[e.from][e.to]).sum()
///     }
///     fn is_solution_best(&self, candidate: f64, best: f64) -> bool { candidate < best }
/// }
/// ```
pub trait AntqProblem: Send + Sync {
    /// Number of nodes in the ground set.
    fn number_of_nodes(&self) -> usize;

    /// Pheromone value every off-diagonal edge starts a run with.
    fn initial_pheromone(&self) -> f64;

    /// Problem-specific desirability of moving from `from` to `to`.
    ///
    /// Should be finite and positive. Non-finite action choices that
    /// result from it are treated as 0 by the engine.
    fn heuristic_value(&self, from: usize, to: usize) -> f64;

    /// Evaluates a complete tour.
    fn calculate_solution_value(&self, tour: &[Edge]) -> f64;

    /// Returns `true` when `candidate` is strictly preferable to `best`.
    fn is_solution_best(&self, candidate: f64, best: f64) -> bool;
}

/// A problem whose nodes carry hard ordering constraints.
///
/// The precedence graph must be acyclic. The runner verifies this once
/// at setup and refuses to start otherwise.
pub trait PrecedenceProblem: AntqProblem {
    /// The precedence relation over all nodes.
    fn precedence(&self) -> &PrecedenceMatrix;

    /// Number of nodes without predecessors. One agent starts from each.
    fn root_count(&self) -> usize {
        self.precedence().roots().count()
    }
}
