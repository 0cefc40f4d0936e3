//! Error types for Ant-Q setup and agent moves.

use thiserror::Error;

/// Errors raised while setting up a run or driving an agent.
///
/// Numerical degeneracies inside a run (NaN or infinite action choices,
/// an all-zero probability distribution) are never reported here; they
/// are neutralized where they occur.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AntqError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("problem has no nodes")]
    EmptyProblem,

    #[error("initial pheromone must be finite and non-negative, got {0}")]
    InvalidInitialPheromone(f64),

    #[error("precedence matrix is {got}x{got}, expected {expected}x{expected}")]
    PrecedenceSizeMismatch { expected: usize, got: usize },

    #[error("precedence graph contains a cycle through node {node}")]
    CyclicPrecedence { node: usize },

    #[error("invalid move to node {node}: {reason}")]
    InvalidMove { node: usize, reason: &'static str },

    #[error("invalid instance: {0}")]
    InvalidInstance(String),
}
