//! Ant-Q search engine.
//!
//! An Ant Colony Optimization variant that treats pheromone as a learned
//! Q-value. Agents build tours with a pseudo-random-proportional rule;
//! every move receives a delayed reinforcement from the best pheromone
//! reachable next, and the best tour of each iteration receives a global
//! reinforcement inversely proportional to its value.
//!
//! # Core Types
//!
//! - [`AntqProblem`]: problem adapter supplying heuristic, evaluation and
//!   comparison
//! - [`PrecedenceProblem`]: adapter extension for ordering constraints
//! - [`PheromoneMatrix`]: learned edge desirabilities
//! - [`Agent`] / [`ConstrainedAgent`]: tour construction state machines
//! - [`AntqRunner`]: executes a run and returns an [`AntqResult`]
//!
//! # References
//!
//! - Gambardella & Dorigo (1995), "Ant-Q: A Reinforcement Learning approach
//!   to the traveling salesman problem"
//! - Dorigo & Gambardella (1997), "Ant Colony System: A Cooperative Learning
//!   Approach to the Traveling Salesman Problem"

mod agent;
mod config;
mod error;
mod pheromone;
mod precedence;
mod runner;
mod types;

pub use agent::{roulette, Agent, AgentState, Ant};
pub use config::AntqConfig;
pub use error::AntqError;
pub use pheromone::PheromoneMatrix;
pub use precedence::{ConstrainedAgent, PrecedenceMatrix};
pub use runner::{AntqResult, AntqRunner};
pub use types::{AntqProblem, Edge, Node, PrecedenceProblem};
