//! Domain-agnostic Ant-Q optimization engine.
//!
//! Searches orderings of a finite node set with a colony of agents that
//! share a pheromone matrix:
//!
//! - **Ant-Q**: pheromone-as-Q-value learning with delayed and global
//!   reinforcement, pseudo-random-proportional transitions, and
//!   precedence-constrained agents that insert required predecessors
//!   before a chosen node.
//! - **Reference problems**: a traveling salesman adapter and a
//!   single-machine sequencing adapter with precedence constraints.
//!
//! # Architecture
//!
//! The engine knows nothing about the meaning of nodes or tour values.
//! Problems plug in through [`antq::AntqProblem`], which supplies the
//! heuristic, evaluates tours and decides which of two values is better.

pub mod antq;
pub mod problems;
pub mod random;
