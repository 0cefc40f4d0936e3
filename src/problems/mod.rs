//! Reference problem adapters.
//!
//! Minimal [`AntqProblem`](crate::antq::AntqProblem) implementations for
//! tour construction and precedence-constrained scheduling. Consumers with
//! richer instance formats implement the trait on their own types.

mod sequencing;
mod tsp;

pub use sequencing::SequencingProblem;
pub use tsp::TspProblem;
