//! Single-machine sequencing with precedence constraints.

use crate::antq::{AntqError, AntqProblem, Edge, PrecedenceMatrix, PrecedenceProblem};

/// Orders jobs on one machine to minimize total weighted completion time,
/// subject to precedence constraints.
///
/// A tour's visiting order is the processing order; the closing edge
/// carries no cost. The heuristic favors high `weight / duration` jobs
/// (Smith's ratio rule).
#[derive(Debug, Clone)]
pub struct SequencingProblem {
    durations: Vec<f64>,
    weights: Vec<f64>,
    precedence: PrecedenceMatrix,
}

impl SequencingProblem {
    /// # Errors
    /// Fails when the vectors and the matrix disagree on the job count,
    /// a duration is not strictly positive, or a weight is negative.
    pub fn new(
        durations: Vec<f64>,
        weights: Vec<f64>,
        precedence: PrecedenceMatrix,
    ) -> Result<Self, AntqError> {
        let n = durations.len();
        if weights.len() != n || precedence.len() != n {
            return Err(AntqError::InvalidInstance(format!(
                "{n} durations, {} weights, {}x{} precedence matrix",
                weights.len(),
                precedence.len(),
                precedence.len()
            )));
        }
        if let Some(d) = durations.iter().find(|d| !(**d > 0.0 && d.is_finite())) {
            return Err(AntqError::InvalidInstance(format!(
                "duration must be positive, got {d}"
            )));
        }
        if let Some(w) = weights.iter().find(|w| !(**w >= 0.0 && w.is_finite())) {
            return Err(AntqError::InvalidInstance(format!(
                "weight must be non-negative, got {w}"
            )));
        }
        Ok(Self {
            durations,
            weights,
            precedence,
        })
    }

    /// Total weighted completion time of jobs processed in `order`.
    pub fn weighted_completion<I>(&self, order: I) -> f64
    where
        I: IntoIterator<Item = usize>,
    {
        let mut clock = 0.0;
        let mut total = 0.0;
        for job in order {
            clock += self.durations[job];
            total += self.weights[job] * clock;
        }
        total
    }
}

impl AntqProblem for SequencingProblem {
    fn number_of_nodes(&self) -> usize {
        self.durations.len()
    }

    /// `1 / (n * mean duration)`.
    fn initial_pheromone(&self) -> f64 {
        let total: f64 = self.durations.iter().sum();
        if total > 0.0 {
            1.0 / total
        } else {
            1.0
        }
    }

    fn heuristic_value(&self, _from: usize, to: usize) -> f64 {
        self.weights[to] / self.durations[to]
    }

    fn calculate_solution_value(&self, tour: &[Edge]) -> f64 {
        self.weighted_completion(tour.iter().map(|e| e.from))
    }

    fn is_solution_best(&self, candidate: f64, best: f64) -> bool {
        candidate < best
    }
}

impl PrecedenceProblem for SequencingProblem {
    fn precedence(&self) -> &PrecedenceMatrix {
        &self.precedence
    }
}
