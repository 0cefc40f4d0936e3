//! Traveling salesman adapter.

use crate::antq::{AntqError, AntqProblem, Edge, Node};

/// A traveling salesman instance over a dense distance matrix.
///
/// Distances may be asymmetric. Shorter tours are better.
///
/// # Examples
///
/// ```
/// use u_antq::problems::TspProblem;
///
/// let tsp = TspProblem::from_coordinates(&[(0.0, 0.0), (3.0, 4.0)]);
/// assert!((tsp.distance(0, 1) - 5.0).abs() < 1e-12);
/// ```
#[derive(Debug, Clone)]
pub struct TspProblem {
    n: usize,
    distances: Vec<f64>,
}

impl TspProblem {
    /// Euclidean instance from planar points, indexed in slice order.
    pub fn from_coordinates(points: &[(f64, f64)]) -> Self {
        let n = points.len();
        let mut distances = vec![0.0; n * n];
        for (i, &(x1, y1)) in points.iter().enumerate() {
            for (j, &(x2, y2)) in points.iter().enumerate() {
                distances[i * n + j] = (x1 - x2).hypot(y1 - y2);
            }
        }
        Self { n, distances }
    }

    /// Euclidean instance from positioned nodes.
    ///
    /// Node indices must cover `0..nodes.len()` exactly once and every
    /// node must carry coordinates.
    pub fn from_points(nodes: &[Node]) -> Result<Self, AntqError> {
        let n = nodes.len();
        let mut placed: Vec<Option<(f64, f64)>> = vec![None; n];
        for node in nodes {
            let position = node.position.ok_or_else(|| {
                AntqError::InvalidInstance(format!("node {} has no coordinates", node.index))
            })?;
            let Some(slot) = placed.get_mut(node.index) else {
                return Err(AntqError::InvalidInstance(format!(
                    "node index {} out of range for {n} nodes",
                    node.index
                )));
            };
            if slot.is_some() {
                return Err(AntqError::InvalidInstance(format!(
                    "duplicate node index {}",
                    node.index
                )));
            }
            *slot = Some(position);
        }
        let points: Vec<(f64, f64)> = placed.into_iter().flatten().collect();
        Ok(Self::from_coordinates(&points))
    }

    /// Instance from an explicit square matrix of non-negative distances.
    pub fn from_matrix(rows: Vec<Vec<f64>>) -> Result<Self, AntqError> {
        let n = rows.len();
        let mut distances = Vec::with_capacity(n * n);
        for (i, row) in rows.into_iter().enumerate() {
            if row.len() != n {
                return Err(AntqError::InvalidInstance(format!(
                    "row {i} has {} entries, expected {n}",
                    row.len()
                )));
            }
            if let Some(&d) = row.iter().find(|d| !(**d >= 0.0 && d.is_finite())) {
                return Err(AntqError::InvalidInstance(format!(
                    "row {i} contains invalid distance {d}"
                )));
            }
            distances.extend(row);
        }
        Ok(Self { n, distances })
    }

    #[inline]
    pub fn distance(&self, from: usize, to: usize) -> f64 {
        self.distances[from * self.n + to]
    }

    /// Sum of edge distances.
    pub fn tour_length(&self, tour: &[Edge]) -> f64 {
        tour.iter().map(|e| self.distance(e.from, e.to)).sum()
    }

    fn mean_distance(&self) -> f64 {
        if self.n < 2 {
            return 0.0;
        }
        let total: f64 = (0..self.n)
            .flat_map(|i| (0..self.n).filter(move |&j| j != i).map(move |j| (i, j)))
            .map(|(i, j)| self.distance(i, j))
            .sum();
        total / (self.n * (self.n - 1)) as f64
    }
}

impl AntqProblem for TspProblem {
    fn number_of_nodes(&self) -> usize {
        self.n
    }

    /// `1 / (n * mean distance)`, or 1 when every distance is 0.
    fn initial_pheromone(&self) -> f64 {
        let mean = self.mean_distance();
        if mean > 0.0 {
            1.0 / (self.n as f64 * mean)
        } else {
            1.0
        }
    }

    fn heuristic_value(&self, from: usize, to: usize) -> f64 {
        1.0 / self.distance(from, to)
    }

    fn calculate_solution_value(&self, tour: &[Edge]) -> f64 {
        self.tour_length(tour)
    }

    fn is_solution_best(&self, candidate: f64, best: f64) -> bool {
        candidate < best
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> TspProblem {
        TspProblem::from_coordinates(&[(0.0, 0.0), (0.0, 1.0), (1.0, 1.0), (1.0, 0.0)])
    }

    #[test]
    fn test_square_distances() {
        let tsp = square();
        assert_eq!(tsp.number_of_nodes(), 4);
        assert!((tsp.distance(0, 1) - 1.0).abs() < 1e-12);
        assert!((tsp.distance(0, 2) - 2f64.sqrt()).abs() < 1e-12);
        assert_eq!(tsp.distance(2, 2), 0.0);
    }

    #[test]
    fn test_tour_length() {
        let tsp = square();
        let perimeter = [
            Edge::new(0, 1),
            Edge::new(1, 2),
            Edge::new(2, 3),
            Edge::new(3, 0),
        ];
        assert!((tsp.calculate_solution_value(&perimeter) - 4.0).abs() < 1e-12);
        assert!(tsp.is_solution_best(4.0, 4.5));
        assert!(!tsp.is_solution_best(4.0, 4.0));
    }

    #[test]
    fn test_initial_pheromone_from_mean_distance() {
        let tsp = square();
        // 8 unit edges and 4 diagonals over 12 ordered pairs
        let mean = (8.0 + 4.0 * 2f64.sqrt()) / 12.0;
        assert!((tsp.initial_pheromone() - 1.0 / (4.0 * mean)).abs() < 1e-12);

        let single = TspProblem::from_coordinates(&[(1.0, 1.0)]);
        assert_eq!(single.initial_pheromone(), 1.0);
    }

    #[test]
    fn test_heuristic_zero_distance_is_infinite() {
        let tsp = TspProblem::from_coordinates(&[(0.0, 0.0), (0.0, 0.0), (1.0, 0.0)]);
        assert!(tsp.heuristic_value(0, 1).is_infinite());
        assert!((tsp.heuristic_value(0, 2) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_from_points() {
        let nodes = [Node::at(1, 0.0, 1.0), Node::at(0, 0.0, 0.0)];
        let tsp = TspProblem::from_points(&nodes).unwrap();
        assert!((tsp.distance(0, 1) - 1.0).abs() < 1e-12);

        assert!(TspProblem::from_points(&[Node::new(0)]).is_err());
        assert!(TspProblem::from_points(&[Node::at(0, 0.0, 0.0), Node::at(0, 1.0, 1.0)]).is_err());
        assert!(TspProblem::from_points(&[Node::at(4, 0.0, 0.0)]).is_err());
    }

    #[test]
    fn test_from_matrix_asymmetric() {
        let tsp = TspProblem::from_matrix(vec![vec![0.0, 2.0], vec![5.0, 0.0]]).unwrap();
        assert_eq!(tsp.distance(0, 1), 2.0);
        assert_eq!(tsp.distance(1, 0), 5.0);
    }

    #[test]
    fn test_from_matrix_rejects_bad_input() {
        assert!(TspProblem::from_matrix(vec![vec![0.0, 1.0], vec![1.0]]).is_err());
        assert!(TspProblem::from_matrix(vec![vec![0.0, -1.0], vec![1.0, 0.0]]).is_err());
        assert!(TspProblem::from_matrix(vec![vec![0.0, f64::NAN], vec![1.0, 0.0]]).is_err());
    }
}
