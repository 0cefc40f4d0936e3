//! Precedence constraints and the precedence-constrained agent.
//!
//! When the transition rule selects a node that still has unvisited
//! predecessors, [`ConstrainedAgent`] inserts those predecessors first,
//! depth-first, so one step may commit several nodes at once.

use super::agent::{Agent, Ant};
use super::config::AntqConfig;
use super::error::AntqError;
use super::pheromone::PheromoneMatrix;
use super::types::AntqProblem;
use rand::Rng;
use std::collections::VecDeque;

/// Square boolean matrix: `requires(a, b)` means `b` must be visited before `a`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PrecedenceMatrix {
    n: usize,
    cells: Vec<bool>,
}

impl PrecedenceMatrix {
    /// Creates an unconstrained `n x n` matrix.
    pub fn new(n: usize) -> Self {
        Self {
            n,
            cells: vec![false; n * n],
        }
    }

    /// Builds a matrix from `(node, predecessor)` pairs.
    pub fn from_pairs(n: usize, pairs: &[(usize, usize)]) -> Result<Self, AntqError> {
        let mut matrix = Self::new(n);
        for &(node, predecessor) in pairs {
            matrix.require(node, predecessor)?;
        }
        Ok(matrix)
    }

    pub fn len(&self) -> usize {
        self.n
    }

    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    /// Declares that `predecessor` must come before `node`.
    pub fn require(&mut self, node: usize, predecessor: usize) -> Result<(), AntqError> {
        if node >= self.n || predecessor >= self.n {
            return Err(AntqError::InvalidInstance(format!(
                "precedence pair ({node}, {predecessor}) out of range for {} nodes",
                self.n
            )));
        }
        self.cells[node * self.n + predecessor] = true;
        Ok(())
    }

    #[inline]
    pub fn requires(&self, node: usize, predecessor: usize) -> bool {
        self.cells[node * self.n + predecessor]
    }

    /// Direct predecessors of `node` in index order.
    pub fn predecessors(&self, node: usize) -> impl Iterator<Item = usize> + '_ {
        (0..self.n).filter(move |&p| self.requires(node, p))
    }

    pub fn has_predecessors(&self, node: usize) -> bool {
        self.predecessors(node).next().is_some()
    }

    /// Nodes without predecessors, in index order.
    pub fn roots(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.n).filter(move |&node| !self.has_predecessors(node))
    }

    /// Verifies that the relation is a DAG (Kahn's algorithm).
    ///
    /// On failure the error names a node that lies on, or depends on, a cycle.
    pub fn check_acyclic(&self) -> Result<(), AntqError> {
        let mut pending: Vec<usize> = (0..self.n)
            .map(|node| self.predecessors(node).count())
            .collect();
        let mut ready: VecDeque<usize> = self.roots().collect();
        let mut released = 0;

        while let Some(p) = ready.pop_front() {
            released += 1;
            for node in 0..self.n {
                if self.requires(node, p) {
                    pending[node] -= 1;
                    if pending[node] == 0 {
                        ready.push_back(node);
                    }
                }
            }
        }

        if released == self.n {
            return Ok(());
        }
        let node = pending.iter().position(|&c| c > 0).unwrap_or(0);
        Err(AntqError::CyclicPrecedence { node })
    }
}

/// An [`Agent`] that never places a node before its predecessors.
///
/// A start node with predecessors is preceded by them: the tour begins at
/// the first node of its insertion order and walks the rest of that order
/// before any choice is made.
#[derive(Debug, Clone)]
pub struct ConstrainedAgent<'a> {
    agent: Agent,
    precedence: &'a PrecedenceMatrix,
    lead_in: Vec<usize>,
}

impl<'a> ConstrainedAgent<'a> {
    /// # Errors
    /// Fails if `start` is out of range or its predecessors form a cycle.
    pub fn new(start: usize, precedence: &'a PrecedenceMatrix) -> Result<Self, AntqError> {
        let n = precedence.len();
        let mut ant = Self {
            agent: Agent::new(start, n)?,
            precedence,
            lead_in: Vec::new(),
        };
        let order = ant.insertion_order(start)?;
        if let Some((&first, rest)) = order.split_first() {
            if first != start {
                ant.agent = Agent::new(first, n)?;
                ant.lead_in = rest.to_vec();
                ant.walk_lead_in()?;
            }
        }
        Ok(ant)
    }

    fn walk_lead_in(&mut self) -> Result<(), AntqError> {
        for &node in &self.lead_in {
            self.agent.move_to(node)?;
        }
        Ok(())
    }

    /// Nodes to commit so that `chosen` lands after all of its unvisited
    /// predecessors, transitively. `chosen` is always last.
    ///
    /// Predecessors are expanded depth-first in index order with an
    /// explicit stack.
    pub fn insertion_order(&self, chosen: usize) -> Result<Vec<usize>, AntqError> {
        let n = self.precedence.len();
        let mut order = Vec::new();
        let mut scheduled = vec![false; n];
        let mut on_stack = vec![false; n];
        // (node, next predecessor index to examine)
        let mut stack: Vec<(usize, usize)> = vec![(chosen, 0)];
        on_stack[chosen] = true;

        while let Some(&(node, cursor)) = stack.last() {
            let next = (cursor..n).find(|&p| {
                self.precedence.requires(node, p) && !self.agent.is_visited(p) && !scheduled[p]
            });
            match next {
                Some(p) => {
                    if on_stack[p] {
                        return Err(AntqError::CyclicPrecedence { node: p });
                    }
                    if let Some(top) = stack.last_mut() {
                        top.1 = p + 1;
                    }
                    on_stack[p] = true;
                    stack.push((p, 0));
                }
                None => {
                    stack.pop();
                    on_stack[node] = false;
                    scheduled[node] = true;
                    order.push(node);
                }
            }
        }

        Ok(order)
    }
}

impl Ant for ConstrainedAgent<'_> {
    fn agent(&self) -> &Agent {
        &self.agent
    }

    fn agent_mut(&mut self) -> &mut Agent {
        &mut self.agent
    }

    fn reset(&mut self) -> Result<(), AntqError> {
        self.agent.reset();
        self.walk_lead_in()
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
        match self
            .agent
            .choose_next_node(pheromone, problem, config, rng)
        {
            Some(chosen) => self.insertion_order(chosen),
            None => Ok(vec![self.agent.start()]),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::antq::agent::AgentState;
    use crate::antq::types::Edge;
    use crate::random::create_rng;

    struct Uniform {
        n: usize,
    }

    impl AntqProblem for Uniform {
        fn number_of_nodes(&self) -> usize {
            self.n
        }
        fn initial_pheromone(&self) -> f64 {
            1.0
        }
        fn heuristic_value(&self, _from: usize, _to: usize) -> f64 {
            1.0
        }
        fn calculate_solution_value(&self, tour: &[Edge]) -> f64 {
            tour.len() as f64
        }
        fn is_solution_best(&self, candidate: f64, best: f64) -> bool {
            candidate < best
        }
    }

    /// Node 2 requires nodes 0 and 1.
    fn two_before_two() -> PrecedenceMatrix {
        PrecedenceMatrix::from_pairs(4, &[(2, 0), (2, 1)]).unwrap()
    }

    #[test]
    fn test_matrix_queries() {
        let m = two_before_two();
        assert!(m.requires(2, 0));
        assert!(!m.requires(0, 2));
        assert_eq!(m.predecessors(2).collect::<Vec<_>>(), vec![0, 1]);
        assert!(m.has_predecessors(2));
        assert_eq!(m.roots().collect::<Vec<_>>(), vec![0, 1, 3]);
    }

    #[test]
    fn test_from_pairs_out_of_range() {
        assert!(matches!(
            PrecedenceMatrix::from_pairs(3, &[(0, 3)]),
            Err(AntqError::InvalidInstance(_))
        ));
    }

    #[test]
    fn test_check_acyclic() {
        assert!(two_before_two().check_acyclic().is_ok());
        let chain = PrecedenceMatrix::from_pairs(4, &[(1, 0), (2, 1), (3, 2)]).unwrap();
        assert!(chain.check_acyclic().is_ok());
    }

    #[test]
    fn test_check_acyclic_detects_cycle() {
        let cyclic = PrecedenceMatrix::from_pairs(3, &[(1, 0), (2, 1), (1, 2)]).unwrap();
        assert!(matches!(
            cyclic.check_acyclic(),
            Err(AntqError::CyclicPrecedence { .. })
        ));
        let self_loop = PrecedenceMatrix::from_pairs(2, &[(1, 1)]).unwrap();
        assert!(self_loop.check_acyclic().is_err());
    }

    #[test]
    fn test_insertion_order_inserts_predecessors_first() {
        let m = two_before_two();
        let agent = ConstrainedAgent::new(3, &m).unwrap();
        assert_eq!(agent.insertion_order(2).unwrap(), vec![0, 1, 2]);
    }

    #[test]
    fn test_require_out_of_range() {
        let mut m = PrecedenceMatrix::new(2);
        assert!(m.require(1, 0).is_ok());
        assert!(matches!(m.require(2, 0), Err(AntqError::InvalidInstance(_))));
        assert!(m.requires(1, 0));
    }

    #[test]
    fn test_start_with_predecessors_walks_them_first() {
        let m = two_before_two();
        let ant = ConstrainedAgent::new(2, &m).unwrap();
        assert_eq!(ant.agent().path(), &[0, 1, 2]);
        assert_eq!(ant.agent().start(), 0);
        assert_eq!(ant.agent().state(), AgentState::Traversing);
    }

    #[test]
    fn test_start_with_predecessors_full_tour() {
        let m = two_before_two();
        let problem = Uniform { n: 4 };
        let pheromone = PheromoneMatrix::new(4, 1.0);
        let config = AntqConfig::default().with_q0(0.5);
        let mut rng = create_rng(5);
        let mut ant = ConstrainedAgent::new(2, &m).unwrap();

        for _ in 0..3 {
            while !ant.agent().is_tour_complete() {
                let moves = ant
                    .plan_moves(&pheromone, &problem, &config, &mut rng)
                    .unwrap();
                for node in moves {
                    ant.agent_mut().move_to(node).unwrap();
                }
            }
            assert_eq!(&ant.agent().path()[..3], &[0, 1, 2]);
            assert_eq!(ant.agent().tour().len(), 4);
            Ant::reset(&mut ant).unwrap();
            assert_eq!(ant.agent().path(), &[0, 1, 2]);
        }
    }

    #[test]
    fn test_new_rejects_out_of_range_start() {
        let m = two_before_two();
        assert!(matches!(
            ConstrainedAgent::new(4, &m),
            Err(AntqError::InvalidMove { node: 4, .. })
        ));
    }

    #[test]
    fn test_insertion_order_skips_visited_predecessors() {
        let m = two_before_two();
        let mut agent = ConstrainedAgent::new(3, &m).unwrap();
        agent.agent_mut().move_to(1).unwrap();
        assert_eq!(agent.insertion_order(2).unwrap(), vec![0, 2]);
        assert_eq!(agent.insertion_order(0).unwrap(), vec![0]);
    }

    #[test]
    fn test_insertion_order_transitive_and_shared() {
        // 3 <- {1, 2}, 1 <- 0, 2 <- 0
        let m = PrecedenceMatrix::from_pairs(5, &[(3, 1), (3, 2), (1, 0), (2, 0)]).unwrap();
        let agent = ConstrainedAgent::new(4, &m).unwrap();
        assert_eq!(agent.insertion_order(3).unwrap(), vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_insertion_order_reports_cycle() {
        let m = PrecedenceMatrix::from_pairs(3, &[(1, 2), (2, 1)]).unwrap();
        let agent = ConstrainedAgent::new(0, &m).unwrap();
        assert!(matches!(
            agent.insertion_order(1),
            Err(AntqError::CyclicPrecedence { .. })
        ));
    }

    #[test]
    fn test_constrained_tours_respect_precedence() {
        let m = two_before_two();
        let problem = Uniform { n: 4 };
        let pheromone = PheromoneMatrix::new(4, 1.0);
        let config = AntqConfig::default().with_q0(0.5);
        let mut rng = create_rng(17);

        for _ in 0..50 {
            let mut ant = ConstrainedAgent::new(3, &m).unwrap();
            while !ant.agent().is_tour_complete() {
                let moves = ant
                    .plan_moves(&pheromone, &problem, &config, &mut rng)
                    .unwrap();
                assert!(!moves.is_empty());
                for node in moves {
                    ant.agent_mut().move_to(node).unwrap();
                }
            }
            let path = ant.agent().path();
            let pos = |node: usize| path.iter().position(|&x| x == node).unwrap();
            assert!(pos(0) < pos(2));
            assert!(pos(1) < pos(2));
            assert_eq!(ant.agent().tour().len(), 4);
        }
    }
}
