//! Ant-Q execution loop.
//!
//! # Algorithm
//!
//! 1. Fill the pheromone matrix with the problem's initial value and
//!    place one agent on every start node
//! 2. At each iteration:
//!    a. Until every agent has closed its tour, run a round: all open
//!       agents choose their next step against the current pheromone,
//!       then each commits its step in turn and receives a delayed update
//!    b. Evaluate every tour and pick the iteration best
//!    c. Reinforce the iteration-best tour with `w / value`
//!    d. Keep it if it beats the best of all iterations
//!    e. Reset every agent
//! 3. Stop after the iteration budget
//!
//! # Reference
//!
//! Gambardella, L. M. & Dorigo, M. (1995). "Ant-Q: A Reinforcement Learning
//! approach to the traveling salesman problem", *ICML 1995*, 252-260.

use std::time::{Duration, Instant};

use rand::Rng;
#[cfg(feature = "parallel")]
use rayon::prelude::*;
use tracing::{debug, trace};

use super::agent::{Agent, Ant};
use super::config::AntqConfig;
use super::error::AntqError;
use super::pheromone::PheromoneMatrix;
use super::precedence::ConstrainedAgent;
use super::types::{AntqProblem, Edge, PrecedenceProblem};
use crate::random::{create_rng, resolve_seed};

/// Result of an Ant-Q run.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AntqResult {
    /// Value of the best tour found.
    pub best_value: f64,

    /// Edges of the best tour, ending with the edge back to its start.
    pub best_tour: Vec<Edge>,

    /// Nodes of the best tour in visiting order, start first.
    pub best_path: Vec<usize>,

    /// Iteration at which the best tour was found.
    pub best_iteration: usize,

    /// Number of iterations executed.
    pub iterations: usize,

    /// Number of agents in the colony.
    pub agents: usize,

    /// Wall-clock time spent iterating. Setup is excluded.
    pub elapsed: Duration,

    /// Best value known after each iteration.
    pub value_history: Vec<f64>,
}

/// Executes the Ant-Q algorithm.
pub struct AntqRunner;

impl AntqRunner {
    /// Runs Ant-Q with one agent starting from every node.
    ///
    /// # Errors
    /// Returns an error if the configuration is invalid, the problem has
    /// no nodes, or its initial pheromone is negative or non-finite.
    ///
    /// # Examples
    ///
    /// ```
    /// use u_antq::antq::{AntqConfig, AntqRunner};
    /// use u_antq::problems::TspProblem;
    ///
    /// let square = TspProblem::from_coordinates(&[(0.0, 0.0), (0.0, 1.0), (1.0, 1.0), (1.0, 0.0)]);
    /// let config = AntqConfig::default().with_iterations(50).with_seed(1);
    /// let result = AntqRunner::run(&square, &config).unwrap();
    /// assert!((result.best_value - 4.0).abs() < 1e-9);
    /// ```
    pub fn run<P: AntqProblem>(problem: &P, config: &AntqConfig) -> Result<AntqResult, AntqError> {
        let n = check_setup(problem, config)?;
        let agents = (0..n)
            .map(|start| Agent::new(start, n))
            .collect::<Result<Vec<_>, _>>()?;
        Colony::new(problem, config, agents).run()
    }

    /// Runs Ant-Q with precedence-constrained agents, one per node that
    /// has no predecessors.
    ///
    /// # Errors
    /// In addition to the errors of [`run`](AntqRunner::run), fails when
    /// the precedence matrix does not match the node count or contains a
    /// cycle.
    pub fn run_constrained<P: PrecedenceProblem>(
        problem: &P,
        config: &AntqConfig,
    ) -> Result<AntqResult, AntqError> {
        let n = check_setup(problem, config)?;
        let precedence = problem.precedence();
        if precedence.len() != n {
            return Err(AntqError::PrecedenceSizeMismatch {
                expected: n,
                got: precedence.len(),
            });
        }
        precedence.check_acyclic()?;

        let mut agents = Vec::with_capacity(problem.root_count());
        for start in precedence.roots() {
            agents.push(ConstrainedAgent::new(start, precedence)?);
        }
        Colony::new(problem, config, agents).run()
    }
}

/// Validates everything a run needs before any state is built.
fn check_setup<P: AntqProblem>(problem: &P, config: &AntqConfig) -> Result<usize, AntqError> {
    config.validate()?;
    let n = problem.number_of_nodes();
    if n == 0 {
        return Err(AntqError::EmptyProblem);
    }
    let initial = problem.initial_pheromone();
    if !(initial >= 0.0 && initial.is_finite()) {
        return Err(AntqError::InvalidInitialPheromone(initial));
    }
    Ok(n)
}

/// Best tour seen so far.
struct Incumbent {
    value: f64,
    tour: Vec<Edge>,
    path: Vec<usize>,
    iteration: usize,
}

/// State of one run: the pheromone matrix and the agents that read it.
struct Colony<'p, P, A> {
    problem: &'p P,
    config: &'p AntqConfig,
    pheromone: PheromoneMatrix,
    agents: Vec<A>,
}

impl<'p, P, A> Colony<'p, P, A>
where
    P: AntqProblem,
    A: Ant + Sync,
{
    fn new(problem: &'p P, config: &'p AntqConfig, agents: Vec<A>) -> Self {
        let n = problem.number_of_nodes();
        Self {
            problem,
            config,
            pheromone: PheromoneMatrix::new(n, problem.initial_pheromone()),
            agents,
        }
    }

    fn run(mut self) -> Result<AntqResult, AntqError> {
        let n = self.pheromone.len();
        let seed = resolve_seed(self.config.seed);
        debug!(
            nodes = n,
            agents = self.agents.len(),
            iterations = self.config.iterations,
            seed,
            "starting ant-q run"
        );

        if n == 1 {
            return Ok(AntqResult {
                best_value: self.problem.calculate_solution_value(&[]),
                best_tour: Vec::new(),
                best_path: vec![0],
                best_iteration: 0,
                iterations: 0,
                agents: self.agents.len(),
                elapsed: Duration::ZERO,
                value_history: Vec::new(),
            });
        }

        let mut rng = create_rng(seed);
        let started = Instant::now();
        let mut incumbent: Option<Incumbent> = None;
        let mut value_history = Vec::with_capacity(self.config.iterations);

        for iteration in 0..self.config.iterations {
            self.construct_tours(&mut rng)?;

            let values = self.evaluate();
            let leader = self.iteration_best(&values);
            let leader_value = values[leader];
            let leader_agent = self.agents[leader].agent();

            self.pheromone
                .global_update(leader_agent.tour(), leader_value, self.config);

            let improved = match &incumbent {
                None => true,
                Some(best) => self.problem.is_solution_best(leader_value, best.value),
            };
            if improved {
                debug!(iteration, value = leader_value, "new best tour");
                incumbent = Some(Incumbent {
                    value: leader_value,
                    tour: leader_agent.tour().to_vec(),
                    path: leader_agent.path().to_vec(),
                    iteration,
                });
            }

            if let Some(best) = &incumbent {
                trace!(
                    iteration,
                    iteration_best = leader_value,
                    best = best.value,
                    "iteration complete"
                );
                value_history.push(best.value);
            }

            for ant in &mut self.agents {
                ant.reset()?;
            }
        }

        let elapsed = started.elapsed();
        let best = incumbent.ok_or_else(|| {
            AntqError::InvalidConfig("iterations must be at least 1".into())
        })?;
        debug!(
            best_value = best.value,
            best_iteration = best.iteration,
            elapsed_ms = elapsed.as_millis() as u64,
            "ant-q run finished"
        );

        Ok(AntqResult {
            best_value: best.value,
            best_tour: best.tour,
            best_path: best.path,
            best_iteration: best.iteration,
            iterations: self.config.iterations,
            agents: self.agents.len(),
            elapsed,
            value_history,
        })
    }

    /// Drives every agent until all tours are closed.
    fn construct_tours<R: Rng>(&mut self, rng: &mut R) -> Result<(), AntqError> {
        while self
            .agents
            .iter()
            .any(|ant| !ant.agent().is_tour_complete())
        {
            self.round(rng)?;
        }
        Ok(())
    }

    /// One step for every open agent.
    ///
    /// All open agents choose before any of them commits, so every choice
    /// in a round sees the pheromone left by the previous round. Commits
    /// and delayed updates then run in agent order.
    fn round<R: Rng>(&mut self, rng: &mut R) -> Result<(), AntqError> {
        let mut plans = Vec::with_capacity(self.agents.len());
        for ant in &self.agents {
            if ant.agent().is_tour_complete() {
                plans.push(Vec::new());
            } else {
                plans.push(ant.plan_moves(&self.pheromone, self.problem, self.config, rng)?);
            }
        }

        for (ant, moves) in self.agents.iter_mut().zip(plans) {
            for node in moves {
                let edge = ant.agent_mut().move_to(node)?;
                let agent = ant.agent();
                let max_next = self
                    .pheromone
                    .max_reachable(edge.to, |j| !agent.is_visited(j));
                self.pheromone.delayed_update(edge, max_next, self.config);
            }
        }
        Ok(())
    }

    /// Value of every agent's closed tour, in agent order.
    fn evaluate(&self) -> Vec<f64> {
        #[cfg(feature = "parallel")]
        {
            self.agents
                .par_iter()
                .map(|ant| self.problem.calculate_solution_value(ant.agent().tour()))
                .collect()
        }
        #[cfg(not(feature = "parallel"))]
        {
            self.agents
                .iter()
                .map(|ant| self.problem.calculate_solution_value(ant.agent().tour()))
                .collect()
        }
    }

    /// Index of the best value under the problem's comparator. The first
    /// agent wins ties.
    fn iteration_best(&self, values: &[f64]) -> usize {
        let mut leader = 0;
        for (i, &value) in values.iter().enumerate().skip(1) {
            if self.problem.is_solution_best(value, values[leader]) {
                leader = i;
            }
        }
        leader
    }
}
