use std::sync::Arc;

use jiff::Timestamp;
use rand::{SeedableRng, rngs::SmallRng};
use tracing::{debug, info};

use crate::{
    error::{ConfigError, SolverError},
    problem::{
        neighborhood::{AverageJobDistance, JobNeighborhoods},
        vehicle_routing_problem::VehicleRoutingProblem,
    },
};

use super::{
    accepted_solution::{AcceptedSolution, sort_solutions},
    algorithm_params::AlgorithmParams,
    constraints::constraint_manager::ConstraintManager,
    construction::construct_solution,
    cost_calculator::{DefaultSolutionCostCalculator, SolutionCostCalculator},
    fleet::vehicle_fleet_manager::VehicleFleetManager,
    search_context::SearchContext,
    search_listener::{BoxedSearchListener, SearchEvent, SearchListener, notify},
    search_strategy::SearchStrategy,
    solution::working_solution::WorkingSolution,
    state::state_manager::StateManager,
    statistics::SearchStatistics,
    strategy_manager::StrategyManager,
    termination::TerminationState,
};

/// Ruin and recreate search over a pool of solutions.
pub struct VehicleRoutingAlgorithm {
    problem: Arc<VehicleRoutingProblem>,
    params: AlgorithmParams,
    constraints: ConstraintManager,
    neighborhoods: JobNeighborhoods,
    cost_calculator: Arc<dyn SolutionCostCalculator>,
    thread_pool: Option<rayon::ThreadPool>,
    listeners: Vec<BoxedSearchListener>,
    initial_solutions: Vec<WorkingSolution>,
    statistics: SearchStatistics,
}

impl VehicleRoutingAlgorithm {
    pub fn problem(&self) -> &VehicleRoutingProblem {
        &self.problem
    }

    pub fn problem_arc(&self) -> Arc<VehicleRoutingProblem> {
        Arc::clone(&self.problem)
    }

    pub fn params(&self) -> &AlgorithmParams {
        &self.params
    }

    /// Statistics of the last call to [`Self::search_solutions`].
    pub fn statistics(&self) -> &SearchStatistics {
        &self.statistics
    }

    pub fn add_listener<L>(&mut self, listener: L)
    where
        L: SearchListener + Send + 'static,
    {
        self.listeners.push(Box::new(listener));
    }

    /// Seeds the pool. Without any initial solution the search constructs one.
    pub fn add_initial_solution(&mut self, solution: WorkingSolution) -> Result<(), SolverError> {
        if !Arc::ptr_eq(&solution.problem_arc(), &self.problem) {
            return Err(SolverError::InvalidInitialSolution(
                "solution was built for another problem".to_owned(),
            ));
        }

        solution.check_consistency()?;
        self.initial_solutions.push(solution);
        Ok(())
    }

    /// Runs the search and returns the final pool, cheapest first. The best
    /// solution found is always part of it.
    pub fn search_solutions(&mut self) -> Result<Vec<WorkingSolution>, SolverError> {
        self.statistics.start();
        let started_at = Timestamp::now();

        let mut rng = SmallRng::seed_from_u64(self.params.random_seed);
        let mut states = StateManager::with_default_updaters(&self.problem);
        let mut fleet = VehicleFleetManager::new(&self.problem);

        let mut context = SearchContext {
            problem: self.problem.as_ref(),
            constraints: &self.constraints,
            neighborhoods: &self.neighborhoods,
            cost_calculator: self.cost_calculator.as_ref(),
            ruin_params: &self.params.ruin,
            recreate_params: &self.params.recreate,
            thread_pool: self.thread_pool.as_ref(),
            states: &mut states,
            fleet: &mut fleet,
            rng: &mut rng,
            iteration: 0,
            max_iterations: self.params.max_iterations,
            max_solutions: self.params.max_solutions,
        };

        let mut solutions = Vec::new();
        if self.initial_solutions.is_empty() {
            let solution = construct_solution(
                Arc::clone(&self.problem),
                self.params.construction,
                &mut context,
            )?;
            solutions.push(AcceptedSolution::new(solution));
        } else {
            for solution in &self.initial_solutions {
                let mut solution = solution.clone();
                context.update_cost(&mut solution)?;
                solutions.push(AcceptedSolution::new(solution));
            }
            sort_solutions(&mut solutions);
            solutions.truncate(self.params.max_solutions);
        }

        let Some(mut best) = solutions.first().cloned() else {
            return Err(SolverError::EmptySelection {
                strategy: "initial".to_owned(),
                pool_size: 0,
            });
        };
        self.statistics.add_best_cost(0, best.cost, best.num_unassigned());

        let acceptor = Arc::new(self.params.acceptor.create_acceptor(best.cost));
        let mut manager = StrategyManager::default();
        for strategy in &self.params.strategies {
            manager.add_strategy(
                SearchStrategy::new(
                    strategy.id.clone(),
                    strategy.selector,
                    strategy.modules.clone(),
                    Arc::clone(&acceptor),
                ),
                strategy.weight,
            )?;
        }

        info!(
            jobs = self.problem.num_jobs(),
            vehicles = self.problem.num_vehicles(),
            strategies = manager.len(),
            seed = self.params.random_seed,
            acceptor = %self.params.acceptor,
            initial_cost = best.cost,
            initial_unassigned = best.num_unassigned(),
            "search starts"
        );
        notify(
            &mut self.listeners,
            SearchEvent::AlgorithmStarts {
                problem: &self.problem,
                solutions: &solutions,
            },
        );

        let mut termination_state = TerminationState::new(started_at, &self.params.terminations);
        let mut iterations = 0;
        for iteration in 1..=self.params.max_iterations {
            notify(&mut self.listeners, SearchEvent::IterationStarts { iteration });

            let strategy = manager.select_strategy(&mut *context.rng)?;
            notify(
                &mut self.listeners,
                SearchEvent::StrategySelected {
                    iteration,
                    strategy_id: strategy.id(),
                },
            );

            context.iteration = iteration;
            let result = strategy.run(&mut solutions, &mut context)?;

            let improved_best = result.cost < best.cost;
            if improved_best {
                best = AcceptedSolution {
                    solution: result.solution,
                    cost: result.cost,
                };
                self.statistics
                    .add_best_cost(iteration, best.cost, best.num_unassigned());
                info!(
                    iteration,
                    strategy = strategy.id(),
                    cost = best.cost,
                    routes = best.solution.non_empty_routes_count(),
                    unassigned = best.num_unassigned(),
                    "new best solution"
                );
            }

            self.statistics
                .add_iteration(strategy.id(), result.accepted, improved_best);
            let pool_best_cost = solutions.first().map_or(best.cost, |accepted| accepted.cost);
            termination_state.record_iteration(improved_best, pool_best_cost);

            debug!(
                iteration,
                strategy = strategy.id(),
                cost = result.cost,
                accepted = result.accepted,
                best_cost = best.cost,
                "iteration done"
            );
            notify(
                &mut self.listeners,
                SearchEvent::IterationEnds {
                    iteration,
                    strategy_id: strategy.id(),
                    candidate_cost: result.cost,
                    accepted: result.accepted,
                    best_cost: best.cost,
                    solutions: &solutions,
                },
            );

            iterations = iteration;
            if let Some(termination) = self
                .params
                .terminations
                .iter()
                .find(|termination| termination_state.is_met(termination))
            {
                info!(iteration, ?termination, "termination met");
                break;
            }
        }

        let has_best = solutions.iter().any(|accepted| {
            accepted.cost == best.cost && accepted.solution.is_identical(&best.solution)
        });
        if !has_best {
            solutions.push(best);
            sort_solutions(&mut solutions);
        }

        self.statistics.finish();
        notify(
            &mut self.listeners,
            SearchEvent::AlgorithmEnds {
                iterations,
                solutions: &solutions,
            },
        );

        let best = &solutions[0];
        info!(
            iterations,
            best_cost = best.cost,
            unassigned = best.num_unassigned(),
            elapsed = ?self.statistics.elapsed(),
            "search ends"
        );

        Ok(solutions
            .into_iter()
            .map(|accepted| accepted.solution)
            .collect())
    }
}

/// Validates the parameters and prepares everything a search needs.
#[derive(Default)]
pub struct AlgorithmBuilder {
    problem: Option<Arc<VehicleRoutingProblem>>,
    params: Option<AlgorithmParams>,
    cost_calculator: Option<Arc<dyn SolutionCostCalculator>>,
    listeners: Vec<BoxedSearchListener>,
}

impl AlgorithmBuilder {
    pub fn set_problem(&mut self, problem: Arc<VehicleRoutingProblem>) -> &mut AlgorithmBuilder {
        self.problem = Some(problem);
        self
    }

    pub fn set_params(&mut self, params: AlgorithmParams) -> &mut AlgorithmBuilder {
        self.params = Some(params);
        self
    }

    pub fn set_cost_calculator(
        &mut self,
        cost_calculator: Arc<dyn SolutionCostCalculator>,
    ) -> &mut AlgorithmBuilder {
        self.cost_calculator = Some(cost_calculator);
        self
    }

    pub fn add_listener<L>(&mut self, listener: L) -> &mut AlgorithmBuilder
    where
        L: SearchListener + Send + 'static,
    {
        self.listeners.push(Box::new(listener));
        self
    }

    pub fn build(self) -> Result<VehicleRoutingAlgorithm, SolverError> {
        let problem = self.problem.ok_or(ConfigError::MissingField("problem"))?;
        let params = self.params.unwrap_or_default();
        params.validate()?;

        let thread_pool = if params.insertion_threads > 1 {
            Some(
                rayon::ThreadPoolBuilder::new()
                    .num_threads(params.insertion_threads)
                    .build()
                    .map_err(|error| ConfigError::ThreadPool(error.to_string()))?,
            )
        } else {
            None
        };

        let cost_calculator = self.cost_calculator.unwrap_or_else(|| {
            Arc::new(DefaultSolutionCostCalculator::new(params.penalty_factor))
        });

        Ok(VehicleRoutingAlgorithm {
            constraints: ConstraintManager::with_default_constraints(
                params.deliveries_first,
                params.fixed_cost_weight,
            ),
            neighborhoods: JobNeighborhoods::new(
                &problem,
                &AverageJobDistance,
                params.neighborhood_size,
            ),
            problem,
            params,
            cost_calculator,
            thread_pool,
            listeners: self.listeners,
            initial_solutions: Vec::new(),
            statistics: SearchStatistics::default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use parking_lot::Mutex;

    use crate::{solver::termination::Termination, test_utils};

    use super::*;

    fn create_problem() -> Arc<VehicleRoutingProblem> {
        Arc::new(test_utils::create_test_problem(
            test_utils::create_location_grid(4, 4),
            test_utils::create_basic_services(vec![1, 3, 5, 6, 9, 10, 12, 15]),
            test_utils::create_basic_vehicles(vec![0, 0]),
        ))
    }

    fn create_algorithm(params: AlgorithmParams) -> VehicleRoutingAlgorithm {
        let mut builder = AlgorithmBuilder::default();
        builder.set_problem(create_problem()).set_params(params);
        builder.build().unwrap()
    }

    #[test]
    fn test_build_requires_a_problem() {
        let result = AlgorithmBuilder::default().build();
        assert!(matches!(
            result,
            Err(SolverError::Config(ConfigError::MissingField("problem")))
        ));
    }

    #[test]
    fn test_build_validates_params() {
        let mut builder = AlgorithmBuilder::default();
        builder.set_problem(create_problem()).set_params(AlgorithmParams {
            max_solutions: 0,
            ..AlgorithmParams::default()
        });
        assert!(matches!(
            builder.build(),
            Err(SolverError::Config(ConfigError::InvalidParameter {
                name: "max_solutions",
                ..
            }))
        ));
    }

    #[test]
    fn test_search_assigns_every_job() {
        let mut algorithm = create_algorithm(AlgorithmParams {
            max_iterations: 50,
            ..AlgorithmParams::default()
        });

        let solutions = algorithm.search_solutions().unwrap();
        let best = &solutions[0];

        assert!(best.unassigned_jobs().is_empty());
        best.check_consistency().unwrap();
        assert_eq!(algorithm.statistics().iterations, 50);
        assert!(algorithm.statistics().finished_at.is_some());
    }

    #[test]
    fn test_listener_sees_every_iteration() {
        let mut algorithm = create_algorithm(AlgorithmParams {
            max_iterations: 30,
            ..AlgorithmParams::default()
        });

        let events = Arc::new(Mutex::new(Vec::new()));
        let recorded = Arc::clone(&events);
        algorithm.add_listener(move |event: &SearchEvent| {
            let name = match event {
                SearchEvent::AlgorithmStarts { .. } => "starts",
                SearchEvent::IterationStarts { .. } => "iteration",
                SearchEvent::StrategySelected { .. } => "selected",
                SearchEvent::IterationEnds { .. } => "iteration_ends",
                SearchEvent::AlgorithmEnds { .. } => "ends",
            };
            recorded.lock().push(name);
        });

        algorithm.search_solutions().unwrap();

        let events = events.lock();
        assert_eq!(events.first(), Some(&"starts"));
        assert_eq!(events.last(), Some(&"ends"));
        assert_eq!(events.iter().filter(|&&name| name == "iteration").count(), 30);
        assert_eq!(
            events.iter().filter(|&&name| name == "iteration_ends").count(),
            30
        );
    }

    #[test]
    fn test_termination_stops_the_search() {
        let mut algorithm = create_algorithm(AlgorithmParams {
            max_iterations: 10_000,
            terminations: vec![Termination::IterationsWithoutImprovement(5)],
            ..AlgorithmParams::default()
        });

        algorithm.search_solutions().unwrap();
        assert!(algorithm.statistics().iterations < 10_000);
    }

    #[test]
    fn test_rejects_solution_of_another_problem() {
        let mut algorithm = create_algorithm(AlgorithmParams::default());
        let other = create_problem();
        let solution = test_utils::create_test_working_solution(other, vec![]);

        assert!(matches!(
            algorithm.add_initial_solution(solution),
            Err(SolverError::InvalidInitialSolution(_))
        ));
    }

    #[test]
    fn test_search_starts_from_initial_solution() {
        let mut algorithm = create_algorithm(AlgorithmParams {
            max_iterations: 0,
            ..AlgorithmParams::default()
        });
        let solution = test_utils::create_test_working_solution(
            algorithm.problem_arc(),
            vec![test_utils::TestRoute {
                vehicle_id: 0,
                job_ids: vec![0, 1, 2],
            }],
        );
        algorithm.add_initial_solution(solution).unwrap();

        let solutions = algorithm.search_solutions().unwrap();
        assert_eq!(solutions.len(), 1);
        assert_eq!(solutions[0].unassigned_jobs().len(), 5);
    }
}
