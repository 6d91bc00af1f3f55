mod setup;

use std::sync::Arc;

use parking_lot::Mutex;
use ruin_recreate::{
    acceptor::solution_acceptor::SolutionAcceptorParams,
    selector::solution_selector::SolutionSelector,
    solver::{
        algorithm::AlgorithmBuilder,
        algorithm_params::{AlgorithmParams, StrategyParams, default_strategies},
        search_listener::SearchEvent,
    },
};

fn params(max_iterations: usize) -> AlgorithmParams {
    AlgorithmParams {
        max_iterations,
        max_solutions: 4,
        random_seed: 17,
        ..AlgorithmParams::default()
    }
}

#[test]
fn test_pool_keeps_invariants_after_every_iteration() {
    let problem = setup::random_problem(1, 40);
    let mut builder = AlgorithmBuilder::default();
    builder
        .set_problem(Arc::clone(&problem))
        .set_params(params(150))
        .add_listener(|event: &SearchEvent| {
            if let SearchEvent::IterationEnds { solutions, .. } = event {
                for accepted in solutions.iter() {
                    setup::assert_job_conservation(&accepted.solution);
                    setup::assert_capacity(&accepted.solution);
                    setup::assert_time_windows(&accepted.solution);
                }
            }
        });
    let mut algorithm = builder.build().unwrap();

    let solutions = algorithm.search_solutions().unwrap();
    assert!(!solutions.is_empty());
    for solution in &solutions {
        setup::assert_job_conservation(solution);
        setup::assert_capacity(solution);
        setup::assert_time_windows(solution);
    }
}

#[test]
fn test_best_cost_never_increases() {
    let problem = setup::random_problem(2, 30);
    let best_costs = Arc::new(Mutex::new(Vec::new()));
    let recorded = Arc::clone(&best_costs);

    let mut builder = AlgorithmBuilder::default();
    builder
        .set_problem(Arc::clone(&problem))
        .set_params(AlgorithmParams {
            acceptor: SolutionAcceptorParams::Schrimpf {
                alpha: 0.3,
                initial_threshold_fraction: 0.3,
            },
            strategies: default_strategies()
                .into_iter()
                .map(|strategy| StrategyParams {
                    selector: SolutionSelector::SelectRandom,
                    ..strategy
                })
                .collect(),
            ..params(200)
        })
        .add_listener(move |event: &SearchEvent| {
            if let SearchEvent::IterationEnds { best_cost, .. } = event {
                recorded.lock().push(*best_cost);
            }
        });
    let mut algorithm = builder.build().unwrap();
    let solutions = algorithm.search_solutions().unwrap();

    let best_costs = best_costs.lock();
    assert_eq!(best_costs.len(), 200);
    assert!(best_costs.windows(2).all(|pair| pair[1] <= pair[0]));

    let evolution = &algorithm.statistics().best_cost_evolution;
    assert!(evolution.windows(2).all(|pair| pair[1].cost < pair[0].cost));

    // The best solution ever found is returned even when the acceptor let it go.
    let final_best = best_costs.last().copied().unwrap();
    assert!((solutions[0].cost() - final_best).abs() < setup::EPSILON);
}

#[test]
fn test_same_seed_gives_same_search() {
    let problem = setup::random_problem(3, 35);

    let run = || {
        let trace = Arc::new(Mutex::new(Vec::new()));
        let recorded = Arc::clone(&trace);

        let mut builder = AlgorithmBuilder::default();
        builder
            .set_problem(Arc::clone(&problem))
            .set_params(params(120))
            .add_listener(move |event: &SearchEvent| {
                if let SearchEvent::IterationEnds {
                    iteration,
                    strategy_id,
                    candidate_cost,
                    accepted,
                    ..
                } = event
                {
                    recorded.lock().push(format!(
                        "{iteration}:{strategy_id}:{:x}:{accepted}",
                        candidate_cost.to_bits()
                    ));
                }
            });
        let mut algorithm = builder.build().unwrap();
        let solutions = algorithm.search_solutions().unwrap();

        let summaries: Vec<String> = solutions
            .iter()
            .map(|solution| serde_json::to_string(&solution.summary()).unwrap())
            .collect();
        let trace = trace.lock().clone();
        (trace, summaries)
    };

    let (first_trace, first_summaries) = run();
    let (second_trace, second_summaries) = run();

    assert_eq!(first_trace.len(), 120);
    assert_eq!(first_trace, second_trace);
    assert_eq!(first_summaries, second_summaries);
}

#[test]
fn test_parallel_insertion_matches_sequential() {
    let problem = setup::random_problem(4, 25);

    let (sequential, _) = setup::search(&problem, params(60));
    let (parallel, _) = setup::search(
        &problem,
        AlgorithmParams {
            insertion_threads: 4,
            ..params(60)
        },
    );

    let summarize = |solutions: &[ruin_recreate::solver::solution::working_solution::WorkingSolution]| {
        solutions
            .iter()
            .map(|solution| serde_json::to_string(&solution.summary()).unwrap())
            .collect::<Vec<_>>()
    };
    assert_eq!(summarize(&sequential), summarize(&parallel));
}
