mod setup;

use std::sync::Arc;

use ruin_recreate::{
    problem::vehicle_routing_problem::VehicleRoutingProblem,
    solver::{
        algorithm_params::AlgorithmParams,
        recreate::{recreate_params::RecreateParams, recreate_strategy::RecreateStrategy},
        solution::working_solution::WorkingSolution,
    },
};

fn construct(
    problem: &Arc<VehicleRoutingProblem>,
    construction: RecreateStrategy,
    fixed_cost_weight: f64,
    insertion_threads: usize,
) -> WorkingSolution {
    let (mut solutions, _) = setup::search(
        problem,
        AlgorithmParams {
            max_iterations: 0,
            construction,
            fixed_cost_weight,
            insertion_threads,
            recreate: RecreateParams {
                noise_level: 0.0,
                ..RecreateParams::default()
            },
            ..AlgorithmParams::default()
        },
    );

    solutions.remove(0)
}

fn assert_same_construction(problem: &Arc<VehicleRoutingProblem>, fixed_cost_weight: f64) {
    let plain = construct(problem, RecreateStrategy::RegretInsertion, fixed_cost_weight, 1);
    let fast = construct(problem, RecreateStrategy::FastRegretInsertion, fixed_cost_weight, 1);

    assert!(plain.is_identical(&fast));
    assert_eq!(plain.summary(), fast.summary());
}

#[test]
fn test_fast_regret_builds_the_plain_regret_solution() {
    for seed in 0..5 {
        let problem = setup::random_problem(seed, 30);
        assert_same_construction(&problem, 0.0);
    }
}

#[test]
fn test_fast_regret_agrees_when_fixed_costs_escalate() {
    for seed in 0..5 {
        let problem = setup::random_problem_with_fixed_costs(seed, 30, 20.0, 60.0);
        assert_same_construction(&problem, 0.0);
        assert_same_construction(&problem, 1.5);
    }
}

#[test]
fn test_parallel_fast_regret_agrees() {
    let problem = setup::random_problem_with_fixed_costs(11, 40, 20.0, 60.0);
    let plain = construct(&problem, RecreateStrategy::RegretInsertion, 1.0, 1);
    let fast = construct(&problem, RecreateStrategy::FastRegretInsertion, 1.0, 4);

    assert!(plain.is_identical(&fast));
}
