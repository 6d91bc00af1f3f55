mod setup;

use std::sync::Arc;

use ruin_recreate::{
    problem::{
        fleet::FleetSize,
        job::{Job, JobIdx},
        location::Location,
        travel_cost_matrix::TravelMatrices,
        vehicle::VehicleIdx,
        vehicle_routing_problem::{
            InitialRoute, VehicleRoutingProblem, VehicleRoutingProblemBuilder,
        },
    },
    solver::{
        constraints::constraint_manager::ConstraintManager,
        fleet::vehicle_fleet_manager::VehicleFleetManager,
        insertion::{InsertionData, InsertionRoute},
        recreate::{
            recreate_context::RecreateContext,
            recreate_params::RecreateParams,
            recreate_strategy::RecreateSolution,
            regret_insertion::RegretInsertion,
            regret_scorer::{RegretScorer, RegretScorerParams, highest_score},
        },
        solution::{summary::SolutionSummary, working_solution::WorkingSolution},
        state::state_manager::StateManager,
    },
};
use rand::{SeedableRng, rngs::SmallRng};
use smallvec::SmallVec;

const REGRET_ONLY: RegretScorerParams = RegretScorerParams {
    time_window_param: 0.0,
    depot_distance_param: 0.0,
    min_time_window_score: 0.0,
};

fn insertion(job_id: JobIdx, cost: f64) -> InsertionData {
    InsertionData {
        job_id,
        route: InsertionRoute::New,
        vehicle_id: VehicleIdx::new(0),
        cost,
        activities: SmallVec::new(),
    }
}

#[test]
fn test_highest_regret_is_inserted_first() {
    let locations = vec![
        Location::from_cartesian(0.0, 0.0),
        Location::from_cartesian(1.0, 0.0),
        Location::from_cartesian(2.0, 0.0),
        Location::from_cartesian(3.0, 0.0),
    ];
    let jobs: Vec<Job> = ["a", "b", "c"]
        .iter()
        .enumerate()
        .map(|(index, id)| Job::Service(setup::service(id, index + 1, 1.0).build().unwrap()))
        .collect();
    let vehicle_type = setup::vehicle_type("basic", 10.0);
    let problem = setup::build_problem(
        locations,
        jobs,
        vec![setup::vehicle("v", &vehicle_type, 0).build().unwrap()],
        FleetSize::Finite,
    );

    // Only the regret itself counts.
    let scorer = RegretScorer::new(&problem, REGRET_ONLY);

    let costs = [(10.0, 10.0), (10.0, 50.0), (5.0, 5.0)];
    let mut scores: Vec<(JobIdx, f64)> = costs
        .iter()
        .enumerate()
        .map(|(index, &(best, second_best))| {
            let job_id = JobIdx::new(index);
            let score = scorer.score(&problem, job_id, &insertion(job_id, best), Some(second_best));
            (job_id, score)
        })
        .collect();

    let mut order = Vec::new();
    while let Some(index) = highest_score(&scores) {
        order.push(scores.remove(index).0);
    }

    assert_eq!(
        order,
        vec![JobIdx::new(1), JobIdx::new(0), JobIdx::new(2)]
    );
}

#[test]
fn test_single_route_job_ranks_first() {
    let locations = vec![
        Location::from_cartesian(0.0, 0.0),
        Location::from_cartesian(1.0, 0.0),
        Location::from_cartesian(2.0, 0.0),
    ];
    let jobs: Vec<Job> = ["a", "b"]
        .iter()
        .enumerate()
        .map(|(index, id)| Job::Service(setup::service(id, index + 1, 1.0).build().unwrap()))
        .collect();
    let vehicle_type = setup::vehicle_type("basic", 10.0);
    let problem = setup::build_problem(
        locations,
        jobs,
        vec![setup::vehicle("v", &vehicle_type, 0).build().unwrap()],
        FleetSize::Finite,
    );
    let scorer = RegretScorer::new(&problem, RegretScorerParams::default());

    let a = JobIdx::new(0);
    let b = JobIdx::new(1);
    let scores = vec![
        (a, scorer.score(&problem, a, &insertion(a, 1.0), Some(1_000.0))),
        (b, scorer.score(&problem, b, &insertion(b, 1.0), None)),
    ];

    assert_eq!(highest_score(&scores), Some(1));
}

/// Two vehicles already on the road, each carrying one job at its own depot
/// and room for one more. Jobs a, b and c come with their round trip cost from
/// the depot of vehicle 0 and of vehicle 1.
fn two_route_problem(round_trips: [(f64, f64); 3]) -> Arc<VehicleRoutingProblem> {
    // Locations 0 and 1 are the depots, 2 to 4 the jobs.
    let mut distances = vec![vec![100.0; 5]; 5];
    for (location, row) in distances.iter_mut().enumerate() {
        row[location] = 0.0;
    }
    for (index, &(first, second)) in round_trips.iter().enumerate() {
        for (depot, round_trip) in [(0, first), (1, second)] {
            distances[depot][index + 2] = round_trip / 2.0;
            distances[index + 2][depot] = round_trip / 2.0;
        }
    }

    let jobs: Vec<Job> = ["at_v0", "at_v1", "a", "b", "c"]
        .iter()
        .enumerate()
        .map(|(location_id, id)| Job::Service(setup::service(id, location_id, 1.0).build().unwrap()))
        .collect();
    let vehicle_type = setup::vehicle_type("pair", 2.0);

    let mut builder = VehicleRoutingProblemBuilder::default();
    builder
        .set_locations((0..5).map(|x| Location::from_cartesian(x as f64, 0.0)).collect())
        .set_transport_costs(Arc::new(TravelMatrices::new(distances.clone(), distances)))
        .set_jobs(jobs)
        .set_vehicles(vec![
            setup::vehicle("v0", &vehicle_type, 0).build().unwrap(),
            setup::vehicle("v1", &vehicle_type, 1).build().unwrap(),
        ])
        .set_fleet_size(FleetSize::Finite);
    Arc::new(builder.build().unwrap())
}

fn regret_insertion(problem: &Arc<VehicleRoutingProblem>) -> SolutionSummary {
    let mut solution = WorkingSolution::from_routes(
        Arc::clone(problem),
        &[
            InitialRoute {
                vehicle_id: VehicleIdx::new(0),
                jobs: vec![JobIdx::new(0)],
            },
            InitialRoute {
                vehicle_id: VehicleIdx::new(1),
                jobs: vec![JobIdx::new(1)],
            },
        ],
    )
    .unwrap();

    let constraints = ConstraintManager::with_default_constraints(false, 0.0);
    let mut states = StateManager::with_default_updaters(problem);
    let mut fleet = VehicleFleetManager::new(problem);
    let mut rng = SmallRng::seed_from_u64(0);
    let params = RecreateParams {
        noise_level: 0.0,
        regret: REGRET_ONLY,
        ..RecreateParams::default()
    };

    RegretInsertion::new(false)
        .recreate_solution(
            &mut solution,
            RecreateContext {
                problem,
                constraints: &constraints,
                states: &mut states,
                fleet: &mut fleet,
                rng: &mut rng,
                thread_pool: None,
                params: &params,
            },
        )
        .unwrap();

    solution.summary()
}

fn jobs_of(summary: &SolutionSummary, vehicle_id: &str) -> Vec<String> {
    summary
        .routes
        .iter()
        .filter(|route| route.vehicle_id == vehicle_id)
        .flat_map(|route| route.activities.iter().map(|activity| activity.job_id.clone()))
        .collect()
}

#[test]
fn test_regret_insertion_serves_highest_regret_job_first() {
    // a: 10 / 10, b: 10 / 50, c: 5 / 5.
    let problem = two_route_problem([(10.0, 10.0), (10.0, 50.0), (5.0, 5.0)]);
    let summary = regret_insertion(&problem);

    // b loses the most when postponed and takes v0, although a and c are not
    // dearer there. Then a and c only fit on v1 and c, being cheaper, wins.
    assert!(jobs_of(&summary, "v0").contains(&"b".to_owned()));
    assert!(jobs_of(&summary, "v1").contains(&"c".to_owned()));
    assert_eq!(summary.unassigned_jobs, vec!["a"]);
}

#[test]
fn test_regret_insertion_ties_go_to_lower_job() {
    // a and c cannot be told apart.
    let problem = two_route_problem([(10.0, 10.0), (10.0, 50.0), (10.0, 10.0)]);
    let summary = regret_insertion(&problem);

    assert!(jobs_of(&summary, "v0").contains(&"b".to_owned()));
    assert!(jobs_of(&summary, "v1").contains(&"a".to_owned()));
    assert_eq!(summary.unassigned_jobs, vec!["c"]);
}
