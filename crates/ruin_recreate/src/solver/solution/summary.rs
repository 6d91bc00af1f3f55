use serde::Serialize;

use super::{activity::ActivityKind, working_solution::WorkingSolution};

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct ActivitySummary {
    pub job_id: String,
    pub kind: ActivityKind,
    pub arrival_time: f64,
    pub end_time: f64,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct RouteSummary {
    pub vehicle_id: String,
    pub activities: Vec<ActivitySummary>,
}

/// Serializable view of a solution, using external ids.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct SolutionSummary {
    pub cost: f64,
    pub routes: Vec<RouteSummary>,
    pub unassigned_jobs: Vec<String>,
}

impl SolutionSummary {
    pub fn new(solution: &WorkingSolution) -> Self {
        let problem = solution.problem();

        let routes = solution
            .non_empty_routes_iter()
            .map(|route| RouteSummary {
                vehicle_id: route.vehicle(problem).external_id().to_owned(),
                activities: route
                    .activities()
                    .iter()
                    .filter_map(|activity| {
                        let job_id = activity.job()?;
                        Some(ActivitySummary {
                            job_id: problem.job(job_id).external_id().to_owned(),
                            kind: activity.kind(),
                            arrival_time: activity.arrival_time(),
                            end_time: activity.end_time(),
                        })
                    })
                    .collect(),
            })
            .collect();

        let unassigned_jobs = solution
            .sorted_unassigned_jobs()
            .into_iter()
            .map(|job_id| problem.job(job_id).external_id().to_owned())
            .collect();

        SolutionSummary {
            cost: solution.cost(),
            routes,
            unassigned_jobs,
        }
    }
}
