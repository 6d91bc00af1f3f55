use serde::{Deserialize, Serialize};

use crate::{
    problem::{job::JobIdx, vehicle_routing_problem::VehicleRoutingProblem},
    solver::insertion::InsertionData,
};

/// Stand-in for the second best cost of a job that fits in a single route.
pub const NO_SECOND_BEST_COST: f64 = i32::MAX as f64;

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RegretScorerParams {
    /// Weight of the time window length. Negative, so tight windows score higher.
    pub time_window_param: f64,

    /// Weight of the distance between the job and the depots of the best vehicle.
    pub depot_distance_param: f64,

    /// Lower bound of the time window term.
    pub min_time_window_score: f64,
}

impl Default for RegretScorerParams {
    fn default() -> Self {
        RegretScorerParams {
            time_window_param: -0.5,
            depot_distance_param: 0.1,
            min_time_window_score: -100_000.0,
        }
    }
}

pub struct RegretScorer {
    params: RegretScorerParams,

    /// Time window term of every job, computed once.
    time_window_scores: Vec<f64>,
}

impl RegretScorer {
    pub fn new(problem: &VehicleRoutingProblem, params: RegretScorerParams) -> Self {
        let time_window_scores = problem
            .jobs_iter()
            .map(|job_id| {
                // Tightest activity of the job, judged by its widest window.
                let time_to_operate = problem
                    .job_activities(job_id)
                    .iter()
                    .map(|activity| {
                        problem
                            .activity_time_windows(activity)
                            .iter()
                            .map(|time_window| time_window.duration())
                            .fold(0.0, f64::max)
                    })
                    .fold(f64::MAX, f64::min);

                (params.time_window_param * time_to_operate).max(params.min_time_window_score)
            })
            .collect();

        RegretScorer {
            params,
            time_window_scores,
        }
    }

    /// Regret of deferring `job_id`, weighted by its priority, plus its urgency terms.
    pub fn score(
        &self,
        problem: &VehicleRoutingProblem,
        job_id: JobIdx,
        best: &InsertionData,
        second_best_cost: Option<f64>,
    ) -> f64 {
        let priority_weight = f64::from(11 - problem.job(job_id).priority());
        let regret = second_best_cost.unwrap_or(NO_SECOND_BEST_COST) - best.cost;

        priority_weight * regret + self.job_score(problem, job_id, best)
    }

    fn job_score(&self, problem: &VehicleRoutingProblem, job_id: JobIdx, best: &InsertionData) -> f64 {
        let vehicle = problem.vehicle(best.vehicle_id);
        let transport_costs = problem.transport_costs();

        let max_depot_distance = problem
            .job(job_id)
            .location_ids()
            .iter()
            .map(|&location_id| {
                transport_costs
                    .distance(vehicle.start_location_id(), location_id)
                    .max(transport_costs.distance(location_id, vehicle.end_location_id()))
            })
            .fold(0.0, f64::max);

        self.time_window_scores[job_id.get()]
            + self.params.depot_distance_param * max_depot_distance
    }
}

/// Index of the highest score, the lowest job index on ties.
pub fn highest_score(scores: &[(JobIdx, f64)]) -> Option<usize> {
    scores
        .iter()
        .enumerate()
        .max_by(|(_, a), (_, b)| a.1.total_cmp(&b.1).then(b.0.cmp(&a.0)))
        .map(|(index, _)| index)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_highest_regret_goes_first() {
        let scores = vec![
            (JobIdx::new(0), 10.0 - 10.0),
            (JobIdx::new(1), 50.0 - 10.0),
            (JobIdx::new(2), 5.0 - 5.0),
        ];

        assert_eq!(highest_score(&scores), Some(1));
    }

    #[test]
    fn test_ties_go_to_lower_job_index() {
        let scores = vec![(JobIdx::new(4), 0.0), (JobIdx::new(2), 0.0), (JobIdx::new(3), 0.0)];
        assert_eq!(highest_score(&scores), Some(1));

        assert_eq!(highest_score(&[]), None);
    }
}
