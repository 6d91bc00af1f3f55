use rayon::prelude::*;

use crate::problem::{
    job::JobIdx, transport_costs::Distance, vehicle_routing_problem::VehicleRoutingProblem,
};

pub trait JobDistance: Send + Sync {
    fn distance(&self, problem: &VehicleRoutingProblem, from: JobIdx, to: JobIdx) -> Distance;
}

/// Mean transport distance over every pair of locations of the two jobs.
/// Jobs without a location are infinitely far from everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct AverageJobDistance;

impl JobDistance for AverageJobDistance {
    fn distance(&self, problem: &VehicleRoutingProblem, from: JobIdx, to: JobIdx) -> Distance {
        let from_locations = problem.job(from).location_ids();
        let to_locations = problem.job(to).location_ids();

        if from_locations.is_empty() || to_locations.is_empty() {
            return f64::MAX;
        }

        let costs = problem.transport_costs();
        let mut total = 0.0;
        for &a in &from_locations {
            for &b in &to_locations {
                total += (costs.distance(a, b) + costs.distance(b, a)) / 2.0;
            }
        }

        total / (from_locations.len() * to_locations.len()) as f64
    }
}

/// k nearest jobs of every job, closest first. Built once and read-only during search.
pub struct JobNeighborhoods {
    neighbors: Vec<Vec<JobIdx>>,
}

impl JobNeighborhoods {
    pub fn new(
        problem: &VehicleRoutingProblem,
        job_distance: &dyn JobDistance,
        neighborhood_size: usize,
    ) -> Self {
        let num_jobs = problem.num_jobs();
        let neighbors = (0..num_jobs)
            .into_par_iter()
            .map(|job| {
                let job = JobIdx::new(job);
                let mut candidates: Vec<(Distance, JobIdx)> = problem
                    .jobs_iter()
                    .filter(|&other| other != job)
                    .map(|other| (job_distance.distance(problem, job, other), other))
                    .collect();

                candidates.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));
                candidates.truncate(neighborhood_size);
                candidates.into_iter().map(|(_, other)| other).collect()
            })
            .collect();

        JobNeighborhoods { neighbors }
    }

    pub fn neighbors(&self, job: JobIdx) -> &[JobIdx] {
        &self.neighbors[job.get()]
    }

    pub fn nearest(&self, job: JobIdx, count: usize) -> impl Iterator<Item = JobIdx> + '_ {
        self.neighbors[job.get()].iter().take(count).cloned()
    }
}
