use rand::Rng;

use crate::problem::{
    neighborhood::JobNeighborhoods, vehicle_routing_problem::VehicleRoutingProblem,
};

use super::ruin_params::RuinParams;

pub struct RuinContext<'a, R>
where
    R: Rng,
{
    pub params: &'a RuinParams,
    pub problem: &'a VehicleRoutingProblem,
    pub neighborhoods: &'a JobNeighborhoods,
    pub rng: &'a mut R,
    pub num_jobs_to_remove: usize,
}
