use smallvec::SmallVec;

use crate::{
    problem::{job::JobIdx, transport_costs::Cost, vehicle::VehicleIdx},
    solver::{
        constraints::constraint::{FailureReasons, InfeasibilityReason},
        solution::{activity::TourActivity, route_id::RouteIdx, working_solution::WorkingSolution},
    },
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InsertionRoute {
    Existing(RouteIdx),
    New,
}

impl InsertionRoute {
    fn order_key(&self) -> usize {
        match self {
            InsertionRoute::Existing(route_id) => route_id.get(),
            InsertionRoute::New => usize::MAX,
        }
    }
}

/// Cheapest feasible way to place one job.
#[derive(Debug, Clone)]
pub struct InsertionData {
    pub job_id: JobIdx,
    pub route: InsertionRoute,
    pub vehicle_id: VehicleIdx,
    pub cost: Cost,

    /// Activities with their position in the route before insertion. The
    /// delivery of a shipment is never placed before its pickup.
    pub activities: SmallVec<[(usize, TourActivity); 2]>,
}

impl InsertionData {
    pub fn first_position(&self) -> usize {
        self.activities
            .first()
            .map(|(position, _)| *position)
            .unwrap_or(0)
    }

    /// True when an existing route of `solution` would change vehicle, releasing its own.
    pub fn is_vehicle_switch(&self, solution: &WorkingSolution) -> bool {
        match self.route {
            InsertionRoute::Existing(route_id) => solution.route(route_id).vehicle_id() != self.vehicle_id,
            InsertionRoute::New => false,
        }
    }

    /// Lower cost wins; ties go to the lowest vehicle index, then route, then position.
    pub fn is_better_than(&self, other: &InsertionData) -> bool {
        if self.cost != other.cost {
            return self.cost < other.cost;
        }

        (
            self.vehicle_id,
            self.route.order_key(),
            self.first_position(),
        ) < (
            other.vehicle_id,
            other.route.order_key(),
            other.first_position(),
        )
    }
}

#[derive(Debug, Clone)]
pub enum InsertionResult {
    Success(InsertionData),
    Failure(FailureReasons),
}

impl InsertionResult {
    pub fn failure() -> Self {
        InsertionResult::Failure(FailureReasons::default())
    }

    pub fn failed_with(reason: InfeasibilityReason) -> Self {
        let mut reasons = FailureReasons::default();
        reasons.insert(reason);
        InsertionResult::Failure(reasons)
    }

    pub fn cost(&self) -> Cost {
        match self {
            InsertionResult::Success(data) => data.cost,
            InsertionResult::Failure(_) => f64::INFINITY,
        }
    }

    pub fn data(&self) -> Option<&InsertionData> {
        match self {
            InsertionResult::Success(data) => Some(data),
            InsertionResult::Failure(_) => None,
        }
    }

    pub fn into_data(self) -> Option<InsertionData> {
        match self {
            InsertionResult::Success(data) => Some(data),
            InsertionResult::Failure(_) => None,
        }
    }

    /// Keeps the better of two results, merging failure reasons.
    pub fn merge(self, other: InsertionResult) -> InsertionResult {
        match (self, other) {
            (InsertionResult::Success(a), InsertionResult::Success(b)) => {
                if b.is_better_than(&a) {
                    InsertionResult::Success(b)
                } else {
                    InsertionResult::Success(a)
                }
            }
            (InsertionResult::Success(a), InsertionResult::Failure(_))
            | (InsertionResult::Failure(_), InsertionResult::Success(a)) => {
                InsertionResult::Success(a)
            }
            (InsertionResult::Failure(mut a), InsertionResult::Failure(b)) => {
                a.extend(b);
                InsertionResult::Failure(a)
            }
        }
    }
}
