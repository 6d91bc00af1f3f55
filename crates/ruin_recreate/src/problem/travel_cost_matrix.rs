use crate::problem::{
    driver::Driver,
    location::{Location, LocationIdx},
    transport_costs::{Cost, Distance, Time, TransportCosts},
    vehicle::Vehicle,
};

/// This matrix use a flat structure to store distances and times between locations.
/// To find the index for a pair of locations, use the formula:
/// `index = from * num_locations + to`.
#[derive(Debug, Clone)]
pub struct TravelMatrices {
    distances: Vec<Distance>,
    times: Vec<Time>,
    num_locations: usize,
}

impl TravelMatrices {
    pub fn new(distances: Vec<Vec<Distance>>, times: Vec<Vec<Time>>) -> Self {
        let num_locations = distances.len();

        TravelMatrices {
            distances: distances.into_iter().flatten().collect(),
            times: times.into_iter().flatten().collect(),
            num_locations,
        }
    }

    /// Distances and times both equal the euclidean distance.
    pub fn from_euclidean(locations: &[Location]) -> Self {
        let num_locations = locations.len();
        let mut distances: Vec<Distance> = vec![0.0; num_locations * num_locations];

        for (i, from) in locations.iter().enumerate() {
            for (j, to) in locations.iter().enumerate() {
                distances[i * num_locations + j] = from.euclidean_distance(to);
            }
        }

        TravelMatrices {
            times: distances.clone(),
            distances,
            num_locations,
        }
    }

    pub fn num_locations(&self) -> usize {
        self.num_locations
    }

    #[inline(always)]
    fn index(&self, from: LocationIdx, to: LocationIdx) -> usize {
        from.get() * self.num_locations + to.get()
    }

    #[inline(always)]
    pub fn travel_distance(&self, from: LocationIdx, to: LocationIdx) -> Distance {
        self.distances[self.index(from, to)]
    }

    #[inline(always)]
    pub fn travel_time(&self, from: LocationIdx, to: LocationIdx) -> Time {
        self.times[self.index(from, to)]
    }

    pub fn max_distance(&self) -> Distance {
        self.distances.iter().cloned().fold(0.0, f64::max)
    }

    pub fn is_symmetric(&self) -> bool {
        let n = self.num_locations;
        (0..n).all(|i| (0..n).all(|j| self.distances[i * n + j] == self.distances[j * n + i]))
    }
}

impl TransportCosts for TravelMatrices {
    fn transport_cost(
        &self,
        from: LocationIdx,
        to: LocationIdx,
        departure_time: Time,
        driver: &Driver,
        vehicle: Option<&Vehicle>,
    ) -> Cost {
        match vehicle {
            Some(vehicle) => {
                let costs = vehicle.vehicle_type().costs();
                costs.per_distance * self.travel_distance(from, to)
                    + costs.per_transport_time
                        * self.transport_time(from, to, departure_time, driver, Some(vehicle))
            }
            None => self.travel_distance(from, to),
        }
    }

    fn transport_time(
        &self,
        from: LocationIdx,
        to: LocationIdx,
        _departure_time: Time,
        _driver: &Driver,
        vehicle: Option<&Vehicle>,
    ) -> Time {
        let time = self.travel_time(from, to);

        // The matrix time is a lower bound; a slow vehicle takes longer
        match vehicle {
            Some(vehicle) if vehicle.vehicle_type().max_velocity() < f64::MAX => {
                time.max(self.travel_distance(from, to) / vehicle.vehicle_type().max_velocity())
            }
            _ => time,
        }
    }

    fn distance(&self, from: LocationIdx, to: LocationIdx) -> Distance {
        self.travel_distance(from, to)
    }
}
