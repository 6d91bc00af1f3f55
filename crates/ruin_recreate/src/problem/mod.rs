pub mod activity_costs;
pub mod capacity;
pub mod driver;
pub mod fleet;
pub mod job;
pub mod location;
pub mod neighborhood;
pub mod service;
pub mod shipment;
pub mod skill;
pub mod time_window;
pub mod transport_costs;
pub mod travel_cost_matrix;
pub mod vehicle;
pub mod vehicle_break;
pub mod vehicle_routing_problem;
pub mod vehicle_type;
