pub mod activity;
pub mod route;
pub mod route_id;
pub mod summary;
pub mod working_solution;
