pub mod capacity_constraint;
pub mod constraint;
pub mod constraint_manager;
pub mod fixed_cost_constraint;
pub mod noise_constraint;
pub mod ordering_constraint;
pub mod skill_constraint;
pub mod time_window_constraint;
