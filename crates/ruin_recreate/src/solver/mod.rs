pub mod accepted_solution;
pub mod algorithm;
pub mod algorithm_params;
pub mod constraints;
pub mod construction;
pub mod cost_calculator;
pub mod fleet;
pub mod insertion;
pub mod insertion_calculator;
pub mod insertion_context;
pub mod noise;
pub mod recreate;
pub mod ruin;
pub mod search_context;
pub mod search_listener;
pub mod search_strategy;
pub mod solution;
pub mod state;
pub mod statistics;
pub mod strategy_manager;
pub mod termination;
