pub mod best_insertion;
pub mod insertion_cache;
pub mod recreate_context;
pub mod recreate_params;
pub mod recreate_strategy;
pub mod regret_insertion;
pub mod regret_scorer;
