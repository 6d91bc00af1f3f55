pub mod state_key;
pub mod state_manager;
pub mod updaters;
