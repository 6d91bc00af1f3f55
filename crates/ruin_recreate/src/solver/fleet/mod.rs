pub mod vehicle_fleet_manager;
