use serde::{Deserialize, Serialize};

#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FleetSize {
    #[default]
    Finite,
    Infinite,
}
