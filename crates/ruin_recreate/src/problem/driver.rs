use serde::{Deserialize, Serialize};

/// Driver bound to a route. Cost oracles receive it but the built-in ones ignore it.
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq, Eq, Hash)]
pub enum Driver {
    #[default]
    NoDriver,
    Named(String),
}
