use crate::problem::capacity::Capacity;

/// Key of a derived value. Built-in keys are always registered, custom keys
/// come from [`StateManager::create_state_key`](super::state_manager::StateManager::create_state_key).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StateKey(usize);

impl StateKey {
    pub const LOAD: StateKey = StateKey(0);
    pub const LOAD_AT_BEGINNING: StateKey = StateKey(1);
    pub const LOAD_AT_END: StateKey = StateKey(2);
    pub const MAX_LOAD: StateKey = StateKey(3);
    pub const PAST_MAX_LOAD: StateKey = StateKey(4);
    pub const FUTURE_MAX_LOAD: StateKey = StateKey(5);
    pub const LATEST_OPERATION_START: StateKey = StateKey(6);
    pub const COSTS: StateKey = StateKey(7);
    pub const SKILL_VIOLATED: StateKey = StateKey(8);
    pub const BACKHAUL_VIOLATED: StateKey = StateKey(9);
    pub const SHIPMENT_VIOLATED: StateKey = StateKey(10);
    pub const WAITING: StateKey = StateKey(11);
    pub const FUTURE_WAITING: StateKey = StateKey(12);
    pub const DURATION: StateKey = StateKey(13);

    pub(crate) const BUILT_IN: [(StateKey, &'static str, StateValueType); 14] = [
        (StateKey::LOAD, "load", StateValueType::Capacity),
        (StateKey::LOAD_AT_BEGINNING, "load_at_beginning", StateValueType::Capacity),
        (StateKey::LOAD_AT_END, "load_at_end", StateValueType::Capacity),
        (StateKey::MAX_LOAD, "max_load", StateValueType::Capacity),
        (StateKey::PAST_MAX_LOAD, "past_max_load", StateValueType::Capacity),
        (StateKey::FUTURE_MAX_LOAD, "future_max_load", StateValueType::Capacity),
        (StateKey::LATEST_OPERATION_START, "latest_operation_start", StateValueType::Double),
        (StateKey::COSTS, "costs", StateValueType::Double),
        (StateKey::SKILL_VIOLATED, "skill_violated", StateValueType::Boolean),
        (StateKey::BACKHAUL_VIOLATED, "backhaul_violated", StateValueType::Boolean),
        (StateKey::SHIPMENT_VIOLATED, "shipment_violated", StateValueType::Boolean),
        (StateKey::WAITING, "waiting", StateValueType::Double),
        (StateKey::FUTURE_WAITING, "future_waiting", StateValueType::Double),
        (StateKey::DURATION, "duration", StateValueType::Double),
    ];

    pub(crate) fn new(index: usize) -> Self {
        StateKey(index)
    }

    pub fn index(&self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateValueType {
    Capacity,
    Double,
    Boolean,
}

#[derive(Debug, Clone, PartialEq)]
pub enum StateValue {
    Capacity(Capacity),
    Double(f64),
    Boolean(bool),
}

impl StateValue {
    pub fn value_type(&self) -> StateValueType {
        match self {
            StateValue::Capacity(_) => StateValueType::Capacity,
            StateValue::Double(_) => StateValueType::Double,
            StateValue::Boolean(_) => StateValueType::Boolean,
        }
    }
}

static DEFAULT_CAPACITY: Capacity = Capacity::ZERO;
static DEFAULT_DOUBLE: f64 = 0.0;
static DEFAULT_BOOLEAN: bool = false;

/// Rust types that can be stored in the state manager.
pub trait StateType: Sized + 'static {
    const VALUE_TYPE: StateValueType;

    /// Value returned when nothing has been computed yet.
    fn default_ref() -> &'static Self;

    fn from_value(value: &StateValue) -> Option<&Self>;

    fn into_value(self) -> StateValue;
}

impl StateType for Capacity {
    const VALUE_TYPE: StateValueType = StateValueType::Capacity;

    fn default_ref() -> &'static Self {
        &DEFAULT_CAPACITY
    }

    fn from_value(value: &StateValue) -> Option<&Self> {
        match value {
            StateValue::Capacity(capacity) => Some(capacity),
            _ => None,
        }
    }

    fn into_value(self) -> StateValue {
        StateValue::Capacity(self)
    }
}

impl StateType for f64 {
    const VALUE_TYPE: StateValueType = StateValueType::Double;

    fn default_ref() -> &'static Self {
        &DEFAULT_DOUBLE
    }

    fn from_value(value: &StateValue) -> Option<&Self> {
        match value {
            StateValue::Double(value) => Some(value),
            _ => None,
        }
    }

    fn into_value(self) -> StateValue {
        StateValue::Double(self)
    }
}

impl StateType for bool {
    const VALUE_TYPE: StateValueType = StateValueType::Boolean;

    fn default_ref() -> &'static Self {
        &DEFAULT_BOOLEAN
    }

    fn from_value(value: &StateValue) -> Option<&Self> {
        match value {
            StateValue::Boolean(value) => Some(value),
            _ => None,
        }
    }

    fn into_value(self) -> StateValue {
        StateValue::Boolean(self)
    }
}
