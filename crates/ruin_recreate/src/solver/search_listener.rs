use crate::problem::vehicle_routing_problem::VehicleRoutingProblem;

use super::accepted_solution::AcceptedSolution;

/// Lifecycle of a search, in the order the events are emitted.
pub enum SearchEvent<'a> {
    AlgorithmStarts {
        problem: &'a VehicleRoutingProblem,
        solutions: &'a [AcceptedSolution],
    },
    IterationStarts {
        iteration: usize,
    },
    StrategySelected {
        iteration: usize,
        strategy_id: &'a str,
    },
    IterationEnds {
        iteration: usize,
        strategy_id: &'a str,
        candidate_cost: f64,
        accepted: bool,
        best_cost: f64,
        solutions: &'a [AcceptedSolution],
    },
    AlgorithmEnds {
        iterations: usize,
        solutions: &'a [AcceptedSolution],
    },
}

pub trait SearchListener {
    fn on_event(&mut self, event: &SearchEvent);
}

impl<F> SearchListener for F
where
    F: FnMut(&SearchEvent),
{
    fn on_event(&mut self, event: &SearchEvent) {
        self(event)
    }
}

pub type BoxedSearchListener = Box<dyn SearchListener + Send>;

pub(crate) fn notify(listeners: &mut [BoxedSearchListener], event: SearchEvent) {
    for listener in listeners.iter_mut() {
        listener.on_event(&event);
    }
}
