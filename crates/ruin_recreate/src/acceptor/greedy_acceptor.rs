use crate::solver::accepted_solution::{AcceptedSolution, worst_solution_index};

use super::accept_solution::{AcceptSolution, AcceptSolutionContext};

/// Keeps the cheapest solutions seen so far.
pub struct GreedyAcceptor;

impl AcceptSolution for GreedyAcceptor {
    fn accept(
        &self,
        current_solutions: &[AcceptedSolution],
        cost: f64,
        context: &AcceptSolutionContext,
    ) -> bool {
        if current_solutions.len() < context.max_solutions {
            return true;
        }

        match worst_solution_index(current_solutions) {
            Some(worst) => cost < current_solutions[worst].cost,
            None => true,
        }
    }
}
