use crate::solver::accepted_solution::{AcceptedSolution, worst_solution_index};

use super::accept_solution::{AcceptSolution, AcceptSolutionContext};

/// Threshold accepting from Schrimpf et al. (2000), "Record breaking optimization
/// results using the ruin and recreate principle".
///
/// A candidate replaces the worst pooled solution when it costs less than that
/// solution plus a threshold. The threshold halves every `alpha` share of the
/// iterations:
///
/// `threshold(i) = initial_threshold * exp(-ln(2) * (i / max_iterations) / alpha)`
pub struct SchrimpfAcceptor {
    initial_threshold: f64,
    alpha: f64,
}

impl SchrimpfAcceptor {
    pub fn new(initial_threshold: f64, alpha: f64) -> Self {
        SchrimpfAcceptor {
            initial_threshold,
            alpha,
        }
    }

    pub fn initial_threshold(&self) -> f64 {
        self.initial_threshold
    }

    pub fn compute_threshold(&self, context: &AcceptSolutionContext) -> f64 {
        let progress = context.iteration as f64 / context.max_iterations.max(1) as f64;
        self.initial_threshold * (-(2.0_f64).ln() * progress / self.alpha).exp()
    }
}

impl AcceptSolution for SchrimpfAcceptor {
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
            Some(worst) => cost < current_solutions[worst].cost + self.compute_threshold(context),
            None => true,
        }
    }
}
