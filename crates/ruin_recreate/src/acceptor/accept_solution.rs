use crate::solver::accepted_solution::AcceptedSolution;

pub struct AcceptSolutionContext {
    pub iteration: usize,
    pub max_iterations: usize,
    pub max_solutions: usize,
}

pub trait AcceptSolution {
    /// Whether a candidate of `cost` may enter the pool. An accepted candidate is
    /// appended while the pool has room and replaces the worst solution otherwise.
    fn accept(
        &self,
        current_solutions: &[AcceptedSolution],
        cost: f64,
        context: &AcceptSolutionContext,
    ) -> bool;
}
