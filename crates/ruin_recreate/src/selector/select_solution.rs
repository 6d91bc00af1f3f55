use crate::solver::accepted_solution::AcceptedSolution;

pub trait SelectSolution {
    /// Picks the solution a strategy starts from. `None` only for an empty pool.
    fn select_solution<'r>(
        &self,
        solutions: &'r [AcceptedSolution],
        rng: &mut impl rand::Rng,
    ) -> Option<&'r AcceptedSolution>;
}
