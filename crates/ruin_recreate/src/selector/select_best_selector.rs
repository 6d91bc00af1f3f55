use crate::solver::accepted_solution::AcceptedSolution;

use super::select_solution::SelectSolution;

pub struct SelectBestSelector;

impl SelectSolution for SelectBestSelector {
    fn select_solution<'r>(
        &self,
        solutions: &'r [AcceptedSolution],
        _: &mut impl rand::Rng,
    ) -> Option<&'r AcceptedSolution> {
        // The pool is kept sorted by cost
        solutions.first()
    }
}
