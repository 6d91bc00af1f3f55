use rand::seq::IndexedRandom;

use crate::solver::accepted_solution::AcceptedSolution;

use super::select_solution::SelectSolution;

pub struct SelectRandomSelector;

impl SelectSolution for SelectRandomSelector {
    fn select_solution<'r>(
        &self,
        solutions: &'r [AcceptedSolution],
        rng: &mut impl rand::Rng,
    ) -> Option<&'r AcceptedSolution> {
        solutions.choose(rng)
    }
}
