use std::fmt::Display;

use serde::{Deserialize, Serialize};

use crate::solver::accepted_solution::AcceptedSolution;

use super::{
    select_best_selector::SelectBestSelector, select_random_selector::SelectRandomSelector,
    select_solution::SelectSolution,
};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SolutionSelector {
    #[default]
    SelectBest,
    SelectRandom,
}

impl Display for SolutionSelector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SolutionSelector::SelectBest => write!(f, "SelectBest"),
            SolutionSelector::SelectRandom => write!(f, "SelectRandom"),
        }
    }
}

impl SelectSolution for SolutionSelector {
    fn select_solution<'r>(
        &self,
        solutions: &'r [AcceptedSolution],
        rng: &mut impl rand::Rng,
    ) -> Option<&'r AcceptedSolution> {
        match self {
            SolutionSelector::SelectBest => SelectBestSelector.select_solution(solutions, rng),
            SolutionSelector::SelectRandom => SelectRandomSelector.select_solution(solutions, rng),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use rand::{SeedableRng, rngs::SmallRng};

    use crate::{solver::solution::working_solution::WorkingSolution, test_utils};

    use super::*;

    fn pool(costs: &[f64]) -> Vec<AcceptedSolution> {
        let problem = Arc::new(test_utils::create_test_problem(
            test_utils::create_location_grid(1, 2),
            test_utils::create_basic_services(vec![1]),
            test_utils::create_basic_vehicles(vec![0]),
        ));
        costs
            .iter()
            .map(|&cost| AcceptedSolution {
                solution: WorkingSolution::new(Arc::clone(&problem)),
                cost,
            })
            .collect()
    }

    #[test]
    fn test_select_best_takes_first() {
        let solutions = pool(&[1.0, 2.0, 3.0]);
        let mut rng = SmallRng::seed_from_u64(0);

        let selected = SolutionSelector::SelectBest.select_solution(&solutions, &mut rng);
        assert_eq!(selected.map(|s| s.cost), Some(1.0));
    }

    #[test]
    fn test_select_random_is_in_pool() {
        let solutions = pool(&[1.0, 2.0, 3.0]);
        let mut rng = SmallRng::seed_from_u64(0);

        for _ in 0..10 {
            let selected = SolutionSelector::SelectRandom
                .select_solution(&solutions, &mut rng)
                .map(|s| s.cost);
            assert!(matches!(selected, Some(cost) if (1.0..=3.0).contains(&cost)));
        }
    }

    #[test]
    fn test_empty_pool_selects_nothing() {
        let mut rng = SmallRng::seed_from_u64(0);
        assert!(SolutionSelector::SelectBest.select_solution(&[], &mut rng).is_none());
        assert!(SolutionSelector::SelectRandom.select_solution(&[], &mut rng).is_none());
    }
}
