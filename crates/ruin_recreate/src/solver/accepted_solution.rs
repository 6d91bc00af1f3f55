use super::solution::working_solution::WorkingSolution;

/// A solution of the pool together with the cost it was accepted at.
#[derive(Clone)]
pub struct AcceptedSolution {
    pub solution: WorkingSolution,
    pub cost: f64,
}

impl AcceptedSolution {
    pub fn new(solution: WorkingSolution) -> Self {
        let cost = solution.cost();
        AcceptedSolution { solution, cost }
    }

    pub fn num_unassigned(&self) -> usize {
        self.solution.unassigned_jobs().len()
    }
}

/// Index of the most expensive solution, the last one on equal cost.
pub fn worst_solution_index(solutions: &[AcceptedSolution]) -> Option<usize> {
    solutions
        .iter()
        .enumerate()
        .max_by(|(_, a), (_, b)| a.cost.total_cmp(&b.cost))
        .map(|(index, _)| index)
}

/// Cheapest first. The sort is stable so equal costs keep their arrival order.
pub fn sort_solutions(solutions: &mut [AcceptedSolution]) {
    solutions.sort_by(|a, b| a.cost.total_cmp(&b.cost));
}

/// Puts `candidate` into the pool: appended while there is room, in place of the
/// worst solution otherwise. A copy of a pooled solution is not stored twice.
/// Returns whether the pool changed.
pub fn insert_solution(
    solutions: &mut Vec<AcceptedSolution>,
    candidate: AcceptedSolution,
    max_solutions: usize,
) -> bool {
    let is_duplicate = solutions.iter().any(|accepted| {
        accepted.cost == candidate.cost && accepted.solution.is_identical(&candidate.solution)
    });
    if is_duplicate {
        return false;
    }

    if solutions.len() < max_solutions {
        solutions.push(candidate);
    } else if let Some(worst) = worst_solution_index(solutions) {
        solutions[worst] = candidate;
    } else {
        return false;
    }

    sort_solutions(solutions);
    true
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crate::test_utils::{self, TestRoute};

    use super::*;

    #[test]
    fn test_insert_replaces_worst() {
        let problem = Arc::new(test_utils::create_test_problem(
            test_utils::create_location_grid(1, 4),
            test_utils::create_basic_services(vec![1, 2, 3]),
            test_utils::create_basic_vehicles(vec![0]),
        ));
        let solution = |jobs: Vec<usize>, cost: f64| AcceptedSolution {
            solution: test_utils::create_test_working_solution(
                Arc::clone(&problem),
                vec![TestRoute {
                    vehicle_id: 0,
                    job_ids: jobs,
                }],
            ),
            cost,
        };

        let mut solutions = Vec::new();
        assert!(insert_solution(&mut solutions, solution(vec![0], 30.0), 2));
        assert!(insert_solution(&mut solutions, solution(vec![0, 1], 20.0), 2));
        assert!(!insert_solution(&mut solutions, solution(vec![0, 1], 20.0), 2));
        assert!(insert_solution(&mut solutions, solution(vec![0, 1, 2], 10.0), 2));

        let costs: Vec<f64> = solutions.iter().map(|accepted| accepted.cost).collect();
        assert_eq!(costs, vec![10.0, 20.0]);
        assert_eq!(worst_solution_index(&solutions), Some(1));
    }
}
