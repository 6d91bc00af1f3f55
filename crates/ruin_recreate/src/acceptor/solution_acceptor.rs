use std::fmt::Display;

use serde::{Deserialize, Serialize};

use crate::{error::ConfigError, solver::accepted_solution::AcceptedSolution};

use super::{
    accept_solution::{AcceptSolution, AcceptSolutionContext},
    greedy_acceptor::GreedyAcceptor,
    schrimpf_acceptor::SchrimpfAcceptor,
};

pub enum SolutionAcceptor {
    Greedy(GreedyAcceptor),
    Schrimpf(SchrimpfAcceptor),
}

impl AcceptSolution for SolutionAcceptor {
    fn accept(
        &self,
        current_solutions: &[AcceptedSolution],
        cost: f64,
        context: &AcceptSolutionContext,
    ) -> bool {
        match self {
            SolutionAcceptor::Greedy(acceptor) => {
                acceptor.accept(current_solutions, cost, context)
            }
            SolutionAcceptor::Schrimpf(acceptor) => {
                acceptor.accept(current_solutions, cost, context)
            }
        }
    }
}

/// Acceptor configuration. The Schrimpf threshold starts at the cost of the
/// initial solution times `initial_threshold_fraction`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SolutionAcceptorParams {
    Greedy,
    Schrimpf {
        alpha: f64,
        initial_threshold_fraction: f64,
    },
}

impl Default for SolutionAcceptorParams {
    fn default() -> Self {
        SolutionAcceptorParams::Schrimpf {
            alpha: 0.1,
            initial_threshold_fraction: 0.05,
        }
    }
}

impl Display for SolutionAcceptorParams {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SolutionAcceptorParams::Greedy => write!(f, "Greedy"),
            SolutionAcceptorParams::Schrimpf { alpha, .. } => write!(f, "Schrimpf(alpha={alpha})"),
        }
    }
}

impl SolutionAcceptorParams {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let SolutionAcceptorParams::Schrimpf {
            alpha,
            initial_threshold_fraction,
        } = *self
        {
            if !(alpha > 0.0 && alpha.is_finite()) {
                return Err(ConfigError::InvalidParameter {
                    name: "alpha",
                    reason: format!("{alpha} must be positive"),
                });
            }
            if !(initial_threshold_fraction >= 0.0 && initial_threshold_fraction.is_finite()) {
                return Err(ConfigError::InvalidParameter {
                    name: "initial_threshold_fraction",
                    reason: format!("{initial_threshold_fraction} must not be negative"),
                });
            }
        }

        Ok(())
    }

    /// Builds the acceptor once the cost of the initial solution is known.
    pub fn create_acceptor(&self, initial_cost: f64) -> SolutionAcceptor {
        match *self {
            SolutionAcceptorParams::Greedy => SolutionAcceptor::Greedy(GreedyAcceptor),
            SolutionAcceptorParams::Schrimpf {
                alpha,
                initial_threshold_fraction,
            } => {
                let initial_threshold = if initial_cost.is_finite() {
                    initial_cost.abs() * initial_threshold_fraction
                } else {
                    0.0
                };
                SolutionAcceptor::Schrimpf(SchrimpfAcceptor::new(initial_threshold, alpha))
            }
        }
    }
}
