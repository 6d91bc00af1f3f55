use std::collections::BTreeMap;

use jiff::{SignedDuration, Timestamp};
use serde::Serialize;

#[derive(Default, Debug, Clone, Serialize, PartialEq)]
pub struct StrategyStatistics {
    pub selected: usize,
    pub accepted: usize,
    pub improved_best: usize,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct BestCostRow {
    pub iteration: usize,
    pub timestamp: Timestamp,
    pub cost: f64,
    pub unassigned: usize,
}

/// What happened during one call to `search_solutions`.
#[derive(Default, Debug, Clone, Serialize)]
pub struct SearchStatistics {
    pub started_at: Option<Timestamp>,
    pub finished_at: Option<Timestamp>,
    pub iterations: usize,
    pub improvements: usize,
    pub strategies: BTreeMap<String, StrategyStatistics>,
    pub best_cost_evolution: Vec<BestCostRow>,
}

impl SearchStatistics {
    pub fn start(&mut self) {
        *self = SearchStatistics {
            started_at: Some(Timestamp::now()),
            ..SearchStatistics::default()
        };
    }

    pub fn finish(&mut self) {
        self.finished_at = Some(Timestamp::now());
    }

    pub fn elapsed(&self) -> Option<SignedDuration> {
        Some(self.finished_at?.duration_since(self.started_at?))
    }

    pub fn add_iteration(&mut self, strategy_id: &str, accepted: bool, improved_best: bool) {
        self.iterations += 1;

        let entry = self.strategies.entry(strategy_id.to_owned()).or_default();
        entry.selected += 1;
        if accepted {
            entry.accepted += 1;
        }
        if improved_best {
            entry.improved_best += 1;
        }
    }

    pub fn add_best_cost(&mut self, iteration: usize, cost: f64, unassigned: usize) {
        if iteration > 0 {
            self.improvements += 1;
        }

        self.best_cost_evolution.push(BestCostRow {
            iteration,
            timestamp: Timestamp::now(),
            cost,
            unassigned,
        });
    }
}
