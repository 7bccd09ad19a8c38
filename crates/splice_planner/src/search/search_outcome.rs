use std::{path::PathBuf, sync::Arc};

use serde::Serialize;

use crate::problem::candidate::CandidateInsertion;

use super::cost_aggregator::CandidateRoutes;

/// A candidate holding the minimum or maximum total cost.
#[derive(Debug, Clone, Serialize)]
pub struct Extremum {
    pub candidate: CandidateInsertion,
    pub cost: f64,
    pub artifact: Option<PathBuf>,

    #[serde(skip)]
    pub artifact_error: Option<String>,

    #[serde(skip)]
    pub routes: Arc<CandidateRoutes>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OutcomeUpdate {
    pub best: bool,
    pub worst: bool,
}

/// Running extrema over evaluated candidates.
///
/// Comparisons are strict, so on equal costs the candidate considered first
/// keeps its place.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SearchOutcome {
    best: Option<Extremum>,
    worst: Option<Extremum>,
}

impl SearchOutcome {
    pub fn consider(&mut self, candidate: Extremum) -> OutcomeUpdate {
        let update = OutcomeUpdate {
            best: self
                .best
                .as_ref()
                .is_none_or(|best| candidate.cost < best.cost),
            worst: self
                .worst
                .as_ref()
                .is_none_or(|worst| candidate.cost > worst.cost),
        };

        match (update.best, update.worst) {
            (true, true) => {
                self.worst = Some(candidate.clone());
                self.best = Some(candidate);
            }
            (true, false) => self.best = Some(candidate),
            (false, true) => self.worst = Some(candidate),
            (false, false) => {}
        }

        update
    }

    /// Folds in the outcome of candidates enumerated after this one's.
    pub fn merge(self, later: SearchOutcome) -> SearchOutcome {
        let best = match (self.best, later.best) {
            (Some(earlier), Some(later)) if later.cost < earlier.cost => Some(later),
            (Some(earlier), _) => Some(earlier),
            (None, later) => later,
        };

        let worst = match (self.worst, later.worst) {
            (Some(earlier), Some(later)) if later.cost > earlier.cost => Some(later),
            (Some(earlier), _) => Some(earlier),
            (None, later) => later,
        };

        SearchOutcome { best, worst }
    }

    pub fn best(&self) -> Option<&Extremum> {
        self.best.as_ref()
    }

    pub fn worst(&self) -> Option<&Extremum> {
        self.worst.as_ref()
    }

    pub fn min_cost(&self) -> Option<f64> {
        self.best.as_ref().map(|best| best.cost)
    }

    pub fn max_cost(&self) -> Option<f64> {
        self.worst.as_ref().map(|worst| worst.cost)
    }

    pub fn is_empty(&self) -> bool {
        self.best.is_none()
    }
}
