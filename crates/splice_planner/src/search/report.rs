use std::{fmt::Display, path::Path, path::PathBuf};

use fxhash::FxHashMap;
use jiff::{SignedDuration, Timestamp};
use serde::Serialize;
use serde_with::{DisplayFromStr, serde_as};

use crate::problem::{candidate::CandidateInsertion, stop::Stop};

use super::{
    artifacts::{ArtifactError, write_json},
    candidate_evaluation::SkipKind,
    search_outcome::{Extremum, SearchOutcome},
};

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CandidateStatus {
    Evaluated {
        cost: f64,
        truck_costs: Vec<f64>,
        artifact: Option<PathBuf>,
    },
    Skipped {
        kind: SkipKind,
        reason: String,
    },
}

#[derive(Debug, Clone, Serialize)]
pub struct CandidateLogEntry {
    pub candidate: CandidateInsertion,
    #[serde(flatten)]
    pub status: CandidateStatus,
}

/// Result of a completed insertion search.
#[serde_as]
#[derive(Debug, Clone, Serialize)]
pub struct SearchReport {
    pub new_stop: Stop,
    pub started_at: Timestamp,
    pub finished_at: Timestamp,
    pub candidates: usize,
    pub skipped: usize,

    #[serde_as(as = "FxHashMap<DisplayFromStr, _>")]
    pub skipped_by_kind: FxHashMap<SkipKind, usize>,

    #[serde(flatten)]
    pub outcome: SearchOutcome,
    pub log: Vec<CandidateLogEntry>,
}

impl SearchReport {
    pub fn elapsed(&self) -> SignedDuration {
        self.finished_at.duration_since(self.started_at)
    }

    pub fn evaluated(&self) -> usize {
        self.candidates - self.skipped
    }

    pub fn best(&self) -> Option<&Extremum> {
        self.outcome.best()
    }

    pub fn worst(&self) -> Option<&Extremum> {
        self.outcome.worst()
    }

    pub fn min_cost(&self) -> Option<f64> {
        self.outcome.min_cost()
    }

    pub fn max_cost(&self) -> Option<f64> {
        self.outcome.max_cost()
    }

    pub fn write_json(&self, path: &Path) -> Result<(), ArtifactError> {
        write_json(path, self)
    }

    pub fn write_text(&self, path: &Path) -> Result<(), ArtifactError> {
        std::fs::write(path, self.to_string()).map_err(|source| ArtifactError::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}

fn location(extremum: &Extremum) -> String {
    match &extremum.artifact {
        Some(artifact) => artifact.display().to_string(),
        None => extremum.candidate.to_string(),
    }
}

impl Display for SearchReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for entry in &self.log {
            match &entry.status {
                CandidateStatus::Evaluated { cost, .. } => writeln!(
                    f,
                    "Total cost for candidate {}: {}",
                    entry.candidate.id(),
                    cost
                )?,
                CandidateStatus::Skipped { reason, .. } => writeln!(
                    f,
                    "Skipped candidate {}: {}",
                    entry.candidate.id(),
                    reason
                )?,
            }
        }

        match self.best() {
            Some(best) => writeln!(f, "Minimum cost: {} at {}", best.cost, location(best))?,
            None => writeln!(f, "Minimum cost: none")?,
        }

        match self.worst() {
            Some(worst) => writeln!(f, "Maximum cost: {} at {}", worst.cost, location(worst))?,
            None => writeln!(f, "Maximum cost: none")?,
        }

        writeln!(f, "Skipped candidates: {}", self.skipped)
    }
}
