use splice_oracle::routing_oracle::OracleError;
use thiserror::Error;

use crate::{problem::candidate::CandidateId, search::artifacts::ArtifactError};

/// Errors that abort a planning run.
#[derive(Debug, Error)]
pub enum PlannerError {
    #[error("Malformed input: {0}")]
    MalformedInput(String),

    #[error("Routing oracle unavailable: {0}")]
    OracleUnavailable(#[source] OracleError),

    #[error("Failed to persist the artifact of winning candidate {candidate}: {reason}")]
    WinningArtifact {
        candidate: CandidateId,
        reason: String,
    },

    #[error(transparent)]
    Artifact(#[from] ArtifactError),

    #[error("Failed to build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}
