use std::{fmt::Display, path::PathBuf, sync::Arc};

use fxhash::FxHashMap;
use serde::Serialize;
use splice_oracle::{
    edge_id::EdgeId,
    route_request::{RequestId, RouteBatch},
    route_response::RouteResponse,
    routing_oracle::RoutingOracle,
};
use thiserror::Error;
use tracing::{debug, warn};

use crate::{
    error::PlannerError,
    problem::{
        candidate::CandidateInsertion, insertion_problem::InsertionProblem, truck::TruckIdx,
    },
    timed_debug,
};

use super::{
    artifacts::ArtifactStore,
    cost_aggregator::{CandidateRoutes, CostAggregator},
    request_builder::RequestBuilder,
    route_stitcher::{AlternativeSelection, RouteLeg, RouteStitcher},
};

/// Why a candidate was left out of the search.
#[derive(Debug, Clone, PartialEq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SkipReason {
    #[error("no path found for request {id} from {from} to {to}")]
    NoPathFound {
        id: RequestId,
        from: EdgeId,
        to: EdgeId,
        reason: Option<String>,
    },

    #[error("result mismatch: {detail}")]
    ResultMismatch { detail: String },

    #[error("router failed: {detail}")]
    RouterFailed { detail: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum SkipKind {
    NoPathFound,
    ResultMismatch,
    RouterFailed,
}

impl Display for SkipKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SkipKind::NoPathFound => write!(f, "no_path_found"),
            SkipKind::ResultMismatch => write!(f, "result_mismatch"),
            SkipKind::RouterFailed => write!(f, "router_failed"),
        }
    }
}

impl SkipReason {
    fn mismatch(detail: impl Into<String>) -> Self {
        SkipReason::ResultMismatch {
            detail: detail.into(),
        }
    }

    pub fn kind(&self) -> SkipKind {
        match self {
            SkipReason::NoPathFound { .. } => SkipKind::NoPathFound,
            SkipReason::ResultMismatch { .. } => SkipKind::ResultMismatch,
            SkipReason::RouterFailed { .. } => SkipKind::RouterFailed,
        }
    }
}

#[derive(Debug, Clone)]
pub enum EvaluationStatus {
    Evaluated {
        routes: Arc<CandidateRoutes>,
        artifact: Option<PathBuf>,
        artifact_error: Option<String>,
    },
    Skipped(SkipReason),
}

#[derive(Debug, Clone)]
pub struct CandidateEvaluation {
    pub candidate: CandidateInsertion,
    pub status: EvaluationStatus,
}

impl CandidateEvaluation {
    pub fn cost(&self) -> Option<f64> {
        match &self.status {
            EvaluationStatus::Evaluated { routes, .. } => Some(routes.total_cost),
            EvaluationStatus::Skipped(_) => None,
        }
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self.status, EvaluationStatus::Skipped(_))
    }
}

/// Pairs every request of the batch with its response and checks the contract:
/// one response per request, alternatives running between the request's
/// endpoints with a finite cost. Legs are returned in stitching order.
pub fn match_responses(
    batch: &RouteBatch,
    responses: Vec<RouteResponse>,
) -> Result<Vec<RouteLeg>, SkipReason> {
    if responses.len() != batch.len() {
        return Err(SkipReason::mismatch(format!(
            "expected {} results, received {}",
            batch.len(),
            responses.len()
        )));
    }

    let mut by_id: FxHashMap<RequestId, RouteResponse> = FxHashMap::default();
    for response in responses {
        let id = response.id();
        if by_id.insert(id, response).is_some() {
            return Err(SkipReason::mismatch(format!("duplicate result for {id}")));
        }
    }

    let mut legs = Vec::with_capacity(batch.len());

    for request in &batch.requests {
        let response = by_id
            .remove(&request.id)
            .ok_or_else(|| SkipReason::mismatch(format!("no result for request {}", request.id)))?;

        let (alternatives, chosen) = match response {
            RouteResponse::NoPath { reason, .. } => {
                return Err(SkipReason::NoPathFound {
                    id: request.id,
                    from: request.from.clone(),
                    to: request.to.clone(),
                    reason,
                });
            }
            RouteResponse::Routed {
                alternatives,
                chosen,
                ..
            } => (alternatives, chosen),
        };

        if alternatives.is_empty() {
            return Err(SkipReason::NoPathFound {
                id: request.id,
                from: request.from.clone(),
                to: request.to.clone(),
                reason: Some(String::from("empty route distribution")),
            });
        }

        if chosen >= alternatives.len() {
            return Err(SkipReason::mismatch(format!(
                "request {} chooses alternative {} of {}",
                request.id,
                chosen,
                alternatives.len()
            )));
        }

        for (index, alternative) in alternatives.iter().enumerate() {
            if alternative.first_edge() != Some(&request.from)
                || alternative.last_edge() != Some(&request.to)
            {
                return Err(SkipReason::mismatch(format!(
                    "alternative {} of request {} does not run from {} to {}",
                    index, request.id, request.from, request.to
                )));
            }

            if !alternative.cost.is_finite() {
                return Err(SkipReason::mismatch(format!(
                    "alternative {} of request {} has cost {}",
                    index, request.id, alternative.cost
                )));
            }
        }

        legs.push(RouteLeg {
            id: request.id,
            alternatives,
            chosen,
        });
    }

    legs.sort_by_key(|leg| leg.id);

    Ok(legs)
}

/// Runs one candidate through build, route, stitch and aggregate.
pub struct CandidateEvaluator<'a, O> {
    problem: &'a InsertionProblem,
    oracle: &'a O,
    stitcher: RouteStitcher,
    artifacts: Option<&'a ArtifactStore>,
}

impl<'a, O: RoutingOracle> CandidateEvaluator<'a, O> {
    pub fn new(
        problem: &'a InsertionProblem,
        oracle: &'a O,
        selection: AlternativeSelection,
        artifacts: Option<&'a ArtifactStore>,
    ) -> Self {
        CandidateEvaluator {
            problem,
            oracle,
            stitcher: RouteStitcher::new(selection),
            artifacts,
        }
    }

    /// Only an unavailable oracle is an error, every other failure skips the
    /// candidate.
    pub fn evaluate(
        &self,
        candidate: &CandidateInsertion,
    ) -> Result<CandidateEvaluation, PlannerError> {
        let batch = RequestBuilder::new(self.problem).build(candidate);

        let responses = match timed_debug!(
            format!("Routing batch {} ({} requests)", batch.id, batch.len()),
            self.oracle.route(&batch)
        ) {
            Ok(responses) => responses,
            Err(err) if err.is_fatal() => return Err(PlannerError::OracleUnavailable(err)),
            Err(err) => {
                return Ok(self.skip(
                    candidate,
                    SkipReason::RouterFailed {
                        detail: err.to_string(),
                    },
                ));
            }
        };

        let legs = match match_responses(&batch, responses) {
            Ok(legs) => legs,
            Err(reason) => return Ok(self.skip(candidate, reason)),
        };

        let routes = legs
            .chunk_by(|a, b| a.id.truck == b.id.truck)
            .map(|truck_legs| self.stitcher.stitch(TruckIdx::new(truck_legs[0].id.truck), truck_legs))
            .collect();

        let routes = CostAggregator::aggregate(routes);
        debug!("{}: total cost {}", candidate, routes.total_cost);

        let (artifact, artifact_error) = match self.artifacts {
            Some(store) => match store.stage_merged_routes(candidate, &routes) {
                Ok(path) => (Some(path), None),
                Err(err) => {
                    warn!("{}: could not stage merged routes: {}", candidate, err);
                    (None, Some(err.to_string()))
                }
            },
            None => (None, None),
        };

        Ok(CandidateEvaluation {
            candidate: candidate.clone(),
            status: EvaluationStatus::Evaluated {
                routes: Arc::new(routes),
                artifact,
                artifact_error,
            },
        })
    }

    fn skip(&self, candidate: &CandidateInsertion, reason: SkipReason) -> CandidateEvaluation {
        warn!("Skipping {}: {}", candidate, reason);

        CandidateEvaluation {
            candidate: candidate.clone(),
            status: EvaluationStatus::Skipped(reason),
        }
    }
}
