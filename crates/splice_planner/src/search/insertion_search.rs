use fxhash::FxHashMap;
use jiff::Timestamp;
use parking_lot::RwLock;
use rayon::prelude::*;
use serde::Serialize;
use splice_oracle::routing_oracle::RoutingOracle;
use tracing::{debug, info, warn};

use crate::{
    error::PlannerError,
    problem::{candidate::CandidateInsertion, insertion_problem::InsertionProblem},
};

use super::{
    artifacts::ArtifactStore,
    candidate_evaluation::{CandidateEvaluation, CandidateEvaluator, EvaluationStatus, SkipKind},
    report::{CandidateLogEntry, CandidateStatus, SearchReport},
    search_outcome::{Extremum, SearchOutcome},
    search_params::SearchParams,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SearchStatus {
    Pending,
    Running,
    Completed,
}

type EvaluationCallback = Box<dyn Fn(&CandidateEvaluation) + Send + Sync>;

/// Outcome, log and skip counts over a contiguous run of candidates.
///
/// A candidate's merged routes are dropped as soon as it is recorded unless it
/// becomes one of the run's extrema.
#[derive(Default)]
struct SearchTally {
    outcome: SearchOutcome,
    log: Vec<CandidateLogEntry>,
    skipped_by_kind: FxHashMap<SkipKind, usize>,
}

impl SearchTally {
    fn record(mut self, evaluation: CandidateEvaluation) -> Self {
        let candidate = evaluation.candidate;

        let status = match evaluation.status {
            EvaluationStatus::Evaluated {
                routes,
                artifact,
                artifact_error,
            } => {
                let cost = routes.total_cost;
                let truck_costs = routes.truck_costs.clone();

                let update = self.outcome.consider(Extremum {
                    candidate: candidate.clone(),
                    cost,
                    artifact: artifact.clone(),
                    artifact_error,
                    routes,
                });

                if update.best {
                    debug!("New minimum {} at {}", cost, candidate);
                }
                if update.worst {
                    debug!("New maximum {} at {}", cost, candidate);
                }

                CandidateStatus::Evaluated {
                    cost,
                    truck_costs,
                    artifact,
                }
            }
            EvaluationStatus::Skipped(reason) => {
                *self.skipped_by_kind.entry(reason.kind()).or_insert(0) += 1;

                CandidateStatus::Skipped {
                    kind: reason.kind(),
                    reason: reason.to_string(),
                }
            }
        };

        self.log.push(CandidateLogEntry { candidate, status });
        self
    }

    /// `later` must cover the candidates enumerated right after this tally's.
    fn merge(mut self, later: SearchTally) -> Self {
        self.outcome = self.outcome.merge(later.outcome);
        self.log.extend(later.log);

        for (kind, count) in later.skipped_by_kind {
            *self.skipped_by_kind.entry(kind).or_insert(0) += count;
        }

        self
    }
}

/// Exhaustive search for the cheapest and most expensive place to insert the
/// new stop.
///
/// Candidates are evaluated in parallel. Their results are folded in
/// enumeration order, so ties always go to the earliest candidate.
pub struct InsertionSearch<O> {
    problem: InsertionProblem,
    oracle: O,
    params: SearchParams,
    artifacts: Option<ArtifactStore>,
    status: RwLock<SearchStatus>,
    on_evaluation: Option<EvaluationCallback>,
}

impl<O: RoutingOracle> InsertionSearch<O> {
    pub fn new(problem: InsertionProblem, oracle: O, params: SearchParams) -> Self {
        InsertionSearch {
            problem,
            oracle,
            params,
            artifacts: None,
            status: RwLock::new(SearchStatus::Pending),
            on_evaluation: None,
        }
    }

    /// Stages the merged routes of every evaluated candidate in `store`.
    pub fn with_artifacts(mut self, store: ArtifactStore) -> Self {
        self.artifacts = Some(store);
        self
    }

    /// Called from worker threads once per candidate, in completion order.
    pub fn on_evaluation<F>(&mut self, callback: F)
    where
        F: Fn(&CandidateEvaluation) + Send + Sync + 'static,
    {
        self.on_evaluation = Some(Box::new(callback));
    }

    pub fn status(&self) -> SearchStatus {
        *self.status.read()
    }

    pub fn problem(&self) -> &InsertionProblem {
        &self.problem
    }

    pub fn candidates(&self) -> Vec<CandidateInsertion> {
        self.problem.candidates(self.params.include_fleet_start)
    }

    pub fn run(&self) -> Result<SearchReport, PlannerError> {
        *self.status.write() = SearchStatus::Running;
        let report = self.search();
        *self.status.write() = SearchStatus::Completed;

        report
    }

    fn search(&self) -> Result<SearchReport, PlannerError> {
        let started_at = Timestamp::now();
        let candidates = self.candidates();
        let number_of_threads = self.params.threads.number_of_threads();

        info!(
            "Evaluating {} candidates for stop {} across {} trucks on {} threads",
            candidates.len(),
            self.problem.new_stop(),
            self.problem.trucks().len(),
            number_of_threads
        );

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(number_of_threads)
            .build()?;

        let evaluator = CandidateEvaluator::new(
            &self.problem,
            &self.oracle,
            self.params.selection,
            self.artifacts.as_ref(),
        );

        let tally = pool.install(|| {
            candidates
                .par_iter()
                .try_fold(SearchTally::default, |tally, candidate| {
                    let evaluation = evaluator.evaluate(candidate)?;

                    if let Some(callback) = &self.on_evaluation {
                        callback(&evaluation);
                    }

                    Ok::<_, PlannerError>(tally.record(evaluation))
                })
                .try_reduce(SearchTally::default, |earlier, later| {
                    Ok(earlier.merge(later))
                })
        })?;

        let SearchTally {
            outcome,
            log,
            skipped_by_kind,
        } = tally;
        let skipped: usize = skipped_by_kind.values().sum();

        if let (Some(_), Some(best)) = (&self.artifacts, outcome.best()) {
            if best.artifact.is_none() {
                return Err(PlannerError::WinningArtifact {
                    candidate: best.candidate.id(),
                    reason: best
                        .artifact_error
                        .clone()
                        .unwrap_or_else(|| String::from("artifact missing")),
                });
            }
        }

        match (outcome.best(), outcome.worst()) {
            (Some(best), Some(worst)) => info!(
                "Minimum cost {} at {}, maximum cost {} at {}, {} skipped",
                best.cost, best.candidate, worst.cost, worst.candidate, skipped
            ),
            _ => warn!(
                "None of the {} candidates could be evaluated",
                candidates.len()
            ),
        }

        Ok(SearchReport {
            new_stop: self.problem.new_stop().clone(),
            started_at,
            finished_at: Timestamp::now(),
            candidates: candidates.len(),
            skipped,
            skipped_by_kind,
            outcome,
            log,
        })
    }
}
