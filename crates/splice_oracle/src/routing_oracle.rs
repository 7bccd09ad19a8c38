use std::path::PathBuf;

use thiserror::Error;

use crate::{route_request::RouteBatch, route_response::RouteResponse};

#[derive(Debug, Error)]
pub enum OracleError {
    #[error("Router {program} could not be invoked: {source}")]
    Unavailable {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Router exited with {status}: {stderr}")]
    RouterFailed { status: String, stderr: String },

    #[error("Staging I/O failed for {}: {source}", path.display())]
    Staging {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Deserialization error: {0}")]
    Deserialize(#[from] serde_json::Error),

    #[error("Router file codec error: {0}")]
    Codec(String),

    #[error("Route artifact answers batch {found} instead of {expected}")]
    BatchMismatch { expected: String, found: String },

    #[error("Invalid road network descriptor: {0}")]
    Network(String),
}

impl OracleError {
    /// Errors that prevent any further routing, as opposed to a single failed batch.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            OracleError::Unavailable { .. } | OracleError::Network(_)
        )
    }
}

/// Computes paths between pairs of edges of the road network.
///
/// Implementations must return one response per request of the batch. A request
/// without a route is reported as [`RouteResponse::NoPath`], not as an error.
pub trait RoutingOracle: Send + Sync {
    fn route(&self, batch: &RouteBatch) -> Result<Vec<RouteResponse>, OracleError>;
}

impl<O: RoutingOracle + ?Sized> RoutingOracle for &O {
    fn route(&self, batch: &RouteBatch) -> Result<Vec<RouteResponse>, OracleError> {
        (**self).route(batch)
    }
}

impl<O: RoutingOracle + ?Sized> RoutingOracle for Box<O> {
    fn route(&self, batch: &RouteBatch) -> Result<Vec<RouteResponse>, OracleError> {
        (**self).route(batch)
    }
}
