use serde::{Deserialize, Serialize};

use crate::{edge_id::EdgeId, route_request::RequestId};

fn default_probability() -> f64 {
    1.0
}

/// One path the router proposes for a request, part of a route distribution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteAlternative {
    pub edges: Vec<EdgeId>,
    pub cost: f64,

    #[serde(default = "default_probability")]
    pub probability: f64,
}

impl RouteAlternative {
    pub fn new(edges: Vec<EdgeId>, cost: f64) -> Self {
        RouteAlternative {
            edges,
            cost,
            probability: default_probability(),
        }
    }

    pub fn first_edge(&self) -> Option<&EdgeId> {
        self.edges.first()
    }

    pub fn last_edge(&self) -> Option<&EdgeId> {
        self.edges.last()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RouteResponse {
    Routed {
        id: RequestId,
        alternatives: Vec<RouteAlternative>,

        /// Index of the alternative the router picked
        #[serde(default)]
        chosen: usize,
    },
    NoPath {
        id: RequestId,

        #[serde(default, skip_serializing_if = "Option::is_none")]
        reason: Option<String>,
    },
}

impl RouteResponse {
    pub fn id(&self) -> RequestId {
        match self {
            RouteResponse::Routed { id, .. } => *id,
            RouteResponse::NoPath { id, .. } => *id,
        }
    }

    pub fn routed(id: RequestId, alternative: RouteAlternative) -> Self {
        RouteResponse::Routed {
            id,
            alternatives: vec![alternative],
            chosen: 0,
        }
    }
}

/// Staged route artifact written by an external router.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteArtifact {
    pub batch: String,
    pub routes: Vec<RouteResponse>,
}
