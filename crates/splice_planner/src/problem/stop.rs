use std::fmt::Display;

use serde::{Deserialize, Serialize};
use splice_oracle::edge_id::EdgeId;

/// A location trucks can visit, identified by the directed edge it lies on.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Stop(EdgeId);

impl Stop {
    pub fn new(edge: impl Into<EdgeId>) -> Self {
        Stop(edge.into())
    }

    pub fn edge(&self) -> &EdgeId {
        &self.0
    }

    /// The same location reached from the opposite direction.
    pub fn reversed(&self) -> Stop {
        Stop(self.0.reversed())
    }
}

impl Display for Stop {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl From<&str> for Stop {
    fn from(value: &str) -> Self {
        Stop::new(value)
    }
}

impl From<EdgeId> for Stop {
    fn from(value: EdgeId) -> Self {
        Stop(value)
    }
}
