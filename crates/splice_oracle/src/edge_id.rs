use std::{fmt::Display, sync::Arc};

use serde::{Deserialize, Serialize};

/// Identifier of a directed edge of the road network.
///
/// The opposite direction of edge `X` is named `-X`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EdgeId(Arc<str>);

impl EdgeId {
    pub fn new(id: impl AsRef<str>) -> Self {
        EdgeId(Arc::from(id.as_ref()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }

    pub fn reversed(&self) -> EdgeId {
        match self.0.strip_prefix('-') {
            Some(forward) => EdgeId::new(forward),
            None => EdgeId::new(format!("-{}", self.0)),
        }
    }
}

impl Display for EdgeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EdgeId {
    fn from(value: &str) -> Self {
        EdgeId::new(value)
    }
}

impl From<String> for EdgeId {
    fn from(value: String) -> Self {
        EdgeId(Arc::from(value))
    }
}
