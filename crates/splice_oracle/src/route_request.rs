use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};
use serde_with::{DeserializeFromStr, SerializeDisplay};
use thiserror::Error;

use crate::edge_id::EdgeId;

/// Correlates a routed leg with the truck and itinerary slot it belongs to.
///
/// Ordering is (truck, order, sub_leg), which is the order legs are stitched in.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, SerializeDisplay, DeserializeFromStr,
)]
pub struct RequestId {
    pub truck: usize,
    pub order: usize,
    pub sub_leg: u8,
}

impl RequestId {
    pub const fn new(truck: usize, order: usize, sub_leg: u8) -> Self {
        RequestId {
            truck,
            order,
            sub_leg,
        }
    }
}

impl Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}_{}_{}", self.truck, self.order, self.sub_leg)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Invalid request id: {0}")]
pub struct ParseRequestIdError(String);

impl FromStr for RequestId {
    type Err = ParseRequestIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ParseRequestIdError(s.to_owned());
        let mut parts = s.split('_');

        let truck = parts.next().ok_or_else(invalid)?;
        let order = parts.next().ok_or_else(invalid)?;
        let sub_leg = parts.next().ok_or_else(invalid)?;

        if parts.next().is_some() {
            return Err(invalid());
        }

        Ok(RequestId {
            truck: truck.parse().map_err(|_| invalid())?,
            order: order.parse().map_err(|_| invalid())?,
            sub_leg: sub_leg.parse().map_err(|_| invalid())?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteRequest {
    pub id: RequestId,
    pub from: EdgeId,
    pub to: EdgeId,
}

/// All requests needed to route one candidate, sent to the oracle together.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteBatch {
    /// Names the staged artifacts of this batch.
    pub id: String,
    pub requests: Vec<RouteRequest>,
}

impl RouteBatch {
    pub fn len(&self) -> usize {
        self.requests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }
}
