use std::{fs::File, io::BufReader, path::Path};

use fxhash::FxHashMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    edge_id::EdgeId,
    route_request::RouteBatch,
    route_response::{RouteAlternative, RouteResponse},
    routing_oracle::{OracleError, RoutingOracle},
};

/// Road network descriptor listing the routed legs known to the table.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RoadNetworkDescriptor {
    pub legs: Vec<LegDescriptor>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LegDescriptor {
    pub from: EdgeId,
    pub to: EdgeId,
    pub alternatives: Vec<RouteAlternative>,

    #[serde(default)]
    pub chosen: usize,
}

struct TableEntry {
    alternatives: Vec<RouteAlternative>,
    chosen: usize,
}

/// Answers route requests from a precomputed table of legs.
///
/// Pairs missing from the table have no path.
#[derive(Default)]
pub struct TableOracle {
    legs: FxHashMap<(EdgeId, EdgeId), TableEntry>,
}

impl TableOracle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_descriptor(descriptor: RoadNetworkDescriptor) -> Result<Self, OracleError> {
        let mut oracle = TableOracle::new();

        for leg in descriptor.legs {
            if leg.alternatives.is_empty() {
                return Err(OracleError::Network(format!(
                    "leg {} -> {} has no alternatives",
                    leg.from, leg.to
                )));
            }

            if leg.chosen >= leg.alternatives.len() {
                return Err(OracleError::Network(format!(
                    "leg {} -> {} chooses alternative {} of {}",
                    leg.from,
                    leg.to,
                    leg.chosen,
                    leg.alternatives.len()
                )));
            }

            oracle.insert(leg.from, leg.to, leg.alternatives, leg.chosen);
        }

        Ok(oracle)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, OracleError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|err| {
            OracleError::Network(format!("cannot open {}: {}", path.display(), err))
        })?;

        let descriptor: RoadNetworkDescriptor = serde_json::from_reader(BufReader::new(file))
            .map_err(|err| OracleError::Network(format!("{}: {}", path.display(), err)))?;

        Self::from_descriptor(descriptor)
    }

    pub fn insert(
        &mut self,
        from: EdgeId,
        to: EdgeId,
        alternatives: Vec<RouteAlternative>,
        chosen: usize,
    ) {
        self.legs.insert(
            (from, to),
            TableEntry {
                alternatives,
                chosen,
            },
        );
    }

    /// Adds a leg with a single path.
    pub fn add_leg<E: Into<EdgeId>>(&mut self, edges: Vec<E>, cost: f64) -> &mut Self {
        let edges: Vec<EdgeId> = edges.into_iter().map(Into::into).collect();

        if let (Some(from), Some(to)) = (edges.first().cloned(), edges.last().cloned()) {
            self.insert(from, to, vec![RouteAlternative::new(edges, cost)], 0);
        }

        self
    }

    pub fn len(&self) -> usize {
        self.legs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.legs.is_empty()
    }
}

impl RoutingOracle for TableOracle {
    fn route(&self, batch: &RouteBatch) -> Result<Vec<RouteResponse>, OracleError> {
        let responses = batch
            .requests
            .iter()
            .map(|request| {
                match self.legs.get(&(request.from.clone(), request.to.clone())) {
                    Some(entry) => RouteResponse::Routed {
                        id: request.id,
                        alternatives: entry.alternatives.clone(),
                        chosen: entry.chosen,
                    },
                    None => {
                        debug!(
                            "TableOracle: no leg {} -> {} for request {}",
                            request.from, request.to, request.id
                        );
                        RouteResponse::NoPath {
                            id: request.id,
                            reason: Some(format!("{} -> {} not in table", request.from, request.to)),
                        }
                    }
                }
            })
            .collect();

        Ok(responses)
    }
}

#[cfg(test)]
mod tests {
    use crate::route_request::{RequestId, RouteRequest};

    use super::*;

    #[test]
    fn test_routes_known_legs_and_reports_missing() {
        let mut oracle = TableOracle::new();
        oracle.add_leg(vec!["a", "m", "b"], 4.0);

        let batch = RouteBatch {
            id: String::from("0"),
            requests: vec![
                RouteRequest {
                    id: RequestId::new(0, 0, 0),
                    from: EdgeId::from("a"),
                    to: EdgeId::from("b"),
                },
                RouteRequest {
                    id: RequestId::new(0, 1, 0),
                    from: EdgeId::from("b"),
                    to: EdgeId::from("c"),
                },
            ],
        };

        let responses = oracle.route(&batch).unwrap();

        assert_eq!(
            responses[0],
            RouteResponse::routed(
                RequestId::new(0, 0, 0),
                RouteAlternative::new(vec!["a".into(), "m".into(), "b".into()], 4.0)
            )
        );
        assert!(matches!(
            responses[1],
            RouteResponse::NoPath { id, .. } if id == RequestId::new(0, 1, 0)
        ));
    }

    #[test]
    fn test_descriptor_rejects_out_of_range_choice() {
        let descriptor: RoadNetworkDescriptor = serde_json::from_str(
            r#"{"legs":[{"from":"a","to":"b","alternatives":[{"edges":["a","b"],"cost":1.0}],"chosen":2}]}"#,
        )
        .unwrap();

        let error = TableOracle::from_descriptor(descriptor).err().unwrap();
        assert!(matches!(error, OracleError::Network(_)));
        assert!(error.is_fatal());
    }

    #[test]
    fn test_descriptor_with_distribution() {
        let descriptor: RoadNetworkDescriptor = serde_json::from_str(
            r#"{"legs":[{"from":"a","to":"b","alternatives":[
                {"edges":["a","x","b"],"cost":7.0,"probability":0.4},
                {"edges":["a","b"],"cost":5.0,"probability":0.6}
            ],"chosen":1}]}"#,
        )
        .unwrap();

        let oracle = TableOracle::from_descriptor(descriptor).unwrap();
        assert_eq!(oracle.len(), 1);
    }
}
