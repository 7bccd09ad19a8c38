use std::path::PathBuf;

use splice_oracle::{
    edge_id::EdgeId,
    route_request::{RequestId, RouteBatch},
    route_response::{RouteAlternative, RouteResponse},
    routing_oracle::{OracleError, RoutingOracle},
    table_oracle::TableOracle,
};

use crate::{
    problem::{fleet::Fleet, insertion_problem::InsertionProblem, stop::Stop, trip::Trip},
    search::route_stitcher::RouteLeg,
};

pub fn create_fleet(trips: &[(&str, &str)]) -> Fleet {
    Fleet::new(
        trips
            .iter()
            .map(|&(from, to)| Trip::new(Stop::from(from), Stop::from(to)))
            .collect(),
    )
}

pub fn create_problem(trips: &[(&str, &str)], new_stop: &str) -> InsertionProblem {
    InsertionProblem::new(create_fleet(trips), Stop::from(new_stop)).unwrap()
}

pub fn edges(ids: &[&str]) -> Vec<EdgeId> {
    ids.iter().map(|&id| EdgeId::from(id)).collect()
}

pub fn alternative(ids: &[&str], cost: f64) -> RouteAlternative {
    RouteAlternative::new(edges(ids), cost)
}

pub fn route_leg(
    id: (usize, usize, u8),
    alternatives: Vec<RouteAlternative>,
    chosen: usize,
) -> RouteLeg {
    RouteLeg {
        id: RequestId::new(id.0, id.1, id.2),
        alternatives,
        chosen,
    }
}

/// Legs for the fleet (A,B),(B,C),(C,D) with new stop X.
pub fn end_to_end_oracle() -> TableOracle {
    let mut oracle = TableOracle::new();
    oracle
        .add_leg(vec!["A", "ab", "B"], 6.0)
        .add_leg(vec!["B", "bc", "C"], 3.0)
        .add_leg(vec!["C", "cd", "D"], 4.0)
        .add_leg(vec!["A", "ax", "X"], 2.0)
        .add_leg(vec!["X", "xb", "B"], 2.0)
        .add_leg(vec!["B", "bx", "X"], 1.0)
        .add_leg(vec!["X", "xc", "C"], 1.0)
        .add_leg(vec!["C", "cx", "X"], 3.0)
        .add_leg(vec!["X", "xd", "D"], 2.0)
        .add_leg(vec!["D", "dx", "X"], 6.0)
        .add_leg(vec!["X", "xa", "A"], 4.0);
    oracle
}

/// An oracle whose router cannot be started.
pub struct UnavailableOracle;

impl RoutingOracle for UnavailableOracle {
    fn route(&self, _batch: &RouteBatch) -> Result<Vec<RouteResponse>, OracleError> {
        Err(OracleError::Unavailable {
            program: String::from("missing-router"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
        })
    }
}

/// Loses the last response of one batch.
pub struct DroppingOracle {
    inner: TableOracle,
    batch: String,
}

impl DroppingOracle {
    pub fn new(inner: TableOracle, batch: &str) -> Self {
        DroppingOracle {
            inner,
            batch: batch.to_string(),
        }
    }
}

impl RoutingOracle for DroppingOracle {
    fn route(&self, batch: &RouteBatch) -> Result<Vec<RouteResponse>, OracleError> {
        let mut responses = self.inner.route(batch)?;

        if batch.id == self.batch {
            responses.pop();
        }

        Ok(responses)
    }
}

pub fn temp_folder(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("splice_planner_{}_{}", name, std::process::id()))
}
