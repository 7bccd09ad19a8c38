use std::{fs::File, io::BufReader, path::Path};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::{
    error::PlannerError,
    problem::{fleet::Fleet, insertion_problem::InsertionProblem, stop::Stop, trip::Trip},
};

/// Fleet input file: every truck's trips in itinerary order.
#[derive(Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields, rename = "Fleet")]
pub struct JsonFleet {
    pub id: Option<String>,
    pub trips: Vec<JsonTrip>,

    /// Edge of the stop to insert, overridable from the command line
    pub new_stop: Option<String>,
}

#[derive(Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields, rename = "Trip")]
pub struct JsonTrip {
    pub id: Option<String>,

    /// Origin edge
    pub from: String,

    /// Destination edge
    pub to: String,
}

impl JsonFleet {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, PlannerError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|err| {
            PlannerError::MalformedInput(format!("cannot open {}: {}", path.display(), err))
        })?;

        serde_json::from_reader(BufReader::new(file))
            .map_err(|err| PlannerError::MalformedInput(format!("{}: {}", path.display(), err)))
    }

    pub fn fleet(&self) -> Fleet {
        Fleet::new(
            self.trips
                .iter()
                .map(|trip| Trip::new(Stop::new(trip.from.as_str()), Stop::new(trip.to.as_str())))
                .collect(),
        )
    }

    /// Builds the problem, the given stop taking precedence over the file's.
    #[instrument(skip_all, level = "debug")]
    pub fn build_problem(&self, new_stop: Option<Stop>) -> Result<InsertionProblem, PlannerError> {
        let new_stop = new_stop
            .or_else(|| self.new_stop.as_deref().map(Stop::new))
            .ok_or_else(|| PlannerError::MalformedInput(String::from("no new stop given")))?;

        InsertionProblem::new(self.fleet(), new_stop)
    }
}
