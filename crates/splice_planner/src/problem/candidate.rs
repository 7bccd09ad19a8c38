use std::fmt::Display;

use serde::Serialize;

use super::{stop::Stop, truck::TruckIdx};

crate::define_index_newtype!(CandidateId, CandidateInsertion);

/// Where the new stop goes within a truck's itinerary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InsertionPosition {
    /// Before the first leg
    Prepend,
    /// Replaces leg `leg` by origin -> stop -> destination
    Splice { leg: usize },
    /// After the last leg
    Append,
}

impl Display for InsertionPosition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InsertionPosition::Prepend => write!(f, "prepend"),
            InsertionPosition::Splice { leg } => write!(f, "splice leg {leg}"),
            InsertionPosition::Append => write!(f, "append"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CandidateKind {
    Interior,
    /// Before the first trip of the fleet
    FleetStart,
    /// After the last trip of the fleet
    FleetEnd,
}

impl Display for CandidateKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CandidateKind::Interior => write!(f, "interior"),
            CandidateKind::FleetStart => write!(f, "fleet start"),
            CandidateKind::FleetEnd => write!(f, "fleet end"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CandidateInsertion {
    id: CandidateId,
    truck: TruckIdx,
    position: InsertionPosition,
    kind: CandidateKind,
    stop: Stop,
}

impl CandidateInsertion {
    pub fn new(
        id: CandidateId,
        truck: TruckIdx,
        position: InsertionPosition,
        kind: CandidateKind,
        stop: Stop,
    ) -> Self {
        CandidateInsertion {
            id,
            truck,
            position,
            kind,
            stop,
        }
    }

    pub fn id(&self) -> CandidateId {
        self.id
    }

    pub fn truck(&self) -> TruckIdx {
        self.truck
    }

    pub fn position(&self) -> InsertionPosition {
        self.position
    }

    pub fn kind(&self) -> CandidateKind {
        self.kind
    }

    pub fn stop(&self) -> &Stop {
        &self.stop
    }

    pub fn is_boundary(&self) -> bool {
        self.kind != CandidateKind::Interior
    }
}

impl Display for CandidateInsertion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "candidate {} (truck {}, {})",
            self.id, self.truck, self.position
        )
    }
}
