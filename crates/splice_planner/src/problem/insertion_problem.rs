use crate::error::PlannerError;

use super::{
    candidate::{CandidateId, CandidateInsertion, CandidateKind, InsertionPosition},
    fleet::Fleet,
    stop::Stop,
    trip::Trip,
    truck::{Truck, TruckIdx},
};

/// A fleet, its validated truck grouping and the stop to insert.
///
/// Read-only once built, shared by every candidate evaluation.
pub struct InsertionProblem {
    fleet: Fleet,
    trucks: Vec<Truck>,
    new_stop: Stop,
}

impl InsertionProblem {
    pub fn new(fleet: Fleet, new_stop: Stop) -> Result<Self, PlannerError> {
        if new_stop.edge().is_empty() {
            return Err(PlannerError::MalformedInput(String::from(
                "new stop is empty",
            )));
        }

        let trucks = fleet.partition()?;

        Ok(InsertionProblem {
            fleet,
            trucks,
            new_stop,
        })
    }

    pub fn fleet(&self) -> &Fleet {
        &self.fleet
    }

    pub fn trucks(&self) -> &[Truck] {
        &self.trucks
    }

    pub fn truck(&self, truck: TruckIdx) -> &Truck {
        &self.trucks[truck]
    }

    pub fn truck_trips(&self, truck: TruckIdx) -> &[Trip] {
        &self.fleet.trips()[self.trucks[truck].trip_indices()]
    }

    pub fn new_stop(&self) -> &Stop {
        &self.new_stop
    }

    /// Enumerates insertion candidates in evaluation order.
    ///
    /// Every truck contributes a splice per leg followed by an append; the last
    /// truck's append is the fleet-end boundary. The fleet-start boundary, a
    /// prepend on the first truck, comes last.
    pub fn candidates(&self, include_fleet_start: bool) -> Vec<CandidateInsertion> {
        let mut candidates = Vec::new();
        let last_truck = self.trucks.len() - 1;

        for truck in &self.trucks {
            for leg in 0..truck.len() {
                candidates.push(CandidateInsertion::new(
                    CandidateId::new(candidates.len()),
                    truck.id(),
                    InsertionPosition::Splice { leg },
                    CandidateKind::Interior,
                    self.new_stop.clone(),
                ));
            }

            let kind = if truck.id().get() == last_truck {
                CandidateKind::FleetEnd
            } else {
                CandidateKind::Interior
            };

            candidates.push(CandidateInsertion::new(
                CandidateId::new(candidates.len()),
                truck.id(),
                InsertionPosition::Append,
                kind,
                self.new_stop.clone(),
            ));
        }

        if include_fleet_start {
            candidates.push(CandidateInsertion::new(
                CandidateId::new(candidates.len()),
                TruckIdx::new(0),
                InsertionPosition::Prepend,
                CandidateKind::FleetStart,
                self.new_stop.clone(),
            ));
        }

        candidates
    }
}
