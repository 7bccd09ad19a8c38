use crate::error::PlannerError;

use super::{
    trip::Trip,
    truck::{Truck, TruckIdx},
};

/// The scheduled trips of every truck, in itinerary order.
pub struct Fleet {
    trips: Vec<Trip>,
}

impl Fleet {
    pub fn new(trips: Vec<Trip>) -> Self {
        Fleet { trips }
    }

    pub fn trips(&self) -> &[Trip] {
        &self.trips
    }

    pub fn len(&self) -> usize {
        self.trips.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trips.is_empty()
    }

    /// Splits the fleet into trucks. A trip that does not continue the previous
    /// one starts a new truck.
    pub fn partition(&self) -> Result<Vec<Truck>, PlannerError> {
        if self.trips.is_empty() {
            return Err(PlannerError::MalformedInput(String::from(
                "fleet has no trips",
            )));
        }

        for (index, trip) in self.trips.iter().enumerate() {
            if trip.origin().edge().is_empty() || trip.destination().edge().is_empty() {
                return Err(PlannerError::MalformedInput(format!(
                    "trip {index} has an empty stop"
                )));
            }
        }

        let mut trucks = Vec::new();
        let mut start = 0;

        for index in 1..self.trips.len() {
            if !self.trips[index - 1].continues_into(&self.trips[index]) {
                trucks.push(Truck::new(TruckIdx::new(trucks.len()), start..index));
                start = index;
            }
        }

        trucks.push(Truck::new(TruckIdx::new(trucks.len()), start..self.trips.len()));

        Ok(trucks)
    }
}
