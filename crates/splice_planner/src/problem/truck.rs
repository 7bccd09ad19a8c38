use std::ops::Range;

use serde::Serialize;

crate::define_index_newtype!(TruckIdx, Truck);

/// A truck's itinerary: a contiguous run of fleet trips.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Truck {
    id: TruckIdx,
    trips: Range<usize>,
}

impl Truck {
    pub(crate) fn new(id: TruckIdx, trips: Range<usize>) -> Self {
        Truck { id, trips }
    }

    pub fn id(&self) -> TruckIdx {
        self.id
    }

    /// Indices of the truck's trips in the fleet.
    pub fn trip_indices(&self) -> Range<usize> {
        self.trips.clone()
    }

    /// Number of legs in the itinerary.
    pub fn len(&self) -> usize {
        self.trips.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trips.is_empty()
    }
}
