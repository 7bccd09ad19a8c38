use serde::Serialize;

use super::stop::Stop;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Trip {
    origin: Stop,
    destination: Stop,
}

impl Trip {
    pub fn new(origin: Stop, destination: Stop) -> Self {
        Trip {
            origin,
            destination,
        }
    }

    pub fn origin(&self) -> &Stop {
        &self.origin
    }

    pub fn destination(&self) -> &Stop {
        &self.destination
    }

    /// Whether `next` starts where this trip ends, on the same edge or on its
    /// opposite direction.
    pub fn continues_into(&self, next: &Trip) -> bool {
        next.origin == self.destination || next.origin == self.destination.reversed()
    }
}
