use crate::model::Trip;

/// Completed trips, append-only.
#[derive(Debug, Default)]
pub struct TripLog {
    trips: Vec<Trip>,
}

impl TripLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.trips.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trips.is_empty()
    }

    pub fn add(&mut self, trip: Trip) {
        self.trips.push(trip);
    }

    /// Trips in completion order.
    pub fn iter(&self) -> impl Iterator<Item = &Trip> {
        self.trips.iter()
    }

    /// Trips ordered by their booking's end date; trips ending the same day
    /// stay in completion order. The log itself is not reordered.
    pub fn by_end_date(&self) -> Vec<&Trip> {
        let mut sorted: Vec<&Trip> = self.trips.iter().collect();
        sorted.sort_by_key(|t| t.booking().end());
        sorted
    }
}
