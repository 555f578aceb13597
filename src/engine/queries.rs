use crate::model::*;

use super::Engine;

impl Engine {
    /// Case-insensitive plate lookup.
    pub fn vehicle(&self, plate: &str) -> Option<SharedVehicle> {
        self.fleet.search_by_plate(plate)
    }

    /// True when the vehicle has no booking overlapping `[begin, end]`.
    /// Unknown plates are reported available; `book` rejects them separately.
    pub fn is_available(&self, plate: &str, begin: &CalendarDate, end: &CalendarDate) -> bool {
        let Some(v) = self.vehicle(plate) else {
            return true;
        };
        let canonical = v.borrow().plate().to_string();
        self.ledger.is_available(&canonical, begin, end)
    }

    pub fn earliest_booking(&self, plate: &str) -> Option<&Booking> {
        let v = self.vehicle(plate)?;
        let canonical = v.borrow().plate().to_string();
        self.ledger.earliest_booking(&canonical)
    }

    /// Fleet ordered by make, then date obtained.
    pub fn fleet_by_make(&mut self) -> &[SharedVehicle] {
        self.fleet.sort_by_make()
    }

    /// Bookings ordered by plate, then begin date.
    pub fn bookings_by_vehicle(&mut self) -> &[Booking] {
        self.ledger.sort_by_vehicle()
    }

    /// Bookings ordered by department, then employee, split into one run per
    /// department.
    pub fn bookings_by_dept(&mut self) -> Vec<(Department, &[Booking])> {
        self.ledger
            .sort_by_dept()
            .chunk_by(|a, b| a.employee().department() == b.employee().department())
            .map(|run| (run[0].employee().department(), run))
            .collect()
    }

    /// Completed trips ordered by end date.
    pub fn trips_by_end_date(&self) -> Vec<&Trip> {
        self.trips.by_end_date()
    }
}
