use tracing::debug;

use crate::model::*;
use crate::observability::TRIPS_COMPLETED_TOTAL;

use super::conflict::{check_window, validate_date, validate_intake, validate_interval, validate_return_mileage};
use super::{DateRole, Engine, EngineError};

impl Engine {
    /// Resolve a plate (case-insensitive) to the fleet record and its
    /// canonical plate.
    fn lookup(&self, plate: &str) -> Result<(SharedVehicle, String), EngineError> {
        let vehicle = self
            .fleet
            .search_by_plate(plate)
            .ok_or_else(|| EngineError::VehicleNotFound(plate.to_string()))?;
        let canonical = vehicle.borrow().plate().to_string();
        Ok((vehicle, canonical))
    }

    pub fn add_vehicle(
        &mut self,
        plate: &str,
        obtained: CalendarDate,
        make: Make,
        mileage: u32,
        today: CalendarDate,
    ) -> Result<SharedVehicle, EngineError> {
        validate_intake(obtained, mileage, today)?;
        if self.fleet.search_by_plate(plate).is_some() {
            return Err(EngineError::AlreadyExists(plate.to_string()));
        }

        let vehicle = Vehicle::new(plate, obtained, make, mileage).into_shared();
        self.fleet.add(vehicle.clone());
        self.record_sizes();
        debug!(plate, %obtained, %make, mileage, "vehicle added");
        Ok(vehicle)
    }

    /// Remove a vehicle that has no active booking.
    pub fn remove_vehicle(&mut self, plate: &str) -> Result<SharedVehicle, EngineError> {
        let (vehicle, plate) = self.lookup(plate)?;
        if self.ledger.is_booked(&plate) {
            return Err(EngineError::HasBookings(plate));
        }

        self.fleet.remove(&vehicle.borrow());
        self.record_sizes();
        debug!(%plate, "vehicle removed");
        Ok(vehicle)
    }

    /// Run the booking gate and, if every check passes, record the booking.
    ///
    /// Check order: calendar validity, begin not in the past, end not before
    /// begin, vehicle exists, vehicle free, employee free, lead time, duration.
    pub fn book(
        &mut self,
        begin: CalendarDate,
        end: CalendarDate,
        plate: &str,
        employee: Employee,
        today: CalendarDate,
    ) -> Result<Booking, EngineError> {
        validate_interval(begin, end, today)?;
        let (vehicle, plate) = self.lookup(plate)?;
        if !self.ledger.is_available(&plate, &begin, &end) {
            return Err(EngineError::VehicleUnavailable { plate, begin, end });
        }
        if self.ledger.has_time_conflict(employee, &begin, &end) {
            return Err(EngineError::EmployeeConflict { employee, begin });
        }
        check_window(&self.policy, begin, end, today)?;

        let booking = Booking::new(begin, end, employee, vehicle);
        self.ledger.add(booking.clone());
        self.record_sizes();
        debug!(%plate, %begin, %end, %employee, "booking accepted");
        Ok(booking)
    }

    /// Cancel the booking on `plate` covering exactly `[begin, end]`.
    pub fn cancel(&mut self, begin: CalendarDate, end: CalendarDate, plate: &str) -> Result<Booking, EngineError> {
        validate_date(begin, DateRole::Begin)?;
        validate_date(end, DateRole::End)?;
        let (_, plate) = self.lookup(plate)?;

        let target = self
            .ledger
            .iter()
            .find(|b| b.is_for(&plate) && b.begin() == begin && b.end() == end)
            .cloned()
            .ok_or_else(|| EngineError::BookingNotFound {
                plate: plate.clone(),
                begin,
                end,
            })?;
        let removed = self.ledger.remove(&target).unwrap_or(target);
        self.record_sizes();
        debug!(%plate, %begin, %end, "booking cancelled");
        Ok(removed)
    }

    /// Close out the earliest open booking on `plate` and log the trip.
    ///
    /// The returned end date must match that booking's end date, and the
    /// odometer must have moved forward.
    pub fn return_vehicle(&mut self, end: CalendarDate, plate: &str, mileage: u32) -> Result<Trip, EngineError> {
        validate_date(end, DateRole::End)?;
        let (vehicle, plate) = self.lookup(plate)?;
        let booking = self
            .ledger
            .earliest_booking(&plate)
            .cloned()
            .ok_or_else(|| EngineError::NoActiveBooking(plate.clone()))?;
        if booking.end() != end {
            return Err(EngineError::ReturnDateMismatch { plate, end });
        }
        let current = vehicle.borrow().mileage();
        validate_return_mileage(current, mileage)?;

        let trip = Trip::new(booking.clone(), current, mileage);
        self.trips.add(trip.clone());
        vehicle.borrow_mut().set_mileage(mileage);
        self.ledger.remove(&booking);
        self.record_sizes();
        metrics::counter!(TRIPS_COMPLETED_TOTAL).increment(1);
        debug!(%plate, %end, from = current, to = mileage, "vehicle returned");
        Ok(trip)
    }
}
