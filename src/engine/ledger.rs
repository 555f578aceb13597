use crate::model::*;

use super::conflict::first_overlap;

/// Active bookings in insertion order.
///
/// Nothing here rejects a conflicting insert; the booking gate in
/// `Engine::book` runs the availability checks first.
#[derive(Debug, Default)]
pub struct ReservationLedger {
    bookings: Vec<Booking>,
}

impl ReservationLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.bookings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bookings.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Booking> {
        self.bookings.iter()
    }

    fn find(&self, booking: &Booking) -> Option<usize> {
        self.bookings.iter().position(|b| b == booking)
    }

    pub fn add(&mut self, booking: Booking) {
        self.bookings.push(booking);
    }

    /// Remove the first booking equal to `booking`, keeping the order of the
    /// rest.
    pub fn remove(&mut self, booking: &Booking) -> Option<Booking> {
        let idx = self.find(booking)?;
        Some(self.bookings.remove(idx))
    }

    pub fn contains(&self, booking: &Booking) -> bool {
        self.find(booking).is_some()
    }

    pub fn is_booked(&self, plate: &str) -> bool {
        self.bookings.iter().any(|b| b.is_for(plate))
    }

    /// True when no booking on `plate` overlaps `[begin, end]`.
    pub fn is_available(&self, plate: &str, begin: &CalendarDate, end: &CalendarDate) -> bool {
        first_overlap(self.bookings.iter().filter(|b| b.is_for(plate)), begin, end).is_none()
    }

    /// True when `employee` already holds a booking overlapping `[begin, end]`,
    /// on any vehicle.
    pub fn has_time_conflict(&self, employee: Employee, begin: &CalendarDate, end: &CalendarDate) -> bool {
        first_overlap(
            self.bookings.iter().filter(|b| b.employee() == employee),
            begin,
            end,
        )
        .is_some()
    }

    /// The booking on `plate` with the smallest end date. Ties go to the one
    /// met first in ledger order.
    pub fn earliest_booking(&self, plate: &str) -> Option<&Booking> {
        let mut earliest: Option<&Booking> = None;
        for b in self.bookings.iter().filter(|b| b.is_for(plate)) {
            if earliest.is_none_or(|e| b.end() < e.end()) {
                earliest = Some(b);
            }
        }
        earliest
    }

    /// Sort in place by plate, then begin date (stable).
    pub fn sort_by_vehicle(&mut self) -> &[Booking] {
        self.bookings.sort_by(|a, b| {
            let (va, vb) = (a.vehicle().borrow(), b.vehicle().borrow());
            va.plate()
                .cmp(vb.plate())
                .then_with(|| a.begin().cmp(&b.begin()))
        });
        &self.bookings
    }

    /// Sort in place by department (declaration order), then employee name
    /// (stable).
    pub fn sort_by_dept(&mut self) -> &[Booking] {
        self.bookings.sort_by(|a, b| {
            a.employee()
                .department()
                .cmp(&b.employee().department())
                .then_with(|| a.employee().name().cmp(b.employee().name()))
        });
        &self.bookings
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(m: u32, d: u32, y: i32) -> CalendarDate {
        CalendarDate::new(m, d, y)
    }

    fn vehicle(plate: &str) -> SharedVehicle {
        Vehicle::new(plate, date(1, 18, 2025), Make::Ford, 50_000).into_shared()
    }

    fn booking(v: &SharedVehicle, begin: CalendarDate, end: CalendarDate, employee: Employee) -> Booking {
        Booking::new(begin, end, employee, v.clone())
    }

    #[test]
    fn available_on_empty_ledger() {
        let ledger = ReservationLedger::new();
        assert!(ledger.is_available("123ABC", &date(1, 1, 2026), &date(1, 3, 2026)));
        assert!(!ledger.is_booked("123ABC"));
    }

    #[test]
    fn overlap_boundaries() {
        let v = vehicle("123ABC");
        let mut ledger = ReservationLedger::new();
        ledger.add(booking(&v, date(1, 10, 2026), date(1, 12, 2026), Employee::Kaur));

        // adjacent on either side
        assert!(ledger.is_available("123ABC", &date(1, 5, 2026), &date(1, 9, 2026)));
        assert!(ledger.is_available("123ABC", &date(1, 13, 2026), &date(1, 15, 2026)));
        // touching counts
        assert!(!ledger.is_available("123ABC", &date(1, 5, 2026), &date(1, 10, 2026)));
        assert!(!ledger.is_available("123ABC", &date(1, 12, 2026), &date(1, 15, 2026)));
        // other plates are unaffected
        assert!(ledger.is_available("456XYZ", &date(1, 10, 2026), &date(1, 12, 2026)));
    }

    #[test]
    fn added_interval_is_unavailable() {
        let v = vehicle("123ABC");
        let mut ledger = ReservationLedger::new();
        let (b, e) = (date(2, 1, 2026), date(2, 4, 2026));
        assert!(ledger.is_available("123ABC", &b, &e));
        ledger.add(booking(&v, b, e, Employee::Lim));
        assert!(!ledger.is_available("123ABC", &b, &e));
        assert!(ledger.is_booked("123ABC"));
    }

    #[test]
    fn employee_conflict_spans_vehicles() {
        let a = vehicle("AAA111");
        let b = vehicle("BBB222");
        let mut ledger = ReservationLedger::new();
        ledger.add(booking(&a, date(3, 1, 2026), date(3, 3, 2026), Employee::Patel));

        assert!(ledger.has_time_conflict(Employee::Patel, &date(3, 3, 2026), &date(3, 5, 2026)));
        assert!(!ledger.has_time_conflict(Employee::Patel, &date(3, 4, 2026), &date(3, 5, 2026)));
        assert!(!ledger.has_time_conflict(Employee::Lim, &date(3, 1, 2026), &date(3, 3, 2026)));
        // the other vehicle is free for someone else
        assert!(ledger.is_available("BBB222", &date(3, 1, 2026), &date(3, 3, 2026)));
        ledger.add(booking(&b, date(3, 1, 2026), date(3, 3, 2026), Employee::Lim));
        assert!(ledger.has_time_conflict(Employee::Lim, &date(3, 2, 2026), &date(3, 2, 2026)));
    }

    #[test]
    fn remove_preserves_order() {
        let v = vehicle("123ABC");
        let mut ledger = ReservationLedger::new();
        let first = booking(&v, date(1, 1, 2026), date(1, 2, 2026), Employee::Kaur);
        let second = booking(&v, date(1, 5, 2026), date(1, 6, 2026), Employee::Kaur);
        let third = booking(&v, date(1, 9, 2026), date(1, 10, 2026), Employee::Kaur);
        ledger.add(first.clone());
        ledger.add(second.clone());
        ledger.add(third.clone());

        // employee is not part of the match
        let probe = booking(&v, date(1, 5, 2026), date(1, 6, 2026), Employee::Taylor);
        assert!(ledger.contains(&probe));
        let removed = ledger.remove(&probe).unwrap();
        assert_eq!(removed.employee(), Employee::Kaur);

        let left: Vec<_> = ledger.iter().cloned().collect();
        assert_eq!(left, vec![first, third]);
        assert!(ledger.remove(&probe).is_none());
        assert_eq!(ledger.len(), 2);
    }

    #[test]
    fn earliest_booking_by_end_date() {
        let v = vehicle("123ABC");
        let other = vehicle("456XYZ");
        let mut ledger = ReservationLedger::new();
        ledger.add(booking(&v, date(1, 10, 2026), date(1, 14, 2026), Employee::Kaur));
        ledger.add(booking(&other, date(1, 1, 2026), date(1, 2, 2026), Employee::Lim));
        ledger.add(booking(&v, date(1, 1, 2026), date(1, 3, 2026), Employee::Patel));
        ledger.add(booking(&v, date(1, 20, 2026), date(1, 21, 2026), Employee::Harper));

        let earliest = ledger.earliest_booking("123ABC").unwrap();
        assert_eq!(earliest.end(), date(1, 3, 2026));
        assert_eq!(earliest.employee(), Employee::Patel);
        assert!(ledger.earliest_booking("999ZZZ").is_none());
    }

    #[test]
    fn earliest_booking_tie_goes_to_first() {
        let v = vehicle("123ABC");
        let mut ledger = ReservationLedger::new();
        ledger.add(booking(&v, date(1, 2, 2026), date(1, 3, 2026), Employee::Kaur));
        ledger.add(booking(&v, date(1, 1, 2026), date(1, 3, 2026), Employee::Lim));
        assert_eq!(ledger.earliest_booking("123ABC").unwrap().employee(), Employee::Kaur);
    }

    #[test]
    fn sort_by_vehicle_orders_plate_then_begin() {
        let a = vehicle("123ABC");
        let b = vehicle("456XYZ");
        let mut ledger = ReservationLedger::new();
        ledger.add(booking(&b, date(1, 1, 2026), date(1, 2, 2026), Employee::Kaur));
        ledger.add(booking(&a, date(2, 1, 2026), date(2, 2, 2026), Employee::Lim));
        ledger.add(booking(&a, date(1, 5, 2026), date(1, 6, 2026), Employee::Patel));

        let order: Vec<_> = ledger
            .sort_by_vehicle()
            .iter()
            .map(|b| (b.plate(), b.begin()))
            .collect();
        assert_eq!(
            order,
            vec![
                ("123ABC".to_string(), date(1, 5, 2026)),
                ("123ABC".to_string(), date(2, 1, 2026)),
                ("456XYZ".to_string(), date(1, 1, 2026)),
            ]
        );
    }

    #[test]
    fn sort_by_dept_orders_department_then_name() {
        let v = vehicle("123ABC");
        let mut ledger = ReservationLedger::new();
        for (i, emp) in [
            Employee::Taylor,
            Employee::Zimnes,
            Employee::Kaur,
            Employee::Patel,
            Employee::Ceravolo,
            Employee::Ramesh,
        ]
        .into_iter()
        .enumerate()
        {
            let day = 1 + (i as u32) * 2;
            ledger.add(booking(&v, date(1, day, 2026), date(1, day, 2026), emp));
        }

        let order: Vec<_> = ledger.sort_by_dept().iter().map(|b| b.employee()).collect();
        assert_eq!(
            order,
            vec![
                Employee::Ceravolo, // BAIT
                Employee::Patel,    // CS
                Employee::Zimnes,
                Employee::Kaur, // ITI
                Employee::Ramesh, // MATH
                Employee::Taylor,
            ]
        );
    }
}
