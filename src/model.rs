use std::cell::RefCell;
use std::cmp::Ordering;
use std::fmt;
use std::rc::Rc;
use std::str::FromStr;

use chrono::{Datelike, Months, NaiveDate};
use strum::{Display, EnumIter, EnumString, IntoStaticStr};

// ── Calendar dates ────────────────────────────────────────────────

const DAYS_IN_MONTH: [u32; 12] = [31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];

pub fn is_leap_year(year: i32) -> bool {
    year % 400 == 0 || (year % 4 == 0 && year % 100 != 0)
}

/// Number of days in `month` of `year`, or 0 for an out-of-range month.
pub fn days_in_month(month: u32, year: i32) -> u32 {
    match month {
        2 if is_leap_year(year) => 29,
        1..=12 => DAYS_IN_MONTH[(month - 1) as usize],
        _ => 0,
    }
}

/// A `(month, day, year)` triple, rendered as `M/D/YYYY`.
///
/// Invalid triples are representable and flagged by [`CalendarDate::is_valid`].
/// Ordering is lexicographic on `(year, month, day)` and stays well defined
/// for invalid triples.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CalendarDate {
    // Field order drives the derived ordering.
    year: i32,
    month: u32,
    day: u32,
}

impl CalendarDate {
    pub const fn new(month: u32, day: u32, year: i32) -> Self {
        Self { year, month, day }
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn day(&self) -> u32 {
        self.day
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn is_valid(&self) -> bool {
        self.day >= 1 && self.day <= days_in_month(self.month, self.year)
    }

    pub fn to_naive(&self) -> Option<NaiveDate> {
        if !self.is_valid() {
            return None;
        }
        NaiveDate::from_ymd_opt(self.year, self.month, self.day)
    }

    pub fn from_naive(date: NaiveDate) -> Self {
        Self::new(date.month(), date.day(), date.year())
    }

    /// Whole days from `self` to `later`. `None` if either date is invalid.
    pub fn days_until(&self, later: &CalendarDate) -> Option<i64> {
        Some((later.to_naive()? - self.to_naive()?).num_days())
    }

    /// Same day `months` later, clamped to the end of a shorter month.
    pub fn checked_add_months(&self, months: u32) -> Option<CalendarDate> {
        self.to_naive()?
            .checked_add_months(Months::new(months))
            .map(Self::from_naive)
    }
}

impl fmt::Display for CalendarDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.month, self.day, self.year)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseDateError(pub String);

impl fmt::Display for ParseDateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - expected a M/D/YYYY date", self.0)
    }
}

impl std::error::Error for ParseDateError {}

/// Parses the numeric shape only; calendar validity is left to `is_valid`.
impl FromStr for CalendarDate {
    type Err = ParseDateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split('/');
        let (Some(month), Some(day), Some(year), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(ParseDateError(s.to_string()));
        };
        // Digits only: `str::parse` would also take a leading `+`.
        if [month, day, year]
            .iter()
            .any(|part| part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()))
        {
            return Err(ParseDateError(s.to_string()));
        }
        let bad = |_: std::num::ParseIntError| ParseDateError(s.to_string());
        Ok(Self::new(
            month.parse().map_err(bad)?,
            day.parse().map_err(bad)?,
            year.parse().map_err(bad)?,
        ))
    }
}

// ── Closed tag sets ───────────────────────────────────────────────

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display, EnumString, EnumIter, IntoStaticStr,
)]
#[strum(serialize_all = "UPPERCASE", ascii_case_insensitive)]
pub enum Make {
    Ford,
    Chevy,
    Toyota,
    Honda,
}

/// Departments, ordered by declaration for reporting.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display, EnumString, EnumIter, IntoStaticStr,
)]
#[strum(serialize_all = "UPPERCASE", ascii_case_insensitive)]
pub enum Department {
    Bait,
    Cs,
    Ee,
    Iti,
    Math,
}

/// Employees eligible to book a vehicle.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter, IntoStaticStr,
)]
#[strum(serialize_all = "UPPERCASE", ascii_case_insensitive)]
pub enum Employee {
    Patel,
    Lim,
    Zimnes,
    Harper,
    Kaur,
    Taylor,
    Ramesh,
    Ceravolo,
}

impl Employee {
    pub fn department(self) -> Department {
        match self {
            Employee::Patel | Employee::Zimnes => Department::Cs,
            Employee::Lim | Employee::Harper => Department::Ee,
            Employee::Kaur => Department::Iti,
            Employee::Taylor | Employee::Ramesh => Department::Math,
            Employee::Ceravolo => Department::Bait,
        }
    }

    pub fn name(self) -> &'static str {
        self.into()
    }
}

// ── Vehicles ──────────────────────────────────────────────────────

/// A fleet vehicle. Identity is the plate: two records with the same plate
/// are equal whatever their other fields say.
#[derive(Debug, Clone)]
pub struct Vehicle {
    plate: String,
    obtained: CalendarDate,
    make: Make,
    mileage: u32,
}

/// The fleet owns one record per vehicle; bookings and trips point at it.
pub type SharedVehicle = Rc<RefCell<Vehicle>>;

impl Vehicle {
    pub fn new(plate: impl Into<String>, obtained: CalendarDate, make: Make, mileage: u32) -> Self {
        Self {
            plate: plate.into(),
            obtained,
            make,
            mileage,
        }
    }

    pub fn into_shared(self) -> SharedVehicle {
        Rc::new(RefCell::new(self))
    }

    pub fn plate(&self) -> &str {
        &self.plate
    }

    pub fn obtained(&self) -> CalendarDate {
        self.obtained
    }

    pub fn make(&self) -> Make {
        self.make
    }

    pub fn mileage(&self) -> u32 {
        self.mileage
    }

    /// No bounds check: the return flow enforces increasing odometers.
    pub fn set_mileage(&mut self, mileage: u32) {
        self.mileage = mileage;
    }

    /// Report order: make, then date obtained.
    pub fn cmp_by_make(&self, other: &Vehicle) -> Ordering {
        self.make
            .cmp(&other.make)
            .then_with(|| self.obtained.cmp(&other.obtained))
    }
}

impl PartialEq for Vehicle {
    fn eq(&self, other: &Self) -> bool {
        self.plate == other.plate
    }
}

impl Eq for Vehicle {}

impl fmt::Display for Vehicle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}:{} [mileage:{}]",
            self.plate, self.make, self.obtained, self.mileage
        )
    }
}

// ── Bookings ──────────────────────────────────────────────────────

/// A reservation of one vehicle by one employee over the closed interval
/// `[begin, end]`.
///
/// Equality is vehicle + begin + end. The employee is left out: two employees
/// holding the same vehicle over the same interval would already be a conflict.
#[derive(Debug, Clone)]
pub struct Booking {
    begin: CalendarDate,
    end: CalendarDate,
    employee: Employee,
    vehicle: SharedVehicle,
}

impl Booking {
    pub fn new(begin: CalendarDate, end: CalendarDate, employee: Employee, vehicle: SharedVehicle) -> Self {
        Self {
            begin,
            end,
            employee,
            vehicle,
        }
    }

    pub fn begin(&self) -> CalendarDate {
        self.begin
    }

    pub fn end(&self) -> CalendarDate {
        self.end
    }

    pub fn employee(&self) -> Employee {
        self.employee
    }

    pub fn vehicle(&self) -> &SharedVehicle {
        &self.vehicle
    }

    pub fn plate(&self) -> String {
        self.vehicle.borrow().plate().to_string()
    }

    pub fn is_for(&self, plate: &str) -> bool {
        self.vehicle.borrow().plate() == plate
    }

    pub fn is_valid(&self) -> bool {
        self.begin.is_valid() && self.end.is_valid() && self.begin <= self.end
    }

    /// Closed-interval overlap: touching endpoints count.
    pub fn overlaps(&self, begin: &CalendarDate, end: &CalendarDate) -> bool {
        *begin <= self.end && *end >= self.begin
    }
}

impl PartialEq for Booking {
    fn eq(&self, other: &Self) -> bool {
        self.begin == other.begin
            && self.end == other.end
            && (Rc::ptr_eq(&self.vehicle, &other.vehicle)
                || *self.vehicle.borrow() == *other.vehicle.borrow())
    }
}

impl fmt::Display for Booking {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} [beginning {} ending {}:{}]",
            self.vehicle.borrow(),
            self.begin,
            self.end,
            self.employee
        )
    }
}

// ── Trips ─────────────────────────────────────────────────────────

/// A completed booking. Odometer readings are copied at return time.
#[derive(Debug, Clone)]
pub struct Trip {
    booking: Booking,
    begin_mileage: u32,
    end_mileage: u32,
}

impl Trip {
    pub fn new(booking: Booking, begin_mileage: u32, end_mileage: u32) -> Self {
        Self {
            booking,
            begin_mileage,
            end_mileage,
        }
    }

    pub fn booking(&self) -> &Booking {
        &self.booking
    }

    pub fn begin_mileage(&self) -> u32 {
        self.begin_mileage
    }

    pub fn end_mileage(&self) -> u32 {
        self.end_mileage
    }

    pub fn mileage_used(&self) -> u32 {
        self.end_mileage.saturating_sub(self.begin_mileage)
    }

    pub fn is_valid(&self) -> bool {
        self.booking.is_valid() && self.end_mileage >= self.begin_mileage
    }
}

impl PartialEq for Trip {
    fn eq(&self, other: &Self) -> bool {
        self.booking == other.booking
    }
}

impl fmt::Display for Trip {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} ~ {} original mileage: {} current mileage: {} mileage used: {}",
            self.booking.plate(),
            self.booking.begin,
            self.booking.end,
            self.begin_mileage,
            self.end_mileage,
            self.mileage_used()
        )
    }
}
