use crate::model::{CalendarDate, Employee};

/// Which date of a request failed the calendar check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateRole {
    Obtained,
    Begin,
    End,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PolicyViolation {
    BeginInPast(CalendarDate),
    EndBeforeBegin { begin: CalendarDate, end: CalendarDate },
    TooFarInAdvance { begin: CalendarDate, months: u32 },
    TooLong { begin: CalendarDate, end: CalendarDate, max_days: i64 },
    ObtainedNotInPast(CalendarDate),
    InvalidMileage(u32),
    MileageNotIncreasing { current: u32, entered: u32 },
}

impl std::fmt::Display for PolicyViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PolicyViolation::BeginInPast(begin) => {
                write!(f, "{begin} - beginning date is not today or a future date.")
            }
            PolicyViolation::EndBeforeBegin { begin, end } => write!(
                f,
                "{end} - ending date must be equal or after the beginning date {begin}"
            ),
            PolicyViolation::TooFarInAdvance { begin, months } => {
                write!(f, "{begin} - beginning date is beyond {months} months.")
            }
            PolicyViolation::TooLong { begin, end, max_days } => {
                write!(f, "{begin} ~ {end} - duration more than {max_days} days.")
            }
            PolicyViolation::ObtainedNotInPast(date) => {
                write!(f, "{date} - is today or a future date.")
            }
            PolicyViolation::InvalidMileage(mileage) => write!(f, "{mileage} - invalid mileage."),
            PolicyViolation::MileageNotIncreasing { current, entered } => write!(
                f,
                "invalid mileage - current mileage: {current} entered mileage: {entered}"
            ),
        }
    }
}

/// Coarse failure class, used for metric labels and by callers that only
/// need to tell failures apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    MalformedInput,
    InvalidDate,
    PolicyViolation,
    NotFound,
    Conflict,
}

impl ErrorKind {
    pub fn label(self) -> &'static str {
        match self {
            ErrorKind::MalformedInput => "malformed_input",
            ErrorKind::InvalidDate => "invalid_date",
            ErrorKind::PolicyViolation => "policy_violation",
            ErrorKind::NotFound => "not_found",
            ErrorKind::Conflict => "conflict",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    InvalidDate { date: CalendarDate, role: DateRole },
    Policy(PolicyViolation),
    VehicleNotFound(String),
    BookingNotFound {
        plate: String,
        begin: CalendarDate,
        end: CalendarDate,
    },
    NoActiveBooking(String),
    ReturnDateMismatch { plate: String, end: CalendarDate },
    VehicleUnavailable {
        plate: String,
        begin: CalendarDate,
        end: CalendarDate,
    },
    EmployeeConflict { employee: Employee, begin: CalendarDate },
    HasBookings(String),
    AlreadyExists(String),
}

impl EngineError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            EngineError::InvalidDate { .. } => ErrorKind::InvalidDate,
            EngineError::Policy(_) => ErrorKind::PolicyViolation,
            EngineError::VehicleNotFound(_)
            | EngineError::BookingNotFound { .. }
            | EngineError::NoActiveBooking(_)
            | EngineError::ReturnDateMismatch { .. } => ErrorKind::NotFound,
            EngineError::VehicleUnavailable { .. }
            | EngineError::EmployeeConflict { .. }
            | EngineError::HasBookings(_)
            | EngineError::AlreadyExists(_) => ErrorKind::Conflict,
        }
    }
}

impl From<PolicyViolation> for EngineError {
    fn from(v: PolicyViolation) -> Self {
        EngineError::Policy(v)
    }
}

impl std::fmt::Display for EngineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EngineError::InvalidDate { date, role } => match role {
                DateRole::Obtained => write!(f, "{date} - invalid calendar date."),
                DateRole::Begin => {
                    write!(f, "{date} - beginning date is not a valid calendar date.")
                }
                DateRole::End => write!(f, "{date} - ending date is not a valid calendar date."),
            },
            EngineError::Policy(v) => write!(f, "{v}"),
            EngineError::VehicleNotFound(plate) => write!(f, "{plate} is not in the fleet."),
            EngineError::BookingNotFound { plate, begin, end } => {
                write!(f, "{plate}:{begin} ~ {end} - cannot find the booking.")
            }
            EngineError::NoActiveBooking(plate) => {
                write!(f, "{plate} - return failed: no active booking for this vehicle.")
            }
            EngineError::ReturnDateMismatch { plate, end } => {
                write!(f, "{plate} booked with ending date {end} - cannot find the booking.")
            }
            EngineError::VehicleUnavailable { plate, begin, end } => {
                write!(f, "{plate} - booking with {begin} ~ {end} not available.")
            }
            EngineError::EmployeeConflict { employee, begin } => write!(
                f,
                "{employee} - has an existing booking conflicting with beginning date {begin}"
            ),
            EngineError::HasBookings(plate) => {
                write!(f, "{plate} - has existing bookings; cannot be removed.")
            }
            EngineError::AlreadyExists(plate) => write!(f, "{plate} is already in the fleet."),
        }
    }
}

impl std::error::Error for EngineError {}
