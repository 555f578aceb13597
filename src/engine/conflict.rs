use crate::limits::*;
use crate::model::*;

use super::error::{DateRole, EngineError, PolicyViolation};

/// The local calendar date.
pub fn today() -> CalendarDate {
    CalendarDate::from_naive(chrono::Local::now().date_naive())
}

/// Booking window limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Policy {
    pub max_advance_months: u32,
    pub max_booking_days: i64,
}

impl Policy {
    /// A negative span limit would reject every booking.
    pub fn check(&self) -> Result<(), String> {
        if self.max_booking_days < 0 {
            return Err(format!(
                "max_booking_days must not be negative, got {}",
                self.max_booking_days
            ));
        }
        Ok(())
    }
}

impl Default for Policy {
    fn default() -> Self {
        Self {
            max_advance_months: MAX_ADVANCE_MONTHS,
            max_booking_days: MAX_BOOKING_DAYS,
        }
    }
}

/// First booking in `bookings` whose closed interval overlaps `[begin, end]`.
/// Both the vehicle and the employee checks go through here.
pub(crate) fn first_overlap<'a>(
    bookings: impl IntoIterator<Item = &'a Booking>,
    begin: &CalendarDate,
    end: &CalendarDate,
) -> Option<&'a Booking> {
    bookings.into_iter().find(|b| b.overlaps(begin, end))
}

pub(crate) fn validate_date(date: CalendarDate, role: DateRole) -> Result<(), EngineError> {
    if !date.is_valid() {
        return Err(EngineError::InvalidDate { date, role });
    }
    Ok(())
}

/// Date checks of the booking gate that need no ledger state: both dates
/// valid, begin not in the past, end not before begin.
pub(crate) fn validate_interval(
    begin: CalendarDate,
    end: CalendarDate,
    today: CalendarDate,
) -> Result<(), EngineError> {
    validate_date(begin, DateRole::Begin)?;
    validate_date(end, DateRole::End)?;
    if begin < today {
        return Err(PolicyViolation::BeginInPast(begin).into());
    }
    if end < begin {
        return Err(PolicyViolation::EndBeforeBegin { begin, end }.into());
    }
    Ok(())
}

/// Lead-time and duration limits, checked after the conflict checks.
pub(crate) fn check_window(
    policy: &Policy,
    begin: CalendarDate,
    end: CalendarDate,
    today: CalendarDate,
) -> Result<(), EngineError> {
    let too_far = PolicyViolation::TooFarInAdvance {
        begin,
        months: policy.max_advance_months,
    };
    let limit = today
        .checked_add_months(policy.max_advance_months)
        .ok_or(too_far.clone())?;
    if begin > limit {
        return Err(too_far.into());
    }

    let too_long = PolicyViolation::TooLong {
        begin,
        end,
        max_days: policy.max_booking_days,
    };
    match begin.days_until(&end) {
        Some(days) if days <= policy.max_booking_days => Ok(()),
        _ => Err(too_long.into()),
    }
}

/// Intake checks for a new vehicle: valid acquisition date strictly in the
/// past and a positive odometer.
pub(crate) fn validate_intake(
    obtained: CalendarDate,
    mileage: u32,
    today: CalendarDate,
) -> Result<(), EngineError> {
    validate_date(obtained, DateRole::Obtained)?;
    if obtained >= today {
        return Err(PolicyViolation::ObtainedNotInPast(obtained).into());
    }
    if mileage == 0 {
        return Err(PolicyViolation::InvalidMileage(mileage).into());
    }
    Ok(())
}

/// Odometer check on return: positive and strictly increasing.
pub(crate) fn validate_return_mileage(current: u32, entered: u32) -> Result<(), EngineError> {
    if entered == 0 {
        return Err(PolicyViolation::InvalidMileage(entered).into());
    }
    if entered <= current {
        return Err(PolicyViolation::MileageNotIncreasing { current, entered }.into());
    }
    Ok(())
}
