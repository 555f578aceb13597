/// A booking may not begin more than this many months after today.
pub const MAX_ADVANCE_MONTHS: u32 = 3;

/// Longest allowed booking, counted as `end - begin` in whole days.
pub const MAX_BOOKING_DAYS: i64 = 7;

/// Longest accepted command line, in bytes.
pub const MAX_LINE_LEN: usize = 1024;

/// Longest accepted license plate.
pub const MAX_PLATE_LEN: usize = 16;
