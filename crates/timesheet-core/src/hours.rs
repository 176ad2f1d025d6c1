//! Worked-hours calculation from clock-in / clock-out times.

use chrono::NaiveTime;
use rust_decimal::{Decimal, RoundingStrategy};

const SECONDS_PER_DAY: i64 = 24 * 60 * 60;
const SECONDS_PER_HOUR: i64 = 60 * 60;

/// Parse a time-of-day as entered in a time input ("09:30" or "09:30:15").
pub fn parse_time_of_day(value: &str) -> Option<NaiveTime> {
    let value = value.trim();
    NaiveTime::parse_from_str(value, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M:%S"))
        .ok()
}

/// Elapsed hours between two times of day, rounded to two decimal places.
///
/// Both times are taken to fall on the same day; when `clock_out` is earlier
/// than `clock_in` the shift is assumed to end on the following day. Empty or
/// unparsable input yields zero.
pub fn compute_hours(clock_in: &str, clock_out: &str) -> Decimal {
    if clock_in.trim().is_empty() || clock_out.trim().is_empty() {
        return Decimal::ZERO;
    }

    let (Some(start), Some(end)) = (parse_time_of_day(clock_in), parse_time_of_day(clock_out))
    else {
        tracing::debug!(clock_in, clock_out, "Unparsable clock time, hours left at zero");
        return Decimal::ZERO;
    };

    let mut elapsed = (end - start).num_seconds();
    if elapsed < 0 {
        elapsed += SECONDS_PER_DAY;
    }

    (Decimal::from(elapsed) / Decimal::from(SECONDS_PER_HOUR))
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}
