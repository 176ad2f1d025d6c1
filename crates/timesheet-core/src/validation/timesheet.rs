//! Required-field checks run before a timesheet is submitted.

use chrono::NaiveDate;

use crate::hours::parse_time_of_day;
use crate::models::{TimesheetEntry, TimesheetField};
use crate::validation::ValidationError;

/// Check that every required field is filled in and well-formed.
///
/// Fields are checked in form order, so the first problem reported is the
/// one nearest the top of the form.
pub fn validate_entry(entry: &TimesheetEntry) -> Result<(), ValidationError> {
    for field in TimesheetField::REQUIRED {
        if entry.get(field).trim().is_empty() {
            return Err(ValidationError::MissingField(field.label()));
        }
    }

    if NaiveDate::parse_from_str(entry.date.trim(), "%Y-%m-%d").is_err() {
        return Err(ValidationError::InvalidField {
            field: TimesheetField::Date.label(),
            value: entry.date.clone(),
        });
    }

    for (field, value) in [
        (TimesheetField::ClockIn, entry.clock_in()),
        (TimesheetField::ClockOut, entry.clock_out()),
    ] {
        if parse_time_of_day(value).is_none() {
            return Err(ValidationError::InvalidField {
                field: field.label(),
                value: value.to_string(),
            });
        }
    }

    Ok(())
}
