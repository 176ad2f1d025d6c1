use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::Serialize;

use crate::hours::compute_hours;
use crate::validation::ValidationError;

/// Form fields of a timesheet entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimesheetField {
    EmployeeId,
    Name,
    Date,
    ClockIn,
    ClockOut,
    HoursWorked,
    Project,
    TaskDescription,
}

impl TimesheetField {
    pub const ALL: [TimesheetField; 8] = [
        TimesheetField::EmployeeId,
        TimesheetField::Name,
        TimesheetField::Date,
        TimesheetField::ClockIn,
        TimesheetField::ClockOut,
        TimesheetField::HoursWorked,
        TimesheetField::Project,
        TimesheetField::TaskDescription,
    ];

    /// Fields the user must fill in before submitting.
    pub const REQUIRED: [TimesheetField; 7] = [
        TimesheetField::EmployeeId,
        TimesheetField::Name,
        TimesheetField::Date,
        TimesheetField::ClockIn,
        TimesheetField::ClockOut,
        TimesheetField::Project,
        TimesheetField::TaskDescription,
    ];

    /// Key used in the JSON body sent to the API.
    pub fn wire_name(&self) -> &'static str {
        match self {
            TimesheetField::EmployeeId => "employeeId",
            TimesheetField::Name => "name",
            TimesheetField::Date => "date",
            TimesheetField::ClockIn => "clockIn",
            TimesheetField::ClockOut => "clockOut",
            TimesheetField::HoursWorked => "hoursWorked",
            TimesheetField::Project => "project",
            TimesheetField::TaskDescription => "taskDescription",
        }
    }

    /// Human-readable label shown next to the field.
    pub fn label(&self) -> &'static str {
        match self {
            TimesheetField::EmployeeId => "Employee ID",
            TimesheetField::Name => "Full Name",
            TimesheetField::Date => "Date",
            TimesheetField::ClockIn => "Clock In",
            TimesheetField::ClockOut => "Clock Out",
            TimesheetField::HoursWorked => "Hours Worked",
            TimesheetField::Project => "Project",
            TimesheetField::TaskDescription => "Task Description",
        }
    }
}

impl fmt::Display for TimesheetField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire_name())
    }
}

impl FromStr for TimesheetField {
    type Err = ValidationError;

    /// Accepts the wire name as well as kebab-case and snake_case spellings.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| *c != '-' && *c != '_')
            .flat_map(char::to_lowercase)
            .collect();

        TimesheetField::ALL
            .into_iter()
            .find(|field| field.wire_name().to_lowercase() == normalized)
            .ok_or_else(|| ValidationError::UnknownField(s.to_string()))
    }
}

/// A single day's work record, as entered in the timesheet form.
///
/// Text fields hold the raw input values. The clock times are private so
/// `hours_worked` always matches them; both change only through
/// [`TimesheetEntry::set`].
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimesheetEntry {
    pub employee_id: String,
    pub name: String,
    pub date: String,
    clock_in: String,
    clock_out: String,
    hours_worked: Decimal,
    pub project: String,
    pub task_description: String,
}

impl TimesheetEntry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn hours_worked(&self) -> Decimal {
        self.hours_worked
    }

    pub fn clock_in(&self) -> &str {
        &self.clock_in
    }

    pub fn clock_out(&self) -> &str {
        &self.clock_out
    }

    /// Update one field. Changing either clock time recomputes the worked hours.
    pub fn set(
        &mut self,
        field: TimesheetField,
        value: impl Into<String>,
    ) -> Result<(), ValidationError> {
        let value = value.into();
        match field {
            TimesheetField::EmployeeId => self.employee_id = value,
            TimesheetField::Name => self.name = value,
            TimesheetField::Date => self.date = value,
            TimesheetField::ClockIn => {
                self.clock_in = value;
                self.recalculate_hours();
            }
            TimesheetField::ClockOut => {
                self.clock_out = value;
                self.recalculate_hours();
            }
            TimesheetField::HoursWorked => {
                return Err(ValidationError::ReadOnlyField(field.label()));
            }
            TimesheetField::Project => self.project = value,
            TimesheetField::TaskDescription => self.task_description = value,
        }
        Ok(())
    }

    /// Current value of a field as displayed in the form.
    pub fn get(&self, field: TimesheetField) -> String {
        match field {
            TimesheetField::EmployeeId => self.employee_id.clone(),
            TimesheetField::Name => self.name.clone(),
            TimesheetField::Date => self.date.clone(),
            TimesheetField::ClockIn => self.clock_in.clone(),
            TimesheetField::ClockOut => self.clock_out.clone(),
            TimesheetField::HoursWorked => format!("{:.2}", self.hours_worked),
            TimesheetField::Project => self.project.clone(),
            TimesheetField::TaskDescription => self.task_description.clone(),
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    fn recalculate_hours(&mut self) {
        self.hours_worked = compute_hours(&self.clock_in, &self.clock_out);
    }
}
