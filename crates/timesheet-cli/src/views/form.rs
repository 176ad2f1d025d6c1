//! Timesheet entry form.

use std::sync::Arc;

use timesheet_api_client::TimesheetService;
use timesheet_core::validation::validate_entry;
use timesheet_core::{
    AppError, NotificationCenter, TimesheetEntry, TimesheetField, ValidationError,
};

use super::BusyFlag;

pub const SUBMIT_SUCCESS: &str = "Timesheet submitted successfully!";
pub const SUBMIT_FAILURE: &str = "Error submitting timesheet. Please try again.";

pub struct FormView {
    entry: TimesheetEntry,
    submitting: BusyFlag,
    service: Arc<dyn TimesheetService>,
    notifications: NotificationCenter,
}

impl FormView {
    pub fn new(service: Arc<dyn TimesheetService>, notifications: NotificationCenter) -> Self {
        Self {
            entry: TimesheetEntry::new(),
            submitting: BusyFlag::new(),
            service,
            notifications,
        }
    }

    pub fn entry(&self) -> &TimesheetEntry {
        &self.entry
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting.is_busy()
    }

    /// Handle on the submitting flag that stays valid while a submit runs.
    pub fn busy_flag(&self) -> BusyFlag {
        self.submitting.clone()
    }

    /// Set a field by its wire name or an alias (`clock-in`, `employee_id`).
    pub fn set_field(&mut self, name: &str, value: &str) -> Result<(), ValidationError> {
        let field: TimesheetField = name.parse()?;
        self.entry.set(field, value)
    }

    pub fn reset(&mut self) {
        self.entry.reset();
    }

    /// Validate and send the entry.
    ///
    /// On success the form is cleared. On any failure the entered data is
    /// kept so the user can retry. Dropping the returned future mid-request
    /// clears the submitting flag.
    pub async fn submit(&mut self) -> Result<(), AppError> {
        let Some(busy) = self.submitting.try_acquire() else {
            return Err(ValidationError::RequestInFlight.into());
        };

        if let Err(e) = validate_entry(&self.entry) {
            self.notifications.error(e.to_string());
            return Err(e.into());
        }

        let result = self.service.submit_timesheet(&self.entry).await;
        drop(busy);

        match result {
            Ok(()) => {
                self.entry.reset();
                self.notifications.success(SUBMIT_SUCCESS);
                Ok(())
            }
            Err(e) => {
                let err = AppError::network(SUBMIT_FAILURE, e);
                err.log();
                self.notifications.error(SUBMIT_FAILURE);
                Err(err)
            }
        }
    }
}
