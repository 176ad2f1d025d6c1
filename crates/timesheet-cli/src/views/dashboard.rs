//! Owner dashboard: report download and the way into invoicing.

use std::path::PathBuf;
use std::sync::Arc;

use timesheet_api_client::{TimesheetService, TIMESHEET_REPORT_FILENAME};
use timesheet_core::{AppError, NotificationCenter, ValidationError};

use super::BusyFlag;
use crate::downloads::save_download;

pub const DOWNLOAD_SUCCESS: &str = "Timesheet downloaded successfully!";
pub const DOWNLOAD_FAILURE: &str = "Error downloading timesheet. Please try again.";

pub struct DashboardView {
    service: Arc<dyn TimesheetService>,
    notifications: NotificationCenter,
    download_dir: PathBuf,
    downloading: BusyFlag,
}

impl DashboardView {
    pub fn new(
        service: Arc<dyn TimesheetService>,
        notifications: NotificationCenter,
        download_dir: PathBuf,
    ) -> Self {
        Self {
            service,
            notifications,
            download_dir,
            downloading: BusyFlag::new(),
        }
    }

    pub fn is_downloading(&self) -> bool {
        self.downloading.is_busy()
    }

    /// Fetch the timesheet report and save it as `timesheets.xlsx`.
    pub async fn download_timesheets(&mut self) -> Result<PathBuf, AppError> {
        let Some(busy) = self.downloading.try_acquire() else {
            return Err(ValidationError::RequestInFlight.into());
        };
        let result = self.fetch_and_save().await;
        drop(busy);

        match result {
            Ok(path) => {
                self.notifications.success(DOWNLOAD_SUCCESS);
                Ok(path)
            }
            Err(e) => {
                e.log();
                self.notifications.error(DOWNLOAD_FAILURE);
                Err(e)
            }
        }
    }

    async fn fetch_and_save(&self) -> Result<PathBuf, AppError> {
        let download = self
            .service
            .download_timesheets()
            .await
            .map_err(|e| AppError::network(DOWNLOAD_FAILURE, e))?;

        save_download(
            &self.download_dir,
            TIMESHEET_REPORT_FILENAME,
            TIMESHEET_REPORT_FILENAME,
            &download.bytes,
        )
        .await
    }
}
