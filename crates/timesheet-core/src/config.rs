//! Configuration module
//!
//! Client settings are read from the environment (and a `.env` file when
//! present). Every value has a default so the client runs against a local API
//! without any setup.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::models::Credentials;

// Common constants
const DEFAULT_API_URL: &str = "http://localhost:3000";
const DEFAULT_API_VERSION: &str = "v1.0";
const DEFAULT_OWNER_USERNAME: &str = "admin";
const DEFAULT_OWNER_PASSWORD: &str = "admin123";
const LOGIN_DELAY_MS: u64 = 1000;
const NOTIFICATION_DISPLAY_MS: u64 = 3000;
const NOTIFICATION_DISMISS_MS: u64 = 300;
const MAX_UPLOAD_SIZE_MB: u64 = 10;

/// Settings for the timesheet client.
#[derive(Clone, Debug)]
pub struct ClientConfig {
    pub api_url: String,
    pub api_version: String,
    /// `None` leaves requests without a timeout.
    pub request_timeout_secs: Option<u64>,
    pub owner_username: String,
    pub owner_password: String,
    pub login_delay_ms: u64,
    pub notification_display_ms: u64,
    pub notification_dismiss_ms: u64,
    pub max_upload_size_bytes: u64,
    pub download_dir: PathBuf,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            api_version: DEFAULT_API_VERSION.to_string(),
            request_timeout_secs: None,
            owner_username: DEFAULT_OWNER_USERNAME.to_string(),
            owner_password: DEFAULT_OWNER_PASSWORD.to_string(),
            login_delay_ms: LOGIN_DELAY_MS,
            notification_display_ms: NOTIFICATION_DISPLAY_MS,
            notification_dismiss_ms: NOTIFICATION_DISMISS_MS,
            max_upload_size_bytes: MAX_UPLOAD_SIZE_MB * 1024 * 1024,
            download_dir: PathBuf::from("."),
        }
    }
}

fn parse_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    match env::var(key) {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
            tracing::warn!(key, value = %raw, "Ignoring malformed setting, using default");
            default
        }),
        Err(_) => default,
    }
}

/// Convert the configured upload limit to bytes. A value too large to
/// represent falls back to the default limit.
fn upload_limit_bytes(megabytes: u64) -> u64 {
    megabytes
        .checked_mul(1024 * 1024)
        .unwrap_or_else(|| {
            tracing::warn!(
                megabytes,
                "MAX_UPLOAD_SIZE_MB is out of range, using default"
            );
            MAX_UPLOAD_SIZE_MB * 1024 * 1024
        })
}

impl ClientConfig {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let defaults = Self::default();

        let config = ClientConfig {
            api_url: env::var("TIMESHEET_API_URL")
                .or_else(|_| env::var("API_URL"))
                .unwrap_or(defaults.api_url),
            api_version: env::var("TIMESHEET_API_VERSION").unwrap_or(defaults.api_version),
            request_timeout_secs: env::var("TIMESHEET_REQUEST_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.trim().parse().ok())
                .filter(|&secs: &u64| secs > 0),
            owner_username: env::var("OWNER_USERNAME").unwrap_or(defaults.owner_username),
            owner_password: env::var("OWNER_PASSWORD").unwrap_or(defaults.owner_password),
            login_delay_ms: parse_or("LOGIN_DELAY_MS", LOGIN_DELAY_MS),
            notification_display_ms: parse_or("NOTIFICATION_DISPLAY_MS", NOTIFICATION_DISPLAY_MS),
            notification_dismiss_ms: parse_or("NOTIFICATION_DISMISS_MS", NOTIFICATION_DISMISS_MS),
            max_upload_size_bytes: upload_limit_bytes(parse_or(
                "MAX_UPLOAD_SIZE_MB",
                MAX_UPLOAD_SIZE_MB,
            )),
            download_dir: env::var("DOWNLOAD_DIR")
                .ok()
                .filter(|s| !s.trim().is_empty())
                .map(PathBuf::from)
                .unwrap_or(defaults.download_dir),
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        let url = self.api_url.trim();
        if url.is_empty() {
            return Err(anyhow::anyhow!("TIMESHEET_API_URL must not be empty"));
        }
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(anyhow::anyhow!(
                "TIMESHEET_API_URL must start with http:// or https://"
            ));
        }

        if self.api_version.trim().is_empty() {
            return Err(anyhow::anyhow!("TIMESHEET_API_VERSION must not be empty"));
        }

        if self.owner_username.is_empty() || self.owner_password.is_empty() {
            return Err(anyhow::anyhow!(
                "OWNER_USERNAME and OWNER_PASSWORD must not be empty"
            ));
        }

        if self.max_upload_size_bytes == 0 {
            return Err(anyhow::anyhow!("MAX_UPLOAD_SIZE_MB must be greater than 0"));
        }

        Ok(())
    }

    /// API path prefix, e.g. "/api/v1.0".
    pub fn api_prefix(&self) -> String {
        format!("/api/{}", self.api_version.trim().trim_matches('/'))
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }

    pub fn owner_credentials(&self) -> Credentials {
        Credentials::new(self.owner_username.clone(), self.owner_password.clone())
    }

    pub fn login_delay(&self) -> Duration {
        Duration::from_millis(self.login_delay_ms)
    }

    pub fn notification_display(&self) -> Duration {
        Duration::from_millis(self.notification_display_ms)
    }

    pub fn notification_dismiss(&self) -> Duration {
        Duration::from_millis(self.notification_dismiss_ms)
    }
}
