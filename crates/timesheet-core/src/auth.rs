//! Owner login gate.
//!
//! Authentication is a pluggable capability behind the [`Authenticator`]
//! trait. The shipped implementation compares against a single configured
//! credential pair; it creates no session or token, a successful check only
//! tells the caller to switch screens.

use std::time::Duration;

use async_trait::async_trait;
use subtle::ConstantTimeEq;

use crate::config::ClientConfig;
use crate::models::Credentials;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    #[error("Invalid username or password")]
    InvalidCredentials,
}

/// Checks owner credentials.
#[async_trait]
pub trait Authenticator: Send + Sync {
    async fn authenticate(&self, credentials: &Credentials) -> Result<(), AuthError>;
}

/// Authenticator backed by one fixed username/password pair.
///
/// Every attempt waits `latency` before answering, whether it succeeds or not.
pub struct StaticAuthenticator {
    expected: Credentials,
    latency: Duration,
}

impl StaticAuthenticator {
    pub const DEFAULT_LATENCY: Duration = Duration::from_millis(1000);

    pub fn new(expected: Credentials, latency: Duration) -> Self {
        Self { expected, latency }
    }

    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(config.owner_credentials(), config.login_delay())
    }
}

#[async_trait]
impl Authenticator for StaticAuthenticator {
    async fn authenticate(&self, credentials: &Credentials) -> Result<(), AuthError> {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }

        let username_ok = credentials
            .username
            .as_bytes()
            .ct_eq(self.expected.username.as_bytes());
        let password_ok = credentials
            .password
            .as_bytes()
            .ct_eq(self.expected.password.as_bytes());

        if bool::from(username_ok & password_ok) {
            tracing::info!(username = %credentials.username, "Owner login succeeded");
            Ok(())
        } else {
            tracing::warn!(username = %credentials.username, "Owner login rejected");
            Err(AuthError::InvalidCredentials)
        }
    }
}
