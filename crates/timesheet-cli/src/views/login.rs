//! Owner login screen.

use std::sync::Arc;

use timesheet_core::{AuthError, Authenticator, Credentials};

pub struct LoginView {
    credentials: Credentials,
    error: Option<String>,
    loading: bool,
    authenticator: Arc<dyn Authenticator>,
}

impl LoginView {
    pub fn new(authenticator: Arc<dyn Authenticator>) -> Self {
        Self {
            credentials: Credentials::default(),
            error: None,
            loading: false,
            authenticator,
        }
    }

    /// Typing into either field clears the previous error.
    pub fn set_username(&mut self, username: &str) {
        self.credentials.username = username.to_string();
        self.error = None;
    }

    pub fn set_password(&mut self, password: &str) {
        self.credentials.password = password.to_string();
        self.error = None;
    }

    pub fn username(&self) -> &str {
        &self.credentials.username
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Check the entered credentials. A failure is kept as the inline error.
    pub async fn login(&mut self) -> Result<(), AuthError> {
        self.loading = true;
        self.error = None;
        let result = self.authenticator.authenticate(&self.credentials).await;
        self.loading = false;

        if let Err(e) = &result {
            self.error = Some(e.to_string());
        }
        result
    }
}
