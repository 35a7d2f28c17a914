//! Driver configuration, assembled by the caller before a run starts.

use std::fmt;

use crate::error::DriverError;

/// Target application and operator settings for a fill run.
#[derive(Clone, PartialEq, Eq)]
pub struct DriverConfig {
    base_url: String,
    pub username: String,
    pub password: String,
    /// Ask the operator before starting and before each submission.
    pub interactive_confirmations: bool,
}

impl DriverConfig {
    /// `base_url` is stored without trailing slashes.
    pub fn new(
        base_url: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
        interactive_confirmations: bool,
    ) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            username: username.into(),
            password: password.into(),
            interactive_confirmations,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URL of a page under the application root.
    pub fn page_url(&self, page: &str) -> String {
        format!("{}/{}", self.base_url, page.trim_start_matches('/'))
    }

    /// Every field the login step needs must be present.
    pub fn validate(&self) -> Result<(), DriverError> {
        if self.base_url.trim().is_empty() {
            return Err(DriverError::MissingConfig("base URL"));
        }
        if self.username.trim().is_empty() {
            return Err(DriverError::MissingConfig("username"));
        }
        if self.password.is_empty() {
            return Err(DriverError::MissingConfig("password"));
        }
        Ok(())
    }
}

impl fmt::Debug for DriverConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DriverConfig")
            .field("base_url", &self.base_url)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("interactive_confirmations", &self.interactive_confirmations)
            .finish()
    }
}
