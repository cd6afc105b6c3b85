//! Mocked sign-in. There are no credentials to check; the provider only
//! shapes a `CurrentUser` out of what the form collected.

use chrono::{DateTime, Utc};
use shared::domain::{CurrentUser, UserId};
use thiserror::Error;

#[derive(Debug, Clone, Default)]
pub struct Credentials {
    pub email: String,
    pub password: String,
    pub name: Option<String>,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
            name: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("an email address is required to sign in")]
    MissingEmail,
}

pub trait IdentityProvider: Send + Sync {
    fn authenticate(
        &self,
        credentials: &Credentials,
        now: DateTime<Utc>,
    ) -> Result<CurrentUser, SessionError>;
}

/// Accepts any non-empty email. The user id is the sign-in time in
/// milliseconds and the display name falls back to the email's local part.
#[derive(Debug, Clone, Copy, Default)]
pub struct MockIdentityProvider;

impl IdentityProvider for MockIdentityProvider {
    fn authenticate(
        &self,
        credentials: &Credentials,
        now: DateTime<Utc>,
    ) -> Result<CurrentUser, SessionError> {
        let email = credentials.email.trim();
        if email.is_empty() {
            return Err(SessionError::MissingEmail);
        }

        let name = credentials
            .name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| local_part(email).to_string());

        Ok(CurrentUser {
            id: UserId(now.timestamp_millis()),
            name,
            email: email.to_string(),
        })
    }
}

fn local_part(email: &str) -> &str {
    email.split('@').next().unwrap_or(email)
}
