//! Static login credentials

use subtle::ConstantTimeEq;

use crate::error::ApiError;

/// The single username/password pair accepted by `POST /login`
#[derive(Clone)]
pub struct Credentials {
    username: String,
    password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    /// Check a login attempt against the configured pair
    pub fn verify(&self, username: &str, password: &str) -> Result<(), ApiError> {
        // compare both fields before branching
        let username_ok = self.username.as_bytes().ct_eq(username.as_bytes());
        let password_ok = self.password.as_bytes().ct_eq(password.as_bytes());

        if bool::from(username_ok & password_ok) {
            Ok(())
        } else {
            Err(ApiError::InvalidCredentials)
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}
