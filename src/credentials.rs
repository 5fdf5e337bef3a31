//! Client-side credential checks run before anything reaches the identity provider.

use crate::error::Error;
use regex::Regex;
use secrecy::{ExposeSecret, SecretString};

/// Loose address check: something, `@`, a dotted domain, no whitespace.
#[must_use]
pub fn valid_email(email: &str) -> bool {
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").is_ok_and(|re| re.is_match(email.trim()))
}

/// Validate a sign-in request.
///
/// # Errors
/// Returns `Error::Validation` for a malformed email or an empty password.
pub fn check_sign_in(email: &str, password: &SecretString) -> Result<(), Error> {
    if !valid_email(email) {
        return Err(Error::Validation(format!("invalid email address: {email}")));
    }
    if password.expose_secret().is_empty() {
        return Err(Error::Validation("password must not be empty".to_string()));
    }
    Ok(())
}

/// A password change as typed by the user, confirmation included.
pub struct PasswordChange {
    pub email: String,
    pub current: SecretString,
    pub proposed: SecretString,
    pub confirmation: SecretString,
}

impl PasswordChange {
    /// Check the request before any network call.
    ///
    /// # Errors
    /// Returns `Error::PasswordMismatch` when the new password and its confirmation
    /// differ, `Error::Validation` for a bad email or an empty password.
    pub fn check(&self) -> Result<(), Error> {
        check_sign_in(&self.email, &self.current)?;

        if self.proposed.expose_secret().is_empty() {
            return Err(Error::Validation(
                "new password must not be empty".to_string(),
            ));
        }
        if self.proposed.expose_secret() != self.confirmation.expose_secret() {
            return Err(Error::PasswordMismatch);
        }

        Ok(())
    }
}

impl std::fmt::Debug for PasswordChange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PasswordChange")
            .field("email", &self.email)
            .field("current", &"***")
            .field("proposed", &"***")
            .field("confirmation", &"***")
            .finish()
    }
}
