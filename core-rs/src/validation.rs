//! Client-side input checks
//!
//! These run before any request is built. A failure never reaches the API
//! client and never touches session state.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::errors::{ConsoleError, Result};

pub const MIN_PASSWORD_LEN: usize = 6;

static EMAIL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap_or_else(|e| panic!("email pattern: {}", e))
});

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_PATTERN.is_match(email)
}

/// Sign-up form as entered
#[derive(Debug, Clone, Default)]
pub struct RegistrationForm {
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

impl RegistrationForm {
    pub fn new(
        email: impl Into<String>,
        password: impl Into<String>,
        confirm_password: impl Into<String>,
    ) -> Self {
        RegistrationForm {
            email: email.into(),
            password: password.into(),
            confirm_password: confirm_password.into(),
        }
    }

    /// Checks run in the order the sign-up page reports them
    pub fn validate(&self) -> Result<()> {
        if self.email.is_empty() || self.password.is_empty() || self.confirm_password.is_empty() {
            return Err(ConsoleError::Validation("Please fill in all fields".to_string()));
        }
        if self.password != self.confirm_password {
            return Err(ConsoleError::Validation("Passwords do not match".to_string()));
        }
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(ConsoleError::Validation(format!(
                "Password must be at least {} characters long",
                MIN_PASSWORD_LEN
            )));
        }
        if !is_valid_email(&self.email) {
            return Err(ConsoleError::Validation(
                "Please enter a valid email address".to_string(),
            ));
        }
        Ok(())
    }
}

pub fn validate_login(email: &str, password: &str) -> Result<()> {
    if email.trim().is_empty() || password.is_empty() {
        return Err(ConsoleError::Validation(
            "Please enter your email and password".to_string(),
        ));
    }
    Ok(())
}

/// Non-empty after trimming; `what` names the field in the message
pub fn require_non_empty<'a>(value: &'a str, what: &str) -> Result<&'a str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ConsoleError::Validation(format!("Please enter a {}", what)));
    }
    Ok(trimmed)
}
