use std::fmt;

use crate::error::{ModelError, ModelResult};

/// Login credentials for the booking site.
///
/// Loaded once at startup and shared read-only between workers.
/// Both fields are guaranteed non-empty.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    email: String,
    password: String,
}

impl Credentials {
    /// Create credentials, rejecting empty (or whitespace-only) fields.
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> ModelResult<Self> {
        let email = email.into();
        let password = password.into();

        if email.trim().is_empty() {
            return Err(ModelError::EmptyCredential("email"));
        }
        if password.is_empty() {
            return Err(ModelError::EmptyCredential("password"));
        }
        Ok(Self { email, password })
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn password(&self) -> &str {
        &self.password
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty_fields() {
        assert!(matches!(
            Credentials::new("", "secret"),
            Err(ModelError::EmptyCredential("email"))
        ));
        assert!(matches!(
            Credentials::new("  ", "secret"),
            Err(ModelError::EmptyCredential("email"))
        ));
        assert!(matches!(
            Credentials::new("a@b.c", ""),
            Err(ModelError::EmptyCredential("password"))
        ));
    }

    #[test]
    fn debug_redacts_password() {
        let creds = Credentials::new("golfer@example.com", "hunter2").unwrap();
        let dbg = format!("{creds:?}");

        assert!(dbg.contains("golfer@example.com"));
        assert!(!dbg.contains("hunter2"));
    }
}
