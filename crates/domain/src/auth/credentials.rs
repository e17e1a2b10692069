//! Transient authentication inputs.
//!
//! Both payloads are supplied by a form and live only for the duration of
//! the submit call. Format validation belongs to the backend; construction
//! only enforces that required fields are non-empty.

use crate::error::{DomainError, Result};

/// Email and password pair supplied by the login form.
#[derive(Clone)]
pub struct LoginCredentials {
    email: String,
    password: String,
}

impl LoginCredentials {
    /// Create new [`LoginCredentials`], rejecting empty fields.
    pub fn new(
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Result<Self> {
        let email = email.into();
        let password = password.into();

        if email.trim().is_empty() {
            return Err(DomainError::EmptyField { field: "email" });
        }
        if password.is_empty() {
            return Err(DomainError::EmptyField { field: "password" });
        }

        Ok(Self { email, password })
    }

    #[inline]
    pub fn email(&self) -> &str {
        &self.email
    }

    #[inline]
    pub fn password(&self) -> &str {
        &self.password
    }
}

impl std::fmt::Debug for LoginCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginCredentials")
            .field("email", &self.email)
            .field("password", &"[redacted]")
            .finish()
    }
}

/// Registration payload supplied by the sign-up form.
#[derive(Clone)]
pub struct RegisterData {
    email: String,
    username: String,
    password: String,
    full_name: Option<String>,
}

impl RegisterData {
    /// Create a new [`RegisterData`], rejecting empty required fields.
    pub fn new(
        email: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
        full_name: Option<String>,
    ) -> Result<Self> {
        let email = email.into();
        let username = username.into();
        let password = password.into();

        if email.trim().is_empty() {
            return Err(DomainError::EmptyField { field: "email" });
        }
        if username.trim().is_empty() {
            return Err(DomainError::EmptyField { field: "username" });
        }
        if password.is_empty() {
            return Err(DomainError::EmptyField { field: "password" });
        }

        Ok(Self {
            email,
            username,
            password,
            full_name,
        })
    }

    #[inline]
    pub fn email(&self) -> &str {
        &self.email
    }

    #[inline]
    pub fn username(&self) -> &str {
        &self.username
    }

    #[inline]
    pub fn password(&self) -> &str {
        &self.password
    }

    #[inline]
    pub fn full_name(&self) -> Option<&str> {
        self.full_name.as_deref()
    }
}

impl std::fmt::Debug for RegisterData {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegisterData")
            .field("email", &self.email)
            .field("username", &self.username)
            .field("password", &"[redacted]")
            .field("full_name", &self.full_name)
            .finish()
    }
}
