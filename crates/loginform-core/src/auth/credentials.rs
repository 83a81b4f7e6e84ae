use std::fmt;

use serde::Serialize;

use crate::dom::{DomError, LOGIN_FORM_ID};
use crate::form::FormData;

/// Form control name holding the email address
pub const EMAIL_FIELD: &str = "email";

/// Form control name holding the password
pub const PASSWORD_FIELD: &str = "password";

/// Email and password read from the login form for one request.
///
/// Serializes as `{"email": ..., "password": ...}` in that order.
#[derive(Clone, Serialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }

    /// Read the `email` and `password` controls from a form's field set.
    /// Values are taken as-is; empty strings are allowed.
    pub fn from_form(form: &FormData) -> Result<Self, DomError> {
        let control = |name: &str| {
            form.get(name).ok_or_else(|| DomError::ControlNotFound {
                form: LOGIN_FORM_ID.to_string(),
                name: name.to_string(),
            })
        };
        Ok(Self::new(control(EMAIL_FIELD)?, control(PASSWORD_FIELD)?))
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
