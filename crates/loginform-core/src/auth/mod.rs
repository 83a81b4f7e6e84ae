//! Credentials read from the login form.
//!
//! This module provides `Credentials`, the JSON body posted to `/login`.
//! Nothing here is cached: a value lives for one request/response cycle.

pub mod credentials;

pub use credentials::{Credentials, EMAIL_FIELD, PASSWORD_FIELD};
