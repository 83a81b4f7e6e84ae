//! HTTP client module for the login endpoint.
//!
//! This module provides the `ApiClient` that posts credentials as JSON to
//! `/login` on the page origin and decodes the token-bearing reply.
//!
//! Non-ok statuses surface as `ApiError` values so callers can tell a
//! rejected login apart from transport or decoding failures.

pub mod client;
pub mod error;

pub use client::{ApiClient, AuthResponse, LOGIN_PATH};
pub use error::ApiError;
