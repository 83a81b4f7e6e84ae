//! loginform core library - login form model, submit handler, API client,
//! and token storage.
//!
//! A [`dom::LoginPage`] binds a [`handler::SubmitHandler`] to the page's
//! `loginForm` element. Each submit posts the form's `email` and `password`
//! as JSON to `/login`; a successful reply's token is written to the
//! injected [`storage::Storage`] before the page navigates to `/dashboard`.

pub mod api;
pub mod auth;
pub mod browser;
pub mod config;
pub mod dom;
pub mod form;
pub mod handler;
pub mod storage;

pub use api::{ApiClient, ApiError};
pub use auth::Credentials;
pub use browser::{Navigator, Notifier, DASHBOARD_PATH};
pub use config::{Config, StorageBackend};
pub use dom::{Document, DomError, FormElement, LoginPage, LOGIN_FORM_ID};
pub use form::{FormData, SubmitEvent};
pub use handler::{Messages, SubmitHandler, SubmitOutcome};
pub use storage::{FileStorage, KeyringStorage, MemoryStorage, Storage, TOKEN_KEY};
