//! Submit handler for the login form.
//!
//! On every submit the handler suppresses the native submission, posts the
//! form's `email` and `password` to `/login`, and then either stores the
//! issued token, alerts and navigates to the dashboard, or alerts a generic
//! failure. Transport and decoding failures are returned to the caller
//! without any notification.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::StatusCode;
use tracing::{debug, info};

use crate::api::{ApiClient, ApiError};
use crate::auth::Credentials;
use crate::browser::{Navigator, Notifier, DASHBOARD_PATH};
use crate::config::{Config, DEFAULT_FAILURE_MESSAGE, DEFAULT_SUCCESS_MESSAGE};
use crate::form::SubmitEvent;
use crate::storage::{Storage, TOKEN_KEY};

/// Texts shown by the two notifications
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Messages {
    pub success: String,
    pub failure: String,
}

impl Default for Messages {
    fn default() -> Self {
        Self {
            success: DEFAULT_SUCCESS_MESSAGE.to_string(),
            failure: DEFAULT_FAILURE_MESSAGE.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Token stored, success shown, navigated to the dashboard
    LoggedIn,
    /// The endpoint answered with a non-ok status; failure shown
    Rejected { status: StatusCode },
    /// Another submit was still in flight (single-flight mode only)
    Ignored,
}

/// Handles submit events of the login form.
/// Clone is cheap and clones share the single-flight state.
#[derive(Clone)]
pub struct SubmitHandler {
    client: ApiClient,
    storage: Arc<dyn Storage>,
    notifier: Arc<dyn Notifier>,
    navigator: Arc<dyn Navigator>,
    messages: Messages,
    in_flight: Option<Arc<AtomicBool>>,
}

impl SubmitHandler {
    pub fn new(
        client: ApiClient,
        storage: Arc<dyn Storage>,
        notifier: Arc<dyn Notifier>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        Self {
            client,
            storage,
            notifier,
            navigator,
            messages: Messages::default(),
            in_flight: None,
        }
    }

    /// Build a handler for the configured origin, texts and submit policy
    pub fn from_config(
        config: &Config,
        storage: Arc<dyn Storage>,
        notifier: Arc<dyn Notifier>,
        navigator: Arc<dyn Navigator>,
    ) -> Result<Self> {
        let client = ApiClient::new(
            &config.origin,
            Duration::from_secs(config.request_timeout_secs),
        )?;
        Ok(Self::new(client, storage, notifier, navigator)
            .with_messages(Messages {
                success: config.success_message.clone(),
                failure: config.failure_message.clone(),
            })
            .single_flight(config.single_flight))
    }

    pub fn with_messages(mut self, messages: Messages) -> Self {
        self.messages = messages;
        self
    }

    /// Ignore submits that arrive while a request is still in flight
    pub fn single_flight(mut self, enabled: bool) -> Self {
        self.in_flight = enabled.then(|| Arc::new(AtomicBool::new(false)));
        self
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    /// Run the login sequence for one submit event.
    pub async fn handle(&self, event: &mut SubmitEvent) -> Result<SubmitOutcome> {
        event.prevent_default();

        let Some(_flight) = self.enter_flight() else {
            debug!("Login already in flight, ignoring submit");
            return Ok(SubmitOutcome::Ignored);
        };

        let credentials = Credentials::from_form(event.target())?;
        info!(email = %credentials.email, "Submitting login form");

        let auth = match self.client.login(&credentials).await {
            Ok(auth) => auth,
            Err(err) => {
                let Some(status) = err.downcast_ref::<ApiError>().map(ApiError::status) else {
                    return Err(err);
                };
                self.notifier.alert(&self.messages.failure);
                return Ok(SubmitOutcome::Rejected { status });
            }
        };

        self.storage
            .set_item(TOKEN_KEY, &auth.token)
            .context("Failed to store auth token")?;
        info!("Login successful");

        self.notifier.alert(&self.messages.success);
        self.navigator.navigate(DASHBOARD_PATH);
        Ok(SubmitOutcome::LoggedIn)
    }

    fn enter_flight(&self) -> Option<FlightGuard> {
        match &self.in_flight {
            None => Some(FlightGuard(None)),
            Some(flag) => flag
                .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
                .ok()
                .map(|_| FlightGuard(Some(Arc::clone(flag)))),
        }
    }
}

/// Clears the in-flight flag when the submit finishes, however it ends.
struct FlightGuard(Option<Arc<AtomicBool>>);

impl Drop for FlightGuard {
    fn drop(&mut self) {
        if let Some(flag) = &self.0 {
            flag.store(false, Ordering::Release);
        }
    }
}
