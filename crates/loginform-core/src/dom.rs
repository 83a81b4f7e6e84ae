//! Minimal page model: forms addressable by id, and the login page that
//! binds the submit handler to the `loginForm` element.
//!
//! Attaching fails when the page has no `loginForm` element. Control
//! values are read at submit time, so edits made between submits are
//! picked up by the next one.

use std::collections::HashMap;

use anyhow::Result;
use thiserror::Error;
use tracing::debug;

use crate::auth::{EMAIL_FIELD, PASSWORD_FIELD};
use crate::form::{FormData, SubmitEvent};
use crate::handler::{SubmitHandler, SubmitOutcome};

/// Id of the form element the login handler binds to
pub const LOGIN_FORM_ID: &str = "loginForm";

#[derive(Error, Debug)]
pub enum DomError {
    #[error("No element with id `{0}`")]
    ElementNotFound(String),

    #[error("Form `{form}` has no control named `{name}`")]
    ControlNotFound { form: String, name: String },
}

/// A form element and its named input controls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormElement {
    id: String,
    controls: Vec<(String, String)>,
}

impl FormElement {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            controls: Vec::new(),
        }
    }

    /// The standard login form: `email` and `password` controls, both empty
    pub fn login() -> Self {
        Self::new(LOGIN_FORM_ID)
            .with_control(EMAIL_FIELD, "")
            .with_control(PASSWORD_FIELD, "")
    }

    pub fn with_control(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.controls.push((name.into(), value.into()));
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn value(&self, name: &str) -> Option<&str> {
        self.controls
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Set the value of the first control named `name`
    pub fn set_value(&mut self, name: &str, value: impl Into<String>) -> Result<(), DomError> {
        match self.controls.iter_mut().find(|(n, _)| n == name) {
            Some((_, v)) => {
                *v = value.into();
                Ok(())
            }
            None => Err(DomError::ControlNotFound {
                form: self.id.clone(),
                name: name.to_string(),
            }),
        }
    }

    /// Snapshot of the current control values
    pub fn form_data(&self) -> FormData {
        self.controls
            .iter()
            .map(|(n, v)| (n.as_str(), v.as_str()))
            .collect()
    }
}

#[derive(Debug, Clone, Default)]
pub struct Document {
    forms: HashMap<String, FormElement>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a form, replacing any element with the same id
    pub fn insert(&mut self, form: FormElement) {
        self.forms.insert(form.id.clone(), form);
    }

    pub fn get_element_by_id(&self, id: &str) -> Option<&FormElement> {
        self.forms.get(id)
    }

    pub fn get_element_by_id_mut(&mut self, id: &str) -> Option<&mut FormElement> {
        self.forms.get_mut(id)
    }
}

/// The `loginForm` element with the submit handler attached.
pub struct LoginPage {
    form: FormElement,
    handler: SubmitHandler,
}

impl LoginPage {
    /// Bind `handler` to the `loginForm` element of `document`.
    pub fn attach(mut document: Document, handler: SubmitHandler) -> Result<Self, DomError> {
        let form = document
            .forms
            .remove(LOGIN_FORM_ID)
            .ok_or_else(|| DomError::ElementNotFound(LOGIN_FORM_ID.to_string()))?;
        debug!(form = LOGIN_FORM_ID, "Attached submit handler");
        Ok(Self { form, handler })
    }

    pub fn form(&self) -> &FormElement {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut FormElement {
        &mut self.form
    }

    /// Submit the form with its current values
    pub async fn submit(&self) -> Result<SubmitOutcome> {
        let mut event = SubmitEvent::new(self.form.form_data());
        self.dispatch(&mut event).await
    }

    /// Deliver an already built submit event to the handler
    pub async fn dispatch(&self, event: &mut SubmitEvent) -> Result<SubmitOutcome> {
        self.handler.handle(event).await
    }
}
