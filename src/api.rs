//! Public form API.
//!
//! The surface external callers drive: validate, read and write field
//! values, and submit.

use std::sync::Arc;

use parking_lot::Mutex;
use serde::Serialize;

use crate::cancel::CancelToken;
use crate::form::actions::{edit_form, set_form_action, validate_form};
use crate::form::selectors::{invalid_field_names, is_form_valid};
use crate::form::{
    submit_form, FormData, FormDataPatch, FormIntent, FormState, FormStore,
};
use crate::store::{Dispatch, Dispatched};
use crate::transport::Transport;

/// Result of [`FormApi::validate`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationReport {
    pub is_valid: bool,
    pub error_fields: Vec<&'static str>,
}

/// Handle bundling a form store with the transport used for submissions.
#[derive(Clone)]
pub struct FormApi {
    store: FormStore,
    transport: Arc<dyn Transport>,
    current_cancel: Arc<Mutex<Option<CancelToken>>>,
}

impl FormApi {
    pub fn new(store: FormStore, transport: Arc<dyn Transport>) -> Self {
        Self {
            store,
            transport,
            current_cancel: Arc::new(Mutex::new(None)),
        }
    }

    pub fn store(&self) -> &FormStore {
        &self.store
    }

    pub fn state(&self) -> FormState {
        self.store.get_state()
    }

    /// Recompute validity flags, then report them.
    pub fn validate(&self) -> ValidationReport {
        self.store
            .dispatch(Dispatch::Intent(validate_form(&self.store.get_state())));
        let state = self.store.get_state();
        ValidationReport {
            is_valid: is_form_valid(&state),
            error_fields: invalid_field_names(&state),
        }
    }

    pub fn get_data(&self) -> FormData {
        self.store.get_state().data()
    }

    /// Update only the fields present in the patch.
    pub fn set_data(&self, patch: FormDataPatch) {
        self.store.dispatch(Dispatch::Intent(edit_form(patch)));
    }

    /// Like [`FormApi::set_data`] for untyped input. Anything but a JSON
    /// object is ignored.
    pub fn set_data_json(&self, value: &serde_json::Value) {
        match FormDataPatch::from_json(value) {
            Some(patch) => self.set_data(patch),
            None => tracing::debug!("set_data ignored non-object input"),
        }
    }

    pub fn set_action(&self, action: impl Into<String>) {
        self.store.dispatch(Dispatch::Intent(set_form_action(action)));
    }

    /// Start the validate → submit → poll workflow.
    ///
    /// Must be called inside a Tokio runtime. The returned value may be
    /// awaited with [`Dispatched::wait`] or dropped.
    pub fn submit(&self) -> Dispatched {
        let token = {
            let mut current = self.current_cancel.lock();
            let in_flight = self.store.get_state().form_is_submitted;
            match current.as_ref() {
                // The workflow will ignore this call; keep the running
                // submission cancellable.
                Some(token) if in_flight => token.clone(),
                _ => current.insert(CancelToken::new()).clone(),
            }
        };
        self.store
            .dispatch(submit_form(Arc::clone(&self.transport), token))
    }

    /// Cancel the running submission. Returns `false` unless one was still
    /// running and not yet cancelled.
    pub fn cancel(&self) -> bool {
        let Some(token) = self.current_cancel.lock().take() else {
            return false;
        };
        let state = self.store.get_state();
        let running = state.form_is_submitted && !state.form_status.is_terminal();
        // A settled attempt's token is dropped without firing.
        running && token.cancel()
    }

    /// Return to the unsubmitted state so the form can be sent again.
    pub fn reset(&self) {
        self.cancel();
        self.store.dispatch(Dispatch::Intent(FormIntent::Reset));
    }
}
