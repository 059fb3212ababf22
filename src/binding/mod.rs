//! View binding.
//!
//! Connects a form store to something that displays it. The binding keeps
//! the last snapshot it saw and, after each commit, calls only the view
//! mutations for the fields that changed, so the view never rewrites an
//! input the user is typing into.
//!
//! ```text
//! view event ──→ FormBinding::on_input / on_submit ──→ dispatch
//!                                                        │
//! view ←── changed-field mutations ←── diff(prev, next) ←┘
//! ```

mod terminal;

use std::sync::Arc;

use parking_lot::Mutex;

use crate::api::FormApi;
use crate::form::{Field, FormDataPatch, FormState, FormStatus};
use crate::store::{Dispatched, Subscription};

pub use terminal::TerminalView;

/// Imperative surface of a form display.
pub trait FormView: Send + Sync {
    fn set_field_value(&self, field: Field, value: &str);

    fn set_field_invalid(&self, field: Field, invalid: bool);

    fn set_form_action(&self, action: &str);

    fn set_submit_disabled(&self, disabled: bool);

    /// `text` is `Success` on success, the error message on error and
    /// empty otherwise.
    fn show_result(&self, status: FormStatus, text: &str);
}

/// Text shown in the result area for a snapshot.
pub fn result_text(state: &FormState) -> &str {
    match state.form_status {
        FormStatus::Success => "Success",
        FormStatus::Error => &state.error_message,
        FormStatus::Unsubmitted | FormStatus::Progress => "",
    }
}

/// Apply the mutations for every tracked field that differs between
/// `prev` and `next`.
pub fn apply_diff(view: &dyn FormView, prev: &FormState, next: &FormState) {
    for field in Field::ALL {
        if prev.value(field) != next.value(field) {
            view.set_field_value(field, next.value(field));
        }
        if prev.is_valid(field) != next.is_valid(field) {
            view.set_field_invalid(field, !next.is_valid(field));
        }
    }

    if prev.form_action != next.form_action {
        view.set_form_action(&next.form_action);
    }
    if prev.form_is_submitted != next.form_is_submitted {
        view.set_submit_disabled(next.form_is_submitted);
    }
    if prev.form_status != next.form_status || prev.error_message != next.error_message {
        view.show_result(next.form_status, result_text(next));
    }
}

/// A view attached to a form API.
pub struct FormBinding {
    api: FormApi,
    subscription: Subscription,
}

impl FormBinding {
    /// Subscribe `view` to the API's store. The view is expected to already
    /// display the current state.
    ///
    /// Dropping the binding leaves the listener registered for as long as the
    /// store lives; call [`FormBinding::detach`] to stop updates.
    pub fn attach(api: FormApi, view: Arc<dyn FormView>) -> Self {
        let store = api.store().clone();
        let last_seen = Mutex::new(store.get_state());

        // Weak: the store owns this listener.
        let reader = store.downgrade();
        let subscription = store.subscribe(move || {
            let Some(store) = reader.upgrade() else {
                return;
            };
            let mut prev = last_seen.lock();
            let next = store.get_state();
            apply_diff(view.as_ref(), &prev, &next);
            *prev = next;
        });

        Self { api, subscription }
    }

    /// The view's inputs changed; mirror their values into the store.
    pub fn on_input(&self, fio: &str, email: &str, phone: &str) {
        self.api.set_data(FormDataPatch {
            fio: Some(fio.to_string()),
            email: Some(email.to_string()),
            phone: Some(phone.to_string()),
        });
    }

    pub fn on_submit(&self) -> Dispatched {
        self.api.submit()
    }

    pub fn detach(self) {
        self.subscription.unsubscribe();
    }
}
