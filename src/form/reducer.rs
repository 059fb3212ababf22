//! Reducer for the identity form.

use crate::mvi::Reducer;

use super::intent::FormIntent;
use super::state::{FormState, FormStatus};

/// Reducer for form state transitions.
pub struct FormReducer;

impl Reducer for FormReducer {
    type State = FormState;
    type Intent = FormIntent;

    fn reduce(state: Self::State, intent: Self::Intent) -> Self::State {
        match intent {
            FormIntent::Edit { fio, email, phone } => FormState {
                fio: fio.unwrap_or(state.fio),
                email: email.unwrap_or(state.email),
                phone: phone.unwrap_or(state.phone),
                ..state
            },

            FormIntent::Validate {
                fio_is_valid,
                email_is_valid,
                phone_is_valid,
            } => FormState {
                fio_is_valid,
                email_is_valid,
                phone_is_valid,
                ..state
            },

            FormIntent::SetAction { action } => FormState {
                form_action: action,
                ..state
            },

            FormIntent::SubmitRequest => FormState {
                form_is_submitted: true,
                attempt: state.attempt + 1,
                ..state
            },

            FormIntent::ResponseReceived { attempt, .. }
            | FormIntent::SubmitFailure { attempt, .. }
                if attempt != state.attempt =>
            {
                tracing::debug!(
                    attempt,
                    current = state.attempt,
                    "Dropping stale submission result"
                );
                state
            }

            FormIntent::ResponseReceived {
                status,
                reason,
                timeout_ms,
                ..
            } => FormState {
                form_status: status,
                // The message only means something for an error, the delay
                // only while still in progress.
                error_message: match status {
                    FormStatus::Error => reason.unwrap_or_default(),
                    _ => String::new(),
                },
                retry_timeout: match status {
                    FormStatus::Progress => timeout_ms,
                    _ => 0,
                },
                ..state
            },

            FormIntent::SubmitFailure { message, .. } => FormState {
                form_status: FormStatus::Error,
                error_message: message,
                retry_timeout: 0,
                ..state
            },

            FormIntent::Reset => FormState {
                form_is_submitted: false,
                form_status: FormStatus::Unsubmitted,
                error_message: String::new(),
                retry_timeout: 0,
                attempt: state.attempt + 1,
                ..state
            },
        }
    }
}
