//! Intents for the identity form.

use crate::mvi::Intent;

use super::state::FormStatus;

/// Intents that can be dispatched to the form store.
#[derive(Debug, Clone, PartialEq)]
pub enum FormIntent {
    /// User edited one or more fields. `None` leaves a field untouched.
    Edit {
        fio: Option<String>,
        email: Option<String>,
        phone: Option<String>,
    },

    /// Result of validating the current field values.
    Validate {
        fio_is_valid: bool,
        email_is_valid: bool,
        phone_is_valid: bool,
    },

    /// Point submissions at another endpoint.
    SetAction { action: String },

    /// A submission was sent; blocks re-submission and starts a new
    /// attempt.
    SubmitRequest,

    /// The server answered a poll of submission `attempt`.
    ResponseReceived {
        attempt: u64,
        status: FormStatus,
        reason: Option<String>,
        /// Delay before the next poll, in milliseconds.
        timeout_ms: u64,
    },

    /// Submission `attempt` failed and will not be polled again.
    SubmitFailure { attempt: u64, message: String },

    /// Return to the unsubmitted lifecycle state, keeping field values and
    /// the endpoint. Any attempt still running becomes stale.
    Reset,
}

impl Intent for FormIntent {}
