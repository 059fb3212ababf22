//! Submission workflow: validate, submit, then poll until the server reports
//! a terminal status.
//!
//! ```text
//! Unsubmitted ──→ Progress ──→ Success
//!      │            │  ↺
//!      │            └────────→ Error
//!      └─────────────────────→ Error   (transport failure)
//! ```
//!
//! The payload is captured once when the submission starts. Everything else
//! (`retry_timeout`, `form_action`) is read from the store before each poll,
//! so a reconfigured endpoint takes effect mid-poll.

use std::sync::Arc;
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;
use tracing::Instrument;

use crate::cancel::CancelToken;
use crate::store::{Dispatch, Store, WorkflowFuture};
use crate::transport::{SubmissionPayload, Transport, TransportError};

use super::actions::validate_form;
use super::intent::FormIntent;
use super::reducer::FormReducer;
use super::selectors::{invalid_field_names, is_form_valid};
use super::state::{FormStatus, UnknownStatus};

/// Shown when a failure carries no message of its own.
pub const GENERIC_FAILURE_MESSAGE: &str = "Something went wrong.";

/// Reasons a submission attempt ends in the error state.
#[derive(Debug, Error)]
pub enum SubmitError {
    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("Network response was not ok (HTTP {status}).")]
    Status { status: u16 },

    #[error("Malformed server response: {0}")]
    MalformedResponse(#[from] serde_json::Error),

    #[error(transparent)]
    UnknownStatus(#[from] UnknownStatus),

    #[error("Submission cancelled.")]
    Cancelled,

    /// The form was reset while this attempt was running.
    #[error("Submission superseded by a reset.")]
    Superseded,
}

impl SubmitError {
    /// Text stored as the form's error message.
    pub fn user_message(&self) -> String {
        let message = self.to_string();
        if message.trim().is_empty() {
            GENERIC_FAILURE_MESSAGE.to_string()
        } else {
            message
        }
    }
}

/// Body of a poll response.
#[derive(Debug, Deserialize)]
struct StatusRecord {
    status: String,
    #[serde(default)]
    reason: Option<String>,
    #[serde(default)]
    timeout: Option<f64>,
}

impl StatusRecord {
    fn timeout_ms(&self) -> u64 {
        match self.timeout {
            Some(ms) if ms.is_finite() && ms > 0.0 => ms as u64,
            _ => 0,
        }
    }
}

/// Validate, then submit and poll through `transport`.
///
/// Invalid input completes silently after updating the validity flags. A
/// form that is already submitted is left alone until it is reset.
pub fn submit_form(transport: Arc<dyn Transport>, cancel: CancelToken) -> Dispatch<FormReducer> {
    Dispatch::workflow(move |store: Store<FormReducer>| -> WorkflowFuture {
        if store.get_state().form_is_submitted {
            tracing::debug!("Submit ignored: form already submitted");
            return Box::pin(async {});
        }

        store.dispatch(Dispatch::Intent(validate_form(&store.get_state())));
        let state = store.get_state();
        if !is_form_valid(&state) {
            tracing::debug!(
                invalid = ?invalid_field_names(&state),
                "Submit blocked by validation"
            );
            return Box::pin(async {});
        }

        let payload = SubmissionPayload::from_state(&state);
        store.dispatch(Dispatch::Intent(FormIntent::SubmitRequest));
        let attempt = store.get_state().attempt;

        let span = tracing::info_span!("submission", id = %uuid::Uuid::new_v4(), attempt);
        Box::pin(
            async move {
                tracing::info!("Submission started");
                let attempt = Attempt {
                    store: &store,
                    id: attempt,
                    payload: &payload,
                    cancel: &cancel,
                };
                match attempt.poll_until_settled(transport.as_ref()).await {
                    Ok(status) => tracing::info!("Submission settled: {}", status),
                    Err(SubmitError::Superseded) => tracing::info!("Submission superseded"),
                    Err(e) => {
                        tracing::warn!("Submission failed: {}", e);
                        store.dispatch(Dispatch::Intent(FormIntent::SubmitFailure {
                            attempt: attempt.id,
                            message: e.user_message(),
                        }));
                    }
                }
            }
            .instrument(span),
        )
    })
}

/// One running submission: the store it reports to, its generation and the
/// frozen payload.
struct Attempt<'a> {
    store: &'a Store<FormReducer>,
    id: u64,
    payload: &'a SubmissionPayload,
    cancel: &'a CancelToken,
}

impl Attempt<'_> {
    /// `Superseded` once the form has been reset since this attempt started,
    /// `Cancelled` once the token fired.
    fn check_live(&self) -> Result<(), SubmitError> {
        if self.store.get_state().attempt != self.id {
            return Err(SubmitError::Superseded);
        }
        if self.cancel.is_cancelled() {
            return Err(SubmitError::Cancelled);
        }
        Ok(())
    }

    /// Poll until the server reports something other than `progress`.
    async fn poll_until_settled(
        &self,
        transport: &dyn Transport,
    ) -> Result<FormStatus, SubmitError> {
        let mut poll: u32 = 0;
        loop {
            let retry_timeout = self.store.get_state().retry_timeout;
            if retry_timeout > 0 {
                tracing::debug!("Waiting {}ms before next poll", retry_timeout);
                tokio::select! {
                    _ = tokio::time::sleep(Duration::from_millis(retry_timeout)) => {}
                    _ = self.cancel.cancelled() => {}
                }
            }
            self.check_live()?;

            poll += 1;
            let endpoint = self.store.get_state().form_action;
            tracing::debug!(poll, endpoint = %endpoint, "Polling form endpoint");

            let response = tokio::select! {
                response = transport.fetch(&endpoint, self.payload) => response?,
                _ = self.cancel.cancelled() => {
                    self.check_live()?;
                    return Err(SubmitError::Cancelled);
                }
            };
            self.check_live()?;
            if !response.is_success() {
                return Err(SubmitError::Status {
                    status: response.status,
                });
            }

            let record: StatusRecord = serde_json::from_slice(&response.body)?;
            let status: FormStatus = record.status.parse()?;
            let timeout_ms = record.timeout_ms();

            self.store.dispatch(Dispatch::Intent(FormIntent::ResponseReceived {
                attempt: self.id,
                status,
                reason: record.reason,
                timeout_ms,
            }));

            if status != FormStatus::Progress {
                return Ok(status);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_record_defaults() {
        let record: StatusRecord = serde_json::from_str(r#"{"status":"success"}"#).unwrap();
        assert_eq!(record.status, "success");
        assert_eq!(record.reason, None);
        assert_eq!(record.timeout_ms(), 0);
    }

    #[test]
    fn status_record_timeout_is_clamped() {
        let parse = |json: &str| serde_json::from_str::<StatusRecord>(json).unwrap().timeout_ms();
        assert_eq!(parse(r#"{"status":"progress","timeout":1000}"#), 1000);
        assert_eq!(parse(r#"{"status":"progress","timeout":12.7}"#), 12);
        assert_eq!(parse(r#"{"status":"progress","timeout":-5}"#), 0);
    }

    #[test]
    fn status_record_requires_status() {
        assert!(serde_json::from_str::<StatusRecord>(r#"{"reason":"x"}"#).is_err());
    }

    #[test]
    fn user_message_falls_back_when_empty() {
        let err = SubmitError::Transport(TransportError::Other(String::new()));
        assert_eq!(err.user_message(), GENERIC_FAILURE_MESSAGE);
    }

    #[test]
    fn status_error_mentions_http_code() {
        let err = SubmitError::Status { status: 500 };
        assert_eq!(err.user_message(), "Network response was not ok (HTTP 500).");
    }
}
