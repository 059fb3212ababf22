//! Shared test utilities and mock infrastructure.

#![allow(dead_code)]

pub mod mock_backend;

use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;

use myform::api::FormApi;
use myform::binding::FormView;
use myform::form::{Field, FormState, FormStatus, FormStore};
use myform::transport::{SubmissionPayload, Transport, TransportError, TransportResponse};

pub const VALID_FIO: &str = "Иванов Иван Иванович";
pub const VALID_EMAIL: &str = "ivan@ya.ru";
pub const VALID_PHONE: &str = "+7(111)222-33-33";

/// A form state whose fields all pass validation.
pub fn valid_state(action: &str) -> FormState {
    FormState {
        fio: VALID_FIO.to_string(),
        email: VALID_EMAIL.to_string(),
        phone: VALID_PHONE.to_string(),
        ..FormState::with_action(action)
    }
}

/// Store + API wired to a scripted transport.
pub fn scripted_api(state: FormState, transport: &Arc<ScriptedTransport>) -> FormApi {
    let transport: Arc<dyn Transport> = transport.clone();
    FormApi::new(FormStore::new(state), transport)
}

/// One scripted answer.
#[derive(Debug, Clone)]
pub enum Step {
    Respond(TransportResponse),
    Fail(String),
    /// Never resolves; used to exercise cancellation.
    Hang,
}

impl Step {
    pub fn json(body: &str) -> Self {
        Step::Respond(TransportResponse::new(200, body))
    }

    pub fn progress(timeout_ms: u64) -> Self {
        Self::json(&format!(r#"{{"status":"progress","timeout":{timeout_ms}}}"#))
    }

    pub fn success() -> Self {
        Self::json(r#"{"status":"success"}"#)
    }

    pub fn error(reason: &str) -> Self {
        Self::json(&format!(r#"{{"status":"error","reason":"{reason}"}}"#))
    }

    pub fn http(status: u16) -> Self {
        Step::Respond(TransportResponse::new(status, "oops"))
    }
}

/// A recorded transport call.
#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    pub endpoint: String,
    pub payload: SubmissionPayload,
    /// Tokio clock at the time of the call.
    pub at: tokio::time::Instant,
}

/// In-memory transport replaying queued steps, then answering `success`.
#[derive(Default)]
pub struct ScriptedTransport {
    steps: Mutex<VecDeque<Step>>,
    calls: Mutex<Vec<Call>>,
}

impl ScriptedTransport {
    pub fn new(steps: impl IntoIterator<Item = Step>) -> Arc<Self> {
        Arc::new(Self {
            steps: Mutex::new(steps.into_iter().collect()),
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn fetch(
        &self,
        endpoint: &str,
        payload: &SubmissionPayload,
    ) -> Result<TransportResponse, TransportError> {
        self.calls.lock().push(Call {
            endpoint: endpoint.to_string(),
            payload: payload.clone(),
            at: tokio::time::Instant::now(),
        });

        let step = self.steps.lock().pop_front().unwrap_or_else(Step::success);
        match step {
            Step::Respond(response) => Ok(response),
            Step::Fail(message) => Err(TransportError::Other(message)),
            Step::Hang => std::future::pending().await,
        }
    }
}

/// View that records every mutation as a line of text.
#[derive(Default)]
pub struct RecordingView {
    calls: Mutex<Vec<String>>,
}

impl RecordingView {
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }

    pub fn results(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter(|c| c.starts_with("result "))
            .collect()
    }
}

impl FormView for RecordingView {
    fn set_field_value(&self, field: Field, value: &str) {
        self.calls.lock().push(format!("value {field}={value}"));
    }

    fn set_field_invalid(&self, field: Field, invalid: bool) {
        self.calls.lock().push(format!("invalid {field}={invalid}"));
    }

    fn set_form_action(&self, action: &str) {
        self.calls.lock().push(format!("action {action}"));
    }

    fn set_submit_disabled(&self, disabled: bool) {
        self.calls.lock().push(format!("disabled {disabled}"));
    }

    fn show_result(&self, status: FormStatus, text: &str) {
        self.calls.lock().push(format!("result {status}:{text}"));
    }
}
