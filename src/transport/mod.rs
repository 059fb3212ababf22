//! Network boundary of the submission workflow.
//!
//! The workflow only knows the [`Transport`] trait; [`HttpTransport`] is the
//! reqwest-backed implementation used by the CLI, tests inject their own.

mod http;

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

use crate::form::FormState;

pub use http::HttpTransport;

/// Field values frozen at submit time and sent with every poll.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubmissionPayload {
    pub fio: String,
    pub email: String,
    pub phone: String,
}

impl SubmissionPayload {
    pub fn from_state(state: &FormState) -> Self {
        Self {
            fio: state.fio.clone(),
            email: state.email.clone(),
            phone: state.phone.clone(),
        }
    }

    /// Query parameters in wire order.
    pub fn query_pairs(&self) -> [(&'static str, &str); 3] {
        [
            ("fio", self.fio.as_str()),
            ("email", self.email.as_str()),
            ("phone", self.phone.as_str()),
        ]
    }
}

/// Raw answer to one poll.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    /// HTTP status code.
    pub status: u16,
    pub body: Vec<u8>,
}

impl TransportResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Errors raised before a response status is available.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The form action could not be turned into a URL.
    #[error("Invalid form action '{endpoint}': {reason}")]
    InvalidEndpoint { endpoint: String, reason: String },

    /// Connection, timeout or body read failure.
    #[error("{0}")]
    Request(#[from] reqwest::Error),

    /// Failure reported by an injected transport.
    #[error("{0}")]
    Other(String),
}

/// Capability to issue one submission request.
#[async_trait]
pub trait Transport: Send + Sync {
    /// `GET <endpoint>?fio=..&email=..&phone=..`.
    async fn fetch(
        &self,
        endpoint: &str,
        payload: &SubmissionPayload,
    ) -> Result<TransportResponse, TransportError>;
}
