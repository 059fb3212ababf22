//! State of the identity form.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::mvi::UiState;

/// Endpoint used until config or the caller sets another one.
pub const DEFAULT_FORM_ACTION: &str = "api/success.json";

/// The three user-editable fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Fio,
    Email,
    Phone,
}

impl Field {
    pub const ALL: [Field; 3] = [Field::Fio, Field::Email, Field::Phone];

    /// Fixed field name used on the wire and in error reports.
    pub fn name(self) -> &'static str {
        match self {
            Field::Fio => "fio",
            Field::Email => "email",
            Field::Phone => "phone",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

/// Submission lifecycle marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormStatus {
    #[default]
    Unsubmitted,
    Progress,
    Success,
    Error,
}

impl FormStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            FormStatus::Unsubmitted => "",
            FormStatus::Progress => "progress",
            FormStatus::Success => "success",
            FormStatus::Error => "error",
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, FormStatus::Success | FormStatus::Error)
    }
}

impl fmt::Display for FormStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Error for a status string the server is not allowed to send.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unexpected submission status '{0}'.")]
pub struct UnknownStatus(pub String);

impl FromStr for FormStatus {
    type Err = UnknownStatus;

    /// Parses a status reported by the server. The empty string is the
    /// client-only "unsubmitted" marker and is rejected.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "progress" => Ok(FormStatus::Progress),
            "success" => Ok(FormStatus::Success),
            "error" => Ok(FormStatus::Error),
            other => Err(UnknownStatus(other.to_string())),
        }
    }
}

/// Snapshot of the whole form.
#[derive(Debug, Clone, PartialEq)]
pub struct FormState {
    pub fio: String,
    pub email: String,
    pub phone: String,
    pub fio_is_valid: bool,
    pub email_is_valid: bool,
    pub phone_is_valid: bool,
    pub form_action: String,
    pub form_is_submitted: bool,
    pub form_status: FormStatus,
    /// Only non-empty while `form_status` is `Error`.
    pub error_message: String,
    /// Milliseconds to wait before the next poll.
    pub retry_timeout: u64,
    /// Generation of the current submission. Bumped by every submit request
    /// and every reset; answers for an older generation are dropped.
    pub attempt: u64,
}

impl Default for FormState {
    fn default() -> Self {
        Self::with_action(DEFAULT_FORM_ACTION)
    }
}

impl UiState for FormState {}

impl FormState {
    /// Default state targeting the given endpoint.
    pub fn with_action(action: impl Into<String>) -> Self {
        Self {
            fio: String::new(),
            email: String::new(),
            phone: String::new(),
            fio_is_valid: true,
            email_is_valid: true,
            phone_is_valid: true,
            form_action: action.into(),
            form_is_submitted: false,
            form_status: FormStatus::Unsubmitted,
            error_message: String::new(),
            retry_timeout: 0,
            attempt: 0,
        }
    }

    pub fn value(&self, field: Field) -> &str {
        match field {
            Field::Fio => &self.fio,
            Field::Email => &self.email,
            Field::Phone => &self.phone,
        }
    }

    pub fn is_valid(&self, field: Field) -> bool {
        match field {
            Field::Fio => self.fio_is_valid,
            Field::Email => self.email_is_valid,
            Field::Phone => self.phone_is_valid,
        }
    }

    pub fn data(&self) -> FormData {
        FormData {
            fio: self.fio.clone(),
            email: self.email.clone(),
            phone: self.phone.clone(),
        }
    }
}

/// The user-entered values, as exposed by the public API.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FormData {
    pub fio: String,
    pub email: String,
    pub phone: String,
}

/// Partial update of the user-entered values; `None` keeps the current value.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FormDataPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fio: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

impl FormDataPatch {
    /// Extracts string-valued `fio`/`email`/`phone` keys from a JSON value.
    ///
    /// Returns `None` for anything that is not a JSON object; keys holding
    /// non-string values are skipped.
    pub fn from_json(value: &serde_json::Value) -> Option<Self> {
        let object = value.as_object()?;
        let text = |key: &str| object.get(key).and_then(|v| v.as_str()).map(str::to_string);
        Some(Self {
            fio: text("fio"),
            email: text("email"),
            phone: text("phone"),
        })
    }
}

impl From<FormData> for FormDataPatch {
    fn from(data: FormData) -> Self {
        Self {
            fio: Some(data.fio),
            email: Some(data.email),
            phone: Some(data.phone),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn default_state_is_valid_and_unsubmitted() {
        let state = FormState::default();
        assert!(state.fio_is_valid && state.email_is_valid && state.phone_is_valid);
        assert!(!state.form_is_submitted);
        assert_eq!(state.form_status, FormStatus::Unsubmitted);
        assert_eq!(state.form_action, DEFAULT_FORM_ACTION);
        assert_eq!(state.retry_timeout, 0);
        assert!(state.error_message.is_empty());
    }

    #[test]
    fn status_parses_server_values_only() {
        assert_eq!("progress".parse::<FormStatus>(), Ok(FormStatus::Progress));
        assert_eq!("success".parse::<FormStatus>(), Ok(FormStatus::Success));
        assert_eq!("error".parse::<FormStatus>(), Ok(FormStatus::Error));
        assert_eq!(
            "".parse::<FormStatus>(),
            Err(UnknownStatus(String::new()))
        );
        assert!("pending".parse::<FormStatus>().is_err());
    }

    #[test]
    fn status_terminality() {
        assert!(!FormStatus::Unsubmitted.is_terminal());
        assert!(!FormStatus::Progress.is_terminal());
        assert!(FormStatus::Success.is_terminal());
        assert!(FormStatus::Error.is_terminal());
    }

    #[test]
    fn patch_from_json_takes_string_keys() {
        let patch = FormDataPatch::from_json(&json!({"fio": "Y", "phone": 42})).unwrap();
        assert_eq!(patch.fio.as_deref(), Some("Y"));
        assert_eq!(patch.email, None);
        assert_eq!(patch.phone, None);
    }

    #[test]
    fn patch_from_json_rejects_non_objects() {
        assert!(FormDataPatch::from_json(&json!("not an object")).is_none());
        assert!(FormDataPatch::from_json(&json!(null)).is_none());
        assert!(FormDataPatch::from_json(&json!(["fio"])).is_none());
    }

    #[test]
    fn field_names_are_fixed() {
        let names: Vec<_> = Field::ALL.iter().map(|f| f.name()).collect();
        assert_eq!(names, ["fio", "email", "phone"]);
    }
}
