use serde::{Deserialize, Serialize};

use crate::form::DEFAULT_FORM_ACTION;

/// Root configuration container.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub form: FormConfig,
    #[serde(default)]
    pub http: HttpConfig,
}

/// Where the form is submitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormConfig {
    /// Initial form action (default: "api/success.json").
    #[serde(default = "default_action")]
    pub action: String,
    /// Base URL that relative form actions are resolved against.
    #[serde(default)]
    pub base_url: Option<String>,
}

/// HTTP client settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Timeout for a single poll request in seconds (default: 30).
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u32,
    /// Connection timeout in seconds (default: 5).
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_seconds: u32,
}

fn default_action() -> String {
    DEFAULT_FORM_ACTION.to_string()
}

fn default_timeout() -> u32 {
    30
}

fn default_connect_timeout() -> u32 {
    5
}

impl Default for FormConfig {
    fn default() -> Self {
        Self {
            action: default_action(),
            base_url: None,
        }
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: default_timeout(),
            connect_timeout_seconds: default_connect_timeout(),
        }
    }
}
