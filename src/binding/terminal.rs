use std::io::{self, Write};

use parking_lot::Mutex;

use crate::form::{Field, FormStatus};

use super::FormView;

/// Line-oriented [`FormView`] for terminals.
pub struct TerminalView {
    out: Mutex<Box<dyn Write + Send>>,
}

impl TerminalView {
    pub fn stdout() -> Self {
        Self::new(Box::new(io::stdout()))
    }

    pub fn new(out: Box<dyn Write + Send>) -> Self {
        Self {
            out: Mutex::new(out),
        }
    }

    fn line(&self, text: std::fmt::Arguments<'_>) {
        let mut out = self.out.lock();
        if let Err(e) = writeln!(out, "{}", text).and_then(|_| out.flush()) {
            tracing::warn!("Failed to write to terminal: {}", e);
        }
    }
}

impl FormView for TerminalView {
    fn set_field_value(&self, field: Field, value: &str) {
        self.line(format_args!("{:<6} {}", field, value));
    }

    fn set_field_invalid(&self, field: Field, invalid: bool) {
        if invalid {
            self.line(format_args!("{:<6} is invalid", field));
        } else {
            self.line(format_args!("{:<6} ok", field));
        }
    }

    fn set_form_action(&self, action: &str) {
        self.line(format_args!("action {}", action));
    }

    fn set_submit_disabled(&self, disabled: bool) {
        if disabled {
            self.line(format_args!("submitting..."));
        }
    }

    fn show_result(&self, status: FormStatus, text: &str) {
        match status {
            FormStatus::Unsubmitted => {}
            FormStatus::Progress => self.line(format_args!("[progress] waiting for server")),
            FormStatus::Success | FormStatus::Error => {
                self.line(format_args!("[{}] {}", status, text))
            }
        }
    }
}
