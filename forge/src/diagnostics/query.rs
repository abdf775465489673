//! The message query API (`spec.md` §4.C "query").

use super::{Message, Severity};

/// Selects messages by optional severity, code, text fragment, line or
/// source path. An empty query (all fields `None`) matches nothing —
/// `spec.md` §8 scenario 5 is explicit that "empty `{}` returns zero".
#[derive(Debug, Clone, Default)]
pub struct MessageQuery {
    pub with_severity: Option<Severity>,
    pub with_code: Option<&'static str>,
    pub with_text: Option<String>,
    pub on_line: Option<u32>,
    pub from_path: Option<String>,
}

impl MessageQuery {
    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.with_severity = Some(severity);
        self
    }

    pub fn with_code(mut self, code: &'static str) -> Self {
        self.with_code = Some(code);
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.with_text = Some(text.into());
        self
    }

    pub fn on_line(mut self, line: u32) -> Self {
        self.on_line = Some(line);
        self
    }

    pub fn from_path(mut self, path: impl Into<String>) -> Self {
        self.from_path = Some(path.into());
        self
    }

    fn is_empty(&self) -> bool {
        self.with_severity.is_none()
            && self.with_code.is_none()
            && self.with_text.is_none()
            && self.on_line.is_none()
            && self.from_path.is_none()
    }

    pub fn matches(&self, message: &Message) -> bool {
        if self.is_empty() {
            return false;
        }

        if let Some(severity) = self.with_severity {
            if message.severity != severity {
                return false;
            }
        }

        if let Some(code) = self.with_code {
            if message.code != Some(code) {
                return false;
            }
        }

        if let Some(text) = &self.with_text {
            if !message.text.contains(text.as_str()) {
                return false;
            }
        }

        if let Some(line) = self.on_line {
            if message.source_range.as_ref().map(|r| r.start.line) != Some(line) {
                return false;
            }
        }

        if let Some(path) = &self.from_path {
            if message
                .source_range
                .as_ref()
                .map(|r| r.start.path.as_ref())
                != Some(path.as_str())
            {
                return false;
            }
        }

        true
    }
}
