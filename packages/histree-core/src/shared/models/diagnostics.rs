//! Non-fatal diagnostics
//!
//! Per-file failures are isolated: recovery events, duplicate-signature
//! conflicts and match ambiguities surface as structured diagnostics for the
//! external reporting collaborator, never as panics.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Severity {
    Warning,
    Error,
}

/// Structured, non-fatal report attached to one source file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub file: String,
    pub offset: Option<usize>,
    pub message: String,
}

impl Diagnostic {
    pub fn warning(file: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            file: file.into(),
            offset: None,
            message: message.into(),
        }
    }

    pub fn error(file: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            file: file.into(),
            offset: None,
            message: message.into(),
        }
    }

    pub fn at(mut self, offset: usize) -> Self {
        self.offset = Some(offset);
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let severity = match self.severity {
            Severity::Warning => "warning",
            Severity::Error => "error",
        };
        match self.offset {
            Some(offset) => write!(f, "{}: {}@{}: {}", severity, self.file, offset, self.message),
            None => write!(f, "{}: {}: {}", severity, self.file, self.message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let diag = Diagnostic::warning("A.java", "skipped malformed member").at(42);
        assert_eq!(
            diag.to_string(),
            "warning: A.java@42: skipped malformed member"
        );
    }
}
