//! Diagnostic messages

use crate::{ErrorCode, ItemPosition};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Diagnostic severity level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Severity {
    /// Error - the document cannot be used as-is
    Error,
    /// Warning - the document deviates from its profile but is usable
    Warning,
    /// Information - informational message
    Info,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
            Severity::Info => write!(f, "info"),
        }
    }
}

/// A diagnostic message with its content item position
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Severity level
    pub severity: Severity,
    /// Error code
    pub code: ErrorCode,
    /// Human-readable message
    pub message: String,
    /// Position of the offending content item
    pub position: Option<ItemPosition>,
    /// Additional context or help
    pub help: Option<String>,
}

impl Diagnostic {
    /// Create a new error diagnostic
    pub fn error(code: ErrorCode, message: impl Into<String>) -> Self {
        Self::new(Severity::Error, code, message)
    }

    /// Create a new warning diagnostic
    pub fn warning(code: ErrorCode, message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, code, message)
    }

    /// Create a new informational diagnostic
    pub fn info(code: ErrorCode, message: impl Into<String>) -> Self {
        Self::new(Severity::Info, code, message)
    }

    fn new(severity: Severity, code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            severity,
            code,
            message: message.into(),
            position: None,
            help: code.info().help.map(str::to_string),
        }
    }

    /// Set the content item position
    pub fn with_position(mut self, position: ItemPosition) -> Self {
        self.position = Some(position);
        self
    }

    /// Set help text
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    /// Check if this diagnostic is an error
    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }

    /// Render the diagnostic with terminal colors
    #[cfg(feature = "colored")]
    pub fn render_colored(&self) -> String {
        use colored::Colorize;

        let severity = match self.severity {
            Severity::Error => self.severity.to_string().red().bold(),
            Severity::Warning => self.severity.to_string().yellow().bold(),
            Severity::Info => self.severity.to_string().blue().bold(),
        };
        let mut out = format!("{}[{}]: {}", severity, self.code, self.message);
        if let Some(position) = &self.position {
            out.push_str(&format!(" {} {}", "at item".dimmed(), position.to_string().cyan()));
        }
        if let Some(help) = &self.help {
            out.push_str(&format!("\n  {} {}", "help:".green(), help));
        }
        out
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} - {}", self.severity, self.code, self.message)?;
        if let Some(position) = &self.position {
            write!(f, " at item {}", position)?;
        }
        Ok(())
    }
}

/// Count the error diagnostics in a list
pub fn error_count(diagnostics: &[Diagnostic]) -> usize {
    diagnostics.iter().filter(|d| d.is_error()).count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{SR0100, SR0101};

    #[test]
    fn test_diagnostic_display() {
        let diag = Diagnostic::error(SR0100, "NUM not permitted in Basic Text SR")
            .with_position(ItemPosition::root().child(3));

        let text = diag.to_string();
        assert!(text.contains("SR0100"));
        assert!(text.contains("at item 1.3"));
    }

    #[test]
    fn test_help_from_error_info() {
        let diag = Diagnostic::error(SR0101, "missing");
        assert!(diag.help.is_some());
        let diag = diag.with_help("custom");
        assert_eq!(diag.help.as_deref(), Some("custom"));
    }

    #[test]
    fn test_error_count() {
        let diags = vec![
            Diagnostic::error(SR0100, "a"),
            Diagnostic::warning(SR0100, "b"),
            Diagnostic::error(SR0101, "c"),
        ];
        assert_eq!(error_count(&diags), 2);
    }
}
