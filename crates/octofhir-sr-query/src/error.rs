//! Path errors

use octofhir_sr_diagnostics::{Diagnostic, ErrorCode, SR0300, SR0301};
use thiserror::Error;

/// Errors raised while parsing SRPath text
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathError {
    #[error("Invalid path syntax at offset {offset}: {message}")]
    Syntax { offset: usize, message: String },

    #[error("Invalid path index '{text}' at offset {offset}")]
    InvalidIndex { offset: usize, text: String },
}

impl PathError {
    /// Get the error code
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Syntax { .. } => SR0300,
            Self::InvalidIndex { .. } => SR0301,
        }
    }

    /// Byte offset of the offending input
    pub fn offset(&self) -> usize {
        match self {
            Self::Syntax { offset, .. } | Self::InvalidIndex { offset, .. } => *offset,
        }
    }

    /// Convert to a diagnostic
    pub fn to_diagnostic(&self) -> Diagnostic {
        Diagnostic::error(self.code(), self.to_string())
    }
}
