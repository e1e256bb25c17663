//! Extraction errors

use octofhir_sr_diagnostics::{Diagnostic, ErrorCode, ItemPosition, SR0200, SR0201, SR0202};
use thiserror::Error;

/// Result type for extraction
pub type ExtractionResult<T> = Result<T, ExtractionError>;

/// Errors raised while building a domain view
///
/// The source document is never modified, whatever the outcome.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractionError {
    #[error("Expected a {expected} document, found {found}")]
    InvalidDocumentType { expected: &'static str, found: String },

    #[error("Required element '{element}' is missing")]
    MissingRequiredElement {
        element: String,
        position: Option<ItemPosition>,
    },

    #[error("Invalid structure at item {position}: {message}")]
    InvalidStructure { message: String, position: ItemPosition },
}

impl ExtractionError {
    pub fn missing(element: impl Into<String>, position: Option<&ItemPosition>) -> Self {
        Self::MissingRequiredElement {
            element: element.into(),
            position: position.cloned(),
        }
    }

    /// Get the error code
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::InvalidDocumentType { .. } => SR0200,
            Self::MissingRequiredElement { .. } => SR0201,
            Self::InvalidStructure { .. } => SR0202,
        }
    }

    pub fn position(&self) -> Option<&ItemPosition> {
        match self {
            Self::InvalidDocumentType { .. } => None,
            Self::MissingRequiredElement { position, .. } => position.as_ref(),
            Self::InvalidStructure { position, .. } => Some(position),
        }
    }

    /// Convert to a diagnostic
    pub fn to_diagnostic(&self) -> Diagnostic {
        let diagnostic = Diagnostic::error(self.code(), self.to_string());
        match self.position() {
            Some(position) => diagnostic.with_position(position.clone()),
            None => diagnostic,
        }
    }
}
