//! Assembly errors

use octofhir_sr_diagnostics::{
    Diagnostic, ErrorCode, ItemPosition, SR0100, SR0101, SR0102, SR0103, SR0104,
};
use octofhir_sr_model::{DocumentType, ValueType};
use thiserror::Error;

/// Result type for assembly
pub type AssemblyResult<T> = Result<T, AssemblyError>;

/// Errors raised by `finalize` and document validation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AssemblyError {
    #[error("{value_type} is not permitted in {document_type} documents (item {position})")]
    UnsupportedValueType {
        value_type: ValueType,
        document_type: DocumentType,
        position: ItemPosition,
    },

    #[error("SCOORD3D item {position} has no frame of reference UID")]
    MissingFrameOfReferenceUid { position: ItemPosition },

    #[error("Measurement group {position} has no tracking identifier")]
    MissingTrackingIdentifier { position: ItemPosition },

    #[error("Measurement group {position} has no tracking UID")]
    MissingTrackingUid { position: ItemPosition },

    #[error("{message}")]
    ValidationError {
        message: String,
        position: Option<ItemPosition>,
    },
}

impl AssemblyError {
    pub fn validation(message: impl Into<String>, position: Option<&ItemPosition>) -> Self {
        Self::ValidationError {
            message: message.into(),
            position: position.cloned(),
        }
    }

    /// Get the error code
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::UnsupportedValueType { .. } => SR0100,
            Self::MissingFrameOfReferenceUid { .. } => SR0101,
            Self::MissingTrackingIdentifier { .. } => SR0102,
            Self::MissingTrackingUid { .. } => SR0103,
            Self::ValidationError { .. } => SR0104,
        }
    }

    /// Content item the error refers to
    pub fn position(&self) -> Option<&ItemPosition> {
        match self {
            Self::UnsupportedValueType { position, .. }
            | Self::MissingFrameOfReferenceUid { position }
            | Self::MissingTrackingIdentifier { position }
            | Self::MissingTrackingUid { position } => Some(position),
            Self::ValidationError { position, .. } => position.as_ref(),
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
