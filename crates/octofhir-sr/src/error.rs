//! Crate-level error type

use octofhir_sr_builder::AssemblyError;
use octofhir_sr_codec::{EncodeError, ParseError};
use octofhir_sr_dataset::DataSetError;
use octofhir_sr_diagnostics::{Diagnostic, ErrorCode};
use octofhir_sr_extract::ExtractionError;
use octofhir_sr_query::PathError;
use thiserror::Error;

/// Any error raised by the SR crates
#[derive(Debug, Error)]
pub enum SrError {
    #[error(transparent)]
    DataSet(#[from] DataSetError),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Encode(#[from] EncodeError),

    #[error(transparent)]
    Assembly(#[from] AssemblyError),

    #[error(transparent)]
    Extraction(#[from] ExtractionError),

    #[error(transparent)]
    Path(#[from] PathError),
}

impl SrError {
    /// Get the error code
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::DataSet(e) => e.code(),
            Self::Parse(e) => e.code(),
            Self::Encode(e) => e.code(),
            Self::Assembly(e) => e.code(),
            Self::Extraction(e) => e.code(),
            Self::Path(e) => e.code(),
        }
    }

    /// Convert to a diagnostic
    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            Self::Parse(e) => e.to_diagnostic(),
            Self::Assembly(e) => e.to_diagnostic(),
            Self::Extraction(e) => e.to_diagnostic(),
            Self::Path(e) => e.to_diagnostic(),
            Self::Encode(EncodeError::MaxDepthExceeded { position, .. }) => {
                Diagnostic::error(self.code(), self.to_string()).with_position(position.clone())
            }
            Self::DataSet(_) => Diagnostic::error(self.code(), self.to_string()),
        }
    }
}

/// Result type using [`SrError`]
pub type Result<T> = std::result::Result<T, SrError>;
