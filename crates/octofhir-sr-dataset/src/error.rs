//! Dataset errors

use crate::{Tag, Vr};
use octofhir_sr_diagnostics::{ErrorCode, SR0400, SR0401, SR0402, SR0403};
use thiserror::Error;

/// Result type for dataset operations
pub type DataSetResult<T> = Result<T, DataSetError>;

/// Errors raised while reading or encoding datasets
#[derive(Debug, Error)]
pub enum DataSetError {
    /// The input is not valid JSON or not shaped like the DICOM JSON Model
    #[error("Malformed DICOM JSON: {message}")]
    MalformedJson { message: String },

    /// JSON parse error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A key is not an 8-digit hexadecimal tag
    #[error("Invalid tag: '{key}'")]
    InvalidTag { key: String },

    /// A VR name is unknown or cannot be carried in this form
    #[error("Unsupported VR '{vr}' for {tag}")]
    UnsupportedVr { tag: Tag, vr: String },

    /// An element value does not fit its VR
    #[error("Invalid value for {tag} ({vr}): {message}")]
    InvalidValue { tag: Tag, vr: Vr, message: String },
}

impl DataSetError {
    /// Create a malformed JSON error
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedJson {
            message: message.into(),
        }
    }

    /// Create an invalid value error
    pub fn invalid_value(tag: Tag, vr: Vr, message: impl Into<String>) -> Self {
        Self::InvalidValue {
            tag,
            vr,
            message: message.into(),
        }
    }

    /// Get the error code
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::MalformedJson { .. } | Self::Json(_) => SR0400,
            Self::InvalidTag { .. } => SR0401,
            Self::UnsupportedVr { .. } => SR0402,
            Self::InvalidValue { .. } => SR0403,
        }
    }
}
