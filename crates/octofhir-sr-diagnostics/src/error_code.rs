//! SR error codes following a structured numbering system
//!
//! Error code ranges:
//! - SR0001-SR0099: Decode errors (dataset to content tree)
//! - SR0100-SR0199: Assembly errors (builder finalize, profile validation)
//! - SR0200-SR0299: Extraction errors (domain views)
//! - SR0300-SR0399: Path errors (SRPath syntax)
//! - SR0400-SR0499: Dataset errors (DICOM JSON, value encoding)

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::LazyLock;

/// Error code identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ErrorCode(u16);

impl ErrorCode {
    /// Create a new error code
    pub const fn new(code: u16) -> Self {
        Self(code)
    }

    /// Get the numeric code
    pub const fn code(&self) -> u16 {
        self.0
    }

    /// Get error information for this code
    pub fn info(&self) -> &'static ErrorInfo {
        ERROR_INFO.get(&self.0).unwrap_or(&UNKNOWN_ERROR)
    }

    /// Check if this is a decode error (0001-0099)
    pub const fn is_decode_error(&self) -> bool {
        self.0 >= 1 && self.0 < 100
    }

    /// Check if this is an assembly error (0100-0199)
    pub const fn is_assembly_error(&self) -> bool {
        self.0 >= 100 && self.0 < 200
    }

    /// Check if this is an extraction error (0200-0299)
    pub const fn is_extraction_error(&self) -> bool {
        self.0 >= 200 && self.0 < 300
    }

    /// Check if this is a path error (0300-0399)
    pub const fn is_path_error(&self) -> bool {
        self.0 >= 300 && self.0 < 400
    }

    /// Check if this is a dataset error (0400-0499)
    pub const fn is_dataset_error(&self) -> bool {
        self.0 >= 400 && self.0 < 500
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SR{:04}", self.0)
    }
}

/// Information about an error code
#[derive(Debug, Clone)]
pub struct ErrorInfo {
    /// Short description of the error
    pub description: &'static str,
    /// Detailed help text
    pub help: Option<&'static str>,
}

impl ErrorInfo {
    const fn new(description: &'static str) -> Self {
        Self {
            description,
            help: None,
        }
    }

    const fn with_help(mut self, help: &'static str) -> Self {
        self.help = Some(help);
        self
    }
}

static UNKNOWN_ERROR: ErrorInfo = ErrorInfo::new("Unknown error");

static ERROR_INFO: LazyLock<HashMap<u16, ErrorInfo>> = LazyLock::new(|| {
    let mut map = HashMap::new();

    // Decode errors (0001-0099)
    map.insert(1, ErrorInfo::new("Missing required attribute"));
    map.insert(2, ErrorInfo::new("Invalid SOP identifier")
        .with_help("UIDs are dot-separated numeric components of at most 64 characters"));
    map.insert(3, ErrorInfo::new("Unknown value type"));
    map.insert(4, ErrorInfo::new("Invalid content sequence"));
    map.insert(5, ErrorInfo::new("Maximum content tree depth exceeded")
        .with_help("Raise the maximum depth only for trusted input"));
    map.insert(6, ErrorInfo::new("Invalid coded concept")
        .with_help("A code sequence item needs a coding scheme and one of code value, long code value or URN code value"));
    map.insert(7, ErrorInfo::new("Invalid graphic data"));
    map.insert(8, ErrorInfo::new("Invalid referenced SOP sequence"));
    map.insert(9, ErrorInfo::new("Invalid attribute value"));

    // Assembly errors (0100-0199)
    map.insert(100, ErrorInfo::new("Value type not permitted by document profile"));
    map.insert(101, ErrorInfo::new("Missing frame of reference UID")
        .with_help("Set the UID on the SCOORD3D item or a document-level default"));
    map.insert(102, ErrorInfo::new("Missing tracking identifier"));
    map.insert(103, ErrorInfo::new("Missing tracking UID"));
    map.insert(104, ErrorInfo::new("Document validation failed"));

    // Extraction errors (0200-0299)
    map.insert(200, ErrorInfo::new("Invalid document type"));
    map.insert(201, ErrorInfo::new("Missing required element"));
    map.insert(202, ErrorInfo::new("Invalid document structure"));

    // Path errors (0300-0399)
    map.insert(300, ErrorInfo::new("Invalid path syntax")
        .with_help("Paths look like /Findings/Finding[1]"));
    map.insert(301, ErrorInfo::new("Invalid path index"));

    // Dataset errors (0400-0499)
    map.insert(400, ErrorInfo::new("Malformed DICOM JSON"));
    map.insert(401, ErrorInfo::new("Invalid tag"));
    map.insert(402, ErrorInfo::new("Unsupported value representation"));
    map.insert(403, ErrorInfo::new("Invalid element value"));

    map
});

// Decode errors
pub const SR0001: ErrorCode = ErrorCode::new(1);
pub const SR0002: ErrorCode = ErrorCode::new(2);
pub const SR0003: ErrorCode = ErrorCode::new(3);
pub const SR0004: ErrorCode = ErrorCode::new(4);
pub const SR0005: ErrorCode = ErrorCode::new(5);
pub const SR0006: ErrorCode = ErrorCode::new(6);
pub const SR0007: ErrorCode = ErrorCode::new(7);
pub const SR0008: ErrorCode = ErrorCode::new(8);
pub const SR0009: ErrorCode = ErrorCode::new(9);

// Assembly errors
pub const SR0100: ErrorCode = ErrorCode::new(100);
pub const SR0101: ErrorCode = ErrorCode::new(101);
pub const SR0102: ErrorCode = ErrorCode::new(102);
pub const SR0103: ErrorCode = ErrorCode::new(103);
pub const SR0104: ErrorCode = ErrorCode::new(104);

// Extraction errors
pub const SR0200: ErrorCode = ErrorCode::new(200);
pub const SR0201: ErrorCode = ErrorCode::new(201);
pub const SR0202: ErrorCode = ErrorCode::new(202);

// Path errors
pub const SR0300: ErrorCode = ErrorCode::new(300);
pub const SR0301: ErrorCode = ErrorCode::new(301);

// Dataset errors
pub const SR0400: ErrorCode = ErrorCode::new(400);
pub const SR0401: ErrorCode = ErrorCode::new(401);
pub const SR0402: ErrorCode = ErrorCode::new(402);
pub const SR0403: ErrorCode = ErrorCode::new(403);
