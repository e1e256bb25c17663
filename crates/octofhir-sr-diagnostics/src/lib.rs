//! DICOM SR diagnostics
//!
//! This crate provides the error reporting infrastructure shared by the SR
//! crates: stable error codes, content item positions and diagnostics.

mod diagnostic;
mod error_code;
mod position;

pub use diagnostic::*;
pub use error_code::*;
pub use position::*;
