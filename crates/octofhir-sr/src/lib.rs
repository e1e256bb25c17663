//! DICOM Structured Reporting toolkit
//!
//! This crate ties the SR crates together:
//! - Reading DICOM JSON datasets into SR documents ([`read_json`])
//! - Profile validation and document assembly (`builder`)
//! - SRPath queries and traversal (`query`)
//! - CAD, key object and TID 1500 views (`extract`)
//! - Writing documents back to DICOM JSON ([`write_json`])
//!
//! # Example
//!
//! ```ignore
//! use octofhir_sr::{DecodeOptions, query::Navigator, read_json};
//!
//! let doc = read_json(&text, &DecodeOptions::lenient())?;
//! let findings = Navigator::new(&doc).resolve_str("/Findings")?;
//! ```

mod error;

// Re-export all public APIs from internal crates
pub use octofhir_sr_builder as builder;
pub use octofhir_sr_codec as codec;
pub use octofhir_sr_dataset as dataset;
pub use octofhir_sr_diagnostics as diagnostics;
pub use octofhir_sr_extract as extract;
pub use octofhir_sr_model as model;
pub use octofhir_sr_query as query;

// Convenience re-exports
pub use error::{Result, SrError};
pub use octofhir_sr_codec::{DecodeOptions, EncodeOptions, decode, decode_with, encode, encode_with};
pub use octofhir_sr_model::{ContentItem, DocumentType, SrDocument};

/// Decode a DICOM JSON dataset into a document
///
/// JSON nesting is bounded by what `options.max_depth` content levels need.
pub fn read_json(text: &str, options: &DecodeOptions) -> Result<SrDocument> {
    let max_nesting = dataset::json::nesting_for_depth(options.max_depth);
    let dataset = dataset::json::from_json_str_with_limit(text, max_nesting)?;
    Ok(decode_with(&dataset, options)?)
}

/// Encode a document as DICOM JSON
pub fn write_json(doc: &SrDocument, options: &EncodeOptions, pretty: bool) -> Result<String> {
    let dataset = encode_with(doc, options)?;
    Ok(dataset::json::to_json_string(&dataset, pretty)?)
}

// CLI module (only available with cli feature)
#[cfg(feature = "cli")]
pub mod cli;
