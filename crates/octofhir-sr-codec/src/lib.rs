//! DICOM SR decoder and encoder
//!
//! Converts between a tagged attribute [`DataSet`] and an [`SrDocument`]:
//!
//! - [`decode`] / [`decode_with`]: dataset to document, strict or lenient
//! - [`encode`] / [`encode_with`]: document to dataset
//!
//! Decoding is bounded by `DecodeOptions::max_depth`; exceeding it is an
//! error in both modes. Lenient mode substitutes placeholders for missing or
//! invalid values and logs each substitution at `warn` level.
//!
//! # Example
//!
//! ```ignore
//! use octofhir_sr_codec::{DecodeOptions, decode_with, encode};
//!
//! let doc = decode_with(&dataset, &DecodeOptions::lenient())?;
//! let normalized = encode(&doc)?;
//! ```
//!
//! [`DataSet`]: octofhir_sr_dataset::DataSet
//! [`SrDocument`]: octofhir_sr_model::SrDocument

mod decode;
mod encode;
mod error;
mod options;

pub use decode::{decode, decode_item, decode_with};
pub use encode::{encode, encode_item, encode_with};
pub use error::{EncodeError, EncodeResult, ParseError, ParseResult};
pub use options::{DecodeMode, DecodeOptions, EncodeOptions};
