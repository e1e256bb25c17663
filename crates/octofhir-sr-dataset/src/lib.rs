//! Tagged attribute datasets for DICOM SR
//!
//! This crate is the boundary between the SR content tree and the outside
//! world. It provides:
//!
//! - `DataSet`: an ordered map of tags to typed elements, with typed views
//!   for lookup and helpers for construction
//! - `json`: reading and writing the DICOM JSON Model (PS3.18 Annex F)
//! - `encoding`: PS3.5 value encoding (explicit VR little endian)
//! - `numeric`: decimal string (DS) parsing and formatting
//! - `tags`: the attribute tags the SR crates rely on
//!
//! # Example
//!
//! ```ignore
//! use octofhir_sr_dataset::{DataSet, Vr, tags};
//!
//! let mut ds = DataSet::new();
//! ds.put_str(tags::VALUE_TYPE, Vr::CS, "CONTAINER");
//! assert_eq!(ds.string(tags::VALUE_TYPE), Some("CONTAINER"));
//! ```

mod dataset;
pub mod encoding;
mod error;
pub mod json;
pub mod numeric;
mod tag;
pub mod tags;
mod value;
mod vr;

pub use dataset::DataSet;
pub use error::{DataSetError, DataSetResult};
pub use tag::Tag;
pub use value::{Element, Value};
pub use vr::Vr;
