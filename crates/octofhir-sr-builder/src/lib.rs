//! DICOM SR document assembly
//!
//! - [`DocumentBuilder`]: value-typed builder, checked against the document
//!   profile on [`DocumentBuilder::finalize`]
//! - [`MeasurementReportBuilder`]: TID 1500 Measurement Report skeleton
//! - [`validate_document`]: the same checks over a decoded document,
//!   reported as diagnostics
//!
//! Instance UIDs left unset are generated in the `2.25` UUID-derived form.

mod document;
mod error;
mod measurement;
mod uid;
mod validate;

pub use document::DocumentBuilder;
pub use error::{AssemblyError, AssemblyResult};
pub use measurement::{MeasurementGroup, MeasurementReportBuilder};
pub use uid::generate_uid;
pub use validate::{check_tree, validate_document, validate_document_with};
