//! Domain views over DICOM SR documents
//!
//! Each view borrows a finalized document and reads it through the
//! navigator:
//!
//! - [`cad_findings`]: Mammography, Chest and Colon CAD findings
//! - [`key_objects`]: key object selection title, description and references
//! - [`measurement_groups`]: TID 1500 measurement groups
//!
//! Views serialize with serde, so they can be printed as JSON directly.

mod cad;
mod error;
mod kos;
mod scope;
mod tid1500;

pub use cad::{CadFinding, CadFindings, FindingKind, cad_findings};
pub use error::{ExtractionError, ExtractionResult};
pub use kos::{KeyObject, KeyObjectSelection, key_objects};
pub use tid1500::{GroupMeasurement, MeasurementGroupView, MeasurementReportView, measurement_groups};
