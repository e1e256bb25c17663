//! DICOM Structured Reporting content model
//!
//! This crate defines the data model shared by every SR crate:
//!
//! - `ContentItem` / `ContentValue`: the recursive content tree, one enum
//!   variant per value type
//! - `CodedConcept`: coded entries with short, long, or URN code values
//! - `SrDocument`: document identifiers, header, and the root container
//! - `DocumentType` and the profile table of permitted value types
//! - `codes`: well-known concepts (titles, section headings, TID 1500,
//!   CAD, and key object selection codes)
//!
//! Everything here is a plain value type. Decoding and encoding live in
//! `octofhir-sr-codec`, traversal in `octofhir-sr-query`.

pub mod codes;
mod concept;
mod datetime;
mod document;
mod item;
mod profile;
mod types;
pub mod uid;

pub use codes::CodeConstant;
pub use concept::{CodeIdentity, CodedConcept};
pub use datetime::{DicomDate, DicomDateTime, DicomTime};
pub use document::{Patient, Series, SrDocument, Study, VerifyingObserver};
pub use item::{
    Container, ContentItem, ContentValue, NumericValue, ReferencedSop, SpatialCoordinates,
    SpatialCoordinates3D, TemplateReference, TemporalCoordinates, TemporalPositions,
};
pub use profile::{DocumentType, permits};
pub use types::{
    CompletionFlag, Continuity, GraphicType, GraphicType3D, PreliminaryFlag, RelationshipType,
    TemporalRangeType, ValueType, VerificationFlag,
};

/// Default bound on content tree depth
pub const DEFAULT_MAX_DEPTH: usize = 100;
