//! Document profiles
//!
//! Each SR IOD restricts the value types a document may contain and adds
//! structural rules. The tables here are pure lookups; enforcement lives in
//! the builder and in document validation.

use crate::ValueType;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// SR document types and their SOP classes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DocumentType {
    BasicText,
    Enhanced,
    Comprehensive,
    Comprehensive3D,
    KeyObjectSelection,
    MammographyCad,
    ChestCad,
    ColonCad,
    /// TID 1500 Measurement Report, carried as Comprehensive SR
    MeasurementReport,
}

impl DocumentType {
    pub const ALL: &'static [DocumentType] = &[
        DocumentType::BasicText,
        DocumentType::Enhanced,
        DocumentType::Comprehensive,
        DocumentType::Comprehensive3D,
        DocumentType::KeyObjectSelection,
        DocumentType::MammographyCad,
        DocumentType::ChestCad,
        DocumentType::ColonCad,
        DocumentType::MeasurementReport,
    ];

    /// SOP Class UID written for documents of this type
    pub const fn sop_class_uid(&self) -> &'static str {
        match self {
            DocumentType::BasicText => "1.2.840.10008.5.1.4.1.1.88.11",
            DocumentType::Enhanced => "1.2.840.10008.5.1.4.1.1.88.22",
            DocumentType::Comprehensive | DocumentType::MeasurementReport => "1.2.840.10008.5.1.4.1.1.88.33",
            DocumentType::Comprehensive3D => "1.2.840.10008.5.1.4.1.1.88.34",
            DocumentType::KeyObjectSelection => "1.2.840.10008.5.1.4.1.1.88.59",
            DocumentType::MammographyCad => "1.2.840.10008.5.1.4.1.1.88.50",
            DocumentType::ChestCad => "1.2.840.10008.5.1.4.1.1.88.65",
            DocumentType::ColonCad => "1.2.840.10008.5.1.4.1.1.88.69",
        }
    }

    /// Map a SOP Class UID back to a document type
    ///
    /// Comprehensive SR maps to `Comprehensive`; a measurement report is told
    /// apart by its title, see `SrDocument::document_type`.
    pub fn from_sop_class_uid(uid: &str) -> Option<Self> {
        let uid = uid.trim_end_matches(['\0', ' ']);
        Self::ALL
            .iter()
            .copied()
            .filter(|t| *t != DocumentType::MeasurementReport)
            .find(|t| t.sop_class_uid() == uid)
    }

    /// Short name used on the command line, e.g. `basic-text`
    pub const fn name(&self) -> &'static str {
        match self {
            DocumentType::BasicText => "basic-text",
            DocumentType::Enhanced => "enhanced",
            DocumentType::Comprehensive => "comprehensive",
            DocumentType::Comprehensive3D => "comprehensive-3d",
            DocumentType::KeyObjectSelection => "key-object-selection",
            DocumentType::MammographyCad => "mammography-cad",
            DocumentType::ChestCad => "chest-cad",
            DocumentType::ColonCad => "colon-cad",
            DocumentType::MeasurementReport => "measurement-report",
        }
    }

    /// Modality (0008,0060) for documents of this type
    pub const fn modality(&self) -> &'static str {
        match self {
            DocumentType::KeyObjectSelection => "KO",
            _ => "SR",
        }
    }

    /// Check if a value type may appear in documents of this type
    pub fn permits(&self, value_type: ValueType) -> bool {
        use ValueType as V;
        match self {
            DocumentType::BasicText => matches!(
                value_type,
                V::Text | V::Code | V::Container | V::PersonName | V::UidReference | V::Date | V::Time | V::DateTime
            ),
            DocumentType::Enhanced => value_type != V::SpatialCoordinates3D,
            DocumentType::KeyObjectSelection => matches!(
                value_type,
                V::Text | V::Code | V::Container | V::UidReference | V::Image | V::Composite
            ),
            DocumentType::Comprehensive
            | DocumentType::Comprehensive3D
            | DocumentType::MammographyCad
            | DocumentType::ChestCad
            | DocumentType::ColonCad
            | DocumentType::MeasurementReport => true,
        }
    }

    /// Every SCOORD3D needs a frame of reference
    pub const fn requires_frame_of_reference(&self) -> bool {
        matches!(self, DocumentType::Comprehensive3D)
    }

    /// The root container must carry a concept name
    pub const fn requires_title(&self) -> bool {
        matches!(self, DocumentType::KeyObjectSelection)
    }

    /// Measurement groups need a tracking identifier and tracking UID
    pub const fn requires_tracking(&self) -> bool {
        matches!(self, DocumentType::MeasurementReport)
    }

    /// Check if this is one of the CAD document types
    pub const fn is_cad(&self) -> bool {
        matches!(
            self,
            DocumentType::MammographyCad | DocumentType::ChestCad | DocumentType::ColonCad
        )
    }
}

/// Check if a value type may appear in documents of a type
pub fn permits(document_type: DocumentType, value_type: ValueType) -> bool {
    document_type.permits(value_type)
}

impl fmt::Display for DocumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DocumentType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|t| t.name().eq_ignore_ascii_case(s) || t.sop_class_uid() == s)
            .ok_or_else(|| format!("unknown document type '{}'", s))
    }
}
