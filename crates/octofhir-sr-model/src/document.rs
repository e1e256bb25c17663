//! SR documents

use crate::codes;
use crate::{
    CodedConcept, CompletionFlag, ContentItem, DicomDate, DicomDateTime, DicomTime, DocumentType,
    PreliminaryFlag, VerificationFlag,
};
use serde::{Deserialize, Serialize};

/// Patient module attributes
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Patient {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub birth_date: Option<DicomDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sex: Option<String>,
}

/// General study module attributes
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Study {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<DicomDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<DicomTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accession_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub referring_physician: Option<String>,
}

/// SR document series module attributes
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Series {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Modality (0008,0060) as read; `SR` or `KO` when written
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modality: Option<String>,
}

/// Verifying Observer Sequence (0040,A073) item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifyingObserver {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organization: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub datetime: Option<DicomDateTime>,
}

/// A decoded or assembled SR document
///
/// The root item is always a container; its concept name is the document
/// title.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SrDocument {
    pub sop_class_uid: String,
    pub sop_instance_uid: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub study_instance_uid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub series_instance_uid: Option<String>,

    #[serde(default)]
    pub patient: Patient,
    #[serde(default)]
    pub study: Study,
    #[serde(default)]
    pub series: Series,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instance_number: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_date: Option<DicomDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_time: Option<DicomTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manufacturer: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completion: Option<CompletionFlag>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verification: Option<VerificationFlag>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preliminary: Option<PreliminaryFlag>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub verifying_observers: Vec<VerifyingObserver>,

    pub root: ContentItem,
}

impl SrDocument {
    /// Create a new document with empty header attributes
    pub fn new(sop_class_uid: impl Into<String>, sop_instance_uid: impl Into<String>, root: ContentItem) -> Self {
        Self {
            sop_class_uid: sop_class_uid.into(),
            sop_instance_uid: sop_instance_uid.into(),
            study_instance_uid: None,
            series_instance_uid: None,
            patient: Patient::default(),
            study: Study::default(),
            series: Series::default(),
            instance_number: None,
            content_date: None,
            content_time: None,
            manufacturer: None,
            completion: None,
            verification: None,
            preliminary: None,
            verifying_observers: Vec::new(),
            root,
        }
    }

    /// Document title: the concept name of the root container
    pub fn title(&self) -> Option<&CodedConcept> {
        self.root.concept_name.as_ref()
    }

    /// Depth of the deepest item; the root is at depth 0
    pub fn depth(&self) -> usize {
        self.root.subtree_depth()
    }

    /// Number of content items, not counting the root
    pub fn content_item_count(&self) -> usize {
        self.root.descendant_count()
    }

    /// Document type from the SOP class, refined by the title
    ///
    /// A Comprehensive SR titled "Imaging Measurement Report" is reported as
    /// a TID 1500 measurement report.
    pub fn document_type(&self) -> Option<DocumentType> {
        let doc_type = DocumentType::from_sop_class_uid(&self.sop_class_uid)?;
        if doc_type == DocumentType::Comprehensive
            && self.title().is_some_and(|t| t.is(&codes::IMAGING_MEASUREMENT_REPORT))
        {
            return Some(DocumentType::MeasurementReport);
        }
        Some(doc_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RelationshipType;
    use rust_decimal::Decimal;

    fn report() -> SrDocument {
        let root = ContentItem::container(
            codes::IMAGING_MEASUREMENT_REPORT,
            vec![
                ContentItem::container(
                    codes::IMAGING_MEASUREMENTS,
                    vec![
                        ContentItem::text(codes::FINDING, "Mass").with_relationship(RelationshipType::Contains),
                        ContentItem::measurement(codes::FINDING, Decimal::ONE, CodedConcept::ucum("mm"))
                            .with_relationship(RelationshipType::Contains),
                    ],
                )
                .with_relationship(RelationshipType::Contains),
            ],
        );
        SrDocument::new(DocumentType::Comprehensive.sop_class_uid(), "1.2.3.4", root)
    }

    #[test]
    fn test_counts_and_depth() {
        let doc = report();
        assert_eq!(doc.content_item_count(), 3);
        assert_eq!(doc.depth(), 2);
        assert_eq!(doc.title().map(|t| t.value()), Some("126000"));
    }

    #[test]
    fn test_document_type_refined_by_title() {
        let mut doc = report();
        assert_eq!(doc.document_type(), Some(DocumentType::MeasurementReport));
        doc.root.concept_name = Some(codes::FINDINGS.concept());
        assert_eq!(doc.document_type(), Some(DocumentType::Comprehensive));
        doc.sop_class_uid = "1.2.3".to_string();
        assert_eq!(doc.document_type(), None);
    }

    #[test]
    fn test_root_only_document() {
        let doc = SrDocument::new(
            DocumentType::BasicText.sop_class_uid(),
            "1.2.3",
            ContentItem::container(codes::FINDINGS, vec![]),
        );
        assert_eq!(doc.depth(), 0);
        assert_eq!(doc.content_item_count(), 0);
    }
}
