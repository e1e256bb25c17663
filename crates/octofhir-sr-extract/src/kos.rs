//! Key object selection

use crate::scope::describe;
use crate::{ExtractionError, ExtractionResult};
use octofhir_sr_diagnostics::ItemPosition;
use octofhir_sr_model::{CodedConcept, ContentItem, DocumentType, ReferencedSop, SrDocument, ValueType, codes};
use octofhir_sr_query::Navigator;
use serde::Serialize;

/// An instance selected by a key object selection document
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KeyObject<'a> {
    /// IMAGE, COMPOSITE or WAVEFORM
    pub value_type: ValueType,
    pub position: ItemPosition,
    pub reference: &'a ReferencedSop,
}

/// Contents of a key object selection document
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KeyObjectSelection<'a> {
    pub title: &'a CodedConcept,
    pub description: Option<&'a str>,
    pub objects: Vec<KeyObject<'a>>,
}

impl KeyObjectSelection<'_> {
    /// Distinct SOP instance UIDs, in document order
    pub fn instance_uids(&self) -> Vec<&str> {
        let mut uids: Vec<&str> = Vec::with_capacity(self.objects.len());
        for object in &self.objects {
            let uid = object.reference.sop_instance_uid.as_str();
            if !uids.contains(&uid) {
                uids.push(uid);
            }
        }
        uids
    }
}

/// Read the title, description and referenced instances
pub fn key_objects(doc: &SrDocument) -> ExtractionResult<KeyObjectSelection<'_>> {
    if doc.document_type() != Some(DocumentType::KeyObjectSelection) {
        return Err(ExtractionError::InvalidDocumentType {
            expected: "key object selection",
            found: describe(doc),
        });
    }
    let title = doc
        .title()
        .ok_or_else(|| ExtractionError::missing("Document Title", Some(&ItemPosition::root())))?;
    if !codes::KEY_OBJECT_TITLES.iter().any(|code| title.is(code)) {
        log::debug!("key object title {} is not from CID 7010", title);
    }

    let navigator = Navigator::new(doc);
    let description = navigator
        .children_with(&codes::KEY_OBJECT_DESCRIPTION)
        .into_iter()
        .find_map(ContentItem::as_text);

    let objects = navigator
        .walk()
        .into_iter()
        .filter_map(|visit| {
            let reference = visit.item.as_reference()?;
            Some(KeyObject {
                value_type: visit.item.value_type(),
                position: visit.position,
                reference,
            })
        })
        .collect();

    Ok(KeyObjectSelection {
        title,
        description,
        objects,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use octofhir_sr_diagnostics::{SR0200, SR0201};
    use octofhir_sr_model::RelationshipType;
    use pretty_assertions::assert_eq;

    const CT_IMAGE: &str = "1.2.840.10008.5.1.4.1.1.2";
    const ENCAPSULATED_PDF: &str = "1.2.840.10008.5.1.4.1.1.104.1";

    fn selection(title: Option<CodedConcept>) -> SrDocument {
        let mut root = ContentItem::container(
            codes::OF_INTEREST,
            vec![
                ContentItem::text(codes::KEY_OBJECT_DESCRIPTION, "Best views")
                    .with_relationship(RelationshipType::Contains),
                ContentItem::image(codes::OF_INTEREST, ReferencedSop::new(CT_IMAGE, "1.2.3.1"))
                    .with_relationship(RelationshipType::Contains),
                ContentItem::composite(codes::OF_INTEREST, ReferencedSop::new(ENCAPSULATED_PDF, "1.2.3.9"))
                    .with_relationship(RelationshipType::Contains),
                ContentItem::image(codes::OF_INTEREST, ReferencedSop::new(CT_IMAGE, "1.2.3.1").with_frames(vec![2]))
                    .with_relationship(RelationshipType::Contains),
            ],
        );
        root.concept_name = title;
        SrDocument::new(DocumentType::KeyObjectSelection.sop_class_uid(), "1.2.3", root)
    }

    #[test]
    fn test_references_in_document_order() {
        let doc = selection(Some(codes::OF_INTEREST.concept()));
        let view = key_objects(&doc).unwrap();
        assert!(view.title.is(&codes::OF_INTEREST));
        assert_eq!(view.description, Some("Best views"));
        let kinds: Vec<_> = view.objects.iter().map(|o| o.value_type).collect();
        assert_eq!(kinds, [ValueType::Image, ValueType::Composite, ValueType::Image]);
        assert_eq!(view.objects[1].position.to_string(), "1.3");
        assert_eq!(view.instance_uids(), ["1.2.3.1", "1.2.3.9"]);
    }

    #[test]
    fn test_missing_title() {
        let err = key_objects(&selection(None)).unwrap_err();
        assert_eq!(err.code(), SR0201);
    }

    #[test]
    fn test_other_documents_are_rejected() {
        let mut doc = selection(Some(codes::OF_INTEREST.concept()));
        doc.sop_class_uid = DocumentType::Enhanced.sop_class_uid().to_string();
        assert_eq!(key_objects(&doc).unwrap_err().code(), SR0200);
    }
}
