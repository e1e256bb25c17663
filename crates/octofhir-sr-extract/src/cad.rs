//! CAD findings
//!
//! Mammography, Chest and Colon CAD documents report each detection as a
//! "Single Image Finding" or a "Composite Feature". A finding is either a
//! CODE item whose value is the finding type, or a CONTAINER that names the
//! type in a "Finding" child and holds its properties and coordinates.

use crate::scope::{child_with, describe, descendants};
use crate::{ExtractionError, ExtractionResult};
use octofhir_sr_diagnostics::ItemPosition;
use octofhir_sr_model::{
    CodeConstant, CodedConcept, ContentItem, NumericValue, ReferencedSop, SpatialCoordinates,
    SpatialCoordinates3D, SrDocument, codes,
};
use octofhir_sr_query::{Navigator, Visit};
use rust_decimal::Decimal;
use serde::Serialize;

/// Kind of CAD finding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FindingKind {
    SingleImage,
    Composite,
}

/// One detection reported by a CAD algorithm
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CadFinding<'a> {
    pub kind: FindingKind,
    pub position: ItemPosition,
    pub finding_type: Option<&'a CodedConcept>,
    pub rendering_intent: Option<&'a CodedConcept>,
    pub certainty: Option<Decimal>,
    pub algorithm_name: Option<&'a str>,
    pub algorithm_version: Option<&'a str>,
    pub coordinates: Vec<&'a SpatialCoordinates>,
    pub coordinates_3d: Vec<&'a SpatialCoordinates3D>,
    pub images: Vec<&'a ReferencedSop>,
}

impl<'a> CadFinding<'a> {
    fn from_visit(visit: &Visit<'a>, kind: FindingKind) -> Self {
        let property = |code: &CodeConstant| child_with(visit, code).map(|child| child.item);

        let mut finding = Self {
            kind,
            position: visit.position.clone(),
            finding_type: visit
                .item
                .as_code()
                .or_else(|| property(&codes::FINDING).and_then(ContentItem::as_code)),
            rendering_intent: property(&codes::RENDERING_INTENT).and_then(ContentItem::as_code),
            certainty: property(&codes::CERTAINTY_OF_FINDING)
                .and_then(ContentItem::as_numeric)
                .and_then(NumericValue::value),
            algorithm_name: property(&codes::ALGORITHM_NAME).and_then(ContentItem::as_text),
            algorithm_version: property(&codes::ALGORITHM_VERSION).and_then(ContentItem::as_text),
            coordinates: Vec::new(),
            coordinates_3d: Vec::new(),
            images: Vec::new(),
        };

        for descendant in descendants(visit) {
            let item = descendant.item;
            if let Some(scoord) = item.as_scoord() {
                finding.coordinates.push(scoord);
            } else if let Some(scoord) = item.as_scoord3d() {
                finding.coordinates_3d.push(scoord);
            } else if let Some(image) = item.as_image() {
                finding.images.push(image);
            }
        }
        finding
    }
}

/// Findings of a CAD document
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CadFindings<'a> {
    pub title: Option<&'a CodedConcept>,
    pub findings: Vec<CadFinding<'a>>,
}

impl<'a> CadFindings<'a> {
    pub fn single_image(&self) -> impl Iterator<Item = &CadFinding<'a>> {
        self.findings.iter().filter(|f| f.kind == FindingKind::SingleImage)
    }

    pub fn composite(&self) -> impl Iterator<Item = &CadFinding<'a>> {
        self.findings.iter().filter(|f| f.kind == FindingKind::Composite)
    }
}

/// Collect every finding of a CAD document, in pre-order
///
/// A composite feature and the single image findings it groups are all
/// reported; the composite also lists the coordinates of its members.
pub fn cad_findings(doc: &SrDocument) -> ExtractionResult<CadFindings<'_>> {
    if !doc.document_type().is_some_and(|t| t.is_cad()) {
        return Err(ExtractionError::InvalidDocumentType {
            expected: "CAD",
            found: describe(doc),
        });
    }

    let findings: Vec<_> = Navigator::new(doc)
        .walk()
        .into_iter()
        .filter_map(|visit| {
            let kind = if visit.item.has_concept(&codes::SINGLE_IMAGE_FINDING) {
                FindingKind::SingleImage
            } else if visit.item.has_concept(&codes::COMPOSITE_FEATURE) {
                FindingKind::Composite
            } else {
                return None;
            };
            Some(CadFinding::from_visit(&visit, kind))
        })
        .collect();

    log::debug!("extracted {} CAD findings from {}", findings.len(), doc.sop_instance_uid);
    Ok(CadFindings {
        title: doc.title(),
        findings,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use octofhir_sr_diagnostics::SR0200;
    use octofhir_sr_model::{DocumentType, GraphicType, RelationshipType};
    use pretty_assertions::assert_eq;

    fn mass() -> CodedConcept {
        CodedConcept::new("F-01796", "SRT", "Mammography breast density")
    }

    fn cad(document_type: DocumentType) -> SrDocument {
        let finding = ContentItem::container(
            codes::SINGLE_IMAGE_FINDING,
            vec![
                ContentItem::code(codes::FINDING, mass()).with_relationship(RelationshipType::HasConceptModifier),
                ContentItem::code(codes::RENDERING_INTENT, codes::PRESENTATION_REQUIRED)
                    .with_relationship(RelationshipType::HasProperties),
                ContentItem::numeric(
                    codes::CERTAINTY_OF_FINDING,
                    NumericValue::new(Decimal::new(87, 0)).with_units(CodedConcept::ucum("%")),
                )
                .with_relationship(RelationshipType::HasProperties),
                ContentItem::text(codes::ALGORITHM_NAME, "Detector").with_relationship(RelationshipType::HasProperties),
                ContentItem::text(codes::ALGORITHM_VERSION, "2.1").with_relationship(RelationshipType::HasProperties),
                ContentItem::container(
                    codes::FINDING_SITE,
                    vec![
                        ContentItem::scoord(
                            codes::FINDING_SITE,
                            SpatialCoordinates::new(GraphicType::Point, vec![10.0, 20.0]),
                        ),
                        ContentItem::image(
                            codes::SOURCE_OF_MEASUREMENT,
                            ReferencedSop::new("1.2.840.10008.5.1.4.1.1.1.2", "1.2.3.4"),
                        ),
                    ],
                )
                .with_relationship(RelationshipType::HasProperties),
            ],
        );
        let root = ContentItem::container(
            codes::MAMMOGRAPHY_CAD_REPORT,
            vec![
                ContentItem::code(codes::COMPOSITE_FEATURE, mass()).with_relationship(RelationshipType::Contains),
                finding.with_relationship(RelationshipType::Contains),
            ],
        );
        SrDocument::new(document_type.sop_class_uid(), "1.2.3", root)
    }

    #[test]
    fn test_findings_carry_properties() {
        let doc = cad(DocumentType::MammographyCad);
        let view = cad_findings(&doc).unwrap();
        assert_eq!(view.findings.len(), 2);
        assert_eq!(view.composite().count(), 1);

        let finding = view.single_image().next().unwrap();
        assert_eq!(finding.position.to_string(), "1.2");
        assert_eq!(finding.finding_type, Some(&mass()));
        assert!(finding.rendering_intent.is_some_and(|c| c.is(&codes::PRESENTATION_REQUIRED)));
        assert_eq!(finding.certainty, Some(Decimal::new(87, 0)));
        assert_eq!(finding.algorithm_name, Some("Detector"));
        assert_eq!(finding.algorithm_version, Some("2.1"));
        assert_eq!(finding.coordinates.len(), 1);
        assert_eq!(finding.images[0].sop_instance_uid, "1.2.3.4");
    }

    #[test]
    fn test_code_finding_has_type_only() {
        let doc = cad(DocumentType::ChestCad);
        let view = cad_findings(&doc).unwrap();
        let composite = view.composite().next().unwrap();
        assert_eq!(composite.finding_type, Some(&mass()));
        assert!(composite.images.is_empty());
        assert_eq!(composite.certainty, None);
    }

    #[test]
    fn test_non_cad_document_is_rejected() {
        let doc = cad(DocumentType::Comprehensive);
        let err = cad_findings(&doc).unwrap_err();
        assert_eq!(err.code(), SR0200);
        assert!(err.to_string().contains("comprehensive"));
    }
}
