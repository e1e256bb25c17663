//! TID 1500 measurement groups

use crate::scope::{child_with, describe, descendants};
use crate::{ExtractionError, ExtractionResult};
use octofhir_sr_diagnostics::ItemPosition;
use octofhir_sr_model::{CodeConstant, CodedConcept, ContentItem, ReferencedSop, SrDocument, ValueType, codes};
use octofhir_sr_query::Visit;
use rust_decimal::Decimal;
use serde::Serialize;

/// A numeric measurement inside a group
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupMeasurement<'a> {
    pub concept: Option<&'a CodedConcept>,
    pub value: Decimal,
    pub units: Option<&'a CodedConcept>,
    pub qualifier: Option<&'a CodedConcept>,
    pub position: ItemPosition,
}

/// One TID 1501 measurement group
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MeasurementGroupView<'a> {
    pub position: ItemPosition,
    pub tracking_identifier: Option<&'a str>,
    pub tracking_uid: Option<&'a str>,
    pub finding: Option<&'a CodedConcept>,
    pub finding_site: Option<&'a CodedConcept>,
    pub measurements: Vec<GroupMeasurement<'a>>,
    pub source_images: Vec<&'a ReferencedSop>,
}

impl<'a> MeasurementGroupView<'a> {
    fn from_visit(visit: &Visit<'a>) -> Self {
        let property = |code: &CodeConstant| child_with(visit, code).map(|child| child.item);

        let mut group = Self {
            position: visit.position.clone(),
            tracking_identifier: property(&codes::TRACKING_IDENTIFIER).and_then(ContentItem::as_text),
            tracking_uid: property(&codes::TRACKING_UNIQUE_IDENTIFIER).and_then(ContentItem::as_uid_reference),
            finding: property(&codes::FINDING).and_then(ContentItem::as_code),
            finding_site: property(&codes::FINDING_SITE).and_then(ContentItem::as_code),
            measurements: Vec::new(),
            source_images: Vec::new(),
        };

        for descendant in descendants(visit) {
            let item = descendant.item;
            if let Some(numeric) = item.as_numeric() {
                // NUM items without a measured value have nothing to report
                if let Some(value) = numeric.value() {
                    group.measurements.push(GroupMeasurement {
                        concept: item.concept_name.as_ref(),
                        value,
                        units: numeric.units.as_ref(),
                        qualifier: numeric.qualifier.as_ref(),
                        position: descendant.position,
                    });
                }
            } else if let Some(image) = item.as_image() {
                group.source_images.push(image);
            }
        }
        group
    }

    /// First measurement with a given concept
    pub fn measurement(&self, concept: &CodedConcept) -> Option<&GroupMeasurement<'a>> {
        self.measurements
            .iter()
            .find(|m| m.concept.is_some_and(|c| c.matches(concept)))
    }
}

/// Measurement groups of an Imaging Measurement Report
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MeasurementReportView<'a> {
    pub language: Option<&'a CodedConcept>,
    pub procedures: Vec<&'a CodedConcept>,
    pub groups: Vec<MeasurementGroupView<'a>>,
}

/// Read the measurement groups of a TID 1500 report
pub fn measurement_groups(doc: &SrDocument) -> ExtractionResult<MeasurementReportView<'_>> {
    if !doc.title().is_some_and(|t| t.is(&codes::IMAGING_MEASUREMENT_REPORT)) {
        return Err(ExtractionError::InvalidDocumentType {
            expected: "Imaging Measurement Report",
            found: describe(doc),
        });
    }

    let root = Visit::root(&doc.root);
    let measurements = child_with(&root, &codes::IMAGING_MEASUREMENTS)
        .ok_or_else(|| ExtractionError::missing(codes::IMAGING_MEASUREMENTS.meaning, Some(&root.position)))?;
    if measurements.item.value_type() != ValueType::Container {
        return Err(ExtractionError::InvalidStructure {
            message: format!(
                "{} must be a CONTAINER, found {}",
                codes::IMAGING_MEASUREMENTS.meaning,
                measurements.item.value_type()
            ),
            position: measurements.position,
        });
    }

    let groups = measurements
        .children()
        .filter(|child| child.item.has_concept(&codes::MEASUREMENT_GROUP))
        .map(|child| match child.item.value_type() {
            ValueType::Container => Ok(MeasurementGroupView::from_visit(&child)),
            other => Err(ExtractionError::InvalidStructure {
                message: format!("{} must be a CONTAINER, found {}", codes::MEASUREMENT_GROUP.meaning, other),
                position: child.position,
            }),
        })
        .collect::<ExtractionResult<Vec<_>>>()?;

    let procedures = root
        .children()
        .filter(|child| child.item.has_concept(&codes::PROCEDURE_REPORTED))
        .filter_map(|child| child.item.as_code())
        .collect();

    log::debug!("extracted {} measurement groups from {}", groups.len(), doc.sop_instance_uid);
    Ok(MeasurementReportView {
        language: child_with(&root, &codes::LANGUAGE_OF_CONTENT).and_then(|child| child.item.as_code()),
        procedures,
        groups,
    })
}
