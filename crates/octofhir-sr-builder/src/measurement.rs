//! TID 1500 Measurement Report assembly

use crate::uid::generate_uid;
use crate::{AssemblyResult, DocumentBuilder};
use octofhir_sr_model::{
    CodedConcept, ContentItem, DocumentType, NumericValue, ReferencedSop, RelationshipType, SrDocument,
    TemplateReference, codes,
};
use rust_decimal::Decimal;

/// One TID 1501 measurement group
#[derive(Debug, Clone, PartialEq)]
pub struct MeasurementGroup {
    tracking_identifier: String,
    tracking_uid: Option<String>,
    finding: Option<CodedConcept>,
    finding_site: Option<CodedConcept>,
    measurements: Vec<ContentItem>,
    source_images: Vec<ReferencedSop>,
}

impl MeasurementGroup {
    pub fn new(tracking_identifier: impl Into<String>) -> Self {
        Self {
            tracking_identifier: tracking_identifier.into(),
            tracking_uid: None,
            finding: None,
            finding_site: None,
            measurements: Vec::new(),
            source_images: Vec::new(),
        }
    }

    /// Tracking UID; generated when the group is assembled if unset
    pub fn with_tracking_uid(mut self, uid: impl Into<String>) -> Self {
        self.tracking_uid = Some(uid.into());
        self
    }

    pub fn with_finding(mut self, finding: impl Into<CodedConcept>) -> Self {
        self.finding = Some(finding.into());
        self
    }

    pub fn with_finding_site(mut self, site: impl Into<CodedConcept>) -> Self {
        self.finding_site = Some(site.into());
        self
    }

    pub fn add_measurement(
        mut self,
        concept: impl Into<CodedConcept>,
        value: Decimal,
        units: impl Into<CodedConcept>,
    ) -> Self {
        let item = ContentItem::numeric(concept, NumericValue::new(value).with_units(units))
            .with_relationship(RelationshipType::Contains);
        self.measurements.push(item);
        self
    }

    /// Add a prepared NUM item, e.g. one carrying a qualifier
    pub fn add_numeric(mut self, item: ContentItem) -> Self {
        self.measurements.push(item.with_relationship(RelationshipType::Contains));
        self
    }

    pub fn add_source_image(mut self, image: ReferencedSop) -> Self {
        self.source_images.push(image);
        self
    }

    /// Build the group container
    pub fn into_item(self) -> ContentItem {
        let mut children = vec![
            ContentItem::text(codes::TRACKING_IDENTIFIER, self.tracking_identifier)
                .with_relationship(RelationshipType::HasObsContext),
            ContentItem::uid_reference(
                codes::TRACKING_UNIQUE_IDENTIFIER,
                self.tracking_uid.unwrap_or_else(generate_uid),
            )
            .with_relationship(RelationshipType::HasObsContext),
        ];
        if let Some(finding) = self.finding {
            children.push(ContentItem::code(codes::FINDING, finding).with_relationship(RelationshipType::Contains));
        }
        if let Some(site) = self.finding_site {
            children.push(
                ContentItem::code(codes::FINDING_SITE, site).with_relationship(RelationshipType::HasConceptModifier),
            );
        }
        children.extend(self.measurements);
        children.extend(self.source_images.into_iter().map(|image| {
            ContentItem::image(codes::SOURCE_OF_MEASUREMENT, image).with_relationship(RelationshipType::InferredFrom)
        }));

        ContentItem::container(codes::MEASUREMENT_GROUP, children)
            .with_relationship(RelationshipType::Contains)
            .with_template(TemplateReference::dcmr("1410"))
    }
}

/// Builder for the TID 1500 skeleton
///
/// Produces a Comprehensive SR titled "Imaging Measurement Report" with
/// language, procedure reported, and an "Imaging Measurements" container
/// holding the measurement groups. Tracking rules are checked on finalize.
#[derive(Debug, Clone)]
pub struct MeasurementReportBuilder {
    document: DocumentBuilder,
    language: CodedConcept,
    procedures: Vec<CodedConcept>,
    groups: Vec<MeasurementGroup>,
}

impl Default for MeasurementReportBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl MeasurementReportBuilder {
    pub fn new() -> Self {
        Self {
            document: DocumentBuilder::new(DocumentType::MeasurementReport),
            language: codes::ENGLISH_US.concept(),
            procedures: Vec::new(),
            groups: Vec::new(),
        }
    }

    /// Adjust header attributes on the underlying document builder
    pub fn with_document(mut self, update: impl FnOnce(DocumentBuilder) -> DocumentBuilder) -> Self {
        self.document = update(self.document);
        self
    }

    pub fn with_language(mut self, language: impl Into<CodedConcept>) -> Self {
        self.language = language.into();
        self
    }

    pub fn add_procedure_reported(mut self, procedure: impl Into<CodedConcept>) -> Self {
        self.procedures.push(procedure.into());
        self
    }

    pub fn add_group(mut self, group: MeasurementGroup) -> Self {
        self.groups.push(group);
        self
    }

    pub fn finalize(self) -> AssemblyResult<SrDocument> {
        let mut items = vec![
            ContentItem::code(codes::LANGUAGE_OF_CONTENT, self.language)
                .with_relationship(RelationshipType::HasConceptModifier),
        ];
        items.extend(self.procedures.into_iter().map(|procedure| {
            ContentItem::code(codes::PROCEDURE_REPORTED, procedure)
                .with_relationship(RelationshipType::HasConceptModifier)
        }));
        let groups = self.groups.into_iter().map(MeasurementGroup::into_item).collect();
        items.push(
            ContentItem::container(codes::IMAGING_MEASUREMENTS, groups).with_relationship(RelationshipType::Contains),
        );

        self.document
            .with_title(codes::IMAGING_MEASUREMENT_REPORT)
            .with_template(TemplateReference::dcmr("1500"))
            .add_items(items)
            .finalize()
    }
}
