//! Document builder

use crate::uid::generate_uid;
use crate::validate::check_tree;
use crate::AssemblyResult;
use octofhir_sr_model::{
    CodedConcept, CompletionFlag, Container, ContentItem, ContentValue, Continuity, DEFAULT_MAX_DEPTH,
    DicomDate, DicomTime, DocumentType, Patient, PreliminaryFlag, RelationshipType, Series, SrDocument,
    Study, TemplateReference, VerificationFlag, VerifyingObserver,
};

/// Value-typed builder for SR documents
///
/// Every method takes the builder by value and returns the next snapshot, so
/// cloning a snapshot forks an independent chain. Nothing is checked until
/// [`DocumentBuilder::finalize`].
///
/// # Example
///
/// ```ignore
/// let doc = DocumentBuilder::new(DocumentType::BasicText)
///     .with_title(codes::FINDINGS)
///     .add_section_with(codes::IMPRESSIONS, || {
///         vec![ContentItem::text(codes::IMPRESSION, "No acute findings")]
///     })
///     .finalize()?;
/// ```
#[derive(Debug, Clone)]
pub struct DocumentBuilder {
    document_type: DocumentType,
    title: Option<CodedConcept>,
    template: Option<TemplateReference>,
    continuity: Continuity,
    children: Vec<ContentItem>,

    sop_instance_uid: Option<String>,
    study_instance_uid: Option<String>,
    series_instance_uid: Option<String>,
    patient: Patient,
    study: Study,
    series: Series,
    instance_number: Option<i64>,
    content_date: Option<DicomDate>,
    content_time: Option<DicomTime>,
    manufacturer: Option<String>,
    completion: Option<CompletionFlag>,
    verification: Option<VerificationFlag>,
    preliminary: Option<PreliminaryFlag>,
    verifying_observers: Vec<VerifyingObserver>,

    frame_of_reference_uid: Option<String>,
    max_depth: usize,
}

impl DocumentBuilder {
    /// Start a document of the given type
    pub fn new(document_type: DocumentType) -> Self {
        Self {
            document_type,
            title: None,
            template: None,
            continuity: Continuity::Separate,
            children: Vec::new(),
            sop_instance_uid: None,
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
            frame_of_reference_uid: None,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    pub fn document_type(&self) -> DocumentType {
        self.document_type
    }

    /// Number of items added so far, counting nested items
    pub fn item_count(&self) -> usize {
        self.children.iter().map(|c| 1 + c.descendant_count()).sum()
    }

    // === Root container ===

    pub fn with_title(mut self, title: impl Into<CodedConcept>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_template(mut self, template: TemplateReference) -> Self {
        self.template = Some(template);
        self
    }

    pub fn with_continuity(mut self, continuity: Continuity) -> Self {
        self.continuity = continuity;
        self
    }

    /// Append an item to the root container
    pub fn add_item(mut self, item: ContentItem) -> Self {
        self.children.push(item);
        self
    }

    pub fn add_items(mut self, items: impl IntoIterator<Item = ContentItem>) -> Self {
        self.children.extend(items);
        self
    }

    /// Append a `CONTAINS` container holding `children`
    pub fn add_section(self, concept: impl Into<CodedConcept>, children: Vec<ContentItem>) -> Self {
        let section = ContentItem::container(concept, children).with_relationship(RelationshipType::Contains);
        self.add_item(section)
    }

    /// Append a `CONTAINS` container whose children come from `build`
    ///
    /// Children without a relationship are attached with `CONTAINS`.
    pub fn add_section_with(
        self,
        concept: impl Into<CodedConcept>,
        build: impl FnOnce() -> Vec<ContentItem>,
    ) -> Self {
        let children = build()
            .into_iter()
            .map(|child| match child.relationship {
                Some(_) => child,
                None => child.with_relationship(RelationshipType::Contains),
            })
            .collect();
        self.add_section(concept, children)
    }

    // === Identifiers and header ===

    pub fn with_sop_instance_uid(mut self, uid: impl Into<String>) -> Self {
        self.sop_instance_uid = Some(uid.into());
        self
    }

    pub fn with_study_instance_uid(mut self, uid: impl Into<String>) -> Self {
        self.study_instance_uid = Some(uid.into());
        self
    }

    pub fn with_series_instance_uid(mut self, uid: impl Into<String>) -> Self {
        self.series_instance_uid = Some(uid.into());
        self
    }

    pub fn with_patient(mut self, patient: Patient) -> Self {
        self.patient = patient;
        self
    }

    pub fn with_study(mut self, study: Study) -> Self {
        self.study = study;
        self
    }

    pub fn with_series(mut self, series: Series) -> Self {
        self.series = series;
        self
    }

    pub fn with_instance_number(mut self, number: i64) -> Self {
        self.instance_number = Some(number);
        self
    }

    pub fn with_content_date(mut self, date: impl Into<DicomDate>) -> Self {
        self.content_date = Some(date.into());
        self
    }

    pub fn with_content_time(mut self, time: impl Into<DicomTime>) -> Self {
        self.content_time = Some(time.into());
        self
    }

    pub fn with_manufacturer(mut self, manufacturer: impl Into<String>) -> Self {
        self.manufacturer = Some(manufacturer.into());
        self
    }

    pub fn with_completion(mut self, flag: CompletionFlag) -> Self {
        self.completion = Some(flag);
        self
    }

    pub fn with_verification(mut self, flag: VerificationFlag) -> Self {
        self.verification = Some(flag);
        self
    }

    pub fn with_preliminary(mut self, flag: PreliminaryFlag) -> Self {
        self.preliminary = Some(flag);
        self
    }

    pub fn add_verifying_observer(mut self, observer: VerifyingObserver) -> Self {
        self.verifying_observers.push(observer);
        self
    }

    // === Checks ===

    /// Frame of reference written into every SCOORD3D item that lacks one
    pub fn with_frame_of_reference_uid(mut self, uid: impl Into<String>) -> Self {
        self.frame_of_reference_uid = Some(uid.into());
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Check the tree and produce the document
    ///
    /// Fails with the first violation in pre-order; missing instance UIDs
    /// are generated only once the tree has passed.
    pub fn finalize(self) -> AssemblyResult<SrDocument> {
        let document_type = self.document_type;
        let mut root = ContentItem::new(ContentValue::Container(Container {
            continuity: self.continuity,
            template: self.template,
            children: self.children,
        }));
        root.concept_name = self.title;

        if let Some(uid) = &self.frame_of_reference_uid {
            apply_frame_of_reference(&mut root, uid);
        }
        if let Some(error) = check_tree(&root, document_type, self.max_depth).into_iter().next() {
            log::debug!("finalize rejected {} document: {}", document_type, error);
            return Err(error);
        }

        let mut doc = SrDocument::new(
            document_type.sop_class_uid(),
            self.sop_instance_uid.unwrap_or_else(generate_uid),
            root,
        );
        doc.study_instance_uid = Some(self.study_instance_uid.unwrap_or_else(generate_uid));
        doc.series_instance_uid = Some(self.series_instance_uid.unwrap_or_else(generate_uid));
        doc.patient = self.patient;
        doc.study = self.study;
        doc.series = self.series;
        if doc.series.modality.is_none() {
            doc.series.modality = Some(document_type.modality().to_string());
        }
        doc.instance_number = self.instance_number;
        doc.content_date = self.content_date;
        doc.content_time = self.content_time;
        doc.manufacturer = self.manufacturer;
        doc.completion = self.completion;
        doc.verification = self.verification;
        doc.preliminary = self.preliminary;
        doc.verifying_observers = self.verifying_observers;

        log::debug!(
            "finalized {} document {} with {} items",
            document_type,
            doc.sop_instance_uid,
            doc.content_item_count()
        );
        Ok(doc)
    }
}

fn apply_frame_of_reference(root: &mut ContentItem, uid: &str) {
    let mut pending = vec![root];
    while let Some(item) = pending.pop() {
        match &mut item.value {
            ContentValue::SpatialCoordinates3D(scoord)
                if scoord.frame_of_reference_uid.as_deref().is_none_or(str::is_empty) =>
            {
                scoord.frame_of_reference_uid = Some(uid.to_string());
            }
            ContentValue::Container(container) => pending.extend(container.children.iter_mut()),
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::AssemblyError;
    use octofhir_sr_model::{GraphicType3D, SpatialCoordinates3D, ValueType, codes, uid};
    use pretty_assertions::assert_eq;
    use rust_decimal::Decimal;

    fn numeric_tree(builder: DocumentBuilder) -> DocumentBuilder {
        builder.with_title(codes::FINDINGS).add_section_with(codes::FINDINGS, || {
            vec![
                ContentItem::text(codes::FINDING, "Nodule"),
                ContentItem::measurement(codes::FINDING, Decimal::TEN, CodedConcept::ucum("mm")),
            ]
        })
    }

    #[test]
    fn test_profile_enforcement() {
        let err = numeric_tree(DocumentBuilder::new(DocumentType::BasicText)).finalize().unwrap_err();
        assert_eq!(
            err,
            AssemblyError::UnsupportedValueType {
                value_type: ValueType::Numeric,
                document_type: DocumentType::BasicText,
                position: "1.1.2".parse().unwrap(),
            }
        );
        assert!(numeric_tree(DocumentBuilder::new(DocumentType::Enhanced)).finalize().is_ok());
    }

    #[test]
    fn test_snapshots_are_independent() {
        let base = DocumentBuilder::new(DocumentType::Comprehensive).with_title(codes::FINDINGS);
        let one = base.clone().add_item(ContentItem::text(codes::FINDING, "a"));
        let two = base
            .clone()
            .add_section(codes::IMPRESSIONS, vec![])
            .add_item(ContentItem::text(codes::FINDING, "b"));
        assert_eq!(base.item_count(), 0);
        assert_eq!(one.item_count(), 1);
        assert_eq!(two.item_count(), 2);
    }

    #[test]
    fn test_section_children_default_to_contains() {
        let doc = numeric_tree(DocumentBuilder::new(DocumentType::Comprehensive)).finalize().unwrap();
        let section = &doc.root.children()[0];
        assert_eq!(section.relationship, Some(RelationshipType::Contains));
        assert!(section.children().iter().all(|c| c.relationship == Some(RelationshipType::Contains)));
    }

    #[test]
    fn test_generated_identifiers() {
        let doc = DocumentBuilder::new(DocumentType::KeyObjectSelection)
            .with_title(codes::OF_INTEREST)
            .with_study_instance_uid("1.2.3")
            .finalize()
            .unwrap();
        assert!(uid::is_valid(&doc.sop_instance_uid));
        assert_eq!(doc.study_instance_uid.as_deref(), Some("1.2.3"));
        assert!(doc.series_instance_uid.as_deref().is_some_and(|u| u.starts_with("2.25.")));
        assert_eq!(doc.series.modality.as_deref(), Some("KO"));
        assert_eq!(doc.sop_class_uid, DocumentType::KeyObjectSelection.sop_class_uid());
    }

    #[test]
    fn test_key_object_selection_requires_title() {
        let err = DocumentBuilder::new(DocumentType::KeyObjectSelection).finalize().unwrap_err();
        assert!(matches!(err, AssemblyError::ValidationError { .. }));
    }

    fn scoord3d_builder() -> DocumentBuilder {
        let point = SpatialCoordinates3D::new(GraphicType3D::Point, vec![1.0, 2.0, 3.0]);
        DocumentBuilder::new(DocumentType::Comprehensive3D)
            .with_title(codes::FINDINGS)
            .add_section(
                codes::FINDINGS,
                vec![ContentItem::scoord3d(codes::FINDING, point).with_relationship(RelationshipType::Contains)],
            )
    }

    #[test]
    fn test_frame_of_reference_default() {
        let err = scoord3d_builder().finalize().unwrap_err();
        assert_eq!(
            err,
            AssemblyError::MissingFrameOfReferenceUid {
                position: "1.1.1".parse().unwrap()
            }
        );

        let doc = scoord3d_builder().with_frame_of_reference_uid("1.2.3.9").finalize().unwrap();
        let scoord = doc.root.children()[0].children()[0].as_scoord3d().unwrap();
        assert_eq!(scoord.frame_of_reference_uid.as_deref(), Some("1.2.3.9"));
    }

    #[test]
    fn test_depth_bound() {
        let err = numeric_tree(DocumentBuilder::new(DocumentType::Comprehensive))
            .with_max_depth(1)
            .finalize()
            .unwrap_err();
        assert_eq!(err.code().to_string(), "SR0104");
    }
}
