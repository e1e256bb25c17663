//! Content items
//!
//! A content item is a node of the SR content tree. Common attributes live on
//! [`ContentItem`]; the value-type specific payload is the [`ContentValue`]
//! enum, so each node carries exactly one payload and only containers can
//! hold children.

use crate::codes::CodeConstant;
use crate::{
    CodedConcept, Continuity, DicomDate, DicomDateTime, DicomTime, GraphicType, GraphicType3D,
    RelationshipType, TemporalRangeType, ValueType,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use smallvec::{SmallVec, smallvec};

/// A node of the content tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentItem {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub concept_name: Option<CodedConcept>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relationship: Option<RelationshipType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub observation_datetime: Option<DicomDateTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub observation_uid: Option<String>,
    pub value: ContentValue,
}

/// The value-type specific payload of a content item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum ContentValue {
    #[serde(rename = "TEXT")]
    Text(String),
    #[serde(rename = "CODE")]
    Code(CodedConcept),
    #[serde(rename = "NUM")]
    Numeric(NumericValue),
    #[serde(rename = "DATE")]
    Date(DicomDate),
    #[serde(rename = "TIME")]
    Time(DicomTime),
    #[serde(rename = "DATETIME")]
    DateTime(DicomDateTime),
    #[serde(rename = "PNAME")]
    PersonName(String),
    #[serde(rename = "UIDREF")]
    UidReference(String),
    #[serde(rename = "COMPOSITE")]
    Composite(ReferencedSop),
    #[serde(rename = "IMAGE")]
    Image(ReferencedSop),
    #[serde(rename = "WAVEFORM")]
    Waveform(ReferencedSop),
    #[serde(rename = "SCOORD")]
    SpatialCoordinates(SpatialCoordinates),
    #[serde(rename = "SCOORD3D")]
    SpatialCoordinates3D(SpatialCoordinates3D),
    #[serde(rename = "TCOORD")]
    TemporalCoordinates(TemporalCoordinates),
    #[serde(rename = "CONTAINER")]
    Container(Container),
}

/// A numeric measurement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NumericValue {
    /// Numeric Value (0040,A30A); one or more decimal values
    pub values: SmallVec<[Decimal; 1]>,
    /// Measurement Units Code Sequence (0040,08EA)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub units: Option<CodedConcept>,
    /// Floating Point Value (0040,A161), when higher precision is carried
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub float_values: Option<Vec<f64>>,
    /// Numeric Value Qualifier Code Sequence (0040,A301)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub qualifier: Option<CodedConcept>,
}

impl NumericValue {
    /// Create a new single-valued measurement
    pub fn new(value: Decimal) -> Self {
        Self {
            values: smallvec![value],
            units: None,
            float_values: None,
            qualifier: None,
        }
    }

    /// Create a multi-valued measurement
    pub fn multi(values: impl IntoIterator<Item = Decimal>) -> Self {
        Self {
            values: values.into_iter().collect(),
            ..Self::new(Decimal::ZERO)
        }
    }

    pub fn with_units(mut self, units: impl Into<CodedConcept>) -> Self {
        self.units = Some(units.into());
        self
    }

    pub fn with_float_values(mut self, values: Vec<f64>) -> Self {
        self.float_values = Some(values);
        self
    }

    pub fn with_qualifier(mut self, qualifier: impl Into<CodedConcept>) -> Self {
        self.qualifier = Some(qualifier.into());
        self
    }

    /// The first value
    pub fn value(&self) -> Option<Decimal> {
        self.values.first().copied()
    }
}

/// A reference to another SOP instance (COMPOSITE, IMAGE, WAVEFORM)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferencedSop {
    pub sop_class_uid: String,
    pub sop_instance_uid: String,
    /// Referenced Frame Number (0008,1160); IMAGE only
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub frames: Vec<u32>,
    /// Referenced Segment Number (0062,000B); IMAGE only
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub segments: Vec<u16>,
    /// Referenced Waveform Channels (0040,A0B0); WAVEFORM only
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub channels: Vec<u16>,
}

impl ReferencedSop {
    /// Create a new reference
    pub fn new(sop_class_uid: impl Into<String>, sop_instance_uid: impl Into<String>) -> Self {
        Self {
            sop_class_uid: sop_class_uid.into(),
            sop_instance_uid: sop_instance_uid.into(),
            ..Self::default()
        }
    }

    pub fn with_frames(mut self, frames: Vec<u32>) -> Self {
        self.frames = frames;
        self
    }

    pub fn with_segments(mut self, segments: Vec<u16>) -> Self {
        self.segments = segments;
        self
    }

    pub fn with_channels(mut self, channels: Vec<u16>) -> Self {
        self.channels = channels;
        self
    }
}

/// Image-relative coordinates (SCOORD)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpatialCoordinates {
    pub graphic_type: GraphicType,
    /// Column/row pairs
    pub graphic_data: Vec<f32>,
}

impl SpatialCoordinates {
    /// Create new 2D coordinates
    pub fn new(graphic_type: GraphicType, graphic_data: Vec<f32>) -> Self {
        Self {
            graphic_type,
            graphic_data,
        }
    }

    /// Check if the number of values fits the graphic type
    pub fn is_well_formed(&self) -> bool {
        self.graphic_type.accepts(self.graphic_data.len())
    }

    /// Iterate over (column, row) points
    pub fn points(&self) -> impl Iterator<Item = (f32, f32)> + '_ {
        self.graphic_data.chunks_exact(2).map(|p| (p[0], p[1]))
    }
}

/// Patient-relative coordinates (SCOORD3D)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpatialCoordinates3D {
    pub graphic_type: GraphicType3D,
    /// x/y/z triplets
    pub graphic_data: Vec<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frame_of_reference_uid: Option<String>,
}

impl SpatialCoordinates3D {
    /// Create new 3D coordinates
    pub fn new(graphic_type: GraphicType3D, graphic_data: Vec<f32>) -> Self {
        Self {
            graphic_type,
            graphic_data,
            frame_of_reference_uid: None,
        }
    }

    pub fn with_frame_of_reference(mut self, uid: impl Into<String>) -> Self {
        self.frame_of_reference_uid = Some(uid.into());
        self
    }

    /// Check if the number of values fits the graphic type
    pub fn is_well_formed(&self) -> bool {
        self.graphic_type.accepts(self.graphic_data.len())
    }

    /// Iterate over (x, y, z) points
    pub fn points(&self) -> impl Iterator<Item = (f32, f32, f32)> + '_ {
        self.graphic_data.chunks_exact(3).map(|p| (p[0], p[1], p[2]))
    }
}

/// Temporal positions referenced by a TCOORD item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "values", rename_all = "snake_case")]
pub enum TemporalPositions {
    /// Referenced Sample Positions (0040,A132)
    SamplePositions(Vec<u32>),
    /// Referenced Time Offsets (0040,A138)
    TimeOffsets(Vec<Decimal>),
    /// Referenced DateTime (0040,A13A)
    DateTimes(Vec<DicomDateTime>),
}

impl TemporalPositions {
    /// Number of referenced positions
    pub fn len(&self) -> usize {
        match self {
            Self::SamplePositions(v) => v.len(),
            Self::TimeOffsets(v) => v.len(),
            Self::DateTimes(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Temporal coordinates (TCOORD)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemporalCoordinates {
    pub range_type: TemporalRangeType,
    pub positions: TemporalPositions,
}

impl TemporalCoordinates {
    /// Create new temporal coordinates
    pub fn new(range_type: TemporalRangeType, positions: TemporalPositions) -> Self {
        Self {
            range_type,
            positions,
        }
    }
}

/// Content Template Sequence (0040,A504) entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateReference {
    /// Template Identifier (0040,DB00), e.g. `1500`
    pub identifier: String,
    /// Mapping Resource (0008,0105), normally `DCMR`
    pub mapping_resource: String,
}

impl TemplateReference {
    /// Reference a DCMR template
    pub fn dcmr(identifier: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            mapping_resource: "DCMR".to_string(),
        }
    }
}

/// A CONTAINER payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Container {
    pub continuity: Continuity,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template: Option<TemplateReference>,
    #[serde(default)]
    pub children: Vec<ContentItem>,
}

impl Container {
    /// Create a new separate-content container
    pub fn new(children: Vec<ContentItem>) -> Self {
        Self {
            continuity: Continuity::Separate,
            template: None,
            children,
        }
    }
}

impl ContentValue {
    /// The value type of this payload
    pub fn value_type(&self) -> ValueType {
        match self {
            Self::Text(_) => ValueType::Text,
            Self::Code(_) => ValueType::Code,
            Self::Numeric(_) => ValueType::Numeric,
            Self::Date(_) => ValueType::Date,
            Self::Time(_) => ValueType::Time,
            Self::DateTime(_) => ValueType::DateTime,
            Self::PersonName(_) => ValueType::PersonName,
            Self::UidReference(_) => ValueType::UidReference,
            Self::Composite(_) => ValueType::Composite,
            Self::Image(_) => ValueType::Image,
            Self::Waveform(_) => ValueType::Waveform,
            Self::SpatialCoordinates(_) => ValueType::SpatialCoordinates,
            Self::SpatialCoordinates3D(_) => ValueType::SpatialCoordinates3D,
            Self::TemporalCoordinates(_) => ValueType::TemporalCoordinates,
            Self::Container(_) => ValueType::Container,
        }
    }
}

impl ContentItem {
    /// Create an item with no concept name
    pub fn new(value: ContentValue) -> Self {
        Self {
            concept_name: None,
            relationship: None,
            observation_datetime: None,
            observation_uid: None,
            value,
        }
    }

    fn named(concept: impl Into<CodedConcept>, value: ContentValue) -> Self {
        Self::new(value).with_concept_name(concept)
    }

    // === Constructors ===

    pub fn text(concept: impl Into<CodedConcept>, text: impl Into<String>) -> Self {
        Self::named(concept, ContentValue::Text(text.into()))
    }

    pub fn code(concept: impl Into<CodedConcept>, value: impl Into<CodedConcept>) -> Self {
        Self::named(concept, ContentValue::Code(value.into()))
    }

    pub fn numeric(concept: impl Into<CodedConcept>, value: NumericValue) -> Self {
        Self::named(concept, ContentValue::Numeric(value))
    }

    /// A single-valued measurement with units
    pub fn measurement(concept: impl Into<CodedConcept>, value: Decimal, units: impl Into<CodedConcept>) -> Self {
        Self::numeric(concept, NumericValue::new(value).with_units(units))
    }

    pub fn date(concept: impl Into<CodedConcept>, date: impl Into<DicomDate>) -> Self {
        Self::named(concept, ContentValue::Date(date.into()))
    }

    pub fn time(concept: impl Into<CodedConcept>, time: impl Into<DicomTime>) -> Self {
        Self::named(concept, ContentValue::Time(time.into()))
    }

    pub fn datetime(concept: impl Into<CodedConcept>, datetime: impl Into<DicomDateTime>) -> Self {
        Self::named(concept, ContentValue::DateTime(datetime.into()))
    }

    pub fn person_name(concept: impl Into<CodedConcept>, name: impl Into<String>) -> Self {
        Self::named(concept, ContentValue::PersonName(name.into()))
    }

    pub fn uid_reference(concept: impl Into<CodedConcept>, uid: impl Into<String>) -> Self {
        Self::named(concept, ContentValue::UidReference(uid.into()))
    }

    pub fn composite(concept: impl Into<CodedConcept>, reference: ReferencedSop) -> Self {
        Self::named(concept, ContentValue::Composite(reference))
    }

    pub fn image(concept: impl Into<CodedConcept>, reference: ReferencedSop) -> Self {
        Self::named(concept, ContentValue::Image(reference))
    }

    pub fn waveform(concept: impl Into<CodedConcept>, reference: ReferencedSop) -> Self {
        Self::named(concept, ContentValue::Waveform(reference))
    }

    pub fn scoord(concept: impl Into<CodedConcept>, coordinates: SpatialCoordinates) -> Self {
        Self::named(concept, ContentValue::SpatialCoordinates(coordinates))
    }

    pub fn scoord3d(concept: impl Into<CodedConcept>, coordinates: SpatialCoordinates3D) -> Self {
        Self::named(concept, ContentValue::SpatialCoordinates3D(coordinates))
    }

    pub fn tcoord(concept: impl Into<CodedConcept>, coordinates: TemporalCoordinates) -> Self {
        Self::named(concept, ContentValue::TemporalCoordinates(coordinates))
    }

    pub fn container(concept: impl Into<CodedConcept>, children: Vec<ContentItem>) -> Self {
        Self::named(concept, ContentValue::Container(Container::new(children)))
    }

    // === Common attributes ===

    pub fn with_concept_name(mut self, concept: impl Into<CodedConcept>) -> Self {
        self.concept_name = Some(concept.into());
        self
    }

    pub fn with_relationship(mut self, relationship: RelationshipType) -> Self {
        self.relationship = Some(relationship);
        self
    }

    pub fn with_observation_datetime(mut self, datetime: impl Into<DicomDateTime>) -> Self {
        self.observation_datetime = Some(datetime.into());
        self
    }

    pub fn with_observation_uid(mut self, uid: impl Into<String>) -> Self {
        self.observation_uid = Some(uid.into());
        self
    }

    /// Set the template on a container; no effect on other value types
    pub fn with_template(mut self, template: TemplateReference) -> Self {
        if let ContentValue::Container(c) = &mut self.value {
            c.template = Some(template);
        }
        self
    }

    /// Set continuity on a container; no effect on other value types
    pub fn with_continuity(mut self, continuity: Continuity) -> Self {
        if let ContentValue::Container(c) = &mut self.value {
            c.continuity = continuity;
        }
        self
    }

    // === Inspection ===

    pub fn value_type(&self) -> ValueType {
        self.value.value_type()
    }

    /// Check if the concept name denotes a well-known code
    pub fn has_concept(&self, code: &CodeConstant) -> bool {
        self.concept_name.as_ref().is_some_and(|c| c.is(code))
    }

    /// Check if the concept name matches another concept
    pub fn concept_matches(&self, concept: &CodedConcept) -> bool {
        self.concept_name.as_ref().is_some_and(|c| c.matches(concept))
    }

    /// Children of a container; empty for every other value type
    pub fn children(&self) -> &[ContentItem] {
        match &self.value {
            ContentValue::Container(c) => &c.children,
            _ => &[],
        }
    }

    /// Depth of the deepest descendant relative to this item
    pub fn subtree_depth(&self) -> usize {
        self.children()
            .iter()
            .map(|c| c.subtree_depth() + 1)
            .max()
            .unwrap_or(0)
    }

    /// Number of descendants, not counting this item
    pub fn descendant_count(&self) -> usize {
        self.children()
            .iter()
            .map(|c| c.descendant_count() + 1)
            .sum()
    }

    // === Narrowing ===

    pub fn as_text(&self) -> Option<&str> {
        match &self.value {
            ContentValue::Text(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_code(&self) -> Option<&CodedConcept> {
        match &self.value {
            ContentValue::Code(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_numeric(&self) -> Option<&NumericValue> {
        match &self.value {
            ContentValue::Numeric(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_date(&self) -> Option<&DicomDate> {
        match &self.value {
            ContentValue::Date(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_time(&self) -> Option<&DicomTime> {
        match &self.value {
            ContentValue::Time(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_datetime(&self) -> Option<&DicomDateTime> {
        match &self.value {
            ContentValue::DateTime(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_person_name(&self) -> Option<&str> {
        match &self.value {
            ContentValue::PersonName(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_uid_reference(&self) -> Option<&str> {
        match &self.value {
            ContentValue::UidReference(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_composite(&self) -> Option<&ReferencedSop> {
        match &self.value {
            ContentValue::Composite(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_image(&self) -> Option<&ReferencedSop> {
        match &self.value {
            ContentValue::Image(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_waveform(&self) -> Option<&ReferencedSop> {
        match &self.value {
            ContentValue::Waveform(v) => Some(v),
            _ => None,
        }
    }

    /// Any SOP reference: COMPOSITE, IMAGE, or WAVEFORM
    pub fn as_reference(&self) -> Option<&ReferencedSop> {
        match &self.value {
            ContentValue::Composite(v) | ContentValue::Image(v) | ContentValue::Waveform(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_scoord(&self) -> Option<&SpatialCoordinates> {
        match &self.value {
            ContentValue::SpatialCoordinates(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_scoord3d(&self) -> Option<&SpatialCoordinates3D> {
        match &self.value {
            ContentValue::SpatialCoordinates3D(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_tcoord(&self) -> Option<&TemporalCoordinates> {
        match &self.value {
            ContentValue::TemporalCoordinates(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_container(&self) -> Option<&Container> {
        match &self.value {
            ContentValue::Container(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_container_mut(&mut self) -> Option<&mut Container> {
        match &mut self.value {
            ContentValue::Container(v) => Some(v),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codes;
    use pretty_assertions::assert_eq;

    fn finding_tree() -> ContentItem {
        ContentItem::container(
            codes::FINDINGS,
            vec![
                ContentItem::text(codes::FINDING, "Nodule").with_relationship(RelationshipType::Contains),
                ContentItem::container(
                    codes::MEASUREMENT_GROUP,
                    vec![ContentItem::measurement(
                        CodedConcept::new("410668003", "SCT", "Length"),
                        Decimal::new(125, 1),
                        CodedConcept::ucum("mm"),
                    )],
                ),
            ],
        )
    }

    #[test]
    fn test_narrowing() {
        let item = ContentItem::text(codes::FINDING, "Nodule");
        assert_eq!(item.as_text(), Some("Nodule"));
        assert!(item.as_numeric().is_none());
        assert!(item.as_container().is_none());
        assert_eq!(item.value_type(), ValueType::Text);
        assert!(item.children().is_empty());
    }

    #[test]
    fn test_measurement_value() {
        let item = ContentItem::measurement(codes::FINDING, Decimal::new(42, 0), CodedConcept::ucum("mm"));
        let num = item.as_numeric().unwrap();
        assert_eq!(num.value(), Some(Decimal::new(42, 0)));
        assert_eq!(num.units.as_ref().map(|u| u.value()), Some("mm"));
    }

    #[test]
    fn test_subtree_metrics() {
        let tree = finding_tree();
        assert_eq!(tree.subtree_depth(), 2);
        assert_eq!(tree.descendant_count(), 3);
        assert!(tree.has_concept(&codes::FINDINGS));
    }

    #[test]
    fn test_template_only_applies_to_containers() {
        let container = ContentItem::container(codes::FINDINGS, vec![]).with_template(TemplateReference::dcmr("1500"));
        assert_eq!(
            container.as_container().and_then(|c| c.template.as_ref()).map(|t| t.identifier.as_str()),
            Some("1500")
        );
        let text = ContentItem::text(codes::FINDING, "x").with_template(TemplateReference::dcmr("1500"));
        assert_eq!(text, ContentItem::text(codes::FINDING, "x"));
    }

    #[test]
    fn test_serde_round_trip() {
        let tree = finding_tree();
        let json = serde_json::to_string(&tree).unwrap();
        let back: ContentItem = serde_json::from_str(&json).unwrap();
        assert_eq!(back, tree);
    }

    #[test]
    fn test_scoord_points() {
        let scoord = SpatialCoordinates::new(GraphicType::Polyline, vec![1.0, 2.0, 3.0, 4.0]);
        assert!(scoord.is_well_formed());
        assert_eq!(scoord.points().collect::<Vec<_>>(), vec![(1.0, 2.0), (3.0, 4.0)]);
    }
}
