use octofhir_sr_model::codes;
use octofhir_sr_model::{
    CodedConcept, ContentItem, ContentValue, DocumentType, NumericValue, ReferencedSop, SrDocument,
    ValueType,
};
use rust_decimal::Decimal;

fn assert_send_sync<T: Send + Sync>() {}

#[test]
fn documents_are_shareable_across_threads() {
    assert_send_sync::<SrDocument>();
    assert_send_sync::<ContentItem>();
}

#[test]
fn every_value_type_has_a_constructor() {
    let concept = codes::FINDING;
    let items = [
        ContentItem::text(concept, "a"),
        ContentItem::code(concept, codes::FINDINGS),
        ContentItem::numeric(concept, NumericValue::new(Decimal::ONE)),
        ContentItem::date(concept, "20240101"),
        ContentItem::time(concept, "1200"),
        ContentItem::datetime(concept, "20240101120000"),
        ContentItem::person_name(concept, "Doe^Jane"),
        ContentItem::uid_reference(concept, "1.2.3"),
        ContentItem::composite(concept, ReferencedSop::new("1.2", "1.2.3")),
        ContentItem::image(concept, ReferencedSop::new("1.2", "1.2.3").with_frames(vec![1])),
        ContentItem::waveform(concept, ReferencedSop::new("1.2", "1.2.3").with_channels(vec![1, 1])),
        ContentItem::scoord(
            concept,
            octofhir_sr_model::SpatialCoordinates::new(octofhir_sr_model::GraphicType::Point, vec![1.0, 2.0]),
        ),
        ContentItem::scoord3d(
            concept,
            octofhir_sr_model::SpatialCoordinates3D::new(octofhir_sr_model::GraphicType3D::Point, vec![1.0, 2.0, 3.0]),
        ),
        ContentItem::tcoord(
            concept,
            octofhir_sr_model::TemporalCoordinates::new(
                octofhir_sr_model::TemporalRangeType::Point,
                octofhir_sr_model::TemporalPositions::SamplePositions(vec![1]),
            ),
        ),
        ContentItem::container(concept, vec![]),
    ];

    let types: Vec<ValueType> = items.iter().map(ContentItem::value_type).collect();
    assert_eq!(types, ValueType::ALL.to_vec());
}

#[test]
fn basic_text_profile_rejects_numeric_items() {
    let root = ContentItem::container(
        codes::FINDINGS,
        vec![ContentItem::measurement(codes::FINDING, Decimal::TEN, CodedConcept::ucum("mm"))],
    );
    let doc = SrDocument::new(DocumentType::BasicText.sop_class_uid(), "1.2.3", root);

    let rejected: Vec<ValueType> = doc
        .root
        .children()
        .iter()
        .map(ContentItem::value_type)
        .filter(|vt| !DocumentType::BasicText.permits(*vt))
        .collect();
    assert_eq!(rejected, vec![ValueType::Numeric]);
    assert!(matches!(doc.root.children()[0].value, ContentValue::Numeric(_)));
    assert!(DocumentType::Enhanced.permits(ValueType::Numeric));
}
