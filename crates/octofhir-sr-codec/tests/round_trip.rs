//! Encode/decode integration tests

use octofhir_sr_codec::{DecodeOptions, ParseError, decode, decode_with, encode, encode_with, EncodeOptions};
use octofhir_sr_dataset::json::{from_json_str, to_json_string};
use octofhir_sr_dataset::{DataSet, Vr, tags};
use octofhir_sr_model::{
    CodedConcept, CompletionFlag, ContentItem, DocumentType, GraphicType, GraphicType3D, NumericValue,
    ReferencedSop, RelationshipType, SpatialCoordinates, SpatialCoordinates3D, SrDocument, TemplateReference,
    TemporalCoordinates, TemporalPositions, TemporalRangeType, VerificationFlag, VerifyingObserver, codes,
};
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use rstest::rstest;
use rust_decimal::Decimal;

const CT_IMAGE: &str = "1.2.840.10008.5.1.4.1.1.2";

fn measurement_report() -> SrDocument {
    let image = ReferencedSop::new(CT_IMAGE, "1.2.3.100").with_frames(vec![1, 2]);
    let group = ContentItem::container(
        codes::MEASUREMENT_GROUP,
        vec![
            ContentItem::text(codes::TRACKING_IDENTIFIER, "lesion 1").with_relationship(RelationshipType::HasObsContext),
            ContentItem::uid_reference(codes::TRACKING_UNIQUE_IDENTIFIER, "1.2.3.200")
                .with_relationship(RelationshipType::HasObsContext),
            ContentItem::code(codes::FINDING, CodedConcept::new("RID3874", "RADLEX", "Nodule"))
                .with_relationship(RelationshipType::Contains),
            ContentItem::numeric(
                CodedConcept::new("410668003", "SCT", "Length"),
                NumericValue::new(Decimal::new(2150, 2)).with_units(CodedConcept::ucum("mm")),
            )
            .with_relationship(RelationshipType::Contains),
            ContentItem::scoord(
                codes::SOURCE_OF_MEASUREMENT,
                SpatialCoordinates::new(GraphicType::Polyline, vec![10.0, 10.0, 31.5, 10.0]),
            )
            .with_relationship(RelationshipType::InferredFrom),
            ContentItem::image(codes::SOURCE_OF_MEASUREMENT, image).with_relationship(RelationshipType::SelectedFrom),
        ],
    )
    .with_relationship(RelationshipType::Contains)
    .with_template(TemplateReference::dcmr("1410"));

    let root = ContentItem::container(
        codes::IMAGING_MEASUREMENT_REPORT,
        vec![
            ContentItem::code(codes::LANGUAGE_OF_CONTENT, codes::ENGLISH_US)
                .with_relationship(RelationshipType::HasConceptModifier),
            ContentItem::container(codes::IMAGING_MEASUREMENTS, vec![group])
                .with_relationship(RelationshipType::Contains),
        ],
    )
    .with_template(TemplateReference::dcmr("1500"));

    let mut doc = SrDocument::new(DocumentType::Comprehensive.sop_class_uid(), "1.2.3.4.5", root);
    doc.study_instance_uid = Some("1.2.3.4".to_string());
    doc.series_instance_uid = Some("1.2.3.4.1".to_string());
    doc.patient.name = Some("Doe^Jane".to_string());
    doc.patient.id = Some("P-001".to_string());
    doc.series.modality = Some("SR".to_string());
    doc.series.number = Some(7);
    doc.instance_number = Some(1);
    doc.completion = Some(CompletionFlag::Complete);
    doc.verification = Some(VerificationFlag::Verified);
    doc.verifying_observers.push(VerifyingObserver {
        name: "Smith^John".to_string(),
        organization: Some("General Hospital".to_string()),
        datetime: Some("20240101120000".into()),
    });
    doc
}

#[test]
fn test_measurement_report_round_trip() {
    let doc = measurement_report();
    let ds = encode(&doc).unwrap();
    let back = decode(&ds).unwrap();
    assert_eq!(back, doc);
    assert_eq!(back.document_type(), Some(DocumentType::MeasurementReport));
}

#[test]
fn test_round_trip_through_bytes_stays_stable() {
    let ds = encode(&measurement_report()).unwrap();
    let first = ds.to_explicit_le_bytes().unwrap();
    let second = encode(&decode(&ds).unwrap()).unwrap().to_explicit_le_bytes().unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_tcoord_round_trip() {
    let tcoord = TemporalCoordinates::new(
        TemporalRangeType::Segment,
        TemporalPositions::TimeOffsets(vec![Decimal::new(5, 1), Decimal::new(15, 1)]),
    );
    let root = ContentItem::container(
        codes::FINDINGS,
        vec![ContentItem::tcoord(codes::FINDING, tcoord).with_relationship(RelationshipType::Contains)],
    );
    let mut doc = SrDocument::new(DocumentType::Comprehensive.sop_class_uid(), "1.2.3", root);
    doc.series.modality = Some("SR".to_string());
    let back = decode(&encode(&doc).unwrap()).unwrap();
    assert_eq!(back, doc);
}

fn single_item(item: ContentItem) -> SrDocument {
    let root = ContentItem::container(codes::FINDINGS, vec![item.with_relationship(RelationshipType::Contains)]);
    let mut doc = SrDocument::new(DocumentType::Comprehensive3D.sop_class_uid(), "1.2.3", root);
    doc.series.modality = Some("SR".to_string());
    doc
}

#[rstest]
#[case::text(ContentItem::text(codes::FINDING, "Nodule"))]
#[case::code(ContentItem::code(codes::FINDING, CodedConcept::new("RID3874", "RADLEX", "Nodule")))]
#[case::numeric(ContentItem::numeric(
    codes::FINDING,
    NumericValue::multi([Decimal::new(15, 1), Decimal::new(-3, 0)])
        .with_units(CodedConcept::ucum("mm"))
        .with_qualifier(CodedConcept::new("114000", "DCM", "Not a number")),
))]
#[case::date(ContentItem::date(codes::FINDING, "20240229"))]
#[case::time(ContentItem::time(codes::FINDING, "101500.25"))]
#[case::datetime(ContentItem::datetime(codes::FINDING, "20240229101500+0100"))]
#[case::person_name(ContentItem::person_name(codes::FINDING, "Smith^John"))]
#[case::uid_reference(ContentItem::uid_reference(codes::FINDING, "1.2.3.4.5"))]
#[case::composite(ContentItem::composite(codes::FINDING, ReferencedSop::new("1.2.840.10008.5.1.4.1.1.88.22", "1.2.3.9")))]
#[case::image(ContentItem::image(
    codes::SOURCE_OF_MEASUREMENT,
    ReferencedSop::new(CT_IMAGE, "1.2.3.100").with_frames(vec![2, 4]).with_segments(vec![1]),
))]
#[case::waveform(ContentItem::waveform(
    codes::SOURCE_OF_MEASUREMENT,
    ReferencedSop::new("1.2.840.10008.5.1.4.1.1.9.1.1", "1.2.3.50").with_channels(vec![1, 1, 1, 2]),
))]
#[case::scoord(ContentItem::scoord(
    codes::FINDING,
    SpatialCoordinates::new(GraphicType::Ellipse, vec![0.0, 5.0, 10.0, 5.0, 5.0, 0.0, 5.0, 10.0]),
))]
#[case::scoord3d(ContentItem::scoord3d(
    codes::FINDING,
    SpatialCoordinates3D::new(GraphicType3D::Polyline, vec![0.0, 0.0, 0.0, 1.5, -2.0, 30.25])
        .with_frame_of_reference("1.2.3.99"),
))]
#[case::tcoord_samples(ContentItem::tcoord(
    codes::FINDING,
    TemporalCoordinates::new(TemporalRangeType::Multipoint, TemporalPositions::SamplePositions(vec![10, 20, 30])),
))]
#[case::tcoord_datetimes(ContentItem::tcoord(
    codes::FINDING,
    TemporalCoordinates::new(
        TemporalRangeType::Begin,
        TemporalPositions::DateTimes(vec!["20240101120000".into()]),
    ),
))]
#[case::empty_container(ContentItem::container(codes::FINDINGS, Vec::new()))]
fn test_value_type_round_trip(#[case] item: ContentItem) {
    let doc = single_item(item);
    let back = decode(&encode(&doc).unwrap()).unwrap();
    assert_eq!(back, doc);
}

#[rstest]
#[case::shallow(30)]
#[case::past_json_default(45)]
#[case::at_bound(100)]
fn test_deep_documents_survive_json(#[case] depth: usize) {
    let text = to_json_string(&encode(&nested(depth)).unwrap(), false).unwrap();
    let ds = from_json_str(&text).unwrap();
    assert_eq!(decode(&ds).unwrap().depth(), depth);
}

#[test]
fn test_json_one_level_past_bound_reaches_decoder() {
    let options = EncodeOptions { max_depth: 128, ..EncodeOptions::default() };
    let text = to_json_string(&encode_with(&nested(101), &options).unwrap(), false).unwrap();
    let ds = from_json_str(&text).unwrap();
    for decode_options in [DecodeOptions::strict(), DecodeOptions::lenient()] {
        assert!(matches!(
            decode_with(&ds, &decode_options),
            Err(ParseError::MaxDepthExceeded { max_depth: 100, .. })
        ));
    }
}

#[test]
fn test_content_only_encoding_skips_header() {
    let options = EncodeOptions::content_only();
    let ds = encode_with(&measurement_report(), &options).unwrap();
    assert!(!ds.contains(tags::PATIENT_NAME));
    assert!(!ds.contains(tags::MODALITY));
    assert!(ds.contains(tags::SOP_INSTANCE_UID));
    assert!(ds.contains(tags::CONTENT_SEQUENCE));
}

#[test]
fn test_lenient_skips_items_with_unknown_value_type() {
    let mut ds = encode(&measurement_report()).unwrap();
    let bogus = DataSet::new()
        .with_str(tags::VALUE_TYPE, Vr::CS, "BOGUS")
        .with_str(tags::RELATIONSHIP_TYPE, Vr::CS, "CONTAINS");
    let mut items = ds.items(tags::CONTENT_SEQUENCE).unwrap().to_vec();
    items.push(bogus);
    ds.put_sequence(tags::CONTENT_SEQUENCE, items);

    let err = decode(&ds).unwrap_err();
    assert!(matches!(err, ParseError::UnknownValueType { .. }));
    assert_eq!(err.position().map(ToString::to_string), Some("1.3".to_string()));

    let doc = decode_with(&ds, &DecodeOptions::lenient()).unwrap();
    assert_eq!(doc.root.children().len(), 2);
}

fn nested(depth: usize) -> SrDocument {
    let mut item = ContentItem::text(codes::FINDING, "leaf").with_relationship(RelationshipType::Contains);
    for _ in 1..depth {
        item = ContentItem::container(codes::FINDINGS, vec![item]).with_relationship(RelationshipType::Contains);
    }
    SrDocument::new(
        DocumentType::BasicText.sop_class_uid(),
        "1.2.3",
        ContentItem::container(codes::FINDINGS, vec![item]),
    )
}

proptest! {
    #[test]
    fn prop_depth_bound_is_exact(depth in 1usize..40, max_depth in 1usize..40) {
        let encode_options = EncodeOptions { max_depth: 64, ..EncodeOptions::default() };
        let ds = encode_with(&nested(depth), &encode_options).unwrap();
        let strict = decode_with(&ds, &DecodeOptions::default().with_max_depth(max_depth));
        let lenient = decode_with(&ds, &DecodeOptions::lenient().with_max_depth(max_depth));
        if depth <= max_depth {
            prop_assert_eq!(strict.unwrap().depth(), depth);
            prop_assert!(lenient.is_ok());
        } else {
            let is_depth_error = |r: &Result<SrDocument, ParseError>| {
                matches!(r, Err(ParseError::MaxDepthExceeded { .. }))
            };
            prop_assert!(is_depth_error(&strict));
            prop_assert!(is_depth_error(&lenient));
        }
    }
}
