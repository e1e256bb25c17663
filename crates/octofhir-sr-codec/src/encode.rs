//! Content tree to dataset

use crate::{EncodeError, EncodeOptions, EncodeResult};
use octofhir_sr_dataset::numeric::format_decimal_string;
use octofhir_sr_dataset::{DataSet, Element, Tag, Vr, tags};
use octofhir_sr_diagnostics::ItemPosition;
use octofhir_sr_model::{
    CodeIdentity, CodedConcept, ContentItem, ContentValue, DocumentType, NumericValue, ReferencedSop,
    SrDocument, TemporalPositions,
};

/// Encode a document with default options
pub fn encode(doc: &SrDocument) -> EncodeResult<DataSet> {
    encode_with(doc, &EncodeOptions::default())
}

/// Encode a document
pub fn encode_with(doc: &SrDocument, options: &EncodeOptions) -> EncodeResult<DataSet> {
    log::debug!("encoding SR document {}", doc.sop_instance_uid);
    let mut ds = DataSet::new();

    if let Some(charset) = &options.character_set {
        ds.put_str(tags::SPECIFIC_CHARACTER_SET, Vr::CS, charset.as_str());
    }
    put_opt(&mut ds, tags::SOP_CLASS_UID, Vr::UI, Some(&doc.sop_class_uid));
    put_opt(&mut ds, tags::SOP_INSTANCE_UID, Vr::UI, Some(&doc.sop_instance_uid));
    put_opt(&mut ds, tags::STUDY_INSTANCE_UID, Vr::UI, doc.study_instance_uid.as_ref());
    put_opt(&mut ds, tags::SERIES_INSTANCE_UID, Vr::UI, doc.series_instance_uid.as_ref());

    if options.include_header {
        header(&mut ds, doc);
    }

    // The root item shares the document dataset
    let encoder = Encoder { options };
    ds.put_str(tags::VALUE_TYPE, Vr::CS, doc.root.value_type().as_str());
    encoder.common(&mut ds, &doc.root);
    encoder.payload(&mut ds, &doc.root, 0, &ItemPosition::root())?;
    Ok(ds)
}

/// Encode a single content item and its subtree
pub fn encode_item(item: &ContentItem, options: &EncodeOptions) -> EncodeResult<DataSet> {
    Encoder { options }.item(item, 0, &ItemPosition::root())
}

fn header(ds: &mut DataSet, doc: &SrDocument) {
    let modality = doc
        .document_type()
        .map(|t| t.modality())
        .or(doc.series.modality.as_deref())
        .unwrap_or(DocumentType::Comprehensive.modality());
    ds.put_str(tags::MODALITY, Vr::CS, modality);

    put_opt(ds, tags::PATIENT_NAME, Vr::PN, doc.patient.name.as_ref());
    put_opt(ds, tags::PATIENT_ID, Vr::LO, doc.patient.id.as_ref());
    put_opt(ds, tags::PATIENT_BIRTH_DATE, Vr::DA, doc.patient.birth_date.as_ref().map(|d| d.as_str()));
    put_opt(ds, tags::PATIENT_SEX, Vr::CS, doc.patient.sex.as_ref());

    put_opt(ds, tags::STUDY_DATE, Vr::DA, doc.study.date.as_ref().map(|d| d.as_str()));
    put_opt(ds, tags::STUDY_TIME, Vr::TM, doc.study.time.as_ref().map(|t| t.as_str()));
    put_opt(ds, tags::STUDY_ID, Vr::SH, doc.study.id.as_ref());
    put_opt(ds, tags::ACCESSION_NUMBER, Vr::SH, doc.study.accession_number.as_ref());
    put_opt(ds, tags::STUDY_DESCRIPTION, Vr::LO, doc.study.description.as_ref());
    put_opt(ds, tags::REFERRING_PHYSICIAN_NAME, Vr::PN, doc.study.referring_physician.as_ref());

    put_opt(ds, tags::SERIES_NUMBER, Vr::IS, doc.series.number.map(|n| n.to_string()).as_ref());
    put_opt(ds, tags::SERIES_DESCRIPTION, Vr::LO, doc.series.description.as_ref());
    put_opt(ds, tags::INSTANCE_NUMBER, Vr::IS, doc.instance_number.map(|n| n.to_string()).as_ref());
    put_opt(ds, tags::CONTENT_DATE, Vr::DA, doc.content_date.as_ref().map(|d| d.as_str()));
    put_opt(ds, tags::CONTENT_TIME, Vr::TM, doc.content_time.as_ref().map(|t| t.as_str()));
    put_opt(ds, tags::MANUFACTURER, Vr::LO, doc.manufacturer.as_ref());

    put_opt(ds, tags::COMPLETION_FLAG, Vr::CS, doc.completion.map(|f| f.as_str()));
    put_opt(ds, tags::VERIFICATION_FLAG, Vr::CS, doc.verification.map(|f| f.as_str()));
    put_opt(ds, tags::PRELIMINARY_FLAG, Vr::CS, doc.preliminary.map(|f| f.as_str()));

    if !doc.verifying_observers.is_empty() {
        let observers = doc
            .verifying_observers
            .iter()
            .map(|o| {
                let mut item = DataSet::new().with_str(tags::VERIFYING_OBSERVER_NAME, Vr::PN, o.name.as_str());
                put_opt(&mut item, tags::VERIFYING_ORGANIZATION, Vr::LO, o.organization.as_ref());
                put_opt(&mut item, tags::VERIFICATION_DATETIME, Vr::DT, o.datetime.as_ref().map(|d| d.as_str()));
                item
            })
            .collect();
        ds.put_sequence(tags::VERIFYING_OBSERVER_SEQUENCE, observers);
    }
}

struct Encoder<'a> {
    options: &'a EncodeOptions,
}

impl Encoder<'_> {
    fn item(&self, item: &ContentItem, depth: usize, position: &ItemPosition) -> EncodeResult<DataSet> {
        if depth > self.options.max_depth {
            return Err(EncodeError::MaxDepthExceeded {
                max_depth: self.options.max_depth,
                position: position.clone(),
            });
        }
        let mut ds = DataSet::new();
        ds.put_str(tags::VALUE_TYPE, Vr::CS, item.value_type().as_str());
        if let Some(relationship) = item.relationship {
            ds.put_str(tags::RELATIONSHIP_TYPE, Vr::CS, relationship.as_str());
        }
        self.common(&mut ds, item);
        self.payload(&mut ds, item, depth, position)?;
        Ok(ds)
    }

    /// Concept name and observation context
    fn common(&self, ds: &mut DataSet, item: &ContentItem) {
        if let Some(concept) = &item.concept_name {
            ds.put_sequence(tags::CONCEPT_NAME_CODE_SEQUENCE, vec![code_item(concept)]);
        }
        put_opt(ds, tags::OBSERVATION_DATETIME, Vr::DT, item.observation_datetime.as_ref().map(|d| d.as_str()));
        put_opt(ds, tags::OBSERVATION_UID, Vr::UI, item.observation_uid.as_ref());
    }

    fn payload(&self, ds: &mut DataSet, item: &ContentItem, depth: usize, position: &ItemPosition) -> EncodeResult<()> {
        match &item.value {
            ContentValue::Text(text) => ds.put_str(tags::TEXT_VALUE, Vr::UT, text.as_str()),
            ContentValue::Code(code) => ds.put_sequence(tags::CONCEPT_CODE_SEQUENCE, vec![code_item(code)]),
            ContentValue::Numeric(num) => numeric(ds, num),
            ContentValue::Date(date) => ds.put_str(tags::DATE, Vr::DA, date.as_str()),
            ContentValue::Time(time) => ds.put_str(tags::TIME, Vr::TM, time.as_str()),
            ContentValue::DateTime(datetime) => ds.put_str(tags::DATETIME, Vr::DT, datetime.as_str()),
            ContentValue::PersonName(name) => ds.put_str(tags::PERSON_NAME, Vr::PN, name.as_str()),
            ContentValue::UidReference(uid) => ds.put_str(tags::UID, Vr::UI, uid.as_str()),
            ContentValue::Composite(reference) | ContentValue::Image(reference) | ContentValue::Waveform(reference) => {
                ds.put_sequence(tags::REFERENCED_SOP_SEQUENCE, vec![referenced_sop(reference)]);
            }
            ContentValue::SpatialCoordinates(scoord) => {
                ds.put_str(tags::GRAPHIC_TYPE, Vr::CS, scoord.graphic_type.as_str());
                ds.put_f32s(tags::GRAPHIC_DATA, scoord.graphic_data.clone());
            }
            ContentValue::SpatialCoordinates3D(scoord) => {
                ds.put_str(tags::GRAPHIC_TYPE, Vr::CS, scoord.graphic_type.as_str());
                ds.put_f32s(tags::GRAPHIC_DATA, scoord.graphic_data.clone());
                put_opt(ds, tags::FRAME_OF_REFERENCE_UID, Vr::UI, scoord.frame_of_reference_uid.as_ref());
            }
            ContentValue::TemporalCoordinates(tcoord) => {
                ds.put_str(tags::TEMPORAL_RANGE_TYPE, Vr::CS, tcoord.range_type.as_str());
                match &tcoord.positions {
                    TemporalPositions::SamplePositions(samples) => {
                        ds.put_u32s(tags::REFERENCED_SAMPLE_POSITIONS, samples.clone());
                    }
                    TemporalPositions::TimeOffsets(offsets) => ds.put_strings(
                        tags::REFERENCED_TIME_OFFSETS,
                        Vr::DS,
                        offsets.iter().map(|v| format_decimal_string(*v)),
                    ),
                    TemporalPositions::DateTimes(datetimes) => ds.put_strings(
                        tags::REFERENCED_DATETIME,
                        Vr::DT,
                        datetimes.iter().map(|v| v.as_str()),
                    ),
                }
            }
            ContentValue::Container(container) => {
                ds.put_str(tags::CONTINUITY_OF_CONTENT, Vr::CS, container.continuity.as_str());
                if let Some(template) = &container.template {
                    let reference = DataSet::new()
                        .with_str(tags::MAPPING_RESOURCE, Vr::CS, template.mapping_resource.as_str())
                        .with_str(tags::TEMPLATE_IDENTIFIER, Vr::CS, template.identifier.as_str());
                    ds.put_sequence(tags::CONTENT_TEMPLATE_SEQUENCE, vec![reference]);
                }
                if !container.children.is_empty() {
                    let children = container
                        .children
                        .iter()
                        .enumerate()
                        .map(|(index, child)| {
                            let ordinal = u32::try_from(index + 1).unwrap_or(u32::MAX);
                            self.item(child, depth + 1, &position.child(ordinal))
                        })
                        .collect::<EncodeResult<Vec<_>>>()?;
                    ds.put_sequence(tags::CONTENT_SEQUENCE, children);
                }
            }
        }
        Ok(())
    }
}

fn numeric(ds: &mut DataSet, num: &NumericValue) {
    let mut measured = DataSet::new();
    measured.put_strings(
        tags::NUMERIC_VALUE,
        Vr::DS,
        num.values.iter().map(|v| format_decimal_string(*v)),
    );
    if let Some(floats) = &num.float_values {
        measured.put_f64s(tags::FLOATING_POINT_VALUE, floats.clone());
    }
    if let Some(units) = &num.units {
        measured.put_sequence(tags::MEASUREMENT_UNITS_CODE_SEQUENCE, vec![code_item(units)]);
    }
    ds.put_sequence(tags::MEASURED_VALUE_SEQUENCE, vec![measured]);
    if let Some(qualifier) = &num.qualifier {
        ds.put_sequence(tags::NUMERIC_VALUE_QUALIFIER_CODE_SEQUENCE, vec![code_item(qualifier)]);
    }
}

/// Code Sequence Macro item
fn code_item(concept: &CodedConcept) -> DataSet {
    let mut item = DataSet::new();
    match &concept.identity {
        CodeIdentity::Short(value) => item.put_str(tags::CODE_VALUE, Vr::SH, value.as_str()),
        CodeIdentity::Long(value) => item.put_str(tags::LONG_CODE_VALUE, Vr::UC, value.as_str()),
        CodeIdentity::Urn(value) => item.put_str(tags::URN_CODE_VALUE, Vr::UR, value.as_str()),
    }
    item.put_str(tags::CODING_SCHEME_DESIGNATOR, Vr::SH, concept.scheme.as_str());
    put_opt(&mut item, tags::CODING_SCHEME_VERSION, Vr::SH, concept.scheme_version.as_ref());
    item.put_str(tags::CODE_MEANING, Vr::LO, concept.meaning.as_str());
    item
}

fn referenced_sop(reference: &ReferencedSop) -> DataSet {
    let mut item = DataSet::new()
        .with_str(tags::REFERENCED_SOP_CLASS_UID, Vr::UI, reference.sop_class_uid.as_str())
        .with_str(tags::REFERENCED_SOP_INSTANCE_UID, Vr::UI, reference.sop_instance_uid.as_str());
    if !reference.frames.is_empty() {
        item.put(
            tags::REFERENCED_FRAME_NUMBER,
            Element::strings(Vr::IS, reference.frames.iter().map(u32::to_string)),
        );
    }
    if !reference.segments.is_empty() {
        item.put_u16s(tags::REFERENCED_SEGMENT_NUMBER, reference.segments.clone());
    }
    if !reference.channels.is_empty() {
        item.put_u16s(tags::REFERENCED_WAVEFORM_CHANNELS, reference.channels.clone());
    }
    item
}

fn put_opt<S: AsRef<str>>(ds: &mut DataSet, tag: Tag, vr: Vr, value: Option<S>) {
    if let Some(value) = value {
        let value = value.as_ref();
        if !value.is_empty() {
            ds.put_str(tag, vr, value);
        }
    }
}
