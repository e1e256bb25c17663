//! Dataset to content tree
//!
//! The decoder reads the document identifiers and header, then walks the
//! Content Sequence (0040,A730) recursively, dispatching on Value Type
//! (0040,A040). Depth is passed down explicitly so the bound holds in both
//! modes regardless of how the dataset nests.

use crate::{DecodeOptions, ParseError, ParseResult};
use octofhir_sr_dataset::numeric::parse_decimal_string;
use octofhir_sr_dataset::{DataSet, Tag, Value, Vr, tags};
use octofhir_sr_diagnostics::ItemPosition;
use octofhir_sr_model::{
    CodeIdentity, CodedConcept, CompletionFlag, Container, ContentItem, ContentValue, Continuity,
    DicomDate, DicomDateTime, DicomTime, GraphicType, GraphicType3D, NumericValue, Patient,
    PreliminaryFlag, ReferencedSop, RelationshipType, Series, SpatialCoordinates,
    SpatialCoordinates3D, SrDocument, Study, TemplateReference, TemporalCoordinates,
    TemporalPositions, TemporalRangeType, ValueType, VerificationFlag, VerifyingObserver, codes, uid,
};
use rust_decimal::Decimal;
use smallvec::SmallVec;
use std::str::FromStr;

/// Decode a document with default options (strict, depth 100)
pub fn decode(ds: &DataSet) -> ParseResult<SrDocument> {
    decode_with(ds, &DecodeOptions::default())
}

/// Decode a document
pub fn decode_with(ds: &DataSet, options: &DecodeOptions) -> ParseResult<SrDocument> {
    Decoder { options }.document(ds)
}

/// Decode a single content item and its subtree
///
/// The item is treated as a root at depth 0. Returns `None` when lenient
/// decoding skips the item.
pub fn decode_item(ds: &DataSet, options: &DecodeOptions) -> ParseResult<Option<ContentItem>> {
    Decoder { options }.item(ds, 0, &ItemPosition::root())
}

struct Decoder<'a> {
    options: &'a DecodeOptions,
}

impl Decoder<'_> {
    /// Fail in strict mode, substitute `fallback` in lenient mode
    fn recover<T>(&self, error: ParseError, fallback: T) -> ParseResult<T> {
        if self.options.is_lenient() {
            log::warn!("{}; continuing with a placeholder", error);
            Ok(fallback)
        } else {
            Err(error)
        }
    }

    // === Document ===

    fn document(&self, ds: &DataSet) -> ParseResult<SrDocument> {
        let position = ItemPosition::root();
        let sop_class_uid = self.required_uid(ds, tags::SOP_CLASS_UID, "SOPClassUID", &position)?;
        let sop_instance_uid = self.required_uid(ds, tags::SOP_INSTANCE_UID, "SOPInstanceUID", &position)?;
        log::debug!("decoding SR document {} ({})", sop_instance_uid, sop_class_uid);

        let root = self.root(ds, &position)?;
        let mut doc = SrDocument::new(sop_class_uid, sop_instance_uid, root);
        doc.study_instance_uid = self.optional_uid(ds, tags::STUDY_INSTANCE_UID, "StudyInstanceUID")?;
        doc.series_instance_uid = self.optional_uid(ds, tags::SERIES_INSTANCE_UID, "SeriesInstanceUID")?;

        doc.patient = Patient {
            name: owned(ds, tags::PATIENT_NAME),
            id: owned(ds, tags::PATIENT_ID),
            birth_date: owned(ds, tags::PATIENT_BIRTH_DATE).map(DicomDate::new),
            sex: owned(ds, tags::PATIENT_SEX),
        };
        doc.study = Study {
            date: owned(ds, tags::STUDY_DATE).map(DicomDate::new),
            time: owned(ds, tags::STUDY_TIME).map(DicomTime::new),
            id: owned(ds, tags::STUDY_ID),
            accession_number: owned(ds, tags::ACCESSION_NUMBER),
            description: owned(ds, tags::STUDY_DESCRIPTION),
            referring_physician: owned(ds, tags::REFERRING_PHYSICIAN_NAME),
        };
        doc.series = Series {
            number: ds.int(tags::SERIES_NUMBER),
            description: owned(ds, tags::SERIES_DESCRIPTION),
            modality: owned(ds, tags::MODALITY),
        };
        doc.instance_number = ds.int(tags::INSTANCE_NUMBER);
        doc.content_date = owned(ds, tags::CONTENT_DATE).map(DicomDate::new);
        doc.content_time = owned(ds, tags::CONTENT_TIME).map(DicomTime::new);
        doc.manufacturer = owned(ds, tags::MANUFACTURER);

        doc.completion = flag::<CompletionFlag>(ds, tags::COMPLETION_FLAG);
        doc.verification = flag::<VerificationFlag>(ds, tags::VERIFICATION_FLAG);
        doc.preliminary = flag::<PreliminaryFlag>(ds, tags::PRELIMINARY_FLAG);
        doc.verifying_observers = ds
            .items(tags::VERIFYING_OBSERVER_SEQUENCE)
            .unwrap_or_default()
            .iter()
            .map(|observer| VerifyingObserver {
                name: owned(observer, tags::VERIFYING_OBSERVER_NAME).unwrap_or_default(),
                organization: owned(observer, tags::VERIFYING_ORGANIZATION),
                datetime: owned(observer, tags::VERIFICATION_DATETIME).map(DicomDateTime::new),
            })
            .collect();

        Ok(doc)
    }

    fn required_uid(
        &self,
        ds: &DataSet,
        tag: Tag,
        keyword: &'static str,
        position: &ItemPosition,
    ) -> ParseResult<String> {
        match ds.string(tag) {
            None => self.recover(ParseError::missing(keyword, tag, position), String::new()),
            Some(value) if !uid::is_valid(value) => self.recover(
                ParseError::InvalidSopIdentifier {
                    keyword,
                    value: value.to_string(),
                },
                value.to_string(),
            ),
            Some(value) => Ok(value.to_string()),
        }
    }

    fn optional_uid(&self, ds: &DataSet, tag: Tag, keyword: &'static str) -> ParseResult<Option<String>> {
        match ds.string(tag) {
            Some(value) if !uid::is_valid(value) => self
                .recover(
                    ParseError::InvalidSopIdentifier {
                        keyword,
                        value: value.to_string(),
                    },
                    value.to_string(),
                )
                .map(Some),
            other => Ok(other.map(str::to_string)),
        }
    }

    /// The document dataset doubles as the root content item
    fn root(&self, ds: &DataSet, position: &ItemPosition) -> ParseResult<ContentItem> {
        match ds.string(tags::VALUE_TYPE) {
            Some("CONTAINER") => {}
            Some(other) => {
                self.recover(
                    ParseError::content_sequence(format!("root item is {}, not CONTAINER", other), position),
                    (),
                )?;
            }
            None => self.recover(ParseError::missing("ValueType", tags::VALUE_TYPE, position), ())?,
        }

        let mut root = ContentItem::new(ContentValue::Container(self.container(ds, 0, position)?));
        root.concept_name = self.concept_name(ds, position)?;
        Ok(root)
    }

    // === Content items ===

    fn item(&self, ds: &DataSet, depth: usize, position: &ItemPosition) -> ParseResult<Option<ContentItem>> {
        if depth > self.options.max_depth {
            return Err(ParseError::MaxDepthExceeded {
                max_depth: self.options.max_depth,
                position: Some(position.clone()),
            });
        }

        let value_type = match ds.string(tags::VALUE_TYPE) {
            None => {
                return self.recover(ParseError::missing("ValueType", tags::VALUE_TYPE, position), None);
            }
            Some(text) => match ValueType::from_str(text) {
                Ok(vt) => vt,
                Err(value) => {
                    let error = ParseError::UnknownValueType {
                        value,
                        position: Some(position.clone()),
                    };
                    return self.recover(error, None);
                }
            },
        };
        log::debug!("item {} depth {}: {}", position, depth, value_type);

        let relationship = match ds.string(tags::RELATIONSHIP_TYPE) {
            None => None,
            Some(text) => match RelationshipType::from_str(text) {
                Ok(rel) => Some(rel),
                Err(value) => self.recover(
                    ParseError::content_sequence(format!("unknown relationship type '{}'", value), position),
                    None,
                )?,
            },
        };

        let value = match value_type {
            ValueType::Container => ContentValue::Container(self.container(ds, depth, position)?),
            leaf => {
                if ds.items(tags::CONTENT_SEQUENCE).is_some_and(|items| !items.is_empty()) {
                    self.recover(
                        ParseError::content_sequence(
                            format!("{} item has children; only containers may", leaf),
                            position,
                        ),
                        (),
                    )?;
                }
                self.leaf(ds, leaf, position)?
            }
        };

        Ok(Some(ContentItem {
            concept_name: self.concept_name(ds, position)?,
            relationship,
            observation_datetime: owned(ds, tags::OBSERVATION_DATETIME).map(DicomDateTime::new),
            observation_uid: owned(ds, tags::OBSERVATION_UID),
            value,
        }))
    }

    fn container(&self, ds: &DataSet, depth: usize, position: &ItemPosition) -> ParseResult<Container> {
        let continuity = match ds.string(tags::CONTINUITY_OF_CONTENT) {
            None => Continuity::Separate,
            Some(text) => Continuity::from_str(text).unwrap_or_else(|value| {
                log::warn!("unknown continuity of content '{}' at item {}; using SEPARATE", value, position);
                Continuity::Separate
            }),
        };
        let template = ds.item(tags::CONTENT_TEMPLATE_SEQUENCE).and_then(|t| {
            Some(TemplateReference {
                identifier: owned(t, tags::TEMPLATE_IDENTIFIER)?,
                mapping_resource: owned(t, tags::MAPPING_RESOURCE).unwrap_or_else(|| "DCMR".to_string()),
            })
        });

        Ok(Container {
            continuity,
            template,
            children: self.children(ds, depth, position)?,
        })
    }

    fn children(&self, ds: &DataSet, depth: usize, position: &ItemPosition) -> ParseResult<Vec<ContentItem>> {
        let Some(element) = ds.get(tags::CONTENT_SEQUENCE) else {
            return Ok(Vec::new());
        };
        let items = match (&element.vr, &element.value) {
            (Vr::SQ, Value::Sequence(items)) => items.as_slice(),
            (Vr::SQ, Value::Empty) => &[],
            (vr, _) => {
                return self.recover(
                    ParseError::content_sequence(format!("ContentSequence has VR {}, expected SQ", vr), position),
                    Vec::new(),
                );
            }
        };

        let mut children = Vec::with_capacity(items.len());
        for (index, child) in items.iter().enumerate() {
            let child_position = position.child(ordinal(index));
            if let Some(item) = self.item(child, depth + 1, &child_position)? {
                children.push(item);
            }
        }
        Ok(children)
    }

    fn leaf(&self, ds: &DataSet, value_type: ValueType, position: &ItemPosition) -> ParseResult<ContentValue> {
        let value = match value_type {
            ValueType::Text => ContentValue::Text(self.text(ds, tags::TEXT_VALUE, "TextValue", position)?),
            ValueType::Code => ContentValue::Code(self.concept_code(ds, position)?),
            ValueType::Numeric => ContentValue::Numeric(self.numeric(ds, position)?),
            ValueType::Date => ContentValue::Date(DicomDate::new(self.text(ds, tags::DATE, "Date", position)?)),
            ValueType::Time => ContentValue::Time(DicomTime::new(self.text(ds, tags::TIME, "Time", position)?)),
            ValueType::DateTime => {
                ContentValue::DateTime(DicomDateTime::new(self.text(ds, tags::DATETIME, "DateTime", position)?))
            }
            ValueType::PersonName => {
                ContentValue::PersonName(self.text(ds, tags::PERSON_NAME, "PersonName", position)?)
            }
            ValueType::UidReference => ContentValue::UidReference(self.text(ds, tags::UID, "UID", position)?),
            ValueType::Composite => ContentValue::Composite(self.reference(ds, value_type, position)?),
            ValueType::Image => ContentValue::Image(self.reference(ds, value_type, position)?),
            ValueType::Waveform => ContentValue::Waveform(self.reference(ds, value_type, position)?),
            ValueType::SpatialCoordinates => ContentValue::SpatialCoordinates(self.scoord(ds, position)?),
            ValueType::SpatialCoordinates3D => ContentValue::SpatialCoordinates3D(self.scoord3d(ds, position)?),
            ValueType::TemporalCoordinates => ContentValue::TemporalCoordinates(self.tcoord(ds, position)?),
            ValueType::Container => ContentValue::Container(Container::new(Vec::new())),
        };
        Ok(value)
    }

    fn text(&self, ds: &DataSet, tag: Tag, keyword: &'static str, position: &ItemPosition) -> ParseResult<String> {
        match ds.string(tag) {
            Some(value) => Ok(value.to_string()),
            None => self.recover(ParseError::missing(keyword, tag, position), String::new()),
        }
    }

    // === Codes ===

    fn concept_name(&self, ds: &DataSet, position: &ItemPosition) -> ParseResult<Option<CodedConcept>> {
        let Some(item) = ds.item(tags::CONCEPT_NAME_CODE_SEQUENCE) else {
            return Ok(None);
        };
        match read_concept(item) {
            Ok(concept) => Ok(Some(concept)),
            Err(message) => self.recover(
                ParseError::coded_concept("ConceptNameCodeSequence", message, position),
                None,
            ),
        }
    }

    fn concept_code(&self, ds: &DataSet, position: &ItemPosition) -> ParseResult<CodedConcept> {
        let Some(item) = ds.item(tags::CONCEPT_CODE_SEQUENCE) else {
            return self.recover(
                ParseError::missing("ConceptCodeSequence", tags::CONCEPT_CODE_SEQUENCE, position),
                codes::UNKNOWN.concept(),
            );
        };
        match read_concept(item) {
            Ok(concept) => Ok(concept),
            Err(message) => self.recover(
                ParseError::coded_concept("ConceptCodeSequence", message, position),
                codes::UNKNOWN.concept(),
            ),
        }
    }

    fn optional_code(
        &self,
        ds: &DataSet,
        tag: Tag,
        keyword: &'static str,
        position: &ItemPosition,
    ) -> ParseResult<Option<CodedConcept>> {
        match ds.item(tag).map(read_concept) {
            None => Ok(None),
            Some(Ok(concept)) => Ok(Some(concept)),
            Some(Err(message)) => self.recover(ParseError::coded_concept(keyword, message, position), None),
        }
    }

    // === NUM ===

    fn numeric(&self, ds: &DataSet, position: &ItemPosition) -> ParseResult<NumericValue> {
        let measured = ds.item(tags::MEASURED_VALUE_SEQUENCE);
        let source = measured.unwrap_or(ds);

        let values = match decimals(source, tags::NUMERIC_VALUE) {
            Some(values) if !values.is_empty() => values,
            _ => {
                let malformed = source
                    .strings(tags::NUMERIC_VALUE)
                    .unwrap_or_default()
                    .iter()
                    .find(|v| !v.trim().is_empty() && parse_decimal_string(v).is_none());
                let error = match malformed {
                    Some(value) => ParseError::invalid_value("NumericValue", tags::NUMERIC_VALUE, value.as_str(), position),
                    None => ParseError::missing("NumericValue", tags::NUMERIC_VALUE, position),
                };
                self.recover(error, SmallVec::from_elem(Decimal::ZERO, 1))?
            }
        };

        let units = self.optional_code(
            source,
            tags::MEASUREMENT_UNITS_CODE_SEQUENCE,
            "MeasurementUnitsCodeSequence",
            position,
        )?;
        let qualifier_source = if ds.contains(tags::NUMERIC_VALUE_QUALIFIER_CODE_SEQUENCE) {
            ds
        } else {
            source
        };
        let qualifier = self.optional_code(
            qualifier_source,
            tags::NUMERIC_VALUE_QUALIFIER_CODE_SEQUENCE,
            "NumericValueQualifierCodeSequence",
            position,
        )?;

        Ok(NumericValue {
            values,
            units,
            float_values: source.f64s(tags::FLOATING_POINT_VALUE).map(<[f64]>::to_vec),
            qualifier,
        })
    }

    // === COMPOSITE / IMAGE / WAVEFORM ===

    fn reference(&self, ds: &DataSet, value_type: ValueType, position: &ItemPosition) -> ParseResult<ReferencedSop> {
        let Some(item) = ds.item(tags::REFERENCED_SOP_SEQUENCE) else {
            return self.recover(
                ParseError::referenced_sop(format!("{} item has no referenced SOP", value_type), position),
                ReferencedSop::default(),
            );
        };

        let mut reference = ReferencedSop::default();
        for (tag, keyword, slot) in [
            (tags::REFERENCED_SOP_CLASS_UID, "ReferencedSOPClassUID", &mut reference.sop_class_uid),
            (tags::REFERENCED_SOP_INSTANCE_UID, "ReferencedSOPInstanceUID", &mut reference.sop_instance_uid),
        ] {
            *slot = match item.string(tag) {
                Some(value) => value.to_string(),
                None => self.recover(ParseError::referenced_sop(format!("missing {}", keyword), position), String::new())?,
            };
        }

        match value_type {
            ValueType::Image => {
                reference.frames = item
                    .ints(tags::REFERENCED_FRAME_NUMBER)
                    .unwrap_or_default()
                    .into_iter()
                    .filter_map(|v| u32::try_from(v).ok())
                    .collect();
                reference.segments = item
                    .ints(tags::REFERENCED_SEGMENT_NUMBER)
                    .unwrap_or_default()
                    .into_iter()
                    .filter_map(|v| u16::try_from(v).ok())
                    .collect();
            }
            ValueType::Waveform => {
                reference.channels = item
                    .ints(tags::REFERENCED_WAVEFORM_CHANNELS)
                    .unwrap_or_default()
                    .into_iter()
                    .filter_map(|v| u16::try_from(v).ok())
                    .collect();
            }
            _ => {}
        }
        Ok(reference)
    }

    // === SCOORD / SCOORD3D / TCOORD ===

    fn scoord(&self, ds: &DataSet, position: &ItemPosition) -> ParseResult<SpatialCoordinates> {
        let placeholder = SpatialCoordinates::new(GraphicType::Point, Vec::new());
        let graphic_type = match ds.string(tags::GRAPHIC_TYPE).map(GraphicType::from_str) {
            Some(Ok(gt)) => gt,
            Some(Err(value)) => {
                return self.recover(ParseError::graphic_data(format!("unknown graphic type '{}'", value), position), placeholder);
            }
            None => return self.recover(ParseError::graphic_data("missing graphic type", position), placeholder),
        };
        let data = self.graphic_data(ds, position)?;
        if !graphic_type.accepts(data.len()) {
            self.recover(
                ParseError::graphic_data(format!("{} values do not form a {}", data.len(), graphic_type), position),
                (),
            )?;
        }
        Ok(SpatialCoordinates::new(graphic_type, data))
    }

    fn scoord3d(&self, ds: &DataSet, position: &ItemPosition) -> ParseResult<SpatialCoordinates3D> {
        let placeholder = SpatialCoordinates3D::new(GraphicType3D::Point, Vec::new());
        let graphic_type = match ds.string(tags::GRAPHIC_TYPE).map(GraphicType3D::from_str) {
            Some(Ok(gt)) => gt,
            Some(Err(value)) => {
                return self.recover(ParseError::graphic_data(format!("unknown graphic type '{}'", value), position), placeholder);
            }
            None => return self.recover(ParseError::graphic_data("missing graphic type", position), placeholder),
        };
        let data = self.graphic_data(ds, position)?;
        if !graphic_type.accepts(data.len()) {
            self.recover(
                ParseError::graphic_data(format!("{} values do not form a 3D {}", data.len(), graphic_type), position),
                (),
            )?;
        }
        Ok(SpatialCoordinates3D {
            graphic_type,
            graphic_data: data,
            frame_of_reference_uid: owned(ds, tags::FRAME_OF_REFERENCE_UID),
        })
    }

    fn graphic_data(&self, ds: &DataSet, position: &ItemPosition) -> ParseResult<Vec<f32>> {
        if let Some(values) = ds.f32s(tags::GRAPHIC_DATA) {
            return Ok(values.to_vec());
        }
        if let Some(values) = ds.f64s(tags::GRAPHIC_DATA) {
            return Ok(values.iter().map(|v| *v as f32).collect());
        }
        self.recover(ParseError::graphic_data("missing graphic data", position), Vec::new())
    }

    fn tcoord(&self, ds: &DataSet, position: &ItemPosition) -> ParseResult<TemporalCoordinates> {
        let range_type = match ds.string(tags::TEMPORAL_RANGE_TYPE).map(TemporalRangeType::from_str) {
            Some(Ok(rt)) => rt,
            _ => self.recover(
                ParseError::missing("TemporalRangeType", tags::TEMPORAL_RANGE_TYPE, position),
                TemporalRangeType::Point,
            )?,
        };

        let positions = if let Some(samples) = ds.ints(tags::REFERENCED_SAMPLE_POSITIONS) {
            TemporalPositions::SamplePositions(samples.into_iter().filter_map(|v| u32::try_from(v).ok()).collect())
        } else if let Some(offsets) = decimals(ds, tags::REFERENCED_TIME_OFFSETS) {
            TemporalPositions::TimeOffsets(offsets.into_vec())
        } else if let Some(datetimes) = ds.strings(tags::REFERENCED_DATETIME) {
            TemporalPositions::DateTimes(datetimes.iter().map(|v| DicomDateTime::new(v.trim())).collect())
        } else {
            TemporalPositions::SamplePositions(Vec::new())
        };

        Ok(TemporalCoordinates::new(range_type, positions))
    }
}

/// Read a Code Sequence Macro item
fn read_concept(item: &DataSet) -> Result<CodedConcept, String> {
    let identity = if let Some(value) = item.string(tags::CODE_VALUE) {
        CodeIdentity::Short(value.to_string())
    } else if let Some(value) = item.string(tags::LONG_CODE_VALUE) {
        CodeIdentity::Long(value.to_string())
    } else if let Some(value) = item.string(tags::URN_CODE_VALUE) {
        CodeIdentity::Urn(value.to_string())
    } else {
        return Err("no code value".to_string());
    };
    let scheme = item
        .string(tags::CODING_SCHEME_DESIGNATOR)
        .ok_or_else(|| format!("code '{}' has no coding scheme designator", identity.value()))?;

    let mut concept = CodedConcept::with_identity(identity, scheme, item.string(tags::CODE_MEANING).unwrap_or_default());
    concept.scheme_version = owned(item, tags::CODING_SCHEME_VERSION);
    Ok(concept)
}

/// DS values, or float values carried under a DS tag
///
/// Returns `None` when the element is absent or any value fails to parse.
fn decimals(ds: &DataSet, tag: Tag) -> Option<SmallVec<[Decimal; 1]>> {
    if let Some(values) = ds.strings(tag) {
        return values
            .iter()
            .filter(|v| !v.trim().is_empty())
            .map(|v| parse_decimal_string(v))
            .collect();
    }
    let floats = ds.f64s(tag)?;
    floats.iter().map(|v| Decimal::try_from(*v).ok()).collect()
}

fn owned(ds: &DataSet, tag: Tag) -> Option<String> {
    ds.string(tag).map(str::to_string)
}

fn flag<T: FromStr<Err = String>>(ds: &DataSet, tag: Tag) -> Option<T> {
    let text = ds.string(tag)?;
    match T::from_str(text) {
        Ok(value) => Some(value),
        Err(value) => {
            log::warn!("ignoring unknown value '{}' for {}", value, tag);
            None
        }
    }
}

fn ordinal(index: usize) -> u32 {
    u32::try_from(index + 1).unwrap_or(u32::MAX)
}
