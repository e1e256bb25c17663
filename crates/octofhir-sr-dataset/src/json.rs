//! DICOM JSON Model (PS3.18 Annex F)
//!
//! Each element is an object keyed by its 8-digit tag with a `vr` member and
//! either a `Value` array or an `InlineBinary` base64 string. Mapping rules:
//!
//! - string VRs map to JSON strings; PN values are objects with an
//!   `Alphabetic` component group
//! - DS and IS map to JSON numbers, and are accepted as strings on input
//! - binary numeric VRs map to JSON numbers
//! - SQ maps to an array of nested dataset objects
//! - AT values are 8-digit hexadecimal strings
//!
//! `BulkDataURI` values are not resolved; such elements are read as empty.

use crate::numeric::parse_decimal_string;
use crate::{DataSet, DataSetError, DataSetResult, Element, Tag, Value, Vr};
use base64::{Engine as _, engine::general_purpose::STANDARD};
use serde::Deserialize;
use serde_json::{Map, Number, Value as JsonValue, json};

const VR_KEY: &str = "vr";
const VALUE_KEY: &str = "Value";
const INLINE_BINARY_KEY: &str = "InlineBinary";
const BULK_DATA_URI_KEY: &str = "BulkDataURI";
const PN_GROUPS: [&str; 3] = ["Alphabetic", "Ideographic", "Phonetic"];

/// JSON levels per content item: dataset object, attribute object, `Value` array
const LEVELS_PER_ITEM: usize = 3;
/// Nesting below the deepest item (measured values, units, concept names)
const LEAF_HEADROOM: usize = 16;

/// Nesting accepted by [`from_json_str`], enough for 100 levels of content
pub const DEFAULT_MAX_NESTING: usize = nesting_for_depth(100);

/// JSON nesting needed to carry a content tree of the given depth
///
/// The headroom lets a tree one level too deep reach the decoder, which
/// reports it against its own depth bound.
pub const fn nesting_for_depth(content_depth: usize) -> usize {
    content_depth
        .saturating_add(2)
        .saturating_mul(LEVELS_PER_ITEM)
        .saturating_add(LEAF_HEADROOM)
}

// === Reading ===

/// Read a dataset from DICOM JSON text
///
/// A top-level array is accepted; its first object is read.
pub fn from_json_str(text: &str) -> DataSetResult<DataSet> {
    from_json_str_with_limit(text, DEFAULT_MAX_NESTING)
}

/// Read a dataset, rejecting JSON nested deeper than `max_nesting`
///
/// serde_json's own recursion limit is off; the bound is checked on the raw
/// text first so deeply nested input never reaches the parser.
pub fn from_json_str_with_limit(text: &str, max_nesting: usize) -> DataSetResult<DataSet> {
    let nesting = json_nesting(text);
    if nesting > max_nesting {
        return Err(DataSetError::malformed(format!(
            "JSON nesting of {} exceeds the limit of {}",
            nesting, max_nesting
        )));
    }
    let mut deserializer = serde_json::Deserializer::from_str(text);
    deserializer.disable_recursion_limit();
    let value = JsonValue::deserialize(&mut deserializer)?;
    deserializer.end()?;
    from_json_value(&value)
}

/// Deepest bracket nesting outside string literals
fn json_nesting(text: &str) -> usize {
    let mut depth = 0usize;
    let mut deepest = 0usize;
    let mut in_string = false;
    let mut escaped = false;
    for byte in text.bytes() {
        if in_string {
            match byte {
                _ if escaped => escaped = false,
                b'\\' => escaped = true,
                b'"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match byte {
            b'"' => in_string = true,
            b'{' | b'[' => {
                depth += 1;
                deepest = deepest.max(depth);
            }
            b'}' | b']' => depth = depth.saturating_sub(1),
            _ => {}
        }
    }
    deepest
}

/// Read a dataset from a parsed DICOM JSON value
pub fn from_json_value(value: &JsonValue) -> DataSetResult<DataSet> {
    match value {
        JsonValue::Object(map) => read_dataset(map),
        JsonValue::Array(items) => match items.first() {
            Some(JsonValue::Object(map)) => read_dataset(map),
            Some(_) => Err(DataSetError::malformed("array does not contain an object")),
            None => Err(DataSetError::malformed("empty array")),
        },
        _ => Err(DataSetError::malformed("expected an object")),
    }
}

fn read_dataset(map: &Map<String, JsonValue>) -> DataSetResult<DataSet> {
    let mut ds = DataSet::new();
    for (key, attribute) in map {
        let tag = Tag::from_json_key(key).ok_or_else(|| DataSetError::InvalidTag { key: key.clone() })?;
        let attribute = attribute
            .as_object()
            .ok_or_else(|| DataSetError::malformed(format!("attribute {} is not an object", key)))?;
        ds.put(tag, read_element(tag, attribute)?);
    }
    Ok(ds)
}

fn read_element(tag: Tag, attribute: &Map<String, JsonValue>) -> DataSetResult<Element> {
    let vr_name = attribute
        .get(VR_KEY)
        .and_then(JsonValue::as_str)
        .ok_or_else(|| DataSetError::malformed(format!("attribute {} has no vr", tag)))?;
    let vr: Vr = vr_name.parse().map_err(|vr| DataSetError::UnsupportedVr { tag, vr })?;

    if let Some(encoded) = attribute.get(INLINE_BINARY_KEY) {
        let encoded = encoded
            .as_str()
            .ok_or_else(|| DataSetError::invalid_value(tag, vr, "InlineBinary is not a string"))?;
        let bytes = STANDARD
            .decode(encoded)
            .map_err(|e| DataSetError::invalid_value(tag, vr, e.to_string()))?;
        return Ok(Element::new(vr, Value::Bytes(bytes)));
    }

    if attribute.contains_key(BULK_DATA_URI_KEY) {
        log::warn!("{} references bulk data that is not resolved; reading as empty", tag);
        return Ok(Element::empty(vr));
    }

    let values = match attribute.get(VALUE_KEY) {
        None | Some(JsonValue::Null) => return Ok(Element::empty(vr)),
        Some(JsonValue::Array(values)) => values,
        Some(_) => return Err(DataSetError::invalid_value(tag, vr, "Value is not an array")),
    };
    if values.is_empty() {
        return Ok(Element::empty(vr));
    }

    let value = match vr {
        Vr::SQ => Value::Sequence(
            values
                .iter()
                .map(|item| match item {
                    JsonValue::Object(map) => read_dataset(map),
                    JsonValue::Null => Ok(DataSet::new()),
                    _ => Err(DataSetError::invalid_value(tag, vr, "sequence item is not an object")),
                })
                .collect::<DataSetResult<_>>()?,
        ),
        Vr::PN => Value::Strings(values.iter().map(read_person_name).collect()),
        Vr::AT => Value::Tags(
            values
                .iter()
                .map(|v| {
                    v.as_str()
                        .and_then(Tag::from_json_key)
                        .ok_or_else(|| DataSetError::invalid_value(tag, vr, "invalid AT value"))
                })
                .collect::<DataSetResult<_>>()?,
        ),
        Vr::DS | Vr::IS => Value::Strings(
            values
                .iter()
                .map(|v| match v {
                    JsonValue::Number(n) => Ok(n.to_string()),
                    JsonValue::String(s) => Ok(s.trim().to_string()),
                    JsonValue::Null => Ok(String::new()),
                    _ => Err(DataSetError::invalid_value(tag, vr, "expected a number")),
                })
                .collect::<DataSetResult<_>>()?,
        ),
        vr if vr.is_string() => Value::Strings(
            values
                .iter()
                .map(|v| match v {
                    JsonValue::String(s) => Ok(s.clone()),
                    JsonValue::Null => Ok(String::new()),
                    JsonValue::Number(n) => Ok(n.to_string()),
                    _ => Err(DataSetError::invalid_value(tag, vr, "expected a string")),
                })
                .collect::<DataSetResult<_>>()?,
        ),
        Vr::FL | Vr::OF => Value::F32(numbers(tag, vr, values, |n| n.as_f64().map(|f| f as f32))?),
        Vr::FD | Vr::OD => Value::F64(numbers(tag, vr, values, Number::as_f64)?),
        Vr::US => Value::U16(numbers(tag, vr, values, |n| n.as_u64().and_then(|v| u16::try_from(v).ok()))?),
        Vr::SS => Value::I16(numbers(tag, vr, values, |n| n.as_i64().and_then(|v| i16::try_from(v).ok()))?),
        Vr::UL | Vr::OL => Value::U32(numbers(tag, vr, values, |n| n.as_u64().and_then(|v| u32::try_from(v).ok()))?),
        Vr::SL => Value::I32(numbers(tag, vr, values, |n| n.as_i64().and_then(|v| i32::try_from(v).ok()))?),
        Vr::UV | Vr::OV => Value::U64(numbers(tag, vr, values, Number::as_u64)?),
        Vr::SV => Value::I64(numbers(tag, vr, values, Number::as_i64)?),
        _ => {
            return Err(DataSetError::UnsupportedVr {
                tag,
                vr: vr.to_string(),
            });
        }
    };
    Ok(Element::new(vr, value))
}

fn numbers<T>(
    tag: Tag,
    vr: Vr,
    values: &[JsonValue],
    convert: impl Fn(&Number) -> Option<T>,
) -> DataSetResult<Vec<T>> {
    values
        .iter()
        .map(|v| {
            let converted = match v {
                JsonValue::Number(n) => convert(n),
                JsonValue::String(s) => s.trim().parse::<Number>().ok().as_ref().and_then(&convert),
                _ => None,
            };
            converted.ok_or_else(|| DataSetError::invalid_value(tag, vr, format!("invalid number {}", v)))
        })
        .collect()
}

fn read_person_name(value: &JsonValue) -> String {
    match value {
        JsonValue::String(s) => s.clone(),
        JsonValue::Object(groups) => {
            let parts: Vec<&str> = PN_GROUPS
                .iter()
                .map(|g| groups.get(*g).and_then(JsonValue::as_str).unwrap_or(""))
                .collect();
            let used = parts.iter().rposition(|p| !p.is_empty()).map_or(0, |i| i + 1);
            parts[..used].join("=")
        }
        _ => String::new(),
    }
}

// === Writing ===

/// Write a dataset as DICOM JSON text
pub fn to_json_string(ds: &DataSet, pretty: bool) -> DataSetResult<String> {
    let value = to_json_value(ds)?;
    let text = if pretty {
        serde_json::to_string_pretty(&value)?
    } else {
        serde_json::to_string(&value)?
    };
    Ok(text)
}

/// Convert a dataset to a DICOM JSON value
pub fn to_json_value(ds: &DataSet) -> DataSetResult<JsonValue> {
    let mut map = Map::new();
    for (tag, element) in ds {
        map.insert(tag.to_json_key(), write_element(*tag, element)?);
    }
    Ok(JsonValue::Object(map))
}

fn write_element(tag: Tag, element: &Element) -> DataSetResult<JsonValue> {
    let vr = element.vr;
    let mut attribute = Map::new();
    attribute.insert(VR_KEY.to_string(), json!(vr.as_str()));

    let values: Vec<JsonValue> = match &element.value {
        Value::Empty => Vec::new(),
        Value::Bytes(bytes) => {
            attribute.insert(INLINE_BINARY_KEY.to_string(), json!(STANDARD.encode(bytes)));
            return Ok(JsonValue::Object(attribute));
        }
        Value::Strings(values) => match vr {
            Vr::PN => values.iter().map(|v| write_person_name(v)).collect(),
            Vr::DS => values
                .iter()
                .map(|v| write_decimal(v).unwrap_or_else(|| json!(v)))
                .collect(),
            Vr::IS => values
                .iter()
                .map(|v| v.trim().parse::<i64>().map_or_else(|_| json!(v), |i| json!(i)))
                .collect(),
            _ => values.iter().map(|v| json!(v)).collect(),
        },
        Value::Tags(values) => values.iter().map(|t| json!(t.to_json_key())).collect(),
        Value::F32(values) => values.iter().map(|v| float(tag, vr, f64::from(*v))).collect::<DataSetResult<_>>()?,
        Value::F64(values) => values.iter().map(|v| float(tag, vr, *v)).collect::<DataSetResult<_>>()?,
        Value::U16(values) => values.iter().map(|v| json!(v)).collect(),
        Value::I16(values) => values.iter().map(|v| json!(v)).collect(),
        Value::U32(values) => values.iter().map(|v| json!(v)).collect(),
        Value::I32(values) => values.iter().map(|v| json!(v)).collect(),
        Value::U64(values) => values.iter().map(|v| json!(v)).collect(),
        Value::I64(values) => values.iter().map(|v| json!(v)).collect(),
        Value::Sequence(items) => items.iter().map(to_json_value).collect::<DataSetResult<_>>()?,
    };

    if !values.is_empty() {
        attribute.insert(VALUE_KEY.to_string(), JsonValue::Array(values));
    }
    Ok(JsonValue::Object(attribute))
}

fn write_person_name(value: &str) -> JsonValue {
    let mut groups = Map::new();
    for (name, part) in PN_GROUPS.iter().zip(value.split('=')) {
        if !part.is_empty() {
            groups.insert((*name).to_string(), json!(part));
        }
    }
    JsonValue::Object(groups)
}

/// DS text as a JSON number, keeping the textual form where JSON allows it
fn write_decimal(value: &str) -> Option<JsonValue> {
    let trimmed = value.trim();
    if let Ok(n) = trimmed.parse::<Number>() {
        return Some(JsonValue::Number(n));
    }
    let decimal = parse_decimal_string(trimmed)?;
    decimal.to_string().parse::<Number>().ok().map(JsonValue::Number)
}

fn float(tag: Tag, vr: Vr, value: f64) -> DataSetResult<JsonValue> {
    Number::from_f64(value)
        .map(JsonValue::Number)
        .ok_or_else(|| DataSetError::invalid_value(tag, vr, "non-finite value cannot be written as JSON"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tags;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_read_strings_and_numbers() {
        let ds = from_json_str(
            r#"{
                "0040A040": {"vr": "CS", "Value": ["NUM"]},
                "0040A30A": {"vr": "DS", "Value": [12.5, "3"]},
                "00700022": {"vr": "FL", "Value": [1.0, 2.5]},
                "00081160": {"vr": "IS", "Value": [1, 2]}
            }"#,
        )
        .unwrap();

        assert_eq!(ds.string(tags::VALUE_TYPE), Some("NUM"));
        assert_eq!(
            ds.strings(tags::NUMERIC_VALUE).unwrap().to_vec(),
            vec!["12.5".to_string(), "3".to_string()]
        );
        assert_eq!(ds.f32s(tags::GRAPHIC_DATA), Some(&[1.0f32, 2.5][..]));
        assert_eq!(ds.ints(tags::REFERENCED_FRAME_NUMBER), Some(vec![1, 2]));
    }

    #[test]
    fn test_read_person_name_and_sequence() {
        let ds = from_json_str(
            r#"[{
                "0040A123": {"vr": "PN", "Value": [{"Alphabetic": "Doe^Jane"}]},
                "0040A043": {"vr": "SQ", "Value": [
                    {"00080100": {"vr": "SH", "Value": ["121071"]}}
                ]},
                "0040A730": {"vr": "SQ"}
            }]"#,
        )
        .unwrap();

        assert_eq!(ds.string(tags::PERSON_NAME), Some("Doe^Jane"));
        let concept = ds.item(tags::CONCEPT_NAME_CODE_SEQUENCE).unwrap();
        assert_eq!(concept.string(tags::CODE_VALUE), Some("121071"));
        assert_eq!(ds.items(tags::CONTENT_SEQUENCE).map(<[_]>::len), Some(0));
    }

    #[test]
    fn test_read_inline_binary() {
        let ds = from_json_str(r#"{"00091010": {"vr": "OB", "InlineBinary": "AQID"}}"#).unwrap();
        assert_eq!(ds.bytes(Tag::new(0x0009, 0x1010)), Some(&[1u8, 2, 3][..]));
    }

    #[test]
    fn test_read_errors() {
        assert!(matches!(
            from_json_str(r#"{"XYZ": {"vr": "CS"}}"#),
            Err(DataSetError::InvalidTag { .. })
        ));
        assert!(matches!(
            from_json_str(r#"{"0040A040": {"vr": "ZZ"}}"#),
            Err(DataSetError::UnsupportedVr { .. })
        ));
        assert!(matches!(
            from_json_str(r#"{"00700022": {"vr": "FL", "Value": ["abc"]}}"#),
            Err(DataSetError::InvalidValue { .. })
        ));
        assert!(matches!(from_json_str("42"), Err(DataSetError::MalformedJson { .. })));
        assert!(matches!(from_json_str("{"), Err(DataSetError::Json(_))));
    }

    #[test]
    fn test_write() {
        let mut ds = DataSet::new();
        ds.put_str(tags::VALUE_TYPE, Vr::CS, "NUM");
        ds.put_str(tags::NUMERIC_VALUE, Vr::DS, "12.5");
        ds.put_str(tags::PERSON_NAME, Vr::PN, "Doe^Jane");
        ds.put(tags::CONTENT_SEQUENCE, Element::empty(Vr::SQ));

        let value = to_json_value(&ds).unwrap();
        assert_eq!(
            value,
            json!({
                "0040A040": {"vr": "CS", "Value": ["NUM"]},
                "0040A123": {"vr": "PN", "Value": [{"Alphabetic": "Doe^Jane"}]},
                "0040A30A": {"vr": "DS", "Value": [12.5]},
                "0040A730": {"vr": "SQ"}
            })
        );
    }

    #[test]
    fn test_write_then_read_preserves_dataset() {
        let item = DataSet::new()
            .with_str(tags::CODE_VALUE, Vr::SH, "126000")
            .with_str(tags::CODING_SCHEME_DESIGNATOR, Vr::SH, "DCM");
        let mut ds = DataSet::new().with_sequence(tags::CONCEPT_NAME_CODE_SEQUENCE, vec![item]);
        ds.put_f32s(tags::GRAPHIC_DATA, vec![10.0, 20.5]);
        ds.put_u16s(tags::REFERENCED_SEGMENT_NUMBER, vec![1]);

        let text = to_json_string(&ds, true).unwrap();
        assert_eq!(from_json_str(&text).unwrap(), ds);
    }

    fn nested_sequences(levels: usize) -> DataSet {
        let mut ds = DataSet::new().with_str(tags::VALUE_TYPE, Vr::CS, "TEXT");
        for _ in 0..levels {
            ds = DataSet::new().with_sequence(tags::CONTENT_SEQUENCE, vec![ds]);
        }
        ds
    }

    #[test]
    fn test_deep_sequences_read_back() {
        // 3 JSON levels per sequence, well past serde_json's default of 128
        let ds = nested_sequences(90);
        let text = to_json_string(&ds, false).unwrap();
        assert_eq!(from_json_str(&text).unwrap(), ds);
    }

    #[test]
    fn test_nesting_limit() {
        let text = to_json_string(&nested_sequences(5), false).unwrap();
        assert!(from_json_str_with_limit(&text, 18).is_ok());
        let err = from_json_str_with_limit(&text, 17).unwrap_err();
        assert!(matches!(err, DataSetError::MalformedJson { ref message } if message.contains("nesting of 18")));
    }

    #[test]
    fn test_nesting_ignores_string_contents() {
        assert_eq!(json_nesting(r#"{"a": "[[[{"}"#), 1);
        assert_eq!(json_nesting(r#"["\"[", [1]]"#), 2);
        assert_eq!(json_nesting("42"), 0);
    }
}
