//! PS3.5 value encoding
//!
//! Encodes element values and whole datasets in explicit VR little endian:
//!
//! - character strings are joined with `\` and padded to even length with the
//!   VR's padding byte (space, or NUL for UI)
//! - binary numbers are written little endian
//! - sequences use undefined length with item and sequence delimiters
//!
//! File meta information and transfer syntax negotiation are not handled
//! here; callers that write Part 10 files wrap this output.

use crate::tags::{ITEM, ITEM_DELIMITATION_ITEM, SEQUENCE_DELIMITATION_ITEM};
use crate::{DataSet, DataSetError, DataSetResult, Element, Tag, Value, Vr};

const UNDEFINED_LENGTH: u32 = 0xFFFF_FFFF;

impl Element {
    /// Encode the value field of this element
    pub fn encode_value(&self, tag: Tag) -> DataSetResult<Vec<u8>> {
        let mut out = Vec::new();
        match &self.value {
            Value::Empty => {}
            Value::Strings(values) => {
                if let Some(max) = self.vr.max_value_length() {
                    if let Some(long) = values.iter().find(|v| v.len() > max) {
                        return Err(DataSetError::invalid_value(
                            tag,
                            self.vr,
                            format!("'{}' exceeds {} bytes", long, max),
                        ));
                    }
                }
                out.extend_from_slice(values.join("\\").as_bytes());
            }
            Value::Tags(values) => {
                for t in values {
                    out.extend_from_slice(&t.group().to_le_bytes());
                    out.extend_from_slice(&t.element().to_le_bytes());
                }
            }
            Value::F32(values) => values.iter().for_each(|v| out.extend_from_slice(&v.to_le_bytes())),
            Value::F64(values) => values.iter().for_each(|v| out.extend_from_slice(&v.to_le_bytes())),
            Value::U16(values) => values.iter().for_each(|v| out.extend_from_slice(&v.to_le_bytes())),
            Value::I16(values) => values.iter().for_each(|v| out.extend_from_slice(&v.to_le_bytes())),
            Value::U32(values) => values.iter().for_each(|v| out.extend_from_slice(&v.to_le_bytes())),
            Value::I32(values) => values.iter().for_each(|v| out.extend_from_slice(&v.to_le_bytes())),
            Value::U64(values) => values.iter().for_each(|v| out.extend_from_slice(&v.to_le_bytes())),
            Value::I64(values) => values.iter().for_each(|v| out.extend_from_slice(&v.to_le_bytes())),
            Value::Bytes(bytes) => out.extend_from_slice(bytes),
            Value::Sequence(items) => {
                for item in items {
                    write_tag(&mut out, ITEM);
                    out.extend_from_slice(&UNDEFINED_LENGTH.to_le_bytes());
                    item.encode_into(&mut out)?;
                    write_tag(&mut out, ITEM_DELIMITATION_ITEM);
                    out.extend_from_slice(&0u32.to_le_bytes());
                }
                write_tag(&mut out, SEQUENCE_DELIMITATION_ITEM);
                out.extend_from_slice(&0u32.to_le_bytes());
                return Ok(out);
            }
        }
        if out.len() % 2 == 1 {
            out.push(self.vr.padding());
        }
        Ok(out)
    }
}

impl DataSet {
    /// Encode the dataset in explicit VR little endian
    pub fn to_explicit_le_bytes(&self) -> DataSetResult<Vec<u8>> {
        let mut out = Vec::new();
        self.encode_into(&mut out)?;
        Ok(out)
    }

    fn encode_into(&self, out: &mut Vec<u8>) -> DataSetResult<()> {
        for (tag, element) in self {
            let value = element.encode_value(*tag)?;
            write_tag(out, *tag);
            out.extend_from_slice(element.vr.as_str().as_bytes());
            if element.vr.has_long_length() {
                out.extend_from_slice(&[0, 0]);
                let length = if element.vr == Vr::SQ {
                    UNDEFINED_LENGTH
                } else {
                    u32::try_from(value.len()).map_err(|_| {
                        DataSetError::invalid_value(*tag, element.vr, "value too long")
                    })?
                };
                out.extend_from_slice(&length.to_le_bytes());
            } else {
                let length = u16::try_from(value.len()).map_err(|_| {
                    DataSetError::invalid_value(
                        *tag,
                        element.vr,
                        "value exceeds the 16-bit length field",
                    )
                })?;
                out.extend_from_slice(&length.to_le_bytes());
            }
            out.extend_from_slice(&value);
        }
        Ok(())
    }
}

fn write_tag(out: &mut Vec<u8>, tag: Tag) {
    out.extend_from_slice(&tag.group().to_le_bytes());
    out.extend_from_slice(&tag.element().to_le_bytes());
}
