//! In-memory tagged attribute dataset

use crate::{Element, Tag, Value, Vr};
use std::collections::BTreeMap;
use std::collections::btree_map;

/// An ordered set of data elements keyed by tag
///
/// Elements iterate in ascending tag order, which is the order the standard
/// requires on the wire.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DataSet {
    elements: BTreeMap<Tag, Element>,
}

impl DataSet {
    /// Create an empty dataset
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of elements
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Check if the dataset has no elements
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Iterate over elements in tag order
    pub fn iter(&self) -> btree_map::Iter<'_, Tag, Element> {
        self.elements.iter()
    }

    /// Check if an element is present
    pub fn contains(&self, tag: Tag) -> bool {
        self.elements.contains_key(&tag)
    }

    /// Get an element
    pub fn get(&self, tag: Tag) -> Option<&Element> {
        self.elements.get(&tag)
    }

    /// Remove an element
    pub fn remove(&mut self, tag: Tag) -> Option<Element> {
        self.elements.remove(&tag)
    }

    /// Insert or replace an element
    pub fn put(&mut self, tag: Tag, element: Element) -> Option<Element> {
        self.elements.insert(tag, element)
    }

    // === Construction ===

    /// Put a single string value
    pub fn put_str(&mut self, tag: Tag, vr: Vr, value: impl Into<String>) {
        let value: String = value.into();
        self.put(tag, Element::strings(vr, [value]));
    }

    /// Put a multi-valued string element
    pub fn put_strings<I, S>(&mut self, tag: Tag, vr: Vr, values: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.put(tag, Element::strings(vr, values));
    }

    /// Put single precision floats (FL)
    pub fn put_f32s(&mut self, tag: Tag, values: Vec<f32>) {
        self.put(tag, Element::new(Vr::FL, Value::F32(values)));
    }

    /// Put double precision floats (FD)
    pub fn put_f64s(&mut self, tag: Tag, values: Vec<f64>) {
        self.put(tag, Element::new(Vr::FD, Value::F64(values)));
    }

    /// Put unsigned shorts (US)
    pub fn put_u16s(&mut self, tag: Tag, values: Vec<u16>) {
        self.put(tag, Element::new(Vr::US, Value::U16(values)));
    }

    /// Put unsigned longs (UL)
    pub fn put_u32s(&mut self, tag: Tag, values: Vec<u32>) {
        self.put(tag, Element::new(Vr::UL, Value::U32(values)));
    }

    /// Put a sequence of items
    pub fn put_sequence(&mut self, tag: Tag, items: Vec<DataSet>) {
        self.put(tag, Element::sequence(items));
    }

    /// Builder form of [`DataSet::put_str`]
    pub fn with_str(mut self, tag: Tag, vr: Vr, value: impl Into<String>) -> Self {
        self.put_str(tag, vr, value);
        self
    }

    /// Builder form of [`DataSet::put_sequence`]
    pub fn with_sequence(mut self, tag: Tag, items: Vec<DataSet>) -> Self {
        self.put_sequence(tag, items);
        self
    }

    /// Builder form of [`DataSet::put`]
    pub fn with_element(mut self, tag: Tag, element: Element) -> Self {
        self.put(tag, element);
        self
    }

    // === Typed views ===

    /// First string value, with insignificant padding removed
    ///
    /// Returns `None` when the element is absent, not a string, or empty.
    pub fn string(&self, tag: Tag) -> Option<&str> {
        let element = self.get(tag)?;
        match &element.value {
            Value::Strings(values) => {
                let value = trim_value(element.vr, values.first()?);
                (!value.is_empty()).then_some(value)
            }
            _ => None,
        }
    }

    /// All string values
    pub fn strings(&self, tag: Tag) -> Option<&[String]> {
        match &self.get(tag)?.value {
            Value::Strings(values) => Some(values.as_slice()),
            _ => None,
        }
    }

    /// First integer value (IS strings or binary integer VRs)
    pub fn int(&self, tag: Tag) -> Option<i64> {
        self.ints(tag)?.into_iter().next()
    }

    /// All integer values (IS strings or binary integer VRs)
    ///
    /// Returns `None` if any value cannot be read as an integer.
    pub fn ints(&self, tag: Tag) -> Option<Vec<i64>> {
        match &self.get(tag)?.value {
            Value::Strings(values) => values
                .iter()
                .map(|v| v.trim().parse::<i64>().ok())
                .collect(),
            Value::U16(v) => Some(v.iter().map(|&x| i64::from(x)).collect()),
            Value::I16(v) => Some(v.iter().map(|&x| i64::from(x)).collect()),
            Value::U32(v) => Some(v.iter().map(|&x| i64::from(x)).collect()),
            Value::I32(v) => Some(v.iter().map(|&x| i64::from(x)).collect()),
            Value::I64(v) => Some(v.clone()),
            Value::U64(v) => v.iter().map(|&x| i64::try_from(x).ok()).collect(),
            _ => None,
        }
    }

    /// Single precision float values
    pub fn f32s(&self, tag: Tag) -> Option<&[f32]> {
        match &self.get(tag)?.value {
            Value::F32(values) => Some(values),
            _ => None,
        }
    }

    /// Double precision float values
    pub fn f64s(&self, tag: Tag) -> Option<&[f64]> {
        match &self.get(tag)?.value {
            Value::F64(values) => Some(values),
            _ => None,
        }
    }

    /// Unsigned short values
    pub fn u16s(&self, tag: Tag) -> Option<&[u16]> {
        match &self.get(tag)?.value {
            Value::U16(values) => Some(values),
            _ => None,
        }
    }

    /// Unsigned long values
    pub fn u32s(&self, tag: Tag) -> Option<&[u32]> {
        match &self.get(tag)?.value {
            Value::U32(values) => Some(values),
            _ => None,
        }
    }

    /// Byte values
    pub fn bytes(&self, tag: Tag) -> Option<&[u8]> {
        match &self.get(tag)?.value {
            Value::Bytes(values) => Some(values),
            _ => None,
        }
    }

    /// Sequence items
    ///
    /// An element present with an empty value counts as an empty sequence.
    pub fn items(&self, tag: Tag) -> Option<&[DataSet]> {
        let element = self.get(tag)?;
        match &element.value {
            Value::Sequence(items) => Some(items),
            Value::Empty if element.vr == Vr::SQ => Some(&[]),
            _ => None,
        }
    }

    /// First item of a sequence
    pub fn item(&self, tag: Tag) -> Option<&DataSet> {
        self.items(tag)?.first()
    }
}

impl<'a> IntoIterator for &'a DataSet {
    type Item = (&'a Tag, &'a Element);
    type IntoIter = btree_map::Iter<'a, Tag, Element>;

    fn into_iter(self) -> Self::IntoIter {
        self.elements.iter()
    }
}

impl FromIterator<(Tag, Element)> for DataSet {
    fn from_iter<T: IntoIterator<Item = (Tag, Element)>>(iter: T) -> Self {
        Self {
            elements: iter.into_iter().collect(),
        }
    }
}

/// Strip padding that carries no meaning for the VR
fn trim_value(vr: Vr, value: &str) -> &str {
    let value = value.trim_end_matches([' ', '\0']);
    match vr {
        Vr::LT | Vr::ST | Vr::UT => value,
        _ => value.trim_start_matches(' '),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tags;

    #[test]
    fn test_string_views() {
        let mut ds = DataSet::new();
        ds.put_str(tags::VALUE_TYPE, Vr::CS, " NUM ");
        ds.put_str(tags::TEXT_VALUE, Vr::UT, "  indented ");
        ds.put_str(tags::CODE_MEANING, Vr::LO, "");

        assert_eq!(ds.string(tags::VALUE_TYPE), Some("NUM"));
        assert_eq!(ds.string(tags::TEXT_VALUE), Some("  indented"));
        assert_eq!(ds.string(tags::CODE_MEANING), None);
        assert_eq!(ds.string(tags::CODE_VALUE), None);
    }

    #[test]
    fn test_int_views() {
        let mut ds = DataSet::new();
        ds.put_strings(tags::REFERENCED_FRAME_NUMBER, Vr::IS, ["1", " 2", "3 "]);
        ds.put_u16s(tags::REFERENCED_SEGMENT_NUMBER, vec![4, 5]);

        assert_eq!(ds.ints(tags::REFERENCED_FRAME_NUMBER), Some(vec![1, 2, 3]));
        assert_eq!(ds.int(tags::REFERENCED_SEGMENT_NUMBER), Some(4));
    }

    #[test]
    fn test_sequence_views() {
        let item = DataSet::new().with_str(tags::CODE_VALUE, Vr::SH, "121071");
        let ds = DataSet::new()
            .with_sequence(tags::CONCEPT_NAME_CODE_SEQUENCE, vec![item.clone()])
            .with_element(tags::CONTENT_SEQUENCE, Element::empty(Vr::SQ));

        assert_eq!(ds.item(tags::CONCEPT_NAME_CODE_SEQUENCE), Some(&item));
        assert_eq!(ds.items(tags::CONTENT_SEQUENCE).map(<[_]>::len), Some(0));
        assert_eq!(ds.items(tags::VALUE_TYPE), None);
    }

    #[test]
    fn test_iteration_is_tag_ordered() {
        let mut ds = DataSet::new();
        ds.put_str(tags::VALUE_TYPE, Vr::CS, "CONTAINER");
        ds.put_str(tags::SOP_CLASS_UID, Vr::UI, "1.2.3");
        let order: Vec<Tag> = ds.iter().map(|(t, _)| *t).collect();
        assert_eq!(order, vec![tags::SOP_CLASS_UID, tags::VALUE_TYPE]);
    }
}
