//! Element values

use crate::{DataSet, Tag, Vr};
use smallvec::SmallVec;

/// The value carried by a data element
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    /// Zero-length value
    #[default]
    Empty,
    /// Character string values (already split on backslash, padding removed)
    Strings(SmallVec<[String; 1]>),
    /// Attribute tag values (AT)
    Tags(Vec<Tag>),
    /// Single precision floats (FL, OF)
    F32(Vec<f32>),
    /// Double precision floats (FD, OD)
    F64(Vec<f64>),
    /// Unsigned shorts (US)
    U16(Vec<u16>),
    /// Signed shorts (SS)
    I16(Vec<i16>),
    /// Unsigned longs (UL, OL)
    U32(Vec<u32>),
    /// Signed longs (SL)
    I32(Vec<i32>),
    /// Unsigned very longs (UV, OV)
    U64(Vec<u64>),
    /// Signed very longs (SV)
    I64(Vec<i64>),
    /// Sequence items
    Sequence(Vec<DataSet>),
    /// Opaque bytes (OB, OW, UN)
    Bytes(Vec<u8>),
}

impl Value {
    /// Number of values (value multiplicity); items for sequences
    pub fn multiplicity(&self) -> usize {
        match self {
            Value::Empty => 0,
            Value::Strings(v) => v.len(),
            Value::Tags(v) => v.len(),
            Value::F32(v) => v.len(),
            Value::F64(v) => v.len(),
            Value::U16(v) => v.len(),
            Value::I16(v) => v.len(),
            Value::U32(v) => v.len(),
            Value::I32(v) => v.len(),
            Value::U64(v) => v.len(),
            Value::I64(v) => v.len(),
            Value::Sequence(v) => v.len(),
            Value::Bytes(v) => usize::from(!v.is_empty()),
        }
    }

    /// Check if the value is empty
    pub fn is_empty(&self) -> bool {
        self.multiplicity() == 0
    }
}

/// A data element: a VR and its value
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    /// Value representation
    pub vr: Vr,
    /// Element value
    pub value: Value,
}

impl Element {
    /// Create a new element
    pub fn new(vr: Vr, value: Value) -> Self {
        Self { vr, value }
    }

    /// Create an element with no value
    pub fn empty(vr: Vr) -> Self {
        Self::new(vr, Value::Empty)
    }

    /// Create a string-valued element
    pub fn strings<I, S>(vr: Vr, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let values: SmallVec<[String; 1]> = values.into_iter().map(Into::into).collect();
        if values.is_empty() {
            Self::empty(vr)
        } else {
            Self::new(vr, Value::Strings(values))
        }
    }

    /// Create a sequence element
    pub fn sequence(items: Vec<DataSet>) -> Self {
        Self::new(Vr::SQ, Value::Sequence(items))
    }

    /// Check if this element is a sequence
    pub fn is_sequence(&self) -> bool {
        self.vr == Vr::SQ
    }
}
