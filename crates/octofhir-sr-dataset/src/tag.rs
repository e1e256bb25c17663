//! Attribute tags

use serde::{Deserialize, Serialize};
use std::fmt;

/// A DICOM attribute tag (group, element)
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Tag(pub u16, pub u16);

impl Tag {
    /// Create a new tag
    pub const fn new(group: u16, element: u16) -> Self {
        Self(group, element)
    }

    /// Group number
    pub const fn group(&self) -> u16 {
        self.0
    }

    /// Element number
    pub const fn element(&self) -> u16 {
        self.1
    }

    /// Key used by the DICOM JSON Model, e.g. `0040A040`
    pub fn to_json_key(&self) -> String {
        format!("{:04X}{:04X}", self.0, self.1)
    }

    /// Parse a DICOM JSON Model key
    pub fn from_json_key(key: &str) -> Option<Self> {
        if key.len() != 8 || !key.is_ascii() {
            return None;
        }
        let group = u16::from_str_radix(&key[..4], 16).ok()?;
        let element = u16::from_str_radix(&key[4..], 16).ok()?;
        Some(Self(group, element))
    }

    /// Check if this is a private tag (odd group)
    pub const fn is_private(&self) -> bool {
        self.0 % 2 == 1
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:04X},{:04X})", self.0, self.1)
    }
}

impl fmt::Debug for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl From<(u16, u16)> for Tag {
    fn from((group, element): (u16, u16)) -> Self {
        Self(group, element)
    }
}
