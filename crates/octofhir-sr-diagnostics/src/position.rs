//! Content item positions within an SR tree
//!
//! A position is the list of 1-based ordinals leading from the root to an
//! item, written the way DICOM writes content item identifiers: the root is
//! `1`, its second child is `1.2`, that child's first child is `1.2.1`.

use serde::{Deserialize, Serialize};
use smallvec::{SmallVec, smallvec};
use std::fmt;
use std::str::FromStr;

/// Position of a content item in its document tree
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ItemPosition(SmallVec<[u32; 8]>);

impl ItemPosition {
    /// Position of the root content item
    pub fn root() -> Self {
        Self(smallvec![1])
    }

    /// Position of the child with the given 1-based ordinal
    pub fn child(&self, ordinal: u32) -> Self {
        let mut ordinals = self.0.clone();
        ordinals.push(ordinal);
        Self(ordinals)
    }

    /// Position of the parent item, `None` for the root
    pub fn parent(&self) -> Option<Self> {
        if self.0.len() <= 1 {
            return None;
        }
        Some(Self(self.0[..self.0.len() - 1].iter().copied().collect()))
    }

    /// Depth of the item; the root is at depth 0
    pub fn depth(&self) -> usize {
        self.0.len().saturating_sub(1)
    }

    /// The ordinals from the root down to this item
    pub fn ordinals(&self) -> &[u32] {
        &self.0
    }

    /// Check if this position is the root
    pub fn is_root(&self) -> bool {
        self.0.len() == 1
    }

    /// Check if `other` lies in the subtree rooted at this position
    pub fn contains(&self, other: &Self) -> bool {
        other.0.len() >= self.0.len() && other.0[..self.0.len()] == self.0[..]
    }
}

impl Default for ItemPosition {
    fn default() -> Self {
        Self::root()
    }
}

impl fmt::Display for ItemPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for ordinal in &self.0 {
            if !first {
                f.write_str(".")?;
            }
            write!(f, "{}", ordinal)?;
            first = false;
        }
        Ok(())
    }
}

/// Error returned when a position string is malformed
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid content item position: '{0}'")]
pub struct InvalidPosition(pub String);

impl FromStr for ItemPosition {
    type Err = InvalidPosition;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let ordinals = s
            .split('.')
            .map(|part| match part.parse::<u32>() {
                Ok(n) if n > 0 => Ok(n),
                _ => Err(InvalidPosition(s.to_string())),
            })
            .collect::<Result<SmallVec<[u32; 8]>, _>>()?;
        if ordinals.is_empty() {
            return Err(InvalidPosition(s.to_string()));
        }
        Ok(Self(ordinals))
    }
}

impl TryFrom<String> for ItemPosition {
    type Error = InvalidPosition;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ItemPosition> for String {
    fn from(position: ItemPosition) -> Self {
        position.to_string()
    }
}
