//! Coded concepts

use crate::codes::CodeConstant;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The identifying value of a code, in one of its three attribute forms
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "form", content = "value", rename_all = "snake_case")]
pub enum CodeIdentity {
    /// Code Value (0008,0100), up to 16 characters
    Short(String),
    /// Long Code Value (0008,0119)
    Long(String),
    /// URN Code Value (0008,0120)
    Urn(String),
}

impl CodeIdentity {
    /// Pick the identity form for a code value by its length and syntax
    pub fn infer(value: impl Into<String>) -> Self {
        let value = value.into();
        if value.starts_with("urn:") || value.contains("://") {
            Self::Urn(value)
        } else if value.len() > 16 {
            Self::Long(value)
        } else {
            Self::Short(value)
        }
    }

    /// The code value regardless of form
    pub fn value(&self) -> &str {
        match self {
            Self::Short(v) | Self::Long(v) | Self::Urn(v) => v,
        }
    }
}

/// A coded entry: identity, coding scheme, and human readable meaning
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CodedConcept {
    pub identity: CodeIdentity,
    /// Coding Scheme Designator (0008,0102)
    pub scheme: String,
    /// Coding Scheme Version (0008,0103)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scheme_version: Option<String>,
    /// Code Meaning (0008,0104)
    pub meaning: String,
}

impl CodedConcept {
    /// Create a new concept, choosing the identity form from the value
    pub fn new(value: impl Into<String>, scheme: impl Into<String>, meaning: impl Into<String>) -> Self {
        Self {
            identity: CodeIdentity::infer(value),
            scheme: scheme.into(),
            scheme_version: None,
            meaning: meaning.into(),
        }
    }

    /// Create a concept with an explicit identity form
    pub fn with_identity(identity: CodeIdentity, scheme: impl Into<String>, meaning: impl Into<String>) -> Self {
        Self {
            identity,
            scheme: scheme.into(),
            scheme_version: None,
            meaning: meaning.into(),
        }
    }

    /// UCUM unit concept, e.g. `mm`
    pub fn ucum(unit: &str) -> Self {
        Self::new(unit, "UCUM", unit)
    }

    pub fn with_scheme_version(mut self, version: impl Into<String>) -> Self {
        self.scheme_version = Some(version.into());
        self
    }

    /// The code value regardless of form
    pub fn value(&self) -> &str {
        self.identity.value()
    }

    /// Check if two concepts denote the same code
    ///
    /// Scheme designator and code value are compared; the meaning is not.
    pub fn matches(&self, other: &CodedConcept) -> bool {
        self.scheme == other.scheme && self.value() == other.value()
    }

    /// Check if this concept denotes a well-known code
    pub fn is(&self, code: &CodeConstant) -> bool {
        self.scheme == code.scheme && self.value() == code.value
    }
}

impl From<&CodeConstant> for CodedConcept {
    fn from(code: &CodeConstant) -> Self {
        code.concept()
    }
}

impl From<CodeConstant> for CodedConcept {
    fn from(code: CodeConstant) -> Self {
        code.concept()
    }
}

impl fmt::Display for CodedConcept {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, \"{}\")", self.value(), self.scheme, self.meaning)
    }
}
