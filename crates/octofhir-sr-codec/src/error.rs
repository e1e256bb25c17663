//! Codec errors

use octofhir_sr_dataset::Tag;
use octofhir_sr_diagnostics::{
    Diagnostic, ErrorCode, ItemPosition, SR0001, SR0002, SR0003, SR0004, SR0005, SR0006, SR0007,
    SR0008, SR0009,
};
use std::fmt;
use thiserror::Error;

/// Result type for decoding
pub type ParseResult<T> = Result<T, ParseError>;

/// Result type for encoding
pub type EncodeResult<T> = Result<T, EncodeError>;

/// Errors raised while decoding a dataset into a content tree
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    #[error("Missing required attribute {keyword} {tag}{}", at(.position))]
    MissingRequiredAttribute {
        keyword: &'static str,
        tag: Tag,
        position: Option<ItemPosition>,
    },

    #[error("Invalid value '{value}' for {keyword} {tag}{}", at(.position))]
    InvalidAttributeValue {
        keyword: &'static str,
        tag: Tag,
        value: String,
        position: Option<ItemPosition>,
    },

    #[error("Invalid {keyword}: '{value}'")]
    InvalidSopIdentifier { keyword: &'static str, value: String },

    #[error("Unknown value type '{value}'{}", at(.position))]
    UnknownValueType {
        value: String,
        position: Option<ItemPosition>,
    },

    #[error("Invalid content sequence: {message}{}", at(.position))]
    InvalidContentSequence {
        message: String,
        position: Option<ItemPosition>,
    },

    #[error("Maximum content tree depth {max_depth} exceeded{}", at(.position))]
    MaxDepthExceeded {
        max_depth: usize,
        position: Option<ItemPosition>,
    },

    #[error("Invalid coded concept in {keyword}: {message}{}", at(.position))]
    InvalidCodedConcept {
        keyword: &'static str,
        message: String,
        position: Option<ItemPosition>,
    },

    #[error("Invalid graphic data: {message}{}", at(.position))]
    InvalidGraphicData {
        message: String,
        position: Option<ItemPosition>,
    },

    #[error("Invalid referenced SOP sequence: {message}{}", at(.position))]
    InvalidReferencedSopSequence {
        message: String,
        position: Option<ItemPosition>,
    },
}

fn at(position: &Option<ItemPosition>) -> AtPosition<'_> {
    AtPosition(position.as_ref())
}

struct AtPosition<'a>(Option<&'a ItemPosition>);

impl fmt::Display for AtPosition<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(position) => write!(f, " at item {}", position),
            None => Ok(()),
        }
    }
}

impl ParseError {
    pub fn missing(keyword: &'static str, tag: Tag, position: &ItemPosition) -> Self {
        Self::MissingRequiredAttribute {
            keyword,
            tag,
            position: Some(position.clone()),
        }
    }

    pub fn invalid_value(keyword: &'static str, tag: Tag, value: impl Into<String>, position: &ItemPosition) -> Self {
        Self::InvalidAttributeValue {
            keyword,
            tag,
            value: value.into(),
            position: Some(position.clone()),
        }
    }

    pub fn content_sequence(message: impl Into<String>, position: &ItemPosition) -> Self {
        Self::InvalidContentSequence {
            message: message.into(),
            position: Some(position.clone()),
        }
    }

    pub fn coded_concept(keyword: &'static str, message: impl Into<String>, position: &ItemPosition) -> Self {
        Self::InvalidCodedConcept {
            keyword,
            message: message.into(),
            position: Some(position.clone()),
        }
    }

    pub fn graphic_data(message: impl Into<String>, position: &ItemPosition) -> Self {
        Self::InvalidGraphicData {
            message: message.into(),
            position: Some(position.clone()),
        }
    }

    pub fn referenced_sop(message: impl Into<String>, position: &ItemPosition) -> Self {
        Self::InvalidReferencedSopSequence {
            message: message.into(),
            position: Some(position.clone()),
        }
    }

    /// Get the error code
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::MissingRequiredAttribute { .. } => SR0001,
            Self::InvalidSopIdentifier { .. } => SR0002,
            Self::UnknownValueType { .. } => SR0003,
            Self::InvalidContentSequence { .. } => SR0004,
            Self::MaxDepthExceeded { .. } => SR0005,
            Self::InvalidCodedConcept { .. } => SR0006,
            Self::InvalidGraphicData { .. } => SR0007,
            Self::InvalidReferencedSopSequence { .. } => SR0008,
            Self::InvalidAttributeValue { .. } => SR0009,
        }
    }

    /// Content item the error refers to
    pub fn position(&self) -> Option<&ItemPosition> {
        match self {
            Self::InvalidSopIdentifier { .. } => None,
            Self::MissingRequiredAttribute { position, .. }
            | Self::UnknownValueType { position, .. }
            | Self::InvalidContentSequence { position, .. }
            | Self::MaxDepthExceeded { position, .. }
            | Self::InvalidCodedConcept { position, .. }
            | Self::InvalidGraphicData { position, .. }
            | Self::InvalidReferencedSopSequence { position, .. }
            | Self::InvalidAttributeValue { position, .. } => position.as_ref(),
        }
    }

    /// Convert to a diagnostic
    pub fn to_diagnostic(&self) -> Diagnostic {
        let diagnostic = Diagnostic::error(self.code(), self.to_string());
        match self.position() {
            Some(position) => diagnostic.with_position(position.clone()),
            None => diagnostic,
        }
    }
}

/// Errors raised while encoding a content tree
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EncodeError {
    #[error("Maximum content tree depth {max_depth} exceeded at item {position}")]
    MaxDepthExceeded {
        max_depth: usize,
        position: ItemPosition,
    },
}

impl EncodeError {
    /// Get the error code
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::MaxDepthExceeded { .. } => SR0005,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use octofhir_sr_dataset::tags;

    #[test]
    fn test_display_includes_position() {
        let position: ItemPosition = "1.2.3".parse().unwrap();
        let err = ParseError::missing("ValueType", tags::VALUE_TYPE, &position);
        assert_eq!(
            err.to_string(),
            "Missing required attribute ValueType (0040,A040) at item 1.2.3"
        );
        assert_eq!(err.code(), SR0001);
        assert_eq!(err.position(), Some(&position));
    }

    #[test]
    fn test_display_without_position() {
        let err = ParseError::InvalidSopIdentifier {
            keyword: "SOPInstanceUID",
            value: "1.02".to_string(),
        };
        assert_eq!(err.to_string(), "Invalid SOPInstanceUID: '1.02'");
        assert_eq!(err.to_diagnostic().position, None);
    }
}
