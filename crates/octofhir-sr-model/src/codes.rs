//! Well-known coded concepts
//!
//! Codes are taken from PS3.16 (DCM), SNOMED CT (SCT), and RFC 5646.

use crate::CodedConcept;

/// A compile-time coded concept
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CodeConstant {
    pub value: &'static str,
    pub scheme: &'static str,
    pub meaning: &'static str,
}

impl CodeConstant {
    /// Create a new code constant
    pub const fn new(value: &'static str, scheme: &'static str, meaning: &'static str) -> Self {
        Self {
            value,
            scheme,
            meaning,
        }
    }

    /// Build an owned concept
    pub fn concept(&self) -> CodedConcept {
        CodedConcept::new(self.value, self.scheme, self.meaning)
    }

    /// Check if a concept denotes this code
    pub fn matches(&self, concept: &CodedConcept) -> bool {
        concept.is(self)
    }
}

/// Placeholder used when a required code cannot be read
pub const UNKNOWN: CodeConstant = CodeConstant::new("UNKNOWN", "99LOCAL", "Unknown");

// === TID 1500 Measurement Report ===

pub const IMAGING_MEASUREMENT_REPORT: CodeConstant =
    CodeConstant::new("126000", "DCM", "Imaging Measurement Report");
pub const IMAGING_MEASUREMENTS: CodeConstant = CodeConstant::new("126010", "DCM", "Imaging Measurements");
pub const MEASUREMENT_GROUP: CodeConstant = CodeConstant::new("125007", "DCM", "Measurement Group");
pub const TRACKING_IDENTIFIER: CodeConstant = CodeConstant::new("112039", "DCM", "Tracking Identifier");
pub const TRACKING_UNIQUE_IDENTIFIER: CodeConstant =
    CodeConstant::new("112040", "DCM", "Tracking Unique Identifier");
pub const FINDING: CodeConstant = CodeConstant::new("121071", "DCM", "Finding");
pub const FINDING_SITE: CodeConstant = CodeConstant::new("363698007", "SCT", "Finding Site");
pub const PROCEDURE_REPORTED: CodeConstant = CodeConstant::new("121058", "DCM", "Procedure reported");
pub const SOURCE_OF_MEASUREMENT: CodeConstant = CodeConstant::new("121112", "DCM", "Source of Measurement");
pub const LANGUAGE_OF_CONTENT: CodeConstant =
    CodeConstant::new("121049", "DCM", "Language of Content Item and Descendants");
pub const ENGLISH_US: CodeConstant = CodeConstant::new("en-US", "RFC5646", "English (United States)");

// === CAD ===

pub const MAMMOGRAPHY_CAD_REPORT: CodeConstant = CodeConstant::new("111036", "DCM", "Mammography CAD Report");
pub const CHEST_CAD_REPORT: CodeConstant = CodeConstant::new("112000", "DCM", "Chest CAD Report");
pub const COLON_CAD_REPORT: CodeConstant = CodeConstant::new("112220", "DCM", "Colon CAD Report");
pub const SINGLE_IMAGE_FINDING: CodeConstant = CodeConstant::new("111059", "DCM", "Single Image Finding");
pub const COMPOSITE_FEATURE: CodeConstant = CodeConstant::new("111015", "DCM", "Composite Feature");
pub const ALGORITHM_NAME: CodeConstant = CodeConstant::new("111001", "DCM", "Algorithm Name");
pub const ALGORITHM_VERSION: CodeConstant = CodeConstant::new("111003", "DCM", "Algorithm Version");
pub const RENDERING_INTENT: CodeConstant = CodeConstant::new("111056", "DCM", "Rendering Intent");
pub const CERTAINTY_OF_FINDING: CodeConstant = CodeConstant::new("111012", "DCM", "Certainty of Finding");
pub const PRESENTATION_REQUIRED: CodeConstant = CodeConstant::new(
    "111150",
    "DCM",
    "Presentation Required: Rendering device is expected to present",
);
pub const PRESENTATION_OPTIONAL: CodeConstant = CodeConstant::new(
    "111151",
    "DCM",
    "Presentation Optional: Rendering device may present",
);
pub const NOT_FOR_PRESENTATION: CodeConstant = CodeConstant::new(
    "111152",
    "DCM",
    "Not for Presentation: Rendering device expected not to present",
);

// === Key Object Selection document titles (CID 7010) ===

pub const OF_INTEREST: CodeConstant = CodeConstant::new("113000", "DCM", "Of Interest");
pub const REJECTED_FOR_QUALITY_REASONS: CodeConstant =
    CodeConstant::new("113001", "DCM", "Rejected for Quality Reasons");
pub const FOR_REFERRING_PROVIDER: CodeConstant = CodeConstant::new("113002", "DCM", "For Referring Provider");
pub const FOR_SURGERY: CodeConstant = CodeConstant::new("113003", "DCM", "For Surgery");
pub const FOR_TEACHING: CodeConstant = CodeConstant::new("113004", "DCM", "For Teaching");
pub const FOR_CONFERENCE: CodeConstant = CodeConstant::new("113005", "DCM", "For Conference");
pub const FOR_THERAPY: CodeConstant = CodeConstant::new("113006", "DCM", "For Therapy");
pub const FOR_PATIENT: CodeConstant = CodeConstant::new("113007", "DCM", "For Patient");
pub const FOR_PEER_REVIEW: CodeConstant = CodeConstant::new("113008", "DCM", "For Peer Review");
pub const FOR_RESEARCH: CodeConstant = CodeConstant::new("113009", "DCM", "For Research");
pub const QUALITY_ISSUE: CodeConstant = CodeConstant::new("113010", "DCM", "Quality Issue");
pub const KEY_OBJECT_DESCRIPTION: CodeConstant = CodeConstant::new("113012", "DCM", "Key Object Description");

/// Titles a key object selection document may carry
pub const KEY_OBJECT_TITLES: &[CodeConstant] = &[
    OF_INTEREST,
    REJECTED_FOR_QUALITY_REASONS,
    FOR_REFERRING_PROVIDER,
    FOR_SURGERY,
    FOR_TEACHING,
    FOR_CONFERENCE,
    FOR_THERAPY,
    FOR_PATIENT,
    FOR_PEER_REVIEW,
    FOR_RESEARCH,
    QUALITY_ISSUE,
];

// === Report sections ===

pub const HISTORY: CodeConstant = CodeConstant::new("121060", "DCM", "History");
pub const CURRENT_PROCEDURE_DESCRIPTIONS: CodeConstant =
    CodeConstant::new("121064", "DCM", "Current Procedure Descriptions");
pub const FINDINGS: CodeConstant = CodeConstant::new("121070", "DCM", "Findings");
pub const IMPRESSIONS: CodeConstant = CodeConstant::new("121072", "DCM", "Impressions");
pub const IMPRESSION: CodeConstant = CodeConstant::new("121073", "DCM", "Impression");
pub const RECOMMENDATIONS: CodeConstant = CodeConstant::new("121074", "DCM", "Recommendations");
pub const CONCLUSIONS: CodeConstant = CodeConstant::new("121076", "DCM", "Conclusions");
