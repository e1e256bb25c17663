//! Codec configuration

use octofhir_sr_model::DEFAULT_MAX_DEPTH;

/// How the decoder treats malformed content
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DecodeMode {
    /// Fail on the first problem; no partial document is produced
    #[default]
    Strict,
    /// Substitute placeholders and keep going
    Lenient,
}

/// Decoder options
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodeOptions {
    pub mode: DecodeMode,
    /// Deepest item depth accepted; the root is at depth 0
    pub max_depth: usize,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            mode: DecodeMode::Strict,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl DecodeOptions {
    /// Strict decoding with the default depth bound
    pub fn strict() -> Self {
        Self::default()
    }

    /// Lenient decoding with the default depth bound
    pub fn lenient() -> Self {
        Self {
            mode: DecodeMode::Lenient,
            ..Self::default()
        }
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn is_lenient(&self) -> bool {
        self.mode == DecodeMode::Lenient
    }
}

/// Encoder options
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodeOptions {
    /// Write patient, study, series, and SR document module attributes
    pub include_header: bool,
    /// Specific Character Set (0008,0005); `ISO_IR 192` is UTF-8
    pub character_set: Option<String>,
    /// Deepest item depth written
    pub max_depth: usize,
}

impl Default for EncodeOptions {
    fn default() -> Self {
        Self {
            include_header: true,
            character_set: Some("ISO_IR 192".to_string()),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl EncodeOptions {
    /// Only the content tree and identifiers
    pub fn content_only() -> Self {
        Self {
            include_header: false,
            character_set: None,
            ..Self::default()
        }
    }
}
