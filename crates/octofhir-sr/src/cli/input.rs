//! Loading documents from DICOM JSON files

use crate::{DecodeOptions, SrDocument, read_json};
use anyhow::{Context, Result};
use octofhir_sr_model::DEFAULT_MAX_DEPTH;
use std::fs;
use std::path::Path;

/// Decoder settings shared by every command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputConfig {
    pub lenient: bool,
    pub max_depth: usize,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            lenient: false,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl InputConfig {
    pub fn decode_options(&self) -> DecodeOptions {
        let options = if self.lenient {
            DecodeOptions::lenient()
        } else {
            DecodeOptions::strict()
        };
        options.with_max_depth(self.max_depth)
    }
}

/// Read and decode a DICOM JSON file
pub fn load_document(path: &Path, config: &InputConfig) -> Result<SrDocument> {
    let text = fs::read_to_string(path).with_context(|| format!("Failed to read file: {}", path.display()))?;
    log::debug!("decoding {} ({} bytes)", path.display(), text.len());
    read_json(&text, &config.decode_options()).with_context(|| format!("Failed to decode {}", path.display()))
}
