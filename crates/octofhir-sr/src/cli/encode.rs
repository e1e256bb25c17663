//! Encode command implementation

use super::input::{InputConfig, load_document};
use super::output::{self, OutputFormat};
use crate::{EncodeOptions, write_json};
use anyhow::{Context, Result};
use std::path::PathBuf;

/// Configuration for encode command
pub struct EncodeConfig {
    pub file: PathBuf,
    /// Write only identifiers and the content tree
    pub content_only: bool,
    pub input: InputConfig,
    pub format: OutputFormat,
    pub output_file: Option<PathBuf>,
}

/// Decode a file and write it back as normalized DICOM JSON
pub fn encode(config: EncodeConfig) -> Result<()> {
    let doc = load_document(&config.file, &config.input)?;
    let options = EncodeOptions {
        max_depth: config.input.max_depth,
        ..if config.content_only {
            EncodeOptions::content_only()
        } else {
            EncodeOptions::default()
        }
    };
    let pretty = config.format != OutputFormat::Json;
    let content = write_json(&doc, &options, pretty)
        .with_context(|| format!("Failed to encode {}", config.file.display()))?;
    output::write_output(&content, config.output_file.as_deref())
}
