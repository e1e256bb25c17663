//! Extract command implementation

use super::input::{InputConfig, load_document};
use super::output::{self, OutputFormat};
use anyhow::{Context, Result};
use clap::ValueEnum;
use octofhir_sr_extract::{cad_findings, key_objects, measurement_groups};
use std::path::PathBuf;

/// Which view to extract
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExtractKind {
    /// CAD findings
    Cad,
    /// Key object selection references
    Kos,
    /// TID 1500 measurement groups
    Measurements,
}

/// Configuration for extract command
pub struct ExtractConfig {
    pub file: PathBuf,
    pub kind: ExtractKind,
    pub input: InputConfig,
    pub format: OutputFormat,
    pub output_file: Option<PathBuf>,
}

/// Print an extraction view as JSON
pub fn extract(config: ExtractConfig) -> Result<()> {
    let doc = load_document(&config.file, &config.input)?;
    let context = || format!("Cannot extract {:?} view from {}", config.kind, config.file.display());
    let content = match config.kind {
        ExtractKind::Cad => output::format_json(&cad_findings(&doc).with_context(context)?, config.format)?,
        ExtractKind::Kos => output::format_json(&key_objects(&doc).with_context(context)?, config.format)?,
        ExtractKind::Measurements => {
            output::format_json(&measurement_groups(&doc).with_context(context)?, config.format)?
        }
    };
    output::write_output(&content, config.output_file.as_deref())
}
