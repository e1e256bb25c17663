//! Validate command implementation

use super::input::{InputConfig, load_document};
use super::output::{self, OutputFormat};
use anyhow::Result;
use colored::Colorize;
use octofhir_sr_builder::validate_document_with;
use octofhir_sr_diagnostics::{Diagnostic, SR0002, SR0400, error_count};
use octofhir_sr_model::DocumentType;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Configuration for validate command
pub struct ValidateConfig {
    pub files: Vec<PathBuf>,
    /// Validate against this type instead of the one the SOP class implies
    pub profile: Option<DocumentType>,
    pub input: InputConfig,
    pub format: OutputFormat,
    pub output_file: Option<PathBuf>,
}

/// Validation result for a single file
#[derive(Debug, Serialize)]
pub struct FileReport {
    pub file: PathBuf,
    pub document_type: Option<DocumentType>,
    pub diagnostics: Vec<Diagnostic>,
}

impl FileReport {
    pub fn errors(&self) -> usize {
        error_count(&self.diagnostics)
    }
}

/// Validate SR files against their document profiles
pub fn validate(config: ValidateConfig) -> Result<()> {
    if config.files.is_empty() {
        anyhow::bail!("No files specified for validation");
    }

    let reports: Vec<FileReport> = config
        .files
        .iter()
        .map(|file| validate_file(file, config.profile, &config.input))
        .collect();
    let total_errors: usize = reports.iter().map(FileReport::errors).sum();
    let total_warnings: usize = reports.iter().map(|r| r.diagnostics.len() - r.errors()).sum();

    match config.format {
        OutputFormat::Json | OutputFormat::Table => {
            output::write_output(&output::format_json(&reports, config.format)?, config.output_file.as_deref())?;
        }
        OutputFormat::Pretty => {
            let text: Vec<String> = reports.iter().map(render_report).collect();
            output::write_output(&text.join("\n"), config.output_file.as_deref())?;
        }
    }

    if total_errors > 0 {
        anyhow::bail!(
            "Validation failed: {} error(s), {} warning(s)",
            total_errors,
            total_warnings
        );
    }
    eprintln!(
        "{}",
        output::format_success(&format!(
            "{} file(s) validated, {} warning(s)",
            reports.len(),
            total_warnings
        ))
    );
    Ok(())
}

/// Decode and validate one file; read and decode failures become diagnostics
pub fn validate_file(file: &Path, profile: Option<DocumentType>, input: &InputConfig) -> FileReport {
    log::debug!("validating {}", file.display());
    let mut report = FileReport {
        file: file.to_path_buf(),
        document_type: profile,
        diagnostics: Vec::new(),
    };

    let doc = match load_document(file, input) {
        Ok(doc) => doc,
        Err(err) => {
            let diagnostic = match err.downcast_ref::<crate::SrError>() {
                Some(sr) => sr.to_diagnostic(),
                None => Diagnostic::error(SR0400, format!("{:#}", err)),
            };
            report.diagnostics.push(diagnostic);
            return report;
        }
    };

    let Some(document_type) = profile.or_else(|| doc.document_type()) else {
        report.diagnostics.push(
            Diagnostic::error(SR0002, format!("Unknown SR SOP class {}", doc.sop_class_uid))
                .with_help("Pass --profile to choose a document type"),
        );
        return report;
    };
    report.document_type = Some(document_type);
    report.diagnostics = validate_document_with(&doc, document_type, input.max_depth);
    report
}

fn render_report(report: &FileReport) -> String {
    let status = if report.errors() == 0 {
        "✓".green().bold()
    } else {
        "✗".red().bold()
    };
    let mut lines = vec![format!(
        "{} {} {}",
        status,
        report.file.display().to_string().cyan(),
        report
            .document_type
            .map(|t| format!("({})", t))
            .unwrap_or_default()
            .dimmed()
    )];
    lines.extend(report.diagnostics.iter().map(|d| format!("  {}", d.render_colored())));
    lines.join("\n")
}
