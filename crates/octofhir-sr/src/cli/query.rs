//! Query command implementation

use super::dump::{ItemRow, summarize};
use super::input::{InputConfig, load_document};
use super::output::{self, OutputFormat};
use anyhow::{Context, Result};
use octofhir_sr_diagnostics::ItemPosition;
use octofhir_sr_model::{ContentItem, RelationshipType};
use octofhir_sr_query::{Navigator, SrPath, Visit, WalkOptions};
use serde::Serialize;
use std::path::PathBuf;

/// Configuration for query command
pub struct QueryConfig {
    pub file: PathBuf,
    pub path: String,
    /// Select every child matching the last component
    pub all: bool,
    pub input: InputConfig,
    pub format: OutputFormat,
    pub output_file: Option<PathBuf>,
}

/// A selected item
#[derive(Debug, Serialize)]
pub struct Selection<'a> {
    pub position: ItemPosition,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub relationship: Option<RelationshipType>,
    pub item: &'a ContentItem,
}

impl<'a> From<Visit<'a>> for Selection<'a> {
    fn from(visit: Visit<'a>) -> Self {
        Self {
            position: visit.position,
            relationship: visit.relationship,
            item: visit.item,
        }
    }
}

/// Resolve an SRPath and print the selected items
pub fn query(config: QueryConfig) -> Result<()> {
    let path = SrPath::parse(&config.path).with_context(|| format!("Invalid path '{}'", config.path))?;
    let doc = load_document(&config.file, &config.input)?;
    let navigator =
        Navigator::new(&doc).with_options(WalkOptions::default().with_max_depth(config.input.max_depth));

    let visits = if config.all {
        navigator.resolve_all(&path)
    } else {
        navigator.resolve(&path).into_iter().collect()
    };
    if visits.is_empty() {
        anyhow::bail!("No item matches path {}", path);
    }

    let content = match config.format {
        OutputFormat::Json => {
            let selected: Vec<Selection<'_>> = visits.into_iter().map(Selection::from).collect();
            output::format_json(&selected, config.format)?
        }
        OutputFormat::Table => output::format_table(visits.iter().map(ItemRow::from)),
        OutputFormat::Pretty => visits
            .iter()
            .map(|visit| {
                let concept = visit.item.concept_name.as_ref().map(|c| c.to_string()).unwrap_or_default();
                format!("{} {} {} {}", visit.position, visit.item.value_type(), concept, summarize(visit.item))
                    .trim_end()
                    .to_string()
            })
            .collect::<Vec<_>>()
            .join("\n"),
    };
    output::write_output(&content, config.output_file.as_deref())
}
