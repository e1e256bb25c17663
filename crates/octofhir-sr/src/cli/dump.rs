//! Dump command implementation

use super::input::{InputConfig, load_document};
use super::output::{self, OutputFormat};
use anyhow::Result;
use octofhir_sr_model::{ContentItem, ContentValue, SrDocument, TemporalPositions};
use octofhir_sr_query::{Visit, Walk, WalkOptions};
use std::fmt::Write;
use std::path::PathBuf;
use tabled::Tabled;

/// Configuration for dump command
pub struct DumpConfig {
    pub file: PathBuf,
    pub input: InputConfig,
    pub format: OutputFormat,
    pub output_file: Option<PathBuf>,
}

/// Decode a file and print its content tree
pub fn dump(config: DumpConfig) -> Result<()> {
    let doc = load_document(&config.file, &config.input)?;
    let content = match config.format {
        OutputFormat::Json => output::format_json(&doc, OutputFormat::Json)?,
        OutputFormat::Pretty => render_tree(&doc, config.input.max_depth),
        OutputFormat::Table => output::format_table(rows(&doc, config.input.max_depth)),
    };
    output::write_output(&content, config.output_file.as_deref())
}

/// One table row per content item
#[derive(Debug, Tabled)]
pub struct ItemRow {
    #[tabled(rename = "Position")]
    pub position: String,
    #[tabled(rename = "Relationship")]
    pub relationship: String,
    #[tabled(rename = "Type")]
    pub value_type: String,
    #[tabled(rename = "Concept")]
    pub concept: String,
    #[tabled(rename = "Value")]
    pub value: String,
}

impl From<&Visit<'_>> for ItemRow {
    fn from(visit: &Visit<'_>) -> Self {
        Self {
            position: visit.position.to_string(),
            relationship: visit.relationship.map(|r| r.to_string()).unwrap_or_default(),
            value_type: visit.item.value_type().to_string(),
            concept: concept_label(visit.item),
            value: summarize(visit.item),
        }
    }
}

fn rows(doc: &SrDocument, max_depth: usize) -> Vec<ItemRow> {
    Walk::new(&doc.root, WalkOptions::default().with_max_depth(max_depth))
        .iter()
        .map(|visit| ItemRow::from(&visit))
        .collect()
}

/// Indented text rendering of the content tree
pub fn render_tree(doc: &SrDocument, max_depth: usize) -> String {
    let mut out = String::new();
    let kind = doc.document_type().map(|t| t.to_string());
    let _ = writeln!(
        out,
        "{} {}",
        kind.as_deref().unwrap_or(doc.sop_class_uid.as_str()),
        doc.sop_instance_uid
    );
    for visit in Walk::new(&doc.root, WalkOptions::default().with_max_depth(max_depth)).iter() {
        let _ = write!(out, "{}{}", "  ".repeat(visit.depth), visit.position);
        if let Some(relationship) = visit.relationship {
            let _ = write!(out, " {}", relationship);
        }
        let _ = write!(out, " {} {}", visit.item.value_type(), concept_label(visit.item));
        let value = summarize(visit.item);
        if !value.is_empty() {
            let _ = write!(out, " = {}", value);
        }
        out.push('\n');
    }
    out.truncate(out.trim_end().len());
    out
}

fn concept_label(item: &ContentItem) -> String {
    item.concept_name
        .as_ref()
        .map(|c| c.meaning.clone())
        .unwrap_or_else(|| "(no concept)".to_string())
}

/// Short rendering of an item's value
pub fn summarize(item: &ContentItem) -> String {
    match &item.value {
        ContentValue::Text(text) => format!("\"{}\"", text),
        ContentValue::Code(code) => code.meaning.clone(),
        ContentValue::Numeric(numeric) => {
            let values: Vec<String> = numeric.values.iter().map(ToString::to_string).collect();
            match &numeric.units {
                Some(units) => format!("{} {}", values.join("\\"), units.value()),
                None => values.join("\\"),
            }
        }
        ContentValue::Date(date) => date.as_str().to_string(),
        ContentValue::Time(time) => time.as_str().to_string(),
        ContentValue::DateTime(datetime) => datetime.as_str().to_string(),
        ContentValue::PersonName(name) | ContentValue::UidReference(name) => name.clone(),
        ContentValue::Composite(sop) | ContentValue::Image(sop) | ContentValue::Waveform(sop) => {
            sop.sop_instance_uid.clone()
        }
        ContentValue::SpatialCoordinates(scoord) => {
            format!("{} ({} values)", scoord.graphic_type, scoord.graphic_data.len())
        }
        ContentValue::SpatialCoordinates3D(scoord) => {
            format!("{} ({} values)", scoord.graphic_type, scoord.graphic_data.len())
        }
        ContentValue::TemporalCoordinates(tcoord) => {
            let kind = match tcoord.positions {
                TemporalPositions::SamplePositions(_) => "sample positions",
                TemporalPositions::TimeOffsets(_) => "time offsets",
                TemporalPositions::DateTimes(_) => "datetimes",
            };
            format!("{} ({} {})", tcoord.range_type, tcoord.positions.len(), kind)
        }
        ContentValue::Container(_) => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use octofhir_sr_builder::DocumentBuilder;
    use octofhir_sr_model::{CodedConcept, DocumentType, RelationshipType, codes};
    use rust_decimal::Decimal;

    #[test]
    fn test_render_tree() {
        let doc = DocumentBuilder::new(DocumentType::Enhanced)
            .with_title(codes::FINDINGS)
            .with_sop_instance_uid("1.2.3.4")
            .add_section(
                codes::FINDINGS,
                vec![
                    ContentItem::text(codes::IMPRESSION, "Normal").with_relationship(RelationshipType::Contains),
                    ContentItem::measurement(
                        CodedConcept::new("410668003", "SCT", "Length"),
                        Decimal::new(125, 1),
                        CodedConcept::ucum("mm"),
                    )
                    .with_relationship(RelationshipType::Contains),
                ],
            )
            .finalize()
            .unwrap();

        insta::assert_snapshot!(render_tree(&doc, 100), @r#"
        enhanced 1.2.3.4
        1 CONTAINER Findings
          1.1 CONTAINS CONTAINER Findings
            1.1.1 CONTAINS TEXT Impression = "Normal"
            1.1.2 CONTAINS NUM Length = 12.5 mm
        "#);
    }
}
