//! Stats command implementation

use super::input::{InputConfig, load_document};
use super::output::{self, OutputFormat};
use anyhow::Result;
use indexmap::IndexMap;
use octofhir_sr_model::{SrDocument, ValueType};
use octofhir_sr_query::{Walk, WalkOptions};
use serde::Serialize;
use std::fmt::Write;
use std::path::PathBuf;
use tabled::Tabled;

/// Configuration for stats command
pub struct StatsConfig {
    pub file: PathBuf,
    pub input: InputConfig,
    pub format: OutputFormat,
    pub output_file: Option<PathBuf>,
}

/// Shape of a content tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TreeStats {
    pub document_type: Option<String>,
    /// Content items, not counting the root
    pub items: usize,
    pub depth: usize,
    /// Items per value type, in the order types first appear
    pub value_types: IndexMap<String, usize>,
    /// Items per relationship, in the order relationships first appear
    pub relationships: IndexMap<String, usize>,
}

impl TreeStats {
    pub fn collect(doc: &SrDocument, max_depth: usize) -> Self {
        let mut stats = Self {
            document_type: doc.document_type().map(|t| t.to_string()),
            items: 0,
            depth: 0,
            value_types: IndexMap::new(),
            relationships: IndexMap::new(),
        };
        for visit in Walk::new(&doc.root, WalkOptions::default().with_max_depth(max_depth)).iter() {
            stats.depth = stats.depth.max(visit.depth);
            *stats.value_types.entry(visit.item.value_type().to_string()).or_default() += 1;
            if visit.depth == 0 {
                continue;
            }
            stats.items += 1;
            let relationship = visit.relationship.map_or_else(|| "(none)".to_string(), |r| r.to_string());
            *stats.relationships.entry(relationship).or_default() += 1;
        }
        stats
    }

    pub fn count(&self, value_type: ValueType) -> usize {
        self.value_types.get(value_type.as_str()).copied().unwrap_or(0)
    }
}

#[derive(Tabled)]
struct CountRow {
    #[tabled(rename = "Group")]
    group: &'static str,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Count")]
    count: usize,
}

fn render_text(stats: &TreeStats) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "document type: {}", stats.document_type.as_deref().unwrap_or("unknown"));
    let _ = writeln!(out, "items: {}", stats.items);
    let _ = writeln!(out, "depth: {}", stats.depth);
    let _ = writeln!(out, "value types:");
    for (name, count) in &stats.value_types {
        let _ = writeln!(out, "  {:<12} {}", name, count);
    }
    let _ = writeln!(out, "relationships:");
    for (name, count) in &stats.relationships {
        let _ = writeln!(out, "  {:<20} {}", name, count);
    }
    out.truncate(out.trim_end().len());
    out
}

fn render_table(stats: &TreeStats) -> String {
    let summary = [("items", stats.items), ("depth", stats.depth)]
        .into_iter()
        .map(|(name, count)| CountRow {
            group: "tree",
            name: name.to_string(),
            count,
        });
    let value_types = stats.value_types.iter().map(|(name, count)| CountRow {
        group: "value type",
        name: name.clone(),
        count: *count,
    });
    let relationships = stats.relationships.iter().map(|(name, count)| CountRow {
        group: "relationship",
        name: name.clone(),
        count: *count,
    });
    output::format_table(summary.chain(value_types).chain(relationships))
}

/// Print item counts and depth
pub fn stats(config: StatsConfig) -> Result<()> {
    let doc = load_document(&config.file, &config.input)?;
    let stats = TreeStats::collect(&doc, config.input.max_depth);
    let content = match config.format {
        OutputFormat::Json => output::format_json(&stats, config.format)?,
        OutputFormat::Pretty => render_text(&stats),
        OutputFormat::Table => render_table(&stats),
    };
    output::write_output(&content, config.output_file.as_deref())
}

#[cfg(test)]
mod tests {
    use super::*;
    use octofhir_sr_model::{ContentItem, DocumentType, RelationshipType, codes};

    #[test]
    fn test_counts_exclude_root() {
        let root = ContentItem::container(
            codes::FINDINGS,
            vec![
                ContentItem::container(
                    codes::FINDING,
                    vec![
                        ContentItem::text(codes::IMPRESSION, "a").with_relationship(RelationshipType::Contains),
                        ContentItem::text(codes::CONCLUSIONS, "b").with_relationship(RelationshipType::Contains),
                    ],
                )
                .with_relationship(RelationshipType::Contains),
            ],
        );
        let doc = SrDocument::new(DocumentType::BasicText.sop_class_uid(), "1.2.3", root);
        let stats = TreeStats::collect(&doc, 100);
        assert_eq!(stats.items, 3);
        assert_eq!(stats.depth, 2);
        assert_eq!(stats.count(ValueType::Container), 2);
        assert_eq!(stats.count(ValueType::Text), 2);
        assert_eq!(stats.relationships.get("CONTAINS"), Some(&3));

        insta::assert_snapshot!(render_text(&stats), @r"
        document type: basic-text
        items: 3
        depth: 2
        value types:
          CONTAINER    2
          TEXT         2
        relationships:
          CONTAINS             3
        ");
    }
}
