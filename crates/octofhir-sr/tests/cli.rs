//! End-to-end tests for the `sr` binary

use octofhir_sr::builder::{DocumentBuilder, MeasurementGroup, MeasurementReportBuilder};
use octofhir_sr::model::{CodedConcept, ContentItem, DocumentType, ReferencedSop, RelationshipType, codes};
use octofhir_sr::{DecodeOptions, EncodeOptions, SrDocument, read_json, write_json};
use pretty_assertions::assert_eq;
use rstest::rstest;
use rust_decimal::Decimal;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

fn sr(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_sr"))
        .args(["--color", "never"])
        .args(args)
        .output()
        .expect("failed to run sr")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn write_doc(dir: &TempDir, name: &str, doc: &SrDocument) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, write_json(doc, &EncodeOptions::default(), true).unwrap()).unwrap();
    path
}

fn path_arg(path: &Path) -> &str {
    path.to_str().unwrap()
}

fn report() -> SrDocument {
    DocumentBuilder::new(DocumentType::Enhanced)
        .with_title(codes::FINDINGS)
        .with_sop_instance_uid("1.2.3.4")
        .add_section(
            codes::FINDINGS,
            vec![
                ContentItem::text(codes::IMPRESSION, "Normal").with_relationship(RelationshipType::Contains),
                ContentItem::text(codes::IMPRESSION, "Stable").with_relationship(RelationshipType::Contains),
            ],
        )
        .finalize()
        .unwrap()
}

fn measurements() -> SrDocument {
    MeasurementReportBuilder::new()
        .add_group(
            MeasurementGroup::new("lesion 1")
                .with_tracking_uid("1.2.3.77")
                .add_measurement(
                    CodedConcept::new("410668003", "SCT", "Length"),
                    Decimal::new(42, 0),
                    CodedConcept::ucum("mm"),
                )
                .add_source_image(ReferencedSop::new("1.2.840.10008.5.1.4.1.1.2", "1.2.3.100")),
        )
        .finalize()
        .unwrap()
}

/// Basic Text SOP class with a NUM item in it
fn numeric_in_basic_text() -> SrDocument {
    let mut doc = report();
    doc.sop_class_uid = DocumentType::BasicText.sop_class_uid().to_string();
    if let Some(container) = doc.root.as_container_mut() {
        container.children.push(
            ContentItem::measurement(codes::FINDING, Decimal::ONE, CodedConcept::ucum("mm"))
                .with_relationship(RelationshipType::Contains),
        );
    }
    doc
}

#[test]
fn test_dump_prints_tree() {
    let dir = tempfile::tempdir().unwrap();
    let file = write_doc(&dir, "report.json", &report());
    let output = sr(&["dump", path_arg(&file)]);
    assert!(output.status.success());
    insta::assert_snapshot!(stdout(&output), @r#"
    enhanced 1.2.3.4
    1 CONTAINER Findings
      1.1 CONTAINS CONTAINER Findings
        1.1.1 CONTAINS TEXT Impression = "Normal"
        1.1.2 CONTAINS TEXT Impression = "Stable"
    "#);
}

#[rstest]
#[case::first("/Findings/Impression", "\"Normal\"")]
#[case::indexed("/Findings/Impression[1]", "\"Stable\"")]
#[case::by_code("/121070/TEXT[0]", "\"Normal\"")]
fn test_query(#[case] path: &str, #[case] expected: &str) {
    let dir = tempfile::tempdir().unwrap();
    let file = write_doc(&dir, "report.json", &report());
    let output = sr(&["query", path_arg(&file), path]);
    assert!(output.status.success());
    assert!(stdout(&output).contains(expected), "{}", stdout(&output));
}

#[test]
fn test_query_all_and_missing() {
    let dir = tempfile::tempdir().unwrap();
    let file = write_doc(&dir, "report.json", &report());

    let output = sr(&["query", path_arg(&file), "/Findings/Impression", "--all", "--format", "json"]);
    let selected: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(selected.as_array().map(Vec::len), Some(2));
    assert_eq!(selected[1]["position"], "1.1.2");

    let output = sr(&["query", path_arg(&file), "/Conclusions"]);
    assert!(!output.status.success());
}

#[test]
fn test_validate_reports_profile_errors() {
    let dir = tempfile::tempdir().unwrap();
    let file = write_doc(&dir, "numeric.json", &numeric_in_basic_text());

    let output = sr(&["validate", path_arg(&file)]);
    assert!(!output.status.success());
    assert!(stdout(&output).contains("SR0100"));

    let output = sr(&["validate", path_arg(&file), "--profile", "enhanced"]);
    assert!(output.status.success(), "{}", stdout(&output));
}

#[test]
fn test_extract_measurements() {
    let dir = tempfile::tempdir().unwrap();
    let file = write_doc(&dir, "tid1500.json", &measurements());
    let output = sr(&["extract", path_arg(&file), "--kind", "measurements"]);
    assert!(output.status.success());

    let view: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let group = &view["groups"][0];
    assert_eq!(group["tracking_identifier"], "lesion 1");
    assert_eq!(group["tracking_uid"], "1.2.3.77");
    assert_eq!(group["measurements"][0]["value"], "42");
    assert_eq!(group["source_images"][0]["sop_instance_uid"], "1.2.3.100");

    let output = sr(&["extract", path_arg(&file), "--kind", "kos"]);
    assert!(!output.status.success());
}

#[test]
fn test_encode_to_output_file() {
    let dir = tempfile::tempdir().unwrap();
    let doc = measurements();
    let file = write_doc(&dir, "in.json", &doc);
    let out = dir.path().join("out.json");

    let output = sr(&["encode", path_arg(&file), "--output", path_arg(&out)]);
    assert!(output.status.success());
    let text = std::fs::read_to_string(&out).unwrap();
    assert_eq!(read_json(&text, &DecodeOptions::strict()).unwrap(), doc);
}

#[test]
fn test_stats_json() {
    let dir = tempfile::tempdir().unwrap();
    let file = write_doc(&dir, "report.json", &report());
    let output = sr(&["stats", path_arg(&file), "--format", "json"]);
    let stats: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(stats["items"], 3);
    assert_eq!(stats["depth"], 2);
    assert_eq!(stats["value_types"]["TEXT"], 2);
}

const NUMERIC_WITHOUT_VALUE: &str = r#"{
  "00080016": { "vr": "UI", "Value": ["1.2.840.10008.5.1.4.1.1.88.22"] },
  "00080018": { "vr": "UI", "Value": ["1.2.3.4"] },
  "0040A040": { "vr": "CS", "Value": ["CONTAINER"] },
  "0040A043": { "vr": "SQ", "Value": [{
    "00080100": { "vr": "SH", "Value": ["121070"] },
    "00080102": { "vr": "SH", "Value": ["DCM"] },
    "00080104": { "vr": "LO", "Value": ["Findings"] }
  }] },
  "0040A050": { "vr": "CS", "Value": ["SEPARATE"] },
  "0040A730": { "vr": "SQ", "Value": [{
    "0040A010": { "vr": "CS", "Value": ["CONTAINS"] },
    "0040A040": { "vr": "CS", "Value": ["NUM"] },
    "0040A043": { "vr": "SQ", "Value": [{
      "00080100": { "vr": "SH", "Value": ["121071"] },
      "00080102": { "vr": "SH", "Value": ["DCM"] },
      "00080104": { "vr": "LO", "Value": ["Finding"] }
    }] }
  }] }
}"#;

#[test]
fn test_lenient_flag() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("num.json");
    std::fs::write(&file, NUMERIC_WITHOUT_VALUE).unwrap();

    let strict = sr(&["dump", path_arg(&file)]);
    assert!(!strict.status.success());
    assert!(String::from_utf8_lossy(&strict.stderr).contains("NumericValue"));

    let lenient = sr(&["dump", path_arg(&file), "--lenient"]);
    assert!(lenient.status.success());
    assert!(stdout(&lenient).contains("1.1 CONTAINS NUM Finding = 0"));
}
