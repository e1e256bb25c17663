//! Profile and structure checks
//!
//! The same rules back `DocumentBuilder::finalize`, which stops at the first
//! violation, and [`validate_document`], which reports all of them.

use crate::AssemblyError;
use octofhir_sr_diagnostics::{Diagnostic, SR0104};
use octofhir_sr_model::{
    CodedConcept, ContentItem, ContentValue, DEFAULT_MAX_DEPTH, DocumentType, ReferencedSop, SrDocument, ValueType,
    codes, uid,
};
use octofhir_sr_query::{Visit, Walk, WalkOptions};

/// Check a content tree against a document type
///
/// Violations are returned in pre-order.
pub fn check_tree(root: &ContentItem, document_type: DocumentType, max_depth: usize) -> Vec<AssemblyError> {
    let mut errors = Vec::new();

    if root.value_type() != ValueType::Container {
        errors.push(AssemblyError::validation(
            format!("root content item must be a CONTAINER, found {}", root.value_type()),
            None,
        ));
    }
    if document_type.requires_title() && root.concept_name.is_none() {
        errors.push(AssemblyError::validation(
            format!("{} documents require a title", document_type),
            None,
        ));
    }

    // One level past the bound so over-deep items are seen and reported
    let walk = Walk::new(root, WalkOptions::default().with_max_depth(max_depth.saturating_add(1)));
    for visit in &walk {
        if visit.depth > max_depth {
            errors.push(AssemblyError::validation(
                format!("content tree exceeds the maximum depth of {}", max_depth),
                Some(&visit.position),
            ));
            continue;
        }
        check_item(&visit, document_type, &mut errors);
        check_required_values(&visit, &mut errors);
    }
    errors
}

fn check_item(visit: &Visit<'_>, document_type: DocumentType, errors: &mut Vec<AssemblyError>) {
    let item = visit.item;
    let value_type = item.value_type();
    if !document_type.permits(value_type) {
        errors.push(AssemblyError::UnsupportedValueType {
            value_type,
            document_type,
            position: visit.position.clone(),
        });
    }

    match &item.value {
        ContentValue::SpatialCoordinates(scoord) if !scoord.is_well_formed() => {
            errors.push(AssemblyError::validation(
                format!(
                    "{} needs a different number of graphic data values, found {}",
                    scoord.graphic_type,
                    scoord.graphic_data.len()
                ),
                Some(&visit.position),
            ));
        }
        ContentValue::SpatialCoordinates3D(scoord) => {
            if !scoord.is_well_formed() {
                errors.push(AssemblyError::validation(
                    format!(
                        "{} needs a different number of graphic data values, found {}",
                        scoord.graphic_type,
                        scoord.graphic_data.len()
                    ),
                    Some(&visit.position),
                ));
            }
            let has_frame = scoord.frame_of_reference_uid.as_deref().is_some_and(|u| !u.is_empty());
            if document_type.requires_frame_of_reference() && !has_frame {
                errors.push(AssemblyError::MissingFrameOfReferenceUid {
                    position: visit.position.clone(),
                });
            }
        }
        ContentValue::Container(_)
            if document_type.requires_tracking() && item.has_concept(&codes::MEASUREMENT_GROUP) =>
        {
            let children = item.children();
            let tracking_identifier = children
                .iter()
                .filter(|c| c.has_concept(&codes::TRACKING_IDENTIFIER))
                .find_map(ContentItem::as_text);
            if tracking_identifier.is_none_or(|t| t.trim().is_empty()) {
                errors.push(AssemblyError::MissingTrackingIdentifier {
                    position: visit.position.clone(),
                });
            }
            let tracking_uid = children
                .iter()
                .filter(|c| c.has_concept(&codes::TRACKING_UNIQUE_IDENTIFIER))
                .find_map(ContentItem::as_uid_reference);
            if tracking_uid.is_none_or(|u| u.trim().is_empty()) {
                errors.push(AssemblyError::MissingTrackingUid {
                    position: visit.position.clone(),
                });
            }
        }
        _ => {}
    }
}

/// Values a decoder insists on: non-empty text, coded concepts with a code
/// value and scheme, numbers on NUM items, and both UIDs on references
fn check_required_values(visit: &Visit<'_>, errors: &mut Vec<AssemblyError>) {
    let item = visit.item;
    let mut problems = Vec::new();

    if let Some(concept) = &item.concept_name {
        check_concept("concept name", concept, &mut problems);
    }
    let text = match &item.value {
        ContentValue::Text(v) | ContentValue::PersonName(v) | ContentValue::UidReference(v) => Some(v.as_str()),
        ContentValue::Date(v) => Some(v.as_str()),
        ContentValue::Time(v) => Some(v.as_str()),
        ContentValue::DateTime(v) => Some(v.as_str()),
        _ => None,
    };
    if text.is_some_and(|t| t.trim().is_empty()) {
        problems.push(format!("{} item has an empty value", item.value_type()));
    }
    match &item.value {
        ContentValue::Code(concept) => check_concept("concept code", concept, &mut problems),
        ContentValue::Numeric(numeric) => {
            if numeric.values.is_empty() {
                problems.push("NUM item has no numeric value".to_string());
            }
            if let Some(units) = &numeric.units {
                check_concept("measurement units", units, &mut problems);
            }
            if let Some(qualifier) = &numeric.qualifier {
                check_concept("numeric value qualifier", qualifier, &mut problems);
            }
        }
        ContentValue::Composite(reference) | ContentValue::Image(reference) | ContentValue::Waveform(reference) => {
            check_reference(item.value_type(), reference, &mut problems);
        }
        _ => {}
    }

    errors.extend(
        problems
            .into_iter()
            .map(|message| AssemblyError::validation(message, Some(&visit.position))),
    );
}

fn check_concept(role: &str, concept: &CodedConcept, problems: &mut Vec<String>) {
    if concept.value().trim().is_empty() {
        problems.push(format!("{} has an empty code value", role));
    }
    if concept.scheme.trim().is_empty() {
        problems.push(format!("{} '{}' has an empty coding scheme designator", role, concept.value()));
    }
}

fn check_reference(value_type: ValueType, reference: &ReferencedSop, problems: &mut Vec<String>) {
    if reference.sop_class_uid.trim().is_empty() || reference.sop_instance_uid.trim().is_empty() {
        problems.push(format!("{} item references no SOP class or instance", value_type));
    }
}

/// Validate a decoded document against a document type
///
/// Runs the assembly checks and adds warnings for header problems. Nothing
/// stops at the first issue.
pub fn validate_document(doc: &SrDocument, document_type: DocumentType) -> Vec<Diagnostic> {
    validate_document_with(doc, document_type, DEFAULT_MAX_DEPTH)
}

/// Validate a decoded document with an explicit depth bound
pub fn validate_document_with(doc: &SrDocument, document_type: DocumentType, max_depth: usize) -> Vec<Diagnostic> {
    log::debug!("validating {} as {}", doc.sop_instance_uid, document_type);
    let mut diagnostics: Vec<Diagnostic> = check_tree(&doc.root, document_type, max_depth)
        .iter()
        .map(AssemblyError::to_diagnostic)
        .collect();

    if doc.sop_class_uid != document_type.sop_class_uid() {
        diagnostics.push(
            Diagnostic::warning(
                SR0104,
                format!(
                    "SOP class {} does not match {} ({})",
                    doc.sop_class_uid,
                    document_type,
                    document_type.sop_class_uid()
                ),
            )
            .with_help("Pass --profile to validate against a different document type"),
        );
    }

    let uids = [
        ("SOPInstanceUID", Some(doc.sop_instance_uid.as_str())),
        ("StudyInstanceUID", doc.study_instance_uid.as_deref()),
        ("SeriesInstanceUID", doc.series_instance_uid.as_deref()),
    ];
    for (keyword, value) in uids {
        match value {
            Some(value) if !uid::is_valid(value) => {
                diagnostics.push(Diagnostic::warning(SR0104, format!("{} '{}' is not a valid UID", keyword, value)));
            }
            None => diagnostics.push(Diagnostic::warning(SR0104, format!("{} is missing", keyword))),
            Some(_) => {}
        }
    }

    diagnostics
}
