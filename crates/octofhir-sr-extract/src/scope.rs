//! Subtree helpers shared by the views

use octofhir_sr_model::{CodeConstant, SrDocument};
use octofhir_sr_query::{Visit, Walk, WalkOptions};

/// Every item below `visit`, in pre-order, with document-level positions
pub fn descendants<'a>(visit: &Visit<'a>) -> impl Iterator<Item = Visit<'a>> + use<'a> {
    let base = visit.position.clone();
    let depth = visit.depth;
    Walk::new(visit.item, WalkOptions::default())
        .into_iter()
        .skip(1)
        .map(move |v| Visit {
            position: v.position.ordinals().get(1..).unwrap_or(&[]).iter().fold(base.clone(), |p, o| p.child(*o)),
            depth: depth + v.depth,
            ..v
        })
}

/// First direct child with a concept
pub fn child_with<'a>(visit: &Visit<'a>, code: &CodeConstant) -> Option<Visit<'a>> {
    visit.children().find(|child| child.item.has_concept(code))
}

/// Short description of a document for error messages
pub fn describe(doc: &SrDocument) -> String {
    match (doc.document_type(), doc.title()) {
        (Some(document_type), Some(title)) => format!("{} document titled '{}'", document_type, title.meaning),
        (Some(document_type), None) => format!("untitled {} document", document_type),
        (None, _) => format!("document with SOP class {}", doc.sop_class_uid),
    }
}
