//! Read-only queries over a content tree

use crate::{PathError, SrPath, Visit, Walk, WalkOptions};
use octofhir_sr_diagnostics::ItemPosition;
use octofhir_sr_model::{
    CodeConstant, CodedConcept, ContentItem, NumericValue, RelationshipType, SrDocument, ValueType,
};
use rust_decimal::Decimal;

/// A numeric observation found in the tree
#[derive(Debug, Clone, PartialEq)]
pub struct Measurement<'a> {
    pub concept: Option<&'a CodedConcept>,
    pub value: Decimal,
    pub units: Option<&'a CodedConcept>,
    pub numeric: &'a NumericValue,
    pub position: ItemPosition,
}

impl<'a> Measurement<'a> {
    fn from_visit(visit: &Visit<'a>) -> Option<Self> {
        let numeric = visit.item.as_numeric()?;
        Some(Self {
            concept: visit.item.concept_name.as_ref(),
            value: numeric.value()?,
            units: numeric.units.as_ref(),
            numeric,
            position: visit.position.clone(),
        })
    }
}

/// Entry point for traversals, path resolution and searches
#[derive(Debug, Clone, Copy)]
pub struct Navigator<'a> {
    root: &'a ContentItem,
    options: WalkOptions,
}

impl<'a> Navigator<'a> {
    /// Navigate a document from its root container
    pub fn new(doc: &'a SrDocument) -> Self {
        Self::from_item(&doc.root)
    }

    /// Navigate the subtree below an item; positions are relative to it
    pub fn from_item(root: &'a ContentItem) -> Self {
        Self {
            root,
            options: WalkOptions::default(),
        }
    }

    pub fn with_options(mut self, options: WalkOptions) -> Self {
        self.options = options;
        self
    }

    pub fn root(&self) -> &'a ContentItem {
        self.root
    }

    pub fn walk(&self) -> Walk<'a> {
        Walk::new(self.root, self.options)
    }

    // === Paths ===

    /// Resolve a path to a single item
    pub fn resolve(&self, path: &SrPath) -> Option<Visit<'a>> {
        path.components().iter().try_fold(Visit::root(self.root), |visit, component| {
            let (index, child) = component
                .select(visit.item.children())
                .nth(component.index.unwrap_or(0))?;
            Some(visit.child(index, child))
        })
    }

    /// Parse and resolve path text
    pub fn resolve_str(&self, path: &str) -> Result<Option<Visit<'a>>, PathError> {
        Ok(self.resolve(&SrPath::parse(path)?))
    }

    /// Resolve a path to every item selected by its last component
    ///
    /// Without an index the last component selects all matching children;
    /// earlier components select one item each.
    pub fn resolve_all(&self, path: &SrPath) -> Vec<Visit<'a>> {
        let Some((last, init)) = path.components().split_last() else {
            return vec![Visit::root(self.root)];
        };
        let parent = init.iter().try_fold(Visit::root(self.root), |visit, component| {
            let (index, child) = component
                .select(visit.item.children())
                .nth(component.index.unwrap_or(0))?;
            Some(visit.child(index, child))
        });
        let Some(parent) = parent else {
            return Vec::new();
        };

        let selected = last.select(parent.item.children());
        match last.index {
            Some(n) => selected.skip(n).take(1).map(|(i, c)| parent.child(i, c)).collect(),
            None => selected.map(|(i, c)| parent.child(i, c)).collect(),
        }
    }

    /// Look up an item by its position
    pub fn get(&self, position: &ItemPosition) -> Option<Visit<'a>> {
        let (first, rest) = position.ordinals().split_first()?;
        if *first != 1 {
            return None;
        }
        rest.iter().try_fold(Visit::root(self.root), |visit, ordinal| {
            let index = usize::try_from(ordinal.checked_sub(1)?).ok()?;
            let child = visit.item.children().get(index)?;
            Some(visit.child(index, child))
        })
    }

    // === Searches ===

    /// Every visited item passing `predicate`, in walk order
    pub fn find(&self, mut predicate: impl FnMut(&Visit<'a>) -> bool) -> Vec<Visit<'a>> {
        self.walk().iter().filter(|visit| predicate(visit)).collect()
    }

    /// First visited item passing `predicate`
    pub fn first(&self, mut predicate: impl FnMut(&Visit<'a>) -> bool) -> Option<Visit<'a>> {
        self.walk().iter().find(|visit| predicate(visit))
    }

    /// Items whose concept name has the same scheme and code value
    pub fn find_by_concept(&self, concept: &CodedConcept) -> Vec<Visit<'a>> {
        self.find(|visit| visit.item.concept_matches(concept))
    }

    pub fn find_by_code(&self, code: &CodeConstant) -> Vec<Visit<'a>> {
        self.find(|visit| visit.item.has_concept(code))
    }

    /// Items whose concept meaning equals `meaning`, ignoring ASCII case
    pub fn find_by_meaning(&self, meaning: &str) -> Vec<Visit<'a>> {
        self.find(|visit| {
            visit
                .item
                .concept_name
                .as_ref()
                .is_some_and(|c| c.meaning.eq_ignore_ascii_case(meaning))
        })
    }

    pub fn find_by_value_type(&self, value_type: ValueType) -> Vec<Visit<'a>> {
        self.find(|visit| visit.item.value_type() == value_type)
    }

    pub fn find_by_relationship(&self, relationship: RelationshipType) -> Vec<Visit<'a>> {
        self.find(|visit| visit.relationship == Some(relationship))
    }

    /// Direct children with a given concept
    pub fn children_with(&self, code: &CodeConstant) -> Vec<&'a ContentItem> {
        self.root.children().iter().filter(|child| child.has_concept(code)).collect()
    }

    // === Measurements ===

    /// First numeric value whose concept matches, in pre-order
    pub fn measurement(&self, concept: &CodedConcept) -> Option<Measurement<'a>> {
        self.walk()
            .iter()
            .filter(|visit| visit.item.concept_matches(concept))
            .find_map(|visit| Measurement::from_visit(&visit))
    }

    /// Every numeric value in the tree
    pub fn measurements(&self) -> Vec<Measurement<'a>> {
        self.walk()
            .iter()
            .filter_map(|visit| Measurement::from_visit(&visit))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::WalkOrder;
    use octofhir_sr_model::codes;
    use pretty_assertions::assert_eq;

    fn a() -> CodedConcept {
        CodedConcept::new("A1", "99TEST", "A")
    }

    fn doc() -> SrDocument {
        let root = ContentItem::container(
            codes::FINDINGS,
            vec![
                ContentItem::text(a(), "first").with_relationship(RelationshipType::Contains),
                ContentItem::text(a(), "second").with_relationship(RelationshipType::Contains),
                ContentItem::code(CodedConcept::new("B1", "99TEST", "B"), codes::UNKNOWN)
                    .with_relationship(RelationshipType::HasProperties),
                ContentItem::container(
                    codes::MEASUREMENT_GROUP,
                    vec![
                        ContentItem::measurement(codes::FINDING, Decimal::new(42, 1), CodedConcept::ucum("mm"))
                            .with_relationship(RelationshipType::Contains),
                    ],
                )
                .with_relationship(RelationshipType::Contains),
            ],
        );
        SrDocument::new("1.2.840.10008.5.1.4.1.1.88.33", "1.2.3", root)
    }

    #[test]
    fn test_path_addressing() {
        let doc = doc();
        let nav = Navigator::new(&doc);
        let first = nav.resolve_str("/A").unwrap().unwrap();
        assert_eq!(first.item.as_text(), Some("first"));
        assert_eq!(first.position.to_string(), "1.1");
        let second = nav.resolve_str("/A[1]").unwrap().unwrap();
        assert_eq!(second.item.as_text(), Some("second"));
        assert!(nav.resolve_str("/C").unwrap().is_none());
        assert!(nav.resolve_str("/A[2]").unwrap().is_none());
    }

    #[test]
    fn test_root_paths() {
        let doc = doc();
        let nav = Navigator::new(&doc);
        for path in ["", "/"] {
            let visit = nav.resolve_str(path).unwrap().unwrap();
            assert!(std::ptr::eq(visit.item, &doc.root));
        }
    }

    #[test]
    fn test_raw_index_and_code_value() {
        let doc = doc();
        let nav = Navigator::new(&doc);
        let third = nav.resolve_str("/[2]").unwrap().unwrap();
        assert_eq!(third.item.value_type(), ValueType::Code);
        let by_code = nav.resolve_str("/B1").unwrap().unwrap();
        assert_eq!(by_code.position, third.position);
        let nested = nav.resolve_str("/CONTAINER/NUM").unwrap().unwrap();
        assert_eq!(nested.position.to_string(), "1.4.1");
        assert_eq!(nested.depth, 2);
    }

    #[test]
    fn test_only_containers_continue_a_path() {
        let doc = doc();
        let nav = Navigator::new(&doc);
        assert!(nav.resolve_str("/A/*").unwrap().is_none());
    }

    #[test]
    fn test_resolve_all() {
        let doc = doc();
        let nav = Navigator::new(&doc);
        let all = nav.resolve_all(&"/A".parse().unwrap());
        assert_eq!(all.len(), 2);
        let one = nav.resolve_all(&"/A[1]".parse().unwrap());
        assert_eq!(one.len(), 1);
        assert_eq!(one[0].item.as_text(), Some("second"));
        assert_eq!(nav.resolve_all(&"/*".parse().unwrap()).len(), 4);
        assert!(nav.resolve_all(&"/C/*".parse().unwrap()).is_empty());
    }

    #[test]
    fn test_get_by_position() {
        let doc = doc();
        let nav = Navigator::new(&doc);
        let visit = nav.get(&"1.4.1".parse().unwrap()).unwrap();
        assert_eq!(visit.item.value_type(), ValueType::Numeric);
        assert!(nav.get(&"1.9".parse().unwrap()).is_none());
        assert!(nav.get(&"2".parse().unwrap()).is_none());
    }

    #[test]
    fn test_searches() {
        let doc = doc();
        let nav = Navigator::new(&doc);
        assert_eq!(nav.find_by_concept(&a()).len(), 2);
        assert_eq!(nav.find_by_meaning("b").len(), 1);
        assert_eq!(nav.find_by_value_type(ValueType::Container).len(), 2);
        assert_eq!(nav.find_by_relationship(RelationshipType::HasProperties).len(), 1);
        assert_eq!(nav.find_by_code(&codes::MEASUREMENT_GROUP).len(), 1);
        assert_eq!(nav.children_with(&codes::MEASUREMENT_GROUP).len(), 1);
    }

    #[test]
    fn test_measurement() {
        let doc = doc();
        let nav = Navigator::new(&doc);
        let m = nav.measurement(&codes::FINDING.concept()).unwrap();
        assert_eq!(m.value, Decimal::new(42, 1));
        assert_eq!(m.units.map(|u| u.value()), Some("mm"));
        assert_eq!(m.position.to_string(), "1.4.1");
        assert!(nav.measurement(&a()).is_none());
        assert_eq!(nav.measurements().len(), 1);
    }

    #[test]
    fn test_walk_options_apply_to_searches() {
        let doc = doc();
        let shallow = Navigator::new(&doc).with_options(WalkOptions::default().with_max_depth(1));
        assert!(shallow.measurement(&codes::FINDING.concept()).is_none());
        let bfs = Navigator::new(&doc).with_options(WalkOptions::breadth_first());
        assert_eq!(bfs.walk().options().order, WalkOrder::BreadthFirst);
        assert_eq!(bfs.walk().iter().count(), 6);
    }
}
