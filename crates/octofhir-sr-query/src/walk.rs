//! Depth-bounded traversal

use octofhir_sr_diagnostics::ItemPosition;
use octofhir_sr_model::{ContentItem, DEFAULT_MAX_DEPTH, RelationshipType};
use std::collections::VecDeque;

/// Traversal order
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum WalkOrder {
    /// Parent before children, children in document order
    #[default]
    PreOrder,
    /// Level by level
    BreadthFirst,
}

/// Traversal configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WalkOptions {
    pub order: WalkOrder,
    /// Items deeper than this are not visited; the root is at depth 0
    pub max_depth: usize,
}

impl Default for WalkOptions {
    fn default() -> Self {
        Self {
            order: WalkOrder::PreOrder,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl WalkOptions {
    pub fn breadth_first() -> Self {
        Self {
            order: WalkOrder::BreadthFirst,
            ..Self::default()
        }
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}

/// A visited content item
#[derive(Debug, Clone, PartialEq)]
pub struct Visit<'a> {
    pub item: &'a ContentItem,
    pub depth: usize,
    /// Relationship of the item to its parent, `None` for the root
    pub relationship: Option<RelationshipType>,
    pub position: ItemPosition,
}

impl<'a> Visit<'a> {
    pub fn root(item: &'a ContentItem) -> Self {
        Self {
            item,
            depth: 0,
            relationship: item.relationship,
            position: ItemPosition::root(),
        }
    }

    /// Visit for the child at a 0-based index
    pub fn child(&self, index: usize, item: &'a ContentItem) -> Self {
        Self {
            item,
            depth: self.depth + 1,
            relationship: item.relationship,
            position: self.position.child(ordinal(index)),
        }
    }

    /// Visits for the direct children
    pub fn children(&self) -> impl DoubleEndedIterator<Item = Visit<'a>> + '_ {
        self.item
            .children()
            .iter()
            .enumerate()
            .map(move |(index, child)| self.child(index, child))
    }
}

fn ordinal(index: usize) -> u32 {
    u32::try_from(index + 1).unwrap_or(u32::MAX)
}

/// A restartable traversal
///
/// Every call to [`Walk::iter`] starts again from the root.
#[derive(Debug, Clone, Copy)]
pub struct Walk<'a> {
    root: &'a ContentItem,
    options: WalkOptions,
}

impl<'a> Walk<'a> {
    pub fn new(root: &'a ContentItem, options: WalkOptions) -> Self {
        Self { root, options }
    }

    pub fn options(&self) -> WalkOptions {
        self.options
    }

    pub fn iter(&self) -> WalkIter<'a> {
        WalkIter {
            options: self.options,
            pending: VecDeque::from([Visit::root(self.root)]),
        }
    }
}

impl<'a> IntoIterator for Walk<'a> {
    type Item = Visit<'a>;
    type IntoIter = WalkIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a> IntoIterator for &Walk<'a> {
    type Item = Visit<'a>;
    type IntoIter = WalkIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over a [`Walk`]
#[derive(Debug, Clone)]
pub struct WalkIter<'a> {
    options: WalkOptions,
    pending: VecDeque<Visit<'a>>,
}

impl<'a> Iterator for WalkIter<'a> {
    type Item = Visit<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let visit = match self.options.order {
            WalkOrder::PreOrder => self.pending.pop_back()?,
            WalkOrder::BreadthFirst => self.pending.pop_front()?,
        };

        if visit.depth < self.options.max_depth {
            match self.options.order {
                WalkOrder::PreOrder => self.pending.extend(visit.children().rev()),
                WalkOrder::BreadthFirst => self.pending.extend(visit.children()),
            }
        } else if !visit.item.children().is_empty() {
            log::debug!(
                "walk stopped at item {}: depth bound {} reached",
                visit.position,
                self.options.max_depth
            );
        }
        Some(visit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use octofhir_sr_model::codes;
    use pretty_assertions::assert_eq;

    fn tree() -> ContentItem {
        ContentItem::container(
            codes::FINDINGS,
            vec![
                ContentItem::container(
                    codes::FINDING,
                    vec![ContentItem::text(codes::IMPRESSION, "a").with_relationship(RelationshipType::Contains)],
                )
                .with_relationship(RelationshipType::Contains),
                ContentItem::text(codes::CONCLUSIONS, "b").with_relationship(RelationshipType::Contains),
            ],
        )
    }

    fn positions(walk: &Walk<'_>) -> Vec<String> {
        walk.iter().map(|v| v.position.to_string()).collect()
    }

    #[test]
    fn test_pre_order() {
        let root = tree();
        let walk = Walk::new(&root, WalkOptions::default());
        assert_eq!(positions(&walk), ["1", "1.1", "1.1.1", "1.2"]);
    }

    #[test]
    fn test_breadth_first() {
        let root = tree();
        let walk = Walk::new(&root, WalkOptions::breadth_first());
        assert_eq!(positions(&walk), ["1", "1.1", "1.2", "1.1.1"]);
    }

    #[test]
    fn test_walk_is_restartable() {
        let root = tree();
        let walk = Walk::new(&root, WalkOptions::default());
        let first: Vec<_> = walk.iter().collect();
        let second: Vec<_> = (&walk).into_iter().collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_depth_bound() {
        let root = tree();
        let walk = Walk::new(&root, WalkOptions::default().with_max_depth(1));
        assert_eq!(positions(&walk), ["1", "1.1", "1.2"]);
        assert!(walk.iter().all(|v| v.depth <= 1));
    }

    #[test]
    fn test_visit_carries_relationship() {
        let root = tree();
        let visits: Vec<_> = Walk::new(&root, WalkOptions::default()).into_iter().collect();
        assert_eq!(visits[0].relationship, None);
        assert_eq!(visits[1].relationship, Some(RelationshipType::Contains));
        assert_eq!(visits[2].depth, 2);
    }
}
