use std::cmp::Ordering;
use std::collections::btree_set;
use std::collections::BTreeSet;
use std::fmt;

use crate::interval::Interval;

/// Index of a node in its tree's arena.
pub(crate) type NodeId = usize;

/// Orders intervals by ascending start, then by the interval's own order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct ByStart<I>(pub I);

/// Orders intervals by descending end, then by the interval's own order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct ByEnd<I>(pub I);

impl<I: Interval> Ord for ByStart<I> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0
            .start()
            .cmp(&other.0.start())
            .then_with(|| self.0.cmp(&other.0))
    }
}

impl<I: Interval> PartialOrd for ByStart<I> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<I: Interval> Ord for ByEnd<I> {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .0
            .end()
            .cmp(&self.0.end())
            .then_with(|| self.0.cmp(&other.0))
    }
}

impl<I: Interval> PartialOrd for ByEnd<I> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// A node owns every interval that straddles its `center`, kept twice: once
/// by ascending start and once by descending end. Both sets always hold the
/// same intervals.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Node<I> {
    pub center: i64,
    pub by_start: BTreeSet<ByStart<I>>,
    pub by_end: BTreeSet<ByEnd<I>>,
    pub parent: Option<NodeId>, // Only read to derive child offsets.
    pub left: Option<NodeId>,
    pub right: Option<NodeId>,
}

impl<I> Node<I> {
    pub fn new(center: i64, parent: Option<NodeId>) -> Node<I> {
        Node {
            center,
            by_start: BTreeSet::new(),
            by_end: BTreeSet::new(),
            parent,
            left: None,
            right: None,
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.left.is_none() && self.right.is_none()
    }

    /// Empties both sets, keeping the links.
    pub fn clear(&mut self) {
        self.by_start.clear();
        self.by_end.clear();
    }

    pub fn ascending_start(&self) -> impl Iterator<Item = &I> {
        self.by_start.iter().map(|key| &key.0)
    }

    pub fn descending_end(&self) -> impl Iterator<Item = &I> {
        self.by_end.iter().map(|key| &key.0)
    }

    pub(crate) fn start_order(&self) -> btree_set::Iter<'_, ByStart<I>> {
        self.by_start.iter()
    }
}

impl<I: Interval> Node<I> {
    /// Stores `interval` in both sets. Returns `false` if it was already
    /// present.
    pub fn insert(&mut self, interval: I) -> bool {
        debug_assert!(interval.start() <= self.center && self.center <= interval.end());

        let by_start = self.by_start.insert(ByStart(interval.clone()));
        let by_end = self.by_end.insert(ByEnd(interval));
        assert_eq!(
            by_start, by_end,
            "node {} disagrees on membership while inserting",
            self.center
        );
        by_start
    }

    pub fn remove(&mut self, interval: &I) -> bool {
        let by_start = self.by_start.remove(&ByStart(interval.clone()));
        let by_end = self.by_end.remove(&ByEnd(interval.clone()));
        assert_eq!(
            by_start, by_end,
            "node {} disagrees on membership while removing",
            self.center
        );
        by_start
    }

    pub fn contains(&self, interval: &I) -> bool {
        let by_start = self.by_start.contains(&ByStart(interval.clone()));
        let by_end = self.by_end.contains(&ByEnd(interval.clone()));
        assert_eq!(
            by_start, by_end,
            "node {} disagrees on membership",
            self.center
        );
        by_start
    }
}

/// Renders the subtree rooted at `id`, children nested inline.
pub(crate) struct SubtreeDisplay<'a, I> {
    pub nodes: &'a [Node<I>],
    pub id: NodeId,
}

impl<I> fmt::Display for SubtreeDisplay<'_, I>
where
    I: fmt::Display,
{
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let node = &self.nodes[self.id];
        let contents = node
            .ascending_start()
            .map(|interval| interval.to_string())
            .collect::<Vec<_>>()
            .join(" ");
        let child = |id| SubtreeDisplay {
            nodes: self.nodes,
            id,
        };

        match (node.left, node.right) {
            (None, None) => write!(f, " {{ {}: {} }} ", node.center, contents),
            (None, Some(right)) => write!(
                f,
                " {{ {}: {} right:{}}} ",
                node.center,
                contents,
                child(right)
            ),
            (Some(left), None) => write!(
                f,
                " {{ {}: {} left:{}}} ",
                node.center,
                contents,
                child(left)
            ),
            (Some(left), Some(right)) => write!(
                f,
                " {{ {}: {} left:{}right:{}}} ",
                node.center,
                contents,
                child(left),
                child(right)
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interval::Span;

    fn span(start: i64, end: i64) -> Span {
        Span::new(start, end).unwrap()
    }

    #[test]
    fn both_orders_hold_the_same_intervals() {
        let mut node = Node::new(10, None);
        assert!(node.insert(span(2, 12)));
        assert!(node.insert(span(8, 30)));
        assert!(node.insert(span(10, 10)));
        assert!(node.insert(span(2, 20)));
        assert!(!node.insert(span(8, 30)));

        assert_eq!(node.by_start.len(), 4);
        assert_eq!(
            node.ascending_start().copied().collect::<Vec<_>>(),
            vec![span(2, 12), span(2, 20), span(8, 30), span(10, 10)]
        );
        assert_eq!(
            node.descending_end().copied().collect::<Vec<_>>(),
            vec![span(8, 30), span(2, 20), span(2, 12), span(10, 10)]
        );
    }

    #[test]
    fn end_ties_fall_back_to_interval_order() {
        let mut node = Node::new(5, None);
        node.insert(span(4, 9));
        node.insert(span(1, 9));
        node.insert(span(3, 9));
        assert_eq!(
            node.descending_end().copied().collect::<Vec<_>>(),
            vec![span(1, 9), span(3, 9), span(4, 9)]
        );
    }

    #[test]
    fn remove_and_clear() {
        let mut node = Node::new(0, None);
        node.insert(span(-1, 1));
        node.insert(span(0, 3));

        assert!(node.contains(&span(0, 3)));
        assert!(node.remove(&span(0, 3)));
        assert!(!node.remove(&span(0, 3)));
        assert!(!node.contains(&span(0, 3)));
        assert_eq!(node.by_end.len(), 1);

        node.clear();
        assert!(node.by_start.is_empty());
        assert!(node.by_end.is_empty());
        assert!(node.is_leaf());
    }

    #[test]
    fn subtree_display() {
        let mut root = Node::new(8, None);
        root.insert(span(7, 9));
        root.left = Some(1);
        let mut left = Node::new(4, Some(0));
        left.insert(span(3, 4));
        left.insert(span(4, 5));
        let nodes = vec![root, left];

        assert_eq!(
            SubtreeDisplay { nodes: &nodes, id: 0 }.to_string(),
            " { 8: [7, 9] left: { 4: [3, 4] [4, 5] } } "
        );
    }
}
