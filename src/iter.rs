use std::collections::btree_set;
use std::iter::FusedIterator;

use crate::node::{ByStart, Node, NodeId};

enum Step {
    Descend(NodeId),
    Visit(NodeId),
}

/// In-order iterator over a tree's intervals: left subtree, then the node's
/// own intervals by ascending start, then the right subtree.
///
/// Disjoint intervals come out by ascending start. An interval held by an
/// ancestor may start before one held lower in its left subtree, so use
/// [`IntervalTree::to_vec`](crate::IntervalTree::to_vec) when a strict global
/// order is needed.
///
/// Created by [`IntervalTree::iter`](crate::IntervalTree::iter).
pub struct Iter<'a, I> {
    nodes: &'a [Node<I>],
    stack: Vec<Step>,
    current: Option<btree_set::Iter<'a, ByStart<I>>>,
    remaining: usize,
}

impl<'a, I> Iter<'a, I> {
    pub(crate) fn new(nodes: &'a [Node<I>], root: NodeId, len: usize) -> Iter<'a, I> {
        Iter {
            nodes,
            stack: vec![Step::Descend(root)],
            current: None,
            remaining: len,
        }
    }
}

impl<'a, I> Iterator for Iter<'a, I> {
    type Item = &'a I;

    fn next(&mut self) -> Option<&'a I> {
        loop {
            if let Some(current) = &mut self.current {
                if let Some(key) = current.next() {
                    self.remaining -= 1;
                    return Some(&key.0);
                }
                self.current = None;
            }

            match self.stack.pop()? {
                Step::Descend(id) => {
                    let node = &self.nodes[id];
                    // Pushed in reverse so the left subtree comes out first.
                    if let Some(right) = node.right {
                        self.stack.push(Step::Descend(right));
                    }
                    self.stack.push(Step::Visit(id));
                    if let Some(left) = node.left {
                        self.stack.push(Step::Descend(left));
                    }
                }
                Step::Visit(id) => self.current = Some(self.nodes[id].start_order()),
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<I> ExactSizeIterator for Iter<'_, I> {}

impl<I> FusedIterator for Iter<'_, I> {}
