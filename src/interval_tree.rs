use std::cmp::Ordering;
use std::fmt;

use log::{debug, trace};
#[cfg(feature = "serde")]
use serde::ser::SerializeStruct;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize, Serializer};

use crate::error::{Error, Result};
use crate::interval::Interval;
use crate::iter::Iter;
use crate::node::{Node, NodeId, SubtreeDisplay};
use crate::universe::Universe;

const ROOT: NodeId = 0;

#[derive(Clone, Copy, Debug)]
enum Side {
    Left,
    Right,
}

/// A centered interval tree over a fixed universe of integer coordinates.
///
/// Every node is responsible for one `center` coordinate and stores the
/// intervals straddling it. The root sits at the middle of the universe and
/// each child is placed half as far from its parent as that parent is from
/// its own parent, so the depth needed to reach any coordinate is logarithmic
/// in the universe's width whatever the insertion order. Nodes are created
/// lazily on insertion and never removed; [`IntervalTree::clear`] empties them
/// in place.
///
/// ```
/// use centered_interval_tree::{IntervalTree, Span};
///
/// let mut tree = IntervalTree::new(0, 16).unwrap();
/// for start in (0..16).step_by(2) {
///     tree.add(Span::new(start, start + 1).unwrap()).unwrap();
/// }
///
/// let mut hits: Vec<&Span> = Vec::new();
/// tree.intersect_part(5, 8, &mut hits);
/// hits.sort();
/// assert_eq!(hits, [&Span::new(4, 5).unwrap(), &Span::new(6, 7).unwrap(), &Span::new(8, 9).unwrap()]);
/// ```
///
/// With the `serde` feature a tree serializes as its universe plus its
/// intervals, and deserializing re-inserts every interval, so malformed or
/// out-of-universe payloads are rejected.
#[cfg_attr(
    feature = "serde",
    derive(Deserialize),
    serde(
        try_from = "RawTree<I>",
        bound(deserialize = "I: Interval + Deserialize<'de>")
    )
)]
#[derive(Clone, Debug, PartialEq)]
pub struct IntervalTree<I> {
    universe: Universe,
    nodes: Vec<Node<I>>,
    len: usize,
}

#[cfg(feature = "serde")]
#[derive(Deserialize)]
struct RawTree<I> {
    universe: Universe,
    intervals: Vec<I>,
}

#[cfg(feature = "serde")]
impl<I: Interval> TryFrom<RawTree<I>> for IntervalTree<I> {
    type Error = Error;

    fn try_from(raw: RawTree<I>) -> Result<IntervalTree<I>> {
        let mut tree = IntervalTree::with_universe(raw.universe);
        tree.add_all(raw.intervals)?;
        Ok(tree)
    }
}

#[cfg(feature = "serde")]
impl<I> Serialize for IntervalTree<I>
where
    I: Interval + Serialize,
{
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut state = serializer.serialize_struct("IntervalTree", 2)?;
        state.serialize_field("universe", &self.universe)?;
        state.serialize_field("intervals", &self.to_vec())?;
        state.end()
    }
}

impl<I> IntervalTree<I> {
    /// Creates an empty tree over `[start, end]`.
    ///
    /// Fails with [`Error::InvalidUniverse`] if `end < start`.
    pub fn new(start: i64, end: i64) -> Result<IntervalTree<I>> {
        Ok(IntervalTree::with_universe(Universe::new(start, end)?))
    }

    /// Creates an empty tree over an already validated universe.
    pub fn with_universe(universe: Universe) -> IntervalTree<I> {
        let root = Node::new(universe.root_center(), None);
        debug!(
            "new interval tree over {} rooted at {}",
            universe, root.center
        );

        IntervalTree {
            universe,
            nodes: vec![root],
            len: 0,
        }
    }

    pub fn universe(&self) -> Universe {
        self.universe
    }

    /// First coordinate of the universe.
    pub fn start(&self) -> i64 {
        self.universe.start()
    }

    /// Last coordinate of the universe.
    pub fn end(&self) -> i64 {
        self.universe.end()
    }

    /// Number of stored intervals.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of nodes created so far, including empty ones.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of edges on the longest root-to-node path.
    pub fn depth(&self) -> usize {
        self.depth_from(ROOT)
    }

    fn depth_from(&self, id: NodeId) -> usize {
        let node = &self.nodes[id];
        if node.is_leaf() {
            return 0;
        }
        let left = node.left.map_or(0, |left| self.depth_from(left));
        let right = node.right.map_or(0, |right| self.depth_from(right));
        1 + left.max(right)
    }

    /// Empties every node, keeping the node structure. The universe is
    /// unchanged.
    pub fn clear(&mut self) {
        for node in &mut self.nodes {
            node.clear();
        }
        debug!(
            "cleared {} intervals from {} nodes",
            self.len,
            self.nodes.len()
        );
        self.len = 0;
    }

    /// Iterates over the stored intervals in tree order. See [`Iter`].
    pub fn iter(&self) -> Iter<'_, I> {
        Iter::new(&self.nodes, ROOT, self.len)
    }

    /// Creates the child of `id` on `side`, halving (rounding up) the distance
    /// between `id` and its own parent.
    fn spawn_child(&mut self, id: NodeId, side: Side) -> NodeId {
        let node = &self.nodes[id];
        let last = match node.parent {
            Some(parent) => node.center.abs_diff(self.nodes[parent].center),
            None => self.universe.half_width(),
        };
        let offset = last.div_ceil(2);
        assert!(offset > 0, "zero child offset below center {}", node.center);

        let center = match side {
            Side::Left => i128::from(node.center) - i128::from(offset),
            Side::Right => i128::from(node.center) + i128::from(offset),
        };
        let center = i64::try_from(center)
            .unwrap_or_else(|_| panic!("child center {} overflows the coordinate type", center));

        let child = self.nodes.len();
        self.nodes.push(Node::new(center, Some(id)));
        match side {
            Side::Left => self.nodes[id].left = Some(child),
            Side::Right => self.nodes[id].right = Some(child),
        }
        trace!("created {:?} child {} of {}", side, center, self.nodes[id].center);
        child
    }
}

impl<I: Interval> IntervalTree<I> {
    /// Stores `interval`, returning `false` if an equal interval is already
    /// present.
    ///
    /// Fails without modifying the tree if the interval is malformed or does
    /// not fit inside the universe.
    pub fn add(&mut self, interval: I) -> Result<bool> {
        let (start, end) = (interval.start(), interval.end());
        if start > end {
            debug!("rejected malformed interval [{}, {}]", start, end);
            return Err(Error::MalformedInterval { start, end });
        }
        if !self.universe.contains(start, end) {
            debug!(
                "rejected interval [{}, {}] outside {}",
                start, end, self.universe
            );
            return Err(Error::OutOfUniverse {
                start,
                end,
                range_start: self.universe.start(),
                range_end: self.universe.end(),
            });
        }

        let mut id = ROOT;
        loop {
            let Node {
                center, left, right, ..
            } = self.nodes[id];
            id = if end < center {
                match left {
                    Some(left) => left,
                    None => self.spawn_child(id, Side::Left),
                }
            } else if start > center {
                match right {
                    Some(right) => right,
                    None => self.spawn_child(id, Side::Right),
                }
            } else {
                break;
            };
        }

        let added = self.nodes[id].insert(interval);
        if added {
            self.len += 1;
            trace!("added [{}, {}] at {}", start, end, self.nodes[id].center);
        }
        Ok(added)
    }

    /// Adds every interval from `intervals`, stopping at the first error.
    /// Returns how many were newly added.
    pub fn add_all<T>(&mut self, intervals: T) -> Result<usize>
    where
        T: IntoIterator<Item = I>,
    {
        let mut added = 0;
        for interval in intervals {
            if self.add(interval)? {
                added += 1;
            }
        }
        Ok(added)
    }

    /// Removes `interval`, returning whether it was present.
    pub fn remove(&mut self, interval: &I) -> bool {
        let Some(id) = self.locate(interval) else {
            return false;
        };

        let removed = self.nodes[id].remove(interval);
        if removed {
            self.len -= 1;
            trace!(
                "removed [{}, {}] from {}",
                interval.start(),
                interval.end(),
                self.nodes[id].center
            );
        }
        removed
    }

    pub fn contains(&self, interval: &I) -> bool {
        self.locate(interval)
            .is_some_and(|id| self.nodes[id].contains(interval))
    }

    /// Follows the insertion route for `interval` without creating nodes.
    fn locate(&self, interval: &I) -> Option<NodeId> {
        let (start, end) = (interval.start(), interval.end());
        let mut id = ROOT;
        loop {
            let node = &self.nodes[id];
            if end < node.center {
                id = node.left?;
            } else if start > node.center {
                id = node.right?;
            } else {
                return Some(id);
            }
        }
    }

    /// Appends to `out` every interval containing `point`.
    pub fn intersect<'a, E>(&'a self, point: i64, out: &mut E)
    where
        E: Extend<&'a I>,
    {
        let mut next = Some(ROOT);
        while let Some(id) = next {
            let node = &self.nodes[id];
            next = match point.cmp(&node.center) {
                Ordering::Less | Ordering::Equal => {
                    out.extend(
                        node.ascending_start()
                            .take_while(|interval| interval.start() <= point),
                    );
                    if point < node.center {
                        node.left
                    } else {
                        None
                    }
                }
                Ordering::Greater => {
                    out.extend(
                        node.descending_end()
                            .take_while(|interval| interval.end() >= point),
                    );
                    node.right
                }
            };
        }
    }

    /// Appends to `out` every interval sharing at least one coordinate with
    /// `[start, end]`. Appends nothing if `start > end`.
    pub fn intersect_part<'a, E>(&'a self, start: i64, end: i64, out: &mut E)
    where
        E: Extend<&'a I>,
    {
        if start > end {
            return;
        }
        self.intersect_part_from(ROOT, start, end, out);
    }

    fn intersect_part_from<'a, E>(&'a self, id: NodeId, start: i64, end: i64, out: &mut E)
    where
        E: Extend<&'a I>,
    {
        let node = &self.nodes[id];
        if end < node.center {
            out.extend(
                node.ascending_start()
                    .take_while(|interval| interval.start() <= end),
            );
            if let Some(left) = node.left {
                self.intersect_part_from(left, start, end, out);
            }
        } else if start > node.center {
            out.extend(
                node.descending_end()
                    .take_while(|interval| interval.end() >= start),
            );
            if let Some(right) = node.right {
                self.intersect_part_from(right, start, end, out);
            }
        } else {
            // The query straddles the center, as does everything stored here.
            out.extend(node.ascending_start());
            if let Some(left) = node.left {
                self.intersect_part_from(left, start, end, out);
            }
            if let Some(right) = node.right {
                self.intersect_part_from(right, start, end, out);
            }
        }
    }

    /// Appends to `out` every interval that contains all of `[start, end]`.
    /// Appends nothing if `start > end`.
    pub fn intersect_all<'a, E>(&'a self, start: i64, end: i64, out: &mut E)
    where
        E: Extend<&'a I>,
    {
        if start > end {
            return;
        }
        self.intersect_all_from(ROOT, start, end, out);
    }

    fn intersect_all_from<'a, E>(&'a self, id: NodeId, start: i64, end: i64, out: &mut E)
    where
        E: Extend<&'a I>,
    {
        let node = &self.nodes[id];
        // Ends are not monotone in start order, so each candidate is checked.
        out.extend(
            node.ascending_start()
                .take_while(|interval| interval.start() <= start)
                .filter(|interval| interval.end() >= end),
        );
        if end < node.center {
            if let Some(left) = node.left {
                self.intersect_all_from(left, start, end, out);
            }
        }
        if start > node.center {
            if let Some(right) = node.right {
                self.intersect_all_from(right, start, end, out);
            }
        }
    }

    /// All stored intervals by ascending start, ties broken by the interval's
    /// own order.
    pub fn to_vec(&self) -> Vec<&I> {
        let mut intervals: Vec<&I> = self.iter().collect();
        intervals.sort_by(|a, b| a.start().cmp(&b.start()).then_with(|| a.cmp(b)));
        intervals
    }
}

impl<'a, I> IntoIterator for &'a IntervalTree<I> {
    type Item = &'a I;
    type IntoIter = Iter<'a, I>;

    fn into_iter(self) -> Iter<'a, I> {
        self.iter()
    }
}

impl<I> fmt::Display for IntervalTree<I>
where
    I: fmt::Display,
{
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{}:{}",
            self.universe,
            SubtreeDisplay {
                nodes: &self.nodes,
                id: ROOT,
            }
        )
    }
}
