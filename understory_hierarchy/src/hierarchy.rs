// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Core hierarchy implementation: structure, traversal, aggregation.

use alloc::collections::VecDeque;
use alloc::string::String;
use alloc::vec::Vec;
use core::cmp::Ordering;
use core::ops::Index;

use kurbo::{Circle, Point, Rect};

use crate::types::{Link, NodeId};

/// A node of a [`Hierarchy`].
///
/// Nodes own their datum. Structure (`parent`, `children`) and derived
/// attributes (`depth`, `height`) are maintained by the hierarchy; `value` is
/// set by [`Hierarchy::sum`] or [`Hierarchy::count`]; geometry is written by
/// the layouts.
#[derive(Clone, Debug)]
pub struct Node<T> {
    data: T,
    id: Option<String>,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    depth: usize,
    height: usize,
    value: Option<f64>,
    pub(crate) circle: Circle,
    pub(crate) rect: Rect,
}

impl<T> Node<T> {
    fn new(data: T, id: Option<String>, parent: Option<NodeId>, depth: usize) -> Self {
        Self {
            data,
            id,
            parent,
            children: Vec::new(),
            depth,
            height: 0,
            value: None,
            circle: Circle::new(Point::ZERO, 0.0),
            rect: Rect::ZERO,
        }
    }

    /// The datum this node was built from.
    pub fn data(&self) -> &T {
        &self.data
    }

    /// The key this node was stratified under, if any.
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    /// The parent of this node; `None` for the root.
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Children in insertion (or sorted) order. Empty for leaves.
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Whether this node has no children.
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Distance from the root; zero for the root.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Greatest distance to a descendant leaf; zero for leaves.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Aggregated value, once [`Hierarchy::sum`] or [`Hierarchy::count`] has run.
    pub fn value(&self) -> Option<f64> {
        self.value
    }

    /// Circle assigned by the last [`Pack`](crate::Pack) layout.
    pub fn circle(&self) -> Circle {
        self.circle
    }

    /// Rectangle assigned by the last [`Treemap`](crate::Treemap) or
    /// [`Partition`](crate::Partition) layout.
    pub fn rect(&self) -> Rect {
        self.rect
    }
}

/// An arena-backed tree with exactly one root.
///
/// Nodes are addressed by [`NodeId`]. The root is created with the hierarchy;
/// further nodes are attached with [`Hierarchy::insert`], built from nested
/// data with [`Hierarchy::from_nested`], or produced from flat records by
/// [`Stratify`](crate::Stratify).
///
/// ## Example
///
/// ```rust
/// use understory_hierarchy::Hierarchy;
///
/// let mut tree = Hierarchy::new(("root", 0.0));
/// let a = tree.insert(tree.root(), ("a", 3.0));
/// let _b = tree.insert(tree.root(), ("b", 1.0));
/// let _aa = tree.insert(a, ("aa", 2.0));
///
/// tree.sum(|d| d.1);
/// assert_eq!(tree[tree.root()].value(), Some(6.0));
/// assert_eq!(tree[tree.root()].height(), 2);
/// ```
#[derive(Clone, Debug)]
pub struct Hierarchy<T> {
    /// Nodes in allocation order; a parent always precedes its children.
    nodes: Vec<Node<T>>,
}

impl<T> Hierarchy<T> {
    /// Create a hierarchy holding a single root node.
    pub fn new(data: T) -> Self {
        Self {
            nodes: alloc::vec![Node::new(data, None, None, 0)],
        }
    }

    /// Build a hierarchy from nested data.
    ///
    /// `children` detaches the child data of a datum (for example with
    /// [`core::mem::take`]); an empty vector makes the node a leaf. Children
    /// keep the order in which `children` returns them.
    pub fn from_nested<F>(data: T, mut children: F) -> Self
    where
        F: FnMut(&mut T) -> Vec<T>,
    {
        let mut tree = Self::new(data);
        let mut queue = VecDeque::from([tree.root()]);
        while let Some(id) = queue.pop_front() {
            let kids = children(&mut tree.node_mut(id).data);
            for kid in kids {
                queue.push_back(tree.push(id, kid, None));
            }
        }
        tree.compute_heights();
        tree
    }

    /// Attach a new node holding `data` as the last child of `parent`.
    ///
    /// Depth is set from the parent and the heights of all ancestors are
    /// updated.
    ///
    /// # Panics
    ///
    /// Panics if `parent` does not belong to this hierarchy.
    pub fn insert(&mut self, parent: NodeId, data: T) -> NodeId {
        let id = self.push(parent, data, None);
        let mut height = 1;
        let mut current = Some(parent);
        while let Some(p) = current {
            let node = self.node_mut(p);
            if node.height >= height {
                break;
            }
            node.height = height;
            height += 1;
            current = node.parent;
        }
        id
    }

    /// Append a node without touching heights. Used by bulk builders that
    /// finish with [`Hierarchy::compute_heights`].
    pub(crate) fn push(&mut self, parent: NodeId, data: T, key: Option<String>) -> NodeId {
        let depth = self.node(parent).depth + 1;
        #[allow(
            clippy::cast_possible_truncation,
            reason = "NodeId uses 32-bit indices by design."
        )]
        let id = NodeId::new(self.nodes.len() as u32);
        self.nodes.push(Node::new(data, key, Some(parent), depth));
        self.node_mut(parent).children.push(id);
        id
    }

    pub(crate) fn set_key(&mut self, id: NodeId, key: Option<String>) {
        self.node_mut(id).id = key;
    }

    /// Recompute every height from scratch.
    ///
    /// Children always follow their parent in the arena, so a single reverse
    /// sweep visits every node after all of its descendants.
    pub(crate) fn compute_heights(&mut self) {
        for node in &mut self.nodes {
            node.height = 0;
        }
        for i in (1..self.nodes.len()).rev() {
            let height = self.nodes[i].height + 1;
            if let Some(p) = self.nodes[i].parent {
                let parent = &mut self.nodes[p.idx()];
                parent.height = parent.height.max(height);
            }
        }
    }

    /// The root node.
    pub fn root(&self) -> NodeId {
        NodeId::new(0)
    }

    /// Number of nodes in the hierarchy (always at least one).
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// All node identifiers in allocation order.
    #[allow(
        clippy::cast_possible_truncation,
        reason = "NodeId uses 32-bit indices by design."
    )]
    pub fn ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        (0..self.nodes.len()).map(|i| NodeId::new(i as u32))
    }

    /// Access a node, or `None` if `id` is not from this hierarchy.
    pub fn get(&self, id: NodeId) -> Option<&Node<T>> {
        self.nodes.get(id.idx())
    }

    /// Mutable access to a node's datum.
    pub fn data_mut(&mut self, id: NodeId) -> Option<&mut T> {
        self.nodes.get_mut(id.idx()).map(|n| &mut n.data)
    }

    pub(crate) fn node(&self, id: NodeId) -> &Node<T> {
        &self.nodes[id.idx()]
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> &mut Node<T> {
        &mut self.nodes[id.idx()]
    }

    /// Consume the hierarchy, yielding every datum in allocation order.
    pub fn into_data(self) -> Vec<T> {
        self.nodes.into_iter().map(|n| n.data).collect()
    }

    /// `id` followed by each of its ancestors up to the root.
    pub fn ancestors(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::with_capacity(self.node(id).depth + 1);
        let mut current = Some(id);
        while let Some(c) = current {
            out.push(c);
            current = self.node(c).parent;
        }
        out
    }

    /// `id` and every node below it, in pre-order.
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        self.pre_order(id).collect()
    }

    /// Leaves below `id` (or `id` itself if it is a leaf), in pre-order.
    pub fn leaves(&self, id: NodeId) -> Vec<NodeId> {
        self.pre_order(id)
            .filter(|&n| self.node(n).is_leaf())
            .collect()
    }

    /// The shortest path from `from` to `to`.
    ///
    /// The path climbs from `from` to the nearest common ancestor, then
    /// descends to `to`. Both ends are included.
    pub fn path(&self, from: NodeId, to: NodeId) -> Vec<NodeId> {
        let mut up = Vec::new();
        let mut down = Vec::new();
        let (mut a, mut b) = (from, to);
        while self.node(a).depth > self.node(b).depth {
            up.push(a);
            a = self.parent_of(a);
        }
        while self.node(b).depth > self.node(a).depth {
            down.push(b);
            b = self.parent_of(b);
        }
        while a != b {
            up.push(a);
            down.push(b);
            a = self.parent_of(a);
            b = self.parent_of(b);
        }
        up.push(a);
        up.extend(down.into_iter().rev());
        up
    }

    fn parent_of(&self, id: NodeId) -> NodeId {
        let Some(parent) = self.node(id).parent else {
            unreachable!("nodes of one hierarchy share the root");
        };
        parent
    }

    /// Every parent-child edge, ordered by a pre-order walk of the targets.
    pub fn links(&self) -> Vec<Link> {
        self.pre_order(self.root())
            .filter_map(|target| {
                self.node(target)
                    .parent
                    .map(|source| Link { source, target })
            })
            .collect()
    }

    /// First node at or below `id`, in breadth-first order, whose node
    /// satisfies `pred`.
    pub fn find(&self, id: NodeId, mut pred: impl FnMut(&Node<T>) -> bool) -> Option<NodeId> {
        self.breadth_first(id).find(|&n| pred(self.node(n)))
    }

    /// Breadth-first iterator over `id` and its descendants.
    pub fn breadth_first(&self, id: NodeId) -> BreadthFirst<'_, T> {
        BreadthFirst {
            tree: self,
            queue: VecDeque::from([id]),
        }
    }

    /// Pre-order iterator over `id` and its descendants.
    pub fn pre_order(&self, id: NodeId) -> PreOrder<'_, T> {
        PreOrder {
            tree: self,
            stack: alloc::vec![id],
        }
    }

    /// Post-order iterator over `id` and its descendants.
    pub fn post_order(&self, id: NodeId) -> PostOrder<'_, T> {
        PostOrder {
            tree: self,
            stack: alloc::vec![(id, false)],
        }
    }

    /// Visit `id` and its descendants breadth-first.
    pub fn each(&self, id: NodeId, mut f: impl FnMut(NodeId, &Node<T>)) {
        for n in self.breadth_first(id) {
            f(n, self.node(n));
        }
    }

    /// Visit `id` and its descendants in pre-order (parents before children).
    pub fn each_before(&self, id: NodeId, mut f: impl FnMut(NodeId, &Node<T>)) {
        for n in self.pre_order(id) {
            f(n, self.node(n));
        }
    }

    /// Visit `id` and its descendants in post-order (children before parents).
    pub fn each_after(&self, id: NodeId, mut f: impl FnMut(NodeId, &Node<T>)) {
        for n in self.post_order(id) {
            f(n, self.node(n));
        }
    }

    /// Set every node's value to its own datum's value plus the values of its
    /// children.
    ///
    /// `NaN` values are treated as zero. Calling `sum` again recomputes from
    /// scratch.
    pub fn sum(&mut self, value: impl Fn(&T) -> f64) -> &mut Self {
        for node in &mut self.nodes {
            let v = value(&node.data);
            node.value = Some(if v.is_nan() { 0.0 } else { v });
        }
        self.accumulate_values();
        self
    }

    /// Set every node's value to the number of leaves beneath it; a leaf
    /// counts as one.
    pub fn count(&mut self) -> &mut Self {
        for node in &mut self.nodes {
            node.value = Some(if node.children.is_empty() { 1.0 } else { 0.0 });
        }
        self.accumulate_values();
        self
    }

    fn accumulate_values(&mut self) {
        for i in (1..self.nodes.len()).rev() {
            let v = self.nodes[i].value.unwrap_or(0.0);
            if let Some(p) = self.nodes[i].parent {
                let parent = &mut self.nodes[p.idx()];
                parent.value = Some(parent.value.unwrap_or(0.0) + v);
            }
        }
    }

    /// Sort the children of every node with `compare`.
    ///
    /// The sort is stable, so equal children keep their relative order.
    pub fn sort_by(&mut self, mut compare: impl FnMut(&Node<T>, &Node<T>) -> Ordering) -> &mut Self {
        for i in 0..self.nodes.len() {
            if self.nodes[i].children.len() < 2 {
                continue;
            }
            let mut kids = core::mem::take(&mut self.nodes[i].children);
            kids.sort_by(|a, b| compare(&self.nodes[a.idx()], &self.nodes[b.idx()]));
            self.nodes[i].children = kids;
        }
        self
    }
}

impl<T> Index<NodeId> for Hierarchy<T> {
    type Output = Node<T>;

    fn index(&self, id: NodeId) -> &Node<T> {
        self.node(id)
    }
}

/// Breadth-first traversal, see [`Hierarchy::breadth_first`].
#[derive(Debug)]
pub struct BreadthFirst<'a, T> {
    tree: &'a Hierarchy<T>,
    queue: VecDeque<NodeId>,
}

impl<T> Iterator for BreadthFirst<'_, T> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let id = self.queue.pop_front()?;
        self.queue.extend(self.tree.node(id).children.iter().copied());
        Some(id)
    }
}

/// Pre-order traversal, see [`Hierarchy::pre_order`].
#[derive(Debug)]
pub struct PreOrder<'a, T> {
    tree: &'a Hierarchy<T>,
    stack: Vec<NodeId>,
}

impl<T> Iterator for PreOrder<'_, T> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let id = self.stack.pop()?;
        // Reverse so the first child is popped next.
        self.stack
            .extend(self.tree.node(id).children.iter().rev().copied());
        Some(id)
    }
}

/// Post-order traversal, see [`Hierarchy::post_order`].
#[derive(Debug)]
pub struct PostOrder<'a, T> {
    tree: &'a Hierarchy<T>,
    stack: Vec<(NodeId, bool)>,
}

impl<T> Iterator for PostOrder<'_, T> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        while let Some((id, expanded)) = self.stack.pop() {
            if expanded {
                return Some(id);
            }
            self.stack.push((id, true));
            for &child in self.tree.node(id).children.iter().rev() {
                self.stack.push((child, false));
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    //      r
    //    / | \
    //   a  b  c
    //  / \     \
    // d   e     f
    //           |
    //           g
    fn sample() -> (Hierarchy<&'static str>, [NodeId; 8]) {
        let mut t = Hierarchy::new("r");
        let r = t.root();
        let a = t.insert(r, "a");
        let b = t.insert(r, "b");
        let c = t.insert(r, "c");
        let d = t.insert(a, "d");
        let e = t.insert(a, "e");
        let f = t.insert(c, "f");
        let g = t.insert(f, "g");
        (t, [r, a, b, c, d, e, f, g])
    }

    fn names(t: &Hierarchy<&'static str>, ids: impl IntoIterator<Item = NodeId>) -> Vec<&'static str> {
        ids.into_iter().map(|id| *t[id].data()).collect()
    }

    #[test]
    fn insert_maintains_depth_and_height() {
        let (t, [r, a, b, c, d, _, f, g]) = sample();
        assert_eq!(t[r].depth(), 0);
        assert_eq!(t[g].depth(), 3);
        assert_eq!(t[r].height(), 3, "root height follows the deepest chain");
        assert_eq!(t[a].height(), 1);
        assert_eq!(t[b].height(), 0);
        assert_eq!(t[c].height(), 2);
        assert_eq!(t[f].height(), 1);
        assert_eq!(t[d].parent(), Some(a));
        assert!(t[r].parent().is_none());
        assert!(t[b].is_leaf());
    }

    #[test]
    fn traversal_orders() {
        let (t, [r, ..]) = sample();
        assert_eq!(names(&t, t.breadth_first(r)), ["r", "a", "b", "c", "d", "e", "f", "g"]);
        assert_eq!(names(&t, t.pre_order(r)), ["r", "a", "d", "e", "b", "c", "f", "g"]);
        assert_eq!(names(&t, t.post_order(r)), ["d", "e", "a", "b", "g", "f", "c", "r"]);

        let mut seen = vec![];
        t.each_after(r, |_, n| seen.push(*n.data()));
        assert_eq!(seen, ["d", "e", "a", "b", "g", "f", "c", "r"]);
    }

    #[test]
    fn ancestors_descendants_leaves() {
        let (t, [r, a, _, c, _, _, _, g]) = sample();
        assert_eq!(names(&t, t.ancestors(g)), ["g", "f", "c", "r"]);
        assert_eq!(names(&t, t.descendants(c)), ["c", "f", "g"]);
        assert_eq!(names(&t, t.leaves(r)), ["d", "e", "b", "g"]);
        assert_eq!(names(&t, t.leaves(a)), ["d", "e"]);
    }

    #[test]
    fn path_goes_through_common_ancestor() {
        let (t, [r, _, b, _, d, e, _, g]) = sample();
        assert_eq!(names(&t, t.path(d, g)), ["d", "a", "r", "c", "f", "g"]);
        assert_eq!(names(&t, t.path(d, e)), ["d", "a", "e"]);
        assert_eq!(names(&t, t.path(b, b)), ["b"]);
        assert_eq!(names(&t, t.path(r, d)), ["r", "a", "d"]);
        assert_eq!(names(&t, t.path(g, r)), ["g", "f", "c", "r"]);
    }

    #[test]
    fn links_cover_every_edge() {
        let (t, [r, a, ..]) = sample();
        let links = t.links();
        assert_eq!(links.len(), t.node_count() - 1);
        assert_eq!(links[0], Link { source: r, target: a });
        assert!(links.iter().all(|l| t[l.target].parent() == Some(l.source)));
    }

    #[test]
    fn sum_and_count() {
        let (mut t, [r, a, _, c, ..]) = sample();
        t.sum(|d| if *d == "r" { 10.0 } else { 1.0 });
        assert_eq!(t[a].value(), Some(3.0));
        assert_eq!(t[c].value(), Some(3.0));
        assert_eq!(t[r].value(), Some(17.0), "own value plus children");

        // Idempotent.
        t.sum(|d| if *d == "r" { 10.0 } else { 1.0 });
        assert_eq!(t[r].value(), Some(17.0));

        t.count();
        assert_eq!(t[r].value(), Some(4.0), "four leaves");
        assert_eq!(t[c].value(), Some(1.0));
    }

    #[test]
    fn sum_treats_nan_as_zero() {
        let (mut t, [r, ..]) = sample();
        t.sum(|d| if *d == "g" { f64::NAN } else { 1.0 });
        assert_eq!(t[r].value(), Some(7.0));
    }

    #[test]
    fn sort_is_stable_and_recursive() {
        let (mut t, [r, a, ..]) = sample();
        t.count();
        t.sort_by(|x, y| {
            y.value()
                .partial_cmp(&x.value())
                .unwrap_or(Ordering::Equal)
        });
        assert_eq!(names(&t, t[r].children().iter().copied()), ["a", "b", "c"]);
        t.sort_by(|x, y| y.data().cmp(x.data()));
        assert_eq!(names(&t, t[r].children().iter().copied()), ["c", "b", "a"]);
        assert_eq!(names(&t, t[a].children().iter().copied()), ["e", "d"]);
    }

    #[test]
    fn find_is_breadth_first() {
        let (t, [r, _, b, ..]) = sample();
        assert_eq!(t.find(r, |n| n.is_leaf()), Some(b));
        assert_eq!(t.find(r, |n| *n.data() == "zz"), None);
    }

    #[test]
    fn from_nested_keeps_child_order() {
        #[derive(Debug)]
        struct Dir {
            name: &'static str,
            children: Vec<Dir>,
        }
        let leaf = |name| Dir { name, children: vec![] };
        let data = Dir {
            name: "root",
            children: vec![
                Dir {
                    name: "x",
                    children: vec![leaf("x1"), leaf("x2")],
                },
                leaf("y"),
            ],
        };
        let t = Hierarchy::from_nested(data, |d| core::mem::take(&mut d.children));
        let order: Vec<_> = t.pre_order(t.root()).map(|id| t[id].data().name).collect();
        assert_eq!(order, ["root", "x", "x1", "x2", "y"]);
        assert_eq!(t[t.root()].height(), 2);
        assert_eq!(t.node_count(), 5);
    }

    #[test]
    fn deep_chain_does_not_recurse() {
        let mut t = Hierarchy::new(0_u32);
        let mut last = t.root();
        for i in 1..50_000 {
            last = t.push(last, i, None);
        }
        t.compute_heights();
        t.count();
        assert_eq!(t[t.root()].height(), 49_999);
        assert_eq!(t[t.root()].value(), Some(1.0));
        assert_eq!(t.post_order(t.root()).count(), 50_000);
    }
}
