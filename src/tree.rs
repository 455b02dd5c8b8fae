//! Layout tree - the recursive split/leaf structure
//!
//! The tree is an arena of nodes (`Leaf` wraps one pane, `Split` holds an
//! ordered child sequence along one orientation) with parent links kept in a
//! separate side index rather than back-pointer fields, so node values stay
//! pure values and serialization is a plain structural walk.
//!
//! Structural invariants, restored by every public operation:
//! - every live pane appears in exactly one leaf
//! - no split has fewer than two children (degenerate splits are trimmed,
//!   transitively toward the root; the root itself may collapse to a leaf)
//! - no split has a child split of the same orientation (same-orientation
//!   insertions splice into the existing split instead of nesting)

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::geometry::Rect;
use crate::pane::{IdGen, PaneId};
use crate::zones::DropPosition;

/// Unique identifier for a tree node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub u64);

/// Direction along which a split lays out its children
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    /// Children arranged side-by-side
    Horizontal,
    /// Children stacked top-to-bottom
    Vertical,
}

/// A node in the layout tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// Wraps exactly one pane
    Leaf { pane: PaneId },
    /// An ordered sequence of child nodes along one orientation
    Split {
        orientation: Orientation,
        children: Vec<NodeId>,
    },
}

/// A computed on-screen rectangle for one docked pane
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PaneRect {
    pub pane: PaneId,
    pub rect: Rect,
}

/// The split/leaf tree plus its parent-link side index
#[derive(Debug, Clone)]
pub struct LayoutTree {
    nodes: HashMap<NodeId, Node>,
    /// node -> parent split; absent for the root and detached nodes
    parents: HashMap<NodeId, NodeId>,
    root: NodeId,
    ids: IdGen,
}

impl LayoutTree {
    /// Create a tree holding a single leaf for `pane`
    pub fn new(pane: PaneId) -> Self {
        let mut tree = Self::empty();
        let leaf = tree.alloc_leaf(pane);
        tree.root = leaf;
        tree
    }

    /// An arena with no nodes yet; the restore path grafts a root onto it
    pub(crate) fn empty() -> Self {
        Self {
            nodes: HashMap::new(),
            parents: HashMap::new(),
            root: NodeId(0),
            ids: IdGen::new(),
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.parents.get(&id).copied()
    }

    pub(crate) fn alloc_leaf(&mut self, pane: PaneId) -> NodeId {
        let id = NodeId(self.ids.next_id());
        self.nodes.insert(id, Node::Leaf { pane });
        id
    }

    /// Allocate a split over `children`, re-parenting each of them
    pub(crate) fn alloc_split(&mut self, orientation: Orientation, children: Vec<NodeId>) -> NodeId {
        let id = NodeId(self.ids.next_id());
        for child in &children {
            self.parents.insert(*child, id);
        }
        self.nodes.insert(
            id,
            Node::Split {
                orientation,
                children,
            },
        );
        id
    }

    pub(crate) fn set_root(&mut self, node: NodeId) {
        self.parents.remove(&node);
        self.root = node;
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// All docked pane ids in document order (stable for assertions)
    pub fn pane_ids(&self) -> Vec<PaneId> {
        let mut out = Vec::new();
        self.collect_panes(self.root, &mut out);
        out
    }

    fn collect_panes(&self, node: NodeId, out: &mut Vec<PaneId>) {
        match self.nodes.get(&node) {
            Some(Node::Leaf { pane }) => out.push(*pane),
            Some(Node::Split { children, .. }) => {
                for child in children {
                    self.collect_panes(*child, out);
                }
            }
            None => {}
        }
    }

    pub fn pane_count(&self) -> usize {
        self.pane_ids().len()
    }

    pub fn contains_pane(&self, pane: PaneId) -> bool {
        self.leaf_for_pane(pane).is_some()
    }

    /// First pane in document order, if the tree is non-empty
    pub fn first_pane(&self) -> Option<PaneId> {
        self.pane_ids().into_iter().next()
    }

    /// The leaf node wrapping `pane`
    pub fn leaf_for_pane(&self, pane: PaneId) -> Option<NodeId> {
        self.find_leaf(self.root, pane)
    }

    fn find_leaf(&self, node: NodeId, pane: PaneId) -> Option<NodeId> {
        match self.nodes.get(&node)? {
            Node::Leaf { pane: p } if *p == pane => Some(node),
            Node::Leaf { .. } => None,
            Node::Split { children, .. } => children
                .iter()
                .find_map(|child| self.find_leaf(*child, pane)),
        }
    }

    // ========================================================================
    // Layout pass
    // ========================================================================

    /// Compute equal-division rectangles for every docked pane
    pub fn pane_rects(&self, bounds: Rect) -> Vec<PaneRect> {
        let mut out = Vec::new();
        self.collect_rects(self.root, bounds, &mut out);
        out
    }

    fn collect_rects(&self, node: NodeId, rect: Rect, out: &mut Vec<PaneRect>) {
        match self.nodes.get(&node) {
            Some(Node::Leaf { pane }) => out.push(PaneRect { pane: *pane, rect }),
            Some(Node::Split {
                orientation,
                children,
            }) => {
                let n = children.len() as f32;
                for (i, child) in children.iter().enumerate() {
                    let slice = match orientation {
                        Orientation::Horizontal => Rect::new(
                            rect.x + rect.width * i as f32 / n,
                            rect.y,
                            rect.width / n,
                            rect.height,
                        ),
                        Orientation::Vertical => Rect::new(
                            rect.x,
                            rect.y + rect.height * i as f32 / n,
                            rect.width,
                            rect.height / n,
                        ),
                    };
                    self.collect_rects(*child, slice, out);
                }
            }
            None => {}
        }
    }

    // ========================================================================
    // Structure transforms
    // ========================================================================

    /// Split the leaf holding `pane`, adding a leaf for `new_pane` after it
    ///
    /// When the leaf's parent already runs along `orientation` the new leaf
    /// is spliced in as a sibling; otherwise the leaf (or root) is wrapped in
    /// a fresh two-child split.
    pub fn split_leaf(&mut self, pane: PaneId, orientation: Orientation, new_pane: PaneId) -> bool {
        let Some(leaf) = self.leaf_for_pane(pane) else {
            return false;
        };
        let new_leaf = self.alloc_leaf(new_pane);

        if let Some(parent) = self.parents.get(&leaf).copied() {
            if let Some(Node::Split {
                orientation: o,
                children,
            }) = self.nodes.get_mut(&parent)
            {
                if *o == orientation {
                    let idx = children.iter().position(|c| *c == leaf).unwrap_or(0);
                    children.insert(idx + 1, new_leaf);
                    self.parents.insert(new_leaf, parent);
                    return true;
                }
            }
        }

        self.wrap_pair(leaf, new_leaf, orientation, false);
        true
    }

    /// Remove `node` from its parent's child sequence and trim the chain
    ///
    /// The node itself stays allocated (unparented) so a move can re-insert
    /// it. Returns `false` for the root or an unknown node.
    pub fn detach(&mut self, node: NodeId) -> bool {
        let Some(parent) = self.parents.remove(&node) else {
            return false;
        };
        if let Some(Node::Split { children, .. }) = self.nodes.get_mut(&parent) {
            children.retain(|c| *c != node);
        }
        self.trim(parent);
        true
    }

    /// Detach and drop a leaf entirely (close path)
    pub fn remove_leaf(&mut self, node: NodeId) -> bool {
        if !self.parents.contains_key(&node) {
            return false;
        }
        self.detach(node);
        self.nodes.remove(&node).is_some()
    }

    /// Exchange the tree positions of two leaves, leaving the shape intact
    pub fn swap_leaves(&mut self, a: NodeId, b: NodeId) -> bool {
        if a == b {
            return false;
        }
        let (Some(pa), Some(pb)) = (self.parent(a), self.parent(b)) else {
            return false;
        };
        let (Some(ia), Some(ib)) = (self.child_index(pa, a), self.child_index(pb, b)) else {
            return false;
        };
        if let Some(Node::Split { children, .. }) = self.nodes.get_mut(&pa) {
            children[ia] = b;
        }
        if let Some(Node::Split { children, .. }) = self.nodes.get_mut(&pb) {
            children[ib] = a;
        }
        self.parents.insert(a, pb);
        self.parents.insert(b, pa);
        true
    }

    fn child_index(&self, parent: NodeId, child: NodeId) -> Option<usize> {
        match self.nodes.get(&parent)? {
            Node::Split { children, .. } => children.iter().position(|c| *c == child),
            Node::Leaf { .. } => None,
        }
    }

    /// Insert a detached node next to `target` (or against the root when
    /// `target` is `None`) on the side named by `position`
    ///
    /// Splices into an existing split when the orientations match; otherwise
    /// synthesizes a two-child split in the target's slot. `Center` is not an
    /// insertion and is ignored here.
    pub fn insert_relative(
        &mut self,
        source: NodeId,
        target: Option<NodeId>,
        position: DropPosition,
    ) {
        let Some(orientation) = position.orientation() else {
            return;
        };
        let before = position.is_leading();

        match target {
            None => {
                let root = self.root;
                let matching = matches!(
                    self.nodes.get(&root),
                    Some(Node::Split { orientation: o, .. }) if *o == orientation
                );
                if matching {
                    if let Some(Node::Split { children, .. }) = self.nodes.get_mut(&root) {
                        if before {
                            children.insert(0, source);
                        } else {
                            children.push(source);
                        }
                    }
                    self.parents.insert(source, root);
                } else {
                    self.wrap_pair(root, source, orientation, before);
                }
            }
            Some(target) => {
                if let Some(parent) = self.parents.get(&target).copied() {
                    if let Some(Node::Split {
                        orientation: o,
                        children,
                    }) = self.nodes.get_mut(&parent)
                    {
                        if *o == orientation {
                            let idx = children.iter().position(|c| *c == target).unwrap_or(0);
                            let at = if before { idx } else { idx + 1 };
                            children.insert(at, source);
                            self.parents.insert(source, parent);
                            return;
                        }
                    }
                }
                self.wrap_pair(target, source, orientation, before);
            }
        }
    }

    /// Replace `existing`'s slot with a new split holding both nodes
    fn wrap_pair(
        &mut self,
        existing: NodeId,
        incoming: NodeId,
        orientation: Orientation,
        incoming_first: bool,
    ) {
        let parent = self.parents.get(&existing).copied();
        let children = if incoming_first {
            vec![incoming, existing]
        } else {
            vec![existing, incoming]
        };
        let split = self.alloc_split(orientation, children);
        match parent {
            Some(p) => {
                if let Some(Node::Split { children, .. }) = self.nodes.get_mut(&p) {
                    if let Some(slot) = children.iter_mut().find(|c| **c == existing) {
                        *slot = split;
                    }
                }
                self.parents.insert(split, p);
            }
            None => {
                self.root = split;
            }
        }
    }

    /// Restore the no-degenerate-splits invariant along an ancestor chain
    ///
    /// A split left with one child is replaced by that child in its parent
    /// (same-orientation children are spliced flat); a split left with none
    /// disappears. Applied transitively toward the root.
    fn trim(&mut self, id: NodeId) {
        let child_count = match self.nodes.get(&id) {
            Some(Node::Split { children, .. }) => children.len(),
            _ => return,
        };
        match child_count {
            0 => {
                let parent = self.parents.remove(&id);
                self.nodes.remove(&id);
                if let Some(p) = parent {
                    if let Some(Node::Split { children, .. }) = self.nodes.get_mut(&p) {
                        children.retain(|c| *c != id);
                    }
                    self.trim(p);
                }
            }
            1 => self.promote_only_child(id),
            _ => {}
        }
    }

    fn promote_only_child(&mut self, split: NodeId) {
        let child = match self.nodes.get(&split) {
            Some(Node::Split { children, .. }) => children[0],
            _ => return,
        };
        let parent = self.parents.get(&split).copied();
        self.nodes.remove(&split);
        self.parents.remove(&split);

        let Some(p) = parent else {
            self.parents.remove(&child);
            self.root = child;
            return;
        };

        let parent_orientation = match self.nodes.get(&p) {
            Some(Node::Split { orientation, .. }) => Some(*orientation),
            _ => None,
        };
        let child_orientation = match self.nodes.get(&child) {
            Some(Node::Split { orientation, .. }) => Some(*orientation),
            _ => None,
        };

        if parent_orientation.is_some() && parent_orientation == child_orientation {
            // promoting would nest same-orientation splits: splice instead
            let grandchildren = match self.nodes.remove(&child) {
                Some(Node::Split { children, .. }) => children,
                _ => Vec::new(),
            };
            self.parents.remove(&child);
            if let Some(Node::Split { children, .. }) = self.nodes.get_mut(&p) {
                let idx = children.iter().position(|c| *c == split).unwrap_or(children.len());
                children.splice(idx..(idx + 1).min(children.len()), grandchildren.iter().copied());
            }
            for grandchild in grandchildren {
                self.parents.insert(grandchild, p);
            }
        } else if let Some(Node::Split { children, .. }) = self.nodes.get_mut(&p) {
            if let Some(slot) = children.iter_mut().find(|c| **c == split) {
                *slot = child;
            }
            self.parents.insert(child, p);
        }
    }

    // ========================================================================
    // Restore support
    // ========================================================================

    /// Collapse degenerate splits and flatten same-orientation nesting in a
    /// freshly rebuilt tree, then reindex parent links
    pub(crate) fn normalize(&mut self) {
        let root = self.root;
        let new_root = self.normalize_node(root);
        self.root = new_root;
        self.reindex_parents();
    }

    fn normalize_node(&mut self, node: NodeId) -> NodeId {
        let (orientation, children) = match self.nodes.get(&node) {
            Some(Node::Split {
                orientation,
                children,
            }) => (*orientation, children.clone()),
            _ => return node,
        };

        let mut flat = Vec::with_capacity(children.len());
        for child in children {
            let child = self.normalize_node(child);
            let splice = match self.nodes.get(&child) {
                Some(Node::Split {
                    orientation: o,
                    children: grandchildren,
                }) if *o == orientation => Some(grandchildren.clone()),
                _ => None,
            };
            match splice {
                Some(grandchildren) => {
                    self.nodes.remove(&child);
                    flat.extend(grandchildren);
                }
                None => flat.push(child),
            }
        }

        if flat.len() == 1 {
            self.nodes.remove(&node);
            return flat[0];
        }
        if let Some(Node::Split { children, .. }) = self.nodes.get_mut(&node) {
            *children = flat;
        }
        node
    }

    pub(crate) fn reindex_parents(&mut self) {
        self.parents.clear();
        let mut stack = vec![self.root];
        while let Some(node) = stack.pop() {
            if let Some(Node::Split { children, .. }) = self.nodes.get(&node) {
                for child in children.clone() {
                    self.parents.insert(child, node);
                    stack.push(child);
                }
            }
        }
    }
}
