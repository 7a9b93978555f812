//! Arena-backed area tree.
//!
//! Nodes live in a single `Vec` and refer to each other by `NodeId`, so
//! the parent, child and on-line links are plain indices. Removing a node
//! only unlinks it: its slot stays in the arena and every id remains
//! valid, but the node no longer counts as attached to the tree.

use indexmap::IndexSet;
use itertools::Itertools;
use tracing::trace;

use crate::model::{Color, SourceBox};
use crate::segm::params::StyleThresholds;
use crate::segm::separators::SeparatorSet;
use crate::utils::Rect;

use super::entity::{Area, Tag};
use super::grid::AreaGrid;

/// Index of a node within its `AreaTree`.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Default)]
pub struct NodeId(pub usize);

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One node of the tree: the area and its links.
#[derive(Debug, Clone)]
pub struct AreaNode {
    area: Area,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    /// Position in the parent's grid, valid after the parent's grid was built.
    grid_pos: Rect,
    grid: Option<AreaGrid>,
    separators: Option<SeparatorSet>,
    prev_on_line: Option<NodeId>,
    next_on_line: Option<NodeId>,
}

impl AreaNode {
    fn new(area: Area) -> Self {
        Self {
            area,
            parent: None,
            children: Vec::new(),
            grid_pos: Rect::default(),
            grid: None,
            separators: None,
            prev_on_line: None,
            next_on_line: None,
        }
    }
}

/// The visual area tree of a page.
#[derive(Debug, Clone)]
pub struct AreaTree {
    nodes: Vec<AreaNode>,
    root: NodeId,
}

impl AreaTree {
    /// Creates a tree consisting of the root area only.
    pub fn new(root: Area) -> Self {
        Self {
            nodes: vec![AreaNode::new(root)],
            root: NodeId(0),
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Adds a detached node to the arena.
    pub fn push(&mut self, area: Area) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(AreaNode::new(area));
        id
    }

    /// Number of nodes attached to the tree.
    pub fn len(&self) -> usize {
        self.descendants(self.root).len()
    }

    /// A tree always holds at least its root.
    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn area(&self, id: NodeId) -> &Area {
        &self.nodes[id.0].area
    }

    /// Mutable access to an area. Marks the parent's grid and separators
    /// stale, as the area may be resized.
    pub fn area_mut(&mut self, id: NodeId) -> &mut Area {
        if let Some(p) = self.nodes[id.0].parent {
            self.invalidate(p);
        }
        &mut self.nodes[id.0].area
    }

    pub fn bounds(&self, id: NodeId) -> Rect {
        self.nodes[id.0].area.bounds
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].parent
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.0].children
    }

    pub fn child_count(&self, id: NodeId) -> usize {
        self.nodes[id.0].children.len()
    }

    pub fn is_leaf(&self, id: NodeId) -> bool {
        self.nodes[id.0].children.is_empty()
    }

    /// True if the node is the root or its ancestors lead to the root.
    pub fn is_attached(&self, id: NodeId) -> bool {
        let mut cur = id;
        loop {
            if cur == self.root {
                return true;
            }
            match self.nodes[cur.0].parent {
                Some(p) => cur = p,
                None => return false,
            }
        }
    }

    pub fn index_in_parent(&self, id: NodeId) -> Option<usize> {
        let p = self.nodes[id.0].parent?;
        self.nodes[p.0].children.iter().position(|c| *c == id)
    }

    pub fn next_sibling(&self, id: NodeId) -> Option<NodeId> {
        let p = self.nodes[id.0].parent?;
        let idx = self.index_in_parent(id)?;
        self.nodes[p.0].children.get(idx + 1).copied()
    }

    pub fn prev_sibling(&self, id: NodeId) -> Option<NodeId> {
        let p = self.nodes[id.0].parent?;
        let idx = self.index_in_parent(id)?;
        idx.checked_sub(1).map(|i| self.nodes[p.0].children[i])
    }

    /// Nesting depth, 0 for the root.
    pub fn depth(&self, id: NodeId) -> usize {
        let mut depth = 0;
        let mut cur = id;
        while let Some(p) = self.nodes[cur.0].parent {
            depth += 1;
            cur = p;
        }
        depth
    }

    fn invalidate(&mut self, id: NodeId) {
        let node = &mut self.nodes[id.0];
        node.grid = None;
        node.separators = None;
    }

    /// Unlinks a node from its parent without touching anything else.
    fn detach(&mut self, id: NodeId) {
        if let Some(p) = self.nodes[id.0].parent.take() {
            self.nodes[p.0].children.retain(|c| *c != id);
            self.invalidate(p);
        }
    }

    /// Grows the ancestors of `id` until they enclose it again.
    fn expand_ancestors(&mut self, id: NodeId) {
        let mut cur = id;
        while let Some(p) = self.nodes[cur.0].parent {
            let r = self.nodes[cur.0].area.bounds;
            if self.nodes[p.0].area.bounds.encloses(&r) {
                break;
            }
            self.nodes[p.0].area.expand(&r);
            if let Some(gp) = self.nodes[p.0].parent {
                self.invalidate(gp);
            }
            cur = p;
        }
    }

    /// Moves `child` under `parent` at `index` without touching the parent's area.
    fn adopt(&mut self, parent: NodeId, index: usize, child: NodeId) {
        self.detach(child);
        let children = &mut self.nodes[parent.0].children;
        let index = index.min(children.len());
        children.insert(index, child);
        self.nodes[child.0].parent = Some(parent);
        self.invalidate(parent);
    }

    fn include(&mut self, parent: NodeId, child: NodeId) {
        let r = self.nodes[child.0].area.bounds;
        let fonts = *self.nodes[child.0].area.fonts();
        let parea = &mut self.nodes[parent.0].area;
        parea.expand(&r);
        parea.update_averages(&fonts);
        self.expand_ancestors(parent);
    }

    /// Appends `child` as the last child of `parent`, removing it from its
    /// previous parent. The parent grows to enclose the child and takes
    /// over its font statistics.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        let len = self.nodes[parent.0].children.len();
        self.insert_child(parent, len, child);
    }

    /// Inserts `child` at `index` in the children of `parent`.
    pub fn insert_child(&mut self, parent: NodeId, index: usize, child: NodeId) {
        self.adopt(parent, index, child);
        self.include(parent, child);
    }

    /// Moves `child` to the end of the children of `parent` when `parent`
    /// already accounts for its content. Only the bounds are grown.
    pub fn relink_child(&mut self, parent: NodeId, child: NodeId) {
        let len = self.nodes[parent.0].children.len();
        self.adopt(parent, len, child);
        let r = self.nodes[child.0].area.bounds;
        self.nodes[parent.0].area.expand(&r);
        self.expand_ancestors(parent);
    }

    /// Removes a child; the child and its subtree become detached.
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) {
        if self.nodes[child.0].parent == Some(parent) {
            self.detach(child);
        }
    }

    /// Reorders the children of a node. `order` must be a permutation of
    /// the current children.
    pub fn set_children(&mut self, id: NodeId, order: Vec<NodeId>) {
        debug_assert_eq!(order.len(), self.nodes[id.0].children.len());
        self.nodes[id.0].children = order;
        self.invalidate(id);
    }

    /// Removes all children of a node.
    pub fn clear_children(&mut self, id: NodeId) {
        for child in std::mem::take(&mut self.nodes[id.0].children) {
            self.nodes[child.0].parent = None;
        }
        self.invalidate(id);
    }

    /// Joins the sibling `other` into `id`: `id` adopts the children of
    /// `other`, takes over its area data and `other` is removed from the tree.
    pub fn join_area(&mut self, id: NodeId, other: NodeId, horizontal: bool) {
        let adopted = self.nodes[other.0].children.clone();
        for child in adopted {
            let len = self.nodes[id.0].children.len();
            self.adopt(id, len, child);
        }
        let other_area = self.nodes[other.0].area.clone();
        self.nodes[id.0].area.join(&other_area, horizontal);
        if self.nodes[id.0].next_on_line == Some(other) {
            self.nodes[id.0].next_on_line = self.nodes[other.0].next_on_line;
        }
        if let Some(p) = self.nodes[other.0].parent {
            self.remove_child(p, other);
        }
        if let Some(p) = self.nodes[id.0].parent {
            self.invalidate(p);
        }
        self.expand_ancestors(id);
        self.invalidate(id);
    }

    /// Folds all descendants into the node and removes them.
    pub fn collapse_subtree(&mut self, id: NodeId) {
        let desc: Vec<NodeId> = self.descendants(id).into_iter().skip(1).collect();
        for d in desc {
            let other = self.nodes[d.0].area.clone();
            let area = &mut self.nodes[id.0].area;
            area.join_child(&other);
            area.absorb_boxes(&other);
        }
        self.clear_children(id);
        self.expand_ancestors(id);
    }

    /// Rebuilds the grid of a node and the grid positions of its children.
    pub fn create_grid(&mut self, id: NodeId) -> &AreaGrid {
        let bounds = self.nodes[id.0].area.bounds;
        let children: Vec<(NodeId, Rect)> = self.nodes[id.0]
            .children
            .iter()
            .map(|c| (*c, self.nodes[c.0].area.bounds))
            .collect();
        let (grid, positions) = AreaGrid::build(bounds, &children);
        for ((child, _), pos) in children.iter().zip(positions) {
            self.nodes[child.0].grid_pos = pos;
        }
        trace!("grid of {}: {}x{}", id, grid.width(), grid.height());
        self.nodes[id.0].grid.insert(grid)
    }

    /// Builds the grid unless a current one exists.
    pub fn ensure_grid(&mut self, id: NodeId) {
        if self.nodes[id.0].grid.is_none() {
            self.create_grid(id);
        }
    }

    /// Current grid of the node, `None` if it is stale or was never built.
    pub fn try_grid(&self, id: NodeId) -> Option<&AreaGrid> {
        self.nodes[id.0].grid.as_ref()
    }

    /// Current grid of the node.
    ///
    /// # Panics
    /// Panics if the grid is stale; callers rebuild it with `create_grid`
    /// or `ensure_grid` after changing the children.
    pub fn grid(&self, id: NodeId) -> &AreaGrid {
        match &self.nodes[id.0].grid {
            Some(g) => g,
            None => panic!("grid of node {id} queried before being built"),
        }
    }

    /// Position of the node in its parent's grid.
    pub fn grid_position(&self, id: NodeId) -> Rect {
        self.nodes[id.0].grid_pos
    }

    /// Recomputes the separators of a node.
    pub fn create_separators(&mut self, id: NodeId) -> &SeparatorSet {
        let seps = SeparatorSet::detect(self, id);
        self.nodes[id.0].separators.insert(seps)
    }

    pub(crate) fn set_separators(&mut self, id: NodeId, seps: SeparatorSet) {
        self.nodes[id.0].separators = Some(seps);
    }

    pub fn separators(&self, id: NodeId) -> Option<&SeparatorSet> {
        self.nodes[id.0].separators.as_ref()
    }

    /// Drops the separators having at most one area on each side. Needs a
    /// current grid.
    pub fn remove_simple_separators(&mut self, id: NodeId) {
        if let Some(mut seps) = self.nodes[id.0].separators.take() {
            seps.remove_simple(self, id);
            self.nodes[id.0].separators = Some(seps);
        }
    }

    /// Links two areas lying on the same visual line.
    pub fn set_on_line(&mut self, prev: NodeId, next: NodeId) {
        self.nodes[prev.0].next_on_line = Some(next);
        self.nodes[next.0].prev_on_line = Some(prev);
    }

    /// The next area on the same line, while it is still in the tree.
    pub fn next_on_line(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0]
            .next_on_line
            .filter(|n| self.is_attached(*n))
    }

    /// The previous area on the same line, while it is still in the tree.
    pub fn prev_on_line(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0]
            .prev_on_line
            .filter(|n| self.is_attached(*n))
    }

    /// The node and all its descendants in pre-order.
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut ret = Vec::new();
        let mut stack = vec![id];
        while let Some(cur) = stack.pop() {
            ret.push(cur);
            stack.extend(self.nodes[cur.0].children.iter().rev());
        }
        ret
    }

    /// Leaves of the subtree in pre-order.
    pub fn leaves(&self, id: NodeId) -> Vec<NodeId> {
        self.descendants(id)
            .into_iter()
            .filter(|n| self.is_leaf(*n))
            .collect()
    }

    /// Source boxes of the node and all its descendants.
    pub fn all_boxes(&self, id: NodeId) -> Vec<&SourceBox> {
        self.descendants(id)
            .into_iter()
            .flat_map(|n| self.nodes[n.0].area.boxes())
            .collect()
    }

    /// Text of a leaf, or the text of the children separated by spaces.
    pub fn text(&self, id: NodeId) -> String {
        let node = &self.nodes[id.0];
        if node.children.is_empty() {
            return node.area.box_text();
        }
        node.children
            .iter()
            .map(|c| self.text(*c))
            .filter(|t| !t.is_empty())
            .join(" ")
    }

    /// Deepest area containing the point.
    pub fn area_at(&self, x: i32, y: i32) -> Option<NodeId> {
        let mut cur = self.root;
        if !self.bounds(cur).contains(x, y) {
            return None;
        }
        'descend: loop {
            for child in &self.nodes[cur.0].children {
                if self.bounds(*child).contains(x, y) {
                    cur = *child;
                    continue 'descend;
                }
            }
            return Some(cur);
        }
    }

    /// First area in pre-order whose name contains `name`.
    pub fn area_by_name(&self, name: &str) -> Option<NodeId> {
        self.descendants(self.root)
            .into_iter()
            .find(|n| self.nodes[n.0].area.name().contains(name))
    }

    /// All tags used in the tree.
    pub fn used_tags(&self) -> IndexSet<Tag> {
        self.descendants(self.root)
            .into_iter()
            .flat_map(|n| self.nodes[n.0].area.tags().keys().cloned())
            .collect()
    }

    /// Background the area is painted on: its own, the nearest ancestor's,
    /// or white.
    pub fn effective_background(&self, id: NodeId) -> Color {
        let mut cur = Some(id);
        while let Some(n) = cur {
            if let Some(bg) = self.nodes[n.0].area.background() {
                return bg;
            }
            cur = self.nodes[n.0].parent;
        }
        Color::WHITE
    }

    /// True if no child deviates from the average style of the node by more
    /// than the thresholds.
    pub fn is_coherent(&self, id: NodeId, thresholds: &StyleThresholds) -> bool {
        let fonts = self.nodes[id.0].area.fonts();
        self.nodes[id.0].children.iter().all(|c| {
            thresholds.accepts(fonts, self.nodes[c.0].area.fonts())
        })
    }
}
