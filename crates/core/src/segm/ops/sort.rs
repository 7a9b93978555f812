//! Reading order of sibling areas.

use std::cmp::Ordering;

use tracing::trace;

use crate::area::{AreaTree, NodeId};
use crate::error::Result;
use crate::segm::params::SortParams;

use super::{AreaTreeOperator, align_rows, check_attached, right_neighbors};

/// Sorts the children of every node by their position.
#[derive(Debug, Clone, Default)]
pub struct SortByPositionOperator {
    params: SortParams,
}

impl SortByPositionOperator {
    pub fn new(params: SortParams) -> Self {
        Self { params }
    }
}

fn compare_position(tree: &AreaTree, a: NodeId, b: NodeId, column_first: bool) -> Ordering {
    let ra = tree.bounds(a);
    let rb = tree.bounds(b);
    if column_first {
        ra.x1.cmp(&rb.x1).then(ra.y1.cmp(&rb.y1))
    } else {
        ra.y1.cmp(&rb.y1).then(ra.x1.cmp(&rb.x1))
    }
}

/// Stable position sort of the whole subtree, top-down.
fn recursively_sort_children(tree: &mut AreaTree, id: NodeId, column_first: bool) {
    if tree.child_count(id) > 1 {
        let mut list = tree.children(id).to_vec();
        list.sort_by(|a, b| compare_position(tree, *a, *b, column_first));
        tree.set_children(id, list);
    }
    let children = tree.children(id).to_vec();
    for child in children {
        recursively_sort_children(tree, child, column_first);
    }
}

impl AreaTreeOperator for SortByPositionOperator {
    fn id(&self) -> &'static str {
        "vizseg.segm.sort_by_position"
    }

    fn name(&self) -> &'static str {
        "Sort by position"
    }

    fn apply_to(&self, tree: &mut AreaTree, root: NodeId) -> Result<()> {
        check_attached(tree, root)?;
        recursively_sort_children(tree, root, self.params.column_first);
        Ok(())
    }
}

/// Sorts the children row by row and then keeps the areas lying on one
/// line together, in the order of the line.
#[derive(Debug, Clone, Default)]
pub struct SortByLinesOperator;

impl SortByLinesOperator {
    pub fn new() -> Self {
        Self
    }

    fn recursive_sort_lines(&self, tree: &mut AreaTree, id: NodeId) {
        self.sort_child_lines(tree, id);
        let children = tree.children(id).to_vec();
        for child in children {
            self.recursive_sort_lines(tree, child);
        }
    }

    fn sort_child_lines(&self, tree: &mut AreaTree, id: NodeId) {
        if tree.child_count(id) <= 1 {
            return;
        }
        tree.ensure_grid(id);
        let mut src = tree.children(id).to_vec();
        let mut dest = Vec::with_capacity(src.len());
        while let Some(&seed) = src.first() {
            let line = find_areas_on_line(tree, id, seed, &src);
            trace!("line of {} areas starting at {}", line.len(), seed);
            src.retain(|n| !line.contains(n));
            dest.extend(line);
        }
        tree.set_children(id, dest);
    }
}

/// The seed followed by the candidates on its right sharing its line.
fn find_areas_on_line(
    tree: &AreaTree,
    parent: NodeId,
    seed: NodeId,
    candidates: &[NodeId],
) -> Vec<NodeId> {
    let mut ret = vec![seed];
    for neigh in right_neighbors(tree, parent, seed, |n| candidates.contains(&n)) {
        if align_rows(tree, parent, seed, neigh).is_some() {
            ret.push(neigh);
        }
    }
    ret
}

impl AreaTreeOperator for SortByLinesOperator {
    fn id(&self) -> &'static str {
        "vizseg.segm.sort_by_lines"
    }

    fn name(&self) -> &'static str {
        "Sort by lines"
    }

    fn apply_to(&self, tree: &mut AreaTree, root: NodeId) -> Result<()> {
        check_attached(tree, root)?;
        recursively_sort_children(tree, root, false);
        self.recursive_sort_lines(tree, root);
        Ok(())
    }
}
