//! Operators transforming an area tree in place.
//!
//! - `super_area` - grouping siblings into synthetic parent areas
//! - `find_line` - joining the areas forming one text line
//! - `sort` - reading order by position or by lines
//! - `flatten` - reducing the tree to the root and its leaves
//! - `homogeneous` - grouping children of a similar font style

pub mod find_line;
pub mod flatten;
pub mod homogeneous;
pub mod sort;
pub mod super_area;

pub use find_line::FindLineOperator;
pub use flatten::FlattenTreeOperator;
pub use homogeneous::HomogeneousLeafOperator;
pub use sort::{SortByLinesOperator, SortByPositionOperator};
pub use super_area::SuperAreaOperator;

use crate::area::{AreaTree, NodeId};
use crate::error::{Result, SegmError};
use crate::utils::Rect;

/// An operation applied to a whole area tree or to one of its subtrees.
pub trait AreaTreeOperator {
    /// Stable identifier of the operator.
    fn id(&self) -> &'static str;

    /// Human readable name.
    fn name(&self) -> &'static str;

    /// Applies the operator to the whole tree.
    fn apply(&self, tree: &mut AreaTree) -> Result<()> {
        let root = tree.root();
        self.apply_to(tree, root)
    }

    /// Applies the operator to the subtree rooted at `root`.
    fn apply_to(&self, tree: &mut AreaTree, root: NodeId) -> Result<()>;
}

/// Fails unless `id` is part of the tree.
pub(crate) fn check_attached(tree: &AreaTree, id: NodeId) -> Result<()> {
    if tree.is_attached(id) {
        Ok(())
    } else {
        Err(SegmError::DetachedNode(id.0))
    }
}

/// Aligns the row spans of two neighbours in their parent's grid.
///
/// Each node may grow one row at a time towards the span of the other, as
/// long as the cells it claims in its own columns are empty or owned by one
/// of the two nodes. Returns the common row span, or `None` if a third
/// area blocks the alignment.
pub(crate) fn align_rows(
    tree: &AreaTree,
    parent: NodeId,
    n1: NodeId,
    n2: NodeId,
) -> Option<(usize, usize)> {
    let grid = tree.grid(parent);
    let p1 = tree.grid_position(n1);
    let p2 = tree.grid_position(n2);
    let can_expand = |node: NodeId, pos: Rect, row: usize| {
        (pos.x1..=pos.x2).all(|col| match grid.area_at(col as usize, row) {
            None => true,
            Some(c) => c == node || c == n1 || c == n2,
        })
    };

    let (mut sy1, mut sy2) = (p1.y1 as usize, p2.y1 as usize);
    while sy1 != sy2 {
        if sy1 < sy2 {
            if sy2 > 0 && can_expand(n2, p2, sy2 - 1) {
                sy2 -= 1;
            } else {
                return None;
            }
        } else if sy1 > 0 && can_expand(n1, p1, sy1 - 1) {
            sy1 -= 1;
        } else {
            return None;
        }
    }

    let last = grid.height().saturating_sub(1);
    let (mut ey1, mut ey2) = (p1.y2 as usize, p2.y2 as usize);
    while ey1 != ey2 {
        if ey1 < ey2 {
            if ey1 < last && can_expand(n1, p1, ey1 + 1) {
                ey1 += 1;
            } else {
                return None;
            }
        } else if ey2 < last && can_expand(n2, p2, ey2 + 1) {
            ey2 += 1;
        } else {
            return None;
        }
    }
    Some((sy1, ey1))
}

/// Neighbours right of `node` in its parent's grid, scanning one column at
/// a time over the rows spanned by `node`. Every column contributes the
/// first accepted area found in it, in increasing distance.
pub(crate) fn right_neighbors(
    tree: &AreaTree,
    parent: NodeId,
    node: NodeId,
    accept: impl Fn(NodeId) -> bool,
) -> Vec<NodeId> {
    let grid = tree.grid(parent);
    let pos = tree.grid_position(node);
    let mut ret: Vec<NodeId> = Vec::new();
    for col in (pos.x2 as usize + 1)..grid.width() {
        let found = (pos.y1..=pos.y2)
            .filter_map(|row| grid.area_at(col, row as usize))
            .find(|n| *n != node && accept(*n));
        if let Some(n) = found {
            if !ret.contains(&n) {
                ret.push(n);
            }
        }
    }
    ret
}
