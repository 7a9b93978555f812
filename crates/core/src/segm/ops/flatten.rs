//! Reduction of a tree to its root and leaves.

use tracing::debug;

use crate::area::{AreaTree, NodeId};
use crate::error::Result;

use super::{AreaTreeOperator, check_attached};

/// Moves every leaf directly under the root, in pre-order, and removes
/// all the inner nodes. The root takes over the boxes of the removed nodes.
#[derive(Debug, Clone, Default)]
pub struct FlattenTreeOperator;

impl FlattenTreeOperator {
    pub fn new() -> Self {
        Self
    }
}

impl AreaTreeOperator for FlattenTreeOperator {
    fn id(&self) -> &'static str {
        "vizseg.segm.flatten"
    }

    fn name(&self) -> &'static str {
        "Flatten tree"
    }

    fn apply_to(&self, tree: &mut AreaTree, root: NodeId) -> Result<()> {
        check_attached(tree, root)?;
        let leaves: Vec<NodeId> = tree
            .leaves(root)
            .into_iter()
            .filter(|n| *n != root)
            .collect();
        let inner: Vec<NodeId> = tree
            .descendants(root)
            .into_iter()
            .skip(1)
            .filter(|n| !tree.is_leaf(*n))
            .collect();
        for node in &inner {
            let other = tree.area(*node).clone();
            tree.area_mut(root).absorb_boxes(&other);
        }
        tree.clear_children(root);
        for leaf in &leaves {
            tree.relink_child(root, *leaf);
        }
        debug!("flattened {} leaves, {} inner nodes removed", leaves.len(), inner.len());
        Ok(())
    }
}
