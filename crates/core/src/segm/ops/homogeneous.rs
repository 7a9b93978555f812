//! Grouping of the children sharing a font style.

use crate::area::{AreaTree, NodeId};
use crate::error::Result;
use crate::segm::group::GroupAnalyzer;
use crate::segm::params::{StyleThresholds, SuperAreaParams};

use super::{AreaTreeOperator, SuperAreaOperator, check_attached};

/// Top-down, groups runs of children of a similar font style into one
/// area, a single pass per node.
#[derive(Debug, Clone)]
pub struct HomogeneousLeafOperator {
    grouping: SuperAreaOperator,
}

impl Default for HomogeneousLeafOperator {
    fn default() -> Self {
        Self::new(StyleThresholds::default())
    }
}

impl HomogeneousLeafOperator {
    pub fn new(style: StyleThresholds) -> Self {
        Self {
            grouping: SuperAreaOperator::new(SuperAreaParams::new(1), GroupAnalyzer::ByStyles(style)),
        }
    }

    fn find_homogeneous_leaves(&self, tree: &mut AreaTree, id: NodeId) {
        if tree.child_count(id) > 1 {
            self.grouping.find_super_areas(tree, id, 1);
        }
        let children = tree.children(id).to_vec();
        for child in children {
            self.find_homogeneous_leaves(tree, child);
        }
    }
}

impl AreaTreeOperator for HomogeneousLeafOperator {
    fn id(&self) -> &'static str {
        "vizseg.segm.homogeneous_leaves"
    }

    fn name(&self) -> &'static str {
        "Homogeneous leaves"
    }

    fn apply_to(&self, tree: &mut AreaTree, root: NodeId) -> Result<()> {
        check_attached(tree, root)?;
        self.find_homogeneous_leaves(tree, root);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::area::Area;
    use crate::model::{BoxNode, FontInfo, Page};
    use crate::utils::Rect;

    #[test]
    fn groups_runs_of_same_style() {
        let mut tree = AreaTree::new(Area::new(Rect::new(0, 0, 0, 0)));
        let root = tree.root();
        let items = [
            (Rect::new(0, 0, 200, 20), "Heading", FontInfo::sized(24.0).bold()),
            (Rect::new(0, 22, 200, 32), "first", FontInfo::sized(12.0)),
            (Rect::new(0, 33, 200, 43), "second", FontInfo::sized(12.0)),
            (Rect::new(0, 44, 200, 54), "third", FontInfo::sized(12.0)),
            (Rect::new(0, 70, 200, 76), "footer", FontInfo::sized(8.0)),
        ];
        let mut ids = Vec::new();
        for (r, text, font) in items {
            let page = Page::new(1000, 1000, BoxNode::text(r, text, font));
            let id = tree.push(Area::from_box(&page.root));
            tree.append_child(root, id);
            ids.push(id);
        }

        HomogeneousLeafOperator::default().apply(&mut tree).unwrap();
        let children = tree.children(root).to_vec();
        assert_eq!(children.len(), 3);
        assert_eq!(children[0], ids[0]);
        assert_eq!(tree.children(children[1]), &ids[1..4]);
        assert_eq!(children[2], ids[4]);
        assert!(tree.area(children[1]).is_explicitly_separated());
    }
}
