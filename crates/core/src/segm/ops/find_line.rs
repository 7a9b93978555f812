//! Joining of the areas forming a single text line.

use tracing::debug;

use crate::area::{AreaTree, NodeId};
use crate::error::Result;
use crate::segm::params::FindLineParams;

use super::{AreaTreeOperator, align_rows, check_attached, right_neighbors};

/// Joins horizontally adjacent sibling areas lying on the same line.
#[derive(Debug, Clone, Default)]
pub struct FindLineOperator {
    params: FindLineParams,
}

impl FindLineOperator {
    pub fn new(params: FindLineParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &FindLineParams {
        &self.params
    }

    fn recursive_join_areas(&self, tree: &mut AreaTree, id: NodeId) {
        self.join_areas(tree, id);
        let children = tree.children(id).to_vec();
        for child in children {
            self.recursive_join_areas(tree, child);
        }
    }

    /// Joins the children of one node until nothing changes.
    fn join_areas(&self, tree: &mut AreaTree, id: NodeId) {
        if tree.is_leaf(id) {
            return;
        }
        tree.ensure_grid(id);
        let mut changed = true;
        while changed {
            changed = false;
            let children = tree.children(id).to_vec();
            for node in children {
                if self.extend_right(tree, id, node) {
                    changed = true;
                    break;
                }
            }
        }
    }

    /// Tries to join `node` with its nearest neighbour on the right.
    /// Returns true if the tree was changed.
    fn extend_right(&self, tree: &mut AreaTree, parent: NodeId, node: NodeId) -> bool {
        let Some(&neigh) = right_neighbors(tree, parent, node, |_| true).first() else {
            return false;
        };
        let same_style = !self.params.use_consistent_style
            || self
                .params
                .style
                .accepts(tree.area(node).fonts(), tree.area(neigh).fonts());
        if same_style {
            if self.horizontal_join(tree, parent, node, neigh, true) {
                tree.create_grid(node);
                tree.create_grid(parent);
                return true;
            }
        } else if self.horizontal_join(tree, parent, node, neigh, false) {
            tree.set_on_line(node, neigh);
        }
        false
    }

    /// Checks whether `n2` can be joined to `n1` and joins them if `affect`
    /// is set.
    fn horizontal_join(
        &self,
        tree: &mut AreaTree,
        parent: NodeId,
        n1: NodeId,
        n2: NodeId,
        affect: bool,
    ) -> bool {
        let a1 = tree.area(n1);
        let a2 = tree.area(n2);
        let b1 = tree.bounds(n1);
        let b2 = tree.bounds(n2);
        let dist = (b2.x1 - b1.x2).abs().min((b1.x1 - b2.x2).abs());
        let limit = a1.fonts().average_size() * f64::from(self.params.max_line_em_space);
        if f64::from(dist) > limit {
            return false;
        }
        if a1.borders().right > 0 || a2.borders().left > 0 || a1.background() != a2.background() {
            return false;
        }
        if align_rows(tree, parent, n1, n2).is_none() {
            return false;
        }
        if affect {
            debug!("join: {} + {}", a1.name(), a2.name());
            tree.join_area(n1, n2, true);
        }
        true
    }
}

impl AreaTreeOperator for FindLineOperator {
    fn id(&self) -> &'static str {
        "vizseg.segm.find_lines"
    }

    fn name(&self) -> &'static str {
        "Find lines"
    }

    fn apply_to(&self, tree: &mut AreaTree, root: NodeId) -> Result<()> {
        check_attached(tree, root)?;
        self.recursive_join_areas(tree, root);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::area::Area;
    use crate::model::{BoxNode, FontInfo, Page};
    use crate::segm::params::StyleThresholds;
    use crate::utils::Rect;

    fn words(items: &[(Rect, &str, FontInfo)]) -> (AreaTree, Vec<NodeId>) {
        let mut tree = AreaTree::new(Area::new(Rect::new(0, 0, 0, 0)));
        let root = tree.root();
        let mut ids = Vec::new();
        for (r, text, font) in items {
            let page = Page::new(1000, 1000, BoxNode::text(*r, text, *font));
            let id = tree.push(Area::from_box(&page.root));
            tree.append_child(root, id);
            ids.push(id);
        }
        (tree, ids)
    }

    #[test]
    fn joins_words_of_a_line() {
        let f = FontInfo::sized(12.0);
        let (mut tree, ids) = words(&[
            (Rect::new(0, 0, 40, 12), "one", f),
            (Rect::new(50, 0, 90, 12), "two", f),
            (Rect::new(100, 0, 140, 12), "three", f),
            (Rect::new(0, 30, 40, 42), "next", f),
        ]);
        FindLineOperator::default().apply(&mut tree).unwrap();
        let root = tree.root();
        assert_eq!(tree.children(root), &[ids[0], ids[3]]);
        assert_eq!(tree.bounds(ids[0]), Rect::new(0, 0, 140, 12));
        assert_eq!(tree.text(ids[0]), "one two three");
    }

    #[test]
    fn far_words_stay_apart() {
        let f = FontInfo::sized(10.0);
        let (mut tree, _) = words(&[
            (Rect::new(0, 0, 40, 10), "left", f),
            (Rect::new(60, 0, 100, 10), "right", f),
        ]);
        FindLineOperator::default().apply(&mut tree).unwrap();
        assert_eq!(tree.child_count(tree.root()), 2);
    }

    #[test]
    fn different_style_is_only_linked() {
        let (mut tree, ids) = words(&[
            (Rect::new(0, 0, 40, 12), "plain", FontInfo::sized(12.0)),
            (Rect::new(48, 0, 90, 12), "bold", FontInfo::sized(12.0).bold()),
        ]);
        let params = FindLineParams::new(true, 1.5)
            .unwrap()
            .with_style(StyleThresholds::default());
        FindLineOperator::new(params).apply(&mut tree).unwrap();
        assert_eq!(tree.child_count(tree.root()), 2);
        assert_eq!(tree.next_on_line(ids[0]), Some(ids[1]));
        assert_eq!(tree.prev_on_line(ids[1]), Some(ids[0]));
    }

    #[test]
    fn taller_neighbour_blocked_by_other_area() {
        let f = FontInfo::sized(12.0);
        let (mut tree, _) = words(&[
            (Rect::new(0, 0, 40, 12), "a", f),
            (Rect::new(0, 14, 40, 26), "below", f),
            (Rect::new(45, 0, 90, 26), "tall", f),
        ]);
        FindLineOperator::default().apply(&mut tree).unwrap();
        // "a" would have to grow over "below"
        assert_eq!(tree.child_count(tree.root()), 3);
    }
}
