//! Grouping of sibling areas into super areas.

use tracing::debug;

use crate::area::{AreaTree, NodeId};
use crate::error::Result;
use crate::segm::group::GroupAnalyzer;
use crate::segm::params::SuperAreaParams;
use crate::segm::separators::SeparatorSet;

use super::{AreaTreeOperator, check_attached};

/// Repeatedly groups the children of every node, bottom-up, using a
/// `GroupAnalyzer` to propose the groups.
#[derive(Debug, Clone, Default)]
pub struct SuperAreaOperator {
    params: SuperAreaParams,
    analyzer: GroupAnalyzer,
}

impl SuperAreaOperator {
    pub fn new(params: SuperAreaParams, analyzer: GroupAnalyzer) -> Self {
        Self { params, analyzer }
    }

    pub fn params(&self) -> &SuperAreaParams {
        &self.params
    }

    fn recursive_find_super_areas(&self, tree: &mut AreaTree, id: NodeId) {
        let children = tree.children(id).to_vec();
        for child in children {
            self.recursive_find_super_areas(tree, child);
        }
        self.find_super_areas(tree, id, self.params.depth_limit);
    }

    /// Groups the children of `id` in at most `pass_limit` passes.
    /// Every new group is regrouped recursively with one pass less.
    ///
    /// Returns the number of groups created.
    pub(crate) fn find_super_areas(&self, tree: &mut AreaTree, id: NodeId, pass_limit: u32) -> usize {
        if tree.child_count(id) <= 1 || pass_limit == 0 {
            return 0;
        }
        tree.ensure_grid(id);
        let mut seps = SeparatorSet::detect(tree, id);
        let mut created = 0;
        let mut changed = true;
        let mut pass = 0;
        while changed && pass < pass_limit {
            changed = false;
            let mut remaining = tree.children(id).to_vec();
            while remaining.len() > 1 {
                let seed = remaining[0];
                let proposal = if tree.is_leaf(seed) {
                    self.analyzer
                        .propose_group(tree, id, &seps, seed, &remaining)
                } else {
                    None
                };
                match proposal {
                    Some((_, selected)) if selected.len() == remaining.len() => break,
                    Some((mut area, selected)) => {
                        let index = tree.index_in_parent(seed).unwrap_or(0);
                        area.level = selected
                            .iter()
                            .map(|n| tree.area(*n).level())
                            .max()
                            .unwrap_or(0)
                            + 1;
                        let group = tree.push(area);
                        tree.insert_child(id, index, group);
                        for n in &selected {
                            tree.append_child(group, *n);
                        }
                        remaining.retain(|n| !selected.contains(n));
                        tree.create_grid(group);
                        debug!(
                            "group {} of {} areas in {} at {}",
                            group,
                            selected.len(),
                            id,
                            tree.bounds(group)
                        );
                        created += 1 + self.find_super_areas(tree, group, pass_limit - 1);
                        changed = true;
                    }
                    None => {
                        remaining.remove(0);
                    }
                }
            }
            tree.create_grid(id);
            seps.remove_simple(tree, id);
            pass += 1;
        }
        tree.set_separators(id, seps);
        debug!("{} groups created in {} after {} passes", created, id, pass);
        created
    }
}

impl AreaTreeOperator for SuperAreaOperator {
    fn id(&self) -> &'static str {
        "vizseg.segm.super_areas"
    }

    fn name(&self) -> &'static str {
        "Super areas"
    }

    fn apply_to(&self, tree: &mut AreaTree, root: NodeId) -> Result<()> {
        check_attached(tree, root)?;
        self.recursive_find_super_areas(tree, root);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::area::Area;
    use crate::model::{BoxNode, FontInfo, Page};
    use crate::utils::Rect;

    fn column(n: usize) -> AreaTree {
        let mut tree = AreaTree::new(Area::new(Rect::new(0, 0, 0, 0)));
        let root = tree.root();
        for i in 0..n {
            let y = i as i32 * 20;
            let page = Page::new(
                1000,
                1000,
                BoxNode::text(Rect::new(0, y, 100, y + 10), "line", FontInfo::sized(12.0)),
            );
            let id = tree.push(Area::from_box(&page.root));
            tree.append_child(root, id);
        }
        tree
    }

    #[test]
    fn groups_pairs_of_siblings() {
        let mut tree = column(4);
        let root = tree.root();
        let op = SuperAreaOperator::new(SuperAreaParams::new(1), GroupAnalyzer::NextSibling);
        op.apply(&mut tree).unwrap();
        // the first pair is grouped; the rest would be everything remaining
        let children = tree.children(root).to_vec();
        assert_eq!(children.len(), 3);
        assert_eq!(tree.child_count(children[0]), 2);
        assert_eq!(tree.area(children[0]).level(), 1);
        assert_eq!(tree.bounds(children[0]), Rect::new(0, 0, 100, 30));
        assert_eq!(tree.all_boxes(root).len(), 4);
    }

    #[test]
    fn never_groups_everything() {
        let mut tree = column(2);
        let op = SuperAreaOperator::default();
        op.apply(&mut tree).unwrap();
        assert_eq!(tree.child_count(tree.root()), 2);
        assert!(tree.children(tree.root()).iter().all(|c| tree.is_leaf(*c)));
    }

    #[test]
    fn zero_depth_is_a_no_op() {
        let mut tree = column(5);
        let op = SuperAreaOperator::new(SuperAreaParams::new(0), GroupAnalyzer::NextSibling);
        op.apply(&mut tree).unwrap();
        assert_eq!(tree.child_count(tree.root()), 5);
    }

    #[test]
    fn detached_root_is_rejected() {
        let mut tree = column(3);
        let lone = tree.push(Area::new(Rect::new(0, 0, 5, 5)));
        let err = SuperAreaOperator::default().apply_to(&mut tree, lone);
        assert!(err.is_err());
    }
}
