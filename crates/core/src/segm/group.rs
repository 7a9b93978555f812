//! Policies proposing groups of sibling areas.

use tracing::trace;

use crate::area::{Area, AreaTree, NodeId};
use crate::utils::Rect;

use super::params::StyleThresholds;
use super::separators::SeparatorSet;

/// Strategy deciding which siblings of a seed area form a group.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum GroupAnalyzer {
    /// Groups the seed with the sibling following it.
    #[default]
    NextSibling,
    /// Extends the seed by the following siblings of a similar font style,
    /// stopping at a separator or at a sibling of a different style.
    ByStyles(StyleThresholds),
}

impl GroupAnalyzer {
    /// Proposes a group starting with `seed`.
    ///
    /// `candidates` are the siblings still available for grouping, in the
    /// order of the parent's children, the seed included. Returns a new
    /// empty area covering the group and the nodes to move into it, or
    /// `None` when the seed cannot start a group.
    pub fn propose_group(
        &self,
        tree: &AreaTree,
        parent: NodeId,
        seps: &SeparatorSet,
        seed: NodeId,
        candidates: &[NodeId],
    ) -> Option<(Area, Vec<NodeId>)> {
        let selected = match self {
            GroupAnalyzer::NextSibling => {
                let sibling = tree.next_sibling(seed)?;
                if !candidates.contains(&sibling) {
                    return None;
                }
                vec![seed, sibling]
            }
            GroupAnalyzer::ByStyles(thresholds) => {
                by_styles(tree, parent, seps, seed, candidates, thresholds)
            }
        };
        if selected.len() < 2 {
            return None;
        }

        let mut bounds = tree.bounds(selected[0]);
        for n in &selected[1..] {
            bounds.expand_to_enclose(&tree.bounds(*n));
        }
        let mut area = Area::new(bounds);
        if let GroupAnalyzer::ByStyles(_) = self {
            area.set_explicitly_separated(true);
        }
        trace!("proposed group of {} areas at {}", selected.len(), bounds);
        Some((area, selected))
    }
}

fn by_styles(
    tree: &AreaTree,
    parent: NodeId,
    seps: &SeparatorSet,
    seed: NodeId,
    candidates: &[NodeId],
    thresholds: &StyleThresholds,
) -> Vec<NodeId> {
    let reference = *tree.area(seed).fonts();
    let mut selected = vec![seed];
    let mut bounds = tree.bounds(seed);
    let start = candidates.iter().position(|c| *c == seed).map_or(0, |i| i + 1);

    for cand in &candidates[start..] {
        let cb = tree.bounds(*cand);
        if !thresholds.accepts(&reference, tree.area(*cand).fonts()) {
            break;
        }
        if seps.separates(&bounds, &cb) {
            break;
        }
        let grown = bounds.union(&cb);
        if overlaps_others(tree, parent, &grown, &selected, *cand) {
            break;
        }
        selected.push(*cand);
        bounds = grown;
    }
    selected
}

/// True if `r` intersects a child of `parent` outside the group.
fn overlaps_others(
    tree: &AreaTree,
    parent: NodeId,
    r: &Rect,
    selected: &[NodeId],
    cand: NodeId,
) -> bool {
    tree.children(parent)
        .iter()
        .filter(|c| **c != cand && !selected.contains(c))
        .any(|c| tree.bounds(*c).intersects(r))
}
