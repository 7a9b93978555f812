//! Output forms of a finished area tree.
//!
//! `AreaSnapshot` is an owned, serializable copy of a subtree and
//! `TextDump` renders a subtree as indented text, one area per line.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

use crate::model::{Borders, Color};
use crate::utils::Rect;

use super::entity::FontStats;
use super::tree::{AreaTree, NodeId};

/// Averaged font properties of an area.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct FontSummary {
    pub size: f64,
    pub weight: f64,
    pub style: f64,
    pub underline: f64,
    pub line_through: f64,
}

impl From<&FontStats> for FontSummary {
    fn from(fonts: &FontStats) -> Self {
        Self {
            size: fonts.average_size(),
            weight: fonts.average_weight(),
            style: fonts.average_style(),
            underline: fonts.average_underline(),
            line_through: fonts.average_line_through(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TagSnapshot {
    pub name: SmolStr,
    pub source: SmolStr,
    pub confidence: f32,
}

/// Serializable copy of one area and its subtree.
///
/// Line links refer to other snapshots by their pre-order `index` within the
/// snapshot of the whole exported subtree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AreaSnapshot {
    pub index: usize,
    pub bounds: Rect,
    pub name: SmolStr,
    pub level: u32,
    /// Text of a leaf area.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    pub font: FontSummary,
    pub borders: Borders,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background: Option<Color>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<TagSnapshot>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prev_on_line: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_on_line: Option<usize>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<AreaSnapshot>,
}

impl AreaSnapshot {
    /// Takes the snapshot of the subtree rooted at `id`.
    pub fn of(tree: &AreaTree, id: NodeId) -> Self {
        let index: HashMap<NodeId, usize> = tree
            .descendants(id)
            .into_iter()
            .enumerate()
            .map(|(i, n)| (n, i))
            .collect();
        snapshot_node(tree, id, &index)
    }

    /// Number of areas in the snapshot.
    pub fn count(&self) -> usize {
        1 + self.children.iter().map(AreaSnapshot::count).sum::<usize>()
    }

    /// Leaf snapshots in pre-order.
    pub fn leaves(&self) -> Vec<&AreaSnapshot> {
        if self.children.is_empty() {
            vec![self]
        } else {
            self.children.iter().flat_map(AreaSnapshot::leaves).collect()
        }
    }
}

fn snapshot_node(tree: &AreaTree, id: NodeId, index: &HashMap<NodeId, usize>) -> AreaSnapshot {
    let area = tree.area(id);
    let link = |n: Option<NodeId>| n.and_then(|n| index.get(&n).copied());
    AreaSnapshot {
        index: index[&id],
        bounds: tree.bounds(id),
        name: SmolStr::new(area.name()),
        level: area.level(),
        text: tree.is_leaf(id).then(|| tree.text(id)),
        font: FontSummary::from(area.fonts()),
        borders: area.borders(),
        background: area.background(),
        tags: area
            .tags()
            .iter()
            .map(|(tag, confidence)| TagSnapshot {
                name: tag.name.clone(),
                source: tag.source.clone(),
                confidence: *confidence,
            })
            .collect(),
        prev_on_line: link(tree.prev_on_line(id)),
        next_on_line: link(tree.next_on_line(id)),
        children: tree
            .children(id)
            .iter()
            .map(|c| snapshot_node(tree, *c, index))
            .collect(),
    }
}

/// Indented text rendering of a subtree.
pub struct TextDump<'a> {
    tree: &'a AreaTree,
    root: NodeId,
}

impl<'a> TextDump<'a> {
    pub fn new(tree: &'a AreaTree) -> Self {
        Self {
            tree,
            root: tree.root(),
        }
    }

    pub fn of(tree: &'a AreaTree, root: NodeId) -> Self {
        Self { tree, root }
    }

    fn write_node(&self, f: &mut fmt::Formatter<'_>, id: NodeId, depth: usize) -> fmt::Result {
        let area = self.tree.area(id);
        write!(f, "{:indent$}{} {}", "", area.name(), self.tree.bounds(id), indent = depth * 2)?;
        if area.level() > 0 {
            write!(f, " level={}", area.level())?;
        }
        if self.tree.is_leaf(id) {
            let text = self.tree.text(id);
            if !text.is_empty() {
                write!(f, " {:?}", text)?;
            }
        }
        writeln!(f)?;
        for child in self.tree.children(id) {
            self.write_node(f, *child, depth + 1)?;
        }
        Ok(())
    }
}

impl fmt::Display for TextDump<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_node(f, self.root, 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::area::{Area, Tag};

    fn small_tree() -> (AreaTree, NodeId, NodeId) {
        let mut tree = AreaTree::new(Area::new(Rect::new(0, 0, 99, 19)));
        let root = tree.root();
        let mut left = Area::new(Rect::new(0, 0, 40, 19));
        left.set_name("left");
        left.add_tag(Tag::new("heading", "test"), 0.7);
        let mut right = Area::new(Rect::new(50, 0, 99, 19));
        right.set_name("right");
        let l = tree.push(left);
        let r = tree.push(right);
        tree.append_child(root, l);
        tree.append_child(root, r);
        tree.set_on_line(l, r);
        (tree, l, r)
    }

    #[test]
    fn snapshot_links_by_preorder_index() {
        let (tree, _, _) = small_tree();
        let snap = AreaSnapshot::of(&tree, tree.root());
        assert_eq!(snap.count(), 3);
        assert_eq!(snap.children[0].index, 1);
        assert_eq!(snap.children[0].next_on_line, Some(2));
        assert_eq!(snap.children[1].prev_on_line, Some(1));
        assert_eq!(snap.children[0].tags[0].name, "heading");
        assert_eq!(snap.leaves().len(), 2);
        assert!(snap.text.is_none());
    }

    #[test]
    fn snapshot_survives_json() {
        let (tree, _, _) = small_tree();
        let snap = AreaSnapshot::of(&tree, tree.root());
        let json = serde_json::to_string(&snap).unwrap();
        let back: AreaSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(back, snap);
    }

    #[test]
    fn dump_indents_children() {
        let (tree, _, r) = small_tree();
        let dump = TextDump::new(&tree).to_string();
        let lines: Vec<&str> = dump.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("<area>"));
        assert!(lines[1].starts_with("  left"));
        assert_eq!(TextDump::of(&tree, r).to_string().lines().count(), 1);
    }
}
