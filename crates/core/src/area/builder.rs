//! Construction of the basic area tree from a rendered box tree.
//!
//! Every visually separated box starts a new area. Boxes that are not
//! separated are looked through: their separated descendants become areas
//! of the nearest area above them.

use tracing::{debug, trace};

use crate::model::{BoxKind, BoxNode, DisplayKind, Page, SourceBox};
use crate::utils::Rect;

use super::entity::Area;
use super::tree::{AreaTree, NodeId};

/// Decides whether a box starts a new area.
pub fn is_visually_separated(node: &BoxNode, is_root: bool) -> bool {
    if !node.visible {
        return false;
    }
    if is_root {
        return true;
    }
    match node.kind {
        BoxKind::Text => node.has_text(),
        BoxKind::Replaced => true,
        BoxKind::Element => {
            node.display == DisplayKind::ListItem
                || node.borders.count() >= 1
                || node.background_separated
        }
    }
}

/// A box too small to stand on its own.
fn is_degenerate(bounds: &Rect) -> bool {
    bounds.width() <= 1 && bounds.height() <= 1
}

impl AreaTree {
    /// Builds the basic area tree of a page and the grids of all its nodes.
    pub fn from_page(page: &Page) -> Self {
        let mut tree = AreaTree::new(Area::from_box(&page.root));
        let root = tree.root();
        for child in page.root.children.iter().filter(|c| c.visible) {
            tree.add_separated(child, root);
        }
        tree.create_grids(root);
        debug!(
            "basic area tree: {} areas from {} boxes",
            tree.len(),
            page.root.count()
        );
        tree
    }

    /// Walks the children of `boxnode`, creating areas under `area_root`.
    fn find_standalone_areas(&mut self, boxnode: &BoxNode, area_root: NodeId) {
        for child in boxnode.children.iter().filter(|c| c.visible) {
            if is_visually_separated(child, false) {
                self.add_separated(child, area_root);
            } else {
                self.find_standalone_areas(child, area_root);
            }
        }
    }

    /// Creates the area of a separated box under `parent`. A degenerate box
    /// gets no area of its own: `parent` takes its box and its content.
    fn add_separated(&mut self, boxnode: &BoxNode, parent: NodeId) {
        if is_degenerate(&boxnode.bounds) {
            trace!("dissolving degenerate box at {}", boxnode.bounds);
            self.area_mut(parent).add_box(SourceBox::from_box(boxnode));
            self.find_standalone_areas(boxnode, parent);
            return;
        }
        let node = self.push(Area::from_box(boxnode));
        self.find_standalone_areas(boxnode, node);
        self.append_child(parent, node);
    }

    /// Builds the grid of every node with children, top-down.
    pub fn create_grids(&mut self, id: NodeId) {
        if !self.is_leaf(id) {
            self.create_grid(id);
        }
        let children = self.children(id).to_vec();
        for child in children {
            self.create_grids(child);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Borders, Color, FontInfo};

    fn word(x: i32, y: i32, text: &str) -> BoxNode {
        BoxNode::text(Rect::new(x, y, x + 39, y + 11), text, FontInfo::sized(12.0))
    }

    #[test]
    fn separation_rules() {
        let r = Rect::new(0, 0, 10, 10);
        assert!(is_visually_separated(&BoxNode::element(r), true));
        assert!(!is_visually_separated(&BoxNode::element(r), false));
        assert!(!is_visually_separated(&BoxNode::element(r).hidden(), true));
        assert!(is_visually_separated(&BoxNode::replaced(r), false));
        assert!(!is_visually_separated(
            &BoxNode::text(r, "  ", FontInfo::default()),
            false
        ));
        assert!(is_visually_separated(
            &BoxNode::element(r).with_borders(Borders::new(0, 0, 1, 0)),
            false
        ));
        assert!(is_visually_separated(
            &BoxNode::element(r).with_background(Color::new(200, 0, 0)),
            false
        ));
        assert!(is_visually_separated(
            &BoxNode::element(r).with_display(DisplayKind::ListItem),
            false
        ));
    }

    #[test]
    fn looks_through_plain_containers() {
        let root = BoxNode::element(Rect::new(0, 0, 199, 99)).with_children(vec![
            BoxNode::element(Rect::new(0, 0, 199, 49))
                .with_borders(Borders::new(1, 1, 1, 1))
                .with_children(vec![
                    BoxNode::element(Rect::new(0, 0, 199, 20))
                        .with_children(vec![word(0, 0, "alpha"), word(50, 0, "beta")]),
                ]),
            word(0, 60, "gamma").hidden(),
        ]);
        let tree = AreaTree::from_page(&Page::new(200, 100, root));
        let top = tree.children(tree.root()).to_vec();
        assert_eq!(top.len(), 1);
        let words = tree.children(top[0]);
        assert_eq!(words.len(), 2);
        assert_eq!(tree.text(top[0]), "alpha beta");
        assert!(tree.try_grid(top[0]).is_some());
        assert!(tree.try_grid(tree.root()).is_some());
    }

    #[test]
    fn degenerate_areas_hand_over_content() {
        let root = BoxNode::element(Rect::new(0, 0, 99, 99)).with_children(vec![
            BoxNode::element(Rect::new(10, 10, 89, 89))
                .with_borders(Borders::new(1, 1, 1, 1))
                .with_children(vec![
                    BoxNode::replaced(Rect::new(20, 20, 20, 20)),
                    word(20, 40, "kept"),
                ]),
        ]);
        let page = Page::new(100, 100, root);
        let tree = AreaTree::from_page(&page);
        let frame = tree.children(tree.root())[0];
        assert_eq!(tree.child_count(frame), 1);
        let owned = tree.area(frame).boxes();
        assert_eq!(owned.len(), 2);
        assert!(owned.iter().any(|b| b.has_replaced_content));
        assert_eq!(tree.all_boxes(tree.root()).len(), 4);
    }

    #[test]
    fn degenerate_box_content_moves_to_the_enclosing_area() {
        let root = BoxNode::element(Rect::new(0, 0, 99, 99)).with_children(vec![
            BoxNode::element(Rect::new(5, 5, 89, 89))
                .with_borders(Borders::new(1, 1, 1, 1))
                .with_children(vec![
                    BoxNode::element(Rect::new(10, 10, 10, 10))
                        .with_borders(Borders::new(1, 1, 1, 1))
                        .with_children(vec![BoxNode::text(
                            Rect::new(20, 20, 60, 30),
                            "inner",
                            FontInfo::sized(12.0),
                        )]),
                ]),
        ]);
        let tree = AreaTree::from_page(&Page::new(100, 100, root));
        let frame = tree.children(tree.root())[0];
        let inside = tree.children(frame);
        assert_eq!(inside.len(), 1);
        assert!(tree.is_leaf(inside[0]));
        assert_eq!(tree.bounds(inside[0]), Rect::new(20, 20, 60, 30));
        assert_eq!(tree.text(inside[0]), "inner");
        assert!(
            tree.area(frame)
                .boxes()
                .iter()
                .any(|b| b.bounds == Rect::new(10, 10, 10, 10))
        );
        assert_eq!(tree.all_boxes(tree.root()).len(), 4);
    }

    #[test]
    fn fonts_propagate_upwards() {
        let root = BoxNode::element(Rect::new(0, 0, 199, 99)).with_children(vec![
            BoxNode::element(Rect::new(0, 0, 199, 49))
                .with_background(Color::new(0, 0, 120))
                .with_children(vec![word(0, 0, "alpha"), word(50, 0, "beta")]),
        ]);
        let tree = AreaTree::from_page(&Page::new(200, 100, root));
        assert!((tree.area(tree.root()).fonts().average_size() - 12.0).abs() < 1e-9);
    }
}
