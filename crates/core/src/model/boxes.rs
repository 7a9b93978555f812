//! The rendered box tree consumed by the segmentation.
//!
//! Boxes come from an upstream renderer with their geometry, borders,
//! backgrounds and fonts already resolved. Nothing here computes layout;
//! the tree is only read.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use itertools::Itertools;
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

use crate::utils::{HasBounds, Rect};

use super::color::Color;

/// Pre-order index of a box within its page.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Default, Serialize, Deserialize)]
pub struct BoxId(pub usize);

/// Kind of content a box renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BoxKind {
    /// A run of text.
    Text,
    /// A generic element box.
    #[default]
    Element,
    /// Replaced content such as an image or an embedded object.
    Replaced,
}

/// Display role of an element box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DisplayKind {
    #[default]
    Block,
    Inline,
    /// A list item rendered with a marker.
    ListItem,
    Other,
}

/// Border widths of the four box sides, 0 meaning no border.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Borders {
    pub top: u32,
    pub right: u32,
    pub bottom: u32,
    pub left: u32,
}

impl Borders {
    pub const NONE: Borders = Borders::new(0, 0, 0, 0);

    pub const fn new(top: u32, right: u32, bottom: u32, left: u32) -> Self {
        Self {
            top,
            right,
            bottom,
            left,
        }
    }

    /// Number of sides that carry a border.
    pub fn count(&self) -> usize {
        [self.top, self.right, self.bottom, self.left]
            .iter()
            .filter(|w| **w > 0)
            .count()
    }
}

/// Resolved font of a box.
///
/// `weight`, `style`, `underline` and `line_through` are normalized to
/// 0.0 (regular, upright, undecorated) .. 1.0 (bold, italic, decorated).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FontInfo {
    pub size: f64,
    pub weight: f64,
    pub style: f64,
    pub underline: f64,
    pub line_through: f64,
}

impl Default for FontInfo {
    fn default() -> Self {
        Self {
            size: 16.0,
            weight: 0.0,
            style: 0.0,
            underline: 0.0,
            line_through: 0.0,
        }
    }
}

impl FontInfo {
    pub fn sized(size: f64) -> Self {
        Self {
            size,
            ..Self::default()
        }
    }

    pub fn bold(mut self) -> Self {
        self.weight = 1.0;
        self
    }

    pub fn italic(mut self) -> Self {
        self.style = 1.0;
        self
    }
}

fn default_visible() -> bool {
    true
}

/// A single rendered box.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoxNode {
    #[serde(skip)]
    pub(crate) id: BoxId,
    #[serde(default)]
    pub kind: BoxKind,
    #[serde(default)]
    pub display: DisplayKind,
    #[serde(default = "default_visible")]
    pub visible: bool,
    pub bounds: Rect,
    #[serde(default)]
    pub borders: Borders,
    #[serde(default)]
    pub background: Option<Color>,
    /// The background differs from the one the box is painted on.
    #[serde(default)]
    pub background_separated: bool,
    #[serde(default)]
    pub color: Option<Color>,
    #[serde(default)]
    pub font: FontInfo,
    #[serde(default)]
    pub text: String,
    /// Tag name or description used to name the areas built from this box.
    #[serde(default)]
    pub name: Option<SmolStr>,
    #[serde(default)]
    pub children: Vec<BoxNode>,
}

impl BoxNode {
    fn with_kind(kind: BoxKind, bounds: Rect) -> Self {
        Self {
            id: BoxId::default(),
            kind,
            display: DisplayKind::default(),
            visible: true,
            bounds,
            borders: Borders::NONE,
            background: None,
            background_separated: false,
            color: None,
            font: FontInfo::default(),
            text: String::new(),
            name: None,
            children: Vec::new(),
        }
    }

    /// Creates a text box.
    pub fn text(bounds: Rect, text: &str, font: FontInfo) -> Self {
        let mut b = Self::with_kind(BoxKind::Text, bounds);
        b.display = DisplayKind::Inline;
        b.text = text.to_string();
        b.font = font;
        b
    }

    /// Creates an element box without any content.
    pub fn element(bounds: Rect) -> Self {
        Self::with_kind(BoxKind::Element, bounds)
    }

    /// Creates a replaced box (image, embedded object).
    pub fn replaced(bounds: Rect) -> Self {
        Self::with_kind(BoxKind::Replaced, bounds)
    }

    pub fn with_children(mut self, children: Vec<BoxNode>) -> Self {
        self.children = children;
        self
    }

    pub fn with_borders(mut self, borders: Borders) -> Self {
        self.borders = borders;
        self
    }

    /// Sets a background color that separates the box from its context.
    pub fn with_background(mut self, color: Color) -> Self {
        self.background = Some(color);
        self.background_separated = true;
        self
    }

    pub fn with_display(mut self, display: DisplayKind) -> Self {
        self.display = display;
        self
    }

    pub fn with_name(mut self, name: &str) -> Self {
        self.name = Some(SmolStr::new(name));
        self
    }

    pub fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }

    pub fn id(&self) -> BoxId {
        self.id
    }

    /// Text rendered by the box and all its descendants.
    pub fn full_text(&self) -> String {
        match self.kind {
            BoxKind::Text => self.text.clone(),
            _ => self
                .children
                .iter()
                .map(BoxNode::full_text)
                .filter(|t| !t.trim().is_empty())
                .join(" "),
        }
    }

    /// True for text boxes with some non-whitespace content.
    pub fn has_text(&self) -> bool {
        self.kind == BoxKind::Text && !self.text.trim().is_empty()
    }

    /// True if the box or any of its descendants has some text.
    pub fn contains_text(&self) -> bool {
        self.has_text() || self.children.iter().any(BoxNode::contains_text)
    }

    /// Short description used for area names.
    pub fn describe(&self) -> SmolStr {
        if let Some(name) = &self.name {
            return name.clone();
        }
        match self.kind {
            BoxKind::Text => SmolStr::new(self.text.trim()),
            BoxKind::Element => SmolStr::new_static("<element>"),
            BoxKind::Replaced => SmolStr::new_static("<replaced>"),
        }
    }

    /// Font averages weighted by the text length of the descendant text boxes.
    ///
    /// A text box reports its own font; a box without any text reports zeros.
    pub fn font_profile(&self) -> FontInfo {
        if self.kind == BoxKind::Text {
            return self.font;
        }
        let mut sum = [0.0f64; 5];
        let mut len = 0usize;
        self.accumulate_fonts(&mut sum, &mut len);
        if len == 0 {
            return FontInfo {
                size: 0.0,
                ..FontInfo::default()
            };
        }
        let n = len as f64;
        FontInfo {
            size: sum[0] / n,
            weight: sum[1] / n,
            style: sum[2] / n,
            underline: sum[3] / n,
            line_through: sum[4] / n,
        }
    }

    fn accumulate_fonts(&self, sum: &mut [f64; 5], len: &mut usize) {
        if self.kind == BoxKind::Text {
            let l = self.text.trim().chars().count();
            let w = l as f64;
            sum[0] += self.font.size * w;
            sum[1] += self.font.weight * w;
            sum[2] += self.font.style * w;
            sum[3] += self.font.underline * w;
            sum[4] += self.font.line_through * w;
            *len += l;
        }
        for child in &self.children {
            child.accumulate_fonts(sum, len);
        }
    }

    /// Number of descendant boxes including this one.
    pub fn count(&self) -> usize {
        1 + self.children.iter().map(BoxNode::count).sum::<usize>()
    }

    fn assign_ids(&mut self, next: &mut usize) {
        self.id = BoxId(*next);
        *next += 1;
        for child in &mut self.children {
            child.assign_ids(next);
        }
    }
}

impl HasBounds for BoxNode {
    fn bounds(&self) -> Rect {
        self.bounds
    }
}

#[derive(Deserialize)]
struct PageData {
    width: i32,
    height: i32,
    root: BoxNode,
}

impl From<PageData> for Page {
    fn from(data: PageData) -> Self {
        Page::new(data.width, data.height, data.root)
    }
}

/// A rendered page: the viewport size and the root of the box tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "PageData")]
pub struct Page {
    pub width: i32,
    pub height: i32,
    pub root: BoxNode,
}

impl Page {
    /// Creates a page and numbers its boxes in pre-order.
    pub fn new(width: i32, height: i32, mut root: BoxNode) -> Self {
        let mut next = 0;
        root.assign_ids(&mut next);
        Self {
            width,
            height,
            root,
        }
    }

    /// Parses a page from its JSON representation.
    pub fn from_json(json: &str) -> crate::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads a page from a JSON file.
    pub fn from_path(path: impl AsRef<Path>) -> crate::Result<Self> {
        let file = File::open(path)?;
        Ok(serde_json::from_reader(BufReader::new(file))?)
    }

    pub fn bounds(&self) -> Rect {
        Rect::from_size(0, 0, self.width, self.height)
    }
}

/// Snapshot of a source box owned by an area.
///
/// Areas keep these instead of references so that the area tree does not
/// borrow the page it was built from.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceBox {
    pub id: BoxId,
    pub kind: BoxKind,
    pub bounds: Rect,
    /// Text of a text box, empty for the other kinds.
    pub text: String,
    /// Font of a text box, or the averages over the descendant text boxes.
    pub font: FontInfo,
    pub color: Option<Color>,
    /// The box or one of its descendants renders some text.
    pub contains_text: bool,
    pub has_replaced_content: bool,
}

impl SourceBox {
    pub fn from_box(node: &BoxNode) -> Self {
        Self {
            id: node.id,
            kind: node.kind,
            bounds: node.bounds,
            text: if node.kind == BoxKind::Text {
                node.text.clone()
            } else {
                String::new()
            },
            font: node.font_profile(),
            color: node.color,
            contains_text: node.contains_text(),
            has_replaced_content: node.kind == BoxKind::Replaced,
        }
    }

    /// Length of the trimmed text, used as the weight of the font statistics.
    pub fn text_weight(&self) -> usize {
        self.text.trim().chars().count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_numbers_boxes_in_preorder() {
        let root = BoxNode::element(Rect::new(0, 0, 99, 99)).with_children(vec![
            BoxNode::element(Rect::new(0, 0, 99, 49))
                .with_children(vec![BoxNode::text(Rect::new(0, 0, 50, 10), "a", FontInfo::default())]),
            BoxNode::text(Rect::new(0, 50, 50, 60), "b", FontInfo::default()),
        ]);
        let page = Page::new(100, 100, root);
        assert_eq!(page.root.id(), BoxId(0));
        assert_eq!(page.root.children[0].id(), BoxId(1));
        assert_eq!(page.root.children[0].children[0].id(), BoxId(2));
        assert_eq!(page.root.children[1].id(), BoxId(3));
        assert_eq!(page.root.count(), 4);
    }

    #[test]
    fn full_text_skips_blank_runs() {
        let el = BoxNode::element(Rect::new(0, 0, 99, 20)).with_children(vec![
            BoxNode::text(Rect::new(0, 0, 10, 20), "Hello", FontInfo::default()),
            BoxNode::text(Rect::new(11, 0, 15, 20), "  ", FontInfo::default()),
            BoxNode::text(Rect::new(16, 0, 40, 20), "world", FontInfo::default()),
        ]);
        assert_eq!(el.full_text(), "Hello world");
    }

    #[test]
    fn font_profile_weights_by_text_length() {
        let el = BoxNode::element(Rect::new(0, 0, 99, 20)).with_children(vec![
            BoxNode::text(Rect::new(0, 0, 10, 20), "abc", FontInfo::sized(10.0)),
            BoxNode::text(Rect::new(11, 0, 40, 20), "d", FontInfo::sized(20.0).bold()),
        ]);
        let f = el.font_profile();
        assert!((f.size - 12.5).abs() < 1e-9);
        assert!((f.weight - 0.25).abs() < 1e-9);
        assert_eq!(BoxNode::element(Rect::new(0, 0, 5, 5)).font_profile().size, 0.0);
    }

    #[test]
    fn page_from_json_defaults() {
        let json = r##"{
            "width": 200, "height": 100,
            "root": {
                "bounds": {"x1": 0, "y1": 0, "x2": 199, "y2": 99},
                "children": [
                    {"kind": "text", "bounds": {"x1": 0, "y1": 0, "x2": 50, "y2": 15},
                     "text": "Title", "font": {"size": 24.0, "weight": 1.0},
                     "background": "#ffffff"}
                ]
            }
        }"##;
        let page = Page::from_json(json).unwrap();
        let text = &page.root.children[0];
        assert_eq!(text.kind, BoxKind::Text);
        assert!(text.visible);
        assert_eq!(text.font.size, 24.0);
        assert_eq!(text.font.style, 0.0);
        assert_eq!(text.background, Some(Color::WHITE));
        assert_eq!(text.id(), BoxId(1));
    }
}
