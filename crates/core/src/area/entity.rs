//! The payload of a single area tree node.

use indexmap::IndexMap;
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;
use tracing::warn;

use crate::model::{BoxKind, BoxNode, Borders, Color, SourceBox};
use crate::utils::{HasBounds, Rect};

/// Running `(sum, count)` pair of a text-length weighted average.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Accumulator {
    pub sum: f64,
    pub count: u64,
}

impl Accumulator {
    pub fn add(&mut self, value: f64, weight: u64) {
        self.sum += value * weight as f64;
        self.count += weight;
    }

    pub fn merge(&mut self, other: &Accumulator) {
        self.sum += other.sum;
        self.count += other.count;
    }

    /// Weighted average, 0 when nothing was accumulated.
    pub fn average(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.sum / self.count as f64
        }
    }
}

/// Font statistics of the text contained in an area.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FontStats {
    pub size: Accumulator,
    pub weight: Accumulator,
    pub style: Accumulator,
    pub underline: Accumulator,
    pub line_through: Accumulator,
}

impl FontStats {
    /// Adds a text box, weighted by its trimmed text length.
    pub fn add_box(&mut self, src: &SourceBox) {
        let len = src.text_weight() as u64;
        if src.kind != BoxKind::Text || len == 0 {
            return;
        }
        self.size.add(src.font.size, len);
        self.weight.add(src.font.weight, len);
        self.style.add(src.font.style, len);
        self.underline.add(src.font.underline, len);
        self.line_through.add(src.font.line_through, len);
    }

    pub fn merge(&mut self, other: &FontStats) {
        self.size.merge(&other.size);
        self.weight.merge(&other.weight);
        self.style.merge(&other.style);
        self.underline.merge(&other.underline);
        self.line_through.merge(&other.line_through);
    }

    pub fn average_size(&self) -> f64 {
        self.size.average()
    }

    pub fn average_weight(&self) -> f64 {
        self.weight.average()
    }

    pub fn average_style(&self) -> f64 {
        self.style.average()
    }

    pub fn average_underline(&self) -> f64 {
        self.underline.average()
    }

    pub fn average_line_through(&self) -> f64 {
        self.line_through.average()
    }
}

/// A semantic tag assigned to an area by a downstream classifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Tag {
    pub name: SmolStr,
    /// Identifies the classifier that produced the tag.
    pub source: SmolStr,
}

impl Tag {
    pub fn new(name: &str, source: &str) -> Self {
        Self {
            name: SmolStr::new(name),
            source: SmolStr::new(source),
        }
    }
}

/// A rectangular visually coherent region of the page.
#[derive(Debug, Clone, PartialEq)]
pub struct Area {
    pub(crate) bounds: Rect,
    content_bounds: Option<Rect>,
    name: SmolStr,
    borders: Borders,
    background: Option<Color>,
    background_separated: bool,
    pub(crate) explicitly_separated: bool,
    pub(crate) level: u32,
    fonts: FontStats,
    tags: IndexMap<Tag, f32>,
    boxes: Vec<SourceBox>,
}

impl Area {
    /// Creates an empty synthetic area covering `bounds`.
    pub fn new(bounds: Rect) -> Self {
        Self {
            bounds,
            content_bounds: None,
            name: SmolStr::new_static("<area>"),
            borders: Borders::NONE,
            background: None,
            background_separated: false,
            explicitly_separated: false,
            level: 0,
            fonts: FontStats::default(),
            tags: IndexMap::new(),
            boxes: Vec::new(),
        }
    }

    /// Creates the area of a visually separated box.
    pub fn from_box(node: &BoxNode) -> Self {
        let mut area = Area::new(node.bounds);
        area.name = node.describe();
        area.borders = node.borders;
        area.background = node.background;
        area.background_separated = node.background_separated;
        area.add_box(SourceBox::from_box(node));
        area
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: &str) {
        self.name = SmolStr::new(name);
    }

    /// Tight rectangle around the owned boxes, `None` for synthetic areas.
    pub fn content_bounds(&self) -> Option<Rect> {
        self.content_bounds
    }

    pub fn borders(&self) -> Borders {
        self.borders
    }

    pub fn set_borders(&mut self, borders: Borders) {
        self.borders = borders;
    }

    pub fn background(&self) -> Option<Color> {
        self.background
    }

    pub fn set_background(&mut self, background: Option<Color>) {
        self.background = background;
    }

    pub fn is_background_separated(&self) -> bool {
        self.background_separated
    }

    pub fn is_explicitly_separated(&self) -> bool {
        self.explicitly_separated
    }

    pub fn set_explicitly_separated(&mut self, value: bool) {
        self.explicitly_separated = value;
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn fonts(&self) -> &FontStats {
        &self.fonts
    }

    /// Source boxes owned directly by this area.
    pub fn boxes(&self) -> &[SourceBox] {
        &self.boxes
    }

    /// Adds a source box and grows the area to cover it.
    pub fn add_box(&mut self, src: SourceBox) {
        match &mut self.content_bounds {
            Some(cb) => cb.expand_to_enclose(&src.bounds),
            None => self.content_bounds = Some(src.bounds),
        }
        self.bounds.expand_to_enclose(&src.bounds);
        self.fonts.add_box(&src);
        self.boxes.push(src);
    }

    /// Grows the declared bounds to enclose `r`.
    pub fn expand(&mut self, r: &Rect) {
        self.bounds.expand_to_enclose(r);
    }

    /// Adds the font accumulators of another area to this one.
    pub fn update_averages(&mut self, other: &FontStats) {
        self.fonts.merge(other);
    }

    /// Joins another area into this one.
    ///
    /// Along the join direction the side facing away from this area takes
    /// the border of `other` when `other` has one there, decided on the
    /// coordinates before the union. An existing border is never cleared.
    pub fn join(&mut self, other: &Area, horizontal: bool) {
        let borders = &mut self.borders;
        let (side, outer) = if horizontal {
            if self.bounds.x1 <= other.bounds.x1 {
                (&mut borders.right, other.borders.right)
            } else {
                (&mut borders.left, other.borders.left)
            }
        } else if self.bounds.y1 <= other.bounds.y1 {
            (&mut borders.bottom, other.borders.bottom)
        } else {
            (&mut borders.top, other.borders.top)
        };
        if outer > 0 {
            *side = outer;
        }
        self.bounds.expand_to_enclose(&other.bounds);
        if let Some(ocb) = other.content_bounds {
            match &mut self.content_bounds {
                Some(cb) => cb.expand_to_enclose(&ocb),
                None => self.content_bounds = Some(ocb),
            }
        }
        self.name = SmolStr::new(format!("{} . {}", self.name, other.name));
        self.boxes.extend(other.boxes.iter().cloned());
        self.fonts.merge(&other.fonts);
        for (tag, conf) in &other.tags {
            self.add_tag(tag.clone(), *conf);
        }
        if self.background != other.background {
            warn!(
                "joining areas {} and {} with different backgrounds",
                self.bounds, other.bounds
            );
        }
    }

    /// Joins the bounds and the name of a descendant being folded into this area.
    pub fn join_child(&mut self, other: &Area) {
        self.bounds.expand_to_enclose(&other.bounds);
        self.name = SmolStr::new(format!("{} . {}", self.name, other.name));
    }

    /// Moves the owned boxes of a descendant into this area. The font
    /// statistics are left alone, an ancestor already accounts for them.
    pub(crate) fn absorb_boxes(&mut self, other: &Area) {
        for src in &other.boxes {
            match &mut self.content_bounds {
                Some(cb) => cb.expand_to_enclose(&src.bounds),
                None => self.content_bounds = Some(src.bounds),
            }
            self.bounds.expand_to_enclose(&src.bounds);
            self.boxes.push(src.clone());
        }
    }

    pub fn contains_text(&self) -> bool {
        self.boxes.iter().any(|b| b.contains_text)
    }

    pub fn is_replaced(&self) -> bool {
        self.boxes.iter().any(|b| b.has_replaced_content)
    }

    /// Text of the owned boxes.
    pub fn box_text(&self) -> String {
        self.boxes
            .iter()
            .map(|b| b.text.trim())
            .filter(|t| !t.is_empty())
            .join(" ")
    }

    pub fn text_length(&self) -> usize {
        self.boxes.iter().map(SourceBox::text_weight).sum()
    }

    /// Font size of the first owned box, 0 for synthetic areas.
    pub fn declared_font_size(&self) -> f64 {
        self.boxes.first().map_or(0.0, |b| b.font.size)
    }

    /// Text color luminosity averaged over the owned boxes by text length.
    pub fn average_color_luminosity(&self) -> f64 {
        let mut sum = 0.0;
        let mut len = 0usize;
        for b in &self.boxes {
            let l = b.text_weight();
            sum += b.color.unwrap_or(Color::BLACK).luminosity() * l as f64;
            len += l;
        }
        if len == 0 { 0.0 } else { sum / len as f64 }
    }

    pub fn separated_up(&self) -> bool {
        self.borders.top > 0 || self.background_separated
    }

    pub fn separated_down(&self) -> bool {
        self.borders.bottom > 0 || self.background_separated
    }

    pub fn separated_left(&self) -> bool {
        self.borders.left > 0 || self.background_separated
    }

    pub fn separated_right(&self) -> bool {
        self.borders.right > 0 || self.background_separated
    }

    /// A flat wide area without text, such as a horizontal rule.
    pub fn is_horizontal_separator(&self) -> bool {
        !self.contains_text()
            && self.bounds.height() < 10
            && self.bounds.width() > 20 * self.bounds.height()
    }

    /// A narrow tall area without text.
    pub fn is_vertical_separator(&self) -> bool {
        !self.contains_text()
            && self.bounds.width() < 10
            && self.bounds.height() > 20 * self.bounds.width()
    }

    pub fn is_separator(&self) -> bool {
        self.is_horizontal_separator() || self.is_vertical_separator()
    }

    /// Adds a tag; an existing tag keeps the higher confidence.
    pub fn add_tag(&mut self, tag: Tag, confidence: f32) {
        let conf = confidence.clamp(0.0, 1.0);
        let entry = self.tags.entry(tag).or_insert(conf);
        if *entry < conf {
            *entry = conf;
        }
    }

    pub fn has_tag(&self, tag: &Tag) -> bool {
        self.tags.contains_key(tag)
    }

    pub fn tag_confidence(&self, tag: &Tag) -> f32 {
        self.tags.get(tag).copied().unwrap_or(0.0)
    }

    pub fn remove_tag(&mut self, tag: &Tag) -> bool {
        self.tags.shift_remove(tag).is_some()
    }

    pub fn tags(&self) -> &IndexMap<Tag, f32> {
        &self.tags
    }
}

impl HasBounds for Area {
    fn bounds(&self) -> Rect {
        self.bounds
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{FontInfo, Page};

    fn text_area(bounds: Rect, text: &str, size: f64) -> Area {
        let page = Page::new(500, 500, BoxNode::text(bounds, text, FontInfo::sized(size)));
        Area::from_box(&page.root)
    }

    #[test]
    fn font_average_is_length_weighted() {
        let mut a = text_area(Rect::new(0, 0, 30, 10), "abc", 10.0);
        let b = text_area(Rect::new(40, 0, 50, 10), "d", 20.0);
        assert_eq!(a.fonts().average_size(), 10.0);
        a.join(&b, true);
        assert!((a.fonts().average_size() - 12.5).abs() < 1e-9);
        assert_eq!(a.bounds(), Rect::new(0, 0, 50, 10));
        assert_eq!(a.name(), "abc . d");
        assert_eq!(a.box_text(), "abc d");
    }

    #[test]
    fn empty_area_averages_to_zero() {
        let a = Area::new(Rect::new(0, 0, 10, 10));
        assert_eq!(a.fonts().average_size(), 0.0);
        assert_eq!(a.average_color_luminosity(), 0.0);
        assert_eq!(a.declared_font_size(), 0.0);
    }

    #[test]
    fn horizontal_join_takes_outer_border() {
        let mut a = text_area(Rect::new(0, 0, 30, 10), "a", 10.0);
        let mut b = text_area(Rect::new(40, 0, 50, 10), "b", 10.0);
        b.set_borders(Borders::new(0, 2, 0, 1));
        a.join(&b, true);
        assert_eq!(a.borders().right, 2);
        assert_eq!(a.borders().left, 0);

        let mut c = text_area(Rect::new(40, 0, 50, 10), "c", 10.0);
        let mut d = text_area(Rect::new(0, 0, 30, 10), "d", 10.0);
        d.set_borders(Borders::new(0, 3, 0, 4));
        c.join(&d, true);
        assert_eq!(c.borders().left, 4);
        assert_eq!(c.borders().right, 0);
    }

    #[test]
    fn join_keeps_own_border_when_other_has_none() {
        let mut a = text_area(Rect::new(0, 0, 30, 10), "a", 10.0);
        a.set_borders(Borders::new(1, 2, 0, 0));
        a.join(&text_area(Rect::new(40, 0, 50, 10), "b", 10.0), true);
        assert_eq!(a.borders().right, 2);

        let mut c = text_area(Rect::new(0, 20, 30, 30), "c", 10.0);
        c.set_borders(Borders::new(3, 0, 0, 0));
        c.join(&text_area(Rect::new(0, 0, 30, 10), "d", 10.0), false);
        assert_eq!(c.borders().top, 3);
    }

    #[test]
    fn separator_shapes() {
        let rule = Area::new(Rect::new(0, 0, 299, 2));
        assert!(rule.is_horizontal_separator());
        assert!(!rule.is_vertical_separator());
        let text = text_area(Rect::new(0, 0, 299, 2), "x", 3.0);
        assert!(!text.is_separator());
    }

    #[test]
    fn tags_keep_higher_confidence() {
        let mut a = Area::new(Rect::new(0, 0, 10, 10));
        let t = Tag::new("heading", "style");
        a.add_tag(t.clone(), 0.4);
        a.add_tag(t.clone(), 0.9);
        a.add_tag(t.clone(), 0.2);
        assert_eq!(a.tag_confidence(&t), 0.9);
        assert!(a.remove_tag(&t));
        assert!(!a.has_tag(&t));
    }
}
