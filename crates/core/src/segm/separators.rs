//! Whitespace and border separators inside an area.
//!
//! Detection starts with one horizontal and one vertical band covering the
//! whole area. Every child cuts away the part of each band it covers on
//! the band's axis. When more than one child was considered, the area is
//! cut along the surviving bands into sub-areas and the detection recurses
//! into each of them, which finds the separators nested inside columns or
//! rows.
//!
//! Box separators are not derived from empty space: they are the bordered
//! edges of the children, and the children shaped like rules.

use tracing::trace;

use crate::area::{AreaTree, NodeId};
use crate::utils::{HasBounds, Rect};

/// Kind of a separator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SeparatorKind {
    /// A horizontal band of empty space.
    Horizontal,
    /// A vertical band of empty space.
    Vertical,
    /// A horizontal border or rule.
    BoxHorizontal,
    /// A vertical border or rule.
    BoxVertical,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Separator {
    pub kind: SeparatorKind,
    pub bounds: Rect,
}

impl Separator {
    pub fn new(kind: SeparatorKind, bounds: Rect) -> Self {
        Self { kind, bounds }
    }

    /// True for separators dividing the content above from the content below.
    pub fn is_horizontal(&self) -> bool {
        matches!(
            self.kind,
            SeparatorKind::Horizontal | SeparatorKind::BoxHorizontal
        )
    }

    /// True if the separator lies between `a` and `b`.
    pub fn separates(&self, a: &Rect, b: &Rect) -> bool {
        let s = &self.bounds;
        if self.is_horizontal() {
            s.is_hoverlap(a)
                && s.is_hoverlap(b)
                && ((a.y2 <= s.y1 && s.y2 <= b.y1) || (b.y2 <= s.y1 && s.y2 <= a.y1))
        } else {
            s.is_voverlap(a)
                && s.is_voverlap(b)
                && ((a.x2 <= s.x1 && s.x2 <= b.x1) || (b.x2 <= s.x1 && s.x2 <= a.x1))
        }
    }
}

impl HasBounds for Separator {
    fn bounds(&self) -> Rect {
        self.bounds
    }
}

/// Separators found in one area.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SeparatorSet {
    horizontal: Vec<Separator>,
    vertical: Vec<Separator>,
    boxsep: Vec<Separator>,
}

/// The part of `[s1, s2]` not covered by `[c1, c2]`.
fn subtract(s1: i32, s2: i32, c1: i32, c2: i32) -> [Option<(i32, i32)>; 2] {
    if c1 <= s1 && c2 >= s2 {
        [None, None]
    } else if c1 > s1 && c2 < s2 {
        [Some((s1, c1 - 1)), Some((c2 + 1, s2))]
    } else if c1 > s1 && c1 <= s2 {
        [Some((s1, c1 - 1)), None]
    } else if c2 >= s1 && c2 < s2 {
        [Some((c2 + 1, s2)), None]
    } else {
        [Some((s1, s2)), None]
    }
}

/// Cuts every rectangle by the span `[c1, c2]` on one axis.
fn cut_all(rects: &mut Vec<Rect>, c1: i32, c2: i32, horizontal: bool) {
    let mut out = Vec::with_capacity(rects.len() + 1);
    for r in rects.drain(..) {
        let (s1, s2) = if horizontal { (r.y1, r.y2) } else { (r.x1, r.x2) };
        for (p1, p2) in subtract(s1, s2, c1, c2).into_iter().flatten() {
            out.push(if horizontal {
                Rect::new(r.x1, p1, r.x2, p2)
            } else {
                Rect::new(p1, r.y1, p2, r.y2)
            });
        }
    }
    *rects = out;
}

/// Splits the rectangles crossed by a border. The border stays with the
/// part after it and only cuts rectangles it spans completely.
fn cut_by_border(rects: &mut Vec<Rect>, sep: &Separator) {
    let s = sep.bounds;
    let horizontal = sep.is_horizontal();
    let mut out = Vec::with_capacity(rects.len() + 1);
    for r in rects.drain(..) {
        let spans = if horizontal {
            s.x1 <= r.x1 && s.x2 >= r.x2
        } else {
            s.y1 <= r.y1 && s.y2 >= r.y2
        };
        let (a1, a2, s1, s2) = if horizontal {
            (r.y1, r.y2, s.y1, s.y2)
        } else {
            (r.x1, r.x2, s.x1, s.x2)
        };
        if !spans {
            out.push(r);
        } else if s1 <= a1 && s2 >= a2 {
            // covered entirely
        } else if s1 > a1 && s1 < a2 {
            if horizontal {
                out.push(Rect::new(r.x1, a1, r.x2, s1 - 1));
                out.push(Rect::new(r.x1, s1, r.x2, a2));
            } else {
                out.push(Rect::new(a1, r.y1, s1 - 1, r.y2));
                out.push(Rect::new(s1, r.y1, a2, r.y2));
            }
        } else {
            out.push(r);
        }
    }
    *rects = out;
}

struct Detector<'a> {
    /// Children taking part in the whitespace analysis.
    children: &'a [Rect],
    boxsep: &'a [Separator],
}

impl Detector<'_> {
    fn find(&self, base: Rect, depth: usize) -> (Vec<Separator>, Vec<Separator>) {
        let mut hsep = vec![Rect::new(base.x1, base.y1, base.x2, base.y2)];
        let mut vsep = hsep.clone();
        let mut considered = 0;
        for c in self.children.iter().filter(|c| c.intersects(&base)) {
            cut_all(&mut hsep, c.y1, c.y2, true);
            cut_all(&mut vsep, c.x1, c.x2, false);
            considered += 1;
        }

        let mut hret: Vec<Separator> = Vec::new();
        let mut vret: Vec<Separator> = Vec::new();
        if considered > 1 {
            let areas = self.create_areas(base, &hsep, &vsep);
            hret.extend(
                hsep.iter()
                    .filter(|r| !r.is_empty())
                    .map(|r| Separator::new(SeparatorKind::Horizontal, *r)),
            );
            vret.extend(
                vsep.iter()
                    .filter(|r| !r.is_empty())
                    .map(|r| Separator::new(SeparatorKind::Vertical, *r)),
            );
            if areas.len() > 1 {
                for a in areas {
                    let (h, v) = self.find(a, depth + 1);
                    hret.extend(h);
                    vret.extend(v);
                }
            }
        }
        trace!(
            "separators in {} at depth {}: {} horizontal, {} vertical",
            base,
            depth,
            hret.len(),
            vret.len()
        );
        (hret, vret)
    }

    /// Cuts the base rectangle along all the separators.
    fn create_areas(&self, base: Rect, hsep: &[Rect], vsep: &[Rect]) -> Vec<Rect> {
        let mut areas = vec![base];
        for s in hsep {
            cut_all(&mut areas, s.y1, s.y2, true);
        }
        for s in vsep {
            cut_all(&mut areas, s.x1, s.x2, false);
        }
        for s in self.boxsep.iter().filter(|s| s.bounds.intersects(&base)) {
            cut_by_border(&mut areas, s);
        }
        areas.retain(|a| !a.is_empty());
        areas
    }
}

impl SeparatorSet {
    /// Computes the separators of a node from its children.
    pub fn detect(tree: &AreaTree, id: NodeId) -> SeparatorSet {
        let base = tree.bounds(id);
        let mut children = Vec::new();
        let mut boxsep = Vec::new();
        for child in tree.children(id) {
            let area = tree.area(*child);
            let r = area.bounds();
            if area.is_horizontal_separator() {
                boxsep.push(Separator::new(SeparatorKind::BoxHorizontal, r));
                continue;
            }
            if area.is_vertical_separator() {
                boxsep.push(Separator::new(SeparatorKind::BoxVertical, r));
                continue;
            }
            children.push(r);
            let b = area.borders();
            if b.top > 0 {
                boxsep.push(Separator::new(
                    SeparatorKind::BoxHorizontal,
                    Rect::new(r.x1, r.y1, r.x2, r.y1),
                ));
            }
            if b.bottom > 0 {
                boxsep.push(Separator::new(
                    SeparatorKind::BoxHorizontal,
                    Rect::new(r.x1, r.y2, r.x2, r.y2),
                ));
            }
            if b.left > 0 {
                boxsep.push(Separator::new(
                    SeparatorKind::BoxVertical,
                    Rect::new(r.x1, r.y1, r.x1, r.y2),
                ));
            }
            if b.right > 0 {
                boxsep.push(Separator::new(
                    SeparatorKind::BoxVertical,
                    Rect::new(r.x2, r.y1, r.x2, r.y2),
                ));
            }
        }

        let detector = Detector {
            children: &children,
            boxsep: &boxsep,
        };
        let (horizontal, vertical) = detector.find(base, 0);
        SeparatorSet {
            horizontal,
            vertical,
            boxsep,
        }
    }

    pub fn horizontal(&self) -> &[Separator] {
        &self.horizontal
    }

    pub fn vertical(&self) -> &[Separator] {
        &self.vertical
    }

    /// Separators induced by borders and rules.
    pub fn boxsep(&self) -> &[Separator] {
        &self.boxsep
    }

    /// All separators: horizontal, then vertical, then the box ones.
    pub fn iter(&self) -> impl Iterator<Item = &Separator> {
        self.horizontal
            .iter()
            .chain(self.vertical.iter())
            .chain(self.boxsep.iter())
    }

    pub fn len(&self) -> usize {
        self.horizontal.len() + self.vertical.len() + self.boxsep.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// True if any separator lies between the two rectangles.
    pub fn separates(&self, a: &Rect, b: &Rect) -> bool {
        self.iter().any(|s| s.separates(a, b))
    }

    /// Drops the separators with at most one area on each side.
    pub(crate) fn remove_simple(&mut self, tree: &AreaTree, id: NodeId) {
        let before = self.len();
        let simple = |s: &Separator| {
            let (a, b) = count_sides(tree, id, s);
            a <= 1 && b <= 1
        };
        self.horizontal.retain(|s| !simple(s));
        self.vertical.retain(|s| !simple(s));
        self.boxsep.retain(|s| !simple(s));
        trace!("removed {} simple separators of {}", before - self.len(), id);
    }
}

/// Number of distinct areas directly above and below (or left and right
/// of) a separator, read from the node's grid.
fn count_sides(tree: &AreaTree, id: NodeId, sep: &Separator) -> (usize, usize) {
    let grid = tree.grid(id);
    let s = sep.bounds;
    if sep.is_horizontal() {
        let (Some(gx1), Some(gx2)) = (grid.find_cell_x(s.x1), grid.find_cell_x(s.x2)) else {
            return (0, 0);
        };
        let count = |row: Option<usize>| {
            let Some(row) = row else { return 0 };
            let mut ret = 0;
            let mut col = gx1;
            while col <= gx2 {
                match grid.area_at(col, row) {
                    Some(node) => {
                        ret += 1;
                        col = (tree.grid_position(node).x2 as usize + 1).max(col + 1);
                    }
                    None => col += 1,
                }
            }
            ret
        };
        (
            count(grid.find_cell_y(s.y1 - 1)),
            count(grid.find_cell_y(s.y2 + 1)),
        )
    } else {
        let (Some(gy1), Some(gy2)) = (grid.find_cell_y(s.y1), grid.find_cell_y(s.y2)) else {
            return (0, 0);
        };
        let count = |col: Option<usize>| {
            let Some(col) = col else { return 0 };
            let mut ret = 0;
            let mut row = gy1;
            while row <= gy2 {
                match grid.area_at(col, row) {
                    Some(node) => {
                        ret += 1;
                        row = (tree.grid_position(node).y2 as usize + 1).max(row + 1);
                    }
                    None => row += 1,
                }
            }
            ret
        };
        (
            count(grid.find_cell_x(s.x1 - 1)),
            count(grid.find_cell_x(s.x2 + 1)),
        )
    }
}
