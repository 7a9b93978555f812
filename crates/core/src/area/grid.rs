//! Per-parent coordinate grid of child areas.
//!
//! The distinct left edges and right-edge-plus-one values of the children
//! (and of the parent itself) become the column boundaries; the same on
//! the y axis gives the rows. Each child then occupies a rectangle of
//! whole cells, its grid position.

use crate::utils::Rect;

use super::tree::NodeId;

/// Row/column index of the children of one area node.
#[derive(Debug, Clone, PartialEq)]
pub struct AreaGrid {
    /// Absolute x of every column boundary, ascending. Column `i` spans
    /// `cols[i] ..= cols[i + 1] - 1`.
    cols: Vec<i32>,
    rows: Vec<i32>,
    /// Row-major cell occupancy.
    cells: Vec<Option<NodeId>>,
}

impl AreaGrid {
    /// Builds the grid of a parent covering `bounds` with the given children.
    ///
    /// Returns the grid and the grid position of each child, in the order of
    /// `children`. Overlapping children are not disambiguated: the last one
    /// marked owns the shared cells.
    pub fn build(bounds: Rect, children: &[(NodeId, Rect)]) -> (AreaGrid, Vec<Rect>) {
        let mut cols = Vec::with_capacity(children.len() * 2 + 2);
        let mut rows = Vec::with_capacity(children.len() * 2 + 2);
        cols.push(bounds.x1);
        cols.push(bounds.x2 + 1);
        rows.push(bounds.y1);
        rows.push(bounds.y2 + 1);
        for (_, r) in children {
            cols.push(r.x1);
            cols.push(r.x2 + 1);
            rows.push(r.y1);
            rows.push(r.y2 + 1);
        }
        cols.sort_unstable();
        cols.dedup();
        rows.sort_unstable();
        rows.dedup();

        let width = cols.len().saturating_sub(1);
        let height = rows.len().saturating_sub(1);
        let mut grid = AreaGrid {
            cols,
            rows,
            cells: vec![None; width * height],
        };

        let mut positions = Vec::with_capacity(children.len());
        for (id, r) in children {
            let pos = grid.span_of(r);
            for row in pos.y1..=pos.y2 {
                for col in pos.x1..=pos.x2 {
                    let idx = row as usize * width + col as usize;
                    grid.cells[idx] = Some(*id);
                }
            }
            positions.push(pos);
        }
        (grid, positions)
    }

    /// Grid cells spanned by a rectangle whose edges are grid boundaries.
    fn span_of(&self, r: &Rect) -> Rect {
        let x1 = self.cols.partition_point(|b| *b < r.x1);
        let x2 = self.cols.partition_point(|b| *b < r.x2 + 1);
        let y1 = self.rows.partition_point(|b| *b < r.y1);
        let y2 = self.rows.partition_point(|b| *b < r.y2 + 1);
        // A child always spans at least one cell.
        Rect::new(
            x1 as i32,
            y1 as i32,
            (x2 as i32 - 1).max(x1 as i32),
            (y2 as i32 - 1).max(y1 as i32),
        )
    }

    /// Number of columns.
    pub fn width(&self) -> usize {
        self.cols.len().saturating_sub(1)
    }

    /// Number of rows.
    pub fn height(&self) -> usize {
        self.rows.len().saturating_sub(1)
    }

    /// Column containing the absolute coordinate `x`.
    pub fn find_cell_x(&self, x: i32) -> Option<usize> {
        find_cell(&self.cols, x)
    }

    /// Row containing the absolute coordinate `y`.
    pub fn find_cell_y(&self, y: i32) -> Option<usize> {
        find_cell(&self.rows, y)
    }

    /// Child occupying the cell, `None` for empty or out-of-grid cells.
    pub fn area_at(&self, col: usize, row: usize) -> Option<NodeId> {
        if col >= self.width() || row >= self.height() {
            return None;
        }
        self.cells[row * self.width() + col]
    }

    /// Absolute x of the left edge of column `index` (`index == width()`
    /// gives the right edge of the grid plus one).
    pub fn col_ofs(&self, index: usize) -> i32 {
        self.cols[index]
    }

    /// Absolute y of the top edge of row `index`.
    pub fn row_ofs(&self, index: usize) -> i32 {
        self.rows[index]
    }

    pub fn col_width(&self, index: usize) -> i32 {
        self.cols[index + 1] - self.cols[index]
    }

    pub fn row_height(&self, index: usize) -> i32 {
        self.rows[index + 1] - self.rows[index]
    }

    /// Absolute pixel rectangle covered by a range of cells.
    pub fn cell_bounds(&self, pos: &Rect) -> Rect {
        Rect::new(
            self.cols[pos.x1 as usize],
            self.rows[pos.y1 as usize],
            self.cols[pos.x2 as usize + 1] - 1,
            self.rows[pos.y2 as usize + 1] - 1,
        )
    }

    /// Leftmost occupied column of every non-empty row.
    fn row_indents(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.height())
            .filter_map(move |row| (0..self.width()).find(|&col| self.area_at(col, row).is_some()))
    }

    /// Smallest left indentation (in columns) among the occupied rows.
    pub fn min_indent(&self) -> usize {
        self.row_indents().min().unwrap_or(0)
    }

    /// Largest left indentation (in columns) among the occupied rows.
    pub fn max_indent(&self) -> usize {
        self.row_indents().max().unwrap_or(0)
    }
}

fn find_cell(bounds: &[i32], v: i32) -> Option<usize> {
    let first = *bounds.first()?;
    let last = *bounds.last()?;
    if v < first || v >= last {
        return None;
    }
    Some(bounds.partition_point(|b| *b <= v) - 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> (AreaGrid, Vec<Rect>) {
        let children = [
            (NodeId(1), Rect::new(0, 0, 100, 20)),
            (NodeId(2), Rect::new(110, 0, 200, 20)),
            (NodeId(3), Rect::new(20, 30, 200, 40)),
        ];
        AreaGrid::build(Rect::new(0, 0, 200, 40), &children)
    }

    #[test]
    fn boundaries_and_positions() {
        let (grid, pos) = sample();
        // cols: 0, 20, 101, 110, 201; rows: 0, 21, 30, 41
        assert_eq!(grid.width(), 4);
        assert_eq!(grid.height(), 3);
        assert_eq!(pos[0], Rect::new(0, 0, 1, 0));
        assert_eq!(pos[1], Rect::new(3, 0, 3, 0));
        assert_eq!(pos[2], Rect::new(1, 2, 3, 2));
        assert_eq!(grid.col_ofs(3), 110);
        assert_eq!(grid.row_ofs(2), 30);
        assert_eq!(grid.col_width(2), 9);
    }

    #[test]
    fn cell_lookup() {
        let (grid, _) = sample();
        assert_eq!(grid.find_cell_x(0), Some(0));
        assert_eq!(grid.find_cell_x(105), Some(2));
        assert_eq!(grid.find_cell_x(200), Some(3));
        assert_eq!(grid.find_cell_x(201), None);
        assert_eq!(grid.find_cell_y(-1), None);
        assert_eq!(grid.area_at(2, 0), None);
        assert_eq!(grid.area_at(3, 0), Some(NodeId(2)));
        assert_eq!(grid.area_at(9, 9), None);
    }

    #[test]
    fn positions_map_back_to_bounds() {
        let (grid, pos) = sample();
        assert_eq!(grid.cell_bounds(&pos[0]), Rect::new(0, 0, 100, 20));
        assert_eq!(grid.cell_bounds(&pos[2]), Rect::new(20, 30, 200, 40));
    }

    #[test]
    fn indents() {
        let (grid, _) = sample();
        assert_eq!(grid.min_indent(), 0);
        assert_eq!(grid.max_indent(), 1);
    }
}
