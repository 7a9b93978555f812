//! Segmentation parameters.
//!
//! One typed struct per operator plus `SegmParams` bundling the whole
//! pipeline. `Default` gives the standard configuration; the `new`
//! constructors validate their arguments.

use crate::area::FontStats;
use crate::error::{Result, SegmError};

/// Maximal differences of the average font properties of two areas
/// considered to share the same style.
///
/// A difference is doubled before the comparison, as it is measured
/// between averages which dilute the extremes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StyleThresholds {
    /// Font size difference in pixels.
    pub font_size: f64,
    /// Font weight difference (0 = regular, 1 = bold).
    pub font_weight: f64,
    /// Font style difference (0 = upright, 1 = italic).
    pub font_style: f64,
}

impl Default for StyleThresholds {
    fn default() -> Self {
        Self {
            font_size: 0.5,
            font_weight: 0.8,
            font_style: 0.8,
        }
    }
}

impl StyleThresholds {
    pub fn new(font_size: f64, font_weight: f64, font_style: f64) -> Result<Self> {
        for (name, v) in [
            ("font_size", font_size),
            ("font_weight", font_weight),
            ("font_style", font_style),
        ] {
            if v.is_nan() || v < 0.0 {
                return Err(SegmError::InvalidParam {
                    name,
                    reason: format!("must be a non-negative number, got {v}"),
                });
            }
        }
        Ok(Self {
            font_size,
            font_weight,
            font_style,
        })
    }

    /// True if twice each difference of the averages stays below its threshold.
    pub fn accepts(&self, reference: &FontStats, other: &FontStats) -> bool {
        let size = (reference.average_size() - other.average_size()).abs() * 2.0;
        let weight = (reference.average_weight() - other.average_weight()).abs() * 2.0;
        let style = (reference.average_style() - other.average_style()).abs() * 2.0;
        size < self.font_size && weight < self.font_weight && style < self.font_style
    }
}

/// Parameters of the line joining operator.
#[derive(Debug, Clone, PartialEq)]
pub struct FindLineParams {
    /// Join only the areas of the same style; differently styled neighbours
    /// are just linked as lying on the same line.
    pub use_consistent_style: bool,
    /// Maximal gap between two joined areas, in ems of the left area.
    pub max_line_em_space: f32,
    /// Style comparison used with `use_consistent_style`.
    pub style: StyleThresholds,
}

impl Default for FindLineParams {
    fn default() -> Self {
        Self {
            use_consistent_style: false,
            max_line_em_space: 1.5,
            style: StyleThresholds::default(),
        }
    }
}

impl FindLineParams {
    pub fn new(use_consistent_style: bool, max_line_em_space: f32) -> Result<Self> {
        if !max_line_em_space.is_finite() || max_line_em_space <= 0.0 {
            return Err(SegmError::InvalidParam {
                name: "max_line_em_space",
                reason: format!("must be a positive number, got {max_line_em_space}"),
            });
        }
        Ok(Self {
            use_consistent_style,
            max_line_em_space,
            ..Self::default()
        })
    }

    pub fn with_style(mut self, style: StyleThresholds) -> Self {
        self.style = style;
        self
    }
}

/// Parameters of the super area operator.
#[derive(Debug, Clone, PartialEq)]
pub struct SuperAreaParams {
    /// Maximal number of grouping passes (and nesting of the recursive
    /// regrouping) at every node.
    pub depth_limit: u32,
}

impl Default for SuperAreaParams {
    fn default() -> Self {
        Self { depth_limit: 2 }
    }
}

impl SuperAreaParams {
    pub fn new(depth_limit: u32) -> Self {
        Self { depth_limit }
    }
}

/// Parameters of the reading order sort operators.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SortParams {
    /// Sort by columns (x first) instead of rows.
    pub column_first: bool,
}

/// Final ordering applied by the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortMode {
    /// Keep the order produced by the previous stages.
    None,
    /// Plain position sort.
    Position,
    /// Line-aware sort.
    #[default]
    Lines,
}

/// Configuration of the whole segmentation pipeline.
#[derive(Debug, Clone, PartialEq)]
pub struct SegmParams {
    /// Run the line joining stage.
    pub find_lines: bool,
    pub lines: FindLineParams,
    pub super_areas: SuperAreaParams,
    /// Group the children of every node by style after the super areas.
    pub homogeneous_leaves: bool,
    pub style: StyleThresholds,
    /// Reduce the result to the root and its leaves.
    pub flatten: bool,
    pub sort: SortMode,
    pub sort_params: SortParams,
}

impl Default for SegmParams {
    fn default() -> Self {
        Self {
            find_lines: true,
            lines: FindLineParams::default(),
            super_areas: SuperAreaParams::default(),
            homogeneous_leaves: false,
            style: StyleThresholds::default(),
            flatten: false,
            sort: SortMode::default(),
            sort_params: SortParams::default(),
        }
    }
}
