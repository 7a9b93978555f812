//! The segmentation pipeline.
//!
//! Builds the basic area tree of a page and runs the configured operators
//! over it, one after another.

use rayon::prelude::*;
use tracing::debug;

use crate::area::AreaTree;
use crate::error::Result;
use crate::model::Page;

use super::group::GroupAnalyzer;
use super::ops::{
    AreaTreeOperator, FindLineOperator, FlattenTreeOperator, HomogeneousLeafOperator,
    SortByLinesOperator, SortByPositionOperator, SuperAreaOperator,
};
use super::params::{SegmParams, SortMode};

/// Segments pages with a fixed configuration.
#[derive(Debug, Clone, Default)]
pub struct Segmenter {
    params: SegmParams,
}

impl Segmenter {
    pub fn new(params: SegmParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &SegmParams {
        &self.params
    }

    /// Operators run after the basic tree is built, in order.
    pub fn operators(&self) -> Vec<Box<dyn AreaTreeOperator + Send + Sync>> {
        let p = &self.params;
        let mut ops: Vec<Box<dyn AreaTreeOperator + Send + Sync>> = Vec::new();
        if p.find_lines {
            ops.push(Box::new(FindLineOperator::new(p.lines.clone())));
        }
        ops.push(Box::new(SuperAreaOperator::new(
            p.super_areas.clone(),
            GroupAnalyzer::NextSibling,
        )));
        if p.homogeneous_leaves {
            ops.push(Box::new(HomogeneousLeafOperator::new(p.style.clone())));
        }
        if p.flatten {
            ops.push(Box::new(FlattenTreeOperator::new()));
        }
        match p.sort {
            SortMode::None => {}
            SortMode::Position => {
                ops.push(Box::new(SortByPositionOperator::new(p.sort_params.clone())));
            }
            SortMode::Lines => ops.push(Box::new(SortByLinesOperator::new())),
        }
        ops
    }

    /// Builds the area tree of a page and runs all operators on it.
    pub fn segment(&self, page: &Page) -> Result<AreaTree> {
        let mut tree = AreaTree::from_page(page);
        self.run(&mut tree)?;
        Ok(tree)
    }

    /// Runs all operators on an already built tree.
    pub fn run(&self, tree: &mut AreaTree) -> Result<()> {
        for op in self.operators() {
            op.apply(tree)?;
            debug!("{} done, {} areas", op.name(), tree.len());
        }
        Ok(())
    }

    /// Segments independent pages in parallel. Results keep the page order.
    pub fn segment_all(&self, pages: &[Page]) -> Vec<Result<AreaTree>> {
        pages.par_iter().map(|page| self.segment(page)).collect()
    }
}
