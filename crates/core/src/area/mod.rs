//! The area tree and its building blocks.
//!
//! - `entity` - a single area with its boxes, fonts and tags
//! - `tree` - the arena-backed tree of areas
//! - `grid` - the per-parent grid of child positions
//! - `builder` - basic area detection from a box tree
//! - `export` - snapshots and text dumps of a finished tree

pub mod builder;
pub mod entity;
pub mod export;
pub mod grid;
pub mod tree;

pub use builder::is_visually_separated;
pub use entity::{Accumulator, Area, FontStats, Tag};
pub use export::{AreaSnapshot, FontSummary, TagSnapshot, TextDump};
pub use grid::AreaGrid;
pub use tree::{AreaNode, AreaTree, NodeId};
