//! Segmentation: separators, grouping strategies, operators and the
//! pipeline running them in order.

pub mod group;
pub mod ops;
pub mod params;
pub mod pipeline;
pub mod separators;

pub use group::GroupAnalyzer;
pub use ops::AreaTreeOperator;
pub use params::*;
pub use pipeline::Segmenter;
pub use separators::{Separator, SeparatorKind, SeparatorSet};
