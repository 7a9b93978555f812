//! vizseg - visual segmentation of rendered web pages.
//!
//! A rendered box tree (`model::Page`) is turned into a tree of visually
//! coherent areas (`area::AreaTree`): basic areas are detected from the
//! visual separation of the boxes, then operators join text lines, group
//! siblings into super areas and restore the reading order.
//!
//! ```no_run
//! use vizseg_core::{Page, SegmParams, Segmenter, TextDump};
//!
//! let page = Page::from_path("page.json")?;
//! let tree = Segmenter::new(SegmParams::default()).segment(&page)?;
//! print!("{}", TextDump::new(&tree));
//! # Ok::<(), vizseg_core::SegmError>(())
//! ```

pub mod area;
pub mod error;
pub mod model;
pub mod segm;
pub mod utils;

pub use area::{Area, AreaSnapshot, AreaTree, NodeId, TextDump};
pub use error::{Result, SegmError};
pub use model::{BoxNode, Color, Page};
pub use segm::{SegmParams, Segmenter};
pub use utils::Rect;
