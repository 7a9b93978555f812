//! Input model: the rendered box tree.
//!
//! - `boxes` - boxes, fonts, borders and the page that owns them
//! - `color` - RGB colors parsed from `#rrggbb`

pub mod boxes;
pub mod color;

pub use boxes::{BoxId, BoxKind, BoxNode, Borders, DisplayKind, FontInfo, Page, SourceBox};
pub use color::Color;
