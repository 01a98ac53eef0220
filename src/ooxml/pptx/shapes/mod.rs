//! Shape model for PowerPoint slides, layouts and masters.
//!
//! Shapes are parsed from `p:spTree` into plain data that the adapter layer
//! reads and edits and the writer serializes back to PresentationML.

pub mod base;
pub mod fill;
pub mod picture;
pub mod table;
pub mod textframe;

pub use base::{
    CHART_URI, MutableShape, PlaceholderFormat, PlaceholderType, ShapeKind, TABLE_URI, Xfrm,
    parse_shape_tree,
};
pub use fill::{ColorSpec, FillSpec, LineSpec};
pub use picture::ImageSource;
pub use table::{CellProperties, TableBody, TableCell, TableRow, even_split};
pub use textframe::{
    Alignment, AutoSize, BodyProperties, HyperlinkSpec, RunProperties, TextBody, TextParagraph,
    TextRun, VerticalAnchor,
};
