//! Fluent deck construction.
//!
//! A [`PresentationBuilder`] is parameterized by a slide master. Each call to
//! [`slide`](PresentationBuilder::slide) receives the master bound to the deck
//! and returns a layout proxy or a [`SlideBuilder`]; the slide is created,
//! its placeholders filled and the recorded shapes added right away.
//!
//! ```
//! use slidecraft::adapter::Range;
//! use slidecraft::builder::{ColumnFrame, PresentationBuilder, TableOptions};
//! use slidecraft::template::DefaultMaster;
//!
//! let frame = ColumnFrame::new()
//!     .with_column("Product", ["Pen", "Ink"])
//!     .with_column("Stock", [12, 3]);
//! let pres = PresentationBuilder::<DefaultMaster>::new()?
//!     .slide(|m| {
//!         m.title_only().builder().table(
//!             frame,
//!             Range::new((1, "in"), (2, "in"), (8, "in"), (3, "in")).unwrap(),
//!             TableOptions::new().with_first_row_header(true),
//!         )
//!     })?
//!     .build();
//! let bytes = pres.to_bytes()?;
//! assert!(!bytes.is_empty());
//! # Ok::<(), slidecraft::Error>(())
//! ```

mod options;
mod presentation;
mod slide;
mod table_input;

pub use crate::adapter::Presentation;
pub use options::{
    CellStyle, PictureData, TableOptions, TextContent, TextData, TextMutator, TextOptions,
};
pub use presentation::PresentationBuilder;
pub use slide::{SlideBuilder, TableContent, TableData, TableMutator};
pub use table_input::{
    ColumnFrame, DataFrame, Rows, TableInput, TableNormalizer, TableNormalizers, TableRecord,
};
