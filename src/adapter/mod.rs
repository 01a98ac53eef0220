//! Typed wrappers over the presentation backend.
//!
//! Each wrapper borrows a backend object, reads it through the unit algebra
//! and color model, and offers chainable `set_*` methods that return the
//! wrapper. Setters that take a length or color accept the literal forms too,
//! so `(1, "in")` and `"#1a2"` work wherever a [`Length`](crate::common::Length)
//! or [`RGBColor`](crate::common::RGBColor) is expected.
//!
//! # Example
//!
//! ```rust
//! use slidecraft::adapter::{Range, Slide};
//! use slidecraft::ooxml::pptx::{LayoutId, MutablePresentation};
//!
//! let mut pres = MutablePresentation::new()?;
//! let mut slide = Slide::from_backend(pres.add_slide(LayoutId { master: 0, layout: 6 })?);
//! let range = Range::new((1, "in"), (1, "in"), (5, "in"), (2, "in"))?;
//! let mut text = slide.add_textbox(&range)?;
//! text.set_text("Hello");
//! text.text_frame().fonts().for_each(|mut font| {
//!     font.set_bold(true);
//! });
//! assert_eq!(slide.shape_count(), 1);
//! # Ok::<(), slidecraft::Error>(())
//! ```

mod format;
mod layout;
mod placeholder;
mod presentation;
mod shape;
mod slide;
mod table;
mod text;

pub use format::{ColorFormat, FillFormat, LineFormat};
pub use layout::{LayoutRef, MasterRef, PlaceholderInfo};
pub use placeholder::{Placeholder, PlaceholderContent};
pub use presentation::Presentation;
pub use shape::{ImageInput, Range, Shape};
pub use slide::{Background, NotesSlide, Slide};
pub use table::{Cell, Table};
pub use text::{Font, Hyperlink, Paragraph, Run, Text, TextFrame};
