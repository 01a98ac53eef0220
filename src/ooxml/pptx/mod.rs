//! PowerPoint (.pptx) presentation support.
//!
//! The layers mirror the package structure:
//!
//! - `Package`: the .pptx package, checked to hold a presentation
//! - `parts`: readers for the presentation, master, layout, slide and notes parts
//! - `shapes`: the shape model shared by reading and writing
//! - `writer`: `MutablePresentation` and `MutableSlide`, which edit a deck and
//!   write it back
//! - `template`: the parts of the built-in default deck
//!
//! # Example
//!
//! ```rust,no_run
//! use slidecraft::ooxml::pptx::{LayoutId, MutablePresentation};
//!
//! let mut pres = MutablePresentation::new()?;
//! let slide = pres.add_slide(LayoutId { master: 0, layout: 6 })?;
//! let textbox = slide.add_textbox(914_400, 914_400, 3_657_600, 914_400);
//! if let Some(body) = textbox.text_body_mut() {
//!     body.set_text("Hello");
//! }
//! pres.save("hello.pptx")?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod format;
pub mod package;
pub mod parts;
pub mod shapes;
pub mod template;
pub mod writer;

pub use format::{ImageFormat, ImageInfo};
pub use package::Package;
pub use parts::{SlideLayoutInfo, SlideMasterInfo};
pub use shapes::{MutableShape, PlaceholderType, ShapeKind, Xfrm};
pub use writer::{LayoutId, MutablePresentation, MutableSlide, SlideDefaults};
