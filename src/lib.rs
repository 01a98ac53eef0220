//! Slidecraft - typed, compositional authoring of PowerPoint (.pptx) decks
//!
//! Slide masters and layouts are declared as Rust types. A deck is built by
//! picking a layout from the master for every slide, filling its
//! placeholders and adding text, pictures and tables at explicit positions.
//!
//! # Features
//!
//! - **Declarative templates**: `slide_layout!` and `slide_master!` describe
//!   the layouts of a deck, bound to the built-in master or to a .pptx file
//! - **Unit algebra**: lengths in points, inches, centimeters, millimeters or EMU
//! - **Table inputs**: rows, records, serde values and column frames, through
//!   an extensible normalizer chain
//! - **Introspection**: any deck as a serde tree, and template source for its layouts
//!
//! # Example - Building a deck
//!
//! ```no_run
//! use slidecraft::adapter::Range;
//! use slidecraft::builder::{PresentationBuilder, TextOptions};
//! use slidecraft::template::{DefaultMaster, TitleSlide};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let headline = Range::new((1, "in"), (1, "in"), (8, "in"), (1, "in"))?;
//! let style = TextOptions::new().with_size((28, "pt"))?.with_bold(true);
//!
//! let pres = PresentationBuilder::<DefaultMaster>::new()?
//!     .slide(|m| {
//!         m.title_slide().with(TitleSlide {
//!             title: "Quarterly review".to_string(),
//!             subtitle: Some("Q3".to_string()),
//!         })
//!     })?
//!     .slide(|m| m.blank().builder().text("Revenue grew 12%", headline, style))?
//!     .build();
//! pres.save("review.pptx")?;
//! # Ok(())
//! # }
//! ```
//!
//! # Example - Declaring a master
//!
//! ```no_run
//! use slidecraft::{slide_layout, slide_master};
//!
//! slide_layout! {
//!     pub struct Cover as "Title Slide" {
//!         placeholder title: String,
//!         placeholder subtitle: Option<String>,
//!     }
//! }
//!
//! slide_master! {
//!     pub struct Corporate from "corporate.pptx" {
//!         cover: Cover,
//!     }
//! }
//! ```

/// Wrappers over backend objects, speaking lengths and colors
pub mod adapter;

/// Presentation and slide builders
pub mod builder;

/// Template source generation for existing decks
pub mod codegen;

/// Units and colors
pub mod common;

pub mod config;
pub mod error;

/// OOXML (Office Open XML) packaging and the PresentationML backend
pub mod ooxml;

/// Slide layouts, slide masters and their declaration macros
pub mod template;

/// Read-only serialization of a deck
pub mod tree;

pub use config::DeckOptions;
pub use error::{Error, Result};
