//! Office Open XML (OOXML) format implementation.
//!
//! Only PresentationML is implemented. The module is organized in two layers:
//!
//! 1. **OPC Layer** (`opc`): Low-level package handling (ZIP, parts, relationships)
//! 2. **PresentationML** (`pptx`): masters, layouts, slides and shapes
//!
//! # Example
//!
//! ```rust,no_run
//! use slidecraft::ooxml::pptx::MutablePresentation;
//!
//! let pres = MutablePresentation::open("deck.pptx")?;
//! for slide in pres.slides() {
//!     println!("{}: {} shapes", slide.layout_name(), slide.shape_count());
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
pub mod error;
pub mod opc;
pub mod pptx;

// Re-export commonly used types from OPC layer
pub use opc::{OpcPackage, PackURI};

// Re-export error types
pub use error::{OoxmlError, Result};
