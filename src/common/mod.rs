//! Common types shared by the authoring layer and the backend.
//!
//! - [`unit`]: the [`Length`] algebra
//! - [`color`]: [`RGBColor`] and literal-color parsing
//! - [`xml`]: escaping and a small element tree for reading parts

pub mod color;
pub mod unit;
pub mod xml;

pub use color::{IntoColor, RGBColor};
pub use unit::{IntoLength, Length, Unit};
