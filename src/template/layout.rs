//! Slide layout declarations.

use std::fmt;

use crate::adapter::PlaceholderContent;
use crate::template::value::ValueKind;

/// A placeholder field declared on a layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlaceholderField {
    pub name: &'static str,
    /// The declared field type, as written
    pub type_name: &'static str,
    pub kind: ValueKind,
    pub has_default: bool,
}

impl PlaceholderField {
    pub const fn new(
        name: &'static str,
        type_name: &'static str,
        kind: ValueKind,
        has_default: bool,
    ) -> Self {
        Self {
            name,
            type_name,
            kind,
            has_default,
        }
    }
}

/// A slide layout with typed placeholder fields.
///
/// Implementations are generated by [`slide_layout!`](crate::slide_layout).
/// The placeholder order is the declaration order, with the fields of a base
/// layout first. On a new slide the i-th value fills the i-th placeholder.
pub trait SlideLayout: Default + Clone + fmt::Debug + 'static {
    /// Name of the declared type
    const NAME: &'static str;
    /// Name of the backend layout this type stands for, if declared
    const BACKEND_NAME: Option<&'static str>;

    fn placeholder_fields() -> Vec<PlaceholderField>;

    /// Placeholder values in the order of [`placeholder_fields`](Self::placeholder_fields).
    fn placeholder_values(&self) -> Vec<PlaceholderContent>;

    fn placeholder_names() -> Vec<&'static str> {
        Self::placeholder_fields().iter().map(|f| f.name).collect()
    }
}
