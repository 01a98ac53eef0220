//! Crate-wide error type.
//!
//! Every fallible operation of the authoring layer reports one of these
//! kinds. Backend failures (package, XML, zip) are carried through the
//! [`Error::Ooxml`] variant unchanged.
use thiserror::Error;

/// Main error type for slidecraft operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Hex color string missing `#` or of the wrong length
    #[error("Invalid color format: {0:?} (expected \"#RGB\" or \"#RRGGBB\")")]
    InvalidColorFormat(String),

    /// RGB/RGBA tuple with an arity outside {3, 4}
    #[error("Invalid color tuple size: {0} (expected 3 or 4 components)")]
    InvalidColorTupleSize(usize),

    /// Color component outside [0, 255]
    #[error("Invalid color value: {0} (expected a value in 0..=255)")]
    InvalidColorValue(i64),

    /// A layout index beyond the layouts of the backend master
    #[error("Slide layout index {index} out of range; available layouts: {available:?}")]
    SlideLayoutIndexOutOfRange { index: usize, available: Vec<String> },

    /// A declared layout whose backend name differs from the layout at its position
    #[error("Slide layout {layout} expects backend layout {expected:?}, found {found:?}")]
    SlideLayoutNameMismatch {
        layout: String,
        expected: String,
        found: String,
    },

    /// Attribute access on a master that was never declared
    #[error("Slide master {master} has no attribute {attribute:?}")]
    SlideMasterAttributeNotFound { master: String, attribute: String },

    /// Attribute declared on a master but not as a layout
    #[error("Attribute {attribute:?} of slide master {master} must be a slide layout")]
    SlideMasterAttributeMustBeLayout { master: String, attribute: String },

    /// Attribute access on a master without declared fields
    #[error("Slide master {0} has no attributes")]
    SlideMasterHasNoAttributes(String),

    /// A setter received a value of the wrong kind
    #[error("Invalid setter type: expected {expected}, got {actual}")]
    InvalidSetterType { expected: String, actual: String },

    /// A unit tag outside {"pt", "in", "cm", "mm", "emu"}
    #[error("Unsupported unit: {0:?}")]
    UnsupportedUnit(String),

    /// Table input that cannot be normalized into rows of cells
    #[error("Invalid table data: {0}")]
    InvalidTableData(String),

    /// Image bytes in a format that cannot be embedded
    #[error("Unsupported image: {0}")]
    UnsupportedImage(String),

    /// A shape id that does not exist on the slide
    #[error("Shape {0} not found on slide")]
    ShapeNotFound(u32),

    /// The file a slide master is sourced from does not exist
    #[error("Slide master source not found: {0}")]
    MasterSourceNotFound(String),

    /// Backend package or XML error
    #[error(transparent)]
    Ooxml(#[from] crate::ooxml::error::OoxmlError),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Failed to format generated source
    #[error("Formatting error: {0}")]
    Fmt(#[from] std::fmt::Error),
}

impl Error {
    /// Build an [`Error::InvalidSetterType`] from two type descriptors.
    pub fn invalid_setter(expected: impl Into<String>, actual: impl Into<String>) -> Self {
        Error::InvalidSetterType {
            expected: expected.into(),
            actual: actual.into(),
        }
    }
}

impl From<std::convert::Infallible> for Error {
    fn from(never: std::convert::Infallible) -> Self {
        match never {}
    }
}

/// Result type for slidecraft operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_index_message_lists_names() {
        let err = Error::SlideLayoutIndexOutOfRange {
            index: 12,
            available: vec!["Title Slide".to_string(), "Blank".to_string()],
        };
        let msg = err.to_string();
        assert!(msg.contains("12"));
        assert!(msg.contains("Title Slide"));
        assert!(msg.contains("Blank"));
    }

    #[test]
    fn test_setter_type_message() {
        let err = Error::invalid_setter("text", "picture");
        assert_eq!(
            err.to_string(),
            "Invalid setter type: expected text, got picture"
        );
    }

    #[test]
    fn test_io_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing.pptx");
        let err: Error = io.into();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_fmt_conversion() {
        let err: Error = std::fmt::Error.into();
        assert!(matches!(err, Error::Fmt(_)));
        assert_eq!(err.to_string(), "Formatting error: an error occurred when formatting an argument");
    }
}
