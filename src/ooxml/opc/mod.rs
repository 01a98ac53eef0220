//! Open Packaging Conventions (OPC) implementation.
//!
//! OPC defines the ZIP-based container of every Office Open XML document:
//!
//! - Package structure (parts, relationships)
//! - Content type management
//! - ZIP-based physical packaging
//!
//! Parts are held in memory and written back deterministically.

pub mod constants;
pub mod error;
pub mod package;
pub mod packuri;
pub mod part;
pub mod phys_pkg;
pub mod pkgreader;
pub mod pkgwriter;
pub mod rel;

// Re-export commonly used types
pub use package::OpcPackage;
pub use packuri::PackURI;
pub use part::{BlobPart, Part, PartFactory, XmlPart, parse_xml};
pub use pkgwriter::PackageWriter;
pub use rel::{Relationship, Relationships};
