//! XML helpers shared by the package readers and writers.
mod escape;
mod node;

pub use escape::{escape_xml, resolve_reference, unescape_xml};
pub use node::{XmlChild, XmlNode};
