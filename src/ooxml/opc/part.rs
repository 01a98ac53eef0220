//! Parts of an OPC package.
//!
//! A part is a named blob with a content type and its own relationships.
//! XML parts additionally offer a parsed [`XmlNode`] view of their content.

use crate::common::xml::XmlNode;
use crate::ooxml::opc::error::{OpcError, Result};
use crate::ooxml::opc::packuri::PackURI;
use crate::ooxml::opc::rel::Relationships;
use memchr::memmem;
use std::sync::Arc;

/// Trait representing a part in an OPC package.
pub trait Part: std::fmt::Debug {
    /// Get the partname of this part.
    fn partname(&self) -> &PackURI;

    /// Get the content type of this part.
    fn content_type(&self) -> &str;

    /// Get the binary content of this part.
    fn blob(&self) -> &[u8];

    /// Replace the binary content of this part.
    fn set_blob(&mut self, blob: Vec<u8>);

    /// Get the relationships for this part.
    fn rels(&self) -> &Relationships;

    /// Get mutable access to the relationships for this part.
    fn rels_mut(&mut self) -> &mut Relationships;

    /// Copy of this part, sharing the blob.
    fn clone_part(&self) -> Box<dyn Part>;

    /// Relate this part to `target`, returning the (possibly existing) rId.
    fn relate_to(&mut self, target: &PackURI, reltype: &str) -> String {
        let target_ref = target.relative_ref(self.partname().base_uri());
        self.rels_mut().get_or_add(reltype, &target_ref)
    }

    /// Add or get an external relationship.
    fn relate_to_ext(&mut self, target_url: &str, reltype: &str) -> String {
        self.rels_mut().get_or_add_ext_rel(reltype, target_url)
    }

    /// Get the target reference for a relationship ID.
    fn target_ref(&self, r_id: &str) -> Result<&str> {
        self.rels()
            .get(r_id)
            .map(|rel| rel.target_ref())
            .ok_or_else(|| OpcError::RelationshipNotFound(format!("rId: {}", r_id)))
    }

    /// Absolute partname behind an internal relationship ID.
    fn related_partname(&self, r_id: &str) -> Result<PackURI> {
        self.rels()
            .get(r_id)
            .ok_or_else(|| OpcError::RelationshipNotFound(format!("rId: {}", r_id)))?
            .target_partname()
    }

    /// Count `r:id`/`r:embed` references to a relationship ID in the content.
    fn rel_ref_count(&self, r_id: &str) -> usize {
        let blob = self.blob();
        ["r:id", "r:embed", "r:link"]
            .iter()
            .map(|attr| {
                let pattern = format!(r#"{}="{}""#, attr, r_id);
                memmem::Finder::new(pattern.as_bytes()).find_iter(blob).count()
            })
            .sum()
    }
}

/// A part that stores opaque binary content, such as an image.
#[derive(Debug, Clone)]
pub struct BlobPart {
    partname: PackURI,
    content_type: String,
    blob: Arc<Vec<u8>>,
    rels: Relationships,
}

impl BlobPart {
    pub fn new(partname: PackURI, content_type: String, blob: Vec<u8>) -> Self {
        let rels = Relationships::new(partname.base_uri().to_string());
        Self {
            partname,
            content_type,
            blob: Arc::new(blob),
            rels,
        }
    }
}

impl Part for BlobPart {
    fn partname(&self) -> &PackURI {
        &self.partname
    }

    fn content_type(&self) -> &str {
        &self.content_type
    }

    fn blob(&self) -> &[u8] {
        &self.blob
    }

    fn set_blob(&mut self, blob: Vec<u8>) {
        self.blob = Arc::new(blob);
    }

    fn rels(&self) -> &Relationships {
        &self.rels
    }

    fn rels_mut(&mut self) -> &mut Relationships {
        &mut self.rels
    }

    fn clone_part(&self) -> Box<dyn Part> {
        Box::new(self.clone())
    }
}

/// A part whose content is UTF-8 XML.
#[derive(Debug, Clone)]
pub struct XmlPart {
    partname: PackURI,
    content_type: String,
    xml_bytes: Arc<Vec<u8>>,
    rels: Relationships,
}

impl XmlPart {
    pub fn new(partname: PackURI, content_type: String, xml_bytes: Vec<u8>) -> Self {
        let rels = Relationships::new(partname.base_uri().to_string());
        Self {
            partname,
            content_type,
            xml_bytes: Arc::new(xml_bytes),
            rels,
        }
    }

    /// Load an XML part from raw data, validating UTF-8.
    pub fn load(partname: PackURI, content_type: String, xml_bytes: Vec<u8>) -> Result<Self> {
        std::str::from_utf8(&xml_bytes)
            .map_err(|e| OpcError::XmlError(format!("Invalid UTF-8 in {}: {}", partname, e)))?;
        Ok(Self::new(partname, content_type, xml_bytes))
    }
}

impl Part for XmlPart {
    fn partname(&self) -> &PackURI {
        &self.partname
    }

    fn content_type(&self) -> &str {
        &self.content_type
    }

    fn blob(&self) -> &[u8] {
        &self.xml_bytes
    }

    fn set_blob(&mut self, blob: Vec<u8>) {
        self.xml_bytes = Arc::new(blob);
    }

    fn rels(&self) -> &Relationships {
        &self.rels
    }

    fn rels_mut(&mut self) -> &mut Relationships {
        &mut self.rels
    }

    fn clone_part(&self) -> Box<dyn Part> {
        Box::new(self.clone())
    }
}

/// Parse the content of any part as XML.
pub fn parse_xml(part: &dyn Part) -> Result<XmlNode> {
    XmlNode::parse(part.blob())
        .map_err(|e| OpcError::XmlError(format!("{}: {}", part.partname(), e)))
}

/// Creates the right Part implementation for a content type.
pub struct PartFactory;

impl PartFactory {
    /// Load a part, choosing [`XmlPart`] for XML content types.
    pub fn load(partname: PackURI, content_type: String, blob: Vec<u8>) -> Result<Box<dyn Part>> {
        if Self::is_xml_content_type(&content_type) {
            Ok(Box::new(XmlPart::load(partname, content_type, blob)?))
        } else {
            Ok(Box::new(BlobPart::new(partname, content_type, blob)))
        }
    }

    #[inline]
    fn is_xml_content_type(content_type: &str) -> bool {
        content_type.ends_with("+xml") || content_type.ends_with("/xml")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ooxml::opc::constants::{content_type as CT, relationship_type as RT};

    #[test]
    fn test_factory_dispatch() {
        let png = PartFactory::load(
            PackURI::new("/ppt/media/image1.png").unwrap(),
            CT::PNG.to_string(),
            vec![0x89, 0x50, 0x4E, 0x47],
        )
        .unwrap();
        assert_eq!(png.content_type(), CT::PNG);

        let bad = PartFactory::load(
            PackURI::new("/ppt/slides/slide1.xml").unwrap(),
            CT::PML_SLIDE.to_string(),
            vec![0xff, 0xfe, 0x00],
        );
        assert!(bad.is_err());

        assert!(PartFactory::is_xml_content_type(CT::XML));
        assert!(PartFactory::is_xml_content_type(CT::PML_SLIDE));
        assert!(!PartFactory::is_xml_content_type(CT::JPEG));
    }

    #[test]
    fn test_relate_to_uses_relative_ref() {
        let mut slide = XmlPart::new(
            PackURI::new("/ppt/slides/slide1.xml").unwrap(),
            CT::PML_SLIDE.to_string(),
            br#"<p:sld><a:blip r:embed="rId2"/><a:hlinkClick r:id="rId2"/></p:sld>"#.to_vec(),
        );
        let layout = PackURI::new("/ppt/slideLayouts/slideLayout7.xml").unwrap();
        let r_id = slide.relate_to(&layout, RT::SLIDE_LAYOUT);
        assert_eq!(r_id, "rId1");
        assert_eq!(slide.target_ref("rId1").unwrap(), "../slideLayouts/slideLayout7.xml");
        assert_eq!(slide.related_partname("rId1").unwrap(), layout);
        assert_eq!(slide.rel_ref_count("rId2"), 2);

        slide.set_blob(b"<p:sld/>".to_vec());
        assert_eq!(parse_xml(&slide).unwrap().name, "p:sld");
    }
}
