//! Relationships between parts of an OPC package.
//!
//! Each part (and the package itself) owns a relationship collection that
//! is stored in a sibling `_rels/<name>.rels` part.

use crate::common::xml::{XmlNode, escape_xml};
use crate::ooxml::opc::constants::target_mode;
use crate::ooxml::opc::error::{OpcError, Result};
use crate::ooxml::opc::packuri::PackURI;

/// A single relationship from a source part to a target.
///
/// Internal relationships point at another part through a reference that is
/// relative to the source part's directory; external ones hold a URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relationship {
    r_id: String,
    reltype: String,
    target_ref: String,
    base_uri: String,
    is_external: bool,
}

impl Relationship {
    pub fn new(
        r_id: String,
        reltype: String,
        target_ref: String,
        base_uri: String,
        is_external: bool,
    ) -> Self {
        Self {
            r_id,
            reltype,
            target_ref,
            base_uri,
            is_external,
        }
    }

    /// Get the relationship ID.
    #[inline]
    pub fn r_id(&self) -> &str {
        &self.r_id
    }

    /// Get the relationship type URI.
    #[inline]
    pub fn reltype(&self) -> &str {
        &self.reltype
    }

    /// Relative part reference, or the URL of an external relationship.
    #[inline]
    pub fn target_ref(&self) -> &str {
        &self.target_ref
    }

    #[inline]
    pub fn is_external(&self) -> bool {
        self.is_external
    }

    /// Absolute partname of an internal target.
    pub fn target_partname(&self) -> Result<PackURI> {
        if self.is_external {
            return Err(OpcError::InvalidRelationship(format!(
                "{} is external and has no target partname",
                self.r_id
            )));
        }
        PackURI::from_rel_ref(&self.base_uri, &self.target_ref).map_err(OpcError::InvalidPackUri)
    }
}

/// Relationships of a single source, in document order.
#[derive(Debug, Clone)]
pub struct Relationships {
    base_uri: String,
    rels: Vec<Relationship>,
}

impl Relationships {
    /// Create an empty collection whose targets resolve against `base_uri`.
    pub fn new(base_uri: String) -> Self {
        Self {
            base_uri,
            rels: Vec::new(),
        }
    }

    /// Parse a `.rels` part.
    pub fn from_xml(base_uri: String, xml: &[u8]) -> Result<Self> {
        let root = XmlNode::parse(xml).map_err(|e| OpcError::XmlError(e.to_string()))?;
        let mut rels = Self::new(base_uri);
        for node in root.children_named("Relationship") {
            let (Some(r_id), Some(reltype), Some(target)) =
                (node.attr("Id"), node.attr("Type"), node.attr("Target"))
            else {
                return Err(OpcError::InvalidRelationship(format!(
                    "Relationship missing Id, Type or Target in {}",
                    rels.base_uri
                )));
            };
            let is_external = node.attr("TargetMode") == Some(target_mode::EXTERNAL);
            rels.add_relationship(reltype.to_string(), target.to_string(), r_id.to_string(), is_external);
        }
        Ok(rels)
    }

    #[inline]
    pub fn base_uri(&self) -> &str {
        &self.base_uri
    }

    /// Add a relationship, replacing any existing one with the same rId.
    pub fn add_relationship(
        &mut self,
        reltype: String,
        target_ref: String,
        r_id: String,
        is_external: bool,
    ) -> String {
        self.rels.retain(|rel| rel.r_id != r_id);
        self.rels.push(Relationship::new(
            r_id.clone(),
            reltype,
            target_ref,
            self.base_uri.clone(),
            is_external,
        ));
        r_id
    }

    /// Get a relationship by its ID.
    #[inline]
    pub fn get(&self, r_id: &str) -> Option<&Relationship> {
        self.rels.iter().find(|rel| rel.r_id == r_id)
    }

    /// rId of the internal relationship of `reltype` to `target_ref`,
    /// creating it with the next free rId when absent.
    pub fn get_or_add(&mut self, reltype: &str, target_ref: &str) -> String {
        if let Some(rel) = self
            .rels
            .iter()
            .find(|rel| !rel.is_external && rel.reltype == reltype && rel.target_ref == target_ref)
        {
            return rel.r_id.clone();
        }
        let r_id = self.next_r_id();
        self.add_relationship(reltype.to_string(), target_ref.to_string(), r_id, false)
    }

    /// External-relationship counterpart of [`Relationships::get_or_add`].
    pub fn get_or_add_ext_rel(&mut self, reltype: &str, target_ref: &str) -> String {
        if let Some(rel) = self
            .rels
            .iter()
            .find(|rel| rel.is_external && rel.reltype == reltype && rel.target_ref == target_ref)
        {
            return rel.r_id.clone();
        }
        let r_id = self.next_r_id();
        self.add_relationship(reltype.to_string(), target_ref.to_string(), r_id, true)
    }

    /// Lowest `rIdN` not yet in use.
    pub fn next_r_id(&self) -> String {
        let mut used: Vec<u32> = self
            .rels
            .iter()
            .filter_map(|rel| rel.r_id.strip_prefix("rId"))
            .filter_map(|n| atoi_simd::parse::<u32, false, false>(n.as_bytes()).ok())
            .collect();
        used.sort_unstable();

        let mut next = 1u32;
        for n in used {
            if n == next {
                next += 1;
            } else if n > next {
                break;
            }
        }
        format!("rId{}", next)
    }

    /// The single relationship of a type.
    pub fn part_with_reltype(&self, reltype: &str) -> Result<&Relationship> {
        let mut matching = self.all_with_reltype(reltype);
        match (matching.next(), matching.next()) {
            (Some(rel), None) => Ok(rel),
            (None, _) => Err(OpcError::RelationshipNotFound(format!(
                "No relationship of type '{}'",
                reltype
            ))),
            (Some(_), Some(_)) => Err(OpcError::InvalidRelationship(format!(
                "Multiple relationships of type '{}'",
                reltype
            ))),
        }
    }

    /// All relationships of a type, in document order.
    pub fn all_with_reltype<'a, 'b>(
        &'a self,
        reltype: &'b str,
    ) -> impl Iterator<Item = &'a Relationship> + use<'a, 'b> {
        self.rels.iter().filter(move |rel| rel.reltype == reltype)
    }

    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &Relationship> {
        self.rels.iter()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.rels.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rels.is_empty()
    }

    /// Remove a relationship by its ID.
    pub fn remove(&mut self, r_id: &str) -> Option<Relationship> {
        let pos = self.rels.iter().position(|rel| rel.r_id == r_id)?;
        Some(self.rels.remove(pos))
    }

    /// Serialize to the XML of a `.rels` part.
    pub fn to_xml(&self) -> String {
        let mut xml = String::with_capacity(128 + self.rels.len() * 160);
        xml.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\n");
        xml.push_str(
            r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
        );
        for rel in &self.rels {
            xml.push_str(r#"<Relationship Id=""#);
            xml.push_str(&escape_xml(&rel.r_id));
            xml.push_str(r#"" Type=""#);
            xml.push_str(&escape_xml(&rel.reltype));
            xml.push_str(r#"" Target=""#);
            xml.push_str(&escape_xml(&rel.target_ref));
            xml.push('"');
            if rel.is_external {
                xml.push_str(r#" TargetMode="External""#);
            }
            xml.push_str("/>");
        }
        xml.push_str("</Relationships>");
        xml
    }
}

impl Default for Relationships {
    fn default() -> Self {
        Self::new("/".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ooxml::opc::constants::relationship_type as RT;

    #[test]
    fn test_next_r_id_fills_gaps() {
        let mut rels = Relationships::new("/ppt/slides".to_string());
        assert_eq!(rels.next_r_id(), "rId1");

        rels.add_relationship("t".into(), "a.xml".into(), "rId1".into(), false);
        rels.add_relationship("t".into(), "c.xml".into(), "rId3".into(), false);
        assert_eq!(rels.next_r_id(), "rId2");
    }

    #[test]
    fn test_part_with_reltype_outlives_query() {
        let mut rels = Relationships::new("/ppt/slides".to_string());
        rels.get_or_add(RT::SLIDE_LAYOUT, "../slideLayouts/slideLayout2.xml");
        rels.get_or_add(RT::IMAGE, "../media/image1.png");
        rels.get_or_add(RT::IMAGE, "../media/image2.png");

        let layout = {
            let reltype = RT::SLIDE_LAYOUT.to_string();
            rels.part_with_reltype(&reltype).unwrap()
        };
        assert_eq!(layout.target_ref(), "../slideLayouts/slideLayout2.xml");

        assert!(matches!(
            rels.part_with_reltype(RT::IMAGE),
            Err(OpcError::InvalidRelationship(_))
        ));
        assert!(matches!(
            rels.part_with_reltype(RT::NOTES_SLIDE),
            Err(OpcError::RelationshipNotFound(_))
        ));
        assert_eq!(rels.all_with_reltype(RT::IMAGE).count(), 2);
    }

    #[test]
    fn test_get_or_add_reuses_existing() {
        let mut rels = Relationships::new("/ppt/slides".to_string());
        let layout = rels.get_or_add(RT::SLIDE_LAYOUT, "../slideLayouts/slideLayout1.xml");
        let image = rels.get_or_add(RT::IMAGE, "../media/image1.png");
        assert_eq!(layout, "rId1");
        assert_eq!(image, "rId2");
        assert_eq!(rels.get_or_add(RT::IMAGE, "../media/image1.png"), "rId2");

        let link = rels.get_or_add_ext_rel(RT::HYPERLINK, "https://example.com/?a=1&b=2");
        assert_eq!(link, "rId3");
        assert!(rels.get("rId3").unwrap().is_external());
        assert!(rels.get("rId3").unwrap().target_partname().is_err());

        let target = rels.get("rId1").unwrap().target_partname().unwrap();
        assert_eq!(target.as_str(), "/ppt/slideLayouts/slideLayout1.xml");
    }

    #[test]
    fn test_xml_round_trip() {
        let mut rels = Relationships::new("/ppt/slides".to_string());
        rels.get_or_add(RT::SLIDE_LAYOUT, "../slideLayouts/slideLayout2.xml");
        rels.get_or_add_ext_rel(RT::HYPERLINK, "https://example.com/?a=1&b=2");

        let xml = rels.to_xml();
        assert!(xml.contains("a=1&amp;b=2"));
        assert!(xml.contains(r#"TargetMode="External""#));

        let parsed = Relationships::from_xml("/ppt/slides".to_string(), xml.as_bytes()).unwrap();
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed.get("rId2").unwrap().target_ref(), "https://example.com/?a=1&b=2");
        assert!(parsed.part_with_reltype(RT::SLIDE_LAYOUT).is_ok());
        assert!(parsed.part_with_reltype(RT::IMAGE).is_err());
    }
}
