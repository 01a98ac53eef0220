//! Low-level, read-only access to a serialized OPC package.
//!
//! [`PackageReader`] resolves content types and walks the relationship graph
//! from the package root, yielding every reachable part exactly once.

use crate::common::xml::XmlNode;
use crate::ooxml::opc::error::{OpcError, Result};
use crate::ooxml::opc::packuri::{PACKAGE_URI, PackURI};
use crate::ooxml::opc::phys_pkg::PhysPkgReader;
use crate::ooxml::opc::rel::Relationships;
use std::collections::{HashMap, HashSet};

/// A part as loaded from the physical package, before it becomes a [`Part`](super::Part).
#[derive(Debug)]
pub struct SerializedPart {
    pub partname: PackURI,
    pub content_type: String,
    pub blob: Vec<u8>,
    pub rels: Relationships,
}

/// Content type discovery from `[Content_Types].xml`.
///
/// Overrides match a partname exactly; defaults match by extension.
#[derive(Debug, Default)]
pub struct ContentTypeMap {
    defaults: HashMap<String, String>,
    overrides: HashMap<String, String>,
}

impl ContentTypeMap {
    pub fn from_xml(xml: &[u8]) -> Result<Self> {
        let root = XmlNode::parse(xml)
            .map_err(|e| OpcError::XmlError(format!("Content types parse error: {}", e)))?;
        let mut map = Self::default();
        for node in root.elements() {
            match (node.local_name(), node.attr("ContentType")) {
                ("Default", Some(ct)) => {
                    if let Some(ext) = node.attr("Extension") {
                        map.defaults.insert(ext.to_lowercase(), ct.to_string());
                    }
                },
                ("Override", Some(ct)) => {
                    if let Some(partname) = node.attr("PartName") {
                        map.overrides.insert(partname.to_lowercase(), ct.to_string());
                    }
                },
                _ => {},
            }
        }
        Ok(map)
    }

    /// Content type of a partname: override first, then extension default.
    pub fn get(&self, pack_uri: &PackURI) -> Result<&str> {
        self.overrides
            .get(&pack_uri.as_str().to_lowercase())
            .or_else(|| self.defaults.get(&pack_uri.ext().to_lowercase()))
            .map(String::as_str)
            .ok_or_else(|| OpcError::ContentTypeNotFound(pack_uri.to_string()))
    }
}

/// Package reader that provides access to serialized parts and relationships.
pub struct PackageReader {
    pkg_rels: Relationships,
    sparts: Vec<SerializedPart>,
}

impl PackageReader {
    /// Read content types, package relationships and every reachable part.
    pub fn from_phys_reader(mut phys_reader: PhysPkgReader) -> Result<Self> {
        let content_types = ContentTypeMap::from_xml(&phys_reader.content_types_xml()?)?;

        let package_uri = PackURI::new(PACKAGE_URI).map_err(OpcError::InvalidPackUri)?;
        let pkg_rels = Self::load_rels(&mut phys_reader, &package_uri)?;

        let mut sparts = Vec::new();
        let mut visited: HashSet<PackURI> = HashSet::new();
        let mut pending: Vec<PackURI> = Self::internal_targets(&pkg_rels);
        pending.reverse();

        while let Some(partname) = pending.pop() {
            if !visited.insert(partname.clone()) {
                continue;
            }
            let blob = match phys_reader.blob_for(&partname) {
                Ok(blob) => blob,
                // Dangling relationships are tolerated; the target is simply absent.
                Err(OpcError::PartNotFound(_)) => continue,
                Err(e) => return Err(e),
            };
            let content_type = content_types.get(&partname)?.to_string();
            let rels = Self::load_rels(&mut phys_reader, &partname)?;

            let mut targets = Self::internal_targets(&rels);
            targets.reverse();
            pending.extend(targets);

            sparts.push(SerializedPart {
                partname,
                content_type,
                blob,
                rels,
            });
        }

        Ok(Self { pkg_rels, sparts })
    }

    fn load_rels(phys_reader: &mut PhysPkgReader, source_uri: &PackURI) -> Result<Relationships> {
        let base_uri = source_uri.base_uri().to_string();
        match phys_reader.rels_xml_for(source_uri)? {
            Some(xml) => Relationships::from_xml(base_uri, &xml),
            None => Ok(Relationships::new(base_uri)),
        }
    }

    fn internal_targets(rels: &Relationships) -> Vec<PackURI> {
        rels.iter()
            .filter(|rel| !rel.is_external())
            .filter_map(|rel| rel.target_partname().ok())
            .collect()
    }

    /// Package-level relationships.
    pub fn pkg_rels(&self) -> &Relationships {
        &self.pkg_rels
    }

    /// Consume the reader, yielding package relationships and parts.
    pub fn into_parts(self) -> (Relationships, Vec<SerializedPart>) {
        (self.pkg_rels, self.sparts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_type_lookup() {
        let map = ContentTypeMap::from_xml(
            br#"<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
                <Default Extension="PNG" ContentType="image/png"/>
                <Default Extension="xml" ContentType="application/xml"/>
                <Override PartName="/ppt/presentation.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.presentation.main+xml"/>
            </Types>"#,
        )
        .unwrap();

        let pres = PackURI::new("/ppt/presentation.xml").unwrap();
        assert!(map.get(&pres).unwrap().ends_with("presentation.main+xml"));
        assert_eq!(map.get(&PackURI::new("/ppt/media/a.png").unwrap()).unwrap(), "image/png");
        assert_eq!(map.get(&PackURI::new("/docProps/x.xml").unwrap()).unwrap(), "application/xml");
        assert!(map.get(&PackURI::new("/ppt/media/a.emf").unwrap()).is_err());
    }
}
