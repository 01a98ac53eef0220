/// Objects that implement reading and writing OPC packages.
///
/// This module provides the main OpcPackage type, which represents an Open Packaging
/// Convention package in memory. It manages parts, relationships, and provides
/// package-level operations such as partname allocation and pruning.
use crate::ooxml::opc::constants::relationship_type;
use crate::ooxml::opc::error::{OpcError, Result};
use crate::ooxml::opc::packuri::{PACKAGE_URI, PackURI};
use crate::ooxml::opc::part::{Part, PartFactory};
use crate::ooxml::opc::phys_pkg::PhysPkgReader;
use crate::ooxml::opc::pkgreader::PackageReader;
use crate::ooxml::opc::pkgwriter::PackageWriter;
use crate::ooxml::opc::rel::Relationships;
use std::collections::{BTreeMap, HashSet};
use std::io::Read;
use std::path::Path;

/// Main API class for working with OPC packages.
///
/// Parts are kept in partname order so that serialization is deterministic.
#[derive(Debug)]
pub struct OpcPackage {
    /// Package-level relationships
    rels: Relationships,

    /// All parts in the package, indexed by partname
    parts: BTreeMap<PackURI, Box<dyn Part>>,
}

impl Default for OpcPackage {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for OpcPackage {
    fn clone(&self) -> Self {
        self.duplicate()
    }
}

impl OpcPackage {
    /// Create a new empty OPC package.
    pub fn new() -> Self {
        Self {
            rels: Relationships::new(PACKAGE_URI.to_string()),
            parts: BTreeMap::new(),
        }
    }

    /// Open an OPC package from a file.
    ///
    /// # Example
    /// ```no_run
    /// use slidecraft::ooxml::opc::OpcPackage;
    ///
    /// let pkg = OpcPackage::open("deck.pptx")?;
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let phys_reader = PhysPkgReader::open(path)?;
        Self::from_phys_reader(phys_reader)
    }

    /// Load an OPC package from archive bytes.
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        Self::from_phys_reader(PhysPkgReader::from_bytes(data)?)
    }

    /// Load an OPC package from a reader.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        Self::from_phys_reader(PhysPkgReader::from_reader(reader)?)
    }

    fn from_phys_reader(phys_reader: PhysPkgReader) -> Result<Self> {
        let pkg_reader = PackageReader::from_phys_reader(phys_reader)?;
        Self::unmarshal(pkg_reader)
    }

    /// Convert serialized parts into the in-memory part map.
    fn unmarshal(pkg_reader: PackageReader) -> Result<Self> {
        let (rels, sparts) = pkg_reader.into_parts();
        let mut parts = BTreeMap::new();
        for spart in sparts {
            let mut part = PartFactory::load(spart.partname.clone(), spart.content_type, spart.blob)?;
            *part.rels_mut() = spart.rels;
            parts.insert(spart.partname, part);
        }
        Ok(Self { rels, parts })
    }

    /// Package-level relationships.
    #[inline]
    pub fn rels(&self) -> &Relationships {
        &self.rels
    }

    #[inline]
    pub fn rels_mut(&mut self) -> &mut Relationships {
        &mut self.rels
    }

    /// The main document part, the target of the officeDocument relationship.
    pub fn main_document_part(&self) -> Result<&dyn Part> {
        self.part_by_reltype(relationship_type::OFFICE_DOCUMENT)
    }

    /// Part related from the package root by `reltype`.
    pub fn part_by_reltype(&self, reltype: &str) -> Result<&dyn Part> {
        let partname = self.rels.part_with_reltype(reltype)?.target_partname()?;
        self.get_part(&partname)
    }

    pub fn get_part(&self, partname: &PackURI) -> Result<&dyn Part> {
        self.parts
            .get(partname)
            .map(|part| part.as_ref())
            .ok_or_else(|| OpcError::PartNotFound(partname.to_string()))
    }

    pub fn get_part_mut(&mut self, partname: &PackURI) -> Result<&mut Box<dyn Part>> {
        self.parts
            .get_mut(partname)
            .ok_or_else(|| OpcError::PartNotFound(partname.to_string()))
    }

    /// Add a part, replacing any part with the same name.
    pub fn add_part(&mut self, part: Box<dyn Part>) {
        self.parts.insert(part.partname().clone(), part);
    }

    pub fn remove_part(&mut self, partname: &PackURI) -> Option<Box<dyn Part>> {
        self.parts.remove(partname)
    }

    #[inline]
    pub fn contains_part(&self, partname: &PackURI) -> bool {
        self.parts.contains_key(partname)
    }

    pub fn iter_parts(&self) -> impl Iterator<Item = &dyn Part> {
        self.parts.values().map(|part| part.as_ref())
    }

    pub fn part_count(&self) -> usize {
        self.parts.len()
    }

    /// Relate the package root to `target`, returning the rId.
    pub fn relate_to(&mut self, target: &PackURI, reltype: &str) -> String {
        let target_ref = target.relative_ref(self.rels.base_uri());
        self.rels.get_or_add(reltype, &target_ref)
    }

    /// First partname produced by `template` (containing `%d`) that is not in use.
    pub fn next_partname(&self, template: &str) -> Result<PackURI> {
        let mut n = 1u32;
        loop {
            let candidate = PackURI::from_template(template, n).map_err(OpcError::InvalidPackUri)?;
            if !self.parts.contains_key(&candidate) {
                return Ok(candidate);
            }
            n += 1;
        }
    }

    /// Independent copy of the package; blobs are shared until replaced.
    pub fn duplicate(&self) -> Self {
        Self {
            rels: self.rels.clone(),
            parts: self
                .parts
                .iter()
                .map(|(name, part)| (name.clone(), part.clone_part()))
                .collect(),
        }
    }

    /// Drop every part no longer reachable from the package relationships.
    ///
    /// Returns the number of removed parts.
    pub fn prune_unreachable(&mut self) -> usize {
        let mut reachable: HashSet<PackURI> = HashSet::new();
        let mut pending: Vec<PackURI> = Self::internal_targets(&self.rels);

        while let Some(partname) = pending.pop() {
            if !reachable.insert(partname.clone()) {
                continue;
            }
            if let Some(part) = self.parts.get(&partname) {
                pending.extend(Self::internal_targets(part.rels()));
            }
        }

        let before = self.parts.len();
        self.parts.retain(|name, _| reachable.contains(name));
        before - self.parts.len()
    }

    fn internal_targets(rels: &Relationships) -> Vec<PackURI> {
        rels.iter()
            .filter(|rel| !rel.is_external())
            .filter_map(|rel| rel.target_partname().ok())
            .collect()
    }

    /// Save the package to a file.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        PackageWriter::write(path, self)
    }

    /// Serialize the package to ZIP bytes.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        PackageWriter::to_bytes(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ooxml::opc::constants::content_type as ct;
    use crate::ooxml::opc::part::{BlobPart, XmlPart};

    fn sample_package() -> OpcPackage {
        let mut pkg = OpcPackage::new();
        let main = PackURI::new("/ppt/presentation.xml").unwrap();
        let mut pres = XmlPart::new(
            main.clone(),
            ct::PML_PRESENTATION_MAIN.to_string(),
            b"<p:presentation/>".to_vec(),
        );
        let image = PackURI::new("/ppt/media/image1.png").unwrap();
        pres.relate_to(&image, relationship_type::IMAGE);
        pkg.add_part(Box::new(pres));
        pkg.add_part(Box::new(BlobPart::new(image, ct::PNG.to_string(), vec![1, 2, 3])));
        pkg.relate_to(&main, relationship_type::OFFICE_DOCUMENT);
        pkg
    }

    #[test]
    fn test_next_partname_fills_gaps() {
        let pkg = sample_package();
        let next = pkg.next_partname("/ppt/media/image%d.png").unwrap();
        assert_eq!(next.as_str(), "/ppt/media/image2.png");
        let first = pkg.next_partname("/ppt/slides/slide%d.xml").unwrap();
        assert_eq!(first.as_str(), "/ppt/slides/slide1.xml");
    }

    #[test]
    fn test_prune_unreachable() {
        let mut pkg = sample_package();
        let orphan = PackURI::new("/ppt/media/image9.png").unwrap();
        pkg.add_part(Box::new(BlobPart::new(orphan.clone(), ct::PNG.to_string(), vec![9])));

        assert_eq!(pkg.prune_unreachable(), 1);
        assert!(!pkg.contains_part(&orphan));
        assert_eq!(pkg.part_count(), 2);
    }

    #[test]
    fn test_round_trip_through_bytes() {
        let pkg = sample_package();
        let bytes = pkg.to_bytes().unwrap();
        let reopened = OpcPackage::from_bytes(bytes).unwrap();

        let main = reopened.main_document_part().unwrap();
        assert_eq!(main.partname().as_str(), "/ppt/presentation.xml");
        assert_eq!(main.rels().len(), 1);
        let image = PackURI::new("/ppt/media/image1.png").unwrap();
        assert_eq!(reopened.get_part(&image).unwrap().blob(), &[1, 2, 3]);
    }

    #[test]
    fn test_duplicate_is_independent() {
        let pkg = sample_package();
        let mut copy = pkg.duplicate();
        let main = PackURI::new("/ppt/presentation.xml").unwrap();
        copy.get_part_mut(&main).unwrap().set_blob(b"<changed/>".to_vec());
        assert_eq!(pkg.get_part(&main).unwrap().blob(), b"<p:presentation/>");
    }
}
