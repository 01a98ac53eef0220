/// Relationship mapping for parts written during a save.
///
/// Shapes ask for relationship IDs while they are serialized; the mapper
/// creates the relationships (and media parts) on the spot so the IDs it hands
/// out are the ones that end up in the package.
use crate::ooxml::error::{OoxmlError, Result};
use crate::ooxml::opc::constants::relationship_type as RT;
use crate::ooxml::opc::{BlobPart, OpcPackage, PackURI, Part};
use crate::ooxml::pptx::shapes::ImageSource;
use sha2::{Digest, Sha256};
use std::collections::HashMap;

use super::shape::XmlContext;

const MEDIA_DIR: &str = "/ppt/media/";

/// Media parts of a package, keyed by the SHA-256 digest of their bytes.
#[derive(Debug, Default)]
pub(crate) struct MediaStore {
    by_digest: HashMap<Vec<u8>, PackURI>,
    next_index: u32,
}

impl MediaStore {
    /// Index the media parts already in `package`.
    pub(crate) fn from_package(package: &OpcPackage) -> Self {
        let mut store = Self {
            by_digest: HashMap::new(),
            next_index: 1,
        };
        for part in package.iter_parts() {
            let partname = part.partname();
            if !partname.as_str().starts_with(MEDIA_DIR) {
                continue;
            }
            store.by_digest.insert(digest(part.blob()), partname.clone());
            if let Some(idx) = partname.idx() {
                store.next_index = store.next_index.max(idx + 1);
            }
        }
        store
    }

    /// Partname holding `blob`, adding a media part when no identical one exists.
    pub(crate) fn get_or_add(
        &mut self,
        package: &mut OpcPackage,
        blob: &[u8],
        extension: &str,
        content_type: &str,
    ) -> Result<PackURI> {
        let key = digest(blob);
        if let Some(partname) = self.by_digest.get(&key) {
            return Ok(partname.clone());
        }

        let partname = PackURI::new(format!("{}image{}.{}", MEDIA_DIR, self.next_index, extension))
            .map_err(OoxmlError::InvalidFormat)?;
        self.next_index += 1;
        package.add_part(Box::new(BlobPart::new(
            partname.clone(),
            content_type.to_string(),
            blob.to_vec(),
        )));
        self.by_digest.insert(key, partname.clone());
        Ok(partname)
    }
}

fn digest(blob: &[u8]) -> Vec<u8> {
    let mut hasher = Sha256::new();
    hasher.update(blob);
    hasher.finalize().to_vec()
}

/// Hands out relationship IDs of one part while its XML is generated.
pub(crate) struct RelationshipMapper<'a> {
    package: &'a mut OpcPackage,
    media: &'a mut MediaStore,
    partname: PackURI,
    lang: &'a str,
}

impl<'a> RelationshipMapper<'a> {
    pub(crate) fn new(
        package: &'a mut OpcPackage,
        media: &'a mut MediaStore,
        partname: PackURI,
        lang: &'a str,
    ) -> Self {
        Self {
            package,
            media,
            partname,
            lang,
        }
    }

    fn part_mut(&mut self) -> Result<&mut Box<dyn Part>> {
        Ok(self.package.get_part_mut(&self.partname)?)
    }
}

impl XmlContext for RelationshipMapper<'_> {
    fn lang(&self) -> &str {
        self.lang
    }

    fn image_r_id(&mut self, image: &ImageSource) -> Result<String> {
        let target = match image {
            ImageSource::Embedded(partname) => partname.clone(),
            ImageSource::Data { blob, format } => self.media.get_or_add(
                self.package,
                blob,
                format.extension(),
                format.mime_type(),
            )?,
            ImageSource::Unresolved => {
                return Err(OoxmlError::InvalidRelationship(format!(
                    "{}: picture without image data",
                    self.partname
                )));
            },
        };
        Ok(self.part_mut()?.relate_to(&target, RT::IMAGE))
    }

    fn hyperlink_r_id(&mut self, address: &str) -> Result<String> {
        Ok(self.part_mut()?.relate_to_ext(address, RT::HYPERLINK))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ooxml::opc::XmlPart;
    use crate::ooxml::opc::constants::content_type as CT;
    use crate::ooxml::pptx::format::ImageFormat;
    use std::sync::Arc;

    #[test]
    fn test_identical_images_share_a_part() {
        let mut package = OpcPackage::new();
        let slide = PackURI::new("/ppt/slides/slide1.xml").unwrap();
        package.add_part(Box::new(XmlPart::new(
            slide.clone(),
            CT::PML_SLIDE.to_string(),
            Vec::new(),
        )));
        let mut media = MediaStore::from_package(&package);

        let blob = Arc::new(vec![0x89, b'P', b'N', b'G', 1, 2, 3]);
        let image = ImageSource::Data {
            blob: Arc::clone(&blob),
            format: ImageFormat::Png,
        };
        let other = ImageSource::Data {
            blob: Arc::new(vec![0x89, b'P', b'N', b'G', 9]),
            format: ImageFormat::Png,
        };

        let mut mapper = RelationshipMapper::new(&mut package, &mut media, slide.clone(), "en-US");
        let first = mapper.image_r_id(&image).unwrap();
        let second = mapper.image_r_id(&image).unwrap();
        let third = mapper.image_r_id(&other).unwrap();
        let link = mapper.hyperlink_r_id("https://example.com").unwrap();
        assert_eq!(first, second);
        assert_ne!(first, third);
        assert_ne!(link, third);

        assert!(package.contains_part(&PackURI::new("/ppt/media/image1.png").unwrap()));
        assert!(package.contains_part(&PackURI::new("/ppt/media/image2.png").unwrap()));
        let rels = package.get_part(&slide).unwrap().rels();
        assert_eq!(rels.len(), 3);
        assert!(rels.get(&link).unwrap().is_external());
    }
}
