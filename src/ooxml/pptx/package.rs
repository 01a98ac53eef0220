/// Package implementation for PowerPoint presentations.
use crate::ooxml::error::{OoxmlError, Result};
use crate::ooxml::opc::constants::content_type as ct;
use crate::ooxml::opc::OpcPackage;
use crate::ooxml::pptx::parts::PresentationPart;
use std::io::Read;
use std::path::Path;

/// Content types a presentation's main part may carry.
const PRESENTATION_CONTENT_TYPES: [&str; 4] = [
    ct::PML_PRESENTATION_MAIN,
    ct::PML_PRES_MACRO_MAIN,
    ct::PML_TEMPLATE_MAIN,
    ct::PML_SLIDESHOW_MAIN,
];

/// A PowerPoint (.pptx) package.
///
/// Wraps an OPC package whose main part was verified to be a presentation.
///
/// # Examples
///
/// ```rust,no_run
/// use slidecraft::ooxml::pptx::Package;
///
/// let pkg = Package::open("presentation.pptx")?;
/// let pres = pkg.presentation_part()?;
/// println!("{} slides", pres.slide_entries()?.len());
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug)]
pub struct Package {
    /// The underlying OPC package
    opc: OpcPackage,
}

impl Package {
    /// Open a .pptx package from a file path.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::from_opc(OpcPackage::open(path)?)
    }

    /// Create a .pptx package from archive bytes.
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        Self::from_opc(OpcPackage::from_bytes(data)?)
    }

    /// Create a .pptx package from a reader.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        Self::from_opc(OpcPackage::from_reader(reader)?)
    }

    /// Wrap `opc` after checking the main part's content type.
    pub fn from_opc(opc: OpcPackage) -> Result<Self> {
        let main_part = opc
            .main_document_part()
            .map_err(|e| OoxmlError::PartNotFound(format!("main presentation part: {}", e)))?;

        let content_type = main_part.content_type();
        if !PRESENTATION_CONTENT_TYPES.contains(&content_type) {
            return Err(OoxmlError::InvalidContentType {
                expected: PRESENTATION_CONTENT_TYPES.join(" or "),
                got: content_type.to_string(),
            });
        }

        Ok(Self { opc })
    }

    /// The main presentation part.
    pub fn presentation_part(&self) -> Result<PresentationPart<'_>> {
        let main_part = self
            .opc
            .main_document_part()
            .map_err(|e| OoxmlError::PartNotFound(format!("main presentation part: {}", e)))?;
        PresentationPart::from_part(main_part)
    }

    /// Get the underlying OPC package.
    #[inline]
    pub fn opc(&self) -> &OpcPackage {
        &self.opc
    }

    #[inline]
    pub fn into_opc(self) -> OpcPackage {
        self.opc
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ooxml::opc::constants::relationship_type as rt;
    use crate::ooxml::opc::{PackURI, XmlPart};

    #[test]
    fn test_rejects_other_documents() {
        let mut opc = OpcPackage::new();
        let main = PackURI::new("/word/document.xml").unwrap();
        opc.add_part(Box::new(XmlPart::new(
            main.clone(),
            "application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"
                .to_string(),
            b"<w:document xmlns:w=\"w\"/>".to_vec(),
        )));
        opc.relate_to(&main, rt::OFFICE_DOCUMENT);

        let err = Package::from_opc(opc).unwrap_err();
        assert!(matches!(err, OoxmlError::InvalidContentType { .. }));
    }

    #[test]
    fn test_accepts_default_deck() {
        let opc = crate::ooxml::pptx::template::default_package(9_144_000, 6_858_000, "en-US", "{X}")
            .unwrap();
        let pkg = Package::from_opc(opc).unwrap();
        assert_eq!(pkg.presentation_part().unwrap().slide_size().unwrap(), Some((9_144_000, 6_858_000)));
    }
}
