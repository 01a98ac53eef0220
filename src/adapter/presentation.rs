//! The built, read-only presentation.

use crate::adapter::layout::MasterRef;
use crate::common::Length;
use crate::error::Result;
use crate::ooxml::pptx::{MutablePresentation, MutableSlide};
use crate::tree::{PresentationTree, presentation_tree};
use std::io::Write;
use std::path::Path;
use tracing::debug;

/// A finished presentation.
///
/// Nothing in the library changes it after it is built; use
/// [`Presentation::into_backend`] to edit it further.
#[derive(Debug)]
pub struct Presentation {
    pres: MutablePresentation,
}

impl Presentation {
    pub fn from_backend(pres: MutablePresentation) -> Self {
        Self { pres }
    }

    /// Open an existing deck for inspection.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Ok(Self::from_backend(MutablePresentation::open(path)?))
    }

    pub fn to_backend(&self) -> &MutablePresentation {
        &self.pres
    }

    pub fn into_backend(self) -> MutablePresentation {
        self.pres
    }

    pub fn slides_count(&self) -> usize {
        self.pres.slide_count()
    }

    pub fn slides(&self) -> &[MutableSlide] {
        self.pres.slides()
    }

    pub fn slide_width(&self) -> Length {
        Length::Emu(self.pres.slide_width())
    }

    pub fn slide_height(&self) -> Length {
        Length::Emu(self.pres.slide_height())
    }

    pub fn masters(&self) -> Vec<MasterRef<'_>> {
        self.pres
            .slide_masters()
            .iter()
            .enumerate()
            .map(|(i, master)| MasterRef::from_backend(master, i))
            .collect()
    }

    /// Write the deck to `path`.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        self.pres.save(path)?;
        debug!(path = %path.display(), slides = self.slides_count(), "presentation saved");
        Ok(())
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(self.pres.to_bytes()?)
    }

    pub fn write_to<W: Write>(&self, writer: W) -> Result<()> {
        Ok(self.pres.write_to(writer)?)
    }

    /// Nested description of the deck, lengths in points.
    pub fn tree(&self) -> PresentationTree {
        presentation_tree(&self.pres)
    }
}

impl From<MutablePresentation> for Presentation {
    fn from(pres: MutablePresentation) -> Self {
        Self::from_backend(pres)
    }
}
