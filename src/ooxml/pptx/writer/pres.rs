/// Presentation writer for PPTX.
use crate::config::DeckOptions;
use crate::ooxml::error::{OoxmlError, Result};
use crate::ooxml::opc::constants::{content_type as CT, relationship_type as RT};
use crate::ooxml::opc::{OpcPackage, PackURI, PackageWriter, Part, XmlPart};
use crate::ooxml::pptx::package::Package;
use crate::ooxml::pptx::parts::{
    PresentationUpdate, SlideEntry, SlideLayoutInfo, SlideMasterInfo,
    rewrite_presentation_xml,
};
use crate::ooxml::pptx::template;
use std::collections::HashSet;
use std::io::{Read, Write};
use std::path::Path;
use tracing::{debug, warn};

use super::relmap::{MediaStore, RelationshipMapper};
use super::slide::{LayoutId, MutableSlide, SlideDefaults};

/// First id PowerPoint assigns to a slide.
const FIRST_SLIDE_ID: u32 = 256;

/// A mutable PowerPoint presentation for writing and modification.
///
/// Holds the package the deck was created from or read from, the parsed
/// masters and layouts, and the slides. Slides are written back into a copy of
/// the package on every save, so saving never changes the presentation.
#[derive(Debug)]
pub struct MutablePresentation {
    package: OpcPackage,
    pres_partname: PackURI,
    masters: Vec<SlideMasterInfo>,
    /// Slides in the presentation
    pub(crate) slides: Vec<MutableSlide>,
    /// Slide width in EMUs (English Metric Units, 914400 EMU = 1 inch)
    slide_width: i64,
    /// Slide height in EMUs
    slide_height: i64,
    notes_master: Option<PackURI>,
    lang: String,
    defaults: SlideDefaults,
    next_slide_id: u32,
}

impl MutablePresentation {
    /// Create the default empty presentation.
    ///
    /// Default size is 10" x 7.5" (standard 4:3 aspect ratio).
    pub fn new() -> Result<Self> {
        Self::with_options(&DeckOptions::default())
    }

    /// Alias of [`MutablePresentation::new`].
    #[inline]
    pub fn new_default() -> Result<Self> {
        Self::new()
    }

    /// Create the default empty presentation with `options`.
    pub fn with_options(options: &DeckOptions) -> Result<Self> {
        let opc = template::default_package(
            options.slide_width,
            options.slide_height,
            &options.lang,
            &options.table_style,
        )?;
        Self::from_package(Package::from_opc(opc)?, options)
    }

    /// Open an existing presentation.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::open_with(path, &DeckOptions::default())
    }

    pub fn open_with<P: AsRef<Path>>(path: P, options: &DeckOptions) -> Result<Self> {
        Self::from_package(Package::open(path)?, options)
    }

    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        Self::from_package(Package::from_bytes(data)?, &DeckOptions::default())
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        Self::from_package(Package::from_reader(reader)?, &DeckOptions::default())
    }

    /// Read masters, layouts and slides out of a verified package.
    pub fn from_package(package: Package, options: &DeckOptions) -> Result<Self> {
        let (pres_partname, size, master_uris, entries, notes_master) = {
            let pres = package.presentation_part()?;
            let part = pres.part();
            let master_uris = pres
                .slide_master_rids()?
                .iter()
                .map(|r_id| part.related_partname(r_id))
                .collect::<std::result::Result<Vec<_>, _>>()?;
            let notes_master = match pres.notes_master_rid()? {
                Some(r_id) => part.related_partname(&r_id).ok(),
                None => part
                    .rels()
                    .part_with_reltype(RT::NOTES_MASTER)
                    .ok()
                    .and_then(|rel| rel.target_partname().ok()),
            };
            let entries = pres
                .slide_entries()?
                .into_iter()
                .filter_map(|entry| match part.related_partname(&entry.r_id) {
                    Ok(uri) => Some((entry.id, uri)),
                    Err(e) => {
                        warn!(r_id = %entry.r_id, error = %e, "slide relationship does not resolve, skipping");
                        None
                    },
                })
                .collect::<Vec<_>>();
            (
                part.partname().clone(),
                pres.slide_size()?,
                master_uris,
                entries,
                notes_master,
            )
        };

        let opc = package.opc();
        let masters = master_uris
            .iter()
            .enumerate()
            .map(|(i, uri)| SlideMasterInfo::load(opc, uri, i))
            .collect::<Result<Vec<_>>>()?;

        let defaults = SlideDefaults {
            fallback_dpi: options.fallback_dpi,
            table_style: options.table_style.clone(),
        };

        let mut slides = Vec::with_capacity(entries.len());
        for (slide_id, uri) in entries {
            let layout = opc
                .get_part(&uri)?
                .rels()
                .part_with_reltype(RT::SLIDE_LAYOUT)
                .ok()
                .and_then(|rel| rel.target_partname().ok())
                .and_then(|layout_uri| find_layout(&masters, &layout_uri));
            if layout.is_none() {
                warn!(slide = %uri, "slide layout relationship does not resolve");
            }
            let layout = layout.map(|id| (id, &masters[id.master].layouts[id.layout]));
            slides.push(MutableSlide::load(opc, &uri, slide_id, layout, defaults.clone())?);
        }

        let next_slide_id = slides
            .iter()
            .map(|s| s.slide_id + 1)
            .max()
            .unwrap_or(FIRST_SLIDE_ID)
            .max(FIRST_SLIDE_ID);
        let (slide_width, slide_height) = size.unwrap_or((options.slide_width, options.slide_height));

        debug!(
            masters = masters.len(),
            slides = slides.len(),
            "presentation loaded"
        );

        Ok(Self {
            package: package.into_opc(),
            pres_partname,
            masters,
            slides,
            slide_width,
            slide_height,
            notes_master,
            lang: options.lang.clone(),
            defaults,
            next_slide_id,
        })
    }

    /// Apply the language, image and table defaults of `options`.
    ///
    /// The slide size is left alone; use the size setters for that.
    pub fn apply_options(&mut self, options: &DeckOptions) {
        self.lang = options.lang.clone();
        self.defaults = SlideDefaults {
            fallback_dpi: options.fallback_dpi,
            table_style: options.table_style.clone(),
        };
        for slide in &mut self.slides {
            slide.defaults = self.defaults.clone();
        }
    }

    pub fn slide_masters(&self) -> &[SlideMasterInfo] {
        &self.masters
    }

    /// Layouts of master `master`, empty when there is no such master.
    pub fn layouts(&self, master: usize) -> &[SlideLayoutInfo] {
        self.masters
            .get(master)
            .map(|m| m.layouts.as_slice())
            .unwrap_or_default()
    }

    pub fn layout(&self, id: LayoutId) -> Option<&SlideLayoutInfo> {
        self.masters.get(id.master)?.layouts.get(id.layout)
    }

    /// Partname of the notes master, if the deck has one.
    pub fn notes_master(&self) -> Option<&PackURI> {
        self.notes_master.as_ref()
    }

    pub fn slides(&self) -> &[MutableSlide] {
        &self.slides
    }

    pub fn slides_mut(&mut self) -> &mut [MutableSlide] {
        &mut self.slides
    }

    /// Get the number of slides.
    pub fn slide_count(&self) -> usize {
        self.slides.len()
    }

    pub fn slide(&self, index: usize) -> Option<&MutableSlide> {
        self.slides.get(index)
    }

    /// Get a mutable reference to a slide by index (0-based).
    pub fn slide_mut(&mut self, index: usize) -> Option<&mut MutableSlide> {
        self.slides.get_mut(index)
    }

    /// Get the slide width in EMUs.
    pub fn slide_width(&self) -> i64 {
        self.slide_width
    }

    /// Set the slide width in EMUs.
    pub fn set_slide_width(&mut self, width: i64) {
        self.slide_width = width;
    }

    /// Get the slide height in EMUs.
    pub fn slide_height(&self) -> i64 {
        self.slide_height
    }

    /// Set the slide height in EMUs.
    pub fn set_slide_height(&mut self, height: i64) {
        self.slide_height = height;
    }

    /// Language tag written on text runs.
    pub fn lang(&self) -> &str {
        &self.lang
    }

    /// The package the presentation was created from or read from.
    pub fn package(&self) -> &OpcPackage {
        &self.package
    }

    /// Add a new slide based on `layout`.
    pub fn add_slide(&mut self, layout: LayoutId) -> Result<&mut MutableSlide> {
        let info = self.layout(layout).ok_or_else(|| {
            OoxmlError::PartNotFound(format!(
                "slide layout {} of master {}",
                layout.layout, layout.master
            ))
        })?;
        let slide = MutableSlide::new(self.next_slide_id, layout, info, self.defaults.clone());
        debug!(slide_id = slide.slide_id, layout = %info.name, "slide added");
        self.next_slide_id += 1;
        self.slides.push(slide);
        let index = self.slides.len() - 1;
        Ok(&mut self.slides[index])
    }

    /// Drop every slide. Their parts are removed on the next save.
    pub fn clear_slides(&mut self) {
        self.slides.clear();
    }

    /// Save the presentation to a file.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        Ok(self.build_package()?.save(path)?)
    }

    /// Serialize the presentation to .pptx bytes.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(self.build_package()?.to_bytes()?)
    }

    /// Write the presentation as a .pptx archive to `writer`.
    pub fn write_to<W: Write>(&self, writer: W) -> Result<()> {
        Ok(PackageWriter::write_to_stream(writer, &self.build_package()?)?)
    }

    /// Copy of the package with the current slides written into it.
    fn build_package(&self) -> Result<OpcPackage> {
        let mut package = self.package.duplicate();

        // Detach the slide list; slides no longer present lose their parts.
        let kept: HashSet<&PackURI> = self.slides.iter().filter_map(|s| s.partname.as_ref()).collect();
        let old_slides: Vec<(String, Option<PackURI>)> = package
            .get_part(&self.pres_partname)?
            .rels()
            .all_with_reltype(RT::SLIDE)
            .map(|rel| (rel.r_id().to_string(), rel.target_partname().ok()))
            .collect();
        for (r_id, target) in old_slides {
            package
                .get_part_mut(&self.pres_partname)?
                .rels_mut()
                .remove(&r_id);
            if let Some(target) = target.filter(|t| !kept.contains(t)) {
                if let Some(removed) = package.remove_part(&target) {
                    for rel in removed.rels().all_with_reltype(RT::NOTES_SLIDE) {
                        if let Ok(notes) = rel.target_partname() {
                            package.remove_part(&notes);
                        }
                    }
                }
            }
        }

        let mut notes_master = self.notes_master.clone();
        let mut notes_master_r_id = None;
        if notes_master.is_none() && self.slides.iter().any(MutableSlide::has_notes) {
            let uri = template::add_notes_master(&mut package, &self.lang)?;
            notes_master_r_id = Some(
                package
                    .get_part_mut(&self.pres_partname)?
                    .relate_to(&uri, RT::NOTES_MASTER),
            );
            notes_master = Some(uri);
        }

        let mut media = MediaStore::from_package(&package);
        let mut entries = Vec::with_capacity(self.slides.len());
        for slide in &self.slides {
            let partname = self.write_slide(&mut package, &mut media, slide, notes_master.as_ref())?;
            let r_id = package
                .get_part_mut(&self.pres_partname)?
                .relate_to(&partname, RT::SLIDE);
            entries.push(SlideEntry {
                id: slide.slide_id,
                r_id,
            });
        }

        let pres = package.get_part_mut(&self.pres_partname)?;
        let xml = rewrite_presentation_xml(
            pres.blob(),
            &PresentationUpdate {
                slides: &entries,
                slide_size: (self.slide_width, self.slide_height),
                notes_master_r_id: notes_master_r_id.as_deref(),
            },
        )?;
        pres.set_blob(xml);

        let pruned = package.prune_unreachable();
        debug!(slides = entries.len(), pruned, "package assembled");
        Ok(package)
    }

    /// Write one slide (and its notes) into `package`, returning its partname.
    fn write_slide(
        &self,
        package: &mut OpcPackage,
        media: &mut MediaStore,
        slide: &MutableSlide,
        notes_master: Option<&PackURI>,
    ) -> Result<PackURI> {
        if let Some(partname) = slide.partname.as_ref().filter(|_| !slide.modified) {
            return Ok(partname.clone());
        }

        let partname = match &slide.partname {
            Some(partname) => partname.clone(),
            None => {
                let partname = package.next_partname("/ppt/slides/slide%d.xml")?;
                let mut part = XmlPart::new(partname.clone(), CT::PML_SLIDE.to_string(), Vec::new());
                if let Some(layout) = slide.layout.and_then(|id| self.layout(id)) {
                    part.relate_to(&layout.partname, RT::SLIDE_LAYOUT);
                }
                package.add_part(Box::new(part));
                partname
            },
        };

        let xml = {
            let mut mapper = RelationshipMapper::new(package, media, partname.clone(), &self.lang);
            slide.to_xml(&mut mapper)?
        };
        package.get_part_mut(&partname)?.set_blob(xml.into_bytes());

        if slide.has_notes() {
            let existing = package
                .get_part(&partname)?
                .rels()
                .part_with_reltype(RT::NOTES_SLIDE)
                .ok()
                .and_then(|rel| rel.target_partname().ok())
                .filter(|uri| package.contains_part(uri));
            let notes_partname = match existing {
                Some(uri) => uri,
                None => {
                    let uri = package.next_partname("/ppt/notesSlides/notesSlide%d.xml")?;
                    let mut part = XmlPart::new(uri.clone(), CT::PML_NOTES_SLIDE.to_string(), Vec::new());
                    if let Some(master) = notes_master {
                        part.relate_to(master, RT::NOTES_MASTER);
                    }
                    part.relate_to(&partname, RT::SLIDE);
                    package.add_part(Box::new(part));
                    package
                        .get_part_mut(&partname)?
                        .relate_to(&uri, RT::NOTES_SLIDE);
                    uri
                },
            };

            let xml = {
                let mut mapper =
                    RelationshipMapper::new(package, media, notes_partname.clone(), &self.lang);
                slide.notes_xml(&mut mapper)?
            };
            if let Some(xml) = xml {
                package.get_part_mut(&notes_partname)?.set_blob(xml.into_bytes());
            }
        }

        Ok(partname)
    }
}

/// Position of the layout stored at `partname`.
fn find_layout(masters: &[SlideMasterInfo], partname: &PackURI) -> Option<LayoutId> {
    masters.iter().enumerate().find_map(|(m, master)| {
        master
            .layouts
            .iter()
            .position(|layout| &layout.partname == partname)
            .map(|l| LayoutId { master: m, layout: l })
    })
}
