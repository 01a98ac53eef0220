/// Slide parts and related types.
///
/// This module reads slide masters, slide layouts, slides and notes slides
/// into the shape model.
use crate::ooxml::error::{OoxmlError, Result};
use crate::ooxml::opc::constants::relationship_type as RT;
use crate::ooxml::opc::{OpcPackage, PackURI, Part, parse_xml};
use crate::ooxml::pptx::shapes::{
    FillSpec, MutableShape, PlaceholderType, TextBody, Xfrm, parse_shape_tree,
};
use tracing::warn;

/// A slide layout of a master.
#[derive(Debug, Clone)]
pub struct SlideLayoutInfo {
    pub partname: PackURI,
    /// `p:cSld/@name`
    pub name: String,
    /// `p:sldLayout/@type`, e.g. `title` or `obj`
    pub layout_type: Option<String>,
    /// Shapes in document order, placeholders carrying geometry inherited from the master
    pub shapes: Vec<MutableShape>,
}

impl SlideLayoutInfo {
    /// Load the layout part at `partname`.
    pub fn load(package: &OpcPackage, partname: &PackURI, master_shapes: &[MutableShape]) -> Result<Self> {
        let part = package.get_part(partname)?;
        let root = parse_xml(part)?;
        let c_sld = root.child("cSld");

        let mut shapes = c_sld
            .and_then(|c| c.child("spTree"))
            .map(|tree| parse_shape_tree(tree, Some(part.rels())))
            .unwrap_or_default();
        inherit_from_master(&mut shapes, master_shapes);

        Ok(Self {
            partname: partname.clone(),
            name: c_sld
                .and_then(|c| c.attr("name"))
                .unwrap_or_default()
                .to_string(),
            layout_type: root.attr("type").map(str::to_string),
            shapes,
        })
    }

    /// Placeholder shapes in document order.
    pub fn placeholders(&self) -> impl Iterator<Item = &MutableShape> {
        self.shapes.iter().filter(|shape| shape.is_placeholder())
    }
}

/// A slide master and its layouts.
#[derive(Debug, Clone)]
pub struct SlideMasterInfo {
    pub partname: PackURI,
    /// `p:cSld/@name`, else the name of the master's theme
    pub name: String,
    pub shapes: Vec<MutableShape>,
    /// Layouts in `p:sldLayoutIdLst` order
    pub layouts: Vec<SlideLayoutInfo>,
}

impl SlideMasterInfo {
    /// Load the master at `partname` together with its layouts.
    ///
    /// `position` is only used to name a master that has neither a name nor a theme.
    pub fn load(package: &OpcPackage, partname: &PackURI, position: usize) -> Result<Self> {
        let part = package.get_part(partname)?;
        let root = parse_xml(part)?;
        let c_sld = root.child("cSld");
        let shapes = c_sld
            .and_then(|c| c.child("spTree"))
            .map(|tree| parse_shape_tree(tree, Some(part.rels())))
            .unwrap_or_default();

        let name = match c_sld.and_then(|c| c.attr("name")).filter(|n| !n.is_empty()) {
            Some(name) => name.to_string(),
            None => theme_name(package, part).unwrap_or_else(|| format!("Slide Master {}", position + 1)),
        };

        let mut layouts = Vec::new();
        if let Some(list) = root.child("sldLayoutIdLst") {
            for entry in list.children_named("sldLayoutId") {
                let Some(r_id) = entry.prefixed_attr("id") else {
                    continue;
                };
                let layout_uri = match part.related_partname(r_id) {
                    Ok(uri) if package.contains_part(&uri) => uri,
                    _ => {
                        warn!(master = %partname, r_id, "slide layout relationship does not resolve, skipping");
                        continue;
                    },
                };
                layouts.push(SlideLayoutInfo::load(package, &layout_uri, &shapes)?);
            }
        }

        Ok(Self {
            partname: partname.clone(),
            name,
            shapes,
            layouts,
        })
    }

    pub fn layout_names(&self) -> Vec<&str> {
        self.layouts.iter().map(|layout| layout.name.as_str()).collect()
    }
}

fn theme_name(package: &OpcPackage, master: &dyn Part) -> Option<String> {
    let rel = master.rels().part_with_reltype(RT::THEME).ok()?;
    let theme = package.get_part(&rel.target_partname().ok()?).ok()?;
    let root = parse_xml(theme).ok()?;
    root.attr("name").filter(|n| !n.is_empty()).map(str::to_string)
}

fn same_type(a: PlaceholderType, b: PlaceholderType) -> bool {
    a == b || (a.master_type() == PlaceholderType::Title && b.master_type() == PlaceholderType::Title)
}

/// Give layout placeholders without own geometry the geometry of the master
/// placeholder of the same (master) type.
pub(crate) fn inherit_from_master(shapes: &mut [MutableShape], master: &[MutableShape]) {
    for shape in shapes.iter_mut() {
        let Some(ph_type) = shape.placeholder.as_ref().map(|ph| ph.ph_type.master_type()) else {
            continue;
        };
        shape.inherited_xfrm = master
            .iter()
            .find(|m| m.placeholder.as_ref().is_some_and(|ph| ph.ph_type == ph_type))
            .and_then(MutableShape::effective_xfrm);
    }
}

/// Geometry a slide placeholder inherits: the layout placeholder with the same
/// idx, else the first one of the same type.
pub(crate) fn inherited_geometry(shape: &MutableShape, layout: &[MutableShape]) -> Option<Xfrm> {
    let ph = shape.placeholder.as_ref()?;
    let by_idx = layout
        .iter()
        .find(|l| l.placeholder.as_ref().is_some_and(|lph| lph.idx == ph.idx && ph.idx != 0));
    let parent = by_idx.or_else(|| {
        layout
            .iter()
            .find(|l| l.placeholder.as_ref().is_some_and(|lph| same_type(lph.ph_type, ph.ph_type)))
    });
    parent.and_then(MutableShape::effective_xfrm)
}

/// The content of a slide part.
#[derive(Debug, Clone, Default)]
pub struct SlideContent {
    pub name: Option<String>,
    pub shapes: Vec<MutableShape>,
    /// Solid background fill, if the slide overrides the master background
    pub background: Option<FillSpec>,
}

/// Parse a slide part.
pub fn parse_slide(part: &dyn Part) -> Result<SlideContent> {
    let root = parse_xml(part)?;
    let c_sld = root
        .child("cSld")
        .ok_or_else(|| OoxmlError::InvalidFormat(format!("{}: missing p:cSld", part.partname())))?;

    Ok(SlideContent {
        name: c_sld.attr("name").map(str::to_string),
        shapes: c_sld
            .child("spTree")
            .map(|tree| parse_shape_tree(tree, Some(part.rels())))
            .unwrap_or_default(),
        background: c_sld
            .find(&["bg", "bgPr"])
            .and_then(FillSpec::from_properties),
    })
}

/// Text of the body placeholder of a notes slide.
pub fn parse_notes(part: &dyn Part) -> Result<Option<TextBody>> {
    let root = parse_xml(part)?;
    let shapes = root
        .find(&["cSld", "spTree"])
        .map(|tree| parse_shape_tree(tree, Some(part.rels())))
        .unwrap_or_default();
    Ok(shapes
        .into_iter()
        .find(|shape| {
            shape
                .placeholder
                .as_ref()
                .is_some_and(|ph| ph.ph_type == PlaceholderType::Body)
        })
        .and_then(|shape| shape.text_body().cloned()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ooxml::pptx::template::default_package;

    #[test]
    fn test_load_default_master() {
        let package = default_package(9_144_000, 6_858_000, "en-US", "{X}").unwrap();
        let uri = PackURI::new("/ppt/slideMasters/slideMaster1.xml").unwrap();
        let master = SlideMasterInfo::load(&package, &uri, 0).unwrap();

        assert_eq!(master.name, "Office Theme");
        assert_eq!(master.layouts.len(), 11);
        assert_eq!(master.layout_names()[1], "Title and Content");

        // "Title and Content" declares no geometry of its own.
        let layout = &master.layouts[1];
        assert_eq!(layout.layout_type.as_deref(), Some("obj"));
        let title = layout.placeholders().next().unwrap();
        assert_eq!(title.xfrm, None);
        assert_eq!(
            title.effective_xfrm(),
            Some(Xfrm::new(457_200, 274_638, 8_229_600, 1_143_000))
        );
        let content = layout.placeholders().nth(1).unwrap();
        assert_eq!(content.effective_xfrm().unwrap().y, 1_600_200);
    }

    #[test]
    fn test_slide_geometry_prefers_idx() {
        let package = default_package(9_144_000, 6_858_000, "en-US", "{X}").unwrap();
        let uri = PackURI::new("/ppt/slideMasters/slideMaster1.xml").unwrap();
        let master = SlideMasterInfo::load(&package, &uri, 0).unwrap();
        let two_content = &master.layouts[3];
        let right = two_content
            .placeholders()
            .find(|s| s.placeholder.as_ref().unwrap().idx == 2)
            .unwrap()
            .clone();

        let mut on_slide = right.clone();
        on_slide.xfrm = None;
        assert_eq!(
            inherited_geometry(&on_slide, &two_content.shapes).unwrap().x,
            4_648_200
        );
    }
}
