/// Slide types and implementation for PPTX presentations.
use crate::ooxml::error::Result;
use crate::ooxml::opc::constants::relationship_type as RT;
use crate::ooxml::opc::{OpcPackage, PackURI};
use crate::ooxml::pptx::parts::slide::inherited_geometry;
use crate::ooxml::pptx::parts::{SlideLayoutInfo, parse_notes, parse_slide};
use crate::ooxml::pptx::shapes::{
    AutoSize, BodyProperties, FillSpec, ImageSource, MutableShape, PlaceholderFormat,
    PlaceholderType, ShapeKind, TableBody, TextBody, Xfrm,
};
use crate::ooxml::pptx::template::{GROUP_PROPS, PML_NS_DECLS, XML_DECL};
use std::fmt::Write as FmtWrite;
use tracing::warn;

use super::shape::{XmlContext, write_fill, xml_err};

/// Position of a layout: index of its master, then index within the master.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LayoutId {
    pub master: usize,
    pub layout: usize,
}

/// Deck-wide values a slide needs when it creates shapes.
#[derive(Debug, Clone, PartialEq)]
pub struct SlideDefaults {
    /// Resolution assumed for images that record none
    pub fallback_dpi: u32,
    /// Table style GUID for new tables
    pub table_style: String,
}

/// A mutable slide in a presentation.
#[derive(Debug, Clone)]
pub struct MutableSlide {
    /// Slide ID (unique identifier)
    pub(crate) slide_id: u32,
    /// Part the slide was read from, `None` for new slides
    pub(crate) partname: Option<PackURI>,
    pub(crate) layout: Option<LayoutId>,
    pub(crate) layout_name: String,
    pub(crate) name: Option<String>,
    /// Shapes on the slide
    pub(crate) shapes: Vec<MutableShape>,
    /// Speaker notes for the slide
    pub(crate) notes: Option<TextBody>,
    /// Solid background overriding the master's
    pub(crate) background: Option<FillSpec>,
    pub(crate) defaults: SlideDefaults,
    /// Whether the slide has been modified
    pub(crate) modified: bool,
}

impl MutableSlide {
    /// Create a slide from `layout`, cloning its placeholders except date,
    /// footer and slide number.
    pub(crate) fn new(
        slide_id: u32,
        layout_id: LayoutId,
        layout: &SlideLayoutInfo,
        defaults: SlideDefaults,
    ) -> Self {
        let mut shapes = Vec::new();
        for source in layout.placeholders() {
            let Some(ph) = &source.placeholder else {
                continue;
            };
            if ph.ph_type.is_footer_kind() {
                continue;
            }
            // IDs: 1 = the shape tree itself
            let shape_id = shapes.len() as u32 + 2;
            let format = PlaceholderFormat {
                ph_type: ph.ph_type,
                idx: ph.idx,
                orient: ph.orient.clone(),
                sz: ph.sz.clone(),
            };
            let mut shape = MutableShape::new(
                shape_id,
                format.shape_name(shape_id),
                ShapeKind::AutoShape {
                    geometry: None,
                    text_box: false,
                    text: match ph.ph_type {
                        PlaceholderType::Picture => None,
                        _ => Some(TextBody::default()),
                    },
                },
            );
            shape.inherited_xfrm = source.effective_xfrm();
            shape.placeholder = Some(format);
            shapes.push(shape);
        }

        Self {
            slide_id,
            partname: None,
            layout: Some(layout_id),
            layout_name: layout.name.clone(),
            name: None,
            shapes,
            notes: None,
            background: None,
            defaults,
            modified: true,
        }
    }

    /// Read the slide stored at `partname`.
    pub(crate) fn load(
        package: &OpcPackage,
        partname: &PackURI,
        slide_id: u32,
        layout: Option<(LayoutId, &SlideLayoutInfo)>,
        defaults: SlideDefaults,
    ) -> Result<Self> {
        let part = package.get_part(partname)?;
        let content = parse_slide(part)?;

        let mut shapes = content.shapes;
        if let Some((_, info)) = layout {
            for shape in shapes.iter_mut().filter(|s| s.is_placeholder()) {
                shape.inherited_xfrm = inherited_geometry(shape, &info.shapes);
            }
        }

        let notes = match part.rels().part_with_reltype(RT::NOTES_SLIDE) {
            Ok(rel) => match rel.target_partname().ok().and_then(|uri| package.get_part(&uri).ok()) {
                Some(notes_part) => parse_notes(notes_part)?,
                None => {
                    warn!(slide = %partname, "notes slide relationship does not resolve");
                    None
                },
            },
            Err(_) => None,
        };

        Ok(Self {
            slide_id,
            partname: Some(partname.clone()),
            layout: layout.map(|(id, _)| id),
            layout_name: layout.map(|(_, info)| info.name.clone()).unwrap_or_default(),
            name: content.name,
            shapes,
            notes,
            background: content.background,
            defaults,
            modified: false,
        })
    }

    /// Get the slide ID.
    pub fn slide_id(&self) -> u32 {
        self.slide_id
    }

    /// Layout the slide was created from, if it could be resolved.
    pub fn layout(&self) -> Option<LayoutId> {
        self.layout
    }

    pub fn layout_name(&self) -> &str {
        &self.layout_name
    }

    /// `p:cSld/@name`, rarely set.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn partname(&self) -> Option<&PackURI> {
        self.partname.as_ref()
    }

    pub fn shapes(&self) -> &[MutableShape] {
        &self.shapes
    }

    pub fn shapes_mut(&mut self) -> &mut Vec<MutableShape> {
        self.modified = true;
        &mut self.shapes
    }

    /// Get the number of shapes.
    pub fn shape_count(&self) -> usize {
        self.shapes.len()
    }

    /// Shape with `shape_id`, searching groups too.
    pub fn shape(&self, shape_id: u32) -> Option<&MutableShape> {
        fn find(shapes: &[MutableShape], id: u32) -> Option<&MutableShape> {
            shapes.iter().find_map(|shape| {
                if shape.shape_id == id {
                    return Some(shape);
                }
                match &shape.kind {
                    ShapeKind::Group { children } => find(children, id),
                    _ => None,
                }
            })
        }
        find(&self.shapes, shape_id)
    }

    pub fn shape_mut(&mut self, shape_id: u32) -> Option<&mut MutableShape> {
        fn find(shapes: &mut [MutableShape], id: u32) -> Option<&mut MutableShape> {
            for shape in shapes.iter_mut() {
                if shape.shape_id == id {
                    return Some(shape);
                }
                if let ShapeKind::Group { children } = &mut shape.kind {
                    if let Some(found) = find(children, id) {
                        return Some(found);
                    }
                }
            }
            None
        }
        self.modified = true;
        find(&mut self.shapes, shape_id)
    }

    /// Placeholder shapes ordered by `idx`.
    pub fn placeholders(&self) -> Vec<&MutableShape> {
        let mut placeholders: Vec<&MutableShape> =
            self.shapes.iter().filter(|s| s.is_placeholder()).collect();
        placeholders.sort_by_key(|s| s.placeholder.as_ref().map_or(0, |ph| ph.idx));
        placeholders
    }

    /// Shape IDs of the placeholders, ordered by `idx`.
    pub fn placeholder_ids(&self) -> Vec<u32> {
        self.placeholders().iter().map(|s| s.shape_id).collect()
    }

    fn next_shape_id(&self) -> u32 {
        fn max_id(shapes: &[MutableShape]) -> u32 {
            shapes
                .iter()
                .map(|shape| match &shape.kind {
                    ShapeKind::Group { children } => shape.shape_id.max(max_id(children)),
                    _ => shape.shape_id,
                })
                .max()
                .unwrap_or(1)
        }
        max_id(&self.shapes) + 1
    }

    fn push_shape(&mut self, shape: MutableShape) -> &mut MutableShape {
        self.modified = true;
        let index = self.shapes.len();
        self.shapes.push(shape);
        &mut self.shapes[index]
    }

    /// Add an empty text box that grows to fit its text.
    pub fn add_textbox(&mut self, x: i64, y: i64, cx: i64, cy: i64) -> &mut MutableShape {
        let shape_id = self.next_shape_id();
        let mut shape = MutableShape::new(
            shape_id,
            format!("TextBox {}", shape_id - 1),
            ShapeKind::AutoShape {
                geometry: Some("rect".to_string()),
                text_box: true,
                text: Some(TextBody {
                    body: BodyProperties {
                        wrap: Some(false),
                        auto_size: Some(AutoSize::ShapeToFitText),
                        ..Default::default()
                    },
                    ..Default::default()
                }),
            },
        );
        shape.xfrm = Some(Xfrm::new(x, y, cx, cy));
        shape.fill = Some(FillSpec::NoFill);
        self.push_shape(shape)
    }

    /// Add a picture. A missing width or height is derived from the image's
    /// native size, keeping its aspect ratio.
    pub fn add_picture(
        &mut self,
        blob: Vec<u8>,
        x: i64,
        y: i64,
        cx: Option<i64>,
        cy: Option<i64>,
    ) -> Result<&mut MutableShape> {
        let (image, info) = ImageSource::from_bytes(blob, self.defaults.fallback_dpi)?;
        let (cx, cy) = info.scale(cx, cy);
        let shape_id = self.next_shape_id();
        let mut shape = MutableShape::new(
            shape_id,
            format!("Picture {}", shape_id - 1),
            ShapeKind::Picture { image },
        );
        shape.xfrm = Some(Xfrm::new(x, y, cx, cy));
        Ok(self.push_shape(shape))
    }

    /// Add an empty `rows` x `cols` table with evenly split columns and rows.
    pub fn add_table(
        &mut self,
        rows: usize,
        cols: usize,
        x: i64,
        y: i64,
        cx: i64,
        cy: i64,
    ) -> &mut MutableShape {
        let shape_id = self.next_shape_id();
        let table = TableBody::new(rows, cols, cx, cy, &self.defaults.table_style);
        let mut shape = MutableShape::new(
            shape_id,
            format!("Table {}", shape_id - 1),
            ShapeKind::Table(table),
        );
        shape.xfrm = Some(Xfrm::new(x, y, cx, cy));
        self.push_shape(shape)
    }

    /// Get the speaker notes for the slide.
    pub fn notes(&self) -> Option<&TextBody> {
        self.notes.as_ref()
    }

    /// Speaker notes, created empty on first access.
    pub fn notes_mut(&mut self) -> &mut TextBody {
        self.modified = true;
        self.notes.get_or_insert_with(TextBody::default)
    }

    /// Check if the slide has speaker notes.
    pub fn has_notes(&self) -> bool {
        self.notes.is_some()
    }

    /// Set speaker notes for the slide.
    pub fn set_notes(&mut self, text: &str) {
        self.notes_mut().set_text(text);
    }

    /// Get the background for the slide.
    pub fn background(&self) -> Option<&FillSpec> {
        self.background.as_ref()
    }

    /// Set a background for the slide; `None` falls back to the master's.
    pub fn set_background(&mut self, background: Option<FillSpec>) {
        self.background = background;
        self.modified = true;
    }

    /// Check if the slide has been modified.
    pub fn is_modified(&self) -> bool {
        self.modified
    }

    /// Generate slide XML content.
    pub(crate) fn to_xml(&self, ctx: &mut dyn XmlContext) -> Result<String> {
        let mut xml = String::with_capacity(4096);
        xml.push_str(XML_DECL);
        write!(xml, "<p:sld {}>", PML_NS_DECLS).map_err(xml_err)?;

        match &self.name {
            Some(name) => write!(
                xml,
                r#"<p:cSld name="{}">"#,
                crate::common::xml::escape_xml(name)
            )
            .map_err(xml_err)?,
            None => xml.push_str("<p:cSld>"),
        }

        // Background must come before the shape tree.
        if let Some(fill) = &self.background {
            xml.push_str("<p:bg><p:bgPr>");
            write_fill(&mut xml, fill)?;
            xml.push_str("<a:effectLst/></p:bgPr></p:bg>");
        }

        xml.push_str("<p:spTree>");
        xml.push_str(GROUP_PROPS);
        for shape in &self.shapes {
            shape.to_xml(&mut xml, ctx)?;
        }
        xml.push_str("</p:spTree></p:cSld>");
        xml.push_str("<p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr>");
        xml.push_str("</p:sld>");
        Ok(xml)
    }

    /// Generate notes slide XML content, `None` without notes.
    pub(crate) fn notes_xml(&self, ctx: &mut dyn XmlContext) -> Result<Option<String>> {
        let Some(notes) = &self.notes else {
            return Ok(None);
        };

        let mut slide_image = MutableShape::new(
            2,
            "Slide Image Placeholder 1",
            ShapeKind::AutoShape {
                geometry: None,
                text_box: false,
                text: None,
            },
        );
        slide_image.placeholder = Some(PlaceholderFormat {
            ph_type: PlaceholderType::SlideImage,
            idx: 0,
            orient: None,
            sz: None,
        });
        let mut body = MutableShape::new(
            3,
            "Notes Placeholder 2",
            ShapeKind::AutoShape {
                geometry: None,
                text_box: false,
                text: Some(notes.clone()),
            },
        );
        body.placeholder = Some(PlaceholderFormat {
            ph_type: PlaceholderType::Body,
            idx: 1,
            orient: None,
            sz: None,
        });

        let mut xml = String::with_capacity(2048);
        xml.push_str(XML_DECL);
        write!(xml, "<p:notes {}><p:cSld><p:spTree>", PML_NS_DECLS).map_err(xml_err)?;
        xml.push_str(GROUP_PROPS);
        slide_image.to_xml(&mut xml, ctx)?;
        body.to_xml(&mut xml, ctx)?;
        xml.push_str("</p:spTree></p:cSld>");
        xml.push_str("<p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr></p:notes>");
        Ok(Some(xml))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::xml::XmlNode;
    use crate::ooxml::opc::PackURI;
    use crate::ooxml::pptx::parts::SlideMasterInfo;
    use crate::ooxml::pptx::template::default_package;
    use crate::ooxml::pptx::writer::shape::PlainContext;

    fn defaults() -> SlideDefaults {
        SlideDefaults {
            fallback_dpi: 72,
            table_style: "{5C22544A-7EE6-4342-B048-85BDC9FD1C3A}".to_string(),
        }
    }

    fn layouts() -> SlideMasterInfo {
        let package = default_package(9_144_000, 6_858_000, "en-US", "{X}").unwrap();
        let uri = PackURI::new("/ppt/slideMasters/slideMaster1.xml").unwrap();
        SlideMasterInfo::load(&package, &uri, 0).unwrap()
    }

    #[test]
    fn test_new_slide_clones_placeholders() {
        let master = layouts();
        let layout = &master.layouts[1];
        let slide = MutableSlide::new(256, LayoutId { master: 0, layout: 1 }, layout, defaults());

        let names: Vec<&str> = slide.shapes().iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Title 1", "Content Placeholder 2"]);
        assert_eq!(slide.placeholder_ids(), vec![2, 3]);
        assert!(slide.shapes().iter().all(|s| s.xfrm.is_none()));
        assert_eq!(slide.shapes()[0].effective_xfrm().unwrap().x, 457_200);
        assert_eq!(slide.layout_name(), "Title and Content");
    }

    #[test]
    fn test_add_shapes_numbering() {
        let master = layouts();
        let mut slide = MutableSlide::new(256, LayoutId { master: 0, layout: 6 }, &master.layouts[6], defaults());
        assert_eq!(slide.shape_count(), 0);

        let text_box = slide.add_textbox(914_400, 914_400, 4_572_000, 1_828_800);
        assert_eq!(text_box.shape_id, 2);
        assert_eq!(text_box.name, "TextBox 1");

        let table = slide.add_table(3, 2, 0, 0, 1_000_001, 300_000);
        assert_eq!(table.name, "Table 2");
        let body = table.table().unwrap();
        assert_eq!(body.columns, vec![500_000, 500_001]);
        assert_eq!(body.row_count(), 3);
    }

    #[test]
    fn test_slide_xml() {
        let master = layouts();
        let mut slide = MutableSlide::new(256, LayoutId { master: 0, layout: 0 }, &master.layouts[0], defaults());
        slide.shapes_mut()[0].text_body_mut().unwrap().set_text("Hello & welcome");
        slide.set_background(Some(FillSpec::Solid(crate::ooxml::pptx::shapes::ColorSpec::Rgb(
            crate::common::RGBColor::new(0xFF, 0, 0),
        ))));
        slide.set_notes("Speak slowly");

        let mut ctx = PlainContext { lang: "en-US" };
        let xml = slide.to_xml(&mut ctx).unwrap();
        let root = XmlNode::parse(xml.as_bytes()).unwrap();
        assert!(root.find(&["cSld", "bg", "bgPr", "solidFill"]).is_some());
        assert!(xml.contains("Hello &amp; welcome"));

        let notes = slide.notes_xml(&mut ctx).unwrap().unwrap();
        let root = XmlNode::parse(notes.as_bytes()).unwrap();
        assert_eq!(root.text(), "Speak slowly");
    }
}
