//! Presentation template module.
//!
//! Generates the default deck: one "Office Theme" master with the eleven
//! standard layouts, a theme, a notes master and the document property parts.
//! Layout and master shapes are described with the shape model and serialized
//! by the shape writer.

use crate::ooxml::error::{OoxmlError, Result};
use crate::ooxml::opc::constants::{content_type as ct, relationship_type as rt};
use crate::ooxml::opc::{OpcPackage, PackURI, Part, XmlPart};
use crate::ooxml::pptx::shapes::{
    Alignment, MutableShape, PlaceholderFormat, PlaceholderType, ShapeKind, TextBody,
    TextParagraph, TextRun, Xfrm,
};
use crate::ooxml::pptx::writer::shape::{PlainContext, xml_err};
use std::fmt::Write as FmtWrite;

pub(crate) const XML_DECL: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#;

/// Namespace declarations of every PresentationML part.
pub(crate) const PML_NS_DECLS: &str = concat!(
    r#"xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" "#,
    r#"xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" "#,
    r#"xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main""#
);

/// Name of the default theme and master.
pub const DEFAULT_THEME_NAME: &str = "Office Theme";

/// First `sldLayoutId` value; layout ids share a number space with the master id.
const FIRST_LAYOUT_ID: u32 = 2_147_483_649;
const MASTER_ID: u32 = 2_147_483_648;

const CLR_MAP: &str = r#"bg1="lt1" tx1="dk1" bg2="lt2" tx2="dk2" accent1="accent1" accent2="accent2" accent3="accent3" accent4="accent4" accent5="accent5" accent6="accent6" hlink="hlink" folHlink="folHlink""#;

pub(crate) const GROUP_PROPS: &str = concat!(
    r#"<p:nvGrpSpPr><p:cNvPr id="1" name=""/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr>"#,
    r#"<p:grpSpPr><a:xfrm><a:off x="0" y="0"/><a:ext cx="0" cy="0"/>"#,
    r#"<a:chOff x="0" y="0"/><a:chExt cx="0" cy="0"/></a:xfrm></p:grpSpPr>"#
);

/// A placeholder of a generated layout or master.
#[derive(Debug, Clone, Copy)]
struct PlaceholderSpec {
    ph_type: PlaceholderType,
    idx: u32,
    orient: Option<&'static str>,
    sz: Option<&'static str>,
    /// `None` inherits the master's geometry
    xfrm: Option<(i64, i64, i64, i64)>,
}

const fn ph(ph_type: PlaceholderType, idx: u32) -> PlaceholderSpec {
    PlaceholderSpec {
        ph_type,
        idx,
        orient: None,
        sz: None,
        xfrm: None,
    }
}

impl PlaceholderSpec {
    const fn at(mut self, x: i64, y: i64, cx: i64, cy: i64) -> Self {
        self.xfrm = Some((x, y, cx, cy));
        self
    }

    const fn size(mut self, sz: &'static str) -> Self {
        self.sz = Some(sz);
        self
    }

    const fn vertical(mut self) -> Self {
        self.orient = Some("vert");
        self
    }
}

use PlaceholderType as T;

const TITLE: PlaceholderSpec = ph(T::Title, 0);
const DATE: PlaceholderSpec = ph(T::Date, 10).size("half");
const FOOTER: PlaceholderSpec = ph(T::Footer, 11).size("quarter");
const SLIDE_NUMBER: PlaceholderSpec = ph(T::SlideNumber, 12).size("quarter");

const MASTER_PLACEHOLDERS: [PlaceholderSpec; 5] = [
    ph(T::Title, 0).at(457_200, 274_638, 8_229_600, 1_143_000),
    ph(T::Body, 1).at(457_200, 1_600_200, 8_229_600, 4_525_963),
    ph(T::Date, 2).size("half").at(457_200, 6_356_350, 2_133_600, 365_125),
    ph(T::Footer, 3).size("quarter").at(3_124_200, 6_356_350, 2_895_600, 365_125),
    ph(T::SlideNumber, 4).size("quarter").at(6_553_200, 6_356_350, 2_133_600, 365_125),
];

/// One of the standard layouts: name, `type` attribute and placeholders.
struct LayoutSpec {
    name: &'static str,
    kind: &'static str,
    placeholders: &'static [PlaceholderSpec],
}

/// The eleven standard layouts, in master order.
const LAYOUTS: [LayoutSpec; 11] = [
    LayoutSpec {
        name: "Title Slide",
        kind: "title",
        placeholders: &[
            ph(T::CenterTitle, 0).at(685_800, 2_130_425, 7_772_400, 1_470_025),
            ph(T::SubTitle, 1).at(1_371_600, 3_886_200, 6_400_000, 1_752_600),
            DATE,
            FOOTER,
            SLIDE_NUMBER,
        ],
    },
    LayoutSpec {
        name: "Title and Content",
        kind: "obj",
        placeholders: &[TITLE, ph(T::Object, 1), DATE, FOOTER, SLIDE_NUMBER],
    },
    LayoutSpec {
        name: "Section Header",
        kind: "secHead",
        placeholders: &[
            ph(T::Title, 0).at(722_313, 4_406_900, 7_772_400, 1_362_075),
            ph(T::Body, 1).at(722_313, 2_906_713, 7_772_400, 1_500_187),
            DATE,
            FOOTER,
            SLIDE_NUMBER,
        ],
    },
    LayoutSpec {
        name: "Two Content",
        kind: "twoObj",
        placeholders: &[
            TITLE,
            ph(T::Object, 1).size("half").at(457_200, 1_600_200, 4_038_600, 4_525_963),
            ph(T::Object, 2).size("half").at(4_648_200, 1_600_200, 4_038_600, 4_525_963),
            DATE,
            FOOTER,
            SLIDE_NUMBER,
        ],
    },
    LayoutSpec {
        name: "Comparison",
        kind: "twoTxTwoObj",
        placeholders: &[
            TITLE,
            ph(T::Body, 1).at(457_200, 1_535_113, 4_040_188, 639_762),
            ph(T::Object, 2).size("half").at(457_200, 2_174_875, 4_040_188, 3_951_288),
            ph(T::Body, 3).size("quarter").at(4_645_025, 1_535_113, 4_041_775, 639_762),
            ph(T::Object, 4).size("quarter").at(4_645_025, 2_174_875, 4_041_775, 3_951_288),
            DATE,
            FOOTER,
            SLIDE_NUMBER,
        ],
    },
    LayoutSpec {
        name: "Title Only",
        kind: "titleOnly",
        placeholders: &[TITLE, DATE, FOOTER, SLIDE_NUMBER],
    },
    LayoutSpec {
        name: "Blank",
        kind: "blank",
        placeholders: &[DATE, FOOTER, SLIDE_NUMBER],
    },
    LayoutSpec {
        name: "Content with Caption",
        kind: "objTx",
        placeholders: &[
            ph(T::Title, 0).at(457_200, 273_050, 3_008_313, 1_162_050),
            ph(T::Object, 1).at(3_575_050, 273_050, 5_111_750, 5_853_113),
            ph(T::Body, 2).size("half").at(457_200, 1_435_100, 3_008_313, 4_691_063),
            DATE,
            FOOTER,
            SLIDE_NUMBER,
        ],
    },
    LayoutSpec {
        name: "Picture with Caption",
        kind: "picTx",
        placeholders: &[
            ph(T::Title, 0).at(1_792_288, 4_800_600, 5_486_400, 566_738),
            ph(T::Picture, 1).at(1_792_288, 612_775, 5_486_400, 4_114_800),
            ph(T::Body, 2).size("half").at(1_792_288, 5_367_338, 5_486_400, 804_862),
            DATE,
            FOOTER,
            SLIDE_NUMBER,
        ],
    },
    LayoutSpec {
        name: "Title and Vertical Text",
        kind: "vertTx",
        placeholders: &[TITLE, ph(T::Body, 1).vertical(), DATE, FOOTER, SLIDE_NUMBER],
    },
    LayoutSpec {
        name: "Vertical Title and Text",
        kind: "vertTitleAndTx",
        placeholders: &[
            ph(T::Title, 0).vertical().at(6_629_400, 274_638, 2_057_400, 5_851_525),
            ph(T::Body, 1).vertical().at(457_200, 274_638, 6_019_800, 5_851_525),
            DATE,
            FOOTER,
            SLIDE_NUMBER,
        ],
    },
];

/// Names of the standard layouts, in master order.
pub fn default_layout_names() -> Vec<&'static str> {
    LAYOUTS.iter().map(|layout| layout.name).collect()
}

fn prompt_paragraphs(ph_type: PlaceholderType) -> Vec<TextParagraph> {
    let line = |text: &str, level: u8| TextParagraph {
        level,
        alignment: None,
        runs: vec![TextRun::new(text)],
    };
    match ph_type {
        T::Title | T::CenterTitle => vec![line("Click to edit Master title style", 0)],
        T::SubTitle => vec![line("Click to edit Master subtitle style", 0)],
        T::Body | T::Object => vec![
            line("Click to edit Master text styles", 0),
            line("Second level", 1),
            line("Third level", 2),
            line("Fourth level", 3),
            line("Fifth level", 4),
        ],
        T::Picture => vec![line("Click icon to add picture", 0)],
        T::Date => vec![TextParagraph::default()],
        T::Footer => vec![TextParagraph {
            alignment: Some(Alignment::Center),
            ..Default::default()
        }],
        T::SlideNumber => vec![TextParagraph {
            alignment: Some(Alignment::Right),
            ..Default::default()
        }],
        _ => vec![TextParagraph::default()],
    }
}

fn placeholder_shape(spec: &PlaceholderSpec, shape_id: u32) -> MutableShape {
    let format = PlaceholderFormat {
        ph_type: spec.ph_type,
        idx: spec.idx,
        orient: spec.orient.map(str::to_string),
        sz: spec.sz.map(str::to_string),
    };
    let text = match spec.ph_type {
        T::SlideImage => None,
        other => Some(TextBody {
            paragraphs: prompt_paragraphs(other),
            ..Default::default()
        }),
    };
    let mut shape = MutableShape::new(
        shape_id,
        format.shape_name(shape_id),
        ShapeKind::AutoShape {
            geometry: None,
            text_box: false,
            text,
        },
    );
    shape.xfrm = spec.xfrm.map(|(x, y, cx, cy)| Xfrm::new(x, y, cx, cy));
    shape.placeholder = Some(format);
    shape
}

fn write_shape_tree(xml: &mut String, specs: &[PlaceholderSpec], lang: &str) -> Result<()> {
    xml.push_str("<p:spTree>");
    xml.push_str(GROUP_PROPS);
    let mut ctx = PlainContext { lang };
    for (i, spec) in specs.iter().enumerate() {
        placeholder_shape(spec, i as u32 + 2).to_xml(xml, &mut ctx)?;
    }
    xml.push_str("</p:spTree>");
    Ok(())
}

fn slide_layout_xml(layout: &LayoutSpec, lang: &str) -> Result<String> {
    let mut xml = String::with_capacity(4096);
    xml.push_str(XML_DECL);
    write!(
        xml,
        r#"<p:sldLayout {} type="{}" preserve="1"><p:cSld name="{}">"#,
        PML_NS_DECLS, layout.kind, layout.name
    )
    .map_err(xml_err)?;
    write_shape_tree(&mut xml, layout.placeholders, lang)?;
    xml.push_str("</p:cSld><p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr></p:sldLayout>");
    Ok(xml)
}

fn level_props(xml: &mut String, level: u8, size: u32, bullet: Option<&str>) -> Result<()> {
    let indent = 342_900 + 400_050 * level as i64;
    let written = match bullet {
        Some(bu) => write!(
            xml,
            r#"<a:lvl{lvl}pPr marL="{mar}" indent="-{hang}" algn="l" defTabSz="914400" rtl="0" eaLnBrk="1" latinLnBrk="0" hangingPunct="1"><a:spcBef><a:spcPct val="20000"/></a:spcBef><a:buFont typeface="Arial"/><a:buChar char="{bu}"/><a:defRPr sz="{size}" kern="1200"><a:solidFill><a:schemeClr val="tx1"/></a:solidFill><a:latin typeface="+mn-lt"/><a:ea typeface="+mn-ea"/><a:cs typeface="+mn-cs"/></a:defRPr></a:lvl{lvl}pPr>"#,
            lvl = level + 1,
            mar = indent,
            hang = if level == 0 { 342_900 } else { 285_750 },
            bu = bu,
            size = size,
        ),
        None => write!(
            xml,
            r#"<a:lvl{lvl}pPr marL="{mar}" algn="l" defTabSz="914400" rtl="0" eaLnBrk="1" latinLnBrk="0" hangingPunct="1"><a:defRPr sz="{size}" kern="1200"><a:solidFill><a:schemeClr val="tx1"/></a:solidFill><a:latin typeface="+mn-lt"/><a:ea typeface="+mn-ea"/><a:cs typeface="+mn-cs"/></a:defRPr></a:lvl{lvl}pPr>"#,
            lvl = level + 1,
            mar = 457_200 * level as i64,
            size = size,
        ),
    };
    written.map_err(xml_err)
}

fn slide_master_xml(layout_r_ids: &[String], lang: &str) -> Result<String> {
    let mut xml = String::with_capacity(12_288);
    xml.push_str(XML_DECL);
    write!(xml, "<p:sldMaster {}><p:cSld>", PML_NS_DECLS).map_err(xml_err)?;
    xml.push_str(r#"<p:bg><p:bgRef idx="1001"><a:schemeClr val="bg1"/></p:bgRef></p:bg>"#);
    write_shape_tree(&mut xml, &MASTER_PLACEHOLDERS, lang)?;
    write!(xml, "</p:cSld><p:clrMap {}/>", CLR_MAP).map_err(xml_err)?;

    xml.push_str("<p:sldLayoutIdLst>");
    for (i, r_id) in layout_r_ids.iter().enumerate() {
        write!(
            xml,
            r#"<p:sldLayoutId id="{}" r:id="{}"/>"#,
            FIRST_LAYOUT_ID + i as u32,
            r_id
        )
        .map_err(xml_err)?;
    }
    xml.push_str("</p:sldLayoutIdLst>");

    xml.push_str("<p:txStyles><p:titleStyle>");
    xml.push_str(r#"<a:lvl1pPr algn="ctr" defTabSz="914400" rtl="0" eaLnBrk="1" latinLnBrk="0" hangingPunct="1"><a:spcBef><a:spcPct val="0"/></a:spcBef><a:buNone/><a:defRPr sz="4400" kern="1200"><a:solidFill><a:schemeClr val="tx1"/></a:solidFill><a:latin typeface="+mj-lt"/><a:ea typeface="+mj-ea"/><a:cs typeface="+mj-cs"/></a:defRPr></a:lvl1pPr>"#);
    xml.push_str("</p:titleStyle><p:bodyStyle>");
    let bullets = ["\u{2022}", "\u{2013}", "\u{2022}", "\u{2013}", "\u{bb}"];
    let sizes = [3200, 2800, 2400, 2000, 2000];
    for level in 0..5u8 {
        level_props(&mut xml, level, sizes[level as usize], Some(bullets[level as usize]))?;
    }
    xml.push_str("</p:bodyStyle><p:otherStyle>");
    write!(xml, r#"<a:defPPr><a:defRPr lang="{}"/></a:defPPr>"#, lang).map_err(xml_err)?;
    for level in 0..5u8 {
        level_props(&mut xml, level, 1800, None)?;
    }
    xml.push_str("</p:otherStyle></p:txStyles></p:sldMaster>");
    Ok(xml)
}

const NOTES_PLACEHOLDERS: [PlaceholderSpec; 6] = [
    ph(T::Header, 0).size("quarter").at(0, 0, 2_971_800, 457_200),
    ph(T::Date, 1).at(3_884_613, 0, 2_971_800, 457_200),
    ph(T::SlideImage, 2).at(1_143_000, 685_800, 4_572_000, 3_429_000),
    ph(T::Body, 3).size("quarter").at(685_800, 4_343_400, 5_486_400, 4_114_800),
    ph(T::Footer, 4).size("quarter").at(0, 8_685_213, 2_971_800, 457_200),
    ph(T::SlideNumber, 5).size("quarter").at(3_884_613, 8_685_213, 2_971_800, 457_200),
];

/// Notes master XML.
pub fn notes_master_xml(lang: &str) -> Result<String> {
    let mut xml = String::with_capacity(4096);
    xml.push_str(XML_DECL);
    write!(xml, "<p:notesMaster {}><p:cSld>", PML_NS_DECLS).map_err(xml_err)?;
    xml.push_str(r#"<p:bg><p:bgRef idx="1001"><a:schemeClr val="bg1"/></p:bgRef></p:bg>"#);
    write_shape_tree(&mut xml, &NOTES_PLACEHOLDERS, lang)?;
    write!(xml, "</p:cSld><p:clrMap {}/><p:notesStyle>", CLR_MAP).map_err(xml_err)?;
    level_props(&mut xml, 0, 1200, None)?;
    xml.push_str("</p:notesStyle></p:notesMaster>");
    Ok(xml)
}

/// A minimal but complete theme.
pub fn theme_xml(name: &str) -> String {
    let mut xml = String::with_capacity(4096);
    xml.push_str(XML_DECL);
    xml.push_str(r#"<a:theme xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" name=""#);
    xml.push_str(&crate::common::xml::escape_xml(name));
    xml.push_str(r#""><a:themeElements><a:clrScheme name="Office">"#);
    xml.push_str(r#"<a:dk1><a:sysClr val="windowText" lastClr="000000"/></a:dk1><a:lt1><a:sysClr val="window" lastClr="FFFFFF"/></a:lt1>"#);
    for (slot, rgb) in [
        ("dk2", "1F497D"),
        ("lt2", "EEECE1"),
        ("accent1", "4F81BD"),
        ("accent2", "C0504D"),
        ("accent3", "9BBB59"),
        ("accent4", "8064A2"),
        ("accent5", "4BACC6"),
        ("accent6", "F79646"),
        ("hlink", "0000FF"),
        ("folHlink", "800080"),
    ] {
        xml.push_str(&format!(r#"<a:{slot}><a:srgbClr val="{rgb}"/></a:{slot}>"#));
    }
    xml.push_str(r#"</a:clrScheme><a:fontScheme name="Office">"#);
    xml.push_str(r#"<a:majorFont><a:latin typeface="Calibri"/><a:ea typeface=""/><a:cs typeface=""/></a:majorFont>"#);
    xml.push_str(r#"<a:minorFont><a:latin typeface="Calibri"/><a:ea typeface=""/><a:cs typeface=""/></a:minorFont>"#);
    xml.push_str(r#"</a:fontScheme><a:fmtScheme name="Office"><a:fillStyleLst>"#);
    let solid = r#"<a:solidFill><a:schemeClr val="phClr"/></a:solidFill>"#;
    for _ in 0..3 {
        xml.push_str(solid);
    }
    xml.push_str("</a:fillStyleLst><a:lnStyleLst>");
    for w in [9525, 25400, 38100] {
        xml.push_str(&format!(r#"<a:ln w="{w}" cap="flat" cmpd="sng" algn="ctr">{solid}<a:prstDash val="solid"/></a:ln>"#));
    }
    xml.push_str("</a:lnStyleLst><a:effectStyleLst>");
    for _ in 0..3 {
        xml.push_str("<a:effectStyle><a:effectLst/></a:effectStyle>");
    }
    xml.push_str("</a:effectStyleLst><a:bgFillStyleLst>");
    for _ in 0..3 {
        xml.push_str(solid);
    }
    xml.push_str("</a:bgFillStyleLst></a:fmtScheme></a:themeElements>");
    xml.push_str("<a:objectDefaults/><a:extraClrSchemeLst/></a:theme>");
    xml
}

fn presentation_xml(
    master_r_id: &str,
    notes_master_r_id: &str,
    width: i64,
    height: i64,
    lang: &str,
) -> Result<String> {
    let mut xml = String::with_capacity(2048);
    xml.push_str(XML_DECL);
    write!(xml, r#"<p:presentation {} saveSubsetFonts="1">"#, PML_NS_DECLS).map_err(xml_err)?;
    write!(
        xml,
        r#"<p:sldMasterIdLst><p:sldMasterId id="{}" r:id="{}"/></p:sldMasterIdLst>"#,
        MASTER_ID, master_r_id
    )
    .map_err(xml_err)?;
    write!(
        xml,
        r#"<p:notesMasterIdLst><p:notesMasterId r:id="{}"/></p:notesMasterIdLst>"#,
        notes_master_r_id
    )
    .map_err(xml_err)?;
    write!(
        xml,
        r#"<p:sldSz cx="{}" cy="{}"/><p:notesSz cx="6858000" cy="9144000"/>"#,
        width, height
    )
    .map_err(xml_err)?;
    write!(xml, r#"<p:defaultTextStyle><a:defPPr><a:defRPr lang="{}"/></a:defPPr>"#, lang)
        .map_err(xml_err)?;
    for level in 0..5u8 {
        level_props(&mut xml, level, 1800, None)?;
    }
    xml.push_str("</p:defaultTextStyle></p:presentation>");
    Ok(xml)
}

fn pres_props_xml() -> String {
    format!("{}<p:presentationPr {}/>", XML_DECL, PML_NS_DECLS)
}

fn view_props_xml() -> String {
    format!(
        concat!(
            "{}<p:viewPr {}>",
            r#"<p:normalViewPr><p:restoredLeft sz="15620"/><p:restoredTop sz="94660"/></p:normalViewPr>"#,
            r#"<p:slideViewPr><p:cSldViewPr><p:cViewPr varScale="1"><p:scale><a:sx n="100" d="100"/><a:sy n="100" d="100"/></p:scale><p:origin x="0" y="0"/></p:cViewPr><p:guideLst/></p:cSldViewPr></p:slideViewPr>"#,
            r#"<p:notesTextViewPr><p:cViewPr><p:scale><a:sx n="1" d="1"/><a:sy n="1" d="1"/></p:scale><p:origin x="0" y="0"/></p:cViewPr></p:notesTextViewPr>"#,
            r#"<p:gridSpacing cx="76200" cy="76200"/></p:viewPr>"#
        ),
        XML_DECL, PML_NS_DECLS
    )
}

fn table_styles_xml(default_style: &str) -> String {
    format!(
        r#"{}<a:tblStyleLst xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" def="{}"/>"#,
        XML_DECL, default_style
    )
}

fn core_props_xml() -> String {
    let now = chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ");
    format!(
        concat!(
            "{decl}<cp:coreProperties ",
            r#"xmlns:cp="http://schemas.openxmlformats.org/package/2006/metadata/core-properties" "#,
            r#"xmlns:dc="http://purl.org/dc/elements/1.1/" xmlns:dcterms="http://purl.org/dc/terms/" "#,
            r#"xmlns:dcmitype="http://purl.org/dc/dcmitype/" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance">"#,
            "<dc:title>PowerPoint Presentation</dc:title><dc:creator>slidecraft</dc:creator>",
            "<cp:lastModifiedBy>slidecraft</cp:lastModifiedBy><cp:revision>1</cp:revision>",
            r#"<dcterms:created xsi:type="dcterms:W3CDTF">{now}</dcterms:created>"#,
            r#"<dcterms:modified xsi:type="dcterms:W3CDTF">{now}</dcterms:modified>"#,
            "</cp:coreProperties>"
        ),
        decl = XML_DECL,
        now = now
    )
}

fn app_props_xml() -> String {
    format!(
        concat!(
            "{}<Properties ",
            r#"xmlns="http://schemas.openxmlformats.org/officeDocument/2006/extended-properties" "#,
            r#"xmlns:vt="http://schemas.openxmlformats.org/officeDocument/2006/docPropsVTypes">"#,
            "<TotalTime>0</TotalTime><Words>0</Words><Application>slidecraft</Application>",
            "<PresentationFormat>On-screen Show (4:3)</PresentationFormat><Paragraphs>0</Paragraphs>",
            "<Slides>0</Slides><Notes>0</Notes><HiddenSlides>0</HiddenSlides><MMClips>0</MMClips>",
            "<ScaleCrop>false</ScaleCrop><LinksUpToDate>false</LinksUpToDate><SharedDoc>false</SharedDoc>",
            "<HyperlinksChanged>false</HyperlinksChanged><AppVersion>16.0000</AppVersion></Properties>"
        ),
        XML_DECL
    )
}

fn uri(name: &str) -> Result<PackURI> {
    PackURI::new(name).map_err(OoxmlError::InvalidFormat)
}

fn xml_part(name: &str, content_type: &str, xml: String) -> Result<XmlPart> {
    Ok(XmlPart::new(uri(name)?, content_type.to_string(), xml.into_bytes()))
}

/// Add a notes master and its theme to `package`, returning the notes master partname.
pub(crate) fn add_notes_master(package: &mut OpcPackage, lang: &str) -> Result<PackURI> {
    let theme_uri = package.next_partname("/ppt/theme/theme%d.xml")?;
    let mut notes_master = xml_part(
        "/ppt/notesMasters/notesMaster1.xml",
        ct::PML_NOTES_MASTER,
        notes_master_xml(lang)?,
    )?;
    notes_master.relate_to(&theme_uri, rt::THEME);
    let partname = notes_master.partname().clone();
    package.add_part(Box::new(XmlPart::new(
        theme_uri,
        ct::OFC_THEME.to_string(),
        theme_xml(DEFAULT_THEME_NAME).into_bytes(),
    )));
    package.add_part(Box::new(notes_master));
    Ok(partname)
}

/// Build the default empty deck.
pub fn default_package(width: i64, height: i64, lang: &str, table_style: &str) -> Result<OpcPackage> {
    let mut package = OpcPackage::new();

    // Layouts and master.
    let master_uri = uri("/ppt/slideMasters/slideMaster1.xml")?;
    let mut master = XmlPart::new(master_uri.clone(), ct::PML_SLIDE_MASTER.to_string(), Vec::new());
    let mut layout_r_ids = Vec::with_capacity(LAYOUTS.len());
    for (i, layout) in LAYOUTS.iter().enumerate() {
        let layout_uri = PackURI::from_template("/ppt/slideLayouts/slideLayout%d.xml", i as u32 + 1)
            .map_err(OoxmlError::InvalidFormat)?;
        let mut part = XmlPart::new(
            layout_uri.clone(),
            ct::PML_SLIDE_LAYOUT.to_string(),
            slide_layout_xml(layout, lang)?.into_bytes(),
        );
        part.relate_to(&master_uri, rt::SLIDE_MASTER);
        layout_r_ids.push(master.relate_to(&layout_uri, rt::SLIDE_LAYOUT));
        package.add_part(Box::new(part));
    }
    let theme_uri = uri("/ppt/theme/theme1.xml")?;
    master.relate_to(&theme_uri, rt::THEME);
    master.set_blob(slide_master_xml(&layout_r_ids, lang)?.into_bytes());
    package.add_part(Box::new(master));
    package.add_part(Box::new(xml_part(
        theme_uri.as_str(),
        ct::OFC_THEME,
        theme_xml(DEFAULT_THEME_NAME),
    )?));

    // Presentation part and its satellites.
    let pres_uri = uri("/ppt/presentation.xml")?;
    let mut pres = XmlPart::new(pres_uri.clone(), ct::PML_PRESENTATION_MAIN.to_string(), Vec::new());
    let master_r_id = pres.relate_to(&master_uri, rt::SLIDE_MASTER);
    for (name, content_type, reltype, xml) in [
        ("/ppt/presProps.xml", ct::PML_PRES_PROPS, rt::PRES_PROPS, pres_props_xml()),
        ("/ppt/viewProps.xml", ct::PML_VIEW_PROPS, rt::VIEW_PROPS, view_props_xml()),
        ("/ppt/tableStyles.xml", ct::PML_TABLE_STYLES, rt::TABLE_STYLES, table_styles_xml(table_style)),
    ] {
        let part = xml_part(name, content_type, xml)?;
        pres.relate_to(part.partname(), reltype);
        package.add_part(Box::new(part));
    }
    pres.relate_to(&theme_uri, rt::THEME);
    let notes_master_uri = add_notes_master(&mut package, lang)?;
    let notes_master_r_id = pres.relate_to(&notes_master_uri, rt::NOTES_MASTER);
    pres.set_blob(
        presentation_xml(&master_r_id, &notes_master_r_id, width, height, lang)?.into_bytes(),
    );
    package.add_part(Box::new(pres));
    package.relate_to(&pres_uri, rt::OFFICE_DOCUMENT);

    // Document properties.
    let core = xml_part("/docProps/core.xml", ct::OPC_CORE_PROPERTIES, core_props_xml())?;
    package.relate_to(core.partname(), rt::CORE_PROPERTIES);
    package.add_part(Box::new(core));
    let app = xml_part("/docProps/app.xml", ct::OFC_EXTENDED_PROPERTIES, app_props_xml())?;
    package.relate_to(app.partname(), rt::EXTENDED_PROPERTIES);
    package.add_part(Box::new(app));

    Ok(package)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::xml::XmlNode;

    #[test]
    fn test_default_package_structure() {
        let package = default_package(9_144_000, 6_858_000, "en-US", "{X}").unwrap();
        let main = package.main_document_part().unwrap();
        assert_eq!(main.content_type(), ct::PML_PRESENTATION_MAIN);

        let master = package
            .get_part(&PackURI::new("/ppt/slideMasters/slideMaster1.xml").unwrap())
            .unwrap();
        assert_eq!(master.rels().all_with_reltype(rt::SLIDE_LAYOUT).count(), 11);

        // The second theme belongs to the notes master.
        assert!(package.contains_part(&PackURI::new("/ppt/theme/theme2.xml").unwrap()));
        assert!(package.contains_part(&PackURI::new("/ppt/notesMasters/notesMaster1.xml").unwrap()));
    }

    #[test]
    fn test_generated_parts_are_well_formed() {
        let package = default_package(9_144_000, 6_858_000, "en-US", "{X}").unwrap();
        for part in package.iter_parts() {
            XmlNode::parse(part.blob())
                .unwrap_or_else(|e| panic!("{} is not well formed: {}", part.partname(), e));
        }

        let layout = package
            .get_part(&PackURI::new("/ppt/slideLayouts/slideLayout5.xml").unwrap())
            .unwrap();
        let root = XmlNode::parse(layout.blob()).unwrap();
        assert_eq!(root.attr("type"), Some("twoTxTwoObj"));
        assert_eq!(root.child("cSld").unwrap().attr("name"), Some("Comparison"));
    }

    #[test]
    fn test_layout_names() {
        let names = default_layout_names();
        assert_eq!(names.len(), 11);
        assert_eq!(names[0], "Title Slide");
        assert_eq!(names[10], "Vertical Title and Text");
    }
}
