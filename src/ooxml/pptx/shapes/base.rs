//! The shape model shared by masters, layouts and slides.

use crate::common::xml::XmlNode;
use crate::ooxml::opc::Relationships;
use crate::ooxml::pptx::shapes::fill::{FillSpec, LineSpec};
use crate::ooxml::pptx::shapes::picture::ImageSource;
use crate::ooxml::pptx::shapes::table::TableBody;
use crate::ooxml::pptx::shapes::textframe::TextBody;
use tracing::warn;

/// Graphic data URI of a table frame.
pub const TABLE_URI: &str = "http://schemas.openxmlformats.org/drawingml/2006/table";
/// Graphic data URI of a chart frame.
pub const CHART_URI: &str = "http://schemas.openxmlformats.org/drawingml/2006/chart";

/// Position, size and rotation of a shape, in EMU.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Xfrm {
    pub x: i64,
    pub y: i64,
    pub cx: i64,
    pub cy: i64,
    /// Clockwise rotation in 60000ths of a degree
    pub rot: i64,
}

impl Xfrm {
    pub fn new(x: i64, y: i64, cx: i64, cy: i64) -> Self {
        Self { x, y, cx, cy, rot: 0 }
    }

    /// Parse `a:xfrm` / `p:xfrm`. Returns `None` when offset or extent is absent.
    pub fn from_xml(node: &XmlNode) -> Option<Self> {
        let off = node.child("off")?;
        let ext = node.child("ext")?;
        Some(Self {
            x: off.attr_i64("x")?,
            y: off.attr_i64("y")?,
            cx: ext.attr_i64("cx")?,
            cy: ext.attr_i64("cy")?,
            rot: node.attr_i64("rot").unwrap_or(0),
        })
    }

    /// Rotation in degrees.
    #[inline]
    pub fn rotation(&self) -> f64 {
        self.rot as f64 / 60_000.0
    }
}

/// Placeholder type (`p:ph/@type`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlaceholderType {
    Title,
    CenterTitle,
    SubTitle,
    Body,
    Object,
    Chart,
    Table,
    ClipArt,
    Diagram,
    Media,
    Picture,
    SlideImage,
    Date,
    Footer,
    SlideNumber,
    Header,
}

impl PlaceholderType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::CenterTitle => "ctrTitle",
            Self::SubTitle => "subTitle",
            Self::Body => "body",
            Self::Object => "obj",
            Self::Chart => "chart",
            Self::Table => "tbl",
            Self::ClipArt => "clipArt",
            Self::Diagram => "dgm",
            Self::Media => "media",
            Self::Picture => "pic",
            Self::SlideImage => "sldImg",
            Self::Date => "dt",
            Self::Footer => "ftr",
            Self::SlideNumber => "sldNum",
            Self::Header => "hdr",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Some(match value {
            "title" => Self::Title,
            "ctrTitle" => Self::CenterTitle,
            "subTitle" => Self::SubTitle,
            "body" => Self::Body,
            "obj" => Self::Object,
            "chart" => Self::Chart,
            "tbl" => Self::Table,
            "clipArt" => Self::ClipArt,
            "dgm" => Self::Diagram,
            "media" => Self::Media,
            "pic" => Self::Picture,
            "sldImg" => Self::SlideImage,
            "dt" => Self::Date,
            "ftr" => Self::Footer,
            "sldNum" => Self::SlideNumber,
            "hdr" => Self::Header,
            _ => return None,
        })
    }

    /// Base of the shape name PowerPoint gives a placeholder of this type.
    pub fn basename(&self) -> &'static str {
        match self {
            Self::Title | Self::CenterTitle => "Title",
            Self::SubTitle => "Subtitle",
            Self::Body => "Text Placeholder",
            Self::Object => "Content Placeholder",
            Self::Chart => "Chart Placeholder",
            Self::Table => "Table Placeholder",
            Self::ClipArt => "ClipArt Placeholder",
            Self::Diagram => "SmartArt Placeholder",
            Self::Media => "Media Placeholder",
            Self::Picture => "Picture Placeholder",
            Self::SlideImage => "Slide Image Placeholder",
            Self::Date => "Date Placeholder",
            Self::Footer => "Footer Placeholder",
            Self::SlideNumber => "Slide Number Placeholder",
            Self::Header => "Header Placeholder",
        }
    }

    /// Date, footer and slide number placeholders are not copied onto new slides.
    #[inline]
    pub fn is_footer_kind(&self) -> bool {
        matches!(self, Self::Date | Self::Footer | Self::SlideNumber)
    }

    /// Type of the master placeholder a layout placeholder inherits from.
    pub fn master_type(&self) -> Self {
        match self {
            Self::Title | Self::CenterTitle => Self::Title,
            Self::Date | Self::Footer | Self::SlideNumber => *self,
            _ => Self::Body,
        }
    }

    /// Whether a picture may be inserted into a placeholder of this type.
    #[inline]
    pub fn accepts_picture(&self) -> bool {
        matches!(self, Self::Picture | Self::Object | Self::ClipArt)
    }
}

/// Placeholder properties of a shape (`p:nvPr/p:ph`).
#[derive(Debug, Clone, PartialEq)]
pub struct PlaceholderFormat {
    pub ph_type: PlaceholderType,
    pub idx: u32,
    /// `vert` for vertical text placeholders
    pub orient: Option<String>,
    /// `half` or `quarter`
    pub sz: Option<String>,
}

impl PlaceholderFormat {
    /// Parse `p:ph`. A missing type means `obj`.
    pub fn from_xml(ph: &XmlNode) -> Self {
        let ph_type = match ph.attr("type") {
            None => PlaceholderType::Object,
            Some(value) => PlaceholderType::parse(value).unwrap_or_else(|| {
                warn!(ph_type = value, "unknown placeholder type, reading as obj");
                PlaceholderType::Object
            }),
        };
        Self {
            ph_type,
            idx: ph
                .attr_i64("idx")
                .and_then(|idx| u32::try_from(idx).ok())
                .unwrap_or(0),
            orient: ph.attr("orient").map(str::to_string),
            sz: ph.attr("sz").map(str::to_string),
        }
    }

    /// Shape name for a placeholder of this format with `shape_id`.
    pub fn shape_name(&self, shape_id: u32) -> String {
        let basename = self.ph_type.basename();
        if self.orient.as_deref() == Some("vert") {
            format!("Vertical {} {}", basename, shape_id.saturating_sub(1))
        } else {
            format!("{} {}", basename, shape_id.saturating_sub(1))
        }
    }
}

/// What a shape is.
#[derive(Debug, Clone, PartialEq)]
pub enum ShapeKind {
    /// `p:sp`: auto shapes, text boxes and most placeholders
    AutoShape {
        /// Preset geometry, e.g. `rect`
        geometry: Option<String>,
        text_box: bool,
        text: Option<TextBody>,
    },
    /// `p:pic`
    Picture { image: ImageSource },
    /// `p:graphicFrame` holding `a:tbl`
    Table(TableBody),
    /// Any other `p:graphicFrame`: charts, diagrams, OLE objects
    GraphicFrame { uri: String },
    /// `p:grpSp`
    Group { children: Vec<MutableShape> },
    /// `p:cxnSp`
    Connector,
}

/// A shape with its common properties.
#[derive(Debug, Clone, PartialEq)]
pub struct MutableShape {
    pub shape_id: u32,
    pub name: String,
    pub descr: Option<String>,
    /// Own geometry, `None` when inherited
    pub xfrm: Option<Xfrm>,
    /// Geometry of the layout or master placeholder this one inherits from
    pub inherited_xfrm: Option<Xfrm>,
    pub placeholder: Option<PlaceholderFormat>,
    pub fill: Option<FillSpec>,
    pub line: Option<LineSpec>,
    pub kind: ShapeKind,
}

impl MutableShape {
    pub fn new(shape_id: u32, name: impl Into<String>, kind: ShapeKind) -> Self {
        Self {
            shape_id,
            name: name.into(),
            descr: None,
            xfrm: None,
            inherited_xfrm: None,
            placeholder: None,
            fill: None,
            line: None,
            kind,
        }
    }

    /// Parse one child of an `p:spTree` or `p:grpSp`. Returns `None` for
    /// non-shape children such as `p:nvGrpSpPr` or extension lists.
    pub fn from_xml(node: &XmlNode, rels: Option<&Relationships>) -> Option<Self> {
        let (nv_name, pr_name) = match node.local_name() {
            "sp" => ("nvSpPr", "spPr"),
            "pic" => ("nvPicPr", "spPr"),
            "graphicFrame" => ("nvGraphicFramePr", "xfrm"),
            "grpSp" => ("nvGrpSpPr", "grpSpPr"),
            "cxnSp" => ("nvCxnSpPr", "spPr"),
            _ => return None,
        };

        let nv = node.child(nv_name);
        let c_nv_pr = nv.and_then(|nv| nv.child("cNvPr"));
        let shape_id = c_nv_pr
            .and_then(|c| c.attr_i64("id"))
            .and_then(|id| u32::try_from(id).ok())
            .unwrap_or(0);
        let name = c_nv_pr
            .and_then(|c| c.attr("name"))
            .unwrap_or_default()
            .to_string();
        let descr = c_nv_pr.and_then(|c| c.attr("descr")).map(str::to_string);
        let placeholder = nv
            .and_then(|nv| nv.child("nvPr"))
            .and_then(|nv_pr| nv_pr.child("ph"))
            .map(PlaceholderFormat::from_xml);

        let props = node.child(pr_name);
        let xfrm = match node.local_name() {
            "graphicFrame" => props.and_then(Xfrm::from_xml),
            _ => props.and_then(|p| p.child("xfrm")).and_then(Xfrm::from_xml),
        };
        let (fill, line) = match node.local_name() {
            "graphicFrame" => (None, None),
            _ => (
                props.and_then(FillSpec::from_properties),
                props
                    .and_then(|p| p.child("ln"))
                    .map(LineSpec::from_xml)
                    .filter(|ln| !ln.is_empty()),
            ),
        };

        let kind = match node.local_name() {
            "sp" => ShapeKind::AutoShape {
                geometry: props
                    .and_then(|p| p.child("prstGeom"))
                    .and_then(|g| g.attr("prst"))
                    .map(str::to_string),
                text_box: nv
                    .and_then(|nv| nv.child("cNvSpPr"))
                    .and_then(|c| c.attr_bool("txBox"))
                    .unwrap_or(false),
                text: node.child("txBody").map(|body| TextBody::from_xml(body, rels)),
            },
            "pic" => ShapeKind::Picture {
                image: ImageSource::from_blip_fill(node.child("blipFill"), rels),
            },
            "graphicFrame" => {
                let graphic_data = node.find(&["graphic", "graphicData"]);
                let uri = graphic_data
                    .and_then(|g| g.attr("uri"))
                    .unwrap_or_default()
                    .to_string();
                match graphic_data.and_then(|g| g.child("tbl")) {
                    Some(tbl) => ShapeKind::Table(TableBody::from_xml(tbl, rels)),
                    None => ShapeKind::GraphicFrame { uri },
                }
            },
            "grpSp" => ShapeKind::Group {
                children: node
                    .elements()
                    .filter_map(|child| MutableShape::from_xml(child, rels))
                    .collect(),
            },
            _ => ShapeKind::Connector,
        };

        Some(Self {
            shape_id,
            name,
            descr,
            xfrm,
            inherited_xfrm: None,
            placeholder,
            fill,
            line,
            kind,
        })
    }

    /// Own geometry, else the inherited one.
    #[inline]
    pub fn effective_xfrm(&self) -> Option<Xfrm> {
        self.xfrm.or(self.inherited_xfrm)
    }

    #[inline]
    pub fn is_placeholder(&self) -> bool {
        self.placeholder.is_some()
    }

    pub fn text_body(&self) -> Option<&TextBody> {
        match &self.kind {
            ShapeKind::AutoShape { text, .. } => text.as_ref(),
            _ => None,
        }
    }

    /// The text body, created empty on first access for auto shapes.
    pub fn text_body_mut(&mut self) -> Option<&mut TextBody> {
        match &mut self.kind {
            ShapeKind::AutoShape { text, .. } => Some(text.get_or_insert_with(TextBody::default)),
            _ => None,
        }
    }

    pub fn table(&self) -> Option<&TableBody> {
        match &self.kind {
            ShapeKind::Table(table) => Some(table),
            _ => None,
        }
    }

    pub fn table_mut(&mut self) -> Option<&mut TableBody> {
        match &mut self.kind {
            ShapeKind::Table(table) => Some(table),
            _ => None,
        }
    }

    /// Short name of the shape kind, as reported in presentation trees.
    pub fn kind_name(&self) -> &'static str {
        match &self.kind {
            ShapeKind::AutoShape { .. } if self.is_placeholder() => "placeholder",
            ShapeKind::AutoShape { text_box: true, .. } => "text_box",
            ShapeKind::AutoShape { .. } => "auto_shape",
            ShapeKind::Picture { .. } => "picture",
            ShapeKind::Table(_) => "table",
            ShapeKind::GraphicFrame { uri } if uri == CHART_URI => "chart",
            ShapeKind::GraphicFrame { .. } => "graphic_frame",
            ShapeKind::Group { .. } => "group",
            ShapeKind::Connector => "connector",
        }
    }
}

/// Parse the shapes of a `p:spTree`, in document order.
pub fn parse_shape_tree(sp_tree: &XmlNode, rels: Option<&Relationships>) -> Vec<MutableShape> {
    sp_tree
        .elements()
        .filter_map(|child| MutableShape::from_xml(child, rels))
        .collect()
}
