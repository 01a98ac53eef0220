//! Read-only introspection of a deck as nested serde records.
//!
//! Lengths are reported in points. Attributes the backend does not carry,
//! such as the geometry of a placeholder that inherits nothing, are left out
//! of the record instead of failing the walk.
//!
//! ```
//! use slidecraft::ooxml::pptx::MutablePresentation;
//! use slidecraft::tree::presentation_tree;
//!
//! let pres = MutablePresentation::new()?;
//! let tree = presentation_tree(&pres);
//! assert_eq!(tree.slides_count, 0);
//! assert_eq!(tree.slide_width, 720.0);
//! # Ok::<(), slidecraft::Error>(())
//! ```

use serde::Serialize;
use tracing::trace;

use crate::common::unit::emu_to_pt_f64;
use crate::ooxml::pptx::shapes::{
    ColorSpec, RunProperties, TableBody, TextBody, TextParagraph, TextRun,
};
use crate::ooxml::pptx::{
    MutablePresentation, MutableShape, MutableSlide, ShapeKind, SlideLayoutInfo, SlideMasterInfo,
};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PresentationTree {
    pub slides_count: usize,
    pub masters_count: usize,
    pub layouts_count: usize,
    pub slide_width: f64,
    pub slide_height: f64,
    pub slides: Vec<SlideTree>,
    pub slide_masters: Vec<MasterTree>,
    /// Part name of the notes master
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes_master: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SlideTree {
    pub slide_id: u32,
    pub layout_name: String,
    pub shapes: Vec<ShapeTree>,
    pub placeholders: Vec<PlaceholderTree>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShapeTree {
    pub name: String,
    pub id: u32,
    #[serde(rename = "type")]
    pub shape_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub left: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    /// Degrees, clockwise
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rotation: Option<f64>,
    pub has_text_frame: bool,
    pub has_table: bool,
    pub has_chart: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_frame: Option<TextFrameTree>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table: Option<TableTree>,
    /// Children of a group
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shapes: Option<Vec<ShapeTree>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<PlaceholderTree>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextFrameTree {
    pub text: String,
    pub paragraphs: Vec<ParagraphTree>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParagraphTree {
    pub text: String,
    pub level: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alignment: Option<String>,
    pub runs: Vec<RunTree>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunTree {
    pub text: String,
    pub font: FontTree,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hyperlink: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FontTree {
    /// Points
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bold: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub italic: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub underline: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// `RRGGBB`, or the theme slot name for scheme colors
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableTree {
    pub rows: usize,
    pub columns: usize,
    pub first_row: bool,
    pub cells: Vec<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlaceholderTree {
    #[serde(rename = "type")]
    pub placeholder_type: String,
    pub idx: u32,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MasterTree {
    pub name: String,
    pub layouts: Vec<LayoutTree>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayoutTree {
    pub name: String,
    pub placeholders: Vec<PlaceholderTree>,
}

/// Walk `pres` into a [`PresentationTree`].
pub fn presentation_tree(pres: &MutablePresentation) -> PresentationTree {
    let masters = pres.slide_masters();
    PresentationTree {
        slides_count: pres.slide_count(),
        masters_count: masters.len(),
        layouts_count: masters.iter().map(|m| m.layouts.len()).sum(),
        slide_width: emu_to_pt_f64(pres.slide_width()),
        slide_height: emu_to_pt_f64(pres.slide_height()),
        slides: pres.slides().iter().map(slide_tree).collect(),
        slide_masters: masters.iter().map(master_tree).collect(),
        notes_master: pres.notes_master().map(|uri| uri.to_string()),
    }
}

fn slide_tree(slide: &MutableSlide) -> SlideTree {
    SlideTree {
        slide_id: slide.slide_id(),
        layout_name: slide.layout_name().to_string(),
        shapes: slide.shapes().iter().map(shape_tree).collect(),
        placeholders: placeholders(slide.shapes()),
        notes: slide.notes().map(TextBody::text),
    }
}

fn master_tree(master: &SlideMasterInfo) -> MasterTree {
    MasterTree {
        name: master.name.clone(),
        layouts: master.layouts.iter().map(layout_tree).collect(),
    }
}

fn layout_tree(layout: &SlideLayoutInfo) -> LayoutTree {
    LayoutTree {
        name: layout.name.clone(),
        placeholders: placeholders(&layout.shapes),
    }
}

fn placeholders(shapes: &[MutableShape]) -> Vec<PlaceholderTree> {
    shapes.iter().filter_map(placeholder_tree).collect()
}

fn placeholder_tree(shape: &MutableShape) -> Option<PlaceholderTree> {
    let ph = shape.placeholder.as_ref()?;
    Some(PlaceholderTree {
        placeholder_type: ph.ph_type.as_str().to_string(),
        idx: ph.idx,
        name: shape.name.clone(),
    })
}

fn shape_tree(shape: &MutableShape) -> ShapeTree {
    let xfrm = shape.effective_xfrm();
    if xfrm.is_none() {
        trace!(shape = shape.shape_id, name = %shape.name, "no geometry, range skipped");
    }
    let text_frame = shape.text_body().map(text_frame_tree);
    let table = shape.table().map(table_tree);
    let children = match &shape.kind {
        ShapeKind::Group { children } => Some(children.iter().map(shape_tree).collect()),
        _ => None,
    };
    let shape_type = shape.kind_name();

    ShapeTree {
        name: shape.name.clone(),
        id: shape.shape_id,
        shape_type: shape_type.to_string(),
        left: xfrm.map(|x| emu_to_pt_f64(x.x)),
        top: xfrm.map(|x| emu_to_pt_f64(x.y)),
        width: xfrm.map(|x| emu_to_pt_f64(x.cx)),
        height: xfrm.map(|x| emu_to_pt_f64(x.cy)),
        rotation: xfrm.map(|x| x.rotation()),
        has_text_frame: matches!(shape.kind, ShapeKind::AutoShape { .. }),
        has_table: table.is_some(),
        has_chart: shape_type == "chart",
        text_frame,
        table,
        shapes: children,
        placeholder: placeholder_tree(shape),
    }
}

fn text_frame_tree(body: &TextBody) -> TextFrameTree {
    TextFrameTree {
        text: body.text(),
        paragraphs: body.paragraphs.iter().map(paragraph_tree).collect(),
    }
}

fn paragraph_tree(para: &TextParagraph) -> ParagraphTree {
    ParagraphTree {
        text: para.text(),
        level: para.level,
        alignment: para.alignment.map(|a| a.as_str().to_string()),
        runs: para.runs.iter().map(run_tree).collect(),
    }
}

fn run_tree(run: &TextRun) -> RunTree {
    RunTree {
        text: run.text.clone(),
        font: font_tree(&run.props),
        hyperlink: run.props.hyperlink.as_ref().map(|h| h.address.clone()),
    }
}

fn font_tree(props: &RunProperties) -> FontTree {
    FontTree {
        size: props.size.map(|sz| f64::from(sz) / 100.0),
        bold: props.bold,
        italic: props.italic,
        underline: props.underline,
        name: props.typeface.clone(),
        color: props.color.as_ref().map(|c| match c {
            ColorSpec::Rgb(rgb) => rgb.to_hex(),
            ColorSpec::Scheme(slot) => slot.clone(),
        }),
    }
}

fn table_tree(table: &TableBody) -> TableTree {
    TableTree {
        rows: table.row_count(),
        columns: table.column_count(),
        first_row: table.first_row,
        cells: table
            .rows
            .iter()
            .map(|row| row.cells.iter().map(|cell| cell.text.text()).collect())
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ooxml::pptx::LayoutId;
    use crate::ooxml::pptx::shapes::{HyperlinkSpec, Xfrm};

    #[test]
    fn test_empty_deck() {
        let pres = MutablePresentation::new().unwrap();
        let tree = presentation_tree(&pres);
        assert_eq!(tree.slides_count, 0);
        assert_eq!(tree.masters_count, 1);
        assert_eq!(tree.layouts_count, 11);
        assert_eq!(tree.slide_height, 540.0);
        assert_eq!(tree.slide_masters[0].layouts[0].name, "Title Slide");
        assert_eq!(
            tree.notes_master.as_deref(),
            Some("/ppt/notesMasters/notesMaster1.xml")
        );
        assert!(!tree.slide_masters[0].layouts[0].placeholders.is_empty());
    }

    #[test]
    fn test_textbox_in_points() {
        let mut pres = MutablePresentation::new().unwrap();
        let slide = pres.add_slide(LayoutId { master: 0, layout: 6 }).unwrap();
        let shape = slide.add_textbox(914_400, 457_200, 1_828_800, 12_700);
        if let Some(body) = shape.text_body_mut() {
            body.set_text("Hi");
            let run = &mut body.paragraphs[0].runs[0];
            run.props.size = Some(1800);
            run.props.bold = Some(true);
            run.props.hyperlink = Some(HyperlinkSpec {
                address: "https://example.com".to_string(),
            });
        }
        slide.set_notes("remember");

        let tree = presentation_tree(&pres);
        let slide = &tree.slides[0];
        assert_eq!(slide.layout_name, "Blank");
        assert_eq!(slide.notes.as_deref(), Some("remember"));
        let shape = slide.shapes.last().unwrap();
        assert_eq!(shape.shape_type, "text_box");
        assert_eq!(shape.left, Some(72.0));
        assert_eq!(shape.top, Some(36.0));
        assert_eq!(shape.width, Some(144.0));
        assert_eq!(shape.height, Some(1.0));
        assert!(shape.has_text_frame);
        let run = &shape.text_frame.as_ref().unwrap().paragraphs[0].runs[0];
        assert_eq!(run.text, "Hi");
        assert_eq!(run.font.size, Some(18.0));
        assert_eq!(run.font.bold, Some(true));
        assert_eq!(run.hyperlink.as_deref(), Some("https://example.com"));
    }

    #[test]
    fn test_missing_geometry_is_omitted() {
        let mut shape = MutableShape::new(
            7,
            "Loose",
            ShapeKind::AutoShape {
                geometry: None,
                text_box: false,
                text: None,
            },
        );
        let json = serde_json::to_value(shape_tree(&shape)).unwrap();
        assert_eq!(json["type"], "auto_shape");
        assert!(json.get("left").is_none());
        assert!(json.get("text_frame").is_none());
        assert!(json.get("placeholder").is_none());

        shape.inherited_xfrm = Some(Xfrm::new(0, 0, 12_700, 25_400));
        let tree = shape_tree(&shape);
        assert_eq!(tree.height, Some(2.0));
        assert_eq!(tree.rotation, Some(0.0));
    }

    #[test]
    fn test_table_and_group() {
        let mut table = TableBody::new(2, 2, 914_400, 914_400, "");
        table.rows[1].cells[0].text.set_text("b1");
        let inner = MutableShape::new(3, "Grid", ShapeKind::Table(table));
        let group = MutableShape::new(2, "Group", ShapeKind::Group { children: vec![inner] });

        let tree = shape_tree(&group);
        assert_eq!(tree.shape_type, "group");
        let children = tree.shapes.unwrap();
        assert!(children[0].has_table);
        let grid = children[0].table.as_ref().unwrap();
        assert_eq!((grid.rows, grid.columns), (2, 2));
        assert_eq!(grid.cells[1][0], "b1");
    }
}
