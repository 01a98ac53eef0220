/// Shape serialization for PPTX slides, layouts and masters.
use crate::common::xml::escape_xml;
use crate::ooxml::error::{OoxmlError, Result};
use crate::ooxml::pptx::shapes::{
    AutoSize, BodyProperties, CellProperties, ColorSpec, FillSpec, ImageSource, LineSpec,
    MutableShape, PlaceholderFormat, PlaceholderType, RunProperties, ShapeKind, TABLE_URI,
    TableBody, TextBody, TextParagraph, Xfrm,
};
use std::fmt::Write as FmtWrite;
use tracing::warn;

#[inline]
pub(crate) fn xml_err(e: std::fmt::Error) -> OoxmlError {
    OoxmlError::Xml(e.to_string())
}

/// Relationship and language context needed while serializing shapes.
pub(crate) trait XmlContext {
    /// Language tag written on every run.
    fn lang(&self) -> &str;

    /// Relationship ID under which `image` is embedded.
    fn image_r_id(&mut self, image: &ImageSource) -> Result<String>;

    /// Relationship ID of an external hyperlink.
    fn hyperlink_r_id(&mut self, address: &str) -> Result<String>;
}

/// Context for parts that carry no relationships of their own, such as
/// the generated layouts and masters.
pub(crate) struct PlainContext<'a> {
    pub lang: &'a str,
}

impl XmlContext for PlainContext<'_> {
    fn lang(&self) -> &str {
        self.lang
    }

    fn image_r_id(&mut self, _image: &ImageSource) -> Result<String> {
        Err(OoxmlError::Other(
            "pictures are not supported in this part".to_string(),
        ))
    }

    fn hyperlink_r_id(&mut self, _address: &str) -> Result<String> {
        Err(OoxmlError::Other(
            "hyperlinks are not supported in this part".to_string(),
        ))
    }
}

impl MutableShape {
    /// Generate XML for this shape.
    pub(crate) fn to_xml(&self, xml: &mut String, ctx: &mut dyn XmlContext) -> Result<()> {
        match &self.kind {
            ShapeKind::AutoShape {
                geometry,
                text_box,
                text,
            } => {
                xml.push_str("<p:sp><p:nvSpPr>");
                self.write_c_nv_pr(xml)?;
                if *text_box {
                    xml.push_str(r#"<p:cNvSpPr txBox="1"/>"#);
                } else if self.is_placeholder() {
                    xml.push_str(r#"<p:cNvSpPr><a:spLocks noGrp="1"/></p:cNvSpPr>"#);
                } else {
                    xml.push_str("<p:cNvSpPr/>");
                }
                self.write_nv_pr(xml)?;
                xml.push_str("</p:nvSpPr>");

                xml.push_str("<p:spPr>");
                if let Some(xfrm) = self.xfrm {
                    write_xfrm(xml, "a:xfrm", &xfrm)?;
                }
                if let Some(prst) = geometry {
                    write!(
                        xml,
                        r#"<a:prstGeom prst="{}"><a:avLst/></a:prstGeom>"#,
                        escape_xml(prst)
                    )
                    .map_err(xml_err)?;
                }
                if let Some(fill) = &self.fill {
                    write_fill(xml, fill)?;
                }
                if let Some(line) = &self.line {
                    write_line(xml, line)?;
                }
                xml.push_str("</p:spPr>");

                if let Some(body) = text {
                    write_text_body(xml, "p:txBody", body, ctx)?;
                }
                xml.push_str("</p:sp>");
            },
            ShapeKind::Picture { image } => {
                let r_id = ctx.image_r_id(image)?;
                xml.push_str("<p:pic><p:nvPicPr>");
                self.write_c_nv_pr(xml)?;
                if self.is_placeholder() {
                    xml.push_str(
                        r#"<p:cNvPicPr><a:picLocks noGrp="1" noChangeAspect="1"/></p:cNvPicPr>"#,
                    );
                } else {
                    xml.push_str(r#"<p:cNvPicPr><a:picLocks noChangeAspect="1"/></p:cNvPicPr>"#);
                }
                self.write_nv_pr(xml)?;
                xml.push_str("</p:nvPicPr>");

                xml.push_str("<p:blipFill>");
                write!(xml, r#"<a:blip r:embed="{}"/>"#, r_id).map_err(xml_err)?;
                xml.push_str("<a:stretch><a:fillRect/></a:stretch>");
                xml.push_str("</p:blipFill>");

                xml.push_str("<p:spPr>");
                if let Some(xfrm) = self.xfrm {
                    write_xfrm(xml, "a:xfrm", &xfrm)?;
                }
                xml.push_str(r#"<a:prstGeom prst="rect"><a:avLst/></a:prstGeom>"#);
                if let Some(line) = &self.line {
                    write_line(xml, line)?;
                }
                xml.push_str("</p:spPr>");
                xml.push_str("</p:pic>");
            },
            ShapeKind::Table(table) => {
                xml.push_str("<p:graphicFrame><p:nvGraphicFramePr>");
                self.write_c_nv_pr(xml)?;
                xml.push_str(
                    r#"<p:cNvGraphicFramePr><a:graphicFrameLocks noGrp="1"/></p:cNvGraphicFramePr>"#,
                );
                self.write_nv_pr(xml)?;
                xml.push_str("</p:nvGraphicFramePr>");
                let xfrm = self.effective_xfrm().unwrap_or_default();
                write_xfrm(xml, "p:xfrm", &xfrm)?;
                write!(xml, r#"<a:graphic><a:graphicData uri="{}">"#, TABLE_URI)
                    .map_err(xml_err)?;
                write_table(xml, table, ctx)?;
                xml.push_str("</a:graphicData></a:graphic>");
                xml.push_str("</p:graphicFrame>");
            },
            ShapeKind::Group { children } => {
                xml.push_str("<p:grpSp><p:nvGrpSpPr>");
                self.write_c_nv_pr(xml)?;
                xml.push_str("<p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr>");
                xml.push_str("<p:grpSpPr>");
                if let Some(x) = self.xfrm {
                    write!(
                        xml,
                        r#"<a:xfrm><a:off x="{}" y="{}"/><a:ext cx="{}" cy="{}"/><a:chOff x="{}" y="{}"/><a:chExt cx="{}" cy="{}"/></a:xfrm>"#,
                        x.x, x.y, x.cx, x.cy, x.x, x.y, x.cx, x.cy
                    )
                    .map_err(xml_err)?;
                }
                xml.push_str("</p:grpSpPr>");
                for child in children {
                    child.to_xml(xml, ctx)?;
                }
                xml.push_str("</p:grpSp>");
            },
            ShapeKind::Connector => {
                xml.push_str("<p:cxnSp><p:nvCxnSpPr>");
                self.write_c_nv_pr(xml)?;
                xml.push_str("<p:cNvCxnSpPr/><p:nvPr/></p:nvCxnSpPr>");
                xml.push_str("<p:spPr>");
                if let Some(xfrm) = self.xfrm {
                    write_xfrm(xml, "a:xfrm", &xfrm)?;
                }
                xml.push_str(r#"<a:prstGeom prst="line"><a:avLst/></a:prstGeom>"#);
                if let Some(line) = &self.line {
                    write_line(xml, line)?;
                }
                xml.push_str("</p:spPr></p:cxnSp>");
            },
            ShapeKind::GraphicFrame { uri } => {
                // The frame's content lives in parts this model does not carry.
                warn!(shape = %self.name, uri = %uri, "skipping graphic frame without table");
            },
        }

        Ok(())
    }

    fn write_c_nv_pr(&self, xml: &mut String) -> Result<()> {
        write!(
            xml,
            r#"<p:cNvPr id="{}" name="{}""#,
            self.shape_id,
            escape_xml(&self.name)
        )
        .map_err(xml_err)?;
        if let Some(descr) = &self.descr {
            write!(xml, r#" descr="{}""#, escape_xml(descr)).map_err(xml_err)?;
        }
        xml.push_str("/>");
        Ok(())
    }

    fn write_nv_pr(&self, xml: &mut String) -> Result<()> {
        match &self.placeholder {
            Some(ph) => {
                xml.push_str("<p:nvPr>");
                write_ph(xml, ph)?;
                xml.push_str("</p:nvPr>");
            },
            None => xml.push_str("<p:nvPr/>"),
        }
        Ok(())
    }
}

fn write_ph(xml: &mut String, ph: &PlaceholderFormat) -> Result<()> {
    xml.push_str("<p:ph");
    if ph.ph_type != PlaceholderType::Object {
        write!(xml, r#" type="{}""#, ph.ph_type.as_str()).map_err(xml_err)?;
    }
    if let Some(orient) = &ph.orient {
        write!(xml, r#" orient="{}""#, escape_xml(orient)).map_err(xml_err)?;
    }
    if let Some(sz) = &ph.sz {
        write!(xml, r#" sz="{}""#, escape_xml(sz)).map_err(xml_err)?;
    }
    if ph.idx != 0 {
        write!(xml, r#" idx="{}""#, ph.idx).map_err(xml_err)?;
    }
    xml.push_str("/>");
    Ok(())
}

pub(crate) fn write_xfrm(xml: &mut String, tag: &str, xfrm: &Xfrm) -> Result<()> {
    write!(xml, "<{}", tag).map_err(xml_err)?;
    if xfrm.rot != 0 {
        write!(xml, r#" rot="{}""#, xfrm.rot).map_err(xml_err)?;
    }
    write!(
        xml,
        r#"><a:off x="{}" y="{}"/><a:ext cx="{}" cy="{}"/></{}>"#,
        xfrm.x, xfrm.y, xfrm.cx, xfrm.cy, tag
    )
    .map_err(xml_err)
}

pub(crate) fn write_color(xml: &mut String, color: &ColorSpec) -> Result<()> {
    let written = match color {
        ColorSpec::Rgb(rgb) => write!(xml, r#"<a:srgbClr val="{}"/>"#, rgb.to_hex()),
        ColorSpec::Scheme(name) => write!(xml, r#"<a:schemeClr val="{}"/>"#, escape_xml(name)),
    };
    written.map_err(xml_err)
}

pub(crate) fn write_fill(xml: &mut String, fill: &FillSpec) -> Result<()> {
    match fill {
        FillSpec::Solid(color) => {
            xml.push_str("<a:solidFill>");
            write_color(xml, color)?;
            xml.push_str("</a:solidFill>");
        },
        FillSpec::NoFill => xml.push_str("<a:noFill/>"),
    }
    Ok(())
}

fn write_line(xml: &mut String, line: &LineSpec) -> Result<()> {
    xml.push_str("<a:ln");
    if let Some(w) = line.width {
        write!(xml, r#" w="{}""#, w).map_err(xml_err)?;
    }
    match &line.fill {
        Some(fill) => {
            xml.push('>');
            write_fill(xml, fill)?;
            xml.push_str("</a:ln>");
        },
        None => xml.push_str("/>"),
    }
    Ok(())
}

fn write_body_pr(xml: &mut String, body: &BodyProperties) -> Result<()> {
    xml.push_str("<a:bodyPr");
    if let Some(wrap) = body.wrap {
        xml.push_str(if wrap { r#" wrap="square""# } else { r#" wrap="none""# });
    }
    for (name, value) in [
        ("lIns", body.left_inset),
        ("tIns", body.top_inset),
        ("rIns", body.right_inset),
        ("bIns", body.bottom_inset),
    ] {
        if let Some(v) = value {
            write!(xml, r#" {}="{}""#, name, v).map_err(xml_err)?;
        }
    }
    if let Some(anchor) = body.anchor {
        write!(xml, r#" anchor="{}""#, anchor.as_str()).map_err(xml_err)?;
    }
    match body.auto_size {
        Some(AutoSize::None) => xml.push_str("><a:noAutofit/></a:bodyPr>"),
        Some(AutoSize::ShapeToFitText) => xml.push_str("><a:spAutoFit/></a:bodyPr>"),
        Some(AutoSize::TextToFitShape) => xml.push_str("><a:normAutofit/></a:bodyPr>"),
        None => xml.push_str("/>"),
    }
    Ok(())
}

pub(crate) fn write_text_body(
    xml: &mut String,
    tag: &str,
    body: &TextBody,
    ctx: &mut dyn XmlContext,
) -> Result<()> {
    write!(xml, "<{}>", tag).map_err(xml_err)?;
    write_body_pr(xml, &body.body)?;
    xml.push_str("<a:lstStyle/>");
    if body.paragraphs.is_empty() {
        xml.push_str("<a:p/>");
    }
    for paragraph in &body.paragraphs {
        write_paragraph(xml, paragraph, ctx)?;
    }
    write!(xml, "</{}>", tag).map_err(xml_err)
}

fn write_paragraph(
    xml: &mut String,
    paragraph: &TextParagraph,
    ctx: &mut dyn XmlContext,
) -> Result<()> {
    xml.push_str("<a:p>");
    if paragraph.level != 0 || paragraph.alignment.is_some() {
        xml.push_str("<a:pPr");
        if paragraph.level != 0 {
            write!(xml, r#" lvl="{}""#, paragraph.level).map_err(xml_err)?;
        }
        if let Some(align) = paragraph.alignment {
            write!(xml, r#" algn="{}""#, align.as_str()).map_err(xml_err)?;
        }
        xml.push_str("/>");
    }
    for run in &paragraph.runs {
        if run.is_line_break() {
            xml.push_str("<a:br>");
            write_run_props(xml, "a:rPr", &run.props, ctx)?;
            xml.push_str("</a:br>");
        } else {
            xml.push_str("<a:r>");
            write_run_props(xml, "a:rPr", &run.props, ctx)?;
            write!(xml, "<a:t>{}</a:t>", escape_xml(&run.text)).map_err(xml_err)?;
            xml.push_str("</a:r>");
        }
    }
    xml.push_str("</a:p>");
    Ok(())
}

fn write_run_props(
    xml: &mut String,
    tag: &str,
    props: &RunProperties,
    ctx: &mut dyn XmlContext,
) -> Result<()> {
    write!(xml, r#"<{} lang="{}""#, tag, escape_xml(ctx.lang())).map_err(xml_err)?;
    if let Some(size) = props.size {
        write!(xml, r#" sz="{}""#, size).map_err(xml_err)?;
    }
    for (name, value) in [("b", props.bold), ("i", props.italic)] {
        if let Some(v) = value {
            write!(xml, r#" {}="{}""#, name, u8::from(v)).map_err(xml_err)?;
        }
    }
    if let Some(underline) = props.underline {
        xml.push_str(if underline { r#" u="sng""# } else { r#" u="none""# });
    }
    xml.push_str(r#" dirty="0""#);

    let has_children =
        props.color.is_some() || props.typeface.is_some() || props.hyperlink.is_some();
    if !has_children {
        xml.push_str("/>");
        return Ok(());
    }
    xml.push('>');
    if let Some(color) = &props.color {
        xml.push_str("<a:solidFill>");
        write_color(xml, color)?;
        xml.push_str("</a:solidFill>");
    }
    if let Some(typeface) = &props.typeface {
        write!(xml, r#"<a:latin typeface="{}"/>"#, escape_xml(typeface)).map_err(xml_err)?;
    }
    if let Some(link) = &props.hyperlink {
        let r_id = ctx.hyperlink_r_id(&link.address)?;
        write!(xml, r#"<a:hlinkClick r:id="{}"/>"#, r_id).map_err(xml_err)?;
    }
    write!(xml, "</{}>", tag).map_err(xml_err)
}

fn write_table(xml: &mut String, table: &TableBody, ctx: &mut dyn XmlContext) -> Result<()> {
    xml.push_str("<a:tbl><a:tblPr");
    for (name, value) in [
        ("firstRow", table.first_row),
        ("firstCol", table.first_col),
        ("bandRow", table.band_row),
    ] {
        if value {
            write!(xml, r#" {}="1""#, name).map_err(xml_err)?;
        }
    }
    match &table.style_id {
        Some(style_id) => write!(
            xml,
            "><a:tableStyleId>{}</a:tableStyleId></a:tblPr>",
            escape_xml(style_id)
        )
        .map_err(xml_err)?,
        None => xml.push_str("/>"),
    }

    xml.push_str("<a:tblGrid>");
    for width in &table.columns {
        write!(xml, r#"<a:gridCol w="{}"/>"#, width).map_err(xml_err)?;
    }
    xml.push_str("</a:tblGrid>");

    for row in &table.rows {
        write!(xml, r#"<a:tr h="{}">"#, row.height).map_err(xml_err)?;
        for cell in &row.cells {
            xml.push_str("<a:tc>");
            write_text_body(xml, "a:txBody", &cell.text, ctx)?;
            write_cell_props(xml, &cell.props)?;
            xml.push_str("</a:tc>");
        }
        xml.push_str("</a:tr>");
    }
    xml.push_str("</a:tbl>");
    Ok(())
}

fn write_cell_props(xml: &mut String, props: &CellProperties) -> Result<()> {
    xml.push_str("<a:tcPr");
    for (name, value) in [
        ("marL", props.margin_left),
        ("marR", props.margin_right),
        ("marT", props.margin_top),
        ("marB", props.margin_bottom),
    ] {
        if let Some(v) = value {
            write!(xml, r#" {}="{}""#, name, v).map_err(xml_err)?;
        }
    }
    if let Some(anchor) = props.anchor {
        write!(xml, r#" anchor="{}""#, anchor.as_str()).map_err(xml_err)?;
    }
    match &props.fill {
        Some(fill) => {
            xml.push('>');
            write_fill(xml, fill)?;
            xml.push_str("</a:tcPr>");
        },
        None => xml.push_str("/>"),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::color::RGBColor;
    use crate::common::xml::XmlNode;
    use crate::ooxml::pptx::shapes::{HyperlinkSpec, TextRun};

    struct Recorder {
        links: Vec<String>,
    }

    impl XmlContext for Recorder {
        fn lang(&self) -> &str {
            "en-US"
        }

        fn image_r_id(&mut self, _image: &ImageSource) -> Result<String> {
            Ok("rId7".to_string())
        }

        fn hyperlink_r_id(&mut self, address: &str) -> Result<String> {
            self.links.push(address.to_string());
            Ok(format!("rId{}", self.links.len() + 1))
        }
    }

    fn wrap(inner: &str) -> String {
        format!(
            r#"<p:spTree xmlns:a="a" xmlns:p="p" xmlns:r="r">{}</p:spTree>"#,
            inner
        )
    }

    #[test]
    fn test_text_box_round_trip() {
        let mut shape = MutableShape::new(
            3,
            "TextBox 2",
            ShapeKind::AutoShape {
                geometry: Some("rect".into()),
                text_box: true,
                text: Some(TextBody::default()),
            },
        );
        shape.xfrm = Some(Xfrm::new(914_400, 914_400, 4_572_000, 1_828_800));
        shape.fill = Some(FillSpec::NoFill);
        let body = shape.text_body_mut().unwrap();
        body.paragraphs[0].runs.push(TextRun {
            text: "R&D <2>".into(),
            props: RunProperties {
                size: Some(1800),
                bold: Some(true),
                color: Some(ColorSpec::Rgb(RGBColor::new(0x11, 0xAA, 0x22))),
                hyperlink: Some(HyperlinkSpec {
                    address: "https://example.com".into(),
                }),
                ..Default::default()
            },
        });

        let mut ctx = Recorder { links: Vec::new() };
        let mut xml = String::new();
        shape.to_xml(&mut xml, &mut ctx).unwrap();
        assert!(xml.contains(r#"<p:cNvSpPr txBox="1"/>"#));
        assert!(xml.contains(r#"<a:srgbClr val="11AA22"/>"#));
        assert!(xml.contains(r#"<a:hlinkClick r:id="rId2"/>"#));
        assert_eq!(ctx.links, vec!["https://example.com".to_string()]);

        let tree = XmlNode::parse(wrap(&xml).as_bytes()).unwrap();
        let parsed = MutableShape::from_xml(tree.child("sp").unwrap(), None).unwrap();
        assert_eq!(parsed.xfrm, shape.xfrm);
        assert_eq!(parsed.text_body().unwrap().text(), "R&D <2>");
        assert_eq!(parsed.kind_name(), "text_box");
    }

    #[test]
    fn test_placeholder_and_table_xml() {
        let mut ph = MutableShape::new(
            2,
            "Title 1",
            ShapeKind::AutoShape {
                geometry: None,
                text_box: false,
                text: Some(TextBody::default()),
            },
        );
        ph.placeholder = Some(PlaceholderFormat {
            ph_type: PlaceholderType::Object,
            idx: 1,
            orient: None,
            sz: Some("half".into()),
        });
        let mut xml = String::new();
        ph.to_xml(&mut xml, &mut PlainContext { lang: "en-US" }).unwrap();
        assert!(xml.contains(r#"<p:ph sz="half" idx="1"/>"#));
        assert!(xml.contains("<p:spPr></p:spPr>"));

        let mut frame = MutableShape::new(
            4,
            "Table 3",
            ShapeKind::Table(TableBody::new(2, 2, 200, 100, "{X}")),
        );
        frame.xfrm = Some(Xfrm::new(0, 0, 200, 100));
        let mut xml = String::new();
        frame.to_xml(&mut xml, &mut PlainContext { lang: "en-US" }).unwrap();
        let tree = XmlNode::parse(wrap(&xml).as_bytes()).unwrap();
        let parsed = MutableShape::from_xml(tree.child("graphicFrame").unwrap(), None).unwrap();
        let table = parsed.table().unwrap();
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.column_count(), 2);
        assert!(table.first_row);
    }
}
