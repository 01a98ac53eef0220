//! Text frames, paragraphs, runs and fonts.

use crate::adapter::format::{ColorFormat, FillFormat, LineFormat};
use crate::adapter::shape::Range;
use crate::common::{IntoColor, IntoLength, Length};
use crate::error::{Error, Result};
use crate::ooxml::pptx::shapes::{
    Alignment, AutoSize, FillSpec, HyperlinkSpec, LineSpec, MutableShape, RunProperties,
    ShapeKind, TextBody, TextParagraph, TextRun, VerticalAnchor, Xfrm,
};

/// EMU per hundredth of a point, the unit of `a:rPr/@sz`.
const EMUS_PER_CENTIPOINT: i64 = 127;

/// A text box as handed to text mutators.
///
/// Holds the text body together with the geometry, fill and outline of the
/// shape it belongs to.
#[derive(Debug)]
pub struct Text<'a> {
    body: &'a mut TextBody,
    xfrm: &'a mut Option<Xfrm>,
    inherited_xfrm: Option<Xfrm>,
    fill: &'a mut Option<FillSpec>,
    line: &'a mut Option<LineSpec>,
}

impl<'a> Text<'a> {
    /// Wrap a shape that can hold text.
    pub fn from_backend(shape: &'a mut MutableShape) -> Result<Self> {
        let kind_name = shape.kind_name();
        let MutableShape {
            kind,
            xfrm,
            inherited_xfrm,
            fill,
            line,
            ..
        } = shape;
        let ShapeKind::AutoShape { text, .. } = kind else {
            return Err(Error::invalid_setter("text shape", kind_name));
        };
        Ok(Self {
            body: text.get_or_insert_with(TextBody::default),
            xfrm,
            inherited_xfrm: *inherited_xfrm,
            fill,
            line,
        })
    }

    pub fn to_backend(&self) -> &TextBody {
        self.body
    }

    pub fn text(&self) -> String {
        self.body.text()
    }

    pub fn set_text(&mut self, text: &str) -> &mut Self {
        self.body.set_text(text);
        self
    }

    pub fn text_frame(&mut self) -> TextFrame<'_> {
        TextFrame::from_backend(self.body)
    }

    /// Extent of the text box.
    pub fn range(&self) -> Option<Range> {
        self.xfrm.or(self.inherited_xfrm).map(Range::from)
    }

    pub fn set_range(&mut self, range: &Range) -> &mut Self {
        let rot = self.xfrm.or(self.inherited_xfrm).map_or(0, |x| x.rot);
        *self.xfrm = Some(Xfrm { rot, ..range.to_xfrm() });
        self
    }

    pub fn fill(&mut self) -> FillFormat<'_> {
        FillFormat::from_backend(self.fill)
    }

    pub fn line(&mut self) -> LineFormat<'_> {
        LineFormat::from_backend(self.line)
    }
}

/// The text frame of a shape, table cell or notes page.
#[derive(Debug)]
pub struct TextFrame<'a> {
    body: &'a mut TextBody,
}

impl<'a> TextFrame<'a> {
    pub fn from_backend(body: &'a mut TextBody) -> Self {
        Self { body }
    }

    pub fn to_backend(&self) -> &TextBody {
        self.body
    }

    /// Paragraph texts joined by newlines.
    pub fn text(&self) -> String {
        self.body.text()
    }

    /// Replace all text; each line becomes a paragraph.
    pub fn set_text(&mut self, text: &str) -> &mut Self {
        self.body.set_text(text);
        self
    }

    /// Remove all text, leaving one empty paragraph.
    pub fn clear(&mut self) -> &mut Self {
        self.body.clear();
        self
    }

    pub fn paragraph_count(&self) -> usize {
        self.body.paragraphs.len()
    }

    pub fn paragraph(&mut self, index: usize) -> Option<Paragraph<'_>> {
        self.body.paragraphs.get_mut(index).map(Paragraph::from_backend)
    }

    pub fn paragraphs(&mut self) -> impl Iterator<Item = Paragraph<'_>> {
        self.body.paragraphs.iter_mut().map(Paragraph::from_backend)
    }

    /// Append an empty paragraph.
    pub fn add_paragraph(&mut self) -> Paragraph<'_> {
        self.body.paragraphs.push(TextParagraph::default());
        let last = self.body.paragraphs.len() - 1;
        Paragraph::from_backend(&mut self.body.paragraphs[last])
    }

    /// Fonts of every run in the frame.
    pub fn fonts(&mut self) -> impl Iterator<Item = Font<'_>> {
        self.body
            .paragraphs
            .iter_mut()
            .flat_map(|p| p.runs.iter_mut())
            .filter(|run| !run.is_line_break())
            .map(|run| Font::from_backend(&mut run.props))
    }

    /// Align every paragraph.
    pub fn set_alignment(&mut self, alignment: Alignment) -> &mut Self {
        for paragraph in &mut self.body.paragraphs {
            paragraph.alignment = Some(alignment);
        }
        self
    }

    pub fn word_wrap(&self) -> Option<bool> {
        self.body.body.wrap
    }

    pub fn set_word_wrap(&mut self, wrap: bool) -> &mut Self {
        self.body.body.wrap = Some(wrap);
        self
    }

    pub fn auto_size(&self) -> Option<AutoSize> {
        self.body.body.auto_size
    }

    pub fn set_auto_size(&mut self, auto_size: AutoSize) -> &mut Self {
        self.body.body.auto_size = Some(auto_size);
        self
    }

    pub fn vertical_anchor(&self) -> Option<VerticalAnchor> {
        self.body.body.anchor
    }

    pub fn set_vertical_anchor(&mut self, anchor: VerticalAnchor) -> &mut Self {
        self.body.body.anchor = Some(anchor);
        self
    }

    pub fn margin_left(&self) -> Option<Length> {
        self.body.body.left_inset.map(Length::Emu)
    }

    pub fn margin_top(&self) -> Option<Length> {
        self.body.body.top_inset.map(Length::Emu)
    }

    pub fn margin_right(&self) -> Option<Length> {
        self.body.body.right_inset.map(Length::Emu)
    }

    pub fn margin_bottom(&self) -> Option<Length> {
        self.body.body.bottom_inset.map(Length::Emu)
    }

    pub fn set_margin_left(&mut self, margin: impl IntoLength) -> Result<&mut Self> {
        self.body.body.left_inset = Some(margin.into_length()?.emu());
        Ok(self)
    }

    pub fn set_margin_top(&mut self, margin: impl IntoLength) -> Result<&mut Self> {
        self.body.body.top_inset = Some(margin.into_length()?.emu());
        Ok(self)
    }

    pub fn set_margin_right(&mut self, margin: impl IntoLength) -> Result<&mut Self> {
        self.body.body.right_inset = Some(margin.into_length()?.emu());
        Ok(self)
    }

    pub fn set_margin_bottom(&mut self, margin: impl IntoLength) -> Result<&mut Self> {
        self.body.body.bottom_inset = Some(margin.into_length()?.emu());
        Ok(self)
    }
}

/// One paragraph of a text frame.
#[derive(Debug)]
pub struct Paragraph<'a> {
    paragraph: &'a mut TextParagraph,
}

impl<'a> Paragraph<'a> {
    pub fn from_backend(paragraph: &'a mut TextParagraph) -> Self {
        Self { paragraph }
    }

    pub fn to_backend(&self) -> &TextParagraph {
        self.paragraph
    }

    pub fn text(&self) -> String {
        self.paragraph.text()
    }

    /// Replace the runs with a single run, keeping the first run's formatting.
    pub fn set_text(&mut self, text: &str) -> &mut Self {
        let props = self
            .paragraph
            .runs
            .first()
            .map(|run| run.props.clone())
            .unwrap_or_default();
        self.paragraph.runs = vec![TextRun {
            text: text.to_string(),
            props,
        }];
        self
    }

    pub fn level(&self) -> u8 {
        self.paragraph.level
    }

    /// Set the outline level, 0 through 8.
    pub fn set_level(&mut self, level: u8) -> Result<&mut Self> {
        if level > 8 {
            return Err(Error::invalid_setter("level 0..=8", level.to_string()));
        }
        self.paragraph.level = level;
        Ok(self)
    }

    pub fn alignment(&self) -> Option<Alignment> {
        self.paragraph.alignment
    }

    pub fn set_alignment(&mut self, alignment: Alignment) -> &mut Self {
        self.paragraph.alignment = Some(alignment);
        self
    }

    pub fn run_count(&self) -> usize {
        self.paragraph.runs.len()
    }

    pub fn run(&mut self, index: usize) -> Option<Run<'_>> {
        self.paragraph.runs.get_mut(index).map(Run::from_backend)
    }

    pub fn runs(&mut self) -> impl Iterator<Item = Run<'_>> {
        self.paragraph.runs.iter_mut().map(Run::from_backend)
    }

    pub fn add_run(&mut self, text: &str) -> Run<'_> {
        self.paragraph.runs.push(TextRun::new(text));
        let last = self.paragraph.runs.len() - 1;
        Run::from_backend(&mut self.paragraph.runs[last])
    }

    pub fn add_line_break(&mut self) -> &mut Self {
        self.paragraph.runs.push(TextRun::new("\n"));
        self
    }

    pub fn clear(&mut self) -> &mut Self {
        self.paragraph.runs.clear();
        self
    }
}

/// A run of uniformly formatted text.
#[derive(Debug)]
pub struct Run<'a> {
    run: &'a mut TextRun,
}

impl<'a> Run<'a> {
    pub fn from_backend(run: &'a mut TextRun) -> Self {
        Self { run }
    }

    pub fn to_backend(&self) -> &TextRun {
        self.run
    }

    pub fn text(&self) -> &str {
        &self.run.text
    }

    pub fn set_text(&mut self, text: impl Into<String>) -> &mut Self {
        self.run.text = text.into();
        self
    }

    pub fn font(&mut self) -> Font<'_> {
        Font::from_backend(&mut self.run.props)
    }

    pub fn hyperlink(&mut self) -> Hyperlink<'_> {
        Hyperlink::from_backend(&mut self.run.props)
    }
}

/// Character formatting of a run.
#[derive(Debug)]
pub struct Font<'a> {
    props: &'a mut RunProperties,
}

impl<'a> Font<'a> {
    pub fn from_backend(props: &'a mut RunProperties) -> Self {
        Self { props }
    }

    pub fn to_backend(&self) -> &RunProperties {
        self.props
    }

    pub fn size(&self) -> Option<Length> {
        self.props
            .size
            .map(|sz| Length::Emu(i64::from(sz) * EMUS_PER_CENTIPOINT))
    }

    /// Set the font size, between 1pt and 4000pt.
    pub fn set_size(&mut self, size: impl IntoLength) -> Result<&mut Self> {
        let size = size.into_length()?;
        let centipoints = (size.points_f64() * 100.0).round();
        if !(100.0..=400_000.0).contains(&centipoints) {
            return Err(Error::invalid_setter("font size 1pt..=4000pt", size.to_string()));
        }
        self.props.size = Some(centipoints as u32);
        Ok(self)
    }

    pub fn bold(&self) -> Option<bool> {
        self.props.bold
    }

    pub fn set_bold(&mut self, bold: bool) -> &mut Self {
        self.props.bold = Some(bold);
        self
    }

    pub fn italic(&self) -> Option<bool> {
        self.props.italic
    }

    pub fn set_italic(&mut self, italic: bool) -> &mut Self {
        self.props.italic = Some(italic);
        self
    }

    pub fn underline(&self) -> Option<bool> {
        self.props.underline
    }

    pub fn set_underline(&mut self, underline: bool) -> &mut Self {
        self.props.underline = Some(underline);
        self
    }

    /// Latin typeface name.
    pub fn name(&self) -> Option<&str> {
        self.props.typeface.as_deref()
    }

    pub fn set_name(&mut self, name: impl Into<String>) -> &mut Self {
        self.props.typeface = Some(name.into());
        self
    }

    pub fn color(&mut self) -> ColorFormat<'_> {
        ColorFormat::from_backend(&mut self.props.color)
    }

    pub fn set_color(&mut self, color: impl IntoColor) -> Result<&mut Self> {
        self.color().set_rgb(color)?;
        Ok(self)
    }
}

/// External hyperlink of a run.
#[derive(Debug)]
pub struct Hyperlink<'a> {
    props: &'a mut RunProperties,
}

impl<'a> Hyperlink<'a> {
    pub fn from_backend(props: &'a mut RunProperties) -> Self {
        Self { props }
    }

    pub fn to_backend(&self) -> Option<&HyperlinkSpec> {
        self.props.hyperlink.as_ref()
    }

    pub fn address(&self) -> Option<&str> {
        self.props.hyperlink.as_ref().map(|link| link.address.as_str())
    }

    pub fn set_address(&mut self, address: impl Into<String>) -> &mut Self {
        self.props.hyperlink = Some(HyperlinkSpec {
            address: address.into(),
        });
        self
    }

    pub fn remove(&mut self) -> &mut Self {
        self.props.hyperlink = None;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::RGBColor;
    use crate::common::unit::PT;

    fn text_box() -> MutableShape {
        MutableShape::new(
            2,
            "TextBox 1",
            ShapeKind::AutoShape {
                geometry: Some("rect".to_string()),
                text_box: true,
                text: Some(TextBody::default()),
            },
        )
    }

    #[test]
    fn test_text_and_paragraphs() {
        let mut shape = text_box();
        let mut text = Text::from_backend(&mut shape).unwrap();
        text.set_text("one\ntwo");
        assert_eq!(text.text(), "one\ntwo");

        let mut frame = text.text_frame();
        assert_eq!(frame.paragraph_count(), 2);
        frame.add_paragraph().add_run("three").font().set_bold(true);
        frame.paragraph(0).unwrap().set_level(2).unwrap();
        assert!(frame.paragraph(0).unwrap().set_level(9).is_err());
        frame.set_alignment(Alignment::Center);
        text.fill().solid("#00ff00").unwrap();
        let range = Range::new(
            (1, crate::common::unit::IN),
            Length::Emu(0),
            Length::Emu(100),
            Length::Emu(100),
        )
        .unwrap();
        text.set_range(&range);
        assert_eq!(text.range().map(|r| r.left), Some(Length::Inches(1.0)));

        assert_eq!(shape.xfrm, Some(Xfrm::new(914_400, 0, 100, 100)));
        assert!(shape.fill.is_some());
        let body = shape.text_body().unwrap();
        assert_eq!(body.paragraphs[0].level, 2);
        assert_eq!(body.paragraphs[2].runs[0].props.bold, Some(true));
        assert!(body.paragraphs.iter().all(|p| p.alignment == Some(Alignment::Center)));
    }

    #[test]
    fn test_font() {
        let mut props = RunProperties::default();
        let mut font = Font::from_backend(&mut props);
        font.set_size((18, PT)).unwrap().set_color("#ff0000").unwrap();
        font.set_name("Arial").set_italic(true);
        assert_eq!(font.size(), Some(Length::Points(18)));
        assert!(font.set_size((0, PT)).is_err());
        assert_eq!(props.size, Some(1800));
        assert_eq!(props.typeface.as_deref(), Some("Arial"));
        assert_eq!(props.color.and_then(|c| c.rgb()), Some(RGBColor::new(255, 0, 0)));
    }

    #[test]
    fn test_frame_properties_and_links() {
        let mut body = TextBody::default();
        let mut frame = TextFrame::from_backend(&mut body);
        frame
            .set_word_wrap(false)
            .set_vertical_anchor(VerticalAnchor::Bottom)
            .set_margin_left((0.1, crate::common::unit::IN))
            .unwrap();
        frame
            .add_paragraph()
            .add_run("site")
            .hyperlink()
            .set_address("https://example.com");
        assert_eq!(frame.margin_left(), Some(Length::Emu(91_440)));
        assert_eq!(body.body.wrap, Some(false));
        assert_eq!(
            body.paragraphs[1].runs[0].props.hyperlink.as_ref().map(|h| h.address.as_str()),
            Some("https://example.com")
        );
    }

    #[test]
    fn test_text_rejects_tables() {
        let mut shape = MutableShape::new(
            3,
            "Table 2",
            ShapeKind::Table(crate::ooxml::pptx::shapes::TableBody::new(1, 1, 10, 10, "{X}")),
        );
        assert!(matches!(
            Text::from_backend(&mut shape),
            Err(Error::InvalidSetterType { .. })
        ));
    }
}
