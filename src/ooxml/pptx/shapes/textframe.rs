//! Text bodies: body properties, paragraphs and runs.

use crate::common::xml::XmlNode;
use crate::ooxml::opc::Relationships;
use crate::ooxml::pptx::shapes::fill::ColorSpec;

/// Horizontal paragraph alignment (`a:pPr/@algn`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Alignment {
    Left,
    Center,
    Right,
    Justify,
    Distributed,
}

impl Alignment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Left => "l",
            Self::Center => "ctr",
            Self::Right => "r",
            Self::Justify => "just",
            Self::Distributed => "dist",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "l" => Some(Self::Left),
            "ctr" => Some(Self::Center),
            "r" => Some(Self::Right),
            "just" => Some(Self::Justify),
            "dist" => Some(Self::Distributed),
            _ => None,
        }
    }
}

/// Vertical anchoring of text in a frame or table cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerticalAnchor {
    Top,
    Middle,
    Bottom,
}

impl VerticalAnchor {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Top => "t",
            Self::Middle => "ctr",
            Self::Bottom => "b",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "t" => Some(Self::Top),
            "ctr" => Some(Self::Middle),
            "b" => Some(Self::Bottom),
            _ => None,
        }
    }
}

/// Auto-fit behavior of a text frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AutoSize {
    /// `a:noAutofit`
    None,
    /// `a:spAutoFit`: the shape grows to fit its text
    ShapeToFitText,
    /// `a:normAutofit`: the text shrinks to fit the shape
    TextToFitShape,
}

/// `a:bodyPr` attributes that are modeled.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BodyProperties {
    /// `wrap="square"` is `Some(true)`, `wrap="none"` is `Some(false)`
    pub wrap: Option<bool>,
    pub left_inset: Option<i64>,
    pub top_inset: Option<i64>,
    pub right_inset: Option<i64>,
    pub bottom_inset: Option<i64>,
    pub anchor: Option<VerticalAnchor>,
    pub auto_size: Option<AutoSize>,
}

impl BodyProperties {
    pub fn from_xml(node: &XmlNode) -> Self {
        let auto_size = node.elements().find_map(|child| match child.local_name() {
            "noAutofit" => Some(AutoSize::None),
            "spAutoFit" => Some(AutoSize::ShapeToFitText),
            "normAutofit" => Some(AutoSize::TextToFitShape),
            _ => None,
        });
        Self {
            wrap: node.attr("wrap").map(|w| w != "none"),
            left_inset: node.attr_i64("lIns"),
            top_inset: node.attr_i64("tIns"),
            right_inset: node.attr_i64("rIns"),
            bottom_inset: node.attr_i64("bIns"),
            anchor: node.attr("anchor").and_then(VerticalAnchor::parse),
            auto_size,
        }
    }
}

/// An external hyperlink on a run.
#[derive(Debug, Clone, PartialEq)]
pub struct HyperlinkSpec {
    pub address: String,
}

/// `a:rPr` attributes that are modeled.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunProperties {
    /// Size in hundredths of a point
    pub size: Option<u32>,
    pub bold: Option<bool>,
    pub italic: Option<bool>,
    pub underline: Option<bool>,
    pub color: Option<ColorSpec>,
    /// `a:latin/@typeface`
    pub typeface: Option<String>,
    pub hyperlink: Option<HyperlinkSpec>,
}

impl RunProperties {
    /// Parse `a:rPr` (or `a:endParaRPr`), resolving hyperlink targets through `rels`.
    pub fn from_xml(node: &XmlNode, rels: Option<&Relationships>) -> Self {
        let hyperlink = node.child("hlinkClick").and_then(|link| {
            let r_id = link.prefixed_attr("id")?;
            let rel = rels?.get(r_id)?;
            Some(HyperlinkSpec {
                address: rel.target_ref().to_string(),
            })
        });
        Self {
            size: node.attr_i64("sz").and_then(|sz| u32::try_from(sz).ok()),
            bold: node.attr_bool("b"),
            italic: node.attr_bool("i"),
            underline: node.attr("u").map(|u| u != "none"),
            color: node.child("solidFill").and_then(ColorSpec::from_parent),
            typeface: node
                .child("latin")
                .and_then(|latin| latin.attr("typeface"))
                .map(str::to_string),
            hyperlink,
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// A run of uniformly formatted text. A line break (`a:br`) is a run whose text is `"\n"`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextRun {
    pub text: String,
    pub props: RunProperties,
}

impl TextRun {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            props: RunProperties::default(),
        }
    }

    #[inline]
    pub fn is_line_break(&self) -> bool {
        self.text == "\n"
    }
}

/// A paragraph of a text body.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextParagraph {
    /// Outline level, 0..=8
    pub level: u8,
    pub alignment: Option<Alignment>,
    pub runs: Vec<TextRun>,
}

impl TextParagraph {
    pub fn from_xml(node: &XmlNode, rels: Option<&Relationships>) -> Self {
        let p_pr = node.child("pPr");
        let level = p_pr
            .and_then(|p| p.attr_i64("lvl"))
            .and_then(|lvl| u8::try_from(lvl).ok())
            .unwrap_or(0);
        let alignment = p_pr.and_then(|p| p.attr("algn")).and_then(Alignment::parse);

        let mut runs = Vec::new();
        for child in node.elements() {
            match child.local_name() {
                "r" | "fld" => runs.push(TextRun {
                    text: child.child("t").map(XmlNode::text).unwrap_or_default(),
                    props: child
                        .child("rPr")
                        .map(|r_pr| RunProperties::from_xml(r_pr, rels))
                        .unwrap_or_default(),
                }),
                "br" => runs.push(TextRun::new("\n")),
                _ => {},
            }
        }

        Self {
            level,
            alignment,
            runs,
        }
    }

    /// Concatenated run text.
    pub fn text(&self) -> String {
        self.runs.iter().map(|r| r.text.as_str()).collect()
    }
}

/// A text body (`p:txBody` or `a:txBody`).
#[derive(Debug, Clone, PartialEq)]
pub struct TextBody {
    pub body: BodyProperties,
    pub paragraphs: Vec<TextParagraph>,
}

impl Default for TextBody {
    /// An empty body holding one empty paragraph, as PowerPoint writes it.
    fn default() -> Self {
        Self {
            body: BodyProperties::default(),
            paragraphs: vec![TextParagraph::default()],
        }
    }
}

impl TextBody {
    pub fn from_xml(node: &XmlNode, rels: Option<&Relationships>) -> Self {
        let body = node
            .child("bodyPr")
            .map(BodyProperties::from_xml)
            .unwrap_or_default();
        let paragraphs = node
            .children_named("p")
            .map(|p| TextParagraph::from_xml(p, rels))
            .collect();
        Self { body, paragraphs }
    }

    /// Paragraph texts joined by newlines.
    pub fn text(&self) -> String {
        self.paragraphs
            .iter()
            .map(TextParagraph::text)
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Replace all content with `text`; each line becomes a paragraph.
    ///
    /// The formatting of the first paragraph and run is carried over.
    pub fn set_text(&mut self, text: &str) {
        let template = self.paragraphs.first().cloned().unwrap_or_default();
        let run_props = template
            .runs
            .first()
            .map(|r| r.props.clone())
            .unwrap_or_default();
        self.paragraphs = text
            .split('\n')
            .map(|line| TextParagraph {
                level: template.level,
                alignment: template.alignment,
                runs: if line.is_empty() {
                    Vec::new()
                } else {
                    vec![TextRun {
                        text: line.to_string(),
                        props: run_props.clone(),
                    }]
                },
            })
            .collect();
    }

    pub fn clear(&mut self) {
        self.paragraphs = vec![TextParagraph::default()];
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::color::RGBColor;

    #[test]
    fn test_parse_text_body() {
        let node = XmlNode::parse(
            br#"<p:txBody xmlns:a="a" xmlns:p="p">
                <a:bodyPr wrap="none" lIns="0" anchor="ctr"><a:spAutoFit/></a:bodyPr>
                <a:p><a:pPr lvl="1" algn="ctr"/>
                    <a:r><a:rPr sz="2400" b="1"><a:solidFill><a:srgbClr val="FF0000"/></a:solidFill><a:latin typeface="Arial"/></a:rPr><a:t>Hello</a:t></a:r>
                    <a:br/>
                    <a:r><a:t>World</a:t></a:r>
                </a:p>
                <a:p/>
            </p:txBody>"#,
        )
        .unwrap();

        let body = TextBody::from_xml(&node, None);
        assert_eq!(body.body.wrap, Some(false));
        assert_eq!(body.body.left_inset, Some(0));
        assert_eq!(body.body.anchor, Some(VerticalAnchor::Middle));
        assert_eq!(body.body.auto_size, Some(AutoSize::ShapeToFitText));
        assert_eq!(body.paragraphs.len(), 2);

        let first = &body.paragraphs[0];
        assert_eq!(first.level, 1);
        assert_eq!(first.alignment, Some(Alignment::Center));
        assert_eq!(first.runs[0].props.size, Some(2400));
        assert_eq!(first.runs[0].props.bold, Some(true));
        assert_eq!(
            first.runs[0].props.color,
            Some(ColorSpec::Rgb(RGBColor::new(255, 0, 0)))
        );
        assert_eq!(first.runs[0].props.typeface.as_deref(), Some("Arial"));
        assert!(first.runs[1].is_line_break());
        assert_eq!(body.text(), "Hello\nWorld\n");
    }

    #[test]
    fn test_set_text_keeps_first_run_format() {
        let mut body = TextBody::default();
        body.paragraphs[0].runs.push(TextRun {
            text: "old".into(),
            props: RunProperties {
                bold: Some(true),
                ..Default::default()
            },
        });

        body.set_text("one\ntwo");
        assert_eq!(body.paragraphs.len(), 2);
        assert_eq!(body.paragraphs[1].runs[0].props.bold, Some(true));
        assert_eq!(body.text(), "one\ntwo");
    }
}
