//! Colors, fills and outlines of DrawingML shapes.

use crate::common::color::RGBColor;
use crate::common::xml::XmlNode;

/// A color reference: either an explicit RGB value or a theme color slot.
#[derive(Debug, Clone, PartialEq)]
pub enum ColorSpec {
    /// `<a:srgbClr val="RRGGBB"/>`
    Rgb(RGBColor),
    /// `<a:schemeClr val="accent1"/>`
    Scheme(String),
}

impl ColorSpec {
    /// Read the first color choice inside `node` (e.g. an `a:solidFill`).
    pub fn from_parent(node: &XmlNode) -> Option<Self> {
        node.elements().find_map(|child| match child.local_name() {
            "srgbClr" => child
                .attr("val")
                .and_then(RGBColor::from_rrggbb)
                .map(ColorSpec::Rgb),
            "schemeClr" => child.attr("val").map(|v| ColorSpec::Scheme(v.to_string())),
            _ => None,
        })
    }

    /// The RGB value, if this is not a theme color.
    pub fn rgb(&self) -> Option<RGBColor> {
        match self {
            ColorSpec::Rgb(rgb) => Some(*rgb),
            ColorSpec::Scheme(_) => None,
        }
    }
}

/// Fill of a shape, cell or background.
#[derive(Debug, Clone, PartialEq)]
pub enum FillSpec {
    Solid(ColorSpec),
    NoFill,
}

impl FillSpec {
    /// Read the fill choice among the children of a properties element
    /// such as `p:spPr`, `a:tcPr` or `p:bgPr`.
    ///
    /// Gradient, pattern and picture fills are not modeled and read as `None`.
    pub fn from_properties(props: &XmlNode) -> Option<Self> {
        props.elements().find_map(|child| match child.local_name() {
            "solidFill" => ColorSpec::from_parent(child).map(FillSpec::Solid),
            "noFill" => Some(FillSpec::NoFill),
            _ => None,
        })
    }
}

/// Outline of a shape (`a:ln`).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LineSpec {
    /// Width in EMU
    pub width: Option<i64>,
    pub fill: Option<FillSpec>,
}

impl LineSpec {
    pub fn from_xml(ln: &XmlNode) -> Self {
        Self {
            width: ln.attr_i64("w"),
            fill: FillSpec::from_properties(ln),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.width.is_none() && self.fill.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fill_and_line() {
        let sp_pr = XmlNode::parse(
            br#"<p:spPr xmlns:a="a" xmlns:p="p">
                <a:solidFill><a:srgbClr val="1F4E79"/></a:solidFill>
                <a:ln w="12700"><a:solidFill><a:schemeClr val="accent2"/></a:solidFill></a:ln>
            </p:spPr>"#,
        )
        .unwrap();

        assert_eq!(
            FillSpec::from_properties(&sp_pr),
            Some(FillSpec::Solid(ColorSpec::Rgb(RGBColor::new(0x1F, 0x4E, 0x79))))
        );
        let line = LineSpec::from_xml(sp_pr.child("ln").unwrap());
        assert_eq!(line.width, Some(12700));
        assert_eq!(line.fill, Some(FillSpec::Solid(ColorSpec::Scheme("accent2".into()))));
    }
}
