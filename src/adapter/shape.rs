//! Shapes, their extent, and image inputs.

use crate::adapter::format::{FillFormat, LineFormat};
use crate::adapter::placeholder::Placeholder;
use crate::adapter::table::Table;
use crate::adapter::text::TextFrame;
use crate::common::{IntoLength, Length};
use crate::error::{Error, Result};
use crate::ooxml::pptx::shapes::{CHART_URI, ImageSource, MutableShape, ShapeKind, Xfrm};
use crate::ooxml::pptx::ImageInfo;
use std::path::{Path, PathBuf};

/// The extent of a shape: left, top, width and height.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Range {
    pub left: Length,
    pub top: Length,
    pub width: Length,
    pub height: Length,
}

impl Range {
    pub fn new(
        left: impl IntoLength,
        top: impl IntoLength,
        width: impl IntoLength,
        height: impl IntoLength,
    ) -> Result<Self> {
        Ok(Self {
            left: left.into_length()?,
            top: top.into_length()?,
            width: width.into_length()?,
            height: height.into_length()?,
        })
    }

    /// The same extent as an unrotated transform, in EMU.
    pub fn to_xfrm(&self) -> Xfrm {
        Xfrm::new(
            self.left.emu(),
            self.top.emu(),
            self.width.emu(),
            self.height.emu(),
        )
    }
}

impl From<Xfrm> for Range {
    fn from(xfrm: Xfrm) -> Self {
        Self {
            left: Length::Emu(xfrm.x),
            top: Length::Emu(xfrm.y),
            width: Length::Emu(xfrm.cx),
            height: Length::Emu(xfrm.cy),
        }
    }
}

/// Image bytes given by path or in memory.
#[derive(Debug, Clone, PartialEq)]
pub enum ImageInput {
    Path(PathBuf),
    Bytes(Vec<u8>),
}

impl ImageInput {
    /// Load the image bytes. Paths are read here.
    pub fn into_bytes(self) -> Result<Vec<u8>> {
        match self {
            ImageInput::Path(path) => Ok(std::fs::read(path)?),
            ImageInput::Bytes(bytes) => Ok(bytes),
        }
    }

    /// Short description for error messages.
    pub(crate) fn label(&self) -> String {
        match self {
            ImageInput::Path(path) => path.display().to_string(),
            ImageInput::Bytes(bytes) => format!("{} bytes", bytes.len()),
        }
    }

    /// Load and probe the image, as a picture source plus its pixel size and resolution.
    pub(crate) fn into_source(self, fallback_dpi: u32) -> Result<(ImageSource, ImageInfo)> {
        let label = self.label();
        ImageSource::from_bytes(self.into_bytes()?, fallback_dpi)
            .map_err(|e| Error::UnsupportedImage(format!("{}: {}", label, e)))
    }
}

impl From<PathBuf> for ImageInput {
    fn from(path: PathBuf) -> Self {
        ImageInput::Path(path)
    }
}

impl From<&Path> for ImageInput {
    fn from(path: &Path) -> Self {
        ImageInput::Path(path.to_path_buf())
    }
}

impl From<&str> for ImageInput {
    fn from(path: &str) -> Self {
        ImageInput::Path(PathBuf::from(path))
    }
}

impl From<Vec<u8>> for ImageInput {
    fn from(bytes: Vec<u8>) -> Self {
        ImageInput::Bytes(bytes)
    }
}

impl From<&[u8]> for ImageInput {
    fn from(bytes: &[u8]) -> Self {
        ImageInput::Bytes(bytes.to_vec())
    }
}

/// Any shape on a slide.
#[derive(Debug)]
pub struct Shape<'a> {
    shape: &'a mut MutableShape,
}

impl<'a> Shape<'a> {
    pub fn from_backend(shape: &'a mut MutableShape) -> Self {
        Self { shape }
    }

    pub fn to_backend(&self) -> &MutableShape {
        self.shape
    }

    pub fn to_backend_mut(&mut self) -> &mut MutableShape {
        self.shape
    }

    pub fn shape_id(&self) -> u32 {
        self.shape.shape_id
    }

    pub fn name(&self) -> &str {
        &self.shape.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) -> &mut Self {
        self.shape.name = name.into();
        self
    }

    /// Alternative text.
    pub fn description(&self) -> Option<&str> {
        self.shape.descr.as_deref()
    }

    pub fn set_description(&mut self, descr: impl Into<String>) -> &mut Self {
        self.shape.descr = Some(descr.into());
        self
    }

    /// Short name of the shape kind, e.g. `text_box` or `picture`.
    pub fn shape_type(&self) -> &'static str {
        self.shape.kind_name()
    }

    /// Own extent, else the one inherited from the layout.
    pub fn range(&self) -> Option<Range> {
        self.shape.effective_xfrm().map(Range::from)
    }

    pub fn set_range(&mut self, range: &Range) -> &mut Self {
        let rot = self.shape.effective_xfrm().map_or(0, |x| x.rot);
        self.shape.xfrm = Some(Xfrm { rot, ..range.to_xfrm() });
        self
    }

    pub fn left(&self) -> Option<Length> {
        self.range().map(|r| r.left)
    }

    pub fn top(&self) -> Option<Length> {
        self.range().map(|r| r.top)
    }

    pub fn width(&self) -> Option<Length> {
        self.range().map(|r| r.width)
    }

    pub fn height(&self) -> Option<Length> {
        self.range().map(|r| r.height)
    }

    pub fn set_left(&mut self, left: impl IntoLength) -> Result<&mut Self> {
        let emu = left.into_length()?.emu();
        self.own_xfrm().x = emu;
        Ok(self)
    }

    pub fn set_top(&mut self, top: impl IntoLength) -> Result<&mut Self> {
        let emu = top.into_length()?.emu();
        self.own_xfrm().y = emu;
        Ok(self)
    }

    pub fn set_width(&mut self, width: impl IntoLength) -> Result<&mut Self> {
        let emu = width.into_length()?.emu();
        self.own_xfrm().cx = emu;
        Ok(self)
    }

    pub fn set_height(&mut self, height: impl IntoLength) -> Result<&mut Self> {
        let emu = height.into_length()?.emu();
        self.own_xfrm().cy = emu;
        Ok(self)
    }

    /// Clockwise rotation in degrees.
    pub fn rotation(&self) -> f64 {
        self.shape.effective_xfrm().map_or(0.0, |x| x.rotation())
    }

    pub fn set_rotation(&mut self, degrees: f64) -> &mut Self {
        let normalized = degrees.rem_euclid(360.0);
        self.own_xfrm().rot = (normalized * 60_000.0).round() as i64;
        self
    }

    /// Take over the inherited transform so it can be edited.
    fn own_xfrm(&mut self) -> &mut Xfrm {
        let inherited = self.shape.effective_xfrm().unwrap_or_default();
        self.shape.xfrm.get_or_insert(inherited)
    }

    pub fn is_placeholder(&self) -> bool {
        self.shape.is_placeholder()
    }

    pub fn has_text_frame(&self) -> bool {
        matches!(self.shape.kind, ShapeKind::AutoShape { .. })
    }

    pub fn has_table(&self) -> bool {
        matches!(self.shape.kind, ShapeKind::Table(_))
    }

    pub fn has_chart(&self) -> bool {
        matches!(&self.shape.kind, ShapeKind::GraphicFrame { uri } if uri == CHART_URI)
    }

    pub fn text_frame(&mut self) -> Option<TextFrame<'_>> {
        self.shape.text_body_mut().map(TextFrame::from_backend)
    }

    pub fn table(&mut self) -> Option<Table<'_>> {
        self.shape.table_mut().map(Table::from_backend)
    }

    pub fn fill(&mut self) -> FillFormat<'_> {
        FillFormat::from_backend(&mut self.shape.fill)
    }

    pub fn line(&mut self) -> LineFormat<'_> {
        LineFormat::from_backend(&mut self.shape.line)
    }

    /// The placeholder view of this shape.
    pub fn placeholder(&mut self) -> Result<Placeholder<'_>> {
        Placeholder::from_backend(self.shape)
    }

    /// Shapes of a group, empty for any other kind.
    pub fn children(&mut self) -> Vec<Shape<'_>> {
        match &mut self.shape.kind {
            ShapeKind::Group { children } => children.iter_mut().map(Shape::from_backend).collect(),
            _ => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::unit::{IN, PT};
    use crate::ooxml::pptx::shapes::TextBody;

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
    fn test_range_literals() {
        let range = Range::new((1, IN), (72, PT), (2.54, "cm"), Length::Emu(10)).unwrap();
        assert_eq!(range.to_xfrm(), Xfrm::new(914_400, 914_400, 914_400, 10));
        assert!(Range::new((1, "yd"), (0, PT), (0, PT), (0, PT)).is_err());
    }

    #[test]
    fn test_geometry_setters() {
        let mut backend = text_box();
        backend.inherited_xfrm = Some(Xfrm::new(10, 20, 30, 40));
        let mut shape = Shape::from_backend(&mut backend);
        assert_eq!(shape.left(), Some(Length::Emu(10)));

        shape.set_left((1, IN)).unwrap().set_rotation(-90.0);
        assert_eq!(shape.rotation(), 270.0);
        assert_eq!(
            backend.xfrm,
            Some(Xfrm {
                rot: 16_200_000,
                ..Xfrm::new(914_400, 20, 30, 40)
            })
        );
    }

    #[test]
    fn test_kind_queries() {
        let mut backend = text_box();
        let mut shape = Shape::from_backend(&mut backend);
        assert!(shape.has_text_frame());
        assert!(!shape.has_table());
        assert_eq!(shape.shape_type(), "text_box");
        shape.text_frame().unwrap().set_text("Hi");
        assert!(shape.table().is_none());
        assert!(shape.placeholder().is_err());
        assert!(shape.children().is_empty());
        assert_eq!(backend.text_body().unwrap().text(), "Hi");
    }

    #[test]
    fn test_image_input() {
        assert_eq!(ImageInput::from("a.png"), ImageInput::Path(PathBuf::from("a.png")));
        assert_eq!(ImageInput::from(&b"xy"[..]).into_bytes().unwrap(), b"xy".to_vec());
        assert!(matches!(
            ImageInput::from(vec![0u8; 4]).into_source(72),
            Err(Error::UnsupportedImage(_))
        ));
        assert!(matches!(
            ImageInput::from("/nonexistent/picture.png").into_bytes(),
            Err(Error::Io(_))
        ));
    }
}
