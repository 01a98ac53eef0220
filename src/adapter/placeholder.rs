//! Placeholders and the values they take.

use crate::adapter::shape::{ImageInput, Shape};
use crate::adapter::text::TextFrame;
use crate::error::{Error, Result};
use crate::ooxml::pptx::shapes::{MutableShape, PlaceholderType, ShapeKind, Xfrm};
use tracing::trace;

/// What a placeholder is filled with.
#[derive(Debug, Clone, PartialEq)]
pub enum PlaceholderContent {
    /// Leave the placeholder as it is
    Empty,
    Text(String),
    /// One paragraph per item
    Paragraphs(Vec<String>),
    Image(ImageInput),
}

impl From<String> for PlaceholderContent {
    fn from(text: String) -> Self {
        PlaceholderContent::Text(text)
    }
}

impl From<&str> for PlaceholderContent {
    fn from(text: &str) -> Self {
        PlaceholderContent::Text(text.to_string())
    }
}

impl From<Vec<String>> for PlaceholderContent {
    fn from(items: Vec<String>) -> Self {
        PlaceholderContent::Paragraphs(items)
    }
}

impl From<ImageInput> for PlaceholderContent {
    fn from(image: ImageInput) -> Self {
        PlaceholderContent::Image(image)
    }
}

/// A placeholder shape on a slide.
#[derive(Debug)]
pub struct Placeholder<'a> {
    shape: &'a mut MutableShape,
    fallback_dpi: u32,
}

impl<'a> Placeholder<'a> {
    /// Wrap a placeholder shape; any other shape is rejected.
    pub fn from_backend(shape: &'a mut MutableShape) -> Result<Self> {
        if !shape.is_placeholder() {
            return Err(Error::invalid_setter("placeholder", shape.kind_name()));
        }
        Ok(Self {
            shape,
            fallback_dpi: 72,
        })
    }

    /// Resolution assumed for pictures that record none.
    pub fn with_fallback_dpi(mut self, dpi: u32) -> Self {
        if dpi > 0 {
            self.fallback_dpi = dpi;
        }
        self
    }

    pub fn to_backend(&self) -> &MutableShape {
        self.shape
    }

    pub fn placeholder_type(&self) -> PlaceholderType {
        self.shape
            .placeholder
            .as_ref()
            .map_or(PlaceholderType::Object, |ph| ph.ph_type)
    }

    pub fn idx(&self) -> u32 {
        self.shape.placeholder.as_ref().map_or(0, |ph| ph.idx)
    }

    pub fn name(&self) -> &str {
        &self.shape.name
    }

    pub fn text(&self) -> Option<String> {
        self.shape.text_body().map(|body| body.text())
    }

    pub fn text_frame(&mut self) -> Option<TextFrame<'_>> {
        self.shape.text_body_mut().map(TextFrame::from_backend)
    }

    pub fn shape(&mut self) -> Shape<'_> {
        Shape::from_backend(self.shape)
    }

    /// Fill the placeholder.
    ///
    /// Text goes into the text frame; pictures are only accepted by picture,
    /// object and clip art placeholders.
    pub fn set_value(&mut self, value: impl Into<PlaceholderContent>) -> Result<&mut Self> {
        match value.into() {
            PlaceholderContent::Empty => {
                trace!(placeholder = %self.shape.name, "no value, left untouched");
            },
            PlaceholderContent::Text(text) => self.set_text(&text)?,
            PlaceholderContent::Paragraphs(items) => self.set_text(&items.join("\n"))?,
            PlaceholderContent::Image(image) => self.insert_picture(image)?,
        }
        Ok(self)
    }

    fn set_text(&mut self, text: &str) -> Result<()> {
        let kind = self.shape.kind_name();
        let ph_type = self.placeholder_type();
        match self.shape.text_body_mut() {
            Some(body) => {
                body.set_text(text);
                Ok(())
            },
            None => Err(Error::invalid_setter(
                format!("value for a {} {} placeholder", kind, ph_type.as_str()),
                "text",
            )),
        }
    }

    /// Turn the placeholder into a picture, fitted and centered in its frame.
    fn insert_picture(&mut self, image: ImageInput) -> Result<()> {
        let ph_type = self.placeholder_type();
        if !ph_type.accepts_picture() {
            return Err(Error::invalid_setter(
                format!("value for a {} placeholder", ph_type.as_str()),
                "picture",
            ));
        }
        let (image, info) = image.into_source(self.fallback_dpi)?;
        if let Some(frame) = self.shape.effective_xfrm() {
            self.shape.xfrm = Some(fit_within(frame, info.width_emu(), info.height_emu()));
        }
        self.shape.kind = ShapeKind::Picture { image };
        Ok(())
    }
}

/// Largest extent with the aspect of `cx` x `cy` that fits in `frame`, centered.
fn fit_within(frame: Xfrm, cx: i64, cy: i64) -> Xfrm {
    if cx <= 0 || cy <= 0 || frame.cx <= 0 || frame.cy <= 0 {
        return frame;
    }
    let scale = (frame.cx as f64 / cx as f64).min(frame.cy as f64 / cy as f64);
    let width = ((cx as f64 * scale).round() as i64).min(frame.cx);
    let height = ((cy as f64 * scale).round() as i64).min(frame.cy);
    Xfrm {
        x: frame.x + (frame.cx - width) / 2,
        y: frame.y + (frame.cy - height) / 2,
        cx: width,
        cy: height,
        rot: frame.rot,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ooxml::pptx::shapes::{ImageSource, PlaceholderFormat, TextBody};

    fn placeholder(ph_type: PlaceholderType, idx: u32) -> MutableShape {
        let mut shape = MutableShape::new(
            2,
            "Placeholder 1",
            ShapeKind::AutoShape {
                geometry: None,
                text_box: false,
                text: Some(TextBody::default()),
            },
        );
        shape.placeholder = Some(PlaceholderFormat {
            ph_type,
            idx,
            orient: None,
            sz: None,
        });
        shape.inherited_xfrm = Some(Xfrm::new(0, 0, 1_000, 1_000));
        shape
    }

    fn png(width: u32, height: u32) -> Vec<u8> {
        let mut out = std::io::Cursor::new(Vec::new());
        image::RgbImage::new(width, height)
            .write_to(&mut out, image::ImageFormat::Png)
            .unwrap();
        out.into_inner()
    }

    #[test]
    fn test_text_values() {
        let mut shape = placeholder(PlaceholderType::Title, 0);
        let mut ph = Placeholder::from_backend(&mut shape).unwrap();
        ph.set_value("Title").unwrap();
        assert_eq!(ph.text().as_deref(), Some("Title"));
        ph.set_value(PlaceholderContent::Empty).unwrap();
        assert_eq!(ph.text().as_deref(), Some("Title"));
        ph.set_value(vec!["a".to_string(), "b".to_string()]).unwrap();
        assert_eq!(shape.text_body().unwrap().paragraphs.len(), 2);
    }

    #[test]
    fn test_picture_values() {
        let mut shape = placeholder(PlaceholderType::Picture, 1);
        Placeholder::from_backend(&mut shape)
            .unwrap()
            .set_value(ImageInput::Bytes(png(4, 2)))
            .unwrap();
        assert!(matches!(
            shape.kind,
            ShapeKind::Picture {
                image: ImageSource::Data { .. }
            }
        ));
        assert!(shape.is_placeholder());
        assert_eq!(shape.xfrm, Some(Xfrm::new(0, 250, 1_000, 500)));

        let mut title = placeholder(PlaceholderType::Title, 0);
        let err = Placeholder::from_backend(&mut title)
            .unwrap()
            .set_value(ImageInput::Bytes(png(4, 2)))
            .unwrap_err();
        assert!(matches!(err, Error::InvalidSetterType { .. }));

        // Text into a placeholder that now holds a picture.
        let err = Placeholder::from_backend(&mut shape)
            .unwrap()
            .set_value("text")
            .unwrap_err();
        assert!(matches!(err, Error::InvalidSetterType { .. }));
    }
}
