//! Slides, their notes page and background.

use crate::adapter::placeholder::Placeholder;
use crate::adapter::shape::{ImageInput, Range, Shape};
use crate::adapter::table::Table;
use crate::adapter::text::{Text, TextFrame};
use crate::common::{IntoColor, Length, RGBColor};
use crate::error::{Error, Result};
use crate::ooxml::pptx::shapes::{ColorSpec, FillSpec, MutableShape};
use crate::ooxml::pptx::{LayoutId, MutableSlide};

/// A slide being populated.
#[derive(Debug)]
pub struct Slide<'a> {
    slide: &'a mut MutableSlide,
}

impl<'a> Slide<'a> {
    pub fn from_backend(slide: &'a mut MutableSlide) -> Self {
        Self { slide }
    }

    pub fn to_backend(&self) -> &MutableSlide {
        self.slide
    }

    pub fn to_backend_mut(&mut self) -> &mut MutableSlide {
        self.slide
    }

    pub fn slide_id(&self) -> u32 {
        self.slide.slide_id()
    }

    pub fn layout(&self) -> Option<LayoutId> {
        self.slide.layout()
    }

    pub fn layout_name(&self) -> &str {
        self.slide.layout_name()
    }

    pub fn shape_count(&self) -> usize {
        self.slide.shape_count()
    }

    pub fn shape(&mut self, index: usize) -> Option<Shape<'_>> {
        self.slide.shapes_mut().get_mut(index).map(Shape::from_backend)
    }

    /// Find a shape anywhere in the tree by its id.
    pub fn shape_by_id(&mut self, shape_id: u32) -> Result<Shape<'_>> {
        self.slide
            .shape_mut(shape_id)
            .map(Shape::from_backend)
            .ok_or(Error::ShapeNotFound(shape_id))
    }

    pub fn shapes(&mut self) -> impl Iterator<Item = Shape<'_>> {
        self.slide.shapes_mut().iter_mut().map(Shape::from_backend)
    }

    /// Placeholders of the slide, ordered by idx.
    pub fn placeholders(&mut self) -> Vec<Placeholder<'_>> {
        let dpi = self.slide.defaults.fallback_dpi;
        let mut shapes: Vec<&mut MutableShape> = self
            .slide
            .shapes_mut()
            .iter_mut()
            .filter(|s| s.is_placeholder())
            .collect();
        shapes.sort_by_key(|s| s.placeholder.as_ref().map_or(0, |ph| ph.idx));
        shapes
            .into_iter()
            .filter_map(|s| Placeholder::from_backend(s).ok())
            .map(|ph| ph.with_fallback_dpi(dpi))
            .collect()
    }

    /// Add an empty text box covering `range`.
    pub fn add_textbox(&mut self, range: &Range) -> Result<Text<'_>> {
        let xfrm = range.to_xfrm();
        Text::from_backend(self.slide.add_textbox(xfrm.x, xfrm.y, xfrm.cx, xfrm.cy))
    }

    /// Add a picture at (`left`, `top`). A missing width or height follows
    /// from the image's size and resolution.
    pub fn add_picture(
        &mut self,
        image: impl Into<ImageInput>,
        left: Length,
        top: Length,
        width: Option<Length>,
        height: Option<Length>,
    ) -> Result<Shape<'_>> {
        let image = image.into();
        let label = image.label();
        let shape = self
            .slide
            .add_picture(
                image.into_bytes()?,
                left.emu(),
                top.emu(),
                width.map(|w| w.emu()),
                height.map(|h| h.emu()),
            )
            .map_err(|e| Error::UnsupportedImage(format!("{}: {}", label, e)))?;
        Ok(Shape::from_backend(shape))
    }

    /// Add an empty `rows` x `cols` table covering `range`.
    pub fn add_table(&mut self, rows: usize, cols: usize, range: &Range) -> Result<Table<'_>> {
        if rows == 0 || cols == 0 {
            return Err(Error::InvalidTableData(format!(
                "a table needs at least one row and column, got {}x{}",
                rows, cols
            )));
        }
        let xfrm = range.to_xfrm();
        let shape = self.slide.add_table(rows, cols, xfrm.x, xfrm.y, xfrm.cx, xfrm.cy);
        let shape_id = shape.shape_id;
        shape
            .table_mut()
            .map(Table::from_backend)
            .ok_or(Error::ShapeNotFound(shape_id))
    }

    pub fn has_notes_slide(&self) -> bool {
        self.slide.has_notes()
    }

    /// The notes page, created on first access.
    pub fn notes_slide(&mut self) -> NotesSlide<'_> {
        NotesSlide::from_backend(self.slide)
    }

    pub fn background(&mut self) -> Background<'_> {
        Background::from_backend(self.slide)
    }
}

/// The speaker notes of a slide.
#[derive(Debug)]
pub struct NotesSlide<'a> {
    slide: &'a mut MutableSlide,
}

impl<'a> NotesSlide<'a> {
    pub fn from_backend(slide: &'a mut MutableSlide) -> Self {
        Self { slide }
    }

    pub fn to_backend(&self) -> &MutableSlide {
        self.slide
    }

    pub fn text(&self) -> String {
        self.slide.notes().map(|n| n.text()).unwrap_or_default()
    }

    pub fn set_text(&mut self, text: &str) -> &mut Self {
        self.slide.set_notes(text);
        self
    }

    pub fn text_frame(&mut self) -> TextFrame<'_> {
        TextFrame::from_backend(self.slide.notes_mut())
    }
}

/// The background of a slide.
#[derive(Debug)]
pub struct Background<'a> {
    slide: &'a mut MutableSlide,
}

impl<'a> Background<'a> {
    pub fn from_backend(slide: &'a mut MutableSlide) -> Self {
        Self { slide }
    }

    pub fn to_backend(&self) -> Option<&FillSpec> {
        self.slide.background()
    }

    /// Whether the slide overrides the master's background.
    pub fn is_custom(&self) -> bool {
        self.slide.background().is_some()
    }

    pub fn color(&self) -> Option<RGBColor> {
        match self.slide.background()? {
            FillSpec::Solid(color) => color.rgb(),
            FillSpec::NoFill => None,
        }
    }

    pub fn set_solid(&mut self, color: impl IntoColor) -> Result<&mut Self> {
        let color = color.into_color()?;
        self.slide
            .set_background(Some(FillSpec::Solid(ColorSpec::Rgb(color))));
        Ok(self)
    }

    /// Use the master's background again.
    pub fn follow_master(&mut self) -> &mut Self {
        self.slide.set_background(None);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::unit::IN;
    use crate::ooxml::pptx::MutablePresentation;
    use crate::ooxml::pptx::shapes::PlaceholderType;

    fn png(width: u32, height: u32) -> Vec<u8> {
        let mut out = std::io::Cursor::new(Vec::new());
        image::RgbImage::new(width, height)
            .write_to(&mut out, image::ImageFormat::Png)
            .unwrap();
        out.into_inner()
    }

    #[test]
    fn test_placeholders_in_idx_order() {
        let mut pres = MutablePresentation::new().unwrap();
        // Two Content: title, then two content placeholders.
        let backend = pres.add_slide(LayoutId { master: 0, layout: 3 }).unwrap();
        let mut slide = Slide::from_backend(backend);
        let placeholders = slide.placeholders();
        assert_eq!(placeholders.len(), 3);
        assert_eq!(placeholders[0].placeholder_type(), PlaceholderType::Title);
        assert!(placeholders.windows(2).all(|w| w[0].idx() <= w[1].idx()));
    }

    #[test]
    fn test_add_shapes() {
        let mut pres = MutablePresentation::new().unwrap();
        let backend = pres.add_slide(LayoutId { master: 0, layout: 6 }).unwrap();
        let mut slide = Slide::from_backend(backend);

        let range = Range::new((1, IN), (1, IN), (5, IN), (2, IN)).unwrap();
        slide.add_textbox(&range).unwrap().set_text("Hello");
        let picture = slide
            .add_picture(png(10, 20), Length::Points(50), Length::Points(100), None, None)
            .unwrap();
        assert_eq!(picture.width(), Some(Length::Points(10)));
        assert_eq!(picture.height(), Some(Length::Points(20)));
        slide.add_table(2, 3, &range).unwrap().set_first_row(false);
        assert!(slide.add_table(0, 3, &range).is_err());
        assert!(matches!(
            slide.add_picture(vec![1u8, 2, 3], Length::Points(0), Length::Points(0), None, None),
            Err(Error::UnsupportedImage(_))
        ));

        assert_eq!(slide.shape_count(), 3);
        assert_eq!(slide.shape(0).unwrap().left(), Some(Length::Emu(914_400)));
        let table_id = slide.shape(2).unwrap().shape_id();
        assert!(slide.shape_by_id(table_id).unwrap().has_table());
        assert!(matches!(slide.shape_by_id(99), Err(Error::ShapeNotFound(99))));
    }

    #[test]
    fn test_notes_and_background() {
        let mut pres = MutablePresentation::new().unwrap();
        let backend = pres.add_slide(LayoutId { master: 0, layout: 6 }).unwrap();
        let mut slide = Slide::from_backend(backend);
        assert!(!slide.has_notes_slide());
        slide.notes_slide().set_text("Speak slowly");
        assert_eq!(slide.notes_slide().text(), "Speak slowly");

        slide.background().set_solid("#336699").unwrap();
        assert_eq!(slide.background().color(), Some(RGBColor::new(0x33, 0x66, 0x99)));
        slide.background().follow_master();
        assert!(!slide.background().is_custom());
        assert!(slide.to_backend().has_notes());
    }
}
