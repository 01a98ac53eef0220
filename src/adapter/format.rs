//! Color, fill and line formatting.

use crate::common::{IntoColor, IntoLength, Length, RGBColor};
use crate::error::Result;
use crate::ooxml::pptx::shapes::{ColorSpec, FillSpec, LineSpec};

/// A color slot: the color of a run, or the foreground of a fill.
///
/// `None` in the slot means the color is inherited.
#[derive(Debug)]
pub struct ColorFormat<'a> {
    color: &'a mut Option<ColorSpec>,
}

impl<'a> ColorFormat<'a> {
    pub fn from_backend(color: &'a mut Option<ColorSpec>) -> Self {
        Self { color }
    }

    pub fn to_backend(&self) -> Option<&ColorSpec> {
        self.color.as_ref()
    }

    /// The explicit RGB value; `None` for theme and inherited colors.
    pub fn rgb(&self) -> Option<RGBColor> {
        self.color.as_ref().and_then(ColorSpec::rgb)
    }

    /// Name of the theme color slot, e.g. `accent1`.
    pub fn theme_color(&self) -> Option<&str> {
        match self.color.as_ref()? {
            ColorSpec::Scheme(name) => Some(name),
            ColorSpec::Rgb(_) => None,
        }
    }

    pub fn set_rgb(&mut self, color: impl IntoColor) -> Result<&mut Self> {
        *self.color = Some(ColorSpec::Rgb(color.into_color()?));
        Ok(self)
    }

    pub fn set_theme_color(&mut self, name: impl Into<String>) -> &mut Self {
        *self.color = Some(ColorSpec::Scheme(name.into()));
        self
    }

    /// Go back to the inherited color.
    pub fn clear(&mut self) -> &mut Self {
        *self.color = None;
        self
    }
}

/// Fill of a shape or table cell.
#[derive(Debug)]
pub struct FillFormat<'a> {
    fill: &'a mut Option<FillSpec>,
}

impl<'a> FillFormat<'a> {
    pub fn from_backend(fill: &'a mut Option<FillSpec>) -> Self {
        Self { fill }
    }

    pub fn to_backend(&self) -> Option<&FillSpec> {
        self.fill.as_ref()
    }

    pub fn is_solid(&self) -> bool {
        matches!(self.fill, Some(FillSpec::Solid(_)))
    }

    /// The solid fill's RGB color.
    pub fn fore_color(&self) -> Option<RGBColor> {
        match self.fill.as_ref()? {
            FillSpec::Solid(color) => color.rgb(),
            FillSpec::NoFill => None,
        }
    }

    /// Fill solidly with `color`.
    pub fn solid(&mut self, color: impl IntoColor) -> Result<&mut Self> {
        *self.fill = Some(FillSpec::Solid(ColorSpec::Rgb(color.into_color()?)));
        Ok(self)
    }

    /// Fill solidly with a theme color.
    pub fn solid_theme(&mut self, name: impl Into<String>) -> &mut Self {
        *self.fill = Some(FillSpec::Solid(ColorSpec::Scheme(name.into())));
        self
    }

    /// Make the fill transparent.
    pub fn background(&mut self) -> &mut Self {
        *self.fill = Some(FillSpec::NoFill);
        self
    }

    /// Go back to the fill of the style or placeholder.
    pub fn clear(&mut self) -> &mut Self {
        *self.fill = None;
        self
    }
}

/// Outline of a shape.
#[derive(Debug)]
pub struct LineFormat<'a> {
    line: &'a mut Option<LineSpec>,
}

impl<'a> LineFormat<'a> {
    pub fn from_backend(line: &'a mut Option<LineSpec>) -> Self {
        Self { line }
    }

    pub fn to_backend(&self) -> Option<&LineSpec> {
        self.line.as_ref()
    }

    pub fn width(&self) -> Option<Length> {
        self.line.as_ref()?.width.map(Length::Emu)
    }

    pub fn set_width(&mut self, width: impl IntoLength) -> Result<&mut Self> {
        let emu = width.into_length()?.emu();
        self.line.get_or_insert_with(LineSpec::default).width = Some(emu);
        Ok(self)
    }

    pub fn color(&self) -> Option<RGBColor> {
        match self.line.as_ref()?.fill.as_ref()? {
            FillSpec::Solid(color) => color.rgb(),
            FillSpec::NoFill => None,
        }
    }

    pub fn set_color(&mut self, color: impl IntoColor) -> Result<&mut Self> {
        let color = color.into_color()?;
        self.line.get_or_insert_with(LineSpec::default).fill =
            Some(FillSpec::Solid(ColorSpec::Rgb(color)));
        Ok(self)
    }

    /// Hide the outline.
    pub fn no_line(&mut self) -> &mut Self {
        self.line.get_or_insert_with(LineSpec::default).fill = Some(FillSpec::NoFill);
        self
    }

    /// Go back to the outline of the style.
    pub fn clear(&mut self) -> &mut Self {
        *self.line = None;
        self
    }
}
