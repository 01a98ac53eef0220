//! Shape descriptors and their style options.

use std::fmt;

use crate::adapter::{Cell, ImageInput, Range, Table, Text, TextFrame};
use crate::common::{IntoColor, IntoLength, Length, RGBColor};
use crate::error::{Error, Result};
use crate::ooxml::pptx::shapes::{Alignment, AutoSize, VerticalAnchor};

/// Typography and frame settings of a text box. Unset fields keep the
/// backend default.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextOptions {
    pub size: Option<Length>,
    pub bold: Option<bool>,
    pub italic: Option<bool>,
    pub underline: Option<bool>,
    pub font_name: Option<String>,
    pub color: Option<RGBColor>,
    pub margin_left: Option<Length>,
    pub margin_top: Option<Length>,
    pub margin_right: Option<Length>,
    pub margin_bottom: Option<Length>,
    pub vertical_anchor: Option<VerticalAnchor>,
    pub word_wrap: Option<bool>,
    pub auto_size: Option<AutoSize>,
    pub alignment: Option<Alignment>,
    /// Indent level of every paragraph, 0 to 8
    pub level: Option<u8>,
}

impl TextOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_size(mut self, size: impl IntoLength) -> Result<Self> {
        self.size = Some(size.into_length()?);
        Ok(self)
    }

    pub fn with_bold(mut self, bold: bool) -> Self {
        self.bold = Some(bold);
        self
    }

    pub fn with_italic(mut self, italic: bool) -> Self {
        self.italic = Some(italic);
        self
    }

    pub fn with_underline(mut self, underline: bool) -> Self {
        self.underline = Some(underline);
        self
    }

    pub fn with_font_name(mut self, name: impl Into<String>) -> Self {
        self.font_name = Some(name.into());
        self
    }

    pub fn with_color(mut self, color: impl IntoColor) -> Result<Self> {
        self.color = Some(color.into_color()?);
        Ok(self)
    }

    /// Set all four margins.
    pub fn with_margins(mut self, margin: impl IntoLength) -> Result<Self> {
        let margin = margin.into_length()?;
        self.margin_left = Some(margin);
        self.margin_top = Some(margin);
        self.margin_right = Some(margin);
        self.margin_bottom = Some(margin);
        Ok(self)
    }

    pub fn with_vertical_anchor(mut self, anchor: VerticalAnchor) -> Self {
        self.vertical_anchor = Some(anchor);
        self
    }

    pub fn with_word_wrap(mut self, wrap: bool) -> Self {
        self.word_wrap = Some(wrap);
        self
    }

    pub fn with_auto_size(mut self, auto_size: AutoSize) -> Self {
        self.auto_size = Some(auto_size);
        self
    }

    pub fn with_alignment(mut self, alignment: Alignment) -> Self {
        self.alignment = Some(alignment);
        self
    }

    pub fn with_level(mut self, level: u8) -> Result<Self> {
        if level > 8 {
            return Err(Error::invalid_setter("level in 0..=8", level.to_string()));
        }
        self.level = Some(level);
        Ok(self)
    }

    /// Apply to a text box: frame settings, then paragraphs, then fonts.
    pub(crate) fn apply(&self, text: &mut Text<'_>) -> Result<()> {
        let mut frame = text.text_frame();
        if let Some(margin) = self.margin_left {
            frame.set_margin_left(margin)?;
        }
        if let Some(margin) = self.margin_top {
            frame.set_margin_top(margin)?;
        }
        if let Some(margin) = self.margin_right {
            frame.set_margin_right(margin)?;
        }
        if let Some(margin) = self.margin_bottom {
            frame.set_margin_bottom(margin)?;
        }
        if let Some(anchor) = self.vertical_anchor {
            frame.set_vertical_anchor(anchor);
        }
        if let Some(wrap) = self.word_wrap {
            frame.set_word_wrap(wrap);
        }
        if let Some(auto_size) = self.auto_size {
            frame.set_auto_size(auto_size);
        }
        if let Some(alignment) = self.alignment {
            frame.set_alignment(alignment);
        }
        if let Some(level) = self.level {
            for mut paragraph in frame.paragraphs() {
                paragraph.set_level(level)?;
            }
        }
        FontStyle::from(self).apply(&mut frame)
    }
}

/// Run-level settings shared by text boxes and table cells.
#[derive(Debug, Clone, Default, PartialEq)]
struct FontStyle {
    size: Option<Length>,
    bold: Option<bool>,
    italic: Option<bool>,
    underline: Option<bool>,
    name: Option<String>,
    color: Option<RGBColor>,
}

impl FontStyle {
    fn is_empty(&self) -> bool {
        *self == FontStyle::default()
    }

    /// Fields of `self`, falling back to `other` where unset.
    fn or(&self, other: &FontStyle) -> FontStyle {
        FontStyle {
            size: self.size.or(other.size),
            bold: self.bold.or(other.bold),
            italic: self.italic.or(other.italic),
            underline: self.underline.or(other.underline),
            name: self.name.clone().or_else(|| other.name.clone()),
            color: self.color.or(other.color),
        }
    }

    fn apply(&self, frame: &mut TextFrame<'_>) -> Result<()> {
        if self.is_empty() {
            return Ok(());
        }
        for mut font in frame.fonts() {
            if let Some(size) = self.size {
                font.set_size(size)?;
            }
            if let Some(bold) = self.bold {
                font.set_bold(bold);
            }
            if let Some(italic) = self.italic {
                font.set_italic(italic);
            }
            if let Some(underline) = self.underline {
                font.set_underline(underline);
            }
            if let Some(name) = &self.name {
                font.set_name(name.clone());
            }
            if let Some(color) = self.color {
                font.set_color(color)?;
            }
        }
        Ok(())
    }
}

impl From<&TextOptions> for FontStyle {
    fn from(options: &TextOptions) -> Self {
        Self {
            size: options.size,
            bold: options.bold,
            italic: options.italic,
            underline: options.underline,
            name: options.font_name.clone(),
            color: options.color,
        }
    }
}

/// A text box mutator.
pub type TextMutator = Box<dyn FnOnce(&mut Text<'_>) -> Result<()>>;

/// What goes into a text box.
pub enum TextContent {
    Literal(String),
    /// Called with the empty text box
    Mutator(TextMutator),
}

impl TextContent {
    pub fn mutator(f: impl FnOnce(&mut Text<'_>) -> Result<()> + 'static) -> Self {
        TextContent::Mutator(Box::new(f))
    }
}

impl From<String> for TextContent {
    fn from(text: String) -> Self {
        TextContent::Literal(text)
    }
}

impl From<&str> for TextContent {
    fn from(text: &str) -> Self {
        TextContent::Literal(text.to_string())
    }
}

impl fmt::Debug for TextContent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TextContent::Literal(text) => f.debug_tuple("Literal").field(text).finish(),
            TextContent::Mutator(_) => f.write_str("Mutator(..)"),
        }
    }
}

/// A text box to add.
#[derive(Debug)]
pub struct TextData {
    pub content: TextContent,
    pub range: Range,
    pub options: TextOptions,
}

impl TextData {
    pub fn new(content: impl Into<TextContent>, range: Range) -> Self {
        Self {
            content: content.into(),
            range,
            options: TextOptions::default(),
        }
    }

    pub fn with_options(mut self, options: TextOptions) -> Self {
        self.options = options;
        self
    }
}

/// A picture to add. A missing width or height follows from the image.
#[derive(Debug, Clone, PartialEq)]
pub struct PictureData {
    pub image: ImageInput,
    pub left: Length,
    pub top: Length,
    pub width: Option<Length>,
    pub height: Option<Length>,
}

impl PictureData {
    pub fn at(image: impl Into<ImageInput>, left: impl IntoLength, top: impl IntoLength) -> Result<Self> {
        Ok(Self {
            image: image.into(),
            left: left.into_length()?,
            top: top.into_length()?,
            width: None,
            height: None,
        })
    }

    pub fn with_width(mut self, width: impl IntoLength) -> Result<Self> {
        self.width = Some(width.into_length()?);
        Ok(self)
    }

    pub fn with_height(mut self, height: impl IntoLength) -> Result<Self> {
        self.height = Some(height.into_length()?);
        Ok(self)
    }
}

/// Style of a single table cell. Set fields win over the bulk table options.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CellStyle {
    pub alignment: Option<Alignment>,
    pub vertical_anchor: Option<VerticalAnchor>,
    pub bold: Option<bool>,
    pub italic: Option<bool>,
    pub font_size: Option<Length>,
    pub font_name: Option<String>,
    pub color: Option<RGBColor>,
    pub fill: Option<RGBColor>,
}

impl CellStyle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_alignment(mut self, alignment: Alignment) -> Self {
        self.alignment = Some(alignment);
        self
    }

    pub fn with_vertical_anchor(mut self, anchor: VerticalAnchor) -> Self {
        self.vertical_anchor = Some(anchor);
        self
    }

    pub fn with_bold(mut self, bold: bool) -> Self {
        self.bold = Some(bold);
        self
    }

    pub fn with_italic(mut self, italic: bool) -> Self {
        self.italic = Some(italic);
        self
    }

    pub fn with_font_size(mut self, size: impl IntoLength) -> Result<Self> {
        self.font_size = Some(size.into_length()?);
        Ok(self)
    }

    pub fn with_font_name(mut self, name: impl Into<String>) -> Self {
        self.font_name = Some(name.into());
        self
    }

    pub fn with_color(mut self, color: impl IntoColor) -> Result<Self> {
        self.color = Some(color.into_color()?);
        Ok(self)
    }

    pub fn with_fill(mut self, color: impl IntoColor) -> Result<Self> {
        self.fill = Some(color.into_color()?);
        Ok(self)
    }

    fn font(&self) -> FontStyle {
        FontStyle {
            size: self.font_size,
            bold: self.bold,
            italic: self.italic,
            underline: None,
            name: self.font_name.clone(),
            color: self.color,
        }
    }
}

/// Settings of a table. Unset fields keep the backend default.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TableOptions {
    /// Format the first row as a header
    pub first_row_header: bool,
    pub style_id: Option<String>,
    pub alignment: Option<Alignment>,
    pub vertical_anchor: Option<VerticalAnchor>,
    pub font_size: Option<Length>,
    pub font_name: Option<String>,
    pub bold: Option<bool>,
    pub italic: Option<bool>,
    pub column_widths: Vec<Length>,
    /// Per-cell styles by row, then column
    pub cell_styles: Vec<Vec<Option<CellStyle>>>,
}

impl TableOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_first_row_header(mut self, header: bool) -> Self {
        self.first_row_header = header;
        self
    }

    pub fn with_style_id(mut self, style_id: impl Into<String>) -> Self {
        self.style_id = Some(style_id.into());
        self
    }

    pub fn with_alignment(mut self, alignment: Alignment) -> Self {
        self.alignment = Some(alignment);
        self
    }

    pub fn with_vertical_anchor(mut self, anchor: VerticalAnchor) -> Self {
        self.vertical_anchor = Some(anchor);
        self
    }

    pub fn with_font_size(mut self, size: impl IntoLength) -> Result<Self> {
        self.font_size = Some(size.into_length()?);
        Ok(self)
    }

    pub fn with_font_name(mut self, name: impl Into<String>) -> Self {
        self.font_name = Some(name.into());
        self
    }

    pub fn with_bold(mut self, bold: bool) -> Self {
        self.bold = Some(bold);
        self
    }

    pub fn with_italic(mut self, italic: bool) -> Self {
        self.italic = Some(italic);
        self
    }

    pub fn with_column_widths<I, L>(mut self, widths: I) -> Result<Self>
    where
        I: IntoIterator<Item = L>,
        L: IntoLength,
    {
        self.column_widths = widths
            .into_iter()
            .map(IntoLength::into_length)
            .collect::<Result<_>>()?;
        Ok(self)
    }

    pub fn with_cell_style(mut self, row: usize, col: usize, style: CellStyle) -> Self {
        if self.cell_styles.len() <= row {
            self.cell_styles.resize(row + 1, Vec::new());
        }
        let cells = &mut self.cell_styles[row];
        if cells.len() <= col {
            cells.resize(col + 1, None);
        }
        cells[col] = Some(style);
        self
    }

    fn cell_style(&self, row: usize, col: usize) -> Option<&CellStyle> {
        self.cell_styles.get(row)?.get(col)?.as_ref()
    }

    fn font(&self) -> FontStyle {
        FontStyle {
            size: self.font_size,
            bold: self.bold,
            italic: self.italic,
            underline: None,
            name: self.font_name.clone(),
            color: None,
        }
    }

    /// Apply to a filled table: table flags and column widths, then per-cell
    /// styles, then the bulk alignment and font settings where a cell style
    /// left them unset.
    pub(crate) fn apply(&self, table: &mut Table<'_>) -> Result<()> {
        table.set_first_row(self.first_row_header);
        if let Some(style_id) = &self.style_id {
            table.set_style_id(style_id.clone());
        }
        for (col, width) in self.column_widths.iter().enumerate() {
            if col < table.columns_count() {
                table.set_column_width(col, *width)?;
            }
        }

        let columns = table.columns_count().max(1);
        let bulk_font = self.font();
        let default_style = CellStyle::default();
        for (i, mut cell) in table.cells().enumerate() {
            let style = self.cell_style(i / columns, i % columns).unwrap_or(&default_style);
            apply_cell(&mut cell, style, self, &bulk_font)?;
        }
        Ok(())
    }
}

fn apply_cell(
    cell: &mut Cell<'_>,
    style: &CellStyle,
    options: &TableOptions,
    bulk_font: &FontStyle,
) -> Result<()> {
    if let Some(fill) = style.fill {
        cell.fill().solid(fill)?;
    }
    if let Some(anchor) = style.vertical_anchor.or(options.vertical_anchor) {
        cell.set_vertical_anchor(anchor);
    }
    let mut frame = cell.text_frame();
    if let Some(alignment) = style.alignment.or(options.alignment) {
        frame.set_alignment(alignment);
    }
    style.font().or(bulk_font).apply(&mut frame)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::Unit;

    #[test]
    fn test_text_options_literals() {
        let options = TextOptions::new()
            .with_size((24, "pt"))
            .unwrap()
            .with_color("#336699")
            .unwrap()
            .with_bold(true);
        assert_eq!(options.size, Some(Length::Points(24)));
        assert_eq!(options.color, Some(RGBColor::new(0x33, 0x66, 0x99)));
        assert!(TextOptions::new().with_size((24, "px")).is_err());
        assert!(TextOptions::new().with_level(9).is_err());
    }

    #[test]
    fn test_picture_data() {
        let picture = PictureData::at("logo.png", (50, "pt"), (100, Unit::Points)).unwrap();
        assert_eq!(picture.left.emu(), 635_000);
        assert_eq!(picture.width, None);
        let picture = picture.with_width((2, "in")).unwrap();
        assert_eq!(picture.width, Some(Length::Inches(2.0)));
    }

    #[test]
    fn test_cell_style_wins_over_bulk() {
        let options = TableOptions::new()
            .with_bold(false)
            .with_alignment(Alignment::Left)
            .with_cell_style(1, 2, CellStyle::new().with_bold(true));
        assert_eq!(options.cell_styles.len(), 2);
        assert_eq!(options.cell_styles[1].len(), 3);

        let style = options.cell_style(1, 2).unwrap();
        let font = style.font().or(&options.font());
        assert_eq!(font.bold, Some(true));
        assert!(options.cell_style(0, 0).is_none());
        let font = CellStyle::default().font().or(&options.font());
        assert_eq!(font.bold, Some(false));
    }
}
