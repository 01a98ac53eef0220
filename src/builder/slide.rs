//! Per-slide builder: placeholder values plus recorded shape actions.

use std::fmt;

use tracing::{debug, warn};

use crate::adapter::{PlaceholderContent, Range, Slide, Table, Text};
use crate::builder::options::{PictureData, TableOptions, TextContent, TextData, TextOptions};
use crate::builder::table_input::{TableInput, TableNormalizers};
use crate::common::{IntoColor, RGBColor};
use crate::error::Result;
use crate::template::BoundLayout;

/// A table mutator.
pub type TableMutator = Box<dyn FnOnce(&mut Table<'_>) -> Result<()>>;

/// What goes into a table.
pub enum TableContent {
    Data(TableInput),
    /// Called with an empty `rows` x `cols` table
    Mutator {
        rows: usize,
        cols: usize,
        mutator: TableMutator,
    },
}

impl fmt::Debug for TableContent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TableContent::Data(input) => f.debug_tuple("Data").field(input).finish(),
            TableContent::Mutator { rows, cols, .. } => f
                .debug_struct("Mutator")
                .field("rows", rows)
                .field("cols", cols)
                .finish_non_exhaustive(),
        }
    }
}

/// A table to add.
#[derive(Debug)]
pub struct TableData {
    pub content: TableContent,
    pub range: Range,
    pub options: TableOptions,
}

impl TableData {
    pub fn new(data: impl Into<TableInput>, range: Range) -> Self {
        Self {
            content: TableContent::Data(data.into()),
            range,
            options: TableOptions::default(),
        }
    }

    pub fn with_options(mut self, options: TableOptions) -> Self {
        self.options = options;
        self
    }
}

#[derive(Debug)]
enum ShapeAction {
    Text(TextData),
    Picture(PictureData),
    Table(TableData),
}

/// Builds one slide.
///
/// Shape methods only record what to add; [`build`](Self::build) fills the
/// placeholders of the new slide and then runs the recorded actions in order.
pub struct SlideBuilder {
    layout: Result<BoundLayout>,
    placeholder_values: Option<Vec<PlaceholderContent>>,
    actions: Vec<ShapeAction>,
    notes: Option<String>,
    background: Option<RGBColor>,
}

impl SlideBuilder {
    /// A builder for a slide of `layout` with untouched placeholders.
    pub fn new(layout: BoundLayout) -> Self {
        Self::from_binding(Ok(layout), None)
    }

    pub(crate) fn from_binding(
        layout: Result<BoundLayout>,
        placeholder_values: Option<Vec<PlaceholderContent>>,
    ) -> Self {
        Self {
            layout,
            placeholder_values,
            actions: Vec::new(),
            notes: None,
            background: None,
        }
    }

    /// Fill the placeholders with `values`, in placeholder order.
    pub fn placeholders<I, V>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<PlaceholderContent>,
    {
        self.placeholder_values = Some(values.into_iter().map(Into::into).collect());
        self
    }

    /// Add a text box.
    pub fn text(self, content: impl Into<TextContent>, range: Range, options: TextOptions) -> Self {
        self.text_data(TextData {
            content: content.into(),
            range,
            options,
        })
    }

    /// Add a text box and hand it, empty, to `f`.
    pub fn text_with<F>(self, range: Range, options: TextOptions, f: F) -> Self
    where
        F: FnOnce(&mut Text<'_>) -> Result<()> + 'static,
    {
        self.text(TextContent::mutator(f), range, options)
    }

    pub fn text_data(mut self, data: TextData) -> Self {
        self.actions.push(ShapeAction::Text(data));
        self
    }

    pub fn picture(mut self, data: PictureData) -> Self {
        self.actions.push(ShapeAction::Picture(data));
        self
    }

    /// Add a table filled from `data`.
    pub fn table(self, data: impl Into<TableInput>, range: Range, options: TableOptions) -> Self {
        self.table_data(TableData::new(data, range).with_options(options))
    }

    /// Add an empty `rows` x `cols` table and hand it to `f`.
    pub fn table_with<F>(
        self,
        rows: usize,
        cols: usize,
        range: Range,
        options: TableOptions,
        f: F,
    ) -> Self
    where
        F: FnOnce(&mut Table<'_>) -> Result<()> + 'static,
    {
        self.table_data(TableData {
            content: TableContent::Mutator {
                rows,
                cols,
                mutator: Box::new(f),
            },
            range,
            options,
        })
    }

    pub fn table_data(mut self, data: TableData) -> Self {
        self.actions.push(ShapeAction::Table(data));
        self
    }

    pub fn notes(mut self, text: impl Into<String>) -> Self {
        self.notes = Some(text.into());
        self
    }

    pub fn background(mut self, color: impl IntoColor) -> Result<Self> {
        self.background = Some(color.into_color()?);
        Ok(self)
    }

    /// Number of recorded shape actions.
    pub fn action_count(&self) -> usize {
        self.actions.len()
    }

    /// The backend layout, or the error binding it failed with.
    pub fn layout(self) -> Result<BoundLayout> {
        self.layout
    }

    pub(crate) fn into_parts(self) -> (Result<BoundLayout>, SlideActions) {
        (
            self.layout,
            SlideActions {
                placeholder_values: self.placeholder_values,
                actions: self.actions,
                notes: self.notes,
                background: self.background,
            },
        )
    }
}

impl fmt::Debug for SlideBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SlideBuilder")
            .field("layout", &self.layout)
            .field("placeholder_values", &self.placeholder_values)
            .field("actions", &self.actions)
            .field("notes", &self.notes)
            .field("background", &self.background)
            .finish()
    }
}

/// The part of a [`SlideBuilder`] that runs against a created slide.
#[derive(Debug)]
pub(crate) struct SlideActions {
    placeholder_values: Option<Vec<PlaceholderContent>>,
    actions: Vec<ShapeAction>,
    notes: Option<String>,
    background: Option<RGBColor>,
}

impl SlideActions {
    pub(crate) fn build(self, slide: &mut Slide<'_>, normalizers: &TableNormalizers) -> Result<()> {
        if let Some(values) = self.placeholder_values {
            fill_placeholders(slide, values)?;
        }
        let count = self.actions.len();
        for action in self.actions {
            match action {
                ShapeAction::Text(data) => add_text(slide, data)?,
                ShapeAction::Picture(data) => add_picture(slide, data)?,
                ShapeAction::Table(data) => add_table(slide, data, normalizers)?,
            }
        }
        if let Some(text) = self.notes {
            slide.notes_slide().set_text(&text);
        }
        if let Some(color) = self.background {
            slide.background().set_solid(color)?;
        }
        debug!(slide_id = slide.slide_id(), actions = count, "ran shape actions");
        Ok(())
    }
}

/// Assign the i-th value to the i-th placeholder of the slide.
fn fill_placeholders(slide: &mut Slide<'_>, values: Vec<PlaceholderContent>) -> Result<()> {
    let mut placeholders = slide.placeholders();
    if values.len() > placeholders.len() {
        warn!(
            values = values.len(),
            placeholders = placeholders.len(),
            "more placeholder values than placeholders; extra values ignored"
        );
    }
    let filled = values.len().min(placeholders.len());
    for (placeholder, value) in placeholders.iter_mut().zip(values) {
        placeholder.set_value(value)?;
    }
    debug!(filled, "filled placeholders");
    Ok(())
}

fn add_text(slide: &mut Slide<'_>, data: TextData) -> Result<()> {
    let mut text = slide.add_textbox(&data.range)?;
    match data.content {
        TextContent::Literal(literal) => {
            text.set_text(&literal);
        }
        TextContent::Mutator(mutator) => mutator(&mut text)?,
    }
    data.options.apply(&mut text)
}

fn add_picture(slide: &mut Slide<'_>, data: PictureData) -> Result<()> {
    slide.add_picture(data.image, data.left, data.top, data.width, data.height)?;
    Ok(())
}

fn add_table(slide: &mut Slide<'_>, data: TableData, normalizers: &TableNormalizers) -> Result<()> {
    match data.content {
        TableContent::Data(input) => {
            let rows = normalizers.normalize(&input)?;
            let columns = rows.first().map_or(0, Vec::len);
            let mut table = slide.add_table(rows.len(), columns, &data.range)?;
            table.set_values(&rows)?;
            data.options.apply(&mut table)
        }
        TableContent::Mutator {
            rows,
            cols,
            mutator,
        } => {
            let mut table = slide.add_table(rows, cols, &data.range)?;
            mutator(&mut table)?;
            data.options.apply(&mut table)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::options::CellStyle;
    use crate::common::Length;
    use crate::error::Error;
    use crate::ooxml::pptx::{LayoutId, MutablePresentation};

    fn range() -> Range {
        Range::new((1, "in"), (1, "in"), (4, "in"), (2, "in")).unwrap()
    }

    fn blank() -> BoundLayout {
        BoundLayout {
            id: LayoutId { master: 0, layout: 6 },
            name: "Blank".to_string(),
        }
    }

    fn run(builder: SlideBuilder) -> Result<MutablePresentation> {
        let mut pres = MutablePresentation::new()?;
        let (layout, actions) = builder.into_parts();
        let slide = pres.add_slide(layout?.id)?;
        actions.build(&mut Slide::from_backend(slide), &TableNormalizers::new())?;
        Ok(pres)
    }

    #[test]
    fn test_actions_run_in_order() {
        let builder = SlideBuilder::new(blank())
            .text("first", range(), TextOptions::new().with_bold(true))
            .text_with(range(), TextOptions::default(), |text| {
                text.text_frame().add_paragraph().add_run("second");
                Ok(())
            })
            .notes("speaker notes");
        assert_eq!(builder.action_count(), 2);

        let mut pres = run(builder).unwrap();
        let mut slide = Slide::from_backend(pres.slide_mut(0).unwrap());
        assert_eq!(slide.shape_count(), 2);
        let mut first = slide.shape(0).unwrap();
        let mut frame = first.text_frame().unwrap();
        assert_eq!(frame.text(), "first");
        assert!(frame.fonts().all(|font| font.bold() == Some(true)));
        assert!(slide.shape(1).unwrap().text_frame().unwrap().text().contains("second"));
        assert_eq!(slide.notes_slide().text(), "speaker notes");
    }

    #[test]
    fn test_table_styles() {
        let options = TableOptions::new()
            .with_first_row_header(true)
            .with_bold(false)
            .with_cell_style(0, 0, CellStyle::new().with_bold(true));
        let builder = SlideBuilder::new(blank()).table(
            vec![vec!["Price", "Name"], vec!["3", "Pen"]],
            range(),
            options,
        );
        let mut pres = run(builder).unwrap();
        let mut slide = Slide::from_backend(pres.slide_mut(0).unwrap());
        let mut shape = slide.shape(0).unwrap();
        let mut table = shape.table().unwrap();
        assert!(table.first_row());
        assert_eq!(table.cell_text(0, 0).as_deref(), Some("Price"));
        let mut header = table.cell(0, 0).unwrap();
        assert!(header.text_frame().fonts().all(|f| f.bold() == Some(true)));
        let mut body = table.cell(1, 1).unwrap();
        assert!(body.text_frame().fonts().all(|f| f.bold() == Some(false)));
    }

    #[test]
    fn test_table_mutator() {
        let builder = SlideBuilder::new(blank()).table_with(
            2,
            3,
            range(),
            TableOptions::default(),
            |table| {
                if let Some(mut cell) = table.cell(1, 2) {
                    cell.set_text("x");
                }
                table.set_column_width(0, Length::Inches(2.0))?;
                Ok(())
            },
        );
        let mut pres = run(builder).unwrap();
        let mut slide = Slide::from_backend(pres.slide_mut(0).unwrap());
        let mut shape = slide.shape(0).unwrap();
        let table = shape.table().unwrap();
        assert_eq!(table.rows_count(), 2);
        assert_eq!(table.cell_text(1, 2).as_deref(), Some("x"));
        assert_eq!(table.column_width(0), Some(Length::Inches(2.0)));
    }

    #[test]
    fn test_mutator_error_propagates() {
        let builder = SlideBuilder::new(blank()).text_with(range(), TextOptions::default(), |_| {
            Err(Error::invalid_setter("text", "nothing"))
        });
        assert!(matches!(run(builder), Err(Error::InvalidSetterType { .. })));
    }

    #[test]
    fn test_background() {
        assert!(SlideBuilder::new(blank()).background("#12345").is_err());
        let builder = SlideBuilder::new(blank()).background("#123").unwrap();
        let mut pres = run(builder).unwrap();
        let mut slide = Slide::from_backend(pres.slide_mut(0).unwrap());
        assert_eq!(slide.background().color(), Some(RGBColor::new(0x11, 0x22, 0x33)));
    }
}
