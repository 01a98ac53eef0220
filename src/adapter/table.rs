//! Tables and their cells.

use crate::adapter::format::FillFormat;
use crate::adapter::text::TextFrame;
use crate::common::{IntoLength, Length};
use crate::error::{Error, Result};
use crate::ooxml::pptx::shapes::{TableBody, TableCell, VerticalAnchor};

/// A table held in a graphic frame.
#[derive(Debug)]
pub struct Table<'a> {
    table: &'a mut TableBody,
}

impl<'a> Table<'a> {
    pub fn from_backend(table: &'a mut TableBody) -> Self {
        Self { table }
    }

    pub fn to_backend(&self) -> &TableBody {
        self.table
    }

    pub fn rows_count(&self) -> usize {
        self.table.row_count()
    }

    pub fn columns_count(&self) -> usize {
        self.table.column_count()
    }

    pub fn cell(&mut self, row: usize, col: usize) -> Option<Cell<'_>> {
        self.table.cell_mut(row, col).map(Cell::from_backend)
    }

    pub fn cell_text(&self, row: usize, col: usize) -> Option<String> {
        self.table.cell(row, col).map(|cell| cell.text.text())
    }

    /// Cells in row-major order.
    pub fn cells(&mut self) -> impl Iterator<Item = Cell<'_>> {
        self.table
            .rows
            .iter_mut()
            .flat_map(|row| row.cells.iter_mut())
            .map(Cell::from_backend)
    }

    /// Write `values` into the table row by row.
    ///
    /// The input must fit the table; missing trailing cells are left alone.
    pub fn set_values(&mut self, values: &[Vec<String>]) -> Result<&mut Self> {
        if values.len() > self.rows_count() || values.iter().any(|row| row.len() > self.columns_count()) {
            return Err(Error::InvalidTableData(format!(
                "data does not fit a {}x{} table",
                self.rows_count(),
                self.columns_count()
            )));
        }
        for (row, values) in self.table.rows.iter_mut().zip(values) {
            for (cell, value) in row.cells.iter_mut().zip(values) {
                cell.text.set_text(value);
            }
        }
        Ok(self)
    }

    /// Whether the first row is formatted as a header.
    pub fn first_row(&self) -> bool {
        self.table.first_row
    }

    pub fn set_first_row(&mut self, first_row: bool) -> &mut Self {
        self.table.first_row = first_row;
        self
    }

    pub fn first_col(&self) -> bool {
        self.table.first_col
    }

    pub fn set_first_col(&mut self, first_col: bool) -> &mut Self {
        self.table.first_col = first_col;
        self
    }

    pub fn horz_banding(&self) -> bool {
        self.table.band_row
    }

    pub fn set_horz_banding(&mut self, band_row: bool) -> &mut Self {
        self.table.band_row = band_row;
        self
    }

    pub fn style_id(&self) -> Option<&str> {
        self.table.style_id.as_deref()
    }

    pub fn set_style_id(&mut self, style_id: impl Into<String>) -> &mut Self {
        self.table.style_id = Some(style_id.into());
        self
    }

    pub fn column_width(&self, col: usize) -> Option<Length> {
        self.table.columns.get(col).copied().map(Length::Emu)
    }

    pub fn set_column_width(&mut self, col: usize, width: impl IntoLength) -> Result<&mut Self> {
        let width = width.into_length()?.emu();
        let count = self.columns_count();
        let slot = self
            .table
            .columns
            .get_mut(col)
            .ok_or_else(|| Error::invalid_setter(format!("column < {}", count), col.to_string()))?;
        *slot = width;
        Ok(self)
    }

    pub fn row_height(&self, row: usize) -> Option<Length> {
        self.table.rows.get(row).map(|r| Length::Emu(r.height))
    }

    pub fn set_row_height(&mut self, row: usize, height: impl IntoLength) -> Result<&mut Self> {
        let height = height.into_length()?.emu();
        let count = self.rows_count();
        let slot = self
            .table
            .rows
            .get_mut(row)
            .ok_or_else(|| Error::invalid_setter(format!("row < {}", count), row.to_string()))?;
        slot.height = height;
        Ok(self)
    }
}

/// One cell of a table.
#[derive(Debug)]
pub struct Cell<'a> {
    cell: &'a mut TableCell,
}

impl<'a> Cell<'a> {
    pub fn from_backend(cell: &'a mut TableCell) -> Self {
        Self { cell }
    }

    pub fn to_backend(&self) -> &TableCell {
        self.cell
    }

    pub fn text(&self) -> String {
        self.cell.text.text()
    }

    pub fn set_text(&mut self, text: &str) -> &mut Self {
        self.cell.text.set_text(text);
        self
    }

    pub fn text_frame(&mut self) -> TextFrame<'_> {
        TextFrame::from_backend(&mut self.cell.text)
    }

    pub fn vertical_anchor(&self) -> Option<VerticalAnchor> {
        self.cell.props.anchor
    }

    pub fn set_vertical_anchor(&mut self, anchor: VerticalAnchor) -> &mut Self {
        self.cell.props.anchor = Some(anchor);
        self
    }

    pub fn margin_left(&self) -> Option<Length> {
        self.cell.props.margin_left.map(Length::Emu)
    }

    pub fn margin_right(&self) -> Option<Length> {
        self.cell.props.margin_right.map(Length::Emu)
    }

    pub fn margin_top(&self) -> Option<Length> {
        self.cell.props.margin_top.map(Length::Emu)
    }

    pub fn margin_bottom(&self) -> Option<Length> {
        self.cell.props.margin_bottom.map(Length::Emu)
    }

    pub fn set_margin_left(&mut self, margin: impl IntoLength) -> Result<&mut Self> {
        self.cell.props.margin_left = Some(margin.into_length()?.emu());
        Ok(self)
    }

    pub fn set_margin_right(&mut self, margin: impl IntoLength) -> Result<&mut Self> {
        self.cell.props.margin_right = Some(margin.into_length()?.emu());
        Ok(self)
    }

    pub fn set_margin_top(&mut self, margin: impl IntoLength) -> Result<&mut Self> {
        self.cell.props.margin_top = Some(margin.into_length()?.emu());
        Ok(self)
    }

    pub fn set_margin_bottom(&mut self, margin: impl IntoLength) -> Result<&mut Self> {
        self.cell.props.margin_bottom = Some(margin.into_length()?.emu());
        Ok(self)
    }

    pub fn fill(&mut self) -> FillFormat<'_> {
        FillFormat::from_backend(&mut self.cell.props.fill)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::unit::IN;

    fn grid(rows: &[&[&str]]) -> Vec<Vec<String>> {
        rows.iter()
            .map(|row| row.iter().map(|s| s.to_string()).collect())
            .collect()
    }

    #[test]
    fn test_values_and_cells() {
        let mut body = TableBody::new(2, 2, 2_000, 1_000, "{X}");
        let mut table = Table::from_backend(&mut body);
        table.set_values(&grid(&[&["a", "b"], &["c"]])).unwrap();
        assert_eq!(table.cell_text(0, 1).as_deref(), Some("b"));
        assert_eq!(table.cell_text(1, 0).as_deref(), Some("c"));
        assert_eq!(table.cell_text(1, 1).as_deref(), Some(""));
        assert!(matches!(
            table.set_values(&grid(&[&["a", "b", "c"]])),
            Err(Error::InvalidTableData(_))
        ));

        table
            .cell(1, 1)
            .unwrap()
            .set_text("d")
            .set_vertical_anchor(VerticalAnchor::Middle)
            .fill()
            .solid("#000")
            .unwrap();
        assert_eq!(table.cells().map(|c| c.text()).collect::<Vec<_>>(), ["a", "b", "c", "d"]);
    }

    #[test]
    fn test_dimensions() {
        let mut body = TableBody::new(2, 3, 3_000, 1_000, "{X}");
        let mut table = Table::from_backend(&mut body);
        table.set_column_width(0, (1, IN)).unwrap().set_row_height(1, Length::Emu(700)).unwrap();
        assert_eq!(table.column_width(0), Some(Length::Emu(914_400)));
        assert_eq!(table.row_height(1), Some(Length::Emu(700)));
        assert!(table.set_column_width(3, Length::Emu(1)).is_err());
        table.set_first_row(false).set_style_id("{Y}");
        assert!(!body.first_row);
        assert_eq!(body.style_id.as_deref(), Some("{Y}"));
    }
}
