//! Table inputs and the normalizer chain that turns them into rows of
//! strings.
//!
//! Inputs are wrapped in a [`TableInput`] and passed along a chain of
//! [`TableNormalizer`]s; the first normalizer that accepts the input produces
//! the rows. The built-in chain handles plain rows, [`TableRecord`] records,
//! serde-serializable records and [`DataFrame`] frames, in that order.
//! Custom normalizers see [`TableInput::Custom`] values.

use std::any::Any;
use std::fmt;

use tracing::trace;

use crate::error::{Error, Result};

/// Rows of cell text, the first row possibly a header.
pub type Rows = Vec<Vec<String>>;

/// A record type whose field names form a header row.
///
/// ```
/// use slidecraft::builder::TableRecord;
///
/// struct Product {
///     name: &'static str,
///     price: f64,
/// }
///
/// impl TableRecord for Product {
///     fn headers() -> Vec<String> {
///         vec!["name".into(), "price".into()]
///     }
///
///     fn values(&self) -> Vec<String> {
///         vec![self.name.to_string(), self.price.to_string()]
///     }
/// }
/// ```
pub trait TableRecord {
    fn headers() -> Vec<String>;

    fn values(&self) -> Vec<String>;
}

/// A frame of named columns.
pub trait DataFrame {
    fn column_names(&self) -> Vec<String>;

    fn row_count(&self) -> usize;

    /// Text of the cell at `row`, `col`; missing cells are empty.
    fn cell(&self, row: usize, col: usize) -> String;
}

/// A column-oriented in-memory [`DataFrame`].
///
/// Shorter columns are padded with empty cells.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ColumnFrame {
    columns: Vec<(String, Vec<String>)>,
}

impl ColumnFrame {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_column<I, S>(mut self, name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: ToString,
    {
        self.columns.push((
            name.into(),
            values.into_iter().map(|v| v.to_string()).collect(),
        ));
        self
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }
}

impl DataFrame for ColumnFrame {
    fn column_names(&self) -> Vec<String> {
        self.columns.iter().map(|(name, _)| name.clone()).collect()
    }

    fn row_count(&self) -> usize {
        self.columns
            .iter()
            .map(|(_, values)| values.len())
            .max()
            .unwrap_or(0)
    }

    fn cell(&self, row: usize, col: usize) -> String {
        self.columns
            .get(col)
            .and_then(|(_, values)| values.get(row))
            .cloned()
            .unwrap_or_default()
    }
}

/// Data for a table, before normalization.
pub enum TableInput {
    /// Rows of cells, taken as they are
    Rows(Rows),
    /// Records with their header
    Records { headers: Vec<String>, rows: Rows },
    /// Serialized records; keys of the first record form the header
    #[cfg(feature = "serde-records")]
    Serialized(Vec<serde_json::Value>),
    Frame(Box<dyn DataFrame>),
    /// Anything else, for registered normalizers
    Custom(Box<dyn Any>),
}

impl TableInput {
    pub fn rows<R, S>(rows: impl IntoIterator<Item = R>) -> Self
    where
        R: IntoIterator<Item = S>,
        S: ToString,
    {
        TableInput::Rows(
            rows.into_iter()
                .map(|row| row.into_iter().map(|cell| cell.to_string()).collect())
                .collect(),
        )
    }

    pub fn records<T: TableRecord>(records: &[T]) -> Self {
        TableInput::Records {
            headers: T::headers(),
            rows: records.iter().map(TableRecord::values).collect(),
        }
    }

    /// Serialize `records`, each of which must serialize to a map.
    #[cfg(feature = "serde-records")]
    pub fn serialize<T: serde::Serialize>(records: &[T]) -> Result<Self> {
        Ok(TableInput::Serialized(
            records
                .iter()
                .map(serde_json::to_value)
                .collect::<std::result::Result<_, _>>()?,
        ))
    }

    pub fn frame(frame: impl DataFrame + 'static) -> Self {
        TableInput::Frame(Box::new(frame))
    }

    pub fn custom(value: impl Any) -> Self {
        TableInput::Custom(Box::new(value))
    }

    fn kind(&self) -> &'static str {
        match self {
            TableInput::Rows(_) => "rows",
            TableInput::Records { .. } => "records",
            #[cfg(feature = "serde-records")]
            TableInput::Serialized(_) => "serialized records",
            TableInput::Frame(_) => "frame",
            TableInput::Custom(_) => "custom",
        }
    }
}

impl fmt::Debug for TableInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TableInput::Rows(rows) => f.debug_tuple("Rows").field(rows).finish(),
            TableInput::Records { headers, rows } => f
                .debug_struct("Records")
                .field("headers", headers)
                .field("rows", rows)
                .finish(),
            #[cfg(feature = "serde-records")]
            TableInput::Serialized(values) => f.debug_tuple("Serialized").field(values).finish(),
            TableInput::Frame(_) => f.write_str("Frame(..)"),
            TableInput::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

impl From<Rows> for TableInput {
    fn from(rows: Rows) -> Self {
        TableInput::Rows(rows)
    }
}

impl From<Vec<Vec<&str>>> for TableInput {
    fn from(rows: Vec<Vec<&str>>) -> Self {
        TableInput::rows(rows)
    }
}

impl<const N: usize> From<Vec<[&str; N]>> for TableInput {
    fn from(rows: Vec<[&str; N]>) -> Self {
        TableInput::rows(rows)
    }
}

impl From<ColumnFrame> for TableInput {
    fn from(frame: ColumnFrame) -> Self {
        TableInput::frame(frame)
    }
}

/// One link of the normalizer chain.
pub trait TableNormalizer {
    fn name(&self) -> &str;

    /// Rows for `input`, or `None` to pass it on.
    fn normalize(&self, input: &TableInput) -> Option<Result<Rows>>;
}

struct RowsNormalizer;

impl TableNormalizer for RowsNormalizer {
    fn name(&self) -> &str {
        "rows"
    }

    fn normalize(&self, input: &TableInput) -> Option<Result<Rows>> {
        match input {
            TableInput::Rows(rows) => Some(Ok(rows.clone())),
            _ => None,
        }
    }
}

struct RecordNormalizer;

impl TableNormalizer for RecordNormalizer {
    fn name(&self) -> &str {
        "records"
    }

    fn normalize(&self, input: &TableInput) -> Option<Result<Rows>> {
        let TableInput::Records { headers, rows } = input else {
            return None;
        };
        let mut table = Vec::with_capacity(rows.len() + 1);
        table.push(headers.clone());
        table.extend(rows.iter().cloned());
        Some(Ok(table))
    }
}

#[cfg(feature = "serde-records")]
struct SerdeNormalizer;

#[cfg(feature = "serde-records")]
impl SerdeNormalizer {
    fn cell(value: &serde_json::Value) -> String {
        use serde_json::Value;

        match value {
            Value::Null => String::new(),
            Value::String(s) => s.clone(),
            Value::Bool(b) => b.to_string(),
            Value::Number(n) => n.to_string(),
            other => other.to_string(),
        }
    }
}

#[cfg(feature = "serde-records")]
impl TableNormalizer for SerdeNormalizer {
    fn name(&self) -> &str {
        "serde records"
    }

    fn normalize(&self, input: &TableInput) -> Option<Result<Rows>> {
        let TableInput::Serialized(values) = input else {
            return None;
        };
        let Some(first) = values.first() else {
            return Some(Err(Error::InvalidTableData("no records".to_string())));
        };
        let Some(first) = first.as_object() else {
            return Some(Err(Error::InvalidTableData(
                "records must serialize to maps".to_string(),
            )));
        };
        let headers: Vec<String> = first.keys().cloned().collect();
        let mut table = vec![headers.clone()];
        for value in values {
            let Some(record) = value.as_object() else {
                return Some(Err(Error::InvalidTableData(
                    "records must serialize to maps".to_string(),
                )));
            };
            table.push(
                headers
                    .iter()
                    .map(|key| record.get(key).map(Self::cell).unwrap_or_default())
                    .collect(),
            );
        }
        Some(Ok(table))
    }
}

struct FrameNormalizer;

impl TableNormalizer for FrameNormalizer {
    fn name(&self) -> &str {
        "frame"
    }

    fn normalize(&self, input: &TableInput) -> Option<Result<Rows>> {
        let TableInput::Frame(frame) = input else {
            return None;
        };
        let headers = frame.column_names();
        let columns = headers.len();
        let mut table = vec![headers];
        for row in 0..frame.row_count() {
            table.push((0..columns).map(|col| frame.cell(row, col)).collect());
        }
        Some(Ok(table))
    }
}

/// The normalizer chain.
pub struct TableNormalizers {
    chain: Vec<Box<dyn TableNormalizer>>,
}

impl Default for TableNormalizers {
    fn default() -> Self {
        let mut chain: Vec<Box<dyn TableNormalizer>> =
            vec![Box::new(RowsNormalizer), Box::new(RecordNormalizer)];
        #[cfg(feature = "serde-records")]
        chain.push(Box::new(SerdeNormalizer));
        chain.push(Box::new(FrameNormalizer));
        Self { chain }
    }
}

impl TableNormalizers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `normalizer` to the chain.
    pub fn register(&mut self, normalizer: impl TableNormalizer + 'static) {
        self.chain.push(Box::new(normalizer));
    }

    pub fn names(&self) -> Vec<&str> {
        self.chain.iter().map(|n| n.name()).collect()
    }

    /// Rows for `input`, ragged rows padded with empty cells.
    pub fn normalize(&self, input: &TableInput) -> Result<Rows> {
        for normalizer in &self.chain {
            if let Some(rows) = normalizer.normalize(input) {
                trace!(normalizer = normalizer.name(), "normalized table input");
                return pad(rows?);
            }
        }
        Err(Error::InvalidTableData(format!(
            "no normalizer accepts {} input",
            input.kind()
        )))
    }
}

impl fmt::Debug for TableNormalizers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}

fn pad(mut rows: Rows) -> Result<Rows> {
    let columns = rows.iter().map(Vec::len).max().unwrap_or(0);
    if rows.is_empty() || columns == 0 {
        return Err(Error::InvalidTableData("a table needs at least one cell".to_string()));
    }
    for row in &mut rows {
        row.resize(columns, String::new());
    }
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Product {
        name: &'static str,
        stock: u32,
    }

    impl TableRecord for Product {
        fn headers() -> Vec<String> {
            vec!["Name".to_string(), "Stock".to_string()]
        }

        fn values(&self) -> Vec<String> {
            vec![self.name.to_string(), self.stock.to_string()]
        }
    }

    #[test]
    fn test_rows_are_padded() {
        let rows = TableNormalizers::new()
            .normalize(&TableInput::from(vec![vec!["a", "b", "c"], vec!["d"]]))
            .unwrap();
        assert_eq!(rows[1], ["d", "", ""]);
    }

    #[test]
    fn test_empty_input_is_rejected() {
        let normalizers = TableNormalizers::new();
        assert!(matches!(
            normalizers.normalize(&TableInput::Rows(Vec::new())),
            Err(Error::InvalidTableData(_))
        ));
        assert!(matches!(
            normalizers.normalize(&TableInput::Rows(vec![Vec::new()])),
            Err(Error::InvalidTableData(_))
        ));
    }

    #[test]
    fn test_records_yield_header() {
        let products = [
            Product { name: "Pen", stock: 12 },
            Product { name: "Ink", stock: 3 },
        ];
        let rows = TableNormalizers::new()
            .normalize(&TableInput::records(&products))
            .unwrap();
        assert_eq!(rows, vec![vec!["Name", "Stock"], vec!["Pen", "12"], vec!["Ink", "3"]]);
    }

    #[cfg(feature = "serde-records")]
    #[test]
    fn test_serde_records_keep_field_order() {
        #[derive(serde::Serialize)]
        struct Row {
            product: &'static str,
            price: f64,
            note: Option<&'static str>,
        }

        let input = TableInput::serialize(&[
            Row { product: "Pen", price: 1.5, note: None },
            Row { product: "Ink", price: 4.0, note: Some("blue") },
        ])
        .unwrap();
        let rows = TableNormalizers::new().normalize(&input).unwrap();
        assert_eq!(rows[0], ["product", "price", "note"]);
        assert_eq!(rows[1], ["Pen", "1.5", ""]);
        assert_eq!(rows[2], ["Ink", "4.0", "blue"]);
    }

    #[test]
    fn test_frame_yields_header() {
        let frame = ColumnFrame::new()
            .with_column("Product", ["Pen", "Ink"])
            .with_column("Stock", [12]);
        assert_eq!(frame.row_count(), 2);
        let rows = TableNormalizers::new().normalize(&frame.into()).unwrap();
        assert_eq!(rows, vec![vec!["Product", "Stock"], vec!["Pen", "12"], vec!["Ink", ""]]);
    }

    #[test]
    fn test_custom_normalizer() {
        struct Csv;

        impl TableNormalizer for Csv {
            fn name(&self) -> &str {
                "csv"
            }

            fn normalize(&self, input: &TableInput) -> Option<Result<Rows>> {
                let TableInput::Custom(value) = input else {
                    return None;
                };
                let text = value.downcast_ref::<String>()?;
                Some(Ok(text
                    .lines()
                    .map(|line| line.split(',').map(str::to_string).collect())
                    .collect()))
            }
        }

        let input = TableInput::custom("a,b\n1,2".to_string());
        let mut normalizers = TableNormalizers::new();
        assert!(normalizers.normalize(&input).is_err());
        normalizers.register(Csv);
        assert_eq!(normalizers.names().last(), Some(&"csv"));
        assert_eq!(normalizers.normalize(&input).unwrap()[1], ["1", "2"]);
    }
}
