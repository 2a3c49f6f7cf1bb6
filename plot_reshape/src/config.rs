// ********* Cell values ***********

use std::collections::HashMap;
use std::error::Error;
use std::fmt::Display;

/// The content of one cell, as handed over by the decoders.
///
/// Values are passed through the reshaping untouched: a `Text` cell stays
/// a `Text` cell, even if it looks like a number.
#[derive(PartialEq, Debug, Clone)]
pub enum CellValue {
    /// An empty cell, or a cell holding one of the missing-value tokens.
    Missing,
    Text(String),
    Int(i64),
    Float(f64),
    Bool(bool),
}

impl CellValue {
    pub fn is_missing(&self) -> bool {
        matches!(self, CellValue::Missing)
    }
}

impl Display for CellValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CellValue::Missing => Ok(()),
            CellValue::Text(s) => write!(f, "{}", s),
            CellValue::Int(i) => write!(f, "{}", i),
            CellValue::Float(x) => write!(f, "{}", format_float(*x)),
            CellValue::Bool(true) => write!(f, "True"),
            CellValue::Bool(false) => write!(f, "False"),
        }
    }
}

/// Shortest round-trip form of a float: `3.0`, `0.25`, and `1e+16` or
/// `1e-05` outside of [1e-4, 1e16). Not-a-number is written as an empty cell.
fn format_float(x: f64) -> String {
    if x.is_nan() {
        return String::new();
    }
    if x.is_infinite() {
        return if x > 0.0 { "inf".to_string() } else { "-inf".to_string() };
    }
    let magnitude = x.abs();
    if x == 0.0 || (1e-4..1e16).contains(&magnitude) {
        // Debug keeps the trailing `.0` on integral values (3.0 and not 3).
        return format!("{:?}", x);
    }
    let sci = format!("{:e}", x);
    match sci.split_once('e') {
        Some((mantissa, exp)) => match exp.parse::<i32>() {
            Ok(e) => {
                let sign = if e < 0 { '-' } else { '+' };
                format!("{}e{}{:02}", mantissa, sign, e.abs())
            }
            Err(_) => sci,
        },
        None => sci,
    }
}

// ********* Input data structures ***********

/// One row of the wide table, keyed by column name.
#[derive(PartialEq, Debug, Clone, Default)]
pub struct WideRow {
    cells: HashMap<String, CellValue>,
}

impl WideRow {
    pub fn new() -> WideRow {
        WideRow::default()
    }

    pub fn insert(&mut self, column: &str, value: CellValue) {
        self.cells.insert(column.to_string(), value);
    }

    /// The value of the column, or None if the row has no such column.
    pub fn get(&self, column: &str) -> Option<&CellValue> {
        self.cells.get(column)
    }

    pub fn contains_column(&self, column: &str) -> bool {
        self.cells.contains_key(column)
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

impl<S: Into<String>> FromIterator<(S, CellValue)> for WideRow {
    fn from_iter<I: IntoIterator<Item = (S, CellValue)>>(iter: I) -> Self {
        WideRow {
            cells: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

/// A decoded wide table: the header, in file order, and the rows.
#[derive(PartialEq, Debug, Clone, Default)]
pub struct WideTable {
    columns: Vec<String>,
    rows: Vec<WideRow>,
}

impl WideTable {
    pub fn new(columns: Vec<String>, rows: Vec<WideRow>) -> WideTable {
        WideTable { columns, rows }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[WideRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

// ******** Output data structures *********

/// One row of the long table.
///
/// A field can be unset (the source had no such indexed column) or set to a
/// value, which may itself be `CellValue::Missing`.
#[derive(PartialEq, Debug, Clone, Default)]
pub struct LongRow {
    fields: HashMap<String, CellValue>,
}

impl LongRow {
    pub fn set(&mut self, field: &str, value: CellValue) {
        self.fields.insert(field.to_string(), value);
    }

    pub fn get(&self, field: &str) -> Option<&CellValue> {
        self.fields.get(field)
    }

    pub fn is_set(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    /// Number of fields that are set.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

#[derive(PartialEq, Debug, Clone, Default)]
pub struct LongTable {
    pub columns: Vec<String>,
    pub rows: Vec<LongRow>,
}

impl LongTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Errors raised while assembling a table from positional records.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum TableErrors {
    /// A record has more cells than the header has columns.
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },
}

impl Error for TableErrors {}

impl Display for TableErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TableErrors::RaggedRow {
                row,
                expected,
                found,
            } => write!(
                f,
                "row {}: expected at most {} fields, found {}",
                row, expected, found
            ),
        }
    }
}
