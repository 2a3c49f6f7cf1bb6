/*!
Reshapes wide survey exports into one row per plot.

A survey export holds one row per submission. Plots described in that
submission are spread over indexed columns: `this_plot_id_1`, `w3w_link_1`,
`this_plot_id_2`, `w3w_link_2`, ... The [`Reshaper`] turns every submission
into one row per plot whose identifier is filled in, with the index suffix
stripped from the column names.

```
use plot_reshape::{CellValue, Reshaper, WideRow, WideTable};

let row: WideRow = vec![
    ("farmer_id", CellValue::Text("F1".to_string())),
    ("this_plot_id_1", CellValue::Text("P1".to_string())),
    ("this_plot_id_2", CellValue::Missing),
    ("w3w_link_1", CellValue::Text("loc1".to_string())),
    ("w3w_link_2", CellValue::Text("loc2".to_string())),
]
.into_iter()
.collect();
let columns = ["farmer_id", "this_plot_id_1", "this_plot_id_2", "w3w_link_1", "w3w_link_2"]
    .iter()
    .map(|s| s.to_string())
    .collect();
let table = WideTable::new(columns, vec![row]);

let long = Reshaper::default().reshape(&table);
assert_eq!(long.len(), 1);
assert_eq!(long.rows[0].get("w3w_link"), Some(&CellValue::Text("loc1".to_string())));
```

See the [manual] for the details of the rules.
*/

pub mod builder;
mod config;
pub mod manual;
mod schema;

use log::{debug, info, warn};

pub use crate::config::*;
pub use crate::schema::*;

/// The name of the column holding `stem` for the plot `index`.
pub fn indexed_column(stem: &str, index: u32) -> String {
    format!("{}_{}", stem, index)
}

/// Reads the plot index out of a column name of the form `<stem>_<N>`.
///
/// The index is the part after the last underscore. Only non-negative base-10
/// integers are accepted; anything else (`this_plot_id_x`, `this_plot_id_-1`)
/// returns None. Leading zeros are accepted (`_03` is 3), although the
/// projection only ever looks up the canonical `_3` column.
pub fn parse_index_suffix(column: &str, stem: &str) -> Option<u32> {
    let prefix = format!("{}_", stem);
    if !column.starts_with(prefix.as_str()) {
        return None;
    }
    let (_, suffix) = column.rsplit_once('_')?;
    if suffix.is_empty() || !suffix.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    suffix.parse::<u32>().ok()
}

/// The highest plot index found among the columns, or 0 if no column
/// matches the stem.
pub fn max_plot_index(stem: &str, columns: &[String]) -> u32 {
    columns
        .iter()
        .filter_map(|c| parse_index_suffix(c, stem))
        .max()
        .unwrap_or(0)
}

/// Turns wide rows into long rows, following a column schema.
#[derive(Debug, Clone)]
pub struct Reshaper {
    schema: ColumnSchema,
    output_columns: Vec<String>,
}

impl Reshaper {
    pub fn new(schema: ColumnSchema) -> Reshaper {
        let dups = schema.duplicate_names();
        if !dups.is_empty() {
            warn!(
                "Reshaper: schema {} lists these names more than once, the last value written wins: {:?}",
                schema.version, dups
            );
        }
        let output_columns = schema.output_columns();
        Reshaper {
            schema,
            output_columns,
        }
    }

    pub fn schema(&self) -> &ColumnSchema {
        &self.schema
    }

    pub fn output_columns(&self) -> &[String] {
        &self.output_columns
    }

    /// The number of plot groups to examine for each row of a table with
    /// these columns.
    pub fn discover_max_index(&self, columns: &[String]) -> u32 {
        max_plot_index(&self.schema.index_stem, columns)
    }

    /// Builds the long row for one plot of a submission.
    ///
    /// Returns None when the plot identifier for this index is absent or
    /// missing: no row is produced for this plot.
    pub fn project_row(&self, row: &WideRow, index: u32) -> Option<LongRow> {
        let plot_id_col = indexed_column(&self.schema.index_stem, index);
        match row.get(&plot_id_col) {
            Some(v) if !v.is_missing() => {}
            _ => return None,
        }

        let mut res = LongRow::default();
        for col in self.schema.static_columns.iter() {
            let v = row.get(col).cloned().unwrap_or(CellValue::Missing);
            res.set(col, v);
        }
        // Both groups follow the same rule. A stem without an indexed column
        // in the source stays unset.
        for stem in self.schema.repeating_stems() {
            if let Some(v) = row.get(&indexed_column(stem, index)) {
                res.set(stem, v.clone());
            }
        }
        Some(res)
    }

    /// All the long rows of one submission, by ascending plot index.
    pub fn expand_row(&self, row: &WideRow, max_index: u32) -> Vec<LongRow> {
        (1..=max_index)
            .filter_map(|idx| self.project_row(row, idx))
            .collect()
    }

    /// Lazily expands a sequence of rows. Rows are independent from each
    /// other, so the input does not need to be held in memory.
    pub fn reshape_rows<'a, I>(&'a self, rows: I, max_index: u32) -> impl Iterator<Item = LongRow> + 'a
    where
        I: IntoIterator<Item = &'a WideRow> + 'a,
        I::IntoIter: 'a,
    {
        rows.into_iter().flat_map(move |row| {
            (1..=max_index).filter_map(move |idx| self.project_row(row, idx))
        })
    }

    /// Runs the full transformation.
    pub fn reshape(&self, table: &WideTable) -> LongTable {
        let max_index = self.discover_max_index(table.columns());
        info!(
            "reshape: {} rows, {} columns, max plot index: {}",
            table.len(),
            table.columns().len(),
            max_index
        );
        if max_index == 0 {
            warn!(
                "reshape: no column matches {}_<N>, the output is empty",
                self.schema.index_stem
            );
        }

        let mut rows: Vec<LongRow> = Vec::new();
        for (idx, row) in table.rows().iter().enumerate() {
            let mut expanded = self.expand_row(row, max_index);
            debug!("reshape: row {}: {} plots", idx, expanded.len());
            rows.append(&mut expanded);
        }
        info!("reshape: produced {} rows", rows.len());

        LongTable {
            columns: self.output_columns.clone(),
            rows,
        }
    }
}

impl Default for Reshaper {
    fn default() -> Self {
        Reshaper::new(ColumnSchema::default())
    }
}

/// Reshapes a table with the given schema.
pub fn reshape(table: &WideTable, schema: &ColumnSchema) -> LongTable {
    Reshaper::new(schema.clone()).reshape(table)
}
