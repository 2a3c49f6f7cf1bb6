use std::collections::HashMap;

pub use crate::config::*;

/// A builder for assembling a wide table out of a header and positional records.
///
/// All the decoders go through it, so that duplicate headers and short
/// records are handled the same way whatever the file format.
///
/// ```
/// use plot_reshape::builder::TableBuilder;
/// use plot_reshape::{CellValue, TableErrors};
///
/// let mut builder = TableBuilder::new(&["farmer_id".to_string(), "this_plot_id_1".to_string()]);
/// builder.add_record(vec![CellValue::Text("F1".to_string()), CellValue::Text("P1".to_string())])?;
/// let table = builder.build();
/// assert_eq!(table.len(), 1);
///
/// # Ok::<(), TableErrors>(())
/// ```
pub struct TableBuilder {
    columns: Vec<String>,
    rows: Vec<WideRow>,
}

impl TableBuilder {
    pub fn new(header: &[String]) -> TableBuilder {
        TableBuilder {
            columns: dedup_header(header),
            rows: Vec::new(),
        }
    }

    /// The header after de-duplication.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Adds a record. Cells are matched to the header by position; a record
    /// shorter than the header is padded with missing values.
    pub fn add_record(&mut self, cells: Vec<CellValue>) -> Result<(), TableErrors> {
        if cells.len() > self.columns.len() {
            return Err(TableErrors::RaggedRow {
                row: self.rows.len() + 1,
                expected: self.columns.len(),
                found: cells.len(),
            });
        }
        let mut row = WideRow::new();
        let mut cells_iter = cells.into_iter();
        for col in self.columns.iter() {
            row.insert(col, cells_iter.next().unwrap_or(CellValue::Missing));
        }
        self.rows.push(row);
        Ok(())
    }

    pub fn build(self) -> WideTable {
        WideTable::new(self.columns, self.rows)
    }
}

/// Renames repeated header names: the second `a` becomes `a.1`, the third
/// `a.2`. A renamed column that collides with a later name chains the
/// counters, so `a, a, a.1` reads as `a, a.1, a.1.1`.
fn dedup_header(header: &[String]) -> Vec<String> {
    let mut counts: HashMap<String, usize> = HashMap::new();
    let mut res: Vec<String> = Vec::with_capacity(header.len());
    for name in header {
        let mut col = name.clone();
        let mut cur_count = counts.get(&col).copied().unwrap_or(0);
        while cur_count > 0 {
            counts.insert(col.clone(), cur_count + 1);
            col = format!("{}.{}", col, cur_count);
            cur_count = counts.get(&col).copied().unwrap_or(0);
        }
        counts.insert(col.clone(), cur_count + 1);
        res.push(col);
    }
    res
}
