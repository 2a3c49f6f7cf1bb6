// Text previews of the first rows of the tables.

use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::Table;

use crate::reshape::*;

fn new_table(header: &[String]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .set_header(header.to_vec());
    table
}

fn footer(shown: usize, total: usize) -> String {
    format!("({} of {} rows)", shown, total)
}

pub fn render_wide_preview(wide: &WideTable, num_rows: usize) -> String {
    let mut table = new_table(wide.columns());
    let shown = &wide.rows()[..num_rows.min(wide.len())];
    for row in shown {
        let cells: Vec<String> = wide
            .columns()
            .iter()
            .map(|c| row.get(c).map(|v| v.to_string()).unwrap_or_default())
            .collect();
        table.add_row(cells);
    }
    format!("{}\n{}", table, footer(shown.len(), wide.len()))
}

/// Only the columns set in at least one of the shown rows are displayed.
pub fn render_long_preview(long: &LongTable, num_rows: usize) -> String {
    let shown = &long.rows[..num_rows.min(long.len())];
    let columns: Vec<String> = long
        .columns
        .iter()
        .filter(|c| shown.iter().any(|r| r.is_set(c)))
        .cloned()
        .collect();
    let mut table = new_table(&columns);
    for row in shown {
        let cells: Vec<String> = columns
            .iter()
            .map(|c| row.get(c).map(|v| v.to_string()).unwrap_or_default())
            .collect();
        table.add_row(cells);
    }
    format!("{}\n{}", table, footer(shown.len(), long.len()))
}
