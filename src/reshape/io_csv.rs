// Primitives for reading and writing CSV files.

use std::fs::File;
use std::io;

use plot_reshape::builder::TableBuilder;

use crate::reshape::{
    io_common::{header_name, MissingTokens},
    *,
};

pub fn read_csv_table(path: &str, missing: &MissingTokens) -> ReshapeResult<WideTable> {
    let file = File::open(path)
        .map_err(csv::Error::from)
        .context(OpeningCsvSnafu { path })?;
    read_csv(file, path, missing)
}

/// Reads a wide table out of CSV content. The first record is the header.
pub fn read_csv<R: io::Read>(
    input: R,
    path: &str,
    missing: &MissingTokens,
) -> ReshapeResult<WideTable> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(input);
    let header_tokens = MissingTokens::empty_only();
    let header: Vec<String> = rdr
        .headers()
        .context(CsvRecordParseSnafu { path, record: 0usize })?
        .iter()
        .enumerate()
        .map(|(idx, s)| header_name(idx, &header_tokens.to_cell(s)))
        .collect();
    debug!("read_csv: header: {:?}", header);

    let mut builder = TableBuilder::new(&header);
    for (idx, record_r) in rdr.records().enumerate() {
        let record = record_r.context(CsvRecordParseSnafu {
            path,
            record: idx + 1,
        })?;
        let cells: Vec<CellValue> = record.iter().map(|s| missing.to_cell(s)).collect();
        builder
            .add_record(cells)
            .context(MalformedTableSnafu { path })?;
    }
    Ok(builder.build())
}

/// Writes the long table with a header row. Unset and missing fields are
/// both written as empty cells.
pub fn write_long_table<W: io::Write>(output: W, table: &LongTable) -> ReshapeResult<()> {
    let mut wtr = csv::Writer::from_writer(output);
    wtr.write_record(&table.columns).context(WritingCsvSnafu {})?;
    for row in table.rows.iter() {
        let record: Vec<String> = table
            .columns
            .iter()
            .map(|c| row.get(c).map(|v| v.to_string()).unwrap_or_default())
            .collect();
        wtr.write_record(&record).context(WritingCsvSnafu {})?;
    }
    wtr.flush()
        .map_err(csv::Error::from)
        .context(WritingCsvSnafu {})?;
    Ok(())
}

pub fn long_table_to_string(table: &LongTable) -> ReshapeResult<String> {
    let mut buf: Vec<u8> = Vec::new();
    write_long_table(&mut buf, table)?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}
