use calamine::{open_workbook, DataType, Range, Reader, Xlsx};

use plot_reshape::builder::TableBuilder;

use crate::reshape::{
    io_common::{header_name, MissingTokens},
    *,
};

pub fn read_excel_table(
    path: &str,
    worksheet_name: Option<&str>,
    missing: &MissingTokens,
) -> ReshapeResult<WideTable> {
    let wrange = get_range(path, worksheet_name)?;
    range_to_table(&wrange, path, missing)
}

fn get_range(path: &str, worksheet_name: Option<&str>) -> ReshapeResult<Range<DataType>> {
    debug!(
        "read_excel_table: path: {:?} worksheet: {:?}",
        path, worksheet_name
    );
    let mut workbook: Xlsx<_> = open_workbook(path).context(OpeningExcelSnafu { path })?;

    match worksheet_name {
        // A worksheet name was provided, use it.
        Some(name) => workbook
            .worksheet_range(name)
            .context(MissingWorksheetSnafu { name, path })?
            .context(OpeningExcelSnafu { path }),
        // Otherwise the first one.
        None => workbook
            .worksheet_range_at(0)
            .context(EmptyExcelSnafu { path })?
            .context(OpeningExcelSnafu { path }),
    }
}

/// Builds the wide table from a worksheet range. The first row is the header.
pub fn range_to_table(
    wrange: &Range<DataType>,
    path: &str,
    missing: &MissingTokens,
) -> ReshapeResult<WideTable> {
    let mut rows = wrange.rows();
    let header_cells = rows.next().context(EmptyExcelSnafu { path })?;
    let header_tokens = MissingTokens::empty_only();
    let header: Vec<String> = header_cells
        .iter()
        .enumerate()
        .map(|(idx, cell)| header_name(idx, &read_cell(cell, &header_tokens)))
        .collect();
    debug!("read_excel_table: header: {:?}", header);

    let mut builder = TableBuilder::new(&header);
    for row in rows {
        let cells: Vec<CellValue> = row.iter().map(|c| read_cell(c, missing)).collect();
        builder
            .add_record(cells)
            .context(MalformedTableSnafu { path })?;
    }
    Ok(builder.build())
}

fn read_cell(cell: &DataType, missing: &MissingTokens) -> CellValue {
    match cell {
        DataType::String(s) => missing.to_cell(s),
        DataType::Int(i) => CellValue::Int(*i),
        DataType::Float(f) => CellValue::Float(*f),
        DataType::Bool(b) => CellValue::Bool(*b),
        DataType::DateTime(_) => match cell.as_datetime() {
            Some(dt) => CellValue::Text(dt.to_string()),
            None => {
                warn!("read_cell: could not understand date cell {:?}", cell);
                CellValue::Missing
            }
        },
        DataType::Error(e) => {
            debug!("read_cell: error cell {:?} read as missing", e);
            CellValue::Missing
        }
        DataType::Empty => CellValue::Missing,
        #[allow(unreachable_patterns)]
        other => CellValue::Text(format!("{:?}", other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn s(x: &str) -> DataType {
        DataType::String(x.to_string())
    }

    #[test]
    fn cells() {
        let na = MissingTokens::default();
        assert_eq!(read_cell(&s("P1"), &na), CellValue::Text("P1".to_string()));
        assert_eq!(read_cell(&s(""), &na), CellValue::Missing);
        assert_eq!(read_cell(&s("NULL"), &na), CellValue::Missing);
        assert_eq!(read_cell(&DataType::Int(3), &na), CellValue::Int(3));
        assert_eq!(read_cell(&DataType::Float(2.5), &na), CellValue::Float(2.5));
        assert_eq!(read_cell(&DataType::Bool(true), &na), CellValue::Bool(true));
        assert_eq!(read_cell(&DataType::Empty, &na), CellValue::Missing);
        assert_eq!(
            read_cell(&DataType::Error(calamine::CellErrorType::Div0), &na),
            CellValue::Missing
        );
    }

    #[test]
    fn dates_are_rendered_as_text() {
        let na = MissingTokens::default();
        // 2023-01-05 12:00:00
        assert_eq!(
            read_cell(&DataType::DateTime(44931.5), &na),
            CellValue::Text("2023-01-05 12:00:00".to_string())
        );
    }

    #[test]
    fn range_with_unnamed_header() {
        let mut r: Range<DataType> = Range::new((0, 0), (2, 2));
        r.set_value((0, 0), s("farmer_id"));
        r.set_value((0, 1), s("this_plot_id_1"));
        r.set_value((1, 0), s("F1"));
        r.set_value((1, 1), s("P1"));
        r.set_value((1, 2), DataType::Float(1.0));
        r.set_value((2, 0), s("F2"));
        let t = range_to_table(&r, "test.xlsx", &MissingTokens::default()).unwrap();
        assert_eq!(t.columns(), &["farmer_id", "this_plot_id_1", "Unnamed: 2"]);
        assert_eq!(t.len(), 2);
        assert_eq!(t.rows()[1].get("this_plot_id_1"), Some(&CellValue::Missing));

        let long = Reshaper::default().reshape(&t);
        assert_eq!(long.len(), 1);
        assert_eq!(
            long.rows[0].get("farmer_id"),
            Some(&CellValue::Text("F1".to_string()))
        );
    }

    #[test]
    fn empty_range_is_an_error() {
        let r: Range<DataType> = Range::empty();
        let err = range_to_table(&r, "test.xlsx", &MissingTokens::default()).unwrap_err();
        assert!(matches!(err, ReshapeError::EmptyExcel { .. }));
    }

    fn fixture() -> String {
        format!("{}/testdata/two_rounds.xlsx", env!("CARGO_MANIFEST_DIR"))
    }

    fn text(x: &str) -> Option<CellValue> {
        Some(CellValue::Text(x.to_string()))
    }

    #[test]
    fn first_worksheet_by_default() {
        let t = read_excel_table(&fixture(), None, &MissingTokens::default()).unwrap();
        assert_eq!(
            t.columns(),
            &["farmer_id", "this_plot_id_1", "this_plot_id_2", "w3w_link_1"]
        );
        assert_eq!(t.len(), 1);
        assert_eq!(t.rows()[0].get("this_plot_id_2").cloned(), text("P2"));

        let long = Reshaper::default().reshape(&t);
        assert_eq!(long.len(), 2);
        assert_eq!(long.rows[0].get("w3w_link").cloned(), text("loc1"));
        assert_eq!(long.rows[1].get("w3w_link"), None);
    }

    #[test]
    fn named_worksheet() {
        let t = read_excel_table(&fixture(), Some("round2"), &MissingTokens::default()).unwrap();
        assert_eq!(t.columns(), &["farmer_id", "this_plot_id_1", "Unnamed: 2"]);
        assert_eq!(t.rows()[0].get("farmer_id").cloned(), text("F9"));
        assert_eq!(t.rows()[0].get("Unnamed: 2"), Some(&CellValue::Float(2.5)));
    }

    #[test]
    fn unknown_worksheet_is_an_error() {
        let err = read_excel_table(&fixture(), Some("round3"), &MissingTokens::default())
            .unwrap_err();
        assert!(matches!(err, ReshapeError::MissingWorksheet { ref name, .. } if name == "round3"));
    }

    #[test]
    fn unreadable_workbook_is_an_error() {
        let path = format!("{}/testdata/no_such_file.xlsx", env!("CARGO_MANIFEST_DIR"));
        let err = read_excel_table(&path, None, &MissingTokens::default()).unwrap_err();
        assert!(matches!(err, ReshapeError::OpeningExcel { .. }));
    }
}
