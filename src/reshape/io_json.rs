use serde_json::json;
use serde_json::Map as JSMap;
use serde_json::Value as JSValue;

use crate::reshape::*;

fn cell_to_json(cell: &CellValue) -> JSValue {
    match cell {
        CellValue::Missing => JSValue::Null,
        CellValue::Text(s) => json!(s),
        CellValue::Int(i) => json!(i),
        CellValue::Float(f) => json!(f),
        CellValue::Bool(b) => json!(b),
    }
}

/// One object per row, fields in column order. Unset fields are left out,
/// missing values are null.
pub fn long_table_to_json(table: &LongTable) -> JSValue {
    let mut l: Vec<JSValue> = Vec::new();
    for row in table.rows.iter() {
        let mut obj: JSMap<String, JSValue> = JSMap::new();
        for col in table.columns.iter() {
            if let Some(v) = row.get(col) {
                obj.insert(col.clone(), cell_to_json(v));
            }
        }
        l.push(JSValue::Object(obj));
    }
    JSValue::Array(l)
}

pub fn long_table_to_string(table: &LongTable) -> ReshapeResult<String> {
    let js = long_table_to_json(table);
    let mut s = serde_json::to_string_pretty(&js).context(EncodingJsonSnafu {})?;
    s.push('\n');
    Ok(s)
}

pub fn schema_to_json(schema: &ColumnSchema) -> JSValue {
    json!({
        "version": schema.version,
        "indexStem": schema.index_stem,
        "staticColumns": schema.static_columns,
        "slashPatternStems": schema.slash_pattern_stems,
        "pipePatternStems": schema.pipe_pattern_stems,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unset_and_missing_differ() {
        let mut row = LongRow::default();
        row.set("farmer_id", CellValue::Text("F1".to_string()));
        row.set("w3w_link", CellValue::Missing);
        row.set("scto_alt", CellValue::Float(512.5));
        row.set("total_plots", CellValue::Int(2));
        let table = LongTable {
            columns: vec![
                "farmer_id".to_string(),
                "total_plots".to_string(),
                "w3w_link".to_string(),
                "scto_lat".to_string(),
                "scto_alt".to_string(),
            ],
            rows: vec![row],
        };
        let js = long_table_to_json(&table);
        assert_eq!(
            js,
            json!([{"farmer_id": "F1", "total_plots": 2, "w3w_link": null, "scto_alt": 512.5}])
        );
        assert!(js[0].get("scto_lat").is_none());
    }

    #[test]
    fn keys_follow_column_order() {
        let mut row = LongRow::default();
        row.set("this_plot_id", CellValue::Text("P1".to_string()));
        row.set("farmer_id", CellValue::Text("F1".to_string()));
        let table = LongTable {
            columns: vec!["this_plot_id".to_string(), "farmer_id".to_string()],
            rows: vec![row],
        };
        let s = long_table_to_string(&table).unwrap();
        let plot = s.find("this_plot_id").unwrap();
        let farmer = s.find("farmer_id").unwrap();
        assert!(plot < farmer);
    }

    #[test]
    fn schema_dump() {
        let js = schema_to_json(&ColumnSchema::default());
        assert_eq!(js["version"], "survey-v1");
        assert_eq!(js["indexStem"], "this_plot_id");
        assert_eq!(js["staticColumns"].as_array().map(|a| a.len()), Some(57));
        assert_eq!(js["pipePatternStems"][27], "d9_cracks");
    }
}
