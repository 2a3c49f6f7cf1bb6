// Primitives shared by the readers and writers.

use std::collections::HashSet;
use std::path::Path;

use crate::reshape::*;

/// Cell contents read as missing, on top of empty cells. These are the
/// tokens recognized by the spreadsheet tools the survey team uses.
pub const DEFAULT_NA_VALUES: &[&str] = &[
    "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN", "<NA>",
    "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// The set of tokens that mark a cell as missing.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct MissingTokens {
    tokens: HashSet<String>,
}

impl MissingTokens {
    pub fn new(keep_default: bool, extra: &[String]) -> MissingTokens {
        let mut tokens: HashSet<String> = HashSet::new();
        if keep_default {
            tokens.extend(DEFAULT_NA_VALUES.iter().map(|s| s.to_string()));
        }
        tokens.extend(extra.iter().cloned());
        MissingTokens { tokens }
    }

    /// Only empty cells are missing.
    pub fn empty_only() -> MissingTokens {
        MissingTokens::new(false, &[])
    }

    pub fn is_missing(&self, s: &str) -> bool {
        s.is_empty() || self.tokens.contains(s)
    }

    pub fn to_cell(&self, s: &str) -> CellValue {
        if self.is_missing(s) {
            CellValue::Missing
        } else {
            CellValue::Text(s.to_string())
        }
    }
}

impl Default for MissingTokens {
    fn default() -> Self {
        MissingTokens::new(true, &[])
    }
}

#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum InputType {
    Csv,
    Xlsx,
}

impl InputType {
    pub fn from_name(name: &str) -> ReshapeResult<InputType> {
        match name.to_lowercase().as_str() {
            "csv" => Ok(InputType::Csv),
            "xlsx" | "xlsm" | "excel" => Ok(InputType::Xlsx),
            _ => UnsupportedInputTypeSnafu { input_type: name }.fail(),
        }
    }

    /// Guesses the input type from the extension of the file.
    pub fn detect(path: &str) -> ReshapeResult<InputType> {
        let ext = Path::new(path)
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("");
        InputType::from_name(ext)
    }
}

#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum OutputType {
    Csv,
    Json,
}

impl OutputType {
    pub fn from_name(name: &str) -> ReshapeResult<OutputType> {
        match name.to_lowercase().as_str() {
            "csv" => Ok(OutputType::Csv),
            "json" => Ok(OutputType::Json),
            _ => UnsupportedOutputTypeSnafu { output_type: name }.fail(),
        }
    }

    pub fn default_file_name(&self) -> &'static str {
        match self {
            OutputType::Csv => "transformed_data.csv",
            OutputType::Json => "transformed_data.json",
        }
    }
}

/// The name of a header cell. Unnamed columns get a positional name so that
/// they can still be told apart.
pub fn header_name(idx: usize, cell: &CellValue) -> String {
    match cell {
        CellValue::Missing => format!("Unnamed: {}", idx),
        c => c.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_tokens() {
        let na = MissingTokens::default();
        assert_eq!(na.to_cell(""), CellValue::Missing);
        assert_eq!(na.to_cell("NA"), CellValue::Missing);
        assert_eq!(na.to_cell("#N/A"), CellValue::Missing);
        // Tokens are matched exactly.
        assert_eq!(na.to_cell(" NA"), CellValue::Text(" NA".to_string()));
        assert_eq!(na.to_cell("na"), CellValue::Text("na".to_string()));
        assert_eq!(na.to_cell("0"), CellValue::Text("0".to_string()));
    }

    #[test]
    fn custom_tokens() {
        let na = MissingTokens::new(false, &["-999".to_string()]);
        assert!(na.is_missing(""));
        assert!(na.is_missing("-999"));
        assert!(!na.is_missing("NA"));
        assert!(!MissingTokens::empty_only().is_missing("null"));
    }

    #[test]
    fn input_type_detection() {
        assert_eq!(InputType::detect("a/b/wide.csv").unwrap(), InputType::Csv);
        assert_eq!(InputType::detect("wide.XLSX").unwrap(), InputType::Xlsx);
        assert!(InputType::detect("wide").is_err());
        assert!(InputType::detect("wide.ods").is_err());
        assert_eq!(InputType::from_name("Excel").unwrap(), InputType::Xlsx);
    }

    #[test]
    fn output_types() {
        assert_eq!(OutputType::from_name("JSON").unwrap(), OutputType::Json);
        assert!(OutputType::from_name("parquet").is_err());
        assert_eq!(OutputType::Csv.default_file_name(), "transformed_data.csv");
    }

    #[test]
    fn header_names() {
        assert_eq!(header_name(3, &CellValue::Missing), "Unnamed: 3");
        assert_eq!(header_name(0, &CellValue::Text("key".to_string())), "key");
        assert_eq!(header_name(1, &CellValue::Int(2024)), "2024");
    }
}
