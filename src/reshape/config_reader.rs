use crate::reshape::*;

use serde::Deserialize;
use serde_json::Value as JSValue;

/// The content of a JSON job file. Every entry is optional: what is given
/// on the command line takes precedence.
#[derive(Eq, PartialEq, Debug, Clone, Default, Deserialize)]
pub struct JobConfig {
    #[serde(rename = "inputFile")]
    pub input_file: Option<String>,
    #[serde(rename = "inputType")]
    pub input_type: Option<String>,
    #[serde(rename = "excelWorksheetName")]
    pub excel_worksheet_name: Option<String>,
    #[serde(rename = "outputFile")]
    pub output_file: Option<String>,
    #[serde(rename = "outputType")]
    pub output_type: Option<String>,
    #[serde(rename = "naValues")]
    pub na_values: Option<Vec<String>>,
    #[serde(rename = "keepDefaultNa")]
    pub keep_default_na: Option<bool>,
    #[serde(rename = "previewRows")]
    _preview_rows: Option<JSValue>,
}

impl JobConfig {
    pub fn preview_rows(&self) -> ReshapeResult<Option<usize>> {
        if self._preview_rows.is_some() {
            read_js_int(&self._preview_rows, "previewRows").map(Some)
        } else {
            Ok(None)
        }
    }
}

pub fn read_job_config(path: &str) -> ReshapeResult<JobConfig> {
    let contents = fs::read_to_string(path).context(OpeningJsonSnafu { path })?;
    debug!("read_job_config: read content: {:?}", contents);
    parse_job_config(contents.as_str())
}

pub fn parse_job_config(contents: &str) -> ReshapeResult<JobConfig> {
    serde_json::from_str(contents).context(ParsingJsonSnafu {})
}

// Numbers are accepted either as JSON numbers or as strings.
fn read_js_int(x: &Option<JSValue>, field: &str) -> ReshapeResult<usize> {
    match x {
        Some(JSValue::Number(n)) => n
            .as_u64()
            .map(|x| x as usize)
            .context(ParsingJsonNumberSnafu { field }),
        Some(JSValue::String(s)) => s
            .trim()
            .parse::<usize>()
            .ok()
            .context(ParsingJsonNumberSnafu { field }),
        _ => None.context(ParsingJsonNumberSnafu { field }),
    }
}
