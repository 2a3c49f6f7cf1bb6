use log::{debug, info, warn};

use plot_reshape::*;
use snafu::{prelude::*, Snafu};

use std::fs;
use std::path::{Path, PathBuf};

use text_diff::{diff, Difference};

use crate::args::Args;
use crate::reshape::config_reader::*;
use crate::reshape::io_common::*;

pub mod config_reader;
pub mod io_common;
pub mod io_csv;
pub mod io_excel;
pub mod io_json;
pub mod preview;

#[derive(Debug, Snafu)]
pub enum ReshapeError {
    #[snafu(display("Error opening file {path}"))]
    OpeningCsv { source: csv::Error, path: String },
    #[snafu(display("Error reading CSV record {record} of {path}"))]
    CsvRecordParse {
        source: csv::Error,
        path: String,
        record: usize,
    },
    #[snafu(display("Error opening file {path}"))]
    OpeningExcel {
        source: calamine::XlsxError,
        path: String,
    },
    #[snafu(display("The workbook {path} has no worksheet named {name:?}"))]
    MissingWorksheet { name: String, path: String },
    #[snafu(display("The workbook {path} is empty (no worksheet or no header row)"))]
    EmptyExcel { path: String },
    #[snafu(display("Error opening file {path}"))]
    OpeningJson {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error parsing JSON"))]
    ParsingJson { source: serde_json::Error },
    #[snafu(display("Error encoding JSON"))]
    EncodingJson { source: serde_json::Error },
    #[snafu(display("Could not read option {field} as a non-negative integer"))]
    ParsingJsonNumber { field: String },
    #[snafu(display("Unsupported input type {input_type:?} (expected csv or xlsx)"))]
    UnsupportedInputType { input_type: String },
    #[snafu(display("Unsupported output type {output_type:?} (expected csv or json)"))]
    UnsupportedOutputType { output_type: String },
    #[snafu(display("No input file: use --input or set inputFile in the job file"))]
    MissingInput {},
    #[snafu(display("Malformed table in {path}"))]
    MalformedTable { source: TableErrors, path: String },
    #[snafu(display("Error encoding CSV output"))]
    WritingCsv { source: csv::Error },
    #[snafu(display("Error writing output to {path}"))]
    WritingOutput {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error reading reference file {path}"))]
    OpeningReference {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Difference detected between the output and the reference {path}"))]
    ReferenceMismatch { path: String },
}

pub type ReshapeResult<T> = Result<T, ReshapeError>;

#[derive(Eq, PartialEq, Debug, Clone)]
pub enum OutputTarget {
    Stdout,
    File(String),
}

/// Everything needed to run one conversion, after merging the command line
/// and the job file.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct JobSettings {
    pub input_path: String,
    pub input_type: InputType,
    pub excel_worksheet_name: Option<String>,
    pub output: OutputTarget,
    pub output_type: OutputType,
    pub missing_tokens: MissingTokens,
    pub preview_rows: Option<usize>,
    pub reference: Option<String>,
}

fn resolve_path(root: &Option<PathBuf>, p: &str) -> String {
    match root {
        Some(r) if Path::new(p).is_relative() => r.join(p).display().to_string(),
        _ => p.to_string(),
    }
}

pub fn build_settings(args: &Args) -> ReshapeResult<JobSettings> {
    let job: JobConfig = match &args.config {
        Some(p) => {
            info!("Attempting to read job file {:?}", p);
            read_job_config(p)?
        }
        None => JobConfig::default(),
    };
    debug!("build_settings: job: {:?}", job);
    // Paths in the job file are relative to the job file.
    let root: Option<PathBuf> = args
        .config
        .as_ref()
        .and_then(|p| Path::new(p).parent().map(|x| x.to_path_buf()));

    let input_path = match (&args.input, &job.input_file) {
        (Some(p), _) => p.clone(),
        (None, Some(p)) => resolve_path(&root, p),
        (None, None) => return MissingInputSnafu {}.fail(),
    };

    let input_type = match args.input_type.as_ref().or(job.input_type.as_ref()) {
        Some(name) => InputType::from_name(name)?,
        None => InputType::detect(&input_path)?,
    };

    let output_type = match args.output_type.as_ref().or(job.output_type.as_ref()) {
        Some(name) => OutputType::from_name(name)?,
        None => OutputType::Csv,
    };

    let output = match (&args.out, &job.output_file) {
        (Some(p), _) if p == "stdout" => OutputTarget::Stdout,
        (Some(p), _) => OutputTarget::File(p.clone()),
        (None, Some(p)) if p == "stdout" => OutputTarget::Stdout,
        (None, Some(p)) => OutputTarget::File(resolve_path(&root, p)),
        (None, None) => OutputTarget::File(output_type.default_file_name().to_string()),
    };

    let keep_default_na = !args.no_default_na && job.keep_default_na.unwrap_or(true);
    let extra_na: Vec<String> = args
        .na_values
        .clone()
        .or_else(|| job.na_values.clone())
        .unwrap_or_default();

    let preview_rows = match args.preview {
        Some(n) => Some(n),
        None => job.preview_rows()?,
    };

    Ok(JobSettings {
        input_path,
        input_type,
        excel_worksheet_name: args
            .excel_worksheet_name
            .clone()
            .or_else(|| job.excel_worksheet_name.clone()),
        output,
        output_type,
        missing_tokens: MissingTokens::new(keep_default_na, &extra_na),
        preview_rows,
        reference: args.reference.clone(),
    })
}

pub fn read_wide_table(settings: &JobSettings) -> ReshapeResult<WideTable> {
    info!(
        "Attempting to read wide file {:?} as {:?}",
        settings.input_path, settings.input_type
    );
    match settings.input_type {
        InputType::Csv => io_csv::read_csv_table(&settings.input_path, &settings.missing_tokens),
        InputType::Xlsx => io_excel::read_excel_table(
            &settings.input_path,
            settings.excel_worksheet_name.as_deref(),
            &settings.missing_tokens,
        ),
    }
}

fn render_output(settings: &JobSettings, long: &LongTable) -> ReshapeResult<String> {
    match settings.output_type {
        OutputType::Csv => io_csv::long_table_to_string(long),
        OutputType::Json => io_json::long_table_to_string(long),
    }
}

fn write_output(target: &OutputTarget, rendered: &str) -> ReshapeResult<()> {
    match target {
        OutputTarget::Stdout => {
            print!("{}", rendered);
        }
        OutputTarget::File(path) => {
            fs::write(path, rendered).context(WritingOutputSnafu { path })?;
            info!("Output written to {:?}", path);
        }
    }
    Ok(())
}

/// Compares the rendered output with a reference file, printing the
/// differences if any.
pub fn check_reference(
    output: &OutputTarget,
    reference_path: &str,
    rendered: &str,
) -> ReshapeResult<()> {
    let expected = fs::read_to_string(reference_path).context(OpeningReferenceSnafu {
        path: reference_path,
    })?;
    if expected != rendered {
        warn!("Found differences with the reference file {:?}", reference_path);
        show(
            output,
            "Differences with the reference:",
            &render_diff(expected.as_str(), rendered),
        );
        return ReferenceMismatchSnafu {
            path: reference_path,
        }
        .fail();
    }
    info!("Output matches the reference {:?}", reference_path);
    Ok(())
}

/// Line diff between the expected and the actual content: removed lines
/// start with `-`, added lines with `+`.
fn render_diff(expected: &str, actual: &str) -> String {
    let (_, changes) = diff(expected, actual, "\n");
    let mut res = String::new();
    for change in changes.iter() {
        let (prefix, text) = match change {
            Difference::Same(x) => (' ', x),
            Difference::Rem(x) => ('-', x),
            Difference::Add(x) => ('+', x),
        };
        for line in text.split('\n') {
            res.push(prefix);
            res.push_str(line);
            res.push('\n');
        }
    }
    res
}

fn show(output: &OutputTarget, title: &str, body: &str) {
    // Keep stdout clean when it carries the output itself.
    if *output == OutputTarget::Stdout {
        eprintln!("{}\n{}", title, body);
    } else {
        println!("{}\n{}", title, body);
    }
}

pub fn run_job(settings: &JobSettings) -> ReshapeResult<LongTable> {
    let table = read_wide_table(settings)?;
    info!(
        "Read {} rows and {} columns from {:?}",
        table.len(),
        table.columns().len(),
        settings.input_path
    );
    if let Some(n) = settings.preview_rows {
        show(
            &settings.output,
            "Original data:",
            &preview::render_wide_preview(&table, n),
        );
    }

    let reshaper = Reshaper::new(ColumnSchema::default());
    let max_index = reshaper.discover_max_index(table.columns());
    let long = reshaper.reshape(&table);
    info!(
        "Transformation successful: {} submissions, up to {} plots each -> {} rows",
        table.len(),
        max_index,
        long.len()
    );
    if let Some(n) = settings.preview_rows {
        show(
            &settings.output,
            "Transformed data:",
            &preview::render_long_preview(&long, n),
        );
    }

    let rendered = render_output(settings, &long)?;
    write_output(&settings.output, &rendered)?;

    if let Some(reference_path) = &settings.reference {
        check_reference(&settings.output, reference_path, &rendered)?;
    }
    Ok(long)
}

pub fn run(args: &Args) -> ReshapeResult<()> {
    if args.print_schema {
        let js = io_json::schema_to_json(&ColumnSchema::default());
        let pretty = serde_json::to_string_pretty(&js).context(EncodingJsonSnafu {})?;
        println!("{}", pretty);
        return Ok(());
    }
    let settings = build_settings(args)?;
    debug!("run: settings: {:?}", settings);
    run_job(&settings)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn args(xs: &[&str]) -> Args {
        let mut all = vec!["wide2long"];
        all.extend_from_slice(xs);
        Args::parse_from(all)
    }

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("wide2long-{}-{}", std::process::id(), name))
    }

    #[test]
    fn settings_from_args() {
        let s = build_settings(&args(&["-i", "exports/round3.csv"])).unwrap();
        assert_eq!(s.input_path, "exports/round3.csv");
        assert_eq!(s.input_type, InputType::Csv);
        assert_eq!(s.output_type, OutputType::Csv);
        assert_eq!(
            s.output,
            OutputTarget::File("transformed_data.csv".to_string())
        );
        assert!(s.missing_tokens.is_missing("NA"));
        assert_eq!(s.preview_rows, None);
    }

    #[test]
    fn settings_overrides() {
        let s = build_settings(&args(&[
            "-i",
            "round3.data",
            "--input-type",
            "xlsx",
            "--output-type",
            "json",
            "-o",
            "stdout",
            "--no-default-na",
            "--na-values",
            "refused",
            "--preview",
            "3",
        ]))
        .unwrap();
        assert_eq!(s.input_type, InputType::Xlsx);
        assert_eq!(s.output_type, OutputType::Json);
        assert_eq!(s.output, OutputTarget::Stdout);
        assert!(!s.missing_tokens.is_missing("NA"));
        assert!(s.missing_tokens.is_missing("refused"));
        assert_eq!(s.preview_rows, Some(3));
    }

    #[test]
    fn missing_input_is_an_error() {
        let err = build_settings(&args(&[])).unwrap_err();
        assert!(matches!(err, ReshapeError::MissingInput {}));
    }

    #[test]
    fn unknown_extension_is_an_error() {
        let err = build_settings(&args(&["-i", "round3.parquet"])).unwrap_err();
        assert!(matches!(err, ReshapeError::UnsupportedInputType { .. }));
    }

    #[test]
    fn job_file_paths_are_relative_to_the_job_file() {
        let dir = temp_path("job");
        fs::create_dir_all(&dir).unwrap();
        let job_path = dir.join("job.json");
        fs::write(
            &job_path,
            r#"{"inputFile": "wide.csv", "outputFile": "long.json", "outputType": "json", "previewRows": "2"}"#,
        )
        .unwrap();
        let s = build_settings(&args(&["-c", job_path.to_str().unwrap()])).unwrap();
        assert_eq!(s.input_path, dir.join("wide.csv").display().to_string());
        assert_eq!(
            s.output,
            OutputTarget::File(dir.join("long.json").display().to_string())
        );
        assert_eq!(s.output_type, OutputType::Json);
        assert_eq!(s.preview_rows, Some(2));
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn end_to_end_csv() {
        let dir = temp_path("e2e");
        fs::create_dir_all(&dir).unwrap();
        let input = dir.join("wide.csv");
        let output = dir.join("long.csv");
        fs::write(
            &input,
            "farmer_id,this_plot_id_1,this_plot_id_2,w3w_link_1,w3w_link_2\n\
             F1,P1,,loc1,loc2\n\
             F2,Q1,Q2,,NA\n",
        )
        .unwrap();
        let s = build_settings(&args(&[
            "-i",
            input.to_str().unwrap(),
            "-o",
            output.to_str().unwrap(),
        ]))
        .unwrap();
        let long = run_job(&s).unwrap();
        assert_eq!(long.len(), 3);

        let written = fs::read_to_string(&output).unwrap();
        let lines: Vec<&str> = written.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("submissiondate,q1_enum_name,"));
        assert_eq!(lines[1].split(',').count(), 100);

        // Running again against the first output as reference succeeds.
        let again = JobSettings {
            output: OutputTarget::File(dir.join("long2.csv").display().to_string()),
            reference: Some(output.display().to_string()),
            ..s
        };
        run_job(&again).unwrap();
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn reference_mismatch_fails() {
        let dir = temp_path("reference");
        fs::create_dir_all(&dir).unwrap();
        let reference = dir.join("expected.csv");
        fs::write(&reference, "a,b\n1,2\n").unwrap();
        let path = reference.to_str().unwrap();
        let err = check_reference(&OutputTarget::Stdout, path, "a,b\n1,3\n").unwrap_err();
        assert!(matches!(err, ReshapeError::ReferenceMismatch { .. }));
        check_reference(&OutputTarget::Stdout, path, "a,b\n1,2\n").unwrap();
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn diff_marks_changed_lines() {
        let d = render_diff("a,b\n1,2\n", "a,b\n1,3\n");
        assert!(d.contains("-1,2\n"));
        assert!(d.contains("+1,3\n"));
        assert!(d.contains(" a,b\n"));
        assert!(!d.contains("+a,b"));
    }
}
