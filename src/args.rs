use clap::Parser;

/// Converts a wide survey export (one row per submission, indexed plot columns) into one row per plot.
#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// (file path, optional) A JSON job file with the options of the conversion. Relative paths in the
    /// job file are resolved against its directory. Options given on the command line take precedence.
    #[clap(short, long, value_parser)]
    pub config: Option<String>,

    /// (file path) The wide export to convert (CSV or Excel).
    #[clap(short, long, value_parser)]
    pub input: Option<String>,

    /// (csv or xlsx) The type of the input. By default it is guessed from the file extension.
    #[clap(long, value_parser)]
    pub input_type: Option<String>,

    /// (default: first worksheet) When using an Excel file, indicates the name of the worksheet to use.
    #[clap(long, value_parser)]
    pub excel_worksheet_name: Option<String>,

    /// (file path or 'stdout') Where to write the converted table. Defaults to transformed_data.csv
    /// (or transformed_data.json) in the current directory.
    #[clap(short, long, value_parser)]
    pub out: Option<String>,

    /// (default csv) The format of the output: csv or json.
    #[clap(long, value_parser)]
    pub output_type: Option<String>,

    /// (file path) A reference file with the expected output. If provided, the output is compared
    /// with it and any difference is reported as an error.
    #[clap(short, long, value_parser)]
    pub reference: Option<String>,

    /// (number of rows) If specified, prints the first rows of the input and of the output.
    #[clap(long, value_parser)]
    pub preview: Option<usize>,

    /// Additional cell contents to treat as missing values. May be repeated.
    #[clap(long, value_parser)]
    pub na_values: Option<Vec<String>>,

    /// Only treat empty cells (and the --na-values) as missing, not the usual NA, NULL, #N/A, ...
    #[clap(long, takes_value = false)]
    pub no_default_na: bool,

    /// Prints the built-in column schema in JSON format and exits.
    #[clap(long, takes_value = false)]
    pub print_schema: bool,

    // Other arguments
    /// If passed as an argument, will turn on verbose logging.
    #[clap(long, takes_value = false)]
    pub verbose: bool,
}
