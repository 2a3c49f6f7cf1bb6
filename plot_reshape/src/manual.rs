/*!

This is the long-form manual for `plot_reshape` and `wide2long`.

## Input formats

The following formats are supported by `wide2long`:
* `csv` Comma Separated Values, with a header row
* `xlsx` Excel workbooks (first worksheet unless `--excel-worksheet-name` is given)

The input type is guessed from the file extension and can be forced with `--input-type`.

### `csv`

The first line is the header. Blank lines are skipped. A line with fewer cells than the header is
padded with empty cells; a line with more cells is an error. Cells are kept as text: `007` stays
`007`. Empty header cells are named `Unnamed: <column number>` (0-based).

In both formats, a repeated header name gets a counter: `a, b, a, a.1, a` reads as
`a, b, a.1, a.1.1, a.2`.

### `xlsx`

The first row is the header. Empty header cells are named `Unnamed: <column number>` (0-based).
Numbers and booleans keep their type, dates are written as `YYYY-MM-DD HH:MM:SS`, and cells
holding an Excel error (`#DIV/0!`, ...) are treated as empty.

### Missing values

Empty cells are missing. So are the following tokens, unless `--no-default-na` is passed:
`#N/A`, `#N/A N/A`, `#NA`, `-1.#IND`, `-1.#QNAN`, `-NaN`, `-nan`, `1.#IND`, `1.#QNAN`, `<NA>`,
`N/A`, `NA`, `NULL`, `NaN`, `None`, `n/a`, `nan`, `null`. More tokens can be added with
`--na-values`.

## Reshaping rules

1. The plot indices are discovered from the header: the largest `N` among the columns named
`this_plot_id_<N>`. Columns such as `this_plot_id_other` are ignored. If no column matches, the
output is empty.

2. For each submission and each index from 1 to that largest `N`, a row is produced only if
`this_plot_id_<index>` holds a value. Gaps are allowed: a submission with plots 1 and 3 filled in
gives two rows.

3. Each produced row holds:
  * every static column, copied as-is (empty if the export does not have it),
  * for every stem of the plot and pipe groups, the value of `<stem>_<index>`, under the bare stem
    name. If the export has no `<stem>_<index>` column, the field is left out.

Rows come out in the order of the submissions, and by plot index within a submission.

## Output formats

* `csv` (default): a header with all the output columns (static columns, then plot stems, then
pipe stems), and one line per plot. Fields that are missing or left out are empty. Decimal
numbers keep a `.0` when integral (`3.0`) and use an exponent when very large or very small
(`1e+16`, `1e-05`).
* `json`: an array of objects. Fields left out are absent, missing values are `null`.

## Configuration

Options can be given on the command line or in a JSON job file passed with `--config`:

```json
{
  "inputFile": "exports/round3.xlsx",
  "excelWorksheetName": "data",
  "outputFile": "round3_plots.csv",
  "naValues": ["-999"],
  "previewRows": 5
}
```

Paths in the job file are relative to the directory of the job file. Options given on the command
line take precedence.

The column tables themselves are part of the program, see [`crate::STATIC_COLUMNS`],
[`crate::SLASH_PATTERN_STEMS`] and [`crate::PIPE_PATTERN_STEMS`]. `wide2long --print-schema`
prints them.

*/
