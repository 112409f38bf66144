//! Reading datasets from CSV files and spreadsheets.
//!
//! The format is chosen from the file extension before the file is opened, so
//! an unsupported file is rejected without touching the filesystem.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use calamine::{open_workbook_auto, Reader};
use tracing::info;

use crate::data::{Column, Dataset};
use crate::types::LoadError;

/// Supported input formats.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DataFormat {
    Csv,
    Spreadsheet,
}

impl DataFormat {
    /// Infer the format from the (case-insensitive) file extension.
    pub fn from_path(path: &Path) -> Result<Self, LoadError> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();

        match extension.as_str() {
            "csv" => Ok(DataFormat::Csv),
            "xlsx" | "xlsm" | "xls" | "ods" => Ok(DataFormat::Spreadsheet),
            _ => Err(LoadError::UnsupportedFormat { extension }),
        }
    }
}

/// Load a dataset from `path`, using the first sheet for spreadsheets.
///
/// The first row holds variable names; every following row is one
/// observation, kept in file order.
///
/// # Errors
/// * `UnsupportedFormat` for any extension other than csv/xlsx/xlsm/xls/ods
/// * `Io`, `Csv` or `Spreadsheet` when the file cannot be read or parsed
/// * `Empty` when there is no header or no data row
pub fn load_dataset(path: &Path) -> Result<Dataset, LoadError> {
    let dataset = match DataFormat::from_path(path)? {
        DataFormat::Csv => read_csv(File::open(path)?)?,
        DataFormat::Spreadsheet => read_spreadsheet(path)?,
    };

    info!(
        path = %path.display(),
        rows = dataset.n_obs(),
        columns = dataset.n_vars(),
        "loaded dataset"
    );
    Ok(dataset)
}

/// Parse CSV with a header row from any reader.
pub fn read_csv<R: Read>(reader: R) -> Result<Dataset, LoadError> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let names: Vec<String> = rdr.headers()?.iter().map(str::to_string).collect();

    let mut rows = Vec::new();
    for record in rdr.records() {
        let record = record?;
        rows.push(record.iter().map(str::to_string).collect::<Vec<_>>());
    }

    build_dataset(names, rows)
}

/// Parse the first sheet of a workbook.
pub fn read_spreadsheet(path: &Path) -> Result<Dataset, LoadError> {
    let mut workbook =
        open_workbook_auto(path).map_err(|e| LoadError::Spreadsheet(e.to_string()))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or(LoadError::Empty)?
        .map_err(|e| LoadError::Spreadsheet(e.to_string()))?;

    let mut grid = range
        .rows()
        .map(|row| row.iter().map(|cell| cell.to_string()).collect::<Vec<_>>());

    let names = grid.next().ok_or(LoadError::Empty)?;
    let rows = grid
        .filter(|row| row.iter().any(|cell| !cell.trim().is_empty()))
        .collect();

    build_dataset(names, rows)
}

/// Transpose row-major cells into typed columns.
fn build_dataset(names: Vec<String>, rows: Vec<Vec<String>>) -> Result<Dataset, LoadError> {
    if names.is_empty() || rows.is_empty() {
        return Err(LoadError::Empty);
    }

    let expected = names.len();
    let mut cells: Vec<Vec<String>> = vec![Vec::with_capacity(rows.len()); expected];
    for (r, row) in rows.into_iter().enumerate() {
        if row.len() != expected {
            return Err(LoadError::Ragged {
                row: r + 1,
                found: row.len(),
                expected,
            });
        }
        for (j, cell) in row.into_iter().enumerate() {
            cells[j].push(cell);
        }
    }

    let columns = cells.into_iter().map(Column::infer).collect();
    Dataset::new(names, columns).map_err(|_| LoadError::Empty)
}
