//! Parses raw input bytes of a declared format into the working table.
//!
//! Loading is a pure parse: no filesystem access, and a failure never
//! produces a partial table. CSV goes through polars' reader with schema
//! inference over the whole input; XLSX goes through calamine, reading the
//! first worksheet only. In both formats the first row is the header and an
//! empty or absent cell loads as null.

use crate::error::{Result, SweeperError};
use crate::format::FileFormat;
use calamine::{Data, Reader as _, Xlsx};
use polars::prelude::*;
use std::io::Cursor;

/// Parse `bytes` as `format` into a [`DataFrame`].
///
/// # Errors
///
/// Returns [`SweeperError::MalformedInput`] when the bytes cannot be parsed
/// as the declared format (structurally invalid input, missing header row,
/// or an xlsx archive without a worksheet).
pub fn load(bytes: &[u8], format: FileFormat) -> Result<DataFrame> {
    match format {
        FileFormat::Csv => load_csv(bytes),
        FileFormat::Xlsx => load_xlsx(bytes),
    }
}

fn load_csv(bytes: &[u8]) -> Result<DataFrame> {
    CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(10_000))
        .into_reader_with_file_handle(Cursor::new(bytes.to_vec()))
        .finish()
        .map_err(|e| SweeperError::MalformedInput(format!("invalid csv: {e}")))
}

fn load_xlsx(bytes: &[u8]) -> Result<DataFrame> {
    let mut workbook: Xlsx<_> = Xlsx::new(Cursor::new(bytes.to_vec()))
        .map_err(|e| SweeperError::MalformedInput(format!("invalid xlsx: {e}")))?;

    // First worksheet only.
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| SweeperError::MalformedInput("xlsx has no worksheet".to_owned()))?
        .map_err(|e| SweeperError::MalformedInput(format!("unreadable worksheet: {e}")))?;

    let mut rows = range.rows();
    let header = rows
        .next()
        .ok_or_else(|| SweeperError::MalformedInput("xlsx sheet has no header row".to_owned()))?;

    let names: Vec<String> = header
        .iter()
        .enumerate()
        .map(|(idx, cell)| header_name(cell, idx))
        .collect();

    let body: Vec<&[Data]> = rows.collect();
    let columns: Vec<Column> = names
        .iter()
        .enumerate()
        .map(|(idx, name)| build_column(name, idx, &body))
        .collect();

    DataFrame::new(columns)
        .map_err(|e| SweeperError::MalformedInput(format!("invalid worksheet layout: {e}")))
}

fn header_name(cell: &Data, idx: usize) -> String {
    let name = match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.trim().to_owned(),
        other => other.to_string(),
    };
    if name.is_empty() {
        // Positional fallback for blank header cells
        format!("column_{}", idx + 1)
    } else {
        name
    }
}

/// Build a typed column from the worksheet cells at `idx`.
///
/// The dtype is chosen from the cell kinds present: all-numeric columns
/// become `Int64` (when every value is integral) or `Float64`, all-boolean
/// columns become `Boolean`, everything else loads as text. Empty cells and
/// spreadsheet error cells load as null.
fn build_column(name: &str, idx: usize, body: &[&[Data]]) -> Column {
    let cells: Vec<&Data> = body
        .iter()
        .map(|row| row.get(idx).unwrap_or(&Data::Empty))
        .collect();

    let mut non_empty = 0usize;
    let mut all_numeric = true;
    let mut all_integral = true;
    let mut all_bool = true;

    for cell in &cells {
        match cell {
            Data::Empty | Data::Error(_) => {}
            Data::Int(_) => {
                non_empty += 1;
                all_bool = false;
            }
            Data::Float(v) => {
                non_empty += 1;
                all_bool = false;
                if v.fract() != 0.0 {
                    all_integral = false;
                }
            }
            Data::Bool(_) => {
                non_empty += 1;
                all_numeric = false;
                all_integral = false;
            }
            _ => {
                non_empty += 1;
                all_numeric = false;
                all_integral = false;
                all_bool = false;
            }
        }
    }

    let series = if non_empty == 0 {
        Series::new(name.into(), vec![None::<String>; cells.len()])
    } else if all_numeric && all_integral {
        let values: Vec<Option<i64>> = cells
            .iter()
            .map(|cell| match cell {
                Data::Int(v) => Some(*v),
                Data::Float(v) => Some(*v as i64),
                _ => None,
            })
            .collect();
        Series::new(name.into(), values)
    } else if all_numeric {
        let values: Vec<Option<f64>> = cells
            .iter()
            .map(|cell| match cell {
                Data::Int(v) => Some(*v as f64),
                Data::Float(v) => Some(*v),
                _ => None,
            })
            .collect();
        Series::new(name.into(), values)
    } else if all_bool {
        let values: Vec<Option<bool>> = cells
            .iter()
            .map(|cell| match cell {
                Data::Bool(v) => Some(*v),
                _ => None,
            })
            .collect();
        Series::new(name.into(), values)
    } else {
        let values: Vec<Option<String>> = cells
            .iter()
            .map(|cell| match cell {
                Data::Empty | Data::Error(_) => None,
                Data::String(s) => Some(s.clone()),
                other => Some(other.to_string()),
            })
            .collect();
        Series::new(name.into(), values)
    };

    Column::from(series)
}
