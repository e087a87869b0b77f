//! Serializes the working table to a declared output format.
//!
//! Both writers materialize the full output buffer before returning;
//! callers rely on complete buffers, never partially written ones.

use crate::error::{Result, SweeperError};
use crate::format::FileFormat;
use polars::prelude::*;
use simple_excel_writer::{Row, Workbook};

/// Serialize `df` as `format`, returning the full output byte stream.
pub fn export(df: &DataFrame, format: FileFormat) -> Result<Vec<u8>> {
    match format {
        FileFormat::Csv => export_csv(df),
        FileFormat::Xlsx => export_xlsx(df),
    }
}

fn export_csv(df: &DataFrame) -> Result<Vec<u8>> {
    let mut df = df.clone();
    let mut buf = Vec::new();
    CsvWriter::new(&mut buf)
        .include_header(true)
        .finish(&mut df)?;
    Ok(buf)
}

fn export_xlsx(df: &DataFrame) -> Result<Vec<u8>> {
    let mut workbook = Workbook::create_in_memory();
    let mut sheet = workbook.create_sheet("Sheet1");

    workbook.write_sheet(&mut sheet, |writer| {
        let mut header = Row::new();
        for name in df.get_column_names_str() {
            header.add_cell(name);
        }
        writer.append_row(header)?;

        let mut iters: Vec<_> = df
            .get_columns()
            .iter()
            .map(|column| column.as_materialized_series().iter())
            .collect();

        for _ in 0..df.height() {
            let mut row = Row::new();
            for iter in &mut iters {
                match iter.next() {
                    Some(value) => append_cell(&mut row, &value),
                    None => row.add_empty_cells(1),
                }
            }
            writer.append_row(row)?;
        }
        Ok(())
    })?;

    workbook
        .close()?
        .ok_or_else(|| SweeperError::DataProcessing("xlsx buffer was not produced".to_owned()))
}

fn append_cell(row: &mut Row, value: &AnyValue<'_>) {
    match value {
        AnyValue::Null => row.add_empty_cells(1),
        AnyValue::Boolean(v) => row.add_cell(*v),
        AnyValue::Int64(v) => row.add_cell(*v as f64),
        AnyValue::Float64(v) => row.add_cell(*v),
        AnyValue::String(v) => row.add_cell(*v),
        AnyValue::StringOwned(v) => row.add_cell(v.as_str()),
        other => row.add_cell(other.to_string()),
    }
}
