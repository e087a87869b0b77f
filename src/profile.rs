//! Per-column inspection of a loaded table.
//!
//! Classification is a pure pass over the table: nothing here mutates or
//! annotates the DataFrame. A column counts as numeric when its dtype is a
//! primitive numeric type, or when it is a text column whose non-null values
//! all parse as numbers. The reported mean is the exact statistic the
//! fill-missing transform uses.

use crate::error::Result;
use polars::prelude::*;
use serde::Serialize;

/// Classification of a column for transform targeting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnKind {
    Numeric,
    NonNumeric,
}

/// Summary of a single column, serializable for UI callers.
#[derive(Debug, Clone, Serialize)]
pub struct ColumnProfile {
    pub name: String,
    pub kind: ColumnKind,
    pub non_null: usize,
    pub nulls: usize,
    /// Arithmetic mean of the non-null values; `None` for non-numeric
    /// columns and for numeric columns with no non-null values.
    pub mean: Option<f64>,
}

/// Classify every column of `df`, in schema order.
pub fn classify(df: &DataFrame) -> Result<Vec<ColumnProfile>> {
    df.get_columns()
        .iter()
        .map(|column| {
            let series = column.as_materialized_series();
            let kind = column_kind(series)?;
            let mean = match kind {
                ColumnKind::Numeric => numeric_mean(series)?,
                ColumnKind::NonNumeric => None,
            };
            let nulls = series.null_count();
            Ok(ColumnProfile {
                name: column.name().to_string(),
                kind,
                non_null: series.len() - nulls,
                nulls,
                mean,
            })
        })
        .collect()
}

/// Names of the columns classified [`ColumnKind::Numeric`], in schema order.
pub fn numeric_columns(df: &DataFrame) -> Result<Vec<String>> {
    Ok(classify(df)?
        .into_iter()
        .filter(|profile| profile.kind == ColumnKind::Numeric)
        .map(|profile| profile.name)
        .collect())
}

/// First `n` rows of the table, for display.
pub fn preview(df: &DataFrame, n: usize) -> DataFrame {
    df.head(Some(n))
}

fn column_kind(series: &Series) -> Result<ColumnKind> {
    if series.dtype().is_numeric() {
        return Ok(ColumnKind::Numeric);
    }

    // A text column still counts as numeric when every non-null value
    // parses as a number. A column with no non-null values passes the check
    // vacuously; its mean stays undefined.
    if matches!(series.dtype(), DataType::String) {
        let ca = series.str()?;
        if ca.into_iter().flatten().all(|v| v.parse::<f64>().is_ok()) {
            return Ok(ColumnKind::Numeric);
        }
    }

    Ok(ColumnKind::NonNumeric)
}

/// Mean of the non-null values, through a float cast for text columns that
/// classify numeric. `None` when the column has no non-null values.
pub(crate) fn numeric_mean(series: &Series) -> Result<Option<f64>> {
    if series.dtype().is_numeric() {
        Ok(series.mean())
    } else {
        Ok(series.cast(&DataType::Float64)?.mean())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_kinds() -> anyhow::Result<()> {
        let df = df!(
            "id" => &[1i64, 2, 3],
            "score" => &[Some(1.5f64), None, Some(2.5)],
            "name" => &["a", "b", "c"],
            "flag" => &[true, false, true]
        )?;

        let profiles = classify(&df)?;
        assert_eq!(profiles.len(), 4);
        assert_eq!(profiles[0].kind, ColumnKind::Numeric);
        assert_eq!(profiles[1].kind, ColumnKind::Numeric);
        assert_eq!(profiles[2].kind, ColumnKind::NonNumeric);
        assert_eq!(profiles[3].kind, ColumnKind::NonNumeric);

        assert_eq!(profiles[0].mean, Some(2.0));
        assert_eq!(profiles[1].mean, Some(2.0));
        assert_eq!(profiles[1].nulls, 1);
        assert_eq!(profiles[2].mean, None);
        Ok(())
    }

    #[test]
    fn test_text_column_of_numbers_is_numeric() -> anyhow::Result<()> {
        let df = df!(
            "codes" => &[Some("1"), None, Some("3")],
            "mixed" => &[Some("1"), Some("x"), Some("3")]
        )?;

        let profiles = classify(&df)?;
        assert_eq!(profiles[0].kind, ColumnKind::Numeric);
        assert_eq!(profiles[0].mean, Some(2.0));
        assert_eq!(profiles[1].kind, ColumnKind::NonNumeric);
        Ok(())
    }

    #[test]
    fn test_all_null_column_has_undefined_mean() -> anyhow::Result<()> {
        let df = df!(
            "empty" => &[None::<&str>, None, None]
        )?;

        let profiles = classify(&df)?;
        assert_eq!(profiles[0].kind, ColumnKind::Numeric);
        assert_eq!(profiles[0].mean, None);
        assert_eq!(profiles[0].non_null, 0);
        Ok(())
    }

    #[test]
    fn test_numeric_columns_order() -> anyhow::Result<()> {
        let df = df!(
            "b" => &[1i64, 2],
            "name" => &["x", "y"],
            "a" => &[0.5f64, 1.5]
        )?;

        assert_eq!(numeric_columns(&df)?, vec!["b", "a"]);
        Ok(())
    }

    #[test]
    fn test_preview_limits_rows() -> anyhow::Result<()> {
        let df = df!("a" => &[1, 2, 3, 4, 5])?;
        assert_eq!(preview(&df, 2).height(), 2);
        assert_eq!(preview(&df, 10).height(), 5);
        Ok(())
    }
}
