//! Transform operations over the working table.
//!
//! Each operation consumes the current table and returns the transformed
//! one; the pipeline applies them strictly in the order the caller gave.
//! The enum is serde-tagged so an ordered operation list can be stored and
//! replayed as JSON.

use crate::error::{Result, SweeperError};
use crate::profile::{self, ColumnKind};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A single cleaning step (tagged enum).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Operation {
    /// Remove every row that fully duplicates an earlier row, keeping the
    /// first occurrence and the original order of the survivors.
    Deduplicate,

    /// Fill missing cells in numeric columns with the column mean.
    FillMissingNumeric,

    /// Keep exactly the named columns, in the given order.
    SelectColumns { columns: Vec<String> },
}

impl Operation {
    pub fn apply(&self, df: DataFrame) -> Result<DataFrame> {
        match self {
            Self::Deduplicate => deduplicate(df),
            Self::FillMissingNumeric => fill_missing_numeric(df),
            Self::SelectColumns { columns } => select_columns(df, columns),
        }
    }
}

/// Lower the caller's per-transform booleans to an ordered operation list,
/// in the order the interactive front-end applies them: deduplicate, fill,
/// then column selection.
pub fn operations_from_flags(
    dedupe: bool,
    fill_missing: bool,
    keep_columns: Option<Vec<String>>,
) -> Vec<Operation> {
    let mut operations = Vec::new();
    if dedupe {
        operations.push(Operation::Deduplicate);
    }
    if fill_missing {
        operations.push(Operation::FillMissingNumeric);
    }
    if let Some(columns) = keep_columns {
        operations.push(Operation::SelectColumns { columns });
    }
    operations
}

fn deduplicate(df: DataFrame) -> Result<DataFrame> {
    df.unique_stable(None, UniqueKeepStrategy::First, None)
        .map_err(SweeperError::from)
}

/// For every numeric-classified column holding both nulls and at least one
/// value, fill the nulls with the column mean. Integer columns stay integer
/// when the mean is mathematically integral; otherwise the filled column is
/// promoted to Float64. Columns with no non-null values keep their nulls:
/// their mean is undefined.
fn fill_missing_numeric(df: DataFrame) -> Result<DataFrame> {
    let profiles = profile::classify(&df)?;

    let mut exprs = Vec::with_capacity(profiles.len());
    let mut touched = false;

    for p in &profiles {
        let series = df.column(&p.name)?.as_materialized_series();
        let expr = col(p.name.as_str());

        let expr = match (p.kind, p.mean) {
            (ColumnKind::Numeric, Some(mean)) if series.null_count() > 0 => {
                touched = true;
                fill_expr(expr, series.dtype(), mean)
            }
            _ => expr,
        };
        exprs.push(expr.alias(p.name.as_str()));
    }

    if !touched {
        return Ok(df);
    }

    df.lazy().select(exprs).collect().map_err(SweeperError::from)
}

fn fill_expr(expr: Expr, dtype: &DataType, mean: f64) -> Expr {
    if dtype.is_integer() && mean.fract() == 0.0 {
        expr.fill_null(lit(mean as i64))
    } else if dtype.is_numeric() {
        expr.fill_null(lit(mean))
    } else {
        // Text column that classifies numeric: parse it before filling
        expr.cast(DataType::Float64).fill_null(lit(mean))
    }
}

/// Project to exactly `requested` in request order, ignoring duplicate
/// names after their first occurrence. Every name is validated before any
/// projection happens, so a failed call leaves the table semantics
/// untouched.
fn select_columns(df: DataFrame, requested: &[String]) -> Result<DataFrame> {
    let current: HashSet<&str> = df.get_column_names_str().into_iter().collect();

    let mut seen = HashSet::new();
    let mut keep: Vec<String> = Vec::with_capacity(requested.len());
    for name in requested {
        if !current.contains(name.as_str()) {
            return Err(SweeperError::UnknownColumn(name.clone()));
        }
        if seen.insert(name.as_str()) {
            keep.push(name.clone());
        }
    }

    df.select(keep).map_err(SweeperError::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deduplicate_keeps_first_and_order() -> anyhow::Result<()> {
        let df = df!(
            "a" => &[1i64, 2, 1, 3, 2],
            "b" => &["x", "y", "x", "z", "y"]
        )?;

        let out = Operation::Deduplicate.apply(df)?;
        let expected = df!(
            "a" => &[1i64, 2, 3],
            "b" => &["x", "y", "z"]
        )?;
        assert!(out.equals(&expected));
        Ok(())
    }

    #[test]
    fn test_deduplicate_idempotent() -> anyhow::Result<()> {
        let df = df!(
            "a" => &[1i64, 1, 2],
            "b" => &[Some("x"), Some("x"), None]
        )?;

        let once = Operation::Deduplicate.apply(df)?;
        let twice = Operation::Deduplicate.apply(once.clone())?;
        assert!(once.equals_missing(&twice));
        assert_eq!(once.height(), 2);
        Ok(())
    }

    #[test]
    fn test_deduplicate_noop_without_duplicates() -> anyhow::Result<()> {
        let df = df!("a" => &[1i64, 2, 3])?;
        let out = Operation::Deduplicate.apply(df.clone())?;
        assert!(out.equals(&df));
        Ok(())
    }

    #[test]
    fn test_fill_integer_column_stays_integer() -> anyhow::Result<()> {
        let df = df!(
            "a" => &[1i64, 1, 2],
            "b" => &[None, None, Some(5i64)]
        )?;

        let out = Operation::FillMissingNumeric.apply(df)?;
        let b = out.column("b")?.as_materialized_series();
        assert_eq!(*b.dtype(), DataType::Int64);
        assert_eq!(b.null_count(), 0);
        assert_eq!(b.i64()?.get(0), Some(5));
        Ok(())
    }

    #[test]
    fn test_fill_promotes_on_fractional_mean() -> anyhow::Result<()> {
        let df = df!(
            "b" => &[Some(1i64), Some(2), None]
        )?;

        let out = Operation::FillMissingNumeric.apply(df)?;
        let b = out.column("b")?.as_materialized_series();
        assert_eq!(*b.dtype(), DataType::Float64);
        assert_eq!(b.f64()?.get(2), Some(1.5));
        Ok(())
    }

    #[test]
    fn test_fill_float_column() -> anyhow::Result<()> {
        let df = df!(
            "b" => &[Some(1.0f64), None, Some(3.0)]
        )?;

        let out = Operation::FillMissingNumeric.apply(df)?;
        let b = out.column("b")?.as_materialized_series();
        assert_eq!(b.f64()?.get(1), Some(2.0));
        Ok(())
    }

    #[test]
    fn test_fill_leaves_non_numeric_untouched() -> anyhow::Result<()> {
        let df = df!(
            "name" => &[Some("x"), None, Some("z")],
            "b" => &[Some(1.0f64), None, Some(3.0)]
        )?;

        let out = Operation::FillMissingNumeric.apply(df)?;
        assert_eq!(out.column("name")?.as_materialized_series().null_count(), 1);
        assert_eq!(out.column("b")?.as_materialized_series().null_count(), 0);
        Ok(())
    }

    #[test]
    fn test_fill_all_missing_column_unchanged() -> anyhow::Result<()> {
        let df = df!(
            "a" => &[1i64, 2],
            "empty" => &[None::<&str>, None]
        )?;

        let out = Operation::FillMissingNumeric.apply(df)?;
        assert_eq!(out.column("empty")?.as_materialized_series().null_count(), 2);
        Ok(())
    }

    #[test]
    fn test_fill_is_noop_second_time() -> anyhow::Result<()> {
        let df = df!(
            "b" => &[Some(1.0f64), None, Some(3.0)]
        )?;

        let once = Operation::FillMissingNumeric.apply(df)?;
        let twice = Operation::FillMissingNumeric.apply(once.clone())?;
        assert!(once.equals_missing(&twice));
        Ok(())
    }

    #[test]
    fn test_select_columns_order_and_duplicates() -> anyhow::Result<()> {
        let df = df!(
            "a" => &[1i64],
            "b" => &[2i64],
            "c" => &[3i64]
        )?;

        let op = Operation::SelectColumns {
            columns: vec!["c".to_owned(), "a".to_owned(), "c".to_owned()],
        };
        let out = op.apply(df)?;
        assert_eq!(out.get_column_names_str(), vec!["c", "a"]);
        Ok(())
    }

    #[test]
    fn test_select_columns_unknown_fails() -> anyhow::Result<()> {
        let df = df!("a" => &[1i64])?;

        let op = Operation::SelectColumns {
            columns: vec!["a".to_owned(), "ghost".to_owned()],
        };
        let err = op.apply(df).unwrap_err();
        match err {
            SweeperError::UnknownColumn(name) => assert_eq!(name, "ghost"),
            other => panic!("Expected UnknownColumn, got {other:?}"),
        }
        Ok(())
    }

    #[test]
    fn test_operation_serde_tags() -> anyhow::Result<()> {
        let ops = vec![
            Operation::Deduplicate,
            Operation::SelectColumns {
                columns: vec!["a".to_owned()],
            },
        ];

        let json = serde_json::to_string(&ops)?;
        assert!(json.contains("\"op\":\"deduplicate\""));
        assert!(json.contains("\"op\":\"select_columns\""));

        let parsed: Vec<Operation> = serde_json::from_str(&json)?;
        assert_eq!(parsed, ops);
        Ok(())
    }

    #[test]
    fn test_operations_from_flags_order() {
        let ops = operations_from_flags(true, true, Some(vec!["a".to_owned()]));
        assert_eq!(
            ops,
            vec![
                Operation::Deduplicate,
                Operation::FillMissingNumeric,
                Operation::SelectColumns {
                    columns: vec!["a".to_owned()]
                },
            ]
        );

        assert!(operations_from_flags(false, false, None).is_empty());
    }
}
