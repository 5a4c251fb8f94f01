//! Заполнение пропусков

use std::fmt;
use std::str::FromStr;

use super::selection::{require_numeric, select_columns};
use super::statistics;
use crate::dataset::{Column, ColumnKind, Dataset, Value};
use crate::error::{PrepError, Result};

/// Значение для нечисловых колонок при `constant`
pub const UNKNOWN_TOKEN: &str = "unknown";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImputeMethod {
    Mean,
    Median,
    Mode,
    Constant,
    DropRows,
}

impl ImputeMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImputeMethod::Mean => "mean",
            ImputeMethod::Median => "median",
            ImputeMethod::Mode => "mode",
            ImputeMethod::Constant => "constant",
            ImputeMethod::DropRows => "drop_rows",
        }
    }
}

impl FromStr for ImputeMethod {
    type Err = PrepError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mean" => Ok(ImputeMethod::Mean),
            "median" => Ok(ImputeMethod::Median),
            "mode" => Ok(ImputeMethod::Mode),
            "constant" => Ok(ImputeMethod::Constant),
            "drop_rows" => Ok(ImputeMethod::DropRows),
            _ => Err(PrepError::InvalidMethod {
                operation: "imputation",
                method: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for ImputeMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub fn impute(dataset: &Dataset, columns: &[String], method: ImputeMethod) -> Result<Dataset> {
    let names = select_columns(dataset, columns)?;
    if matches!(method, ImputeMethod::Mean | ImputeMethod::Median) {
        require_numeric(dataset, &names)?;
    }

    let mut out = dataset.clone();

    if method == ImputeMethod::DropRows {
        // Строка удаляется, если пропуск есть хотя бы в одной из выбранных колонок
        let targets: Vec<&Column> = names.iter().filter_map(|n| dataset.column(n)).collect();
        let keep: Vec<bool> = (0..dataset.row_count())
            .map(|row| targets.iter().all(|c| !c.values[row].is_missing()))
            .collect();
        out.retain_rows(&keep);
        return Ok(out);
    }

    for name in &names {
        if let Some(column) = out.column_mut(name) {
            if let Some(fill) = fill_value(column, method) {
                for value in column.values.iter_mut().filter(|v| v.is_missing()) {
                    *value = fill.clone();
                }
            }
        }
    }

    Ok(out)
}

/// `None` - заполнять нечем (в колонке нет ни одного значения)
fn fill_value(column: &Column, method: ImputeMethod) -> Option<Value> {
    match method {
        ImputeMethod::Mean => statistics::mean(&column.present_numbers()).map(Value::Number),
        ImputeMethod::Median => statistics::median(&column.present_numbers()).map(Value::Number),
        ImputeMethod::Mode => statistics::mode(&column.values).cloned(),
        ImputeMethod::Constant => Some(match column.kind() {
            ColumnKind::Numeric => Value::Number(0.0),
            ColumnKind::Categorical => Value::text(UNKNOWN_TOKEN),
        }),
        ImputeMethod::DropRows => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dataset() -> Dataset {
        Dataset::new(vec![
            Column::new(
                "age",
                vec![Value::Number(20.0), Value::Missing, Value::Number(40.0), Value::Number(40.0)],
            ),
            Column::new(
                "city",
                vec![Value::text("Oslo"), Value::text("Rome"), Value::Missing, Value::text("Rome")],
            ),
            Column::new(
                "score",
                vec![Value::Missing, Value::Number(1.0), Value::Number(2.0), Value::Missing],
            ),
        ])
        .unwrap()
    }

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn mean_fills_numeric_gaps() {
        let ds = Dataset::new(vec![Column::new(
            "age",
            vec![Value::Number(20.0), Value::Missing, Value::Number(40.0)],
        )])
        .unwrap();
        let out = impute(&ds, &names(&["age"]), ImputeMethod::Mean).unwrap();
        assert_eq!(
            out.column("age").unwrap().values,
            vec![Value::Number(20.0), Value::Number(30.0), Value::Number(40.0)]
        );
        assert_eq!(out.missing_counts()["age"], 0);
    }

    #[test]
    fn median_fills_numeric_gaps() {
        let out = impute(&dataset(), &names(&["age"]), ImputeMethod::Median).unwrap();
        assert_eq!(out.column("age").unwrap().values[1], Value::Number(40.0));
    }

    #[test]
    fn mean_rejects_text_column() {
        let err = impute(&dataset(), &names(&["age", "city"]), ImputeMethod::Mean).unwrap_err();
        assert_eq!(err, PrepError::NonNumericColumn("city".to_string()));
    }

    #[test]
    fn mode_uses_most_frequent_value() {
        let out = impute(&dataset(), &names(&["city"]), ImputeMethod::Mode).unwrap();
        assert_eq!(out.column("city").unwrap().values[2], Value::text("Rome"));
    }

    #[test]
    fn constant_depends_on_kind() {
        let out = impute(&dataset(), &names(&["age", "city"]), ImputeMethod::Constant).unwrap();
        assert_eq!(out.column("age").unwrap().values[1], Value::Number(0.0));
        assert_eq!(out.column("city").unwrap().values[2], Value::text("unknown"));
        // не выбранная колонка не меняется
        assert_eq!(out.missing_counts()["score"], 2);
    }

    #[test]
    fn drop_rows_checks_every_selected_column() {
        let out = impute(&dataset(), &names(&["age", "city"]), ImputeMethod::DropRows).unwrap();
        // строка 1 (age) и строка 2 (city) удалены, пропуски в score не важны
        assert_eq!(out.row_count(), 2);
        assert_eq!(out.missing_counts()["score"], 2);
        assert_eq!(out.missing_counts()["age"], 0);
    }

    #[test]
    fn all_missing_column_is_left_as_is() {
        let ds = Dataset::new(vec![Column::new("e", vec![Value::Missing, Value::Missing])]).unwrap();
        let out = impute(&ds, &names(&["e"]), ImputeMethod::Mean).unwrap();
        assert_eq!(out, ds);
    }

    #[test]
    fn unknown_method_name() {
        let err = "interpolate".parse::<ImputeMethod>().unwrap_err();
        assert_eq!(
            err,
            PrepError::InvalidMethod {
                operation: "imputation",
                method: "interpolate".to_string()
            }
        );
    }
}
