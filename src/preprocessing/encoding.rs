//! Кодирование категориальных колонок

use std::collections::{BTreeSet, HashSet};
use std::fmt;
use std::str::FromStr;

use super::selection::select_columns;
use crate::dataset::{Category, Column, Dataset, Value};
use crate::error::{PrepError, Result};

/// Код для пропусков при label-кодировании
pub const MISSING_LABEL: i64 = -1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncodeMethod {
    OneHot,
    Label,
}

impl EncodeMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            EncodeMethod::OneHot => "onehot",
            EncodeMethod::Label => "label",
        }
    }
}

impl FromStr for EncodeMethod {
    type Err = PrepError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "onehot" => Ok(EncodeMethod::OneHot),
            "label" => Ok(EncodeMethod::Label),
            _ => Err(PrepError::InvalidMethod {
                operation: "encoding",
                method: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for EncodeMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub fn encode(dataset: &Dataset, columns: &[String], method: EncodeMethod) -> Result<Dataset> {
    let names = select_columns(dataset, columns)?;
    match method {
        EncodeMethod::OneHot => one_hot(dataset, &names),
        EncodeMethod::Label => label(dataset, &names),
    }
}

/// Различные непропущенные значения по возрастанию
fn categories(column: &Column) -> Vec<&Value> {
    column
        .values
        .iter()
        .filter(|v| !v.is_missing())
        .map(Category)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(|c| c.0)
        .collect()
}

/// Колонка заменяется набором логических колонок `<name>_<value>`,
/// новые колонки добавляются в конец
fn one_hot(dataset: &Dataset, names: &[String]) -> Result<Dataset> {
    let mut taken: HashSet<String> = dataset.column_names().into_iter().collect();
    let mut generated = Vec::new();

    for name in names {
        let Some(column) = dataset.column(name) else {
            return Err(PrepError::UnknownColumn(name.clone()));
        };

        for category in categories(column) {
            let new_name = format!("{}_{}", name, category);
            if !taken.insert(new_name.clone()) {
                return Err(PrepError::NameCollision(new_name));
            }
            let indicator = column
                .values
                .iter()
                .map(|v| Value::Bool(!v.is_missing() && Category(v) == Category(category)))
                .collect();
            generated.push(Column::new(new_name, indicator));
        }
    }

    let mut out = dataset.clone();
    out.remove_columns(names);
    for column in generated {
        out.push_column(column);
    }
    Ok(out)
}

/// Коды 0..n по возрастанию категорий, пропуск - `MISSING_LABEL`
fn label(dataset: &Dataset, names: &[String]) -> Result<Dataset> {
    let mut out = dataset.clone();

    for name in names {
        let column = out
            .column_mut(name)
            .ok_or_else(|| PrepError::UnknownColumn(name.clone()))?;

        let codes: Vec<Value> = {
            let cats = categories(column);
            column
                .values
                .iter()
                .map(|v| {
                    let code = if v.is_missing() {
                        MISSING_LABEL
                    } else {
                        cats.binary_search_by(|c| c.category_cmp(v))
                            .map(|idx| idx as i64)
                            .unwrap_or(MISSING_LABEL)
                    };
                    Value::Number(code as f64)
                })
                .collect()
        };
        column.values = codes;
    }

    Ok(out)
}
