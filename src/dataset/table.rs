//! Таблица: упорядоченный набор именованных колонок одинаковой длины

use std::collections::{BTreeMap, HashSet};

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use super::value::{ColumnKind, Value};
use crate::error::{PrepError, Result};

#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub values: Vec<Value>,
}

impl Column {
    pub fn new(name: impl Into<String>, values: Vec<Value>) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }

    pub fn kind(&self) -> ColumnKind {
        ColumnKind::of(&self.values)
    }

    pub fn missing_count(&self) -> usize {
        self.values.iter().filter(|v| v.is_missing()).count()
    }

    /// Непропущенные числовые значения в порядке строк
    pub fn present_numbers(&self) -> Vec<f64> {
        self.values.iter().filter_map(Value::as_f64).collect()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ColumnDescriptor {
    pub name: String,
    pub kind: ColumnKind,
}

/// Строка выборки: пары (колонка, значение) в порядке колонок
#[derive(Debug, Clone, PartialEq)]
pub struct Record(pub Vec<(String, Value)>);

impl Record {
    pub fn get(&self, column: &str) -> Option<&Value> {
        self.0.iter().find(|(name, _)| name == column).map(|(_, v)| v)
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (name, value) in &self.0 {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    columns: Vec<Column>,
    // число строк хранится отдельно: таблица без колонок сохраняет его
    rows: usize,
}

impl Dataset {
    /// Проверяет уникальность имен и одинаковую длину колонок
    pub fn new(columns: Vec<Column>) -> Result<Self> {
        let mut seen = HashSet::new();
        for column in &columns {
            if !seen.insert(column.name.as_str()) {
                return Err(PrepError::ParseError(format!(
                    "duplicate column name '{}'",
                    column.name
                )));
            }
        }

        let rows = columns.first().map(|c| c.values.len()).unwrap_or(0);
        if let Some(bad) = columns.iter().find(|c| c.values.len() != rows) {
            return Err(PrepError::ParseError(format!(
                "column '{}' has {} rows, expected {}",
                bad.name,
                bad.values.len(),
                rows
            )));
        }

        Ok(Self { columns, rows })
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn row_count(&self) -> usize {
        self.rows
    }

    pub fn column_names(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name.clone()).collect()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub(crate) fn column_mut(&mut self, name: &str) -> Option<&mut Column> {
        self.columns.iter_mut().find(|c| c.name == name)
    }

    pub fn descriptors(&self) -> Vec<ColumnDescriptor> {
        self.columns
            .iter()
            .map(|c| ColumnDescriptor {
                name: c.name.clone(),
                kind: c.kind(),
            })
            .collect()
    }

    pub fn missing_counts(&self) -> BTreeMap<String, usize> {
        self.columns
            .iter()
            .map(|c| (c.name.clone(), c.missing_count()))
            .collect()
    }

    /// Первые `n` строк по всем колонкам
    pub fn head(&self, n: usize) -> Vec<Record> {
        let all: Vec<&Column> = self.columns.iter().collect();
        Self::records(&all, n.min(self.row_count()))
    }

    /// Первые `n` строк по выбранным колонкам (неизвестные имена пропускаются)
    pub fn head_of(&self, names: &[String], n: usize) -> Vec<Record> {
        let mut selected: Vec<&Column> = Vec::new();
        for column in names.iter().filter_map(|name| self.column(name)) {
            if !selected.iter().any(|c| c.name == column.name) {
                selected.push(column);
            }
        }
        Self::records(&selected, n.min(self.row_count()))
    }

    fn records(columns: &[&Column], n: usize) -> Vec<Record> {
        (0..n)
            .map(|row| {
                Record(
                    columns
                        .iter()
                        .map(|c| (c.name.clone(), c.values[row].clone()))
                        .collect(),
                )
            })
            .collect()
    }

    /// Оставляет строки, для которых `keep[row] == true`
    pub(crate) fn retain_rows(&mut self, keep: &[bool]) {
        let kept = |row: usize| keep.get(row).copied().unwrap_or(true);
        self.rows = (0..self.rows).filter(|&row| kept(row)).count();
        for column in &mut self.columns {
            let mut row = 0;
            column.values.retain(|_| {
                let keep_row = kept(row);
                row += 1;
                keep_row
            });
        }
    }

    pub(crate) fn remove_columns(&mut self, names: &[String]) {
        self.columns.retain(|c| !names.contains(&c.name));
    }

    pub(crate) fn push_column(&mut self, column: Column) {
        self.columns.push(column);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Dataset {
        Dataset::new(vec![
            Column::new("age", vec![Value::Number(20.0), Value::Missing, Value::Number(40.0)]),
            Column::new(
                "city",
                vec![Value::text("Oslo"), Value::text("Rome"), Value::Missing],
            ),
        ])
        .unwrap()
    }

    #[test]
    fn rejects_duplicate_names() {
        let err = Dataset::new(vec![
            Column::new("a", vec![Value::Number(1.0)]),
            Column::new("a", vec![Value::Number(2.0)]),
        ])
        .unwrap_err();
        assert_eq!(err.kind(), "parse_error");
    }

    #[test]
    fn rejects_ragged_columns() {
        let err = Dataset::new(vec![
            Column::new("a", vec![Value::Number(1.0)]),
            Column::new("b", vec![Value::Number(2.0), Value::Number(3.0)]),
        ])
        .unwrap_err();
        assert!(matches!(err, PrepError::ParseError(_)));
    }

    #[test]
    fn reports_kinds_and_missing() {
        let ds = sample();
        let kinds: Vec<ColumnKind> = ds.descriptors().iter().map(|d| d.kind).collect();
        assert_eq!(kinds, vec![ColumnKind::Numeric, ColumnKind::Categorical]);
        assert_eq!(ds.missing_counts()["age"], 1);
        assert_eq!(ds.missing_counts()["city"], 1);
        assert_eq!(ds.row_count(), 3);
    }

    #[test]
    fn head_is_bounded_by_row_count() {
        let ds = sample();
        assert_eq!(ds.head(10).len(), 3);
        let rows = ds.head_of(&["city".to_string()], 2);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].get("city"), Some(&Value::text("Rome")));
        assert_eq!(rows[1].get("age"), None);
    }

    #[test]
    fn record_keeps_column_order() {
        let json = serde_json::to_string(&sample().head(1)).unwrap();
        assert_eq!(json, r#"[{"age":20.0,"city":"Oslo"}]"#);
    }

    #[test]
    fn retain_rows_applies_to_every_column() {
        let mut ds = sample();
        ds.retain_rows(&[true, false, true]);
        assert_eq!(ds.row_count(), 2);
        assert_eq!(ds.column("city").unwrap().values[1], Value::Missing);
    }

    #[test]
    fn row_count_survives_removing_every_column() {
        let mut ds = sample();
        ds.remove_columns(&ds.column_names());
        assert!(ds.columns().is_empty());
        assert_eq!(ds.row_count(), 3);
        assert_eq!(ds.head(2).len(), 2);
    }
}
