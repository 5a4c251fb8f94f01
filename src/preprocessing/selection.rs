//! Проверка выбранных колонок и удаление колонок

use crate::dataset::{ColumnKind, Dataset};
use crate::error::{PrepError, Result};

/// Проверяет выбор целиком: непустой, все колонки существуют.
/// Повторы схлопываются до первого вхождения.
pub fn select_columns(dataset: &Dataset, requested: &[String]) -> Result<Vec<String>> {
    if requested.is_empty() {
        return Err(PrepError::NoColumnsSelected);
    }

    let mut selected: Vec<String> = Vec::with_capacity(requested.len());
    for name in requested {
        if !dataset.has_column(name) {
            return Err(PrepError::UnknownColumn(name.clone()));
        }
        if !selected.contains(name) {
            selected.push(name.clone());
        }
    }

    Ok(selected)
}

pub fn require_numeric(dataset: &Dataset, names: &[String]) -> Result<()> {
    for name in names {
        let column = dataset
            .column(name)
            .ok_or_else(|| PrepError::UnknownColumn(name.clone()))?;
        if column.kind() != ColumnKind::Numeric {
            return Err(PrepError::NonNumericColumn(name.clone()));
        }
    }
    Ok(())
}

/// Удаление колонок: все или ничего
pub fn drop_columns(dataset: &Dataset, columns: &[String]) -> Result<Dataset> {
    let names = select_columns(dataset, columns)?;
    let mut out = dataset.clone();
    out.remove_columns(&names);
    Ok(out)
}
