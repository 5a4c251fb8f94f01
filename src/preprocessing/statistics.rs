//! Описательные статистики по значениям колонки

use std::collections::BTreeMap;

use crate::dataset::{Category, Dataset, Value};
use crate::error::{PrepError, Result};
use crate::preprocessing::selection::require_numeric;
use crate::types::ColumnStatistics;

pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

pub fn median(values: &[f64]) -> Option<f64> {
    percentile(values, 0.5)
}

/// Перцентиль с линейной интерполяцией между соседними рангами, `q` в [0, 1]
pub fn percentile(values: &[f64], q: f64) -> Option<f64> {
    if values.is_empty() {
        return None;
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    let position = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    let fraction = position - lower as f64;

    if fraction == 0.0 {
        return Some(sorted[lower]);
    }
    // взвешенная сумма вместо разности: не переполняется на соседях разного знака
    Some(sorted[lower] * (1.0 - fraction) + sorted[upper] * fraction)
}

/// Самое частое значение. При равенстве побеждает то,
/// которое первым достигло максимальной частоты при проходе по строкам.
pub fn mode(values: &[Value]) -> Option<&Value> {
    let mut counts: BTreeMap<Category<'_>, usize> = BTreeMap::new();
    let mut best: Option<&Value> = None;
    let mut best_count = 0;

    for value in values.iter().filter(|v| !v.is_missing()) {
        let count = counts.entry(Category(value)).or_insert(0);
        *count += 1;
        if *count > best_count {
            best_count = *count;
            best = Some(value);
        }
    }

    best
}

/// Все значения с максимальной частотой в порядке первого появления
pub fn multimode(values: &[Value]) -> Vec<Value> {
    let mut counts: BTreeMap<Category<'_>, usize> = BTreeMap::new();
    let mut order: Vec<&Value> = Vec::new();

    for value in values.iter().filter(|v| !v.is_missing()) {
        let count = counts.entry(Category(value)).or_insert(0);
        if *count == 0 {
            order.push(value);
        }
        *count += 1;
    }

    let max = counts.values().copied().max().unwrap_or(0);
    order
        .into_iter()
        .filter(|v| counts.get(&Category(*v)).copied() == Some(max))
        .cloned()
        .collect()
}

/// Среднее, медиана и мода числовой колонки плюс выборка значений
pub fn column_statistics(dataset: &Dataset, name: &str, sample: usize) -> Result<ColumnStatistics> {
    let column = dataset
        .column(name)
        .ok_or_else(|| PrepError::UnknownColumn(name.to_string()))?;
    require_numeric(dataset, &[name.to_string()])?;

    let present = column.present_numbers();
    Ok(ColumnStatistics {
        column: name.to_string(),
        mean: mean(&present),
        median: median(&present),
        mode: multimode(&column.values)
            .iter()
            .filter_map(Value::as_f64)
            .collect(),
        sample_data: column.values.iter().take(sample).cloned().collect(),
    })
}
