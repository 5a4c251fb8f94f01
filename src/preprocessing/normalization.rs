//! Нормализация данных

use std::fmt;
use std::str::FromStr;

use ndarray::{Array1, Axis};

use super::selection::{require_numeric, select_columns};
use super::statistics::percentile;
use crate::dataset::{Dataset, Value};
use crate::error::{PrepError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NormalizeMethod {
    MinMax,
    Standard,
    Robust,
}

impl NormalizeMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            NormalizeMethod::MinMax => "minmax",
            NormalizeMethod::Standard => "standard",
            NormalizeMethod::Robust => "robust",
        }
    }
}

impl FromStr for NormalizeMethod {
    type Err = PrepError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "minmax" => Ok(NormalizeMethod::MinMax),
            "standard" => Ok(NormalizeMethod::Standard),
            "robust" => Ok(NormalizeMethod::Robust),
            _ => Err(PrepError::InvalidMethod {
                operation: "normalization",
                method: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for NormalizeMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Масштабирование одной колонки: (x - center) / scale.
/// Центр и масштаб хранятся поделенными на 2, так что `max - min`
/// не переполняется на конечных данных.
/// `half_scale == None` - вырожденная колонка, все значения переходят в 0.
#[derive(Debug, Clone)]
pub struct ColumnScaler {
    half_center: f64,
    half_scale: Option<f64>,
}

impl ColumnScaler {
    /// Параметры считаются только по непропущенным значениям
    pub fn fit(method: NormalizeMethod, x: &Array1<f64>) -> Self {
        if x.is_empty() {
            return Self::degenerate();
        }

        let min = x.fold(f64::INFINITY, |acc, &v| acc.min(v));
        let max = x.fold(f64::NEG_INFINITY, |acc, &v| acc.max(v));
        if min == max {
            return Self::degenerate();
        }

        match method {
            NormalizeMethod::MinMax => Self::halved(min / 2.0, max / 2.0 - min / 2.0),
            NormalizeMethod::Standard => {
                // Выборочное стандартное отклонение (ddof = 1)
                if x.len() < 2 {
                    return Self::degenerate();
                }
                let half = x.mapv(|v| v / 2.0);
                let mean = half.mean().unwrap_or(0.0);
                let std = half.std_axis(Axis(0), 1.0)[()];
                Self::halved(mean, std)
            }
            NormalizeMethod::Robust => {
                let values = x.to_vec();
                let q25 = percentile(&values, 0.25).unwrap_or(0.0);
                let median = percentile(&values, 0.5).unwrap_or(0.0);
                let q75 = percentile(&values, 0.75).unwrap_or(0.0);
                Self::halved(median / 2.0, q75 / 2.0 - q25 / 2.0)
            }
        }
    }

    fn degenerate() -> Self {
        Self {
            half_center: 0.0,
            half_scale: None,
        }
    }

    fn halved(half_center: f64, half_scale: f64) -> Self {
        if half_scale == 0.0 || !half_scale.is_finite() {
            return Self::degenerate();
        }
        Self {
            half_center,
            half_scale: Some(half_scale),
        }
    }

    pub fn transform_value(&self, x: f64) -> f64 {
        match self.half_scale {
            Some(half_scale) => (x / 2.0 - self.half_center) / half_scale,
            None => 0.0,
        }
    }

    /// Пропуски остаются пропусками
    pub fn transform(&self, values: &[Value]) -> Vec<Value> {
        values
            .iter()
            .map(|v| match v {
                Value::Number(x) => Value::number(self.transform_value(*x)),
                other => other.clone(),
            })
            .collect()
    }
}

/// Каждая колонка масштабируется независимо от остальных
pub fn normalize(dataset: &Dataset, columns: &[String], method: NormalizeMethod) -> Result<Dataset> {
    let names = select_columns(dataset, columns)?;
    require_numeric(dataset, &names)?;

    let mut out = dataset.clone();
    for name in &names {
        if let Some(column) = out.column_mut(name) {
            let present = Array1::from(column.present_numbers());
            let scaler = ColumnScaler::fit(method, &present);
            column.values = scaler.transform(&column.values);
        }
    }

    Ok(out)
}
