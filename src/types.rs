/// Типы запросов и ответов

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::dataset::{ColumnDescriptor, Record, Value};

#[derive(Debug, Clone, Serialize)]
pub struct LoadSummary {
    pub filename: Option<String>,
    pub columns: Vec<ColumnDescriptor>,
    pub rows: usize,
    pub missing_values: BTreeMap<String, usize>,
    pub sample_data: Vec<Record>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ImputeSummary {
    pub rows: usize,
    pub missing_values: BTreeMap<String, usize>,
}

#[derive(Debug, Clone, Serialize)]
pub struct NormalizeSummary {
    pub sample_data: Vec<Record>,
}

#[derive(Debug, Clone, Serialize)]
pub struct EncodeSummary {
    pub new_columns: Vec<String>,
    pub sample_data: Vec<Record>,
}

/// Ответ на удаление колонок и сброс
#[derive(Debug, Clone, Serialize)]
pub struct ShapeSummary {
    pub columns: Vec<String>,
    pub rows: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct Preview {
    pub columns: Vec<String>,
    pub rows: usize,
    pub sample_data: Vec<Record>,
    pub missing_values: BTreeMap<String, usize>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ColumnStatistics {
    pub column: String,
    pub mean: Option<f64>,
    pub median: Option<f64>,
    pub mode: Vec<f64>,
    pub sample_data: Vec<Value>,
}

/// Выгрузка рабочей таблицы
#[derive(Debug, Clone)]
pub struct Export {
    pub filename: String,
    pub content: Vec<u8>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Download {
    pub filename: String,
    pub content: String, // base64 CSV
}

#[derive(Debug, Clone, Deserialize)]
pub struct TransformRequest {
    pub columns: Vec<String>,
    pub method: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DropColumnsRequest {
    pub columns: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StatisticsRequest {
    pub column: String,
}

/// Успешный ответ API: флаг, сообщение и поля результата
#[derive(Debug, Clone, Serialize)]
pub struct Outcome<T> {
    pub success: bool,
    pub message: String,
    #[serde(flatten)]
    pub data: T,
}

impl<T> Outcome<T> {
    pub fn new(message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            message: message.into(),
            data,
        }
    }
}
