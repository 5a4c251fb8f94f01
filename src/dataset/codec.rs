//! Чтение CSV / Excel в таблицу и выгрузка таблицы в CSV

use std::io::Cursor;

use calamine::{open_workbook_auto_from_rs, Data, Reader};
use csv::{ReaderBuilder, Trim, WriterBuilder};

use super::table::{Column, Dataset};
use super::value::Value;
use crate::error::{PrepError, Result};

/// Токены, которые читаются как пропуск
const MISSING_TOKENS: &[&str] = &[
    "", "NA", "N/A", "NaN", "nan", "-NaN", "null", "NULL", "None", "#N/A",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Csv,
    Excel,
}

impl Format {
    pub fn from_hint(hint: &str) -> Result<Self> {
        let normalized = hint.trim().trim_start_matches('.').to_ascii_lowercase();
        match normalized.as_str() {
            "csv" => Ok(Format::Csv),
            "xls" | "xlsx" => Ok(Format::Excel),
            _ => Err(PrepError::UnsupportedFormat(hint.to_string())),
        }
    }

    /// Формат по расширению имени файла
    pub fn from_file_name(file_name: &str) -> Result<Self> {
        let extension = file_name
            .rsplit_once('.')
            .map(|(_, ext)| ext)
            .unwrap_or("");
        Self::from_hint(extension)
    }
}

pub fn decode(bytes: &[u8], format: Format) -> Result<Dataset> {
    match format {
        Format::Csv => decode_csv(bytes),
        Format::Excel => decode_excel(bytes),
    }
}

pub fn decode_csv(bytes: &[u8]) -> Result<Dataset> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .trim(Trim::All)
        .from_reader(bytes);

    let headers: Vec<String> = reader
        .byte_headers()
        .map_err(|e| PrepError::ParseError(format!("failed to read CSV headers: {}", e)))?
        .iter()
        .map(|h| String::from_utf8_lossy(h).into_owned())
        .collect();

    let mut rows = Vec::new();
    for (index, record) in reader.byte_records().enumerate() {
        let record = record.map_err(|e| {
            PrepError::ParseError(format!("failed to parse CSV row {}: {}", index + 1, e))
        })?;
        rows.push(
            record
                .iter()
                .map(|field| String::from_utf8_lossy(field).into_owned())
                .collect(),
        );
    }

    build_dataset(headers, rows)
}

pub fn decode_excel(bytes: &[u8]) -> Result<Dataset> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes.to_vec()))
        .map_err(|e| PrepError::ParseError(format!("failed to open Excel file: {}", e)))?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| PrepError::ParseError("no worksheet found".to_string()))?
        .map_err(|e| PrepError::ParseError(format!("failed to read Excel range: {}", e)))?;

    let mut rows = range.rows().map(|row| row.iter().map(cell_to_string).collect::<Vec<_>>());
    let headers = rows
        .next()
        .ok_or_else(|| PrepError::ParseError("worksheet is empty".to_string()))?;

    build_dataset(headers, rows.collect())
}

fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty | Data::Error(_) => String::new(),
        Data::String(s) => s.trim().to_string(),
        Data::Float(f) => f.to_string(),
        Data::Int(i) => i.to_string(),
        Data::Bool(b) => b.to_string(),
        other => other.to_string(),
    }
}

/// Собирает таблицу из заголовка и строк сырых значений
fn build_dataset(headers: Vec<String>, rows: Vec<Vec<String>>) -> Result<Dataset> {
    if headers.is_empty() {
        return Err(PrepError::ParseError("no columns to parse from file".to_string()));
    }

    for (index, row) in rows.iter().enumerate() {
        if row.len() != headers.len() {
            return Err(PrepError::ParseError(format!(
                "row {} has {} fields, expected {}",
                index + 1,
                row.len(),
                headers.len()
            )));
        }
    }

    let columns = headers
        .into_iter()
        .enumerate()
        .map(|(idx, header)| {
            let name = if header.trim().is_empty() {
                format!("Unnamed: {}", idx)
            } else {
                header.trim().to_string()
            };
            let raw: Vec<&str> = rows.iter().map(|row| row[idx].as_str()).collect();
            Column::new(name, type_cells(&raw))
        })
        .collect();

    Dataset::new(columns)
}

fn is_missing_token(cell: &str) -> bool {
    MISSING_TOKENS.contains(&cell)
}

/// Только конечные числа: `inf` и `infinity` числом не считаются
fn parse_number(cell: &str) -> Option<f64> {
    cell.parse::<f64>().ok().filter(|x| x.is_finite())
}

fn parse_bool(cell: &str) -> Option<bool> {
    if cell.eq_ignore_ascii_case("true") {
        Some(true)
    } else if cell.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

/// Тип колонки выбирается целиком: числа, затем логические, иначе строки
fn type_cells(raw: &[&str]) -> Vec<Value> {
    let cells: Vec<&str> = raw.iter().map(|c| c.trim()).collect();
    let present = || cells.iter().filter(|c| !is_missing_token(c));

    if present().all(|c| parse_number(c).is_some()) {
        return cells
            .iter()
            .map(|c| match parse_number(c) {
                Some(x) if !is_missing_token(c) => Value::number(x),
                _ => Value::Missing,
            })
            .collect();
    }

    if present().all(|c| parse_bool(c).is_some()) {
        return cells
            .iter()
            .map(|c| parse_bool(c).map(Value::Bool).unwrap_or(Value::Missing))
            .collect();
    }

    cells
        .iter()
        .map(|c| {
            if is_missing_token(c) {
                Value::Missing
            } else {
                Value::text(*c)
            }
        })
        .collect()
}

/// Таблица в CSV: пропуски пустые, целые числа без дробной части
pub fn encode_csv(dataset: &Dataset) -> Result<Vec<u8>> {
    let mut writer = WriterBuilder::new().from_writer(Vec::new());
    let write_err = |e: csv::Error| PrepError::ParseError(format!("failed to write CSV: {}", e));

    writer.write_record(dataset.column_names()).map_err(write_err)?;
    for row in 0..dataset.row_count() {
        let record: Vec<String> = dataset
            .columns()
            .iter()
            .map(|c| c.values[row].to_string())
            .collect();
        writer.write_record(&record).map_err(write_err)?;
    }

    writer
        .into_inner()
        .map_err(|e| PrepError::ParseError(format!("failed to write CSV: {}", e.error())))
}
