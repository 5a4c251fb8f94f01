//! Ошибки предобработки

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PrepError {
    #[error("No file has been uploaded yet.")]
    NoDatasetLoaded,

    #[error("Column '{0}' not found in the dataset.")]
    UnknownColumn(String),

    #[error("Column '{0}' is not numeric.")]
    NonNumericColumn(String),

    #[error("Invalid {operation} method '{method}'.")]
    InvalidMethod {
        operation: &'static str,
        method: String,
    },

    #[error("Column '{0}' already exists in the dataset.")]
    NameCollision(String),

    #[error("Unsupported file format '{0}'. Please upload CSV or Excel files.")]
    UnsupportedFormat(String),

    #[error("Error processing file: {0}")]
    ParseError(String),

    #[error("No columns selected.")]
    NoColumnsSelected,
}

impl PrepError {
    /// Стабильное имя вида ошибки для API
    pub fn kind(&self) -> &'static str {
        match self {
            PrepError::NoDatasetLoaded => "no_dataset_loaded",
            PrepError::UnknownColumn(_) => "unknown_column",
            PrepError::NonNumericColumn(_) => "non_numeric_column",
            PrepError::InvalidMethod { .. } => "invalid_method",
            PrepError::NameCollision(_) => "name_collision",
            PrepError::UnsupportedFormat(_) => "unsupported_format",
            PrepError::ParseError(_) => "parse_error",
            PrepError::NoColumnsSelected => "no_columns_selected",
        }
    }
}

pub type Result<T> = std::result::Result<T, PrepError>;
