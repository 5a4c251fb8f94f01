/// Модуль предобработки данных

pub mod encoding;
pub mod imputation;
pub mod normalization;
pub mod selection;
pub mod statistics;

pub use encoding::{encode, EncodeMethod};
pub use imputation::{impute, ImputeMethod};
pub use normalization::{normalize, ColumnScaler, NormalizeMethod};
pub use selection::drop_columns;
