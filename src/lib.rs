//! tabprep - предобработка табличных данных в памяти

pub mod api;
pub mod config;
pub mod dataset;
pub mod error;
pub mod preprocessing;
pub mod session;
pub mod types;

pub use dataset::{ColumnKind, Dataset, Value};
pub use error::{PrepError, Result};
pub use preprocessing::{EncodeMethod, ImputeMethod, NormalizeMethod};
pub use session::Session;
