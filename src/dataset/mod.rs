/// Табличная модель данных и форматы файлов

pub mod codec;
pub mod table;
pub mod value;

pub use codec::Format;
pub use table::{Column, ColumnDescriptor, Dataset, Record};
pub use value::{Category, ColumnKind, Value};
