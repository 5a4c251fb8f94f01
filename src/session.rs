//! Сессия: одна загруженная таблица (оригинал + рабочая копия)

use crate::dataset::{codec, Dataset, Format};
use crate::error::{PrepError, Result};
use crate::preprocessing::{self, statistics, EncodeMethod, ImputeMethod, NormalizeMethod};
use crate::types::{
    ColumnStatistics, EncodeSummary, Export, ImputeSummary, LoadSummary, NormalizeSummary, Preview,
    ShapeSummary,
};

pub const DEFAULT_SAMPLE_ROWS: usize = 5;
pub const DEFAULT_PREVIEW_ROWS: usize = 10;

#[derive(Debug, Clone)]
struct Loaded {
    filename: Option<String>,
    original: Dataset,
    working: Dataset,
}

#[derive(Debug, Clone)]
enum State {
    Empty,
    Loaded(Loaded),
}

/// Все преобразования сначала строят новую таблицу и только потом
/// заменяют рабочую копию, поэтому ошибка ничего не меняет.
#[derive(Debug, Clone)]
pub struct Session {
    state: State,
    sample_rows: usize,
    preview_rows: usize,
}

impl Session {
    pub fn new() -> Self {
        Self::with_limits(DEFAULT_SAMPLE_ROWS, DEFAULT_PREVIEW_ROWS)
    }

    pub fn with_limits(sample_rows: usize, preview_rows: usize) -> Self {
        Self {
            state: State::Empty,
            sample_rows,
            preview_rows,
        }
    }

    pub fn is_loaded(&self) -> bool {
        matches!(self.state, State::Loaded(_))
    }

    pub fn original(&self) -> Result<&Dataset> {
        self.loaded().map(|l| &l.original)
    }

    pub fn working(&self) -> Result<&Dataset> {
        self.loaded().map(|l| &l.working)
    }

    fn loaded(&self) -> Result<&Loaded> {
        match &self.state {
            State::Loaded(loaded) => Ok(loaded),
            State::Empty => Err(PrepError::NoDatasetLoaded),
        }
    }

    fn loaded_mut(&mut self) -> Result<&mut Loaded> {
        match &mut self.state {
            State::Loaded(loaded) => Ok(loaded),
            State::Empty => Err(PrepError::NoDatasetLoaded),
        }
    }

    /// Разбирает байты и заменяет текущую таблицу целиком.
    /// При ошибке предыдущая таблица остается на месте.
    pub fn load(&mut self, bytes: &[u8], format: &str) -> Result<LoadSummary> {
        let format = Format::from_hint(format)?;
        let dataset = codec::decode(bytes, format)?;
        Ok(self.install(None, dataset))
    }

    /// Формат определяется по расширению, имя файла сохраняется для выгрузки
    pub fn load_file(&mut self, filename: &str, bytes: &[u8]) -> Result<LoadSummary> {
        let format = Format::from_file_name(filename)?;
        let dataset = codec::decode(bytes, format)?;
        Ok(self.install(Some(filename.to_string()), dataset))
    }

    fn install(&mut self, filename: Option<String>, dataset: Dataset) -> LoadSummary {
        let summary = LoadSummary {
            filename: filename.clone(),
            columns: dataset.descriptors(),
            rows: dataset.row_count(),
            missing_values: dataset.missing_counts(),
            sample_data: dataset.head(self.sample_rows),
        };

        tracing::info!(
            "Dataset loaded: {} columns, {} rows",
            summary.columns.len(),
            summary.rows
        );

        self.state = State::Loaded(Loaded {
            filename,
            original: dataset.clone(),
            working: dataset,
        });
        summary
    }

    pub fn impute(&mut self, columns: &[String], method: ImputeMethod) -> Result<ImputeSummary> {
        let loaded = self.loaded_mut()?;
        loaded.working = preprocessing::impute(&loaded.working, columns, method)?;

        tracing::info!("Imputed {} column(s) using {}", columns.len(), method);
        Ok(ImputeSummary {
            rows: loaded.working.row_count(),
            missing_values: loaded.working.missing_counts(),
        })
    }

    pub fn normalize(
        &mut self,
        columns: &[String],
        method: NormalizeMethod,
    ) -> Result<NormalizeSummary> {
        let sample_rows = self.sample_rows;
        let loaded = self.loaded_mut()?;
        loaded.working = preprocessing::normalize(&loaded.working, columns, method)?;

        tracing::info!("Normalized {} column(s) using {}", columns.len(), method);
        Ok(NormalizeSummary {
            sample_data: loaded.working.head_of(columns, sample_rows),
        })
    }

    pub fn encode(&mut self, columns: &[String], method: EncodeMethod) -> Result<EncodeSummary> {
        let sample_rows = self.sample_rows;
        let loaded = self.loaded_mut()?;
        loaded.working = preprocessing::encode(&loaded.working, columns, method)?;

        tracing::info!("Encoded {} column(s) using {}", columns.len(), method);
        Ok(EncodeSummary {
            new_columns: loaded.working.column_names(),
            sample_data: loaded.working.head(sample_rows),
        })
    }

    pub fn drop_columns(&mut self, columns: &[String]) -> Result<ShapeSummary> {
        let loaded = self.loaded_mut()?;
        loaded.working = preprocessing::drop_columns(&loaded.working, columns)?;

        tracing::info!("Dropped {} column(s)", columns.len());
        Ok(shape(&loaded.working))
    }

    pub fn reset(&mut self) -> Result<ShapeSummary> {
        let loaded = self.loaded_mut()?;
        loaded.working = loaded.original.clone();

        tracing::info!("Preprocessing reset to original data");
        Ok(shape(&loaded.working))
    }

    pub fn preview(&self) -> Result<Preview> {
        let working = self.working()?;
        Ok(Preview {
            columns: working.column_names(),
            rows: working.row_count(),
            sample_data: working.head(self.preview_rows),
            missing_values: working.missing_counts(),
        })
    }

    pub fn statistics(&self, column: &str) -> Result<ColumnStatistics> {
        statistics::column_statistics(self.working()?, column, self.sample_rows)
    }

    /// Рабочая таблица в CSV с именем `preprocessed_<исходное имя>`
    pub fn export_csv(&self) -> Result<Export> {
        let loaded = self.loaded()?;
        let source = loaded.filename.as_deref().unwrap_or("dataset.csv");
        Ok(Export {
            filename: format!("preprocessed_{}", source),
            content: codec::encode_csv(&loaded.working)?,
        })
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

fn shape(dataset: &Dataset) -> ShapeSummary {
    ShapeSummary {
        columns: dataset.column_names(),
        rows: dataset.row_count(),
    }
}
