/// HTTP API поверх сессии

use std::sync::Arc;

use axum::{
    extract::{
        multipart::MultipartRejection,
        rejection::JsonRejection,
        DefaultBodyLimit, Multipart, State,
    },
    http::{Method, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use tokio::sync::Mutex;
use tower_http::cors::{Any, CorsLayer};

use crate::config::Config;
use crate::error::PrepError;
use crate::preprocessing::{EncodeMethod, ImputeMethod, NormalizeMethod};
use crate::session::Session;
use crate::types::{
    ColumnStatistics, Download, DropColumnsRequest, EncodeSummary, ImputeSummary, LoadSummary,
    NormalizeSummary, Outcome, Preview, ShapeSummary, StatisticsRequest, TransformRequest,
};

/// Одна сессия на процесс, доступ только под мьютексом
#[derive(Clone)]
pub struct AppState {
    pub session: Arc<Mutex<Session>>,
}

impl AppState {
    pub fn new(config: &Config) -> Self {
        Self {
            session: Arc::new(Mutex::new(Session::with_limits(
                config.sample_rows,
                config.preview_rows,
            ))),
        }
    }
}

#[derive(Debug)]
pub enum ApiError {
    Prep(PrepError),
    BadRequest(String),
    /// Тело запроса не разобрано экстрактором axum
    Rejected { status: StatusCode, message: String },
}

impl From<PrepError> for ApiError {
    fn from(err: PrepError) -> Self {
        ApiError::Prep(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::Rejected {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

impl From<MultipartRejection> for ApiError {
    fn from(rejection: MultipartRejection) -> Self {
        ApiError::Rejected {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, kind, message) = match self {
            ApiError::Prep(err) => {
                let status = match err {
                    PrepError::NoDatasetLoaded | PrepError::UnknownColumn(_) => StatusCode::NOT_FOUND,
                    PrepError::NameCollision(_) => StatusCode::CONFLICT,
                    PrepError::UnsupportedFormat(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
                    PrepError::ParseError(_) => StatusCode::UNPROCESSABLE_ENTITY,
                    PrepError::NonNumericColumn(_)
                    | PrepError::InvalidMethod { .. }
                    | PrepError::NoColumnsSelected => StatusCode::BAD_REQUEST,
                };
                (status, err.kind(), err.to_string())
            }
            ApiError::BadRequest(message) => (StatusCode::BAD_REQUEST, "bad_request", message),
            ApiError::Rejected { status, message } => (status, "invalid_request", message),
        };

        tracing::warn!("Request failed ({}): {}", kind, message);
        (
            status,
            Json(serde_json::json!({ "error": kind, "message": message })),
        )
            .into_response()
    }
}

type ApiResult<T> = Result<Json<Outcome<T>>, ApiError>;

pub fn router(state: AppState, max_upload_bytes: usize) -> Router {
    // CORS
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any);

    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/api/upload", post(upload))
        .route("/api/preprocess/handle-missing", post(handle_missing))
        .route("/api/preprocess/normalize", post(normalize))
        .route("/api/preprocess/encode-categorical", post(encode_categorical))
        .route("/api/preprocess/drop-columns", post(drop_columns))
        .route("/api/preprocess/reset", post(reset))
        .route("/api/data/preview", get(preview))
        .route("/api/data/download", get(download))
        .route("/api/statistics", post(statistics))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(cors)
        .with_state(state)
}

async fn root() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "message": "Tabular preprocessing API",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

async fn upload(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> ApiResult<LoadSummary> {
    let mut multipart = multipart?;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(e.body_text()))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let filename = field.file_name().unwrap_or_default().to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| ApiError::BadRequest(e.body_text()))?;
        tracing::info!("Upload request: '{}', {} bytes", filename, bytes.len());

        let mut session = state.session.lock().await;
        let summary = session.load_file(&filename, &bytes)?;
        return Ok(Json(Outcome::new(
            format!("Successfully uploaded {}", filename),
            summary,
        )));
    }

    Err(ApiError::BadRequest("multipart field 'file' is required".to_string()))
}

async fn handle_missing(
    State(state): State<AppState>,
    payload: Result<Json<TransformRequest>, JsonRejection>,
) -> ApiResult<ImputeSummary> {
    let Json(req) = payload?;
    tracing::info!("Handle missing request: {:?} via {}", req.columns, req.method);
    let method: ImputeMethod = req.method.parse()?;

    let mut session = state.session.lock().await;
    let summary = session.impute(&req.columns, method)?;
    Ok(Json(Outcome::new(
        format!(
            "Successfully handled missing values in {} column(s) using {} method.",
            req.columns.len(),
            method
        ),
        summary,
    )))
}

async fn normalize(
    State(state): State<AppState>,
    payload: Result<Json<TransformRequest>, JsonRejection>,
) -> ApiResult<NormalizeSummary> {
    let Json(req) = payload?;
    tracing::info!("Normalize request: {:?} via {}", req.columns, req.method);
    let method: NormalizeMethod = req.method.parse()?;

    let mut session = state.session.lock().await;
    let summary = session.normalize(&req.columns, method)?;
    Ok(Json(Outcome::new(
        format!(
            "Successfully normalized {} column(s) using {} method.",
            req.columns.len(),
            method
        ),
        summary,
    )))
}

async fn encode_categorical(
    State(state): State<AppState>,
    payload: Result<Json<TransformRequest>, JsonRejection>,
) -> ApiResult<EncodeSummary> {
    let Json(req) = payload?;
    tracing::info!("Encode request: {:?} via {}", req.columns, req.method);
    let method: EncodeMethod = req.method.parse()?;

    let mut session = state.session.lock().await;
    let summary = session.encode(&req.columns, method)?;
    Ok(Json(Outcome::new(
        format!(
            "Successfully encoded {} column(s) using {} method.",
            req.columns.len(),
            method
        ),
        summary,
    )))
}

async fn drop_columns(
    State(state): State<AppState>,
    payload: Result<Json<DropColumnsRequest>, JsonRejection>,
) -> ApiResult<ShapeSummary> {
    let Json(req) = payload?;
    tracing::info!("Drop columns request: {:?}", req.columns);

    let mut session = state.session.lock().await;
    let summary = session.drop_columns(&req.columns)?;
    Ok(Json(Outcome::new(
        format!("Successfully dropped {} column(s).", req.columns.len()),
        summary,
    )))
}

async fn reset(State(state): State<AppState>) -> ApiResult<ShapeSummary> {
    let mut session = state.session.lock().await;
    let summary = session.reset()?;
    Ok(Json(Outcome::new(
        "Preprocessing has been reset to original data.",
        summary,
    )))
}

async fn preview(State(state): State<AppState>) -> ApiResult<Preview> {
    let session = state.session.lock().await;
    let preview = session.preview()?;
    Ok(Json(Outcome::new(
        format!("{} rows, {} columns", preview.rows, preview.columns.len()),
        preview,
    )))
}

async fn download(State(state): State<AppState>) -> ApiResult<Download> {
    let session = state.session.lock().await;
    let export = session.export_csv()?;
    Ok(Json(Outcome::new(
        "Preprocessed data is ready for download.",
        Download {
            filename: export.filename,
            content: STANDARD.encode(export.content),
        },
    )))
}

async fn statistics(
    State(state): State<AppState>,
    payload: Result<Json<StatisticsRequest>, JsonRejection>,
) -> ApiResult<ColumnStatistics> {
    let Json(req) = payload?;
    tracing::info!("Statistics request: {}", req.column);

    let session = state.session.lock().await;
    let stats = session.statistics(&req.column)?;
    Ok(Json(Outcome::new(
        format!("Statistics for column '{}'.", req.column),
        stats,
    )))
}
