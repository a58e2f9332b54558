//! axum router and request handlers.
//!
//! Routes:
//! - `GET /?file=<bundle>`            - Build and serve a bundle
//! - `GET /jitpack.php?file=<bundle>` - Same, for existing page markup
//! - `GET /healthz`                   - Health check

use std::sync::Arc;

use axum::{
    body::Body,
    extract::{RawQuery, State},
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use tracing::{debug, error, instrument, warn};

use crate::adapters::{local_packer, LocalPacker};
use crate::config::JitpackConfig;
use crate::core::request::{file_param, resolve_job};
use crate::core::LessCompilerFactory;
use crate::http::http_date;
use crate::utils::error::PackError;

/// 所有 handler 共用的狀態
pub struct AppState {
    pub config: Arc<JitpackConfig>,
    pub packer: LocalPacker,
}

impl AppState {
    pub fn new(config: Arc<JitpackConfig>, less_factory: LessCompilerFactory) -> Self {
        let packer = local_packer(&config, less_factory);
        Self { config, packer }
    }
}

/// Build the axum [`Router`] with all routes and shared state.
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(handle_bundle))
        .route("/jitpack.php", get(handle_bundle))
        .route("/healthz", get(handle_health))
        .with_state(state)
}

/// `GET /?file=app.js`
#[instrument(skip_all, fields(file = tracing::field::Empty))]
async fn handle_bundle(
    State(state): State<Arc<AppState>>,
    RawQuery(query): RawQuery,
) -> Result<Response, AppError> {
    let file = query.as_deref().and_then(file_param);
    tracing::Span::current().record("file", file.as_deref().unwrap_or(""));
    let job = resolve_job(state.config.as_ref(), file.as_deref())?;
    let artifact = state.packer.run(&job).await?;

    let mut builder = Response::builder()
        .status(StatusCode::OK)
        .header(header::LAST_MODIFIED, http_date(artifact.modified));
    if let Some(content_type) = job.kind.content_type() {
        builder = builder.header(header::CONTENT_TYPE, HeaderValue::from_static(content_type));
    }

    builder
        .body(Body::from(artifact.body))
        .map_err(|e| AppError::Internal(e.to_string()))
}

/// `GET /healthz`
async fn handle_health() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

/// Handler 錯誤，一律回傳不帶內容的狀態碼
#[derive(Debug)]
pub enum AppError {
    Pack(PackError),
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::Pack(err) => {
                match err {
                    PackError::BundleNotFound { bundle } => debug!(%bundle, "bundle not defined"),
                    PackError::RequestMalformed => warn!("request without file parameter"),
                    other => error!(error = %other, "bundle request failed"),
                }
                StatusCode::from_u16(err.status_code())
                    .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
            }
            AppError::Internal(message) => {
                error!(error = %message, "internal server error");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        status.into_response()
    }
}

impl From<PackError> for AppError {
    fn from(err: PackError) -> Self {
        AppError::Pack(err)
    }
}
