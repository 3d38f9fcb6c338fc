//! Router construction and HTTP handlers for the gateway.

use std::sync::Arc;

use axum::extract::State;
use axum::response::{IntoResponse, Json};
use axum::routing::{get, post};
use axum::Router;
use http::header::{
    ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS, ACCESS_CONTROL_ALLOW_ORIGIN,
    ACCESS_CONTROL_MAX_AGE,
};
use http::{HeaderMap, HeaderValue, StatusCode};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use uuid::Uuid;

use crate::config::AppConfig;
use crate::error::ApiError;
use crate::models::{ChapterRequest, SummaryResponse};
use crate::services::llm::LlmClient;
use crate::services::provider::resolve;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub llm: LlmClient,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        AppState {
            config: Arc::new(config),
            llm: LlmClient::new(),
        }
    }
}

pub fn router(state: AppState) -> Router {
    let cors = cors_layer(&state.config.allowed_origins);

    Router::new()
        .route("/api/summarize", post(summarize).options(preflight))
        .route("/health", get(health_check))
        .with_state(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

/// Local front-end hosts plus any configured extra origins.
fn cors_layer(extra: &[String]) -> CorsLayer {
    let mut origins: Vec<HeaderValue> = vec![
        HeaderValue::from_static("http://localhost:8000"),
        HeaderValue::from_static("http://127.0.0.1:8000"),
    ];
    origins.extend(extra.iter().filter_map(|origin| origin.parse().ok()));

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(Any)
        .allow_headers(Any)
}

async fn summarize(
    State(state): State<AppState>,
    Json(req): Json<ChapterRequest>,
) -> Result<Json<SummaryResponse>, ApiError> {
    let request_id = Uuid::new_v4();
    info!(
        %request_id,
        provider = %state.config.provider,
        title = req.chapter_title.as_deref().unwrap_or("-"),
        content_chars = req.content.chars().count(),
        "收到章节总结请求"
    );

    if req.content.trim().is_empty() {
        warn!(%request_id, "章节内容为空，拒绝请求");
        return Err(ApiError::EmptyContent);
    }

    // Resolved per request on top of the immutable config; see
    // services::provider::resolve.
    let conn = resolve(&state.config)?;

    let summary = state
        .llm
        .summarize(
            &conn,
            req.chapter_title.as_deref(),
            &req.content,
            state.config.max_tokens,
            state.config.temperature,
        )
        .await
        .map_err(|err| {
            warn!(%request_id, error_type = err.error_type(), "发生错误: {err}");
            err
        })?;

    Ok(Json(SummaryResponse { summary }))
}

/// Browser preflight for /api/summarize.
async fn preflight() -> impl IntoResponse {
    let mut headers = HeaderMap::new();
    headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));
    headers.insert(
        ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static("POST, OPTIONS"),
    );
    headers.insert(
        ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static("Content-Type"),
    );
    headers.insert(ACCESS_CONTROL_MAX_AGE, HeaderValue::from_static("86400"));
    (StatusCode::OK, headers)
}

async fn health_check() -> &'static str {
    "OK"
}
