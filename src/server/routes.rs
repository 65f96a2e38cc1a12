//! Route table and handlers.

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::extract::State;
use axum::http::{Request, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use tower_http::trace::TraceLayer;
use tracing::info;

use super::error::ApiError;
use super::extract::ValidatedJson;
use crate::pipeline::SentimentPipeline;
use crate::types::{ClassificationResult, Greeting, Review};

/// State shared by all handlers.
pub struct AppState {
    pub pipeline: SentimentPipeline,
}

impl AppState {
    pub fn new(pipeline: SentimentPipeline) -> Self {
        Self { pipeline }
    }
}

/// Build the service router.
///
/// - `GET /` — fixed greeting
/// - `POST /analyze` — `{"text": ...}` → `{"label": ..., "score": ...}`
pub fn build_router(state: Arc<AppState>) -> Router {
    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|req: &Request<Body>| {
            tracing::info_span!(
                "request",
                method = %req.method(),
                uri = %req.uri(),
                version = ?req.version(),
            )
        })
        .on_response(|res: &Response<Body>, latency: Duration, _span: &tracing::Span| {
            info!(
                latency = %format!("{} ms", latency.as_millis()),
                status = %res.status().as_u16(),
                "finished processing request"
            );
        });

    Router::new()
        .route("/", get(hello_world))
        .route("/analyze", post(analyze))
        .layer(trace_layer)
        .with_state(state)
}

/// GET / - Health check.
pub async fn hello_world() -> Json<Greeting> {
    Json(Greeting::default())
}

/// POST /analyze - Classify the sentiment of a review.
pub async fn analyze(
    State(state): State<Arc<AppState>>,
    ValidatedJson(review): ValidatedJson<Review>,
) -> Result<Json<ClassificationResult>, ApiError> {
    let result = state.pipeline.analyze(&review.text).await?;
    Ok(Json(result))
}
