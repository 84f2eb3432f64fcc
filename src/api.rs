//! HTTP surface for the metrics collector.
//!
//! Exposes the bulk and per-container poll operations and maps the runtime
//! error taxonomy onto status codes: not found 404, timeout 408, anything
//! else 500.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};

use crate::metrics::{ContainerMetrics, MetricsCollector, MetricsReport};
use crate::runtime::{ContainerRuntime, RuntimeError};

impl IntoResponse for RuntimeError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            RuntimeError::NotFound => (StatusCode::NOT_FOUND, "Resource not found"),
            RuntimeError::Timeout => (
                StatusCode::REQUEST_TIMEOUT,
                "The server is overloaded. Try later.",
            ),
            RuntimeError::Unavailable(_) | RuntimeError::StreamInterrupted(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "The server encountered an internal error and was unable to complete your request.",
            ),
        };

        (status, Json(serde_json::json!({ "error": message }))).into_response()
    }
}

pub fn router<R: ContainerRuntime + 'static>(collector: Arc<MetricsCollector<R>>) -> Router {
    Router::new()
        .route("/docker-monitor/api/v1.0/metrics", get(all_metrics::<R>))
        .route(
            "/docker-monitor/api/v1.0/metrics/{name}",
            get(metrics_by_name::<R>),
        )
        .fallback(not_found)
        .with_state(collector)
}

/// Serves the metrics API until the listener fails.
pub async fn serve<R: ContainerRuntime + 'static>(
    addr: SocketAddr,
    collector: Arc<MetricsCollector<R>>,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let app = router(collector);

    log::info!("Starting metrics service on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app).await.map_err(|e| e.into())
}

async fn all_metrics<R: ContainerRuntime + 'static>(
    State(collector): State<Arc<MetricsCollector<R>>>,
) -> Result<Json<MetricsReport>, RuntimeError> {
    let report = collector
        .all_container_metrics()
        .await
        .inspect_err(|error| {
            log::error!("Bulk metrics poll failed: {}", error);
        })?;

    Ok(Json(report))
}

async fn metrics_by_name<R: ContainerRuntime + 'static>(
    State(collector): State<Arc<MetricsCollector<R>>>,
    Path(name): Path<String>,
) -> Result<Json<ContainerMetrics>, RuntimeError> {
    let metrics = collector
        .container_metrics(&name)
        .await
        .inspect_err(|error| {
            log::error!("Metrics poll for {} failed: {}", name, error);
        })?;

    Ok(Json(metrics))
}

/// Unmatched paths get the same fixed 404 body as a missing container.
async fn not_found() -> RuntimeError {
    RuntimeError::NotFound
}
