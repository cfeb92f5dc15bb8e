use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;

use crate::error::ServerError;

use super::AppState;
use super::schemas::{HealthResponse, MetricsResponse};

/// `GET /health` -- returns service status together with a metrics snapshot.
#[utoipa::path(
    get,
    path = "/health",
    tag = "Health",
    summary = "Health check",
    description = "Returns service status and a snapshot of file lifecycle metrics.",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse)
    )
)]
pub async fn health(State(state): State<AppState>) -> Result<impl IntoResponse, ServerError> {
    let snap = state.lifecycle.metrics().snapshot();
    let live_files = state.lifecycle.live_files().await?;

    let body = HealthResponse {
        status: "ok".into(),
        metrics: MetricsResponse {
            uploads: snap.uploads,
            downloads: snap.downloads,
            reaped_on_access: snap.reaped_on_access,
            swept: snap.swept,
            leaked_blobs: snap.leaked_blobs,
            live_files,
        },
    };

    Ok((StatusCode::OK, Json(body)))
}
