use axum::Json;
use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use bytes::Bytes;

use filedrop_core::RetentionPeriod;

use crate::error::ServerError;

use super::AppState;
use super::schemas::{ErrorResponse, FileResponse, UploadResponse};

/// `POST /v1/upload` -- store a file from a multipart request.
///
/// Expects a `file` part (filename and content type taken from the part
/// headers) and an optional `duration` text part holding a retention key.
#[utoipa::path(
    post,
    path = "/v1/upload",
    tag = "Upload",
    summary = "Upload file",
    description = "Stores a file, assigns it an identifier and a retention period, and returns its download link.",
    request_body(content_type = "multipart/form-data", description = "`file` part plus optional `duration` key"),
    responses(
        (status = 200, description = "File stored", body = UploadResponse),
        (status = 400, description = "Missing file, invalid duration, or validation failure", body = ErrorResponse),
        (status = 429, description = "Upload rate limit exceeded", body = ErrorResponse),
        (status = 500, description = "Storage failure", body = ErrorResponse)
    )
)]
pub async fn upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, ServerError> {
    let mut file: Option<(String, Option<String>, Bytes)> = None;
    let mut retention = state.default_retention;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ServerError::Multipart(e.to_string()))?
    {
        match field.name() {
            Some("file") => {
                let name = field.file_name().unwrap_or_default().to_owned();
                let content_type = field.content_type().map(ToOwned::to_owned);
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| ServerError::Multipart(e.to_string()))?;
                file = Some((name, content_type, data));
            }
            Some("duration") => {
                let raw = field
                    .text()
                    .await
                    .map_err(|e| ServerError::Multipart(e.to_string()))?;
                if !raw.is_empty() {
                    retention = RetentionPeriod::from_key(&raw)
                        .ok_or(ServerError::InvalidDuration(raw))?;
                }
            }
            _ => {}
        }
    }

    let (original_name, mime_type, data) = file.ok_or(ServerError::MissingFile)?;

    let record = state
        .lifecycle
        .ingest(data, &original_name, mime_type, retention)
        .await?;

    Ok((
        StatusCode::OK,
        Json(UploadResponse {
            message: "File uploaded successfully".to_owned(),
            retention,
            file: FileResponse::from_record(&record, &state.external_url),
        }),
    ))
}
