use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::{StatusCode, header};
use axum::response::IntoResponse;

use crate::error::ServerError;

use super::AppState;
use super::schemas::{ErrorResponse, FileResponse, ListQuery, ListResponse, PaginationResponse};

/// Largest page size the listing endpoint serves.
const MAX_PAGE_LIMIT: u64 = 100;

/// `GET /v1/files` -- list non-expired files, newest first.
#[utoipa::path(
    get,
    path = "/v1/files",
    tag = "Files",
    summary = "List files",
    description = "Returns one page of non-expired files together with pagination totals.",
    params(ListQuery),
    responses(
        (status = 200, description = "One page of files", body = ListResponse)
    )
)]
pub async fn list_files(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<impl IntoResponse, ServerError> {
    // Clamping is this layer's job; the lifecycle core trusts its inputs.
    let page = query.page.unwrap_or(1).max(1);
    let limit = query.limit.unwrap_or(10).clamp(1, MAX_PAGE_LIMIT);

    let (records, pagination) = state.lifecycle.list(page, limit).await?;

    Ok((
        StatusCode::OK,
        Json(ListResponse {
            files: records
                .iter()
                .map(|record| FileResponse::from_record(record, &state.external_url))
                .collect(),
            pagination: PaginationResponse {
                page: pagination.page,
                limit: pagination.limit,
                total: pagination.total,
                total_pages: pagination.total_pages,
            },
        }),
    ))
}

/// `GET /v1/files/{id}` -- metadata for one file, without its bytes.
#[utoipa::path(
    get,
    path = "/v1/files/{id}",
    tag = "Files",
    summary = "Describe file",
    description = "Returns metadata for a stored file. Expired files are purged on access and reported as gone.",
    params(("id" = String, Path, description = "File identifier")),
    responses(
        (status = 200, description = "File metadata", body = FileResponse),
        (status = 404, description = "Unknown id or bytes missing on disk", body = ErrorResponse),
        (status = 410, description = "File expired", body = ErrorResponse)
    )
)]
pub async fn describe_file(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ServerError> {
    let record = state.lifecycle.describe(&id).await?;
    Ok((
        StatusCode::OK,
        Json(FileResponse::from_record(&record, &state.external_url)),
    ))
}

/// `GET /v1/download/{id}` -- the file's bytes as an attachment.
#[utoipa::path(
    get,
    path = "/v1/download/{id}",
    tag = "Files",
    summary = "Download file",
    description = "Streams the stored bytes with the original filename in the Content-Disposition header.",
    params(("id" = String, Path, description = "File identifier")),
    responses(
        (status = 200, description = "File bytes", content_type = "application/octet-stream"),
        (status = 404, description = "Unknown id or bytes missing on disk", body = ErrorResponse),
        (status = 410, description = "File expired", body = ErrorResponse)
    )
)]
pub async fn download_file(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ServerError> {
    let (record, data) = state.lifecycle.retrieve(&id).await?;

    let headers = [
        (header::CONTENT_TYPE, record.mime_type.clone()),
        (
            header::CONTENT_DISPOSITION,
            content_disposition(&record.original_name),
        ),
    ];

    Ok((StatusCode::OK, headers, data))
}

/// Build an attachment `Content-Disposition` value that is always a valid
/// header: quotes and backslashes in the filename are escaped, control
/// characters replaced.
fn content_disposition(original_name: &str) -> String {
    let mut safe = String::with_capacity(original_name.len());
    for ch in original_name.chars() {
        match ch {
            '"' | '\\' => {
                safe.push('\\');
                safe.push(ch);
            }
            c if c.is_control() => safe.push('_'),
            c => safe.push(c),
        }
    }
    format!("attachment; filename=\"{safe}\"")
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;

    use super::content_disposition;

    #[test]
    fn plain_names_pass_through() {
        assert_eq!(
            content_disposition("report 2024.pdf"),
            "attachment; filename=\"report 2024.pdf\""
        );
    }

    #[test]
    fn quotes_and_backslashes_are_escaped() {
        assert_eq!(
            content_disposition("say \"hi\".txt"),
            "attachment; filename=\"say \\\"hi\\\".txt\""
        );
        assert_eq!(
            content_disposition("back\\slash.txt"),
            "attachment; filename=\"back\\\\slash.txt\""
        );
    }

    #[test]
    fn control_characters_never_break_the_header() {
        let value = content_disposition("new\nline\t.txt");
        assert_eq!(value, "attachment; filename=\"new_line_.txt\"");
        assert!(HeaderValue::from_str(&value).is_ok());
    }
}
