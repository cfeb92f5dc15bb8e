use filedrop_core::RetentionPeriod;

use super::schemas::{
    ErrorResponse, FileResponse, HealthResponse, ListResponse, MetricsResponse,
    PaginationResponse, UploadResponse,
};

#[derive(utoipa::OpenApi)]
#[openapi(
    info(
        title = "Filedrop API",
        version = "0.1.0",
        description = "HTTP API for the filedrop upload service. Upload files with a retention period, list and inspect them, and download them until they expire.",
        license(name = "Apache-2.0")
    ),
    tags(
        (name = "Health", description = "Service health and metrics"),
        (name = "Upload", description = "File ingest"),
        (name = "Files", description = "Listing, metadata, and downloads")
    ),
    paths(
        super::health::health,
        super::upload::upload,
        super::files::list_files,
        super::files::describe_file,
        super::files::download_file,
    ),
    components(schemas(
        FileResponse, UploadResponse, ListResponse, PaginationResponse,
        HealthResponse, MetricsResponse, ErrorResponse,
        RetentionPeriod,
    ))
)]
pub struct ApiDoc;
