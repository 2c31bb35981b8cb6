//! JSON endpoints.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::json;
use tracing::info;

use super::{render_blocking, PathQuery, SharedState};
use crate::files::{FileError, FilePreview, Listing};
use crate::render_document;

/// A [`FileError`] answered as `{"error": ...}` with its status.
pub struct ApiError(FileError);

impl From<FileError> for ApiError {
    fn from(err: FileError) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.0.status(), Json(json!({ "error": self.0.to_string() }))).into_response()
    }
}

#[derive(Serialize, Debug)]
pub struct RenderedFile {
    #[serde(flatten)]
    pub file: FilePreview,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub html: Option<String>,
}

pub async fn list(
    State(state): State<SharedState>,
    Query(query): Query<PathQuery>,
) -> Result<Json<Listing>, ApiError> {
    Ok(Json(state.files.list_dir(query.path()).await?))
}

pub async fn read(
    State(state): State<SharedState>,
    Query(query): Query<PathQuery>,
) -> Result<Json<FilePreview>, ApiError> {
    Ok(Json(state.files.read_file(query.path()).await?))
}

pub async fn render(
    State(state): State<SharedState>,
    Query(query): Query<PathQuery>,
) -> Result<Json<RenderedFile>, ApiError> {
    let file = state.files.read_file(query.path()).await?;
    let rendered = render_blocking(move || {
        let html = file
            .content
            .as_deref()
            .map(|content| render_document(content, &file.ext));
        RenderedFile { file, html }
    })
    .await?;
    Ok(Json(rendered))
}

pub async fn not_found(uri: axum::http::Uri) -> Response {
    info!("No route for {}", uri);
    (StatusCode::NOT_FOUND, Json(json!({ "error": "Not found" }))).into_response()
}
