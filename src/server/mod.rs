//! HTTP surface: a JSON API over the served root, the server-rendered
//! viewer and its embedded assets.

mod api;
mod assets;
mod pages;

use axum::{routing::get, Router};
use serde::Deserialize;
use std::{io, sync::Arc};
use tower_http::trace::TraceLayer;

use crate::files::{FileError, FileRoot};

// --- State ---
pub type SharedState = Arc<AppState>;

pub struct AppState {
    pub files: FileRoot,
}

// --- Request Payloads ---
#[derive(Deserialize, Debug, Default)]
pub struct PathQuery {
    pub path: Option<String>,
}

impl PathQuery {
    /// The requested path; absent means the root.
    pub fn path(&self) -> &str {
        self.path.as_deref().unwrap_or("")
    }
}

/// Runs markdown and highlighting work on the blocking pool so a large
/// document does not stall the async workers.
async fn render_blocking<T, F>(work: F) -> Result<T, FileError>
where
    T: Send + 'static,
    F: FnOnce() -> T + Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|e| FileError::Io(io::Error::other(e)))
}

/// Builds the application router over `files`.
pub fn router(files: FileRoot) -> Router {
    let shared_state = Arc::new(AppState { files });

    Router::new()
        .route("/", get(pages::index))
        .route("/browse", get(pages::browse))
        .route("/view", get(pages::view))
        .route("/assets/app.css", get(assets::stylesheet))
        .route("/assets/app.js", get(assets::script))
        .route("/api/list", get(api::list))
        .route("/api/read", get(api::read))
        .route("/api/render", get(api::render))
        .fallback(api::not_found)
        .layer(TraceLayer::new_for_http())
        .with_state(shared_state)
}
