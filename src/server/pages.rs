//! Server-rendered viewer: the page shell and the fragments the client
//! script swaps into it.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::Local;
use humansize::{format_size, BINARY};
use maud::{html, Markup, PreEscaped, DOCTYPE};
use serde::Deserialize;

use super::{render_blocking, SharedState};
use crate::classify::{badge_color, display_extension, icon_for};
use crate::files::{DirEntryInfo, FileError};
use crate::{is_markdown, raw::render_raw, render_document};

const MERMAID_CDN: &str = "https://cdn.jsdelivr.net/npm/mermaid@11/dist/mermaid.min.js";

// --- Request Payloads ---
#[derive(Deserialize, Debug)]
pub struct IndexQuery {
    open: Option<String>,
}

#[derive(Deserialize, Debug)]
pub struct BrowseQuery {
    path: Option<String>,
    #[serde(default)]
    hidden: bool,
    filter: Option<String>,
}

#[derive(Deserialize, Debug)]
pub struct ViewQuery {
    path: Option<String>,
    #[serde(default)]
    source: bool,
}

// --- Handlers ---

/// The viewer page. `?open=P` asks the client to open `P` once loaded.
pub async fn index(Query(query): Query<IndexQuery>) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { "Doc Viewer" }
                link rel="stylesheet" href="/assets/app.css";
                script src="/assets/app.js" defer {}
                script src=(MERMAID_CDN) defer {}
            }
            body data-open=[query.open.as_deref()] {
                div.header {
                    div.header-left {
                        h1 { "Doc Viewer" }
                        span.path-badge #path-badge {}
                    }
                    div.header-right {
                        button.header-btn #btn-theme title="Toggle light/dark mode" { "Theme" }
                        button.header-btn #btn-source title="Toggle markdown source view" { "Source" }
                        button.header-btn #btn-hidden title="Show hidden files" { "Hidden" }
                        button.header-btn #btn-wrap title="Toggle word wrap" { "Wrap" }
                    }
                }
                div.main {
                    div.sidebar {
                        div.sidebar-header {
                            input #search-input type="text" placeholder="Filter files...";
                        }
                        div.file-tree #file-tree {}
                    }
                    div.content-area {
                        div.content-tabs #tab-bar {}
                        div.content-body #content-body {
                            (welcome())
                        }
                    }
                }
            }
        }
    }
}

/// Sidebar listing of one directory.
pub async fn browse(
    State(state): State<SharedState>,
    Query(query): Query<BrowseQuery>,
) -> Result<Markup, Response> {
    let listing = state
        .files
        .list_dir(query.path.as_deref().unwrap_or(""))
        .await
        .map_err(file_error_response)?;

    let needle = query.filter.as_deref().unwrap_or("").to_lowercase();
    let visible = listing
        .items
        .iter()
        .filter(|item| query.hidden || !item.hidden)
        .filter(|item| needle.is_empty() || item.name.to_lowercase().contains(&needle));

    Ok(html! {
        div.tree-list data-path=(listing.path) {
            @if let Some(parent) = &listing.parent {
                div.tree-item.parent-dir data-action="navigate" data-path=(parent) {
                    span.icon { (icon_for("..", true)) }
                    span.name { ".." }
                }
            }
            @for item in visible {
                @let is_dir = item.is_dir();
                @let ext = if is_dir { String::new() } else { display_extension(&item.name) };
                div.tree-item.dir-item[is_dir]
                    data-action=(if is_dir { "navigate" } else { "open" })
                    data-path=(item.path)
                    data-name=(item.name)
                    title=(entry_title(item)) {
                    span.icon { (icon_for(&item.name, is_dir)) }
                    span.name { (item.name) }
                    @if !ext.is_empty() {
                        @let color = badge_color(&ext);
                        span.badge style={ "color:" (color) ";border:1px solid " (color) } { (ext) }
                    }
                    @if let Some(size) = item.size {
                        span.size { (format_size(size, BINARY)) }
                    }
                }
            }
        }
    })
}

/// Content pane for one file.
pub async fn view(
    State(state): State<SharedState>,
    Query(query): Query<ViewQuery>,
) -> Result<Markup, Response> {
    let file = state
        .files
        .read_file(query.path.as_deref().unwrap_or(""))
        .await
        .map_err(file_error_response)?;

    let Some(content) = file.content else {
        return Ok(error_display(
            &file.name,
            file.error.as_deref().unwrap_or("Preview not available"),
        ));
    };

    let ext = file.ext;
    render_blocking(move || view_markup(&content, &ext, query.source))
        .await
        .map_err(file_error_response)
}

fn view_markup(content: &str, ext: &str, source: bool) -> Markup {
    let markdown = is_markdown(ext);
    html! {
        @if markdown && source {
            div.md-split {
                div.md-source-panel {
                    div.raw-view { (PreEscaped(render_raw(content, ext))) }
                }
                div.md-render-panel {
                    div.md-rendered { (PreEscaped(render_document(content, ext))) }
                }
            }
        } @else if markdown {
            div.md-rendered { (PreEscaped(render_document(content, ext))) }
        } @else {
            div.raw-view { (PreEscaped(render_document(content, ext))) }
        }
    }
}

// --- Utility Functions ---

fn welcome() -> Markup {
    html! {
        div.welcome {
            div.icon-large { (PreEscaped("&#128196;")) }
            h2 { "Doc Viewer" }
            p { "Click a file to view its contents" }
            div.keys {
                @for ext in [".md", ".js", ".ts", ".json", ".yaml", ".py", ".html", ".css"] {
                    kbd { (ext) }
                }
            }
        }
    }
}

fn error_display(title: &str, message: &str) -> Markup {
    html! {
        div.error-display {
            div.icon-large { (PreEscaped("&#128683;")) }
            h2 { (title) }
            p { (message) }
        }
    }
}

/// Helper to generate consistent error fragments.
fn error_response(status_code: StatusCode, message: &str) -> Response {
    (status_code, error_display("Error", message)).into_response()
}

fn file_error_response(err: FileError) -> Response {
    error_response(err.status(), &err.to_string())
}

/// Tooltip: the name plus the local modification time.
fn entry_title(item: &DirEntryInfo) -> String {
    match item.modified {
        Some(modified) => format!(
            "{} ({})",
            item.name,
            modified.with_timezone(&Local).format("%Y-%m-%d %H:%M")
        ),
        None => item.name.clone(),
    }
}
