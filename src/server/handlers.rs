//! # HTTP handlers
//!
//! - `GET /`                 健康检查
//! - `GET /assets/{filename}` 返回产物原始内容，不存在时 404
//! - `GET /dashboard`        资源列表 + SMILES 选择页面
//! - `GET /api/catalog`      目录 JSON
//! - `GET /select`           按标识符 303 跳转到产物
//!
//! ## 依赖关系
//! - 被 `server/router.rs` 使用
//! - 使用 `server/state.rs`, `scene/export.rs`（HTML 转义）

use crate::config::DEMO_ARTIFACT;
use crate::scene::export::escape_html;
use crate::server::state::{AppState, CatalogSnapshot, SharedState};

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Redirect, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

const NOT_FOUND_HTML: &str = "<h1>File Not Found</h1>";

/// 健康检查
pub async fn health(State(state): State<SharedState>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "message": format!("dockview is running on {}", state.settings.root_path())
    }))
}

/// 返回资源目录中的单个产物
pub async fn serve_asset(
    State(state): State<SharedState>,
    Path(filename): Path<String>,
) -> Response {
    if !is_safe_filename(&filename) {
        return not_found();
    }

    let path = state.settings.assets_dir.join(&filename);
    let is_file = tokio::fs::metadata(&path)
        .await
        .map(|m| m.is_file())
        .unwrap_or(false);
    if !is_file {
        debug!("Asset not found: {}", filename);
        return not_found();
    }

    match tokio::fs::read(&path).await {
        Ok(bytes) => {
            let mime = mime_guess::from_path(&filename).first_or_octet_stream();
            ([(header::CONTENT_TYPE, mime.to_string())], bytes).into_response()
        }
        Err(e) => {
            // 检查与读取之间文件被删除
            debug!("Asset {} vanished: {}", filename, e);
            not_found()
        }
    }
}

/// 目录条目
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct CatalogEntryView {
    pub identifier: String,
    pub filename: String,
    pub url: String,
}

/// 目录 JSON
pub async fn api_catalog(State(state): State<SharedState>) -> Response {
    let snapshot = match load_snapshot(&state).await {
        Ok(s) => s,
        Err(resp) => return resp,
    };

    let entries: Vec<CatalogEntryView> = snapshot
        .entries
        .into_iter()
        .map(|(identifier, filename)| CatalogEntryView {
            url: state.links.resolve(&filename),
            identifier,
            filename,
        })
        .collect();

    Json(entries).into_response()
}

#[derive(Debug, Deserialize)]
pub struct SelectParams {
    pub identifier: String,
}

/// 按标识符跳转
pub async fn select(
    State(state): State<SharedState>,
    Query(params): Query<SelectParams>,
) -> Response {
    let identifier = params.identifier.trim().to_string();
    let found = match blocking(&state, move |s| s.lookup(&identifier)).await {
        Ok(found) => found,
        Err(resp) => return resp,
    };

    match found {
        Some(filename) => Redirect::to(&state.links.resolve(&filename)).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Html(format!(
                "<h1>No entry for {}</h1>",
                escape_html(&params.identifier)
            )),
        )
            .into_response(),
    }
}

/// 资源列表页面
pub async fn dashboard(State(state): State<SharedState>) -> Response {
    match load_snapshot(&state).await {
        Ok(snapshot) => Html(render_dashboard(&state, &snapshot)).into_response(),
        Err(resp) => resp,
    }
}

fn render_dashboard(state: &SharedState, snapshot: &CatalogSnapshot) -> String {
    let mut buttons = String::new();

    if snapshot.assets.iter().any(|a| a == DEMO_ARTIFACT) {
        buttons.push_str(&asset_button(
            &state.links.resolve(DEMO_ARTIFACT),
            "Open NGLView Demo",
        ));
    }
    for name in snapshot.assets.iter().filter(|a| *a != DEMO_ARTIFACT) {
        buttons.push_str(&asset_button(
            &state.links.resolve(name),
            &format!("Open {}", name),
        ));
    }
    if buttons.is_empty() {
        buttons.push_str("<p class=\"muted\">No assets yet.</p>\n");
    }

    let selector = if snapshot.entries.is_empty() {
        "<p class=\"muted\">No entries available.</p>\n".to_string()
    } else {
        let options: String = snapshot
            .entries
            .iter()
            .map(|(id, _)| {
                let selected = if snapshot.default_selection.as_ref() == Some(id) {
                    " selected"
                } else {
                    ""
                };
                format!(
                    "<option value=\"{0}\"{1}>{0}</option>\n",
                    escape_html(id),
                    selected
                )
            })
            .collect();
        format!(
            "<form method=\"get\" action=\"{}/select\" target=\"_blank\">\n\
             <select name=\"identifier\">\n{}</select>\n\
             <button type=\"submit\">Open</button>\n</form>\n",
            state.settings.root_path(),
            options
        )
    };

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="UTF-8">
<title>Assets</title>
<style>
body {{ font-family: sans-serif; margin: 2rem; }}
.card {{ border: 1px solid #ddd; border-radius: 6px; padding: 1rem; margin-bottom: 1rem; }}
.asset {{ display: inline-block; margin: 4px; padding: 6px 12px; border: 1px solid #1976d2; border-radius: 4px; color: #1976d2; text-decoration: none; }}
.muted {{ color: #888; }}
</style>
</head>
<body>
<div class="card">
<h2>Assets</h2>
<p class="muted">Click on a file to open it</p>
{}</div>
<div class="card">
<h2>Structures</h2>
{}</div>
</body>
</html>
"#,
        buttons, selector
    )
}

fn asset_button(url: &str, label: &str) -> String {
    format!(
        "<a class=\"asset\" href=\"{}\" target=\"_blank\">{}</a>\n",
        escape_html(url),
        escape_html(label)
    )
}

async fn load_snapshot(state: &SharedState) -> Result<CatalogSnapshot, Response> {
    blocking(state, |s| s.snapshot()).await
}

/// 在阻塞线程中访问目录（扫描会读文件）
async fn blocking<T, F>(state: &SharedState, f: F) -> Result<T, Response>
where
    T: Send + 'static,
    F: FnOnce(&AppState) -> crate::error::Result<T> + Send + 'static,
{
    let state = state.clone();
    let result = tokio::task::spawn_blocking(move || f(state.as_ref())).await;

    match result {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(e)) => {
            error!("Catalog refresh failed: {}", e);
            Err((StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response())
        }
        Err(e) => {
            error!("Catalog task failed: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR.into_response())
        }
    }
}

/// 拒绝路径分隔符和上级目录
fn is_safe_filename(name: &str) -> bool {
    !name.is_empty()
        && !name.contains('/')
        && !name.contains('\\')
        && name != "."
        && name != ".."
}

fn not_found() -> Response {
    (StatusCode::NOT_FOUND, Html(NOT_FOUND_HTML)).into_response()
}
