//! # 路由
//!
//! 将 URL 路径映射到 handler。
//!
//! ## 依赖关系
//! - 被 `server/mod.rs` 使用
//! - 使用 `server/handlers.rs`, `server/state.rs`

use crate::server::handlers::{api_catalog, dashboard, health, select, serve_asset};
use crate::server::state::{AppState, SharedState};

use axum::{routing::get, Router};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// 构建完整的 axum 路由
pub fn build_router(state: AppState) -> Router {
    let shared: SharedState = Arc::new(state);

    Router::new()
        .route("/", get(health))
        .route("/dashboard", get(dashboard))
        .route("/select", get(select))
        .route("/assets/{filename}", get(serve_asset))
        .route("/api/catalog", get(api_catalog))
        .layer(TraceLayer::new_for_http())
        .with_state(shared)
}
