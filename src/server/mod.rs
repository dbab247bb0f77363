//! # Web 服务模块
//!
//! 提供产物的静态访问、健康检查、资源列表页和目录 API。
//! 外部链接统一带上反向代理前缀（见 `config::Settings::root_path`）。
//!
//! ## 依赖关系
//! - 被 `commands/serve.rs` 调用
//! - 使用 `axum` + `tokio`，`tower-http` 记录请求
//! - 子模块: state, router, handlers

pub mod handlers;
pub mod router;
pub mod state;

use crate::config::Settings;
use crate::error::{DockviewError, Result};
use state::AppState;

use std::net::SocketAddr;
use tracing::info;

/// 绑定地址并开始服务，直到进程退出
pub async fn run(settings: Settings, host: &str, port: u16) -> Result<()> {
    let addr: SocketAddr = format!("{}:{}", host, port)
        .parse()
        .map_err(|e| DockviewError::InvalidArgument(format!("bind address {}:{}: {}", host, port, e)))?;

    let root_path = settings.root_path();
    let assets_dir = settings.assets_dir.display().to_string();
    let app = router::build_router(AppState::new(settings)?);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| DockviewError::ServerError(format!("cannot bind {}: {}", addr, e)))?;

    info!("Serving assets from: {}", assets_dir);
    info!("Listening on http://{} (root path {})", addr, root_path);

    axum::serve(listener, app)
        .await
        .map_err(|e| DockviewError::ServerError(e.to_string()))
}
