//! # 运行配置
//!
//! 资源目录、对外 URL 前缀、扫描后缀等设置，显式传入各组件。
//!
//! ## 依赖关系
//! - 由 `cli/` 参数构建
//! - 被 `catalog/`, `server/`, `commands/` 使用

use crate::error::{DockviewError, Result};
use std::fs;
use std::path::PathBuf;

/// 对外前缀的环境变量（JupyterHub 为每个用户会话设置）
pub const PREFIX_ENV: &str = "JUPYTERHUB_SERVICE_PREFIX";

/// 资源目录的环境变量
pub const ASSETS_DIR_ENV: &str = "DOCKVIEW_ASSETS_DIR";

/// 组合场景的固定产物名
pub const DEMO_ARTIFACT: &str = "nglview_demo.html";

/// 默认代理端口
pub const DEFAULT_PORT: u16 = 8000;

/// 运行配置
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// 产物读写目录
    pub assets_dir: PathBuf,
    /// 对外可见的 URL 前缀，缺省为空（服务位于根路径）
    pub base_prefix: String,
    /// 参与扫描的文件后缀
    pub artifact_extensions: Vec<String>,
    /// 标识符标记的 class 名
    pub marker_class: String,
    /// 代理转发端口，用于拼接 `{prefix}/proxy/{port}`
    pub proxy_port: u16,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            assets_dir: PathBuf::from("assets"),
            base_prefix: String::new(),
            artifact_extensions: vec![".html".to_string()],
            marker_class: "smiles-entry".to_string(),
            proxy_port: DEFAULT_PORT,
        }
    }
}

impl Settings {
    /// 设置扫描后缀（逗号分隔），自动补齐前导点
    pub fn with_extensions(mut self, extensions: &str) -> Self {
        let parsed = parse_extensions(extensions);
        if !parsed.is_empty() {
            self.artifact_extensions = parsed;
        }
        self
    }

    /// 反向代理下的根路径，如 `/user/alice/proxy/8000`
    pub fn root_path(&self) -> String {
        format!(
            "{}/proxy/{}",
            self.base_prefix.trim_end_matches('/'),
            self.proxy_port
        )
    }

    /// 产物的对外基础 URL，以 `/` 结尾
    pub fn assets_base_url(&self) -> String {
        format!("{}/assets/", self.root_path())
    }

    /// 确保资源目录存在
    pub fn ensure_assets_dir(&self) -> Result<()> {
        fs::create_dir_all(&self.assets_dir).map_err(|e| DockviewError::FileWriteError {
            path: self.assets_dir.display().to_string(),
            source: e,
        })
    }
}

/// ".html, htm" -> [".html", ".htm"]
pub fn parse_extensions(extensions: &str) -> Vec<String> {
    extensions
        .split(',')
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(|s| {
            if s.starts_with('.') {
                s.to_lowercase()
            } else {
                format!(".{}", s.to_lowercase())
            }
        })
        .collect()
}
