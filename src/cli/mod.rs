//! # CLI 模块
//!
//! 使用 `clap` 定义命令行参数和子命令。
//!
//! ## 命令结构
//! - `compose`: 组合受体与配体姿势，写出 HTML 产物
//! - `scan`: 扫描资源目录，列出 标识符 → 产物
//! - `serve`: 启动 Web 服务
//!
//! ## 依赖关系
//! - 被 `main.rs` 使用
//! - 子模块: compose, scan, serve

pub mod compose;
pub mod scan;
pub mod serve;

use crate::config::{self, Settings};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// dockview - 对接结果可视化与浏览
#[derive(Parser)]
#[command(name = "dockview")]
#[command(author = "Changjiang Wu")]
#[command(version)]
#[command(about = "Compose docking poses into NGL scenes and browse them by SMILES", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// 可用的子命令
#[derive(Subcommand)]
pub enum Commands {
    /// Compose a receptor and ranked ligand poses into one HTML scene
    Compose(compose::ComposeArgs),

    /// Scan the assets directory and list identifiers
    Scan(scan::ScanArgs),

    /// Serve assets, the dashboard and the catalog API
    Serve(serve::ServeArgs),
}

/// 各子命令共用的资源目录参数
#[derive(Args, Debug, Clone)]
pub struct AssetsArgs {
    /// Directory where artifacts are read and written
    #[arg(long, env = config::ASSETS_DIR_ENV, default_value = "assets")]
    pub assets_dir: PathBuf,

    /// Externally visible URL prefix (set by JupyterHub)
    #[arg(long, env = config::PREFIX_ENV, default_value = "")]
    pub prefix: String,

    /// Port the reverse proxy forwards to, used in public links
    #[arg(long, default_value_t = config::DEFAULT_PORT)]
    pub proxy_port: u16,

    /// Comma-separated artifact suffixes to scan
    #[arg(long, default_value = ".html")]
    pub extensions: String,

    /// Class name of the element carrying the identifier
    #[arg(long, default_value = "smiles-entry")]
    pub marker: String,
}

impl AssetsArgs {
    pub fn to_settings(&self) -> Settings {
        Settings {
            assets_dir: self.assets_dir.clone(),
            base_prefix: self.prefix.clone(),
            marker_class: self.marker.clone(),
            proxy_port: self.proxy_port,
            ..Default::default()
        }
        .with_extensions(&self.extensions)
    }
}
