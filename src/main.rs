//! # dockview - 分子对接结果可视化与浏览
//!
//! 将受体与按排名命名的配体姿势组合成可交互的 NGL 场景，
//! 并以文件系统为数据源，按嵌入的 SMILES 浏览所有产物。
//!
//! ## 子命令
//! - `compose` - 组合受体与配体，写出 HTML 产物
//! - `scan`    - 扫描资源目录，列出 标识符 → 产物
//! - `serve`   - 启动 Web 服务（静态产物、资源列表页、目录 API）
//!
//! ## 依赖关系
//! ```text
//! main.rs
//!   ├── cli/        (命令行参数定义)
//!   ├── commands/   (命令执行逻辑)
//!   │     ├── scene/     (场景组合与导出)
//!   │     ├── catalog/   (产物目录)
//!   │     └── server/    (Web 服务)
//!   ├── parsers/    (PDB / SDF 解析)
//!   ├── models/     (数据模型)
//!   ├── config.rs   (运行配置)
//!   ├── utils/      (终端输出)
//!   └── error.rs    (错误处理)
//! ```

mod catalog;
mod cli;
mod commands;
mod config;
mod error;
mod models;
mod parsers;
mod scene;
mod server;
mod utils;

use clap::Parser;
use cli::Cli;
use tracing_subscriber::EnvFilter;

fn main() {
    // Initialize colored output for Windows compatibility
    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    // 诊断日志写到 stderr，RUST_LOG 可覆盖默认级别
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let cli = Cli::parse();

    if let Err(e) = commands::run(cli.command) {
        utils::output::print_error(&format!("{}", e));
        std::process::exit(1);
    }
}
