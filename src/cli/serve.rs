//! # serve 子命令 CLI 定义
//!
//! 启动 Web 服务；给出 `--receptor` 时先生成演示产物
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/serve.rs`

use super::AssetsArgs;
use crate::config;
use clap::Args;
use std::path::PathBuf;

/// serve 子命令参数
#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Address to bind
    #[arg(long, default_value = "0.0.0.0")]
    pub host: String,

    /// Port to listen on
    #[arg(short, long, default_value_t = config::DEFAULT_PORT)]
    pub port: u16,

    #[command(flatten)]
    pub assets: AssetsArgs,

    /// Compose the demo artifact from this receptor before serving
    #[arg(long)]
    pub receptor: Option<PathBuf>,

    /// Directory holding the receptor and ligand files
    #[arg(long, default_value = "./data")]
    pub data_dir: PathBuf,

    /// Ligand pose file names for the demo artifact
    #[arg(requires = "receptor")]
    pub ligands: Vec<PathBuf>,

    /// Also add ligands matching these comma-separated patterns
    #[arg(long, requires = "receptor")]
    pub ligand_pattern: Option<String>,
}
