//! # scan 子命令 CLI 定义
//!
//! 扫描资源目录，列出 标识符 → 产物 映射
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/scan.rs`

use super::AssetsArgs;
use clap::Args;
use std::path::PathBuf;

/// scan 子命令参数
#[derive(Args, Debug)]
pub struct ScanArgs {
    #[command(flatten)]
    pub assets: AssetsArgs,

    /// Number of parallel readers (0 = all CPUs)
    #[arg(short = 'j', long, default_value_t = 0)]
    pub jobs: usize,

    /// Also write the mapping to this CSV file
    #[arg(long)]
    pub csv: Option<PathBuf>,
}
