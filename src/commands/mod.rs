//! # 命令执行模块
//!
//! 实现各子命令的业务逻辑。
//!
//! ## 依赖关系
//! - 被 `main.rs` 调用
//! - 使用 `cli/`, `scene/`, `catalog/`, `server/`, `utils/`
//! - 子模块: compose, scan, serve

pub mod compose;
pub mod scan;
pub mod serve;

use crate::cli::Commands;
use crate::error::Result;

/// 执行命令
pub fn run(cmd: Commands) -> Result<()> {
    match cmd {
        Commands::Compose(args) => compose::execute(args),
        Commands::Scan(args) => scan::execute(args),
        Commands::Serve(args) => serve::execute(args),
    }
}
