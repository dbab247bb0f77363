//! # serve 命令实现
//!
//! 启动 Web 服务。给出 `--receptor` 时先生成演示产物，再开始监听。
//!
//! ## 依赖关系
//! - 使用 `cli/serve.rs` 定义的参数
//! - 使用 `commands/compose.rs`, `server/`
//! - 使用 `tokio` 运行时

use crate::cli::serve::ServeArgs;
use crate::commands::compose::{compose_artifact, ComposeJob};
use crate::config::Settings;
use crate::error::{DockviewError, Result};
use crate::server;
use crate::utils::output;

use tracing::error;

/// 执行 serve 命令
pub fn execute(args: ServeArgs) -> Result<()> {
    let settings = args.assets.to_settings();
    settings.ensure_assets_dir()?;

    if let Some(receptor) = args.receptor {
        let mut job = ComposeJob::demo(args.data_dir, receptor, args.ligands);
        job.ligand_pattern = args.ligand_pattern;

        prepare_demo(&settings, &job);
    }

    output::print_header("Starting Server");
    output::print_info(&format!("Assets: {}", settings.assets_dir.display()));
    output::print_info(&format!("Public root: {}", settings.root_path()));
    output::print_link("Dashboard:", &format!("{}/dashboard", settings.root_path()));

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|e| DockviewError::ServerError(format!("cannot start runtime: {}", e)))?;

    runtime.block_on(server::run(settings, &args.host, args.port))
}

/// 生成演示产物；失败只影响该产物，服务照常启动
fn prepare_demo(settings: &Settings, job: &ComposeJob) -> bool {
    output::print_header("Preparing Demo Artifact");

    match compose_artifact(settings, job) {
        Ok(written) => written.is_some(),
        Err(e) => {
            error!("Demo composition failed: {}", e);
            output::print_error(&format!("Demo artifact not written: {}", e));
            false
        }
    }
}
