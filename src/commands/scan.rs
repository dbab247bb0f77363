//! # scan 命令实现
//!
//! 扫描资源目录，打印 标识符 → 产物 表格。
//!
//! ## 功能
//! - 并行读取候选产物并提取标识符
//! - 表格展示标识符、文件名和对外 URL
//! - 汇总未标记、被覆盖和无法读取的文件
//! - 可选导出 CSV
//!
//! ## 依赖关系
//! - 使用 `cli/scan.rs` 定义的参数
//! - 使用 `catalog/`（`ArtifactCatalog` 一次性扫描）
//! - 使用 `utils/output.rs`

use crate::catalog::{ArtifactCatalog, IdentifierScanner, LinkResolver, ScanReport};
use crate::cli::scan::ScanArgs;
use crate::error::{DockviewError, Result};
use crate::utils::output;

use std::path::Path;
use tabled::{Table, Tabled};

/// 表格行
#[derive(Debug, Clone, Tabled)]
struct EntryRow {
    #[tabled(rename = "Identifier")]
    identifier: String,
    #[tabled(rename = "File")]
    filename: String,
    #[tabled(rename = "URL")]
    url: String,
}

/// 执行 scan 命令
pub fn execute(args: ScanArgs) -> Result<()> {
    let settings = args.assets.to_settings();

    output::print_header(&format!("Scanning {}", settings.assets_dir.display()));

    let scanner = IdentifierScanner::from_settings(&settings)?.with_jobs(args.jobs);
    let links = LinkResolver::from_settings(&settings);
    let catalog = ArtifactCatalog::open(settings.assets_dir.clone(), scanner)?;
    let rows = rows_from(&catalog, &links);

    if catalog.is_empty() {
        output::print_info("No entries available.");
    } else {
        println!("{}", Table::new(&rows));
    }

    print_summary(catalog.last_report());

    if let Some(ref path) = args.csv {
        save_entries_csv(&rows, path)?;
        output::print_success(&format!("Catalog saved to '{}'", path.display()));
    }

    output::print_done(&format!(
        "{} of {} file(s) indexed",
        catalog.len(),
        catalog.last_report().total()
    ));

    Ok(())
}

fn rows_from(catalog: &ArtifactCatalog, links: &LinkResolver) -> Vec<EntryRow> {
    catalog
        .entries()
        .map(|(identifier, filename)| EntryRow {
            identifier: identifier.to_string(),
            filename: filename.to_string(),
            url: links.resolve(filename),
        })
        .collect()
}

fn print_summary(report: &ScanReport) {
    for name in &report.unmatched {
        output::print_skip(&format!("{} (no identifier)", name));
    }
    for shadow in &report.shadowed {
        output::print_warning(&format!(
            "'{}' in {} is shadowed by {}",
            shadow.identifier, shadow.filename, shadow.winner
        ));
    }
    for (name, reason) in &report.unreadable {
        output::print_warning(&format!("Cannot read {}: {}", name, reason));
    }
}

/// 保存映射到 CSV
fn save_entries_csv(rows: &[EntryRow], output_path: &Path) -> Result<()> {
    let mut wtr = csv::Writer::from_path(output_path)?;

    wtr.write_record(["identifier", "filename", "url"])?;
    for row in rows {
        wtr.write_record([&row.identifier, &row.filename, &row.url])?;
    }

    wtr.flush().map_err(|e| DockviewError::FileWriteError {
        path: output_path.display().to_string(),
        source: e,
    })?;

    Ok(())
}
