//! # 终端输出工具
//!
//! 命令的用户可见输出统一经过这里；诊断日志走 `tracing`。
//!
//! ## 依赖关系
//! - 被 `commands/` 模块和 `main.rs` 使用
//! - 使用 `colored` crate

use colored::Colorize;

/// 打印成功消息
pub fn print_success(msg: &str) {
    println!("{} {}", "[OK]".green().bold(), msg);
}

/// 打印错误消息（stderr）
pub fn print_error(msg: &str) {
    eprintln!("{} {}", "[ERR]".red().bold(), msg);
}

/// 打印警告消息
pub fn print_warning(msg: &str) {
    println!("{} {}", "[WARN]".yellow().bold(), msg);
}

/// 打印信息消息
pub fn print_info(msg: &str) {
    println!("{} {}", "[*]".blue().bold(), msg);
}

/// 打印跳过的条目
pub fn print_skip(msg: &str) {
    println!("{} {}", "[SKIP]".dimmed(), msg);
}

/// 打印完成汇总
pub fn print_done(msg: &str) {
    println!("{} {}", "[DONE]".green().bold(), msg);
}

/// 输入结构 -> 写出的产物
pub fn print_written(source: &str, artifact: &str) {
    println!(
        "{} {} {} {}",
        "[OK]".green().bold(),
        source.dimmed(),
        "->".cyan(),
        artifact
    );
}

/// 带标签的链接，URL 加下划线
pub fn print_link(label: &str, url: &str) {
    println!("{} {} {}", "[URL]".cyan().bold(), label, url.underline());
}

/// 打印标题栏
pub fn print_header(title: &str) {
    let line = "─".repeat(60);
    println!("\n{}", line.dimmed());
    println!("  {}", title.bold());
    println!("{}\n", line.dimmed());
}
