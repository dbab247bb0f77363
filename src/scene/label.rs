//! # 排名标签提取
//!
//! 从姿势文件名中提取 `rank<N>` 并生成显示标签 `Rank <N>`。
//!
//! ## 依赖关系
//! - 被 `scene/composer.rs` 使用
//! - 使用 `regex` + `lazy_static`

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref RANK_PATTERN: Regex = Regex::new(r"rank(\d+)").unwrap();
}

/// 提取排名标签；不匹配时返回空串（不是错误）
pub fn extract_rank_label(filename: &str) -> String {
    RANK_PATTERN
        .captures(filename)
        .and_then(|caps| caps.get(1))
        .map(|digits| format!("Rank {}", digits.as_str()))
        .unwrap_or_default()
}
