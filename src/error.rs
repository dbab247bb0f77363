//! # 统一错误处理模块
//!
//! 定义 dockview 的所有错误类型，使用 `thiserror` 派生。
//!
//! 可恢复的情况（缺失的配体、无法读取的产物、无标识符匹配）不会出现在这里，
//! 它们在各自模块内被记录并跳过。
//!
//! ## 依赖关系
//! - 被所有其他模块使用
//! - 无外部模块依赖

use thiserror::Error;

/// dockview 统一错误类型
#[derive(Error, Debug)]
pub enum DockviewError {
    // ─────────────────────────────────────────────────────────────
    // I/O 错误
    // ─────────────────────────────────────────────────────────────
    #[error("Failed to read file: {path}")]
    FileReadError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write file: {path}")]
    FileWriteError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    // ─────────────────────────────────────────────────────────────
    // 解析错误
    // ─────────────────────────────────────────────────────────────
    #[error("Failed to parse {format} file: {path}\nReason: {reason}")]
    ParseError {
        format: String,
        path: String,
        reason: String,
    },

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    // ─────────────────────────────────────────────────────────────
    // 场景序列化错误
    // ─────────────────────────────────────────────────────────────
    #[error("Failed to serialize scene: {0}")]
    SerializeError(#[from] serde_json::Error),

    #[error("Failed to persist artifact: {path}")]
    PersistError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    // ─────────────────────────────────────────────────────────────
    // 参数错误
    // ─────────────────────────────────────────────────────────────
    #[error("Invalid pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    // ─────────────────────────────────────────────────────────────
    // CSV 错误
    // ─────────────────────────────────────────────────────────────
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    // ─────────────────────────────────────────────────────────────
    // 服务器
    // ─────────────────────────────────────────────────────────────
    #[error("Server error: {0}")]
    ServerError(String),
}

/// Result 类型别名
pub type Result<T> = std::result::Result<T, DockviewError>;
