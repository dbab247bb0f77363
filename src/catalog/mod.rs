//! # 产物目录模块
//!
//! 以文件系统为数据源，按嵌入的标识符索引产物并解析对外链接。
//!
//! ## 功能
//! - 扫描目录、提取标识符
//! - 维护 标识符 → 文件名 映射
//! - 拼接对外 URL
//!
//! ## 依赖关系
//! - 被 `commands/` 和 `server/` 使用
//! - 使用 `walkdir` 遍历目录，`rayon` 并行读取

pub mod link;
pub mod scanner;
pub mod store;

pub use link::LinkResolver;
pub use scanner::{IdentifierScanner, ScanReport};
pub use store::{ArtifactCatalog, CachePolicy};
