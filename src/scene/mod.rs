//! # 场景模块
//!
//! 对接结果可视化：受体 + 多个配体姿势 → 单个 HTML 产物。
//!
//! ## 功能
//! - 从文件名提取排名标签
//! - 按模式发现配体文件
//! - 组合受体与配体，计算标签位置和相机
//! - 原子写入独立 HTML
//!
//! ## 依赖关系
//! - 被 `commands/compose.rs` 使用
//! - 使用 `parsers/`, `models/`

pub mod composer;
pub mod discover;
pub mod export;
pub mod label;

pub use composer::SceneComposer;
pub use discover::LigandFinder;
pub use export::{write_html, HtmlOptions};
