//! # 配体发现
//!
//! 在数据目录中按文件名模式查找配体姿势文件。
//!
//! ## 功能
//! - 逗号分隔的多模式（`rank*.sdf,pose_?.mol`）
//! - 只看数据目录的直接子文件
//! - 结果按文件名排序，与显式给出的配体合并去重
//!
//! ## 依赖关系
//! - 被 `commands/compose.rs` 调用
//! - 使用 `walkdir` 遍历目录，`glob::Pattern` 匹配

use crate::error::{DockviewError, Result};

use glob::Pattern;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// 配体文件查找器
pub struct LigandFinder {
    data_dir: PathBuf,
    patterns: Vec<Pattern>,
}

impl LigandFinder {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            patterns: Vec::new(),
        }
    }

    /// 设置匹配模式（逗号分隔）
    pub fn with_pattern(mut self, pattern: &str) -> Result<Self> {
        self.patterns = pattern
            .split(',')
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .map(|s| {
                Pattern::new(s).map_err(|e| DockviewError::InvalidPattern {
                    pattern: s.to_string(),
                    reason: e.to_string(),
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(self)
    }

    /// 返回匹配的文件名（相对数据目录），已排序
    pub fn find(&self) -> Vec<PathBuf> {
        if self.patterns.is_empty() || !self.data_dir.is_dir() {
            return Vec::new();
        }

        let mut found: Vec<PathBuf> = WalkDir::new(&self.data_dir)
            .max_depth(1)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .filter(|e| self.matches(e.path()))
            .map(|e| PathBuf::from(e.file_name()))
            .collect();

        found.sort();
        found
    }

    /// 显式列出的配体在前，模式匹配到的追加在后，去掉重复项
    pub fn merge_with(&self, explicit: &[PathBuf]) -> Vec<PathBuf> {
        let mut ligands: Vec<PathBuf> = Vec::with_capacity(explicit.len());
        for path in explicit.iter().cloned().chain(self.find()) {
            if !ligands.contains(&path) {
                ligands.push(path);
            }
        }
        ligands
    }

    fn matches(&self, path: &Path) -> bool {
        let filename = match path.file_name().and_then(|n| n.to_str()) {
            Some(name) => name,
            None => return false,
        };
        self.patterns.iter().any(|p| p.matches(filename))
    }
}
