//! # 解析器模块
//!
//! 提供受体（PDB）和配体（SDF/MOL）结构文件的解析器。
//!
//! ## 依赖关系
//! - 被 `scene/composer.rs` 使用
//! - 使用 `models/` 数据模型
//! - 子模块: pdb, sdf

pub mod pdb;
pub mod sdf;

use crate::error::{DockviewError, Result};
use crate::models::{Molecule, StructureFormat};
use std::fs;
use std::path::Path;

/// 已读取的结构：原始文本 + 解析结果
#[derive(Debug, Clone)]
pub struct LoadedStructure {
    pub content: String,
    pub molecule: Molecule,
}

/// 读取结构文件，同时保留原始文本供查看器加载
pub fn load_structure(path: &Path) -> Result<LoadedStructure> {
    let format = StructureFormat::from_path(path).ok_or_else(|| {
        DockviewError::UnsupportedFormat(format!(
            "Cannot determine format for: {}",
            path.display()
        ))
    })?;

    let content = fs::read_to_string(path).map_err(|e| DockviewError::FileReadError {
        path: path.display().to_string(),
        source: e,
    })?;

    let default_name = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("unknown");

    let molecule = parse_structure_content(&content, format, default_name)?;

    Ok(LoadedStructure { content, molecule })
}

/// 按指定格式解析字符串内容
pub fn parse_structure_content(
    content: &str,
    format: StructureFormat,
    default_name: &str,
) -> Result<Molecule> {
    match format {
        StructureFormat::Pdb => pdb::parse_pdb_content(content, default_name),
        StructureFormat::Sdf => sdf::parse_sdf_content(content, default_name),
    }
}
