//! # 分子结构数据模型
//!
//! 定义受体与配体共用的分子表示。只保留第一帧（PDB 第一个 MODEL，
//! SDF 第一条记录），坐标单位为 Å，笛卡尔坐标。
//!
//! ## 依赖关系
//! - 被 `parsers/` 和 `scene/` 使用
//! - 无外部模块依赖

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// 结构文件格式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StructureFormat {
    /// Protein Data Bank 格式
    Pdb,
    /// MDL SDF / MOL 格式
    Sdf,
}

impl StructureFormat {
    /// 从文件扩展名推断格式
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|s| s.to_lowercase())?;

        match ext.as_str() {
            "pdb" | "ent" => Some(StructureFormat::Pdb),
            "sdf" | "mol" | "sd" => Some(StructureFormat::Sdf),
            _ => None,
        }
    }
}

impl std::fmt::Display for StructureFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StructureFormat::Pdb => write!(f, "pdb"),
            StructureFormat::Sdf => write!(f, "sdf"),
        }
    }
}

/// 结构文件在场景中的角色
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StructureKind {
    Receptor,
    Ligand,
}

/// 磁盘上的结构文件引用，存在性在使用时才检查
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructureFile {
    pub path: PathBuf,
    pub kind: StructureKind,
}

impl StructureFile {
    pub fn new(path: impl Into<PathBuf>, kind: StructureKind) -> Self {
        StructureFile {
            path: path.into(),
            kind,
        }
    }

    /// 文件当前是否存在
    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    pub fn format(&self) -> Option<StructureFormat> {
        StructureFormat::from_path(&self.path)
    }
}

/// 原子信息
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Atom {
    /// 原子名（PDB 的 name 列；SDF 中与元素相同）
    pub name: String,

    /// 元素符号
    pub element: String,

    /// 笛卡尔坐标 [x, y, z]，单位 Å
    pub position: [f64; 3],

    /// 残基名（仅 PDB）
    pub residue: Option<String>,

    /// 链标识（仅 PDB）
    pub chain: Option<char>,

    /// 是否来自 HETATM 记录
    pub hetero: bool,
}

impl Atom {
    pub fn new(element: impl Into<String>, position: [f64; 3]) -> Self {
        let element = element.into();
        Atom {
            name: element.clone(),
            element,
            position,
            residue: None,
            chain: None,
            hetero: false,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_residue(mut self, residue: impl Into<String>, chain: Option<char>) -> Self {
        self.residue = Some(residue.into());
        self.chain = chain;
        self
    }
}

/// 化学键（原子索引从 0 开始）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bond {
    pub from: usize,
    pub to: usize,
    pub order: u8,
}

/// 分子结构
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Molecule {
    /// 结构名称
    pub name: String,

    /// 原子列表（第一帧）
    pub atoms: Vec<Atom>,

    /// 键列表
    pub bonds: Vec<Bond>,

    /// SDF 数据字段（`> <key>` 块）
    pub properties: BTreeMap<String, String>,

    /// 来源文件格式
    pub format: StructureFormat,
}

impl Molecule {
    pub fn new(name: impl Into<String>, format: StructureFormat, atoms: Vec<Atom>) -> Self {
        Molecule {
            name: name.into(),
            atoms,
            bonds: Vec::new(),
            properties: BTreeMap::new(),
            format,
        }
    }

    /// 所有原子坐标的平均值，空结构返回 None
    pub fn centroid(&self) -> Option<[f64; 3]> {
        mean_position(self.atoms.iter().map(|a| a.position))
    }

    /// 计算化学式（元素按字母序）
    pub fn formula(&self) -> String {
        let mut counts: BTreeMap<&str, usize> = BTreeMap::new();

        for atom in &self.atoms {
            *counts.entry(atom.element.as_str()).or_insert(0) += 1;
        }

        counts
            .into_iter()
            .map(|(el, count)| {
                if count == 1 {
                    el.to_string()
                } else {
                    format!("{}{}", el, count)
                }
            })
            .collect::<Vec<_>>()
            .join("")
    }

    /// 是否包含标准残基（非 HETATM）原子
    pub fn has_polymer(&self) -> bool {
        self.atoms.iter().any(|a| !a.hetero && a.residue.is_some())
    }
}

/// 一组坐标的算术平均
pub fn mean_position<I>(positions: I) -> Option<[f64; 3]>
where
    I: IntoIterator<Item = [f64; 3]>,
{
    let mut sum = [0.0; 3];
    let mut n = 0usize;

    for p in positions {
        sum[0] += p[0];
        sum[1] += p[1];
        sum[2] += p[2];
        n += 1;
    }

    if n == 0 {
        return None;
    }

    let n = n as f64;
    Some([sum[0] / n, sum[1] / n, sum[2] / n])
}
