//! # 场景数据模型
//!
//! 描述一个组合后的对接可视化场景：受体、按顺序排列的配体姿势、
//! 文字标签和相机状态。场景会被序列化为 JSON 嵌入 HTML 产物。
//!
//! ## 依赖关系
//! - 被 `scene/composer.rs` 构建
//! - 被 `scene/export.rs` 序列化
//! - 使用 `models/structure.rs`

use super::structure::StructureFormat;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// 表示方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RepresentationKind {
    Cartoon,
    /// NGL 中名为 `ball+stick`
    #[serde(rename = "ball+stick")]
    BallAndStick,
    Licorice,
}

/// 一个可视化表示（类型 + 选择 + 颜色）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Representation {
    pub kind: RepresentationKind,
    pub selection: String,
    /// 颜色名或颜色方案（如 "blue", "element"）
    pub color: String,
}

impl Representation {
    pub fn new(kind: RepresentationKind, selection: &str, color: &str) -> Self {
        Representation {
            kind,
            selection: selection.to_string(),
            color: color.to_string(),
        }
    }
}

/// 已加载到场景中的一个结构
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layer {
    /// 源文件路径
    pub source: PathBuf,
    pub format: StructureFormat,
    /// 原始结构文本，由查看器直接加载
    pub content: String,
    pub atom_count: usize,
    pub representations: Vec<Representation>,
    /// SDF 数据字段（如对接置信度）
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub properties: BTreeMap<String, String>,
}

/// 一个带排名标签的配体姿势
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    pub layer: Layer,
    /// 排名标签，文件名不含 rank 时为空串
    pub label: String,
    /// 第一帧原子坐标均值加上标签偏移
    pub centroid: [f64; 3],
}

/// 三维文字标签
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextLabel {
    pub position: [f64; 3],
    /// RGB, 0.0..=1.0
    pub color: [f64; 3],
    pub size: f64,
    pub text: String,
}

/// 相机状态
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    /// 场景中心（全部原子坐标均值）
    pub center: [f64; 3],
    /// 居中后施加的缩放系数
    pub zoom: f64,
}

/// 组合完成的场景
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    pub receptor: Layer,
    pub poses: Vec<Pose>,
    pub labels: Vec<TextLabel>,
    pub camera: Camera,
}

impl Scene {
    /// 场景中的结构总数（受体 + 配体）
    pub fn layer_count(&self) -> usize {
        1 + self.poses.len()
    }

    /// 全部原子数
    pub fn atom_count(&self) -> usize {
        self.receptor.atom_count + self.poses.iter().map(|p| p.layer.atom_count).sum::<usize>()
    }
}
