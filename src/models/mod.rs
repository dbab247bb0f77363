//! # 数据模型模块
//!
//! 定义分子结构与可视化场景的数据模型。
//!
//! ## 依赖关系
//! - 被 `parsers/`、`scene/` 和 `commands/` 使用
//! - 子模块: structure, scene

pub mod scene;
pub mod structure;

pub use scene::{Camera, Layer, Pose, Representation, RepresentationKind, Scene, TextLabel};
pub use structure::{Atom, Bond, Molecule, StructureFile, StructureFormat, StructureKind};
