//! # compose 子命令 CLI 定义
//!
//! 将受体和若干配体姿势组合为一个 NGL 场景，写入资源目录
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/compose.rs`

use super::AssetsArgs;
use crate::config;
use crate::models::RepresentationKind;
use crate::scene::composer::CAMERA_ZOOM;
use clap::{Args, ValueEnum};
use std::path::PathBuf;

/// 配体表示方式
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum LigandStyle {
    /// Ball and stick
    BallAndStick,
    /// Licorice
    Licorice,
}

impl From<LigandStyle> for RepresentationKind {
    fn from(style: LigandStyle) -> Self {
        match style {
            LigandStyle::BallAndStick => RepresentationKind::BallAndStick,
            LigandStyle::Licorice => RepresentationKind::Licorice,
        }
    }
}

/// compose 子命令参数
#[derive(Args, Debug)]
pub struct ComposeArgs {
    /// Directory holding the receptor and ligand files
    #[arg(long, default_value = "./data")]
    pub data_dir: PathBuf,

    /// Receptor file name, relative to --data-dir
    #[arg(long)]
    pub receptor: PathBuf,

    /// Ligand pose file names, relative to --data-dir (overlay order)
    pub ligands: Vec<PathBuf>,

    /// Also add ligands matching these comma-separated patterns
    #[arg(long)]
    pub ligand_pattern: Option<String>,

    /// Artifact file name inside the assets directory
    #[arg(short, long, default_value = config::DEMO_ARTIFACT)]
    pub output: PathBuf,

    /// Identifier (e.g. SMILES) to embed in the artifact
    #[arg(long)]
    pub identifier: Option<String>,

    /// Page title
    #[arg(long, default_value = "Docking poses")]
    pub title: String,

    /// Ligand representation
    #[arg(long, value_enum, default_value_t = LigandStyle::BallAndStick)]
    pub ligand_style: LigandStyle,

    /// Camera zoom factor
    #[arg(long, default_value_t = CAMERA_ZOOM)]
    pub zoom: f64,

    #[command(flatten)]
    pub assets: AssetsArgs,
}
