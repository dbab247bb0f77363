//! # 场景组合器
//!
//! 将一个受体结构和多个配体姿势组合成同一个场景：
//! 受体使用蓝色 cartoon 表示，每个配体叠加一个 ball+stick 表示，
//! 并在配体中心（加偏移）处放置排名标签，最后将相机对准整个场景。
//!
//! ## 失败策略
//! - 受体不存在：记录并返回 `Ok(None)`，不产生任何产物
//! - 受体存在但无法解析：返回错误，终止本次组合
//! - 配体不存在或无法解析：记录并跳过，继续处理其余配体
//!
//! ## 依赖关系
//! - 被 `commands/compose.rs` 调用
//! - 使用 `parsers/`, `scene/label.rs`, `models/`

use crate::error::Result;
use crate::models::structure::mean_position;
use crate::models::{
    Camera, Layer, Pose, Representation, RepresentationKind, Scene, StructureFile, StructureKind,
    TextLabel,
};
use crate::parsers::{self, LoadedStructure};
use crate::scene::label::extract_rank_label;

use std::path::Path;
use tracing::{debug, info, warn};

/// 标签相对配体中心的偏移，避免与配体几何重叠
pub const LABEL_OFFSET: [f64; 3] = [0.5, 0.5, 0.5];

/// 标签字号
pub const LABEL_SIZE: f64 = 5.0;

/// 标签颜色（黑色）
pub const LABEL_COLOR: [f64; 3] = [0.0, 0.0, 0.0];

/// 居中后的缩放系数
pub const CAMERA_ZOOM: f64 = 0.2;

/// 受体 cartoon 颜色
pub const RECEPTOR_COLOR: &str = "blue";

/// 场景组合器
#[derive(Debug, Clone)]
pub struct SceneComposer {
    receptor_representation: Representation,
    ligand_representation: Representation,
    label_offset: [f64; 3],
    label_size: f64,
    label_color: [f64; 3],
    zoom: f64,
}

impl Default for SceneComposer {
    fn default() -> Self {
        SceneComposer {
            receptor_representation: Representation::new(
                RepresentationKind::Cartoon,
                "protein",
                RECEPTOR_COLOR,
            ),
            ligand_representation: Representation::new(
                RepresentationKind::BallAndStick,
                "all",
                "element",
            ),
            label_offset: LABEL_OFFSET,
            label_size: LABEL_SIZE,
            label_color: LABEL_COLOR,
            zoom: CAMERA_ZOOM,
        }
    }
}

impl SceneComposer {
    pub fn new() -> Self {
        Self::default()
    }

    /// 设置缩放系数
    pub fn with_zoom(mut self, zoom: f64) -> Self {
        self.zoom = zoom;
        self
    }

    /// 设置配体表示方式
    pub fn with_ligand_representation(mut self, kind: RepresentationKind) -> Self {
        self.ligand_representation.kind = kind;
        self
    }

    /// 组合场景
    ///
    /// 受体和配体文件名都相对 `receptor_dir` 解析。配体叠加顺序与输入顺序一致。
    pub fn compose<R, L>(
        &self,
        receptor_dir: &Path,
        receptor_filename: R,
        ligand_filenames: &[L],
    ) -> Result<Option<Scene>>
    where
        R: AsRef<Path>,
        L: AsRef<Path>,
    {
        let receptor_file =
            StructureFile::new(receptor_dir.join(receptor_filename), StructureKind::Receptor);

        if !receptor_file.exists() {
            warn!(
                "Protein file not found: {}",
                receptor_file.path.display()
            );
            return Ok(None);
        }

        let receptor = parsers::load_structure(&receptor_file.path)?;
        let mut representations = vec![self.receptor_representation.clone()];
        if !receptor.molecule.has_polymer() {
            // 无标准残基时 cartoon 不可见
            representations.push(Representation::new(
                RepresentationKind::BallAndStick,
                "all",
                "element",
            ));
        }

        let mut all_positions: Vec<[f64; 3]> =
            receptor.molecule.atoms.iter().map(|a| a.position).collect();
        let receptor_layer = self.layer_from(&receptor_file, receptor, representations);

        let mut poses = Vec::with_capacity(ligand_filenames.len());
        let mut labels = Vec::with_capacity(ligand_filenames.len());

        for ligand_filename in ligand_filenames {
            let ligand_file = StructureFile::new(
                receptor_dir.join(ligand_filename.as_ref()),
                StructureKind::Ligand,
            );

            if !ligand_file.exists() {
                warn!(
                    "Ligand file not found: {}",
                    ligand_filename.as_ref().display()
                );
                continue;
            }

            if ligand_file.format().is_none() {
                warn!(
                    "Skipping ligand {}: unsupported format",
                    ligand_file.path.display()
                );
                continue;
            }

            let loaded = match parsers::load_structure(&ligand_file.path) {
                Ok(loaded) => loaded,
                Err(e) => {
                    warn!("Skipping ligand {}: {}", ligand_file.path.display(), e);
                    continue;
                }
            };
            debug!(
                "{:?} {}: {} ({} atoms)",
                ligand_file.kind,
                ligand_file.path.display(),
                loaded.molecule.formula(),
                loaded.molecule.atoms.len()
            );

            let Some(center) = loaded.molecule.centroid() else {
                warn!("Skipping ligand {}: no atoms", ligand_file.path.display());
                continue;
            };

            all_positions.extend(loaded.molecule.atoms.iter().map(|a| a.position));

            let centroid = [
                center[0] + self.label_offset[0],
                center[1] + self.label_offset[1],
                center[2] + self.label_offset[2],
            ];
            let label = extract_rank_label(&ligand_file.path.to_string_lossy());

            labels.push(TextLabel {
                position: centroid,
                color: self.label_color,
                size: self.label_size,
                text: label.clone(),
            });

            let layer =
                self.layer_from(&ligand_file, loaded, vec![self.ligand_representation.clone()]);
            poses.push(Pose {
                layer,
                label: label.clone(),
                centroid,
            });

            info!("Ligand {} loaded.", label);
        }

        let camera = Camera {
            center: mean_position(all_positions).unwrap_or([0.0; 3]),
            zoom: self.zoom,
        };

        Ok(Some(Scene {
            receptor: receptor_layer,
            poses,
            labels,
            camera,
        }))
    }

    fn layer_from(
        &self,
        file: &StructureFile,
        loaded: LoadedStructure,
        representations: Vec<Representation>,
    ) -> Layer {
        Layer {
            source: file.path.clone(),
            format: loaded.molecule.format,
            atom_count: loaded.molecule.atoms.len(),
            content: loaded.content,
            representations,
            properties: loaded.molecule.properties,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    const RECEPTOR_PDB: &str = "\
ATOM      1  N   THR A   1       0.000   0.000   0.000  1.00 13.79           N
ATOM      2  CA  THR A   1       2.000   0.000   0.000  1.00 10.80           C
ATOM      3  C   THR A   1       4.000   0.000   0.000  1.00  9.19           C
END
";

    fn ligand_sdf(x: f64) -> String {
        format!(
            "lig\n  test\n\n  2  1  0  0  0  0  0  0  0  0999 V2000\n{:10.4}{:10.4}{:10.4} C   0  0\n{:10.4}{:10.4}{:10.4} O   0  0\n  1  2  1  0\nM  END\n$$$$\n",
            x, 0.0, 0.0, x + 2.0, 2.0, 2.0
        )
    }

    fn setup() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("protein_fix_amides.pdb"), RECEPTOR_PDB).unwrap();
        fs::write(dir.path().join("rank1_confidence-1.77.sdf"), ligand_sdf(10.0)).unwrap();
        fs::write(dir.path().join("rank2_confidence-0.05.sdf"), ligand_sdf(20.0)).unwrap();
        dir
    }

    #[test]
    fn test_missing_receptor_returns_none() {
        let dir = setup();
        let scene = SceneComposer::new()
            .compose(dir.path(), "missing.pdb", &["rank1_confidence-1.77.sdf"])
            .unwrap();
        assert!(scene.is_none());

        // 不应产生任何新文件
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 3);
    }

    #[test]
    fn test_missing_ligand_is_skipped() {
        let dir = setup();
        let scene = SceneComposer::new()
            .compose(
                dir.path(),
                "protein_fix_amides.pdb",
                &["rank1_confidence-1.77.sdf", "rank9_missing.sdf"],
            )
            .unwrap()
            .unwrap();

        assert_eq!(scene.poses.len(), 1);
        assert_eq!(scene.labels.len(), 1);
        assert_eq!(scene.poses[0].label, "Rank 1");
    }

    #[test]
    fn test_pose_order_and_labels() {
        let dir = setup();
        let scene = SceneComposer::new()
            .compose(
                dir.path(),
                "protein_fix_amides.pdb",
                &["rank2_confidence-0.05.sdf", "rank1_confidence-1.77.sdf"],
            )
            .unwrap()
            .unwrap();

        let labels: Vec<&str> = scene.poses.iter().map(|p| p.label.as_str()).collect();
        assert_eq!(labels, vec!["Rank 2", "Rank 1"]);
        assert_eq!(scene.labels[0].text, "Rank 2");
        assert_eq!(scene.layer_count(), 3);
    }

    #[test]
    fn test_centroid_has_label_offset() {
        let dir = setup();
        let scene = SceneComposer::new()
            .compose(dir.path(), "protein_fix_amides.pdb", &["rank1_confidence-1.77.sdf"])
            .unwrap()
            .unwrap();

        // atoms at (10,0,0) and (12,2,2): mean (11,1,1) + 0.5
        let c = scene.poses[0].centroid;
        assert!((c[0] - 11.5).abs() < 1e-9);
        assert!((c[1] - 1.5).abs() < 1e-9);
        assert!((c[2] - 1.5).abs() < 1e-9);
        assert_eq!(scene.labels[0].position, c);
        assert_eq!(scene.labels[0].size, LABEL_SIZE);
        assert_eq!(scene.labels[0].color, LABEL_COLOR);
    }

    #[test]
    fn test_receptor_representation_and_camera() {
        let dir = setup();
        let scene = SceneComposer::new()
            .compose(dir.path(), "protein_fix_amides.pdb", &["rank1_confidence-1.77.sdf"])
            .unwrap()
            .unwrap();

        let repr = &scene.receptor.representations[0];
        assert_eq!(repr.kind, RepresentationKind::Cartoon);
        assert_eq!(repr.selection, "protein");
        assert_eq!(repr.color, "blue");
        assert_eq!(scene.receptor.representations.len(), 1);
        assert_eq!(scene.receptor.atom_count, 3);

        // receptor x: 0,2,4; ligand x: 10,12 -> mean 5.6
        assert!((scene.camera.center[0] - 5.6).abs() < 1e-9);
        assert_eq!(scene.camera.zoom, CAMERA_ZOOM);
    }

    #[test]
    fn test_unlabelled_ligand() {
        let dir = setup();
        fs::write(dir.path().join("ligand_final.sdf"), ligand_sdf(0.0)).unwrap();

        let scene = SceneComposer::new()
            .compose(dir.path(), "protein_fix_amides.pdb", &["ligand_final.sdf"])
            .unwrap()
            .unwrap();
        assert_eq!(scene.poses[0].label, "");
    }

    #[test]
    fn test_unparseable_ligand_is_skipped() {
        let dir = setup();
        fs::write(dir.path().join("rank3_broken.sdf"), "garbage").unwrap();

        let scene = SceneComposer::new()
            .compose(
                dir.path(),
                "protein_fix_amides.pdb",
                &["rank3_broken.sdf", "rank2_confidence-0.05.sdf"],
            )
            .unwrap()
            .unwrap();
        assert_eq!(scene.poses.len(), 1);
        assert_eq!(scene.poses[0].label, "Rank 2");
    }

    #[test]
    fn test_unsupported_ligand_format_is_skipped() {
        let dir = setup();
        fs::write(dir.path().join("rank4.xyz"), "1\n\nC 0 0 0\n").unwrap();

        let scene = SceneComposer::new()
            .compose(
                dir.path(),
                "protein_fix_amides.pdb",
                &["rank4.xyz", "rank1_confidence-1.77.sdf"],
            )
            .unwrap()
            .unwrap();
        assert_eq!(scene.poses.len(), 1);
        assert_eq!(scene.poses[0].label, "Rank 1");
    }

    #[test]
    fn test_ligand_data_fields_reach_layer() {
        let dir = setup();
        let sdf = ligand_sdf(0.0).replace("M  END\n", "M  END\n> <confidence>\n-1.77\n\n");
        fs::write(dir.path().join("rank5_scored.sdf"), sdf).unwrap();

        let scene = SceneComposer::new()
            .compose(dir.path(), "protein_fix_amides.pdb", &["rank5_scored.sdf"])
            .unwrap()
            .unwrap();
        let props = &scene.poses[0].layer.properties;
        assert_eq!(props.get("confidence").map(String::as_str), Some("-1.77"));
        assert!(scene.receptor.properties.is_empty());
    }

    #[test]
    fn test_unparseable_receptor_is_error() {
        let dir = setup();
        fs::write(dir.path().join("broken.pdb"), "REMARK empty\n").unwrap();

        let result = SceneComposer::new().compose(dir.path(), "broken.pdb", &[] as &[&str]);
        assert!(result.is_err());
    }

    #[test]
    fn test_compose_is_deterministic() {
        let dir = setup();
        let ligands = ["rank1_confidence-1.77.sdf", "rank2_confidence-0.05.sdf"];
        let composer = SceneComposer::new();

        let a = composer.compose(dir.path(), "protein_fix_amides.pdb", &ligands).unwrap();
        let b = composer.compose(dir.path(), "protein_fix_amides.pdb", &ligands).unwrap();
        assert_eq!(a, b);
    }
}
