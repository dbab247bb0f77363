//! # compose 命令实现
//!
//! 组合受体与配体姿势，写出 HTML 产物。
//!
//! ## 功能
//! - 合并显式给出和按模式发现的配体
//! - 受体缺失时不生成产物
//! - 产物原子写入资源目录，可嵌入标识符
//!
//! ## 依赖关系
//! - 使用 `cli/compose.rs` 定义的参数
//! - 使用 `scene/`, `config.rs`
//! - 使用 `utils/output.rs`, `utils/progress.rs`

use crate::catalog::link;
use crate::cli::compose::ComposeArgs;
use crate::config::{self, Settings};
use crate::error::{DockviewError, Result};
use crate::models::{RepresentationKind, Scene};
use crate::scene::composer::CAMERA_ZOOM;
use crate::scene::{write_html, HtmlOptions, LigandFinder, SceneComposer};
use crate::utils::{output, progress};

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// 一次组合任务
#[derive(Debug, Clone)]
pub struct ComposeJob {
    pub data_dir: PathBuf,
    pub receptor: PathBuf,
    pub ligands: Vec<PathBuf>,
    pub ligand_pattern: Option<String>,
    /// 资源目录中的文件名
    pub output: PathBuf,
    pub identifier: Option<String>,
    pub title: String,
    pub ligand_representation: RepresentationKind,
    pub zoom: f64,
}

impl ComposeJob {
    /// 默认参数下生成演示产物
    pub fn demo(data_dir: PathBuf, receptor: PathBuf, ligands: Vec<PathBuf>) -> Self {
        ComposeJob {
            data_dir,
            receptor,
            ligands,
            ligand_pattern: None,
            output: PathBuf::from(config::DEMO_ARTIFACT),
            identifier: None,
            title: "Docking poses".to_string(),
            ligand_representation: RepresentationKind::BallAndStick,
            zoom: CAMERA_ZOOM,
        }
    }
}

/// 执行 compose 命令
pub fn execute(args: ComposeArgs) -> Result<()> {
    output::print_header("Composing Docking Scene");

    let settings = args.assets.to_settings();
    let job = ComposeJob {
        data_dir: args.data_dir,
        receptor: args.receptor,
        ligands: args.ligands,
        ligand_pattern: args.ligand_pattern,
        output: args.output,
        identifier: args.identifier,
        title: args.title,
        ligand_representation: args.ligand_style.into(),
        zoom: args.zoom,
    };

    compose_artifact(&settings, &job)?;
    Ok(())
}

/// 组合并写出产物；受体缺失时返回 `Ok(None)`
pub fn compose_artifact(settings: &Settings, job: &ComposeJob) -> Result<Option<PathBuf>> {
    let artifact_name = artifact_file_name(&job.output)?;

    let ligands = match &job.ligand_pattern {
        Some(pattern) => LigandFinder::new(&job.data_dir)
            .with_pattern(pattern)?
            .merge_with(&job.ligands),
        None => job.ligands.clone(),
    };

    if ligands.is_empty() {
        output::print_warning("No ligand poses given, the scene will hold the receptor only.");
    } else {
        output::print_info(&format!("Overlaying {} ligand pose(s)", ligands.len()));
    }

    let composer = SceneComposer::new()
        .with_zoom(job.zoom)
        .with_ligand_representation(job.ligand_representation);

    let spinner = progress::create_spinner("Composing scene...");
    let scene = composer.compose(&job.data_dir, &job.receptor, &ligands);
    spinner.finish_and_clear();

    let scene = match scene? {
        Some(scene) => scene,
        None => {
            output::print_warning(&format!(
                "Protein file not found: {}",
                job.data_dir.join(&job.receptor).display()
            ));
            output::print_skip("No artifact written.");
            return Ok(None);
        }
    };

    report_scene(&scene, ligands.len());

    settings.ensure_assets_dir()?;
    let destination = settings.assets_dir.join(artifact_name);

    let options = HtmlOptions {
        title: job.title.clone(),
        identifier: job.identifier.clone(),
        marker_class: settings.marker_class.clone(),
        ..Default::default()
    };
    write_html(&scene, &destination, &options)?;

    output::print_written(
        &job.receptor.display().to_string(),
        &destination.display().to_string(),
    );
    output::print_link(
        "Artifact:",
        &link::resolve(&settings.assets_base_url(), artifact_name),
    );

    Ok(Some(destination))
}

fn report_scene(scene: &Scene, requested: usize) {
    for pose in &scene.poses {
        let label = if pose.label.is_empty() {
            "(no label)"
        } else {
            pose.label.as_str()
        };
        output::print_success(&format!(
            "{} [{}] {} atoms{}",
            pose.layer.source.display(),
            label,
            pose.layer.atom_count,
            format_properties(&pose.layer.properties)
        ));
    }

    let skipped = requested - scene.poses.len();
    if skipped > 0 {
        output::print_warning(&format!("{} ligand(s) skipped", skipped));
    }
    output::print_info(&format!(
        "{} layers, {} atoms in total",
        scene.layer_count(),
        scene.atom_count()
    ));
}

/// SDF 数据字段，如 ` (confidence=-1.77)`；无字段时为空串
fn format_properties(properties: &BTreeMap<String, String>) -> String {
    if properties.is_empty() {
        return String::new();
    }
    let fields: Vec<String> = properties
        .iter()
        .map(|(k, v)| format!("{}={}", k, v.lines().next().unwrap_or("")))
        .collect();
    format!(" ({})", fields.join(", "))
}

/// 产物必须是资源目录下的单个文件名
fn artifact_file_name(output: &Path) -> Result<&str> {
    let mut components = output.components();
    match (components.next(), components.next()) {
        (Some(std::path::Component::Normal(name)), None) => name.to_str().ok_or_else(|| {
            DockviewError::InvalidArgument(format!(
                "artifact name is not valid UTF-8: {}",
                output.display()
            ))
        }),
        _ => Err(DockviewError::InvalidArgument(format!(
            "artifact must be a plain file name, got '{}'",
            output.display()
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    const RECEPTOR: &str = "\
ATOM      1  N   ALA A   1      11.104   6.134  -6.504  1.00  0.00           N
ATOM      2  CA  ALA A   1      11.639   6.071  -5.147  1.00  0.00           C
END
";

    const LIGAND: &str = "\
ethanol
  dockview

  3  2  0  0  0  0  0  0  0  0999 V2000
    0.0000    0.0000    0.0000 C   0  0  0  0  0  0  0  0  0  0  0  0
    1.5000    0.0000    0.0000 C   0  0  0  0  0  0  0  0  0  0  0  0
    2.0000    1.2000    0.0000 O   0  0  0  0  0  0  0  0  0  0  0  0
  1  2  1  0
  2  3  1  0
M  END
$$$$
";

    fn settings_for(dir: &Path) -> Settings {
        Settings {
            assets_dir: dir.join("assets"),
            ..Default::default()
        }
    }

    #[test]
    fn test_artifact_file_name() {
        assert_eq!(
            artifact_file_name(Path::new("nglview_demo.html")).unwrap(),
            "nglview_demo.html"
        );
        assert!(artifact_file_name(Path::new("../escape.html")).is_err());
        assert!(artifact_file_name(Path::new("sub/demo.html")).is_err());
        assert!(artifact_file_name(Path::new("")).is_err());
    }

    #[test]
    fn test_format_properties() {
        assert_eq!(format_properties(&BTreeMap::new()), "");

        let mut props = BTreeMap::new();
        props.insert("confidence".to_string(), "-1.77".to_string());
        props.insert("note".to_string(), "first pose\nsecond line".to_string());
        assert_eq!(
            format_properties(&props),
            " (confidence=-1.77, note=first pose)"
        );
    }

    #[test]
    fn test_missing_receptor_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let settings = settings_for(dir.path());
        let job = ComposeJob::demo(
            dir.path().to_path_buf(),
            PathBuf::from("protein.pdb"),
            vec![PathBuf::from("rank1.sdf")],
        );

        let written = compose_artifact(&settings, &job).unwrap();
        assert!(written.is_none());
        assert!(!settings.assets_dir.exists());
    }

    #[test]
    fn test_compose_with_pattern_and_identifier() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("protein.pdb"), RECEPTOR).unwrap();
        fs::write(dir.path().join("rank1_confidence-1.77.sdf"), LIGAND).unwrap();
        fs::write(dir.path().join("rank2_confidence-0.05.sdf"), LIGAND).unwrap();

        let settings = settings_for(dir.path());
        let mut job = ComposeJob::demo(dir.path().to_path_buf(), PathBuf::from("protein.pdb"), vec![]);
        job.ligand_pattern = Some("rank*.sdf".to_string());
        job.identifier = Some("CCO".to_string());

        let written = compose_artifact(&settings, &job).unwrap().unwrap();
        assert_eq!(written, settings.assets_dir.join(config::DEMO_ARTIFACT));

        let html = fs::read_to_string(&written).unwrap();
        assert!(html.contains("Rank 1"));
        assert!(html.contains("Rank 2"));
        assert!(html.contains("<div class=\"smiles-entry\">CCO</div>"));
    }
}
