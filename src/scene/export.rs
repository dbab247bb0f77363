//! # 场景导出
//!
//! 将组合好的场景写成独立的 HTML 产物。页面从 CDN 加载 NGL Viewer，
//! 场景（结构文本、表示方式、标签、相机）以 JSON 形式内嵌，
//! 可直接用浏览器打开或经 `/assets/{filename}` 提供。
//!
//! 若指定了标识符，页面中会嵌入
//! `<div class="smiles-entry">IDENT</div>`，供目录扫描器建立索引。
//!
//! 写入是原子的：先写入同目录下的临时文件，再重命名覆盖目标。
//!
//! ## 依赖关系
//! - 被 `commands/compose.rs` 调用
//! - 使用 `models/scene.rs`
//! - 使用 `serde_json` 和 `tempfile`

use crate::error::{DockviewError, Result};
use crate::models::Scene;

use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

/// 默认的 NGL 脚本地址
pub const NGL_CDN_URL: &str = "https://cdn.jsdelivr.net/npm/ngl@2.3.1/dist/ngl.js";

/// HTML 导出选项
#[derive(Debug, Clone)]
pub struct HtmlOptions {
    pub title: String,
    /// 嵌入的标识符（如 SMILES）
    pub identifier: Option<String>,
    /// 标识符标记使用的 class 名
    pub marker_class: String,
    pub ngl_url: String,
}

impl Default for HtmlOptions {
    fn default() -> Self {
        HtmlOptions {
            title: "Docking poses".to_string(),
            identifier: None,
            marker_class: "smiles-entry".to_string(),
            ngl_url: NGL_CDN_URL.to_string(),
        }
    }
}

/// 将场景渲染为 HTML 字符串
pub fn to_html_string(scene: &Scene, options: &HtmlOptions) -> Result<String> {
    // "</" 必须转义，否则结构文本可能提前关闭 <script>
    let scene_json = serde_json::to_string(scene)?.replace("</", "<\\/");
    let title = escape_html(&options.title);

    let marker = match &options.identifier {
        Some(id) => format!(
            "<div class=\"{}\">{}</div>\n",
            escape_html(&options.marker_class),
            escape_html(id.trim())
        ),
        None => String::new(),
    };

    let mut html = String::new();
    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    html.push_str("<meta charset=\"UTF-8\">\n");
    html.push_str(&format!("<title>{}</title>\n", title));
    html.push_str(&format!("<script src=\"{}\"></script>\n", options.ngl_url));
    html.push_str(
        "<style>\n\
         html, body { margin: 0; height: 100%; font-family: sans-serif; }\n\
         #viewport { width: 100%; height: 90vh; }\n\
         .smiles-entry { padding: 4px 8px; font-family: monospace; }\n\
         </style>\n",
    );
    html.push_str("</head>\n<body>\n");
    html.push_str(&format!("<h3>{}</h3>\n", title));
    html.push_str(&marker);
    html.push_str("<div id=\"viewport\"></div>\n");
    html.push_str(&format!(
        "<script type=\"application/json\" id=\"scene-data\">{}</script>\n",
        scene_json
    ));
    html.push_str("<script>\n");
    html.push_str(LOADER_JS);
    html.push_str("</script>\n</body>\n</html>\n");

    Ok(html)
}

/// 原子写入 HTML 产物
///
/// 失败时目标文件保持原样（不存在则仍不存在）。
pub fn write_html(scene: &Scene, destination: &Path, options: &HtmlOptions) -> Result<()> {
    let html = to_html_string(scene, options)?;

    let parent = match destination.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };

    let write_err = |e: std::io::Error| DockviewError::FileWriteError {
        path: destination.display().to_string(),
        source: e,
    };

    let mut tmp = NamedTempFile::new_in(parent).map_err(write_err)?;
    tmp.write_all(html.as_bytes()).map_err(write_err)?;
    tmp.as_file().sync_all().map_err(write_err)?;

    tmp.persist(destination)
        .map_err(|e| DockviewError::PersistError {
            path: destination.display().to_string(),
            source: e.error,
        })?;

    Ok(())
}

/// 转义 HTML 文本中的特殊字符
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

const LOADER_JS: &str = r#"(function () {
  var scene = JSON.parse(document.getElementById("scene-data").textContent);
  var stage = new NGL.Stage("viewport", { backgroundColor: "white" });
  window.addEventListener("resize", function () { stage.handleResize(); }, false);

  function load(layer) {
    var blob = new Blob([layer.content], { type: "text/plain" });
    return stage.loadFile(blob, { ext: layer.format }).then(function (comp) {
      layer.representations.forEach(function (repr) {
        var params = { sele: repr.selection };
        if (repr.color === "element") {
          params.colorScheme = "element";
        } else {
          params.color = repr.color;
        }
        comp.addRepresentation(repr.kind, params);
      });
      return comp;
    });
  }

  var layers = [scene.receptor].concat(scene.poses.map(function (p) { return p.layer; }));
  Promise.all(layers.map(load)).then(function () {
    var shape = new NGL.Shape("labels");
    scene.labels.forEach(function (label) {
      shape.addText(label.position, label.color, label.size, label.text);
    });
    stage.addComponentFromObject(shape).addRepresentation("buffer");
    stage.autoView();
    var c = scene.camera.center;
    stage.viewerControls.center(new NGL.Vector3(c[0], c[1], c[2]));
    stage.viewerControls.zoom(scene.camera.zoom);
  });
})();
"#;
