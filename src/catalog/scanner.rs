//! # 标识符扫描器
//!
//! 扫描产物目录（不递归），从每个文件内容中提取嵌入的标识符，
//! 建立 标识符 → 文件名 的映射。
//!
//! ## 匹配规则
//! - 只考虑后缀匹配的普通文件（默认 `.html`，大小写不敏感）
//! - 标记形如 `<div class="smiles-entry">CCO</div>`，标签大小写不敏感；
//!   class 属性可以含多个类名，只要其中一个等于标记类名
//! - 只取第一个匹配，去除首尾空白
//! - 文件按文件名字典序处理，重复标识符由靠后的文件覆盖
//!
//! ## 依赖关系
//! - 被 `catalog/store.rs` 和 `commands/scan.rs` 调用
//! - 使用 `walkdir` 遍历目录，`rayon` 并行读取，`regex` 匹配

use crate::config::Settings;
use crate::error::{DockviewError, Result};

use rayon::prelude::*;
use regex::Regex;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, warn};
use walkdir::WalkDir;

/// 单个文件的扫描结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileOutcome {
    /// 找到标识符
    Matched(String),
    /// 无标记（不是错误）
    Unmatched,
    /// 读取失败
    Unreadable(String),
}

/// 被后续文件覆盖的重复标识符
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShadowedEntry {
    pub identifier: String,
    /// 被覆盖的文件
    pub filename: String,
    /// 最终保留的文件
    pub winner: String,
}

/// 扫描结果汇总
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanReport {
    /// 标识符 → 文件名
    pub entries: BTreeMap<String, String>,
    /// 重复标识符中被覆盖的条目
    pub shadowed: Vec<ShadowedEntry>,
    /// 无标记的文件
    pub unmatched: Vec<String>,
    /// 读取失败的文件及原因
    pub unreadable: Vec<(String, String)>,
}

impl ScanReport {
    /// 按扫描顺序合并单个文件结果
    pub fn merge(&mut self, filename: String, outcome: FileOutcome) {
        match outcome {
            FileOutcome::Matched(identifier) => {
                if let Some(previous) = self.entries.insert(identifier.clone(), filename.clone()) {
                    warn!(
                        "Identifier '{}' found in both '{}' and '{}'; keeping '{}'",
                        identifier, previous, filename, filename
                    );
                    self.shadowed.push(ShadowedEntry {
                        identifier,
                        filename: previous,
                        winner: filename,
                    });
                }
            }
            FileOutcome::Unmatched => self.unmatched.push(filename),
            FileOutcome::Unreadable(reason) => self.unreadable.push((filename, reason)),
        }
    }

    /// 扫描过的候选文件数
    pub fn total(&self) -> usize {
        self.entries.len() + self.shadowed.len() + self.unmatched.len() + self.unreadable.len()
    }
}

/// 标识符扫描器
#[derive(Debug, Clone)]
pub struct IdentifierScanner {
    /// 小写后缀列表
    extensions: Vec<String>,
    marker: Regex,
    /// 专用线程池；None 时使用 rayon 全局线程池
    pool: Option<Arc<rayon::ThreadPool>>,
}

impl IdentifierScanner {
    /// 按 class 名创建扫描器
    pub fn new(marker_class: &str) -> Result<Self> {
        let pattern = format!(
            r#"(?is)<div\b[^>]*\bclass\s*=\s*["'](?:[^"']*\s)?{}(?:\s[^"']*)?["'][^>]*>(.*?)</div\s*>"#,
            regex::escape(marker_class)
        );
        let marker = Regex::new(&pattern).map_err(|e| DockviewError::InvalidPattern {
            pattern: marker_class.to_string(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            extensions: vec![".html".to_string()],
            marker,
            pool: None,
        })
    }

    /// 从运行配置创建
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        Ok(Self::new(&settings.marker_class)?.with_extensions(&settings.artifact_extensions))
    }

    /// 设置后缀过滤
    pub fn with_extensions(mut self, extensions: &[String]) -> Self {
        if !extensions.is_empty() {
            self.extensions = extensions.iter().map(|e| e.to_lowercase()).collect();
        }
        self
    }

    /// 设置并行线程数（0 = CPU 核心数），线程池只在这里创建一次
    pub fn with_jobs(mut self, jobs: usize) -> Self {
        let threads = if jobs == 0 { num_cpus::get() } else { jobs };
        match rayon::ThreadPoolBuilder::new().num_threads(threads).build() {
            Ok(pool) => self.pool = Some(Arc::new(pool)),
            Err(e) => warn!("Cannot build {}-thread pool, using global pool: {}", threads, e),
        }
        self
    }

    /// 实际使用的线程数
    pub fn threads(&self) -> usize {
        self.pool
            .as_ref()
            .map(|p| p.current_num_threads())
            .unwrap_or_else(rayon::current_num_threads)
    }

    /// 文件名是否匹配后缀过滤
    pub fn accepts(&self, filename: &str) -> bool {
        let lower = filename.to_lowercase();
        self.extensions.iter().any(|ext| lower.ends_with(ext.as_str()))
    }

    /// 收集候选文件，按文件名排序
    pub fn candidates(&self, directory: &Path) -> Vec<PathBuf> {
        let mut files: Vec<PathBuf> = WalkDir::new(directory)
            .min_depth(1)
            .max_depth(1)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .filter(|e| e.file_name().to_str().map(|n| self.accepts(n)).unwrap_or(false))
            .map(|e| e.into_path())
            .collect();

        files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
        files
    }

    /// 提取文本中第一个标识符
    pub fn extract_identifier(&self, text: &str) -> Option<String> {
        let caps = self.marker.captures(text)?;
        let inner = decode_entities(caps.get(1)?.as_str().trim());
        if inner.is_empty() {
            None
        } else {
            Some(inner)
        }
    }

    /// 扫描单个文件
    pub fn scan_file(&self, path: &Path) -> FileOutcome {
        let bytes = match fs::read(path) {
            Ok(b) => b,
            Err(e) => return FileOutcome::Unreadable(e.to_string()),
        };
        let text = match String::from_utf8(bytes) {
            Ok(t) => t,
            Err(e) => return FileOutcome::Unreadable(format!("invalid UTF-8: {}", e)),
        };

        match self.extract_identifier(&text) {
            Some(id) => FileOutcome::Matched(id),
            None => FileOutcome::Unmatched,
        }
    }

    /// 扫描目录，目录不存在时返回空结果
    pub fn scan(&self, directory: &Path) -> Result<ScanReport> {
        if !directory.is_dir() {
            warn!("Assets directory not found: {}", directory.display());
            return Ok(ScanReport::default());
        }

        let files = self.candidates(directory);
        debug!(
            "Scanning {} candidate files in {} ({} threads)",
            files.len(),
            directory.display(),
            self.threads()
        );

        // par_iter().collect() 保持输入顺序
        let read_all = || -> Vec<(String, FileOutcome)> {
            files
                .par_iter()
                .map(|path| {
                    let filename = path
                        .file_name()
                        .map(|n| n.to_string_lossy().to_string())
                        .unwrap_or_default();
                    (filename, self.scan_file(path))
                })
                .collect()
        };
        let outcomes = match &self.pool {
            Some(pool) => pool.install(read_all),
            None => read_all(),
        };

        let mut report = ScanReport::default();
        for (filename, outcome) in outcomes {
            if let FileOutcome::Unreadable(reason) = &outcome {
                warn!("Skipping unreadable artifact {}: {}", filename, reason);
            }
            report.merge(filename, outcome);
        }

        Ok(report)
    }
}

/// 还原转义过的 HTML 实体（`&amp;` 最后处理）
fn decode_entities(text: &str) -> String {
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scanner() -> IdentifierScanner {
        IdentifierScanner::new("smiles-entry").unwrap().with_jobs(2)
    }

    #[test]
    fn test_scan_three_files() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("a.html"),
            "<html><div class=\"smiles-entry\">CCO</div></html>",
        )
        .unwrap();
        fs::write(
            dir.path().join("b.html"),
            "<html><div class=\"smiles-entry\">CCN</div></html>",
        )
        .unwrap();
        fs::write(dir.path().join("c.html"), "<html><p>nothing</p></html>").unwrap();

        let report = scanner().scan(dir.path()).unwrap();
        assert_eq!(report.entries.len(), 2);
        assert_eq!(report.entries.get("CCO").map(String::as_str), Some("a.html"));
        assert_eq!(report.entries.get("CCN").map(String::as_str), Some("b.html"));
        assert_eq!(report.unmatched, vec!["c.html".to_string()]);
        assert_eq!(report.total(), 3);
    }

    #[test]
    fn test_scan_empty_directory() {
        let dir = tempfile::tempdir().unwrap();
        let report = scanner().scan(dir.path()).unwrap();
        assert!(report.entries.is_empty());
        assert_eq!(report.total(), 0);
    }

    #[test]
    fn test_scan_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let report = scanner().scan(&dir.path().join("missing")).unwrap();
        assert_eq!(report, ScanReport::default());
    }

    #[test]
    fn test_scan_filters_extension_and_depth() {
        let dir = tempfile::tempdir().unwrap();
        let marker = "<div class=\"smiles-entry\">CCO</div>";
        fs::write(dir.path().join("notes.txt"), marker).unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();
        fs::write(dir.path().join("sub").join("deep.html"), marker).unwrap();
        fs::write(dir.path().join("UPPER.HTML"), marker).unwrap();

        let report = scanner().scan(dir.path()).unwrap();
        assert_eq!(report.entries.len(), 1);
        assert_eq!(report.entries["CCO"], "UPPER.HTML");
    }

    #[test]
    fn test_duplicate_identifier_last_filename_wins() {
        let dir = tempfile::tempdir().unwrap();
        let marker = "<div class=\"smiles-entry\">c1ccccc1</div>";
        fs::write(dir.path().join("b_pose.html"), marker).unwrap();
        fs::write(dir.path().join("a_pose.html"), marker).unwrap();

        let report = scanner().scan(dir.path()).unwrap();
        assert_eq!(report.entries["c1ccccc1"], "b_pose.html");
        assert_eq!(report.shadowed.len(), 1);
        assert_eq!(report.shadowed[0].filename, "a_pose.html");
        assert_eq!(report.shadowed[0].winner, "b_pose.html");
    }

    #[test]
    fn test_unreadable_file_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("bad.html"), [0xff, 0xfe, 0x00, 0x80]).unwrap();
        fs::write(
            dir.path().join("good.html"),
            "<div class=\"smiles-entry\">CCO</div>",
        )
        .unwrap();

        let report = scanner().scan(dir.path()).unwrap();
        assert_eq!(report.entries.len(), 1);
        assert_eq!(report.unreadable.len(), 1);
        assert_eq!(report.unreadable[0].0, "bad.html");
    }

    #[test]
    fn test_extract_first_match_trimmed() {
        let s = scanner();
        let text = "<DIV Class='smiles-entry' id=x>\n  CC(=O)O \n</DIV><div class=\"smiles-entry\">CCN</div>";
        assert_eq!(s.extract_identifier(text).as_deref(), Some("CC(=O)O"));
    }

    #[test]
    fn test_extract_ignores_other_classes_and_empty() {
        let s = scanner();
        assert_eq!(s.extract_identifier("<div class=\"smiles\">CCO</div>"), None);
        assert_eq!(s.extract_identifier("<div class=\"smiles-entry\">  </div>"), None);
    }

    #[test]
    fn test_extract_marker_among_other_classes() {
        let s = scanner();
        let text = "<div class=\"card smiles-entry mono\">CCO</div>";
        assert_eq!(s.extract_identifier(text).as_deref(), Some("CCO"));
        assert_eq!(
            s.extract_identifier("<div class='smiles-entry\tmono'>CCN</div>").as_deref(),
            Some("CCN")
        );
        assert_eq!(
            s.extract_identifier("<div class=\"mono smiles-entry\">C</div>").as_deref(),
            Some("C")
        );
    }

    #[test]
    fn test_extract_requires_whole_class_token() {
        let s = scanner();
        assert_eq!(s.extract_identifier("<div class=\"smiles-entry-x\">CCO</div>"), None);
        assert_eq!(s.extract_identifier("<div class=\"old-smiles-entry\">CCO</div>"), None);
    }

    #[test]
    fn test_pool_is_built_once_and_reused() {
        let s = IdentifierScanner::new("smiles-entry").unwrap().with_jobs(3);
        assert_eq!(s.threads(), 3);

        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.html"), "<div class=\"smiles-entry\">CCO</div>").unwrap();
        let cloned = s.clone();
        assert_eq!(s.scan(dir.path()).unwrap(), cloned.scan(dir.path()).unwrap());
        assert!(Arc::ptr_eq(s.pool.as_ref().unwrap(), cloned.pool.as_ref().unwrap()));

        let global = IdentifierScanner::new("smiles-entry").unwrap();
        assert!(global.pool.is_none());
        assert_eq!(global.scan(dir.path()).unwrap().entries["CCO"], "a.html");
    }

    #[test]
    fn test_extract_decodes_entities() {
        let s = scanner();
        let text = "<div class=\"smiles-entry\">[NH3+]C&amp;C</div>";
        assert_eq!(s.extract_identifier(text).as_deref(), Some("[NH3+]C&C"));
    }

    #[test]
    fn test_custom_marker_and_extensions() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("x.htm"),
            "<div class=\"inchi-key\">LFQSCWFLJHTTHZ</div>",
        )
        .unwrap();

        let s = IdentifierScanner::new("inchi-key")
            .unwrap()
            .with_extensions(&[".htm".to_string()]);
        let report = s.scan(dir.path()).unwrap();
        assert_eq!(report.entries["LFQSCWFLJHTTHZ"], "x.htm");
    }
}
