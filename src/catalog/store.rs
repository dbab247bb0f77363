//! # 产物目录
//!
//! 持有扫描得到的 标识符 → 文件名 映射，负责刷新、查询和默认选择。
//! 文件系统本身是唯一数据源；每次刷新都会反映目录的当前内容。
//!
//! ## 缓存策略
//! - `Always`: 每次刷新都重新扫描（默认）
//! - `Fingerprint`: 候选文件的 (名称, 大小, 修改时间) 未变化时跳过重新读取
//!
//! 文件系统的修改时间精度可能很粗（部分文件系统为 1-2 秒），同一时间片内
//! 原地重写且大小不变的文件指纹不会变化。因此修改时间落在上次扫描开始前
//! `RACY_WINDOW` 以内的文件视为"可疑"，只要存在可疑文件就重新扫描。
//!
//! ## 依赖关系
//! - 被 `server/` 和 `commands/scan.rs` 使用
//! - 使用 `catalog/scanner.rs`

use crate::catalog::scanner::{IdentifierScanner, ScanReport};
use crate::error::Result;

use std::path::PathBuf;
use std::time::{Duration, SystemTime};
use tracing::debug;

/// 修改时间与扫描时间相距小于该值时不信任指纹
pub const RACY_WINDOW: Duration = Duration::from_secs(2);

/// 刷新时的缓存策略
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CachePolicy {
    #[default]
    Always,
    /// 指纹未变且没有近期修改的文件时复用上次结果，见 `RACY_WINDOW`
    Fingerprint,
}

/// 候选文件列表的指纹
type Fingerprint = Vec<(String, u64, Option<SystemTime>)>;

/// 产物目录
#[derive(Debug)]
pub struct ArtifactCatalog {
    directory: PathBuf,
    scanner: IdentifierScanner,
    policy: CachePolicy,
    report: ScanReport,
    fingerprint: Option<Fingerprint>,
    scanned_at: Option<SystemTime>,
}

impl ArtifactCatalog {
    /// 创建空目录；首次 `refresh` 之前查询结果为空
    pub fn new(directory: impl Into<PathBuf>, scanner: IdentifierScanner) -> Self {
        Self {
            directory: directory.into(),
            scanner,
            policy: CachePolicy::Always,
            report: ScanReport::default(),
            fingerprint: None,
            scanned_at: None,
        }
    }

    /// 创建并立即刷新
    pub fn open(directory: impl Into<PathBuf>, scanner: IdentifierScanner) -> Result<Self> {
        let mut catalog = Self::new(directory, scanner);
        catalog.refresh()?;
        Ok(catalog)
    }

    pub fn with_policy(mut self, policy: CachePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// 重新扫描目录
    pub fn refresh(&mut self) -> Result<()> {
        let fingerprint = match self.policy {
            CachePolicy::Always => None,
            CachePolicy::Fingerprint => Some(self.compute_fingerprint()),
        };

        if let Some(ref current) = fingerprint {
            if self.fingerprint.as_ref() == Some(current) && !self.has_racy_entry(current) {
                debug!("Catalog unchanged: {}", self.directory.display());
                return Ok(());
            }
        }

        let started = SystemTime::now();
        self.report = self.scanner.scan(&self.directory)?;
        self.fingerprint = fingerprint;
        self.scanned_at = Some(started);
        Ok(())
    }

    /// 是否有文件可能在上次扫描的同一时间片内被改写
    fn has_racy_entry(&self, fingerprint: &Fingerprint) -> bool {
        let Some(threshold) = self
            .scanned_at
            .and_then(|t| t.checked_sub(RACY_WINDOW))
        else {
            return true;
        };
        fingerprint
            .iter()
            .any(|(_, _, modified)| modified.map_or(true, |m| m >= threshold))
    }

    /// 按标识符查找文件名
    pub fn lookup(&self, identifier: &str) -> Option<&str> {
        self.report.entries.get(identifier).map(String::as_str)
    }

    /// 所有标识符（用于选择列表）
    pub fn all_identifiers(&self) -> Vec<&str> {
        self.report.entries.keys().map(String::as_str).collect()
    }

    /// 默认选择：第一个标识符；目录为空时为 None
    pub fn default_selection(&self) -> Option<&str> {
        self.report.entries.keys().next().map(String::as_str)
    }

    /// (标识符, 文件名) 列表
    pub fn entries(&self) -> impl Iterator<Item = (&str, &str)> {
        self.report
            .entries
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.report.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.report.entries.is_empty()
    }

    /// 最近一次扫描的完整结果
    pub fn last_report(&self) -> &ScanReport {
        &self.report
    }

    fn compute_fingerprint(&self) -> Fingerprint {
        self.scanner
            .candidates(&self.directory)
            .into_iter()
            .map(|path| {
                let name = path
                    .file_name()
                    .map(|n| n.to_string_lossy().to_string())
                    .unwrap_or_default();
                let meta = path.metadata().ok();
                let len = meta.as_ref().map(|m| m.len()).unwrap_or(0);
                let modified = meta.and_then(|m| m.modified().ok());
                (name, len, modified)
            })
            .collect()
    }
}
