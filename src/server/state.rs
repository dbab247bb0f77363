//! # 服务器共享状态
//!
//! 保存运行配置、链接解析器和产物目录，注入每个 axum handler。
//!
//! ## 依赖关系
//! - 被 `server/router.rs`, `server/handlers.rs` 使用
//! - 使用 `catalog/`, `config.rs`

use crate::catalog::{ArtifactCatalog, CachePolicy, IdentifierScanner, LinkResolver};
use crate::config::Settings;
use crate::error::{DockviewError, Result};

use std::fs;
use std::sync::{Arc, Mutex, MutexGuard};

/// 服务器状态
pub struct AppState {
    pub settings: Settings,
    pub links: LinkResolver,
    /// 每次页面渲染时刷新，在 `spawn_blocking` 中加锁访问
    pub catalog: Mutex<ArtifactCatalog>,
}

/// 某一时刻的资源目录视图
#[derive(Debug, Clone, Default)]
pub struct CatalogSnapshot {
    /// (标识符, 文件名)，按标识符排序
    pub entries: Vec<(String, String)>,
    /// 资源目录中的全部普通文件，已排序
    pub assets: Vec<String>,
    /// 选择列表的默认项
    pub default_selection: Option<String>,
}

impl AppState {
    pub fn new(settings: Settings) -> Result<Self> {
        let scanner = IdentifierScanner::from_settings(&settings)?;
        let catalog = ArtifactCatalog::new(settings.assets_dir.clone(), scanner)
            .with_policy(CachePolicy::Fingerprint);
        let links = LinkResolver::from_settings(&settings);

        Ok(Self {
            settings,
            links,
            catalog: Mutex::new(catalog),
        })
    }

    /// 刷新目录并列出资源文件（阻塞调用）
    pub fn snapshot(&self) -> Result<CatalogSnapshot> {
        let (entries, default_selection) = {
            let mut catalog = self.lock_catalog()?;
            catalog.refresh()?;
            let entries = catalog
                .all_identifiers()
                .into_iter()
                .filter_map(|id| {
                    catalog
                        .lookup(id)
                        .map(|file| (id.to_string(), file.to_string()))
                })
                .collect();
            (entries, catalog.default_selection().map(str::to_string))
        };

        let mut assets: Vec<String> = match fs::read_dir(&self.settings.assets_dir) {
            Ok(dir) => dir
                .filter_map(|e| e.ok())
                .filter(|e| e.path().is_file())
                .map(|e| e.file_name().to_string_lossy().to_string())
                .collect(),
            Err(_) => Vec::new(),
        };
        assets.sort();

        Ok(CatalogSnapshot {
            entries,
            assets,
            default_selection,
        })
    }

    /// 刷新目录并按标识符查找文件名（阻塞调用）
    pub fn lookup(&self, identifier: &str) -> Result<Option<String>> {
        let mut catalog = self.lock_catalog()?;
        catalog.refresh()?;
        Ok(catalog.lookup(identifier).map(str::to_string))
    }

    fn lock_catalog(&self) -> Result<MutexGuard<'_, ArtifactCatalog>> {
        self.catalog
            .lock()
            .map_err(|_| DockviewError::ServerError("catalog lock poisoned".to_string()))
    }
}

pub type SharedState = Arc<AppState>;
