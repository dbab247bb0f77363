//! # 链接解析
//!
//! 将产物文件名拼接到对外的基础 URL 上。文件名经过百分号编码，
//! 普通文件名（字母、数字、`-`、`_`、`.`）保持不变。
//!
//! ## 依赖关系
//! - 被 `server/handlers.rs` 和 `commands/scan.rs` 使用
//! - 使用 `urlencoding`

use crate::config::Settings;

/// 拼接基础 URL 与文件名
pub fn resolve(base_url: &str, filename: &str) -> String {
    format!("{}{}", base_url, urlencoding::encode(filename))
}

/// 绑定了基础 URL 的解析器
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkResolver {
    base_url: String,
}

impl LinkResolver {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }

    /// 使用 `{prefix}/proxy/{port}/assets/` 作为基础 URL
    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(settings.assets_base_url())
    }

    pub fn resolve(&self, filename: &str) -> String {
        resolve(&self.base_url, filename)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_simple_filename() {
        assert_eq!(
            resolve("https://host/proxy/8000/assets/", "nglview_demo.html"),
            "https://host/proxy/8000/assets/nglview_demo.html"
        );
    }

    #[test]
    fn test_resolve_encodes_special_characters() {
        assert_eq!(
            resolve("/assets/", "pose #1 (rank1).html"),
            "/assets/pose%20%231%20%28rank1%29.html"
        );
    }

    #[test]
    fn test_resolver_from_settings() {
        let settings = Settings {
            base_prefix: "/user/alice".to_string(),
            ..Default::default()
        };
        let resolver = LinkResolver::from_settings(&settings);
        assert_eq!(
            resolver.resolve("nglview_demo.html"),
            "/user/alice/proxy/8000/assets/nglview_demo.html"
        );
    }
}
