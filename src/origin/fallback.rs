//! Single-page-application fallback.
//!
//! A missing object is answered with the namespace's index document when
//! fallback is enabled and the request does not look like a static asset.
//! "Looks like an asset" is decided from the final path segment:
//!
//! - no extension (`/dashboard/`, `/users/42/`): a client-side route, falls back
//! - an extension, with no asset list configured: an asset, plain 404
//! - an extension, with an asset list configured: an asset only if listed
//!   (so `/users/jane.doe/` still reaches the index document)

use crate::config::SpaConfig;
use crate::routing::key::extension;
use crate::routing::ResolvedTarget;

#[derive(Debug, Clone)]
pub struct SpaPolicy {
    enabled: bool,
    index_document: String,
    asset_extensions: Vec<String>,
}

impl SpaPolicy {
    pub fn new(config: &SpaConfig) -> Self {
        Self {
            enabled: config.enabled,
            index_document: config.index_document.clone(),
            asset_extensions: config
                .asset_extensions
                .iter()
                .map(|e| e.trim().trim_start_matches('.').to_ascii_lowercase())
                .filter(|e| !e.is_empty())
                .collect(),
        }
    }

    pub fn index_document(&self) -> &str {
        &self.index_document
    }

    pub fn is_asset(&self, target: &ResolvedTarget) -> bool {
        if target.directory {
            return false;
        }
        let Some(ext) = target.file_name.as_deref().and_then(extension) else {
            return false;
        };
        self.asset_extensions.is_empty()
            || self
                .asset_extensions
                .iter()
                .any(|listed| listed.eq_ignore_ascii_case(ext))
    }

    /// Whether a miss on `target` should be answered with `index_key`.
    pub fn should_fallback(&self, target: &ResolvedTarget, index_key: &str) -> bool {
        self.enabled && !self.is_asset(target) && target.key != index_key
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::{resolve_target, Namespace};

    fn policy(enabled: bool, assets: &[&str]) -> SpaPolicy {
        SpaPolicy::new(&SpaConfig {
            enabled,
            index_document: "index.html".into(),
            asset_extensions: assets.iter().map(|s| s.to_string()).collect(),
        })
    }

    fn target(path: &str) -> ResolvedTarget {
        resolve_target(&Namespace::new("b", "", Some("t")), path, "index.html").unwrap()
    }

    #[test]
    fn test_client_routes_fall_back() {
        let p = policy(true, &[]);
        assert!(p.should_fallback(&target("/dashboard/"), "t/index.html"));
        assert!(p.should_fallback(&target("/users/42/"), "t/index.html"));
    }

    #[test]
    fn test_assets_do_not_fall_back() {
        let p = policy(true, &[]);
        assert!(!p.should_fallback(&target("/static/missing.js/"), "t/index.html"));
        assert!(!p.should_fallback(&target("/users/jane.doe/"), "t/index.html"));
    }

    #[test]
    fn test_asset_list_narrows_the_heuristic() {
        let p = policy(true, &["JS", ".css"]);
        assert!(p.is_asset(&target("/app.js/")));
        assert!(p.is_asset(&target("/app.CSS/")));
        assert!(!p.is_asset(&target("/users/jane.doe/")));
        assert!(p.should_fallback(&target("/users/jane.doe/"), "t/index.html"));
    }

    #[test]
    fn test_disabled_or_index_miss_never_falls_back() {
        assert!(!policy(false, &[]).should_fallback(&target("/dashboard/"), "t/index.html"));
        assert!(!policy(true, &[]).should_fallback(&target("/"), "t/index.html"));
    }
}
