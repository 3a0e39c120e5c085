//! Build-time version stamping.
//!
//! Set `FRONTEND_PROXY_COMMIT` and `FRONTEND_PROXY_BUILD_DATE` when compiling
//! release artifacts; both default to "unknown".

use serde::Serialize;
use std::sync::LazyLock;

pub const COMMIT: &str = match option_env!("FRONTEND_PROXY_COMMIT") {
    Some(commit) => commit,
    None => "unknown",
};

pub const BUILD_DATE: &str = match option_env!("FRONTEND_PROXY_BUILD_DATE") {
    Some(date) => date,
    None => "unknown",
};

static VERSION: LazyLock<String> = LazyLock::new(|| format!("{COMMIT}_{BUILD_DATE}"));

/// Running build version, `<commit>_<build_date>`.
pub fn version() -> &'static str {
    VERSION.as_str()
}

/// Build metadata attached to the startup log.
#[derive(Debug, Clone, Serialize)]
pub struct BuildInfo {
    pub package_version: &'static str,
    pub commit: &'static str,
    pub build_date: &'static str,
}

pub fn info() -> BuildInfo {
    BuildInfo {
        package_version: env!("CARGO_PKG_VERSION"),
        commit: COMMIT,
        build_date: BUILD_DATE,
    }
}
