//! Liveness exemption.

/// Paths under this prefix bypass logging, resolution and object serving.
pub const HEALTHZ_PREFIX: &str = "/healthz";

pub fn is_exempt(path: &str) -> bool {
    path.starts_with(HEALTHZ_PREFIX)
}
