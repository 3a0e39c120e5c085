//! Normalized path → object key mapping.
//!
//! # Rules
//! - Path segments become key segments; empty segments are dropped
//! - Segments are percent-decoded before checking, so `%2e%2e` is caught too
//! - `.`/`..` segments, backslashes and NUL bytes are rejected as `MalformedPath`
//! - A final segment with an extension names a file; anything else is a
//!   directory and maps to its index document
//! - The namespace root maps to the index document

use percent_encoding::percent_decode_str;

use crate::error::GatewayError;
use crate::routing::namespace::{Namespace, ResolvedTarget};

/// Map a normalized request path onto a key inside `namespace`.
pub fn resolve_target(
    namespace: &Namespace,
    normalized_path: &str,
    index_document: &str,
) -> Result<ResolvedTarget, GatewayError> {
    let segments = decode_segments(normalized_path)?;

    let Some(last) = segments.last() else {
        return Ok(ResolvedTarget {
            bucket: namespace.bucket().to_string(),
            key: namespace.key(index_document),
            file_name: None,
            directory: true,
        });
    };

    let file_name = last.clone();
    let relative = segments.join("/");
    let directory = extension(&file_name).is_none();
    let key = if directory {
        namespace.key(&format!("{relative}/{index_document}"))
    } else {
        namespace.key(&relative)
    };

    Ok(ResolvedTarget {
        bucket: namespace.bucket().to_string(),
        key,
        file_name: Some(file_name),
        directory,
    })
}

/// Decode and validate every non-empty segment of `path`.
fn decode_segments(path: &str) -> Result<Vec<String>, GatewayError> {
    let malformed = || GatewayError::MalformedPath(path.to_string());
    let mut segments = Vec::new();

    for raw in path.split('/').filter(|s| !s.is_empty()) {
        let segment = percent_decode_str(raw)
            .decode_utf8()
            .map_err(|_| malformed())?;
        if segment == "."
            || segment == ".."
            || segment.contains(['/', '\\', '\0'])
        {
            return Err(malformed());
        }
        segments.push(segment.into_owned());
    }

    Ok(segments)
}

/// The extension of a file name, ignoring leading dots (".env" has none).
pub fn extension(file_name: &str) -> Option<&str> {
    let trimmed = file_name.trim_start_matches('.');
    match trimmed.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() && !ext.is_empty() => Some(ext),
        _ => None,
    }
}
