//! Namespaces and resolved object targets.

use std::fmt;

/// The scope a request's object lookups are confined to: a bucket plus a key prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Namespace {
    bucket: String,
    /// Empty, or ends with '/'.
    prefix: String,
    label: Option<String>,
}

impl Namespace {
    /// Build a namespace from the bucket, a base prefix and an optional subdomain label.
    pub fn new(bucket: impl Into<String>, base_prefix: &str, label: Option<&str>) -> Self {
        let mut prefix = String::new();
        for part in base_prefix.split('/').chain(label) {
            if !part.is_empty() {
                prefix.push_str(part);
                prefix.push('/');
            }
        }
        Self {
            bucket: bucket.into(),
            prefix,
            label: label.map(str::to_string),
        }
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Subdomain label, `None` for the apex/root namespace.
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// Full store key for a key relative to this namespace.
    pub fn key(&self, relative: &str) -> String {
        format!("{}{}", self.prefix, relative)
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.bucket, self.prefix)
    }
}

/// Bucket and object key for one lookup, consumed by the object server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedTarget {
    pub bucket: String,
    pub key: String,
    /// Final path segment, `None` when the path is the namespace root.
    pub file_name: Option<String>,
    /// True when the path named a directory and `key` points at its index document.
    pub directory: bool,
}
