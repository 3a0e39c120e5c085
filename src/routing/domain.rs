//! Host header → namespace resolution.
//!
//! # Responsibilities
//! - Normalize the host (lowercase, strip port and trailing dot)
//! - Match it against the configured base domain
//! - In sub-domain mode, turn the leftmost label into a bucket prefix
//!
//! # Design Decisions
//! - Only a single, DNS-valid label is accepted in front of the domain
//! - A host outside the domain is a `DomainMismatch`, never a default namespace

use crate::config::SiteConfig;
use crate::error::GatewayError;
use crate::routing::namespace::Namespace;

/// Resolves request hosts into namespaces. Built once at startup.
#[derive(Debug, Clone)]
pub struct DomainResolver {
    domain: String,
    bucket: String,
    base_prefix: String,
    subdomain_mode: bool,
}

impl DomainResolver {
    pub fn new(site: &SiteConfig) -> Self {
        let (bucket, base_prefix) = split_bucket_identifier(&site.bucket);
        Self {
            domain: normalize_host(&site.domain_name),
            bucket: bucket.to_string(),
            base_prefix: base_prefix.to_string(),
            subdomain_mode: site.subdomain_mode,
        }
    }

    /// The namespace served for the bare domain.
    pub fn root(&self) -> Namespace {
        Namespace::new(self.bucket.clone(), &self.base_prefix, None)
    }

    /// Resolve the namespace for a request's host header.
    pub fn resolve(&self, host: Option<&str>) -> Result<Namespace, GatewayError> {
        let raw = host.unwrap_or_default();
        let host = normalize_host(raw);
        let mismatch = || GatewayError::DomainMismatch {
            host: raw.to_string(),
            domain: self.domain.clone(),
        };

        if host == self.domain {
            return Ok(self.root());
        }

        let label = host
            .strip_suffix(self.domain.as_str())
            .and_then(|rest| rest.strip_suffix('.'))
            .ok_or_else(mismatch)?;

        if !is_dns_label(label) {
            return Err(mismatch());
        }

        if self.subdomain_mode {
            Ok(Namespace::new(self.bucket.clone(), &self.base_prefix, Some(label)))
        } else {
            Ok(self.root())
        }
    }
}

/// Split "bucket/base/prefix" into the bucket name and base prefix.
pub fn split_bucket_identifier(identifier: &str) -> (&str, &str) {
    let identifier = identifier.trim().trim_matches('/');
    identifier.split_once('/').unwrap_or((identifier, ""))
}

/// Lowercase, drop any port and a trailing root dot.
pub fn normalize_host(host: &str) -> String {
    let host = host.trim();
    let without_port = if host.starts_with('[') {
        // IPv6 literal, keep the brackets
        host.split_once(']')
            .map(|(addr, _)| &host[..=addr.len()])
            .unwrap_or(host)
    } else {
        host.rsplit_once(':')
            .filter(|(_, port)| port.chars().all(|c| c.is_ascii_digit()))
            .map_or(host, |(name, _)| name)
    };
    without_port.trim_end_matches('.').to_ascii_lowercase()
}

fn is_dns_label(label: &str) -> bool {
    !label.is_empty()
        && label.len() <= 63
        && !label.starts_with('-')
        && !label.ends_with('-')
        && label
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
}
