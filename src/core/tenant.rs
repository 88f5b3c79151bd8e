//! Host header → tenant resolution and internal path rewriting.

use regex::Regex;
use std::collections::HashSet;
use std::net::IpAddr;
use std::sync::LazyLock;

/// Internal prefix every tenant request is rewritten under.
pub const SITES_PREFIX: &str = "/sites";

/// Labels reserved for the platform itself; never tenant subdomains.
pub const DEFAULT_RESERVED_SUBDOMAINS: [&str; 18] = [
    "www",
    "db",
    "npm",
    "portainer",
    "docs",
    "app",
    "builder",
    "admin",
    "api",
    "mail",
    "ftp",
    "cpanel",
    "webmail",
    "server",
    "public",
    "dev",
    "staging",
    "test",
];

/// Paths that are never rewritten into a tenant namespace. `/sites` is not
/// among them: on a tenant host it is namespaced like any other path.
pub const RESERVED_PATH_PREFIXES: [&str; 6] = [
    "/api",
    "/static",
    "/_next",
    "/favicon.ico",
    "/icon.svg",
    "/healthz",
];

static LABEL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-z0-9](?:[a-z0-9-]{0,61}[a-z0-9])?$").expect("label pattern is valid")
});

pub fn is_valid_label(label: &str) -> bool {
    LABEL.is_match(label)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TenantResolution {
    pub tenant_id: Option<String>,
    pub is_root_traffic: bool,
}

impl TenantResolution {
    pub fn root() -> Self {
        Self {
            tenant_id: None,
            is_root_traffic: true,
        }
    }

    pub fn tenant(id: impl Into<String>) -> Self {
        Self {
            tenant_id: Some(id.into()),
            is_root_traffic: false,
        }
    }

    pub fn invalid() -> Self {
        Self {
            tenant_id: None,
            is_root_traffic: false,
        }
    }

    /// Neither root traffic nor a tenant.
    pub fn is_invalid(&self) -> bool {
        self.tenant_id.is_none() && !self.is_root_traffic
    }
}

/// Resolves hosts against one root domain and a reserved label set.
#[derive(Debug, Clone)]
pub struct HostResolver {
    root_domain: String,
    reserved: HashSet<String>,
}

impl HostResolver {
    pub fn new<I, S>(root_domain: &str, reserved: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            root_domain: normalize_host(root_domain),
            reserved: reserved
                .into_iter()
                .map(|label| label.as_ref().trim().to_ascii_lowercase())
                .filter(|label| !label.is_empty())
                .collect(),
        }
    }

    pub fn with_default_reserved(root_domain: &str) -> Self {
        Self::new(root_domain, DEFAULT_RESERVED_SUBDOMAINS)
    }

    pub fn root_domain(&self) -> &str {
        &self.root_domain
    }

    pub fn resolve(&self, host_header: &str) -> TenantResolution {
        let host = normalize_host(host_header);
        let root = self.root_domain.as_str();

        if host.is_empty() {
            return TenantResolution::invalid();
        }

        if host == root || host == "localhost" || host == format!("www.{}", root) {
            return TenantResolution::root();
        }

        // Direct IP access (load balancer probes) is platform traffic.
        if host.trim_start_matches('[').trim_end_matches(']').parse::<IpAddr>().is_ok() {
            return TenantResolution::root();
        }

        let labels: Vec<&str> = host.split('.').collect();

        if let Some(prefix) = host.strip_suffix(root).and_then(|p| p.strip_suffix('.')) {
            // Exactly one label in front of the root domain.
            if prefix.contains('.') || !is_valid_label(prefix) {
                return TenantResolution::invalid();
            }
            if self.reserved.contains(prefix) {
                return TenantResolution::root();
            }
            return TenantResolution::tenant(prefix);
        }

        // Hosts outside the root domain (dev hosts such as jane.localhost)
        if labels.len() >= 2 && labels.iter().all(|label| is_valid_label(label)) {
            let tenant = labels[0];
            if self.reserved.contains(tenant) {
                return TenantResolution::root();
            }
            return TenantResolution::tenant(tenant);
        }

        TenantResolution::invalid()
    }
}

/// Resolve with the default reserved labels.
pub fn resolve_tenant(host_header: &str, root_domain: &str) -> TenantResolution {
    HostResolver::with_default_reserved(root_domain).resolve(host_header)
}

/// Lowercase, drop any `:port` and a trailing dot.
fn normalize_host(host: &str) -> String {
    let host = host.trim().to_ascii_lowercase();
    let host = match host.rsplit_once(':') {
        Some((name, port)) if port.chars().all(|c| c.is_ascii_digit()) => name.to_string(),
        _ => host,
    };
    host.trim_end_matches('.').to_string()
}

pub fn is_reserved_path(path: &str) -> bool {
    RESERVED_PATH_PREFIXES.iter().any(|prefix| {
        path == *prefix
            || path
                .strip_prefix(prefix)
                .is_some_and(|rest| rest.starts_with('/'))
    })
}

/// Namespace `path` under the tenant, or `None` if it must not be rewritten.
pub fn rewrite_path(tenant_id: &str, path: &str) -> Option<String> {
    if is_reserved_path(path) {
        return None;
    }
    let path = if path.is_empty() { "/" } else { path };
    if path == "/" {
        Some(format!("{}/{}", SITES_PREFIX, tenant_id))
    } else {
        Some(format!("{}/{}{}", SITES_PREFIX, tenant_id, path))
    }
}
