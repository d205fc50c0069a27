//! Hostname tenants.
//!
//! A tenant is a statically configured brand of the application served on its own
//! domain. It is not an organization: it only decides branding and who the owning
//! super-admin is. Requests on any other host run in default LMS mode.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;

use crate::config::TenancyConfig;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tenant {
    pub id: String,
    pub domain: String,
    pub name: String,
    pub owner_email: String,
}

impl Tenant {
    /// Case-insensitive match against the owning super-admin's e-mail.
    pub fn is_owned_by(&self, email: &str) -> bool {
        !email.is_empty() && self.owner_email.eq_ignore_ascii_case(email.trim())
    }
}

#[derive(Debug, Error)]
pub enum TenantConfigError {
    #[error("Cannot read tenants file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid tenants file: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("Tenant '{0}' has an empty domain")]
    EmptyDomain(String),

    #[error("Domain '{0}' is configured for more than one tenant")]
    DuplicateDomain(String),
}

#[derive(Debug, Deserialize)]
struct TenantsFile {
    #[serde(default)]
    tenants: Vec<Tenant>,
}

/// Immutable hostname -> tenant table, built once at startup.
#[derive(Debug, Clone, Default)]
pub struct TenantRegistry {
    by_host: HashMap<String, Tenant>,
}

impl TenantRegistry {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn new(tenants: Vec<Tenant>) -> Result<Self, TenantConfigError> {
        let mut by_host = HashMap::with_capacity(tenants.len());
        for tenant in tenants {
            let host = normalize_host(&tenant.domain);
            if host.is_empty() {
                return Err(TenantConfigError::EmptyDomain(tenant.id));
            }
            if by_host.contains_key(&host) {
                return Err(TenantConfigError::DuplicateDomain(host));
            }
            by_host.insert(host, tenant);
        }
        Ok(Self { by_host })
    }

    pub fn from_yaml_str(yaml: &str) -> Result<Self, TenantConfigError> {
        let file: TenantsFile = serde_yaml::from_str(yaml)?;
        Self::new(file.tenants)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, TenantConfigError> {
        let path = path.as_ref();
        let yaml = std::fs::read_to_string(path).map_err(|source| TenantConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_yaml_str(&yaml)
    }

    /// Registry from `TENANTS_FILE`; no file means every request runs in default mode.
    pub fn from_config(config: &TenancyConfig) -> Result<Self, TenantConfigError> {
        match config.tenants_file.as_deref() {
            Some(path) => {
                let registry = Self::from_file(path)?;
                tracing::info!("Loaded {} tenant(s) from {}", registry.len(), path);
                Ok(registry)
            }
            None => Ok(Self::empty()),
        }
    }

    /// Tenant configured for this Host header value. `None` means default LMS mode.
    pub fn resolve(&self, host: &str) -> Option<&Tenant> {
        self.by_host.get(&normalize_host(host))
    }

    /// All tenants, sorted by id
    pub fn list(&self) -> Vec<&Tenant> {
        let mut tenants: Vec<&Tenant> = self.by_host.values().collect();
        tenants.sort_by(|a, b| a.id.cmp(&b.id));
        tenants
    }

    pub fn len(&self) -> usize {
        self.by_host.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_host.is_empty()
    }
}

/// Lowercase, drop the port and any trailing dot.
fn normalize_host(host: &str) -> String {
    let host = host.trim();
    let without_port = match host.rsplit_once(':') {
        // Leave bracketed IPv6 literals without a port alone
        Some((name, port)) if !name.is_empty() && port.chars().all(|c| c.is_ascii_digit()) => name,
        _ => host,
    };
    without_port.trim_end_matches('.').to_ascii_lowercase()
}
