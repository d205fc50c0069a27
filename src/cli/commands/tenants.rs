use clap::Subcommand;
use serde_json::{json, Value};

use crate::cli::utils::*;
use crate::cli::OutputFormat;
use crate::config::config;
use crate::tenant::TenantRegistry;

#[derive(Subcommand)]
pub enum TenantsCommands {
    #[command(about = "List configured tenants")]
    List {
        #[arg(long, help = "Tenants file (defaults to TENANTS_FILE)")]
        file: Option<String>,
    },

    #[command(about = "Show which tenant serves a host")]
    Resolve {
        #[arg(help = "Host header value, e.g. app.example-tenant.fr")]
        host: String,

        #[arg(long, help = "Tenants file (defaults to TENANTS_FILE)")]
        file: Option<String>,
    },
}

fn load_registry(file: Option<String>) -> anyhow::Result<TenantRegistry> {
    match file {
        Some(path) => Ok(TenantRegistry::from_file(path)?),
        None => Ok(TenantRegistry::from_config(&config().tenancy)?),
    }
}

pub fn handle(cmd: TenantsCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        TenantsCommands::List { file } => {
            let registry = load_registry(file)?;
            if registry.is_empty() {
                return output_empty_collection(output_format, "tenants", "No tenants configured");
            }

            let tenants = registry.list();
            let mut lines = vec![
                format!("{:<10} {:<30} {:<25} {}", "ID", "DOMAIN", "NAME", "OWNER"),
                "-".repeat(90),
            ];
            lines.extend(
                tenants
                    .iter()
                    .map(|t| format!("{:<10} {:<30} {:<25} {}", t.id, t.domain, t.name, t.owner_email)),
            );
            output_result(output_format, json!({ "tenants": tenants }), &lines)
        }
        TenantsCommands::Resolve { host, file } => {
            let registry = load_registry(file)?;
            let (data, lines) = resolve_report(&registry, &host);
            output_result(output_format, data, &lines)
        }
    }
}

/// JSON payload and text lines for `tenants resolve`
fn resolve_report(registry: &TenantRegistry, host: &str) -> (Value, Vec<String>) {
    match registry.resolve(host) {
        Some(tenant) => (
            json!({ "host": host, "tenant": tenant }),
            vec![format!("{} -> {} ({})", host, tenant.id, tenant.name)],
        ),
        None => (
            json!({ "host": host, "tenant": null }),
            vec![format!("{} -> default mode (no tenant)", host)],
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixtures() -> TenantRegistry {
        TenantRegistry::from_file("fixtures/tenants.yaml").unwrap()
    }

    #[test]
    fn resolve_reports_configured_tenant() {
        let (data, lines) = resolve_report(&fixtures(), "App.Example-Tenant.fr:443");
        assert_eq!(data["tenant"]["id"], "T1");
        assert_eq!(data["tenant"]["owner_email"], "owner@example-tenant.fr");
        assert_eq!(data["host"], "App.Example-Tenant.fr:443");
        assert!(lines[0].contains("-> T1"));
    }

    #[test]
    fn resolve_reports_default_mode_for_unknown_host() {
        let (data, lines) = resolve_report(&fixtures(), "random.test");
        assert!(data["tenant"].is_null());
        assert_eq!(lines, ["random.test -> default mode (no tenant)"]);
    }

    #[test]
    fn explicit_file_overrides_configured_one() {
        let registry = load_registry(Some("fixtures/tenants.yaml".to_string())).unwrap();
        assert_eq!(registry.len(), 1);
        assert!(load_registry(Some("fixtures/missing.yaml".to_string())).is_err());
    }
}
