use clap::Args;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::access::{destination, failure_destination, AccessError, OrgResolver};
use crate::auth::Identity;
use crate::cli::utils::{output_failure, output_result};
use crate::cli::OutputFormat;
use crate::config::config;
use crate::database::directory_from_config;

#[derive(Args)]
pub struct AccessArgs {
    #[arg(help = "Organization slug")]
    pub slug: String,

    #[arg(long, help = "User id; omit to check an anonymous request")]
    pub user: Option<Uuid>,
}

/// Outcome of an access check as the CLI prints it
#[derive(Debug)]
enum AccessReport {
    Granted { data: Value, lines: Vec<String> },
    Denied { message: String, code: &'static str, data: Value },
}

pub async fn handle(args: AccessArgs, output_format: OutputFormat) -> anyhow::Result<()> {
    let app_config = config();
    let directory = directory_from_config(&app_config.directory, &app_config.database)?;
    let resolver = OrgResolver::new(directory);

    match check_access(&resolver, &args.slug, args.user).await? {
        AccessReport::Granted { data, lines } => output_result(output_format, data, &lines),
        AccessReport::Denied { message, code, data } => output_failure(output_format, &message, code, data),
    }
}

/// Store failures are errors; every other outcome is a report with its redirect.
async fn check_access(resolver: &OrgResolver, slug: &str, user: Option<Uuid>) -> anyhow::Result<AccessReport> {
    let identity = user.map(|user_id| Identity {
        user_id,
        email: String::new(),
        profile_role: None,
    });

    match resolver.resolve(slug, identity.as_ref()).await {
        Ok(access) => {
            let to = destination(Some(access.role), Some(&access.organization.slug));
            let lines = vec![
                format!("{} ({}) as {}", access.organization.name, access.organization.slug, access.role),
                format!("-> {}", to),
            ];
            Ok(AccessReport::Granted {
                data: json!({ "access": access, "destination": to }),
                lines,
            })
        }
        Err(AccessError::Database(e)) => Err(e.into()),
        Err(e) => {
            let requested = format!("/org/{}", slug);
            Ok(AccessReport::Denied {
                message: e.to_string(),
                code: e.tag(),
                data: json!({ "redirect": failure_destination(&e, &requested) }),
            })
        }
    }
}
