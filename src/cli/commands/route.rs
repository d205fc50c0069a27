use clap::Args;
use serde_json::json;

use crate::access::{destination_for, Role};
use crate::cli::utils::output_result;
use crate::cli::OutputFormat;

#[derive(Args)]
pub struct RouteArgs {
    #[arg(help = "Role name (admin, formateur, tuteur, apprenant, super-admin, ...)")]
    pub role: String,

    #[arg(long, help = "Organization slug")]
    pub slug: Option<String>,
}

pub fn handle(args: RouteArgs, output_format: OutputFormat) -> anyhow::Result<()> {
    let destination = destination_for(&args.role, args.slug.as_deref());
    let role = args.role.parse::<Role>().ok();

    output_result(
        output_format,
        json!({
            "role": role,
            "slug": args.slug,
            "destination": destination,
        }),
        &[destination.clone()],
    )
}
