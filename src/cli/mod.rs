pub mod commands;
pub mod utils;

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

#[derive(Parser)]
#[command(name = "lms")]
#[command(about = "LMS CLI - tenant lookup and role routing")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Hostname tenant registry")]
    Tenants {
        #[command(subcommand)]
        cmd: commands::tenants::TenantsCommands,
    },

    #[command(about = "Landing page for a role (and optional organization)")]
    Route(commands::route::RouteArgs),

    #[command(about = "Resolve a user's access to an organization")]
    Access(commands::access::AccessArgs),

    #[command(about = "Sign a development session token")]
    Token(commands::token::TokenArgs),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_cli(cli: &Cli) -> Self {
        if cli.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let output_format = OutputFormat::from_cli(&cli);

    match cli.command {
        Commands::Tenants { cmd } => commands::tenants::handle(cmd, output_format),
        Commands::Route(args) => commands::route::handle(args, output_format),
        Commands::Access(args) => commands::access::handle(args, output_format).await,
        Commands::Token(args) => commands::token::handle(args, output_format),
    }
}
