use clap::Args;
use serde_json::json;
use uuid::Uuid;

use crate::access::Role;
use crate::auth::{issue_session_token, Identity};
use crate::cli::utils::output_result;
use crate::cli::OutputFormat;
use crate::config::config;

#[derive(Args)]
pub struct TokenArgs {
    #[arg(long, help = "User id (sub claim)")]
    pub user: Uuid,

    #[arg(long, help = "User e-mail")]
    pub email: String,

    #[arg(long, help = "Profile role claim")]
    pub role: Option<Role>,

    #[arg(long, default_value_t = 24, help = "Token lifetime in hours")]
    pub ttl_hours: i64,
}

pub fn handle(args: TokenArgs, output_format: OutputFormat) -> anyhow::Result<()> {
    let identity = Identity {
        user_id: args.user,
        email: args.email,
        profile_role: args.role,
    };
    let token = issue_session_token(&identity, &config().security.session, token_ttl(args.ttl_hours)?)?;

    output_result(output_format, json!({ "user": identity, "token": token }), &[token.clone()])
}

fn token_ttl(hours: i64) -> anyhow::Result<chrono::Duration> {
    chrono::Duration::try_hours(hours).ok_or_else(|| anyhow::anyhow!("--ttl-hours {} is out of range", hours))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ttl_out_of_range_is_an_error() {
        assert_eq!(token_ttl(24).unwrap(), chrono::Duration::hours(24));
        assert!(token_ttl(i64::MAX).is_err());
        assert!(token_ttl(i64::MIN).is_err());
    }
}
