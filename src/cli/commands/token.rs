use clap::Subcommand;
use serde_json::json;

use crate::auth::{decode_assertion, generate_jwt, Claims};
use crate::cli::utils::*;
use crate::cli::OutputFormat;
use crate::config::config;

#[derive(Subcommand)]
pub enum TokenCommands {
    #[command(about = "Issue a signed identity token for local testing")]
    Issue {
        #[arg(help = "Email asserted by the token")]
        email: String,
        #[arg(long, help = "External subject id (defaults to the email)")]
        subject: Option<String>,
        #[arg(long, default_value_t = 24, help = "Lifetime in hours")]
        hours: i64,
    },

    #[command(about = "Verify a token and show the identity it asserts")]
    Verify {
        #[arg(help = "Bearer token")]
        token: String,
    },
}

pub async fn handle(cmd: TokenCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    let secret = &config().security.jwt_secret;

    match cmd {
        TokenCommands::Issue { email, subject, hours } => {
            if !crate::is_development!() {
                tracing::warn!("Issuing an identity token outside development; it will be accepted by this deployment");
            }
            let subject = subject.unwrap_or_else(|| email.clone());
            let claims = Claims::new(&email, &subject, hours);
            let token = generate_jwt(&claims, secret)?;
            match output_format {
                OutputFormat::Json => print_json(&json!({ "token": token, "expires_at": claims.exp })),
                OutputFormat::Text => {
                    println!("{}", token);
                    Ok(())
                }
            }
        }
        TokenCommands::Verify { token } => {
            let assertion = decode_assertion(&token, secret)?;
            output_success(
                &output_format,
                &format!("Token asserts {} ({})", assertion.email, assertion.external_id),
                Some(json!({ "email": assertion.email, "external_id": assertion.external_id })),
            )
        }
    }
}
