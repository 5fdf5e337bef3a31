use crate::auth::{Authenticator, ExchangeClient, GatewayConfig, LoginOutcome};
use crate::cognito::{CognitoClient, CognitoConfig};
use crate::credentials::check_sign_in;
use crate::dashboard::DashboardClient;
use crate::http;
use anyhow::{Context, Result};
use secrecy::SecretString;
use tracing::{info, warn};

#[derive(Debug)]
pub struct Args {
    pub email: String,
    pub password: SecretString,
    pub skip_dashboard: bool,
    pub cognito: CognitoConfig,
    pub gateway: GatewayConfig,
}

/// Sign in, exchange the tokens and, unless skipped, load the dashboard with the new
/// session cookie.
///
/// A tenant mismatch is reported on stdout and is not an error.
///
/// # Errors
/// Returns an error if the input is invalid, the attempt fails, or the dashboard
/// cannot be read.
pub async fn execute(args: Args) -> Result<()> {
    check_sign_in(&args.email, &args.password)?;

    let client = http::client()?;
    let provider = CognitoClient::new(args.cognito)?;
    let exchange = ExchangeClient::new(client.clone(), args.gateway.clone());
    let authenticator = Authenticator::new(provider, exchange);

    match authenticator.login(&args.email, &args.password).await {
        LoginOutcome::Succeeded(payload) => {
            info!("signed in as {}", args.email);
            println!("{}", serde_json::to_string_pretty(&payload)?);

            if !args.skip_dashboard {
                let dashboard = DashboardClient::new(client, args.gateway)
                    .fetch()
                    .await
                    .context("failed to load dashboard")?;
                println!("{}", serde_json::to_string_pretty(&dashboard)?);
            }

            Ok(())
        }
        LoginOutcome::TenantMismatched(logout_url) => {
            warn!("identity {} does not belong to this tenant", args.email);
            authenticator.provider().sign_out().await;

            println!("Tenant Access Denied");
            println!(
                "You are not authorized to access this tenant. Please log in with the correct tenant account."
            );
            println!("Logout and login again: {logout_url}");

            Ok(())
        }
        LoginOutcome::Failed(err) => Err(err.into()),
    }
}
