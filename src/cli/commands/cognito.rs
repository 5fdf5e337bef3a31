use crate::cognito::CognitoConfig;
use crate::http::parse_base_url;
use anyhow::Context;
use clap::{Arg, ArgMatches, Command};
use url::Url;

pub const ARG_REGION: &str = "region";
pub const ARG_USER_POOL_ID: &str = "user-pool-id";
pub const ARG_CLIENT_ID: &str = "client-id";
pub const ARG_DOMAIN: &str = "domain";
pub const ARG_ENDPOINT: &str = "cognito-endpoint";
pub const ARG_REDIRECT_SIGN_OUT: &str = "redirect-sign-out";

#[derive(Debug, Clone)]
pub struct Options {
    pub region: String,
    pub user_pool_id: String,
    pub client_id: String,
    pub domain: String,
    pub endpoint: Option<String>,
}

impl Options {
    /// Parse identity provider arguments from matches.
    ///
    /// # Errors
    /// Returns an error if required arguments are missing or empty.
    pub fn parse(matches: &ArgMatches) -> anyhow::Result<Self> {
        let read_required = |id: &str| -> anyhow::Result<String> {
            matches
                .get_one::<String>(id)
                .cloned()
                .filter(|v| !v.trim().is_empty())
                .ok_or_else(|| anyhow::anyhow!("missing required argument: --{id}"))
        };

        Ok(Self {
            region: read_required(ARG_REGION)?,
            user_pool_id: read_required(ARG_USER_POOL_ID)?,
            client_id: read_required(ARG_CLIENT_ID)?,
            domain: read_required(ARG_DOMAIN)?,
            endpoint: matches
                .get_one::<String>(ARG_ENDPOINT)
                .cloned()
                .filter(|v| !v.trim().is_empty()),
        })
    }

    /// Build and validate the Cognito configuration.
    ///
    /// # Errors
    /// Returns an error if the endpoint override is not a valid URL or the values are
    /// inconsistent.
    pub fn into_config(self) -> anyhow::Result<CognitoConfig> {
        let endpoint = self
            .endpoint
            .as_deref()
            .map(|value| parse_base_url("cognito endpoint", value))
            .transpose()?;

        let config = CognitoConfig {
            region: self.region,
            user_pool_id: self.user_pool_id,
            client_id: self.client_id,
            domain: self.domain,
            endpoint,
        };
        config.validate().context("invalid identity provider configuration")?;

        Ok(config)
    }
}

/// Parse the post-logout redirect.
///
/// # Errors
/// Returns an error if the value is missing or not an absolute http(s) URL.
pub fn parse_redirect_sign_out(matches: &ArgMatches) -> anyhow::Result<Url> {
    let value = matches
        .get_one::<String>(ARG_REDIRECT_SIGN_OUT)
        .ok_or_else(|| anyhow::anyhow!("missing required argument: --{ARG_REDIRECT_SIGN_OUT}"))?;
    Ok(parse_base_url(ARG_REDIRECT_SIGN_OUT, value)?)
}

#[must_use]
pub fn with_sign_out_args(command: Command) -> Command {
    command.arg(
        Arg::new(ARG_REDIRECT_SIGN_OUT)
            .long(ARG_REDIRECT_SIGN_OUT)
            .help("Where the hosted logout sends the browser afterwards")
            .env("TENANTAUTH_REDIRECT_SIGN_OUT")
            .default_value("http://localhost:3000/logout"),
    )
}

#[must_use]
pub fn with_args(command: Command) -> Command {
    command
        .arg(
            Arg::new(ARG_REGION)
                .long(ARG_REGION)
                .help("Identity provider region, example: us-east-1")
                .env("TENANTAUTH_COGNITO_REGION")
                .required(true),
        )
        .arg(
            Arg::new(ARG_USER_POOL_ID)
                .long(ARG_USER_POOL_ID)
                .help("User pool id, example: us-east-1_XXXXXXXXX")
                .env("TENANTAUTH_USER_POOL_ID")
                .required(true),
        )
        .arg(
            Arg::new(ARG_CLIENT_ID)
                .long(ARG_CLIENT_ID)
                .help("User pool app client id")
                .env("TENANTAUTH_COGNITO_CLIENT_ID")
                .required(true),
        )
        .arg(
            Arg::new(ARG_DOMAIN)
                .long(ARG_DOMAIN)
                .help("Hosted domain, example: your-domain.auth.us-east-1.amazoncognito.com")
                .env("TENANTAUTH_COGNITO_DOMAIN")
                .required(true),
        )
        .arg(
            Arg::new(ARG_ENDPOINT)
                .long(ARG_ENDPOINT)
                .help("Override the identity provider API endpoint (local emulators)")
                .env("TENANTAUTH_COGNITO_ENDPOINT"),
        )
}
