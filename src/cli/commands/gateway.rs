use crate::auth::exchange::GatewayConfig;
use crate::http::parse_base_url;
use clap::{Arg, ArgMatches, Command};
use url::Url;

pub const ARG_EXCHANGE_URL: &str = "exchange-url";
pub const ARG_DASHBOARD_URL: &str = "dashboard-url";
pub const ARG_FORWARDED_HOST: &str = "forwarded-host";

/// Parse gateway arguments from matches.
///
/// # Errors
/// Returns an error if a required URL is missing or not an absolute http(s) URL.
pub fn parse(matches: &ArgMatches) -> anyhow::Result<GatewayConfig> {
    let read_url = |id: &str| -> anyhow::Result<Url> {
        let value = matches
            .get_one::<String>(id)
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| anyhow::anyhow!("missing required argument: --{id}"))?;
        Ok(parse_base_url(id, value)?)
    };

    let forwarded_host = matches
        .get_one::<String>(ARG_FORWARDED_HOST)
        .cloned()
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| anyhow::anyhow!("missing required argument: --{ARG_FORWARDED_HOST}"))?;

    Ok(GatewayConfig {
        exchange_base: read_url(ARG_EXCHANGE_URL)?,
        dashboard_base: read_url(ARG_DASHBOARD_URL)?,
        forwarded_host,
    })
}

#[must_use]
pub fn with_args(command: Command) -> Command {
    command
        .arg(
            Arg::new(ARG_EXCHANGE_URL)
                .long(ARG_EXCHANGE_URL)
                .help("Base URL of the token exchange gateway")
                .env("TENANTAUTH_API_GATEWAY_1")
                .required(true),
        )
        .arg(
            Arg::new(ARG_DASHBOARD_URL)
                .long(ARG_DASHBOARD_URL)
                .help("Base URL of the dashboard gateway")
                .env("TENANTAUTH_API_GATEWAY_2")
                .required(true),
        )
        .arg(
            Arg::new(ARG_FORWARDED_HOST)
                .long(ARG_FORWARDED_HOST)
                .help("Host sent as x-forwarded-host; selects the tenant on the gateway")
                .env("TENANTAUTH_FORWARDED_HOST")
                .default_value("localhost:3000"),
        )
}
