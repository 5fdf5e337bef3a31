//! Shared HTTP client for gateway calls.
//!
//! The exchange endpoint answers with `Set-Cookie`; later gateway calls (the dashboard)
//! only work if they replay that cookie, so every gateway client must be built from the
//! same [`reqwest::Client`] returned here.

use crate::{APP_USER_AGENT, error::Error};
use reqwest::Client;
use url::Url;

/// Build the cookie-bearing client used for the exchange and dashboard endpoints.
///
/// # Errors
/// Returns `Error::Config` if the TLS backend cannot be initialized.
pub fn client() -> Result<Client, Error> {
    Client::builder()
        .user_agent(APP_USER_AGENT)
        .cookie_store(true)
        .build()
        .map_err(|e| Error::Config(format!("Error creating reqwest client: {e}")))
}

/// Join `path` onto `base`, keeping any path prefix the base already has
/// (`https://gw.tld/prod` + `/auth/exchange-token` → `https://gw.tld/prod/auth/exchange-token`).
///
/// # Errors
/// Returns `Error::Config` if the result is not a valid URL.
pub fn endpoint_url(base: &Url, path: &str) -> Result<Url, Error> {
    let joined = format!(
        "{}/{}",
        base.as_str().trim_end_matches('/'),
        path.trim_start_matches('/')
    );
    Url::parse(&joined).map_err(|e| Error::Config(format!("invalid endpoint URL {joined}: {e}")))
}

/// Parse a configured base URL, accepting only `http` and `https`.
///
/// # Errors
/// Returns `Error::Config` if the URL cannot be parsed, has no host, or uses another scheme.
pub fn parse_base_url(name: &str, value: &str) -> Result<Url, Error> {
    let url = Url::parse(value).map_err(|e| Error::Config(format!("invalid {name}: {e}")))?;

    if url.host_str().is_none() {
        return Err(Error::Config(format!("invalid {name}: no host specified")));
    }

    match url.scheme() {
        "http" | "https" => Ok(url),
        scheme => Err(Error::Config(format!(
            "invalid {name}: unsupported scheme {scheme}"
        ))),
    }
}
