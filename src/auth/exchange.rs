//! Token exchange with the backend authority.
//!
//! The backend validates the tenant of the presented identity and, on success, sets the
//! session cookie. Its `401` is overloaded: with a `logouturl` in the body it means
//! "valid identity, wrong tenant"; without one it is a plain failure.

use crate::auth::tokens::CanonicalTokens;
use crate::error::Error;
use crate::http::endpoint_url;
use reqwest::{Client, StatusCode, header::CONTENT_TYPE};
use secrecy::ExposeSecret;
use serde_json::{Map, Value};
use tracing::{Instrument, debug, info_span, warn};
use url::Url;

pub const EXCHANGE_PATH: &str = "/auth/exchange-token";
pub const FORWARDED_HOST_HEADER: &str = "x-forwarded-host";

/// Where the gateway endpoints live and which origin the requests claim to come from.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub exchange_base: Url,
    pub dashboard_base: Url,
    pub forwarded_host: String,
}

/// Classified answer of the exchange endpoint. Exactly one per exchange.
#[derive(Debug, Clone, PartialEq)]
pub enum ExchangeOutcome {
    Success(Value),
    TenantMismatch(Url),
    Failure { status: u16, message: String },
}

#[derive(Debug, Clone)]
pub struct ExchangeClient {
    client: Client,
    config: GatewayConfig,
}

impl ExchangeClient {
    /// `client` must be the cookie-bearing client from [`crate::http::client`] so the
    /// session cookie reaches later gateway calls.
    #[must_use]
    pub const fn new(client: Client, config: GatewayConfig) -> Self {
        Self { client, config }
    }

    /// Post the tokens and PKCE challenge and classify the response.
    ///
    /// # Errors
    /// Returns `Error::Network` if the request cannot be sent or the body cannot be read,
    /// and `Error::Config` if the endpoint URL is invalid. HTTP-level failures are
    /// reported as `ExchangeOutcome::Failure`, not as errors.
    pub async fn exchange(
        &self,
        tokens: &CanonicalTokens,
        challenge: &str,
    ) -> Result<ExchangeOutcome, Error> {
        let url = endpoint_url(&self.config.exchange_base, EXCHANGE_PATH)?;
        let body = exchange_body(tokens, challenge);

        let span = info_span!(
            "gateway.exchange_token",
            http.method = "POST",
            url = %url
        );
        let response = self
            .client
            .post(url.clone())
            .header(CONTENT_TYPE, "application/json")
            .header(FORWARDED_HOST_HEADER, &self.config.forwarded_host)
            .json(&body)
            .send()
            .instrument(span)
            .await?;

        let status = response.status();
        let bytes = response.bytes().await?;

        debug!("exchange response status: {}", status);

        let outcome = classify(status, &bytes);
        if let ExchangeOutcome::Failure { status, message } = &outcome {
            warn!("token exchange failed: {} {}", status, message);
        }

        Ok(outcome)
    }
}

/// JSON body for the exchange request. Absent optional tokens are omitted, never sent
/// as empty strings.
#[must_use]
pub fn exchange_body(tokens: &CanonicalTokens, challenge: &str) -> Value {
    let mut body = Map::new();
    body.insert("code".to_string(), Value::Null);
    body.insert("codeVerifier".to_string(), Value::Null);
    body.insert(
        "codeChallenge".to_string(),
        Value::String(challenge.to_string()),
    );
    body.insert(
        "id_token".to_string(),
        Value::String(tokens.id_token.expose_secret().to_string()),
    );
    if let Some(token) = &tokens.access_token {
        body.insert(
            "access_token".to_string(),
            Value::String(token.expose_secret().to_string()),
        );
    }
    if let Some(token) = &tokens.refresh_token {
        body.insert(
            "refresh_token".to_string(),
            Value::String(token.expose_secret().to_string()),
        );
    }
    Value::Object(body)
}

fn status_text(status: StatusCode) -> String {
    status
        .canonical_reason()
        .unwrap_or("Unknown status")
        .to_string()
}

fn logout_url(body: &[u8]) -> Option<Url> {
    let json: Value = serde_json::from_slice(body).ok()?;
    let raw = json.get("logouturl").and_then(Value::as_str)?;
    if raw.is_empty() {
        return None;
    }
    Url::parse(raw).ok()
}

/// Three-way classification of an exchange response:
/// `401` + `logouturl` → tenant mismatch, other non-2xx → failure, otherwise success.
#[must_use]
pub fn classify(status: StatusCode, body: &[u8]) -> ExchangeOutcome {
    if status == StatusCode::UNAUTHORIZED {
        if let Some(url) = logout_url(body) {
            return ExchangeOutcome::TenantMismatch(url);
        }
        debug!("401 from exchange endpoint without a usable logouturl");
    }

    if !status.is_success() {
        return ExchangeOutcome::Failure {
            status: status.as_u16(),
            message: status_text(status),
        };
    }

    if body.iter().all(u8::is_ascii_whitespace) {
        return ExchangeOutcome::Success(Value::Null);
    }

    // The session cookie is already set on any 2xx; a non-JSON body is passed on as text.
    let payload = serde_json::from_slice(body)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(body).into_owned()));
    ExchangeOutcome::Success(payload)
}
