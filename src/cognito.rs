//! Amazon Cognito user-pool client.
//!
//! Talks to the Cognito JSON API directly (`USER_PASSWORD_AUTH`) and keeps the signed-in
//! session in memory, which is what [`IdentityProvider::current_session_tokens`] reads.
//! SRP and the hosted-UI redirect flow are not implemented; the hosted domain is only
//! used to build logout URLs.

use crate::APP_USER_AGENT;
use crate::auth::provider::IdentityProvider;
use crate::auth::tokens::{EmbeddedTokens, RawAuthResult, SessionTokens};
use crate::error::Error;
use async_trait::async_trait;
use reqwest::{Client, header::CONTENT_TYPE};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde_json::{Value, json};
use tokio::sync::RwLock;
use tracing::{Instrument, debug, info_span};
use url::Url;

const AMZ_JSON: &str = "application/x-amz-json-1.1";
const AMZ_TARGET_HEADER: &str = "X-Amz-Target";
const AMZ_TARGET_PREFIX: &str = "AWSCognitoIdentityProviderService";
const USER_PASSWORD_AUTH: &str = "USER_PASSWORD_AUTH";

#[derive(Debug, Clone)]
pub struct CognitoConfig {
    pub region: String,
    pub user_pool_id: String,
    pub client_id: String,
    /// Hosted-UI domain, e.g. `tenant.auth.us-east-1.amazoncognito.com`.
    pub domain: String,
    /// Overrides the regional endpoint (local emulators, tests).
    pub endpoint: Option<Url>,
}

impl CognitoConfig {
    /// Check that every required value is present and consistent.
    ///
    /// # Errors
    /// Returns `Error::Config` naming the first missing or inconsistent value.
    pub fn validate(&self) -> Result<(), Error> {
        for (name, value) in [
            ("region", &self.region),
            ("user pool id", &self.user_pool_id),
            ("client id", &self.client_id),
            ("domain", &self.domain),
        ] {
            if value.trim().is_empty() {
                return Err(Error::Config(format!("missing Cognito {name}")));
            }
        }

        if !self.user_pool_id.starts_with(&format!("{}_", self.region)) {
            return Err(Error::Config(format!(
                "user pool id {} does not belong to region {}",
                self.user_pool_id, self.region
            )));
        }

        Ok(())
    }

    /// The endpoint override, or `https://cognito-idp.{region}.amazonaws.com/`.
    ///
    /// # Errors
    /// Returns `Error::Config` if the region does not form a valid host name.
    pub fn endpoint(&self) -> Result<Url, Error> {
        if let Some(endpoint) = &self.endpoint {
            return Ok(endpoint.clone());
        }
        let url = format!("https://cognito-idp.{}.amazonaws.com/", self.region);
        Url::parse(&url).map_err(|e| Error::Config(format!("invalid Cognito endpoint {url}: {e}")))
    }

    /// Hosted-UI logout URL that sends the browser back to `redirect` afterwards.
    ///
    /// # Errors
    /// Returns `Error::Config` if the domain does not form a valid URL.
    pub fn logout_url(&self, redirect: &Url) -> Result<Url, Error> {
        let domain = self
            .domain
            .trim_start_matches("https://")
            .trim_end_matches('/');
        let mut url = Url::parse(&format!("https://{domain}/logout"))
            .map_err(|e| Error::Config(format!("invalid Cognito domain {domain}: {e}")))?;
        url.query_pairs_mut()
            .append_pair("client_id", &self.client_id)
            .append_pair("logout_uri", redirect.as_str());
        Ok(url)
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct InitiateAuthResponse {
    authentication_result: Option<AuthenticationResult>,
    challenge_name: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct AuthenticationResult {
    id_token: Option<String>,
    access_token: Option<String>,
    refresh_token: Option<String>,
}

fn secret(value: Option<String>) -> Option<SecretString> {
    value.map(SecretString::from)
}

/// `"{type}: {message}"` from a Cognito error body, falling back to the HTTP status.
fn provider_error_message(status: reqwest::StatusCode, json: &Value) -> String {
    let kind = json
        .get("__type")
        .and_then(Value::as_str)
        .map(|t| t.rsplit('#').next().unwrap_or(t));
    let message = json
        .get("message")
        .or_else(|| json.get("Message"))
        .and_then(Value::as_str);

    match (kind, message) {
        (Some(kind), Some(message)) => format!("{kind}: {message}"),
        (Some(kind), None) => kind.to_string(),
        (None, Some(message)) => message.to_string(),
        (None, None) => format!("HTTP {status}"),
    }
}

#[derive(Debug)]
pub struct CognitoClient {
    client: Client,
    config: CognitoConfig,
    endpoint: Url,
    session: RwLock<Option<SessionTokens>>,
}

impl CognitoClient {
    /// Build a client for the configured user pool.
    ///
    /// # Errors
    /// Returns `Error::Config` if the configuration is incomplete or the HTTP client
    /// cannot be built.
    pub fn new(config: CognitoConfig) -> Result<Self, Error> {
        config.validate()?;
        let endpoint = config.endpoint()?;
        let client = Client::builder()
            .user_agent(APP_USER_AGENT)
            .build()
            .map_err(|e| Error::Config(format!("Error creating reqwest client: {e}")))?;

        Ok(Self {
            client,
            config,
            endpoint,
            session: RwLock::new(None),
        })
    }

    async fn call(&self, operation: &str, payload: &Value) -> Result<Value, Error> {
        let span = info_span!(
            "cognito.request",
            http.method = "POST",
            operation = %operation,
            url = %self.endpoint
        );
        let response = self
            .client
            .post(self.endpoint.clone())
            .header(CONTENT_TYPE, AMZ_JSON)
            .header(AMZ_TARGET_HEADER, format!("{AMZ_TARGET_PREFIX}.{operation}"))
            .body(payload.to_string())
            .send()
            .instrument(span)
            .await?;

        let status = response.status();
        let bytes = response.bytes().await?;

        if !status.is_success() {
            let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
            let message = provider_error_message(status, &json);
            debug!("cognito {} failed: {}", operation, message);
            return Err(Error::Provider(message));
        }

        if bytes.is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_slice(&bytes).map_err(|e| {
            Error::Provider(format!("invalid JSON from identity provider ({status}): {e}"))
        })
    }

    /// Drop the locally held session. The hosted-UI session is ended through
    /// [`CognitoConfig::logout_url`].
    pub async fn sign_out(&self) {
        *self.session.write().await = None;
    }

    /// Change the password of the signed-in user.
    ///
    /// # Errors
    /// Returns `Error::NotAuthenticated` without a session holding an access token, and
    /// `Error::Provider` if Cognito rejects the change.
    pub async fn change_password(
        &self,
        previous: &SecretString,
        proposed: &SecretString,
    ) -> Result<(), Error> {
        let access_token = self
            .session
            .read()
            .await
            .as_ref()
            .and_then(|s| s.access_token.clone())
            .ok_or(Error::NotAuthenticated)?;

        let payload = json!({
            "PreviousPassword": previous.expose_secret(),
            "ProposedPassword": proposed.expose_secret(),
            "AccessToken": access_token.expose_secret(),
        });

        self.call("ChangePassword", &payload).await?;

        Ok(())
    }
}

#[async_trait]
impl IdentityProvider for CognitoClient {
    async fn authenticate(
        &self,
        email: &str,
        password: &SecretString,
    ) -> Result<RawAuthResult, Error> {
        self.sign_out().await;

        let payload = json!({
            "AuthFlow": USER_PASSWORD_AUTH,
            "ClientId": self.config.client_id,
            "AuthParameters": {
                "USERNAME": email,
                "PASSWORD": password.expose_secret(),
            },
        });

        let json = self.call("InitiateAuth", &payload).await?;
        let response: InitiateAuthResponse = serde_json::from_value(json)
            .map_err(|e| Error::Provider(format!("unexpected InitiateAuth response: {e}")))?;

        if let Some(name) = response.challenge_name {
            debug!("cognito requested challenge {}", name);
            return Ok(RawAuthResult::ChallengeRequired { name });
        }

        let result = response.authentication_result.unwrap_or_default();
        let tokens = EmbeddedTokens {
            id_token: secret(result.id_token),
            access_token: secret(result.access_token),
            refresh_token: secret(result.refresh_token),
        };

        *self.session.write().await = Some(SessionTokens {
            id_token: tokens.id_token.clone(),
            access_token: tokens.access_token.clone(),
            refresh_token: tokens.refresh_token.clone(),
        });

        Ok(RawAuthResult::Tokens(tokens))
    }

    async fn current_session_tokens(&self) -> Result<SessionTokens, Error> {
        self.session
            .read()
            .await
            .clone()
            .ok_or(Error::NotAuthenticated)
    }
}
