use crate::auth::exchange::GatewayConfig;
use crate::error::Error;
use crate::http::endpoint_url;
use reqwest::{Client, header::CONTENT_TYPE};
use serde_json::Value;
use tracing::{Instrument, debug, info_span};

pub const DASHBOARD_PATH: &str = "/dashboard";

/// Reads the dashboard data behind the cookie session set by the token exchange.
#[derive(Debug, Clone)]
pub struct DashboardClient {
    client: Client,
    config: GatewayConfig,
}

impl DashboardClient {
    /// `client` must be the same cookie-bearing client the exchange used.
    #[must_use]
    pub const fn new(client: Client, config: GatewayConfig) -> Self {
        Self { client, config }
    }

    /// Fetch the dashboard payload.
    ///
    /// # Errors
    /// Returns `Error::Dashboard` for non-2xx answers (a missing or expired session shows up
    /// here), `Error::InvalidResponse` for a 2xx body that is not JSON, and
    /// `Error::Network` for transport failures.
    pub async fn fetch(&self) -> Result<Value, Error> {
        let url = endpoint_url(&self.config.dashboard_base, DASHBOARD_PATH)?;

        let span = info_span!(
            "gateway.dashboard",
            http.method = "GET",
            url = %url
        );
        let response = self
            .client
            .get(url)
            .header(CONTENT_TYPE, "application/json")
            .send()
            .instrument(span)
            .await?;

        let status = response.status();
        if !status.is_success() {
            debug!("dashboard request failed: {}", status);
            return Err(Error::Dashboard {
                status: status.as_u16(),
            });
        }

        let payload: Value = response
            .json()
            .await
            .map_err(|e| Error::InvalidResponse(format!("dashboard ({status}): {e}")))?;

        Ok(payload)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use serde_json::json;
    use std::net::TcpListener;
    use url::Url;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn can_bind_localhost() -> bool {
        TcpListener::bind("127.0.0.1:0").is_ok()
    }

    fn client_for(server: &MockServer) -> DashboardClient {
        let base = Url::parse(&server.uri()).unwrap();
        DashboardClient::new(
            crate::http::client().unwrap(),
            GatewayConfig {
                exchange_base: base.clone(),
                dashboard_base: base,
                forwarded_host: "localhost:3000".to_string(),
            },
        )
    }

    #[tokio::test]
    async fn fetch_returns_payload() -> anyhow::Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/dashboard"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "tenant": "acme",
                "widgets": [1, 2, 3]
            })))
            .mount(&server)
            .await;

        let payload = client_for(&server).fetch().await?;
        assert_eq!(payload["tenant"], "acme");
        Ok(())
    }

    #[tokio::test]
    async fn fetch_without_session_fails_with_status() {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return;
        }
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/dashboard"))
            .respond_with(ResponseTemplate::new(403))
            .mount(&server)
            .await;

        let err = client_for(&server).fetch().await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Dashboard);
        assert_eq!(err.to_string(), "Dashboard request failed: HTTP error! status: 403");
    }

    #[tokio::test]
    async fn fetch_with_non_json_body_is_not_a_network_error() {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return;
        }
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/dashboard"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>login</html>"))
            .mount(&server)
            .await;

        let err = client_for(&server).fetch().await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidResponse);
        assert!(err.to_string().starts_with("Unreadable response from dashboard (200 OK)"));
    }
}
