use anyhow::{Context, Result, ensure};
use secrecy::SecretString;
use serde_json::json;
use std::net::TcpListener;
use tenantauth::ErrorKind;
use tenantauth::auth::{AttemptState, Authenticator, ExchangeClient, GatewayConfig, LoginOutcome};
use tenantauth::cognito::{CognitoClient, CognitoConfig};
use tenantauth::dashboard::DashboardClient;
use url::Url;
use wiremock::matchers::{body_partial_json, header, header_exists, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const ID_TOKEN: &str = "eyJ.id.token";
const ACCESS_TOKEN: &str = "eyJ.access.token";
const REFRESH_TOKEN: &str = "refresh-token";

fn can_bind_localhost() -> bool {
    TcpListener::bind("127.0.0.1:0").is_ok()
}

struct Stack {
    cognito: MockServer,
    gateway: MockServer,
}

impl Stack {
    async fn start() -> Self {
        let cognito = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/"))
            .and(header(
                "x-amz-target",
                "AWSCognitoIdentityProviderService.InitiateAuth",
            ))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "AuthenticationResult": {
                    "IdToken": ID_TOKEN,
                    "AccessToken": ACCESS_TOKEN,
                    "RefreshToken": REFRESH_TOKEN,
                    "ExpiresIn": 3600,
                    "TokenType": "Bearer"
                },
                "ChallengeParameters": {}
            })))
            .mount(&cognito)
            .await;

        Self {
            cognito,
            gateway: MockServer::start().await,
        }
    }

    fn authenticator(
        &self,
        forwarded_host: &str,
    ) -> Result<(Authenticator<CognitoClient>, DashboardClient)> {
        let endpoint = Url::parse(&format!("{}/", self.cognito.uri()))?;
        let provider = CognitoClient::new(CognitoConfig {
            region: "us-east-1".to_string(),
            user_pool_id: "us-east-1_AbCdEf123".to_string(),
            client_id: "client-abc".to_string(),
            domain: "tenant.auth.us-east-1.amazoncognito.com".to_string(),
            endpoint: Some(endpoint),
        })?;

        let base = Url::parse(&self.gateway.uri())?;
        let gateway = GatewayConfig {
            exchange_base: base.clone(),
            dashboard_base: base,
            forwarded_host: forwarded_host.to_string(),
        };

        let client = tenantauth::http::client()?;
        let exchange = ExchangeClient::new(client.clone(), gateway.clone());

        Ok((
            Authenticator::new(provider, exchange),
            DashboardClient::new(client, gateway),
        ))
    }
}

fn password() -> SecretString {
    SecretString::from("hunter2".to_string())
}

#[tokio::test]
async fn login_establishes_cookie_session_for_dashboard() -> Result<()> {
    if !can_bind_localhost() {
        eprintln!("Skipping test: cannot bind localhost");
        return Ok(());
    }
    let stack = Stack::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/exchange-token"))
        .and(header("x-forwarded-host", "acme.example.com"))
        .and(header_exists("content-type"))
        .and(body_partial_json(json!({
            "code": null,
            "codeVerifier": null,
            "id_token": ID_TOKEN,
            "access_token": ACCESS_TOKEN,
            "refresh_token": REFRESH_TOKEN
        })))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("set-cookie", "session=s3ss10n; Path=/; HttpOnly")
                .set_body_json(json!({"message": "Session established"})),
        )
        .expect(1)
        .mount(&stack.gateway)
        .await;

    Mock::given(method("GET"))
        .and(path("/dashboard"))
        .and(header("cookie", "session=s3ss10n"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "tenant": "acme",
            "user": "alice@acme.test"
        })))
        .expect(1)
        .mount(&stack.gateway)
        .await;

    let (authenticator, dashboard) = stack.authenticator("acme.example.com")?;
    let outcome = authenticator.login("alice@acme.test", &password()).await;

    ensure!(outcome.is_success(), "unexpected outcome: {outcome:?}");
    let LoginOutcome::Succeeded(payload) = outcome else {
        unreachable!();
    };
    assert_eq!(payload["message"], "Session established");

    let data = dashboard.fetch().await.context("dashboard with session cookie")?;
    assert_eq!(data["tenant"], "acme");

    Ok(())
}

#[tokio::test]
async fn dashboard_without_exchange_is_rejected() -> Result<()> {
    if !can_bind_localhost() {
        eprintln!("Skipping test: cannot bind localhost");
        return Ok(());
    }
    let stack = Stack::start().await;

    Mock::given(method("GET"))
        .and(path("/dashboard"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&stack.gateway)
        .await;

    let (_, dashboard) = stack.authenticator("acme.example.com")?;
    let Err(err) = dashboard.fetch().await else {
        anyhow::bail!("dashboard must not load without a session");
    };
    assert_eq!(err.kind(), ErrorKind::Dashboard);
    assert_eq!(err.status(), Some(401));

    Ok(())
}

#[tokio::test]
async fn wrong_tenant_yields_logout_url() -> Result<()> {
    if !can_bind_localhost() {
        eprintln!("Skipping test: cannot bind localhost");
        return Ok(());
    }
    let stack = Stack::start().await;
    let logout = "https://tenant.auth.us-east-1.amazoncognito.com/logout?client_id=client-abc&logout_uri=http%3A%2F%2Flocalhost%3A3000%2Flogin";

    Mock::given(method("POST"))
        .and(path("/auth/exchange-token"))
        .and(header("x-forwarded-host", "other.example.com"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "message": "Tenant mismatch",
            "logouturl": logout
        })))
        .expect(1)
        .mount(&stack.gateway)
        .await;

    let (authenticator, _) = stack.authenticator("other.example.com")?;
    let outcome = authenticator.login("alice@acme.test", &password()).await;

    assert_eq!(outcome.state(), AttemptState::TenantMismatched);
    let LoginOutcome::TenantMismatched(url) = outcome else {
        unreachable!();
    };
    assert_eq!(url, Url::parse(logout)?);

    Ok(())
}

#[tokio::test]
async fn rejected_credentials_never_reach_gateway() -> Result<()> {
    if !can_bind_localhost() {
        eprintln!("Skipping test: cannot bind localhost");
        return Ok(());
    }
    let cognito = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "__type": "NotAuthorizedException",
            "message": "Incorrect username or password."
        })))
        .mount(&cognito)
        .await;

    let stack = Stack {
        cognito,
        gateway: MockServer::start().await,
    };
    Mock::given(method("POST"))
        .and(path("/auth/exchange-token"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&stack.gateway)
        .await;

    let (authenticator, _) = stack.authenticator("acme.example.com")?;
    let outcome = authenticator.login("alice@acme.test", &password()).await;

    let LoginOutcome::Failed(err) = outcome else {
        anyhow::bail!("expected failure, got {outcome:?}");
    };
    assert_eq!(err.kind(), ErrorKind::Provider);
    assert!(err.to_string().contains("Incorrect username or password."));

    Ok(())
}
