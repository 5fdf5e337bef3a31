//! Sign-in attempt state machine.
//!
//! `Idle → ChallengeGenerated → Authenticating → TokensExtracted → Exchanging` and then
//! exactly one of `Succeeded`, `TenantMismatched` or `Failed`. Any error jumps straight to
//! `Failed`; nothing is retried and a new attempt always starts from `Idle`.
//!
//! The PKCE pair and the extracted tokens live only inside one [`LoginAttempt`] and are
//! passed step to step by value, so nothing leaks between attempts. Callers must not run
//! two attempts for the same user concurrently (disable re-submission while one is in
//! flight); a result that arrives after the caller gave up is the caller's to discard.

use crate::auth::exchange::{ExchangeClient, ExchangeOutcome};
use crate::auth::pkce::PkcePair;
use crate::auth::provider::IdentityProvider;
use crate::auth::tokens::{RawAuthResult, extract};
use crate::error::Error;
use secrecy::SecretString;
use serde_json::Value;
use tracing::{Instrument, debug, info, info_span, warn};
use ulid::Ulid;
use url::Url;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptState {
    Idle,
    ChallengeGenerated,
    Authenticating,
    TokensExtracted,
    Exchanging,
    Succeeded,
    TenantMismatched,
    Failed,
}

impl AttemptState {
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Succeeded | Self::TenantMismatched | Self::Failed)
    }
}

/// How a sign-in attempt ended.
#[derive(Debug)]
pub enum LoginOutcome {
    /// Session established; carries the exchange endpoint's payload.
    Succeeded(Value),
    /// Valid identity, wrong tenant; send the user to this logout URL.
    TenantMismatched(Url),
    Failed(Error),
}

impl LoginOutcome {
    #[must_use]
    pub const fn state(&self) -> AttemptState {
        match self {
            Self::Succeeded(_) => AttemptState::Succeeded,
            Self::TenantMismatched(_) => AttemptState::TenantMismatched,
            Self::Failed(_) => AttemptState::Failed,
        }
    }

    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Succeeded(_))
    }
}

/// Drives sign-in attempts against an identity provider and the exchange endpoint.
pub struct Authenticator<P> {
    provider: P,
    exchange: ExchangeClient,
}

impl<P: IdentityProvider> Authenticator<P> {
    #[must_use]
    pub const fn new(provider: P, exchange: ExchangeClient) -> Self {
        Self { provider, exchange }
    }

    #[must_use]
    pub const fn provider(&self) -> &P {
        &self.provider
    }

    /// Run one complete sign-in attempt. Always resolves; errors come back as
    /// `LoginOutcome::Failed`.
    pub async fn login(&self, email: &str, password: &SecretString) -> LoginOutcome {
        let attempt = LoginAttempt::new(&self.provider, &self.exchange);
        let span = info_span!("login.attempt", attempt = %attempt.id());
        attempt.run(email, password).instrument(span).await
    }
}

/// A single, non-resumable pass through the state machine.
///
/// The attempt starts in `Idle`; `run` consumes it, so the only state a caller can observe
/// afterwards is the terminal one carried by [`LoginOutcome::state`]. Intermediate
/// transitions are logged at debug level.
pub struct LoginAttempt<'a, P> {
    id: Ulid,
    provider: &'a P,
    exchange: &'a ExchangeClient,
}

impl<'a, P: IdentityProvider> LoginAttempt<'a, P> {
    #[must_use]
    pub fn new(provider: &'a P, exchange: &'a ExchangeClient) -> Self {
        Self {
            id: Ulid::new(),
            provider,
            exchange,
        }
    }

    #[must_use]
    pub const fn id(&self) -> Ulid {
        self.id
    }

    fn enter(&self, state: AttemptState) {
        debug!(attempt = %self.id, "login attempt entered {:?}", state);
    }

    /// Consume the attempt and resolve it.
    pub async fn run(self, email: &str, password: &SecretString) -> LoginOutcome {
        self.enter(AttemptState::Idle);

        let outcome = match self.steps(email, password).await {
            Ok(ExchangeOutcome::Success(payload)) => LoginOutcome::Succeeded(payload),
            Ok(ExchangeOutcome::TenantMismatch(url)) => LoginOutcome::TenantMismatched(url),
            Ok(ExchangeOutcome::Failure { status, message }) => {
                LoginOutcome::Failed(Error::ExchangeRejected { status, message })
            }
            Err(err) => LoginOutcome::Failed(err),
        };

        self.enter(outcome.state());

        match &outcome {
            LoginOutcome::Succeeded(_) => info!("login succeeded"),
            LoginOutcome::TenantMismatched(_) => info!("login rejected: tenant mismatch"),
            LoginOutcome::Failed(err) => warn!("login failed: {}", err),
        }

        outcome
    }

    async fn steps(
        &self,
        email: &str,
        password: &SecretString,
    ) -> Result<ExchangeOutcome, Error> {
        let pkce = PkcePair::generate()?;
        self.enter(AttemptState::ChallengeGenerated);

        self.enter(AttemptState::Authenticating);
        let raw = self.provider.authenticate(email, password).await?;

        if let RawAuthResult::ChallengeRequired { name } = &raw {
            return Err(Error::UnsupportedChallenge(name.clone()));
        }

        let session = match self.provider.current_session_tokens().await {
            Ok(tokens) => Some(tokens),
            Err(err) => {
                debug!("no session tokens from provider, using sign-in result: {}", err);
                None
            }
        };

        let tokens = extract(&raw, session.as_ref())?;
        self.enter(AttemptState::TokensExtracted);

        self.enter(AttemptState::Exchanging);
        self.exchange.exchange(&tokens, pkce.challenge()).await
    }
}
