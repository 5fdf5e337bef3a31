use crate::auth::tokens::{RawAuthResult, SessionTokens};
use crate::error::Error;
use async_trait::async_trait;
use secrecy::SecretString;

/// The identity provider as seen by the sign-in flow.
///
/// Only two capabilities are needed: sign in with credentials, and read back the tokens
/// of the session the provider is holding. The provider's own client-side session cache
/// lives behind this trait; the flow treats it as read-only.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Sign in with email and password.
    ///
    /// A secondary challenge is reported as `RawAuthResult::ChallengeRequired`, not as an error.
    ///
    /// # Errors
    /// Returns `Error::Provider` if the credentials are rejected and `Error::Network` if the
    /// provider cannot be reached.
    async fn authenticate(&self, email: &str, password: &SecretString)
    -> Result<RawAuthResult, Error>;

    /// Tokens of the currently signed-in session.
    ///
    /// # Errors
    /// Returns `Error::NotAuthenticated` when there is no session.
    async fn current_session_tokens(&self) -> Result<SessionTokens, Error>;
}
