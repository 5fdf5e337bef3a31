pub mod exchange;
pub mod orchestrator;
pub mod pkce;
pub mod provider;
pub mod tokens;

pub use self::exchange::{ExchangeClient, ExchangeOutcome, GatewayConfig};
pub use self::orchestrator::{AttemptState, Authenticator, LoginAttempt, LoginOutcome};
pub use self::pkce::{PkcePair, code_challenge_s256};
pub use self::provider::IdentityProvider;
pub use self::tokens::{CanonicalTokens, EmbeddedTokens, RawAuthResult, SessionTokens, extract};
