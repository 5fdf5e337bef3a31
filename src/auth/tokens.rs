//! Token shapes returned by the identity provider and their canonical form.
//!
//! Providers hand tokens back in two places: embedded in the sign-in result and through
//! a separate "current session" lookup. [`extract`] merges the two, preferring the
//! session lookup, and enforces that an id token exists before anything is sent to the
//! exchange endpoint.

use crate::error::Error;
use secrecy::{ExposeSecret, SecretString};

/// Result of an `authenticate` call, before any normalization.
#[derive(Debug, Clone)]
pub enum RawAuthResult {
    /// Sign-in completed; tokens may or may not be embedded.
    Tokens(EmbeddedTokens),
    /// The provider wants a secondary step (MFA, new password, ...).
    ChallengeRequired { name: String },
}

/// Tokens carried directly inside the sign-in result.
#[derive(Debug, Clone, Default)]
pub struct EmbeddedTokens {
    pub id_token: Option<SecretString>,
    pub access_token: Option<SecretString>,
    pub refresh_token: Option<SecretString>,
}

/// Tokens exposed by the provider's session accessors.
#[derive(Debug, Clone, Default)]
pub struct SessionTokens {
    pub id_token: Option<SecretString>,
    pub access_token: Option<SecretString>,
    pub refresh_token: Option<SecretString>,
}

/// Normalized token record handed to the exchange endpoint.
#[derive(Debug, Clone)]
pub struct CanonicalTokens {
    pub id_token: SecretString,
    pub access_token: Option<SecretString>,
    pub refresh_token: Option<SecretString>,
}

fn present(token: Option<&SecretString>) -> Option<SecretString> {
    token
        .filter(|t| !t.expose_secret().is_empty())
        .cloned()
}

fn pick(session: Option<&SecretString>, embedded: Option<&SecretString>) -> Option<SecretString> {
    present(session).or_else(|| present(embedded))
}

/// Merge session and embedded tokens into a [`CanonicalTokens`].
///
/// # Errors
/// Returns `Error::MissingIdentityToken` when neither source holds a non-empty id token.
pub fn extract(
    raw: &RawAuthResult,
    session: Option<&SessionTokens>,
) -> Result<CanonicalTokens, Error> {
    let embedded = match raw {
        RawAuthResult::Tokens(tokens) => Some(tokens),
        RawAuthResult::ChallengeRequired { .. } => None,
    };

    let id_token = pick(
        session.and_then(|s| s.id_token.as_ref()),
        embedded.and_then(|e| e.id_token.as_ref()),
    )
    .ok_or(Error::MissingIdentityToken)?;

    Ok(CanonicalTokens {
        id_token,
        access_token: pick(
            session.and_then(|s| s.access_token.as_ref()),
            embedded.and_then(|e| e.access_token.as_ref()),
        ),
        refresh_token: pick(
            session.and_then(|s| s.refresh_token.as_ref()),
            embedded.and_then(|e| e.refresh_token.as_ref()),
        ),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn secret(value: &str) -> Option<SecretString> {
        Some(SecretString::from(value.to_string()))
    }

    #[test]
    fn session_tokens_win_over_embedded() {
        let raw = RawAuthResult::Tokens(EmbeddedTokens {
            id_token: secret("embedded-id"),
            access_token: secret("embedded-access"),
            refresh_token: secret("embedded-refresh"),
        });
        let session = SessionTokens {
            id_token: secret("session-id"),
            access_token: None,
            refresh_token: secret("session-refresh"),
        };

        let tokens = extract(&raw, Some(&session)).unwrap();
        assert_eq!(tokens.id_token.expose_secret(), "session-id");
        assert_eq!(
            tokens.access_token.as_ref().map(|t| t.expose_secret()),
            Some("embedded-access")
        );
        assert_eq!(
            tokens.refresh_token.as_ref().map(|t| t.expose_secret()),
            Some("session-refresh")
        );
    }

    #[test]
    fn embedded_tokens_used_without_session() {
        let raw = RawAuthResult::Tokens(EmbeddedTokens {
            id_token: secret("embedded-id"),
            ..EmbeddedTokens::default()
        });

        let tokens = extract(&raw, None).unwrap();
        assert_eq!(tokens.id_token.expose_secret(), "embedded-id");
        assert!(tokens.access_token.is_none());
        assert!(tokens.refresh_token.is_none());
    }

    #[test]
    fn missing_id_token_fails() {
        let raw = RawAuthResult::Tokens(EmbeddedTokens {
            access_token: secret("access"),
            ..EmbeddedTokens::default()
        });
        let session = SessionTokens::default();

        let err = extract(&raw, Some(&session)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingIdentityToken);
    }

    #[test]
    fn empty_strings_count_as_absent() {
        let raw = RawAuthResult::Tokens(EmbeddedTokens {
            id_token: secret("embedded-id"),
            access_token: secret(""),
            refresh_token: None,
        });
        let session = SessionTokens {
            id_token: secret(""),
            ..SessionTokens::default()
        };

        let tokens = extract(&raw, Some(&session)).unwrap();
        assert_eq!(tokens.id_token.expose_secret(), "embedded-id");
        assert!(tokens.access_token.is_none());
    }

    #[test]
    fn challenge_result_only_uses_session() {
        let raw = RawAuthResult::ChallengeRequired {
            name: "SMS_MFA".to_string(),
        };
        assert!(extract(&raw, None).is_err());

        let session = SessionTokens {
            id_token: secret("session-id"),
            ..SessionTokens::default()
        };
        let tokens = extract(&raw, Some(&session)).unwrap();
        assert_eq!(tokens.id_token.expose_secret(), "session-id");
    }
}
