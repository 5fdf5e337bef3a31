use thiserror::Error;

/// Failures of a sign-in attempt and of the surrounding client operations.
///
/// Every variant is terminal for the attempt that produced it; nothing here is retried.
/// A tenant mismatch is deliberately absent: it is an outcome, not an error.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Unsupported identity provider challenge encountered: {0}")]
    UnsupportedChallenge(String),
    #[error("No id_token returned by the identity provider")]
    MissingIdentityToken,
    #[error("Not authenticated")]
    NotAuthenticated,
    #[error("Identity provider rejected the request: {0}")]
    Provider(String),
    #[error("Network error: {0}")]
    Network(String),
    #[error("Token exchange failed: {status} {message}")]
    ExchangeRejected { status: u16, message: String },
    #[error("Secure random source unavailable: {0}")]
    Entropy(String),
    #[error("Dashboard request failed: HTTP error! status: {status}")]
    Dashboard { status: u16 },
    #[error("Unreadable response from {0}")]
    InvalidResponse(String),
    #[error("New passwords do not match")]
    PasswordMismatch,
    #[error("Invalid input: {0}")]
    Validation(String),
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Fieldless discriminant of [`Error`], handy for matching and reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    UnsupportedChallenge,
    MissingIdentityToken,
    NotAuthenticated,
    Provider,
    Network,
    ExchangeRejected,
    Entropy,
    Dashboard,
    InvalidResponse,
    PasswordMismatch,
    Validation,
    Config,
}

impl Error {
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::UnsupportedChallenge(_) => ErrorKind::UnsupportedChallenge,
            Self::MissingIdentityToken => ErrorKind::MissingIdentityToken,
            Self::NotAuthenticated => ErrorKind::NotAuthenticated,
            Self::Provider(_) => ErrorKind::Provider,
            Self::Network(_) => ErrorKind::Network,
            Self::ExchangeRejected { .. } => ErrorKind::ExchangeRejected,
            Self::Entropy(_) => ErrorKind::Entropy,
            Self::Dashboard { .. } => ErrorKind::Dashboard,
            Self::InvalidResponse(_) => ErrorKind::InvalidResponse,
            Self::PasswordMismatch => ErrorKind::PasswordMismatch,
            Self::Validation(_) => ErrorKind::Validation,
            Self::Config(_) => ErrorKind::Config,
        }
    }

    /// HTTP status attached to the failure, if the remote side answered at all.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::ExchangeRejected { status, .. } | Self::Dashboard { status } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Network(format!("request timed out: {err}"))
        } else {
            Self::Network(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exchange_rejected_message_carries_status_text() {
        let err = Error::ExchangeRejected {
            status: 500,
            message: "Internal Server Error".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Token exchange failed: 500 Internal Server Error"
        );
        assert_eq!(err.kind(), ErrorKind::ExchangeRejected);
        assert_eq!(err.status(), Some(500));
    }

    #[test]
    fn kinds_without_status() {
        assert_eq!(Error::MissingIdentityToken.status(), None);
        assert_eq!(
            Error::UnsupportedChallenge("SMS_MFA".to_string()).kind(),
            ErrorKind::UnsupportedChallenge
        );
        assert_eq!(Error::PasswordMismatch.kind(), ErrorKind::PasswordMismatch);
    }
}
