//! # Tenantauth (Tenant-Scoped Sign-In)
//!
//! `tenantauth` signs a user in against a hosted identity provider and hands the
//! resulting tokens to a backend authority that validates the tenant and issues a
//! cookie-based session.
//!
//! ## Sign-in handshake
//!
//! 1. A fresh PKCE pair is generated for every attempt. Only the challenge leaves the
//!    process; the verifier is never sent to the identity provider.
//! 2. The identity provider authenticates the credentials. Secondary challenges (MFA,
//!    forced password change) are not supported and end the attempt.
//! 3. Tokens are normalized into an id/access/refresh record. The id token is mandatory.
//! 4. The tokens and the challenge are posted to the exchange endpoint, which answers
//!    with a session cookie, a tenant mismatch, or an error.
//!
//! ## Tenant mismatch
//!
//! The exchange endpoint overloads `401 Unauthorized`: a body carrying `logouturl` means
//! the identity is valid but belongs to another tenant. Callers get that URL back as a
//! distinct outcome so they can send the user through the provider's logout and into a
//! fresh login. A `401` without the URL is an ordinary failure.

pub mod auth;
pub mod cli;
pub mod cognito;
pub mod credentials;
pub mod dashboard;
pub mod error;
pub mod http;

pub use error::{Error, ErrorKind};

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};

pub const APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"),);
