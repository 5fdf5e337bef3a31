//! PKCE verifier/challenge generation (S256).

use crate::error::Error;
use base64ct::{Base64UrlUnpadded, Encoding};
use rand::{RngCore, rngs::OsRng};
use secrecy::{ExposeSecret, SecretString};
use sha2::{Digest, Sha256};

const VERIFIER_BYTES: usize = 32;

/// One-time PKCE pair, created fresh for each sign-in attempt.
#[derive(Clone)]
pub struct PkcePair {
    verifier: SecretString,
    challenge: String,
}

impl PkcePair {
    /// Draw 32 bytes from the OS CSPRNG and derive the pair.
    ///
    /// # Errors
    /// Returns `Error::Entropy` if the operating system cannot supply random bytes.
    pub fn generate() -> Result<Self, Error> {
        let mut random = [0u8; VERIFIER_BYTES];
        OsRng
            .try_fill_bytes(&mut random)
            .map_err(|e| Error::Entropy(e.to_string()))?;

        Ok(Self::from_verifier(Base64UrlUnpadded::encode_string(&random)))
    }

    /// Rebuild a pair from a known verifier.
    #[must_use]
    pub fn from_verifier(verifier: String) -> Self {
        let challenge = code_challenge_s256(&verifier);
        Self {
            verifier: SecretString::from(verifier),
            challenge,
        }
    }

    #[must_use]
    pub fn verifier(&self) -> &str {
        self.verifier.expose_secret()
    }

    #[must_use]
    pub fn challenge(&self) -> &str {
        &self.challenge
    }
}

impl std::fmt::Debug for PkcePair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PkcePair")
            .field("verifier", &"***")
            .field("challenge", &self.challenge)
            .finish()
    }
}

/// `BASE64URL-ENCODE(SHA256(ASCII(verifier)))` without padding.
#[must_use]
pub fn code_challenge_s256(verifier: &str) -> String {
    let digest = Sha256::digest(verifier.as_bytes());
    Base64UrlUnpadded::encode_string(&digest)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn generated_verifier_is_43_url_safe_chars() {
        let pair = PkcePair::generate().unwrap();
        assert_eq!(pair.verifier().len(), 43);
        assert!(
            pair.verifier()
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        );
        assert_eq!(pair.challenge().len(), 43);
    }

    #[test]
    fn challenge_matches_verifier() {
        for _ in 0..16 {
            let pair = PkcePair::generate().unwrap();
            assert_eq!(pair.challenge(), code_challenge_s256(pair.verifier()));
            assert!(!pair.challenge().contains('='));
        }
    }

    #[test]
    fn successive_verifiers_differ() {
        let first = PkcePair::generate().unwrap();
        let second = PkcePair::generate().unwrap();
        assert_ne!(first.verifier(), second.verifier());
    }

    #[test]
    fn rfc7636_appendix_b_vector() {
        let verifier = "dBjftJeZ4CVP-mB92K27uhbUJU1p1r_wW1gFWFOEjXk";
        assert_eq!(
            code_challenge_s256(verifier),
            "E9Melhoa2OwvFrEMTJguCHaoeK1t8URWbuGJSstw-cM"
        );
        // deterministic
        assert_eq!(code_challenge_s256(verifier), code_challenge_s256(verifier));
        assert_eq!(
            PkcePair::from_verifier(verifier.to_string()).challenge(),
            "E9Melhoa2OwvFrEMTJguCHaoeK1t8URWbuGJSstw-cM"
        );
    }

    #[test]
    fn debug_redacts_verifier() {
        let pair = PkcePair::from_verifier("super-secret-verifier".to_string());
        let debug = format!("{pair:?}");
        assert!(!debug.contains("super-secret-verifier"));
        assert!(debug.contains(pair.challenge()));
    }
}
