use crate::auth::PkcePair;
use anyhow::Result;
use serde_json::json;

/// Print a fresh pair, for checking a backend's challenge verification by hand.
///
/// # Errors
/// Returns an error if the operating system random source fails.
pub fn execute() -> Result<()> {
    let pair = PkcePair::generate()?;
    let output = json!({
        "code_verifier": pair.verifier(),
        "code_challenge": pair.challenge(),
        "code_challenge_method": "S256",
    });
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
