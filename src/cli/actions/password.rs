use crate::auth::{IdentityProvider, RawAuthResult};
use crate::cognito::{CognitoClient, CognitoConfig};
use crate::credentials::PasswordChange;
use crate::error::Error;
use anyhow::Result;
use tracing::info;

#[derive(Debug)]
pub struct Args {
    pub change: PasswordChange,
    pub cognito: CognitoConfig,
}

/// Sign in with the current password and replace it.
///
/// # Errors
/// Returns an error if the request fails the local checks, the sign-in fails or needs a
/// secondary challenge, or the provider rejects the new password.
pub async fn execute(args: Args) -> Result<()> {
    let Args { change, cognito } = args;
    change.check()?;

    let provider = CognitoClient::new(cognito)?;
    if let RawAuthResult::ChallengeRequired { name } =
        provider.authenticate(&change.email, &change.current).await?
    {
        return Err(Error::UnsupportedChallenge(name).into());
    }

    let result = provider
        .change_password(&change.current, &change.proposed)
        .await;
    provider.sign_out().await;
    result?;

    info!("password changed for {}", change.email);
    println!("Password changed successfully");

    Ok(())
}
