use crate::cognito::CognitoConfig;
use anyhow::Result;
use url::Url;

#[derive(Debug)]
pub struct Args {
    pub cognito: CognitoConfig,
    pub redirect: Url,
}

/// Print the hosted logout URL.
///
/// # Errors
/// Returns an error if the configured domain does not form a valid URL.
pub fn execute(args: &Args) -> Result<()> {
    println!("{}", args.cognito.logout_url(&args.redirect)?);
    Ok(())
}
