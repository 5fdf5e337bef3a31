use crate::cli::actions::{Action, login, logout, password, pkce};
use anyhow::Result;

/// Execute the provided action.
// Single dispatch point for all CLI actions.
/// # Errors
/// Returns an error if the action fails.
pub async fn execute(action: Action) -> Result<()> {
    match action {
        Action::Login(args) => login::execute(args).await,
        Action::ChangePassword(args) => password::execute(args).await,
        Action::LogoutUrl(args) => logout::execute(&args),
        Action::Pkce => pkce::execute(),
    }
}
