pub mod login;
pub mod logout;
pub mod password;
pub mod pkce;

// Internal "interpreter" for `Action`.
mod run;

#[derive(Debug)]
pub enum Action {
    Login(login::Args),
    ChangePassword(password::Args),
    LogoutUrl(logout::Args),
    Pkce,
}

impl Action {
    /// Execute the action.
    /// # Errors
    /// Returns an error if the action fails.
    pub async fn execute(self) -> anyhow::Result<()> {
        run::execute(self).await
    }
}
