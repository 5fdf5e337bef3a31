//! Map parsed subcommands to actions.

use crate::cli::actions::{Action, login, logout, password};
use crate::cli::commands::{self, cognito, gateway};
use anyhow::{Result, bail};

/// Map validated CLI matches to an action.
///
/// # Errors
/// Returns an error if required arguments are missing or inconsistent.
pub fn handler(matches: &clap::ArgMatches) -> Result<Action> {
    match matches.subcommand() {
        Some((commands::CMD_LOGIN, sub)) => {
            let credentials = commands::login::Options::parse(sub)?;
            let cognito = cognito::Options::parse(sub)?.into_config()?;
            let gateway = gateway::parse(sub)?;

            Ok(Action::Login(login::Args {
                email: credentials.email,
                password: credentials.password,
                skip_dashboard: credentials.skip_dashboard,
                cognito,
                gateway,
            }))
        }
        Some((commands::CMD_CHANGE_PASSWORD, sub)) => {
            let change = commands::password::parse(sub)?;
            let cognito = cognito::Options::parse(sub)?.into_config()?;

            Ok(Action::ChangePassword(password::Args { change, cognito }))
        }
        Some((commands::CMD_LOGOUT_URL, sub)) => {
            let redirect = cognito::parse_redirect_sign_out(sub)?;
            let cognito = cognito::Options::parse(sub)?.into_config()?;

            Ok(Action::LogoutUrl(logout::Args { cognito, redirect }))
        }
        Some((commands::CMD_PKCE, _)) => Ok(Action::Pkce),
        Some((other, _)) => bail!("unknown command: {other}"),
        None => bail!("missing command"),
    }
}
