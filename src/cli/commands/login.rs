use clap::{Arg, ArgAction, ArgMatches, Command};
use secrecy::SecretString;

pub const ARG_EMAIL: &str = "email";
pub const ARG_PASSWORD: &str = "password";
pub const ARG_SKIP_DASHBOARD: &str = "skip-dashboard";

#[derive(Clone)]
pub struct Options {
    pub email: String,
    pub password: SecretString,
    pub skip_dashboard: bool,
}

impl Options {
    /// Parse sign-in credentials from matches.
    ///
    /// # Errors
    /// Returns an error if the email or password is missing.
    pub fn parse(matches: &ArgMatches) -> anyhow::Result<Self> {
        let email = matches
            .get_one::<String>(ARG_EMAIL)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .ok_or_else(|| anyhow::anyhow!("missing required argument: --{ARG_EMAIL}"))?;
        let password = matches
            .get_one::<String>(ARG_PASSWORD)
            .cloned()
            .map(SecretString::from)
            .ok_or_else(|| anyhow::anyhow!("missing required argument: --{ARG_PASSWORD}"))?;

        Ok(Self {
            email,
            password,
            skip_dashboard: matches.get_flag(ARG_SKIP_DASHBOARD),
        })
    }
}

impl std::fmt::Debug for Options {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Options")
            .field("email", &self.email)
            .field("password", &"***")
            .field("skip_dashboard", &self.skip_dashboard)
            .finish()
    }
}

/// Email and password arguments, shared by every subcommand that signs in.
#[must_use]
pub fn with_credential_args(command: Command) -> Command {
    command
        .arg(
            Arg::new(ARG_EMAIL)
                .short('e')
                .long(ARG_EMAIL)
                .help("Email address to sign in with")
                .env("TENANTAUTH_EMAIL")
                .required(true),
        )
        .arg(
            Arg::new(ARG_PASSWORD)
                .long(ARG_PASSWORD)
                .help("Current password")
                .env("TENANTAUTH_PASSWORD")
                .hide_env_values(true)
                .required(true),
        )
}

#[must_use]
pub fn with_args(command: Command) -> Command {
    with_credential_args(command).arg(
        Arg::new(ARG_SKIP_DASHBOARD)
            .long(ARG_SKIP_DASHBOARD)
            .help("Stop after the token exchange instead of loading the dashboard")
            .action(ArgAction::SetTrue),
    )
}
