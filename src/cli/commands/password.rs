use crate::cli::commands::login::{ARG_EMAIL, ARG_PASSWORD};
use crate::credentials::PasswordChange;
use clap::{Arg, ArgMatches, Command};
use secrecy::SecretString;

pub const ARG_NEW_PASSWORD: &str = "new-password";
pub const ARG_CONFIRM_PASSWORD: &str = "confirm-password";

/// Parse a password change request from matches.
///
/// # Errors
/// Returns an error if any of the four values is missing.
pub fn parse(matches: &ArgMatches) -> anyhow::Result<PasswordChange> {
    let read_required = |id: &str| -> anyhow::Result<String> {
        matches
            .get_one::<String>(id)
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("missing required argument: --{id}"))
    };

    Ok(PasswordChange {
        email: read_required(ARG_EMAIL)?.trim().to_string(),
        current: SecretString::from(read_required(ARG_PASSWORD)?),
        proposed: SecretString::from(read_required(ARG_NEW_PASSWORD)?),
        confirmation: SecretString::from(read_required(ARG_CONFIRM_PASSWORD)?),
    })
}

#[must_use]
pub fn with_args(command: Command) -> Command {
    super::login::with_credential_args(command)
        .arg(
            Arg::new(ARG_NEW_PASSWORD)
                .long(ARG_NEW_PASSWORD)
                .help("New password")
                .env("TENANTAUTH_NEW_PASSWORD")
                .hide_env_values(true)
                .required(true),
        )
        .arg(
            Arg::new(ARG_CONFIRM_PASSWORD)
                .long(ARG_CONFIRM_PASSWORD)
                .help("New password again")
                .required(true),
        )
}
