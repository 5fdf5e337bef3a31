use crate::cli::{
    actions::Action,
    commands, dispatch,
    telemetry::{self, Telemetry},
};
use anyhow::Result;

/// Map verbosity count to tracing level
const fn get_verbosity_level(verbosity: u8) -> Option<tracing::Level> {
    match verbosity {
        0 => None,
        1 => Some(tracing::Level::WARN),
        2 => Some(tracing::Level::INFO),
        3 => Some(tracing::Level::DEBUG),
        _ => Some(tracing::Level::TRACE),
    }
}

/// Main entry point for the CLI - builds the Action and the telemetry guard that must
/// outlive it
///
/// # Errors
///
/// Returns an error if argument parsing, telemetry initialization, or action dispatch fails
pub fn start() -> Result<(Action, Telemetry)> {
    let matches = commands::new().get_matches();

    let verbosity_level = get_verbosity_level(
        matches
            .get_one::<u8>(commands::logging::ARG_VERBOSITY)
            .copied()
            .unwrap_or(0),
    );

    let telemetry = telemetry::init(
        verbosity_level,
        matches.subcommand_name().unwrap_or_default(),
    )?;

    let action = dispatch::handler(&matches)?;

    Ok((action, telemetry))
}
