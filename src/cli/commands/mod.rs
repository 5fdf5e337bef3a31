pub mod cognito;
pub mod gateway;
pub mod logging;
pub mod login;
pub mod password;

use clap::{
    ColorChoice, Command,
    builder::styling::{AnsiColor, Effects, Styles},
};

pub const CMD_LOGIN: &str = "login";
pub const CMD_CHANGE_PASSWORD: &str = "change-password";
pub const CMD_LOGOUT_URL: &str = "logout-url";
pub const CMD_PKCE: &str = "pkce";

#[must_use]
pub fn new() -> Command {
    let styles = Styles::styled()
        .header(AnsiColor::Yellow.on_default() | Effects::BOLD)
        .usage(AnsiColor::Green.on_default() | Effects::BOLD)
        .literal(AnsiColor::Blue.on_default() | Effects::BOLD)
        .placeholder(AnsiColor::Green.on_default());

    let long_version: &'static str = Box::leak(
        format!("{} - {}", env!("CARGO_PKG_VERSION"), crate::GIT_COMMIT_HASH).into_boxed_str(),
    );

    let login = Command::new(CMD_LOGIN)
        .about("Sign in and exchange the tokens for a tenant session");
    let login = login::with_args(login);
    let login = cognito::with_args(login);
    let login = gateway::with_args(login);

    let change_password =
        Command::new(CMD_CHANGE_PASSWORD).about("Sign in and change the account password");
    let change_password = password::with_args(change_password);
    let change_password = cognito::with_args(change_password);

    let logout_url = Command::new(CMD_LOGOUT_URL)
        .about("Print the hosted logout URL that ends the provider session");
    let logout_url = cognito::with_sign_out_args(logout_url);
    let logout_url = cognito::with_args(logout_url);

    let pkce = Command::new(CMD_PKCE).about("Print a fresh PKCE verifier/challenge pair as JSON");

    let command = Command::new("tenantauth")
        .about("Tenant-scoped sign-in with PKCE token exchange")
        .version(env!("CARGO_PKG_VERSION"))
        .long_version(long_version)
        .color(ColorChoice::Auto)
        .styles(styles)
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(login)
        .subcommand(change_password)
        .subcommand(logout_url)
        .subcommand(pkce);

    logging::with_args(command)
}
