//! jwtdebug: decode, inspect and optionally verify JSON Web Tokens.
//!
//! Entry point for the application. Parses CLI arguments, merges them
//! over the configuration file and delegates to the command handlers.

#![forbid(unsafe_code)]

mod cli;
mod commands;
mod config;
mod core;
mod display;
mod error;
mod logging;

use std::io::IsTerminal;
use std::process::ExitCode;

use anyhow::Result;
use clap::{CommandFactory, FromArgMatches};
use colored::Colorize;

use cli::Cli;
use config::Settings;
use error::{ExitStatus, JwtDebugError, VerificationError};

fn main() -> ExitCode {
    match run() {
        Ok(status) => status.into(),
        Err(e) => {
            eprintln!("Error: {e:#}");
            exit_status_for(&e).into()
        }
    }
}

/// Parse CLI arguments and dispatch to the appropriate command handler.
///
/// Returns the exit status so the caller can exit without
/// `process::exit`, allowing all destructors (including `Zeroizing`)
/// to run.
fn run() -> Result<ExitStatus> {
    let matches = Cli::command().get_matches();
    let cli = Cli::from_arg_matches(&matches)?;

    logging::init(cli.verbose);
    tracing::debug!(?cli, "parsed arguments");

    if let Some(shell) = cli.completion {
        commands::completion::execute(shell);
        return Ok(ExitStatus::Success);
    }

    let home = dirs::home_dir();
    let config = match cli.config.as_deref() {
        Some(path) if cli.save_config && !path.exists() => {
            tracing::debug!(path = %path.display(), "config file will be created");
            config::Config::default()
        }
        explicit => config::load(explicit, home.as_deref())?,
    };
    let settings = Settings::merge(&cli, &matches, &config);
    colored::control::set_override(use_color(settings.color));

    if cli.save_config {
        let path = config::save(&settings.to_config(), cli.config.as_deref(), home.as_deref())?;
        if !settings.quiet {
            eprintln!(
                "{}",
                format!("Configuration saved to {}", path.display()).green()
            );
        }
        if cli.tokens.is_empty() && cli.token_env.is_none() {
            return Ok(ExitStatus::Success);
        }
    }

    commands::inspect::execute(&cli, &settings)
}

/// Colors need the setting on, `NO_COLOR` unset or empty, and a terminal.
fn use_color(enabled: bool) -> bool {
    let no_color = std::env::var_os("NO_COLOR").is_some_and(|value| !value.is_empty());
    enabled && !no_color && std::io::stdout().is_terminal()
}

/// Map an error to its exit status by looking for the domain types.
fn exit_status_for(err: &anyhow::Error) -> ExitStatus {
    if let Some(e) = err.downcast_ref::<JwtDebugError>() {
        return e.exit_status();
    }
    if let Some(e) = err.downcast_ref::<VerificationError>() {
        return e.exit_status();
    }
    ExitStatus::Error
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_status_for_domain_errors() {
        let err = anyhow::Error::from(JwtDebugError::InvalidTokenFormat {
            parts: 1,
            snippet: "x".to_string(),
        });
        assert_eq!(exit_status_for(&err), ExitStatus::InvalidToken);

        let err = anyhow::Error::from(JwtDebugError::ConfigLoad {
            path: "c.json".to_string(),
            reason: "bad".to_string(),
        })
        .context("loading settings");
        assert_eq!(exit_status_for(&err), ExitStatus::ConfigError);

        let err = anyhow::Error::from(VerificationError::MissingKeyFile);
        assert_eq!(exit_status_for(&err), ExitStatus::ConfigError);

        let err = anyhow::anyhow!("something else");
        assert_eq!(exit_status_for(&err), ExitStatus::Error);
    }

    #[test]
    fn test_color_disabled_setting_wins() {
        assert!(!use_color(false));
    }
}
