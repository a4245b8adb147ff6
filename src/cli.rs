//! CLI argument definitions for jwtdebug.
//!
//! Uses `clap` derive macros to define the command-line interface.
//! Display and verification switches are booleans that also accept an
//! explicit value (`--claims=false`), so a command-line choice can
//! override the configuration file in either direction.
//!
//! # Security
//!
//! `Cli` implements a custom `Debug` to redact the token arguments and
//! prevent accidental leakage through debug formatting or logging.

use std::fmt;
use std::path::PathBuf;

use clap::{ArgAction, Parser, ValueEnum};
use clap_complete::Shell;
use serde::{Deserialize, Serialize};

/// Decode, inspect and optionally verify JSON Web Tokens (JWTs).
///
/// Tokens may be given as arguments, read from an environment variable,
/// or piped in on stdin one per line. Surrounding noise such as
/// `Bearer `, cookie attributes or a JSON wrapper is stripped unless
/// --strict is set.
#[derive(Parser)]
#[command(name = "jwtdebug")]
#[command(version, about, long_about = None, disable_version_flag = true)]
#[command(after_help = "Examples:\n  \
    jwtdebug eyJhbGciOi...\n  \
    jwtdebug -a --output json \"Bearer eyJhbGciOi...\"\n  \
    jwtdebug --verify --key-file public.pem eyJhbGciOi...\n  \
    pbpaste | jwtdebug -e")]
pub struct Cli {
    /// Tokens to inspect. Use `-` to read from stdin.
    #[arg(value_name = "TOKEN")]
    pub tokens: Vec<String>,

    /// Show all token parts and info.
    #[arg(short = 'a', long, help_heading = "Display")]
    pub all: bool,

    /// Show the token header.
    #[arg(
        short = 'H',
        long,
        help_heading = "Display",
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "true",
        default_value_t = false,
        action = ArgAction::Set,
    )]
    pub header: bool,

    /// Show the token claims.
    #[arg(
        short = 'c',
        long,
        help_heading = "Display",
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "true",
        default_value_t = true,
        action = ArgAction::Set,
    )]
    pub claims: bool,

    /// Show the token signature.
    #[arg(
        short = 's',
        long,
        help_heading = "Display",
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "true",
        default_value_t = false,
        action = ArgAction::Set,
    )]
    pub signature: bool,

    /// Show expiration status.
    #[arg(
        short = 'e',
        long,
        alias = "expiry",
        help_heading = "Display",
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "true",
        default_value_t = false,
        action = ArgAction::Set,
    )]
    pub expiration: bool,

    /// Decode the signature from base64url to hex.
    #[arg(
        long,
        alias = "decode-sig",
        help_heading = "Display",
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "true",
        default_value_t = false,
        action = ArgAction::Set,
    )]
    pub decode_signature: bool,

    /// Output only the raw claims JSON (for piping to jq).
    #[arg(long, help_heading = "Display")]
    pub raw_claims: bool,

    /// Verify the token signature (requires --key-file).
    #[arg(short = 'V', long, help_heading = "Verification")]
    pub verify: bool,

    /// Key file: raw secret for HS*, PEM public key otherwise.
    #[arg(
        short = 'k',
        long,
        alias = "key",
        value_name = "FILE",
        help_heading = "Verification"
    )]
    pub key_file: Option<PathBuf>,

    /// Accept tokens whose only fault is exp or nbf when verifying.
    #[arg(
        long,
        alias = "ignore-exp",
        help_heading = "Verification",
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "true",
        default_value_t = false,
        action = ArgAction::Set,
    )]
    pub ignore_expiration: bool,

    /// Output format.
    #[arg(
        short = 'o',
        long,
        alias = "format",
        value_enum,
        default_value_t = OutputFormat::Pretty,
        help_heading = "Output"
    )]
    pub output: OutputFormat,

    /// Colorize output.
    #[arg(
        long,
        help_heading = "Output",
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "true",
        default_value_t = true,
        action = ArgAction::Set,
    )]
    pub color: bool,

    /// Disable colored output.
    #[arg(long, help_heading = "Output")]
    pub no_color: bool,

    /// Path to a config file.
    #[arg(long, value_name = "FILE", help_heading = "Configuration")]
    pub config: Option<PathBuf>,

    /// Save the current settings to the config file.
    #[arg(long, help_heading = "Configuration")]
    pub save_config: bool,

    /// Disable smart extraction (expect exact JWT input).
    #[arg(long, help_heading = "Input")]
    pub strict: bool,

    /// Read the token from the specified environment variable.
    #[arg(long, value_name = "VAR_NAME", help_heading = "Input")]
    pub token_env: Option<String>,

    /// Suppress informational notices.
    #[arg(short = 'q', long)]
    pub quiet: bool,

    /// Enable debug logging on stderr.
    #[arg(short = 'v', long)]
    pub verbose: bool,

    /// Generate a shell completion script.
    #[arg(long, value_name = "SHELL", value_enum)]
    pub completion: Option<Shell>,

    /// Print version.
    #[arg(long, action = ArgAction::Version)]
    pub version: Option<bool>,
}

/// Output formats for decoded token data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Aligned, human-readable sections.
    Pretty,
    /// One JSON document per token.
    Json,
    /// Sorted `key: value` lines.
    Raw,
}

/// Custom `Debug` that redacts the token arguments to prevent accidental
/// leakage.
impl fmt::Debug for Cli {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cli")
            .field("tokens", &format_args!("[{} REDACTED]", self.tokens.len()))
            .field("all", &self.all)
            .field("header", &self.header)
            .field("claims", &self.claims)
            .field("signature", &self.signature)
            .field("expiration", &self.expiration)
            .field("decode_signature", &self.decode_signature)
            .field("raw_claims", &self.raw_claims)
            .field("verify", &self.verify)
            .field("key_file", &self.key_file)
            .field("ignore_expiration", &self.ignore_expiration)
            .field("output", &self.output)
            .field("color", &self.color)
            .field("no_color", &self.no_color)
            .field("config", &self.config)
            .field("save_config", &self.save_config)
            .field("strict", &self.strict)
            .field("token_env", &self.token_env)
            .field("quiet", &self.quiet)
            .field("verbose", &self.verbose)
            .field("completion", &self.completion)
            .field("version", &self.version)
            .finish()
    }
}
