//! Configuration file support.
//!
//! Settings are stored as a small JSON document with camelCase keys.
//! Lookup order is `--config <FILE>`, then `~/.jwtdebug.json`,
//! `~/.config/jwtdebug.json` and `~/.config/jwtdebug/config.json`. The
//! current directory is never searched.
//!
//! Command-line values always win: a config value is applied only when
//! the corresponding option was not given explicitly, which is read
//! from clap's [`ValueSource`].

use std::fs::{self, File, OpenOptions};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use clap::ArgMatches;
use clap::parser::ValueSource;
use serde::{Deserialize, Serialize};

use crate::cli::{Cli, OutputFormat};
use crate::core::InspectOptions;
use crate::error::JwtDebugError;

/// Maximum config file size in bytes (1 MiB).
pub const MAX_CONFIG_FILE_SIZE: u64 = 1_048_576;

/// File name used when saving without `--config`.
const DEFAULT_FILE_NAME: &str = ".jwtdebug.json";

/// Persisted user preferences.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Config {
    pub default_format: OutputFormat,
    pub color_enabled: bool,
    pub default_key_file: Option<PathBuf>,
    pub show_header: bool,
    pub show_claims: bool,
    pub show_signature: bool,
    pub show_expiration: bool,
    pub decode_signature: bool,
    pub ignore_expiration: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_format: OutputFormat::Pretty,
            color_enabled: true,
            default_key_file: None,
            show_header: false,
            show_claims: true,
            show_signature: false,
            show_expiration: false,
            decode_signature: false,
            ignore_expiration: false,
        }
    }
}

/// Candidate config locations under `home`, in lookup order.
pub fn default_paths(home: &Path) -> Vec<PathBuf> {
    vec![
        home.join(DEFAULT_FILE_NAME),
        home.join(".config").join("jwtdebug.json"),
        home.join(".config").join("jwtdebug").join("config.json"),
    ]
}

/// Load the configuration.
///
/// An explicit path must exist. Without one, the first existing default
/// location under `home` is used, or defaults when none exists.
///
/// # Errors
///
/// Returns [`JwtDebugError::ConfigLoad`] if the chosen file cannot be
/// read, is larger than [`MAX_CONFIG_FILE_SIZE`], or is not valid JSON.
pub fn load(explicit: Option<&Path>, home: Option<&Path>) -> Result<Config, JwtDebugError> {
    let path = match explicit {
        Some(path) => path.to_path_buf(),
        None => {
            let found = home
                .map(default_paths)
                .unwrap_or_default()
                .into_iter()
                .find(|path| path.is_file());
            match found {
                Some(path) => path,
                None => {
                    tracing::debug!("no config file found; using defaults");
                    return Ok(Config::default());
                }
            }
        }
    };

    tracing::debug!(path = %path.display(), "loading config file");
    read_config(&path)
}

fn read_config(path: &Path) -> Result<Config, JwtDebugError> {
    let load_error = |reason: String| JwtDebugError::ConfigLoad {
        path: path.display().to_string(),
        reason,
    };

    let file = File::open(path).map_err(|e| load_error(e.to_string()))?;
    let mut bytes = Vec::new();
    file.take(MAX_CONFIG_FILE_SIZE + 1)
        .read_to_end(&mut bytes)
        .map_err(|e| load_error(e.to_string()))?;
    if bytes.len() as u64 > MAX_CONFIG_FILE_SIZE {
        return Err(load_error(format!(
            "file exceeds maximum size of {MAX_CONFIG_FILE_SIZE} bytes"
        )));
    }

    serde_json::from_slice(&bytes).map_err(|e| load_error(e.to_string()))
}

/// Write `config` to `explicit`, or to `~/.jwtdebug.json`.
///
/// The file is created with mode 0600 on Unix.
///
/// # Errors
///
/// Returns [`JwtDebugError::ConfigSave`] if no destination can be
/// determined or the file cannot be written.
pub fn save(
    config: &Config,
    explicit: Option<&Path>,
    home: Option<&Path>,
) -> Result<PathBuf, JwtDebugError> {
    let path = match (explicit, home) {
        (Some(path), _) => path.to_path_buf(),
        (None, Some(home)) => home.join(DEFAULT_FILE_NAME),
        (None, None) => {
            return Err(JwtDebugError::ConfigSave {
                path: DEFAULT_FILE_NAME.to_string(),
                reason: "home directory could not be determined".to_string(),
            });
        }
    };
    let save_error = |reason: String| JwtDebugError::ConfigSave {
        path: path.display().to_string(),
        reason,
    };

    let mut data = serde_json::to_string_pretty(config).map_err(|e| save_error(e.to_string()))?;
    data.push('\n');

    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }
    let mut file = options.open(&path).map_err(|e| save_error(e.to_string()))?;
    // `mode` only applies on creation; tighten an existing file too.
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(&path, fs::Permissions::from_mode(0o600))
            .map_err(|e| save_error(e.to_string()))?;
    }
    file.write_all(data.as_bytes())
        .map_err(|e| save_error(e.to_string()))?;

    tracing::debug!(path = %path.display(), "saved config file");
    Ok(path)
}

/// Effective settings after merging the command line over the config.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub format: OutputFormat,
    pub color: bool,
    pub show_header: bool,
    pub show_claims: bool,
    pub show_signature: bool,
    pub show_expiration: bool,
    pub raw_claims: bool,
    pub verify: bool,
    pub quiet: bool,
    pub strict: bool,
    pub ignore_expiration: bool,
    pub decode_signature: bool,
    pub key_file: Option<PathBuf>,
}

impl Settings {
    /// Merge parsed arguments over `config`.
    ///
    /// `matches` must be the matches `cli` was built from. `--no-color`
    /// and `--all` are applied after the merge.
    pub fn merge(cli: &Cli, matches: &ArgMatches, config: &Config) -> Self {
        let explicit = |id: &str| matches.value_source(id) == Some(ValueSource::CommandLine);
        let pick = |id: &str, from_cli: bool, from_config: bool| {
            if explicit(id) { from_cli } else { from_config }
        };

        let key_file = cli.key_file.clone().or_else(|| {
            config
                .default_key_file
                .clone()
                .filter(|path| !path.as_os_str().is_empty())
        });

        let mut settings = Self {
            format: if explicit("output") {
                cli.output
            } else {
                config.default_format
            },
            color: pick("color", cli.color, config.color_enabled),
            show_header: pick("header", cli.header, config.show_header),
            show_claims: pick("claims", cli.claims, config.show_claims),
            show_signature: pick("signature", cli.signature, config.show_signature),
            show_expiration: pick("expiration", cli.expiration, config.show_expiration),
            raw_claims: cli.raw_claims,
            verify: cli.verify,
            quiet: cli.quiet,
            strict: cli.strict,
            ignore_expiration: pick(
                "ignore_expiration",
                cli.ignore_expiration,
                config.ignore_expiration,
            ),
            decode_signature: pick(
                "decode_signature",
                cli.decode_signature,
                config.decode_signature,
            ),
            key_file,
        };

        if cli.no_color {
            settings.color = false;
        }
        if cli.all {
            settings.show_header = true;
            settings.show_claims = true;
            settings.show_signature = true;
            settings.show_expiration = true;
        }
        settings
    }

    /// Options consumed by the per-token pipeline.
    pub fn pipeline(&self) -> InspectOptions {
        InspectOptions {
            strict: self.strict,
            ignore_expiration: self.ignore_expiration,
            key_file: self.key_file.clone(),
            decode_signature: self.decode_signature,
        }
    }

    /// The settings as they would be persisted by `--save-config`.
    pub fn to_config(&self) -> Config {
        Config {
            default_format: self.format,
            color_enabled: self.color,
            default_key_file: self.key_file.clone(),
            show_header: self.show_header,
            show_claims: self.show_claims,
            show_signature: self.show_signature,
            show_expiration: self.show_expiration,
            decode_signature: self.decode_signature,
            ignore_expiration: self.ignore_expiration,
        }
    }
}
