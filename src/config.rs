//! Environment configuration.
//!
//! Settings come from process environment variables, optionally primed from a
//! dotenv file. The file is looked up in this order:
//!
//! 1. an explicit path (e.g. `--env-file`)
//! 2. `HELPER_ENV_FILE`
//! 3. `$XDG_CONFIG_HOME/helper/.env`
//! 4. `~/.config/helper/.env`
//!
//! A missing file is not an error. Variables already set in the process
//! environment take precedence over the file.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use secrecy::SecretString;
use tracing_subscriber::filter::LevelFilter;

use crate::error::CoinbaseError;

/// Path to the Coinbase API key JSON file (required).
pub const CREDENTIALS_PATH_VAR: &str = "HELPER_COINBASE_CREDENTIALS_PATH";
/// Postgres database name (optional).
pub const POSTGRES_DATABASE_VAR: &str = "HELPER_POSTGRES_DATABASE";
/// Postgres user (optional).
pub const POSTGRES_USERNAME_VAR: &str = "HELPER_POSTGRES_USERNAME";
/// Postgres password (optional).
pub const POSTGRES_PASSWORD_VAR: &str = "HELPER_POSTGRES_PASSWORD";
/// Log level (optional, default `info`).
pub const LOG_LEVEL_VAR: &str = "HELPER_LOG_LEVEL";
/// Explicit dotenv file location (optional).
pub const ENV_FILE_VAR: &str = "HELPER_ENV_FILE";

const APP_DIR: &str = "helper";

/// Minimum severity of emitted log events.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LogLevel {
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

impl FromStr for LogLevel {
    type Err = CoinbaseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            other => Err(CoinbaseError::Config(format!(
                "invalid log level {other:?}, expected one of debug, info, warn, error"
            ))),
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Debug => LevelFilter::DEBUG,
            LogLevel::Info => LevelFilter::INFO,
            LogLevel::Warn => LevelFilter::WARN,
            LogLevel::Error => LevelFilter::ERROR,
        }
    }
}

/// Optional Postgres connection settings.
#[derive(Debug, Default)]
pub struct PostgresConfig {
    pub database: Option<String>,
    pub username: Option<String>,
    pub password: Option<SecretString>,
}

/// Validated environment.
#[derive(Debug)]
pub struct EnvConfig {
    /// Location of the Coinbase API key file.
    pub credentials_path: PathBuf,
    pub postgres: PostgresConfig,
    pub log_level: LogLevel,
}

impl EnvConfig {
    /// Prime the process environment from the dotenv file and validate it.
    pub fn load(explicit_env_file: Option<&Path>) -> Result<Self, CoinbaseError> {
        let lookup = |name: &str| std::env::var(name).ok();
        if let Some(path) = resolve_env_file(explicit_env_file, lookup) {
            match dotenvy::from_path(&path) {
                Ok(()) => tracing::debug!("loaded environment from {}", path.display()),
                Err(e) if e.not_found() => {
                    tracing::debug!("no env file at {}", path.display());
                }
                Err(e) => {
                    return Err(CoinbaseError::Config(format!(
                        "cannot read env file {}: {e}",
                        path.display()
                    )));
                }
            }
        }
        Self::from_lookup(lookup)
    }

    /// Validate variables provided by `lookup`.
    ///
    /// All problems are reported together, one per line.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, CoinbaseError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut problems = Vec::new();

        let credentials_path = match lookup(CREDENTIALS_PATH_VAR) {
            Some(path) if !path.is_empty() => Some(PathBuf::from(path)),
            Some(_) => {
                problems.push(format!("{CREDENTIALS_PATH_VAR} must not be empty"));
                None
            }
            None => {
                problems.push(format!("{CREDENTIALS_PATH_VAR} is required"));
                None
            }
        };

        let mut optional = |name: &str| match lookup(name) {
            Some(value) if value.is_empty() => {
                problems.push(format!("{name} must not be empty when set"));
                None
            }
            value => value,
        };
        let postgres = PostgresConfig {
            database: optional(POSTGRES_DATABASE_VAR),
            username: optional(POSTGRES_USERNAME_VAR),
            password: optional(POSTGRES_PASSWORD_VAR).map(SecretString::from),
        };

        let log_level = match lookup(LOG_LEVEL_VAR) {
            Some(raw) => raw.parse::<LogLevel>().unwrap_or_else(|e| {
                problems.push(format!("{LOG_LEVEL_VAR}: {e}"));
                LogLevel::default()
            }),
            None => LogLevel::default(),
        };

        match credentials_path {
            Some(credentials_path) if problems.is_empty() => Ok(Self {
                credentials_path,
                postgres,
                log_level,
            }),
            _ => Err(CoinbaseError::Config(problems.join("\n"))),
        }
    }
}

/// Pick the dotenv file to load.
pub fn resolve_env_file<F>(explicit: Option<&Path>, lookup: F) -> Option<PathBuf>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }
    if let Some(path) = lookup(ENV_FILE_VAR).filter(|p| !p.is_empty()) {
        return Some(PathBuf::from(path));
    }
    let config_home = lookup("XDG_CONFIG_HOME")
        .filter(|p| !p.is_empty())
        .map(PathBuf::from)
        .or_else(|| dirs::home_dir().map(|home| home.join(".config")))?;
    Some(config_home.join(APP_DIR).join(".env"))
}
