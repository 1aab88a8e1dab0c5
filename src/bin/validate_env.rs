//! Validate the helper environment and Coinbase credentials.
//!
//! Run with: cargo run --bin validate-env -- [--env-file <path>]

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use coinbase_brokerage_client::auth::{CredentialsProvider, FileCredentials, SigningKey};
use coinbase_brokerage_client::config::{EnvConfig, resolve_env_file};
use coinbase_brokerage_client::{CoinbaseError, logging};

const HELP: &str = "\
Validate helper environment and Coinbase credentials.

Usage:
  validate-env [--env-file <path>]

Options:
  --env-file <path>  Override env file path
  -h, --help         Show this help message";

enum Command {
    Help,
    Validate { env_file: Option<PathBuf> },
}

fn parse_args(args: impl IntoIterator<Item = String>) -> Result<Command, CoinbaseError> {
    let mut env_file = None;
    let mut args = args.into_iter();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-h" | "--help" => return Ok(Command::Help),
            "--env-file" => {
                let path = args.next().ok_or_else(|| {
                    CoinbaseError::Config("--env-file requires a path argument".to_string())
                })?;
                env_file = Some(PathBuf::from(path));
            }
            other => {
                return Err(CoinbaseError::Config(format!("Unknown argument: {other}")));
            }
        }
    }
    Ok(Command::Validate { env_file })
}

async fn validate(env_file: Option<PathBuf>) -> Result<(), CoinbaseError> {
    let resolved = resolve_env_file(env_file.as_deref(), |name| std::env::var(name).ok())
        .ok_or_else(|| CoinbaseError::Config("cannot determine env file location".to_string()))?;
    if !tokio::fs::try_exists(&resolved).await? {
        return Err(CoinbaseError::Config(format!(
            "env file {} does not exist",
            resolved.display()
        )));
    }

    let config = EnvConfig::load(Some(&resolved))?;
    logging::init(config.log_level)?;

    let credentials = FileCredentials::load(&config.credentials_path).await?;
    SigningKey::from_credentials(credentials.get_credentials())?;

    tracing::debug!("signing key for {} is usable", credentials.get_credentials().name);

    // The report is the tool's output, independent of the log level.
    println!("{}", success_report(&resolved, &config.credentials_path));
    Ok(())
}

fn success_report(env_file: &Path, credentials_path: &Path) -> String {
    format!(
        "Environment configuration is valid.\nEnv file: {}\nCredentials file: {}",
        env_file.display(),
        credentials_path.display()
    )
}

#[tokio::main]
async fn main() -> ExitCode {
    let env_file = match parse_args(std::env::args().skip(1)) {
        Ok(Command::Help) => {
            println!("{HELP}");
            return ExitCode::SUCCESS;
        }
        Ok(Command::Validate { env_file }) => env_file,
        Err(e) => {
            eprintln!("Environment validation failed: {e}");
            return ExitCode::FAILURE;
        }
    };

    match validate(env_file).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            // The subscriber may not be installed yet.
            eprintln!("Environment validation failed: {e}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_parse_args() {
        assert!(matches!(parse_args(args(&["-h"])), Ok(Command::Help)));
        match parse_args(args(&["--env-file", "/tmp/x.env"])).unwrap() {
            Command::Validate { env_file } => assert_eq!(env_file, Some(PathBuf::from("/tmp/x.env"))),
            Command::Help => panic!("unexpected help"),
        }
        assert!(parse_args(args(&["--env-file"])).is_err());
        assert!(parse_args(args(&["--verbose"])).is_err());
    }

    #[test]
    fn test_success_report_lists_both_files() {
        let report = success_report(Path::new("/etc/helper/.env"), Path::new("/keys/cb.json"));
        let lines: Vec<&str> = report.lines().collect();
        assert_eq!(
            lines,
            vec![
                "Environment configuration is valid.",
                "Env file: /etc/helper/.env",
                "Credentials file: /keys/cb.json",
            ]
        );
    }
}
