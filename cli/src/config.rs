//! Command-line arguments and base URL resolution.
//!
//! The API base URL is taken from, in order:
//!
//! 1. `--url <url>`
//! 2. `KEYGATE_API_URL` environment variable
//! 3. `http://localhost:8080`

use clap::{Parser, Subcommand};
use thiserror::Error;

/// Base URL used when neither `--url` nor `KEYGATE_API_URL` is set.
pub const DEFAULT_API_URL: &str = "http://localhost:8080";

/// CLI arguments parsed by `clap`.
#[derive(Parser)]
#[command(name = "keygate-cli", version, about = "Manage keys on a keygate server")]
pub struct Cli {
    /// Base URL of the keygate API.
    #[arg(long, global = true)]
    pub url: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Issue a new API key. The plaintext key is printed once; store it.
    Generate,
    /// List issued keys (masked).
    List,
    /// Revoke a key by id.
    Delete {
        /// Key id, e.g. `key_3f1c...`.
        id: String,
    },
    /// Call the protected `/hello` route.
    Hello {
        /// Plaintext API key to send as `x-api-key`.
        #[arg(long, env = "KEYGATE_API_KEY", hide_env_values = true)]
        api_key: String,
    },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("API URL is empty")]
    EmptyUrl,
    #[error("API URL must start with http:// or https://, got {0:?}")]
    BadScheme(String),
}

/// Pick the base URL from the flag, then the env value, then the default.
/// The result has no trailing slash.
pub fn resolve_base_url(
    flag: Option<&str>,
    env: Option<&str>,
) -> Result<String, ConfigError> {
    let url = flag.or(env).unwrap_or(DEFAULT_API_URL).trim();
    if url.is_empty() {
        return Err(ConfigError::EmptyUrl);
    }
    if !(url.starts_with("http://") || url.starts_with("https://")) {
        return Err(ConfigError::BadScheme(url.to_string()));
    }
    Ok(url.trim_end_matches('/').to_string())
}
