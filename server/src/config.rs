//! Configuration loading and defaults.
//!
//! Configuration is resolved in order of precedence (highest wins):
//!
//! 1. **Environment variables** — `PORT`, `KEYGATE_HOST`
//! 2. **Config file** — path via `--config <path>`, or `keygate.toml` in CWD
//! 3. **Compiled defaults** — see each field's default value below
//!
//! The TOML file mirrors the struct hierarchy:
//!
//! ```toml
//! [server]
//! host = "0.0.0.0"
//! port = 8080
//!
//! [hashing]
//! memory_kib = 19456
//! iterations = 2
//! parallelism = 1
//!
//! [logging]
//! level = "info"
//!
//! [team]
//! name = "Industrial MakerSpace"
//! description = "We are team Lorax and can now also code API endpoints."
//! members = ["Joe", "Katy", "Malte", "Jinjun"]
//!
//! [[team.images]]
//! name = "Joe"
//! data = "iVBORw0KGgo..."
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::keys::HashConfig;

/// Config file looked up in the working directory when `--config` is absent.
pub const DEFAULT_CONFIG_FILE: &str = "keygate.toml";

/// Errors raised while assembling the configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid value for {var}: {value:?}")]
    InvalidEnv { var: &'static str, value: String },
}

/// Top-level configuration, deserialized from TOML.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub hashing: HashConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub team: TeamConfig,
}

/// HTTP listener settings.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Bind host (default `0.0.0.0`). Override with `KEYGATE_HOST`.
    #[serde(default = "default_host")]
    pub host: String,
    /// Listening port (default 8080). Override with `PORT`.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl ServerConfig {
    /// `host:port` string suitable for `TcpListener::bind`.
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// tracing filter level (default `info`). Overridden by `RUST_LOG` env var.
    #[serde(default = "default_log_level")]
    pub level: String,
}

/// Content served by the protected `/api/v1/*` demo routes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamConfig {
    #[serde(default = "default_team_name")]
    pub name: String,
    #[serde(default = "default_team_description", skip_serializing)]
    pub description: String,
    #[serde(default = "default_team_members")]
    pub members: Vec<String>,
    /// Base64 image payloads served by `/api/v1/images`.
    #[serde(default = "default_team_images", skip_serializing)]
    pub images: Vec<TeamImage>,
}

/// One named image, `data` being base64-encoded PNG.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamImage {
    pub name: String,
    pub data: String,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_port() -> u16 {
    8080
}
fn default_log_level() -> String {
    "info".to_string()
}
fn default_team_name() -> String {
    "Industrial MakerSpace".to_string()
}
fn default_team_description() -> String {
    "We are team Lorax and can now also code API endpoints. 🚀".to_string()
}
fn default_team_members() -> Vec<String> {
    ["Joe", "Katy", "Malte", "Jinjun"]
        .into_iter()
        .map(String::from)
        .collect()
}

fn default_team_images() -> Vec<TeamImage> {
    [
        ("Joe", "Joe Enno Karl Lammers.png"),
        ("Katy", "Katy Grossmann.png"),
        ("Malte", "Malte Oberhoff.png"),
        ("Jinjun", "Jinjun Dong.png"),
    ]
    .into_iter()
    .map(|(name, file)| TeamImage {
        name: name.to_string(),
        data: format!("iVBORw0KGgo... (base64 for {file})"),
    })
    .collect()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl Default for TeamConfig {
    fn default() -> Self {
        Self {
            name: default_team_name(),
            description: default_team_description(),
            members: default_team_members(),
            images: default_team_images(),
        }
    }
}

impl Config {
    /// Load configuration with the precedence chain: env vars > file > defaults.
    ///
    /// If `path` is `Some`, that file must exist. Otherwise `keygate.toml` in
    /// the current directory is used when present, falling back to defaults.
    pub fn load(path: Option<&str>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(p) => Self::from_file(p)?,
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => {
                Self::from_file(DEFAULT_CONFIG_FILE)?
            }
            None => Config::default(),
        };

        config.apply_env(|var| std::env::var(var).ok())?;
        Ok(config)
    }

    /// Parse a TOML document.
    pub fn from_toml(content: &str, path: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|source| ConfigError::Parse {
            path: path.to_string(),
            source,
        })
    }

    fn from_file(path: &str) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_string(),
            source,
        })?;
        Self::from_toml(&content, path)
    }

    /// Apply env var overrides, looked up through `lookup`.
    fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<(), ConfigError> {
        if let Some(port) = lookup("PORT") {
            self.server.port = port.trim().parse().map_err(|_| ConfigError::InvalidEnv {
                var: "PORT",
                value: port,
            })?;
        }
        if let Some(host) = lookup("KEYGATE_HOST") {
            self.server.host = host;
        }
        Ok(())
    }
}
