//! Runtime configuration.
//!
//! `ENV` picks the source: `prod` reads everything from process environment
//! variables, anything else reads a JSON config file (`SERMO_CONFIG`, default
//! `config.json`) with built-in defaults for whatever it leaves out.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use tracing::warn;

pub const DEFAULT_CONFIG_PATH: &str = "config.json";
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8010;
pub const DEFAULT_DB_TIMEOUT_SECS: u64 = 5;
/// Development-only signing secret. Never accepted in production.
pub const DEV_SIGNING_SECRET: &str = "dev-secret-change-me";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Dev,
    Test,
    Prod,
}

impl Environment {
    pub fn from_name(name: Option<&str>) -> Self {
        match name {
            Some("prod") => Environment::Prod,
            Some("test") => Environment::Test,
            _ => Environment::Dev,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Dev => "dev",
            Environment::Test => "test",
            Environment::Prod => "prod",
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required setting {0}")]
    Missing(&'static str),

    #[error("invalid value for {key}: {value:?}")]
    Invalid { key: &'static str, value: String },

    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// A number or a numeric string; config files in the wild use both.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum NumberOrString {
    Number(u64),
    Text(String),
}

impl NumberOrString {
    fn as_text(&self) -> String {
        match self {
            NumberOrString::Number(n) => n.to_string(),
            NumberOrString::Text(s) => s.clone(),
        }
    }
}

/// Keys recognized in the non-production config file.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct ConfigFile {
    #[serde(rename = "APP_DB_PATH")]
    pub app_db_path: Option<String>,
    #[serde(rename = "TEST_DB_PATH")]
    pub test_db_path: Option<String>,
    #[serde(rename = "HOST")]
    pub host: Option<String>,
    #[serde(rename = "PORT")]
    pub port: Option<NumberOrString>,
    #[serde(rename = "SIGNING_KEY")]
    pub signing_key: Option<String>,
    #[serde(rename = "DB_TIMEOUT_SECS")]
    pub db_timeout_secs: Option<NumberOrString>,
}

impl ConfigFile {
    /// Read and parse the file. A missing file is not an error.
    pub fn read(path: &Path) -> Result<Option<Self>, ConfigError> {
        let raw = match std::fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };

        let file = serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Some(file))
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub environment: Environment,
    pub host: String,
    pub port: u16,
    pub db_path: PathBuf,
    pub signing_secret: String,
    pub db_timeout: Duration,
}

impl Config {
    /// Load from the process environment and, outside production, the config
    /// file.
    pub fn load() -> Result<Self, ConfigError> {
        let env = |key: &str| std::env::var(key).ok();
        let environment = Environment::from_name(env("ENV").as_deref());

        let file = match environment {
            Environment::Prod => None,
            Environment::Dev | Environment::Test => {
                let path = env("SERMO_CONFIG").unwrap_or_else(|| DEFAULT_CONFIG_PATH.into());
                let file = ConfigFile::read(Path::new(&path))?;
                if file.is_none() {
                    warn!("Config file {} not found, using defaults", path);
                }
                file
            }
        };

        Self::resolve(environment, file.unwrap_or_default(), env)
    }

    /// Combine the sources for `environment`. `env` looks up process variables.
    pub fn resolve<F>(environment: Environment, file: ConfigFile, env: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        match environment {
            Environment::Prod => Self::from_env(env),
            Environment::Dev | Environment::Test => Self::from_file(environment, file, env),
        }
    }

    fn from_env<F>(env: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let db_path = env("PROD_DB_PATH")
            .filter(|v| !v.is_empty())
            .ok_or(ConfigError::Missing("PROD_DB_PATH"))?;
        let signing_secret = env("SIGNING_KEY")
            .filter(|v| !v.is_empty())
            .ok_or(ConfigError::Missing("SIGNING_KEY"))?;

        Ok(Self {
            environment: Environment::Prod,
            host: env("HOST").unwrap_or_else(|| DEFAULT_HOST.into()),
            port: parse_or("PORT", env("PORT"), DEFAULT_PORT)?,
            db_path: db_path.into(),
            signing_secret,
            db_timeout: Duration::from_secs(parse_or(
                "DB_TIMEOUT_SECS",
                env("DB_TIMEOUT_SECS"),
                DEFAULT_DB_TIMEOUT_SECS,
            )?),
        })
    }

    fn from_file<F>(environment: Environment, file: ConfigFile, env: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let db_path = match environment {
            Environment::Test => file.test_db_path.unwrap_or_else(|| "sermo-test.db".into()),
            _ => file.app_db_path.unwrap_or_else(|| "sermo.db".into()),
        };

        // PORT and HOST from the process environment win over the file.
        let port = env("PORT").or_else(|| file.port.as_ref().map(NumberOrString::as_text));
        let host = env("HOST")
            .or(file.host)
            .unwrap_or_else(|| DEFAULT_HOST.into());

        Ok(Self {
            environment,
            host,
            port: parse_or("PORT", port, DEFAULT_PORT)?,
            db_path: db_path.into(),
            signing_secret: file
                .signing_key
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| DEV_SIGNING_SECRET.into()),
            db_timeout: Duration::from_secs(parse_or(
                "DB_TIMEOUT_SECS",
                file.db_timeout_secs.as_ref().map(NumberOrString::as_text),
                DEFAULT_DB_TIMEOUT_SECS,
            )?),
        })
    }
}

fn parse_or<T: std::str::FromStr>(
    key: &'static str,
    raw: Option<String>,
    default: T,
) -> Result<T, ConfigError> {
    match raw {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { key, value }),
    }
}
