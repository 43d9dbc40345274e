use std::env;
use std::path::PathBuf;
use std::sync::OnceLock;
use thiserror::Error;

/// Errors encountered while loading configuration from environment variables.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// Environment variable contained a value that could not be parsed.
    #[error("Invalid value for environment variable {key}: {value}")]
    InvalidValue {
        /// Variable name.
        key: String,
        /// Raw value that failed to parse.
        value: String,
    },
}

/// Runtime configuration for the student roster server.
#[derive(Debug, Clone)]
pub struct Config {
    /// Optional override for the HTTP server port.
    pub server_port: Option<u16>,
    /// Whether the store starts with the default students.
    pub seed_students: bool,
    /// Optional override for the log file location.
    pub log_file: Option<PathBuf>,
}

impl Config {
    /// Load configuration from environment variables, performing validation along the way.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let optional = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        Ok(Self {
            server_port: optional("SERVER_PORT")
                .map(|value| {
                    value
                        .trim()
                        .parse()
                        .map_err(|_| invalid("SERVER_PORT", &value))
                })
                .transpose()?,
            seed_students: optional("ROSTER_SEED")
                .map(|value| parse_bool(&value).ok_or_else(|| invalid("ROSTER_SEED", &value)))
                .transpose()?
                .unwrap_or(true),
            log_file: optional("ROSTER_LOG_FILE").map(PathBuf::from),
        })
    }
}

fn invalid(key: &str, value: &str) -> ConfigError {
    ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Global configuration cache populated during process start.
pub static CONFIG: OnceLock<Config> = OnceLock::new();

/// Retrieve the loaded configuration, panicking if initialization has not occurred.
pub fn get_config() -> &'static Config {
    CONFIG.get().expect("Config not initialized")
}

/// Load configuration from the environment and install it in the global cache.
///
/// A `.env` file in the working directory is honored when present.
pub fn init_config() -> Result<(), ConfigError> {
    dotenvy::dotenv().ok();
    let config = Config::from_env()?;
    tracing::debug!(
        server_port = ?config.server_port,
        seed_students = config.seed_students,
        log_file = ?config.log_file,
        "Loaded configuration"
    );
    let _ = CONFIG.set(config);
    Ok(())
}
