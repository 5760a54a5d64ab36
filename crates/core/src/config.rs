use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::params::ConnectionParams;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid TOML at line {line}, column {column}: {message}")]
    InvalidToml {
        line: usize,
        column: usize,
        message: String,
    },

    #[error("missing required fields: {fields:?}")]
    MissingRequiredFields { fields: Vec<String> },

    #[error("invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },

    #[error("I/O error reading configuration: {0}")]
    Io(#[from] std::io::Error),
}

/// Top-level configuration for a bot running on a Perch driver.
#[derive(Debug, Clone, Deserialize)]
pub struct BotConfig {
    pub connection: ConnectionParams,
    #[serde(default)]
    pub autojoin: AutojoinConfig,
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AutojoinConfig {
    /// Room addresses joined once the session-start signal arrives.
    #[serde(default)]
    pub channels: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    /// Upper bound for a single blocking wait on the transport.
    #[serde(default = "default_wait_timeout_ms")]
    pub wait_timeout_ms: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            wait_timeout_ms: default_wait_timeout_ms(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

#[derive(Debug, Default, Clone)]
struct ConfigOverrides {
    host: Option<String>,
    username: Option<String>,
    password: Option<String>,
    nick: Option<String>,
    log_level: Option<String>,
}

fn default_wait_timeout_ms() -> u64 {
    1000
}

fn default_log_level() -> String {
    "info".to_string()
}

const VALID_LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

const DEFAULT_CONFIG_TOML: &str = r#"[connection]
host = ""
username = ""
password = ""
nick = ""
# port = 5222
# realname = "Perch"
# transport = "tcp"   # plain TCP; anything else uses TLS
# resource = "Bot"

[autojoin]
channels = []

[session]
wait_timeout_ms = 1000

[logging]
level = "info"
"#;

/// Return the platform-appropriate configuration file path.
pub fn config_path() -> PathBuf {
    match dirs::config_dir() {
        Some(dir) => dir.join("perch").join("config.toml"),
        None => PathBuf::from("perch.toml"),
    }
}

/// Load configuration from the platform config path, merging environment
/// variable overrides.
pub fn load_config() -> Result<BotConfig, ConfigError> {
    load_config_from(&config_path())
}

/// Load configuration from a specific path.
///
/// A missing file is replaced by a commented template and reported as
/// missing required fields.
pub fn load_config_from(path: &Path) -> Result<BotConfig, ConfigError> {
    let contents = match std::fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            create_default_config(path)?;
            tracing::info!(path = %path.display(), "wrote configuration template");
            return Err(ConfigError::MissingRequiredFields {
                fields: required_fields().iter().map(|f| f.to_string()).collect(),
            });
        }
        Err(e) => return Err(ConfigError::Io(e)),
    };

    load_config_from_str_with_overrides(&contents, config_overrides_from_env())
}

/// Parse configuration from a TOML string, merging environment overrides.
pub fn load_config_from_str(toml_str: &str) -> Result<BotConfig, ConfigError> {
    load_config_from_str_with_overrides(toml_str, config_overrides_from_env())
}

fn load_config_from_str_with_overrides(
    toml_str: &str,
    overrides: ConfigOverrides,
) -> Result<BotConfig, ConfigError> {
    let mut config: BotConfig = toml::from_str(toml_str).map_err(|e| {
        let (line, column) = e.span().map_or((0, 0), |span| {
            let before = &toml_str[..span.start];
            let line = before.chars().filter(|&c| c == '\n').count() + 1;
            let column = before
                .rfind('\n')
                .map_or(span.start + 1, |nl| span.start - nl);
            (line, column)
        });
        ConfigError::InvalidToml {
            line,
            column,
            message: e.message().to_string(),
        }
    })?;

    apply_overrides(&mut config, overrides);
    validate(&config)?;

    Ok(config)
}

fn config_overrides_from_env() -> ConfigOverrides {
    ConfigOverrides {
        host: std::env::var("PERCH_HOST").ok(),
        username: std::env::var("PERCH_USERNAME").ok(),
        password: std::env::var("PERCH_PASSWORD").ok(),
        nick: std::env::var("PERCH_NICK").ok(),
        log_level: std::env::var("PERCH_LOG_LEVEL").ok(),
    }
}

fn apply_overrides(config: &mut BotConfig, overrides: ConfigOverrides) {
    if let Some(host) = overrides.host {
        config.connection.host = host;
    }
    if let Some(username) = overrides.username {
        config.connection.username = username;
    }
    if let Some(password) = overrides.password {
        config.connection.password = password;
    }
    if let Some(nick) = overrides.nick {
        config.connection.nick = nick;
    }
    if let Some(level) = overrides.log_level {
        config.logging.level = level;
    }
}

fn required_fields() -> [&'static str; 4] {
    [
        "connection.host",
        "connection.username",
        "connection.password",
        "connection.nick",
    ]
}

fn validate(config: &BotConfig) -> Result<(), ConfigError> {
    let connection = &config.connection;
    let values = [
        &connection.host,
        &connection.username,
        &connection.password,
        &connection.nick,
    ];
    let missing: Vec<String> = required_fields()
        .iter()
        .zip(values)
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(field, _)| field.to_string())
        .collect();

    if !missing.is_empty() {
        return Err(ConfigError::MissingRequiredFields { fields: missing });
    }

    if connection.port == 0 {
        return Err(ConfigError::InvalidValue {
            field: "connection.port".to_string(),
            message: "must be between 1 and 65535".to_string(),
        });
    }

    if config.session.wait_timeout_ms == 0 {
        return Err(ConfigError::InvalidValue {
            field: "session.wait_timeout_ms".to_string(),
            message: "must be greater than zero".to_string(),
        });
    }

    if !VALID_LOG_LEVELS.contains(&config.logging.level.as_str()) {
        return Err(ConfigError::InvalidValue {
            field: "logging.level".to_string(),
            message: format!("must be one of: {}", VALID_LOG_LEVELS.join(", ")),
        });
    }

    Ok(())
}

fn create_default_config(path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, DEFAULT_CONFIG_TOML)?;
    Ok(())
}
