//! Configuration management module.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::zk::{
    CMD_USER_CREATE, CMD_USER_CREATE_WITH_PASSWORD, CMD_USER_DELETE, CMD_USER_DELETE_ALT, CMD_USER_LIST,
    CMD_USER_UPDATE, CommandFamily, CommandTable,
};

/// Configuration load result.
#[derive(Debug)]
pub enum ConfigLoadResult {
    /// Config loaded successfully.
    Loaded(AppConfig),
    /// Config file missing (defaults apply).
    Missing,
    /// Config file exists but invalid.
    Invalid(ConfigError),
}

/// Configuration errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Read(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Validation failed: {0}")]
    Validation(String),
}

/// Main application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub commands: CommandsConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Response command ids per command family.
///
/// The delete id differs between firmware (0x07D2 vs 0x1380); keep only the
/// one your device sends if the other collides.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CommandsConfig {
    pub create: Vec<u16>,
    pub update: Vec<u16>,
    pub delete: Vec<u16>,
    pub list: Vec<u16>,
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default level when `RUST_LOG` is not set.
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Directory for daily log files; stderr only when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub directory: Option<PathBuf>,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl AppConfig {
    /// Get config file path in the user's config directory.
    pub fn default_path() -> PathBuf {
        directories::ProjectDirs::from("", "", "zk-decode")
            .map(|dirs| dirs.config_dir().to_path_buf())
            .unwrap_or_else(|| PathBuf::from("."))
            .join("config.toml")
    }

    /// Attempt to load config with detailed result.
    pub fn try_load(path: &Path) -> ConfigLoadResult {
        if !path.exists() {
            return ConfigLoadResult::Missing;
        }

        match std::fs::read_to_string(path) {
            Ok(content) => match Self::from_toml(&content) {
                Ok(config) => ConfigLoadResult::Loaded(config),
                Err(e) => ConfigLoadResult::Invalid(e),
            },
            Err(e) => ConfigLoadResult::Invalid(ConfigError::Read(e)),
        }
    }

    /// Parse and validate config from TOML text.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: AppConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let families = [
            ("create", &self.commands.create),
            ("update", &self.commands.update),
            ("delete", &self.commands.delete),
            ("list", &self.commands.list),
        ];

        let mut seen: HashMap<u16, &str> = HashMap::new();
        for (name, ids) in families {
            if ids.is_empty() {
                return Err(ConfigError::Validation(format!(
                    "At least one {name} command id is required"
                )));
            }
            for &id in ids {
                if let Some(other) = seen.insert(id, name) {
                    if other != name {
                        return Err(ConfigError::Validation(format!(
                            "Command id 0x{id:04X} is mapped to both {other} and {name}"
                        )));
                    }
                }
            }
        }

        if self.logging.level.parse::<tracing::Level>().is_err() {
            return Err(ConfigError::Validation(format!(
                "Invalid log level '{}': expected trace, debug, info, warn or error",
                self.logging.level
            )));
        }
        Ok(())
    }

    /// Save configuration to file.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

impl CommandsConfig {
    /// Build the dispatcher's command table.
    pub fn command_table(&self) -> CommandTable {
        let entries = [
            (&self.create, CommandFamily::Create),
            (&self.update, CommandFamily::Update),
            (&self.delete, CommandFamily::Delete),
            (&self.list, CommandFamily::List),
        ];
        CommandTable::new(
            entries
                .into_iter()
                .flat_map(|(ids, family)| ids.iter().map(move |&id| (id, family))),
        )
    }
}

impl Default for CommandsConfig {
    fn default() -> Self {
        Self {
            create: vec![CMD_USER_CREATE, CMD_USER_CREATE_WITH_PASSWORD],
            update: vec![CMD_USER_UPDATE],
            delete: vec![CMD_USER_DELETE, CMD_USER_DELETE_ALT],
            list: vec![CMD_USER_LIST],
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            directory: None,
        }
    }
}
