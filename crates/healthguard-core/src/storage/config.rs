//! TOML-based application configuration.
//!
//! Stores user preferences including:
//! - Reminder interval and daily goals
//! - Statistics window and history page size
//! - Log level
//!
//! Configuration is stored at `~/.config/healthguard/config.toml`.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::data_dir;
use crate::error::{ConfigError, Result};
use crate::stats::{Goals, DEFAULT_WINDOW};

/// Reminder and goal settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReminderConfig {
    /// Minutes between reminders.
    #[serde(default = "default_reminder_interval")]
    pub reminder_interval: u32,
    /// Daily water goal in ml.
    #[serde(default = "default_daily_water_goal")]
    pub daily_water_goal: u32,
    #[serde(default = "default_daily_stand_goal")]
    pub daily_stand_goal: u32,
    /// Amount logged per drink, in ml.
    #[serde(default = "default_water_per_drink")]
    pub water_per_drink: u32,
}

/// Statistics and history view settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatsConfig {
    /// Number of most recent records used for statistics.
    #[serde(default = "default_window")]
    pub window: u32,
    #[serde(default = "default_page_size")]
    pub page_size: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/healthguard/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub reminder: ReminderConfig,
    #[serde(default)]
    pub stats: StatsConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

// Default functions
fn default_reminder_interval() -> u32 {
    30
}
fn default_daily_water_goal() -> u32 {
    2000
}
fn default_daily_stand_goal() -> u32 {
    12
}
fn default_water_per_drink() -> u32 {
    200
}
fn default_window() -> u32 {
    DEFAULT_WINDOW as u32
}
fn default_page_size() -> u32 {
    5
}
fn default_log_level() -> String {
    "info".into()
}

impl Default for ReminderConfig {
    fn default() -> Self {
        Self {
            reminder_interval: default_reminder_interval(),
            daily_water_goal: default_daily_water_goal(),
            daily_stand_goal: default_daily_stand_goal(),
            water_per_drink: default_water_per_drink(),
        }
    }
}

impl Default for StatsConfig {
    fn default() -> Self {
        Self {
            window: default_window(),
            page_size: default_page_size(),
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

impl ReminderConfig {
    /// Replace every zero field with its default.
    pub fn validated(self) -> Self {
        let fallback = Self::default();
        let pick = |name: &str, value: u32, default: u32| {
            if value == 0 {
                tracing::warn!(field = name, default, "non-positive setting, using default");
                default
            } else {
                value
            }
        };
        Self {
            reminder_interval: pick(
                "reminder_interval",
                self.reminder_interval,
                fallback.reminder_interval,
            ),
            daily_water_goal: pick(
                "daily_water_goal",
                self.daily_water_goal,
                fallback.daily_water_goal,
            ),
            daily_stand_goal: pick(
                "daily_stand_goal",
                self.daily_stand_goal,
                fallback.daily_stand_goal,
            ),
            water_per_drink: pick(
                "water_per_drink",
                self.water_per_drink,
                fallback.water_per_drink,
            ),
        }
    }

    /// Reminder interval as a duration.
    pub fn interval(&self) -> chrono::Duration {
        chrono::Duration::minutes(i64::from(self.reminder_interval))
    }

    pub fn goals(&self) -> Goals {
        Goals {
            water_ml: u64::from(self.daily_water_goal),
            stand_count: u64::from(self.daily_stand_goal),
        }
    }
}

impl Config {
    fn get_json_value_by_path<'a>(
        root: &'a serde_json::Value,
        key: &str,
    ) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }

        let mut current = root;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    fn set_json_value_by_path(
        root: &mut serde_json::Value,
        key: &str,
        value: &str,
    ) -> Result<(), ConfigError> {
        let unknown = || ConfigError::UnknownKey(key.to_string());
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

        let mut parts = key.split('.').peekable();
        if key.is_empty() {
            return Err(unknown());
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            let is_leaf = parts.peek().is_none();
            if is_leaf {
                let obj = current.as_object_mut().ok_or_else(unknown)?;
                let existing = obj.get(part).ok_or_else(unknown)?;

                let new_value = match existing {
                    serde_json::Value::Bool(_) => serde_json::Value::Bool(
                        value
                            .parse::<bool>()
                            .map_err(|e| invalid(e.to_string()))?,
                    ),
                    serde_json::Value::Number(_) => {
                        let n = value
                            .parse::<u32>()
                            .map_err(|_| invalid(format!("cannot parse '{value}' as number")))?;
                        if n == 0 {
                            return Err(invalid("must be a positive integer".into()));
                        }
                        serde_json::Value::Number(n.into())
                    }
                    serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
                        return Err(unknown());
                    }
                    _ => serde_json::Value::String(value.into()),
                };

                obj.insert(part.to_string(), new_value);
                return Ok(());
            }

            current = current.get_mut(part).ok_or_else(unknown)?;
        }

        Err(unknown())
    }

    /// Default location of the configuration file.
    pub fn path() -> Result<PathBuf> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from disk or return default.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::path()?)
    }

    /// Load from an explicit path, writing defaults there if it is missing.
    pub fn load_from(path: &Path) -> Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(content) => {
                let cfg: Config = toml::from_str(&content).map_err(|e| ConfigError::LoadFailed {
                    path: path.to_path_buf(),
                    message: e.to_string(),
                })?;
                Ok(cfg)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let cfg = Self::default();
                cfg.save_to(path)?;
                Ok(cfg)
            }
            Err(e) => Err(ConfigError::LoadFailed {
                path: path.to_path_buf(),
                message: e.to_string(),
            }
            .into()),
        }
    }

    /// Persist to disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written to disk.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))?;
        Ok(())
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            serde_json::Value::Object(_) => None,
            other => Some(other.to_string()),
        }
    }

    /// Set a config value by key in memory. Returns error if key is unknown
    /// or the value does not fit the field.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown or the value cannot be parsed.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let mut json = serde_json::to_value(&*self)?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        *self = serde_json::from_value(json)?;
        Ok(())
    }

    /// Load from disk, returning default on error.
    /// This is a convenience method that never fails.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "failed to load config, using defaults");
            Self::default()
        })
    }
}
