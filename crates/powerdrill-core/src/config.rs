//! TOML-based application configuration.
//!
//! Stores presentation preferences only:
//! - Feedback pacing and timer tick interval
//! - Ready gate countdown
//! - Display toggles (celebrations, review list)
//! - An optional fixed seed for reproducible rounds
//!
//! The round rules themselves (question cap, time budget, cooldown, choice
//! count) are fixed and not configurable here.
//!
//! Configuration is stored at `~/.config/powerdrill/config.toml`.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{ConfigError, CoreError, Result};
use crate::gate::Countdown;
use crate::round::Pacing;

/// Feedback and timer pacing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PacingConfig {
    #[serde(default = "default_correct_delay")]
    pub correct_delay_ms: u64,
    #[serde(default = "default_wrong_delay")]
    pub wrong_delay_ms: u64,
    #[serde(default = "default_tick_interval")]
    pub tick_interval_ms: u64,
}

/// Ready gate configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GateConfig {
    #[serde(default = "default_true")]
    pub countdown: bool,
    #[serde(default = "default_step_ms")]
    pub step_ms: u64,
    #[serde(default = "default_go_hold_ms")]
    pub go_hold_ms: u64,
}

/// Display toggles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayConfig {
    #[serde(default = "default_true")]
    pub celebrate: bool,
    #[serde(default = "default_true")]
    pub show_review: bool,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/powerdrill/config.toml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub pacing: PacingConfig,
    #[serde(default)]
    pub gate: GateConfig,
    #[serde(default)]
    pub display: DisplayConfig,
    /// Fixed seed; a fresh one is drawn per run when absent.
    #[serde(default)]
    pub seed: Option<u64>,
}

/// Keys whose value may be cleared with `none` or an empty string.
const OPTIONAL_KEYS: &[&str] = &["seed"];

fn default_correct_delay() -> u64 {
    900
}
fn default_wrong_delay() -> u64 {
    1600
}
fn default_tick_interval() -> u64 {
    250
}
fn default_step_ms() -> u64 {
    700
}
fn default_go_hold_ms() -> u64 {
    600
}
fn default_true() -> bool {
    true
}

impl Default for PacingConfig {
    fn default() -> Self {
        Self {
            correct_delay_ms: default_correct_delay(),
            wrong_delay_ms: default_wrong_delay(),
            tick_interval_ms: default_tick_interval(),
        }
    }
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            countdown: true,
            step_ms: default_step_ms(),
            go_hold_ms: default_go_hold_ms(),
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            celebrate: true,
            show_review: true,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            pacing: PacingConfig::default(),
            gate: GateConfig::default(),
            display: DisplayConfig::default(),
            seed: None,
        }
    }
}

/// Returns `~/.config/powerdrill[-dev]/` based on POWERDRILL_ENV.
///
/// Set POWERDRILL_ENV=dev to use development data directory.
///
/// # Errors
/// Returns an error if creating the config directory fails.
pub fn data_dir() -> Result<PathBuf> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("POWERDRILL_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("powerdrill-dev")
    } else {
        base_dir.join("powerdrill")
    };

    std::fs::create_dir_all(&dir)
        .map_err(|e| ConfigError::DirUnavailable(format!("{}: {e}", dir.display())))?;
    Ok(dir)
}

impl Config {
    pub fn pacing(&self) -> Pacing {
        Pacing {
            correct_delay_ms: self.pacing.correct_delay_ms,
            wrong_delay_ms: self.pacing.wrong_delay_ms,
        }
    }

    pub fn countdown(&self) -> Countdown {
        Countdown::new(self.gate.step_ms, self.gate.go_hold_ms)
    }

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

    fn set_json_value_by_path(root: &mut serde_json::Value, key: &str, value: &str) -> Result<()> {
        let unknown = || ConfigError::UnknownKey(key.to_string());
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

        let mut parts = key.split('.').peekable();
        if key.is_empty() {
            return Err(unknown().into());
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            let is_leaf = parts.peek().is_none();
            if is_leaf {
                let obj = current.as_object_mut().ok_or_else(unknown)?;
                let existing = obj.get(part).ok_or_else(unknown)?;

                // `seed` is the only optional leaf; clearing it works whatever it holds now.
                if OPTIONAL_KEYS.contains(&key) && matches!(value, "" | "none") {
                    obj.insert(part.to_string(), serde_json::Value::Null);
                    return Ok(());
                }

                let new_value = match existing {
                    serde_json::Value::Bool(_) => serde_json::Value::Bool(
                        value
                            .parse::<bool>()
                            .map_err(|e| invalid(format!("cannot parse '{value}' as bool: {e}")))?,
                    ),
                    serde_json::Value::Number(_) => serde_json::Value::Number(
                        value
                            .parse::<u64>()
                            .map_err(|e| invalid(format!("cannot parse '{value}' as number: {e}")))?
                            .into(),
                    ),
                    // An unset optional field takes a number.
                    serde_json::Value::Null => serde_json::Value::Number(
                        value
                            .parse::<u64>()
                            .map_err(|e| invalid(format!("cannot parse '{value}' as number: {e}")))?
                            .into(),
                    ),
                    serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
                        return Err(invalid("not a leaf value".to_string()).into());
                    }
                    serde_json::Value::String(_) => serde_json::Value::String(value.into()),
                };

                obj.insert(part.to_string(), new_value);
                return Ok(());
            }

            current = current.get_mut(part).ok_or_else(unknown)?;
        }

        Err(unknown().into())
    }

    fn path() -> Result<PathBuf> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from the default location, writing defaults if the file is missing.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::path()?)
    }

    /// Persist to the default location.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(|e| {
                ConfigError::LoadFailed {
                    path: path.to_path_buf(),
                    message: e.to_string(),
                }
                .into()
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no config file, writing defaults");
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

    pub fn save_to(&self, path: &Path) -> Result<()> {
        let save_failed = |message: String| -> CoreError {
            ConfigError::SaveFailed {
                path: path.to_path_buf(),
                message,
            }
            .into()
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
            serde_json::Value::Null => Some("none".to_string()),
            other => Some(other.to_string()),
        }
    }

    /// Set a config value by dot-separated key, parsing `value` to the
    /// existing field's type. Does not persist; call `save` afterwards.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let mut json = serde_json::to_value(&*self)?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        *self = serde_json::from_value(json)?;
        Ok(())
    }
}
