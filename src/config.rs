use anyhow::{Context, Result};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::warn;

use crate::probe::DEFAULT_SYSFS_ROOT;

/// Environment variable naming the YAML config file
pub const CONFIG_PATH_ENV: &str = "BLUETOOTH_STATUS_CONFIG";

/// Widget configuration, fixed once the widget is constructed
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Controller to read state from
    pub device: String,
    /// Application launched on left click
    pub manager: String,
    pub dbus_destination: String,
    pub dbus_destination_path: String,
    /// Show a confirmation menu on right click instead of toggling directly
    #[serde(deserialize_with = "deserialize_lenient_bool")]
    pub right_click_popup: bool,
    /// Poll cadence of the host loop
    pub interval_secs: u64,
    pub sysfs_root: PathBuf,
    /// dmenu-compatible chooser used for the right-click menu
    pub popup_command: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            device: "hci0".to_string(),
            manager: "blueman-manager".to_string(),
            dbus_destination: "org.blueman.Mechanism".to_string(),
            dbus_destination_path: "/".to_string(),
            right_click_popup: true,
            interval_secs: 1,
            sysfs_root: PathBuf::from(DEFAULT_SYSFS_ROOT),
            popup_command: "dmenu".to_string(),
        }
    }
}

/// Flat key lookup supplied by the host
pub trait ParameterLookup {
    fn parameter(&self, key: &str) -> Option<String>;
}

impl ParameterLookup for HashMap<String, String> {
    fn parameter(&self, key: &str) -> Option<String> {
        self.get(key).cloned()
    }
}

/// Reads parameters from `BLUETOOTH_<KEY>` environment variables
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvParameters;

impl ParameterLookup for EnvParameters {
    fn parameter(&self, key: &str) -> Option<String> {
        std::env::var(format!("BLUETOOTH_{}", key.to_ascii_uppercase())).ok()
    }
}

impl Config {
    /// Builds a typed config from a flat lookup, falling back to defaults
    pub fn from_parameters(params: &impl ParameterLookup) -> Self {
        let defaults = Self::default();

        let interval_secs = match params.parameter("interval_secs") {
            Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
                warn!("Ignoring invalid interval_secs {:?}", raw);
                defaults.interval_secs
            }),
            None => defaults.interval_secs,
        };

        Self {
            device: params.parameter("device").unwrap_or(defaults.device),
            manager: params.parameter("manager").unwrap_or(defaults.manager),
            dbus_destination: params
                .parameter("dbus_destination")
                .unwrap_or(defaults.dbus_destination),
            dbus_destination_path: params
                .parameter("dbus_destination_path")
                .unwrap_or(defaults.dbus_destination_path),
            right_click_popup: params
                .parameter("right_click_popup")
                .map(|raw| as_bool(&raw))
                .unwrap_or(defaults.right_click_popup),
            interval_secs,
            sysfs_root: params
                .parameter("sysfs_root")
                .map(PathBuf::from)
                .unwrap_or(defaults.sysfs_root),
            popup_command: params
                .parameter("popup_command")
                .unwrap_or(defaults.popup_command),
        }
    }
}

/// Lenient boolean parsing for string parameters
pub fn as_bool(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "true" | "t" | "yes" | "y" | "on" | "1"
    )
}

/// Accepts a YAML bool, an integer (1 is true) or a string parsed by
/// [`as_bool`]
fn deserialize_lenient_bool<'de, D>(deserializer: D) -> std::result::Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawBool {
        Bool(bool),
        Int(i64),
        Text(String),
    }

    Ok(match RawBool::deserialize(deserializer)? {
        RawBool::Bool(value) => value,
        RawBool::Int(value) => value == 1,
        RawBool::Text(value) => as_bool(&value),
    })
}

pub fn load_config(path: &Path) -> Result<Config> {
    tracing::info!("Loading configuration from {}", path.display());
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    let config: Config = serde_yaml::from_str(&raw)
        .with_context(|| format!("Invalid config {}", path.display()))?;
    Ok(config)
}

/// Loads the YAML file when one is given and present, otherwise reads
/// parameters from the environment.
pub fn resolve_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) if path.exists() => load_config(path),
        Some(path) => {
            warn!("Config {} not found, using environment", path.display());
            Ok(Config::from_parameters(&EnvParameters))
        }
        None => Ok(Config::from_parameters(&EnvParameters)),
    }
}
