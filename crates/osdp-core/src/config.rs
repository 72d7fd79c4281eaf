//! Configuration resolution for OSDP hosts.
//!
//! Implements hierarchical config resolution:
//! 1. Built-in defaults
//! 2. Global config (~/.config/osdp/config.json)
//! 3. Explicit config file (e.g. from a `--config` flag)
//! 4. Environment variables
//!
//! Keys are stored as hex text and decoded through [`crate::hex`].

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::hex::hex_to_bin;
use crate::logger::LogLevel;
use crate::status::MAX_DEVICES;

/// Size of a secure channel base key or master key.
pub const KEY_LEN: usize = 16;

/// Complete OSDP configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub log: LogConfig,
    #[serde(default)]
    pub control_panel: ControlPanelConfig,
}

/// Diagnostic output configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LogConfig {
    /// Threshold for protocol log lines.
    #[serde(default)]
    pub level: LogLevel,
    /// Emit structured JSON through `tracing` instead of text.
    #[serde(default)]
    pub json: bool,
}

/// Control panel side configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ControlPanelConfig {
    /// Master key as 32 hex digits; used to derive per-device keys.
    #[serde(default)]
    pub master_key: Option<String>,
    /// One entry per peripheral, in device index order.
    #[serde(default)]
    pub devices: Vec<DeviceConfig>,
}

/// One peripheral on the bus.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceConfig {
    /// Bus address, 0..=126.
    pub address: u8,
    /// Secure channel base key as 32 hex digits.
    #[serde(default)]
    pub scbk: Option<String>,
}

impl ControlPanelConfig {
    pub fn master_key_bytes(&self) -> Result<Option<[u8; KEY_LEN]>> {
        self.master_key.as_deref().map(decode_key).transpose()
    }
}

impl DeviceConfig {
    pub fn scbk_bytes(&self) -> Result<Option<[u8; KEY_LEN]>> {
        self.scbk.as_deref().map(decode_key).transpose()
    }
}

impl Config {
    /// Reject configurations the lower layers cannot represent.
    pub fn validate(&self) -> Result<()> {
        let devices = &self.control_panel.devices;
        if devices.len() > MAX_DEVICES {
            return Err(Error::Config(format!(
                "{} devices configured, at most {MAX_DEVICES} supported",
                devices.len()
            )));
        }

        let mut seen = HashSet::new();
        for (i, pd) in devices.iter().enumerate() {
            if pd.address > 126 {
                return Err(Error::Config(format!(
                    "device {i}: address {} out of range 0..=126",
                    pd.address
                )));
            }
            if !seen.insert(pd.address) {
                return Err(Error::Config(format!(
                    "device {i}: duplicate address {}",
                    pd.address
                )));
            }
            pd.scbk_bytes()
                .map_err(|e| Error::Config(format!("device {i}: scbk: {e}")))?;
        }

        self.control_panel
            .master_key_bytes()
            .map_err(|e| Error::Config(format!("master_key: {e}")))?;
        Ok(())
    }
}

fn decode_key(text: &str) -> Result<[u8; KEY_LEN]> {
    let digits = text.trim();
    if digits.len() != KEY_LEN * 2 {
        return Err(Error::Config(format!(
            "key must be {} hex digits, got {}",
            KEY_LEN * 2,
            digits.len()
        )));
    }
    let mut key = [0u8; KEY_LEN];
    hex_to_bin(digits, &mut key)?;
    Ok(key)
}

/// Load configuration with hierarchical resolution.
pub fn load_config(config_file: Option<&Path>) -> Result<Config> {
    load_config_from(global_config_path().as_deref(), config_file, |name| {
        std::env::var(name).ok()
    })
}

/// Resolve configuration from explicit sources.
///
/// `global` is skipped when absent on disk; `file` must exist and replaces
/// the global config wholesale. Variables from `var` apply last, then the
/// result is validated.
pub fn load_config_from(
    global: Option<&Path>,
    file: Option<&Path>,
    var: impl Fn(&str) -> Option<String>,
) -> Result<Config> {
    let mut config = Config::default();

    if let Some(global_path) = global.filter(|p| p.exists()) {
        config = load_config_file(global_path)?;
        tracing::debug!(path = %global_path.display(), "loaded global config");
    }

    if let Some(path) = file {
        config = load_config_file(path)?;
        tracing::debug!(path = %path.display(), "loaded config file");
    }

    apply_env_overrides(&mut config, var)?;
    config.validate()?;
    Ok(config)
}

/// Get the global config file path.
pub fn global_config_path() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        std::env::var("USERPROFILE")
            .ok()
            .map(|h| PathBuf::from(h).join(".osdp").join("config.json"))
    }
    #[cfg(target_os = "macos")]
    {
        std::env::var("HOME")
            .ok()
            .map(|h| PathBuf::from(h).join("Library/Application Support/osdp/config.json"))
    }
    #[cfg(target_os = "linux")]
    {
        std::env::var("XDG_CONFIG_HOME")
            .ok()
            .map(PathBuf::from)
            .or_else(|| std::env::var("HOME").ok().map(|h| PathBuf::from(h).join(".config")))
            .map(|p| p.join("osdp").join("config.json"))
    }
    #[cfg(not(any(target_os = "windows", target_os = "macos", target_os = "linux")))]
    {
        None
    }
}

fn load_config_file(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        Error::Config(format!("Failed to read config file {}: {}", path.display(), e))
    })?;
    serde_json::from_str(&content).map_err(|e| {
        Error::Config(format!("Failed to parse config file {}: {}", path.display(), e))
    })
}

fn apply_env_overrides(
    config: &mut Config,
    var: impl Fn(&str) -> Option<String>,
) -> Result<()> {
    if let Some(val) = var("OSDP_LOG_LEVEL") {
        config.log.level = val.parse()?;
    }
    if let Some(val) = var("OSDP_LOG_JSON") {
        config.log.json = matches!(val.trim(), "1" | "true" | "yes");
    }
    if let Some(val) = var("OSDP_MASTER_KEY") {
        config.control_panel.master_key = Some(val);
    }
    Ok(())
}
