//! Bridge settings loader and validator
//!
//! Loads bridge settings from TOML files in the configs/ directory. Every
//! field has a default, so an empty file (or no file at all) is a valid
//! RetroPie setup.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use log::{info, debug};

/// uinput rejects device names of `UINPUT_MAX_NAME_SIZE` (80) bytes or more.
pub const MAX_DEVICE_NAME_LEN: usize = 79;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Main settings structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub bridge: BridgeSettings,

    /// CEC daemon whose output is translated
    #[serde(default)]
    pub daemon: DaemonSettings,

    /// Foreground process gate
    #[serde(default)]
    pub gate: GateSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BridgeSettings {
    /// RetroArch config holding the player 1 keyboard bindings
    #[serde(default = "default_retroarch_config")]
    pub retroarch_config: PathBuf,

    /// Name of the virtual keyboard (shown by `evtest`)
    #[serde(default = "default_device_name")]
    pub device_name: String,
}

impl Default for BridgeSettings {
    fn default() -> Self {
        Self {
            retroarch_config: default_retroarch_config(),
            device_name: default_device_name(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DaemonSettings {
    #[serde(default = "default_daemon_command")]
    pub command: String,

    #[serde(default)]
    pub args: Vec<String>,
}

impl Default for DaemonSettings {
    fn default() -> Self {
        Self {
            command: default_daemon_command(),
            args: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GateSettings {
    /// Process listing command
    #[serde(default = "default_gate_command")]
    pub command: String,

    #[serde(default = "default_gate_args")]
    pub args: Vec<String>,

    /// While any process name contains one of these, the bridge stays dormant
    #[serde(default = "default_denylist")]
    pub denylist: Vec<String>,
}

impl Default for GateSettings {
    fn default() -> Self {
        Self {
            command: default_gate_command(),
            args: default_gate_args(),
            denylist: default_denylist(),
        }
    }
}

fn default_retroarch_config() -> PathBuf { PathBuf::from("/opt/retropie/configs/all/retroarch.cfg") }
fn default_device_name() -> String { "es-cec-input".to_string() }
fn default_daemon_command() -> String { "cec-client".to_string() }
fn default_gate_command() -> String { "ps".to_string() }
fn default_gate_args() -> Vec<String> { vec!["-A".to_string()] }
fn default_denylist() -> Vec<String> { vec!["kodi.bin".to_string(), "retroarch".to_string()] }

impl Settings {
    /// Load settings from a TOML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path_ref = path.as_ref();
        info!("Loading settings from: {}", path_ref.display());

        let content = std::fs::read_to_string(path_ref).map_err(|source| ConfigError::Read {
            path: path_ref.to_path_buf(),
            source,
        })?;
        let settings = Self::from_toml(&content)?;

        info!("✓ Settings validation passed");
        Ok(settings)
    }

    /// Load default settings from configs/default.toml
    pub fn load_default() -> Result<Self, ConfigError> {
        Self::load("configs/default.toml")
    }

    /// Parse and validate settings from TOML text
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let settings: Settings = toml::from_str(content)?;

        debug!("  - RetroArch config: {}", settings.bridge.retroarch_config.display());
        debug!("  - Daemon: {} {:?}", settings.daemon.command, settings.daemon.args);
        debug!("  - Gate denylist: {:?}", settings.gate.denylist);

        settings.validate()?;
        Ok(settings)
    }

    /// Validate the settings
    pub fn validate(&self) -> Result<(), ConfigError> {
        let name = &self.bridge.device_name;
        if name.trim().is_empty() {
            return Err(ConfigError::Invalid("device_name must not be empty".into()));
        }
        if name.len() > MAX_DEVICE_NAME_LEN {
            return Err(ConfigError::Invalid(format!(
                "device_name must be at most {} bytes, got {}",
                MAX_DEVICE_NAME_LEN,
                name.len()
            )));
        }

        if self.daemon.command.trim().is_empty() {
            return Err(ConfigError::Invalid("daemon command must not be empty".into()));
        }

        if self.gate.command.trim().is_empty() {
            return Err(ConfigError::Invalid("gate command must not be empty".into()));
        }

        // An empty entry would match every process and keep the bridge dormant forever
        if self.gate.denylist.iter().any(|entry| entry.is_empty()) {
            return Err(ConfigError::Invalid("gate denylist entries must not be empty".into()));
        }

        Ok(())
    }
}
