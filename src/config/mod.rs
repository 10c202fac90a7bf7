//! Launch configuration
//!
//! Handles loading and validating the YAML launch file the frontend writes
//! for each game start, and merging it with the system defaults.

pub mod defaults;
pub mod options;

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

use crate::input::FrontendController;

pub use defaults::{DefaultsLocator, SystemDefaults};
pub use options::Options;

/// Launch file and defaults errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("invalid launch configuration: {0}")]
    Invalid(String),
}

/// What the frontend asks to launch
#[derive(Debug, Clone, Deserialize)]
pub struct LaunchConfig {
    #[serde(default = "default_system")]
    pub system: String,
    /// Overrides the system default emulator
    #[serde(default)]
    pub emulator: Option<String>,
    /// Game path, or `config` to open the emulator UI
    pub rom: String,
    #[serde(default)]
    pub options: Options,
    /// Frontend controller list
    #[serde(default)]
    pub controllers: Vec<FrontendController>,
}

/// A launch request merged with its system defaults
#[derive(Debug, Clone)]
pub struct ResolvedLaunch {
    pub system: String,
    pub emulator: String,
    pub core: Option<String>,
    pub rom: String,
    pub options: Options,
    pub controllers: Vec<FrontendController>,
}

impl LaunchConfig {
    /// Load launch configuration from a YAML file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(&contents, path)
    }

    fn from_yaml(contents: &str, path: &Path) -> Result<Self, ConfigError> {
        let config: LaunchConfig =
            serde_yaml::from_str(contents).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.system.is_empty() {
            return Err(ConfigError::Invalid("system cannot be empty".into()));
        }
        if self.rom.is_empty() {
            return Err(ConfigError::Invalid("rom cannot be empty".into()));
        }
        if self.emulator.as_deref() == Some("") {
            return Err(ConfigError::Invalid("emulator cannot be empty".into()));
        }
        for controller in &self.controllers {
            if controller.player_number == 0 {
                return Err(ConfigError::Invalid(format!(
                    "controller {} has player_number 0 (player numbers start at 1)",
                    controller.device_path
                )));
            }
            if controller.device_path.is_empty() {
                return Err(ConfigError::Invalid(format!(
                    "player {} has no device_path",
                    controller.player_number
                )));
            }
        }
        Ok(())
    }

    /// Apply system defaults: launch options win over defaults, the launch
    /// emulator wins over the default emulator.
    pub fn resolve(self, defaults: SystemDefaults) -> Result<ResolvedLaunch, ConfigError> {
        let emulator = self
            .emulator
            .or(defaults.emulator)
            .ok_or_else(|| {
                ConfigError::Invalid(format!("no emulator configured for system '{}'", self.system))
            })?;

        let mut options = defaults.options;
        options.merge(&self.options);
        debug!("Resolved {} option(s) for {}", options.len(), emulator);

        Ok(ResolvedLaunch {
            system: self.system,
            emulator,
            core: defaults.core,
            rom: self.rom,
            options,
            controllers: self.controllers,
        })
    }
}

fn default_system() -> String {
    "switch".to_string()
}
