//! System defaults (`configgen-defaults.yml` and its arch override)
//!
//! ```yaml
//! default:
//!   options:
//!     hud_support: false
//! switch:
//!   emulator: eden-emu
//!   core: eden-emu
//!   options:
//!     vsync: 1
//! ```

use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use super::{ConfigError, Options};
use crate::paths::SwitchPaths;

/// One entry of a defaults file
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct DefaultsEntry {
    #[serde(default)]
    pub emulator: Option<String>,
    #[serde(default)]
    pub core: Option<String>,
    #[serde(default)]
    pub options: Options,
}

impl DefaultsEntry {
    fn merge(&mut self, other: &DefaultsEntry) {
        if other.emulator.is_some() {
            self.emulator = other.emulator.clone();
        }
        if other.core.is_some() {
            self.core = other.core.clone();
        }
        self.options.merge(&other.options);
    }
}

type DefaultsFile = BTreeMap<String, DefaultsEntry>;

const DEFAULT_ENTRY: &str = "default";

/// Effective defaults for one system
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SystemDefaults {
    pub emulator: Option<String>,
    pub core: Option<String>,
    pub options: Options,
}

impl SystemDefaults {
    /// Merge the `default` entries, then the `<system>` entries; the arch
    /// file wins over the main file at each step.
    ///
    /// A missing file counts as empty.
    pub fn load(system: &str, main: &Path, arch: &Path) -> Result<Self, ConfigError> {
        let main = read_defaults(main)?;
        let arch = read_defaults(arch)?;

        let mut merged = DefaultsEntry::default();
        for name in [DEFAULT_ENTRY, system] {
            for file in [&main, &arch] {
                if let Some(entry) = file.get(name) {
                    merged.merge(entry);
                }
            }
        }

        Ok(Self {
            emulator: merged.emulator,
            core: merged.core,
            options: merged.options,
        })
    }
}

fn read_defaults(path: &Path) -> Result<DefaultsFile, ConfigError> {
    if !path.exists() {
        debug!("Defaults file {} not found, skipping", path.display());
        return Ok(DefaultsFile::new());
    }
    let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let parsed: Option<DefaultsFile> =
        serde_yaml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
    Ok(parsed.unwrap_or_default())
}

/// Chooses between the switch add-on's defaults and the stock ones
#[derive(Debug, Clone)]
pub struct DefaultsLocator {
    switch: (PathBuf, PathBuf),
    stock: (PathBuf, PathBuf),
}

impl DefaultsLocator {
    pub fn new(paths: &SwitchPaths) -> Self {
        Self {
            switch: paths.switch_defaults_files(),
            stock: paths.stock_defaults_files(),
        }
    }

    /// The switch pair when both of its files exist, the stock pair otherwise
    pub fn locate(&self) -> (&Path, &Path) {
        let (main, arch) = &self.switch;
        if main.exists() && arch.exists() {
            (main.as_path(), arch.as_path())
        } else {
            (self.stock.0.as_path(), self.stock.1.as_path())
        }
    }

    pub fn load(&self, system: &str) -> Result<SystemDefaults, ConfigError> {
        let (main, arch) = self.locate();
        info!("Loading system defaults from {}", main.display());
        SystemDefaults::load(system, main, arch)
    }
}
