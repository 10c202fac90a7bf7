//! Emulator config generators
//!
//! A generator turns a resolved launch into emulator config files plus the
//! command line and environment the launcher shell runs. Generators are
//! looked up by emulator id in a [`GeneratorRegistry`]; the switch table
//! always wins over an optional fallback table.

pub mod eden;
pub mod ryujinx;

use serde::Serialize;
use std::collections::BTreeMap;
use std::path::PathBuf;
use thiserror::Error;

use crate::config::ResolvedLaunch;
use crate::input::{ApiVersion, ControllerEnumerator, PortOrderError, SysfsScanner};
use crate::paths::SwitchPaths;

pub use eden::EdenGenerator;
pub use ryujinx::RyujinxGenerator;

/// Generator failures
#[derive(Debug, Error)]
pub enum GeneratorError {
    #[error("no generator for emulator '{0}'")]
    UnknownEmulator(String),

    #[error("invalid JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    PortOrder(#[from] PortOrderError),
}

/// Command handed back to the launcher shell
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Command {
    pub array: Vec<String>,
    pub env: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cwd: Option<PathBuf>,
}

impl Command {
    pub fn new<I, S>(array: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            array: array.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    pub fn with_env<I, K, V>(mut self, env: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.env
            .extend(env.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }
}

/// Hotkeys the launcher binds while the emulator runs
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HotkeysContext {
    pub name: String,
    pub keys: BTreeMap<String, Vec<String>>,
}

impl HotkeysContext {
    /// Alt+F4 exit binding used by every switch emulator
    pub fn exit_only(name: &str) -> Self {
        let mut keys = BTreeMap::new();
        keys.insert(
            "exit".to_string(),
            vec!["KEY_LEFTALT".to_string(), "KEY_F4".to_string()],
        );
        Self { name: name.to_string(), keys }
    }
}

/// Everything a generator may read
pub struct GeneratorContext<'a> {
    pub launch: &'a ResolvedLaunch,
    pub paths: &'a SwitchPaths,
    pub scanner: &'a SysfsScanner,
    pub enumerator: &'a dyn ControllerEnumerator,
    /// Forces the enumeration API version instead of the per-emulator one
    pub api_version: Option<ApiVersion>,
    /// `LANG` of the launching session
    pub lang: Option<String>,
    /// Synthesise everything but write no file
    pub dry_run: bool,
}

/// Capability shared by every emulator generator
pub trait Generator {
    fn name(&self) -> &str;

    /// Write the emulator config and build its command.
    fn generate(&self, ctx: &GeneratorContext<'_>) -> anyhow::Result<Command>;

    /// Working directory the emulator must start in, if any
    fn execution_directory(&self) -> Option<PathBuf> {
        None
    }

    fn hotkeys(&self) -> HotkeysContext;
}

/// Constructor stored in the lookup tables
pub type GeneratorConstructor = fn() -> Box<dyn Generator>;

fn eden() -> Box<dyn Generator> {
    Box::new(EdenGenerator)
}

fn ryujinx() -> Box<dyn Generator> {
    Box::new(RyujinxGenerator)
}

/// Switch emulators handled by this crate
const SWITCH_GENERATORS: &[(&str, GeneratorConstructor)] = &[
    ("eden-emu", eden),
    ("eden-pgo", eden),
    ("citron-emu", eden),
    ("ryujinx-emu", ryujinx),
];

/// Emulator id -> generator lookup
pub struct GeneratorRegistry {
    switch: BTreeMap<&'static str, GeneratorConstructor>,
    fallback: BTreeMap<String, GeneratorConstructor>,
}

impl Default for GeneratorRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl GeneratorRegistry {
    /// Registry holding the switch table only
    pub fn new() -> Self {
        Self {
            switch: SWITCH_GENERATORS.iter().copied().collect(),
            fallback: BTreeMap::new(),
        }
    }

    /// Add a fallback entry; ignored when the switch table has the same id
    pub fn with_fallback(mut self, emulator: impl Into<String>, constructor: GeneratorConstructor) -> Self {
        self.fallback.insert(emulator.into(), constructor);
        self
    }

    pub fn get(&self, emulator: &str) -> Result<Box<dyn Generator>, GeneratorError> {
        self.switch
            .get(emulator)
            .or_else(|| self.fallback.get(emulator))
            .map(|constructor| constructor())
            .ok_or_else(|| GeneratorError::UnknownEmulator(emulator.to_string()))
    }

    /// Every id the registry answers to
    pub fn emulators(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self
            .switch
            .keys()
            .copied()
            .chain(self.fallback.keys().map(String::as_str))
            .collect();
        ids.sort_unstable();
        ids.dedup();
        ids
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Stub;

    impl Generator for Stub {
        fn name(&self) -> &str {
            "stub"
        }

        fn generate(&self, _ctx: &GeneratorContext<'_>) -> anyhow::Result<Command> {
            Ok(Command::new(["stub"]))
        }

        fn hotkeys(&self) -> HotkeysContext {
            HotkeysContext::exit_only("stub")
        }
    }

    fn stub() -> Box<dyn Generator> {
        Box::new(Stub)
    }

    #[test]
    fn test_switch_table_lookup() {
        let registry = GeneratorRegistry::new();
        assert_eq!(registry.get("citron-emu").unwrap().name(), "eden");
        assert_eq!(registry.get("eden-pgo").unwrap().name(), "eden");
        assert_eq!(registry.get("ryujinx-emu").unwrap().name(), "ryujinx");
    }

    #[test]
    fn test_switch_table_wins_over_fallback() {
        let registry = GeneratorRegistry::new()
            .with_fallback("eden-emu", stub)
            .with_fallback("mame", stub);

        assert_eq!(registry.get("eden-emu").unwrap().name(), "eden");
        assert_eq!(registry.get("mame").unwrap().name(), "stub");
        assert_eq!(registry.emulators().len(), 5);
    }

    #[test]
    fn test_unknown_emulator() {
        let err = GeneratorRegistry::new().get("dolphin").err().unwrap();
        assert!(matches!(err, GeneratorError::UnknownEmulator(ref id) if id == "dolphin"));
    }

    #[test]
    fn test_command_serialization() {
        let command = Command::new(["./eden-emu.AppImage", "-f"]).with_env([("A", "1")]);
        let json = serde_json::to_string(&command).unwrap();
        assert_eq!(json, r#"{"array":["./eden-emu.AppImage","-f"],"env":{"A":"1"}}"#);
    }
}
