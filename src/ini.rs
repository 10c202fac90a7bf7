//! Qt-style INI documents
//!
//! Emulator settings files use keys such as `player_0_button_a\default` and
//! quoted values such as `"button:1,guid:...,engine:sdl"`. Both must survive
//! a read/write cycle untouched, so escapes and quote handling are disabled
//! on both sides and key case is preserved.

use anyhow::{Context, Result};
use ini::{EscapePolicy, Ini, LineSeparator, ParseOption, WriteOption};
use std::path::Path;
use tracing::debug;

use crate::paths::SwitchPaths;

/// An INI document edited in place
#[derive(Debug, Clone)]
pub struct IniDocument {
    ini: Ini,
}

impl Default for IniDocument {
    fn default() -> Self {
        Self { ini: Ini::new() }
    }
}

fn parse_option() -> ParseOption {
    ParseOption {
        enabled_quote: false,
        enabled_escape: false,
        ..ParseOption::default()
    }
}

fn write_option() -> WriteOption {
    WriteOption {
        escape_policy: EscapePolicy::Nothing,
        line_separator: LineSeparator::CR,
        kv_separator: " = ",
    }
}

impl IniDocument {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn parse(contents: &str) -> Result<Self> {
        let ini = Ini::load_from_str_opt(contents, parse_option())
            .context("Failed to parse INI document")?;
        Ok(Self { ini })
    }

    /// Load `path`, or an empty document when it does not exist.
    pub fn load_or_empty(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!("{} not found, starting from an empty document", path.display());
            return Ok(Self::new());
        }
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Self::parse(&contents).with_context(|| format!("Invalid INI file: {}", path.display()))
    }

    pub fn has_section(&self, section: &str) -> bool {
        self.ini.section(Some(section)).is_some()
    }

    /// Create `section` if it does not exist yet
    pub fn ensure_section(&mut self, section: &str) {
        if !self.has_section(section) {
            self.ini.with_section(Some(section));
        }
    }

    pub fn set(&mut self, section: &str, key: &str, value: impl Into<String>) {
        self.ini.with_section(Some(section)).set(key, value.into());
    }

    pub fn get(&self, section: &str, key: &str) -> Option<&str> {
        self.ini.get_from(Some(section), key)
    }

    /// Entries of `section` in file order; empty when the section is absent
    pub fn entries(&self, section: &str) -> Vec<(String, String)> {
        self.ini
            .section(Some(section))
            .map(|props| {
                props
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn to_ini_string(&self) -> Result<String> {
        let mut buf = Vec::new();
        self.ini
            .write_to_opt(&mut buf, write_option())
            .context("Failed to render INI document")?;
        String::from_utf8(buf).context("INI document is not valid UTF-8")
    }

    /// Write to `path`, creating parent directories.
    pub fn write(&self, path: &Path) -> Result<()> {
        SwitchPaths::ensure_parent(path)?;
        let rendered = self.to_ini_string()?;
        std::fs::write(path, rendered)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        debug!("Wrote {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const QT_CONFIG: &str = "[Controls]\nplayer_0_button_a\\default=false\nplayer_0_button_a=\"button:1,guid:0300,port:0,engine:sdl\"\n\n[UI]\nsingleWindowMode=true\n";

    #[test]
    fn test_backslashes_and_quotes_survive() {
        let doc = IniDocument::parse(QT_CONFIG).unwrap();

        assert_eq!(doc.get("Controls", "player_0_button_a\\default"), Some("false"));
        assert_eq!(
            doc.get("Controls", "player_0_button_a"),
            Some("\"button:1,guid:0300,port:0,engine:sdl\"")
        );

        let rendered = doc.to_ini_string().unwrap();
        assert!(rendered.contains("player_0_button_a\\default = false"));
        assert!(rendered.contains("player_0_button_a = \"button:1,guid:0300,port:0,engine:sdl\""));
    }

    #[test]
    fn test_key_case_is_preserved() {
        let mut doc = IniDocument::new();
        doc.set("UI", "singleWindowMode", "true");
        assert_eq!(doc.get("UI", "singleWindowMode"), Some("true"));
        assert!(doc.to_ini_string().unwrap().contains("singleWindowMode = true"));
    }

    #[test]
    fn test_set_replaces_existing_value() {
        let mut doc = IniDocument::parse(QT_CONFIG).unwrap();
        doc.set("UI", "singleWindowMode", "false");

        assert_eq!(doc.get("UI", "singleWindowMode"), Some("false"));
        assert_eq!(doc.entries("UI").len(), 1);
    }

    #[test]
    fn test_entries_keep_file_order() {
        let doc = IniDocument::parse(QT_CONFIG).unwrap();
        let keys: Vec<_> = doc.entries("Controls").into_iter().map(|(k, _)| k).collect();
        assert_eq!(keys, ["player_0_button_a\\default", "player_0_button_a"]);
        assert!(doc.entries("Missing").is_empty());
    }

    #[test]
    fn test_round_trip_through_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("yuzu/qt-config.ini");

        let mut doc = IniDocument::load_or_empty(&path).unwrap();
        doc.set("Renderer", "use_vsync\\default", "false");
        doc.write(&path).unwrap();

        let reloaded = IniDocument::load_or_empty(&path).unwrap();
        assert_eq!(reloaded.get("Renderer", "use_vsync\\default"), Some("false"));
    }
}
