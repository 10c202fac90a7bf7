//! Appliance filesystem layout.
//!
//! All files this tool reads or writes live under `/userdata` and `/sys`.
//! [`SwitchPaths`] resolves them below a configurable root so a whole
//! appliance tree can be staged in a temporary directory.
//!
//! ## Two kinds of paths
//!
//! - **Host paths** (`*_file`, `*_dir` methods) are joined onto the root and
//!   are what this process opens.
//! - **Target paths** (the `TARGET_*` constants) are written into generated
//!   commands and config files verbatim; the emulator resolves them at run
//!   time on the real appliance.

use anyhow::Context;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Where the emulator AppImages live on the appliance
pub const TARGET_APPIMAGES: &str = "/userdata/system/switch/appimages";

/// Switch ROM directory as the emulators see it
pub const TARGET_ROMS: &str = "/userdata/roms/switch";

/// Launcher cache directory as the emulators see it
pub const TARGET_CACHE: &str = "/userdata/system/.cache";

/// Configs directory as the emulators see it
pub const TARGET_CONFIGS: &str = "/userdata/system/configs";

/// Stock configgen defaults directory (relative to the root)
const STOCK_DEFAULTS_DIR: &str = "usr/share/batocera/configgen";

/// Resolved appliance paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwitchPaths {
    root: PathBuf,
}

impl Default for SwitchPaths {
    fn default() -> Self {
        Self::new("/")
    }
}

impl SwitchPaths {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn userdata(&self) -> PathBuf {
        self.root.join("userdata")
    }

    /// Directory of the switch add-on's own files (templates, defaults)
    pub fn configgen_dir(&self) -> PathBuf {
        self.userdata().join("system/switch/configgen")
    }

    pub fn appimages_dir(&self) -> PathBuf {
        self.userdata().join("system/switch/appimages")
    }

    pub fn configs_dir(&self) -> PathBuf {
        self.userdata().join("system/configs")
    }

    /// Eden/Citron/Yuzu settings file
    pub fn yuzu_config_file(&self) -> PathBuf {
        self.configs_dir().join("yuzu/qt-config.ini")
    }

    pub fn yuzu_template_file(&self) -> PathBuf {
        self.configgen_dir().join("qt-config.ini.template")
    }

    pub fn ryujinx_dir(&self) -> PathBuf {
        self.configs_dir().join("Ryujinx")
    }

    pub fn ryujinx_config_file(&self) -> PathBuf {
        self.ryujinx_dir().join("Config.json")
    }

    /// Copy of the last written Ryujinx config, kept for diffing
    pub fn ryujinx_config_before_file(&self) -> PathBuf {
        self.ryujinx_dir().join("Config.json.before")
    }

    /// Ryujinx template candidates, most specific first
    pub fn ryujinx_template_files(&self) -> [PathBuf; 2] {
        [
            self.configgen_dir().join("Config.json.template"),
            self.ryujinx_dir().join("Config.json.template"),
        ]
    }

    /// Switch-specific system defaults (main, arch)
    pub fn switch_defaults_files(&self) -> (PathBuf, PathBuf) {
        let dir = self.configgen_dir();
        (dir.join("configgen-defaults.yml"), dir.join("configgen-defaults-arch.yml"))
    }

    /// Stock launcher system defaults (main, arch)
    pub fn stock_defaults_files(&self) -> (PathBuf, PathBuf) {
        let dir = self.root.join(STOCK_DEFAULTS_DIR);
        (dir.join("configgen-defaults.yml"), dir.join("configgen-defaults-arch.yml"))
    }

    /// sysfs mount point
    pub fn sys_dir(&self) -> PathBuf {
        self.root.join("sys")
    }

    /// Host path of an emulator AppImage
    pub fn appimage_file(&self, emulator: &str) -> PathBuf {
        self.appimages_dir().join(format!("{}.AppImage", emulator))
    }

    /// Create the parent directory of `file` if needed.
    pub fn ensure_parent(file: &Path) -> anyhow::Result<()> {
        if let Some(parent) = file.parent() {
            if !parent.exists() {
                debug!("Creating directory: {}", parent.display());
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create {}", parent.display()))?;
            }
        }
        Ok(())
    }
}

/// Target path of an emulator AppImage
pub fn target_appimage(emulator: &str) -> String {
    format!("{}/{}.AppImage", TARGET_APPIMAGES, emulator)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_paths_are_rooted() {
        let paths = SwitchPaths::new("/tmp/stage");

        assert_eq!(
            paths.yuzu_config_file(),
            PathBuf::from("/tmp/stage/userdata/system/configs/yuzu/qt-config.ini")
        );
        assert_eq!(paths.sys_dir(), PathBuf::from("/tmp/stage/sys"));
        assert_eq!(
            paths.switch_defaults_files().1,
            PathBuf::from("/tmp/stage/userdata/system/switch/configgen/configgen-defaults-arch.yml")
        );
    }

    #[test]
    fn test_target_paths_ignore_root() {
        assert_eq!(
            target_appimage("ryujinx-emu"),
            "/userdata/system/switch/appimages/ryujinx-emu.AppImage"
        );
    }

    #[test]
    fn test_ensure_parent_creates_directories() {
        let tmp = TempDir::new().unwrap();
        let file = tmp.path().join("a/b/c.ini");

        SwitchPaths::ensure_parent(&file).unwrap();

        assert!(tmp.path().join("a/b").is_dir());
    }
}
