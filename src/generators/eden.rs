//! Eden / Citron generator (`qt-config.ini`)

pub mod mapping;
pub mod settings;

use anyhow::Result;
use std::path::PathBuf;
use tracing::info;

use super::{Command, Generator, GeneratorContext, GeneratorError, HotkeysContext};
use crate::config::Options;
use crate::ini::IniDocument;
use crate::input::{self, ApiVersion, ControllerIdentity, EnumerationConfig};
use crate::paths::TARGET_APPIMAGES;

use settings::{write_service_sections, EdenSettings};

const CONTROLS: &str = "Controls";

/// Fixed desktop environment the Qt front of the emulator expects
const ENVIRONMENT: &[(&str, &str)] = &[
    ("DRI_PRIME", "1"),
    ("AMD_VULKAN_ICD", "RADV"),
    ("DISABLE_LAYER_AMD_SWITCHABLE_GRAPHICS_1", "1"),
    ("QT_XKB_CONFIG_ROOT", "/usr/share/X11/xkb"),
    ("NO_AT_BRIDGE", "1"),
    ("XDG_MENU_PREFIX", "batocera-"),
    ("XDG_CONFIG_DIRS", "/etc/xdg"),
    ("XDG_CURRENT_DESKTOP", "XFCE"),
    ("DESKTOP_SESSION", "XFCE"),
    ("QT_FONT_DPI", "96"),
    ("QT_SCALE_FACTOR", "1"),
    ("GDK_SCALE", "1"),
    ("XDG_CACHE_HOME", crate::paths::TARGET_CACHE),
    ("QT_QPA_PLATFORM", "xcb"),
    ("USER", "root"),
    ("LANG", "en_US.UTF-8"),
];

/// Generator for the yuzu-derived emulators
#[derive(Debug, Default, Clone, Copy)]
pub struct EdenGenerator;

/// Citron is built against the newer enumeration backend
pub fn api_version_for(emulator: &str) -> ApiVersion {
    if emulator == "citron-emu" {
        ApiVersion::V3
    } else {
        ApiVersion::V2
    }
}

/// Whether controller sections are synthesised (`yuzu_auto_controller_config`
/// unset or anything but `0`)
fn auto_controller_config(options: &Options) -> bool {
    options.get("yuzu_auto_controller_config") != Some("0")
}

impl Generator for EdenGenerator {
    fn name(&self) -> &str {
        "eden"
    }

    fn generate(&self, ctx: &GeneratorContext<'_>) -> Result<Command> {
        let launch = ctx.launch;
        let config_file = ctx.paths.yuzu_config_file();

        let doc = build_config(ctx)?;
        if ctx.dry_run {
            info!("Dry run: not writing {}", config_file.display());
        } else {
            doc.write(&config_file)?;
            info!("Wrote {}", config_file.display());
        }

        let mut command = Command::new([
            format!("./{}.AppImage", launch.emulator),
            "-f".to_string(),
            "-g".to_string(),
            launch.rom.clone(),
        ])
        .with_env(ENVIRONMENT.iter().copied());
        command.cwd = self.execution_directory();
        Ok(command)
    }

    fn execution_directory(&self) -> Option<PathBuf> {
        Some(PathBuf::from(TARGET_APPIMAGES))
    }

    fn hotkeys(&self) -> HotkeysContext {
        HotkeysContext::exit_only("switch-emu")
    }
}

/// Merge the template, the options and the controller mapping into one
/// document.
pub fn build_config(ctx: &GeneratorContext<'_>) -> Result<IniDocument> {
    let options = &ctx.launch.options;
    let mut doc = IniDocument::load_or_empty(&ctx.paths.yuzu_template_file())?;

    EdenSettings::from_options(options).write(&mut doc);

    doc.ensure_section(CONTROLS);
    if auto_controller_config(options) {
        for identity in resolve(ctx)? {
            mapping::write_player(&mut doc, &identity, options);
        }
    } else {
        let previous = IniDocument::load_or_empty(&ctx.paths.yuzu_config_file())?;
        let kept = previous.entries(CONTROLS);
        info!("Manual controller config: keeping {} existing control key(s)", kept.len());
        for (key, value) in kept {
            doc.set(CONTROLS, &key, value);
        }
    }

    write_service_sections(&mut doc);
    Ok(doc)
}

fn resolve(ctx: &GeneratorContext<'_>) -> Result<Vec<ControllerIdentity>> {
    let version = ctx
        .api_version
        .unwrap_or_else(|| api_version_for(&ctx.launch.emulator));
    let discovery = input::discover(ctx.scanner, ctx.enumerator, &EnumerationConfig::new(version));
    let identities = input::resolve_identities(&ctx.launch.controllers, &discovery)
        .map_err(GeneratorError::from)?;
    Ok(identities)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_version_per_emulator() {
        assert_eq!(api_version_for("citron-emu"), ApiVersion::V3);
        assert_eq!(api_version_for("eden-emu"), ApiVersion::V2);
        assert_eq!(api_version_for("eden-pgo"), ApiVersion::V2);
    }

    #[test]
    fn test_auto_controller_config_switch() {
        let mut options = Options::new();
        assert!(auto_controller_config(&options));
        options.insert("yuzu_auto_controller_config", "1");
        assert!(auto_controller_config(&options));
        options.insert("yuzu_auto_controller_config", "0");
        assert!(!auto_controller_config(&options));
    }

    #[test]
    fn test_hotkeys() {
        let hotkeys = EdenGenerator.hotkeys();
        assert_eq!(hotkeys.name, "switch-emu");
        assert_eq!(hotkeys.keys["exit"], ["KEY_LEFTALT", "KEY_F4"]);
    }
}
