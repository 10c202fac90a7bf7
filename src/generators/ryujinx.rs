//! Ryujinx generator (`Config.json`)

pub mod input_config;
pub mod settings;

use anyhow::{Context, Result};
use serde_json::{Map, Value};
use std::fs;
use std::path::Path;
use tracing::{debug, info, warn};

use super::{Command, Generator, GeneratorContext, GeneratorError, HotkeysContext};
use crate::config::Options;
use crate::host;
use crate::input::controller::game_controller_config;
use crate::paths::{target_appimage, SwitchPaths};

use input_config::build_input_config;
use settings::RyujinxSettings;

const INPUT_CONFIG: &str = "input_config";

/// Rom value that opens the emulator UI without a game
const CONFIG_ROM: &str = "config";

const ENVIRONMENT: &[(&str, &str)] = &[
    ("DRI_PRIME", "1"),
    ("AMD_VULKAN_ICD", "RADV"),
    ("DISABLE_LAYER_AMD_SWITCHABLE_GRAPHICS_1", "1"),
    ("XDG_MENU_PREFIX", "batocera-"),
    ("XDG_CONFIG_DIRS", "/etc/xdg"),
    ("XDG_CURRENT_DESKTOP", "XFCE"),
    ("DESKTOP_SESSION", "XFCE"),
    ("QT_FONT_DPI", "96"),
    ("QT_SCALE_FACTOR", "1"),
    ("GDK_SCALE", "1"),
    ("DOTNET_EnableAlternateStackCheck", "1"),
    ("XDG_CONFIG_HOME", crate::paths::TARGET_CONFIGS),
    ("XDG_CACHE_HOME", crate::paths::TARGET_CACHE),
];

#[derive(Debug, Default, Clone, Copy)]
pub struct RyujinxGenerator;

fn auto_controller_config(options: &Options) -> bool {
    options.get("ryu_auto_controller_config") != Some("0")
}

/// SDL joystick backends; the Deck's built-in pad misbehaves over HIDAPI
fn joystick_backend_env(is_steam_deck: bool) -> Vec<(&'static str, &'static str)> {
    if is_steam_deck {
        vec![("SDL_JOYSTICK_HIDAPI", "0"), ("SDL_JOYSTICK_RAWINPUT", "0")]
    } else {
        vec![("SDL_JOYSTICK_HIDAPI", "1")]
    }
}

impl Generator for RyujinxGenerator {
    fn name(&self) -> &str {
        "ryujinx"
    }

    fn generate(&self, ctx: &GeneratorContext<'_>) -> Result<Command> {
        let launch = ctx.launch;
        let config = build_config(ctx)?;
        let rendered = render(&config)?;

        let config_file = ctx.paths.ryujinx_config_file();
        if ctx.dry_run {
            info!("Dry run: not writing {}", config_file.display());
        } else {
            for file in [config_file, ctx.paths.ryujinx_config_before_file()] {
                SwitchPaths::ensure_parent(&file)?;
                fs::write(&file, &rendered)
                    .with_context(|| format!("Failed to write {}", file.display()))?;
                info!("Wrote {}", file.display());
            }
        }

        let handheld = host::detect_handheld(&ctx.paths.sys_dir());
        let sdl_config = game_controller_config(&launch.controllers);
        debug!("SDL_GAMECONTROLLERCONFIG:\n{}", sdl_config);

        let appimage = target_appimage(&launch.emulator);
        let array = if launch.rom == CONFIG_ROM {
            vec![appimage]
        } else {
            vec![appimage, launch.rom.clone()]
        };

        Ok(Command::new(array)
            .with_env(ENVIRONMENT.iter().copied())
            .with_env([("SDL_GAMECONTROLLERCONFIG".to_string(), sdl_config)])
            .with_env(joystick_backend_env(handheld.is_steam_deck)))
    }

    fn hotkeys(&self) -> HotkeysContext {
        HotkeysContext::exit_only("ryujinx-emu")
    }
}

fn read_json_object(path: &Path) -> Result<Option<Map<String, Value>>> {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e).with_context(|| format!("Failed to read {}", path.display())),
    };
    let value: Value = serde_json::from_str(&raw).map_err(|source| GeneratorError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    match value {
        Value::Object(map) => Ok(Some(map)),
        _ => {
            warn!("{} is not a JSON object, ignoring it", path.display());
            Ok(None)
        }
    }
}

/// Template, then settings, then controllers.
pub fn build_config(ctx: &GeneratorContext<'_>) -> Result<Map<String, Value>> {
    let paths = ctx.paths;
    let options = &ctx.launch.options;

    let mut config = Map::new();
    for template in paths.ryujinx_template_files() {
        if let Some(map) = read_json_object(&template)? {
            debug!("Using template {}", template.display());
            config = map;
            break;
        }
    }

    let preferred_gpu = host::find_gpu_card(&paths.sys_dir())
        .and_then(|card| host::preferred_gpu(&card));
    if preferred_gpu.is_none() {
        warn!("No readable GPU id, leaving preferred_gpu unset");
    }
    let language = host::language_code(ctx.lang.as_deref());
    RyujinxSettings::from_options(options, language, preferred_gpu)
        .apply(&mut config)
        .context("Failed to serialize Ryujinx settings")?;

    if auto_controller_config(options) {
        let entries = build_input_config(&ctx.launch.controllers, options);
        info!("Configured {} controller(s)", entries.len());
        config.insert(
            INPUT_CONFIG.to_string(),
            serde_json::to_value(entries).context("Failed to serialize input_config")?,
        );
    } else {
        let previous = read_json_object(&paths.ryujinx_config_file())?;
        match previous.and_then(|mut map| map.remove(INPUT_CONFIG)) {
            Some(kept) => {
                info!("Manual controller config: keeping existing input_config");
                config.insert(INPUT_CONFIG.to_string(), kept);
            }
            None => debug!("Manual controller config: no previous input_config"),
        }
    }

    Ok(config)
}

/// Two-space indented JSON, as Ryujinx writes it
pub fn render(config: &Map<String, Value>) -> Result<String> {
    serde_json::to_string_pretty(config).context("Failed to render Config.json")
}
