//! Host detection: handheld model, GPU identity and UI language

use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Languages the Ryujinx UI ships translations for
const SUPPORTED_LANGUAGES: &[&str] = &[
    "en_US", "pt_BR", "es_ES", "fr_FR", "de_DE", "it_IT", "el_GR", "tr_TR", "zh_CN",
];

const FALLBACK_LANGUAGE: &str = "en_US";

/// Result of the DMI product lookup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Handheld {
    pub is_steam_deck: bool,
    pub product_name: String,
}

/// Identify the machine from `/sys/class/dmi/id/product_name`.
pub fn detect_handheld(sys_root: &Path) -> Handheld {
    let path = sys_root.join("class/dmi/id/product_name");
    match fs::read_to_string(&path) {
        Ok(raw) => {
            let product_name = raw.trim().to_string();
            let lower = product_name.to_lowercase();
            let is_steam_deck =
                lower == "jupiter" || lower == "galileo" || lower.contains("steam deck");
            debug!("DMI product '{}' (steam deck: {})", product_name, is_steam_deck);
            Handheld { is_steam_deck, product_name }
        }
        Err(e) => {
            debug!("No DMI product name at {}: {}", path.display(), e);
            Handheld { is_steam_deck: false, product_name: "Unknown".to_string() }
        }
    }
}

/// First DRM card (`card0`, `card1`, ...) that exposes PCI ids
pub fn find_gpu_card(sys_root: &Path) -> Option<PathBuf> {
    let drm = sys_root.join("class/drm");
    let mut cards: Vec<PathBuf> = fs::read_dir(&drm)
        .ok()?
        .filter_map(|e| e.ok())
        .filter(|e| {
            let name = e.file_name();
            let name = name.to_string_lossy();
            name.strip_prefix("card")
                .is_some_and(|n| !n.is_empty() && n.bytes().all(|b| b.is_ascii_digit()))
        })
        .map(|e| e.path())
        .collect();
    cards.sort();
    cards.into_iter().find(|c| c.join("device/vendor").exists())
}

/// `<VENDOR>_<DEVICE>` id of a DRM card, e.g. `0x1002_0x163F`
pub fn preferred_gpu(card_dir: &Path) -> Option<String> {
    let read_id = |name: &str| -> Option<String> {
        let path = card_dir.join("device").join(name);
        match fs::read_to_string(&path) {
            Ok(raw) => Some(raw.trim().to_uppercase().replace("0X", "0x")),
            Err(e) => {
                warn!("Cannot read GPU id {}: {}", path.display(), e);
                None
            }
        }
    };
    Some(format!("{}_{}", read_id("vendor")?, read_id("device")?))
}

/// UI language from a `LANG` value (`fr_FR.UTF-8` -> `fr_FR`)
pub fn language_code(lang: Option<&str>) -> &'static str {
    let Some(lang) = lang else {
        return FALLBACK_LANGUAGE;
    };
    let prefix = lang.get(..5).unwrap_or(lang);
    SUPPORTED_LANGUAGES
        .iter()
        .find(|l| **l == prefix)
        .copied()
        .unwrap_or(FALLBACK_LANGUAGE)
}
