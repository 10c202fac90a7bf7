//! Platform game-controller enumeration
//!
//! The enumeration service (SDL's game-controller subsystem on the target)
//! is hidden behind [`ControllerEnumerator`]. A backend only reports raw slot
//! records; GUID post-processing and mapping parsing happen here so every
//! backend yields identical identities.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, info, warn};

use super::capability::{parse_mapping, PlatformGamepad};
use super::error::EnumerationError;
use super::guid::Guid;
use super::topology::SysfsScanner;

/// Service hints that disable vendor-specific native HID drivers so every
/// pad goes through the same generic enumeration path.
const NATIVE_HID_OVERRIDES: &[(&str, &str)] = &[
    ("SDL_JOYSTICK_HIDAPI", "1"),
    ("SDL_JOYSTICK_HIDAPI_XBOX", "0"),
    ("SDL_JOYSTICK_HIDAPI_XBOX_ONE", "0"),
    ("SDL_JOYSTICK_HIDAPI_SWITCH", "0"),
    ("SDL_JOYSTICK_HIDAPI_STEAMDECK", "0"),
    ("SDL_JOYSTICK_HIDAPI_PS4", "0"),
    ("SDL_JOYSTICK_HIDAPI_PS5", "0"),
];

/// Enumeration backend generation the emulator is built against.
///
/// Version 3 encodes the bus type in the first GUID byte for raw-HID devices,
/// version 2 leaves a placeholder there.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ApiVersion {
    #[default]
    #[serde(rename = "2")]
    V2,
    #[serde(rename = "3")]
    V3,
}

impl ApiVersion {
    pub fn from_number(n: u8) -> Option<Self> {
        match n {
            2 => Some(ApiVersion::V2),
            3 => Some(ApiVersion::V3),
            _ => None,
        }
    }
}

/// Settings applied to the service for the duration of one enumeration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumerationConfig {
    pub api_version: ApiVersion,
    /// Service hints (name, value) set before init and restored afterwards
    pub hints: Vec<(String, String)>,
}

impl EnumerationConfig {
    pub fn new(api_version: ApiVersion) -> Self {
        Self {
            api_version,
            hints: NATIVE_HID_OVERRIDES
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }
}

impl Default for EnumerationConfig {
    fn default() -> Self {
        Self::new(ApiVersion::default())
    }
}

/// One recognised game-controller slot, as read from the service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawGamepad {
    pub index: u32,
    /// Device node of the slot
    pub path: String,
    /// GUID rendered by the service, untouched
    pub guid: String,
    /// Mapping string of the slot
    pub mapping: String,
}

/// Access to the platform game-controller service
pub trait ControllerEnumerator {
    /// Backend name for logging
    fn name(&self) -> &str;

    /// Read every slot recognised as a game controller.
    ///
    /// Implementations must release the service before returning on every
    /// path, and skip (not fail on) slots that cannot be read.
    fn enumerate_raw(&self, config: &EnumerationConfig) -> Result<Vec<RawGamepad>, EnumerationError>;
}

/// Backend used when the binary is built without a platform service
#[derive(Debug, Default, Clone, Copy)]
pub struct NullEnumerator;

impl ControllerEnumerator for NullEnumerator {
    fn name(&self) -> &str {
        "none"
    }

    fn enumerate_raw(&self, _config: &EnumerationConfig) -> Result<Vec<RawGamepad>, EnumerationError> {
        Err(EnumerationError::Unavailable)
    }
}

/// Backend replaying a fixed list of slots
#[derive(Debug, Default, Clone)]
pub struct StaticEnumerator {
    pads: Vec<RawGamepad>,
}

impl StaticEnumerator {
    pub fn new(pads: Vec<RawGamepad>) -> Self {
        Self { pads }
    }
}

impl ControllerEnumerator for StaticEnumerator {
    fn name(&self) -> &str {
        "static"
    }

    fn enumerate_raw(&self, _config: &EnumerationConfig) -> Result<Vec<RawGamepad>, EnumerationError> {
        Ok(self.pads.clone())
    }
}

/// The backend compiled into this build
pub fn default_enumerator() -> Box<dyn ControllerEnumerator> {
    #[cfg(feature = "sdl")]
    {
        Box::new(super::sdl::SdlEnumerator)
    }
    #[cfg(not(feature = "sdl"))]
    {
        Box::new(NullEnumerator)
    }
}

/// Canonical GUID of a slot: driver noise removed and, for version 3
/// backends on raw-HID devices, the bus tag spliced into the first byte.
pub fn canonical_guid(raw: &RawGamepad, version: ApiVersion, scanner: &SysfsScanner) -> Guid {
    let guid = Guid::new(&raw.guid).without_driver_noise();

    if version != ApiVersion::V3 || !raw.path.contains("hidraw") {
        return guid;
    }

    match scanner.bus_type_of(&raw.path) {
        Ok(tag) => guid.with_bus_tag(&tag),
        Err(e) => {
            warn!("Bus type unavailable for {}: {}", raw.path, e);
            guid
        }
    }
}

/// Enumerate attached game controllers keyed by device path.
///
/// Service failures are logged and yield an empty map, which sends every
/// controller down the frontend fallback path.
pub fn enumerate(
    enumerator: &dyn ControllerEnumerator,
    config: &EnumerationConfig,
    scanner: &SysfsScanner,
) -> BTreeMap<String, PlatformGamepad> {
    let raw = match enumerator.enumerate_raw(config) {
        Ok(raw) => raw,
        Err(e) => {
            warn!("Controller enumeration via {} failed: {}", enumerator.name(), e);
            return BTreeMap::new();
        }
    };

    let mut gamepads = BTreeMap::new();
    for slot in raw {
        let guid = canonical_guid(&slot, config.api_version, scanner);
        debug!("Slot {} at {}: {}", slot.index, slot.path, slot.mapping);

        let gamepad = parse_mapping(&slot.mapping, guid).with_path(slot.path.clone());
        info!("Platform pad {} guid={} ({} inputs)", slot.path, gamepad.guid, gamepad.inputs.len());
        gamepads.entry(slot.path).or_insert(gamepad);
    }

    gamepads
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::os::unix::fs::symlink;
    use tempfile::TempDir;

    fn slot(index: u32, path: &str, guid: &str) -> RawGamepad {
        RawGamepad {
            index,
            path: path.to_string(),
            guid: guid.to_string(),
            mapping: format!("{},Pad,a:b0,b:b1,leftx:a0,platform:Linux", guid),
        }
    }

    #[test]
    fn test_default_config_disables_native_drivers() {
        let config = EnumerationConfig::default();
        assert_eq!(config.api_version, ApiVersion::V2);
        assert!(config
            .hints
            .contains(&("SDL_JOYSTICK_HIDAPI_PS5".to_string(), "0".to_string())));
        assert!(config
            .hints
            .contains(&("SDL_JOYSTICK_HIDAPI".to_string(), "1".to_string())));
    }

    #[test]
    fn test_enumerate_zeroes_driver_noise() {
        let enumerator = StaticEnumerator::new(vec![slot(
            0,
            "/dev/input/event4",
            "0300abcd5e0400008e02000010010000",
        )]);
        let scanner = SysfsScanner::new("/nonexistent");

        let pads = enumerate(&enumerator, &EnumerationConfig::default(), &scanner);

        let pad = &pads["/dev/input/event4"];
        assert_eq!(pad.guid.as_str(), "030000005e0400008e02000010010000");
        assert_eq!(pad.path, "/dev/input/event4");
        assert_eq!(pad.platform, "Linux");
        assert_eq!(pad.inputs.len(), 3);
    }

    #[test]
    fn test_v3_splices_bus_tag_for_hidraw() {
        let tmp = TempDir::new().unwrap();
        let device = tmp.path().join("sys/devices/bt/0005:057E:2009.0001");
        fs::create_dir_all(&device).unwrap();
        let class = tmp.path().join("sys/class/hidraw/hidraw2");
        fs::create_dir_all(&class).unwrap();
        symlink(&device, class.join("device")).unwrap();
        let scanner = SysfsScanner::new(tmp.path());

        let raw = slot(0, "/dev/hidraw2", "0000e8057e0500000920000000006800");

        assert_eq!(
            canonical_guid(&raw, ApiVersion::V3, &scanner).as_str(),
            "050000007e0500000920000000006800"
        );
        assert_eq!(
            canonical_guid(&raw, ApiVersion::V2, &scanner).as_str(),
            "000000007e0500000920000000006800"
        );
    }

    #[test]
    fn test_v3_without_sysfs_keeps_guid() {
        let scanner = SysfsScanner::new("/nonexistent");
        let raw = slot(0, "/dev/hidraw7", "0300000011110000222200003333ffff");
        assert_eq!(
            canonical_guid(&raw, ApiVersion::V3, &scanner).as_str(),
            "0300000011110000222200003333ffff"
        );
    }

    #[test]
    fn test_service_failure_yields_empty_map() {
        let scanner = SysfsScanner::new("/nonexistent");
        let pads = enumerate(&NullEnumerator, &EnumerationConfig::default(), &scanner);
        assert!(pads.is_empty());
    }

    #[test]
    fn test_duplicate_paths_keep_first_slot() {
        let enumerator = StaticEnumerator::new(vec![
            slot(0, "/dev/hidraw0", "03000000aaaa0000bbbb000000000000"),
            slot(1, "/dev/hidraw0", "03000000cccc0000dddd000000000000"),
        ]);
        let scanner = SysfsScanner::new("/nonexistent");

        let pads = enumerate(&enumerator, &EnumerationConfig::default(), &scanner);

        assert_eq!(pads.len(), 1);
        assert!(pads["/dev/hidraw0"].guid.as_str().starts_with("03000000aaaa"));
    }
}
