//! `input_config` entries of Ryujinx's `Config.json`
//!
//! Field order follows the file Ryujinx itself writes, so a regenerated
//! config diffs cleanly against the emulator's own.

use serde::Serialize;

use crate::config::Options;
use crate::input::{FrontendController, Guid, PortAllocator};

/// Joy-Con halves exposed as separate pads; the pair is configured instead
pub const SKIPPED_GUIDS: &[&str] = &[
    "050000007e0500000620000001800000",
    "050000007e0500000720000001800000",
];

const UNBOUND: &str = "Unbound";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StickConfig {
    pub joystick: &'static str,
    pub rotate90_cw: bool,
    pub invert_stick_x: bool,
    pub invert_stick_y: bool,
    pub stick_button: &'static str,
}

impl StickConfig {
    fn new(joystick: &'static str, stick_button: &'static str) -> Self {
        Self {
            joystick,
            rotate90_cw: false,
            invert_stick_x: false,
            invert_stick_y: false,
            stick_button,
        }
    }

    fn unbound_rotated() -> Self {
        Self {
            joystick: UNBOUND,
            rotate90_cw: true,
            invert_stick_x: true,
            invert_stick_y: true,
            stick_button: UNBOUND,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LeftJoycon {
    pub button_minus: &'static str,
    pub button_l: &'static str,
    pub button_zl: &'static str,
    pub button_sl: &'static str,
    pub button_sr: &'static str,
    pub dpad_up: &'static str,
    pub dpad_down: &'static str,
    pub dpad_left: &'static str,
    pub dpad_right: &'static str,
}

impl LeftJoycon {
    fn standard() -> Self {
        Self {
            button_minus: "Back",
            button_l: "LeftShoulder",
            button_zl: "LeftTrigger",
            button_sl: UNBOUND,
            button_sr: UNBOUND,
            dpad_up: "DpadUp",
            dpad_down: "DpadDown",
            dpad_left: "DpadLeft",
            dpad_right: "DpadRight",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RightJoycon {
    pub button_plus: &'static str,
    pub button_r: &'static str,
    pub button_zr: &'static str,
    pub button_sl: &'static str,
    pub button_sr: &'static str,
    pub button_x: &'static str,
    pub button_b: &'static str,
    pub button_y: &'static str,
    pub button_a: &'static str,
}

impl RightJoycon {
    /// Face buttons by position: Nintendo X sits where the pad reports Y
    fn standard() -> Self {
        Self {
            button_plus: "Start",
            button_r: "RightShoulder",
            button_zr: "RightTrigger",
            button_sl: UNBOUND,
            button_sr: UNBOUND,
            button_x: "Y",
            button_b: "A",
            button_y: "X",
            button_a: "B",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Motion {
    pub motion_backend: &'static str,
    pub sensitivity: u32,
    pub gyro_deadzone: u32,
    pub enable_motion: bool,
}

impl Default for Motion {
    fn default() -> Self {
        Self {
            motion_backend: "GamepadDriver",
            sensitivity: 100,
            gyro_deadzone: 1,
            enable_motion: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Rumble {
    pub strong_rumble: u32,
    pub weak_rumble: u32,
    pub enable_rumble: bool,
}

impl Default for Rumble {
    fn default() -> Self {
        Self { strong_rumble: 1, weak_rumble: 1, enable_rumble: true }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Led {
    pub enable_led: bool,
    pub turn_off_led: bool,
    pub use_rainbow: bool,
    pub led_color: u32,
}

/// Physical layout chosen with the `p<player>_pad` option
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PadLayout {
    /// Dual-stick layout; carries the controller type written out
    /// (`ProController` or `JoyconPair`)
    Dual(String),
    JoyconLeft,
    JoyconRight,
    /// Unset option or a value from an older release
    Legacy,
}

impl PadLayout {
    pub fn from_option(value: Option<&str>) -> Self {
        match value {
            None => PadLayout::Dual("ProController".to_string()),
            Some(v @ ("ProController" | "JoyconPair")) => PadLayout::Dual(v.to_string()),
            Some("JoyconLeft") => PadLayout::JoyconLeft,
            Some("JoyconRight") => PadLayout::JoyconRight,
            Some(_) => PadLayout::Legacy,
        }
    }

    fn controller_type(&self) -> String {
        match self {
            PadLayout::Dual(kind) => kind.clone(),
            PadLayout::JoyconLeft => "JoyconLeft".to_string(),
            PadLayout::JoyconRight => "JoyconRight".to_string(),
            PadLayout::Legacy => "ProController".to_string(),
        }
    }

    fn sticks(&self) -> (StickConfig, StickConfig) {
        match self {
            PadLayout::Dual(_) | PadLayout::Legacy => (
                StickConfig::new("Left", "LeftStick"),
                StickConfig::new("Right", "RightStick"),
            ),
            PadLayout::JoyconLeft => (
                StickConfig::new("Left", "LeftStick"),
                StickConfig::new(UNBOUND, UNBOUND),
            ),
            PadLayout::JoyconRight => (
                StickConfig::unbound_rotated(),
                StickConfig::new("Left", "LeftStick"),
            ),
        }
    }

    fn joycons(&self) -> (LeftJoycon, RightJoycon) {
        match self {
            PadLayout::Dual(_) | PadLayout::Legacy => (LeftJoycon::standard(), RightJoycon::standard()),
            // Sideways left Joy-Con: the d-pad becomes the face buttons
            PadLayout::JoyconLeft => (
                LeftJoycon {
                    button_sl: "LeftShoulder",
                    button_sr: "RightShoulder",
                    dpad_up: "Y",
                    dpad_down: "A",
                    dpad_left: "X",
                    dpad_right: "B",
                    ..LeftJoycon::standard()
                },
                RightJoycon::standard(),
            ),
            PadLayout::JoyconRight => (
                LeftJoycon::standard(),
                RightJoycon {
                    button_sl: "LeftShoulder",
                    button_sr: "RightShoulder",
                    button_x: "B",
                    button_b: "X",
                    button_y: "Y",
                    button_a: "A",
                    ..RightJoycon::standard()
                },
            ),
        }
    }
}

/// One controller entry
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InputConfigEntry {
    pub controller_type: String,
    pub left_joycon_stick: StickConfig,
    pub right_joycon_stick: StickConfig,
    pub deadzone_left: f64,
    pub deadzone_right: f64,
    pub range_left: u32,
    pub range_right: u32,
    pub trigger_threshold: f64,
    pub motion: Motion,
    pub rumble: Rumble,
    pub led: Led,
    pub left_joycon: LeftJoycon,
    pub right_joycon: RightJoycon,
    pub version: u32,
    pub backend: &'static str,
    pub id: String,
    pub player_index: String,
}

impl InputConfigEntry {
    /// Build the entry of `controller`; `index` is its running number among
    /// controllers sharing the same GUID.
    pub fn new(controller: &FrontendController, layout: &PadLayout, index: usize) -> Self {
        let (left_joycon_stick, right_joycon_stick) = layout.sticks();
        let (left_joycon, right_joycon) = layout.joycons();
        Self {
            controller_type: layout.controller_type(),
            left_joycon_stick,
            right_joycon_stick,
            deadzone_left: 0.1,
            deadzone_right: 0.1,
            range_left: 1,
            range_right: 1,
            trigger_threshold: 0.5,
            motion: Motion::default(),
            rumble: Rumble::default(),
            led: Led::default(),
            left_joycon,
            right_joycon,
            version: 1,
            backend: "GamepadSDL2",
            id: entry_id(&controller.guid, index),
            player_index: format!("Player{}", controller.player_number),
        }
    }
}

/// `<index>-<byte-swapped GUID>`, the id Ryujinx gives an SDL2 gamepad
pub fn entry_id(guid: &Guid, index: usize) -> String {
    format!("{}-{}", index, guid.to_swapped_uuid().hyphenated())
}

/// Entries for every frontend controller, in player order.
pub fn build_input_config(controllers: &[FrontendController], options: &Options) -> Vec<InputConfigEntry> {
    let mut ordered: Vec<&FrontendController> = controllers.iter().collect();
    ordered.sort_by_key(|c| c.player_number);

    let mut counters = PortAllocator::new();
    ordered
        .into_iter()
        .filter(|c| !SKIPPED_GUIDS.contains(&c.guid.as_str()))
        .map(|controller| {
            let index = counters.assign(&controller.guid);
            let layout = PadLayout::from_option(
                options.get(&format!("p{}_pad", controller.player_number)),
            );
            InputConfigEntry::new(controller, &layout, index)
        })
        .collect()
}
