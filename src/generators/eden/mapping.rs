//! Controller directives in the Eden/Citron INI grammar
//!
//! ```text
//! button:1,guid:030000005e0400008e02000010010000,port:0,engine:sdl
//! hat:0,pad:0,direction:up,guid:...,port:0,engine:sdl
//! threshold:0.5,axis:2,guid:...,port:0,engine:sdl
//! ```
//!
//! Every function here is pure: the same identity always renders the same
//! string.

use tracing::debug;

use crate::config::Options;
use crate::ini::IniDocument;
use crate::input::{ControllerIdentity, InputKind};

const CONTROLS: &str = "Controls";

/// GUID prefix of Xbox-family pads on the Xbox driver
pub const XBOX_GUID_PREFIX: &str = "060000005e04";

/// Button ids the emulator's own SDL assigns to Xbox pads, superseding the
/// ids the frontend reports.
const XBOX_BUTTON_REMAP: &[(&str, u32)] = &[
    ("a", 0),
    ("b", 1),
    ("x", 2),
    ("y", 3),
    ("pageup", 4),
    ("pagedown", 5),
    ("select", 6),
    ("start", 7),
    ("hotkey", 8),
    ("l3", 9),
    ("r3", 10),
];

/// Emulator button key -> frontend logical input
pub const BUTTON_KEYS: &[(&str, &str)] = &[
    ("button_a", "a"),
    ("button_b", "b"),
    ("button_x", "x"),
    ("button_y", "y"),
    ("button_dup", "up"),
    ("button_ddown", "down"),
    ("button_dleft", "left"),
    ("button_dright", "right"),
    ("button_l", "pageup"),
    ("button_r", "pagedown"),
    ("button_plus", "start"),
    ("button_minus", "select"),
    ("button_slleft", "pageup"),
    ("button_srleft", "pagedown"),
    ("button_slright", "pageup"),
    ("button_srright", "pagedown"),
    ("button_zl", "l2"),
    ("button_zr", "r2"),
    ("button_lstick", "l3"),
    ("button_rstick", "r3"),
    ("button_home", "hotkey"),
];

/// Analog sticks and the frontend joystick they read
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stick {
    Left,
    Right,
}

impl Stick {
    pub const ALL: [Stick; 2] = [Stick::Left, Stick::Right];

    pub fn key(self) -> &'static str {
        match self {
            Stick::Left => "lstick",
            Stick::Right => "rstick",
        }
    }

    fn joystick(self) -> &'static str {
        match self {
            Stick::Left => "joystick1",
            Stick::Right => "joystick2",
        }
    }
}

/// Xbox-family pad, by GUID prefix or by name
pub fn is_xbox_controller(guid: &str, name: &str) -> bool {
    guid.starts_with(XBOX_GUID_PREFIX) || name.to_lowercase().contains("xbox")
}

fn xbox_button(key: &str) -> Option<u32> {
    XBOX_BUTTON_REMAP
        .iter()
        .find(|(k, _)| *k == key)
        .map(|(_, id)| *id)
}

fn device_suffix(identity: &ControllerIdentity) -> String {
    format!("guid:{},port:{},engine:sdl", identity.guid, identity.port)
}

/// Directive for one logical input; empty when the pad lacks it.
pub fn button_directive(key: &str, identity: &ControllerIdentity) -> String {
    let Some(input) = identity.inputs.get(key) else {
        return String::new();
    };
    let suffix = device_suffix(identity);

    match input.kind {
        InputKind::Button => {
            let id = if is_xbox_controller(identity.guid.as_str(), &identity.name) {
                xbox_button(key).map(|id| {
                    debug!("Xbox remap {}: {} -> {}", key, input.id, id);
                    id.to_string()
                })
            } else {
                None
            };
            format!("button:{},{}", id.as_deref().unwrap_or(&input.id), suffix)
        }
        InputKind::Hat => format!("hat:0,pad:0,direction:{},{}", key, suffix),
        InputKind::Axis => format!("threshold:0.5,axis:{},{}", input.id, suffix),
    }
}

/// Two-axis stick directive; unresolved axes default to `0`.
pub fn stick_directive(stick: Stick, identity: &ControllerIdentity) -> String {
    let axis = |direction: &str| -> String {
        identity
            .inputs
            .get(&format!("{}{}", stick.joystick(), direction))
            .map(|input| input.id.clone())
            .unwrap_or_else(|| "0".to_string())
    };
    format!(
        "range:1.000000,deadzone:0.100000,invert_y:+,invert_x:+,offset_y:-0.000000,axis_y:{},offset_x:-0.000000,axis_x:{},{}",
        axis("up"),
        axis("left"),
        device_suffix(identity)
    )
}

pub fn motion_directive(identity: &ControllerIdentity) -> String {
    format!("guid:{},port:{},motion:0,engine:sdl", identity.guid, identity.port)
}

fn quoted(directive: &str) -> String {
    format!("\"{}\"", directive)
}

/// Write every `player_<n>_*` key of one controller.
pub fn write_player(doc: &mut IniDocument, identity: &ControllerIdentity, options: &Options) {
    let player = format!("player_{}", identity.player);
    let mut set = |key: &str, value: String| doc.set(CONTROLS, &format!("{}_{}", player, key), value);

    set("type\\default", "false".into());
    set(
        "type",
        options.get_or(&format!("p{}_pad", identity.player), "0").to_string(),
    );

    for &(key, logical) in BUTTON_KEYS {
        set(key, quoted(&button_directive(logical, identity)));
    }
    for stick in Stick::ALL {
        set(stick.key(), quoted(&stick_directive(stick, identity)));
    }

    let motion = quoted(&motion_directive(identity));
    set("button_screenshot\\default", "false".into());
    set("button_screenshot", "[empty]".into());
    set("motionleft\\default", "false".into());
    set("motionleft", motion.clone());
    set("motionright\\default", "false".into());
    set("motionright", motion);
    set("connected", "true".into());
    set("connected\\default", "false".into());
    set("vibration_enabled", "true".into());
    set("vibration_enabled\\default", "false".into());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::{CapabilityMap, Guid, IdentitySource, InputElement};
    use proptest::prelude::*;

    fn identity(guid: &str, name: &str, port: usize) -> ControllerIdentity {
        let mut inputs = CapabilityMap::new();
        inputs.insert("a".into(), InputElement::button("1"));
        inputs.insert("x".into(), InputElement::button("3"));
        inputs.insert("l2".into(), InputElement::axis("2"));
        inputs.insert("up".into(), InputElement::hat("0", "1"));
        inputs.insert("joystick1left".into(), InputElement::axis("0"));
        inputs.insert("joystick1up".into(), InputElement::axis("1"));
        ControllerIdentity {
            player: 0,
            player_number: 1,
            device_path: "/dev/input/event3".into(),
            name: name.into(),
            guid: Guid::new(guid),
            inputs,
            port,
            source: IdentitySource::Frontend,
        }
    }

    #[test]
    fn test_button_passes_physical_id_through() {
        let id = identity("03000000c82d00000660000011010000", "8BitDo Pro 2", 0);
        assert_eq!(
            button_directive("a", &id),
            "button:1,guid:03000000c82d00000660000011010000,port:0,engine:sdl"
        );
    }

    #[test]
    fn test_xbox_remap_by_guid_prefix() {
        let id = identity("060000005e040000e002000000000000", "Controller", 1);
        assert_eq!(
            button_directive("x", &id),
            "button:2,guid:060000005e040000e002000000000000,port:1,engine:sdl"
        );
    }

    #[test]
    fn test_xbox_remap_by_name() {
        let id = identity("030000005e040000", "XBOX Wireless Controller", 0);
        assert!(button_directive("a", &id).starts_with("button:0,"));
    }

    #[test]
    fn test_hat_uses_logical_direction() {
        let id = identity("0300", "Pad", 0);
        assert_eq!(
            button_directive("up", &id),
            "hat:0,pad:0,direction:up,guid:0300,port:0,engine:sdl"
        );
    }

    #[test]
    fn test_axis_as_button() {
        let id = identity("0300", "Pad", 0);
        assert_eq!(
            button_directive("l2", &id),
            "threshold:0.5,axis:2,guid:0300,port:0,engine:sdl"
        );
    }

    #[test]
    fn test_missing_input_is_unbound() {
        let id = identity("0300", "Pad", 0);
        assert_eq!(button_directive("hotkey", &id), "");
    }

    #[test]
    fn test_stick_directives() {
        let id = identity("0300", "Pad", 2);
        assert_eq!(
            stick_directive(Stick::Left, &id),
            "range:1.000000,deadzone:0.100000,invert_y:+,invert_x:+,offset_y:-0.000000,axis_y:1,offset_x:-0.000000,axis_x:0,guid:0300,port:2,engine:sdl"
        );
        assert!(stick_directive(Stick::Right, &id).contains("axis_y:0,offset_x:-0.000000,axis_x:0,"));
    }

    #[test]
    fn test_inverted_axis_keeps_its_index() {
        let pad = crate::input::capability::parse_mapping(
            "g,n,rightx:a3,righty:a4~,lefttrigger:+a2",
            Guid::new("0300"),
        );
        let mut id = identity("0300", "Pad", 0);
        id.inputs = pad.inputs;

        let right = stick_directive(Stick::Right, &id);
        assert!(right.contains("axis_y:4,offset_x:-0.000000,axis_x:3,"));
        assert_eq!(
            button_directive("l2", &id),
            "threshold:0.5,axis:2,guid:0300,port:0,engine:sdl"
        );
    }

    #[test]
    fn test_motion_directive() {
        let id = identity("0300", "Pad", 1);
        assert_eq!(motion_directive(&id), "guid:0300,port:1,motion:0,engine:sdl");
    }

    #[test]
    fn test_write_player_keys() {
        let id = identity("0300", "Pad", 0);
        let mut options = Options::new();
        options.insert("p0_pad", "1");
        let mut doc = IniDocument::new();

        write_player(&mut doc, &id, &options);

        assert_eq!(doc.get(CONTROLS, "player_0_type"), Some("1"));
        assert_eq!(
            doc.get(CONTROLS, "player_0_button_a"),
            Some("\"button:1,guid:0300,port:0,engine:sdl\"")
        );
        assert_eq!(doc.get(CONTROLS, "player_0_button_home"), Some("\"\""));
        assert_eq!(doc.get(CONTROLS, "player_0_button_screenshot"), Some("[empty]"));
        assert_eq!(doc.get(CONTROLS, "player_0_connected\\default"), Some("false"));
        // 2 type + 21 buttons + 2 sticks + 10 fixed
        assert_eq!(doc.entries(CONTROLS).len(), 35);
    }

    proptest! {
        #[test]
        fn prop_non_xbox_ids_pass_through(id in 0u32..64, guid in "03[0-9a-f]{30}") {
            let mut pad = identity(&guid, "Generic Pad", 0);
            pad.inputs.insert("a".into(), InputElement::button(id.to_string()));
            let directive = button_directive("a", &pad);
            let expected = format!("button:{},", id);
            prop_assert!(directive.starts_with(&expected));
        }

        #[test]
        fn prop_directives_are_idempotent(port in 0usize..4) {
            let pad = identity("060000005e04", "Pad", port);
            prop_assert_eq!(button_directive("b", &pad), button_directive("b", &pad));
            prop_assert_eq!(stick_directive(Stick::Left, &pad), stick_directive(Stick::Left, &pad));
        }
    }
}
