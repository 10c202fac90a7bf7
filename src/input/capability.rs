//! Capability maps and the platform mapping-string grammar
//!
//! The game-controller service describes every recognised pad with a
//! comma-separated mapping string:
//!
//! ```text
//! 030000005e0400008e02000010010000,Xbox 360 Controller,a:b0,b:b1,dpup:h0.1,leftx:a0,platform:Linux,
//! ```
//!
//! The first two fields (GUID and name) are ignored here, the canonical GUID
//! comes from the enumerator. Every other field is either `platform:<tag>` or
//! `<logical>:<element>`, where the element is `b<id>` (button), `a<id>`
//! (axis) or `h<hat>.<mask>` (hat). Logical names are translated into the
//! frontend vocabulary (`pageup`, `joystick1left`, ...) before insertion.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use tracing::debug;

use super::guid::Guid;

/// Per-controller table from frontend logical input name to physical element.
///
/// Ordered so that every consumer iterates it deterministically.
pub type CapabilityMap = BTreeMap<String, InputElement>;

/// Platform logical name -> frontend logical name.
///
/// Face buttons are swapped on purpose: the frontend names buttons by their
/// Nintendo-layout position while the platform uses Xbox labels.
const PLATFORM_TO_FRONTEND: &[(&str, &str)] = &[
    ("a", "b"),
    ("b", "a"),
    ("y", "x"),
    ("x", "y"),
    ("lefttrigger", "l2"),
    ("righttrigger", "r2"),
    ("leftstick", "l3"),
    ("rightstick", "r3"),
    ("leftshoulder", "pageup"),
    ("rightshoulder", "pagedown"),
    ("start", "start"),
    ("back", "select"),
    ("dpup", "up"),
    ("dpdown", "down"),
    ("dpleft", "left"),
    ("dpright", "right"),
    ("lefty", "joystick1up"),
    ("leftx", "joystick1left"),
    ("righty", "joystick2up"),
    ("rightx", "joystick2left"),
    ("guide", "hotkey"),
];

/// Translate a platform logical name into the frontend vocabulary.
///
/// Names without a table entry pass through unchanged.
pub fn frontend_name(platform: &str) -> &str {
    PLATFORM_TO_FRONTEND
        .iter()
        .find(|(p, _)| *p == platform)
        .map(|(_, f)| *f)
        .unwrap_or(platform)
}

/// Reverse of [`frontend_name`], used when rendering mapping strings back.
pub fn platform_name(frontend: &str) -> &str {
    PLATFORM_TO_FRONTEND
        .iter()
        .find(|(_, f)| *f == frontend)
        .map(|(p, _)| *p)
        .unwrap_or(frontend)
}

/// Kind of physical element backing a logical input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputKind {
    Button,
    Axis,
    Hat,
}

impl fmt::Display for InputKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputKind::Button => write!(f, "button"),
            InputKind::Axis => write!(f, "axis"),
            InputKind::Hat => write!(f, "hat"),
        }
    }
}

/// Direction encoded by a hat bitmask
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HatDirection {
    Up,
    Down,
    Left,
    Right,
    Unknown,
}

impl HatDirection {
    /// Decode a hat bitmask. Only the four single-bit values are directions,
    /// diagonals and garbage decode to `Unknown`.
    pub fn from_mask(mask: i64) -> Self {
        match mask {
            1 => HatDirection::Up,
            2 => HatDirection::Right,
            4 => HatDirection::Down,
            8 => HatDirection::Left,
            _ => HatDirection::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            HatDirection::Up => "up",
            HatDirection::Down => "down",
            HatDirection::Left => "left",
            HatDirection::Right => "right",
            HatDirection::Unknown => "unknown",
        }
    }
}

impl fmt::Display for HatDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Part of an axis range an element reads (`+a2`, `-a2`, `a2`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AxisRange {
    #[default]
    Full,
    Positive,
    Negative,
}

impl AxisRange {
    pub fn is_full(&self) -> bool {
        *self == AxisRange::Full
    }

    fn prefix(&self) -> &'static str {
        match self {
            AxisRange::Full => "",
            AxisRange::Positive => "+",
            AxisRange::Negative => "-",
        }
    }
}

/// One physical element of a controller
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputElement {
    #[serde(rename = "type")]
    pub kind: InputKind,
    /// Button or axis index; for hats the direction mask
    pub id: String,
    /// Hat index, hats only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hat: Option<String>,
    /// Half-axis modifier, axes only
    #[serde(default, skip_serializing_if = "AxisRange::is_full")]
    pub range: AxisRange,
    /// Axis direction inverted (`a4~`)
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub inverted: bool,
}

impl InputElement {
    pub fn button(id: impl Into<String>) -> Self {
        Self::new(InputKind::Button, id.into(), None)
    }

    pub fn axis(id: impl Into<String>) -> Self {
        Self::new(InputKind::Axis, id.into(), None)
    }

    pub fn hat(hat: impl Into<String>, mask: impl Into<String>) -> Self {
        Self::new(InputKind::Hat, mask.into(), Some(hat.into()))
    }

    fn new(kind: InputKind, id: String, hat: Option<String>) -> Self {
        Self { kind, id, hat, range: AxisRange::Full, inverted: false }
    }

    pub fn with_range(mut self, range: AxisRange) -> Self {
        self.range = range;
        self
    }

    pub fn inverted(mut self) -> Self {
        self.inverted = true;
        self
    }

    /// Decoded hat direction; `Unknown` for non-hats and unparsable masks
    pub fn hat_direction(&self) -> HatDirection {
        if self.kind != InputKind::Hat {
            return HatDirection::Unknown;
        }
        self.id
            .parse::<i64>()
            .map(HatDirection::from_mask)
            .unwrap_or(HatDirection::Unknown)
    }

    /// Parse a single element spec (`b3`, `a1`, `+a2`, `a4~`, `h0.4`).
    ///
    /// Axis modifiers are kept as flags; `id` stays the bare index.
    /// Returns `None` for anything outside the grammar.
    pub fn parse(spec: &str) -> Option<Self> {
        let (range, spec) = if let Some(rest) = spec.strip_prefix('+') {
            (AxisRange::Positive, rest)
        } else if let Some(rest) = spec.strip_prefix('-') {
            (AxisRange::Negative, rest)
        } else {
            (AxisRange::Full, spec)
        };

        let mut chars = spec.chars();
        let discriminator = chars.next()?;
        let rest = chars.as_str();

        match discriminator {
            'a' => {
                let (index, inverted) = match rest.strip_suffix('~') {
                    Some(index) => (index, true),
                    None => (rest, false),
                };
                if !is_index(index) {
                    return None;
                }
                let axis = Self::axis(index).with_range(range);
                Some(if inverted { axis.inverted() } else { axis })
            }
            _ if !range.is_full() => None,
            'b' if is_index(rest) => Some(Self::button(rest)),
            'h' => {
                let (hat, mask) = rest.split_once('.')?;
                if is_index(hat) && is_index(mask) {
                    Some(Self::hat(hat, mask))
                } else {
                    None
                }
            }
            _ => None,
        }
    }

    /// Render back into the mapping-string grammar
    pub fn to_spec(&self) -> String {
        match self.kind {
            InputKind::Button => format!("b{}", self.id),
            InputKind::Axis => format!(
                "{}a{}{}",
                self.range.prefix(),
                self.id,
                if self.inverted { "~" } else { "" }
            ),
            InputKind::Hat => format!("h{}.{}", self.hat.as_deref().unwrap_or("0"), self.id),
        }
    }
}

fn is_index(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

/// A recognised gamepad as reported by the game-controller service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformGamepad {
    /// Device node reported by the service (`/dev/hidraw3`, `/dev/input/event7`)
    pub path: String,
    pub guid: Guid,
    /// `platform:` tag of the mapping string, empty when absent
    pub platform: String,
    pub inputs: CapabilityMap,
}

impl PlatformGamepad {
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }
}

/// Parse a mapping string into a gamepad record.
///
/// Pure; malformed fields are skipped one by one and never fail the parse.
pub fn parse_mapping(mapping: &str, guid: Guid) -> PlatformGamepad {
    let mut gamepad = PlatformGamepad {
        path: String::new(),
        guid,
        platform: String::new(),
        inputs: CapabilityMap::new(),
    };

    for field in mapping.split(',').skip(2) {
        let field = field.trim();
        if field.is_empty() {
            continue;
        }

        if let Some(platform) = field.strip_prefix("platform:") {
            gamepad.platform = platform.to_string();
            continue;
        }

        let Some((logical, spec)) = field.split_once(':') else {
            debug!("Skipping mapping field without element: {:?}", field);
            continue;
        };
        if logical.is_empty() {
            debug!("Skipping mapping field without name: {:?}", field);
            continue;
        }

        match InputElement::parse(spec) {
            Some(element) => {
                gamepad.inputs.insert(frontend_name(logical).to_string(), element);
            }
            None => debug!("Skipping unsupported element {:?} for {}", spec, logical),
        }
    }

    gamepad
}

/// Render a capability map as a mapping string the game-controller service
/// accepts (`SDL_GAMECONTROLLERCONFIG` line).
pub fn render_sdl_mapping(guid: &Guid, name: &str, inputs: &CapabilityMap) -> String {
    let mut fields: Vec<String> = inputs
        .iter()
        .map(|(logical, element)| format!("{}:{}", platform_name(logical), element.to_spec()))
        .collect();
    fields.sort();

    let name = name.replace(',', " ");
    let mut line = format!("{},{},", guid, name);
    for field in fields {
        line.push_str(&field);
        line.push(',');
    }
    line.push_str("platform:Linux,");
    line
}
