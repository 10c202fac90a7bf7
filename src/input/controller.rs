//! Frontend controllers and resolved controller identities

use serde::{Deserialize, Serialize};

use super::capability::{render_sdl_mapping, CapabilityMap};
use super::guid::Guid;

/// A controller as handed over by the frontend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrontendController {
    /// Frontend device index
    #[serde(default)]
    pub index: u32,
    /// 1-based player number
    pub player_number: u32,
    /// Event-input node the frontend reads (`/dev/input/event5`)
    pub device_path: String,
    /// Configuration name (frontend's own label)
    #[serde(default)]
    pub name: String,
    /// Name reported by the device
    #[serde(default)]
    pub real_name: String,
    pub guid: Guid,
    #[serde(default)]
    pub inputs: CapabilityMap,
}

impl FrontendController {
    /// Best human-readable name of the device
    pub fn display_name(&self) -> &str {
        if self.real_name.is_empty() {
            &self.name
        } else {
            &self.real_name
        }
    }
}

/// Sort a frontend list into ascending player order (stable).
pub fn in_player_order(mut controllers: Vec<FrontendController>) -> Vec<FrontendController> {
    controllers.sort_by_key(|c| c.player_number);
    controllers
}

/// `SDL_GAMECONTROLLERCONFIG` value describing every frontend controller,
/// one mapping line per controller.
pub fn game_controller_config(controllers: &[FrontendController]) -> String {
    controllers
        .iter()
        .map(|c| render_sdl_mapping(&c.guid, c.display_name(), &c.inputs))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Where the GUID and capability map of an identity came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IdentitySource {
    /// Raw-HID node matched in the platform enumeration: GUID and map adopted
    Platform,
    /// Device path matched directly: only the map adopted
    PlatformMapping,
    /// No match, frontend data kept
    Frontend,
}

/// Authoritative per-launch identity of one player's controller
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ControllerIdentity {
    /// 0-based position in player order
    pub player: usize,
    pub player_number: u32,
    pub device_path: String,
    pub name: String,
    pub guid: Guid,
    pub inputs: CapabilityMap,
    /// Backend port among controllers sharing `guid`; 0 until allocated
    pub port: usize,
    pub source: IdentitySource,
}

impl ControllerIdentity {
    /// Identity carrying the frontend's own data
    pub fn from_frontend(player: usize, controller: &FrontendController) -> Self {
        Self {
            player,
            player_number: controller.player_number,
            device_path: controller.device_path.clone(),
            name: controller.display_name().to_string(),
            guid: controller.guid.clone(),
            inputs: controller.inputs.clone(),
            port: 0,
            source: IdentitySource::Frontend,
        }
    }
}
