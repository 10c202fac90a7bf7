//! Identity correlation across enumeration domains
//!
//! For each frontend controller, in player order:
//! 1. event node -> hidraw node (topology) -> platform pad: adopt GUID and map
//! 2. event node itself enumerated by the platform: adopt the map only
//! 3. otherwise keep the frontend data
//!
//! A miss is a normal outcome and never drops a controller.

use std::collections::BTreeMap;
use tracing::debug;

use super::capability::PlatformGamepad;
use super::controller::{ControllerIdentity, FrontendController, IdentitySource};
use super::topology::Topology;

/// Fuse frontend, topology and platform data into one identity per controller
pub fn correlate(
    controllers: &[FrontendController],
    topology: &Topology,
    platform: &BTreeMap<String, PlatformGamepad>,
) -> Vec<ControllerIdentity> {
    controllers
        .iter()
        .enumerate()
        .map(|(player, controller)| resolve(player, controller, topology, platform))
        .collect()
}

fn resolve(
    player: usize,
    controller: &FrontendController,
    topology: &Topology,
    platform: &BTreeMap<String, PlatformGamepad>,
) -> ControllerIdentity {
    let mut identity = ControllerIdentity::from_frontend(player, controller);

    let via_hidraw = topology
        .hidraw_for(&controller.device_path)
        .and_then(|hidraw| platform.get(hidraw));

    if let Some(pad) = via_hidraw {
        debug!(
            "Player {}: {} matched platform pad {} (guid {} -> {})",
            player, controller.device_path, pad.path, controller.guid, pad.guid
        );
        identity.guid = pad.guid.clone();
        identity.inputs = pad.inputs.clone();
        identity.source = IdentitySource::Platform;
    } else if let Some(pad) = platform.get(&controller.device_path) {
        // Platform mappings differ from the frontend's for some vendor pads
        // (Xbox family), keep the frontend GUID but take the richer map.
        debug!("Player {}: {} enumerated directly, adopting mapping", player, controller.device_path);
        identity.inputs = pad.inputs.clone();
        identity.source = IdentitySource::PlatformMapping;
    } else {
        debug!("Player {}: no platform match for {}, using frontend data", player, controller.device_path);
    }

    identity
}
