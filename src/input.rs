//! Controller discovery and identity reconciliation
//!
//! A physical pad is seen three ways: as an event-input node (what the
//! frontend reads), as a raw-HID node (kernel topology) and as a slot of the
//! platform game-controller service. This module joins them into one
//! [`ControllerIdentity`] per player and assigns per-GUID ports.

pub mod capability;
pub mod controller;
pub mod correlate;
pub mod diagnostics;
pub mod enumerate;
pub mod error;
pub mod guid;
pub mod ports;
#[cfg(feature = "sdl")]
pub mod sdl;
pub mod topology;

pub use capability::{AxisRange, CapabilityMap, InputElement, InputKind, PlatformGamepad};
pub use controller::{ControllerIdentity, FrontendController, IdentitySource};
pub use enumerate::{ApiVersion, ControllerEnumerator, EnumerationConfig};
pub use error::{EnumerationError, TopologyError};
pub use guid::Guid;
pub use ports::{PortAllocator, PortOrderError};
pub use topology::{SysfsScanner, Topology};

use std::collections::BTreeMap;
use tracing::info;

/// Everything the generators need to know about the attached pads
#[derive(Debug, Clone, Default)]
pub struct Discovery {
    pub topology: Topology,
    pub platform: BTreeMap<String, PlatformGamepad>,
}

/// Scan the device tree and the platform service once.
///
/// Never fails: an unreadable tree or an unavailable service yields empty
/// tables and every controller takes the frontend fallback path.
pub fn discover(
    scanner: &SysfsScanner,
    enumerator: &dyn ControllerEnumerator,
    config: &EnumerationConfig,
) -> Discovery {
    let devices = scanner.scan_hid_devices();
    let topology = scanner.scan_topology();
    diagnostics::log_hid_devices(&diagnostics::hid_report(&devices, &topology));

    let platform = enumerate::enumerate(enumerator, config, scanner);
    diagnostics::log_platform_pads(&platform);

    Discovery { topology, platform }
}

/// Resolve the frontend controllers into port-annotated identities.
///
/// Controllers are put in ascending player order first, which is what the
/// port allocator requires.
pub fn resolve_identities(
    controllers: &[FrontendController],
    discovery: &Discovery,
) -> Result<Vec<ControllerIdentity>, PortOrderError> {
    let ordered = controller::in_player_order(controllers.to_vec());
    let identities = correlate::correlate(&ordered, &discovery.topology, &discovery.platform);
    let identities = PortAllocator::allocate(identities)?;

    for identity in &identities {
        info!(
            "Player {} ({}): guid={} port={} source={:?}",
            identity.player, identity.name, identity.guid, identity.port, identity.source
        );
    }
    Ok(identities)
}
