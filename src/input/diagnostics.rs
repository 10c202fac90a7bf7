//! Pad detection report
//!
//! Logged at the start of every launch and printed by `--list-pads`, so a
//! user can match what the kernel sees with what the emulator gets.

use std::collections::BTreeMap;
use tracing::info;

use super::capability::PlatformGamepad;
use super::topology::{RawHidDevice, Topology};

/// Placeholder shown for a raw-HID node without an event-input child
pub const NO_EVDEV: &str = "no evdev";

/// One raw-HID device with its event-input counterpart
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HidReport {
    pub name: String,
    pub hidraw: String,
    pub evdev: String,
    pub bus: String,
    pub guid: String,
}

/// Pair every raw-HID device with its event node.
pub fn hid_report(devices: &[RawHidDevice], topology: &Topology) -> Vec<HidReport> {
    devices
        .iter()
        .map(|device| HidReport {
            name: device.name.clone(),
            hidraw: device.node.clone(),
            evdev: topology.event_for(&device.node).unwrap_or(NO_EVDEV).to_string(),
            bus: device.bus.clone(),
            guid: device.guid.to_string(),
        })
        .collect()
}

/// Log the raw-HID devices found at scan time
pub fn log_hid_devices(report: &[HidReport]) {
    if report.is_empty() {
        info!("[HID] no raw-HID devices found");
        return;
    }
    for entry in report {
        info!("[HID] {}", entry.name);
        info!("  hidraw = {}", entry.hidraw);
        info!("  evdev  = {}", entry.evdev);
        info!("  guid   = {}", entry.guid);
    }
}

/// Log the platform enumeration result
pub fn log_platform_pads(pads: &BTreeMap<String, PlatformGamepad>) {
    info!("[SDL] {} game controller(s)", pads.len());
    for pad in pads.values() {
        info!("  {} guid={} inputs={}", pad.path, pad.guid, pad.inputs.len());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::guid::Guid;
    use std::path::PathBuf;

    fn device(node: &str) -> RawHidDevice {
        RawHidDevice {
            node: node.to_string(),
            sysfs_path: PathBuf::from("/sys/devices/x"),
            name: "Pad".to_string(),
            bus: "0003".to_string(),
            guid: Guid::from_vendor_product("045e", "028e"),
        }
    }

    #[test]
    fn test_report_marks_missing_evdev() {
        let mut topology = Topology::default();
        topology.link("/dev/hidraw0", "/dev/input/event3");

        let report = hid_report(&[device("/dev/hidraw0"), device("/dev/hidraw1")], &topology);

        assert_eq!(report[0].evdev, "/dev/input/event3");
        assert_eq!(report[1].evdev, NO_EVDEV);
        assert_eq!(report[0].guid, "045e028e000000000000000000000000");
    }
}
