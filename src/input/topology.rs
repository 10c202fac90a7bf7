//! Kernel device topology scanner
//!
//! Walks `/sys/class/hidraw` to relate every raw-HID node to the event-input
//! node the frontend reads from, and derives a fallback identity from the USB
//! `idVendor`/`idProduct` attributes.
//!
//! ```text
//! /sys/class/hidraw/hidraw3/device -> ../../../0003:045E:028E.0007
//!                                      └── input/input21/event17
//! ```
//!
//! Every read is best effort: a missing attribute degrades to a placeholder,
//! it never aborts the scan.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use super::error::TopologyError;
use super::guid::Guid;

const HIDRAW_CLASS: &str = "sys/class/hidraw";
const HIDRAW_PREFIX: &str = "hidraw";
const EVENT_PREFIX: &str = "event";

/// A raw-HID device found at scan time
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawHidDevice {
    /// Device node (`/dev/hidraw3`)
    pub node: String,
    /// Canonical sysfs device directory
    pub sysfs_path: PathBuf,
    /// `HID_NAME` from uevent, `unknown` when unreadable
    pub name: String,
    /// Bus prefix of the sysfs device name (`0003` USB, `0005` Bluetooth)
    pub bus: String,
    /// Vendor/product pseudo-GUID
    pub guid: Guid,
}

/// Links between raw-HID nodes and event-input nodes
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Topology {
    /// hidraw node -> first event node below it
    pub hid_to_event: BTreeMap<String, String>,
    /// event node -> owning hidraw node
    pub event_to_hid: BTreeMap<String, String>,
}

impl Topology {
    pub fn event_for(&self, hidraw: &str) -> Option<&str> {
        self.hid_to_event.get(hidraw).map(String::as_str)
    }

    pub fn hidraw_for(&self, event: &str) -> Option<&str> {
        self.event_to_hid.get(event).map(String::as_str)
    }

    /// Register a link; the first link of a node wins.
    pub fn link(&mut self, hidraw: &str, event: &str) {
        self.hid_to_event
            .entry(hidraw.to_string())
            .or_insert_with(|| event.to_string());
        self.event_to_hid
            .entry(event.to_string())
            .or_insert_with(|| hidraw.to_string());
    }
}

/// Read-only view of the kernel device filesystem
#[derive(Debug, Clone)]
pub struct SysfsScanner {
    root: PathBuf,
}

impl Default for SysfsScanner {
    fn default() -> Self {
        Self::new("/")
    }
}

impl SysfsScanner {
    /// Create a scanner rooted at `root` (`/` on a live system)
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn class_dir(&self) -> PathBuf {
        self.root.join(HIDRAW_CLASS)
    }

    /// Names of all hidraw class entries, sorted
    fn hidraw_names(&self) -> Vec<String> {
        let dir = self.class_dir();
        let entries = match fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(e) => {
                debug!("No hidraw class at {}: {}", dir.display(), e);
                return Vec::new();
            }
        };

        let mut names: Vec<String> = entries
            .flatten()
            .map(|e| e.file_name().to_string_lossy().into_owned())
            .filter(|n| n.starts_with(HIDRAW_PREFIX))
            .collect();
        names.sort();
        names
    }

    /// Upper bound of every parent walk: the canonical root
    fn device_root(&self) -> PathBuf {
        fs::canonicalize(&self.root).unwrap_or_else(|_| self.root.clone())
    }

    /// Canonical sysfs device directory of a hidraw class entry
    fn device_dir(&self, hidraw: &str) -> Result<PathBuf, TopologyError> {
        let link = self.class_dir().join(hidraw).join("device");
        if !link.exists() {
            return Err(TopologyError::NotFound(hidraw.to_string()));
        }
        fs::canonicalize(&link).map_err(|source| TopologyError::Io { path: link, source })
    }

    /// Enumerate every raw-HID device
    pub fn scan_hid_devices(&self) -> Vec<RawHidDevice> {
        let mut devices = Vec::new();

        for hidraw in self.hidraw_names() {
            let sysfs_path = match self.device_dir(&hidraw) {
                Ok(p) => p,
                Err(e) => {
                    warn!("Skipping {}: {}", hidraw, e);
                    continue;
                }
            };

            let name = read_hid_name(&sysfs_path).unwrap_or_else(|| "unknown".to_string());
            let bus = base_name(&sysfs_path)
                .split(':')
                .next()
                .unwrap_or_default()
                .to_string();
            let guid = hidraw_guid(&sysfs_path, &self.device_root());

            devices.push(RawHidDevice {
                node: format!("/dev/{}", hidraw),
                sysfs_path,
                name,
                bus,
                guid,
            });
        }

        devices
    }

    /// Build the hidraw <-> event-input link tables
    pub fn scan_topology(&self) -> Topology {
        let mut topology = Topology::default();

        for hidraw in self.hidraw_names() {
            let device_dir = match self.device_dir(&hidraw) {
                Ok(p) => p,
                Err(e) => {
                    warn!("Skipping {}: {}", hidraw, e);
                    continue;
                }
            };

            let hid_node = format!("/dev/{}", hidraw);
            let mut events = Vec::new();
            collect_event_dirs(&device_dir, &mut events);

            if events.is_empty() {
                debug!("{} has no event-input device", hid_node);
            }
            for event in events {
                topology.link(&hid_node, &format!("/dev/input/{}", event));
            }
        }

        topology
    }

    /// Bus-type tag of a raw-HID node: the sysfs device name prefix before
    /// the first colon, minus its two leading digits (`0005:...` -> `05`).
    pub fn bus_type_of(&self, hidraw_node: &str) -> Result<String, TopologyError> {
        let hidraw = Path::new(hidraw_node)
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| TopologyError::NotFound(hidraw_node.to_string()))?;

        let device_dir = self.device_dir(&hidraw)?;
        let dir_name = base_name(&device_dir);
        let prefix = dir_name.split(':').next().unwrap_or_default();

        prefix
            .get(2..)
            .filter(|tag| !tag.is_empty())
            .map(str::to_string)
            .ok_or(TopologyError::Malformed(dir_name))
    }
}

fn base_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn read_hid_name(device_dir: &Path) -> Option<String> {
    let uevent = fs::read_to_string(device_dir.join("uevent")).ok()?;
    uevent
        .lines()
        .find_map(|line| line.strip_prefix("HID_NAME="))
        .map(|name| name.trim().to_string())
}

/// Depth-first search for `event*` directories, children visited in name
/// order. Symlinks are not followed (sysfs links point back up the tree).
fn collect_event_dirs(dir: &Path, out: &mut Vec<String>) {
    let Ok(entries) = fs::read_dir(dir) else {
        return;
    };

    let mut children: Vec<(String, PathBuf)> = entries
        .flatten()
        .filter(|e| e.file_type().map(|t| t.is_dir()).unwrap_or(false))
        .map(|e| (e.file_name().to_string_lossy().into_owned(), e.path()))
        .collect();
    children.sort();

    for (name, path) in children {
        if name.starts_with(EVENT_PREFIX) {
            out.push(name);
        } else {
            collect_event_dirs(&path, out);
        }
    }
}

/// Pseudo-GUID of a HID device: the first `idVendor`/`idProduct` pair found
/// walking up from its sysfs directory, without leaving `root`. Falls back to
/// the all-zero GUID.
pub fn hidraw_guid(device_dir: &Path, root: &Path) -> Guid {
    match find_usb_ids(device_dir, root) {
        Ok(Some((vendor, product))) => Guid::from_vendor_product(&vendor, &product),
        Ok(None) => Guid::zeroed(),
        Err(e) => {
            warn!("Cannot derive GUID for {}: {}", device_dir.display(), e);
            Guid::zeroed()
        }
    }
}

fn find_usb_ids(device_dir: &Path, root: &Path) -> Result<Option<(String, String)>, TopologyError> {
    let mut current = Some(device_dir);

    while let Some(dir) = current.filter(|d| d.starts_with(root) && *d != root) {
        let vendor_path = dir.join("idVendor");
        if vendor_path.exists() {
            let product_path = dir.join("idProduct");
            let vendor = read_attr(&vendor_path)?;
            let product = read_attr(&product_path)?;
            if vendor.is_empty() || product.is_empty() {
                return Ok(None);
            }
            return Ok(Some((vendor, product)));
        }
        current = dir.parent();
    }

    Ok(None)
}

fn read_attr(path: &Path) -> Result<String, TopologyError> {
    fs::read_to_string(path)
        .map(|s| s.trim().to_string())
        .map_err(|source| TopologyError::Io { path: path.to_path_buf(), source })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::os::unix::fs::symlink;
    use tempfile::TempDir;

    /// Build `<root>/sys/devices/.../<device>` with a hidraw class link
    fn add_hid(root: &Path, hidraw: &str, parent: &str, device: &str, events: &[&str]) -> PathBuf {
        let device_dir = root.join("sys/devices").join(parent).join(device);
        fs::create_dir_all(device_dir.join("hidraw").join(hidraw)).unwrap();
        for (i, event) in events.iter().enumerate() {
            let input = device_dir.join("input").join(format!("input{}", 20 + i));
            fs::create_dir_all(input.join(event)).unwrap();
        }

        let class_dir = root.join(HIDRAW_CLASS).join(hidraw);
        fs::create_dir_all(&class_dir).unwrap();
        symlink(&device_dir, class_dir.join("device")).unwrap();
        // sysfs back-links would loop forever if followed
        symlink(root.join("sys/devices"), device_dir.join("subsystem")).unwrap();
        device_dir
    }

    fn write(path: &Path, content: &str) {
        fs::write(path, content).unwrap();
    }

    #[test]
    fn test_scan_hid_devices_reads_identity() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path();
        let usb = "pci0000:00/0000:00:14.0/usb1/1-2";
        let device = add_hid(root, "hidraw0", &format!("{}/1-2:1.0", usb), "0003:045E:028E.0001", &["event5"]);
        write(&device.join("uevent"), "DRIVER=hid-generic\nHID_NAME=Microsoft X-Box 360 pad\n");
        write(&root.join("sys/devices").join(usb).join("idVendor"), "045e\n");
        write(&root.join("sys/devices").join(usb).join("idProduct"), "028e\n");

        let scanner = SysfsScanner::new(root);
        let devices = scanner.scan_hid_devices();

        assert_eq!(devices.len(), 1);
        let dev = &devices[0];
        assert_eq!(dev.node, "/dev/hidraw0");
        assert_eq!(dev.name, "Microsoft X-Box 360 pad");
        assert_eq!(dev.bus, "0003");
        assert_eq!(dev.guid.as_str(), "045e028e000000000000000000000000");
    }

    #[test]
    fn test_missing_id_vendor_yields_zero_guid() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path();
        add_hid(root, "hidraw1", "virtual", "0005:057E:2009.0002", &["event9"]);

        let devices = SysfsScanner::new(root).scan_hid_devices();

        assert_eq!(devices.len(), 1);
        assert_eq!(devices[0].guid, Guid::zeroed());
        assert_eq!(devices[0].name, "unknown");
    }

    #[test]
    fn test_usb_id_walk_stays_inside_root() {
        let tmp = TempDir::new().unwrap();
        write(&tmp.path().join("idVendor"), "045e\n");
        write(&tmp.path().join("idProduct"), "028e\n");
        let root = tmp.path().join("appliance");
        add_hid(&root, "hidraw0", "virtual", "0003:045E:028E.0001", &["event5"]);

        let devices = SysfsScanner::new(&root).scan_hid_devices();

        assert_eq!(devices.len(), 1);
        assert_eq!(devices[0].guid, Guid::zeroed());
    }

    #[test]
    fn test_scan_topology_first_event_wins() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path();
        add_hid(root, "hidraw0", "usb1", "0003:045E:028E.0001", &["event7", "event3"]);
        add_hid(root, "hidraw1", "usb2", "0003:054C:09CC.0002", &["event11"]);
        add_hid(root, "hidraw2", "usb3", "0003:1234:5678.0003", &[]);

        let topology = SysfsScanner::new(root).scan_topology();

        // input20/event7 is visited before input21/event3
        assert_eq!(topology.event_for("/dev/hidraw0"), Some("/dev/input/event7"));
        assert_eq!(topology.event_for("/dev/hidraw1"), Some("/dev/input/event11"));
        assert_eq!(topology.event_for("/dev/hidraw2"), None);
        assert_eq!(topology.hidraw_for("/dev/input/event3"), Some("/dev/hidraw0"));
        assert_eq!(topology.hidraw_for("/dev/input/event11"), Some("/dev/hidraw1"));
    }

    #[test]
    fn test_bus_type_of() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path();
        add_hid(root, "hidraw4", "bt", "0005:057E:2009.0004", &["event2"]);
        let scanner = SysfsScanner::new(root);

        assert_eq!(scanner.bus_type_of("/dev/hidraw4").unwrap(), "05");
        assert!(matches!(
            scanner.bus_type_of("/dev/hidraw9"),
            Err(TopologyError::NotFound(_))
        ));
    }

    #[test]
    fn test_empty_tree() {
        let tmp = TempDir::new().unwrap();
        let scanner = SysfsScanner::new(tmp.path());
        assert!(scanner.scan_hid_devices().is_empty());
        assert_eq!(scanner.scan_topology(), Topology::default());
    }
}
