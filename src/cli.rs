//! `--list-pads` diagnostics printer

use colored::*;

use crate::input::diagnostics::{hid_report, HidReport, NO_EVDEV};
use crate::input::{enumerate, ControllerEnumerator, EnumerationConfig, SysfsScanner};

/// Print the raw-HID devices and the platform game controllers.
pub fn list_pads(scanner: &SysfsScanner, enumerator: &dyn ControllerEnumerator, config: &EnumerationConfig) {
    println!("\n{}", "=== HID Devices ===".bold().cyan());

    let report = hid_report(&scanner.scan_hid_devices(), &scanner.scan_topology());
    if report.is_empty() {
        println!("  {}", "No raw-HID devices found".dimmed());
    }
    for entry in &report {
        print_hid_entry(entry);
    }

    println!(
        "\n{} {}",
        "=== Game Controllers ===".bold().cyan(),
        format!("({})", enumerator.name()).dimmed()
    );
    let pads = enumerate::enumerate(enumerator, config, scanner);
    if pads.is_empty() {
        println!("  {}", "No game controllers found".dimmed());
    }
    for pad in pads.values() {
        println!("  {} {}", pad.path.bright_white(), pad.guid.to_string().yellow());
        println!("    {} input(s) mapped", pad.inputs.len());
    }
}

fn print_hid_entry(entry: &HidReport) {
    println!("\n  {}", entry.name.bold());
    println!("    hidraw = {}", entry.hidraw);
    let evdev = if entry.evdev == NO_EVDEV {
        entry.evdev.red()
    } else {
        entry.evdev.green()
    };
    println!("    evdev  = {}", evdev);
    println!("    bus    = {}", entry.bus);
    println!("    guid   = {}", entry.guid.yellow());
}
