//! Switch emulator config generation for handheld appliances
//!
//! Reconciles the frontend's controller list with the kernel device tree and
//! the platform game-controller service, then writes emulator configs
//! (Eden/Citron INI, Ryujinx JSON) that address every pad by a stable
//! GUID and port.

pub mod cli;
pub mod config;
pub mod generators;
pub mod host;
pub mod ini;
pub mod input;
pub mod paths;
