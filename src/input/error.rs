//! Error types for controller discovery
//!
//! None of these abort a launch: callers log them and fall back to the
//! frontend's own controller data.

use std::path::PathBuf;
use thiserror::Error;

/// Failures while walking the kernel device tree
#[derive(Debug, Error)]
pub enum TopologyError {
    /// The raw-HID node has no sysfs entry
    #[error("device {0} not found in sysfs")]
    NotFound(String),

    /// A sysfs path could not be read or resolved
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The sysfs device directory name does not carry a bus prefix
    #[error("unexpected sysfs device name: {0}")]
    Malformed(String),
}

/// Failures of the platform game-controller service
#[derive(Debug, Error)]
pub enum EnumerationError {
    /// The controller subsystem could not be initialised
    #[error("controller subsystem init failed: {0}")]
    Init(String),

    /// A single joystick slot could not be opened or read
    #[error("joystick slot {index}: {reason}")]
    Slot { index: u32, reason: String },

    /// This build has no enumeration backend
    #[error("platform enumeration not available in this build")]
    Unavailable,
}
