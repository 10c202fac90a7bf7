//! Controller GUIDs
//!
//! A GUID is the 32-hex-digit identity string the game-controller service and
//! the emulators use as the join key for a pad. Frontend-supplied GUIDs are
//! kept verbatim (they may be shorter than 32 digits); helpers that need the
//! full 16 bytes pad with zeros.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Number of hex digits in a full GUID
pub const GUID_HEX_LEN: usize = 32;

/// Hex digit range zeroed to drop driver/backend noise (bytes 1..=3)
const DRIVER_NOISE: std::ops::Range<usize> = 2..8;

/// Canonical controller identity string
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Guid(String);

impl Guid {
    pub fn new(guid: impl AsRef<str>) -> Self {
        Self(guid.as_ref().trim().to_ascii_lowercase())
    }

    /// Placeholder used when a device has no readable identity
    pub fn zeroed() -> Self {
        Self("0".repeat(GUID_HEX_LEN))
    }

    /// Pseudo-GUID built from USB vendor/product ids, right-padded with zeros
    pub fn from_vendor_product(vendor: &str, product: &str) -> Self {
        let joined = format!("{}{}", vendor.trim(), product.trim());
        Self::new(format!("{:0<width$}", joined, width = GUID_HEX_LEN))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn starts_with(&self, prefix: &str) -> bool {
        self.0.starts_with(prefix)
    }

    /// Zero hex digits 2..8, the part that differs between driver backends
    /// for the same physical pad.
    pub fn without_driver_noise(&self) -> Self {
        let digits: String = self
            .0
            .chars()
            .enumerate()
            .map(|(i, c)| if DRIVER_NOISE.contains(&i) { '0' } else { c })
            .collect();
        Self(digits)
    }

    /// Replace the leading byte with a bus-type tag (`"03"` for USB, `"05"`
    /// for Bluetooth).
    pub fn with_bus_tag(&self, tag: &str) -> Self {
        let rest = self.0.get(2..).unwrap_or("");
        Self::new(format!("{}{}", tag, rest))
    }

    /// The 16 GUID bytes; short or non-hex GUIDs are zero-padded/zeroed.
    pub fn to_bytes(&self) -> [u8; 16] {
        let padded = format!("{:0<width$.width$}", self.0, width = GUID_HEX_LEN);
        let mut bytes = [0u8; 16];
        if hex::decode_to_slice(&padded, &mut bytes).is_err() {
            bytes = [0u8; 16];
        }
        bytes
    }

    /// The GUID read as a UUID and restated with the first three fields
    /// byte-swapped (mixed-endian form used by .NET based emulators).
    pub fn to_swapped_uuid(&self) -> Uuid {
        let uuid = Uuid::from_bytes(self.to_bytes());
        Uuid::from_bytes(uuid.to_bytes_le())
    }
}

impl fmt::Display for Guid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Guid {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for Guid {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zeroed_placeholder() {
        assert_eq!(Guid::zeroed().as_str(), "00000000000000000000000000000000");
    }

    #[test]
    fn test_from_vendor_product_pads_to_32() {
        let guid = Guid::from_vendor_product("045e\n", "028E");
        assert_eq!(guid.as_str(), "045e028e000000000000000000000000");
        assert_eq!(guid.as_str().len(), GUID_HEX_LEN);
    }

    #[test]
    fn test_driver_noise_zeroed() {
        let guid = Guid::new("0300f2b55e0400008e02000010010000");
        assert_eq!(
            guid.without_driver_noise().as_str(),
            "030000005e0400008e02000010010000"
        );
    }

    #[test]
    fn test_driver_noise_on_short_guid() {
        assert_eq!(Guid::new("0512ab").without_driver_noise().as_str(), "050000");
    }

    #[test]
    fn test_bus_tag_replaces_leading_byte() {
        let guid = Guid::new("000000005e0400008e02000010010000");
        assert_eq!(
            guid.with_bus_tag("05").as_str(),
            "050000005e0400008e02000010010000"
        );
    }

    #[test]
    fn test_swapped_uuid() {
        let guid = Guid::new("030000005e0400008e02000010010000");
        assert_eq!(
            guid.to_swapped_uuid().to_string(),
            "00000003-045e-0000-8e02-000010010000"
        );
    }

    #[test]
    fn test_swapped_uuid_of_short_guid_is_padded() {
        let guid = Guid::new("030000005e040000");
        assert_eq!(
            guid.to_swapped_uuid().to_string(),
            "00000003-045e-0000-0000-000000000000"
        );
    }

    #[test]
    fn test_case_is_normalized() {
        assert_eq!(Guid::new("ABCDEF"), Guid::new("abcdef"));
    }
}
