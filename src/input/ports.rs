//! Per-GUID port allocation
//!
//! Two physically distinct pads may report the same GUID; emulators tell them
//! apart by a zero-based port counted per GUID. Ports are handed out in
//! ascending player order, so the allocator refuses input that is not sorted.

use std::collections::HashMap;
use thiserror::Error;

use super::controller::ControllerIdentity;
use super::guid::Guid;

/// The identities were not in ascending player order
#[derive(Debug, Error, PartialEq, Eq)]
#[error("player {found} listed after player {previous}")]
pub struct PortOrderError {
    pub previous: usize,
    pub found: usize,
}

/// Running per-GUID port counters
#[derive(Debug, Default, Clone)]
pub struct PortAllocator {
    next: HashMap<Guid, usize>,
}

impl PortAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take the next free port for `guid`; the first call for a GUID yields 0.
    pub fn assign(&mut self, guid: &Guid) -> usize {
        let counter = self.next.entry(guid.clone()).or_insert(0);
        let port = *counter;
        *counter += 1;
        port
    }

    /// Annotate identities with their port.
    ///
    /// Precondition: `identities` is sorted by ascending `player`.
    pub fn allocate(
        identities: Vec<ControllerIdentity>,
    ) -> Result<Vec<ControllerIdentity>, PortOrderError> {
        for pair in identities.windows(2) {
            if pair[1].player < pair[0].player {
                return Err(PortOrderError { previous: pair[0].player, found: pair[1].player });
            }
        }

        let mut allocator = Self::new();
        Ok(identities
            .into_iter()
            .map(|mut identity| {
                identity.port = allocator.assign(&identity.guid);
                identity
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::capability::CapabilityMap;
    use crate::input::controller::IdentitySource;
    use proptest::prelude::*;

    fn identity(player: usize, guid: &str) -> ControllerIdentity {
        ControllerIdentity {
            player,
            player_number: player as u32 + 1,
            device_path: format!("/dev/input/event{}", player),
            name: "pad".to_string(),
            guid: Guid::new(guid),
            inputs: CapabilityMap::new(),
            port: 0,
            source: IdentitySource::Frontend,
        }
    }

    #[test]
    fn test_shared_guid_gets_sequential_ports() {
        let ids = PortAllocator::allocate(vec![
            identity(0, "030000005e040000"),
            identity(1, "030000005e040000"),
            identity(2, "05000000aaaa0000"),
            identity(3, "030000005e040000"),
        ])
        .unwrap();

        let ports: Vec<_> = ids.iter().map(|i| i.port).collect();
        assert_eq!(ports, [0, 1, 0, 2]);
    }

    #[test]
    fn test_unsorted_input_is_rejected() {
        let err = PortAllocator::allocate(vec![identity(1, "a"), identity(0, "a")]).unwrap_err();
        assert_eq!(err, PortOrderError { previous: 1, found: 0 });
    }

    #[test]
    fn test_assign_is_independent_per_guid() {
        let mut allocator = PortAllocator::new();
        assert_eq!(allocator.assign(&Guid::new("aa")), 0);
        assert_eq!(allocator.assign(&Guid::new("bb")), 0);
        assert_eq!(allocator.assign(&Guid::new("aa")), 1);
    }

    proptest! {
        #[test]
        fn prop_ports_count_previous_occurrences(guids in proptest::collection::vec(0u8..4, 0..12)) {
            let ids: Vec<_> = guids
                .iter()
                .enumerate()
                .map(|(p, g)| identity(p, &format!("{:02x}", g)))
                .collect();

            let allocated = PortAllocator::allocate(ids).unwrap();

            for (i, id) in allocated.iter().enumerate() {
                let earlier = guids[..i].iter().filter(|g| **g == guids[i]).count();
                prop_assert_eq!(id.port, earlier);
            }
        }
    }
}
