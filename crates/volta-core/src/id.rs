//! Stable integer identifiers for network records.
//!
//! Ids are chosen by whoever edits the network and stay fixed across
//! compilations. They are not positions: the arena assigns each record a
//! dense position on insertion, and all graph algorithms work on positions.

use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! record_id {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        pub struct $name(pub(crate) u32);

        impl $name {
            /// Create an id from a raw value.
            pub fn new(id: u32) -> Self {
                $name(id)
            }

            /// Get the raw id value.
            pub fn as_u32(self) -> u32 {
                self.0
            }
        }

        impl From<u32> for $name {
            fn from(id: u32) -> Self {
                $name(id)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($prefix, "{}"), self.0)
            }
        }
    };
}

record_id!(
    /// Identifies a bus (network node).
    BusId,
    "bus"
);

record_id!(
    /// Identifies a branch (line, transformer, switch).
    BranchId,
    "branch"
);

record_id!(
    /// Identifies a device attached to one or two buses.
    DeviceId,
    "device"
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bus_id() {
        let id = BusId::new(42);
        assert_eq!(id.as_u32(), 42);
        assert_eq!(id.to_string(), "bus42");
    }

    #[test]
    fn test_ids_are_ordered_by_value() {
        let mut ids = vec![BranchId::new(3), BranchId::new(1), BranchId::new(2)];
        ids.sort();
        assert_eq!(ids, vec![BranchId::new(1), BranchId::new(2), BranchId::new(3)]);
    }

    #[test]
    fn test_device_id_from_u32() {
        let id: DeviceId = 7.into();
        assert_eq!(id, DeviceId::new(7));
        assert_eq!(id.to_string(), "device7");
    }
}
