//! Per-compilation diagnostics.
//!
//! Everything that is wrong with the network data, but not with the
//! request, ends up here. Each entry is also logged when it is recorded.

use std::fmt;

use serde::{Deserialize, Serialize};
use volta_core::{BranchId, BusId, DeviceId};

/// A record that referenced a bus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ElementRef {
    Branch(BranchId),
    Device(DeviceId),
}

impl fmt::Display for ElementRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ElementRef::Branch(id) => write!(f, "{}", id),
            ElementRef::Device(id) => write!(f, "{}", id),
        }
    }
}

/// A record referencing a bus id that does not exist. The record is skipped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructuralError {
    pub element: ElementRef,
    pub missing_bus: BusId,
}

/// Buses collapsed into one representative.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergedGroup {
    pub representative: BusId,
    /// All members including the representative, in ascending id order.
    pub members: Vec<BusId>,
}

/// A branch whose endpoints ended up on the same representative.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DroppedBranch {
    pub branch: BranchId,
    pub bus: BusId,
    /// True when the branch carried impedance and was shorted by a parallel
    /// collapse, rather than being collapsed itself. Branches that connect a
    /// bus to itself in the input are never shorted.
    pub shorted: bool,
}

/// A reducible branch left in place because its impedance is material.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DegenerateReduction {
    pub branch: BranchId,
    pub magnitude: f64,
}

/// An island with no reference bus.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnsolvableIsland {
    pub island: usize,
    pub buses: Vec<BusId>,
}

/// Why an active device is absent from every circuit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrphanReason {
    /// A host bus is inactive or belongs to no retained island.
    HostBusInactive,
    /// The two terminals landed in different islands.
    SpansIslands,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrphanedDevice {
    pub device: DeviceId,
    pub reason: OrphanReason,
}

/// Diagnostics collected during one compilation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Diagnostics {
    pub structural_errors: Vec<StructuralError>,
    pub merged_groups: Vec<MergedGroup>,
    pub dropped_branches: Vec<DroppedBranch>,
    pub degenerate_reductions: Vec<DegenerateReduction>,
    pub unsolvable_islands: Vec<UnsolvableIsland>,
    pub orphaned_devices: Vec<OrphanedDevice>,
    pub skipped_single_bus_islands: usize,
    /// No bus was active after merging.
    pub empty_graph: bool,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn structural(&mut self, element: ElementRef, missing_bus: BusId) {
        log::warn!("{} references missing {}; skipped", element, missing_bus);
        self.structural_errors.push(StructuralError {
            element,
            missing_bus,
        });
    }

    pub(crate) fn merged(&mut self, representative: BusId, members: Vec<BusId>) {
        log::debug!("merged {} buses into {}", members.len(), representative);
        self.merged_groups.push(MergedGroup {
            representative,
            members,
        });
    }

    pub(crate) fn dropped(&mut self, branch: BranchId, bus: BusId, shorted: bool) {
        if shorted {
            log::warn!("{} shorted by zero-impedance merge at {}", branch, bus);
        }
        self.dropped_branches.push(DroppedBranch {
            branch,
            bus,
            shorted,
        });
    }

    pub(crate) fn degenerate(&mut self, branch: BranchId, magnitude: f64) {
        log::warn!(
            "{} is reducible but |z| = {:e}; kept as an impedance branch",
            branch,
            magnitude
        );
        self.degenerate_reductions
            .push(DegenerateReduction { branch, magnitude });
    }

    pub(crate) fn unsolvable(&mut self, island: usize, buses: Vec<BusId>) {
        log::warn!("island {} ({} buses) has no reference bus", island, buses.len());
        self.unsolvable_islands
            .push(UnsolvableIsland { island, buses });
    }

    pub(crate) fn orphaned(&mut self, device: DeviceId, reason: OrphanReason) {
        log::warn!("{} orphaned: {:?}", device, reason);
        self.orphaned_devices.push(OrphanedDevice { device, reason });
    }

    pub(crate) fn empty(&mut self) {
        log::warn!("network has no active buses");
        self.empty_graph = true;
    }

    /// Whether any warning-level entry was recorded. Merges and collapsed
    /// switches are informational and do not count.
    pub fn has_warnings(&self) -> bool {
        !self.structural_errors.is_empty()
            || !self.degenerate_reductions.is_empty()
            || !self.unsolvable_islands.is_empty()
            || !self.orphaned_devices.is_empty()
            || self.dropped_branches.iter().any(|d| d.shorted)
            || self.empty_graph
    }

    /// Whether `island` was reported unsolvable.
    pub fn is_unsolvable(&self, island: usize) -> bool {
        self.unsolvable_islands.iter().any(|u| u.island == island)
    }
}

impl fmt::Display for Diagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} merged groups, {} dropped branches, {} structural errors, \
             {} degenerate reductions, {} unsolvable islands, {} orphaned devices",
            self.merged_groups.len(),
            self.dropped_branches.len(),
            self.structural_errors.len(),
            self.degenerate_reductions.len(),
            self.unsolvable_islands.len(),
            self.orphaned_devices.len(),
        )?;
        if self.empty_graph {
            write!(f, " (empty network)")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merges_are_not_warnings() {
        let mut diag = Diagnostics::new();
        diag.merged(BusId::new(0), vec![BusId::new(0), BusId::new(1)]);
        diag.dropped(BranchId::new(3), BusId::new(0), false);
        assert!(!diag.has_warnings());

        diag.dropped(BranchId::new(4), BusId::new(0), true);
        assert!(diag.has_warnings());
    }

    #[test]
    fn test_unsolvable_lookup() {
        let mut diag = Diagnostics::new();
        diag.unsolvable(2, vec![BusId::new(5)]);
        assert!(diag.is_unsolvable(2));
        assert!(!diag.is_unsolvable(0));
        assert!(diag.has_warnings());
    }

    #[test]
    fn test_display_summary() {
        let mut diag = Diagnostics::new();
        diag.empty();
        let text = diag.to_string();
        assert!(text.starts_with("0 merged groups"));
        assert!(text.ends_with("(empty network)"));
    }
}
