//! Zero-impedance bus merging.
//!
//! Buses joined by chains of active, reducible, zero-impedance links carry
//! no physical separation and would make any admittance formulation
//! singular. They are found as components of the collapsible-link pattern
//! over the whole bus set, active or not, and folded into one
//! representative each.

use crate::adjacency::{Collapsible, Link, build_adjacency};
use crate::config::{CompileConfig, ReferencePolicy, RepresentativePolicy};
use crate::islands::find_islands;

/// A set of buses collapsed into one.
///
/// Buses are addressed by rank, so ascending order is bus id order and the
/// first member is the one with the lowest id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeGroup {
    pub representative: usize,
    /// All members, ascending, representative included.
    pub members: Vec<usize>,
}

/// Result of zero-impedance merging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reduction {
    /// Bus rank → representative rank.
    merge_map: Vec<usize>,
    /// Groups with more than one member.
    groups: Vec<MergeGroup>,
    /// Merged activity; `false` for every non-representative.
    active: Vec<bool>,
    /// Merged reference flag; `false` for every non-representative.
    reference: Vec<bool>,
}

impl Reduction {
    /// A reduction that merges nothing.
    pub fn identity(bus_active: &[bool], bus_reference: &[bool]) -> Self {
        Self {
            merge_map: (0..bus_active.len()).collect(),
            groups: Vec::new(),
            active: bus_active.to_vec(),
            reference: bus_reference.to_vec(),
        }
    }

    /// Representative of the bus at `pos`.
    pub fn representative(&self, pos: usize) -> usize {
        self.merge_map[pos]
    }

    pub fn is_representative(&self, pos: usize) -> bool {
        self.merge_map[pos] == pos
    }

    /// Whether the merged bus at `pos` is active. Only representatives can be.
    pub fn is_active(&self, pos: usize) -> bool {
        self.active[pos]
    }

    pub fn is_reference(&self, pos: usize) -> bool {
        self.reference[pos]
    }

    /// Active representatives as a mask over all buses.
    pub fn active_mask(&self) -> &[bool] {
        &self.active
    }

    pub fn merge_map(&self) -> &[usize] {
        &self.merge_map
    }

    pub fn groups(&self) -> &[MergeGroup] {
        &self.groups
    }

    pub fn bus_count(&self) -> usize {
        self.merge_map.len()
    }

    /// Re-home a link's endpoints onto representatives.
    pub fn rehome(&self, link: &Link) -> Link {
        Link {
            from: self.merge_map[link.from],
            to: self.merge_map[link.to],
            ..*link
        }
    }
}

/// Merge buses joined by collapsible links.
///
/// Merged activity is the OR of the members' activity, so an inactive bus
/// bridged to an active one by a closed switch comes back to life with it.
/// The representative and the reference flag follow the configured
/// policies.
pub fn reduce(
    links: &[Link],
    bus_active: &[bool],
    bus_reference: &[bool],
    config: &CompileConfig,
) -> Reduction {
    let n = bus_active.len();
    let everything = vec![true; n];
    let filter = Collapsible {
        tol: config.zero_impedance_tol,
    };
    let adj = build_adjacency(n, links, &everything, &filter, config.adjacency_strategy);

    let mut reduction = Reduction::identity(bus_active, bus_reference);
    if adj.nnz() == 0 {
        return reduction;
    }

    for members in find_islands(&adj, &everything) {
        if members.len() < 2 {
            continue;
        }

        let representative = match config.representative_policy {
            RepresentativePolicy::LowestId => members[0],
            RepresentativePolicy::PreferReference => members
                .iter()
                .copied()
                .find(|&b| bus_reference[b])
                .unwrap_or(members[0]),
        };
        let active = members.iter().any(|&b| bus_active[b]);
        let reference = match config.reference_policy {
            ReferencePolicy::AnyMember => members.iter().any(|&b| bus_reference[b]),
            ReferencePolicy::RepresentativeOnly => bus_reference[representative],
        };

        for &b in &members {
            reduction.merge_map[b] = representative;
            reduction.active[b] = false;
            reduction.reference[b] = false;
        }
        reduction.active[representative] = active;
        reduction.reference[representative] = reference;

        reduction.groups.push(MergeGroup {
            representative,
            members,
        });
    }

    reduction
}
