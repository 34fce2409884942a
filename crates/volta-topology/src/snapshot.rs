//! Index-addressed view of a network at one time step.
//!
//! Buses are numbered by rank: the bus with the lowest id is index 0, the
//! next lowest index 1, and so on. Every later stage works on ranks, so
//! representatives, island order and local indices depend only on bus
//! numbering and never on the order records were inserted into the graph.
//!
//! Every bus id referenced by a branch or device is resolved to its rank
//! and activity is evaluated at the requested time index. Records with a
//! dangling bus reference are dropped here and reported.

use volta_core::{Bus, BusId, NetworkGraph, Terminals};

use crate::adjacency::Link;
use crate::diagnostics::{Diagnostics, ElementRef};

/// A branch with resolved endpoints.
#[derive(Debug, Clone, Copy)]
pub(crate) struct BranchRef {
    /// Position in `NetworkGraph::branches`.
    pub index: usize,
    /// Bus rank.
    pub from: usize,
    /// Bus rank.
    pub to: usize,
    pub active: bool,
}

/// A device with resolved host buses.
#[derive(Debug, Clone, Copy)]
pub(crate) struct DeviceRef {
    /// Position in `NetworkGraph::devices`.
    pub index: usize,
    /// Bus rank.
    pub bus: usize,
    pub to_bus: Option<usize>,
    pub active: bool,
}

#[derive(Debug)]
pub(crate) struct Snapshot<'g> {
    pub graph: &'g NetworkGraph,
    /// Rank → arena position.
    order: Vec<usize>,
    /// Arena position → rank.
    rank: Vec<usize>,
    /// Indexed by rank.
    pub bus_active: Vec<bool>,
    /// Indexed by rank.
    pub bus_reference: Vec<bool>,
    pub branches: Vec<BranchRef>,
    pub devices: Vec<DeviceRef>,
}

impl<'g> Snapshot<'g> {
    pub fn new(graph: &'g NetworkGraph, time_index: Option<usize>, diag: &mut Diagnostics) -> Self {
        let records = graph.buses();
        let mut order: Vec<usize> = (0..records.len()).collect();
        order.sort_unstable_by_key(|&p| records[p].id);
        let mut rank = vec![0; order.len()];
        for (k, &p) in order.iter().enumerate() {
            rank[p] = k;
        }

        let bus_active = order.iter().map(|&p| records[p].active.at(time_index)).collect();
        let bus_reference = order.iter().map(|&p| records[p].is_reference).collect();

        let mut branches = Vec::with_capacity(graph.branch_count());
        for (index, br) in graph.branches().iter().enumerate() {
            let element = ElementRef::Branch(br.id);
            let (Some(from), Some(to)) = (
                locate(graph, &rank, br.from, element, diag),
                locate(graph, &rank, br.to, element, diag),
            ) else {
                continue;
            };
            branches.push(BranchRef {
                index,
                from,
                to,
                active: br.active.at(time_index),
            });
        }

        let mut devices = Vec::with_capacity(graph.device_count());
        for (index, dev) in graph.devices().iter().enumerate() {
            let element = ElementRef::Device(dev.id);
            let resolved = match dev.terminals {
                Terminals::Single(bus) => {
                    locate(graph, &rank, bus, element, diag).map(|b| (b, None))
                }
                Terminals::Pair { from, to } => match (
                    locate(graph, &rank, from, element, diag),
                    locate(graph, &rank, to, element, diag),
                ) {
                    (Some(f), Some(t)) => Some((f, Some(t))),
                    _ => None,
                },
            };
            let Some((bus, to_bus)) = resolved else {
                continue;
            };
            devices.push(DeviceRef {
                index,
                bus,
                to_bus,
                active: dev.active.at(time_index),
            });
        }

        Self {
            graph,
            order,
            rank,
            bus_active,
            bus_reference,
            branches,
            devices,
        }
    }

    pub fn bus_count(&self) -> usize {
        self.bus_active.len()
    }

    /// Bus record of rank `k`.
    pub fn bus(&self, k: usize) -> &'g Bus {
        &self.graph.buses()[self.order[k]]
    }

    /// Arena position of rank `k`.
    pub fn position(&self, k: usize) -> usize {
        self.order[k]
    }

    /// Rank of the bus at arena position `pos`.
    pub fn rank(&self, pos: usize) -> usize {
        self.rank[pos]
    }

    /// Branch links in branch order.
    pub fn branch_links(&self) -> Vec<Link> {
        let records = self.graph.branches();
        self.branches
            .iter()
            .map(|b| {
                let br = &records[b.index];
                Link {
                    from: b.from,
                    to: b.to,
                    active: b.active,
                    reducible: br.reducible,
                    impedance: br.impedance,
                }
            })
            .collect()
    }
}

fn locate(
    graph: &NetworkGraph,
    rank: &[usize],
    bus: BusId,
    element: ElementRef,
    diag: &mut Diagnostics,
) -> Option<usize> {
    let pos = graph.bus_position(bus);
    if pos.is_none() {
        diag.structural(element, bus);
    }
    pos.map(|p| rank[p])
}
