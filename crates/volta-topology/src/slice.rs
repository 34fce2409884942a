//! Re-indexing of branch and device tables into per-island local arrays.
//!
//! Rows are bucketed by island before slicing, so building every circuit of
//! a compilation costs one pass over the tables in total. The bus index map
//! is a single full-size buffer shared by all islands: entries are set for
//! one island's members and cleared again once its circuit is built.

use crate::circuit::{BranchTable, BusTable, DeviceTable, NumericalCircuit};
use crate::reduce::Reduction;
use crate::resolve::Island;
use crate::snapshot::Snapshot;

/// A branch row with endpoints already re-homed onto representatives.
#[derive(Debug, Clone, Copy)]
pub(crate) struct BranchRow {
    /// Position in `NetworkGraph::branches`.
    pub index: usize,
    pub from: usize,
    pub to: usize,
}

/// A device row with host buses already re-homed onto representatives.
#[derive(Debug, Clone, Copy)]
pub(crate) struct DeviceRow {
    /// Position in `NetworkGraph::devices`.
    pub index: usize,
    pub bus: usize,
    pub to_bus: Option<usize>,
}

pub(crate) struct CircuitSlicer<'a> {
    snapshot: &'a Snapshot<'a>,
    reduction: &'a Reduction,
    branches: Vec<Vec<BranchRow>>,
    devices: Vec<Vec<DeviceRow>>,
    /// Representative → index into `reduction.groups()`.
    group_of: Vec<Option<usize>>,
    /// Representative → local index in the island being sliced.
    bus_map: Vec<Option<usize>>,
}

impl<'a> CircuitSlicer<'a> {
    pub fn new(snapshot: &'a Snapshot<'a>, reduction: &'a Reduction, island_count: usize) -> Self {
        let n = reduction.bus_count();
        let mut group_of = vec![None; n];
        for (g, group) in reduction.groups().iter().enumerate() {
            group_of[group.representative] = Some(g);
        }
        Self {
            snapshot,
            reduction,
            branches: vec![Vec::new(); island_count],
            devices: vec![Vec::new(); island_count],
            group_of,
            bus_map: vec![None; n],
        }
    }

    /// Assign a branch row to an island.
    pub fn push_branch(&mut self, island: usize, row: BranchRow) {
        self.branches[island].push(row);
    }

    /// Assign a device row to an island.
    pub fn push_device(&mut self, island: usize, row: DeviceRow) {
        self.devices[island].push(row);
    }

    /// Build the circuit of island `index`.
    pub fn slice(&mut self, index: usize, island: &Island) -> NumericalCircuit {
        for (k, &b) in island.buses().iter().enumerate() {
            self.bus_map[b] = Some(k);
        }

        let buses = self.bus_table(island);
        let branches = self.branch_table(index);
        let devices = self.device_table(index);

        for &b in island.buses() {
            self.bus_map[b] = None;
        }

        NumericalCircuit::new(index, buses, branches, devices)
    }

    fn bus_table(&self, island: &Island) -> BusTable {
        let snap = self.snapshot;
        let k = island.len();
        let mut table = BusTable {
            ids: Vec::with_capacity(k),
            positions: Vec::with_capacity(k),
            active: Vec::with_capacity(k),
            is_reference: Vec::with_capacity(k),
            nominal_kv: Vec::with_capacity(k),
            merged: Vec::with_capacity(k),
            merged_positions: Vec::with_capacity(k),
        };

        for &b in island.buses() {
            let bus = snap.bus(b);
            let members: Vec<usize> = match self.group_of[b] {
                Some(g) => {
                    let group = &self.reduction.groups()[g];
                    // Representative first, then the rest in id order.
                    std::iter::once(b)
                        .chain(group.members.iter().copied().filter(|&m| m != b))
                        .collect()
                }
                None => vec![b],
            };

            table.ids.push(bus.id);
            table.positions.push(snap.position(b));
            table.active.push(self.reduction.is_active(b));
            table.is_reference.push(self.reduction.is_reference(b));
            table.nominal_kv.push(bus.nominal_kv);
            table
                .merged
                .push(members.iter().map(|&m| snap.bus(m).id).collect());
            table
                .merged_positions
                .push(members.iter().map(|&m| snap.position(m)).collect());
        }

        table
    }

    fn branch_table(&self, island: usize) -> BranchTable {
        let records = self.snapshot.graph.branches();
        let rows = &self.branches[island];
        let mut table = BranchTable {
            ids: Vec::with_capacity(rows.len()),
            from: Vec::with_capacity(rows.len()),
            to: Vec::with_capacity(rows.len()),
            impedance: Vec::with_capacity(rows.len()),
            shunt_admittance: Vec::with_capacity(rows.len()),
            rating: Vec::with_capacity(rows.len()),
            reducible: Vec::with_capacity(rows.len()),
        };

        for row in rows {
            let (Some(f), Some(t)) = (self.bus_map[row.from], self.bus_map[row.to]) else {
                continue;
            };
            let br = &records[row.index];
            table.ids.push(br.id);
            table.from.push(f);
            table.to.push(t);
            table.impedance.push(br.impedance);
            table.shunt_admittance.push(br.shunt_admittance);
            table.rating.push(br.rating);
            table.reducible.push(br.reducible);
        }

        table
    }

    fn device_table(&self, island: usize) -> DeviceTable {
        let records = self.snapshot.graph.devices();
        let rows = &self.devices[island];
        let mut table = DeviceTable {
            ids: Vec::with_capacity(rows.len()),
            kind: Vec::with_capacity(rows.len()),
            bus: Vec::with_capacity(rows.len()),
            to_bus: Vec::with_capacity(rows.len()),
            power: Vec::with_capacity(rows.len()),
            admittance: Vec::with_capacity(rows.len()),
            voltage_setpoint: Vec::with_capacity(rows.len()),
        };

        for row in rows {
            let Some(bus) = self.bus_map[row.bus] else {
                continue;
            };
            let to_bus = match row.to_bus {
                Some(b) => match self.bus_map[b] {
                    Some(k) => Some(k),
                    None => continue,
                },
                None => None,
            };
            let dev = &records[row.index];
            table.ids.push(dev.id);
            table.kind.push(dev.kind);
            table.bus.push(bus);
            table.to_bus.push(to_bus);
            table.power.push(dev.power);
            table.admittance.push(dev.admittance);
            table.voltage_setpoint.push(dev.voltage_setpoint);
        }

        table
    }
}
