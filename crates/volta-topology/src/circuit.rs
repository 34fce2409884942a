//! The compiled, per-island numerical circuit.
//!
//! Tables are stored column-wise (one `Vec` per attribute) with dense local
//! indices. Bus `k` of a circuit is local index `k`; branch and device rows
//! reference buses by local index only. Back-reference columns carry the
//! original ids so solver results can be mapped onto the caller's network.

use num_complex::Complex64 as C64;
use serde::{Deserialize, Serialize};
use volta_core::{BranchId, BusId, DeviceId, DeviceKind};

/// Bus columns.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BusTable {
    /// Original id of the representative bus.
    pub ids: Vec<BusId>,
    /// Arena position of the representative bus.
    pub positions: Vec<usize>,
    pub active: Vec<bool>,
    pub is_reference: Vec<bool>,
    pub nominal_kv: Vec<f64>,
    /// Original ids of every bus merged into this one, representative first.
    pub merged: Vec<Vec<BusId>>,
    /// Arena positions matching `merged`.
    pub merged_positions: Vec<Vec<usize>>,
}

impl BusTable {
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

/// Branch columns.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BranchTable {
    pub ids: Vec<BranchId>,
    /// Local from-bus index.
    pub from: Vec<usize>,
    /// Local to-bus index.
    pub to: Vec<usize>,
    pub impedance: Vec<C64>,
    pub shunt_admittance: Vec<C64>,
    pub rating: Vec<f64>,
    pub reducible: Vec<bool>,
}

impl BranchTable {
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

/// Device columns.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeviceTable {
    pub ids: Vec<DeviceId>,
    pub kind: Vec<DeviceKind>,
    /// Local index of the first (or only) host bus.
    pub bus: Vec<usize>,
    /// Local index of the second host bus of two-terminal devices.
    pub to_bus: Vec<Option<usize>>,
    pub power: Vec<C64>,
    pub admittance: Vec<C64>,
    pub voltage_setpoint: Vec<Option<f64>>,
}

impl DeviceTable {
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

/// One island of a compiled network.
///
/// Created by the compiler and never modified afterwards. A circuit that is
/// not [solvable](Self::is_solvable) has no reference bus; numerical
/// solvers must refuse it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NumericalCircuit {
    island: usize,
    solvable: bool,
    buses: BusTable,
    branches: BranchTable,
    devices: DeviceTable,
}

impl NumericalCircuit {
    pub(crate) fn new(
        island: usize,
        buses: BusTable,
        branches: BranchTable,
        devices: DeviceTable,
    ) -> Self {
        let solvable = buses.is_reference.iter().any(|&r| r);
        Self {
            island,
            solvable,
            buses,
            branches,
            devices,
        }
    }

    /// Index of this island in the compilation.
    pub fn island_index(&self) -> usize {
        self.island
    }

    /// Whether the island has at least one reference bus.
    pub fn is_solvable(&self) -> bool {
        self.solvable
    }

    pub fn bus_count(&self) -> usize {
        self.buses.len()
    }

    pub fn branch_count(&self) -> usize {
        self.branches.len()
    }

    pub fn device_count(&self) -> usize {
        self.devices.len()
    }

    pub fn buses(&self) -> &BusTable {
        &self.buses
    }

    pub fn branches(&self) -> &BranchTable {
        &self.branches
    }

    pub fn devices(&self) -> &DeviceTable {
        &self.devices
    }

    /// Original id of local bus `k`.
    pub fn bus_id(&self, k: usize) -> BusId {
        self.buses.ids[k]
    }

    /// Local index of a bus, following merges: a bus that was collapsed into
    /// a representative resolves to the representative's index.
    pub fn local_index(&self, id: BusId) -> Option<usize> {
        self.buses
            .merged
            .iter()
            .position(|members| members.contains(&id))
    }

    /// Local indices of the reference buses.
    pub fn reference_buses(&self) -> Vec<usize> {
        self.buses
            .is_reference
            .iter()
            .enumerate()
            .filter_map(|(k, &r)| r.then_some(k))
            .collect()
    }

    /// Rows of the device table with the given kind.
    pub fn devices_of_kind(&self, kind: DeviceKind) -> impl Iterator<Item = usize> + '_ {
        self.devices
            .kind
            .iter()
            .enumerate()
            .filter_map(move |(i, &k)| (k == kind).then_some(i))
    }

    /// Scatter per-bus values of this island onto arena positions.
    ///
    /// `local` holds one value per local bus; `out` is indexed by bus
    /// position in the network graph. Every bus merged into a representative
    /// receives the representative's value. Positions outside the island are
    /// left untouched.
    pub fn propagate_bus_values<T: Copy>(&self, local: &[T], out: &mut [T]) {
        debug_assert_eq!(local.len(), self.bus_count());
        for (value, positions) in local.iter().zip(&self.buses.merged_positions) {
            for &pos in positions {
                out[pos] = *value;
            }
        }
    }
}
