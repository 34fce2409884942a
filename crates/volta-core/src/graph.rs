//! The network graph arena.
//!
//! Records are stored in plain vectors and addressed by their position.
//! An `IndexMap` per record table resolves stable ids to positions and
//! rejects duplicates on insertion. Bus references inside branches and
//! devices are ids, not positions: they are resolved at compilation time so
//! the graph can be edited in any order.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use indexmap::IndexMap;
use num_complex::Complex64 as C64;
use serde::{Deserialize, Serialize};

use crate::branch::Branch;
use crate::bus::Bus;
use crate::device::Device;
use crate::element::Element;
use crate::error::{Error, Result};
use crate::id::{BranchId, BusId, DeviceId};

/// A network of buses, branches and devices.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NetworkGraph {
    /// Network name.
    name: Option<String>,
    /// Number of time steps every activity profile must have (0 = none).
    time_steps: usize,
    buses: Vec<Bus>,
    branches: Vec<Branch>,
    devices: Vec<Device>,
    /// Map from bus id to position in `buses`.
    bus_index: IndexMap<BusId, usize>,
    branch_index: IndexMap<BranchId, usize>,
    device_index: IndexMap<DeviceId, usize>,
}

impl NetworkGraph {
    /// Create a new empty network without time profiles.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new empty network whose records carry `time_steps`-long
    /// activity profiles.
    pub fn with_time_steps(time_steps: usize) -> Self {
        Self {
            time_steps,
            ..Default::default()
        }
    }

    /// Build a network from complete record lists.
    pub fn from_parts(
        time_steps: usize,
        buses: impl IntoIterator<Item = Bus>,
        branches: impl IntoIterator<Item = Branch>,
        devices: impl IntoIterator<Item = Device>,
    ) -> Result<Self> {
        let mut graph = Self::with_time_steps(time_steps);
        for bus in buses {
            graph.add_bus(bus)?;
        }
        for branch in branches {
            graph.add_branch(branch)?;
        }
        for device in devices {
            graph.add_device(device)?;
        }
        Ok(graph)
    }

    /// Get the network name.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Set the network name.
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = Some(name.into());
    }

    /// Number of time steps of the activity profiles (0 = snapshot only).
    pub fn time_steps(&self) -> usize {
        self.time_steps
    }

    fn check_profile(&self, element: &impl Element) -> Result<()> {
        match element.activity().profile() {
            Some(profile) if profile.len() != self.time_steps => Err(Error::ProfileLength {
                element: element.label(),
                expected: self.time_steps,
                actual: profile.len(),
            }),
            _ => Ok(()),
        }
    }

    /// Add a bus, returning its position.
    pub fn add_bus(&mut self, bus: Bus) -> Result<usize> {
        if self.bus_index.contains_key(&bus.id) {
            return Err(Error::DuplicateBus(bus.id));
        }
        self.check_profile(&bus)?;
        let pos = self.buses.len();
        self.bus_index.insert(bus.id, pos);
        self.buses.push(bus);
        Ok(pos)
    }

    /// Add a branch, returning its position.
    ///
    /// The branch's buses need not exist yet; dangling references are
    /// reported when the network is compiled.
    pub fn add_branch(&mut self, branch: Branch) -> Result<usize> {
        if self.branch_index.contains_key(&branch.id) {
            return Err(Error::DuplicateBranch(branch.id));
        }
        self.check_profile(&branch)?;
        let pos = self.branches.len();
        self.branch_index.insert(branch.id, pos);
        self.branches.push(branch);
        Ok(pos)
    }

    /// Add a device, returning its position.
    pub fn add_device(&mut self, device: Device) -> Result<usize> {
        if self.device_index.contains_key(&device.id) {
            return Err(Error::DuplicateDevice(device.id));
        }
        self.check_profile(&device)?;
        let pos = self.devices.len();
        self.device_index.insert(device.id, pos);
        self.devices.push(device);
        Ok(pos)
    }

    /// All buses in position order.
    pub fn buses(&self) -> &[Bus] {
        &self.buses
    }

    /// All branches in position order.
    pub fn branches(&self) -> &[Branch] {
        &self.branches
    }

    /// All devices in position order.
    pub fn devices(&self) -> &[Device] {
        &self.devices
    }

    /// Position of a bus id.
    pub fn bus_position(&self, id: BusId) -> Option<usize> {
        self.bus_index.get(&id).copied()
    }

    /// Get a bus by id.
    pub fn bus(&self, id: BusId) -> Option<&Bus> {
        self.bus_position(id).map(|pos| &self.buses[pos])
    }

    /// Get a branch by id.
    pub fn branch(&self, id: BranchId) -> Option<&Branch> {
        self.branch_index.get(&id).map(|&pos| &self.branches[pos])
    }

    /// Get a device by id.
    pub fn device(&self, id: DeviceId) -> Option<&Device> {
        self.device_index.get(&id).map(|&pos| &self.devices[pos])
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

    /// Check if the network has no buses.
    pub fn is_empty(&self) -> bool {
        self.buses.is_empty()
    }

    /// A 64-bit hash of every record.
    ///
    /// Equal networks hash equal within one process; any edit to a record
    /// changes the value with overwhelming probability. Used to key caches
    /// of compiled topology.
    pub fn fingerprint(&self) -> u64 {
        let mut h = DefaultHasher::new();
        self.time_steps.hash(&mut h);
        self.buses.len().hash(&mut h);
        for bus in &self.buses {
            bus.id.hash(&mut h);
            bus.active.hash(&mut h);
            bus.is_reference.hash(&mut h);
            bus.nominal_kv.to_bits().hash(&mut h);
        }
        self.branches.len().hash(&mut h);
        for br in &self.branches {
            br.id.hash(&mut h);
            br.from.hash(&mut h);
            br.to.hash(&mut h);
            br.active.hash(&mut h);
            br.reducible.hash(&mut h);
            hash_complex(br.impedance, &mut h);
            hash_complex(br.shunt_admittance, &mut h);
            br.rating.to_bits().hash(&mut h);
        }
        self.devices.len().hash(&mut h);
        for dev in &self.devices {
            dev.id.hash(&mut h);
            dev.kind.hash(&mut h);
            dev.terminals.hash(&mut h);
            dev.active.hash(&mut h);
            hash_complex(dev.power, &mut h);
            hash_complex(dev.admittance, &mut h);
            dev.voltage_setpoint.map(f64::to_bits).hash(&mut h);
        }
        h.finish()
    }
}

fn hash_complex(z: C64, h: &mut impl Hasher) {
    z.re.to_bits().hash(h);
    z.im.to_bits().hash(h);
}
