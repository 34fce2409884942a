//! Devices attached to one bus (loads, generators, ...) or two buses
//! (DC links and converters).

use num_complex::Complex64 as C64;
use serde::{Deserialize, Serialize};

use crate::activity::Activity;
use crate::id::{BusId, DeviceId};

/// The kind of a device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeviceKind {
    Load,
    Generator,
    Battery,
    Shunt,
    /// Point-to-point HVDC line.
    Hvdc,
    /// AC/DC voltage source converter.
    Vsc,
}

impl DeviceKind {
    /// Whether devices of this kind connect two buses.
    pub fn is_two_terminal(self) -> bool {
        matches!(self, DeviceKind::Hvdc | DeviceKind::Vsc)
    }
}

/// Where a device is connected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Terminals {
    /// Connected to one bus.
    Single(BusId),
    /// Connected between two buses.
    Pair { from: BusId, to: BusId },
}

impl Terminals {
    /// The first (or only) host bus.
    pub fn first(&self) -> BusId {
        match *self {
            Terminals::Single(bus) => bus,
            Terminals::Pair { from, .. } => from,
        }
    }

    /// The second host bus of a two-terminal device.
    pub fn second(&self) -> Option<BusId> {
        match *self {
            Terminals::Single(_) => None,
            Terminals::Pair { to, .. } => Some(to),
        }
    }
}

/// A device record.
///
/// Parameters are deliberately generic: `power` is the scheduled complex
/// power (injection for generators and batteries, demand for loads, transfer
/// for links), `admittance` is a constant-admittance component and
/// `voltage_setpoint` is the controlled voltage magnitude when there is one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Device {
    pub id: DeviceId,
    #[serde(default)]
    pub name: String,
    pub kind: DeviceKind,
    pub terminals: Terminals,
    #[serde(default)]
    pub active: Activity,
    #[serde(default)]
    pub power: C64,
    #[serde(default)]
    pub admittance: C64,
    #[serde(default)]
    pub voltage_setpoint: Option<f64>,
}

impl Device {
    fn new(id: impl Into<DeviceId>, kind: DeviceKind, terminals: Terminals) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            kind,
            terminals,
            active: Activity::default(),
            power: C64::new(0.0, 0.0),
            admittance: C64::new(0.0, 0.0),
            voltage_setpoint: None,
        }
    }

    pub fn load(id: impl Into<DeviceId>, bus: impl Into<BusId>, power: C64) -> Self {
        let mut device = Self::new(id, DeviceKind::Load, Terminals::Single(bus.into()));
        device.power = power;
        device
    }

    pub fn generator(id: impl Into<DeviceId>, bus: impl Into<BusId>, power: C64) -> Self {
        let mut device = Self::new(id, DeviceKind::Generator, Terminals::Single(bus.into()));
        device.power = power;
        device
    }

    pub fn battery(id: impl Into<DeviceId>, bus: impl Into<BusId>, power: C64) -> Self {
        let mut device = Self::new(id, DeviceKind::Battery, Terminals::Single(bus.into()));
        device.power = power;
        device
    }

    pub fn shunt(id: impl Into<DeviceId>, bus: impl Into<BusId>, admittance: C64) -> Self {
        let mut device = Self::new(id, DeviceKind::Shunt, Terminals::Single(bus.into()));
        device.admittance = admittance;
        device
    }

    pub fn hvdc(
        id: impl Into<DeviceId>,
        from: impl Into<BusId>,
        to: impl Into<BusId>,
        power: C64,
    ) -> Self {
        let terminals = Terminals::Pair {
            from: from.into(),
            to: to.into(),
        };
        let mut device = Self::new(id, DeviceKind::Hvdc, terminals);
        device.power = power;
        device
    }

    pub fn vsc(
        id: impl Into<DeviceId>,
        from: impl Into<BusId>,
        to: impl Into<BusId>,
        power: C64,
    ) -> Self {
        let terminals = Terminals::Pair {
            from: from.into(),
            to: to.into(),
        };
        let mut device = Self::new(id, DeviceKind::Vsc, terminals);
        device.power = power;
        device
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_activity(mut self, active: Activity) -> Self {
        self.active = active;
        self
    }

    pub fn inactive(self) -> Self {
        self.with_activity(Activity::fixed(false))
    }

    pub fn with_voltage_setpoint(mut self, vset: f64) -> Self {
        self.voltage_setpoint = Some(vset);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_terminal_constructors() {
        let load = Device::load(1, 4, C64::new(10.0, 2.0));
        assert_eq!(load.kind, DeviceKind::Load);
        assert_eq!(load.terminals.first(), BusId::new(4));
        assert_eq!(load.terminals.second(), None);
        assert!(!load.kind.is_two_terminal());
    }

    #[test]
    fn test_two_terminal_constructors() {
        let link = Device::hvdc(2, 1, 5, C64::new(100.0, 0.0));
        assert!(link.kind.is_two_terminal());
        assert_eq!(link.terminals.first(), BusId::new(1));
        assert_eq!(link.terminals.second(), Some(BusId::new(5)));
    }
}
