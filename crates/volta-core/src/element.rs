//! Element trait shared by every network record.

use crate::activity::Activity;
use crate::bus::Bus;
use crate::branch::Branch;
use crate::device::{Device, Terminals};
use crate::id::BusId;

/// A network record that references one or more buses.
pub trait Element: std::fmt::Debug {
    /// Get the element's display name.
    fn name(&self) -> &str;

    /// Human-readable label, falling back to the id when unnamed.
    fn label(&self) -> String;

    /// Get the buses this element connects to.
    fn buses(&self) -> Vec<BusId>;

    /// Get the element's activity.
    fn activity(&self) -> &Activity;
}

impl Element for Bus {
    fn name(&self) -> &str {
        &self.name
    }

    fn label(&self) -> String {
        if self.name.is_empty() {
            self.id.to_string()
        } else {
            self.name.clone()
        }
    }

    fn buses(&self) -> Vec<BusId> {
        vec![self.id]
    }

    fn activity(&self) -> &Activity {
        &self.active
    }
}

impl Element for Branch {
    fn name(&self) -> &str {
        &self.name
    }

    fn label(&self) -> String {
        if self.name.is_empty() {
            self.id.to_string()
        } else {
            self.name.clone()
        }
    }

    fn buses(&self) -> Vec<BusId> {
        vec![self.from, self.to]
    }

    fn activity(&self) -> &Activity {
        &self.active
    }
}

impl Element for Device {
    fn name(&self) -> &str {
        &self.name
    }

    fn label(&self) -> String {
        if self.name.is_empty() {
            self.id.to_string()
        } else {
            self.name.clone()
        }
    }

    fn buses(&self) -> Vec<BusId> {
        match self.terminals {
            Terminals::Single(bus) => vec![bus],
            Terminals::Pair { from, to } => vec![from, to],
        }
    }

    fn activity(&self) -> &Activity {
        &self.active
    }
}
