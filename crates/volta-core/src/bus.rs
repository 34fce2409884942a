//! Bus records.

use serde::{Deserialize, Serialize};

use crate::activity::Activity;
use crate::id::BusId;

/// A network node where voltage is defined.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bus {
    /// Stable identifier.
    pub id: BusId,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Activity flag and optional profile.
    #[serde(default)]
    pub active: Activity,
    /// Whether this bus fixes the voltage reference of its island.
    #[serde(default)]
    pub is_reference: bool,
    /// Nominal voltage in kV.
    pub nominal_kv: f64,
}

impl Bus {
    /// Create an active, non-reference bus with a 1 kV nominal voltage.
    pub fn new(id: impl Into<BusId>) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            active: Activity::default(),
            is_reference: false,
            nominal_kv: 1.0,
        }
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

    /// Mark this bus as the reference (slack) bus.
    pub fn reference(mut self) -> Self {
        self.is_reference = true;
        self
    }

    pub fn with_nominal_kv(mut self, kv: f64) -> Self {
        self.nominal_kv = kv;
        self
    }
}
