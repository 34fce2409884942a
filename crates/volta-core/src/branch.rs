//! Branch records: lines, transformers and switches.

use num_complex::Complex64 as C64;
use serde::{Deserialize, Serialize};

use crate::activity::Activity;
use crate::id::{BranchId, BusId};

/// An edge between two buses carrying a series impedance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Branch {
    /// Stable identifier.
    pub id: BranchId,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// From-side bus.
    pub from: BusId,
    /// To-side bus.
    pub to: BusId,
    /// Activity flag and optional profile.
    #[serde(default)]
    pub active: Activity,
    /// Eligible for topological collapse when its impedance is negligible.
    #[serde(default)]
    pub reducible: bool,
    /// Series impedance (per unit).
    pub impedance: C64,
    /// Total shunt admittance (per unit).
    #[serde(default)]
    pub shunt_admittance: C64,
    /// Thermal rating in MVA.
    #[serde(default)]
    pub rating: f64,
}

impl Branch {
    /// Create an active, non-reducible branch.
    pub fn new(
        id: impl Into<BranchId>,
        from: impl Into<BusId>,
        to: impl Into<BusId>,
        impedance: C64,
    ) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            from: from.into(),
            to: to.into(),
            active: Activity::default(),
            reducible: false,
            impedance,
            shunt_admittance: C64::new(0.0, 0.0),
            rating: 0.0,
        }
    }

    /// Create a closed switch: reducible with zero impedance.
    pub fn switch(id: impl Into<BranchId>, from: impl Into<BusId>, to: impl Into<BusId>) -> Self {
        Self::new(id, from, to, C64::new(0.0, 0.0)).reducible()
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

    pub fn reducible(mut self) -> Self {
        self.reducible = true;
        self
    }

    pub fn with_shunt_admittance(mut self, y: C64) -> Self {
        self.shunt_admittance = y;
        self
    }

    pub fn with_rating(mut self, rating: f64) -> Self {
        self.rating = rating;
        self
    }
}
