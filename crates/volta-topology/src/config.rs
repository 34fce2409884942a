//! Compilation configuration and requests.

use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// How the connectivity relation is assembled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum AdjacencyStrategy {
    /// Accumulate the four entries of every selected link directly.
    Direct,
    /// Build the links×buses incidence pattern and take its Gram product.
    #[default]
    IncidenceProduct,
}

/// Which member of a merge group becomes its representative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum RepresentativePolicy {
    /// The member with the lowest bus id.
    #[default]
    LowestId,
    /// The reference member with the lowest bus id if the group has one,
    /// otherwise the lowest id.
    PreferReference,
}

/// How the reference flag of a merge group is derived from its members.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ReferencePolicy {
    /// The merged bus is a reference bus if any member is one.
    #[default]
    AnyMember,
    /// Only the representative's own flag counts.
    RepresentativeOnly,
}

/// Which two-terminal devices join islands like branches do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IslandLinks {
    /// Voltage source converters link their AC and DC sides.
    pub vsc: bool,
    /// HVDC lines link their two ends.
    pub hvdc: bool,
}

impl Default for IslandLinks {
    fn default() -> Self {
        Self {
            vsc: true,
            hvdc: false,
        }
    }
}

/// Configuration for one compilation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompileConfig {
    /// Impedance magnitude at or below which a reducible branch collapses.
    pub zero_impedance_tol: f64,
    /// Adjacency assembly strategy.
    pub adjacency_strategy: AdjacencyStrategy,
    /// Merge-group representative selection.
    pub representative_policy: RepresentativePolicy,
    /// Merge-group reference flag derivation.
    pub reference_policy: ReferencePolicy,
    /// Devices treated as island links.
    pub island_links: IslandLinks,
    /// Drop islands made of a single bus.
    pub ignore_single_bus_islands: bool,
}

impl Default for CompileConfig {
    fn default() -> Self {
        Self {
            zero_impedance_tol: 1e-9,
            adjacency_strategy: AdjacencyStrategy::default(),
            representative_policy: RepresentativePolicy::default(),
            reference_policy: ReferencePolicy::default(),
            island_links: IslandLinks::default(),
            ignore_single_bus_islands: false,
        }
    }
}

impl CompileConfig {
    pub fn with_zero_impedance_tol(mut self, tol: f64) -> Self {
        self.zero_impedance_tol = tol;
        self
    }

    pub fn with_adjacency_strategy(mut self, strategy: AdjacencyStrategy) -> Self {
        self.adjacency_strategy = strategy;
        self
    }

    pub fn with_representative_policy(mut self, policy: RepresentativePolicy) -> Self {
        self.representative_policy = policy;
        self
    }

    pub fn with_reference_policy(mut self, policy: ReferencePolicy) -> Self {
        self.reference_policy = policy;
        self
    }

    pub fn with_island_links(mut self, links: IslandLinks) -> Self {
        self.island_links = links;
        self
    }

    pub fn ignoring_single_bus_islands(mut self) -> Self {
        self.ignore_single_bus_islands = true;
        self
    }

    /// Reject tolerances that cannot be compared against a magnitude.
    pub fn validate(&self) -> Result<()> {
        let tol = self.zero_impedance_tol;
        if !tol.is_finite() || tol < 0.0 {
            return Err(Error::InvalidTolerance(tol));
        }
        Ok(())
    }

    /// Feed every field into a hasher (the tolerance by bit pattern).
    pub(crate) fn hash_into(&self, h: &mut impl Hasher) {
        self.zero_impedance_tol.to_bits().hash(h);
        self.adjacency_strategy.hash(h);
        self.representative_policy.hash(h);
        self.reference_policy.hash(h);
        self.island_links.hash(h);
        self.ignore_single_bus_islands.hash(h);
    }
}

/// A compilation request: which time step, with which configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompileRequest {
    /// Time step to compile; `None` compiles the snapshot.
    pub time_index: Option<usize>,
    /// Tolerances and policies.
    pub config: CompileConfig,
}

impl CompileRequest {
    /// Compile the snapshot state.
    pub fn snapshot() -> Self {
        Self::default()
    }

    /// Compile the state at time step `t`.
    pub fn at(t: usize) -> Self {
        Self {
            time_index: Some(t),
            config: CompileConfig::default(),
        }
    }

    pub fn with_config(mut self, config: CompileConfig) -> Self {
        self.config = config;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = CompileConfig::default();
        assert_eq!(config.zero_impedance_tol, 1e-9);
        assert_eq!(config.adjacency_strategy, AdjacencyStrategy::IncidenceProduct);
        assert!(config.island_links.vsc);
        assert!(!config.island_links.hvdc);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_tolerance() {
        let bad = CompileConfig::default().with_zero_impedance_tol(-1.0);
        assert_eq!(bad.validate(), Err(Error::InvalidTolerance(-1.0)));
        let nan = CompileConfig::default().with_zero_impedance_tol(f64::NAN);
        assert!(nan.validate().is_err());
        let zero = CompileConfig::default().with_zero_impedance_tol(0.0);
        assert!(zero.validate().is_ok());
    }

    #[test]
    fn test_config_round_trips_through_json() {
        let config = CompileConfig::default()
            .with_representative_policy(RepresentativePolicy::PreferReference)
            .ignoring_single_bus_islands();
        let json = serde_json::to_string(&config).unwrap();
        let back: CompileConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
    }
}
