//! # Volta
//!
//! Topology resolution and numerical-circuit compilation for electrical
//! networks.
//!
//! Volta takes a network of buses, branches and devices, evaluates which
//! elements are in service at a given time step, collapses closed
//! zero-impedance switches, splits the result into electrical islands and
//! emits one densely indexed [`NumericalCircuit`] per island, ready for a
//! power-flow or short-circuit solver.
//!
//! ## Quick Start
//!
//! ```rust
//! use volta::prelude::*;
//!
//! let graph = NetworkGraph::from_parts(
//!     0,
//!     [Bus::new(1).reference(), Bus::new(2), Bus::new(3)],
//!     [
//!         Branch::new(10, 1, 2, Complex::new(0.01, 0.1)),
//!         Branch::switch(11, 2, 3),
//!     ],
//!     [Device::load(20, 3, Complex::new(5.0, 1.0))],
//! )
//! .unwrap();
//!
//! let out = compile(&graph, &CompileRequest::snapshot()).unwrap();
//! let nc = &out.circuits()[0];
//! assert_eq!(nc.bus_count(), 2);
//! assert_eq!(nc.local_index(BusId::new(3)), Some(1));
//! assert!(!out.diagnostics().has_warnings());
//! ```
//!
//! ## Time Series
//!
//! ```rust,ignore
//! use volta::prelude::*;
//!
//! let config = CompileConfig::default();
//! let series = compile_time_series(&graph, &config, &ParallelConfig::default())?;
//! for t in 0..series.time_steps() {
//!     let compilation = series.at(t).unwrap();
//!     // solve each island of `compilation`
//! }
//! ```

// Re-export member crates
pub use volta_core as core;
pub use volta_topology as topology;

// ============================================================================
// Convenient re-exports from volta_core
// ============================================================================

pub use volta_core::{
    Activity,
    Branch,
    BranchId,
    Bus,
    BusId,
    Device,
    DeviceId,
    DeviceKind,
    Element,
    // Errors
    Error as NetworkError,
    // Arena
    NetworkGraph,
    Terminals,
};

// ============================================================================
// Convenient re-exports from volta_topology
// ============================================================================

pub use volta_topology::{
    AdjacencyStrategy,
    // Cache
    CacheKey,
    // Comparison
    CompareTolerances,
    // Compilation
    Compilation,
    CompilationCache,
    CompileConfig,
    CompileRequest,
    // Diagnostics
    Diagnostics,
    // Errors
    Error as CompileError,
    IslandLinks,
    Mismatch,
    NumericalCircuit,
    OrphanReason,
    // Time series
    ParallelConfig,
    ReferencePolicy,
    RepresentativePolicy,
    TimeSeriesCompilation,
    TopologyStates,
    compile,
    compile_time_series,
};

/// Re-export of num_complex's Complex type.
pub use num_complex::Complex;

// ============================================================================
// Prelude module for convenient imports
// ============================================================================

/// Prelude module containing commonly used types and functions.
///
/// ```rust
/// use volta::prelude::*;
/// ```
pub mod prelude {
    // Records
    pub use crate::{Activity, Branch, BranchId, Bus, BusId, Device, DeviceId, DeviceKind};

    // Arena
    pub use crate::NetworkGraph;

    // Compilation
    pub use crate::{Compilation, CompileConfig, CompileRequest, NumericalCircuit, compile};

    // Time series
    pub use crate::{ParallelConfig, compile_time_series};

    // Diagnostics
    pub use crate::Diagnostics;

    // Common external types
    pub use crate::Complex;
}

#[cfg(test)]
mod tests {
    use super::prelude::*;

    #[test]
    fn test_compile_through_facade() {
        let graph = NetworkGraph::from_parts(
            0,
            [Bus::new(0).reference(), Bus::new(1)],
            [Branch::new(0, 0, 1, Complex::new(0.0, 0.1))],
            [],
        )
        .unwrap();
        let out = compile(&graph, &CompileRequest::snapshot()).unwrap();
        assert_eq!(out.island_count(), 1);
    }

    #[test]
    fn test_diagnostics_serialize() {
        let graph = NetworkGraph::from_parts(
            0,
            [Bus::new(0), Bus::new(1)],
            [Branch::new(0, 0, 5, Complex::new(0.0, 0.1))],
            [],
        )
        .unwrap();
        let out = compile(&graph, &CompileRequest::snapshot()).unwrap();
        let json = serde_json::to_value(out.diagnostics()).unwrap();
        assert_eq!(json["structural_errors"].as_array().map(Vec::len), Some(1));
        assert_eq!(json["unsolvable_islands"].as_array().map(Vec::len), Some(2));
    }
}
