//! Topology resolution and numerical-circuit compilation.
//!
//! Takes a [`NetworkGraph`](volta_core::NetworkGraph) at one time step and
//! produces one [`NumericalCircuit`] per electrically connected island:
//!
//! 1. Buses joined by closed zero-impedance switches are merged
//!    ([`reduce`](reduce::reduce)).
//! 2. The merged, active buses are partitioned into islands over the
//!    impedance-bearing branches ([`resolve_islands`]).
//! 3. Every island is sliced into dense, locally indexed tables.
//!
//! Problems with the network data never abort a compilation; they are
//! collected in [`Diagnostics`].
//!
//! # Example
//!
//! ```
//! use num_complex::Complex64 as C64;
//! use volta_core::{Branch, Bus, NetworkGraph};
//! use volta_topology::{CompileRequest, compile};
//!
//! let graph = NetworkGraph::from_parts(
//!     0,
//!     [Bus::new(0).reference(), Bus::new(1), Bus::new(2)],
//!     [Branch::switch(0, 0, 1), Branch::new(1, 1, 2, C64::new(0.0, 0.1))],
//!     [],
//! )
//! .unwrap();
//!
//! let out = compile(&graph, &CompileRequest::snapshot()).unwrap();
//! assert_eq!(out.island_count(), 1);
//! assert_eq!(out.circuits()[0].bus_count(), 2);
//! ```

pub mod adjacency;
pub mod cache;
pub mod circuit;
pub mod compare;
pub mod compile;
pub mod config;
pub mod csr;
pub mod diagnostics;
pub mod error;
pub mod islands;
pub mod reduce;
pub mod resolve;
pub mod series;
mod slice;
mod snapshot;

pub use adjacency::{Link, LinkFilter, build_adjacency};
pub use cache::{CacheKey, CompilationCache};
pub use circuit::{BranchTable, BusTable, DeviceTable, NumericalCircuit};
pub use compare::{CompareTolerances, Mismatch, values_match};
pub use compile::{Compilation, compile, partition};
pub use config::{
    AdjacencyStrategy, CompileConfig, CompileRequest, IslandLinks, ReferencePolicy,
    RepresentativePolicy,
};
pub use csr::Csr;
pub use diagnostics::{
    DegenerateReduction, Diagnostics, DroppedBranch, ElementRef, MergedGroup, OrphanReason,
    OrphanedDevice, StructuralError, UnsolvableIsland,
};
pub use error::{Error, Result};
pub use islands::find_islands;
pub use resolve::{Island, resolve_islands};
pub use series::{
    ParallelConfig, TimeSeriesCompilation, TopologyStates, compile_states, compile_time_series,
};
