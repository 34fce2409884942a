//! Network records and the graph arena for Volta.
//!
//! This crate provides the data model every Volta compilation reads:
//! buses, branches and devices stored as plain records in a
//! [`NetworkGraph`] arena, addressed by stable integer ids.

pub mod activity;
pub mod branch;
pub mod bus;
pub mod device;
pub mod element;
pub mod error;
pub mod graph;
pub mod id;

pub use activity::Activity;
pub use branch::Branch;
pub use bus::Bus;
pub use device::{Device, DeviceKind, Terminals};
pub use element::Element;
pub use error::{Error, Result};
pub use graph::NetworkGraph;
pub use id::{BranchId, BusId, DeviceId};
