//! Error types for volta-core.

use thiserror::Error;

use crate::id::{BranchId, BusId, DeviceId};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
    #[error("duplicate bus id: {0}")]
    DuplicateBus(BusId),

    #[error("duplicate branch id: {0}")]
    DuplicateBranch(BranchId),

    #[error("duplicate device id: {0}")]
    DuplicateDevice(DeviceId),

    #[error("{element}: activity profile has {actual} steps, graph has {expected}")]
    ProfileLength {
        element: String,
        expected: usize,
        actual: usize,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
