//! Error types for volta-topology.
//!
//! Only malformed requests are errors. Data-quality problems in the network
//! are collected into [`Diagnostics`](crate::Diagnostics) instead.

use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum Error {
    #[error("time index {index} out of range for {steps} time steps")]
    TimeIndexOutOfRange { index: usize, steps: usize },

    #[error("network has no time profiles")]
    NoTimeProfiles,

    #[error("invalid zero-impedance tolerance: {0}")]
    InvalidTolerance(f64),

    #[error("network error: {0}")]
    Network(#[from] volta_core::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
