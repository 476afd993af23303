//! Shared test utilities

pub mod distribution;

pub use distribution::*;
