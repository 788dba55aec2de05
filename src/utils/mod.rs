//! Shared utilities and constants

pub mod constants;
pub mod dom;

pub use constants::*;
