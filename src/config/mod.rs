//! Configuration module for conversation export
//!
//! This module provides the `ExportConfig` struct and its type-safe builder
//! for configuring export operations with validation and sensible defaults.

// Sub-modules
pub mod builder;
pub mod getters;
pub mod types;

// Re-exports for public API
pub use builder::{Complete, ExportConfigBuilder};
pub use types::ExportConfig;
