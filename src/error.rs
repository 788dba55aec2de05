//! Error types for conversation export operations
//!
//! This module defines the export error taxonomy with a clear split between
//! recoverable outcomes (nothing to export, user cancellation) and aborting
//! failures (missing capability, renderer error).

use thiserror::Error;

/// Result type alias for export operations
pub type ExportResult<T> = Result<T, ExportError>;

/// Error types for export operations
#[derive(Debug, Error)]
pub enum ExportError {
    /// No pairable conversation was found in the source document.
    ///
    /// Recoverable: the caller reports "no conversation found" and takes no
    /// further action. No document mutation or export has happened.
    #[error("no pairable conversation found in the source document")]
    ExtractionEmpty,

    /// The export was cancelled before any work began (empty filename).
    #[error("export cancelled before any work began")]
    Cancelled,

    /// A required external capability failed to load or initialize.
    ///
    /// Propagates and aborts the export; there is no partial-capability
    /// fallback that would produce a half-rendered document.
    #[error("required capability '{capability}' is unavailable: {message}")]
    CapabilityUnavailable {
        capability: &'static str,
        message: String,
    },

    /// The external document renderer rejected the tree or errored.
    ///
    /// The transient rendering surface is still released when this is
    /// returned; cleanup runs on every exit path.
    #[error("document rendering failed: {0}")]
    ExportFailure(String),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// IO error (snapshot read, PDF write)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Other errors
    #[error("export error: {0}")]
    Other(String),
}

impl From<anyhow::Error> for ExportError {
    fn from(err: anyhow::Error) -> Self {
        // Use {:#} to preserve full error chain with context
        Self::Other(format!("{err:#}"))
    }
}

impl ExportError {
    /// Shorthand for a capability-acquisition failure.
    pub fn capability(capability: &'static str, err: impl std::fmt::Display) -> Self {
        Self::CapabilityUnavailable {
            capability,
            message: err.to_string(),
        }
    }
}
