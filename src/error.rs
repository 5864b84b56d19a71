//! Error types for the simulation core
//!
//! Geometry, culling and input handling are total and never fail. The only
//! runtime failure source is a pattern runner; tuning errors surface at load
//! time, before a run starts.

/// Fault reported by a pattern runner or pattern source
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum PatternError {
    /// Pattern data failed validation when it was bound
    #[error("pattern {index} is invalid: {reason}")]
    Invalid { index: usize, reason: String },

    /// The encounter asked for a pattern the source does not have
    #[error("pattern index {index} out of range ({count} patterns)")]
    OutOfRange { index: usize, count: usize },

    /// Scripting/data fault raised while advancing a runner
    #[error("pattern runner fault: {0}")]
    Fault(String),
}

/// Error loading or validating configuration (tuning or pattern files)
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// IO error from filesystem
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed JSON
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Values that would break simulation invariants
    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Fatal error for the current run
///
/// The tick loop aborts on any of these; there is no partial recovery.
#[derive(thiserror::Error, Debug)]
pub enum SimError {
    /// A pattern runner failed while binding or advancing
    #[error("Pattern error: {0}")]
    Pattern(#[from] PatternError),

    /// Invalid configuration
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
}

/// Result type for simulation operations
pub type Result<T> = std::result::Result<T, SimError>;
