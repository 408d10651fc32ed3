//! Error types for the render pipeline

use thiserror::Error;

/// Errors surfaced by configuration, analysis, synthesis and the job layer
///
/// `Clone` and `PartialEq` so errors can travel inside job events and tests
/// can match on exact failures.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RenderError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Signal too short: need at least {needed} samples, got {got}")]
    InsufficientSignal { needed: usize, got: usize },

    #[error("Spectral transform failed: {0}")]
    TransformFailure(String),

    #[error("Allocation failed: {0}")]
    ResourceExhaustion(String),

    #[error("Render cancelled")]
    Cancelled,
}
