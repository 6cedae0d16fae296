//! Error types for the itinerary planner.
//!
//! Only fatal conditions are errors. Per-item failures ("no candidate",
//! "no room") are ordinary values carried in the result.

use std::time::Duration;

use thiserror::Error;

use crate::solver::Phase;

/// Fatal errors surfaced to the caller of [`crate::solver::optimize`].
#[derive(Debug, Error)]
pub enum PlanError {
    /// The request cannot be planned at all (e.g. no fixed items).
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// An internal invariant broke; no partial plan is returned.
    #[error("optimization failed during {phase}: {message}")]
    OptimizationFailure { phase: Phase, message: String },
}

/// Failure of an external collaborator (place search or travel estimation).
///
/// These never abort a run; the orchestrator absorbs them locally.
#[derive(Debug, Error)]
pub enum CollaboratorError {
    #[error("collaborator unavailable: {0}")]
    Unavailable(String),

    #[error("collaborator timed out after {0:?}")]
    Timeout(Duration),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected response: {0}")]
    Decode(String),
}

/// Configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

pub type Result<T> = std::result::Result<T, PlanError>;
