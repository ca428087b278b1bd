//! # Core Error Types
//!
//! All errors that can occur while building the particle field, editing
//! tunables or loading configuration.

use thiserror::Error;

use crate::tunables::ParameterId;

/// Errors that can occur in the portal core.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PortalError {
    /// The particle field must contain at least one particle.
    #[error("particle count must be positive, got {0}")]
    InvalidParticleCount(usize),

    /// Position and scale buffers must be parallel-indexed.
    #[error("particle buffers disagree: {positions} positions, {scales} scales")]
    MismatchedParticleBuffers {
        /// Number of positions supplied.
        positions: usize,
        /// Number of scales supplied.
        scales: usize,
    },

    /// A colour string could not be parsed.
    #[error("invalid colour {0:?}, expected #rrggbb")]
    InvalidColor(String),

    /// A value of the wrong kind was written to a tunable.
    #[error("parameter {id:?} expects a {expected} value")]
    ParameterKind {
        /// The parameter that was written.
        id: ParameterId,
        /// The kind of value it accepts.
        expected: &'static str,
    },

    /// Invalid configuration file.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Reading a file failed.
    #[error("failed to read {path}: {reason}")]
    Io {
        /// File that was being read.
        path: String,
        /// Underlying I/O error message.
        reason: String,
    },
}

/// Result type for core operations.
pub type PortalResult<T> = Result<T, PortalError>;
