//! Error types for the security model.
//!
//! The model validates almost nothing on commit: the only refusals are
//! identity clashes and unknown vocabulary terms. I/O-facing loaders return
//! `anyhow::Result` with context instead.

use thiserror::Error;

use crate::EntityKind;

/// Errors raised while committing entities to a [`crate::SecurityModel`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ModelError {
    /// An entity with the same id is already committed for this kind.
    #[error("{kind} with id {id} already exists")]
    DuplicateEntity { kind: EntityKind, id: String },

    /// Instant name outside preventive/outage/auto/curative.
    #[error("Unknown instant: {0}")]
    UnknownInstant(String),
}

/// Convenience type alias for Results using ModelError.
pub type ModelResult<T> = Result<T, ModelError>;
