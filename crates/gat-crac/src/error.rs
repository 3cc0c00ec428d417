//! Fatal errors of an import pass.
//!
//! Entity-level failures are never errors: they end up as outcomes in the
//! [`crate::ImportReport`]. What remains here is structural.

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::validity::WindowError;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReportError {
    /// A second outcome for the same native id.
    #[error("an outcome is already recorded for {0}")]
    DuplicateOutcome(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PipelineError {
    #[error("Invalid dataset interval: {0}")]
    InvalidDatasetInterval(#[from] WindowError),

    #[error("Snapshot time {snapshot} is outside the dataset interval [{start}, {end})")]
    SnapshotOutsideDataset {
        snapshot: DateTime<Utc>,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },

    #[error("Report error: {0}")]
    Report(#[from] ReportError),
}

/// Convenience type alias for Results using PipelineError.
pub type PipelineResult<T> = Result<T, PipelineError>;
