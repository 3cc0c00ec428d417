//! Temporal validity of source documents.
//!
//! Every source document declares an applicability window. A document whose
//! window is malformed, or does not contain the snapshot time, is dropped as a
//! whole: none of its records reach the resolvers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::dataset::SourceDocument;

/// A half-open `[start, end)` interval whose bounds may be undeclared.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidityWindow {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<DateTime<Utc>>,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WindowError {
    #[error("missing start date")]
    MissingStart,
    #[error("missing end date")]
    MissingEnd,
    #[error("start date {start} is not before end date {end}")]
    Inverted {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },
}

impl ValidityWindow {
    pub fn new(start: Option<DateTime<Utc>>, end: Option<DateTime<Utc>>) -> Self {
        Self { start, end }
    }

    pub fn bounded(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self::new(Some(start), Some(end))
    }

    /// Both bounds, provided the window is well formed.
    pub fn bounds(&self) -> Result<(DateTime<Utc>, DateTime<Utc>), WindowError> {
        let start = self.start.ok_or(WindowError::MissingStart)?;
        let end = self.end.ok_or(WindowError::MissingEnd)?;
        if start >= end {
            return Err(WindowError::Inverted { start, end });
        }
        Ok((start, end))
    }

    /// Whether `instant` lies in `[start, end)`.
    pub fn contains(&self, instant: DateTime<Utc>) -> Result<bool, WindowError> {
        let (start, end) = self.bounds()?;
        Ok(start <= instant && instant < end)
    }
}

/// Why a source document was dropped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RejectedDocument {
    pub source_id: String,
    pub reason: String,
}

/// Result of filtering a dataset's documents.
#[derive(Debug, Default)]
pub struct FilterOutcome<'a> {
    pub kept: Vec<&'a SourceDocument>,
    pub rejected: Vec<RejectedDocument>,
}

/// Keep the documents applicable at `snapshot`.
///
/// Rejection is all-or-nothing per document and is logged once per document.
pub fn filter(documents: &[SourceDocument], snapshot: DateTime<Utc>) -> FilterOutcome<'_> {
    let mut outcome = FilterOutcome::default();
    for document in documents {
        let reason = match document.window.contains(snapshot) {
            Ok(true) => {
                outcome.kept.push(document);
                continue;
            }
            Ok(false) => format!(
                "its dates are not consistent with the import date {}",
                snapshot.to_rfc3339()
            ),
            Err(err) => format!("invalid validity window: {err}"),
        };
        warn!(document = %document.id, "[REMOVED] document will be ignored: {reason}");
        outcome.rejected.push(RejectedDocument {
            source_id: document.id.clone(),
            reason,
        });
    }
    outcome
}
