//! Per-entity import outcomes.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::decode::DecodeError;
use crate::record::RecordKind;

/// Terminal status of one entity. `Imported` is the only non-rejecting one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ImportStatus {
    Imported { altered: bool },
    IncompleteData { detail: String },
    InconsistentData { detail: String },
    ElementNotFoundInNetwork { detail: String },
    NotForOptimization { detail: String },
    NotYetHandled { detail: String },
    Other { detail: String },
}

impl ImportStatus {
    pub fn is_imported(&self) -> bool {
        matches!(self, ImportStatus::Imported { .. })
    }

    pub fn is_altered(&self) -> bool {
        matches!(self, ImportStatus::Imported { altered: true })
    }

    /// Rejection detail, `None` for imported entities.
    pub fn detail(&self) -> Option<&str> {
        match self {
            ImportStatus::Imported { .. } => None,
            ImportStatus::IncompleteData { detail }
            | ImportStatus::InconsistentData { detail }
            | ImportStatus::ElementNotFoundInNetwork { detail }
            | ImportStatus::NotForOptimization { detail }
            | ImportStatus::NotYetHandled { detail }
            | ImportStatus::Other { detail } => Some(detail),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ImportStatus::Imported { .. } => "IMPORTED",
            ImportStatus::IncompleteData { .. } => "INCOMPLETE_DATA",
            ImportStatus::InconsistentData { .. } => "INCONSISTENCY_IN_DATA",
            ImportStatus::ElementNotFoundInNetwork { .. } => "ELEMENT_NOT_FOUND_IN_NETWORK",
            ImportStatus::NotForOptimization { .. } => "NOT_FOR_RAO",
            ImportStatus::NotYetHandled { .. } => "NOT_YET_HANDLED",
            ImportStatus::Other { .. } => "OTHER",
        }
    }
}

impl fmt::Display for ImportStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.detail() {
            Some(detail) => write!(f, "{}: {}", self.label(), detail),
            None => f.write_str(self.label()),
        }
    }
}

/// Why a resolver refused to build an entity.
///
/// Resolvers short-circuit with `?` on these; they become the rejecting
/// variants of [`ImportStatus`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    IncompleteData(String),
    InconsistentData(String),
    ElementNotFound(String),
    NotForOptimization(String),
    NotYetHandled(String),
    Other(String),
}

impl Rejection {
    pub fn detail(&self) -> &str {
        match self {
            Rejection::IncompleteData(d)
            | Rejection::InconsistentData(d)
            | Rejection::ElementNotFound(d)
            | Rejection::NotForOptimization(d)
            | Rejection::NotYetHandled(d)
            | Rejection::Other(d) => d,
        }
    }
}

impl From<Rejection> for ImportStatus {
    fn from(rejection: Rejection) -> Self {
        match rejection {
            Rejection::IncompleteData(detail) => ImportStatus::IncompleteData { detail },
            Rejection::InconsistentData(detail) => ImportStatus::InconsistentData { detail },
            Rejection::ElementNotFound(detail) => ImportStatus::ElementNotFoundInNetwork { detail },
            Rejection::NotForOptimization(detail) => ImportStatus::NotForOptimization { detail },
            Rejection::NotYetHandled(detail) => ImportStatus::NotYetHandled { detail },
            Rejection::Other(detail) => ImportStatus::Other { detail },
        }
    }
}

impl From<DecodeError> for Rejection {
    fn from(err: DecodeError) -> Self {
        match err {
            DecodeError::Missing { .. } => Rejection::IncompleteData(err.to_string()),
            DecodeError::Invalid { .. } => Rejection::InconsistentData(err.to_string()),
        }
    }
}

/// The terminal record of one entity in the import report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementaryOutcome {
    pub native_id: String,
    pub native_name: String,
    pub kind: RecordKind,
    #[serde(flatten)]
    pub status: ImportStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_id: Option<String>,
    /// Fidelity losses of an altered import, in the order they were found.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub alterations: Vec<String>,
}

impl ElementaryOutcome {
    /// An imported entity; altered iff `alterations` is non-empty.
    pub fn imported(
        kind: RecordKind,
        native_id: impl Into<String>,
        native_name: impl Into<String>,
        created_id: impl Into<String>,
        alterations: Vec<String>,
    ) -> Self {
        Self {
            native_id: native_id.into(),
            native_name: native_name.into(),
            kind,
            status: ImportStatus::Imported {
                altered: !alterations.is_empty(),
            },
            created_id: Some(created_id.into()),
            alterations,
        }
    }

    pub fn rejected(
        kind: RecordKind,
        native_id: impl Into<String>,
        native_name: impl Into<String>,
        rejection: Rejection,
    ) -> Self {
        Self {
            native_id: native_id.into(),
            native_name: native_name.into(),
            kind,
            status: rejection.into(),
            created_id: None,
            alterations: Vec::new(),
        }
    }

    /// Human-readable explanation, `None` for a faithful import.
    pub fn detail(&self) -> Option<String> {
        match self.status.detail() {
            Some(detail) => Some(detail.to_string()),
            None if self.alterations.is_empty() => None,
            None => Some(self.alterations.join(". ")),
        }
    }
}
