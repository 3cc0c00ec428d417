//! Datasets: the unit handed to one import pass.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::record::NormalizedRecord;
use crate::validity::ValidityWindow;

/// Role of a source document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentProfile {
    /// Base definitions of entities.
    #[default]
    Definition,
    /// Time-bound override assertions on existing entities.
    SteadyStateInstruction,
}

/// One source sub-document and the records it defines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceDocument {
    pub id: String,
    #[serde(default)]
    pub profile: DocumentProfile,
    #[serde(flatten)]
    pub window: ValidityWindow,
    #[serde(default)]
    pub records: Vec<NormalizedRecord>,
}

impl SourceDocument {
    pub fn new(id: impl Into<String>, profile: DocumentProfile, window: ValidityWindow) -> Self {
        Self {
            id: id.into(),
            profile,
            window,
            records: Vec::new(),
        }
    }

    pub fn with_record(mut self, record: NormalizedRecord) -> Self {
        self.records.push(record);
        self
    }
}

/// All source documents for one import, with the dataset's overall interval.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    #[serde(default)]
    pub documents: Vec<SourceDocument>,
}

impl Dataset {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self {
            start,
            end,
            documents: Vec::new(),
        }
    }

    pub fn with_document(mut self, document: SourceDocument) -> Self {
        self.documents.push(document);
        self
    }

    pub fn interval(&self) -> ValidityWindow {
        ValidityWindow::bounded(self.start, self.end)
    }

    pub fn record_count(&self) -> usize {
        self.documents.iter().map(|d| d.records.len()).sum()
    }
}

/// Load a dataset from a JSON file.
pub fn load_dataset(path: &Path) -> Result<Dataset> {
    let content =
        fs::read_to_string(path).with_context(|| format!("reading dataset '{}'", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("parsing dataset '{}'", path.display()))
}
