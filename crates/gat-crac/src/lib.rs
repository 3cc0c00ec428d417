//! # gat-crac: Security-Analysis Import Resolution
//!
//! Turns normalized, vendor-coded records describing contingencies, monitored
//! elements and remedial actions into a consistent [`gat_secmodel::SecurityModel`]
//! for one snapshot time, with an audit trail explaining every entity's fate.
//!
//! ## Pipeline
//!
//! ```text
//! Dataset ──► validity filter ──► assertion merge ──► contingencies
//!                                                       │
//!          groups ◄── remedial actions ◄── CNECs ◄──────┘
//! ```
//!
//! | Stage | Module | Sees |
//! |-------|--------|------|
//! | Validity filter | [`validity`] | document windows |
//! | Assertion merge | [`assertion`] | base definitions + overrides |
//! | Contingencies | [`resolve::contingency`] | topology |
//! | CNECs | [`resolve::cnec`] | topology, contingencies |
//! | Remedial actions | [`resolve::remedial_action`] | topology, contingencies, CNECs |
//! | Groups | [`resolve::group`] | elementary remedial action outcomes |
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use chrono::Utc;
//! use gat_crac::{load_dataset, Pipeline, ImportConfig};
//! use gat_secmodel::load_topology;
//! use std::path::Path;
//!
//! let dataset = load_dataset(Path::new("dataset.json"))?;
//! let topology = load_topology(Path::new("network.json"))?;
//! let run = Pipeline::new(&topology, ImportConfig::default()).run(&dataset, Utc::now())?;
//! for line in run.report.render_text() {
//!     println!("{line}");
//! }
//! # Ok::<(), anyhow::Error>(())
//! ```
//!
//! ## Error Recovery
//!
//! Nothing an entity contains can abort a pass. Each entity ends with exactly
//! one [`ImportStatus`]:
//!
//! - `Imported { altered }`: created, possibly with dropped references
//! - `IncompleteData`: a required attribute or reference is absent
//! - `InconsistentData`: present but contradictory, malformed or over-cardinality
//! - `ElementNotFoundInNetwork`: no referenced network element exists
//! - `NotForOptimization`: valid, but excluded by a flag or a missing group member
//! - `NotYetHandled`: recognized but unsupported (e.g. "shall be used" availability)
//! - `Other`: everything else, always with detail
//!
//! Only the dataset interval itself is fatal: a malformed interval
//! ([`PipelineError::InvalidDatasetInterval`]) or a snapshot time outside it
//! ([`PipelineError::SnapshotOutsideDataset`]).

pub mod assertion;
pub mod config;
pub mod dataset;
pub mod decode;
pub mod error;
pub mod pipeline;
pub mod record;
pub mod refs;
pub mod report;
pub mod resolve;
pub mod status;
pub mod validity;

pub use config::ImportConfig;
pub use dataset::{load_dataset, Dataset, DocumentProfile, SourceDocument};
pub use error::{PipelineError, PipelineResult, ReportError};
pub use pipeline::{run, ImportRun, Pipeline};
pub use record::{attr, ElementRef, NormalizedRecord, RecordKind, ReferenceRole};
pub use report::ImportReport;
pub use status::{ElementaryOutcome, ImportStatus};
pub use validity::{RejectedDocument, ValidityWindow};
