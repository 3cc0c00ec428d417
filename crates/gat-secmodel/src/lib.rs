//! # gat-secmodel: Grid-Security Model
//!
//! The data model consumed by security-constrained optimization: which
//! contingencies to simulate, which branches to monitor in which state, and
//! which remedial actions may be applied when.
//!
//! ## Entities
//!
//! | Entity | Identifies | References |
//! |--------|-----------|------------|
//! | [`Contingency`] | a set of tripped elements | network elements |
//! | [`Cnec`] | a monitored branch in one state | network element, instant, contingency |
//! | [`RemedialAction`] | a PST/HVDC range or network action | network elements, usage rules |
//!
//! ## Arena
//!
//! [`SecurityModel`] stores committed entities in id-ordered maps. Writers go
//! through [`SecurityModelBuilder`], readers through [`SecurityModelView`], so
//! an importer can be written against either side without depending on the
//! storage.
//!
//! ```rust
//! use gat_secmodel::*;
//!
//! let mut model = SecurityModel::new();
//! model
//!     .add_contingency(Contingency::new("co-1", "Trip line 1", vec!["line-1".into()]))
//!     .unwrap();
//! assert!(model.contingency("co-1").is_some());
//! ```
//!
//! ## Topology
//!
//! The network itself is outside this crate; [`NetworkTopology`] exposes the
//! element lookups importers need, with [`InMemoryTopology`] for JSON-described
//! networks.

pub mod entities;
pub mod error;
pub mod instant;
pub mod model;
pub mod topology;
pub mod usage;

pub use entities::*;
pub use error::{ModelError, ModelResult};
pub use instant::Instant;
pub use model::{SecurityModel, SecurityModelBuilder, SecurityModelView};
pub use topology::{
    load_topology, ElementAttributes, ElementKind, InMemoryTopology, NetworkTopology,
};
pub use usage::{UsageMethod, UsageRule};
