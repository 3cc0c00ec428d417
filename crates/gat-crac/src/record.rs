//! Normalized input records.
//!
//! A record is what a wire-format decoder produces for one business entity:
//! a kind tag, a business id, coded string attributes and nested references
//! to other entities or network elements. Records never change once read.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::validity::ValidityWindow;

/// Attribute keys understood by the resolvers.
pub mod attr {
    pub const MUST_STUDY: &str = "must_study";
    pub const ENABLED: &str = "enabled";
    pub const AVAILABLE: &str = "available";
    pub const OPERATOR: &str = "operator";
    pub const OPTIMIZATION_STATUS: &str = "optimization_status";
    pub const APPLICATION_MODE: &str = "application_mode";
    pub const AVAILABILITY: &str = "availability";

    // Registered-resource references
    pub const PSR_TYPE: &str = "psr_type";
    pub const MARKET_OBJECT_STATUS: &str = "market_object_status";
    pub const UNIT: &str = "unit";
    pub const MIN_CAPACITY: &str = "min_capacity";
    pub const MAX_CAPACITY: &str = "max_capacity";
    pub const DEFAULT_CAPACITY: &str = "default_capacity";

    // Measurement references
    pub const MEASUREMENT_TYPE: &str = "measurement_type";
    pub const THRESHOLD: &str = "threshold";
    pub const DIRECTION: &str = "direction";
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordKind {
    Contingency,
    MonitoredElement,
    RemedialAction,
    RemedialActionGroup,
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RecordKind::Contingency => "contingency",
            RecordKind::MonitoredElement => "monitored element",
            RecordKind::RemedialAction => "remedial action",
            RecordKind::RemedialActionGroup => "remedial action group",
        })
    }
}

/// What a nested reference points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReferenceRole {
    /// A network element in the topology.
    NetworkElement,
    /// A contingency imported earlier in the pass.
    Contingency,
    /// The business id of a monitored element.
    MonitoredSeries,
    /// A network element acted upon by a remedial action.
    RegisteredResource,
    /// A flow measurement of a monitored element.
    Measurement,
    /// An elementary remedial action of a group.
    Member,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementRef {
    pub role: ReferenceRole,
    pub id: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<String, String>,
}

impl ElementRef {
    pub fn new(role: ReferenceRole, id: impl Into<String>) -> Self {
        Self {
            role,
            id: id.into(),
            attributes: BTreeMap::new(),
        }
    }

    pub fn with_attribute(mut self, key: &str, value: impl Into<String>) -> Self {
        self.attributes.insert(key.to_string(), value.into());
        self
    }

    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedRecord {
    pub kind: RecordKind,
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<String, String>,
    /// `None` means "not declared", which for an override leaves the base
    /// references in place. An empty list is a declaration of no references.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub references: Option<Vec<ElementRef>>,
    /// Own applicability window of an override assertion.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub window: Option<ValidityWindow>,
}

impl NormalizedRecord {
    pub fn new(kind: RecordKind, id: impl Into<String>) -> Self {
        Self {
            kind,
            id: id.into(),
            name: None,
            attributes: BTreeMap::new(),
            references: None,
            window: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_attribute(mut self, key: &str, value: impl Into<String>) -> Self {
        self.attributes.insert(key.to_string(), value.into());
        self
    }

    pub fn with_reference(mut self, reference: ElementRef) -> Self {
        self.references.get_or_insert_with(Vec::new).push(reference);
        self
    }

    pub fn with_window(mut self, window: ValidityWindow) -> Self {
        self.window = Some(window);
        self
    }
}

/// A record after override merging, tagged with where it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct EffectiveRecord {
    pub kind: RecordKind,
    pub id: String,
    pub name: Option<String>,
    pub attributes: BTreeMap<String, String>,
    pub references: Vec<ElementRef>,
    /// Document holding the base definition.
    pub source: String,
    /// Documents whose overrides were applied, in application order.
    pub overridden_by: Vec<String>,
}

impl EffectiveRecord {
    /// Effective record of a base definition without overrides.
    pub fn from_base(base: &NormalizedRecord, source: &str) -> Self {
        Self {
            kind: base.kind,
            id: base.id.clone(),
            name: base.name.clone(),
            attributes: base.attributes.clone(),
            references: base.references.clone().unwrap_or_default(),
            source: source.to_string(),
            overridden_by: Vec::new(),
        }
    }

    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.id)
    }

    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }

    pub fn references_with(&self, role: ReferenceRole) -> impl Iterator<Item = &ElementRef> {
        self.references.iter().filter(move |r| r.role == role)
    }

    /// Ids of references with `role`, deduplicated in declaration order.
    pub fn reference_ids(&self, role: ReferenceRole) -> Vec<&str> {
        let mut ids: Vec<&str> = Vec::new();
        for r in self.references_with(role) {
            if !ids.contains(&r.id.as_str()) {
                ids.push(&r.id);
            }
        }
        ids
    }
}
