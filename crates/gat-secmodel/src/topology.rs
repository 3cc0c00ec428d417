//! Network topology lookups.
//!
//! Importers only need to know whether an element exists and a handful of
//! its static attributes. [`NetworkTopology`] is the seam; [`InMemoryTopology`]
//! is a serde-loadable implementation used by the CLI and tests.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Coarse classification of a network element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElementKind {
    Line,
    TieLine,
    Transformer,
    PhaseShifter,
    Switch,
    HvdcLine,
    Generator,
    Load,
    Bus,
}

impl ElementKind {
    /// Elements whose flow can be monitored or whose breakers can be operated.
    pub fn is_branch(self) -> bool {
        matches!(
            self,
            ElementKind::Line
                | ElementKind::TieLine
                | ElementKind::Transformer
                | ElementKind::PhaseShifter
        )
    }

    pub fn is_injection(self) -> bool {
        matches!(self, ElementKind::Generator | ElementKind::Load)
    }
}

/// Static attributes of one network element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementAttributes {
    pub kind: ElementKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nominal_voltage_kv: Option<f64>,
    /// Permanent admissible current, amperes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_limit_a: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initial_tap: Option<i32>,
}

impl ElementAttributes {
    pub fn new(kind: ElementKind) -> Self {
        Self {
            kind,
            nominal_voltage_kv: None,
            current_limit_a: None,
            initial_tap: None,
        }
    }

    pub fn with_nominal_voltage(mut self, kv: f64) -> Self {
        self.nominal_voltage_kv = Some(kv);
        self
    }

    pub fn with_current_limit(mut self, amps: f64) -> Self {
        self.current_limit_a = Some(amps);
        self
    }

    pub fn with_initial_tap(mut self, tap: i32) -> Self {
        self.initial_tap = Some(tap);
        self
    }
}

/// Read-only view of the network the import is resolved against.
pub trait NetworkTopology {
    fn attributes_of(&self, element_id: &str) -> Option<&ElementAttributes>;

    fn exists(&self, element_id: &str) -> bool {
        self.attributes_of(element_id).is_some()
    }
}

/// Topology backed by an id-ordered map.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InMemoryTopology {
    #[serde(default)]
    pub elements: BTreeMap<String, ElementAttributes>,
}

impl InMemoryTopology {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_element(mut self, id: impl Into<String>, attrs: ElementAttributes) -> Self {
        self.insert(id, attrs);
        self
    }

    pub fn insert(&mut self, id: impl Into<String>, attrs: ElementAttributes) {
        self.elements.insert(id.into(), attrs);
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}

impl NetworkTopology for InMemoryTopology {
    fn attributes_of(&self, element_id: &str) -> Option<&ElementAttributes> {
        self.elements.get(element_id)
    }
}

/// Load a topology from a JSON file of shape `{"elements": {"id": {...}}}`.
pub fn load_topology(path: &Path) -> Result<InMemoryTopology> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("reading network topology '{}'", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("parsing network topology '{}'", path.display()))
}
