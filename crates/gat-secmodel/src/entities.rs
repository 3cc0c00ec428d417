//! Entities committed to the security model.
//!
//! These are plain data: every consistency rule is enforced by whoever
//! builds them, never here.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{Instant, UsageRule};

/// Which arena an entity lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Contingency,
    Cnec,
    RemedialAction,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            EntityKind::Contingency => "contingency",
            EntityKind::Cnec => "cnec",
            EntityKind::RemedialAction => "remedial action",
        })
    }
}

// ============================================================================
// Contingencies
// ============================================================================

/// A set of network elements tripped together.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contingency {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operator: Option<String>,
    pub network_elements: Vec<String>,
}

impl Contingency {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        network_elements: Vec<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            operator: None,
            network_elements,
        }
    }

    pub fn with_operator(mut self, operator: Option<String>) -> Self {
        self.operator = operator;
        self
    }
}

// ============================================================================
// CNECs
// ============================================================================

/// Unit of a flow threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThresholdUnit {
    Megawatt,
    Ampere,
    PercentImax,
}

/// Which flow direction a threshold constrains.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlowSide {
    Direct,
    Opposite,
    Both,
}

/// A flow limit on a monitored branch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlowThreshold {
    pub unit: ThresholdUnit,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
}

impl FlowThreshold {
    /// Builds the bound(s) a limit imposes for a given direction.
    pub fn for_side(unit: ThresholdUnit, limit: f64, side: FlowSide) -> Self {
        let (min, max) = match side {
            FlowSide::Direct => (None, Some(limit)),
            FlowSide::Opposite => (Some(-limit), None),
            FlowSide::Both => (Some(-limit), Some(limit)),
        };
        Self { unit, min, max }
    }
}

/// A monitored branch paired with an operating state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cnec {
    pub id: String,
    pub name: String,
    /// Business id of the monitored series this CNEC was created from.
    pub monitored_series: String,
    pub network_element: String,
    pub instant: Instant,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contingency: Option<String>,
    pub thresholds: Vec<FlowThreshold>,
    pub nominal_voltage_kv: f64,
    /// Taken into account by the optimizer's objective.
    pub optimized: bool,
    /// Only checked to not get worse (MNEC).
    pub monitored: bool,
}

// ============================================================================
// Remedial actions
// ============================================================================

/// How a PST tap range is expressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TapRangeKind {
    Absolute,
    RelativeToInitialNetwork,
    RelativeToPreviousInstant,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PstRangeAction {
    pub network_element: String,
    pub range_kind: TapRangeKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_tap: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tap: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HvdcRange {
    pub network_element: String,
    pub min_mw: f64,
    pub max_mw: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HvdcRangeAction {
    pub ranges: Vec<HvdcRange>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SwitchState {
    Open,
    Close,
}

/// One atomic modification applied by a network action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ElementaryAction {
    Topological {
        network_element: String,
        state: SwitchState,
    },
    PstSetpoint {
        network_element: String,
        tap: i32,
    },
    InjectionSetpoint {
        network_element: String,
        setpoint_mw: f64,
    },
}

impl ElementaryAction {
    pub fn network_element(&self) -> &str {
        match self {
            ElementaryAction::Topological {
                network_element, ..
            }
            | ElementaryAction::PstSetpoint {
                network_element, ..
            }
            | ElementaryAction::InjectionSetpoint {
                network_element, ..
            } => network_element,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RemedialActionKind {
    PstRange(PstRangeAction),
    HvdcRange(HvdcRangeAction),
    Network { elementary_actions: Vec<ElementaryAction> },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemedialAction {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operator: Option<String>,
    pub action: RemedialActionKind,
    pub usage_rules: Vec<UsageRule>,
}

impl RemedialAction {
    /// Elementary actions of a network action, `None` for range actions.
    pub fn elementary_actions(&self) -> Option<&[ElementaryAction]> {
        match &self.action {
            RemedialActionKind::Network { elementary_actions } => Some(elementary_actions),
            RemedialActionKind::PstRange(_) | RemedialActionKind::HvdcRange(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_threshold_sides() {
        let direct = FlowThreshold::for_side(ThresholdUnit::Megawatt, 500.0, FlowSide::Direct);
        assert_eq!((direct.min, direct.max), (None, Some(500.0)));

        let opposite = FlowThreshold::for_side(ThresholdUnit::Ampere, 300.0, FlowSide::Opposite);
        assert_eq!((opposite.min, opposite.max), (Some(-300.0), None));

        let both = FlowThreshold::for_side(ThresholdUnit::PercentImax, 80.0, FlowSide::Both);
        assert_eq!((both.min, both.max), (Some(-80.0), Some(80.0)));
    }

    #[test]
    fn test_elementary_actions_only_for_network_actions() {
        let pst = RemedialAction {
            id: "ra-1".into(),
            name: "pst".into(),
            operator: None,
            action: RemedialActionKind::PstRange(PstRangeAction {
                network_element: "pst-1".into(),
                range_kind: TapRangeKind::Absolute,
                min_tap: Some(-10),
                max_tap: Some(10),
            }),
            usage_rules: vec![],
        };
        assert!(pst.elementary_actions().is_none());

        let topo = RemedialAction {
            action: RemedialActionKind::Network {
                elementary_actions: vec![ElementaryAction::Topological {
                    network_element: "line-1".into(),
                    state: SwitchState::Open,
                }],
            },
            ..pst
        };
        let actions = topo.elementary_actions().unwrap();
        assert_eq!(actions[0].network_element(), "line-1");
    }
}
