//! Usage rules: when a remedial action may be activated.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::Instant;

/// How a remedial action is used once its rule applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UsageMethod {
    /// The optimizer may choose to activate it.
    Available,
    /// It is activated automatically whenever the rule applies.
    Forced,
}

/// A condition under which a remedial action is usable.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum UsageRule {
    /// Usable at `instant` in every state.
    OnInstant { instant: Instant, method: UsageMethod },
    /// Usable at `instant` after a given contingency.
    OnContingencyState {
        instant: Instant,
        contingency: String,
        method: UsageMethod,
    },
    /// Usable at `instant` when a given CNEC is constrained.
    OnFlowConstraint {
        instant: Instant,
        cnec: String,
        method: UsageMethod,
    },
}

impl UsageRule {
    pub fn instant(&self) -> Instant {
        match self {
            UsageRule::OnInstant { instant, .. }
            | UsageRule::OnContingencyState { instant, .. }
            | UsageRule::OnFlowConstraint { instant, .. } => *instant,
        }
    }

    pub fn method(&self) -> UsageMethod {
        match self {
            UsageRule::OnInstant { method, .. }
            | UsageRule::OnContingencyState { method, .. }
            | UsageRule::OnFlowConstraint { method, .. } => *method,
        }
    }
}

impl fmt::Display for UsageRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UsageRule::OnInstant { instant, method } => {
                write!(f, "{method:?} at {instant}")
            }
            UsageRule::OnContingencyState {
                instant,
                contingency,
                method,
            } => write!(f, "{method:?} at {instant} after {contingency}"),
            UsageRule::OnFlowConstraint {
                instant,
                cnec,
                method,
            } => write!(f, "{method:?} at {instant} on constraint {cnec}"),
        }
    }
}
