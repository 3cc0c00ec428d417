//! Grouped remedial actions.
//!
//! A group materializes as one network action combining its members, and
//! only if every member was itself imported in the same pass. Members are
//! never affected by the fate of a group.

use std::collections::BTreeSet;

use gat_secmodel::{
    ElementaryAction, RemedialAction, RemedialActionKind, SecurityModelView, UsageRule,
};
use petgraph::graphmap::DiGraphMap;
use petgraph::Direction;

use crate::record::{attr, EffectiveRecord, ReferenceRole};
use crate::report::ImportReport;
use crate::resolve::{Built, Entity, Resolution};
use crate::status::Rejection;

/// Resolve every group against the elementary outcomes of this pass.
///
/// Must run after all elementary remedial actions have been committed.
pub fn resolve_groups<M>(
    groups: &[&EffectiveRecord],
    report: &ImportReport,
    model: &M,
) -> Vec<Resolution>
where
    M: SecurityModelView + ?Sized,
{
    // Dependency edges group -> member, in declaration order
    let mut dependencies: DiGraphMap<&str, ()> = DiGraphMap::new();
    for group in groups {
        dependencies.add_node(group.id.as_str());
        for member in group.reference_ids(ReferenceRole::Member) {
            dependencies.add_edge(group.id.as_str(), member, ());
        }
    }
    let group_ids: BTreeSet<&str> = groups.iter().map(|g| g.id.as_str()).collect();

    groups
        .iter()
        .map(|group| {
            let members: Vec<&str> = dependencies
                .neighbors_directed(group.id.as_str(), Direction::Outgoing)
                .collect();
            let result = build_group(group, &members, &group_ids, report, model);
            Resolution::new(group, result)
        })
        .collect()
}

fn build_group<M>(
    group: &EffectiveRecord,
    members: &[&str],
    group_ids: &BTreeSet<&str>,
    report: &ImportReport,
    model: &M,
) -> Result<Built, Rejection>
where
    M: SecurityModelView + ?Sized,
{
    if members.is_empty() {
        return Err(Rejection::IncompleteData(format!(
            "Remedial action group {} lists no remedial action",
            group.id
        )));
    }

    let mut imported: Vec<&RemedialAction> = Vec::with_capacity(members.len());
    for member in members {
        let committed = report
            .outcome_for(member)
            .filter(|outcome| outcome.status.is_imported() && !group_ids.contains(member))
            .and_then(|_| model.remedial_action(member));
        match committed {
            Some(action) => imported.push(action),
            None => {
                return Err(Rejection::NotForOptimization(format!(
                    "Remedial action group {} will not be imported because the remedial action {} does not exist or not imported",
                    group.id, member
                )))
            }
        }
    }

    let mut elementary_actions: Vec<ElementaryAction> = Vec::new();
    let mut usage_rules: Vec<UsageRule> = Vec::new();
    for action in &imported {
        let Some(actions) = action.elementary_actions() else {
            return Err(Rejection::InconsistentData(format!(
                "Remedial action group {} cannot contain the range action {}",
                group.id, action.id
            )));
        };
        for elementary in actions {
            if !elementary_actions.contains(elementary) {
                elementary_actions.push(elementary.clone());
            }
        }
        for rule in &action.usage_rules {
            if !usage_rules.contains(rule) {
                usage_rules.push(rule.clone());
            }
        }
    }

    let composite = RemedialAction {
        id: group.id.clone(),
        name: group.display_name().to_string(),
        operator: group.attribute(attr::OPERATOR).map(str::to_string),
        action: RemedialActionKind::Network { elementary_actions },
        usage_rules,
    };
    Ok(Built::new(Entity::RemedialAction(composite), Vec::new()))
}
