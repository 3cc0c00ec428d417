//! Usage rules derived from an application mode.
//!
//! Each phase implied by the mode is evaluated on its own. A phase must first
//! pass the contingency table in [`contingency_rules`]; flow-constraint rules
//! from the declared monitored series then replace the table's rules when any
//! apply.

use std::collections::BTreeSet;

use gat_secmodel::{Instant, NetworkTopology, SecurityModelView, UsageMethod, UsageRule};

use crate::decode::ApplicationMode;
use crate::record::{EffectiveRecord, ReferenceRole};
use crate::refs::{ContingencyResolution, ReferenceResolver, ResolvedCnec};
use crate::status::Rejection;

/// A phase at which a remedial action can be declared usable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Preventive,
    Auto,
    Curative,
}

impl Phase {
    pub fn instant(self) -> Instant {
        match self {
            Phase::Preventive => Instant::Preventive,
            Phase::Auto => Instant::Auto,
            Phase::Curative => Instant::Curative,
        }
    }

    /// Automatic actions are forced; the others are left to the optimizer.
    pub fn method(self) -> UsageMethod {
        match self {
            Phase::Auto => UsageMethod::Forced,
            Phase::Preventive | Phase::Curative => UsageMethod::Available,
        }
    }

    /// CNEC instants a flow-constraint rule of this phase may target.
    fn accepts_cnec_at(self, instant: Instant) -> bool {
        match self {
            Phase::Preventive => instant != Instant::Auto,
            Phase::Auto => instant == Instant::Auto,
            Phase::Curative => instant == Instant::Curative,
        }
    }
}

/// Rules of one phase from the contingency declarations alone.
///
/// The table is keyed on `(phase, nothing resolved, something failed)`.
pub fn contingency_rules(
    phase: Phase,
    contingencies: &ContingencyResolution,
) -> Result<Vec<UsageRule>, Rejection> {
    let instant = phase.instant();
    let method = phase.method();
    let on_states = || -> Vec<UsageRule> {
        contingencies
            .resolved
            .iter()
            .map(|co| UsageRule::OnContingencyState {
                instant,
                contingency: co.clone(),
                method,
            })
            .collect()
    };

    match (phase, contingencies.resolved.is_empty(), contingencies.any_failed()) {
        (Phase::Preventive, true, false) => Ok(vec![UsageRule::OnInstant { instant, method }]),
        (Phase::Preventive, false, _) | (Phase::Preventive, true, true) => {
            Err(Rejection::InconsistentData(
                "Cannot create a preventive remedial action associated to a contingency"
                    .to_string(),
            ))
        }
        (Phase::Curative, false, _) | (Phase::Auto, false, _) => Ok(on_states()),
        (Phase::Curative, true, false) => Ok(vec![UsageRule::OnInstant { instant, method }]),
        (Phase::Curative, true, true) => Err(Rejection::InconsistentData(
            "Contingencies are all invalid, and usage rule is on curative instant".to_string(),
        )),
        (Phase::Auto, true, true) => Err(Rejection::InconsistentData(
            "Contingencies are all invalid, and usage rule is on auto instant".to_string(),
        )),
        (Phase::Auto, true, false) => Err(Rejection::InconsistentData(
            "Cannot create a free-to-use remedial action at instant auto".to_string(),
        )),
    }
}

/// Derive every usage rule of a remedial action.
///
/// A curative failure of a preventive-and-curative action only drops the
/// curative rules and is recorded in `alterations`.
pub fn derive_usage_rules<T, M>(
    mode: ApplicationMode,
    record: &EffectiveRecord,
    refs: &ReferenceResolver<'_, T, M>,
    alterations: &mut Vec<String>,
) -> Result<Vec<UsageRule>, Rejection>
where
    T: NetworkTopology + ?Sized,
    M: SecurityModelView + ?Sized,
{
    let contingencies =
        refs.resolve_contingencies(record.reference_ids(ReferenceRole::Contingency));
    let cnecs = declared_cnecs(record, refs, &contingencies);
    let series = record.reference_ids(ReferenceRole::MonitoredSeries);
    if !series.is_empty() && cnecs.is_empty() {
        alterations.push(format!(
            "monitored series {} matched no imported CNEC",
            series.join(", ")
        ));
    }

    let mut rules = match mode {
        ApplicationMode::Preventive => {
            phase_rules(Phase::Preventive, &contingencies, &cnecs, alterations)?
        }
        ApplicationMode::Curative => {
            phase_rules(Phase::Curative, &contingencies, &cnecs, alterations)?
        }
        ApplicationMode::Auto => phase_rules(Phase::Auto, &contingencies, &cnecs, alterations)?,
        ApplicationMode::PreventiveAndCurative => {
            let mut rules = phase_rules(
                Phase::Preventive,
                &ContingencyResolution::default(),
                &cnecs,
                alterations,
            )?;
            match phase_rules(Phase::Curative, &contingencies, &cnecs, alterations) {
                Ok(curative) => rules.extend(curative),
                Err(rejection) => alterations.push(format!(
                    "curative usage rules were not imported: {}",
                    rejection.detail()
                )),
            }
            rules
        }
    };
    rules.dedup();
    Ok(rules)
}

fn phase_rules(
    phase: Phase,
    contingencies: &ContingencyResolution,
    cnecs: &BTreeSet<ResolvedCnec>,
    alterations: &mut Vec<String>,
) -> Result<Vec<UsageRule>, Rejection> {
    // Contingency checks reject the phase before any monitored series is considered
    let rules = contingency_rules(phase, contingencies)?;
    if contingencies.any_failed() && !contingencies.resolved.is_empty() {
        let note = format!(
            "Contingencies {} were not imported",
            contingencies.failed.join(", ")
        );
        if !alterations.contains(&note) {
            alterations.push(note);
        }
    }

    let constrained: Vec<UsageRule> = cnecs
        .iter()
        .filter(|cnec| phase.accepts_cnec_at(cnec.instant))
        .map(|cnec| UsageRule::OnFlowConstraint {
            instant: phase.instant(),
            cnec: cnec.id.clone(),
            method: phase.method(),
        })
        .collect();
    if constrained.is_empty() {
        Ok(rules)
    } else {
        Ok(constrained)
    }
}

fn declared_cnecs<T, M>(
    record: &EffectiveRecord,
    refs: &ReferenceResolver<'_, T, M>,
    contingencies: &ContingencyResolution,
) -> BTreeSet<ResolvedCnec>
where
    T: NetworkTopology + ?Sized,
    M: SecurityModelView + ?Sized,
{
    let filter: Option<BTreeSet<String>> = contingencies
        .declared()
        .then(|| contingencies.resolved.iter().cloned().collect());
    record
        .reference_ids(ReferenceRole::MonitoredSeries)
        .into_iter()
        .flat_map(|series| refs.resolve_cnecs(series, filter.as_ref()))
        .collect()
}
