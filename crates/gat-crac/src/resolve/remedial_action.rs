//! Elementary remedial actions.
//!
//! The registered resources of an action decide what it is:
//!
//! | Resources | Action |
//! |-----------|--------|
//! | a PST without default capacity | PST range action (exactly one resource) |
//! | any HVDC line | HVDC range action (auto mode only) |
//! | anything else | network action, one elementary action per resource |
//!
//! Usage rules are derived only once the action itself is known to be valid.

use gat_secmodel::{
    ElementAttributes, ElementKind, ElementaryAction, HvdcRange, HvdcRangeAction,
    NetworkTopology, PstRangeAction, RemedialAction, RemedialActionKind, SecurityModelView,
    SwitchState,
};

use crate::decode::{
    decode_required, ApplicationMode, Availability, CodeTable, MarketObjectStatus, PsrType,
    UnitSymbol,
};
use crate::record::{attr, EffectiveRecord, ElementRef, ReferenceRole};
use crate::refs::{ElementResolution, ReferenceResolver};
use crate::resolve::usage::derive_usage_rules;
use crate::resolve::{parse_flag, parse_number, parse_tap, Built, Entity};
use crate::status::Rejection;

type Resource<'r> = (&'r ElementRef, PsrType);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ActionClass {
    PstRange,
    HvdcRange,
    Network,
}

fn typed_resource(resource: &ElementRef) -> Result<Resource<'_>, Rejection> {
    let psr = decode_required(resource.attribute(attr::PSR_TYPE))?;
    Ok((resource, psr))
}

fn classify(resources: &[Resource<'_>]) -> ActionClass {
    let is_pst_range = resources
        .iter()
        .any(|(r, psr)| *psr == PsrType::Pst && r.attribute(attr::DEFAULT_CAPACITY).is_none());
    if is_pst_range {
        ActionClass::PstRange
    } else if resources.iter().any(|(_, psr)| *psr == PsrType::Hvdc) {
        ActionClass::HvdcRange
    } else {
        ActionClass::Network
    }
}

pub fn resolve_remedial_action<T, M>(
    record: &EffectiveRecord,
    refs: &ReferenceResolver<'_, T, M>,
) -> Result<Built, Rejection>
where
    T: NetworkTopology + ?Sized,
    M: SecurityModelView + ?Sized,
{
    if !parse_flag(record, attr::AVAILABLE, true)? {
        return Err(Rejection::NotForOptimization(
            "remedial action is not available".to_string(),
        ));
    }
    let mode: ApplicationMode = decode_required(record.attribute(attr::APPLICATION_MODE))?;
    match decode_required::<Availability>(record.attribute(attr::AVAILABILITY))? {
        Availability::MightBeUsed => {}
        Availability::ShallBeUsed => {
            return Err(Rejection::NotYetHandled(format!(
                "Wrong {}: {} (shall be used) is not handled",
                Availability::NAME,
                Availability::ShallBeUsed.code()
            )))
        }
    }

    let resources: Vec<Resource<'_>> = record
        .references_with(ReferenceRole::RegisteredResource)
        .map(typed_resource)
        .collect::<Result<_, _>>()?;
    if resources.is_empty() {
        return Err(Rejection::IncompleteData(
            "Missing registered resource".to_string(),
        ));
    }

    let mut alterations = Vec::new();
    let action = match classify(&resources) {
        ActionClass::PstRange => pst_range(&resources, refs)?,
        ActionClass::HvdcRange => {
            if mode != ApplicationMode::Auto {
                return Err(Rejection::InconsistentData(format!(
                    "HVDC cannot be imported with application mode {}",
                    mode.code()
                )));
            }
            hvdc_range(&resources, refs, &mut alterations)?
        }
        ActionClass::Network => network_action(&resources, refs, &mut alterations)?,
    };

    let usage_rules = derive_usage_rules(mode, record, refs, &mut alterations)?;
    let action = RemedialAction {
        id: record.id.clone(),
        name: record.display_name().to_string(),
        operator: record.attribute(attr::OPERATOR).map(str::to_string),
        action,
        usage_rules,
    };
    Ok(Built::new(Entity::RemedialAction(action), alterations))
}

// ============================================================================
// PST range actions
// ============================================================================

fn pst_range<T, M>(
    resources: &[Resource<'_>],
    refs: &ReferenceResolver<'_, T, M>,
) -> Result<RemedialActionKind, Rejection>
where
    T: NetworkTopology + ?Sized,
    M: SecurityModelView + ?Sized,
{
    let [(resource, _)] = resources else {
        return Err(Rejection::InconsistentData(format!(
            "> 1 registered resources ({}) with at least one PST Range Action defined",
            resources.len()
        )));
    };

    let status: MarketObjectStatus =
        decode_required(resource.attribute(attr::MARKET_OBJECT_STATUS))?;
    let range_kind = status.tap_range_kind().ok_or_else(|| {
        Rejection::InconsistentData(format!(
            "Wrong {} for a PST range: {}",
            MarketObjectStatus::NAME,
            status.code()
        ))
    })?;

    let min_tap = parse_tap(resource, attr::MIN_CAPACITY)?;
    let max_tap = parse_tap(resource, attr::MAX_CAPACITY)?;
    if min_tap.is_some() || max_tap.is_some() {
        require_unit(resource, UnitSymbol::Dimensionless)?;
    }
    if let (Some(min), Some(max)) = (min_tap, max_tap) {
        if min > max {
            return Err(Rejection::InconsistentData(format!(
                "minimum tap {min} is above maximum tap {max} on {}",
                resource.id
            )));
        }
    }

    let element = refs.resolve_network_element(&resource.id).ok_or_else(|| {
        Rejection::ElementNotFound(format!("PST {} was not found in network", resource.id))
    })?;
    expect_kind(&resource.id, element, &[ElementKind::PhaseShifter], "phase shifter")?;

    Ok(RemedialActionKind::PstRange(PstRangeAction {
        network_element: resource.id.clone(),
        range_kind,
        min_tap,
        max_tap,
    }))
}

// ============================================================================
// HVDC range actions
// ============================================================================

fn hvdc_range<T, M>(
    resources: &[Resource<'_>],
    refs: &ReferenceResolver<'_, T, M>,
    alterations: &mut Vec<String>,
) -> Result<RemedialActionKind, Rejection>
where
    T: NetworkTopology + ?Sized,
    M: SecurityModelView + ?Sized,
{
    let mut pending = Vec::with_capacity(resources.len());
    for (resource, psr) in resources {
        if *psr != PsrType::Hvdc {
            return Err(Rejection::InconsistentData(format!(
                "HVDC range action also registers {} with psrType {}",
                resource.id,
                psr.code()
            )));
        }
        let missing = || {
            Rejection::IncompleteData(format!("Missing HVDC capacity range on {}", resource.id))
        };
        let min_mw = parse_number(resource, attr::MIN_CAPACITY)?.ok_or_else(missing)?;
        let max_mw = parse_number(resource, attr::MAX_CAPACITY)?.ok_or_else(missing)?;
        require_unit(resource, UnitSymbol::Megawatt)?;
        if min_mw > max_mw {
            return Err(Rejection::InconsistentData(format!(
                "HVDC range of {} is empty: {min_mw} > {max_mw}",
                resource.id
            )));
        }
        pending.push(HvdcRange {
            network_element: resource.id.clone(),
            min_mw,
            max_mw,
        });
    }

    let resolution =
        refs.resolve_network_elements(pending.iter().map(|r| r.network_element.as_str()));
    check_resolution_coverage(&resolution, alterations)?;
    for (id, element) in &resolution.found {
        expect_kind(id, element, &[ElementKind::HvdcLine], "HVDC line")?;
    }
    pending.retain(|r| !resolution.missing.contains(&r.network_element));
    Ok(RemedialActionKind::HvdcRange(HvdcRangeAction { ranges: pending }))
}

// ============================================================================
// Network actions
// ============================================================================

/// An elementary action whose codes are valid but whose element is unchecked.
enum PendingAction<'r> {
    PstSetpoint {
        resource: &'r ElementRef,
        status: MarketObjectStatus,
        value: i32,
    },
    Injection {
        resource: &'r ElementRef,
        expected: ElementKind,
        setpoint_mw: f64,
    },
    Topological {
        resource: &'r ElementRef,
        state: SwitchState,
    },
}

impl PendingAction<'_> {
    fn resource(&self) -> &ElementRef {
        match self {
            PendingAction::PstSetpoint { resource, .. }
            | PendingAction::Injection { resource, .. }
            | PendingAction::Topological { resource, .. } => *resource,
        }
    }

    fn finish(&self, element: &ElementAttributes) -> Result<ElementaryAction, Rejection> {
        let id = &self.resource().id;
        match self {
            PendingAction::PstSetpoint { status, value, .. } => {
                expect_kind(id, element, &[ElementKind::PhaseShifter], "phase shifter")?;
                let tap = match status {
                    MarketObjectStatus::RelativeToInitialNetwork => {
                        let initial = element.initial_tap.ok_or_else(|| {
                            Rejection::Other(format!("initial tap of {id} is unknown in network"))
                        })?;
                        initial.checked_add(*value).ok_or_else(|| {
                            Rejection::InconsistentData(format!(
                                "tap setpoint {value} relative to initial tap {initial} of {id} is out of range"
                            ))
                        })?
                    }
                    _ => *value,
                };
                Ok(ElementaryAction::PstSetpoint {
                    network_element: id.clone(),
                    tap,
                })
            }
            PendingAction::Injection {
                expected,
                setpoint_mw,
                ..
            } => {
                let label = match expected {
                    ElementKind::Generator => "generator",
                    _ => "load",
                };
                expect_kind(id, element, &[*expected], label)?;
                Ok(ElementaryAction::InjectionSetpoint {
                    network_element: id.clone(),
                    setpoint_mw: *setpoint_mw,
                })
            }
            PendingAction::Topological { state, .. } => {
                if !(element.kind.is_branch() || element.kind == ElementKind::Switch) {
                    return Err(Rejection::InconsistentData(format!(
                        "{id} is a {:?} and cannot be opened or closed",
                        element.kind
                    )));
                }
                Ok(ElementaryAction::Topological {
                    network_element: id.clone(),
                    state: *state,
                })
            }
        }
    }
}

fn pending_action<'r>(
    resource: &'r ElementRef,
    psr: PsrType,
) -> Result<PendingAction<'r>, Rejection> {
    let status: MarketObjectStatus =
        decode_required(resource.attribute(attr::MARKET_OBJECT_STATUS))?;
    let wrong_status = || {
        Rejection::InconsistentData(format!(
            "Wrong {} {} for psrType {} on elementary action {}",
            MarketObjectStatus::NAME,
            status.code(),
            psr.code(),
            resource.id
        ))
    };

    match psr {
        PsrType::Pst => {
            if !matches!(
                status,
                MarketObjectStatus::Absolute | MarketObjectStatus::RelativeToInitialNetwork
            ) {
                return Err(wrong_status());
            }
            if resource.attribute(attr::UNIT).is_some() {
                require_unit(resource, UnitSymbol::Dimensionless)?;
            }
            let value = parse_tap(resource, attr::DEFAULT_CAPACITY)?.ok_or_else(|| {
                Rejection::IncompleteData(format!("Missing tap setpoint on {}", resource.id))
            })?;
            Ok(PendingAction::PstSetpoint {
                resource,
                status,
                value,
            })
        }
        PsrType::Generation | PsrType::Load => {
            let expected = if psr == PsrType::Generation {
                ElementKind::Generator
            } else {
                ElementKind::Load
            };
            let setpoint_mw = match status {
                MarketObjectStatus::Stop => 0.0,
                MarketObjectStatus::Absolute => {
                    require_unit(resource, UnitSymbol::Megawatt)?;
                    parse_number(resource, attr::DEFAULT_CAPACITY)?.ok_or_else(|| {
                        Rejection::IncompleteData(format!(
                            "Missing injection setpoint on {}",
                            resource.id
                        ))
                    })?
                }
                _ => return Err(wrong_status()),
            };
            Ok(PendingAction::Injection {
                resource,
                expected,
                setpoint_mw,
            })
        }
        PsrType::Circuit | PsrType::TieLine | PsrType::Line | PsrType::Transformer => {
            let state = match status {
                MarketObjectStatus::Open => SwitchState::Open,
                MarketObjectStatus::Close => SwitchState::Close,
                _ => return Err(wrong_status()),
            };
            if resource.attribute(attr::DEFAULT_CAPACITY).is_some() {
                return Err(Rejection::InconsistentData(format!(
                    "topological action on {} cannot carry a capacity",
                    resource.id
                )));
            }
            Ok(PendingAction::Topological { resource, state })
        }
        PsrType::DeprecatedLine => Err(Rejection::InconsistentData(format!(
            "Wrong psrType: {}, deprecated LINE psrType on elementary action {}",
            psr.code(),
            resource.id
        ))),
        PsrType::Hvdc => Err(Rejection::InconsistentData(format!(
            "HVDC {} cannot be part of a network action",
            resource.id
        ))),
    }
}

fn network_action<T, M>(
    resources: &[Resource<'_>],
    refs: &ReferenceResolver<'_, T, M>,
    alterations: &mut Vec<String>,
) -> Result<RemedialActionKind, Rejection>
where
    T: NetworkTopology + ?Sized,
    M: SecurityModelView + ?Sized,
{
    let pending = resources
        .iter()
        .map(|(resource, psr)| pending_action(resource, *psr))
        .collect::<Result<Vec<_>, _>>()?;

    let resolution =
        refs.resolve_network_elements(pending.iter().map(|p| p.resource().id.as_str()));
    check_resolution_coverage(&resolution, alterations)?;

    let mut elementary_actions = Vec::new();
    for action in &pending {
        if let Some(element) = refs.resolve_network_element(&action.resource().id) {
            let built = action.finish(element)?;
            if !elementary_actions.contains(&built) {
                elementary_actions.push(built);
            }
        }
    }
    Ok(RemedialActionKind::Network { elementary_actions })
}

// ============================================================================
// Shared checks
// ============================================================================

fn check_resolution_coverage(
    resolution: &ElementResolution<'_>,
    alterations: &mut Vec<String>,
) -> Result<(), Rejection> {
    if resolution.found.is_empty() {
        return Err(Rejection::ElementNotFound(format!(
            "none of the registered resources were found in network: {}",
            resolution.missing_detail()
        )));
    }
    if !resolution.missing.is_empty() {
        alterations.push(format!(
            "some registered resources were not found in network: {}",
            resolution.missing_detail()
        ));
    }
    Ok(())
}

fn require_unit(resource: &ElementRef, expected: UnitSymbol) -> Result<(), Rejection> {
    let unit: UnitSymbol = decode_required(resource.attribute(attr::UNIT))?;
    if unit != expected {
        return Err(Rejection::InconsistentData(format!(
            "Wrong unit symbol on {}: {} (expected {})",
            resource.id,
            unit.code(),
            expected.code()
        )));
    }
    Ok(())
}

fn expect_kind(
    id: &str,
    element: &ElementAttributes,
    allowed: &[ElementKind],
    label: &str,
) -> Result<(), Rejection> {
    if allowed.contains(&element.kind) {
        Ok(())
    } else {
        Err(Rejection::InconsistentData(format!(
            "{id} is not a {label} but a {:?}",
            element.kind
        )))
    }
}
