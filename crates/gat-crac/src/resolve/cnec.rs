//! CNECs: monitored branches paired with operating states.
//!
//! One monitored element yields many CNECs: one per flow measurement and,
//! for post-contingency measurements, one per contingency it is monitored
//! after.

use gat_secmodel::{
    Cnec, ElementAttributes, FlowSide, FlowThreshold, Instant, NetworkTopology,
    SecurityModelView, ThresholdUnit,
};

use crate::config::ImportConfig;
use crate::decode::{
    decode_or, decode_required, CodeTable, FlowDirection, MeasurementType, OptimizationStatus,
    UnitSymbol,
};
use crate::record::{attr, EffectiveRecord, ElementRef, ReferenceRole};
use crate::refs::ReferenceResolver;
use crate::resolve::{parse_flag, parse_number, Built, Entity};
use crate::status::Rejection;

#[derive(Debug, Clone, PartialEq)]
struct Measurement {
    instant: Instant,
    side: FlowSide,
    threshold: FlowThreshold,
}

pub fn resolve_cnec<T, M>(
    record: &EffectiveRecord,
    refs: &ReferenceResolver<'_, T, M>,
    config: &ImportConfig,
) -> Result<Built, Rejection>
where
    T: NetworkTopology + ?Sized,
    M: SecurityModelView + ?Sized,
{
    if !parse_flag(record, attr::ENABLED, true)? {
        return Err(Rejection::NotForOptimization(
            "monitored element is not enabled".to_string(),
        ));
    }
    let status = decode_or(
        record.attribute(attr::OPTIMIZATION_STATUS),
        OptimizationStatus::Optimized,
    )?;

    let branch = match record.reference_ids(ReferenceRole::NetworkElement).as_slice() {
        [] => return Err(Rejection::IncompleteData("No registered resources".to_string())),
        [single] => single.to_string(),
        several => {
            return Err(Rejection::InconsistentData(format!(
                "More than one registered resources: {}",
                several.join(", ")
            )))
        }
    };
    let element = refs.resolve_network_element(&branch).ok_or_else(|| {
        Rejection::ElementNotFound(format!("Network element was not found in network: {branch}"))
    })?;
    if !element.kind.is_branch() {
        return Err(Rejection::InconsistentData(format!(
            "{branch} is a {:?}, not a branch",
            element.kind
        )));
    }
    let nominal_voltage_kv = match element.nominal_voltage_kv {
        Some(kv) if kv > 0.0 => kv,
        _ => {
            return Err(Rejection::Other(format!(
                "Voltage level for branch {branch} is missing or zero in network"
            )))
        }
    };

    let mut alterations = Vec::new();
    let declared = record.reference_ids(ReferenceRole::Contingency);
    let contingencies = if !declared.is_empty() {
        let resolution = refs.resolve_contingencies(declared);
        if resolution.any_failed() {
            alterations.push(format!(
                "Contingencies {} not defined",
                resolution.failed.join(", ")
            ));
        }
        resolution.resolved
    } else if config.expand_cnecs_to_all_contingencies {
        refs.all_contingencies()
    } else {
        Vec::new()
    };

    let measurement_refs: Vec<&ElementRef> =
        record.references_with(ReferenceRole::Measurement).collect();
    if measurement_refs.is_empty() {
        return Err(Rejection::IncompleteData("No measurements".to_string()));
    }
    let mut measurements = Vec::new();
    let mut first_failure = None;
    for reference in measurement_refs {
        match parse_measurement(reference, &branch, element) {
            Ok(measurement) => measurements.push((reference.id.as_str(), measurement)),
            Err(rejection) => {
                alterations.push(format!("measurement {}: {}", reference.id, rejection.detail()));
                first_failure.get_or_insert(rejection);
            }
        }
    }
    if measurements.is_empty() {
        return Err(first_failure
            .unwrap_or_else(|| Rejection::IncompleteData("No measurements".to_string())));
    }

    let (optimized, monitored) = match status {
        OptimizationStatus::Optimized => (true, false),
        OptimizationStatus::Monitored => (false, true),
    };
    let template = CnecTemplate {
        record,
        branch: &branch,
        nominal_voltage_kv,
        optimized,
        monitored,
    };

    let mut cnecs: Vec<Cnec> = Vec::new();
    for (measurement_id, measurement) in &measurements {
        if !measurement.instant.is_post_contingency() {
            template.push(&mut cnecs, measurement, None);
            continue;
        }
        if contingencies.is_empty() {
            alterations.push(format!(
                "no contingency available for {} measurement {measurement_id}",
                measurement.instant
            ));
            continue;
        }
        for contingency in &contingencies {
            template.push(&mut cnecs, measurement, Some(contingency));
        }
    }
    if cnecs.is_empty() {
        return Err(Rejection::IncompleteData(
            "no contingency available for post-outage measurements".to_string(),
        ));
    }
    Ok(Built::new(Entity::Cnecs(cnecs), alterations))
}

fn parse_measurement(
    reference: &ElementRef,
    branch: &str,
    element: &ElementAttributes,
) -> Result<Measurement, Rejection> {
    let MeasurementType(instant) = decode_required(reference.attribute(attr::MEASUREMENT_TYPE))?;
    let symbol: UnitSymbol = decode_required(reference.attribute(attr::UNIT))?;
    let unit = symbol.threshold_unit().ok_or_else(|| {
        Rejection::InconsistentData(format!(
            "Wrong unit symbol for a flow measurement: {}",
            symbol.code()
        ))
    })?;
    let limit = parse_number(reference, attr::THRESHOLD)?.ok_or_else(|| {
        Rejection::IncompleteData(format!("Missing threshold on measurement {}", reference.id))
    })?;
    if unit == ThresholdUnit::PercentImax && element.current_limit_a.is_none() {
        return Err(Rejection::Other(format!(
            "Unable to get current limits of branch {branch} for a percentage threshold"
        )));
    }
    let FlowDirection(side) = decode_or(
        reference.attribute(attr::DIRECTION),
        FlowDirection(FlowSide::Both),
    )?;
    Ok(Measurement {
        instant,
        side,
        threshold: FlowThreshold::for_side(unit, limit, side),
    })
}

struct CnecTemplate<'a> {
    record: &'a EffectiveRecord,
    branch: &'a str,
    nominal_voltage_kv: f64,
    optimized: bool,
    monitored: bool,
}

impl CnecTemplate<'_> {
    fn id(&self, measurement: &Measurement, contingency: Option<&str>) -> String {
        let mut id = self.record.display_name().to_string();
        match measurement.side {
            FlowSide::Direct => id.push_str(" - DIRECT"),
            FlowSide::Opposite => id.push_str(" - OPPOSITE"),
            FlowSide::Both => {}
        }
        if self.monitored {
            id.push_str(" - MONITORED");
        }
        if let Some(contingency) = contingency {
            id.push_str(" - ");
            id.push_str(contingency);
        }
        id.push_str(" - ");
        id.push_str(measurement.instant.as_str());
        id
    }

    /// Add a CNEC, merging thresholds into an existing one with the same id.
    fn push(&self, cnecs: &mut Vec<Cnec>, measurement: &Measurement, contingency: Option<&String>) {
        let id = self.id(measurement, contingency.map(String::as_str));
        if let Some(existing) = cnecs.iter_mut().find(|c| c.id == id) {
            existing.thresholds.push(measurement.threshold.clone());
            return;
        }
        cnecs.push(Cnec {
            name: id.clone(),
            id,
            monitored_series: self.record.id.clone(),
            network_element: self.branch.to_string(),
            instant: measurement.instant,
            contingency: contingency.cloned(),
            thresholds: vec![measurement.threshold.clone()],
            nominal_voltage_kv: self.nominal_voltage_kv,
            optimized: self.optimized,
            monitored: self.monitored,
        });
    }
}
