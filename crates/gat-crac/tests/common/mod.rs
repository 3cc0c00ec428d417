#![allow(dead_code)]

use chrono::{DateTime, TimeZone, Utc};
use gat_crac::{
    attr, DocumentProfile, ElementRef, NormalizedRecord, RecordKind, ReferenceRole,
    SourceDocument, ValidityWindow,
};
use gat_secmodel::{ElementAttributes, ElementKind, InMemoryTopology};

pub fn at(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, 0, 0, 0).unwrap()
}

pub fn window(start: DateTime<Utc>, end: DateTime<Utc>) -> ValidityWindow {
    ValidityWindow::bounded(start, end)
}

pub fn definitions(id: &str, window: ValidityWindow) -> SourceDocument {
    SourceDocument::new(id, DocumentProfile::Definition, window)
}

pub fn instructions(id: &str, window: ValidityWindow) -> SourceDocument {
    SourceDocument::new(id, DocumentProfile::SteadyStateInstruction, window)
}

pub fn topology() -> InMemoryTopology {
    InMemoryTopology::new()
        .with_element(
            "line-1",
            ElementAttributes::new(ElementKind::Line)
                .with_nominal_voltage(400.0)
                .with_current_limit(2000.0),
        )
        .with_element(
            "line-2",
            ElementAttributes::new(ElementKind::Line).with_nominal_voltage(400.0),
        )
        .with_element("line-3", ElementAttributes::new(ElementKind::Line))
        .with_element(
            "pst-1",
            ElementAttributes::new(ElementKind::PhaseShifter)
                .with_nominal_voltage(400.0)
                .with_initial_tap(0),
        )
        .with_element("gen-1", ElementAttributes::new(ElementKind::Generator))
}

pub fn contingency(id: &str, elements: &[&str]) -> NormalizedRecord {
    elements.iter().fold(
        NormalizedRecord::new(RecordKind::Contingency, id),
        |record, element| {
            record.with_reference(ElementRef::new(ReferenceRole::NetworkElement, *element))
        },
    )
}

pub fn monitored_element(id: &str, branch: &str) -> NormalizedRecord {
    NormalizedRecord::new(RecordKind::MonitoredElement, id)
        .with_reference(ElementRef::new(ReferenceRole::NetworkElement, branch))
}

pub fn measurement(id: &str, measurement_type: &str, threshold: &str) -> ElementRef {
    ElementRef::new(ReferenceRole::Measurement, id)
        .with_attribute(attr::MEASUREMENT_TYPE, measurement_type)
        .with_attribute(attr::UNIT, "MAW")
        .with_attribute(attr::THRESHOLD, threshold)
}

pub fn topological_action(id: &str, mode: &str, element: &str) -> NormalizedRecord {
    NormalizedRecord::new(RecordKind::RemedialAction, id)
        .with_attribute(attr::APPLICATION_MODE, mode)
        .with_attribute(attr::AVAILABILITY, "A39")
        .with_reference(
            ElementRef::new(ReferenceRole::RegisteredResource, element)
                .with_attribute(attr::PSR_TYPE, "B24")
                .with_attribute(attr::MARKET_OBJECT_STATUS, "A21"),
        )
}

pub fn on_contingency(record: NormalizedRecord, contingency: &str) -> NormalizedRecord {
    record.with_reference(ElementRef::new(ReferenceRole::Contingency, contingency))
}

pub fn group(id: &str, members: &[&str]) -> NormalizedRecord {
    members.iter().fold(
        NormalizedRecord::new(RecordKind::RemedialActionGroup, id),
        |record, member| record.with_reference(ElementRef::new(ReferenceRole::Member, *member)),
    )
}
