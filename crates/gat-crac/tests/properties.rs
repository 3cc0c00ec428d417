mod common;

use std::collections::BTreeSet;

use common::*;
use gat_crac::{attr, run, Dataset, ImportConfig, ImportStatus, Pipeline};
use gat_secmodel::{Instant, UsageRule};

fn year() -> (chrono::DateTime<chrono::Utc>, chrono::DateTime<chrono::Utc>) {
    (at(2024, 1, 1), at(2025, 1, 1))
}

/// A dataset exercising every stage and most rejection categories.
fn mixed_dataset() -> Dataset {
    let (start, end) = year();
    let equipment = definitions("equipment", window(start, end))
        .with_record(contingency("co-1", &["line-1"]))
        .with_record(contingency("co-2", &["line-2", "line-9"]))
        .with_record(contingency("co-3", &["line-8", "line-9"]))
        .with_record(contingency("co-4", &[]))
        .with_record(
            monitored_element("cnec-1", "line-1")
                .with_reference(measurement("m-1", "A01", "1500"))
                .with_reference(measurement("m-2", "A13", "1800")),
        )
        .with_record(topological_action("ra-prev", "A18", "line-3"))
        .with_record(on_contingency(topological_action("ra-cur", "A19", "line-2"), "co-1"))
        .with_record(topological_action("ra-auto", "A20", "line-2"))
        .with_record(topological_action("ra-missing", "A18", "line-7"))
        .with_record(
            topological_action("ra-shall", "A18", "line-3")
                .with_attribute(attr::AVAILABILITY, "A38"),
        )
        .with_record(group("group-ok", &["ra-prev", "ra-cur"]))
        .with_record(group("group-broken", &["ra-missing", "ra-prev"]));
    let stale = definitions("stale", window(at(2020, 1, 1), at(2021, 1, 1)))
        .with_record(contingency("co-stale", &["line-1"]));
    Dataset::new(start, end)
        .with_document(equipment)
        .with_document(stale)
}

#[test]
fn every_filtered_entity_gets_exactly_one_outcome() {
    let run = run(&mixed_dataset(), &topology(), at(2024, 6, 1)).unwrap();
    let ids: BTreeSet<&str> = run.report.outcomes().map(|o| o.native_id.as_str()).collect();
    let expected: BTreeSet<&str> = [
        "co-1", "co-2", "co-3", "co-4", "cnec-1", "ra-prev", "ra-cur", "ra-auto", "ra-missing",
        "ra-shall", "group-ok", "group-broken",
    ]
    .into_iter()
    .collect();
    assert_eq!(ids, expected);
    assert_eq!(run.report.len(), expected.len());
    assert!(run.report.outcome_for("co-stale").is_none());
}

#[test]
fn statuses_of_mixed_dataset() {
    let run = run(&mixed_dataset(), &topology(), at(2024, 6, 1)).unwrap();
    let label = |id: &str| run.report.outcome_for(id).unwrap().status.label();

    assert_eq!(label("co-1"), "IMPORTED");
    assert_eq!(label("co-3"), "ELEMENT_NOT_FOUND_IN_NETWORK");
    assert_eq!(label("co-4"), "INCOMPLETE_DATA");
    assert_eq!(label("cnec-1"), "IMPORTED");
    assert_eq!(label("ra-prev"), "IMPORTED");
    assert_eq!(label("ra-cur"), "IMPORTED");
    assert_eq!(label("ra-auto"), "INCONSISTENCY_IN_DATA");
    assert_eq!(label("ra-missing"), "ELEMENT_NOT_FOUND_IN_NETWORK");
    assert_eq!(label("ra-shall"), "NOT_YET_HANDLED");
    assert_eq!(label("group-ok"), "IMPORTED");
    assert_eq!(label("group-broken"), "NOT_FOR_RAO");
}

#[test]
fn rejecting_everything_still_reports_everything() {
    let (start, end) = year();
    let dataset = Dataset::new(start, end).with_document(
        definitions("equipment", window(start, end))
            .with_record(contingency("co-1", &["nowhere"]))
            .with_record(topological_action("ra-1", "A99", "line-1")),
    );
    let run = run(&dataset, &topology(), start).unwrap();
    assert_eq!(run.report.len(), 2);
    assert_eq!(run.report.imported_count(), 0);
    assert_eq!(run.model.entity_count(), 0);
}

#[test]
fn window_start_is_inclusive_and_end_exclusive() {
    let snapshot = at(2024, 6, 1);
    let dataset = Dataset::new(at(2024, 1, 1), at(2025, 1, 1))
        .with_document(
            definitions("starts-now", window(snapshot, at(2025, 1, 1)))
                .with_record(contingency("co-kept", &["line-1"])),
        )
        .with_document(
            definitions("ends-now", window(at(2024, 1, 1), snapshot))
                .with_record(contingency("co-dropped", &["line-1"])),
        );

    let run = run(&dataset, &topology(), snapshot).unwrap();
    assert!(run.report.outcome_for("co-kept").unwrap().status.is_imported());
    assert!(run.report.outcome_for("co-dropped").is_none());
    assert_eq!(run.report.rejected_documents().len(), 1);
    assert_eq!(run.report.rejected_documents()[0].source_id, "ends-now");
}

#[test]
fn partially_resolved_contingency_names_the_missing_element() {
    let run = run(&mixed_dataset(), &topology(), at(2024, 6, 1)).unwrap();
    let outcome = run.report.outcome_for("co-2").unwrap();
    assert_eq!(outcome.status, ImportStatus::Imported { altered: true });
    assert_eq!(
        outcome.alterations,
        vec!["some network elements were not found in network: line-9".to_string()]
    );
    assert_eq!(run.model.contingencies["co-2"].network_elements, vec!["line-2"]);

    let none = run.report.outcome_for("co-3").unwrap();
    assert!(matches!(
        none.status,
        ImportStatus::ElementNotFoundInNetwork { .. }
    ));
    assert!(!run.model.contingencies.contains_key("co-3"));
}

#[test]
fn auto_actions_need_a_resolved_contingency() {
    let (start, end) = year();
    let dataset = Dataset::new(start, end).with_document(
        definitions("equipment", window(start, end))
            .with_record(contingency("co-1", &["line-1"]))
            .with_record(topological_action("auto-none", "A20", "line-2"))
            .with_record(on_contingency(topological_action("auto-failed", "A20", "line-2"), "co-9"))
            .with_record(on_contingency(topological_action("auto-ok", "A20", "line-2"), "co-1"))
            .with_record(on_contingency(topological_action("cur-failed", "A19", "line-2"), "co-9"))
            .with_record(topological_action("cur-free", "A19", "line-2")),
    );
    let run = run(&dataset, &topology(), start).unwrap();
    let status = |id: &str| run.report.outcome_for(id).unwrap().status.clone();

    assert!(matches!(status("auto-none"), ImportStatus::InconsistentData { .. }));
    assert!(matches!(status("auto-failed"), ImportStatus::InconsistentData { .. }));
    assert!(status("auto-ok").is_imported());
    assert!(matches!(status("cur-failed"), ImportStatus::InconsistentData { .. }));
    assert_eq!(
        run.model.remedial_actions["cur-free"].usage_rules,
        vec![UsageRule::OnInstant {
            instant: Instant::Curative,
            method: gat_secmodel::UsageMethod::Available
        }]
    );
}

#[test]
fn monitored_series_do_not_bypass_contingency_requirements() {
    let (start, end) = year();
    let series = |record: gat_crac::NormalizedRecord, id: &str| {
        record.with_reference(gat_crac::ElementRef::new(
            gat_crac::ReferenceRole::MonitoredSeries,
            id,
        ))
    };
    let dataset = Dataset::new(start, end).with_document(
        definitions("equipment", window(start, end))
            .with_record(contingency("co-1", &["line-2"]))
            .with_record(
                monitored_element("ms-auto", "line-1")
                    .with_reference(measurement("m-1", "A12", "900")),
            )
            .with_record(
                monitored_element("ms-cur", "line-1")
                    .with_reference(measurement("m-2", "A13", "900")),
            )
            .with_record(series(topological_action("auto-series", "A20", "line-3"), "ms-auto"))
            .with_record(series(
                on_contingency(topological_action("prev-series", "A18", "line-3"), "co-1"),
                "ms-cur",
            )),
    );
    let run = run(&dataset, &topology(), start).unwrap();
    assert!(run.model.cnecs.contains_key("ms-auto - co-1 - auto"));
    assert!(run.model.cnecs.contains_key("ms-cur - co-1 - curative"));

    for id in ["auto-series", "prev-series"] {
        assert!(matches!(
            run.report.outcome_for(id).unwrap().status,
            ImportStatus::InconsistentData { .. }
        ));
        assert!(!run.model.remedial_actions.contains_key(id));
    }
}

#[test]
fn curative_action_with_some_invalid_contingencies_is_altered() {
    let (start, end) = year();
    let dataset = Dataset::new(start, end).with_document(
        definitions("equipment", window(start, end))
            .with_record(contingency("co-1", &["line-1"]))
            .with_record(on_contingency(
                on_contingency(topological_action("ra", "A19", "line-2"), "co-1"),
                "co-9",
            )),
    );
    let run = run(&dataset, &topology(), start).unwrap();
    let outcome = run.report.outcome_for("ra").unwrap();
    assert!(outcome.status.is_altered());
    assert_eq!(
        outcome.alterations,
        vec!["Contingencies co-9 were not imported".to_string()]
    );
    assert_eq!(run.model.remedial_actions["ra"].usage_rules.len(), 1);
}

#[test]
fn group_failure_does_not_touch_members() {
    let (start, end) = year();
    let dataset = Dataset::new(start, end).with_document(
        definitions("equipment", window(start, end))
            .with_record(topological_action("A", "A18", "line-404"))
            .with_record(topological_action("B", "A18", "line-1"))
            .with_record(group("G", &["A", "B"])),
    );
    let run = run(&dataset, &topology(), start).unwrap();

    assert!(matches!(
        run.report.outcome_for("A").unwrap().status,
        ImportStatus::ElementNotFoundInNetwork { .. }
    ));
    assert_eq!(
        run.report.outcome_for("B").unwrap().status,
        ImportStatus::Imported { altered: false }
    );
    match &run.report.outcome_for("G").unwrap().status {
        ImportStatus::NotForOptimization { detail } => {
            assert!(detail.contains("remedial action A "));
            assert!(!detail.contains("remedial action B "));
        }
        other => panic!("unexpected status {other:?}"),
    }
    assert!(run.model.remedial_actions.contains_key("B"));
    assert!(!run.model.remedial_actions.contains_key("G"));
}

#[test]
fn flow_constraint_rules_reference_imported_cnecs() {
    let (start, end) = year();
    let dataset = Dataset::new(start, end).with_document(
        definitions("equipment", window(start, end))
            .with_record(contingency("co-1", &["line-2"]))
            .with_record(
                monitored_element("ms-1", "line-1")
                    .with_reference(measurement("m-1", "A13", "900")),
            )
            .with_record(
                on_contingency(topological_action("ra", "A19", "line-3"), "co-1").with_reference(
                    gat_crac::ElementRef::new(gat_crac::ReferenceRole::MonitoredSeries, "ms-1"),
                ),
            ),
    );
    let run = run(&dataset, &topology(), start).unwrap();
    assert_eq!(
        run.model.remedial_actions["ra"].usage_rules,
        vec![UsageRule::OnFlowConstraint {
            instant: Instant::Curative,
            cnec: "ms-1 - co-1 - curative".into(),
            method: gat_secmodel::UsageMethod::Available
        }]
    );
}

#[test]
fn repeated_runs_render_identically() {
    let dataset = mixed_dataset();
    let topology = topology();
    let pipeline = Pipeline::new(&topology, ImportConfig::default());
    let first = pipeline.run(&dataset, at(2024, 6, 1)).unwrap().report;
    let second = pipeline.run(&dataset, at(2024, 6, 1)).unwrap().report;
    assert_eq!(first.render_text(), second.render_text());
    assert_eq!(first.to_string(), second.to_string());
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
}
