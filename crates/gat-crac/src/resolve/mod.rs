//! Per-kind resolvers.
//!
//! A resolver is a pure function from an effective record (plus read-only
//! lookups) to a [`Resolution`]: either the entity to commit with the
//! fidelity it lost, or a [`Rejection`]. Committing is a separate, serial
//! step so one stage can be resolved in parallel against the model as it
//! stood when the stage began.

pub mod cnec;
pub mod contingency;
pub mod group;
pub mod remedial_action;
pub mod usage;

use gat_secmodel::{Cnec, Contingency, RemedialAction, SecurityModelBuilder};
use tracing::debug;

use crate::record::{EffectiveRecord, ElementRef, RecordKind};
use crate::status::{ElementaryOutcome, Rejection};

pub use cnec::resolve_cnec;
pub use contingency::resolve_contingency;
pub use group::resolve_groups;
pub use remedial_action::resolve_remedial_action;

/// What a successful resolution creates.
#[derive(Debug, Clone, PartialEq)]
pub enum Entity {
    Contingency(Contingency),
    /// Every CNEC derived from one monitored element.
    Cnecs(Vec<Cnec>),
    RemedialAction(RemedialAction),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Built {
    pub entity: Entity,
    pub alterations: Vec<String>,
}

impl Built {
    pub fn new(entity: Entity, alterations: Vec<String>) -> Self {
        Self {
            entity,
            alterations,
        }
    }
}

/// Result of resolving one record, not yet committed.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    pub kind: RecordKind,
    pub native_id: String,
    pub native_name: String,
    pub result: Result<Built, Rejection>,
}

impl Resolution {
    pub fn new(record: &EffectiveRecord, result: Result<Built, Rejection>) -> Self {
        Self {
            kind: record.kind,
            native_id: record.id.clone(),
            native_name: record.display_name().to_string(),
            result,
        }
    }

    /// Commit the built entity and produce the terminal outcome.
    ///
    /// The builder refuses only duplicate ids; a CNEC clash drops that CNEC,
    /// any other clash rejects the entity.
    pub fn commit<B>(self, builder: &mut B) -> ElementaryOutcome
    where
        B: SecurityModelBuilder + ?Sized,
    {
        let Resolution {
            kind,
            native_id,
            native_name,
            result,
        } = self;
        let Built {
            entity,
            mut alterations,
        } = match result {
            Ok(built) => built,
            Err(rejection) => {
                debug!(id = %native_id, "not imported: {}", rejection.detail());
                return ElementaryOutcome::rejected(kind, native_id, native_name, rejection);
            }
        };

        let committed = match entity {
            Entity::Contingency(contingency) => {
                let id = contingency.id.clone();
                builder.add_contingency(contingency).map(|_| id)
            }
            Entity::RemedialAction(action) => {
                let id = action.id.clone();
                builder.add_remedial_action(action).map(|_| id)
            }
            Entity::Cnecs(cnecs) => {
                let mut added = 0usize;
                let mut clashes = Vec::new();
                for cnec in cnecs {
                    match builder.add_cnec(cnec) {
                        Ok(()) => added += 1,
                        Err(err) => clashes.push(err.to_string()),
                    }
                }
                if added == 0 {
                    return ElementaryOutcome::rejected(
                        kind,
                        native_id,
                        native_name,
                        Rejection::Other(clashes.join(". ")),
                    );
                }
                alterations.extend(clashes);
                Ok(native_id.clone())
            }
        };

        match committed {
            Ok(created_id) => {
                debug!(id = %native_id, altered = !alterations.is_empty(), "imported");
                ElementaryOutcome::imported(kind, native_id, native_name, created_id, alterations)
            }
            Err(err) => ElementaryOutcome::rejected(
                kind,
                native_id,
                native_name,
                Rejection::Other(err.to_string()),
            ),
        }
    }
}

/// Parse an optional boolean attribute.
pub(crate) fn parse_flag(
    record: &EffectiveRecord,
    key: &str,
    default: bool,
) -> Result<bool, Rejection> {
    match record.attribute(key) {
        None => Ok(default),
        Some(value) if value.eq_ignore_ascii_case("true") => Ok(true),
        Some(value) if value.eq_ignore_ascii_case("false") => Ok(false),
        Some(value) => Err(Rejection::InconsistentData(format!(
            "{key} must be true or false, got {value}"
        ))),
    }
}

/// Parse an optional numeric attribute of a reference.
pub(crate) fn parse_number(reference: &ElementRef, key: &str) -> Result<Option<f64>, Rejection> {
    reference
        .attribute(key)
        .map(|value| {
            value.trim().parse::<f64>().map_err(|_| {
                Rejection::InconsistentData(format!(
                    "{key} of {} is not a number: {value}",
                    reference.id
                ))
            })
        })
        .transpose()
}

/// Parse an optional integer (tap) attribute of a reference.
pub(crate) fn parse_tap(reference: &ElementRef, key: &str) -> Result<Option<i32>, Rejection> {
    reference
        .attribute(key)
        .map(|value| {
            value.trim().parse::<i32>().map_err(|_| {
                Rejection::InconsistentData(format!(
                    "{key} of {} is not an integer tap: {value}",
                    reference.id
                ))
            })
        })
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{attr, NormalizedRecord, ReferenceRole};
    use gat_secmodel::{SecurityModel, SecurityModelView};

    fn record(kind: RecordKind, id: &str) -> EffectiveRecord {
        EffectiveRecord::from_base(&NormalizedRecord::new(kind, id), "doc")
    }

    #[test]
    fn test_commit_duplicate_contingency_is_other() {
        let mut model = SecurityModel::new();
        let record = record(RecordKind::Contingency, "co-1");
        let built = || {
            Ok(Built::new(
                Entity::Contingency(Contingency::new("co-1", "co-1", vec!["l".into()])),
                vec![],
            ))
        };
        let first = Resolution::new(&record, built()).commit(&mut model);
        assert!(first.status.is_imported());

        let second = Resolution::new(&record, built()).commit(&mut model);
        assert_eq!(second.status.label(), "OTHER");
        assert!(model.contingency("co-1").is_some());
    }

    #[test]
    fn test_rejection_commits_nothing() {
        let mut model = SecurityModel::new();
        let record = record(RecordKind::Contingency, "co-1");
        let outcome = Resolution::new(&record, Err(Rejection::IncompleteData("x".into())))
            .commit(&mut model);
        assert_eq!(outcome.status.label(), "INCOMPLETE_DATA");
        assert_eq!(model.entity_count(), 0);
    }

    #[test]
    fn test_parse_flag() {
        let base = NormalizedRecord::new(RecordKind::Contingency, "co-1")
            .with_attribute(attr::MUST_STUDY, "FALSE")
            .with_attribute(attr::ENABLED, "maybe");
        let record = EffectiveRecord::from_base(&base, "doc");
        assert_eq!(parse_flag(&record, attr::MUST_STUDY, true), Ok(false));
        assert_eq!(parse_flag(&record, attr::AVAILABLE, true), Ok(true));
        assert!(parse_flag(&record, attr::ENABLED, true).is_err());
    }

    #[test]
    fn test_parse_numbers() {
        let r = ElementRef::new(ReferenceRole::RegisteredResource, "pst-1")
            .with_attribute(attr::MIN_CAPACITY, "-12")
            .with_attribute(attr::MAX_CAPACITY, "ten");
        assert_eq!(parse_tap(&r, attr::MIN_CAPACITY), Ok(Some(-12)));
        assert!(parse_tap(&r, attr::MAX_CAPACITY).is_err());
        assert_eq!(parse_number(&r, attr::DEFAULT_CAPACITY), Ok(None));
    }
}
