//! Merging base definitions with time-bound override assertions.
//!
//! Steady-state-instruction documents carry override assertions: partial
//! records that replace some attributes (or the whole reference list) of an
//! entity while their window contains the snapshot time.
//!
//! **Algorithm:**
//! 1. Group base definitions and assertions by business id
//! 2. Reject ids with no base, with several bases, or with mismatched kinds
//! 3. Keep the assertions whose window contains the snapshot
//! 4. Overlay every key those assertions declare, refusing conflicting values

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::{debug, warn};

use crate::dataset::{DocumentProfile, SourceDocument};
use crate::record::{EffectiveRecord, ElementRef, NormalizedRecord};
use crate::status::{ElementaryOutcome, Rejection};
use crate::validity::ValidityWindow;

/// An override assertion with the window it applies in.
#[derive(Debug, Clone, Copy)]
pub struct Assertion<'a> {
    pub record: &'a NormalizedRecord,
    pub source: &'a str,
    pub window: ValidityWindow,
}

/// Two applicable assertions disagree on a value.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("conflicting override assertions on {field} from documents {}", sources.join(", "))]
pub struct AmbiguousOverride {
    pub field: String,
    pub sources: Vec<String>,
}

/// Compute the effective record of `base` at `snapshot`.
///
/// Assertions with a malformed window are ignored.
pub fn merge(
    base: &NormalizedRecord,
    base_source: &str,
    assertions: &[Assertion<'_>],
    snapshot: DateTime<Utc>,
) -> Result<EffectiveRecord, AmbiguousOverride> {
    let mut effective = EffectiveRecord::from_base(base, base_source);

    let applicable: Vec<&Assertion<'_>> = assertions
        .iter()
        .filter(|a| match a.window.contains(snapshot) {
            Ok(contained) => contained,
            Err(err) => {
                warn!(id = %base.id, document = a.source, "ignoring override assertion: {err}");
                false
            }
        })
        .collect();

    let mut attributes: BTreeMap<&str, (&str, &str)> = BTreeMap::new();
    let mut name: Option<(&str, &str)> = None;
    let mut references: Option<(&[ElementRef], &str)> = None;

    for assertion in &applicable {
        let record = assertion.record;
        for (key, value) in &record.attributes {
            if let Some((previous, source)) = attributes.get(key.as_str()) {
                if *previous != value.as_str() {
                    return Err(conflict(key, source, assertion.source));
                }
            }
            attributes.insert(key.as_str(), (value.as_str(), assertion.source));
        }
        if let Some(new_name) = record.name.as_deref() {
            match name {
                Some((previous, source)) if previous != new_name => {
                    return Err(conflict("name", source, assertion.source));
                }
                _ => name = Some((new_name, assertion.source)),
            }
        }
        if let Some(refs) = record.references.as_deref() {
            match references {
                Some((previous, source)) if previous != refs => {
                    return Err(conflict("references", source, assertion.source));
                }
                _ => references = Some((refs, assertion.source)),
            }
        }
        effective.overridden_by.push(assertion.source.to_string());
    }

    for (key, (value, _)) in attributes {
        effective.attributes.insert(key.to_string(), value.to_string());
    }
    if let Some((new_name, _)) = name {
        effective.name = Some(new_name.to_string());
    }
    if let Some((refs, _)) = references {
        effective.references = refs.to_vec();
    }
    Ok(effective)
}

fn conflict(field: &str, first: &str, second: &str) -> AmbiguousOverride {
    AmbiguousOverride {
        field: field.to_string(),
        sources: vec![first.to_string(), second.to_string()],
    }
}

/// Effective records of a pass, plus the entities rejected while merging.
#[derive(Debug, Default)]
pub struct MergeOutcome {
    pub effective: Vec<EffectiveRecord>,
    pub rejected: Vec<ElementaryOutcome>,
}

struct Declarations<'a> {
    first: &'a NormalizedRecord,
    bases: Vec<(&'a NormalizedRecord, &'a str)>,
    assertions: Vec<Assertion<'a>>,
}

/// Merge every business id declared by the kept documents.
///
/// Output is ordered by business id.
pub fn merge_documents(kept: &[&SourceDocument], snapshot: DateTime<Utc>) -> MergeOutcome {
    let mut by_id: BTreeMap<&str, Declarations<'_>> = BTreeMap::new();
    for document in kept {
        for record in &document.records {
            let entry = by_id
                .entry(record.id.as_str())
                .or_insert_with(|| Declarations {
                    first: record,
                    bases: Vec::new(),
                    assertions: Vec::new(),
                });
            match document.profile {
                DocumentProfile::Definition => entry.bases.push((record, document.id.as_str())),
                DocumentProfile::SteadyStateInstruction => entry.assertions.push(Assertion {
                    record,
                    source: &document.id,
                    window: record.window.unwrap_or(document.window),
                }),
            }
        }
    }

    let mut outcome = MergeOutcome::default();
    for (id, declarations) in by_id {
        match resolve_declarations(&declarations, snapshot) {
            Ok(effective) => {
                if !effective.overridden_by.is_empty() {
                    debug!(id, overrides = ?effective.overridden_by, "applied override assertions");
                }
                outcome.effective.push(effective);
            }
            Err((record, rejection)) => {
                outcome.rejected.push(ElementaryOutcome::rejected(
                    record.kind,
                    id,
                    record.name.as_deref().unwrap_or(id),
                    rejection,
                ));
            }
        }
    }
    outcome
}

fn resolve_declarations<'a>(
    declarations: &Declarations<'a>,
    snapshot: DateTime<Utc>,
) -> Result<EffectiveRecord, (&'a NormalizedRecord, Rejection)> {
    let (base, source) = match declarations.bases.as_slice() {
        [] => {
            let sources: Vec<&str> = declarations.assertions.iter().map(|a| a.source).collect();
            return Err((
                declarations.first,
                Rejection::IncompleteData(format!(
                    "override assertions from {} have no base definition",
                    sources.join(", ")
                )),
            ));
        }
        [single] => *single,
        [first, ..] => {
            let sources: Vec<&str> = declarations.bases.iter().map(|(_, s)| *s).collect();
            return Err((
                first.0,
                Rejection::InconsistentData(format!(
                    "defined {} times in documents {}",
                    sources.len(),
                    sources.join(", ")
                )),
            ));
        }
    };

    if let Some(mismatch) = declarations
        .assertions
        .iter()
        .find(|a| a.record.kind != base.kind)
    {
        return Err((
            base,
            Rejection::InconsistentData(format!(
                "override assertion from {} declares a {} but the base definition is a {}",
                mismatch.source, mismatch.record.kind, base.kind
            )),
        ));
    }

    merge(base, source, &declarations.assertions, snapshot)
        .map_err(|err| (base, Rejection::InconsistentData(err.to_string())))
}
