//! The import report: one terminal outcome per entity.
//!
//! Outcomes are keyed by native id, so the order in which a stage appends
//! them does not matter and rendering is stable across runs.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ReportError;
use crate::status::ElementaryOutcome;
use crate::validity::RejectedDocument;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImportReport {
    outcomes: BTreeMap<String, ElementaryOutcome>,
    rejected_documents: Vec<RejectedDocument>,
}

impl ImportReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an outcome. Recording a native id twice is refused.
    pub fn record(&mut self, outcome: ElementaryOutcome) -> Result<(), ReportError> {
        if self.outcomes.contains_key(&outcome.native_id) {
            return Err(ReportError::DuplicateOutcome(outcome.native_id));
        }
        self.outcomes.insert(outcome.native_id.clone(), outcome);
        Ok(())
    }

    pub fn reject_document(&mut self, document: RejectedDocument) {
        self.rejected_documents.push(document);
        self.rejected_documents
            .sort_by(|a, b| a.source_id.cmp(&b.source_id));
    }

    pub fn outcome_for(&self, native_id: &str) -> Option<&ElementaryOutcome> {
        self.outcomes.get(native_id)
    }

    /// Outcomes ordered by native id.
    pub fn outcomes(&self) -> impl Iterator<Item = &ElementaryOutcome> {
        self.outcomes.values()
    }

    pub fn rejected_documents(&self) -> &[RejectedDocument] {
        &self.rejected_documents
    }

    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    pub fn imported_count(&self) -> usize {
        self.outcomes().filter(|o| o.status.is_imported()).count()
    }

    pub fn altered_count(&self) -> usize {
        self.outcomes().filter(|o| o.status.is_altered()).count()
    }

    pub fn rejected_count(&self) -> usize {
        self.len() - self.imported_count()
    }

    /// One line per removed document, then per altered or rejected entity.
    pub fn render_text(&self) -> Vec<String> {
        let documents = self
            .rejected_documents
            .iter()
            .map(|d| format!("[REMOVED] document {}: {}", d.source_id, d.reason));
        let entities = self.outcomes().filter_map(|o| {
            if o.status.is_imported() {
                o.status.is_altered().then(|| {
                    format!(
                        "[ALTERED] {} {} ({}): {}",
                        o.kind,
                        o.native_id,
                        o.native_name,
                        o.alterations.join(". ")
                    )
                })
            } else {
                Some(format!(
                    "[NOT IMPORTED] {} {} ({}): {}",
                    o.kind, o.native_id, o.native_name, o.status
                ))
            }
        });
        documents.chain(entities).collect()
    }

    /// Summary string
    pub fn summary(&self) -> String {
        let imported = self.imported_count();
        let altered = self.altered_count();
        let rejected = self.rejected_count();
        let documents = self.rejected_documents.len();
        format!(
            "{} imported ({} altered), {} rejected, {} document{} removed",
            imported,
            altered,
            rejected,
            documents,
            if documents == 1 { "" } else { "s" }
        )
    }
}

impl fmt::Display for ImportReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in self.render_text() {
            writeln!(f, "{line}")?;
        }
        write!(f, "{}", self.summary())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::RecordKind;
    use crate::status::Rejection;

    fn sample() -> ImportReport {
        let mut report = ImportReport::new();
        report
            .record(ElementaryOutcome::imported(
                RecordKind::Contingency,
                "co-2",
                "Trip 2",
                "co-2",
                vec!["some network elements were not found in network: line-9".into()],
            ))
            .unwrap();
        report
            .record(ElementaryOutcome::imported(
                RecordKind::Contingency,
                "co-1",
                "Trip 1",
                "co-1",
                vec![],
            ))
            .unwrap();
        report
            .record(ElementaryOutcome::rejected(
                RecordKind::RemedialAction,
                "ra-1",
                "Open line",
                Rejection::NotYetHandled("Wrong availability".into()),
            ))
            .unwrap();
        report.reject_document(RejectedDocument {
            source_id: "ssi-2024".into(),
            reason: "missing end date".into(),
        });
        report
    }

    #[test]
    fn test_duplicate_outcome_is_refused() {
        let mut report = sample();
        let err = report
            .record(ElementaryOutcome::imported(
                RecordKind::Contingency,
                "co-1",
                "again",
                "co-1",
                vec![],
            ))
            .unwrap_err();
        assert_eq!(err, ReportError::DuplicateOutcome("co-1".into()));
        assert_eq!(report.outcome_for("co-1").unwrap().native_name, "Trip 1");
    }

    #[test]
    fn test_render_text_skips_faithful_imports() {
        assert_eq!(
            sample().render_text(),
            vec![
                "[REMOVED] document ssi-2024: missing end date",
                "[ALTERED] contingency co-2 (Trip 2): some network elements were not found in network: line-9",
                "[NOT IMPORTED] remedial action ra-1 (Open line): NOT_YET_HANDLED: Wrong availability",
            ]
        );
    }

    #[test]
    fn test_counts_and_summary() {
        let report = sample();
        assert_eq!(report.len(), 3);
        assert_eq!(report.imported_count(), 2);
        assert_eq!(report.altered_count(), 1);
        assert_eq!(report.rejected_count(), 1);
        assert_eq!(report.summary(), "2 imported (1 altered), 1 rejected, 1 document removed");
    }

    #[test]
    fn test_json_shape() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["outcomes"]["ra-1"]["status"], "not_yet_handled");
        assert_eq!(json["rejected_documents"][0]["source_id"], "ssi-2024");
    }
}
