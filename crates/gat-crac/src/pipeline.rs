//! One snapshot-time import pass.
//!
//! Stage order is fixed: validity filter, assertion merge, contingencies,
//! CNECs, elementary remedial actions, groups. Each stage is resolved against
//! the model as committed by the stages before it, then committed serially in
//! native-id order. Groups run behind a full barrier after every elementary
//! remedial action is committed.

use chrono::{DateTime, Utc};
use gat_secmodel::{NetworkTopology, SecurityModel, SecurityModelBuilder, SecurityModelView};
#[cfg(feature = "parallel")]
use rayon::prelude::*;
use tracing::{info, warn};

use crate::assertion::merge_documents;
use crate::config::ImportConfig;
use crate::dataset::Dataset;
use crate::error::{PipelineError, PipelineResult};
use crate::record::{EffectiveRecord, RecordKind};
use crate::refs::ReferenceResolver;
use crate::report::ImportReport;
use crate::resolve::{
    resolve_cnec, resolve_contingency, resolve_groups, resolve_remedial_action, Resolution,
};
use crate::validity;

/// The model built by a pass, with its audit trail.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportRun {
    pub model: SecurityModel,
    pub report: ImportReport,
}

pub struct Pipeline<'t, T: ?Sized> {
    topology: &'t T,
    config: ImportConfig,
    #[cfg(feature = "parallel")]
    pool: Option<rayon::ThreadPool>,
}

impl<'t, T> Pipeline<'t, T>
where
    T: NetworkTopology + Sync + ?Sized,
{
    pub fn new(topology: &'t T, config: ImportConfig) -> Self {
        #[cfg(feature = "parallel")]
        let pool = build_pool(config.threads);
        Self {
            topology,
            config,
            #[cfg(feature = "parallel")]
            pool,
        }
    }

    pub fn config(&self) -> &ImportConfig {
        &self.config
    }

    /// Import `dataset` at `snapshot` into a fresh [`SecurityModel`].
    pub fn run(&self, dataset: &Dataset, snapshot: DateTime<Utc>) -> PipelineResult<ImportRun> {
        let mut model = SecurityModel::new();
        let report = self.run_into(dataset, snapshot, &mut model)?;
        Ok(ImportRun { model, report })
    }

    /// Import `dataset` at `snapshot` into a caller-provided model.
    ///
    /// Fails only when the snapshot lies outside the dataset interval; every
    /// entity-level problem is an outcome in the returned report.
    pub fn run_into<M>(
        &self,
        dataset: &Dataset,
        snapshot: DateTime<Utc>,
        model: &mut M,
    ) -> PipelineResult<ImportReport>
    where
        M: SecurityModelBuilder + SecurityModelView + Sync + ?Sized,
    {
        if !dataset.interval().contains(snapshot)? {
            return Err(PipelineError::SnapshotOutsideDataset {
                snapshot,
                start: dataset.start,
                end: dataset.end,
            });
        }
        info!(
            snapshot = %snapshot.to_rfc3339(),
            documents = dataset.documents.len(),
            records = dataset.record_count(),
            "starting import pass"
        );

        let mut report = ImportReport::new();

        let filtered = validity::filter(&dataset.documents, snapshot);
        for rejected in filtered.rejected {
            report.reject_document(rejected);
        }

        let merged = merge_documents(&filtered.kept, snapshot);
        for outcome in merged.rejected {
            report.record(outcome)?;
        }
        let of_kind = |kind: RecordKind| -> Vec<&EffectiveRecord> {
            merged.effective.iter().filter(|r| r.kind == kind).collect()
        };

        let contingencies = of_kind(RecordKind::Contingency);
        let resolutions = self.resolve_stage(&contingencies, &*model, |record, refs| {
            resolve_contingency(record, refs)
        });
        self.commit_stage("contingencies", resolutions, model, &mut report)?;

        let monitored = of_kind(RecordKind::MonitoredElement);
        let resolutions = self.resolve_stage(&monitored, &*model, |record, refs| {
            resolve_cnec(record, refs, &self.config)
        });
        self.commit_stage("monitored elements", resolutions, model, &mut report)?;

        let actions = of_kind(RecordKind::RemedialAction);
        let resolutions = self.resolve_stage(&actions, &*model, |record, refs| {
            resolve_remedial_action(record, refs)
        });
        self.commit_stage("remedial actions", resolutions, model, &mut report)?;

        let groups = of_kind(RecordKind::RemedialActionGroup);
        let resolutions = resolve_groups(&groups, &report, &*model);
        self.commit_stage("remedial action groups", resolutions, model, &mut report)?;

        info!("import pass finished: {}", report.summary());
        Ok(report)
    }

    fn resolve_stage<M, F>(
        &self,
        records: &[&EffectiveRecord],
        model: &M,
        resolve: F,
    ) -> Vec<Resolution>
    where
        M: SecurityModelView + Sync + ?Sized,
        F: Fn(
                &EffectiveRecord,
                &ReferenceResolver<'_, T, M>,
            ) -> Result<crate::resolve::Built, crate::status::Rejection>
            + Sync,
    {
        let refs = ReferenceResolver::new(self.topology, model);
        let one = |record: &&EffectiveRecord| Resolution::new(record, resolve(record, &refs));

        #[cfg(feature = "parallel")]
        if let Some(pool) = &self.pool {
            return pool.install(|| records.par_iter().map(one).collect());
        }
        records.iter().map(one).collect()
    }

    fn commit_stage<M>(
        &self,
        stage: &str,
        resolutions: Vec<Resolution>,
        model: &mut M,
        report: &mut ImportReport,
    ) -> PipelineResult<()>
    where
        M: SecurityModelBuilder + ?Sized,
    {
        let total = resolutions.len();
        let mut imported = 0usize;
        for resolution in resolutions {
            let outcome = resolution.commit(model);
            if outcome.status.is_imported() {
                imported += 1;
            }
            if outcome.status.is_altered() {
                warn!(
                    id = %outcome.native_id,
                    "imported with alterations: {}",
                    outcome.alterations.join(". ")
                );
            }
            report.record(outcome)?;
        }
        info!(stage, total, imported, "stage committed");
        Ok(())
    }
}

#[cfg(feature = "parallel")]
fn build_pool(threads: usize) -> Option<rayon::ThreadPool> {
    let count = if threads == 0 { num_cpus::get() } else { threads };
    if count <= 1 {
        return None;
    }
    match rayon::ThreadPoolBuilder::new().num_threads(count).build() {
        Ok(pool) => Some(pool),
        Err(err) => {
            warn!("building rayon thread pool failed, resolving sequentially: {err}");
            None
        }
    }
}

/// Import with default settings.
pub fn run<T>(dataset: &Dataset, topology: &T, snapshot: DateTime<Utc>) -> PipelineResult<ImportRun>
where
    T: NetworkTopology + Sync + ?Sized,
{
    Pipeline::new(topology, ImportConfig::default()).run(dataset, snapshot)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{DocumentProfile, SourceDocument};
    use crate::record::{ElementRef, NormalizedRecord, ReferenceRole};
    use crate::validity::ValidityWindow;
    use chrono::TimeZone;
    use gat_secmodel::{ElementAttributes, ElementKind, InMemoryTopology};

    fn at(year: i32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(year, 1, 1, 0, 0, 0).unwrap()
    }

    fn dataset() -> Dataset {
        let window = ValidityWindow::bounded(at(2024), at(2025));
        Dataset::new(at(2024), at(2025)).with_document(
            SourceDocument::new("eq", DocumentProfile::Definition, window).with_record(
                NormalizedRecord::new(RecordKind::Contingency, "co-1")
                    .with_reference(ElementRef::new(ReferenceRole::NetworkElement, "line-1")),
            ),
        )
    }

    fn topology() -> InMemoryTopology {
        InMemoryTopology::new().with_element("line-1", ElementAttributes::new(ElementKind::Line))
    }

    #[test]
    fn test_snapshot_outside_dataset_is_fatal() {
        let err = run(&dataset(), &topology(), at(2026)).unwrap_err();
        assert!(matches!(err, PipelineError::SnapshotOutsideDataset { .. }));
    }

    #[test]
    fn test_dataset_end_is_exclusive() {
        assert!(run(&dataset(), &topology(), at(2025)).is_err());
        assert!(run(&dataset(), &topology(), at(2024)).is_ok());
    }

    #[test]
    fn test_inverted_dataset_interval() {
        let mut dataset = dataset();
        dataset.end = dataset.start;
        let err = run(&dataset, &topology(), at(2024)).unwrap_err();
        assert!(matches!(err, PipelineError::InvalidDatasetInterval(_)));
    }

    #[test]
    fn test_sequential_and_parallel_agree() {
        let topology = topology();
        let sequential = Pipeline::new(&topology, ImportConfig::default().with_threads(1))
            .run(&dataset(), at(2024))
            .unwrap();
        let parallel = Pipeline::new(&topology, ImportConfig::default().with_threads(4))
            .run(&dataset(), at(2024))
            .unwrap();
        assert_eq!(sequential, parallel);
        assert!(sequential.model.contingencies.contains_key("co-1"));
    }
}
