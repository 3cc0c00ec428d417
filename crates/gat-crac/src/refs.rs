//! Reference resolution against the topology and the committed model.
//!
//! Lookups never fail: absence is a normal result that resolvers turn into
//! partial-success details or rejections. Only entities already committed
//! to the model are visible, which is what makes stage order matter.

use std::collections::BTreeSet;

use gat_secmodel::{ElementAttributes, Instant, NetworkTopology, SecurityModelView};

/// Network elements split by whether the topology knows them.
#[derive(Debug, Default)]
pub struct ElementResolution<'t> {
    pub found: Vec<(String, &'t ElementAttributes)>,
    pub missing: Vec<String>,
}

impl ElementResolution<'_> {
    pub fn missing_detail(&self) -> String {
        self.missing.join(", ")
    }
}

/// Declared contingency ids split by whether they were imported.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ContingencyResolution {
    pub resolved: Vec<String>,
    pub failed: Vec<String>,
}

impl ContingencyResolution {
    pub fn declared(&self) -> bool {
        !self.resolved.is_empty() || !self.failed.is_empty()
    }

    pub fn any_failed(&self) -> bool {
        !self.failed.is_empty()
    }
}

/// A committed CNEC as seen by remedial-action resolution.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct ResolvedCnec {
    pub id: String,
    pub instant: Instant,
}

pub struct ReferenceResolver<'a, T: ?Sized, M: ?Sized> {
    topology: &'a T,
    model: &'a M,
}

impl<'a, T, M> ReferenceResolver<'a, T, M>
where
    T: NetworkTopology + ?Sized,
    M: SecurityModelView + ?Sized,
{
    pub fn new(topology: &'a T, model: &'a M) -> Self {
        Self { topology, model }
    }

    pub fn resolve_network_element(&self, id: &str) -> Option<&'a ElementAttributes> {
        self.topology.attributes_of(id)
    }

    pub fn resolve_network_elements<'i>(
        &self,
        ids: impl IntoIterator<Item = &'i str>,
    ) -> ElementResolution<'a> {
        let mut resolution = ElementResolution::default();
        for id in ids {
            match self.resolve_network_element(id) {
                Some(attrs) => resolution.found.push((id.to_string(), attrs)),
                None => resolution.missing.push(id.to_string()),
            }
        }
        resolution
    }

    /// Created id of a committed contingency.
    pub fn resolve_contingency(&self, id: &str) -> Option<String> {
        self.model.contingency(id).map(|c| c.id.clone())
    }

    pub fn resolve_contingencies<'i>(
        &self,
        ids: impl IntoIterator<Item = &'i str>,
    ) -> ContingencyResolution {
        let mut resolution = ContingencyResolution::default();
        for id in ids {
            match self.resolve_contingency(id) {
                Some(created) => resolution.resolved.push(created),
                None => resolution.failed.push(id.to_string()),
            }
        }
        resolution
    }

    /// Ids of every committed contingency.
    pub fn all_contingencies(&self) -> Vec<String> {
        self.model
            .contingency_ids()
            .into_iter()
            .map(str::to_string)
            .collect()
    }

    /// Committed CNECs of a monitored series, optionally restricted to
    /// those defined after one of `contingencies`. Unmatched is empty.
    pub fn resolve_cnecs(
        &self,
        monitored_series: &str,
        contingencies: Option<&BTreeSet<String>>,
    ) -> BTreeSet<ResolvedCnec> {
        self.model
            .cnecs_of_series(monitored_series)
            .into_iter()
            .filter(|cnec| match (contingencies, &cnec.contingency) {
                (None, _) => true,
                (Some(filter), Some(co)) => filter.contains(co),
                (Some(_), None) => false,
            })
            .map(|cnec| ResolvedCnec {
                id: cnec.id.clone(),
                instant: cnec.instant,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gat_secmodel::{
        Cnec, Contingency, ElementKind, FlowThreshold, InMemoryTopology, SecurityModel,
        SecurityModelBuilder, ThresholdUnit,
    };

    fn cnec(id: &str, instant: Instant, contingency: Option<&str>) -> Cnec {
        Cnec {
            id: id.into(),
            name: id.into(),
            monitored_series: "series-1".into(),
            network_element: "line-1".into(),
            instant,
            contingency: contingency.map(str::to_string),
            thresholds: vec![FlowThreshold::for_side(
                ThresholdUnit::Megawatt,
                100.0,
                gat_secmodel::FlowSide::Both,
            )],
            nominal_voltage_kv: 400.0,
            optimized: true,
            monitored: false,
        }
    }

    fn fixture() -> (InMemoryTopology, SecurityModel) {
        let topology = InMemoryTopology::new()
            .with_element("line-1", ElementAttributes::new(ElementKind::Line));
        let mut model = SecurityModel::new();
        model
            .add_contingency(Contingency::new("co-1", "co-1", vec!["line-1".into()]))
            .unwrap();
        model.add_cnec(cnec("prev", Instant::Preventive, None)).unwrap();
        model.add_cnec(cnec("cur-1", Instant::Curative, Some("co-1"))).unwrap();
        model.add_cnec(cnec("cur-2", Instant::Curative, Some("co-2"))).unwrap();
        (topology, model)
    }

    #[test]
    fn test_network_elements_partition() {
        let (topology, model) = fixture();
        let resolver = ReferenceResolver::new(&topology, &model);
        let resolution = resolver.resolve_network_elements(["line-1", "line-2"]);
        assert_eq!(resolution.found.len(), 1);
        assert_eq!(resolution.missing, vec!["line-2".to_string()]);
    }

    #[test]
    fn test_contingencies_only_see_committed() {
        let (topology, model) = fixture();
        let resolver = ReferenceResolver::new(&topology, &model);
        let resolution = resolver.resolve_contingencies(["co-1", "co-9"]);
        assert_eq!(resolution.resolved, vec!["co-1".to_string()]);
        assert_eq!(resolution.failed, vec!["co-9".to_string()]);
        assert!(resolution.declared() && resolution.any_failed());
    }

    #[test]
    fn test_cnecs_with_contingency_filter() {
        let (topology, model) = fixture();
        let resolver = ReferenceResolver::new(&topology, &model);
        assert_eq!(resolver.resolve_cnecs("series-1", None).len(), 3);

        let filter = BTreeSet::from(["co-1".to_string()]);
        let ids: Vec<_> = resolver
            .resolve_cnecs("series-1", Some(&filter))
            .into_iter()
            .map(|c| c.id)
            .collect();
        assert_eq!(ids, vec!["cur-1".to_string()]);
        assert!(resolver.resolve_cnecs("series-9", None).is_empty());
    }
}
