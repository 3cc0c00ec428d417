//! The committed security model: an arena of entities keyed by id.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{ModelError, ModelResult};
use crate::{Cnec, Contingency, EntityKind, RemedialAction};

/// Write side of the model. Implementations validate nothing beyond identity.
pub trait SecurityModelBuilder {
    fn add_contingency(&mut self, contingency: Contingency) -> ModelResult<()>;
    fn add_cnec(&mut self, cnec: Cnec) -> ModelResult<()>;
    fn add_remedial_action(&mut self, action: RemedialAction) -> ModelResult<()>;
}

/// Read side of the model, restricted to committed entities.
pub trait SecurityModelView {
    fn contingency(&self, id: &str) -> Option<&Contingency>;
    fn contingency_ids(&self) -> Vec<&str>;
    fn cnec(&self, id: &str) -> Option<&Cnec>;
    /// CNECs created from one monitored series, ordered by id.
    fn cnecs_of_series(&self, monitored_series: &str) -> Vec<&Cnec>;
    fn remedial_action(&self, id: &str) -> Option<&RemedialAction>;
}

/// Default in-memory security model.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SecurityModel {
    pub contingencies: BTreeMap<String, Contingency>,
    pub cnecs: BTreeMap<String, Cnec>,
    pub remedial_actions: BTreeMap<String, RemedialAction>,
}

impl SecurityModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entity_count(&self) -> usize {
        self.contingencies.len() + self.cnecs.len() + self.remedial_actions.len()
    }

    pub fn summary(&self) -> String {
        format!(
            "{} contingencies, {} CNECs, {} remedial actions",
            self.contingencies.len(),
            self.cnecs.len(),
            self.remedial_actions.len()
        )
    }
}

fn insert_unique<T>(
    map: &mut BTreeMap<String, T>,
    kind: EntityKind,
    id: String,
    value: T,
) -> ModelResult<()> {
    if map.contains_key(&id) {
        return Err(ModelError::DuplicateEntity { kind, id });
    }
    map.insert(id, value);
    Ok(())
}

impl SecurityModelBuilder for SecurityModel {
    fn add_contingency(&mut self, contingency: Contingency) -> ModelResult<()> {
        let id = contingency.id.clone();
        insert_unique(&mut self.contingencies, EntityKind::Contingency, id, contingency)
    }

    fn add_cnec(&mut self, cnec: Cnec) -> ModelResult<()> {
        let id = cnec.id.clone();
        insert_unique(&mut self.cnecs, EntityKind::Cnec, id, cnec)
    }

    fn add_remedial_action(&mut self, action: RemedialAction) -> ModelResult<()> {
        let id = action.id.clone();
        insert_unique(
            &mut self.remedial_actions,
            EntityKind::RemedialAction,
            id,
            action,
        )
    }
}

impl SecurityModelView for SecurityModel {
    fn contingency(&self, id: &str) -> Option<&Contingency> {
        self.contingencies.get(id)
    }

    fn contingency_ids(&self) -> Vec<&str> {
        self.contingencies.keys().map(String::as_str).collect()
    }

    fn cnec(&self, id: &str) -> Option<&Cnec> {
        self.cnecs.get(id)
    }

    fn cnecs_of_series(&self, monitored_series: &str) -> Vec<&Cnec> {
        self.cnecs
            .values()
            .filter(|c| c.monitored_series == monitored_series)
            .collect()
    }

    fn remedial_action(&self, id: &str) -> Option<&RemedialAction> {
        self.remedial_actions.get(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{FlowThreshold, Instant, ThresholdUnit};

    fn cnec(id: &str, series: &str) -> Cnec {
        Cnec {
            id: id.into(),
            name: id.into(),
            monitored_series: series.into(),
            network_element: "line-1".into(),
            instant: Instant::Preventive,
            contingency: None,
            thresholds: vec![FlowThreshold {
                unit: ThresholdUnit::Megawatt,
                min: None,
                max: Some(100.0),
            }],
            nominal_voltage_kv: 400.0,
            optimized: true,
            monitored: false,
        }
    }

    #[test]
    fn test_duplicate_ids_are_refused() {
        let mut model = SecurityModel::new();
        model
            .add_contingency(Contingency::new("co-1", "first", vec!["line-1".into()]))
            .unwrap();
        let err = model
            .add_contingency(Contingency::new("co-1", "again", vec![]))
            .unwrap_err();
        assert_eq!(
            err,
            ModelError::DuplicateEntity {
                kind: EntityKind::Contingency,
                id: "co-1".into()
            }
        );
        assert_eq!(model.contingency("co-1").unwrap().name, "first");
    }

    #[test]
    fn test_cnecs_of_series() {
        let mut model = SecurityModel::new();
        model.add_cnec(cnec("b", "series-1")).unwrap();
        model.add_cnec(cnec("a", "series-1")).unwrap();
        model.add_cnec(cnec("c", "series-2")).unwrap();

        let ids: Vec<_> = model
            .cnecs_of_series("series-1")
            .into_iter()
            .map(|c| c.id.as_str())
            .collect();
        assert_eq!(ids, vec!["a", "b"]);
        assert!(model.cnecs_of_series("series-3").is_empty());
        assert_eq!(model.summary(), "0 contingencies, 3 CNECs, 0 remedial actions");
    }
}
