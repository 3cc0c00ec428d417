//! Contingencies: which network elements trip together.

use gat_secmodel::{Contingency, NetworkTopology, SecurityModelView};

use crate::record::{attr, EffectiveRecord, ReferenceRole};
use crate::refs::ReferenceResolver;
use crate::resolve::{parse_flag, Built, Entity};
use crate::status::Rejection;

/// Build a contingency from its effective record.
///
/// **Algorithm:**
/// 1. A contingency not to be studied is excluded by policy
/// 2. It must reference at least one network element
/// 3. Unknown elements are dropped; if none are left it is not created
pub fn resolve_contingency<T, M>(
    record: &EffectiveRecord,
    refs: &ReferenceResolver<'_, T, M>,
) -> Result<Built, Rejection>
where
    T: NetworkTopology + ?Sized,
    M: SecurityModelView + ?Sized,
{
    if !parse_flag(record, attr::MUST_STUDY, true)? {
        return Err(Rejection::NotForOptimization(
            "contingency.mustStudy is false".to_string(),
        ));
    }

    let declared = record.reference_ids(ReferenceRole::NetworkElement);
    if declared.is_empty() {
        return Err(Rejection::IncompleteData(
            "contingency references no network element".to_string(),
        ));
    }

    let resolution = refs.resolve_network_elements(declared);
    if resolution.found.is_empty() {
        return Err(Rejection::ElementNotFound(format!(
            "none of the network elements were found in network: {}",
            resolution.missing_detail()
        )));
    }

    let mut alterations = Vec::new();
    if !resolution.missing.is_empty() {
        alterations.push(format!(
            "some network elements were not found in network: {}",
            resolution.missing_detail()
        ));
    }

    let elements = resolution.found.into_iter().map(|(id, _)| id).collect();
    let contingency = Contingency::new(&record.id, record.display_name(), elements)
        .with_operator(record.attribute(attr::OPERATOR).map(str::to_string));
    Ok(Built::new(Entity::Contingency(contingency), alterations))
}
