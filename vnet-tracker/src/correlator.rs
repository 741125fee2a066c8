use tracing::debug;

use crate::error::{TrackerError, TrackerResult};
use crate::types::{ContractRecord, DeploymentGroup, InfrastructureSnapshot};

/// Groups deployment records under the environment whose chain id they were deployed on.
///
/// Environments are visited in snapshot order and only those that received at least one contract are
/// returned. Matching is by decimal chain id alone: if two environments share a chain id, both claim the
/// same contracts.
pub fn correlate(
    records: &[ContractRecord],
    snapshot: Option<&InfrastructureSnapshot>,
    run_key: &str,
) -> TrackerResult<Vec<DeploymentGroup>> {
    let snapshot = snapshot.ok_or_else(|| TrackerError::MissingSnapshot(run_key.to_string()))?;

    let groups: Vec<_> = snapshot
        .environments()
        .filter_map(|environment| {
            let chain = environment.chain_id.to_string();
            let contracts: Vec<_> = records.iter().filter(|record| record.chain == chain).cloned().collect();

            if contracts.is_empty() {
                debug!(network_id = %environment.network_id, chain = %chain, "No deployments on environment");
                return None;
            }
            Some(DeploymentGroup { virtual_test_net: environment.clone(), contracts })
        })
        .collect();

    let matched: usize = groups.iter().map(|group| group.contracts.len()).sum();
    if matched < records.len() {
        debug!(unmatched = records.len() - matched, "Some deployments did not match any environment");
    }
    Ok(groups)
}
